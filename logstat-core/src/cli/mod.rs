//! Command bodies behind the `logstat` binary.

pub mod conf;
pub mod import;
pub mod show;

pub use conf::ConfigCmd;
pub use import::{EmbeddedRun, build_resolvers, import_embedded, run_import};
pub use show::run_show;
