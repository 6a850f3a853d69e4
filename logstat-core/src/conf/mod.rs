mod discover;
pub mod error;
mod loader;
pub mod types;


pub use discover::{discover_logs, resolve_glob};
pub use error::ConfigError;
pub use loader::{CONFIG_FILE, load_config};
pub use types::*;
