pub mod cache;
pub mod classify;
pub mod cli;
pub mod conf;
pub mod enrichment;
pub mod hash;
pub mod import;
pub mod logging;
pub mod parse;
pub mod persist;
pub mod stats;
