//! Driving one log file (or several) through parse, classify, enrich and
//! accumulate, with the caches and the day's stats loaded and saved around it.

mod error;
mod importer;
mod report;


pub use error::ImportError;
pub use importer::{FileOutcome, Importer};
pub use report::FileReport;
