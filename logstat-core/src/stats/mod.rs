//! The per-day statistics tree and the rules for folding one request into it.
//!
//! Layout of a day:
//!
//! ```text
//! total                          grand totals, plus the slow-request log
//! ppl.total / bot.total          the same totals per visitor class
//! ppl.cc.<country|total>         status -> uType -> Bucket, plus client breakdown
//! bot.name.<bot|total>           status -> uType -> Bucket (with versions)
//! ```
//!
//! Every counter only ever grows within a day.

mod accumulate;
mod store;
mod tree;


pub use accumulate::Hit;
pub use store::{STATS_FORMAT_VERSION, StatsFiles, load_day, save_day};
pub use tree::*;
