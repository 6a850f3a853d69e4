//! Access-log line grammar.
//!
//! One line is one request:
//!
//! ```text
//! host ip - [datetime] "method url protocol" status bytes "referer" "ua" [speed] [cache-status]
//! ```
//!
//! `speed` is an optional `d+.d+` token (response time in seconds) and
//! `cache-status` is whatever non-empty remainder follows it.

mod line;
mod record;


pub use line::parse_line;
pub use record::*;
