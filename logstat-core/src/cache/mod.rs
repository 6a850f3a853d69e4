//! Size-bounded memo tables kept between runs.
//!
//! - [`IdentityCache`]: client IP to country code
//! - [`ClientCache`]: user-agent hash to parsed client description
//! - [`RetentionTracker`]: per day, which visitor already counted which page
//!
//! The first two evict by recency (last time the key was seen in a log line),
//! the tracker evicts whole days outside a trailing window and, within a day,
//! the least active visitors.

mod client;
mod identity;
mod recency;
mod retention;
mod store;

#[cfg(test)]
mod tests;

pub use client::ClientCache;
pub use identity::IdentityCache;
pub use recency::{RecencyCache, Seen};
pub use retention::{RetentionTable, RetentionTracker, VisitorPages};
pub use store::{CACHE_FORMAT_VERSION, CacheFiles, Caches};
