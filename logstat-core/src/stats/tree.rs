use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Counters keyed by a free-form label (status class, URL type, cache token...).
pub type Counts = BTreeMap<String, u64>;

/// Status class -> URL type -> bucket.
pub type StatusBuckets = BTreeMap<String, BTreeMap<String, Bucket>>;

/// Key used for the aggregate entry next to per-country and per-bot entries.
pub const TOTAL: &str = "total";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsTree {
    pub version: u64,
    pub date: String,
    /// Lines of the log file already accounted for, across runs.
    pub lines_parsed: u64,
    /// Digest of the first line of the file `lines_parsed` refers to.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub head_digest: String,
    /// Visitor keys counted on this day so far. Grows with every unique
    /// visitor of the day; nothing else in the tree is keyed per visitor.
    pub visitor_keys: BTreeSet<String>,
    pub total: Totals,
    pub ppl: PeopleStats,
    pub bot: BotStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Totals {
    pub visitor: u64,
    pub hit: u64,
    pub u_type: Counts,
    pub status: Counts,
    /// Bytes, under `total` and per URL type.
    pub size: Counts,
    pub cache: Counts,
    pub speed: Counts,
    /// URL type -> URL -> requests that took between one and five seconds.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub slow: BTreeMap<String, Counts>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeopleStats {
    pub total: Totals,
    /// Country code (or `total`) -> stats.
    pub cc: BTreeMap<String, CountryStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotStats {
    pub total: Totals,
    /// Bot name (or `total`) -> buckets.
    pub name: BTreeMap<String, StatusBuckets>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryStats {
    pub status: StatusBuckets,
    pub ua: ClientBreakdown,
}

/// Counters for one visitor class / dimension / status class / URL type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bucket {
    pub visitor: u64,
    pub hit: u64,
    /// Requests per local hour of day.
    pub hour: [u64; 24],
    /// Bot versions; empty for people.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub version: Counts,
    pub url: BTreeMap<String, UrlBucket>,
    /// Day the visitor already viewed this page -> repeat views.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub retention: Counts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlBucket {
    pub visitor: u64,
    pub hit: u64,
    pub size: u64,
    pub cache: Counts,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub retention: Counts,
}

/// Which clients people used, per country.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientBreakdown {
    pub total: ClientTotals,
    /// Device type -> browsers and operating systems seen on it.
    pub device: BTreeMap<String, DeviceClients>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientTotals {
    #[serde(rename = "type")]
    pub device_type: Counts,
    pub os: Counts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceClients {
    pub browser: BTreeMap<String, Versions>,
    pub os: BTreeMap<String, Versions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Versions {
    pub total: u64,
    pub version: Counts,
}

impl StatsTree {
    pub fn new(date: &str) -> Self {
        Self {
            version: crate::stats::STATS_FORMAT_VERSION,
            date: date.to_string(),
            ..Self::default()
        }
    }

    /// Register `visitor` for the day. `true` the first time it is seen.
    pub fn admit_visitor(&mut self, visitor: &str) -> bool {
        if self.visitor_keys.contains(visitor) {
            return false;
        }
        self.visitor_keys.insert(visitor.to_string())
    }
}

pub(crate) fn bump(counts: &mut Counts, key: &str, by: u64) {
    match counts.get_mut(key) {
        Some(n) => *n += by,
        None => {
            counts.insert(key.to_string(), by);
        }
    }
}
