use crate::cache::{ClientCache, IdentityCache, RecencyCache};
use crate::enrichment::{ClientInfo, ClientResolver, CountryResolver, DeviceType};
use crate::hash::user_agent_hash;
use chrono::NaiveDateTime;
use std::cell::Cell;

fn at(ts: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap()
}

#[derive(Default)]
struct CountingCountry {
    calls: Cell<usize>,
}

impl CountryResolver for CountingCountry {
    fn country_code(&self, _ip: &str) -> String {
        self.calls.set(self.calls.get() + 1);
        "HR".to_string()
    }
}

struct FixedClient;

impl ClientResolver for FixedClient {
    fn resolve(&self, _ua: &str) -> ClientInfo {
        ClientInfo::Person {
            device: DeviceType::Desktop,
            browser: Some("Firefox".into()),
            browser_version: Some("120.0".into()),
            os: Some("Linux".into()),
            os_version: None,
        }
    }
}

#[test]
fn miss_resolves_once_and_hit_reuses() {
    // Arrange
    let resolver = CountingCountry::default();
    let mut cache = IdentityCache::new(10);

    // Act
    let first = cache.country("1.2.3.4", at("2024-01-01 10:00:00"), &resolver).to_string();
    let second = cache.country("1.2.3.4", at("2024-01-01 11:00:00"), &resolver).to_string();

    // Assert
    assert_eq!(first, "HR");
    assert_eq!(second, "HR");
    assert_eq!(resolver.calls.get(), 1);
    assert!(cache.cache().is_dirty());
}

#[test]
fn last_seen_only_moves_forward() {
    // Arrange
    let mut cache: RecencyCache<u8> = RecencyCache::new(10);
    cache.lookup_or_create("k", at("2024-01-01 12:00:00"), || 1);

    // Act
    cache.lookup_or_create("k", at("2024-01-01 09:00:00"), || 2);

    // Assert
    let seen = cache.get("k").unwrap();
    assert_eq!(seen.value, 1);
    assert_eq!(seen.last_seen, at("2024-01-01 12:00:00"));

    cache.lookup_or_create("k", at("2024-01-01 13:00:00"), || 3);
    assert_eq!(cache.get("k").unwrap().last_seen, at("2024-01-01 13:00:00"));
}

#[test]
fn trim_keeps_most_recent_entries() {
    // Arrange
    let mut cache: RecencyCache<u8> = RecencyCache::new(2);
    cache.lookup_or_create("old", at("2024-01-01 01:00:00"), || 0);
    cache.lookup_or_create("new", at("2024-01-01 03:00:00"), || 0);
    cache.lookup_or_create("mid", at("2024-01-01 02:00:00"), || 0);

    // Act
    let evicted = cache.trim();

    // Assert
    assert_eq!(evicted, 1);
    assert_eq!(cache.len(), 2);
    assert!(cache.get("old").is_none());
    assert!(cache.get("new").is_some());
    assert!(cache.get("mid").is_some());
}

#[test]
fn trim_ties_keep_key_order() {
    // Arrange
    let mut cache: RecencyCache<u8> = RecencyCache::new(2);
    let ts = at("2024-01-01 01:00:00");
    for key in ["c", "a", "b"] {
        cache.lookup_or_create(key, ts, || 0);
    }

    // Act
    cache.trim();

    // Assert
    let keys: Vec<&str> = cache.entries().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn size_never_exceeds_cap_after_trim() {
    let mut cache: RecencyCache<u32> = RecencyCache::new(500);
    let base = at("2024-01-01 00:00:00");

    for i in 0..1_234u32 {
        let ts = base + chrono::Duration::seconds(i64::from(i % 97));
        cache.lookup_or_create(&format!("ua-{i}"), ts, || i);
    }
    cache.trim();

    assert_eq!(cache.len(), 500);
}

#[test]
fn trim_if_grown_skips_untouched_caches() {
    // Arrange
    let mut cache: RecencyCache<u8> = RecencyCache::new(1);
    cache.lookup_or_create("a", at("2024-01-01 01:00:00"), || 0);
    cache.lookup_or_create("b", at("2024-01-01 02:00:00"), || 0);
    assert_eq!(cache.trim_if_grown(), 1);

    // Act
    cache.lookup_or_create("b", at("2024-01-01 03:00:00"), || 0);

    // Assert
    assert_eq!(cache.trim_if_grown(), 0);
    assert_eq!(cache.len(), 1);
}

#[test]
fn client_cache_is_keyed_by_user_agent_hash() {
    // Arrange
    let mut cache = ClientCache::new(10);

    // Act
    let info = cache
        .client("X", at("2024-01-01 10:00:00"), &FixedClient)
        .clone();

    // Assert
    assert_eq!(info.name(), "Firefox");
    assert!(cache.cache().get(&user_agent_hash("X")).is_some());
    assert!(cache.cache().get("X").is_none());
}
