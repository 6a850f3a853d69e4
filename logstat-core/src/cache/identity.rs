use crate::cache::recency::{RecencyCache, Seen};
use crate::enrichment::CountryResolver;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub country: String,
}

/// Client IP to country code.
#[derive(Debug, Clone)]
pub struct IdentityCache {
    inner: RecencyCache<Country>,
}

impl IdentityCache {
    pub fn new(cap: usize) -> Self {
        Self {
            inner: RecencyCache::new(cap),
        }
    }

    pub fn from_entries(entries: BTreeMap<String, Seen<Country>>, cap: usize) -> Self {
        Self {
            inner: RecencyCache::from_entries(entries, cap),
        }
    }

    pub fn country(
        &mut self,
        ip: &str,
        now: NaiveDateTime,
        resolver: &dyn CountryResolver,
    ) -> &str {
        let entry = self.inner.lookup_or_create(ip, now, || {
            tracing::trace!(ip, "resolving country");
            Country {
                country: resolver.country_code(ip),
            }
        });
        &entry.country
    }

    pub fn cache(&self) -> &RecencyCache<Country> {
        &self.inner
    }

    pub fn cache_mut(&mut self) -> &mut RecencyCache<Country> {
        &mut self.inner
    }
}
