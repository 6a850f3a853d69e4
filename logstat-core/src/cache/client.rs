use crate::cache::recency::{RecencyCache, Seen};
use crate::enrichment::{ClientInfo, ClientResolver};
use crate::hash::user_agent_hash;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub client: ClientInfo,
}

/// User-agent hash to client description. Parsing user agents is by far the
/// most expensive step per line, and a site sees few distinct ones.
#[derive(Debug, Clone)]
pub struct ClientCache {
    inner: RecencyCache<Client>,
}

impl ClientCache {
    pub fn new(cap: usize) -> Self {
        Self {
            inner: RecencyCache::new(cap),
        }
    }

    pub fn from_entries(entries: BTreeMap<String, Seen<Client>>, cap: usize) -> Self {
        Self {
            inner: RecencyCache::from_entries(entries, cap),
        }
    }

    pub fn client(
        &mut self,
        ua: &str,
        now: NaiveDateTime,
        resolver: &dyn ClientResolver,
    ) -> &ClientInfo {
        let key = user_agent_hash(ua);
        let entry = self.inner.lookup_or_create(&key, now, || {
            tracing::trace!(ua, "parsing user agent");
            Client {
                client: resolver.resolve(ua),
            }
        });
        &entry.client
    }

    pub fn cache(&self) -> &RecencyCache<Client> {
        &self.inner
    }

    pub fn cache_mut(&mut self) -> &mut RecencyCache<Client> {
        &mut self.inner
    }
}
