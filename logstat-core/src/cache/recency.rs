use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// A cached value and the latest log timestamp it was looked up at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seen<V> {
    #[serde(flatten)]
    pub value: V,
    pub last_seen: NaiveDateTime,
}

/// Map bounded by recency: a trim keeps the `cap` most recently seen keys.
#[derive(Debug, Clone)]
pub struct RecencyCache<V> {
    entries: BTreeMap<String, Seen<V>>,
    cap: usize,
    /// Changed since load; needs saving.
    dirty: bool,
    /// Grew since the last trim.
    grown: bool,
}

impl<V> RecencyCache<V> {
    pub fn new(cap: usize) -> Self {
        Self::from_entries(BTreeMap::new(), cap)
    }

    pub fn from_entries(entries: BTreeMap<String, Seen<V>>, cap: usize) -> Self {
        Self {
            entries,
            cap,
            dirty: false,
            grown: false,
        }
    }

    /// Cached value for `key`, resolving and storing it on a miss.
    ///
    /// A hit moves `last_seen` forward to `now`, never backwards.
    pub fn lookup_or_create(
        &mut self,
        key: &str,
        now: NaiveDateTime,
        resolve: impl FnOnce() -> V,
    ) -> &V {
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(slot) => {
                let seen = slot.into_mut();
                if now > seen.last_seen {
                    seen.last_seen = now;
                    self.dirty = true;
                }
                &seen.value
            }
            Entry::Vacant(slot) => {
                self.dirty = true;
                self.grown = true;
                &slot
                    .insert(Seen {
                        value: resolve(),
                        last_seen: now,
                    })
                    .value
            }
        }
    }

    /// Keep the `cap` most recently seen entries. Ties keep key order.
    /// Returns how many entries were evicted.
    pub fn trim(&mut self) -> usize {
        self.grown = false;
        if self.entries.len() <= self.cap {
            return 0;
        }

        let mut ranked: Vec<(String, Seen<V>)> =
            std::mem::take(&mut self.entries).into_iter().collect();
        ranked.sort_by(|(_, a), (_, b)| b.last_seen.cmp(&a.last_seen));

        let evicted = ranked.len() - self.cap;
        ranked.truncate(self.cap);
        self.entries = ranked.into_iter().collect();
        self.dirty = true;
        evicted
    }

    /// Trim only when entries were added since the previous trim.
    pub fn trim_if_grown(&mut self) -> usize {
        if self.grown { self.trim() } else { 0 }
    }

    pub fn get(&self, key: &str) -> Option<&Seen<V>> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> &BTreeMap<String, Seen<V>> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
