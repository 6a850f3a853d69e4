use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Pages a visitor has been counted for on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorPages {
    pub pages: u64,
    pub urls: BTreeSet<String>,
}

/// `YYYY-MM-DD` to visitor key to counted pages.
pub type RetentionTable = BTreeMap<String, BTreeMap<String, VisitorPages>>;

/// Remembers which visitor has already been counted for which page, per day.
///
/// Serves two purposes: gating first-visit counts on the current day, and
/// detecting returning visitors on any day still held in the table.
#[derive(Debug, Clone)]
pub struct RetentionTracker {
    table: RetentionTable,
    window_days: u32,
    visitors_per_day: usize,
    dirty: bool,
    grown: bool,
}

impl RetentionTracker {
    pub fn new(window_days: u32, visitors_per_day: usize) -> Self {
        Self::from_table(RetentionTable::new(), window_days, visitors_per_day)
    }

    pub fn from_table(table: RetentionTable, window_days: u32, visitors_per_day: usize) -> Self {
        Self {
            table,
            window_days,
            visitors_per_day,
            dirty: false,
            grown: false,
        }
    }

    /// Record that `visitor` viewed `url` on `date`.
    ///
    /// Returns `true` only the first time this visitor is counted for this
    /// URL on this day.
    pub fn mark_page(&mut self, date: &str, visitor: &str, url: &str) -> bool {
        let pages = self
            .table
            .entry(date.to_owned())
            .or_default()
            .entry(visitor.to_owned())
            .or_default();

        if pages.urls.contains(url) {
            return false;
        }

        pages.urls.insert(url.to_owned());
        pages.pages += 1;
        self.dirty = true;
        self.grown = true;
        true
    }

    /// Every held day on which `visitor` was counted for `url`.
    pub fn dates_with(&self, visitor: &str, url: &str) -> Vec<&str> {
        self.table
            .iter()
            .filter(|(_, visitors)| visitors.get(visitor).is_some_and(|v| v.urls.contains(url)))
            .map(|(date, _)| date.as_str())
            .collect()
    }

    /// Oldest day kept when trimming against `anchor`.
    pub fn cutoff(&self, anchor: NaiveDate) -> NaiveDate {
        anchor
            .checked_sub_days(Days::new(u64::from(self.window_days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Drop days older than the trailing window ending at `anchor`, then keep
    /// the `visitors_per_day` most active visitors of each remaining day.
    /// Ties keep visitor-key order. Returns how many visitor entries went away.
    pub fn trim(&mut self, anchor: NaiveDate) -> usize {
        self.grown = false;
        let cutoff = self.cutoff(anchor).format("%Y-%m-%d").to_string();
        let mut evicted = 0;

        let before = self.table.len();
        self.table.retain(|date, visitors| {
            let keep = date.as_str() >= cutoff.as_str();
            if !keep {
                evicted += visitors.len();
            }
            keep
        });
        let mut changed = self.table.len() != before;

        for visitors in self.table.values_mut() {
            if visitors.len() <= self.visitors_per_day {
                continue;
            }

            let mut ranked: Vec<(String, VisitorPages)> =
                std::mem::take(visitors).into_iter().collect();
            ranked.sort_by(|(_, a), (_, b)| b.pages.cmp(&a.pages));

            evicted += ranked.len() - self.visitors_per_day;
            ranked.truncate(self.visitors_per_day);
            *visitors = ranked.into_iter().collect();
            changed = true;
        }

        if changed {
            self.dirty = true;
        }
        evicted
    }

    /// Trim only when pages were marked since the previous trim.
    pub fn trim_if_grown(&mut self, anchor: NaiveDate) -> usize {
        if self.grown { self.trim(anchor) } else { 0 }
    }

    pub fn table(&self) -> &RetentionTable {
        &self.table
    }

    pub fn visitors_on(&self, date: &str) -> Option<&BTreeMap<String, VisitorPages>> {
        self.table.get(date)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
