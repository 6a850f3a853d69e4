use crate::cache::client::ClientCache;
use crate::cache::identity::IdentityCache;
use crate::cache::retention::RetentionTracker;
use crate::conf::Limits;
use crate::persist::{Encoding, PersistError, read_document, write_document};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CACHE_FORMAT_VERSION: u64 = 1;

#[derive(Serialize, Deserialize)]
struct CacheDocument<T> {
    version: u64,
    entries: T,
}

/// Locations of the three cache files.
#[derive(Debug, Clone)]
pub struct CacheFiles {
    pub identity: PathBuf,
    pub client: PathBuf,
    pub retention: PathBuf,
}

impl CacheFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            identity: dir.join("identity.cache.json"),
            client: dir.join("client.cache.json"),
            retention: dir.join("retention.cache.json"),
        }
    }
}

/// The caches shared by every file of a run.
#[derive(Debug, Clone)]
pub struct Caches {
    pub identity: IdentityCache,
    pub clients: ClientCache,
    pub retention: RetentionTracker,
}

impl Caches {
    pub fn new(limits: &Limits) -> Self {
        Self {
            identity: IdentityCache::new(limits.identity_cache),
            clients: ClientCache::new(limits.client_cache),
            retention: RetentionTracker::new(limits.retention_days, limits.retention_visitors),
        }
    }

    /// Load all three caches. A missing file is an empty cache; an unreadable
    /// one is reported and replaced by an empty cache.
    pub fn load(files: &CacheFiles, limits: &Limits) -> Self {
        Self {
            identity: IdentityCache::from_entries(
                load_entries(&files.identity),
                limits.identity_cache,
            ),
            clients: ClientCache::from_entries(load_entries(&files.client), limits.client_cache),
            retention: RetentionTracker::from_table(
                load_entries(&files.retention),
                limits.retention_days,
                limits.retention_visitors,
            ),
        }
    }

    /// Periodic trim: only caches that grew since their last trim.
    pub fn trim_grown(&mut self, anchor: NaiveDate) {
        let ips = self.identity.cache_mut().trim_if_grown();
        let clients = self.clients.cache_mut().trim_if_grown();
        let visitors = self.retention.trim_if_grown(anchor);
        tracing::trace!(ips, clients, visitors, "trimmed caches");
    }

    /// Trim and write every cache changed since it was loaded (or last saved).
    pub fn save(&mut self, files: &CacheFiles, anchor: NaiveDate) -> Result<(), PersistError> {
        if self.identity.cache().is_dirty() {
            self.identity.cache_mut().trim();
            tracing::trace!(path = %files.identity.display(), "writing cache");
            save_entries(&files.identity, self.identity.cache().entries())?;
            self.identity.cache_mut().mark_clean();
        }

        if self.clients.cache().is_dirty() {
            self.clients.cache_mut().trim();
            tracing::trace!(path = %files.client.display(), "writing cache");
            save_entries(&files.client, self.clients.cache().entries())?;
            self.clients.cache_mut().mark_clean();
        }

        if self.retention.is_dirty() {
            self.retention.trim(anchor);
            tracing::trace!(path = %files.retention.display(), "writing cache");
            save_entries(&files.retention, self.retention.table())?;
            self.retention.mark_clean();
        }

        Ok(())
    }
}

fn load_entries<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_document::<CacheDocument<T>>(path, Encoding::Plain, CACHE_FORMAT_VERSION) {
        Ok(Some(doc)) => {
            tracing::trace!(path = %path.display(), "read cache");
            doc.entries
        }
        Ok(None) => T::default(),
        Err(e) => {
            tracing::error!(error = %e, "cache unreadable, starting empty");
            T::default()
        }
    }
}

fn save_entries<T: Serialize>(path: &Path, entries: &T) -> Result<(), PersistError> {
    write_document(
        path,
        Encoding::Plain,
        &CacheDocument {
            version: CACHE_FORMAT_VERSION,
            entries,
        },
    )
}
