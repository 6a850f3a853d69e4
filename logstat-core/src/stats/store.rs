use crate::persist::{Encoding, PersistError, read_document, write_document};
use crate::stats::StatsTree;
use std::path::{Path, PathBuf};

pub const STATS_FORMAT_VERSION: u64 = 1;

/// Where daily stats files live: `<dir>/<YYYY-MM-DD>.stats.json.gz`.
#[derive(Debug, Clone)]
pub struct StatsFiles {
    dir: PathBuf,
}

impl StatsFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn path_for(&self, date: &str) -> PathBuf {
        self.dir.join(format!("{date}.stats.json.gz"))
    }
}

/// The stored tree for `date`, if one was written before.
pub fn load_day(files: &StatsFiles, date: &str) -> Result<Option<StatsTree>, PersistError> {
    let path = files.path_for(date);
    let tree = read_document::<StatsTree>(&path, Encoding::Gzip, STATS_FORMAT_VERSION)?;
    if tree.is_some() {
        tracing::debug!(path = %path.display(), "read stats file");
    }
    Ok(tree)
}

pub fn save_day(files: &StatsFiles, tree: &StatsTree) -> Result<PathBuf, PersistError> {
    let path = files.path_for(&tree.date);
    tracing::debug!(path = %path.display(), "saving stats");
    write_document(&path, Encoding::Gzip, tree)?;
    Ok(path)
}
