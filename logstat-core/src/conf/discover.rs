use crate::conf::error::ConfigError;
use glob::glob;
use std::path::{Path, PathBuf};

/// Finds the log files matching `glob_pattern` under `root`.
///
/// Directories are skipped and the result is sorted, so date-stamped log names
/// come back in chronological order. Caches are shared across the files of a
/// run, and processing older days first keeps their recency order meaningful.
///
/// # Errors
///
/// Returns `ConfigError::Glob` if the pattern is malformed.
pub fn discover_logs(root: &Path, glob_pattern: &str) -> Result<Vec<PathBuf>, ConfigError> {
    let pattern = &resolve_glob(root, glob_pattern);
    let mut paths: Vec<_> = glob(pattern)
        .map_err(|e| ConfigError::Glob {
            pattern: pattern.to_string(),
            source: e,
        })?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();

    paths.sort();
    Ok(paths)
}

/// Joins `pattern` onto `root` and returns it as a glob string.
pub fn resolve_glob(root: &Path, pattern: &str) -> String {
    root.join(pattern).to_string_lossy().into_owned()
}
