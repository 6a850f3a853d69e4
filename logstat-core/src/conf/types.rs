use crate::logging::Verbosity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    pub dirs: DirsConfig,

    /// Glob, relative to `dirs.logs`, used when no log files are named explicitly.
    #[serde(default = "default_log_pattern")]
    pub log_pattern: String,

    /// MaxMind country database. Without it every request resolves to `--`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geoip_country_db: Option<PathBuf>,

    #[serde(default)]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub verbosity: Verbosity,

    /// Optional log file; console output is used otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Skip lines already aggregated by a previous run over the same day.
    #[serde(default = "default_resume")]
    pub resume: bool,

    #[serde(default)]
    pub limits: Limits,
}

impl ImportConfig {
    /// Configuration with `logs/`, `stats/` and `cache/` under `root` and
    /// every other setting at its default.
    pub fn with_root(root: &Path) -> Self {
        Self {
            dirs: DirsConfig {
                logs: root.join("logs"),
                stats: root.join("stats"),
                cache: root.join("cache"),
            },
            log_pattern: default_log_pattern(),
            geoip_country_db: None,
            user_agent: UserAgentConfig::default(),
            verbosity: Verbosity::default(),
            log_file: None,
            resume: default_resume(),
            limits: Limits::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DirsConfig {
    /// Where the access logs are read from.
    pub logs: PathBuf,
    /// Where daily stats files are written.
    pub stats: PathBuf,
    /// Where the three auxiliary caches live between runs.
    pub cache: PathBuf,
}

#[derive(Default, Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UserAgentConfig {
    #[serde(default)]
    pub engine: UaEngineKind,

    /// ua-parser `regexes.yaml`; required by the `uaparser` engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regexes: Option<PathBuf>,
}

#[derive(Default, Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UaEngineKind {
    UaParser,
    #[default]
    Woothee,
}

/// Size and age bounds of the auxiliary caches.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// IP to country entries kept after a trim.
    pub identity_cache: usize,
    /// User-agent entries kept after a trim.
    pub client_cache: usize,
    /// Trailing window of retained days, including the day being processed.
    pub retention_days: u32,
    /// Visitors kept per retained day.
    pub retention_visitors: usize,
    /// Caches are trimmed every this many aggregated lines.
    pub trim_interval: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            identity_cache: 5000,
            client_cache: 500,
            retention_days: 7,
            retention_visitors: 5000,
            trim_interval: 1000,
        }
    }
}

fn default_log_pattern() -> String {
    "*.log".to_string()
}

fn default_resume() -> bool {
    true
}
