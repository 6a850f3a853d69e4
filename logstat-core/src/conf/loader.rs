use crate::conf::error::ConfigError;
use crate::conf::types::{ImportConfig, UaEngineKind};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "logstat.hcl";

/// Load, resolve and validate a config file.
///
/// Relative paths inside the file are taken relative to the file's directory.
pub fn load_config(path: &Path) -> Result<ImportConfig, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: IO and parsing
    //--------------------------------------------------------------------------
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let mut cfg: ImportConfig = hcl::from_str(&raw).map_err(|e| ConfigError::parse(path, e))?;

    //--------------------------------------------------------------------------
    // Resolve paths
    //--------------------------------------------------------------------------
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    resolve(base, &mut cfg.dirs.logs);
    resolve(base, &mut cfg.dirs.stats);
    resolve(base, &mut cfg.dirs.cache);
    for p in [
        cfg.geoip_country_db.as_mut(),
        cfg.user_agent.regexes.as_mut(),
        cfg.log_file.as_mut(),
    ]
    .into_iter()
    .flatten()
    {
        resolve(base, p);
    }

    validate(&cfg)?;
    Ok(cfg)
}

fn resolve(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

pub(crate) fn validate(cfg: &ImportConfig) -> Result<(), ConfigError> {
    let limits = &cfg.limits;

    if limits.identity_cache == 0 {
        return Err(ConfigError::invalid("limits.identity_cache", "must be greater than zero"));
    }
    if limits.client_cache == 0 {
        return Err(ConfigError::invalid("limits.client_cache", "must be greater than zero"));
    }
    if limits.retention_days == 0 {
        return Err(ConfigError::invalid("limits.retention_days", "must be greater than zero"));
    }
    if limits.retention_visitors == 0 {
        return Err(ConfigError::invalid(
            "limits.retention_visitors",
            "must be greater than zero",
        ));
    }
    if limits.trim_interval == 0 {
        return Err(ConfigError::invalid("limits.trim_interval", "must be greater than zero"));
    }

    if cfg.user_agent.engine == UaEngineKind::UaParser && cfg.user_agent.regexes.is_none() {
        return Err(ConfigError::invalid(
            "user_agent.regexes",
            "the uaparser engine needs a regexes file",
        ));
    }

    if cfg.log_pattern.trim().is_empty() {
        return Err(ConfigError::invalid("log_pattern", "must not be empty"));
    }

    Ok(())
}
