use crate::conf::{ImportConfig, discover_logs, load_config};
use crate::enrichment::{
    ClientResolver, CountryResolver, GeoIpCountryResolver, UnknownCountry, build_ua_engine,
};
use crate::import::{FileOutcome, Importer};
use crate::logging::{Verbosity, init_logging, with_memory_log};
use anyhow::{Context, bail};
use std::path::{Path, PathBuf};

/// Outcome of an import run whose messages were collected in memory.
pub struct EmbeddedRun {
    pub outcomes: Vec<FileOutcome>,
    pub messages: Vec<String>,
}

/// `logstat import`: aggregate the given log files, or every file matching
/// `log_pattern` under `dirs.logs` when none are given.
pub fn run_import(
    config_path: &Path,
    files: Vec<PathBuf>,
    verbosity: Option<Verbosity>,
    full: bool,
) -> anyhow::Result<()> {
    let mut cfg = load_config(config_path)?;
    if full {
        cfg.resume = false;
    }

    let _guard = init_logging(verbosity.unwrap_or(cfg.verbosity), cfg.log_file.as_deref())?;

    let files = if files.is_empty() {
        discover_logs(&cfg.dirs.logs, &cfg.log_pattern)?
    } else {
        files
    };
    if files.is_empty() {
        tracing::warn!(
            dir = %cfg.dirs.logs.display(),
            pattern = %cfg.log_pattern,
            "no log files found"
        );
        return Ok(());
    }

    let (country, client) = build_resolvers(&cfg)?;
    let outcomes = Importer::new(&cfg, country, client).import(&files);

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        bail!("{failed} of {} log files failed to import", outcomes.len());
    }

    Ok(())
}

/// Import with messages captured in memory instead of printed, for callers
/// embedding the importer in another process.
pub fn import_embedded(cfg: &ImportConfig, files: &[PathBuf]) -> anyhow::Result<EmbeddedRun> {
    let (outcomes, log) = with_memory_log(cfg.verbosity, || {
        let (country, client) = build_resolvers(cfg)?;
        anyhow::Ok(Importer::new(cfg, country, client).import(files))
    });

    Ok(EmbeddedRun {
        outcomes: outcomes?,
        messages: log.take(),
    })
}

/// Country and client resolvers as configured. Without a country database
/// every address resolves to the unknown-country sentinel.
pub fn build_resolvers(
    cfg: &ImportConfig,
) -> anyhow::Result<(Box<dyn CountryResolver>, Box<dyn ClientResolver>)> {
    let country: Box<dyn CountryResolver> = match &cfg.geoip_country_db {
        Some(path) => Box::new(
            GeoIpCountryResolver::open(path)
                .with_context(|| format!("failed to open country database {}", path.display()))?,
        ),
        None => {
            tracing::warn!("no geoip_country_db configured, countries will be unknown");
            Box::new(UnknownCountry)
        }
    };

    let engine = build_ua_engine(cfg.user_agent.engine, cfg.user_agent.regexes.as_deref())?;

    Ok((country, Box::new(engine)))
}
