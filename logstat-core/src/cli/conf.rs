use crate::conf::{ConfigError, discover_logs, load_config};
use clap::Subcommand;
use owo_colors::OwoColorize;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Print errors without colors or hints
        #[arg(short, long, default_value = "false")]
        plain: bool,
    },

    /// Print resolved configuration as JSON
    Dump,
}

pub fn run(cmd: ConfigCmd, path: &Path) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Check { plain } => check(path, plain),
        ConfigCmd::Dump => dump(path),
    }
}

pub fn check(path: &Path, plain: bool) -> anyhow::Result<()> {
    let cfg = match load_config(path) {
        Ok(cfg) => cfg,
        Err(err) => {
            print_config_error(&err, plain);
            return Err(err.into());
        }
    };

    let logs = discover_logs(&cfg.dirs.logs, &cfg.log_pattern)?;

    println!("✔ Config loaded successfully");
    println!(
        "✔ logs:  {} ({} matching {})",
        cfg.dirs.logs.display(),
        logs.len(),
        cfg.log_pattern
    );
    println!("✔ stats: {}", cfg.dirs.stats.display());
    println!("✔ cache: {}", cfg.dirs.cache.display());
    match &cfg.geoip_country_db {
        Some(db) => println!("✔ country database: {}", db.display()),
        None => println!("! no country database, countries will be unknown"),
    }
    println!("✔ user agents: {:?}", cfg.user_agent.engine);
    println!(
        "✔ resume: {}, caches: {} ips / {} clients / {} days x {} visitors",
        cfg.resume,
        cfg.limits.identity_cache,
        cfg.limits.client_cache,
        cfg.limits.retention_days,
        cfg.limits.retention_visitors
    );

    Ok(())
}

pub fn dump(path: &Path) -> anyhow::Result<()> {
    let cfg = load_config(path)?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}

fn print_config_error(err: &ConfigError, plain: bool) {
    if plain {
        eprintln!("{err}");
    } else {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), err);
    }

    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::ReadFile { .. } => Some(
            "logstat reads logstat.hcl from the working directory by default.\n\
             Pass another file with --config.",
        ),

        ConfigError::Parse { .. } => Some(
            "A minimal configuration only names the three directories:\n\
             \n\
             dirs {\n\
               logs  = \"var/logs\"\n\
               stats = \"var/stats\"\n\
               cache = \"var/cache\"\n\
             }",
        ),

        ConfigError::InvalidValue { field, .. } if field.starts_with("limits") => {
            Some("Every value in the limits block must be greater than zero.")
        }

        ConfigError::InvalidValue {
            field: "user_agent.regexes",
            ..
        } => Some(
            "The uaparser engine loads its rules from a regexes.yaml file:\n\
             \n\
             user_agent {\n\
               engine  = \"uaparser\"\n\
               regexes = \"regexes.yaml\"\n\
             }",
        ),

        _ => None,
    }
}
