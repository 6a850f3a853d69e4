mod render;


pub use render::{Style, render_day};

use crate::conf::load_config;
use crate::stats::{StatsFiles, load_day};
use anyhow::{Context, bail};
use std::io::{self, IsTerminal};
use std::path::Path;

/// `logstat show <date>`: print the summary of one stored day.
pub fn run_show(config_path: &Path, date: &str, plain: bool) -> anyhow::Result<()> {
    let cfg = load_config(config_path)?;
    let files = StatsFiles::in_dir(&cfg.dirs.stats);

    let Some(tree) = load_day(&files, date)
        .with_context(|| format!("failed to read stats for {date}"))?
    else {
        bail!("no stats for {date} in {}", cfg.dirs.stats.display());
    };

    let style = if plain || !io::stdout().is_terminal() {
        Style::Plain
    } else {
        Style::Color
    };

    print!("{}", render_day(&tree, style));
    Ok(())
}
