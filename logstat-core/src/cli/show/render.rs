use crate::stats::{Counts, StatsTree, TOTAL, Totals};
use owo_colors::OwoColorize;
use std::fmt::Write as _;

const TOP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Color,
}

impl Style {
    fn heading(self, text: &str) -> String {
        match self {
            Style::Plain => text.to_string(),
            Style::Color => text.bold().to_string(),
        }
    }

    fn bar(self, bar: &str) -> String {
        match self {
            Style::Plain => bar.to_string(),
            Style::Color => bar.green().to_string(),
        }
    }
}

pub fn render_day(tree: &StatsTree, style: Style) -> String {
    let mut out = String::new();

    let title = format!("logstat: {} ({} lines parsed)", tree.date, tree.lines_parsed);
    let _ = writeln!(out, "{}", style.heading(&title));
    let _ = writeln!(out, "{}\n", "=".repeat(title.chars().count()));

    let _ = writeln!(
        out,
        "Hits: {} | Visitors: {} | Size: {}",
        tree.total.hit,
        tree.total.visitor,
        human_bytes(tree.total.size.get(TOTAL).copied().unwrap_or(0))
    );
    let _ = writeln!(
        out,
        "People: {} hits / {} visitors | Bots: {} hits / {} visitors\n",
        tree.ppl.total.hit, tree.ppl.total.visitor, tree.bot.total.hit, tree.bot.total.visitor
    );

    render_counts(&mut out, "Status", &tree.total.status);
    render_counts(&mut out, "URL types", &tree.total.u_type);
    render_counts(&mut out, "Cache", &tree.total.cache);
    out.push('\n');

    render_speed(&mut out, &tree.total, style);

    let countries = ranked(tree.ppl.cc.iter().map(|(cc, stats)| {
        let hits: u64 = stats.status.values().flat_map(|u| u.values()).map(|b| b.hit).sum();
        (cc.as_str(), hits)
    }));
    render_top(&mut out, &style.heading("Top countries (people):"), &countries);

    let bots = ranked(tree.bot.name.iter().map(|(name, status)| {
        let hits: u64 = status.values().flat_map(|u| u.values()).map(|b| b.hit).sum();
        (name.as_str(), hits)
    }));
    render_top(&mut out, &style.heading("Top bots:"), &bots);

    let slow = ranked(
        tree.total
            .slow
            .values()
            .flat_map(|urls| urls.iter().map(|(url, n)| (url.as_str(), *n))),
    );
    render_top(&mut out, &style.heading("Slow requests:"), &slow);

    out
}

fn render_counts(out: &mut String, label: &str, counts: &Counts) {
    if counts.is_empty() {
        return;
    }
    let _ = write!(out, "{label}:");
    for (key, n) in counts {
        let key = if key.is_empty() { "-" } else { key.as_str() };
        let _ = write!(out, " {key}={n}");
    }
    out.push('\n');
}

fn render_speed(out: &mut String, totals: &Totals, style: Style) {
    let total: u64 = totals.speed.values().sum();
    if total == 0 {
        out.push_str("Response time: <no samples>\n\n");
        return;
    }

    let _ = writeln!(out, "{}", style.heading("Response time (s):"));
    for (label, count) in &totals.speed {
        let pct = (*count as f64 / total as f64) * 100.0;
        let bars = ((pct / 5.0).floor() as usize).max(1);
        let _ = writeln!(
            out,
            "  <{:<6} {:<20} {:>5.1}%",
            label,
            style.bar(&"█".repeat(bars)),
            pct
        );
    }
    out.push('\n');
}

/// Entries other than the aggregate `total`, most hits first, ties by name.
fn ranked<'a>(entries: impl Iterator<Item = (&'a str, u64)>) -> Vec<(&'a str, u64)> {
    let mut ranked: Vec<_> = entries.filter(|(name, _)| *name != TOTAL).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked.truncate(TOP);
    ranked
}

fn render_top(out: &mut String, heading: &str, entries: &[(&str, u64)]) {
    if entries.is_empty() {
        return;
    }
    let _ = writeln!(out, "{heading}");
    for (name, hits) in entries {
        let name = if name.is_empty() { "(unknown)" } else { name };
        let _ = writeln!(out, "  {name:<32} {hits:>8}");
    }
    out.push('\n');
}

pub(super) fn human_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
