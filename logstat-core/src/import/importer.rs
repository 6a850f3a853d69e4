use crate::cache::{CacheFiles, Caches};
use crate::classify::classify;
use crate::conf::ImportConfig;
use crate::enrichment::{ClientResolver, CountryResolver};
use crate::hash::{digest, visitor_key};
use crate::import::{FileReport, ImportError};
use crate::parse::{LogRecord, parse_line};
use crate::stats::{Hit, StatsFiles, StatsTree, load_day, save_day};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Result of importing one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<FileReport, ImportError>,
}

/// The day a file is being aggregated into.
struct Day {
    date: String,
    anchor: NaiveDate,
    stats: StatsTree,
    /// Lines at the start of the file already counted by an earlier run.
    resume_after: u64,
}

/// Owns the caches for a whole run; files are imported one after another and
/// share them.
pub struct Importer {
    country: Box<dyn CountryResolver>,
    client: Box<dyn ClientResolver>,
    caches: Caches,
    cache_files: CacheFiles,
    stats_files: StatsFiles,
    resume: bool,
    trim_interval: u64,
}

impl Importer {
    /// Set up an importer, loading the caches from `dirs.cache`.
    pub fn new(
        config: &ImportConfig,
        country: Box<dyn CountryResolver>,
        client: Box<dyn ClientResolver>,
    ) -> Self {
        let cache_files = CacheFiles::in_dir(&config.dirs.cache);
        let caches = Caches::load(&cache_files, &config.limits);

        Self {
            country,
            client,
            caches,
            cache_files,
            stats_files: StatsFiles::in_dir(&config.dirs.stats),
            resume: config.resume,
            trim_interval: config.limits.trim_interval.max(1),
        }
    }

    pub fn caches(&self) -> &Caches {
        &self.caches
    }

    /// Import every file in order. A failing file is logged and skipped.
    pub fn import(&mut self, paths: &[PathBuf]) -> Vec<FileOutcome> {
        paths
            .iter()
            .map(|path| {
                let result = self.import_log_file(path);
                if let Err(e) = &result {
                    tracing::error!(path = %path.display(), error = %e, "import failed");
                }
                FileOutcome {
                    path: path.clone(),
                    result,
                }
            })
            .collect()
    }

    /// Aggregate one log file into the stats of the day its first line belongs to.
    pub fn import_log_file(&mut self, path: &Path) -> Result<FileReport, ImportError> {
        let file = File::open(path).map_err(|source| ImportError::OpenLog {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        tracing::debug!(path = %path.display(), "reading log");

        let mut report = FileReport::default();
        let mut day: Option<Day> = None;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ImportError::ReadLog {
                    path: path.to_path_buf(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            report.lines_total += 1;

            let line = String::from_utf8_lossy(&buf);
            let Some(record) = parse_line(&line) else {
                report.skipped_tail += 1;
                if day.is_none() {
                    return Err(ImportError::FirstLineUnparsable {
                        path: path.to_path_buf(),
                    });
                }
                continue;
            };

            if day.is_none() {
                day = Some(self.open_day(&record, &line)?);
            }
            let Some(current) = day.as_mut() else {
                continue;
            };

            if report.lines_total <= current.resume_after {
                report.skipped_head += 1;
                continue;
            }

            if record.time.date_key() != current.date {
                report.other_dates += 1;
                continue;
            }

            self.accumulate(current, &record);
            report.lines_read += 1;

            if report.lines_read % self.trim_interval == 0 {
                self.caches.trim_grown(current.anchor);
            }
        }

        let Some(mut day) = day else {
            tracing::info!(path = %path.display(), "log file is empty");
            return Ok(report);
        };
        report.date = Some(day.date.clone());

        self.caches.save(&self.cache_files, day.anchor)?;

        tracing::info!(path = %path.display(), "{report}");

        let previously = day.stats.lines_parsed;
        if report.lines_total < previously {
            tracing::warn!(
                path = %path.display(),
                lines = report.lines_total,
                previously,
                "log file is shorter than on the previous run"
            );
        }
        day.stats.lines_parsed = report.lines_total;

        if report.lines_read > 0 || report.lines_total != previously {
            save_day(&self.stats_files, &day.stats)?;
        }

        Ok(report)
    }

    /// Fix the processing day from the first parsed line and load what an
    /// earlier run stored for it.
    ///
    /// Stored progress is only resumed when `head_line` matches the first line
    /// of the file that progress was counted on; a rotated or rewritten log is
    /// read from the start.
    fn open_day(&mut self, first: &LogRecord<'_>, head_line: &str) -> Result<Day, ImportError> {
        let date = first.time.date_key();
        let anchor = first.time.date();

        let mut stats = match load_day(&self.stats_files, &date) {
            Ok(Some(mut stats)) => {
                if stats.date.is_empty() {
                    stats.date = date.clone();
                }
                if stats.date != date {
                    return Err(ImportError::DateMismatch {
                        path: self.stats_files.path_for(&date),
                        log_date: date,
                        stats_date: stats.date,
                    });
                }
                stats
            }
            Ok(None) => StatsTree::new(&date),
            Err(source) => return Err(ImportError::CorruptStats { date, source }),
        };

        let head_digest = digest(&[head_line.trim_end_matches(['\r', '\n'])]);
        let same_file = stats.head_digest.is_empty() || stats.head_digest == head_digest;

        let resume_after = match (self.resume, same_file) {
            (true, true) => stats.lines_parsed,
            (true, false) => {
                tracing::info!(
                    date = %date,
                    previously = stats.lines_parsed,
                    "log file was replaced since the previous run, reading it from the start"
                );
                0
            }
            (false, _) => 0,
        };
        stats.head_digest = head_digest;
        tracing::debug!(date = %date, resume_after, "processing day");

        self.caches.retention.trim(anchor);

        Ok(Day {
            date,
            anchor,
            stats,
            resume_after,
        })
    }

    fn accumulate(&mut self, day: &mut Day, record: &LogRecord<'_>) {
        let class = classify(record);
        let now = record.time.local;

        let country = self
            .caches
            .identity
            .country(record.ip, now, self.country.as_ref())
            .to_string();
        let client = self
            .caches
            .clients
            .client(record.user_agent, now, self.client.as_ref())
            .clone();

        let visitor = visitor_key(record.ip, record.user_agent);
        let new_visitor = day.stats.admit_visitor(&visitor);
        let new_page_view = class.is_successful_page()
            && self.caches.retention.mark_page(&day.date, &visitor, &class.url);

        let retention_dates = if client.is_bot() {
            Vec::new()
        } else {
            self.caches.retention.dates_with(&visitor, &class.url)
        };

        day.stats.record(&Hit {
            class: &class,
            hour: record.time.hour(),
            bytes: record.bytes,
            cache_status: record.cache_status,
            country: &country,
            client: &client,
            new_visitor,
            new_page_view,
            retention_dates: &retention_dates,
        });
    }
}
