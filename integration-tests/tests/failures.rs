use integration_tests::harness::{LogLine, Workspace};
use logstat_core::import::ImportError;
use logstat_core::stats::{StatsFiles, StatsTree, save_day};
use pretty_assertions::assert_eq;
use std::fs;

/// A first line outside the grammar aborts the file before anything is written.
#[test]
fn unparsable_first_line_aborts_the_file() {
    // Arrange
    let ws = Workspace::new();
    let good = LogLine::get("1.2.3.4", "01/Jan/2024", "/").render();
    let log = ws.write_raw_log("access.log", &format!("-- rotated --\n{good}\n"));

    // Act
    let err = ws.importer().import_log_file(&log).unwrap_err();

    // Assert
    assert!(matches!(err, ImportError::FirstLineUnparsable { .. }));
    assert!(ws.stats("2024-01-01").is_none());
    assert!(!ws.cache_files().identity.exists());
}

/// Later unparsable lines and other days are tallied, not aggregated.
#[test]
fn skipped_lines_are_tallied() {
    // Arrange
    let ws = Workspace::new();
    let body = [
        LogLine::get("1.2.3.4", "01/Jan/2024", "/").render(),
        "not a log line".to_string(),
        LogLine::get("1.2.3.4", "02/Jan/2024", "/").render(),
        LogLine::get("1.2.3.4", "31/Dec/2023", "/").render(),
        LogLine::get("1.2.3.4", "01/Jan/2024", "/b").render(),
    ]
    .join("\n");
    let log = ws.write_raw_log("access.log", &body);

    // Act
    let report = ws.importer().import_log_file(&log).unwrap();

    // Assert
    assert_eq!(report.lines_total, 5);
    assert_eq!(report.lines_read, 2);
    assert_eq!(report.skipped_tail, 1);
    assert_eq!(report.other_dates, 2);
    assert!(ws.stats("2024-01-02").is_none());
    assert_eq!(ws.stats("2024-01-01").unwrap().total.hit, 2);
}

/// Timestamps are bucketed by the local time written in the line.
#[test]
fn day_follows_the_logged_offset() {
    // Arrange
    let ws = Workspace::new();
    let line = LogLine::get("1.2.3.4", "01/Jan/2024", "/").at("01/Jan/2024:00:30:00 +0100");
    let log = ws.write_log("access.log", &[line]);

    // Act
    ws.importer().import_log_file(&log).unwrap();

    // Assert
    let stats = ws.stats("2024-01-01").expect("local date");
    assert_eq!(stats.ppl.cc["HR"].status["2xx"]["page"].hour[0], 1);
}

/// Stats stored under the day's name but for another date are never merged into.
#[test]
fn stats_for_another_date_abort_the_file() {
    // Arrange
    let ws = Workspace::new();
    let files = StatsFiles::in_dir(&ws.config.dirs.stats);
    save_day(&files, &StatsTree::new("2023-06-30")).unwrap();
    fs::rename(files.path_for("2023-06-30"), files.path_for("2024-01-01")).unwrap();
    let log = ws.write_log("access.log", &[LogLine::get("1.2.3.4", "01/Jan/2024", "/")]);

    // Act
    let err = ws.importer().import_log_file(&log).unwrap_err();

    // Assert
    match err {
        ImportError::DateMismatch {
            log_date,
            stats_date,
            ..
        } => {
            assert_eq!(log_date, "2024-01-01");
            assert_eq!(stats_date, "2023-06-30");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ws.stats("2024-01-01").unwrap().total.hit, 0);
}

/// A cache file that is not a mapping is reported and replaced.
#[test]
fn corrupt_cache_is_rebuilt() {
    // Arrange
    let ws = Workspace::new();
    fs::create_dir_all(&ws.config.dirs.cache).unwrap();
    fs::write(&ws.cache_files().identity, "[1, 2, 3]").unwrap();
    let log = ws.write_log("access.log", &[LogLine::get("1.2.3.4", "01/Jan/2024", "/")]);

    // Act
    ws.importer().import_log_file(&log).unwrap();

    // Assert
    let caches = ws.stored_caches();
    assert_eq!(caches.identity.cache().len(), 1);
}

/// One broken file does not stop the others.
#[test]
fn run_continues_past_failing_files() {
    // Arrange
    let ws = Workspace::new();
    let missing = ws.config.dirs.logs.join("missing.log");
    let garbage = ws.write_raw_log("garbage.log", "garbage\n");
    let good = ws.write_log("good.log", &[LogLine::get("1.2.3.4", "01/Jan/2024", "/")]);

    // Act
    let outcomes = ws.importer().import(&[missing, garbage, good]);

    // Assert
    assert!(matches!(outcomes[0].result, Err(ImportError::OpenLog { .. })));
    assert!(matches!(outcomes[1].result, Err(ImportError::FirstLineUnparsable { .. })));
    assert_eq!(outcomes[2].result.as_ref().unwrap().lines_read, 1);
}
