use integration_tests::harness::{CapturedEvent, LogLine, Workspace, events, init_test_tracing};
use std::sync::Mutex;
use tracing::Level;

/// Tests in this binary share one global subscriber; run them one at a time.
static SERIAL: Mutex<()> = Mutex::new(());

fn capture(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let events = events();
    init_test_tracing(events.clone());
    events.lock().unwrap().clear();

    f();

    let captured = events.lock().unwrap().clone();
    captured
}

/// Each imported file ends with one summary line at info level.
#[test]
fn file_summary_is_logged() {
    // Arrange
    let ws = Workspace::new();
    let body = [
        LogLine::get("1.2.3.4", "01/Jan/2024", "/").render(),
        "nope".to_string(),
    ]
    .join("\n");
    let log = ws.write_raw_log("access.log", &body);

    // Act
    let events = capture(|| {
        ws.importer().import_log_file(&log).unwrap();
    });

    // Assert
    let summary = events
        .iter()
        .find(|e| e.message.starts_with("lines read:"))
        .expect("summary event");
    assert_eq!(summary.level, Level::INFO);
    assert_eq!(
        summary.message,
        "lines read: 1/2. skipped head: 0. skipped tail: 1. other dates: 0"
    );
    assert!(summary.field("path").unwrap().ends_with("access.log"));
}

/// Failing files are reported at error level with the cause.
#[test]
fn failed_file_is_logged_as_error() {
    // Arrange
    let ws = Workspace::new();
    let missing = ws.config.dirs.logs.join("missing.log");

    // Act
    let events = capture(|| {
        ws.importer().import(&[missing]);
    });

    // Assert
    let failure = events
        .iter()
        .find(|e| e.level == Level::ERROR)
        .expect("error event");
    assert_eq!(failure.message, "import failed");
    assert!(failure.field("error").unwrap().contains("could not open the log file"));
}
