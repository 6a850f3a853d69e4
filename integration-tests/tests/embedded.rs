use integration_tests::harness::{LogLine, Workspace};
use logstat_core::cli::import_embedded;
use logstat_core::logging::Verbosity;

/// Embedded runs collect their messages instead of printing them.
#[test]
fn embedded_import_collects_messages() {
    // Arrange
    let mut ws = Workspace::new();
    ws.config.verbosity = Verbosity::Info;
    let log = ws.write_log("access.log", &[LogLine::get("1.2.3.4", "01/Jan/2024", "/")]);

    // Act
    let run = import_embedded(&ws.config, &[log]).expect("embedded import");

    // Assert
    assert_eq!(run.outcomes.len(), 1);
    assert!(run.outcomes[0].result.is_ok());
    assert!(
        run.messages.iter().any(|m| m.starts_with("reading log")),
        "{:?}",
        run.messages
    );
    assert!(
        run.messages.iter().any(|m| m.starts_with("lines read: 1/1")),
        "{:?}",
        run.messages
    );
    assert!(ws.stats("2024-01-01").is_some());
}

/// A host process can embed the importer more than once.
#[test]
fn repeated_embedded_imports_each_collect_their_own_messages() {
    // Arrange
    let ws = Workspace::new();
    let first = ws.write_log("first.log", &[LogLine::get("1.2.3.4", "01/Jan/2024", "/")]);
    let second = ws.write_log("second.log", &[LogLine::get("1.2.3.4", "02/Jan/2024", "/")]);

    // Act
    let one = import_embedded(&ws.config, &[first]).expect("first embedded import");
    let two = import_embedded(&ws.config, &[second]).expect("second embedded import");

    // Assert
    assert!(one.outcomes[0].result.is_ok());
    assert!(two.outcomes[0].result.is_ok());
    assert_eq!(
        one.messages.iter().filter(|m| m.starts_with("lines read: 1/1")).count(),
        1,
        "{:?}",
        one.messages
    );
    assert_eq!(
        two.messages.iter().filter(|m| m.starts_with("lines read: 1/1")).count(),
        1,
        "{:?}",
        two.messages
    );
    assert!(ws.stats("2024-01-01").is_some());
    assert!(ws.stats("2024-01-02").is_some());
}
