use integration_tests::harness::{LogLine, Workspace};
use logstat_core::hash::visitor_key;
use pretty_assertions::assert_eq;

fn many_visitors(count: usize) -> Vec<LogLine> {
    (0..count)
        .map(|i| {
            let ip = format!("10.0.{}.{}", i / 250, i % 250);
            let minute = i % 60;
            LogLine::get(&ip, "01/Jan/2024", "/")
                .at(&format!("01/Jan/2024:12:{minute:02}:00 +0000"))
                .ua(&format!("agent-{}", i % 40))
        })
        .collect()
}

/// Caches never exceed their caps once saved, however many keys a file has.
#[test]
fn saved_caches_respect_their_caps() {
    // Arrange
    let mut ws = Workspace::new();
    ws.config.limits.identity_cache = 50;
    ws.config.limits.client_cache = 10;
    ws.config.limits.retention_visitors = 20;
    ws.config.limits.trim_interval = 100;
    let log = ws.write_log("access.log", &many_visitors(600));

    // Act
    ws.importer().import_log_file(&log).unwrap();

    // Assert
    let caches = ws.stored_caches();
    assert_eq!(caches.identity.cache().len(), 50);
    assert_eq!(caches.clients.cache().len(), 10);
    assert_eq!(caches.retention.visitors_on("2024-01-01").unwrap().len(), 20);

    let stats = ws.stats("2024-01-01").unwrap();
    assert_eq!(stats.total.visitor, 600);
}

/// Cached lookups are not resolved again, across runs.
#[test]
fn lookups_are_memoized_between_runs() {
    // Arrange
    let ws = Workspace::new();
    let country_calls = ws.countries.calls();
    let client_calls = ws.clients.calls();
    let first = ws.write_log("2024-01-01.log", &[LogLine::get("1.2.3.4", "01/Jan/2024", "/")]);
    let second = ws.write_log("2024-01-02.log", &[LogLine::get("1.2.3.4", "02/Jan/2024", "/")]);

    // Act
    ws.importer().import_log_file(&first).unwrap();
    ws.importer().import_log_file(&second).unwrap();

    // Assert
    assert_eq!(country_calls.get(), 1);
    assert_eq!(client_calls.get(), 1);
    let seen = ws.stored_caches().identity.cache().get("1.2.3.4").unwrap().last_seen;
    assert_eq!(seen.to_string(), "2024-01-02 10:00:00");
}

/// Days that fall out of the trailing window leave the retention table.
#[test]
fn old_retention_days_are_pruned() {
    // Arrange
    let ws = Workspace::new();
    let old = ws.write_log("2024-01-01.log", &[LogLine::get("1.2.3.4", "01/Jan/2024", "/")]);
    let edge = ws.write_log("2024-01-04.log", &[LogLine::get("1.2.3.4", "04/Jan/2024", "/")]);
    let new = ws.write_log("2024-01-10.log", &[LogLine::get("1.2.3.4", "10/Jan/2024", "/")]);

    // Act
    ws.importer().import(&[old, edge, new]);

    // Assert
    let caches = ws.stored_caches();
    let days: Vec<&str> = caches.retention.table().keys().map(String::as_str).collect();
    assert_eq!(days, vec!["2024-01-04", "2024-01-10"]);
    assert_eq!(
        caches.retention.dates_with(&visitor_key("1.2.3.4", "X"), "/"),
        vec!["2024-01-04", "2024-01-10"]
    );
}
