use crate::cache::RetentionTracker;
use chrono::NaiveDate;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn first_view_of_a_page_is_new() {
    // Arrange
    let mut tracker = RetentionTracker::new(7, 5000);

    // Act
    let first = tracker.mark_page("2024-01-01", "v1", "/about");
    let again = tracker.mark_page("2024-01-01", "v1", "/about");
    let other_page = tracker.mark_page("2024-01-01", "v1", "/contact");
    let other_day = tracker.mark_page("2024-01-02", "v1", "/about");

    // Assert
    assert!(first);
    assert!(!again);
    assert!(other_page);
    assert!(other_day);

    let visitors = tracker.visitors_on("2024-01-01").unwrap();
    assert_eq!(visitors["v1"].pages, 2);
}

#[test]
fn dates_with_covers_every_held_day() {
    // Arrange
    let mut tracker = RetentionTracker::new(7, 5000);
    tracker.mark_page("2024-01-01", "v1", "/about");
    tracker.mark_page("2024-01-03", "v1", "/about");
    tracker.mark_page("2024-01-03", "v2", "/blog");

    // Act & Assert
    assert_eq!(tracker.dates_with("v1", "/about"), vec!["2024-01-01", "2024-01-03"]);
    assert_eq!(tracker.dates_with("v2", "/blog"), vec!["2024-01-03"]);
    assert!(tracker.dates_with("v2", "/about").is_empty());
}

#[test]
fn trim_drops_days_outside_the_window() {
    // Arrange
    let mut tracker = RetentionTracker::new(7, 5000);
    for date in ["2023-12-31", "2024-01-01", "2024-01-02", "2024-01-07", "2024-01-09"] {
        tracker.mark_page(date, "v", "/");
    }

    // Act
    tracker.trim(day("2024-01-07"));

    // Assert
    let dates: Vec<&str> = tracker.table().keys().map(String::as_str).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-07", "2024-01-09"]);
    assert_eq!(tracker.cutoff(day("2024-01-07")), day("2024-01-01"));
}

#[test]
fn trim_keeps_most_active_visitors_per_day() {
    // Arrange
    let mut tracker = RetentionTracker::new(7, 2);
    tracker.mark_page("2024-01-01", "light", "/a");
    for url in ["/a", "/b", "/c"] {
        tracker.mark_page("2024-01-01", "heavy", url);
    }
    for url in ["/a", "/b"] {
        tracker.mark_page("2024-01-01", "medium", url);
    }

    // Act
    let evicted = tracker.trim(day("2024-01-01"));

    // Assert
    assert_eq!(evicted, 1);
    let visitors = tracker.visitors_on("2024-01-01").unwrap();
    assert_eq!(visitors.len(), 2);
    assert!(visitors.contains_key("heavy"));
    assert!(visitors.contains_key("medium"));
}

#[test]
fn per_day_cap_holds_for_large_days() {
    let mut tracker = RetentionTracker::new(7, 5000);
    for i in 0..6_000 {
        tracker.mark_page("2024-01-01", &format!("v{i}"), "/");
    }

    tracker.trim(day("2024-01-01"));

    assert_eq!(tracker.visitors_on("2024-01-01").unwrap().len(), 5000);
}

#[test]
fn trimming_an_untouched_table_keeps_it_clean() {
    let mut tracker = RetentionTracker::new(7, 5000);

    assert_eq!(tracker.trim_if_grown(day("2024-01-01")), 0);
    assert_eq!(tracker.trim(day("2024-01-01")), 0);
    assert!(!tracker.is_dirty());
}
