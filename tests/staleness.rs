// tests/staleness.rs
use chrono::{Duration, NaiveDateTime};
use ub_airlog::staleness::{format_capture, parse_capture, should_refetch, StalenessGate};

fn at(s: &str) -> NaiveDateTime {
    parse_capture(s).unwrap()
}

#[test]
fn same_hour_within_window_is_fresh() {
    assert!(!should_refetch(Some("2024-01-26 14:30"), at("2024-01-26 14:45")));
}

#[test]
fn hour_change_refetches() {
    assert!(should_refetch(Some("2024-01-26 14:30"), at("2024-01-26 15:05")));
    assert!(should_refetch(Some("2024-01-26 14:59"), at("2024-01-26 15:00")));
}

#[test]
fn same_hour_on_another_day_refetches() {
    assert!(should_refetch(Some("2024-01-25 14:30"), at("2024-01-26 14:45")));
}

#[test]
fn missing_or_garbage_cursor_fails_open() {
    assert!(should_refetch(None, at("2024-01-26 14:45")));
    assert!(should_refetch(Some("not a time"), at("2024-01-26 14:45")));
    assert!(should_refetch(Some(""), at("2024-01-26 14:45")));
}

#[test]
fn custom_window() {
    let gate = StalenessGate::new(Duration::minutes(10));
    assert!(!gate.should_refetch(Some("2024-01-26 14:30"), at("2024-01-26 14:40")));
    assert!(gate.should_refetch(Some("2024-01-26 14:30"), at("2024-01-26 14:41")));
}

#[test]
fn capture_format_round_trips() {
    let t = at(" 2024-01-26 07:05 ");
    assert_eq!(format_capture(t), "2024-01-26 07:05");
}
