//! Unit tests for elapsed time keys.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use wattmerge::fusion::elapsed::{elapsed_time, format_hms, log_key};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_milli_opt(10, 0, 0, 123)
        .unwrap()
}

#[test]
fn test_format_hms() {
    assert_eq!(format_hms(0), "0:00:00");
    assert_eq!(format_hms(5), "0:00:05");
    assert_eq!(format_hms(65), "0:01:05");
    assert_eq!(format_hms(3599), "0:59:59");
    assert_eq!(format_hms(3600), "1:00:00");
    assert_eq!(format_hms(-1), "-0:00:01");
}

#[test]
fn test_key_for_each_second_of_first_minute() {
    for s in 1..60 {
        let elapsed = elapsed_time(start(), start() + Duration::seconds(s));
        assert_eq!(elapsed.key, Some(format!("00:{:02}", s)));
    }
}

#[test]
fn test_key_past_one_hour() {
    let elapsed = elapsed_time(start(), start() + Duration::seconds(2 * 3600 + 5));

    assert_eq!(elapsed.text, "2:00:05");
    assert_eq!(elapsed.key.as_deref(), Some("120:05"));
}

#[test]
fn test_truncates_not_rounds() {
    let elapsed = elapsed_time(start(), start() + Duration::milliseconds(1_999));

    assert_eq!(elapsed.key.as_deref(), Some("00:01"));
}

#[test]
fn test_log_key_matches_two_step_derivation() {
    assert_eq!(log_key("0:00:05").as_deref(), Some("00:05"));
    assert_eq!(log_key("1:30:00").as_deref(), Some("90:00"));
    assert_eq!(log_key("-0:00:05"), None);
}
