//! Integration tests for `Duration` parsing, writing and normalization.

use cadence_core::Error;
use cadence_time::{Duration, TimeUnit};

#[test]
fn test_parse_examples() {
    let d = Duration::parse("P1Y2M10DT2H30M");
    assert!(d.is_valid());
    assert_eq!(
        (d.years(), d.months(), d.weeks(), d.days(), d.hours(), d.minutes(), d.seconds()),
        (1, 2, 0, 10, 2, 30, 0)
    );

    let d = Duration::parse("P20W");
    assert!(d.is_valid());
    assert_eq!(d.weeks(), 20);
    assert_eq!(d.get(TimeUnit::Weeks), 20);
}

#[test]
fn test_parse_keeps_literal_counts() {
    let d = Duration::parse("PT36H");
    assert_eq!((d.days(), d.hours()), (0, 36));
    assert_eq!(d.to_string(), "PT36H");
}

#[test]
fn test_unmatched_input_is_invalid_not_fatal() {
    for text in ["", "1Y", "P1Y2X", "hello", "P1D/"] {
        let d = Duration::parse(text);
        assert!(!d.is_valid(), "{text:?} should be invalid");
        assert!(d.is_zero());
        assert!(matches!(text.parse::<Duration>(), Err(Error::Parse(_))));
    }
}

#[test]
fn test_all_zero_is_well_formed_but_invalid() {
    let d: Duration = "P0D".parse().unwrap();
    assert!(d.is_well_formed());
    assert!(!d.is_valid());
    assert_eq!(d.to_string(), "PT0S");
}

#[test]
fn test_display_round_trips_source() {
    for text in ["P1Y2M10DT2H30M", "P20W", "P3Y", "PT1S", "P1MT1M", "P2W3D"] {
        assert_eq!(Duration::parse(text).to_string(), text);
    }
}

#[test]
fn test_weeks_fold_into_days_with_time() {
    let d = Duration::parse("P2W3DT1H");
    assert_eq!(d.to_string(), "P17DT1H");
    let canonical = d.to_canonical().unwrap();
    assert_eq!((canonical.weeks(), canonical.days()), (0, 17));
    assert_eq!(Duration::parse(&d.to_string()), canonical);
}

#[test]
fn test_equality_ignores_source() {
    assert_eq!(Duration::parse("P1D"), Duration::new(0, 0, 0, 1, 0, 0, 0));
    assert_ne!(Duration::parse("P7D"), Duration::parse("P1W"));
}

#[test]
fn test_setter_cascades() {
    let mut d = Duration::zero();
    d.set(TimeUnit::Seconds, 59.99).unwrap();
    assert_eq!(d.seconds(), 59);

    d.set(TimeUnit::Seconds, 86_461).unwrap();
    assert_eq!(
        (d.days(), d.hours(), d.minutes(), d.seconds()),
        (1, 0, 1, 1)
    );

    d.set(TimeUnit::Weeks, 60).unwrap();
    assert_eq!((d.years(), d.weeks()), (1, 8));
}

#[test]
fn test_setter_clears_source() {
    let mut d = Duration::parse("P1D");
    d.set(TimeUnit::Hours, 3u8).unwrap();
    assert_eq!(d.source(), None);
    assert_eq!(d.to_string(), "P1DT3H");
}

#[test]
fn test_setter_errors_leave_duration_unchanged() {
    let mut d = Duration::new(u32::MAX, 0, 0, 0, 0, 0, 0);
    assert!(matches!(d.set(TimeUnit::Months, 12), Err(Error::Domain(_))));
    assert_eq!((d.years(), d.months()), (u32::MAX, 0));

    assert!(matches!(d.set(TimeUnit::Minutes, 1e10), Err(Error::Domain(_))));
    assert!(matches!(d.set(TimeUnit::Minutes, -0.5), Err(Error::Domain(_))));
    assert!(matches!(d.set(TimeUnit::Minutes, f64::INFINITY), Err(Error::Domain(_))));
    assert_eq!(d.minutes(), 0);
}

#[test]
fn test_builder() {
    let d = Duration::builder()
        .years(1)
        .months(14)
        .hours(23.5)
        .minutes(75)
        .build()
        .unwrap();
    assert_eq!(
        (d.years(), d.months(), d.days(), d.hours(), d.minutes()),
        (2, 2, 1, 0, 15)
    );
    assert!(matches!(Duration::builder().seconds(-1).build(), Err(Error::Domain(_))));
}

#[test]
fn test_snapshot_json() {
    let json = serde_json::to_value(Duration::parse("P1Y2M10DT2H30M").snapshot()).unwrap();
    assert_eq!(json["source"], "P1Y2M10DT2H30M");
    assert_eq!(json["valid"], true);
    assert_eq!(json["years"], 1);
    assert_eq!(json["minutes"], 30);

    let json = serde_json::to_value(Duration::parse("nope").snapshot()).unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["days"], 0);
}
