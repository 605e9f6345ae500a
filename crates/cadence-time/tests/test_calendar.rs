//! Integration tests for duration arithmetic through the `Calendar` trait.

use cadence_core::Error;
use cadence_time::{Calendar, Duration, Gregorian, LeapCompensated, Timestamp, YearBound};

fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

fn dur(s: &str) -> Duration {
    Duration::parse(s)
}

// ───────────────────────── month and year overflow ─────────────────────────

#[test]
fn test_month_end_overflows_into_next_month() {
    let cal = Gregorian::new();
    assert_eq!(
        cal.add_duration(ts("2018-01-31T00:00:00Z"), &dur("P1M")).unwrap(),
        ts("2018-03-03T00:00:00Z")
    );
    assert_eq!(
        cal.add_duration(ts("2019-08-31T08:00:00Z"), &dur("P1M")).unwrap(),
        ts("2019-10-01T08:00:00Z")
    );
}

#[test]
fn test_leap_day_plus_year_rolls_to_march() {
    let cal = Gregorian::new();
    assert_eq!(
        cal.add_duration(ts("2016-02-29T12:00:00Z"), &dur("P1Y")).unwrap(),
        ts("2017-03-01T12:00:00Z")
    );
    assert_eq!(
        cal.add_years(ts("2016-02-29T00:00:00Z"), -1).unwrap(),
        ts("2015-03-01T00:00:00Z")
    );
    assert_eq!(
        cal.add_years(ts("2016-02-29T00:00:00Z"), 4).unwrap(),
        ts("2020-02-29T00:00:00Z")
    );
}

#[test]
fn test_add_months_crosses_years() {
    let cal = Gregorian::new();
    assert_eq!(
        cal.add_months(ts("2019-12-15T00:00:00Z"), 3).unwrap(),
        ts("2020-03-15T00:00:00Z")
    );
    assert_eq!(
        cal.add_months(ts("2019-01-15T00:00:00Z"), -13).unwrap(),
        ts("2017-12-15T00:00:00Z")
    );
    assert_eq!(
        cal.add_duration(ts("2019-01-15T00:00:00Z"), &dur("P25M")).unwrap(),
        ts("2021-02-15T00:00:00Z")
    );
}

// ───────────────────────── flat spans ─────────────────────────

#[test]
fn test_flat_span_counts_leap_day() {
    let cal = Gregorian::new();
    assert_eq!(
        cal.add_duration(ts("2016-01-01T00:00:00Z"), &dur("P366D")).unwrap(),
        ts("2017-01-01T00:00:00Z")
    );
    assert_eq!(
        cal.add_duration(ts("2020-02-25T12:00:00Z"), &dur("P1W")).unwrap(),
        ts("2020-03-03T12:00:00Z")
    );
    assert_eq!(
        cal.subtract_duration(ts("2008-03-01T00:00:00Z"), &dur("P1D")).unwrap(),
        ts("2008-02-29T00:00:00Z")
    );
}

#[test]
fn test_time_components() {
    let cal = Gregorian::new();
    assert_eq!(
        cal.add_duration(ts("2020-12-31T23:59:30Z"), &dur("PT45S")).unwrap(),
        ts("2021-01-01T00:00:15Z")
    );
    assert_eq!(
        cal.add_duration(ts("2020-01-01T00:00:00Z"), &dur("PT36H")).unwrap(),
        ts("2020-01-02T12:00:00Z")
    );
}

// ───────────────────────── full durations ─────────────────────────

#[test]
fn test_add_then_subtract_full_duration() {
    let cal = Gregorian::new();
    let d = dur("P1Y2M10DT2H30M");
    let start = ts("2007-03-01T13:00:00Z");
    let end = cal.add_duration(start, &d).unwrap();
    assert_eq!(end, ts("2008-05-11T15:30:00Z"));
    assert_eq!(cal.subtract_duration(end, &d).unwrap(), start);
}

#[test]
fn test_multiplier() {
    let cal = Gregorian::new();
    let d = dur("P1D");
    let t = ts("2020-01-01T00:00:00Z");
    assert_eq!(cal.apply(t, &d, 10, true).unwrap(), ts("2020-01-11T00:00:00Z"));
    assert_eq!(cal.apply(t, &d, 10, false).unwrap(), ts("2019-12-22T00:00:00Z"));
    assert_eq!(cal.apply(t, &d, -10, true).unwrap(), ts("2019-12-22T00:00:00Z"));
    assert_eq!(cal.apply(t, &d, 0, true).unwrap(), t);
}

#[test]
fn test_invalid_duration_rejected() {
    let cal = Gregorian::new();
    let t = ts("2020-01-01T00:00:00Z");
    assert!(matches!(cal.add_duration(t, &dur("P")), Err(Error::InvalidArgument(_))));
    assert!(matches!(cal.add_duration(t, &dur("P1X")), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_out_of_range_is_date_error() {
    let cal = Gregorian::new();
    let t = ts("2020-01-01T00:00:00Z");
    assert!(matches!(
        cal.apply(t, &dur("P100000Y"), 5, true),
        Err(Error::Date(_))
    ));
    assert!(matches!(
        cal.apply(t, &dur("P1D"), i64::MAX, true),
        Err(Error::Date(_))
    ));
}

// ───────────────────────── leap policies ─────────────────────────

#[test]
fn test_leap_compensated_adds_a_day_per_leap_year() {
    let cal = LeapCompensated::new();
    let d = dur("P366D");
    let shifted = cal.add_duration(ts("2016-01-01T00:00:00Z"), &d).unwrap();
    assert_eq!(shifted, ts("2017-01-02T00:00:00Z"));
    assert_eq!(cal.subtract_duration(shifted, &d).unwrap(), ts("2016-01-01T00:00:00Z"));
}

#[test]
fn test_leap_compensated_ignores_durations_without_days() {
    let cal = LeapCompensated::new();
    assert_eq!(
        cal.add_duration(ts("2016-01-01T00:00:00Z"), &dur("P1Y")).unwrap(),
        ts("2017-01-01T00:00:00Z")
    );
    assert_eq!(
        cal.add_duration(ts("2016-01-01T00:00:00Z"), &dur("PT48H")).unwrap(),
        ts("2016-01-03T00:00:00Z")
    );
}

#[test]
fn test_leap_compensated_outside_leap_window() {
    let cal = LeapCompensated::new();
    assert_eq!(
        cal.add_duration(ts("2017-03-01T00:00:00Z"), &dur("P10D")).unwrap(),
        ts("2017-03-11T00:00:00Z")
    );
}

#[test]
fn test_calendar_leap_years() {
    let cal = Gregorian::new();
    assert_eq!(cal.leap_years(2000.into(), 2010.into()), vec![2000, 2004, 2008]);
    assert_eq!(
        cal.leap_years(
            YearBound::Instant(ts("2000-03-01T00:00:00Z")),
            YearBound::Instant(ts("2008-02-28T23:59:59Z")),
        ),
        vec![2004]
    );
    assert_eq!(
        cal.leap_years(
            YearBound::Instant(ts("2000-02-29T23:59:59Z")),
            YearBound::Instant(ts("2008-02-29T00:00:00Z")),
        ),
        vec![2000, 2004, 2008]
    );
}

#[test]
fn test_names() {
    assert_eq!(Gregorian::new().name(), "Gregorian");
    assert_eq!(LeapCompensated::new().name(), "Leap-compensated");
}
