//! Property tests: duration text round-trips and add/subtract inverses.

use cadence_time::{Calendar, DateIterator, Duration, Gregorian, Interval, Repetition, Timestamp};
use chrono::{DateTime, NaiveDate};
use proptest::prelude::*;

fn instant() -> impl Strategy<Value = Timestamp> {
    // 1900-01-01 .. 2100-01-01
    (-2_208_988_800i64..4_102_444_800).prop_map(|secs| {
        DateTime::from_timestamp(secs, 0).expect("in range")
    })
}

fn early_in_month() -> impl Strategy<Value = Timestamp> {
    (1900i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(y, m, d, h, mi, s)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|date| date.and_hms_opt(h, mi, s))
                .expect("valid civil date")
                .and_utc()
        },
    )
}

fn any_duration() -> impl Strategy<Value = Duration> {
    (0u32..100, 0u32..30, 0u32..60, 0u32..400, 0u32..48, 0u32..120, 0u32..120)
        .prop_map(|(y, mo, w, d, h, mi, s)| Duration::new(y, mo, w, d, h, mi, s))
}

fn flat_duration() -> impl Strategy<Value = Duration> {
    (0u32..60, 0u32..400, 0u32..48, 0u32..120, 0u32..120)
        .prop_filter("non-zero", |(w, d, h, mi, s)| w + d + h + mi + s > 0)
        .prop_map(|(w, d, h, mi, s)| Duration::new(0, 0, w, d, h, mi, s))
}

fn calendar_duration() -> impl Strategy<Value = Duration> {
    (0u32..50, 0u32..40)
        .prop_filter("non-zero", |(y, mo)| y + mo > 0)
        .prop_map(|(y, mo)| Duration::new(y, mo, 0, 0, 0, 0, 0))
}

proptest! {
    #[test]
    fn duration_text_round_trips(d in any_duration()) {
        let reparsed = Duration::parse(&d.to_string());
        prop_assert!(reparsed.is_well_formed());
        prop_assert_eq!(reparsed, d.to_canonical().unwrap());
    }

    #[test]
    fn flat_durations_invert(t in instant(), d in flat_duration()) {
        let cal = Gregorian::new();
        let there = cal.add_duration(t, &d).unwrap();
        prop_assert_eq!(cal.subtract_duration(there, &d).unwrap(), t);
    }

    #[test]
    fn calendar_durations_invert_early_in_month(t in early_in_month(), d in calendar_duration()) {
        let cal = Gregorian::new();
        let there = cal.add_duration(t, &d).unwrap();
        prop_assert_eq!(cal.subtract_duration(there, &d).unwrap(), t);
    }

    #[test]
    fn iterator_returns_to_origin(t in instant(), d in any_duration(), n in 0i64..40, m in 0i64..40) {
        prop_assume!(!d.is_zero());
        let interval = Interval::repeating(t, Repetition::Forever, d);
        let mut it = DateIterator::new(interval).unwrap();
        let there = it.advance(n).unwrap().date;
        it.recede(m).unwrap();
        prop_assert_eq!(it.advance(m).unwrap().date, there);
        let back = it.recede(n).unwrap();
        prop_assert!(back.in_bounds);
        prop_assert_eq!(back.date, t);
        prop_assert_eq!(it.iteration_count(), 0);
    }

    #[test]
    fn time_table_is_monotonic(t in instant(), d in any_duration(), n in 1u32..30) {
        prop_assume!(!d.is_zero());
        let interval = Interval::repeating(t, Repetition::Times(n), d);
        let table = interval.time_table().unwrap();
        prop_assert_eq!(table.len(), n as usize);
        prop_assert!(table[0] > t);
        prop_assert!(table.windows(2).all(|w| w[0] < w[1]));
    }
}
