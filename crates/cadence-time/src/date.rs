//! Civil-date helpers on the UTC timeline.
//!
//! Month and year shifts here follow rollover semantics: the offset of a
//! timestamp from the first of its month is preserved, so a day that does
//! not exist in the target month spills into the next one
//! (`2018-01-31 + 1 month = 2018-03-03`, `2016-02-29 + 1 year = 2017-03-01`).

use cadence_core::errors::{Error, Result};
use cadence_core::utilities::data_parsers::DateTimeParts;
use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, TimeDelta, Utc};

use crate::Timestamp;

/// Whether a given year is a leap year in the proleptic Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a given month (1–12) of a given year.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    debug_assert!((1..=12).contains(&month));
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// Midnight UTC on the given calendar day, if that day exists.
pub fn midnight(year: i32, month: u32, day: u32) -> Option<Timestamp> {
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

/// Midnight UTC on the first day of the month containing `date`.
pub fn first_of_month(date: Timestamp) -> Result<Timestamp> {
    midnight(date.year(), date.month(), 1)
        .ok_or_else(|| Error::Date(format!("no first-of-month for {date}")))
}

/// Shift `date` by a signed number of calendar months.
///
/// The whole-year part of `months` moves the year; the 0–11 remainder sets
/// the month, borrowing from or carrying into the year when it crosses
/// January or December.  The time elapsed since the first of the original
/// month is then re-applied, which is what makes short months overflow.
pub fn shift_months(date: Timestamp, months: i64) -> Result<Timestamp> {
    if months == 0 {
        return Ok(date);
    }
    let out_of_range = || Error::Date(format!("shifting {date} by {months} month(s) is out of range"));

    let first = first_of_month(date)?;
    let offset = date - first;
    let total = i64::from(date.year())
        .checked_mul(12)
        .and_then(|m| m.checked_add(i64::from(date.month0())))
        .and_then(|m| m.checked_add(months))
        .ok_or_else(out_of_range)?;
    let year = i32::try_from(total.div_euclid(12)).map_err(|_| out_of_range())?;
    let month = total.rem_euclid(12) as u32 + 1;

    midnight(year, month, 1)
        .and_then(|target| target.checked_add_signed(offset))
        .ok_or_else(out_of_range)
}

/// One end of a leap-year range: a bare year or an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearBound {
    /// A calendar year; as an instant it means January 1 at midnight.
    Year(i32),
    /// A specific instant.
    Instant(Timestamp),
}

impl YearBound {
    fn instant(self) -> Option<Timestamp> {
        match self {
            YearBound::Year(year) => midnight(year, 1, 1),
            YearBound::Instant(ts) => Some(ts),
        }
    }
}

impl From<i32> for YearBound {
    fn from(year: i32) -> Self {
        YearBound::Year(year)
    }
}

impl From<DateTime<Utc>> for YearBound {
    fn from(ts: DateTime<Utc>) -> Self {
        YearBound::Instant(ts)
    }
}

/// The leap years between `begin` and `end`, inclusive.
///
/// With two bare years this is a plain range filter.  As soon as one bound
/// is an instant, the range is day-sensitive (unless `day_sensitive` is
/// `false`): the first year is dropped when `begin` is on or after its
/// March 1 (its leap day is already behind), and the last year is dropped
/// when `end` is on or before its February 28, 23:59:59 (its leap day has
/// not happened yet).  An inverted range yields no years.
pub fn leap_years(
    begin: impl Into<YearBound>,
    end: impl Into<YearBound>,
    day_sensitive: bool,
) -> Vec<i32> {
    let (first, last) = match (begin.into(), end.into()) {
        (YearBound::Year(b), YearBound::Year(e)) => (b, e),
        (b, e) => {
            let (Some(b), Some(e)) = (b.instant(), e.instant()) else {
                return Vec::new();
            };
            if b > e {
                tracing::debug!(begin = %b, end = %e, "leap-year range is inverted");
                return Vec::new();
            }
            let mut first = b.year();
            let mut last = e.year();
            if day_sensitive {
                if midnight(first, 3, 1).is_some_and(|march| b >= march) {
                    first += 1;
                }
                let feb_28 = midnight(last, 2, 28)
                    .and_then(|d| d.checked_add_signed(TimeDelta::seconds(86_399)));
                if feb_28.is_some_and(|cutoff| e <= cutoff) {
                    last -= 1;
                }
            }
            (first, last)
        }
    };
    (first..=last).filter(|y| is_leap_year(*y)).collect()
}

/// Turn scanned date-time parts into a UTC timestamp.
///
/// When `parts` is abbreviated (no year), its missing leading components
/// are taken from `reference`: the year, then the month, then the day, and,
/// when no time of day was written at all, the whole time of day.  Missing
/// trailing components default to the start of their range.  A value
/// without a zone designator inherits the reference's zone, or is UTC.
pub fn timestamp_from_parts(
    parts: &DateTimeParts,
    reference: Option<&DateTimeParts>,
) -> Result<Timestamp> {
    let reference = reference.copied().unwrap_or_default();
    let abbreviated = parts.year.is_none();

    let (year, month, day) = if !abbreviated {
        (parts.year, parts.month, parts.day)
    } else if parts.month.is_some() {
        (reference.year, parts.month, parts.day)
    } else if parts.day.is_some() {
        (reference.year, reference.month, parts.day)
    } else {
        (reference.year, reference.month, reference.day)
    };
    let year = year.ok_or_else(|| {
        Error::MissingArgument("date-time has no year and no reference date to take it from".into())
    })?;
    let month = month.unwrap_or(1);
    let day = day.unwrap_or(1);

    let clock = if abbreviated && !parts.has_time() {
        &reference
    } else {
        parts
    };
    let hour = clock.hour.unwrap_or(0);
    let minute = clock.minute.unwrap_or(0);
    let second = clock.second.unwrap_or(0);
    let nanosecond = clock.nanosecond;

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_nano_opt(hour, minute, second, nanosecond))
        .ok_or_else(|| {
            Error::Date(format!(
                "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02} is not a calendar date-time"
            ))
        })?;
    let offset = parts.zone.or(reference.zone).map_or(0, |z| z.offset_seconds());
    naive
        .and_utc()
        .checked_sub_signed(TimeDelta::seconds(i64::from(offset)))
        .ok_or_else(|| Error::Date(format!("{naive} with offset {offset}s is out of range")))
}

/// Format a timestamp in ISO-8601 extended form with a `Z` designator,
/// printing fractional seconds only when present.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
