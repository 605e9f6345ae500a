//! `Calendar` trait: applies durations to timestamps.
//!
//! Every shift of a timestamp by a [`Duration`], whether by an
//! [`Interval`](crate::Interval) materializing its time table or a
//! [`DateIterator`](crate::DateIterator) moving its cursor, goes through
//! [`Calendar::apply`].  Implementations differ only in their leap-day
//! policy.

use cadence_core::errors::{Error, Result};
use cadence_core::Settings;
use chrono::TimeDelta;

use crate::date::{leap_years, shift_months, YearBound};
use crate::duration::Duration;
use crate::Timestamp;

/// Calendar arithmetic service.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Human-readable name (e.g. `"Gregorian"`).
    fn name(&self) -> &str;

    /// Limits used by intervals and iterators built on this calendar.
    fn settings(&self) -> &Settings;

    /// Extra whole days to add once a duration with a non-zero day count
    /// has moved a timestamp from `from` to `to`.
    fn leap_compensation(&self, from: Timestamp, to: Timestamp) -> i64;

    /// Apply `duration` to `date` `multiplier` times, forward when `add`
    /// is `true` and backward otherwise.
    ///
    /// Units are applied in a fixed order: whole years first, then the flat
    /// span of weeks, days, hours, minutes and seconds, then months, and
    /// finally, when the duration counts days, the leap compensation of
    /// this calendar.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `duration` is malformed or zero, and
    /// [`Error::Date`] if the result leaves the representable range.
    fn apply(
        &self,
        date: Timestamp,
        duration: &Duration,
        multiplier: i64,
        add: bool,
    ) -> Result<Timestamp> {
        if !duration.is_usable() {
            return Err(Error::InvalidArgument(format!(
                "cannot apply invalid duration {duration:?}"
            )));
        }
        let overflow = || Error::Date(format!("{date} shifted by {multiplier} x {duration} is out of range"));
        let factor = if add { multiplier } else { multiplier.checked_neg().ok_or_else(overflow)? };

        let mut out = date;
        if duration.years() > 0 {
            let years = i64::from(duration.years()).checked_mul(factor).ok_or_else(overflow)?;
            out = self.add_years(out, years)?;
        }
        let flat = duration.flat_seconds().checked_mul(factor).ok_or_else(overflow)?;
        if flat != 0 {
            out = TimeDelta::try_seconds(flat)
                .and_then(|delta| out.checked_add_signed(delta))
                .ok_or_else(overflow)?;
        }
        if duration.months() > 0 {
            let months = i64::from(duration.months()).checked_mul(factor).ok_or_else(overflow)?;
            out = self.add_months(out, months)?;
        }
        if duration.days() > 0 {
            let extra = self.leap_compensation(date, out);
            if extra != 0 {
                out = TimeDelta::try_days(extra)
                    .and_then(|delta| out.checked_add_signed(delta))
                    .ok_or_else(overflow)?;
            }
        }

        tracing::trace!(calendar = self.name(), from = %date, to = %out, %duration, multiplier, add, "applied duration");
        Ok(out)
    }

    /// `date + duration`.
    fn add_duration(&self, date: Timestamp, duration: &Duration) -> Result<Timestamp> {
        self.apply(date, duration, 1, true)
    }

    /// `date - duration`.
    fn subtract_duration(&self, date: Timestamp, duration: &Duration) -> Result<Timestamp> {
        self.apply(date, duration, 1, false)
    }

    /// Shift by whole years; a Feb 29 that lands in a common year rolls
    /// over to March 1.
    fn add_years(&self, date: Timestamp, years: i64) -> Result<Timestamp> {
        let months = years
            .checked_mul(12)
            .ok_or_else(|| Error::Date(format!("shifting {date} by {years} year(s) is out of range")))?;
        shift_months(date, months)
    }

    /// Shift by calendar months; see [`shift_months`].
    fn add_months(&self, date: Timestamp, months: i64) -> Result<Timestamp> {
        shift_months(date, months)
    }

    /// Leap years between two bounds, day-sensitive when either is an
    /// instant.
    fn leap_years(&self, begin: YearBound, end: YearBound) -> Vec<i32> {
        leap_years(begin, end, true)
    }
}

// ── Gregorian ─────────────────────────────────────────────────────────────────

/// Civil UTC arithmetic with no extra leap-day compensation: a flat day
/// span that crosses Feb 29 already counts it, so `P366D` from
/// 2016-01-01 lands on 2017-01-01.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gregorian {
    settings: Settings,
}

impl Gregorian {
    /// Calendar with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calendar with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }
}

impl Calendar for Gregorian {
    fn name(&self) -> &str {
        "Gregorian"
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn leap_compensation(&self, _from: Timestamp, _to: Timestamp) -> i64 {
        0
    }
}

// ── LeapCompensated ───────────────────────────────────────────────────────────

/// Adds one day for every leap year whose Feb 29 lies between the original
/// and the shifted timestamp (removes one when moving backward), so `P366D`
/// from 2016-01-01 lands on 2017-01-02.
///
/// This is the calendar [`Interval::parse`](crate::Interval::parse) and
/// [`Interval::repeating`](crate::Interval::repeating) use.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeapCompensated {
    settings: Settings,
}

impl LeapCompensated {
    /// Calendar with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calendar with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }
}

impl Calendar for LeapCompensated {
    fn name(&self) -> &str {
        "Leap-compensated"
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn leap_compensation(&self, from: Timestamp, to: Timestamp) -> i64 {
        if to >= from {
            self.leap_years(from.into(), to.into()).len() as i64
        } else {
            -(self.leap_years(to.into(), from.into()).len() as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn unit_order_years_flat_months() {
        let cal = Gregorian::new();
        let d = Duration::parse("P1Y2M10DT2H30M");
        assert_eq!(
            cal.add_duration(ts("2008-03-01T13:00:00Z"), &d).unwrap(),
            ts("2009-05-11T15:30:00Z")
        );
    }

    #[test]
    fn multiplier_scales_every_unit() {
        let cal = Gregorian::new();
        let d = Duration::parse("P1M1D");
        assert_eq!(
            cal.apply(ts("2020-01-10T00:00:00Z"), &d, 3, true).unwrap(),
            ts("2020-04-13T00:00:00Z")
        );
    }

    #[test]
    fn invalid_duration_is_rejected() {
        let cal = Gregorian::new();
        let err = cal.add_duration(ts("2020-01-10T00:00:00Z"), &Duration::zero());
        assert!(matches!(err, Err(Error::InvalidArgument(_))));
        let err = cal.add_duration(ts("2020-01-10T00:00:00Z"), &Duration::parse("garbage"));
        assert!(matches!(err, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn leap_compensation_policies() {
        let d = Duration::parse("P366D");
        let start = ts("2016-01-01T00:00:00Z");
        assert_eq!(Gregorian::new().add_duration(start, &d).unwrap(), ts("2017-01-01T00:00:00Z"));
        assert_eq!(
            LeapCompensated::new().add_duration(start, &d).unwrap(),
            ts("2017-01-02T00:00:00Z")
        );
    }

    #[test]
    fn overflow_is_an_error() {
        let cal = Gregorian::new();
        let d = Duration::parse("P1000Y");
        assert!(matches!(
            cal.apply(ts("2016-01-01T00:00:00Z"), &d, 1_000, true),
            Err(Error::Date(_))
        ));
    }
}
