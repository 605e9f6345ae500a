//! `Duration`: seven calendar-unit counts parsed from and written as an
//! ISO-8601 duration (`P1Y2M10DT2H30M`, `P20W`).
//!
//! A `Duration` does no date arithmetic of its own; see
//! [`Calendar::apply`](crate::Calendar::apply).

use std::str::FromStr;

use cadence_core::errors::{Error, Result};
use cadence_core::utilities::data_parsers::parse_duration_string;
use chrono::TimeDelta;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::time_unit::TimeUnit;

/// A calendar duration.
///
/// Two durations compare equal when all seven counts match; the text they
/// were parsed from is not part of their identity.
#[derive(Clone, Default)]
pub struct Duration {
    source: Option<String>,
    matched: bool,
    years: u32,
    months: u32,
    weeks: u32,
    days: u32,
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl Duration {
    /// Parse an ISO-8601 duration.
    ///
    /// Parsing never fails: text outside the grammar gives an all-zero
    /// duration whose [`is_valid`](Self::is_valid) is `false`.  Counts are
    /// kept exactly as written (`PT90M` stays 90 minutes).
    pub fn parse(pattern: &str) -> Self {
        let fields = parse_duration_string(pattern);
        let f = fields.unwrap_or_default();
        Self {
            source: Some(pattern.to_owned()),
            matched: fields.is_some(),
            years: f.years,
            months: f.months,
            weeks: f.weeks,
            days: f.days,
            hours: f.hours,
            minutes: f.minutes,
            seconds: f.seconds,
        }
    }

    /// A duration with literal counts, no normalization applied.
    pub fn new(
        years: u32,
        months: u32,
        weeks: u32,
        days: u32,
        hours: u32,
        minutes: u32,
        seconds: u32,
    ) -> Self {
        Self {
            source: None,
            matched: true,
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// The zero duration (`PT0S`).  Well-formed, but not valid.
    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0, 0, 0, 0)
    }

    /// Start a normalizing builder; see [`Duration::set`].
    pub fn builder() -> DurationBuilder {
        DurationBuilder::default()
    }

    /// The exact span of a [`TimeDelta`], as days, hours, minutes and
    /// seconds.  The sign and any sub-second part are dropped.
    pub fn from_time_delta(delta: TimeDelta) -> Result<Self> {
        let total = delta.num_seconds().unsigned_abs();
        let days = u32::try_from(total / 86_400)
            .map_err(|_| Error::Domain(format!("{delta} is too long for a duration")))?;
        let rest = total % 86_400;
        Ok(Self::new(
            0,
            0,
            0,
            days,
            (rest / 3_600) as u32,
            (rest % 3_600 / 60) as u32,
            (rest % 60) as u32,
        ))
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The text this duration was parsed from, until a setter modifies it.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether the source text matched the duration grammar.  Always `true`
    /// for durations built in code.
    pub fn is_well_formed(&self) -> bool {
        self.matched
    }

    /// Years.
    pub fn years(&self) -> u32 {
        self.years
    }

    /// Months.
    pub fn months(&self) -> u32 {
        self.months
    }

    /// Weeks.
    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    /// Days.
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Hours.
    pub fn hours(&self) -> u32 {
        self.hours
    }

    /// Minutes.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Seconds.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// The count for `unit`.
    pub fn get(&self, unit: TimeUnit) -> u32 {
        match unit {
            TimeUnit::Years => self.years,
            TimeUnit::Months => self.months,
            TimeUnit::Weeks => self.weeks,
            TimeUnit::Days => self.days,
            TimeUnit::Hours => self.hours,
            TimeUnit::Minutes => self.minutes,
            TimeUnit::Seconds => self.seconds,
        }
    }

    fn slot_mut(&mut self, unit: TimeUnit) -> &mut u32 {
        match unit {
            TimeUnit::Years => &mut self.years,
            TimeUnit::Months => &mut self.months,
            TimeUnit::Weeks => &mut self.weeks,
            TimeUnit::Days => &mut self.days,
            TimeUnit::Hours => &mut self.hours,
            TimeUnit::Minutes => &mut self.minutes,
            TimeUnit::Seconds => &mut self.seconds,
        }
    }

    /// Set the count for `unit`.
    ///
    /// Fractional input is floored.  A value past the unit's natural range
    /// (months > 11, weeks > 51, hours > 23, minutes > 59, seconds > 59)
    /// keeps the remainder and carries the overflow into the next coarser
    /// unit, cascading as far as needed.  The duration stops reporting its
    /// source text afterwards.
    ///
    /// # Errors
    /// [`Error::Domain`] for negative, non-finite or unrepresentable values,
    /// or when a carry overflows the coarser unit.  On error the duration is
    /// left unchanged.
    pub fn set<T: ToPrimitive>(&mut self, unit: TimeUnit, value: T) -> Result<()> {
        let raw = value
            .to_f64()
            .ok_or_else(|| Error::Domain(format!("{unit} value is not a number")))?;
        if !raw.is_finite() || raw < 0.0 {
            return Err(Error::Domain(format!(
                "{unit} must be a non-negative number, got {raw}"
            )));
        }
        let floored = raw.floor();
        if floored > f64::from(u32::MAX) {
            return Err(Error::Domain(format!("{unit} value {floored} is too large")));
        }

        let mut next = self.clone();
        *next.slot_mut(unit) = 0;
        next.add_carrying(unit, floored as u64)?;
        next.source = None;
        *self = next;
        Ok(())
    }

    fn add_carrying(&mut self, unit: TimeUnit, amount: u64) -> Result<()> {
        let total = u64::from(self.get(unit)) + amount;
        match unit.carry() {
            Some((modulus, coarser)) => {
                let modulus = u64::from(modulus);
                *self.slot_mut(unit) = (total % modulus) as u32;
                let over = total / modulus;
                if over > 0 {
                    self.add_carrying(coarser, over)?;
                }
            }
            None => {
                *self.slot_mut(unit) = u32::try_from(total)
                    .map_err(|_| Error::Domain(format!("{unit} count {total} overflows")))?;
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// `true` when every count is zero.
    pub fn is_zero(&self) -> bool {
        TimeUnit::ALL.iter().all(|u| self.get(*u) == 0)
    }

    /// `true` when any of hours, minutes or seconds is non-zero.
    pub fn has_time(&self) -> bool {
        self.hours > 0 || self.minutes > 0 || self.seconds > 0
    }

    /// `true` when years or months are non-zero, i.e. the span depends on
    /// where in the calendar it is applied.
    pub fn has_calendar_units(&self) -> bool {
        self.years > 0 || self.months > 0
    }

    /// A duration is valid when its source matched the grammar and at least
    /// one count is non-zero.
    pub fn is_valid(&self) -> bool {
        if !self.matched {
            return false;
        }
        if self.is_zero() {
            tracing::warn!(duration = %self, "all periods of the duration are zero");
            return false;
        }
        if self.weeks > 51 {
            tracing::warn!(weeks = self.weeks, "duration has more than 51 weeks");
        }
        true
    }

    /// Well formed with at least one non-zero period.  Unlike
    /// [`is_valid`](Self::is_valid) this never logs.
    pub fn is_usable(&self) -> bool {
        self.matched && !self.is_zero()
    }

    /// Weeks, days, hours, minutes and seconds as a number of seconds.
    pub fn flat_seconds(&self) -> i64 {
        TimeUnit::ALL
            .iter()
            .filter_map(|u| u.fixed_seconds().map(|s| s * i64::from(self.get(*u))))
            .sum()
    }

    /// The form this duration is written in: weeks are folded into days
    /// whenever a time component is present.
    ///
    /// # Errors
    /// [`Error::Domain`] when the folded day count does not fit.
    pub fn to_canonical(&self) -> Result<Self> {
        let mut out = self.clone();
        if self.weeks > 0 && self.has_time() {
            out.days = u32::try_from(self.folded_days())
                .map_err(|_| Error::Domain(format!("{self:?} has too many days to fold weeks")))?;
            out.weeks = 0;
        }
        Ok(out)
    }

    fn folded_days(&self) -> u64 {
        u64::from(self.days) + 7 * u64::from(self.weeks)
    }

    /// A plain record of this duration.
    pub fn snapshot(&self) -> DurationSnapshot {
        DurationSnapshot {
            source: self.source.clone(),
            valid: self.matched && !self.is_zero(),
            years: self.years,
            months: self.months,
            weeks: self.weeks,
            days: self.days,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
        }
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        TimeUnit::ALL.iter().all(|u| self.get(*u) == other.get(*u))
    }
}

impl Eq for Duration {}

impl FromStr for Duration {
    type Err = Error;

    /// Strict parsing: text outside the grammar is an error.
    fn from_str(s: &str) -> Result<Self> {
        let d = Self::parse(s);
        if d.matched {
            Ok(d)
        } else {
            Err(Error::Parse(format!("'{s}' is not an ISO-8601 duration")))
        }
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        f.write_str("P")?;
        if self.years > 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months > 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.has_time() {
            let days = self.folded_days();
            if days > 0 {
                write!(f, "{days}D")?;
            }
            f.write_str("T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0 {
                write!(f, "{}S", self.seconds)?;
            }
        } else {
            if self.weeks > 0 {
                write!(f, "{}W", self.weeks)?;
            }
            if self.days > 0 {
                write!(f, "{}D", self.days)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.matched {
            write!(f, "Duration({self})")
        } else {
            write!(f, "Duration(invalid {:?})", self.source.as_deref().unwrap_or(""))
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Plain, serializable view of a [`Duration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSnapshot {
    /// Source text, if the duration was parsed and not modified since.
    pub source: Option<String>,
    /// Same as [`Duration::is_valid`].
    pub valid: bool,
    #[allow(missing_docs)]
    pub years: u32,
    #[allow(missing_docs)]
    pub months: u32,
    #[allow(missing_docs)]
    pub weeks: u32,
    #[allow(missing_docs)]
    pub days: u32,
    #[allow(missing_docs)]
    pub hours: u32,
    #[allow(missing_docs)]
    pub minutes: u32,
    #[allow(missing_docs)]
    pub seconds: u32,
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builder for [`Duration`] going through the normalizing setter.
///
/// Values are applied coarse to fine on [`build`](Self::build), so a carry
/// out of a finer unit adds to the coarser unit's own value.
#[derive(Debug, Clone, Default)]
pub struct DurationBuilder {
    values: [Option<f64>; 7],
    invalid: Option<TimeUnit>,
}

impl DurationBuilder {
    fn with<T: ToPrimitive>(mut self, unit: TimeUnit, value: T) -> Self {
        match value.to_f64() {
            Some(v) => self.values[unit as usize] = Some(v),
            None => self.invalid = self.invalid.or(Some(unit)),
        }
        self
    }

    /// Set years.
    pub fn years<T: ToPrimitive>(self, value: T) -> Self {
        self.with(TimeUnit::Years, value)
    }

    /// Set months.
    pub fn months<T: ToPrimitive>(self, value: T) -> Self {
        self.with(TimeUnit::Months, value)
    }

    /// Set weeks.
    pub fn weeks<T: ToPrimitive>(self, value: T) -> Self {
        self.with(TimeUnit::Weeks, value)
    }

    /// Set days.
    pub fn days<T: ToPrimitive>(self, value: T) -> Self {
        self.with(TimeUnit::Days, value)
    }

    /// Set hours.
    pub fn hours<T: ToPrimitive>(self, value: T) -> Self {
        self.with(TimeUnit::Hours, value)
    }

    /// Set minutes.
    pub fn minutes<T: ToPrimitive>(self, value: T) -> Self {
        self.with(TimeUnit::Minutes, value)
    }

    /// Set seconds.
    pub fn seconds<T: ToPrimitive>(self, value: T) -> Self {
        self.with(TimeUnit::Seconds, value)
    }

    /// Build the duration.
    ///
    /// # Errors
    /// The first error [`Duration::set`] reports.
    pub fn build(self) -> Result<Duration> {
        if let Some(unit) = self.invalid {
            return Err(Error::Domain(format!("{unit} value is not a number")));
        }
        let mut duration = Duration::zero();
        for unit in TimeUnit::ALL {
            if let Some(v) = self.values[unit as usize] {
                duration.set(unit, v)?;
            }
        }
        Ok(duration)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
