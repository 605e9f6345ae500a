//! `Interval`: an ISO-8601 (repeating) time interval.
//!
//! An interval is written as up to three `/`-separated segments: an
//! optional repeat designator (`R`, `R5`) followed by two of start,
//! duration and end, e.g. `R5/2008-03-01T13:00:00Z/P1Y2M10DT2H30M`.  It can
//! be materialized into a time table of occurrences, counted forward from
//! the start (ascending) or backward from the end (descending).  Occurrence
//! `k` is always the anchor shifted by `k` durations in one application, so
//! month-end overflow never accumulates from one occurrence to the next.

use std::sync::Arc;

use cadence_core::errors::{Error, Result};
use cadence_core::utilities::data_parsers::{
    parse_datetime_parts, parse_repeat_designator, DateTimeParts,
};
use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, LeapCompensated};
use crate::date::{format_timestamp, timestamp_from_parts};
use crate::duration::Duration;
use crate::Timestamp;

// ── Repetition ────────────────────────────────────────────────────────────────

/// How many times an interval recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repetition {
    /// No repeat designator (or `R0`): the interval itself, with no
    /// occurrences beyond its anchor.
    #[default]
    Once,
    /// `Rn`: exactly `n` occurrences.
    Times(u32),
    /// Bare `R`: recurs without end.
    Forever,
}

impl Repetition {
    /// The repetition count as written: `-1` unbounded, `0` non-repeating,
    /// `n` bounded.
    pub fn count(self) -> i64 {
        match self {
            Repetition::Once => 0,
            Repetition::Times(n) => i64::from(n),
            Repetition::Forever => -1,
        }
    }

    /// Number of occurrences, or `None` when unbounded.
    pub fn bound(self) -> Option<u32> {
        match self {
            Repetition::Once => Some(0),
            Repetition::Times(n) => Some(n),
            Repetition::Forever => None,
        }
    }

    /// `true` when a repeat designator is present.
    pub fn is_repeating(self) -> bool {
        !matches!(self, Repetition::Once)
    }
}

impl From<Option<u32>> for Repetition {
    fn from(designator: Option<u32>) -> Self {
        match designator {
            None => Repetition::Forever,
            Some(0) => Repetition::Once,
            Some(n) => Repetition::Times(n),
        }
    }
}

impl std::fmt::Display for Repetition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Repetition::Once => Ok(()),
            Repetition::Times(n) => write!(f, "R{n}"),
            Repetition::Forever => f.write_str("R"),
        }
    }
}

// ── Order ─────────────────────────────────────────────────────────────────────

/// Direction in which an interval recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Order {
    /// Forward in time from the start.
    Asc,
    /// Backward in time from the end.
    Desc,
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Asc => f.write_str("ASC"),
            Order::Desc => f.write_str("DESC"),
        }
    }
}

// ── Interval ──────────────────────────────────────────────────────────────────

/// A parsed ISO-8601 interval.
///
/// Parsing is lenient: malformed input still produces an `Interval`, and
/// the problem is reported by [`validate`](Self::validate).
#[derive(Debug, Clone)]
pub struct Interval {
    source: Option<String>,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    duration: Option<Duration>,
    repetition: Repetition,
    timezone: Option<String>,
    defect: Option<Error>,
    calendar: Arc<dyn Calendar>,
}

impl Interval {
    fn empty(calendar: Arc<dyn Calendar>) -> Self {
        Self {
            source: None,
            start: None,
            end: None,
            duration: None,
            repetition: Repetition::Once,
            timezone: None,
            defect: None,
            calendar,
        }
    }

    /// Parse an interval using the [`LeapCompensated`] calendar.
    pub fn parse(value: &str) -> Self {
        Self::parse_with_calendar(value, Arc::new(LeapCompensated::new()))
    }

    /// Parse an interval whose arithmetic goes through `calendar`.
    ///
    /// Duration segments become the duration.  The first date segment
    /// becomes the start unless a duration came before it; the next one is
    /// the end.  An abbreviated end (`15:30`, `14T17:00`, `03-14`) takes its
    /// missing leading components from the start.
    pub fn parse_with_calendar(value: &str, calendar: Arc<dyn Calendar>) -> Self {
        let mut interval = Self::empty(calendar);
        interval.source = Some(value.to_owned());
        let mut start_parts: Option<DateTimeParts> = None;

        for (i, segment) in value.split('/').enumerate() {
            if let Err(defect) = interval.absorb(i, segment, &mut start_parts) {
                tracing::debug!(interval = value, segment, error = %defect, "malformed interval segment");
                interval.defect = Some(defect);
                break;
            }
        }
        interval
    }

    fn absorb(
        &mut self,
        index: usize,
        segment: &str,
        start_parts: &mut Option<DateTimeParts>,
    ) -> Result<()> {
        if let Some(designator) = parse_repeat_designator(segment) {
            if index != 0 {
                return Err(Error::Parse(format!(
                    "repeat designator '{segment}' must be the first segment"
                )));
            }
            self.repetition = designator.into();
            return Ok(());
        }

        if segment.starts_with(['P', 'p']) {
            let duration: Duration = segment.parse()?;
            if self.duration.is_some() {
                return Err(Error::Domain("interval has more than one duration".into()));
            }
            self.duration = Some(duration);
            return Ok(());
        }

        let parts = parse_datetime_parts(segment)
            .ok_or_else(|| Error::Parse(format!("'{segment}' is not an ISO-8601 date-time")))?;
        if self.duration.is_none() && start_parts.is_none() {
            self.start = Some(timestamp_from_parts(&parts, None)?);
            *start_parts = Some(parts);
        } else if self.end.is_none() {
            self.end = Some(timestamp_from_parts(&parts, start_parts.as_ref())?);
        } else {
            return Err(Error::Domain("interval has more than two dates".into()));
        }
        if self.timezone.is_none() {
            self.timezone = parts.zone.map(|z| z.designator());
        }
        Ok(())
    }

    /// A repeating interval anchored at `start`.
    pub fn repeating(start: Timestamp, repetition: Repetition, duration: Duration) -> Self {
        let mut interval = Self::empty(Arc::new(LeapCompensated::new()));
        interval.start = Some(start);
        interval.duration = Some(duration);
        interval.repetition = repetition;
        interval.timezone = Some("Z".into());
        interval
    }

    /// Replace the calendar used for arithmetic.
    pub fn with_calendar(mut self, calendar: Arc<dyn Calendar>) -> Self {
        self.calendar = calendar;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The text this interval was parsed from.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Start instant, if known.
    pub fn start(&self) -> Option<Timestamp> {
        self.start
    }

    /// End instant, if known.
    pub fn end(&self) -> Option<Timestamp> {
        self.end
    }

    /// Explicit duration, if one was given.
    pub fn duration(&self) -> Option<&Duration> {
        self.duration.as_ref()
    }

    /// Repetition.
    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    /// Zone designator of the first date as written (`Z`, `+01:00`).
    /// Informational only; all arithmetic is in UTC.
    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    /// The calendar this interval's arithmetic goes through.
    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        &self.calendar
    }

    /// Set or clear the start.
    pub fn set_start(&mut self, start: Option<Timestamp>) {
        self.start = start;
    }

    /// Set or clear the end.
    pub fn set_end(&mut self, end: Option<Timestamp>) {
        self.end = end;
    }

    /// Set or clear the duration.
    pub fn set_duration(&mut self, duration: Option<Duration>) {
        self.duration = duration;
    }

    /// Set the repetition.
    pub fn set_repetition(&mut self, repetition: Repetition) {
        self.repetition = repetition;
    }

    /// Set the informational zone designator.
    pub fn set_timezone(&mut self, timezone: Option<String>) {
        self.timezone = timezone;
    }

    // ── Validity ──────────────────────────────────────────────────────────────

    /// Check that the interval describes something that can recur.
    ///
    /// # Errors
    /// * The parse error, if the source text or the duration is malformed.
    /// * [`Error::Domain`] when start, end and duration are all present,
    ///   when start and end are the same instant, or when every period of
    ///   the duration is zero.
    /// * [`Error::MissingArgument`] when there is neither a start nor an
    ///   end, or only one of them without a duration.
    pub fn validate(&self) -> Result<()> {
        if let Some(defect) = &self.defect {
            return Err(defect.clone());
        }
        match (self.start, self.end, &self.duration) {
            (Some(_), Some(_), Some(_)) => Err(Error::Domain(
                "interval has a start, an end and a duration; at most two may be given".into(),
            )),
            (Some(s), Some(e), None) if s == e => Err(Error::Domain(
                "interval start and end are the same instant".into(),
            )),
            (None, None, _) => Err(Error::MissingArgument(
                "interval has neither a start nor an end".into(),
            )),
            (_, _, Some(d)) if !d.is_well_formed() => Err(Error::Parse(format!(
                "interval duration {d:?} is malformed"
            ))),
            (_, _, Some(d)) if d.is_zero() => Err(Error::Domain(
                "all periods of the interval's duration are zero".into(),
            )),
            (Some(_), None, None) | (None, Some(_), None) => Err(Error::MissingArgument(
                "interval needs a duration or a second date".into(),
            )),
            _ => Ok(()),
        }
    }

    /// `true` when [`validate`](Self::validate) succeeds; logs a warning
    /// otherwise.
    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(interval = %self, error = %e, "invalid interval");
                false
            }
        }
    }

    // ── Derived values ────────────────────────────────────────────────────────

    /// `Asc` when the start precedes the end or only the start is known,
    /// `Desc` otherwise.
    pub fn order(&self) -> Order {
        match (self.start, self.end) {
            (Some(s), Some(e)) if s < e => Order::Asc,
            (Some(_), Some(_)) => Order::Desc,
            (Some(_), None) => Order::Asc,
            (None, _) => Order::Desc,
        }
    }

    /// Where recurrence starts: the start when ascending, the end when
    /// descending.
    pub fn anchor(&self) -> Option<Timestamp> {
        match self.order() {
            Order::Asc => self.start,
            Order::Desc => self.end,
        }
    }

    /// The step of each recurrence: the explicit duration, or the exact
    /// span between start and end.
    pub fn effective_duration(&self) -> Result<Duration> {
        if let Some(d) = &self.duration {
            return Ok(d.clone());
        }
        match (self.start, self.end) {
            (Some(s), Some(e)) => Duration::from_time_delta(e - s),
            _ => Err(Error::MissingArgument(
                "interval has no duration and not both dates".into(),
            )),
        }
    }

    /// The start, or `end - duration` when only the end is known.
    pub fn resolved_start(&self) -> Result<Timestamp> {
        match (self.start, self.end, &self.duration) {
            (Some(s), _, _) => Ok(s),
            (None, Some(e), Some(d)) => self.calendar.subtract_duration(e, d),
            _ => Err(Error::MissingArgument(
                "cannot resolve the start of an interval without an end and a duration".into(),
            )),
        }
    }

    /// The end, or `start + duration` when only the start is known.
    pub fn resolved_end(&self) -> Result<Timestamp> {
        match (self.start, self.end, &self.duration) {
            (_, Some(e), _) => Ok(e),
            (Some(s), None, Some(d)) => self.calendar.add_duration(s, d),
            _ => Err(Error::MissingArgument(
                "cannot resolve the end of an interval without a start and a duration".into(),
            )),
        }
    }

    /// The date `k` occurrences away from `base`: in this interval's
    /// direction for positive `k`, against it for negative `k`.
    ///
    /// With an explicit duration this is a single
    /// [`Calendar::apply`] with multiplier `|k|`; a start/end interval
    /// without one moves by `|k|` exact spans.
    ///
    /// # Errors
    /// [`Error::MissingArgument`] when there is no step to recur by, and
    /// [`Error::Date`] when the result is out of range.
    pub fn shift(&self, base: Timestamp, k: i64) -> Result<Timestamp> {
        if k == 0 {
            return Ok(base);
        }
        let overflow = || Error::Date(format!("{base} shifted by {k} occurrence(s) is out of range"));
        let add = (self.order() == Order::Asc) == (k > 0);
        let times = k.checked_abs().ok_or_else(overflow)?;

        match (&self.duration, self.start, self.end) {
            (Some(d), _, _) => self.calendar.apply(base, d, times, add),
            (None, Some(s), Some(e)) => {
                let span = if e >= s { e - s } else { s - e };
                let offset = i32::try_from(times)
                    .ok()
                    .and_then(|n| span.checked_mul(n))
                    .ok_or_else(overflow)?;
                if add {
                    base.checked_add_signed(offset)
                } else {
                    base.checked_sub_signed(offset)
                }
                .ok_or_else(overflow)
            }
            _ => Err(Error::MissingArgument(
                "interval has no duration and not both dates".into(),
            )),
        }
    }

    /// Validate, then check the duration once before it is applied
    /// repeatedly.
    pub(crate) fn check_recurrence(&self) -> Result<()> {
        self.validate()?;
        match &self.duration {
            Some(d) if !d.is_valid() => Err(Error::InvalidArgument(format!(
                "cannot recur by invalid duration {d:?}"
            ))),
            _ => Ok(()),
        }
    }

    fn origin(&self) -> Result<Timestamp> {
        self.check_recurrence()?;
        self.anchor()
            .ok_or_else(|| Error::MissingArgument("interval has no anchor to recur from".into()))
    }

    /// The last occurrence of a bounded interval; `None` when unbounded.
    ///
    /// A non-repeating interval has no occurrences, so its last date is
    /// the anchor.
    pub fn last_date(&self) -> Result<Option<Timestamp>> {
        let Some(n) = self.repetition.bound() else {
            return Ok(None);
        };
        let anchor = self.origin()?;
        self.shift(anchor, i64::from(n)).map(Some)
    }

    /// Materialize the occurrences of this interval, anchor excluded.
    ///
    /// A bounded interval yields exactly its repetition count (none when
    /// it does not repeat); an unbounded one yields `max` dates.
    ///
    /// # Errors
    /// [`Error::LimitExceeded`] when more dates than the calendar's
    /// `max_time_table_len` would be produced, plus any
    /// [`validate`](Self::validate) or arithmetic error.
    pub fn to_time_table(&self, max: usize) -> Result<Vec<Timestamp>> {
        let settings = self.calendar.settings();
        let len = match self.repetition.bound() {
            Some(n) => n as usize,
            None => {
                if max > settings.default_time_table_len() {
                    tracing::warn!(
                        requested = max,
                        recommended = settings.default_time_table_len(),
                        "time table larger than recommended"
                    );
                }
                max
            }
        };
        if len > settings.max_time_table_len() {
            return Err(Error::LimitExceeded {
                requested: len,
                limit: settings.max_time_table_len(),
            });
        }

        let anchor = self.origin()?;
        (1..=len as i64).map(|k| self.shift(anchor, k)).collect()
    }

    /// [`to_time_table`](Self::to_time_table) capped at the calendar's
    /// default length.
    pub fn time_table(&self) -> Result<Vec<Timestamp>> {
        self.to_time_table(self.calendar.settings().default_time_table_len())
    }

    /// A plain record of this interval.
    pub fn snapshot(&self) -> IntervalSnapshot {
        let counts = self.duration.clone().unwrap_or_else(Duration::zero);
        IntervalSnapshot {
            source: self.to_string(),
            duration: self.duration.as_ref().map(ToString::to_string),
            years: counts.years(),
            months: counts.months(),
            weeks: counts.weeks(),
            days: counts.days(),
            hours: counts.hours(),
            minutes: counts.minutes(),
            seconds: counts.seconds(),
            timezone: self.timezone.clone(),
            start: self.start,
            end: self.end,
            repeating: self.repetition.is_repeating(),
            repetition_count: self.repetition.count(),
            order: self.order(),
            valid: self.validate().is_ok(),
        }
    }
}

impl std::fmt::Display for Interval {
    /// Canonical `R[n]/start/duration/end` form, with the redundant member
    /// of a three-way interval left out and dates written in UTC.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.defect.is_some() {
            return f.write_str(self.source.as_deref().unwrap_or_default());
        }
        let mut segments = Vec::with_capacity(3);
        if self.repetition.is_repeating() {
            segments.push(self.repetition.to_string());
        }
        if let Some(start) = &self.start {
            if self.end.is_none() || self.duration.is_none() {
                segments.push(format_timestamp(start));
            }
        }
        if let Some(duration) = &self.duration {
            segments.push(duration.to_string());
        }
        if let Some(end) = &self.end {
            if self.start.is_none() || self.duration.is_none() {
                segments.push(format_timestamp(end));
            }
        }
        f.write_str(&segments.join("/"))
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Plain, serializable view of an [`Interval`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSnapshot {
    /// Canonical text of the interval.
    pub source: String,
    /// Canonical text of the duration, if any.
    pub duration: Option<String>,
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
    /// Zone designator as written.
    pub timezone: Option<String>,
    /// Start instant.
    pub start: Option<Timestamp>,
    /// End instant.
    pub end: Option<Timestamp>,
    /// Whether a repeat designator is present.
    pub repeating: bool,
    /// `-1` unbounded, `0` non-repeating, `n` bounded.
    pub repetition_count: i64,
    /// Direction of recurrence.
    pub order: Order,
    /// Whether the interval validates.
    pub valid: bool,
}
