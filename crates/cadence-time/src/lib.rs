//! # cadence-time
//!
//! ISO-8601 durations and repeating intervals, the calendar arithmetic that
//! applies them to timestamps, and a cursor over recurrences.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `Calendar` trait: applies durations to timestamps.
pub mod calendar;

/// Leap years, month shifts and date-time resolution.
pub mod date;

/// `Duration`: seven calendar-unit counts.
pub mod duration;

/// `Interval`: start, end, duration and repetition.
pub mod interval;

/// `DateIterator`: cursor over a recurrence.
pub mod iterator;

/// `TimeUnit`: years through seconds.
pub mod time_unit;

/// An instant on the UTC timeline.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use calendar::{Calendar, Gregorian, LeapCompensated};
pub use date::{is_leap_year, leap_years, YearBound};
pub use duration::{Duration, DurationBuilder, DurationSnapshot};
pub use interval::{Interval, IntervalSnapshot, Order, Repetition};
pub use iterator::{DateIterator, IteratorEvent, IteratorState, Step};
pub use time_unit::TimeUnit;
