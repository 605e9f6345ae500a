//! # cadence
//!
//! Calendar arithmetic and recurrence patterns over ISO-8601 durations and
//! repeating intervals.
//!
//! This crate is a **façade** that re-exports the public items of the
//! workspace crates. Application code should depend on this crate rather
//! than on the individual `cadence-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use cadence::time::{Calendar, DateIterator, Duration, Gregorian, Interval};
//!
//! let start = "2018-01-31T00:00:00Z".parse().unwrap();
//! let next = Gregorian::new().add_duration(start, &Duration::parse("P1M")).unwrap();
//! assert_eq!(next.to_rfc3339(), "2018-03-03T00:00:00+00:00");
//!
//! let interval = Interval::parse("R5/2008-03-01T13:00:00Z/P1Y2M10DT2H30M");
//! assert_eq!(interval.time_table().unwrap().len(), 5);
//!
//! let mut dates = DateIterator::new(interval).unwrap();
//! assert_eq!(dates.by_ref().count(), 5);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Error type, settings, observer pattern and ISO-8601 scanners.
pub use cadence_core as core;

/// Durations, intervals, calendar arithmetic and the recurrence iterator.
pub use cadence_time as time;
