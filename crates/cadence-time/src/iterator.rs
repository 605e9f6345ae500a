//! `DateIterator`: a two-way cursor over the occurrences of an
//! [`Interval`].
//!
//! The cursor only ever stands on whole occurrences of the interval.  Its
//! date is recomputed from a fixed base for every move (see
//! [`Interval::shift`]), so advancing `n` and receding `n` always lands
//! back on the same date, even across month ends.  For a bounded
//! interval the iteration count stays within `[0, n]`: a step that would
//! leave that range is refused, the cursor stays on the last in-bound
//! occurrence, and the refusal is reported in the returned [`Step`], in a
//! warning, and to subscribers as [`IteratorEvent::OutOfBounds`].

use std::sync::Weak;

use cadence_core::errors::{Error, Result};
use cadence_core::patterns::observable::{Observable, ObservableImpl, Observer};

use crate::interval::Interval;
use crate::Timestamp;

/// Outcome of [`DateIterator::advance`] / [`DateIterator::recede`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Cursor position after the call.
    pub date: Timestamp,
    /// `false` when a step was refused at a bound.
    pub in_bounds: bool,
}

/// Where the cursor stands relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorState {
    /// At the anchor or seed.
    Fresh,
    /// `n` steps in the interval's direction.
    Advanced(u64),
    /// `n` steps against the interval's direction.
    Receded(u64),
    /// The last move was refused at a bound.
    AtBound,
}

/// Notification published to iterator subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorEvent {
    /// The cursor moved forward.
    Advanced {
        /// New cursor position.
        date: Timestamp,
        /// Iteration count after the move.
        iteration: i64,
    },
    /// The cursor moved backward.
    Receded {
        /// New cursor position.
        date: Timestamp,
        /// Iteration count after the move.
        iteration: i64,
    },
    /// A step past a bound was refused.
    OutOfBounds {
        /// Cursor position, unchanged by the refused step.
        date: Timestamp,
        /// Iteration count at the bound.
        iteration: i64,
    },
    /// The cursor was put back to the anchor or the seed.
    Reset {
        /// New cursor position.
        date: Timestamp,
    },
}

/// Cursor over a recurrence.
#[derive(Debug)]
pub struct DateIterator {
    seed: Timestamp,
    interval: Interval,
    // Occurrences are counted from `base`, which sits at `base_iteration`.
    base: Timestamp,
    base_iteration: i64,
    current: Timestamp,
    iteration: i64,
    at_bound: bool,
    observers: ObservableImpl<IteratorEvent>,
}

impl DateIterator {
    /// Iterate over `interval`, starting at its anchor.
    ///
    /// # Errors
    /// Any [`Interval::validate`] error, or [`Error::MissingArgument`] when
    /// the interval has no anchor.
    pub fn new(interval: Interval) -> Result<Self> {
        interval.validate()?;
        let seed = interval
            .anchor()
            .ok_or_else(|| Error::MissingArgument("interval has no anchor to iterate from".into()))?;
        Self::build(interval, seed)
    }

    /// Parse `pattern` as an [`Interval`] and iterate over it.
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        Self::new(Interval::parse(pattern))
    }

    /// Iterate starting at `seed`.
    ///
    /// An interval with neither start nor end (`R/P1D`) is anchored at
    /// `seed` as its start.
    pub fn with_seed(mut interval: Interval, seed: Timestamp) -> Result<Self> {
        if interval.start().is_none() && interval.end().is_none() {
            interval.set_start(Some(seed));
        }
        interval.validate()?;
        Self::build(interval, seed)
    }

    fn build(interval: Interval, seed: Timestamp) -> Result<Self> {
        interval.check_recurrence()?;
        Ok(Self {
            seed,
            interval,
            base: seed,
            base_iteration: 0,
            current: seed,
            iteration: 0,
            at_bound: false,
            observers: ObservableImpl::new(),
        })
    }

    // ── Inspectors ────────────────────────────────────────────────────────────

    /// Cursor position.
    pub fn date(&self) -> Timestamp {
        self.current
    }

    /// The seed the iterator was built with.
    pub fn seed(&self) -> Timestamp {
        self.seed
    }

    /// Signed number of steps taken from the anchor.
    pub fn iteration_count(&self) -> i64 {
        self.iteration
    }

    /// The interval being iterated.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Current state.
    pub fn state(&self) -> IteratorState {
        if self.at_bound {
            IteratorState::AtBound
        } else if self.iteration > 0 {
            IteratorState::Advanced(self.iteration.unsigned_abs())
        } else if self.iteration < 0 {
            IteratorState::Receded(self.iteration.unsigned_abs())
        } else {
            IteratorState::Fresh
        }
    }

    // ── Movement ──────────────────────────────────────────────────────────────

    /// Take `count` steps in the interval's direction.  A negative count
    /// recedes instead.
    pub fn advance(&mut self, count: i64) -> Result<Step> {
        if count < 0 {
            return self.walk(count.unsigned_abs(), false);
        }
        self.walk(count.unsigned_abs(), true)
    }

    /// Take `count` steps against the interval's direction.  A negative
    /// count advances instead.
    pub fn recede(&mut self, count: i64) -> Result<Step> {
        if count < 0 {
            return self.walk(count.unsigned_abs(), true);
        }
        self.walk(count.unsigned_abs(), false)
    }

    fn clamp(&self, iteration: i64) -> i64 {
        match self.interval.repetition().bound() {
            Some(n) => iteration.clamp(0, i64::from(n)),
            None => iteration,
        }
    }

    fn position(&self, iteration: i64) -> Result<Timestamp> {
        let offset = iteration.checked_sub(self.base_iteration).ok_or_else(|| {
            Error::Date(format!("iteration {iteration} is out of range"))
        })?;
        self.interval.shift(self.base, offset)
    }

    fn walk(&mut self, count: u64, forward: bool) -> Result<Step> {
        if count == 0 {
            return Ok(Step { date: self.current, in_bounds: true });
        }
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        let target = if forward {
            self.iteration.saturating_add(count)
        } else {
            self.iteration.saturating_sub(count)
        };
        let reached = self.clamp(target);
        self.current = Self::position(self, reached)?;
        self.iteration = reached;

        if reached != target {
            self.at_bound = true;
            tracing::warn!(
                interval = %self.interval,
                iteration = self.iteration,
                date = %self.current,
                "iterator stepped past its bound"
            );
            self.observers.notify(&IteratorEvent::OutOfBounds {
                date: self.current,
                iteration: self.iteration,
            });
            return Ok(Step { date: self.current, in_bounds: false });
        }

        self.at_bound = false;
        let event = if forward {
            IteratorEvent::Advanced { date: self.current, iteration: self.iteration }
        } else {
            IteratorEvent::Receded { date: self.current, iteration: self.iteration }
        };
        self.observers.notify(&event);
        Ok(Step { date: self.current, in_bounds: true })
    }

    /// Put the cursor back on the interval's anchor (start when ascending,
    /// end when descending) and zero the count.
    pub fn reset(&mut self) {
        let anchor = self.interval.anchor().unwrap_or(self.seed);
        self.rewind(anchor);
    }

    /// Put the cursor back on the seed and zero the count.
    pub fn clear(&mut self) {
        self.rewind(self.seed);
    }

    fn rewind(&mut self, date: Timestamp) {
        self.base = date;
        self.base_iteration = 0;
        self.current = date;
        self.iteration = 0;
        self.at_bound = false;
        self.observers.notify(&IteratorEvent::Reset { date });
    }

    /// Move the cursor to `date` without touching the iteration count.
    /// Later moves count from `date`.
    pub fn set_date(&mut self, date: Timestamp) {
        self.base = date;
        self.base_iteration = self.iteration;
        self.current = date;
        self.at_bound = false;
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    /// Receive future [`IteratorEvent`]s.
    pub fn subscribe(&self, observer: Weak<dyn Observer<IteratorEvent>>) {
        self.observers.register(observer);
    }

    /// Stop receiving events.
    pub fn unsubscribe(&self, observer: &Weak<dyn Observer<IteratorEvent>>) {
        self.observers.unregister(observer);
    }
}

impl Observable<IteratorEvent> for DateIterator {
    fn register_observer(&self, observer: Weak<dyn Observer<IteratorEvent>>) {
        self.subscribe(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer<IteratorEvent>>) {
        self.unsubscribe(observer);
    }
}

impl Iterator for DateIterator {
    type Item = Timestamp;

    /// The next in-bound occurrence.  Errors end the iteration.
    fn next(&mut self) -> Option<Timestamp> {
        match self.advance(1) {
            Ok(Step { date, in_bounds: true }) => Some(date),
            _ => None,
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
    fn fresh_iterator_sits_on_anchor() {
        let it = DateIterator::from_pattern("R5/2008-03-01T13:00:00Z/P1Y2M10DT2H30M").unwrap();
        assert_eq!(it.date(), ts("2008-03-01T13:00:00Z"));
        assert_eq!(it.state(), IteratorState::Fresh);
    }

    #[test]
    fn anchorless_interval_needs_a_seed() {
        assert!(matches!(
            DateIterator::from_pattern("R/P1D"),
            Err(Error::MissingArgument(_))
        ));
        let it = DateIterator::with_seed(Interval::parse("R/P1D"), ts("2020-01-01T00:00:00Z")).unwrap();
        assert_eq!(it.interval().start(), Some(ts("2020-01-01T00:00:00Z")));
    }

    #[test]
    fn receding_from_fresh_bounded_is_refused() {
        let mut it = DateIterator::from_pattern("R2/2020-01-01T00:00:00Z/P1D").unwrap();
        let step = it.recede(1).unwrap();
        assert!(!step.in_bounds);
        assert_eq!(step.date, ts("2020-01-01T00:00:00Z"));
        assert_eq!(it.state(), IteratorState::AtBound);
        assert_eq!(it.iteration_count(), 0);
    }

    #[test]
    fn descending_interval_steps_backward() {
        let mut it = DateIterator::from_pattern("R3/P1D/2020-01-10T00:00:00Z").unwrap();
        assert_eq!(it.advance(1).unwrap().date, ts("2020-01-09T00:00:00Z"));
        assert_eq!(it.recede(1).unwrap().date, ts("2020-01-10T00:00:00Z"));
    }

    #[test]
    fn month_end_walk_is_symmetric() {
        let mut it = DateIterator::from_pattern("R/2018-01-31T00:00:00Z/P1M").unwrap();
        assert_eq!(it.advance(1).unwrap().date, ts("2018-03-03T00:00:00Z"));
        assert_eq!(it.advance(1).unwrap().date, ts("2018-03-31T00:00:00Z"));
        assert_eq!(it.recede(1).unwrap().date, ts("2018-03-03T00:00:00Z"));
        assert_eq!(it.recede(1).unwrap().date, ts("2018-01-31T00:00:00Z"));
        assert_eq!(it.state(), IteratorState::Fresh);
    }
}
