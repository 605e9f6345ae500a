//! Library settings.
//!
//! [`Settings`] is a plain value, not a process-wide singleton: it is handed
//! to the calendar service when that service is built, and every interval or
//! iterator created with the service reads its limits from there.

use crate::ensure;
use crate::errors::Result;

/// Recommended number of occurrences materialized for an unbounded recurrence.
pub const DEFAULT_TIME_TABLE_LEN: usize = 25;

/// Hard ceiling on the number of occurrences materialized in one call.
pub const MAX_TIME_TABLE_LEN: usize = 10_000;

/// Limits applied when recurrences are expanded into time tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    default_time_table_len: usize,
    max_time_table_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Settings with the library defaults (25 recommended, 10 000 maximum).
    pub const fn new() -> Self {
        Self {
            default_time_table_len: DEFAULT_TIME_TABLE_LEN,
            max_time_table_len: MAX_TIME_TABLE_LEN,
        }
    }

    /// Number of occurrences produced for an unbounded recurrence when the
    /// caller does not ask for a specific count.  Requests above this value
    /// are honoured but logged.
    pub fn default_time_table_len(&self) -> usize {
        self.default_time_table_len
    }

    /// Largest time table that may be produced.  Larger requests fail with
    /// [`Error::LimitExceeded`](crate::errors::Error::LimitExceeded).
    pub fn max_time_table_len(&self) -> usize {
        self.max_time_table_len
    }

    /// Replace the recommended time-table length.
    ///
    /// # Errors
    /// Fails if `len` is zero or larger than the hard maximum.
    pub fn with_default_time_table_len(mut self, len: usize) -> Result<Self> {
        ensure!(len > 0, "default time-table length must be positive");
        ensure!(
            len <= self.max_time_table_len,
            "default time-table length {len} exceeds the maximum {}",
            self.max_time_table_len
        );
        self.default_time_table_len = len;
        Ok(self)
    }

    /// Replace the hard time-table maximum.
    ///
    /// # Errors
    /// Fails if `len` is below the recommended length.
    pub fn with_max_time_table_len(mut self, len: usize) -> Result<Self> {
        ensure!(
            len >= self.default_time_table_len,
            "maximum time-table length {len} is below the default {}",
            self.default_time_table_len
        );
        self.max_time_table_len = len;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.default_time_table_len(), 25);
        assert_eq!(s.max_time_table_len(), 10_000);
    }

    #[test]
    fn builder_validates() {
        let s = Settings::new()
            .with_max_time_table_len(100)
            .unwrap()
            .with_default_time_table_len(50)
            .unwrap();
        assert_eq!(s.default_time_table_len(), 50);
        assert_eq!(s.max_time_table_len(), 100);

        assert!(matches!(
            s.with_default_time_table_len(101),
            Err(Error::Precondition(_))
        ));
        assert!(matches!(
            s.with_max_time_table_len(10),
            Err(Error::Precondition(_))
        ));
        assert!(s.with_default_time_table_len(0).is_err());
    }
}
