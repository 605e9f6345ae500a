//! `TimeUnit`: the seven calendar units a [`Duration`](crate::Duration)
//! counts.

/// A unit of calendar time, ordered from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeUnit {
    /// Calendar years (variable length).
    Years,
    /// Calendar months (variable length).
    Months,
    /// Weeks (7 days).
    Weeks,
    /// Days (86 400 seconds on the UTC timeline).
    Days,
    /// Hours.
    Hours,
    /// Minutes.
    Minutes,
    /// Seconds.
    Seconds,
}

impl TimeUnit {
    /// All units in designator order.
    pub const ALL: [TimeUnit; 7] = [
        TimeUnit::Years,
        TimeUnit::Months,
        TimeUnit::Weeks,
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Minutes,
        TimeUnit::Seconds,
    ];

    /// The ISO-8601 designator letter.
    pub fn designator(self) -> char {
        match self {
            TimeUnit::Years => 'Y',
            TimeUnit::Months | TimeUnit::Minutes => 'M',
            TimeUnit::Weeks => 'W',
            TimeUnit::Days => 'D',
            TimeUnit::Hours => 'H',
            TimeUnit::Seconds => 'S',
        }
    }

    /// `true` for the units written after the `T` separator.
    pub fn is_time(self) -> bool {
        matches!(self, TimeUnit::Hours | TimeUnit::Minutes | TimeUnit::Seconds)
    }

    /// Fixed length in seconds, or `None` for years and months whose length
    /// depends on where in the calendar they are applied.
    pub fn fixed_seconds(self) -> Option<i64> {
        match self {
            TimeUnit::Years | TimeUnit::Months => None,
            TimeUnit::Weeks => Some(604_800),
            TimeUnit::Days => Some(86_400),
            TimeUnit::Hours => Some(3_600),
            TimeUnit::Minutes => Some(60),
            TimeUnit::Seconds => Some(1),
        }
    }

    /// The natural modulus of this unit and the coarser unit its overflow
    /// carries into, e.g. `(60, Hours)` for minutes.
    ///
    /// Days and years have no carry.
    pub fn carry(self) -> Option<(u32, TimeUnit)> {
        match self {
            TimeUnit::Months => Some((12, TimeUnit::Years)),
            TimeUnit::Weeks => Some((52, TimeUnit::Years)),
            TimeUnit::Hours => Some((24, TimeUnit::Days)),
            TimeUnit::Minutes => Some((60, TimeUnit::Hours)),
            TimeUnit::Seconds => Some((60, TimeUnit::Minutes)),
            TimeUnit::Years | TimeUnit::Days => None,
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Years => write!(f, "Year(s)"),
            TimeUnit::Months => write!(f, "Month(s)"),
            TimeUnit::Weeks => write!(f, "Week(s)"),
            TimeUnit::Days => write!(f, "Day(s)"),
            TimeUnit::Hours => write!(f, "Hour(s)"),
            TimeUnit::Minutes => write!(f, "Minute(s)"),
            TimeUnit::Seconds => write!(f, "Second(s)"),
        }
    }
}
