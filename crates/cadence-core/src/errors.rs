//! Error types for cadence.
//!
//! Lenient parsers (`Duration::parse`, `Interval::parse`) do not fail; they
//! return a value whose validity the caller checks, and the recorded parse
//! problem surfaces as [`Error::Parse`] only when the value is validated or
//! parsed strictly.  The `ensure!` and `fail!` convenience macros defined
//! here build the precondition and runtime variants.

use thiserror::Error;

/// The top-level error type used throughout cadence.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error (see [`fail!`]).
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated (see [`ensure!`]).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Text that was required to be well-formed was not.
    #[error("parse error: {0}")]
    Parse(String),

    /// Date arithmetic left the representable range or produced no date.
    #[error("date error: {0}")]
    Date(String),

    /// A value violates the rules of its domain (negative duration field,
    /// conflicting interval parts, zero-length interval, ...).
    #[error("domain violation: {0}")]
    Domain(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A value needed to complete the operation is absent.
    #[error("missing argument: {0}")]
    MissingArgument(String),

    /// A request exceeds a configured hard limit.
    #[error("limit exceeded: requested {requested}, limit is {limit}")]
    LimitExceeded {
        /// The amount that was requested.
        requested: usize,
        /// The configured maximum.
        limit: usize,
    },
}

/// Shorthand `Result` type used throughout cadence.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use cadence_core::{ensure, errors::Error};
/// fn positive(x: i64) -> cadence_core::errors::Result<i64> {
///     ensure!(x > 0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1).is_ok());
/// assert!(matches!(positive(-1), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use cadence_core::{fail, errors::Error};
/// fn always_err() -> cadence_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert_eq!(always_err(), Err(Error::Runtime("something went wrong".into())));
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}
