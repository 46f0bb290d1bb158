//! Error types for quantlib-fd.
//!
//! A single `thiserror`-derived enum covers every failure the pricing
//! framework can report. Input validation goes through [`ensure!`],
//! internal consistency checks through [`ensure_post!`], and unconditional
//! failures through [`fail!`].
//!
//! No variant carries partially computed results: a pricing call either
//! returns a full result set or one of these errors.

use thiserror::Error;

/// The top-level error type used throughout quantlib-fd.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated (invalid input to an operation).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Postcondition violated.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),

    /// An engine was set up with a combination it cannot price, e.g. a
    /// shout condition on a European exercise.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Shorthand `Result` type used throughout quantlib-fd.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
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

/// Returns `Err(Error::Postcondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure_post, errors::Error};
/// fn compute(x: f64) -> ql_core::errors::Result<f64> {
///     let result = x * 2.0;
///     ensure_post!(result > 0.0, "result must be positive, got {result}");
///     Ok(result)
/// }
/// assert!(compute(1.0).is_ok());
/// assert!(compute(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use ql_core::{fail, errors::Error};
/// fn always_err() -> ql_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_ratio(a: f64, b: f64) -> Result<f64> {
        crate::ensure!(b != 0.0, "division by zero ({a}/{b})");
        Ok(a / b)
    }

    #[test]
    fn ensure_reports_precondition() {
        assert_eq!(checked_ratio(1.0, 2.0), Ok(0.5));
        let err = checked_ratio(1.0, 0.0).unwrap_err();
        assert_eq!(err, Error::Precondition("division by zero (1/0)".into()));
        assert_eq!(
            err.to_string(),
            "precondition not satisfied: division by zero (1/0)"
        );
    }

    #[test]
    fn configuration_message() {
        let err = Error::Configuration("shout condition needs American exercise".into());
        assert_eq!(
            err.to_string(),
            "configuration error: shout condition needs American exercise"
        );
    }
}
