//! Error taxonomy for the hedging engine.

use thiserror::Error;

/// Errors raised by the core engine.
///
/// Every public operation validates its inputs on entry and returns one of
/// these before producing any output. There is nothing transient to retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HedgeError {
    /// Caller-supplied data violates a contract (empty series, bad ordering,
    /// non-positive price or threshold, trade timestamp not on the price grid).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A computation would divide by zero or produce a non-finite value.
    #[error("numeric degenerate: {0}")]
    NumericDegenerate(String),
}

impl HedgeError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        Self::NumericDegenerate(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_numeric_degenerate(&self) -> bool {
        matches!(self, Self::NumericDegenerate(_))
    }
}

/// Fail with `NumericDegenerate` unless `value` is finite.
pub(crate) fn ensure_finite(value: f64, what: &str) -> Result<f64, HedgeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(HedgeError::degenerate(format!("{what} is not finite ({value})")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_category() {
        let err = HedgeError::invalid("empty price series");
        assert_eq!(err.to_string(), "invalid input: empty price series");
        assert!(err.is_invalid_input());

        let err = HedgeError::degenerate("reference price is zero");
        assert!(err.to_string().starts_with("numeric degenerate"));
        assert!(err.is_numeric_degenerate());
    }

    #[test]
    fn ensure_finite_rejects_nan_and_inf() {
        assert_eq!(ensure_finite(1.5, "x"), Ok(1.5));
        assert!(ensure_finite(f64::NAN, "x").unwrap_err().is_numeric_degenerate());
        assert!(ensure_finite(f64::INFINITY, "x").unwrap_err().is_numeric_degenerate());
    }
}
