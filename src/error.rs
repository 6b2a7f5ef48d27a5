//! Error type shared by every fallible operation in the crate.
//!
//! Operations fail fast with a named variant instead of letting `NaN` or
//! `Infinity` leak into a display.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, NumericError>;

/// Errors raised by the numeric primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    /// An operand has the wrong number of components.
    ///
    /// Raised e.g. when a sedenion operation receives a 4-tuple, or when a
    /// phase vector and a frequency vector differ in length.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An operand is outside the domain of the operation
    /// (zero-norm inverse, non-finite value, duplicate prime, ...).
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    /// The operation needs at least one element.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// The periodic driver could not spawn its ticker thread.
    #[error("driver failed to start: {0}")]
    DriverStart(String),
}

impl NumericError {
    pub(crate) fn dimension(expected: usize, actual: usize) -> Self {
        NumericError::DimensionMismatch { expected, actual }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        NumericError::InvalidOperand(msg.into())
    }
}

/// Rejects slices containing `NaN` or infinities.
pub(crate) fn ensure_finite(data: &[f64], what: &str) -> Result<()> {
    match data.iter().position(|x| !x.is_finite()) {
        Some(i) => Err(NumericError::invalid(format!(
            "{what}[{i}] is not finite ({})",
            data[i]
        ))),
        None => Ok(()),
    }
}
