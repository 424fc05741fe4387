//! Parameter checks shared by the process handlers.

use crate::error::{ProcessError, ProcessResult};

/// Ratios given as fractions may sum to 1 within this slack.
pub const EPSILON_RATIO: f64 = 1e-6;

/// Finite and strictly positive.
pub fn require_positive(process: &str, field: &str, value: f64) -> ProcessResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ProcessError::invalid(
            process,
            format!("{field} must be positive (got {value})"),
        ))
    }
}

/// Finite and zero or positive.
pub fn require_non_negative(process: &str, field: &str, value: f64) -> ProcessResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ProcessError::invalid(
            process,
            format!("{field} must be non-negative (got {value})"),
        ))
    }
}

/// Finite and inside [0, 1].
pub fn require_fraction(process: &str, field: &str, value: f64) -> ProcessResult<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ProcessError::invalid(
            process,
            format!("{field} must be within [0, 1] (got {value})"),
        ))
    }
}

/// Finite, any sign.
pub fn require_finite(process: &str, field: &str, value: f64) -> ProcessResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProcessError::invalid(
            process,
            format!("{field} must be finite (got {value})"),
        ))
    }
}
