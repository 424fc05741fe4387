//! Psychrometric property errors.

use thiserror::Error;

/// Result type for property and state point operations.
pub type PsychroResult<T> = Result<T, PsychroError>;

/// Errors that can occur while computing moist-air properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PsychroError {
    /// Input or computed value violates a physical bound.
    #[error("Out of physical range: {what} = {value}")]
    OutOfPhysicalRange { what: &'static str, value: f64 },

    /// The populated fields of a state point do not match exactly one input pair.
    #[error("Ambiguous input for state point '{point}': {what}")]
    AmbiguousInput { point: String, what: String },

    /// Iterative solver exhausted its iteration budget.
    #[error("Convergence failed for {what} after {iterations} iterations (residual {residual:e})")]
    ConvergenceFailure {
        what: &'static str,
        iterations: usize,
        residual: f64,
    },

    /// Constants set rejected by validation.
    #[error("Invalid psychrometric constants: {what}")]
    InvalidConstants { what: &'static str },
}

impl PsychroError {
    pub(crate) fn out_of_range(what: &'static str, value: f64) -> Self {
        Self::OutOfPhysicalRange { what, value }
    }
}

/// Reject NaN/inf before it reaches a formula.
pub(crate) fn check_finite(value: f64, what: &'static str) -> PsychroResult<f64> {
    ah_core::ensure_finite(value, what).map_err(|_| PsychroError::out_of_range(what, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PsychroError::OutOfPhysicalRange {
            what: "relative humidity",
            value: 120.0,
        };
        assert!(err.to_string().contains("relative humidity"));

        let err = PsychroError::ConvergenceFailure {
            what: "wet bulb",
            iterations: 50,
            residual: 1e-3,
        };
        assert!(err.to_string().contains("50 iterations"));
    }

    #[test]
    fn check_finite_maps_to_range_error() {
        assert_eq!(check_finite(1.5, "x"), Ok(1.5));
        assert!(matches!(
            check_finite(f64::NAN, "x"),
            Err(PsychroError::OutOfPhysicalRange { what: "x", .. })
        ));
    }
}
