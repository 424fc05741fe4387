use crate::{CoreError, CoreResult};

/// Floating point type used throughout the workspace
pub type Real = f64;

/// Absolute/relative tolerance pair used for "close enough" comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Same value for both the absolute and relative bound.
    pub fn uniform(tol: Real) -> Self {
        Self { abs: tol, rel: tol }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Relative deviation of `value` from `reference`, |value - reference| / |reference|.
///
/// Returns `None` when the reference is zero.
pub fn relative_deviation(value: Real, reference: Real) -> Option<Real> {
    if reference == 0.0 {
        None
    } else {
        Some((value - reference).abs() / reference.abs())
    }
}
