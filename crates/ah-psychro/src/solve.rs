//! One-dimensional Newton solver with optional bounds.

use crate::error::{PsychroError, PsychroResult};

/// Newton solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance on |residual|
    pub tolerance: f64,
    /// Iterates are clamped to `[lower, upper]` when set
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl NewtonConfig {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
            lower: None,
            upper: None,
        }
    }

    pub fn bounded(mut self, lower: f64, upper: f64) -> Self {
        self.lower = Some(lower);
        self.upper = Some(upper);
        self
    }

    fn clamp(&self, x: f64) -> f64 {
        let x = self.lower.map_or(x, |lo| x.max(lo));
        self.upper.map_or(x, |hi| x.min(hi))
    }
}

/// Newton iteration result.
#[derive(Debug, Clone, Copy)]
pub struct NewtonResult {
    /// Root estimate
    pub x: f64,
    /// Residual at `x`
    pub residual: f64,
    /// Number of Newton steps taken
    pub iterations: usize,
}

/// Solve `residual(x) = 0` starting at `x0`.
///
/// The iteration order is fixed, so identical inputs always produce
/// identical outputs. Errors from `residual`/`derivative` propagate as-is;
/// an exhausted budget, a vanishing derivative or a non-finite residual is
/// reported as [`PsychroError::ConvergenceFailure`].
pub fn newton_solve_1d<F, D>(
    what: &'static str,
    x0: f64,
    residual: F,
    derivative: D,
    config: &NewtonConfig,
) -> PsychroResult<NewtonResult>
where
    F: Fn(f64) -> PsychroResult<f64>,
    D: Fn(f64) -> PsychroResult<f64>,
{
    let mut x = config.clamp(x0);
    let mut r = residual(x)?;

    for iter in 0..config.max_iterations {
        if !r.is_finite() {
            break;
        }

        tracing::trace!(what, iter, x, residual = r, "newton step");

        if r.abs() < config.tolerance {
            tracing::debug!(what, iterations = iter, x, "newton converged");
            return Ok(NewtonResult {
                x,
                residual: r,
                iterations: iter,
            });
        }

        let slope = derivative(x)?;
        if !slope.is_finite() || slope == 0.0 {
            return Err(PsychroError::ConvergenceFailure {
                what,
                iterations: iter,
                residual: r,
            });
        }

        x = config.clamp(x - r / slope);
        r = residual(x)?;
    }

    if r.is_finite() && r.abs() < config.tolerance {
        return Ok(NewtonResult {
            x,
            residual: r,
            iterations: config.max_iterations,
        });
    }

    Err(PsychroError::ConvergenceFailure {
        what,
        iterations: config.max_iterations,
        residual: r,
    })
}
