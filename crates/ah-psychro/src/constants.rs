//! Physical constants and solver settings for moist-air calculations.
//!
//! A [`PsychrometricConstants`] value is built once per calculation context
//! (typically from the design document) and passed to every calculation.
//! There is no `Default` impl: callers pick
//! [`PsychrometricConstants::standard`] or supply their own set.

use crate::error::{PsychroError, PsychroResult};
use serde::{Deserialize, Serialize};

/// Tetens coefficients: `Pws = a * exp(b*t / (t + c))` with `Pws` in kPa, `t` in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TetensCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl TetensCoefficients {
    /// Vapor pressure over liquid water.
    pub const WATER: Self = Self {
        a: 0.61078,
        b: 17.27,
        c: 237.3,
    };

    /// Vapor pressure over ice.
    pub const ICE: Self = Self {
        a: 0.61078,
        b: 21.875,
        c: 265.5,
    };

    /// Saturation pressure [kPa] at `t` [°C].
    #[inline]
    pub fn pressure(&self, t: f64) -> f64 {
        self.a * (self.b * t / (t + self.c)).exp()
    }

    /// Temperature [°C] at which the saturation pressure equals `pv` [kPa].
    #[inline]
    pub fn temperature(&self, pv: f64) -> f64 {
        let x = (pv / self.a).ln();
        self.c * x / (self.b - x)
    }

    fn validate(&self) -> PsychroResult<()> {
        let finite = self.a.is_finite() && self.b.is_finite() && self.c.is_finite();
        if !finite || self.a <= 0.0 || self.b == 0.0 || self.c <= 0.0 {
            return Err(PsychroError::InvalidConstants {
                what: "Tetens coefficients must be finite with a > 0, b != 0, c > 0",
            });
        }
        Ok(())
    }
}

/// Constants and tolerances threaded through every property calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default = "PsychrometricConstants::standard")]
pub struct PsychrometricConstants {
    /// Standard atmospheric pressure [kPa]
    pub standard_pressure: f64,
    /// Specific heat of dry air [kJ/(kg·K)]
    pub cp_air: f64,
    /// Specific heat of water vapor [kJ/(kg·K)]
    pub cp_vapor: f64,
    /// Latent heat of vaporization at 0 °C [kJ/kg]
    pub latent_heat_0c: f64,
    /// Ratio of molecular weights, water vapor / dry air
    pub molecular_weight_ratio: f64,
    /// Gas constant of dry air [kJ/(kg·K)]
    pub r_air: f64,
    /// Specific heat of the liquid on the wet-bulb wick [kJ/(kg·K)]
    pub wet_bulb_coefficient: f64,
    pub convergence_tolerance: f64,
    pub max_iterations: usize,
    pub water: TetensCoefficients,
    pub ice: TetensCoefficients,
    /// Lower end of the temperature sanity band [°C]
    pub min_temperature: f64,
    /// Upper end of the temperature sanity band [°C]
    pub max_temperature: f64,
    /// Largest humidity ratio accepted as physical [kg/kg']
    pub humidity_ceiling: f64,
}

impl PsychrometricConstants {
    /// ASHRAE-aligned SI constants with Tetens saturation pressure.
    pub fn standard() -> Self {
        Self {
            standard_pressure: ah_core::constants::STANDARD_PRESSURE_KPA,
            cp_air: 1.006,
            cp_vapor: 1.86,
            latent_heat_0c: 2501.0,
            molecular_weight_ratio: 0.62198,
            r_air: 0.287042,
            wet_bulb_coefficient: 4.186,
            convergence_tolerance: 1e-7,
            max_iterations: 50,
            water: TetensCoefficients::WATER,
            ice: TetensCoefficients::ICE,
            min_temperature: -60.0,
            max_temperature: 100.0,
            humidity_ceiling: 0.05,
        }
    }

    /// Same constants with a different convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance;
        self
    }

    /// Same constants with a different iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> PsychroResult<()> {
        let positive = [
            (self.standard_pressure, "standard_pressure must be positive"),
            (self.cp_air, "cp_air must be positive"),
            (self.cp_vapor, "cp_vapor must be positive"),
            (self.latent_heat_0c, "latent_heat_0c must be positive"),
            (
                self.molecular_weight_ratio,
                "molecular_weight_ratio must be positive",
            ),
            (self.r_air, "r_air must be positive"),
            (
                self.wet_bulb_coefficient,
                "wet_bulb_coefficient must be positive",
            ),
            (
                self.convergence_tolerance,
                "convergence_tolerance must be positive",
            ),
            (self.humidity_ceiling, "humidity_ceiling must be positive"),
        ];
        for (value, what) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PsychroError::InvalidConstants { what });
            }
        }

        if self.max_iterations == 0 {
            return Err(PsychroError::InvalidConstants {
                what: "max_iterations must be positive",
            });
        }

        if !(self.min_temperature.is_finite()
            && self.max_temperature.is_finite()
            && self.min_temperature < self.max_temperature)
        {
            return Err(PsychroError::InvalidConstants {
                what: "temperature band must satisfy min_temperature < max_temperature",
            });
        }

        self.water.validate()?;
        self.ice.validate()?;
        Ok(())
    }
}
