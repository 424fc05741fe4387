//! Moist-air property calculations.
//!
//! All temperatures are °C, pressures kPa, humidity ratios kg/kg' (per kg of
//! dry air), enthalpies kJ/kg' and specific volumes m³/kg'.

use crate::constants::{PsychrometricConstants, TetensCoefficients};
use crate::error::{PsychroError, PsychroResult, check_finite};
use crate::solve::{NewtonConfig, newton_solve_1d};

/// Ratio used in the ideal-gas specific volume of moist air, ≈ 1/ε.
const VAPOR_VOLUME_FACTOR: f64 = 1.6078;

/// Offset between °C and K.
const KELVIN_OFFSET: f64 = 273.15;

/// Step for the backward-difference slope of the wet-bulb residual [K].
const WET_BULB_FD_STEP: f64 = 1e-4;

/// Pure property functions bound to one constants set and one ambient pressure.
#[derive(Debug, Clone, Copy)]
pub struct PropertyCalculator<'a> {
    constants: &'a PsychrometricConstants,
    pressure: f64,
}

impl<'a> PropertyCalculator<'a> {
    /// Validates the constants and the ambient pressure [kPa].
    pub fn new(constants: &'a PsychrometricConstants, pressure: f64) -> PsychroResult<Self> {
        constants.validate()?;
        let pressure = check_finite(pressure, "pressure")?;
        if pressure <= 0.0 {
            return Err(PsychroError::out_of_range("pressure", pressure));
        }
        Ok(Self {
            constants,
            pressure,
        })
    }

    /// Calculator at the constants' standard pressure.
    pub fn at_standard_pressure(constants: &'a PsychrometricConstants) -> PsychroResult<Self> {
        Self::new(constants, constants.standard_pressure)
    }

    pub fn constants(&self) -> &'a PsychrometricConstants {
        self.constants
    }

    /// Ambient pressure [kPa].
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    fn check_temperature(&self, t: f64, what: &'static str) -> PsychroResult<f64> {
        let t = check_finite(t, what)?;
        if t < self.constants.min_temperature || t > self.constants.max_temperature {
            return Err(PsychroError::out_of_range(what, t));
        }
        Ok(t)
    }

    fn check_humidity(&self, w: f64) -> PsychroResult<f64> {
        let w = check_finite(w, "humidity")?;
        if w < 0.0 || w > self.constants.humidity_ceiling {
            return Err(PsychroError::out_of_range("humidity", w));
        }
        Ok(w)
    }

    fn tetens(&self, t: f64) -> &TetensCoefficients {
        if t >= 0.0 {
            &self.constants.water
        } else {
            &self.constants.ice
        }
    }

    /// Saturation vapor pressure [kPa]; water set at or above 0 °C, ice set below.
    pub fn saturation_vapor_pressure(&self, t: f64) -> PsychroResult<f64> {
        let t = self.check_temperature(t, "temperature")?;
        Ok(self.tetens(t).pressure(t))
    }

    /// Partial vapor pressure [kPa] implied by a humidity ratio.
    pub fn vapor_pressure(&self, w: f64) -> PsychroResult<f64> {
        let w = self.check_humidity(w)?;
        Ok(self.pressure * w / (self.constants.molecular_weight_ratio + w))
    }

    /// Humidity ratio from vapor pressure, without the sanity ceiling.
    fn humidity_from_vapor_pressure(&self, pv: f64) -> PsychroResult<f64> {
        if pv >= self.pressure {
            return Err(PsychroError::out_of_range("vapor pressure", pv));
        }
        Ok(self.constants.molecular_weight_ratio * pv / (self.pressure - pv))
    }

    /// Humidity ratio at saturation, without the sanity ceiling.
    fn saturation_humidity_unchecked(&self, t: f64) -> PsychroResult<f64> {
        let pws = self.saturation_vapor_pressure(t)?;
        self.humidity_from_vapor_pressure(pws)
    }

    /// Humidity ratio from dry-bulb [°C] and relative humidity [%].
    pub fn absolute_humidity(&self, t: f64, rh: f64) -> PsychroResult<f64> {
        let rh = check_finite(rh, "relative humidity")?;
        if !(0.0..=100.0).contains(&rh) {
            return Err(PsychroError::out_of_range("relative humidity", rh));
        }
        let pv = rh / 100.0 * self.saturation_vapor_pressure(t)?;
        let w = self.humidity_from_vapor_pressure(pv)?;
        self.check_humidity(w)
    }

    /// Humidity ratio of saturated air at `t`.
    pub fn saturation_humidity(&self, t: f64) -> PsychroResult<f64> {
        self.absolute_humidity(t, 100.0)
    }

    /// Relative humidity [%] from dry-bulb and humidity ratio (closed form).
    pub fn relative_humidity(&self, t: f64, w: f64) -> PsychroResult<f64> {
        let pv = self.vapor_pressure(w)?;
        let rh = 100.0 * pv / self.saturation_vapor_pressure(t)?;
        let slack = 100.0 * self.constants.convergence_tolerance;
        if rh > 100.0 + slack {
            return Err(PsychroError::out_of_range("relative humidity (supersaturated)", rh));
        }
        Ok(rh.min(100.0))
    }

    /// Specific enthalpy [kJ/kg'].
    pub fn enthalpy(&self, t: f64, w: f64) -> PsychroResult<f64> {
        let t = self.check_temperature(t, "dry bulb")?;
        let w = self.check_humidity(w)?;
        let c = self.constants;
        Ok(c.cp_air * t + w * (c.latent_heat_0c + c.cp_vapor * t))
    }

    /// Humidity ratio that gives enthalpy `h` at dry-bulb `t`.
    pub fn humidity_from_enthalpy(&self, t: f64, h: f64) -> PsychroResult<f64> {
        let t = self.check_temperature(t, "dry bulb")?;
        let h = check_finite(h, "enthalpy")?;
        let c = self.constants;
        let w = (h - c.cp_air * t) / (c.latent_heat_0c + c.cp_vapor * t);
        self.check_humidity(w)
    }

    /// Dry-bulb that gives enthalpy `h` at humidity ratio `w`.
    pub fn dry_bulb_from_enthalpy(&self, h: f64, w: f64) -> PsychroResult<f64> {
        let h = check_finite(h, "enthalpy")?;
        let w = self.check_humidity(w)?;
        let c = self.constants;
        let t = (h - w * c.latent_heat_0c) / (c.cp_air + w * c.cp_vapor);
        self.check_temperature(t, "dry bulb")
    }

    /// Humid specific heat `cp_air + w*cp_vapor` [kJ/(kg'·K)].
    pub fn humid_specific_heat(&self, w: f64) -> PsychroResult<f64> {
        let w = self.check_humidity(w)?;
        Ok(self.constants.cp_air + w * self.constants.cp_vapor)
    }

    /// Dew point [°C].
    ///
    /// Solved with the water coefficients first; a result below 0 °C is
    /// re-solved once with the ice coefficients.
    pub fn dew_point(&self, w: f64) -> PsychroResult<f64> {
        let pv = self.vapor_pressure(w)?;
        if pv <= 0.0 {
            return Err(PsychroError::out_of_range("humidity (no dew point)", w));
        }

        self.check_temperature(self.dew_point_at(pv), "dew point")
    }

    /// Dew point, or `None` when there is none inside the temperature band:
    /// bone-dry air, or air so dry its dew point lies below `min_temperature`.
    pub fn dew_point_if_defined(&self, w: f64) -> PsychroResult<Option<f64>> {
        let pv = self.vapor_pressure(w)?;
        if pv <= 0.0 {
            return Ok(None);
        }
        let td = self.dew_point_at(pv);
        if td < self.constants.min_temperature {
            return Ok(None);
        }
        self.check_temperature(td, "dew point").map(Some)
    }

    fn dew_point_at(&self, pv: f64) -> f64 {
        let over_water = self.constants.water.temperature(pv);
        if over_water >= 0.0 {
            over_water
        } else {
            self.constants.ice.temperature(pv)
        }
    }

    /// Specific volume [m³/kg'] from the ideal-gas relation.
    pub fn specific_volume(&self, t: f64, w: f64) -> PsychroResult<f64> {
        let t = self.check_temperature(t, "dry bulb")?;
        let w = self.check_humidity(w)?;
        Ok(self.constants.r_air * (t + KELVIN_OFFSET) * (1.0 + VAPOR_VOLUME_FACTOR * w)
            / self.pressure)
    }

    /// Adiabatic-saturation energy balance solved for the humidity ratio.
    ///
    /// Residual: `h(t, W) - [h_s(twb) - (Ws* - W)·c_w·twb]`.
    fn wet_bulb_balance(&self, t: f64, twb: f64) -> PsychroResult<f64> {
        let c = self.constants;
        let ws = self.saturation_humidity_unchecked(twb)?;
        let hs = c.cp_air * twb + ws * (c.latent_heat_0c + c.cp_vapor * twb);
        let liquid = c.wet_bulb_coefficient * twb;

        let residual = |w: f64| -> PsychroResult<f64> {
            let h = c.cp_air * t + w * (c.latent_heat_0c + c.cp_vapor * t);
            Ok(h - (hs - (ws - w) * liquid))
        };
        let slope = |_w: f64| -> PsychroResult<f64> {
            Ok(c.latent_heat_0c + c.cp_vapor * t - liquid)
        };

        let config = NewtonConfig::new(c.max_iterations, c.convergence_tolerance);
        let solution = newton_solve_1d("humidity from wet bulb", ws, residual, slope, &config)?;
        Ok(solution.x)
    }

    /// Humidity ratio from dry-bulb and wet-bulb temperatures (iterative).
    pub fn humidity_from_wet_bulb(&self, t: f64, twb: f64) -> PsychroResult<f64> {
        let t = self.check_temperature(t, "dry bulb")?;
        let twb = self.check_temperature(twb, "wet bulb")?;
        if twb > t + self.constants.convergence_tolerance {
            return Err(PsychroError::out_of_range("wet bulb above dry bulb", twb));
        }

        let w = self.wet_bulb_balance(t, twb)?;
        self.check_humidity(w)
    }

    /// Wet-bulb temperature from dry-bulb and humidity ratio (iterative).
    ///
    /// Newton on `g(twb) = W(t, twb) - w`, started midway between dew point and
    /// dry bulb and kept inside `[dew point - 1, t]`.
    pub fn wet_bulb_from_humidity(&self, t: f64, w: f64) -> PsychroResult<f64> {
        let t = self.check_temperature(t, "dry bulb")?;
        let w = self.check_humidity(w)?;
        // Rejects supersaturated input before iterating.
        self.relative_humidity(t, w)?;

        let c = self.constants;
        let dew = self.dew_point_if_defined(w)?.unwrap_or(c.min_temperature);
        let lower = (dew - 1.0).max(c.min_temperature);
        let upper = t;

        let residual = |twb: f64| -> PsychroResult<f64> { Ok(self.wet_bulb_balance(t, twb)? - w) };
        let slope = |twb: f64| -> PsychroResult<f64> {
            let back = (twb - WET_BULB_FD_STEP).max(c.min_temperature);
            let span = twb - back;
            if span <= 0.0 {
                return Ok(0.0);
            }
            Ok((self.wet_bulb_balance(t, twb)? - self.wet_bulb_balance(t, back)?) / span)
        };

        let config = NewtonConfig::new(c.max_iterations, c.convergence_tolerance)
            .bounded(lower, upper);
        let x0 = 0.5 * (dew.min(upper) + upper);
        let solution = newton_solve_1d("wet bulb from humidity", x0, residual, slope, &config)?;
        Ok(solution.x)
    }
}
