//! State point completion.

use crate::calculator::PropertyCalculator;
use crate::error::PsychroResult;
use crate::state::{Properties, Property, StateInput, StatePoint};
use ah_core::{Tolerances, nearly_equal};
use serde::Serialize;
use std::fmt;

/// Supplied redundant values may differ from computed ones by
/// `convergence_tolerance * CONSISTENCY_SCALE` (relative) before a warning.
pub const CONSISTENCY_SCALE: f64 = 1e3;

/// Options for [`StatePointResolver::resolve`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Back-solve the wet bulb even when nobody supplied one.
    pub wet_bulb: bool,
}

impl ResolveOptions {
    pub fn with_wet_bulb() -> Self {
        Self { wet_bulb: true }
    }
}

/// Non-fatal finding produced while resolving.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A caller-supplied redundant value disagrees with the computed one.
    Inconsistent {
        point: String,
        property: Property,
        supplied: f64,
        computed: f64,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inconsistent {
                point,
                property,
                supplied,
                computed,
            } => write!(
                f,
                "state point '{point}': supplied {} {supplied} {} differs from computed {computed}",
                property.label(),
                property.unit()
            ),
        }
    }
}

/// Completed point plus any warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub point: StatePoint,
    pub diagnostics: Vec<Diagnostic>,
}

/// Fills in every derivable property of a state point.
#[derive(Debug, Clone, Copy)]
pub struct StatePointResolver<'a> {
    calc: PropertyCalculator<'a>,
}

impl<'a> StatePointResolver<'a> {
    pub fn new(calc: PropertyCalculator<'a>) -> Self {
        Self { calc }
    }

    pub fn calculator(&self) -> &PropertyCalculator<'a> {
        &self.calc
    }

    /// The input pair the point will be resolved from.
    pub fn input_for(point: &StatePoint) -> PsychroResult<StateInput> {
        match point.input {
            Some(input) => Ok(input),
            None => StateInput::from_properties(&point.id, &point.properties),
        }
    }

    /// Resolve a fresh point defined only by `input`.
    pub fn resolve_input(
        &self,
        id: impl Into<String>,
        input: StateInput,
        options: ResolveOptions,
    ) -> PsychroResult<Resolution> {
        self.resolve(&StatePoint::new(id).with_input(input), options)
    }

    /// Compute all properties for `point`.
    ///
    /// Returns a completed copy; fields the caller supplied are kept verbatim
    /// and compared against the computed value.
    pub fn resolve(&self, point: &StatePoint, options: ResolveOptions) -> PsychroResult<Resolution> {
        let input = Self::input_for(point)?;
        let supplied_wet_bulb = point.properties.wet_bulb.is_some();
        let computed = self.compute(input, options.wet_bulb || supplied_wet_bulb)?;

        let tol = self.consistency_tolerances();
        let mut properties = point.properties;
        let mut diagnostics = Vec::new();
        for property in Property::ALL {
            let Some(value) = computed.get(property) else {
                continue;
            };
            let slot = properties.slot(property);
            match *slot {
                None => *slot = Some(value),
                Some(supplied) if !nearly_equal(supplied, value, tol) => {
                    let diag = Diagnostic::Inconsistent {
                        point: point.id.clone(),
                        property,
                        supplied,
                        computed: value,
                    };
                    tracing::warn!("{diag}");
                    diagnostics.push(diag);
                }
                Some(_) => {}
            }
        }

        tracing::debug!(
            point = %point.id,
            input = input.label(),
            warnings = diagnostics.len(),
            "resolved state point"
        );

        let mut resolved = point.clone();
        resolved.input = Some(input);
        resolved.properties = properties;
        Ok(Resolution {
            point: resolved,
            diagnostics,
        })
    }

    fn consistency_tolerances(&self) -> Tolerances {
        let tol = self.calc.constants().convergence_tolerance;
        Tolerances {
            abs: tol,
            rel: tol * CONSISTENCY_SCALE,
        }
    }

    fn compute(&self, input: StateInput, want_wet_bulb: bool) -> PsychroResult<Properties> {
        let calc = &self.calc;
        let t = input.dry_bulb();

        let (w, rh, wet_bulb) = match input {
            StateInput::DryBulbRh {
                relative_humidity, ..
            } => (
                calc.absolute_humidity(t, relative_humidity)?,
                Some(relative_humidity),
                None,
            ),
            StateInput::DryBulbWetBulb { wet_bulb, .. } => {
                (calc.humidity_from_wet_bulb(t, wet_bulb)?, None, Some(wet_bulb))
            }
            StateInput::DryBulbHumidity { humidity, .. } => (humidity, None, None),
            StateInput::DryBulbEnthalpy { enthalpy, .. } => {
                (calc.humidity_from_enthalpy(t, enthalpy)?, None, None)
            }
        };

        let relative_humidity = match rh {
            Some(rh) => rh,
            None => calc.relative_humidity(t, w)?,
        };
        let enthalpy = match input {
            StateInput::DryBulbEnthalpy { enthalpy, .. } => {
                // range-checks t and w
                calc.enthalpy(t, w)?;
                enthalpy
            }
            _ => calc.enthalpy(t, w)?,
        };
        // bone-dry or extremely dry air has no dew point in the band
        let dew_point = calc.dew_point_if_defined(w)?;
        let specific_volume = calc.specific_volume(t, w)?;
        let wet_bulb = match wet_bulb {
            Some(wb) => Some(wb),
            None if want_wet_bulb => Some(calc.wet_bulb_from_humidity(t, w)?),
            None => None,
        };

        Ok(Properties {
            dry_bulb: Some(t),
            wet_bulb,
            relative_humidity: Some(relative_humidity),
            humidity: Some(w),
            enthalpy: Some(enthalpy),
            dew_point,
            specific_volume: Some(specific_volume),
        })
    }
}
