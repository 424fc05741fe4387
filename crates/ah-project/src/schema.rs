//! Design document schema.

use ah_core::units::as_kpa;
use ah_core::units::constants::pressure_at_altitude;
use ah_process::{AirStream, BalanceSettings, Process};
use ah_psychro::{PsychrometricConstants, Season, StateInput, StatePoint};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignDocument {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub conditions: DesignConditions,
    /// Overrides for the standard constants; any omitted field keeps its standard value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constants: Option<PsychrometricConstants>,
    #[serde(default)]
    pub balance: BalanceSettings,
    #[serde(default)]
    pub state_points: Vec<StatePoint>,
    #[serde(default)]
    pub processes: Vec<Process>,
    #[serde(default)]
    pub air_streams: Vec<AirStream>,
}

impl DesignDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            conditions: DesignConditions::default(),
            constants: None,
            balance: BalanceSettings::default(),
            state_points: Vec::new(),
            processes: Vec::new(),
            air_streams: Vec::new(),
        }
    }

    /// Constants in effect for this document.
    pub fn effective_constants(&self) -> PsychrometricConstants {
        self.constants
            .clone()
            .unwrap_or_else(PsychrometricConstants::standard)
    }

    pub fn point(&self, id: &str) -> Option<&StatePoint> {
        self.state_points.iter().find(|p| p.id == id)
    }

    pub fn process(&self, id: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }
}

/// Site conditions shared by every calculation in the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DesignConditions {
    /// Atmospheric pressure [kPa].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    /// Site elevation [m], used when no pressure is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summer: Option<SeasonConditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winter: Option<SeasonConditions>,
}

impl DesignConditions {
    /// Explicit pressure, else the standard atmosphere at the site altitude,
    /// else `standard` [kPa].
    pub fn resolved_pressure(&self, standard: f64) -> f64 {
        match (self.pressure, self.altitude) {
            (Some(p), _) => p,
            (None, Some(z)) => as_kpa(pressure_at_altitude(z)),
            (None, None) => standard,
        }
    }

    pub fn season(&self, season: Season) -> Option<&SeasonConditions> {
        match season {
            Season::Summer => self.summer.as_ref(),
            Season::Winter => self.winter.as_ref(),
            Season::Both => None,
        }
    }
}

/// Outdoor and indoor design states for one season.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeasonConditions {
    pub outdoor: StateInput,
    pub indoor: StateInput,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pressure_resolution_order() {
        let mut c = DesignConditions::default();
        assert_eq!(c.resolved_pressure(101.325), 101.325);

        c.altitude = Some(1500.0);
        let p = c.resolved_pressure(101.325);
        assert!((p - 84.56).abs() < 0.05, "p={p}");

        c.pressure = Some(95.0);
        assert_eq!(c.resolved_pressure(101.325), 95.0);
    }

    #[test]
    fn partial_constants_block() {
        let yaml = "version: 1\nname: Site\nconstants:\n  convergence_tolerance: 1.0e-9\n";
        let doc: DesignDocument = serde_yaml::from_str(yaml).unwrap();
        let c = doc.effective_constants();
        assert_eq!(c.convergence_tolerance, 1e-9);
        assert_eq!(c.cp_air, PsychrometricConstants::standard().cp_air);
        assert_eq!(doc.balance, BalanceSettings::default());
    }

    #[test]
    fn season_lookup() {
        let c = DesignConditions {
            summer: Some(SeasonConditions {
                outdoor: StateInput::DryBulbRh {
                    dry_bulb: 33.0,
                    relative_humidity: 55.0,
                },
                indoor: StateInput::DryBulbRh {
                    dry_bulb: 26.0,
                    relative_humidity: 50.0,
                },
            }),
            ..Default::default()
        };
        assert!(c.season(Season::Summer).is_some());
        assert!(c.season(Season::Winter).is_none());
        assert!(c.season(Season::Both).is_none());
    }

    proptest! {
        #[test]
        fn higher_sites_have_lower_pressure(z in -400.0_f64..9000.0, dz in 10.0_f64..1000.0) {
            let low = DesignConditions { altitude: Some(z), ..Default::default() };
            let high = DesignConditions { altitude: Some(z + dz), ..Default::default() };
            prop_assert!(high.resolved_pressure(101.325) < low.resolved_pressure(101.325));
        }
    }
}
