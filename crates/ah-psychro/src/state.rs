//! State point definitions.

use crate::error::{PsychroError, PsychroResult};
use serde::{Deserialize, Serialize};

/// Design season a state point or process belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Summer,
    Winter,
    #[default]
    Both,
}

impl Season {
    /// True when an item tagged `self` takes part in an evaluation for `season`.
    pub fn applies_to(self, season: Season) -> bool {
        self == Season::Both || season == Season::Both || self == season
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Summer => "summer",
            Self::Winter => "winter",
            Self::Both => "both",
        }
    }
}

/// The independent pair a state point is defined by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pair", rename_all = "snake_case")]
pub enum StateInput {
    /// Dry bulb [°C] and relative humidity [%].
    DryBulbRh { dry_bulb: f64, relative_humidity: f64 },
    /// Dry bulb and wet bulb [°C].
    DryBulbWetBulb { dry_bulb: f64, wet_bulb: f64 },
    /// Dry bulb [°C] and humidity ratio [kg/kg'].
    DryBulbHumidity { dry_bulb: f64, humidity: f64 },
    /// Dry bulb [°C] and enthalpy [kJ/kg'].
    DryBulbEnthalpy { dry_bulb: f64, enthalpy: f64 },
}

impl StateInput {
    pub fn dry_bulb(&self) -> f64 {
        match *self {
            Self::DryBulbRh { dry_bulb, .. }
            | Self::DryBulbWetBulb { dry_bulb, .. }
            | Self::DryBulbHumidity { dry_bulb, .. }
            | Self::DryBulbEnthalpy { dry_bulb, .. } => dry_bulb,
        }
    }

    /// The non-dry-bulb member of the pair and its value.
    pub fn second(&self) -> (Property, f64) {
        match *self {
            Self::DryBulbRh {
                relative_humidity, ..
            } => (Property::RelativeHumidity, relative_humidity),
            Self::DryBulbWetBulb { wet_bulb, .. } => (Property::WetBulb, wet_bulb),
            Self::DryBulbHumidity { humidity, .. } => (Property::Humidity, humidity),
            Self::DryBulbEnthalpy { enthalpy, .. } => (Property::Enthalpy, enthalpy),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DryBulbRh { .. } => "dry bulb + RH",
            Self::DryBulbWetBulb { .. } => "dry bulb + wet bulb",
            Self::DryBulbHumidity { .. } => "dry bulb + humidity",
            Self::DryBulbEnthalpy { .. } => "dry bulb + enthalpy",
        }
    }

    /// Infer the input pair from populated primary fields.
    ///
    /// Dry bulb must be present together with exactly one of relative
    /// humidity, wet bulb, humidity or enthalpy. Derived-only fields (dew
    /// point, specific volume) are ignored.
    pub fn from_properties(point: &str, props: &Properties) -> PsychroResult<Self> {
        let Some(dry_bulb) = props.dry_bulb else {
            return Err(PsychroError::AmbiguousInput {
                point: point.to_string(),
                what: "dry bulb temperature is required".to_string(),
            });
        };

        let candidates = [
            (Property::RelativeHumidity, props.relative_humidity),
            (Property::WetBulb, props.wet_bulb),
            (Property::Humidity, props.humidity),
            (Property::Enthalpy, props.enthalpy),
        ];
        let present: Vec<(Property, f64)> = candidates
            .into_iter()
            .filter_map(|(p, v)| v.map(|v| (p, v)))
            .collect();

        match present.as_slice() {
            [(Property::RelativeHumidity, rh)] => Ok(Self::DryBulbRh {
                dry_bulb,
                relative_humidity: *rh,
            }),
            [(Property::WetBulb, wb)] => Ok(Self::DryBulbWetBulb {
                dry_bulb,
                wet_bulb: *wb,
            }),
            [(Property::Humidity, w)] => Ok(Self::DryBulbHumidity {
                dry_bulb,
                humidity: *w,
            }),
            [(Property::Enthalpy, h)] => Ok(Self::DryBulbEnthalpy {
                dry_bulb,
                enthalpy: *h,
            }),
            [] => Err(PsychroError::AmbiguousInput {
                point: point.to_string(),
                what: "a second property is required besides dry bulb".to_string(),
            }),
            many => {
                let names: Vec<&str> = many.iter().map(|(p, _)| p.label()).collect();
                Err(PsychroError::AmbiguousInput {
                    point: point.to_string(),
                    what: format!("more than one second property given: {}", names.join(", ")),
                })
            }
        }
    }
}

/// Named moist-air properties carried by a state point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    DryBulb,
    WetBulb,
    RelativeHumidity,
    Humidity,
    Enthalpy,
    DewPoint,
    SpecificVolume,
}

impl Property {
    pub const ALL: [Property; 7] = [
        Property::DryBulb,
        Property::WetBulb,
        Property::RelativeHumidity,
        Property::Humidity,
        Property::Enthalpy,
        Property::DewPoint,
        Property::SpecificVolume,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::DryBulb => "dry bulb",
            Self::WetBulb => "wet bulb",
            Self::RelativeHumidity => "relative humidity",
            Self::Humidity => "humidity",
            Self::Enthalpy => "enthalpy",
            Self::DewPoint => "dew point",
            Self::SpecificVolume => "specific volume",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::DryBulb | Self::WetBulb | Self::DewPoint => "°C",
            Self::RelativeHumidity => "%",
            Self::Humidity => "kg/kg'",
            Self::Enthalpy => "kJ/kg'",
            Self::SpecificVolume => "m³/kg'",
        }
    }
}

/// Moist-air properties; `None` means "not given / not yet computed".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Properties {
    /// Dry-bulb temperature [°C]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_bulb: Option<f64>,
    /// Wet-bulb temperature [°C]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wet_bulb: Option<f64>,
    /// Relative humidity [%]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_humidity: Option<f64>,
    /// Humidity ratio [kg/kg']
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Specific enthalpy [kJ/kg']
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enthalpy: Option<f64>,
    /// Dew point [°C]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dew_point: Option<f64>,
    /// Specific volume [m³/kg']
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_volume: Option<f64>,
}

impl Properties {
    pub fn get(&self, property: Property) -> Option<f64> {
        match property {
            Property::DryBulb => self.dry_bulb,
            Property::WetBulb => self.wet_bulb,
            Property::RelativeHumidity => self.relative_humidity,
            Property::Humidity => self.humidity,
            Property::Enthalpy => self.enthalpy,
            Property::DewPoint => self.dew_point,
            Property::SpecificVolume => self.specific_volume,
        }
    }

    pub fn slot(&mut self, property: Property) -> &mut Option<f64> {
        match property {
            Property::DryBulb => &mut self.dry_bulb,
            Property::WetBulb => &mut self.wet_bulb,
            Property::RelativeHumidity => &mut self.relative_humidity,
            Property::Humidity => &mut self.humidity,
            Property::Enthalpy => &mut self.enthalpy,
            Property::DewPoint => &mut self.dew_point,
            Property::SpecificVolume => &mut self.specific_volume,
        }
    }
}

/// An air condition at one point of the duct/coil sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePoint {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub season: Season,
    #[serde(default)]
    pub order: u32,
    /// Authoritative input pair; inferred from `properties` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<StateInput>,
    #[serde(default)]
    pub properties: Properties,
}

impl StatePoint {
    /// Empty point with only identity set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            season: Season::Both,
            order: 0,
            input: None,
            properties: Properties::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }

    pub fn with_input(mut self, input: StateInput) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// All properties needed downstream are present.
    pub fn is_resolved(&self) -> bool {
        let p = &self.properties;
        p.dry_bulb.is_some()
            && p.relative_humidity.is_some()
            && p.humidity.is_some()
            && p.enthalpy.is_some()
            && p.specific_volume.is_some()
    }

    /// Whether the point carries any input the resolver could work from.
    pub fn has_input(&self) -> bool {
        self.input.is_some() || self.properties.dry_bulb.is_some()
    }

    /// Dry-air density [kg'/m³], the inverse of specific volume.
    pub fn density(&self) -> Option<f64> {
        self.properties
            .specific_volume
            .filter(|v| *v > 0.0)
            .map(|v| 1.0 / v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_matching() {
        assert!(Season::Both.applies_to(Season::Summer));
        assert!(Season::Winter.applies_to(Season::Winter));
        assert!(!Season::Winter.applies_to(Season::Summer));
        assert!(Season::Summer.applies_to(Season::Both));
    }

    #[test]
    fn infer_dry_bulb_rh() {
        let props = Properties {
            dry_bulb: Some(26.0),
            relative_humidity: Some(50.0),
            dew_point: Some(15.0),
            ..Default::default()
        };
        let input = StateInput::from_properties("p1", &props).unwrap();
        assert_eq!(
            input,
            StateInput::DryBulbRh {
                dry_bulb: 26.0,
                relative_humidity: 50.0
            }
        );
    }

    #[test]
    fn infer_rejects_missing_dry_bulb() {
        let props = Properties {
            relative_humidity: Some(50.0),
            humidity: Some(0.01),
            ..Default::default()
        };
        assert!(matches!(
            StateInput::from_properties("p1", &props),
            Err(PsychroError::AmbiguousInput { .. })
        ));
    }

    #[test]
    fn infer_rejects_two_second_properties() {
        let props = Properties {
            dry_bulb: Some(26.0),
            relative_humidity: Some(50.0),
            wet_bulb: Some(18.7),
            ..Default::default()
        };
        let err = StateInput::from_properties("p1", &props).unwrap_err();
        assert!(err.to_string().contains("relative humidity"));
        assert!(err.to_string().contains("wet bulb"));
    }

    #[test]
    fn infer_rejects_lone_dry_bulb() {
        let props = Properties {
            dry_bulb: Some(26.0),
            ..Default::default()
        };
        assert!(StateInput::from_properties("p1", &props).is_err());
    }

    #[test]
    fn density_is_inverse_specific_volume() {
        let mut point = StatePoint::new("p");
        assert_eq!(point.density(), None);
        point.properties.specific_volume = Some(0.8);
        assert!((point.density().unwrap() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn serde_keeps_optional_fields() {
        let point = StatePoint::new("oa")
            .with_name("Outdoor air")
            .with_season(Season::Summer)
            .with_input(StateInput::DryBulbWetBulb {
                dry_bulb: 33.0,
                wet_bulb: 27.0,
            })
            .with_properties(Properties {
                dry_bulb: Some(33.0),
                dew_point: Some(25.1),
                ..Default::default()
            });
        let json = serde_json::to_string(&point).unwrap();
        assert!(!json.contains("specific_volume"));
        let back: StatePoint = serde_json::from_str(&json).unwrap();
        assert_eq!(point, back);
    }
}
