//! Process definitions and results.

use ah_psychro::Season;
use serde::{Deserialize, Serialize};

/// Coil duty: either a capacity or a target leaving temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "duty", rename_all = "snake_case")]
pub enum CoilDuty {
    /// Coil capacity [kW], magnitude of heat added (heating) or removed (cooling).
    Capacity { capacity: f64 },
    /// Leaving dry-bulb temperature [°C].
    OutletTemperature { temperature: f64 },
}

/// Heating or cooling coil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoilParams {
    /// Air volume flow [m³/h] at inlet conditions.
    pub airflow: f64,
    #[serde(flatten)]
    pub duty: CoilDuty,
    /// Sensible heat factor (cooling only), defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shf: Option<f64>,
    /// Coil water temperature difference [K]; enables the water flow result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_temp_diff: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidifierType {
    /// Steam injection; adds the vapor's enthalpy.
    Steam,
    /// Evaporative / sorption; adiabatic.
    Water,
}

/// Humidifier or dehumidifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoistureParams {
    /// Air volume flow [m³/h] at inlet conditions.
    pub airflow: f64,
    /// Water added or removed [kg/h].
    pub capacity: f64,
    pub humidifier: HumidifierType,
}

/// Share of one stream in a mix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum MixingShare {
    /// Volume flow [m³/h].
    Airflow { airflow: f64 },
    /// Volumetric fraction of the combined flow.
    Ratio { ratio: f64 },
}

/// Mix of the process's `from` point with a second upstream point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixingParams {
    pub from_share: MixingShare,
    pub with_point: String,
    pub with_share: MixingShare,
}

/// Heat-recovery effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum ExchangerEfficiency {
    /// One effectiveness for temperature and humidity.
    Total { efficiency: f64 },
    /// Separate sensible and latent effectiveness.
    Split { sensible: f64, latent: f64 },
}

impl ExchangerEfficiency {
    pub fn sensible(&self) -> f64 {
        match *self {
            Self::Total { efficiency } => efficiency,
            Self::Split { sensible, .. } => sensible,
        }
    }

    pub fn latent(&self) -> f64 {
        match *self {
            Self::Total { efficiency } => efficiency,
            Self::Split { latent, .. } => latent,
        }
    }
}

/// Air-to-air heat exchanger between the supply (`from`) and an exhaust point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatExchangeParams {
    pub efficiency: ExchangerEfficiency,
    pub exhaust_point: String,
    /// Supply-side volume flow [m³/h].
    pub supply_airflow: f64,
    /// Exhaust-side volume flow [m³/h].
    pub exhaust_airflow: f64,
}

/// Motor heat picked up across a fan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanParams {
    /// Fan shaft power [kW].
    pub fan_power: f64,
    /// Fan efficiency in [0, 1].
    pub fan_efficiency: f64,
    /// Air volume flow [m³/h].
    pub airflow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirSupplyParams {
    /// Supply volume flow [m³/h].
    pub airflow: f64,
}

/// Process type together with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessKind {
    Heating(CoilParams),
    Cooling(CoilParams),
    Humidifying(MoistureParams),
    Dehumidifying(MoistureParams),
    Mixing(MixingParams),
    HeatExchange(HeatExchangeParams),
    FanHeating(FanParams),
    AirSupply(AirSupplyParams),
}

impl ProcessKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Heating(_) => "heating",
            Self::Cooling(_) => "cooling",
            Self::Humidifying(_) => "humidifying",
            Self::Dehumidifying(_) => "dehumidifying",
            Self::Mixing(_) => "mixing",
            Self::HeatExchange(_) => "heat exchange",
            Self::FanHeating(_) => "fan heating",
            Self::AirSupply(_) => "air supply",
        }
    }
}

/// Energy and mass balance of an applied process.
///
/// Heat values are signed, positive when heat is added to the air stream.
/// Differences are `to - from`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessResults {
    /// [kW]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensible_heat: Option<f64>,
    /// [kW]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latent_heat: Option<f64>,
    /// [kW]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_heat: Option<f64>,
    /// [kJ/kg']
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enthalpy_diff: Option<f64>,
    /// [kg/kg']
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_diff: Option<f64>,
    /// [K]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_diff: Option<f64>,
    /// Dry-air mass flow [kg/s]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_flow: Option<f64>,
    /// Coil water flow [L/min]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_flow: Option<f64>,
}

/// One step of the air-handling sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub season: Season,
    #[serde(default)]
    pub order: u32,
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub kind: ProcessKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ProcessResults>,
}

impl Process {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        kind: ProcessKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            season: Season::Both,
            order: 0,
            from: from.into(),
            to: to.into(),
            kind,
            results: None,
        }
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Every state point id this process reads.
    pub fn upstream_ids(&self) -> Vec<&str> {
        let mut ids = vec![self.from.as_str()];
        match &self.kind {
            ProcessKind::Mixing(p) => ids.push(p.with_point.as_str()),
            ProcessKind::HeatExchange(p) => ids.push(p.exhaust_point.as_str()),
            _ => {}
        }
        ids
    }
}
