//! Air streams and the supply/exhaust balance check.

use ah_core::relative_deviation;
use ah_core::units::{as_kgph, m3ph, mass_flow_from_airflow};
use ah_psychro::{Season, StatePoint};
use serde::{Deserialize, Serialize};

/// Role of a stream in the air-handling unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    /// Outdoor air intake.
    #[serde(rename = "OA")]
    Outdoor,
    /// Supply air to the space.
    #[serde(rename = "SA")]
    Supply,
    /// Return air from the space.
    #[serde(rename = "RA")]
    Return,
    /// Exhaust air.
    #[serde(rename = "EA")]
    Exhaust,
    /// Relief exhaust air.
    #[serde(rename = "REA")]
    Relief,
    /// Toilet exhaust air.
    #[serde(rename = "TEA")]
    ToiletExhaust,
    Mixed,
    Intermediate,
}

impl StreamKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Outdoor => "OA",
            Self::Supply => "SA",
            Self::Return => "RA",
            Self::Exhaust => "EA",
            Self::Relief => "REA",
            Self::ToiletExhaust => "TEA",
            Self::Mixed => "Mixed",
            Self::Intermediate => "Intermediate",
        }
    }

    fn is_exhaust(self) -> bool {
        matches!(self, Self::Exhaust | Self::Relief | Self::ToiletExhaust)
    }
}

/// A named air flow attached to a state point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirStream {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub kind: StreamKind,
    /// Volume flow [m³/h].
    pub airflow: f64,
    /// Declared dry-air mass flow [kg/h], checked against the point density.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_flow: Option<f64>,
    /// State point carried by this stream.
    pub point: String,
    #[serde(default)]
    pub season: Season,
}

impl AirStream {
    pub fn new(
        id: impl Into<String>,
        kind: StreamKind,
        airflow: f64,
        point: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            airflow,
            mass_flow: None,
            point: point.into(),
            season: Season::Both,
        }
    }

    pub fn with_mass_flow(mut self, mass_flow: f64) -> Self {
        self.mass_flow = Some(mass_flow);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSettings {
    /// Allowed relative mismatch between compared flows.
    pub relative_threshold: f64,
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self {
            relative_threshold: 0.05,
        }
    }
}

/// Totals by stream role [m³/h] and the findings on them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AirflowBalance {
    pub total_supply: f64,
    pub total_exhaust: f64,
    pub total_intake: f64,
    pub total_return: f64,
    pub balanced: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl AirflowBalance {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Sum the streams by role and compare supply against exhaust.
pub fn validate_balance(streams: &[AirStream], settings: &BalanceSettings) -> AirflowBalance {
    let mut balance = AirflowBalance::default();
    let threshold = settings.relative_threshold;

    for stream in streams {
        if !stream.airflow.is_finite() || stream.airflow < 0.0 {
            balance.errors.push(format!(
                "stream '{}' has invalid airflow {}",
                stream.id, stream.airflow
            ));
            continue;
        }
        match stream.kind {
            StreamKind::Supply => balance.total_supply += stream.airflow,
            StreamKind::Outdoor => balance.total_intake += stream.airflow,
            StreamKind::Return => balance.total_return += stream.airflow,
            kind if kind.is_exhaust() => balance.total_exhaust += stream.airflow,
            _ => {}
        }
    }

    let supply = balance.total_supply;
    let exhaust = balance.total_exhaust;
    match relative_deviation(exhaust, supply) {
        None => balance.errors.push("no supply air defined".to_string()),
        Some(dev) if dev <= threshold => balance.balanced = true,
        Some(dev) => balance.errors.push(format!(
            "supply {supply:.1} m³/h and exhaust {exhaust:.1} m³/h differ by {:.1}%",
            dev * 100.0
        )),
    }

    let intake = balance.total_intake;
    if intake > 0.0 || exhaust > 0.0 {
        let dev = relative_deviation(intake, exhaust).unwrap_or(f64::INFINITY);
        if dev > threshold {
            balance.warnings.push(format!(
                "outdoor intake {intake:.1} m³/h does not match exhaust {exhaust:.1} m³/h"
            ));
        }
    }

    let recirculated = intake + balance.total_return;
    if supply > 0.0 {
        if let Some(dev) = relative_deviation(recirculated, supply) {
            if dev > threshold {
                balance.warnings.push(format!(
                    "supply {supply:.1} m³/h does not match intake plus return {recirculated:.1} m³/h"
                ));
            }
        }
    }

    for message in &balance.warnings {
        tracing::warn!("airflow balance: {message}");
    }
    tracing::debug!(
        supply,
        exhaust,
        intake,
        balanced = balance.balanced,
        errors = balance.errors.len(),
        "validated airflow balance"
    );
    balance
}

/// Dry-air mass flow [kg/h] implied by the stream's airflow at `point`.
///
/// `None` when the point has no specific volume yet.
pub fn expected_mass_flow(stream: &AirStream, point: &StatePoint) -> Option<f64> {
    let v = point.properties.specific_volume.filter(|v| *v > 0.0)?;
    Some(as_kgph(mass_flow_from_airflow(m3ph(stream.airflow), v)))
}

/// Compare declared stream mass flows with the value implied by their points.
///
/// Returns one message per problem.
pub fn check_mass_flows(
    streams: &[AirStream],
    points: &[StatePoint],
    settings: &BalanceSettings,
) -> Vec<String> {
    let mut errors = Vec::new();
    for stream in streams {
        let Some(declared) = stream.mass_flow else {
            continue;
        };
        let Some(point) = points.iter().find(|p| p.id == stream.point) else {
            errors.push(format!(
                "stream '{}' references unknown state point '{}'",
                stream.id, stream.point
            ));
            continue;
        };
        let Some(expected) = expected_mass_flow(stream, point) else {
            errors.push(format!(
                "stream '{}': state point '{}' is not resolved",
                stream.id, stream.point
            ));
            continue;
        };
        let dev = relative_deviation(declared, expected).unwrap_or(f64::INFINITY);
        if dev > settings.relative_threshold {
            errors.push(format!(
                "stream '{}': mass flow {declared:.1} kg/h differs from expected {expected:.1} kg/h",
                stream.id
            ));
        }
    }
    errors
}
