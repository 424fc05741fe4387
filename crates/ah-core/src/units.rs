// ah-core/src/units.rs
//
// Psychrometric quantities (°C, kJ/kg', kg/kg') stay plain f64 in the
// engine; uom covers the airflow and pressure conversions (m³/h, kg/s, kPa).

use uom::si::f64::{
    MassDensity as UomMassDensity, MassRate as UomMassRate, Pressure as UomPressure,
    VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

#[inline]
pub fn m3ph(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_hour;
    VolumeRate::new::<cubic_meter_per_hour>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

/// Dry-air mass flow carried by a volumetric airflow at the given specific volume [m³/kg'].
pub fn mass_flow_from_airflow(airflow: VolumeRate, specific_volume: f64) -> MassRate {
    airflow * kg_per_m3(1.0 / specific_volume)
}

/// Mass flow [kg/s] as a plain number.
#[inline]
pub fn as_kgps(m: MassRate) -> f64 {
    use uom::si::mass_rate::kilogram_per_second;
    m.get::<kilogram_per_second>()
}

/// Mass flow [kg/h] as a plain number.
#[inline]
pub fn as_kgph(m: MassRate) -> f64 {
    use uom::si::mass_rate::kilogram_per_hour;
    m.get::<kilogram_per_hour>()
}

/// Pressure [kPa] as a plain number.
#[inline]
pub fn as_kpa(p: Pressure) -> f64 {
    use uom::si::pressure::kilopascal;
    p.get::<kilopascal>()
}

pub mod constants {
    use super::*;

    pub const STANDARD_PRESSURE_KPA: f64 = 101.325;

    /// Standard-atmosphere pressure at an elevation above sea level [m].
    pub fn pressure_at_altitude(altitude_m: f64) -> Pressure {
        kpa(STANDARD_PRESSURE_KPA * (1.0 - 2.25577e-5 * altitude_m).powf(5.2559))
    }
}
