//! Process engine: computes the downstream state of each process type.
//!
//! Every handler derives the outlet dry bulb and humidity ratio, then hands
//! them to the [`StatePointResolver`] so process outputs are completed the same
//! way as caller-defined points.

use crate::common::{
    EPSILON_RATIO, require_finite, require_fraction, require_non_negative, require_positive,
};
use crate::error::{ProcessError, ProcessResult};
use crate::process::{
    AirSupplyParams, CoilDuty, CoilParams, FanParams, HeatExchangeParams, HumidifierType,
    MixingParams, MixingShare, MoistureParams, Process, ProcessKind, ProcessResults,
};
use ah_core::units::{as_kgps, m3ph, mass_flow_from_airflow};
use ah_psychro::{
    Diagnostic, PropertyCalculator, ResolveOptions, StateInput, StatePoint, StatePointResolver,
};

/// Specific heat of liquid water for the coil water-flow estimate [kJ/(kg·K)].
const WATER_SPECIFIC_HEAT: f64 = 4.186;

/// Steam supplied by a steam humidifier is taken at this temperature [°C].
const STEAM_TEMPERATURE: f64 = 100.0;

/// Outcome of applying one process.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub to_point: StatePoint,
    pub results: ProcessResults,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolved inlet conditions a handler works from.
#[derive(Debug, Clone, Copy)]
struct Inlet {
    t: f64,
    w: f64,
    h: f64,
    v: f64,
}

impl Inlet {
    fn of(point: &StatePoint) -> ProcessResult<Self> {
        let p = &point.properties;
        let unresolved = || ProcessError::UpstreamUnresolved {
            point: point.id.clone(),
        };
        if !point.is_resolved() {
            return Err(unresolved());
        }
        match (p.dry_bulb, p.humidity, p.enthalpy, p.specific_volume) {
            (Some(t), Some(w), Some(h), Some(v)) => Ok(Self { t, w, h, v }),
            _ => Err(unresolved()),
        }
    }
}

/// Outlet state derived by a handler, before completion.
#[derive(Debug, Clone, Copy)]
struct Outlet {
    t: f64,
    w: f64,
    results: ProcessResults,
}

/// Applies processes to resolved upstream points.
#[derive(Debug, Clone, Copy)]
pub struct ProcessEngine<'a> {
    resolver: StatePointResolver<'a>,
    options: ResolveOptions,
}

impl<'a> ProcessEngine<'a> {
    pub fn new(resolver: StatePointResolver<'a>) -> Self {
        Self {
            resolver,
            options: ResolveOptions::default(),
        }
    }

    /// Resolve options used when completing outlet points.
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolver(&self) -> &StatePointResolver<'a> {
        &self.resolver
    }

    fn calc(&self) -> &PropertyCalculator<'a> {
        self.resolver.calculator()
    }

    /// Apply `process` given the resolved points it reads.
    ///
    /// `target`, when given, is the caller's existing `to` point; its identity
    /// is kept and any values it already carries are checked against the
    /// computed outlet.
    pub fn apply(
        &self,
        process: &Process,
        upstream: &[StatePoint],
        target: Option<&StatePoint>,
    ) -> ProcessResult<Applied> {
        if process.upstream_ids().contains(&process.to.as_str()) {
            return Err(ProcessError::invalid(
                &process.id,
                format!("'to' point '{}' is also an upstream point", process.to),
            ));
        }

        let from = Inlet::of(find_point(upstream, &process.from)?)?;
        let outlet = match &process.kind {
            ProcessKind::Heating(p) => self.heating(process, from, p)?,
            ProcessKind::Cooling(p) => self.cooling(process, from, p)?,
            ProcessKind::Humidifying(p) => self.moisture(process, from, p, true)?,
            ProcessKind::Dehumidifying(p) => self.moisture(process, from, p, false)?,
            ProcessKind::Mixing(p) => {
                let other = Inlet::of(find_point(upstream, &p.with_point)?)?;
                self.mixing(process, from, other, p)?
            }
            ProcessKind::HeatExchange(p) => {
                let exhaust = Inlet::of(find_point(upstream, &p.exhaust_point)?)?;
                self.heat_exchange(process, from, exhaust, p)?
            }
            ProcessKind::FanHeating(p) => self.fan_heating(process, from, p)?,
            ProcessKind::AirSupply(p) => self.air_supply(process, from, p)?,
        };

        let resolution = self.complete(process, target, outlet)?;

        tracing::debug!(
            process = %process.id,
            kind = process.kind.label(),
            from = %process.from,
            to = %process.to,
            t_out = outlet.t,
            w_out = outlet.w,
            "applied process"
        );

        Ok(Applied {
            to_point: resolution.point,
            results: outlet.results,
            diagnostics: resolution.diagnostics,
        })
    }

    fn complete(
        &self,
        process: &Process,
        target: Option<&StatePoint>,
        outlet: Outlet,
    ) -> ProcessResult<ah_psychro::Resolution> {
        let mut point = match target {
            Some(existing) => {
                if existing.id != process.to {
                    return Err(ProcessError::invalid(
                        &process.id,
                        format!(
                            "target point '{}' does not match 'to' point '{}'",
                            existing.id, process.to
                        ),
                    ));
                }
                existing.clone()
            }
            None => StatePoint::new(process.to.clone()).with_season(process.season),
        };

        // A previous input pair on the target becomes a pair of supplied
        // values, so a conflicting definition surfaces as a diagnostic.
        if let Some(previous) = point.input.take() {
            point.properties.dry_bulb.get_or_insert(previous.dry_bulb());
            let (property, value) = previous.second();
            point.properties.slot(property).get_or_insert(value);
        }

        point.input = Some(StateInput::DryBulbHumidity {
            dry_bulb: outlet.t,
            humidity: outlet.w,
        });
        Ok(self.resolver.resolve(&point, self.options)?)
    }

    fn mass_flow(
        &self,
        process: &Process,
        field: &str,
        airflow: f64,
        v: f64,
    ) -> ProcessResult<f64> {
        let airflow = require_positive(&process.id, field, airflow)?;
        Ok(as_kgps(mass_flow_from_airflow(m3ph(airflow), v)))
    }

    fn water_flow(
        &self,
        process: &Process,
        water_temp_diff: Option<f64>,
        total_kw: f64,
    ) -> ProcessResult<Option<f64>> {
        let Some(dt) = water_temp_diff else {
            return Ok(None);
        };
        let dt = require_positive(&process.id, "water_temp_diff", dt)?;
        // kg/s of water -> L/min
        Ok(Some(total_kw.abs() / (WATER_SPECIFIC_HEAT * dt) * 60.0))
    }

    fn heating(&self, process: &Process, from: Inlet, p: &CoilParams) -> ProcessResult<Outlet> {
        if p.shf.is_some() {
            return Err(ProcessError::invalid(
                &process.id,
                "shf applies to cooling coils only",
            ));
        }
        let m = self.mass_flow(process, "airflow", p.airflow, from.v)?;
        let cp = self.calc().humid_specific_heat(from.w)?;

        let dt = match p.duty {
            CoilDuty::Capacity { capacity } => {
                require_non_negative(&process.id, "capacity", capacity)? / (m * cp)
            }
            CoilDuty::OutletTemperature { temperature } => {
                let t_out = require_finite(&process.id, "temperature", temperature)?;
                if t_out < from.t {
                    return Err(ProcessError::invalid(
                        &process.id,
                        format!(
                            "heating outlet temperature {t_out} is below inlet {}",
                            from.t
                        ),
                    ));
                }
                t_out - from.t
            }
        };

        let t = from.t + dt;
        let w = from.w;
        let h = self.calc().enthalpy(t, w)?;
        let sensible = m * cp * dt;

        Ok(Outlet {
            t,
            w,
            results: ProcessResults {
                sensible_heat: Some(sensible),
                latent_heat: Some(0.0),
                total_heat: Some(sensible),
                enthalpy_diff: Some(h - from.h),
                humidity_diff: Some(0.0),
                temperature_diff: Some(dt),
                mass_flow: Some(m),
                water_flow: self.water_flow(process, p.water_temp_diff, sensible)?,
            },
        })
    }

    fn cooling(&self, process: &Process, from: Inlet, p: &CoilParams) -> ProcessResult<Outlet> {
        let shf = match p.shf {
            Some(shf) if shf.is_finite() && shf > 0.0 && shf <= 1.0 => shf,
            Some(shf) => {
                return Err(ProcessError::invalid(
                    &process.id,
                    format!("shf must be within (0, 1] (got {shf})"),
                ));
            }
            None => 1.0,
        };
        let m = self.mass_flow(process, "airflow", p.airflow, from.v)?;
        let cp = self.calc().humid_specific_heat(from.w)?;
        let latent_heat_0c = self.calc().constants().latent_heat_0c;

        // Heat removed from the air, as positive magnitudes.
        let (sensible, latent) = match p.duty {
            CoilDuty::Capacity { capacity } => {
                let total = require_non_negative(&process.id, "capacity", capacity)?;
                (total * shf, total * (1.0 - shf))
            }
            CoilDuty::OutletTemperature { temperature } => {
                let t_out = require_finite(&process.id, "temperature", temperature)?;
                if t_out > from.t {
                    return Err(ProcessError::invalid(
                        &process.id,
                        format!(
                            "cooling outlet temperature {t_out} is above inlet {}",
                            from.t
                        ),
                    ));
                }
                let sensible = m * cp * (from.t - t_out);
                let total = sensible / shf;
                (sensible, total - sensible)
            }
        };

        let dt = -sensible / (m * cp);
        let dw = -latent / (m * latent_heat_0c);
        let t = from.t + dt;
        let w = from.w + dw;
        let h = self.calc().enthalpy(t, w)?;

        Ok(Outlet {
            t,
            w,
            results: ProcessResults {
                sensible_heat: Some(-sensible),
                latent_heat: Some(-latent),
                total_heat: Some(-(sensible + latent)),
                enthalpy_diff: Some(h - from.h),
                humidity_diff: Some(dw),
                temperature_diff: Some(dt),
                mass_flow: Some(m),
                water_flow: self.water_flow(process, p.water_temp_diff, sensible + latent)?,
            },
        })
    }

    fn moisture(
        &self,
        process: &Process,
        from: Inlet,
        p: &MoistureParams,
        humidify: bool,
    ) -> ProcessResult<Outlet> {
        if !humidify && p.humidifier == HumidifierType::Steam {
            return Err(ProcessError::invalid(
                &process.id,
                "dehumidifying does not support humidifier type 'steam'",
            ));
        }
        let m = self.mass_flow(process, "airflow", p.airflow, from.v)?;
        let capacity = require_non_negative(&process.id, "capacity", p.capacity)?;

        let magnitude = capacity / 3600.0 / m;
        let dw = if humidify { magnitude } else { -magnitude };
        let w = from.w + dw;

        let c = self.calc().constants();
        let h = match p.humidifier {
            HumidifierType::Steam => {
                from.h + dw * (c.latent_heat_0c + c.cp_vapor * STEAM_TEMPERATURE)
            }
            HumidifierType::Water => from.h,
        };
        let t = self.calc().dry_bulb_from_enthalpy(h, w)?;

        Ok(Outlet {
            t,
            w,
            results: ProcessResults {
                enthalpy_diff: Some(h - from.h),
                humidity_diff: Some(dw),
                temperature_diff: Some(t - from.t),
                mass_flow: Some(m),
                ..Default::default()
            },
        })
    }

    fn mixing(
        &self,
        process: &Process,
        from: Inlet,
        other: Inlet,
        p: &MixingParams,
    ) -> ProcessResult<Outlet> {
        let id = &process.id;
        // Volumetric shares converted to dry-air mass via each inlet's specific volume.
        let (q_from, q_other, by_airflow) = match (p.from_share, p.with_share) {
            (MixingShare::Airflow { airflow: a }, MixingShare::Airflow { airflow: b }) => (
                require_non_negative(id, "from_share.airflow", a)?,
                require_non_negative(id, "with_share.airflow", b)?,
                true,
            ),
            (MixingShare::Ratio { ratio: a }, MixingShare::Ratio { ratio: b }) => {
                let a = require_fraction(id, "from_share.ratio", a)?;
                let b = require_fraction(id, "with_share.ratio", b)?;
                if (a + b - 1.0).abs() > EPSILON_RATIO {
                    return Err(ProcessError::invalid(
                        id,
                        format!("mixing ratios must sum to 1 (got {})", a + b),
                    ));
                }
                (a, b, false)
            }
            _ => {
                return Err(ProcessError::invalid(
                    id,
                    "mixing shares must both be airflows or both be ratios",
                ));
            }
        };
        if q_from + q_other <= 0.0 {
            return Err(ProcessError::invalid(id, "mixing airflow total must be positive"));
        }

        let m_from = q_from / from.v;
        let m_other = q_other / other.v;
        let m_total = m_from + m_other;
        let w = (m_from * from.w + m_other * other.w) / m_total;
        let h = (m_from * from.h + m_other * other.h) / m_total;
        let t = self.calc().dry_bulb_from_enthalpy(h, w)?;

        Ok(Outlet {
            t,
            w,
            results: ProcessResults {
                mass_flow: by_airflow.then(|| m_total / 3600.0),
                ..Default::default()
            },
        })
    }

    fn heat_exchange(
        &self,
        process: &Process,
        from: Inlet,
        exhaust: Inlet,
        p: &HeatExchangeParams,
    ) -> ProcessResult<Outlet> {
        let id = &process.id;
        let eff_sensible = require_fraction(id, "efficiency.sensible", p.efficiency.sensible())?;
        let eff_latent = require_fraction(id, "efficiency.latent", p.efficiency.latent())?;
        let m_supply = self.mass_flow(process, "supply_airflow", p.supply_airflow, from.v)?;
        let m_exhaust = self.mass_flow(process, "exhaust_airflow", p.exhaust_airflow, exhaust.v)?;

        // Rated effectiveness applies to the smaller stream.
        let scale = m_supply.min(m_exhaust) / m_supply;
        let es = eff_sensible * scale;
        let el = eff_latent * scale;

        let t = from.t - es * (from.t - exhaust.t);
        let w = from.w - el * (from.w - exhaust.w);
        let h = self.calc().enthalpy(t, w)?;

        let cp = self.calc().humid_specific_heat(from.w)?;
        let dt = t - from.t;
        let sensible = m_supply * cp * dt;
        let total = m_supply * (h - from.h);

        Ok(Outlet {
            t,
            w,
            results: ProcessResults {
                sensible_heat: Some(sensible),
                latent_heat: Some(total - sensible),
                total_heat: Some(total),
                enthalpy_diff: Some(h - from.h),
                humidity_diff: Some(w - from.w),
                temperature_diff: Some(dt),
                mass_flow: Some(m_supply),
                water_flow: None,
            },
        })
    }

    fn fan_heating(&self, process: &Process, from: Inlet, p: &FanParams) -> ProcessResult<Outlet> {
        let power = require_non_negative(&process.id, "fan_power", p.fan_power)?;
        let efficiency = require_fraction(&process.id, "fan_efficiency", p.fan_efficiency)?;
        let m = self.mass_flow(process, "airflow", p.airflow, from.v)?;
        let cp_air = self.calc().constants().cp_air;

        let heat = power * (1.0 - efficiency);
        let dt = heat / (m * cp_air);

        Ok(Outlet {
            t: from.t + dt,
            w: from.w,
            results: ProcessResults {
                sensible_heat: Some(heat),
                temperature_diff: Some(dt),
                mass_flow: Some(m),
                ..Default::default()
            },
        })
    }

    fn air_supply(
        &self,
        process: &Process,
        from: Inlet,
        p: &AirSupplyParams,
    ) -> ProcessResult<Outlet> {
        let m = self.mass_flow(process, "airflow", p.airflow, from.v)?;
        Ok(Outlet {
            t: from.t,
            w: from.w,
            results: ProcessResults {
                mass_flow: Some(m),
                ..Default::default()
            },
        })
    }
}

fn find_point<'p>(points: &'p [StatePoint], id: &str) -> ProcessResult<&'p StatePoint> {
    points
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ProcessError::UpstreamUnresolved {
            point: id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ExchangerEfficiency;
    use ah_psychro::{PsychrometricConstants, Season};

    fn with_engine<R>(f: impl FnOnce(ProcessEngine<'_>) -> R) -> R {
        let c = PsychrometricConstants::standard();
        let calc = PropertyCalculator::at_standard_pressure(&c).unwrap();
        f(ProcessEngine::new(StatePointResolver::new(calc)))
    }

    fn point(engine: &ProcessEngine<'_>, id: &str, t: f64, w: f64) -> StatePoint {
        engine
            .resolver()
            .resolve_input(
                id,
                StateInput::DryBulbHumidity {
                    dry_bulb: t,
                    humidity: w,
                },
                ResolveOptions::default(),
            )
            .unwrap()
            .point
    }

    #[test]
    fn heating_by_capacity() {
        with_engine(|e| {
            let inlet = point(&e, "a", 10.0, 0.005);
            let process = Process::new(
                "hc",
                "a",
                "b",
                ProcessKind::Heating(CoilParams {
                    airflow: 3600.0,
                    duty: CoilDuty::Capacity { capacity: 10.0 },
                    shf: None,
                    water_temp_diff: Some(10.0),
                }),
            );
            let out = e.apply(&process, &[inlet.clone()], None).unwrap();
            let r = out.results;
            assert!((r.sensible_heat.unwrap() - 10.0).abs() < 1e-9);
            assert_eq!(r.latent_heat, Some(0.0));
            assert!(r.temperature_diff.unwrap() > 0.0);
            assert_eq!(out.to_point.properties.humidity, Some(0.005));
            // 10 kW over 10 K of water -> 0.2389 kg/s -> 14.33 L/min
            assert!((r.water_flow.unwrap() - 14.333).abs() < 0.01);
            assert_eq!(out.to_point.id, "b");
        });
    }

    #[test]
    fn heating_shf_is_rejected() {
        with_engine(|e| {
            let inlet = point(&e, "a", 10.0, 0.005);
            let process = Process::new(
                "hc",
                "a",
                "b",
                ProcessKind::Heating(CoilParams {
                    airflow: 3600.0,
                    duty: CoilDuty::Capacity { capacity: 10.0 },
                    shf: Some(0.8),
                    water_temp_diff: None,
                }),
            );
            assert!(matches!(
                e.apply(&process, &[inlet], None),
                Err(ProcessError::InvalidProcessParameters { .. })
            ));
        });
    }

    #[test]
    fn cooling_with_shf_splits_heat() {
        with_engine(|e| {
            let inlet = point(&e, "a", 27.0, 0.012);
            let process = Process::new(
                "cc",
                "a",
                "b",
                ProcessKind::Cooling(CoilParams {
                    airflow: 5000.0,
                    duty: CoilDuty::Capacity { capacity: 20.0 },
                    shf: Some(0.7),
                    water_temp_diff: None,
                }),
            );
            let out = e.apply(&process, &[inlet], None).unwrap();
            let r = out.results;
            assert!((r.sensible_heat.unwrap() + 14.0).abs() < 1e-9);
            assert!((r.latent_heat.unwrap() + 6.0).abs() < 1e-9);
            assert!((r.total_heat.unwrap() + 20.0).abs() < 1e-9);
            assert!(r.humidity_diff.unwrap() < 0.0);
            assert!(r.temperature_diff.unwrap() < 0.0);
        });
    }

    #[test]
    fn cooling_to_outlet_temperature() {
        with_engine(|e| {
            let inlet = point(&e, "a", 27.0, 0.010);
            let process = Process::new(
                "cc",
                "a",
                "b",
                ProcessKind::Cooling(CoilParams {
                    airflow: 3000.0,
                    duty: CoilDuty::OutletTemperature { temperature: 20.0 },
                    shf: None,
                    water_temp_diff: None,
                }),
            );
            let out = e.apply(&process, &[inlet], None).unwrap();
            assert!((out.to_point.properties.dry_bulb.unwrap() - 20.0).abs() < 1e-9);
            assert!(out.results.latent_heat.unwrap().abs() < 1e-12);
        });
    }

    #[test]
    fn steam_humidifier_warms_water_humidifier_cools() {
        with_engine(|e| {
            let inlet = point(&e, "a", 22.0, 0.004);
            let make = |humidifier| {
                Process::new(
                    "hum",
                    "a",
                    "b",
                    ProcessKind::Humidifying(MoistureParams {
                        airflow: 3000.0,
                        capacity: 10.0,
                        humidifier,
                    }),
                )
            };
            let steam = e
                .apply(&make(HumidifierType::Steam), &[inlet.clone()], None)
                .unwrap();
            let water = e
                .apply(&make(HumidifierType::Water), &[inlet], None)
                .unwrap();

            let dw = steam.results.humidity_diff.unwrap();
            assert!((dw - water.results.humidity_diff.unwrap()).abs() < 1e-15);
            assert!(dw > 0.002 && dw < 0.003);
            assert!(steam.results.temperature_diff.unwrap() > 0.0);
            assert!(water.results.temperature_diff.unwrap() < 0.0);
            assert_eq!(water.results.enthalpy_diff, Some(0.0));
        });
    }

    #[test]
    fn steam_dehumidifier_is_rejected() {
        with_engine(|e| {
            let inlet = point(&e, "a", 22.0, 0.010);
            let process = Process::new(
                "dh",
                "a",
                "b",
                ProcessKind::Dehumidifying(MoistureParams {
                    airflow: 3000.0,
                    capacity: 5.0,
                    humidifier: HumidifierType::Steam,
                }),
            );
            let err = e.apply(&process, &[inlet], None).unwrap_err();
            assert!(err.to_string().contains("steam"));
        });
    }

    #[test]
    fn mixing_rejects_mixed_share_kinds() {
        with_engine(|e| {
            let a = point(&e, "a", 20.0, 0.008);
            let b = point(&e, "b", 30.0, 0.015);
            let process = Process::new(
                "mx",
                "a",
                "m",
                ProcessKind::Mixing(MixingParams {
                    from_share: MixingShare::Airflow { airflow: 1000.0 },
                    with_point: "b".into(),
                    with_share: MixingShare::Ratio { ratio: 0.5 },
                }),
            );
            assert!(matches!(
                e.apply(&process, &[a, b], None),
                Err(ProcessError::InvalidProcessParameters { .. })
            ));
        });
    }

    #[test]
    fn heat_exchange_recovers_toward_exhaust() {
        with_engine(|e| {
            let oa = point(&e, "oa", 0.0, 0.002);
            let ra = point(&e, "ra", 22.0, 0.007);
            let process = Process::new(
                "hx",
                "oa",
                "sa",
                ProcessKind::HeatExchange(HeatExchangeParams {
                    efficiency: ExchangerEfficiency::Split {
                        sensible: 0.7,
                        latent: 0.5,
                    },
                    exhaust_point: "ra".into(),
                    supply_airflow: 2000.0,
                    // larger exhaust keeps the rated effectiveness
                    exhaust_airflow: 3000.0,
                }),
            )
            .with_season(Season::Winter);
            let out = e.apply(&process, &[oa, ra], None).unwrap();
            let p = out.to_point.properties;
            assert!((p.dry_bulb.unwrap() - 15.4).abs() < 1e-9);
            assert!((p.humidity.unwrap() - 0.0045).abs() < 1e-12);
            assert!(out.results.sensible_heat.unwrap() > 0.0);
            assert!(out.results.latent_heat.unwrap() > 0.0);
            assert_eq!(out.to_point.season, Season::Winter);
        });
    }

    #[test]
    fn heat_exchange_scales_with_smaller_exhaust() {
        with_engine(|e| {
            let oa = point(&e, "oa", 0.0, 0.002);
            let ra = point(&e, "ra", 20.0, 0.002);
            let process = Process::new(
                "hx",
                "oa",
                "sa",
                ProcessKind::HeatExchange(HeatExchangeParams {
                    efficiency: ExchangerEfficiency::Total { efficiency: 0.8 },
                    exhaust_point: "ra".into(),
                    supply_airflow: 2000.0,
                    exhaust_airflow: 1000.0,
                }),
            );
            let out = e.apply(&process, &[oa, ra], None).unwrap();
            let t = out.to_point.properties.dry_bulb.unwrap();
            // Exhaust mass is about half the supply mass; effectiveness drops accordingly.
            assert!(t > 7.0 && t < 9.0, "t={t}");
        });
    }

    #[test]
    fn fan_heating_temperature_rise() {
        with_engine(|e| {
            let inlet = point(&e, "a", 15.0, 0.008);
            let process = Process::new(
                "fan",
                "a",
                "b",
                ProcessKind::FanHeating(FanParams {
                    fan_power: 3.0,
                    fan_efficiency: 0.6,
                    airflow: 5000.0,
                }),
            );
            let out = e.apply(&process, &[inlet], None).unwrap();
            let r = out.results;
            assert!((r.sensible_heat.unwrap() - 1.2).abs() < 1e-12);
            let expected = 1.2 / (r.mass_flow.unwrap() * 1.006);
            assert!((r.temperature_diff.unwrap() - expected).abs() < 1e-12);
        });
    }

    #[test]
    fn air_supply_is_pass_through() {
        with_engine(|e| {
            let inlet = point(&e, "a", 16.0, 0.009);
            let process = Process::new(
                "sa",
                "a",
                "room-supply",
                ProcessKind::AirSupply(AirSupplyParams { airflow: 4000.0 }),
            );
            let out = e.apply(&process, &[inlet.clone()], None).unwrap();
            assert_eq!(out.to_point.properties.dry_bulb, inlet.properties.dry_bulb);
            assert_eq!(out.to_point.properties.humidity, inlet.properties.humidity);
            assert!(out.results.sensible_heat.is_none());
        });
    }

    #[test]
    fn unresolved_upstream_is_reported() {
        with_engine(|e| {
            let raw = StatePoint::new("a").with_input(StateInput::DryBulbRh {
                dry_bulb: 20.0,
                relative_humidity: 50.0,
            });
            let process = Process::new(
                "sa",
                "a",
                "b",
                ProcessKind::AirSupply(AirSupplyParams { airflow: 100.0 }),
            );
            assert_eq!(
                e.apply(&process, &[raw], None).unwrap_err(),
                ProcessError::UpstreamUnresolved { point: "a".into() }
            );
            assert!(matches!(
                e.apply(&process, &[], None),
                Err(ProcessError::UpstreamUnresolved { .. })
            ));
        });
    }

    #[test]
    fn conflicting_target_produces_diagnostic() {
        with_engine(|e| {
            let inlet = point(&e, "a", 16.0, 0.009);
            let target = StatePoint::new("b").with_input(StateInput::DryBulbRh {
                dry_bulb: 30.0,
                relative_humidity: 50.0,
            });
            let process = Process::new(
                "sa",
                "a",
                "b",
                ProcessKind::AirSupply(AirSupplyParams { airflow: 100.0 }),
            );
            let out = e.apply(&process, &[inlet], Some(&target)).unwrap();
            // supplied values are kept, the computed ones are reported
            assert_eq!(out.to_point.properties.dry_bulb, Some(30.0));
            assert_eq!(out.diagnostics.len(), 2);
        });
    }

    #[test]
    fn negative_capacity_names_field() {
        with_engine(|e| {
            let inlet = point(&e, "a", 16.0, 0.009);
            let process = Process::new(
                "hc",
                "a",
                "b",
                ProcessKind::Heating(CoilParams {
                    airflow: 1000.0,
                    duty: CoilDuty::Capacity { capacity: -1.0 },
                    shf: None,
                    water_temp_diff: None,
                }),
            );
            let err = e.apply(&process, &[inlet], None).unwrap_err();
            assert!(err.to_string().contains("capacity"));
        });
    }
}
