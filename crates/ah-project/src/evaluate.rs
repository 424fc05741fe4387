//! Evaluation of a design document for one season.
//!
//! Independent input points are resolved in parallel; processes are then
//! applied one by one in `order`, each reading the points produced before it.

use crate::ProjectResult;
use crate::schema::DesignDocument;
use ah_process::{
    AirflowBalance, Process, ProcessEngine, check_mass_flows, validate_balance,
};
use ah_psychro::{
    Diagnostic, PropertyCalculator, ResolveOptions, Season, StatePoint, StatePointResolver,
};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluateOptions {
    /// Back-solve the wet bulb for every point.
    pub wet_bulb: bool,
}

impl EvaluateOptions {
    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            wet_bulb: self.wet_bulb,
        }
    }
}

/// Completed chain for one season.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub season: Season,
    /// Atmospheric pressure used [kPa].
    pub pressure: f64,
    pub state_points: Vec<StatePoint>,
    /// Processes in application order, with results filled in.
    pub processes: Vec<Process>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<AirflowBalance>,
    pub mass_flow_errors: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Evaluation {
    pub fn point(&self, id: &str) -> Option<&StatePoint> {
        self.state_points.iter().find(|p| p.id == id)
    }

    pub fn process(&self, id: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }
}

/// Outdoor and indoor design states of one season.
#[derive(Debug, Clone, Serialize)]
pub struct DesignPoints {
    pub outdoor: StatePoint,
    pub indoor: StatePoint,
}

/// Resolve the document's outdoor/indoor design conditions for `season`.
///
/// `None` when the document has no conditions for that season.
pub fn design_points(doc: &DesignDocument, season: Season) -> ProjectResult<Option<DesignPoints>> {
    let Some(conditions) = doc.conditions.season(season) else {
        return Ok(None);
    };
    let constants = doc.effective_constants();
    let pressure = doc.conditions.resolved_pressure(constants.standard_pressure);
    let calc = PropertyCalculator::new(&constants, pressure)?;
    let resolver = StatePointResolver::new(calc);
    let opts = ResolveOptions::with_wet_bulb();

    let resolve = |id: &str, input| -> ProjectResult<StatePoint> {
        let point = StatePoint::new(format!("{}-{id}", season.label()))
            .with_name(format!("{} {id} design", season.label()))
            .with_season(season)
            .with_input(input);
        Ok(resolver.resolve(&point, opts)?.point)
    };

    Ok(Some(DesignPoints {
        outdoor: resolve("outdoor", conditions.outdoor)?,
        indoor: resolve("indoor", conditions.indoor)?,
    }))
}

/// Evaluate the state points, processes and air streams that apply to `season`.
pub fn evaluate(
    doc: &DesignDocument,
    season: Season,
    options: &EvaluateOptions,
) -> ProjectResult<Evaluation> {
    crate::validate_document(doc)?;

    let constants = doc.effective_constants();
    let pressure = doc.conditions.resolved_pressure(constants.standard_pressure);
    let calc = PropertyCalculator::new(&constants, pressure)?;
    let resolver = StatePointResolver::new(calc);
    let resolve_opts = options.resolve_options();
    let engine = ProcessEngine::new(resolver).with_options(resolve_opts);

    let mut processes: Vec<Process> = doc
        .processes
        .iter()
        .filter(|p| p.season.applies_to(season))
        .cloned()
        .collect();
    // stable: equal orders keep document order
    processes.sort_by_key(|p| p.order);

    let produced: HashSet<&str> = processes.iter().map(|p| p.to.as_str()).collect();

    let season_points: Vec<&StatePoint> = doc
        .state_points
        .iter()
        .filter(|p| p.season.applies_to(season))
        .collect();

    let resolved: Vec<(usize, StatePoint, Vec<Diagnostic>)> = season_points
        .par_iter()
        .enumerate()
        .filter(|(_, p)| p.has_input() && !produced.contains(p.id.as_str()))
        .map(|(idx, p)| {
            resolver
                .resolve(p, resolve_opts)
                .map(|r| (idx, r.point, r.diagnostics))
        })
        .collect::<Result<_, _>>()?;

    let mut points: Vec<StatePoint> = season_points.iter().map(|p| (*p).clone()).collect();
    let mut diagnostics = Vec::new();
    for (idx, point, diags) in resolved {
        points[idx] = point;
        diagnostics.extend(diags);
    }

    let index: HashMap<String, usize> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();

    for process in &mut processes {
        let upstream: Vec<StatePoint> = process
            .upstream_ids()
            .iter()
            .filter_map(|id| index.get(*id).map(|&i| points[i].clone()))
            .collect();
        let target_idx = index.get(&process.to).copied();
        let target = target_idx.map(|i| &points[i]);

        let applied = engine.apply(process, &upstream, target)?;
        diagnostics.extend(applied.diagnostics);
        process.results = Some(applied.results);
        match target_idx {
            Some(i) => points[i] = applied.to_point,
            None => points.push(applied.to_point),
        }
    }

    let streams: Vec<_> = doc
        .air_streams
        .iter()
        .filter(|s| s.season.applies_to(season))
        .cloned()
        .collect();
    let (balance, mass_flow_errors) = if streams.is_empty() {
        (None, Vec::new())
    } else {
        (
            Some(validate_balance(&streams, &doc.balance)),
            check_mass_flows(&streams, &points, &doc.balance),
        )
    };

    tracing::info!(
        document = %doc.name,
        season = season.label(),
        pressure,
        points = points.len(),
        processes = processes.len(),
        warnings = diagnostics.len(),
        "evaluated design"
    );

    Ok(Evaluation {
        season,
        pressure,
        state_points: points,
        processes,
        balance,
        mass_flow_errors,
        diagnostics,
    })
}
