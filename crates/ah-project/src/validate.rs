//! Design document validation.

use crate::schema::{DesignDocument, SeasonConditions};
use ah_process::{AirStream, Process};
use ah_psychro::StatePoint;
use std::collections::{BTreeMap, HashSet};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_document(doc: &DesignDocument) -> Result<(), ValidationError> {
    if doc.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: doc.version,
        });
    }

    validate_conditions(doc)?;

    let point_ids = unique_ids(doc.state_points.iter().map(|p| &p.id), "state_points")?;
    unique_ids(doc.processes.iter().map(|p| &p.id), "processes")?;
    unique_ids(doc.air_streams.iter().map(|s| &s.id), "air_streams")?;

    for point in &doc.state_points {
        validate_point(point)?;
    }

    let mut writers: BTreeMap<&str, Vec<&Process>> = BTreeMap::new();
    for process in &doc.processes {
        validate_process(process, &point_ids)?;
        writers.entry(process.to.as_str()).or_default().push(process);
    }

    for (point, procs) in &writers {
        for (i, a) in procs.iter().enumerate() {
            for b in &procs[i + 1..] {
                if a.season.applies_to(b.season) {
                    return Err(ValidationError::InvalidValue {
                        field: format!("state point '{point}'"),
                        value: format!("{}, {}", a.id, b.id),
                        reason: "written by more than one process in the same season".to_string(),
                    });
                }
            }
        }
    }

    for stream in &doc.air_streams {
        validate_stream(stream, &point_ids)?;
    }

    Ok(())
}

fn unique_ids<'a>(
    ids: impl Iterator<Item = &'a String>,
    context: &str,
) -> Result<HashSet<&'a String>, ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                id: id.clone(),
                context: context.to_string(),
            });
        }
    }
    Ok(seen)
}

fn validate_conditions(doc: &DesignDocument) -> Result<(), ValidationError> {
    let c = &doc.conditions;
    if let Some(p) = c.pressure
        && (!p.is_finite() || p <= 0.0)
    {
        return Err(ValidationError::InvalidValue {
            field: "conditions pressure".to_string(),
            value: p.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    if let Some(z) = c.altitude
        && (!z.is_finite() || !(-500.0..=10_000.0).contains(&z))
    {
        return Err(ValidationError::InvalidValue {
            field: "conditions altitude".to_string(),
            value: z.to_string(),
            reason: "must be within [-500, 10000] m".to_string(),
        });
    }
    for (label, season) in [("summer", &c.summer), ("winter", &c.winter)] {
        if let Some(SeasonConditions { outdoor, indoor }) = season {
            for (which, input) in [("outdoor", outdoor), ("indoor", indoor)] {
                let (_, second) = input.second();
                if !input.dry_bulb().is_finite() || !second.is_finite() {
                    return Err(ValidationError::InvalidValue {
                        field: format!("conditions {label} {which}"),
                        value: input.label().to_string(),
                        reason: "values must be finite".to_string(),
                    });
                }
            }
        }
    }

    if let Some(constants) = &doc.constants
        && let Err(e) = constants.validate()
    {
        return Err(ValidationError::InvalidValue {
            field: "constants".to_string(),
            value: e.to_string(),
            reason: "constants are not usable".to_string(),
        });
    }

    let threshold = doc.balance.relative_threshold;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "balance relative_threshold".to_string(),
            value: threshold.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    Ok(())
}

fn validate_point(point: &StatePoint) -> Result<(), ValidationError> {
    if let Some(input) = &point.input {
        let (property, value) = input.second();
        for (name, v) in [("dry bulb", input.dry_bulb()), (property.label(), value)] {
            if !v.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: format!("state point '{}' {name}", point.id),
                    value: v.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_process(process: &Process, point_ids: &HashSet<&String>) -> Result<(), ValidationError> {
    let mut references = vec![("from", process.from.as_str()), ("to", process.to.as_str())];
    let upstream = process.upstream_ids();
    if let Some(secondary) = upstream.get(1) {
        references.push(("secondary point", *secondary));
    }
    for (role, id) in references {
        if !point_ids.iter().any(|p| p.as_str() == id) {
            return Err(ValidationError::MissingReference {
                id: id.to_string(),
                context: format!("process '{}' {role}", process.id),
            });
        }
    }

    if upstream.contains(&process.to.as_str()) {
        return Err(ValidationError::InvalidValue {
            field: format!("process '{}' to", process.id),
            value: process.to.clone(),
            reason: "a process cannot write its own source point".to_string(),
        });
    }
    Ok(())
}

fn validate_stream(stream: &AirStream, point_ids: &HashSet<&String>) -> Result<(), ValidationError> {
    if !point_ids.contains(&stream.point) {
        return Err(ValidationError::MissingReference {
            id: stream.point.clone(),
            context: format!("air stream '{}' point", stream.id),
        });
    }
    if !stream.airflow.is_finite() || stream.airflow < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: format!("air stream '{}' airflow", stream.id),
            value: stream.airflow.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    if let Some(m) = stream.mass_flow
        && (!m.is_finite() || m < 0.0)
    {
        return Err(ValidationError::InvalidValue {
            field: format!("air stream '{}' mass_flow", stream.id),
            value: m.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    Ok(())
}
