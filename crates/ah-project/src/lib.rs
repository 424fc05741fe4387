//! ah-project: design document format, validation and evaluation.

pub mod evaluate;
pub mod migrate;
pub mod schema;
pub mod validate;

pub use evaluate::{DesignPoints, EvaluateOptions, Evaluation, design_points, evaluate};
pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_document};

use ah_process::ProcessError;
use ah_psychro::PsychroError;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Psychrometric error: {0}")]
    Psychro(#[from] PsychroError),

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<DesignDocument> {
    let content = std::fs::read_to_string(path)?;
    let mut doc: DesignDocument = serde_yaml::from_str(&content)?;
    doc = migrate_to_latest(doc)?;
    validate_document(&doc)?;
    Ok(doc)
}

pub fn save_yaml(path: &std::path::Path, doc: &DesignDocument) -> ProjectResult<()> {
    validate_document(doc)?;
    let content = serde_yaml::to_string(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<DesignDocument> {
    let content = std::fs::read_to_string(path)?;
    let mut doc: DesignDocument = serde_json::from_str(&content)?;
    doc = migrate_to_latest(doc)?;
    validate_document(&doc)?;
    Ok(doc)
}

pub fn save_json(path: &std::path::Path, doc: &DesignDocument) -> ProjectResult<()> {
    validate_document(doc)?;
    let content = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by file extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &std::path::Path) -> ProjectResult<DesignDocument> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
