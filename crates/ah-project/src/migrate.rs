//! Document version migration.

use crate::ProjectError;
use crate::schema::DesignDocument;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut doc: DesignDocument) -> Result<DesignDocument, ProjectError> {
    while doc.version < LATEST_VERSION {
        doc = migrate_one_version(doc)?;
    }
    Ok(doc)
}

fn migrate_one_version(doc: DesignDocument) -> Result<DesignDocument, ProjectError> {
    match doc.version {
        0 => migrate_v0_to_v1(doc),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 documents listed processes in file order and left `order` unset.
fn migrate_v0_to_v1(mut doc: DesignDocument) -> Result<DesignDocument, ProjectError> {
    if doc.processes.iter().all(|p| p.order == 0) {
        for (idx, process) in doc.processes.iter_mut().enumerate() {
            process.order = idx as u32 + 1;
        }
    }
    doc.version = 1;
    Ok(doc)
}
