//! JSON evaluation snapshots: the record slice plus the expected-skill table
//! as handed over by the data-fetch layer.

use crate::evaluations::domain::{EvaluationRecord, ExpectedSkillEntry, ExpectedSkillTable};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read evaluation snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid evaluation snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSnapshot {
    #[serde(default)]
    pub records: Vec<EvaluationRecord>,
    #[serde(default)]
    pub expected_skills: Vec<ExpectedSkillEntry>,
}

impl EvaluationSnapshot {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading evaluation snapshot");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses a snapshot and trims every record.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let raw: EvaluationSnapshot = serde_json::from_reader(reader)?;
        let snapshot = Self {
            records: raw.records.into_iter().map(EvaluationRecord::trimmed).collect(),
            expected_skills: raw.expected_skills,
        };
        debug!(
            records = snapshot.records.len(),
            expected_skills = snapshot.expected_skills.len(),
            "evaluation snapshot parsed"
        );
        Ok(snapshot)
    }

    pub fn expected_table(&self) -> ExpectedSkillTable {
        ExpectedSkillTable::from_entries(self.expected_skills.iter().cloned())
    }
}
