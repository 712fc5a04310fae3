//! Transport payloads for a run's status and steps

use serde::{Deserialize, Serialize};

use crate::error::{Result, StageGraphError};
use crate::models::stage::StageRecord;
use crate::models::step::StepRecord;

/// Status of a run as delivered by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub stages: Vec<StageRecord>,
    #[serde(default)]
    pub complete: bool,
}

/// Stage payloads come either wrapped in a run snapshot or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StagesPayload {
    Snapshot(RunSnapshot),
    Bare(Vec<StageRecord>),
}

impl RunSnapshot {
    /// Parse a run payload; `source` names where it came from for error messages.
    pub fn parse(raw: &str, source: &str) -> Result<RunSnapshot> {
        let payload: StagesPayload =
            serde_json::from_str(raw).map_err(|e| StageGraphError::JsonParse {
                source_name: source.to_string(),
                source: e,
            })?;

        Ok(match payload {
            StagesPayload::Snapshot(snapshot) => snapshot,
            StagesPayload::Bare(stages) => RunSnapshot {
                stages,
                complete: false,
            },
        })
    }
}

/// Parse a flat step list.
pub fn parse_steps(raw: &str, source: &str) -> Result<Vec<StepRecord>> {
    serde_json::from_str(raw).map_err(|e| StageGraphError::JsonParse {
        source_name: source.to_string(),
        source: e,
    })
}
