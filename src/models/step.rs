use serde::{Deserialize, Serialize};

use crate::models::serialization::deserialize_id;
use crate::models::stage::StageState;

/// Flat step progress record. `stage_id` refers to a stage of the current run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub stage_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub state: StageState,
    #[serde(default)]
    pub start_time_millis: u64,
    #[serde(default)]
    pub total_duration_millis: u64,
}

impl StepRecord {
    pub fn new(stage_id: impl Into<String>, state: StageState, start_time_millis: u64) -> Self {
        Self {
            stage_id: stage_id.into(),
            name: None,
            state,
            start_time_millis,
            total_duration_millis: 0,
        }
    }
}
