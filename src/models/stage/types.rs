use serde::{Deserialize, Serialize};

use crate::models::serialization::deserialize_id;

/// One node of a pipeline run's stage forest.
///
/// Children are owned exclusively by their parent. `id` is only unique inside
/// a single snapshot; across runs stages are matched by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub stage_type: StageType,
    #[serde(default)]
    pub state: StageState,
    #[serde(default)]
    pub children: Vec<StageRecord>,
    /// Elapsed time so far for running stages, final duration otherwise
    #[serde(default)]
    pub total_duration_millis: u64,
    /// Epoch millis; 0 means not started
    #[serde(default)]
    pub start_time_millis: u64,
    #[serde(default)]
    pub pause_duration_millis: u64,
    /// Estimated progress, recomputed on every merge
    #[serde(default)]
    pub complete_percent: f64,
    /// Placeholder copied from a previous run, not yet confirmed by live data
    #[serde(default)]
    pub skeleton: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Kind of node in the stage forest.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageType {
    #[default]
    Stage,
    /// A named branch inside a parallel block
    Parallel,
    ParallelBlock,
    Step,
    PipelineStart,
}

/// Result or progress state reported for a stage or step.
///
/// Values the server reports that this build does not know deserialize to
/// `Unrecognized` rather than failing; they render in the unknown bucket.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    Success,
    Failure,
    Running,
    Queued,
    Paused,
    Unstable,
    Aborted,
    NotBuilt,
    Skipped,
    #[default]
    Unknown,
    #[serde(other)]
    Unrecognized,
}

impl std::fmt::Display for StageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageState::Success => write!(f, "success"),
            StageState::Failure => write!(f, "failure"),
            StageState::Running => write!(f, "running"),
            StageState::Queued => write!(f, "queued"),
            StageState::Paused => write!(f, "paused"),
            StageState::Unstable => write!(f, "unstable"),
            StageState::Aborted => write!(f, "aborted"),
            StageState::NotBuilt => write!(f, "not_built"),
            StageState::Skipped => write!(f, "skipped"),
            StageState::Unknown | StageState::Unrecognized => write!(f, "unknown"),
        }
    }
}
