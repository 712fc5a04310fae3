//! CLI command implementations

pub mod estimate;
pub mod layout;
pub mod merge;
pub mod watch;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::run::{parse_steps, RunSnapshot};
use crate::models::stage::StageRecord;
use crate::models::step::StepRecord;

/// Read a stage list, wrapped in a run snapshot or bare.
pub(crate) fn load_snapshot(path: &Path) -> Result<RunSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read stages from {}", path.display()))?;
    let snapshot = RunSnapshot::parse(&raw, &path.display().to_string())?;
    Ok(snapshot)
}

pub(crate) fn load_stages(path: &Path) -> Result<Vec<StageRecord>> {
    Ok(load_snapshot(path)?.stages)
}

pub(crate) fn load_steps(path: &Path) -> Result<Vec<StepRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read steps from {}", path.display()))?;
    Ok(parse_steps(&raw, &path.display().to_string())?)
}
