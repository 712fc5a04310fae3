use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::{load_stages, load_steps};
use crate::merge::merge_stage_infos;
use crate::projector::refresh_stages_from_steps;

/// Merge a current run over a previous one, optionally projecting steps,
/// and print the merged stages as JSON.
pub fn execute(previous_path: &Path, current_path: &Path, steps_path: Option<&Path>) -> Result<()> {
    let previous = load_stages(previous_path)?;
    let current = load_stages(current_path)?;
    let steps = match steps_path {
        Some(path) => load_steps(path)?,
        None => Vec::new(),
    };

    let merged = merge_stage_infos(&previous, &current);
    let stages = refresh_stages_from_steps(&merged, &steps);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &*stages)
        .context("Failed to serialize merged stages")?;
    writeln!(out)?;
    Ok(())
}
