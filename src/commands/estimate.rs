use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::load_stages;
use crate::estimator::RunEstimator;
use crate::models::stage::{StageRecord, StageState};
use crate::render::state_color;

/// Print a completion estimate for every stage of the current run.
pub fn execute(previous_path: &Path, current_path: &Path) -> Result<()> {
    let previous = load_stages(previous_path)?;
    let current = load_stages(current_path)?;

    for estimate in estimate_tree(&previous, &current, 0) {
        println!(
            "{:indent$}{} {} {:.0}%",
            "",
            estimate.name,
            estimate.state.to_string().color(state_color(estimate.state)),
            estimate.percent,
            indent = estimate.depth * 2
        );
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
struct StageEstimate {
    depth: usize,
    name: String,
    state: StageState,
    percent: f64,
}

/// Estimates in tree order. Children are compared against the children of
/// the same-named previous stage.
fn estimate_tree(
    previous: &[StageRecord],
    current: &[StageRecord],
    depth: usize,
) -> Vec<StageEstimate> {
    let estimator = RunEstimator::new(previous);
    let mut estimates = Vec::new();

    for stage in current {
        estimates.push(StageEstimate {
            depth,
            name: stage.name.clone(),
            state: stage.state,
            percent: estimator.estimate_completion(stage),
        });
        let previous_children = previous
            .iter()
            .find(|p| p.name == stage.name)
            .map_or(&[][..], |p| p.children.as_slice());
        estimates.extend(estimate_tree(previous_children, &stage.children, depth + 1));
    }
    estimates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tree_descends_by_name() {
        let previous = vec![StageRecord::new("1", "Test")
            .with_duration(40_000)
            .with_children(vec![StageRecord::new("2", "Unit").with_duration(10_000)])];
        let current = vec![StageRecord::new("9", "Test")
            .with_state(StageState::Running)
            .with_duration(10_000)
            .with_children(vec![StageRecord::new("10", "Unit")
                .with_state(StageState::Running)
                .with_duration(5_000)])];

        let estimates = estimate_tree(&previous, &current, 0);

        assert_eq!(estimates.len(), 2);
        assert_eq!((estimates[0].depth, estimates[0].percent), (0, 25.0));
        assert_eq!((estimates[1].depth, estimates[1].percent), (1, 50.0));
    }

    #[test]
    fn test_estimate_tree_without_baseline() {
        let current = vec![StageRecord::new("1", "New").with_state(StageState::Running)];
        let estimates = estimate_tree(&[], &current, 0);
        assert_eq!(estimates[0].percent, 0.0);
    }
}
