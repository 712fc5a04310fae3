//! Reconciles a previous run's stage shape with live data from the current run
//!
//! Every poll merges against the same original skeleton, so placeholder
//! "future" stages are derived fresh each time and never accumulate.


use tracing::debug;

use crate::estimator::RunEstimator;
use crate::models::stage::StageRecord;

/// Provisional copies of every skeleton stage, recursively.
pub fn mark_skeleton(stages: &[StageRecord]) -> Vec<StageRecord> {
    stages.iter().map(StageRecord::to_skeleton).collect()
}

/// Merge live `incoming` stages over the previous run's `skeleton`.
///
/// Stages are matched by name at each tree level (first match wins). Matched
/// and unmatched incoming stages are returned in incoming order. Skeleton
/// stages after the last matched one are appended as upcoming placeholders,
/// unless some incoming stage had no skeleton counterpart at all, in which
/// case the skeleton is considered diverged and nothing is appended.
pub fn merge_stage_infos(skeleton: &[StageRecord], incoming: &[StageRecord]) -> Vec<StageRecord> {
    let marked = mark_skeleton(skeleton);
    if incoming.is_empty() {
        return marked;
    }

    let estimator = RunEstimator::new(skeleton);
    let mut merged = Vec::with_capacity(incoming.len().max(skeleton.len()));
    let mut matches = Vec::with_capacity(incoming.len());

    for item in incoming {
        let index = skeleton.iter().position(|s| s.name == item.name);
        merged.push(merge_stage(index.map(|i| &skeleton[i]), item, &estimator));
        matches.push(index);
    }

    if matches.iter().any(Option::is_none) {
        debug!(
            incoming = incoming.len(),
            skeleton = skeleton.len(),
            "incoming stages diverge from previous run, dropping future placeholders"
        );
        return merged;
    }

    // Every incoming stage matched, so the last one has an index
    let Some(last_ran_index) = matches.last().copied().flatten() else {
        return merged;
    };

    merged.extend(
        marked
            .into_iter()
            .enumerate()
            .skip(last_ran_index + 1)
            .filter(|(_, future)| !incoming.iter().any(|item| item.name == future.name))
            .map(|(_, future)| future),
    );

    merged
}

/// Incoming fields win; optional metadata falls back to the skeleton's.
fn merge_stage(
    skeleton: Option<&StageRecord>,
    incoming: &StageRecord,
    estimator: &RunEstimator,
) -> StageRecord {
    let skeleton_children = skeleton.map_or(&[][..], |s| s.children.as_slice());
    let children = merge_stage_infos(skeleton_children, &incoming.children);

    let mut merged = incoming.with_replaced_children(children);
    merged.skeleton = false;
    merged.complete_percent = estimator.estimate_completion(incoming);
    if let Some(skeleton) = skeleton {
        if merged.agent.is_none() {
            merged.agent = skeleton.agent.clone();
        }
        if merged.url.is_none() {
            merged.url = skeleton.url.clone();
        }
    }
    merged
}
