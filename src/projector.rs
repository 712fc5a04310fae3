//! Folds flat step progress onto provisional (skeleton) stages
//!
//! A skeleton stage copied from the previous run keeps showing the previous
//! run's state until live data replaces it. Steps reported for the current
//! run reveal that such a stage has started before the stage data catches up.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::models::stage::{StageRecord, StageState};
use crate::models::step::StepRecord;

/// Steps of the current run grouped by stage id, in report order
type StepIndex<'a> = HashMap<&'a str, Vec<&'a StepRecord>>;

/// Start time and state derived for a skeleton stage
#[derive(Debug, Clone, Copy, PartialEq)]
struct Progress {
    start_time_millis: u64,
    state: StageState,
}

/// Apply step progress to skeleton stages.
///
/// Returns `Cow::Borrowed(stages)` when nothing changed, so callers can skip
/// re-rendering by identity. Otherwise only the changed stages (and their
/// ancestors) are rebuilt.
pub fn refresh_stages_from_steps<'a>(
    stages: &'a [StageRecord],
    steps: &[StepRecord],
) -> Cow<'a, [StageRecord]> {
    let mut index: StepIndex<'_> = HashMap::new();
    for step in steps {
        index.entry(step.stage_id.as_str()).or_default().push(step);
    }

    match refresh_list(stages, &index) {
        Some(changed) => Cow::Owned(changed),
        None => Cow::Borrowed(stages),
    }
}

fn refresh_list(stages: &[StageRecord], index: &StepIndex<'_>) -> Option<Vec<StageRecord>> {
    let mut changed: Option<Vec<StageRecord>> = None;
    for (position, stage) in stages.iter().enumerate() {
        if let Some(updated) = refresh_stage(stage, index) {
            changed.get_or_insert_with(|| stages.to_vec())[position] = updated;
        }
    }
    changed
}

fn refresh_stage(stage: &StageRecord, index: &StepIndex<'_>) -> Option<StageRecord> {
    // Children first so their progress can bubble up
    let children = refresh_list(&stage.children, index);
    let current_children = children.as_deref().unwrap_or(&stage.children);

    let progress = if stage.skeleton {
        progress_from_steps(stage, index).or_else(|| progress_from_children(current_children))
    } else {
        None
    };

    let needs_update = progress.is_some_and(|p| {
        stage.start_time_millis != p.start_time_millis
            || stage.state != p.state
            || stage.total_duration_millis != 0
    });

    if children.is_none() && !needs_update {
        return None;
    }

    let mut updated =
        stage.with_replaced_children(children.unwrap_or_else(|| stage.children.clone()));
    if let Some(progress) = progress {
        updated.start_time_millis = progress.start_time_millis;
        updated.state = progress.state;
        // The previous run's total is stale once anything has started
        updated.total_duration_millis = 0;
    }
    Some(updated)
}

fn progress_from_steps(stage: &StageRecord, index: &StepIndex<'_>) -> Option<Progress> {
    let steps = index.get(stage.id.as_str())?;
    let (first, last) = (steps.first()?, steps.last()?);
    Some(Progress {
        start_time_millis: first.start_time_millis,
        state: last.state,
    })
}

fn progress_from_children(children: &[StageRecord]) -> Option<Progress> {
    let mut started = children.iter().filter(|child| child.has_started());
    let first = started.next()?;
    let last = started.last().unwrap_or(first);
    Some(Progress {
        start_time_millis: first.start_time_millis,
        state: last.state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skeleton(id: &str, name: &str) -> StageRecord {
        let mut stage = StageRecord::new(id, name)
            .with_state(StageState::Success)
            .with_duration(5000);
        stage.skeleton = true;
        stage
    }

    #[test]
    fn test_no_steps_returns_same_slice() {
        let stages = vec![skeleton("1", "Build")];
        let refreshed = refresh_stages_from_steps(&stages, &[]);
        assert!(matches!(refreshed, Cow::Borrowed(_)));
        assert!(std::ptr::eq(refreshed.as_ptr(), stages.as_ptr()));
    }

    #[test]
    fn test_skeleton_adopts_step_progress() {
        let stages = vec![skeleton("1", "Build"), skeleton("2", "Test")];
        let steps = vec![
            StepRecord::new("1", StageState::Success, 100),
            StepRecord::new("1", StageState::Running, 200),
        ];

        let refreshed = refresh_stages_from_steps(&stages, &steps);

        let build = &refreshed[0];
        assert_eq!(build.start_time_millis, 100);
        assert_eq!(build.state, StageState::Running);
        assert_eq!(build.total_duration_millis, 0);
        assert!(build.skeleton);
        assert_eq!(refreshed[1], stages[1], "untouched sibling keeps its value");
    }

    #[test]
    fn test_live_stages_ignore_steps() {
        let stages = vec![StageRecord::new("1", "Build")
            .with_state(StageState::Running)
            .with_start(50)];
        let steps = vec![StepRecord::new("1", StageState::Failure, 60)];

        let refreshed = refresh_stages_from_steps(&stages, &steps);
        assert!(matches!(refreshed, Cow::Borrowed(_)));
    }

    #[test]
    fn test_child_progress_propagates_to_parent() {
        let stages = vec![skeleton("1", "Tests").with_children(vec![
            skeleton("2", "Unit"),
            skeleton("3", "Lint"),
            skeleton("4", "Integration"),
        ])];
        let steps = vec![
            StepRecord::new("2", StageState::Success, 300),
            StepRecord::new("3", StageState::Running, 400),
        ];

        let refreshed = refresh_stages_from_steps(&stages, &steps);

        let parent = &refreshed[0];
        assert_eq!(parent.start_time_millis, 300);
        assert_eq!(parent.state, StageState::Running);
        assert_eq!(parent.total_duration_millis, 0);
        assert_eq!(parent.children[2].total_duration_millis, 5000);
    }

    #[test]
    fn test_second_refresh_is_reference_stable() {
        let stages = vec![skeleton("1", "Build").with_children(vec![skeleton("2", "Compile")])];
        let steps = vec![StepRecord::new("2", StageState::Running, 10)];

        let first = refresh_stages_from_steps(&stages, &steps).into_owned();
        let second = refresh_stages_from_steps(&first, &steps);

        assert!(matches!(second, Cow::Borrowed(_)));
        assert!(std::ptr::eq(second.as_ptr(), first.as_ptr()));
    }

    #[test]
    fn test_numeric_and_string_ids_match() {
        let stages: Vec<StageRecord> =
            serde_json::from_str(r#"[{"id": 12, "name": "Build", "skeleton": true}]"#).unwrap();
        let steps: Vec<StepRecord> =
            serde_json::from_str(r#"[{"stageId": "12", "state": "running", "startTimeMillis": 7}]"#)
                .unwrap();

        let refreshed = refresh_stages_from_steps(&stages, &steps);
        assert_eq!(refreshed[0].start_time_millis, 7);
    }
}
