//! Completion estimates for running stages based on a previous run

use std::collections::HashMap;

use crate::models::stage::{StageRecord, StageState};

/// Estimates how far along a running stage is by comparing its elapsed time
/// with the duration of the same-named stage in a previous run.
#[derive(Debug, Clone, Default)]
pub struct RunEstimator {
    previous_durations: HashMap<String, u64>,
}

impl RunEstimator {
    /// Build the lookup from a previous run's stages (one tree level).
    ///
    /// When several stages share a name the first one wins, matching the
    /// merge tie-break.
    pub fn new(previous: &[StageRecord]) -> Self {
        let mut previous_durations = HashMap::with_capacity(previous.len());
        for stage in previous {
            previous_durations
                .entry(stage.name.clone())
                .or_insert(stage.total_duration_millis);
        }
        Self { previous_durations }
    }

    /// Completion percentage in `0.0..=100.0`. Not rounded.
    pub fn estimate_completion(&self, stage: &StageRecord) -> f64 {
        if stage.state.is_finished() {
            return 100.0;
        }

        match stage.state {
            StageState::Running | StageState::Paused => {
                let Some(&previous) = self.previous_durations.get(&stage.name) else {
                    return 0.0;
                };
                let current = stage.total_duration_millis;
                if previous <= current {
                    // Never claim completion before the state says so
                    99.0
                } else {
                    current as f64 / previous as f64 * 100.0
                }
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn previous_run() -> Vec<StageRecord> {
        vec![StageRecord::new("1", "Build")
            .with_state(StageState::Success)
            .with_duration(1000)]
    }

    fn running(name: &str, elapsed: u64) -> StageRecord {
        StageRecord::new("9", name)
            .with_state(StageState::Running)
            .with_duration(elapsed)
    }

    #[test]
    fn test_running_at_previous_duration_caps_at_99() {
        let estimator = RunEstimator::new(&previous_run());
        assert_eq!(estimator.estimate_completion(&running("Build", 1000)), 99.0);
        assert_eq!(estimator.estimate_completion(&running("Build", 1001)), 99.0);
    }

    #[test]
    fn test_running_partial() {
        let estimator = RunEstimator::new(&previous_run());
        assert_eq!(estimator.estimate_completion(&running("Build", 50)), 5.0);
        assert_eq!(estimator.estimate_completion(&running("Build", 500)), 50.0);
    }

    #[test]
    fn test_paused_uses_same_rule() {
        let estimator = RunEstimator::new(&previous_run());
        let paused = running("Build", 250).with_state(StageState::Paused);
        assert_eq!(estimator.estimate_completion(&paused), 25.0);
    }

    #[test]
    fn test_finished_is_always_100() {
        let estimator = RunEstimator::new(&[]);
        let done = StageRecord::new("1", "Anything")
            .with_state(StageState::Success)
            .with_duration(3);
        assert_eq!(estimator.estimate_completion(&done), 100.0);

        let skipped = done.clone().with_state(StageState::Skipped);
        assert_eq!(estimator.estimate_completion(&skipped), 100.0);
    }

    #[test]
    fn test_running_without_baseline_is_zero() {
        let estimator = RunEstimator::new(&previous_run());
        assert_eq!(estimator.estimate_completion(&running("Deploy", 400)), 0.0);
    }

    #[test]
    fn test_queued_and_unrecognized_are_zero() {
        let estimator = RunEstimator::new(&previous_run());
        let queued = running("Build", 400).with_state(StageState::Queued);
        assert_eq!(estimator.estimate_completion(&queued), 0.0);

        let odd = running("Build", 400).with_state(StageState::Unrecognized);
        assert_eq!(estimator.estimate_completion(&odd), 0.0);
    }

    #[test]
    fn test_first_duplicate_name_wins() {
        let previous = vec![
            StageRecord::new("1", "Build").with_duration(1000),
            StageRecord::new("2", "Build").with_duration(10),
        ];
        let estimator = RunEstimator::new(&previous);
        assert_eq!(estimator.estimate_completion(&running("Build", 100)), 10.0);
    }
}
