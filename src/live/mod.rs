//! Live polling of an in-progress run
//!
//! Each tick fetches raw payloads, skips work when their fingerprint has not
//! changed, and otherwise runs merge then step projection against the
//! previous run's original skeleton. Fetch and parse failures are logged and
//! the last good stages stay current.

mod fingerprint;
mod source;


use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::merge::{mark_skeleton, merge_stage_infos};
use crate::models::run::{parse_steps, RunSnapshot};
use crate::models::stage::StageRecord;
use crate::projector::refresh_stages_from_steps;

pub use fingerprint::fingerprint;
pub use source::{FileSource, HttpSource, RunSource};

/// Longest single sleep between stop-flag checks
const STOP_CHECK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Payloads identical to the last successful tick
    Unchanged,
    Updated,
    /// Updated, and the run reported completion
    Complete,
    /// Fetch or parse failed; previous stages kept
    Failed,
}

impl TickOutcome {
    /// Whether the stages changed and the graph needs a new layout
    pub fn needs_layout(self) -> bool {
        matches!(self, TickOutcome::Updated | TickOutcome::Complete)
    }
}

/// Merged view of a run in progress.
#[derive(Debug, Clone)]
pub struct LiveRun {
    skeleton: Vec<StageRecord>,
    fingerprint: Option<String>,
    stages: Vec<StageRecord>,
    complete: bool,
}

impl LiveRun {
    /// Start from the previous run's stages; until the first tick every
    /// stage is shown as a placeholder.
    pub fn new(previous: Vec<StageRecord>) -> Self {
        let stages = mark_skeleton(&previous);
        Self {
            skeleton: previous,
            fingerprint: None,
            stages,
            complete: false,
        }
    }

    pub fn stages(&self) -> &[StageRecord] {
        &self.stages
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Poll `source` once.
    pub fn tick(&mut self, source: &dyn RunSource) -> TickOutcome {
        match self.try_tick(source) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "poll failed, keeping previous stages");
                TickOutcome::Failed
            }
        }
    }

    fn try_tick(&mut self, source: &dyn RunSource) -> Result<TickOutcome> {
        let run_raw = source.fetch_run()?;
        let steps_raw = source.fetch_steps()?;

        let print = fingerprint(&[&run_raw, &steps_raw]);
        if self.fingerprint.as_deref() == Some(print.as_str()) {
            debug!("payload unchanged");
            return Ok(TickOutcome::Unchanged);
        }

        let snapshot = RunSnapshot::parse(&run_raw, "run payload")?;
        let steps = parse_steps(&steps_raw, "steps payload")?;

        let merged = merge_stage_infos(&self.skeleton, &snapshot.stages);
        let stages = refresh_stages_from_steps(&merged, &steps).into_owned();
        debug!(
            incoming = snapshot.stages.len(),
            merged = stages.len(),
            steps = steps.len(),
            "merged run update"
        );

        self.fingerprint = Some(print);
        self.stages = stages;
        self.complete = snapshot.complete;

        Ok(if snapshot.complete {
            TickOutcome::Complete
        } else {
            TickOutcome::Updated
        })
    }
}

/// Poll until the run completes or `stop` is set.
///
/// `on_update` is called for every tick that changed the stages. Returns the
/// number of such ticks.
pub fn watch<F>(
    run: &mut LiveRun,
    source: &dyn RunSource,
    interval: Duration,
    stop: &AtomicBool,
    mut on_update: F,
) -> usize
where
    F: FnMut(&LiveRun, TickOutcome),
{
    let mut updates = 0;

    while !stop.load(Ordering::SeqCst) {
        let outcome = run.tick(source);
        if outcome.needs_layout() {
            updates += 1;
            on_update(run, outcome);
        }
        if outcome == TickOutcome::Complete {
            info!(updates, "run complete");
            break;
        }
        sleep_unless_stopped(interval, stop);
    }

    updates
}

fn sleep_unless_stopped(duration: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + duration;
    loop {
        if stop.load(Ordering::SeqCst) {
            return;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return;
        }
        thread::sleep(remaining.min(STOP_CHECK_INTERVAL));
    }
}
