use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};

use super::load_stages;
use crate::config::Config;
use crate::layout::layout_graph;
use crate::live::{self, FileSource, HttpSource, LiveRun, RunSource, TickOutcome};
use crate::render::render_summary;

/// Where the current run is read from
#[derive(Debug, Clone)]
pub enum SourceArgs {
    Files {
        run_file: PathBuf,
        steps_file: Option<PathBuf>,
    },
    Url(String),
}

/// Poll a run until it completes or Ctrl+C, printing a summary per update.
pub fn execute(
    previous_path: &Path,
    source: SourceArgs,
    collapsed: bool,
    config: &Config,
) -> Result<()> {
    let previous = load_stages(previous_path)?;
    let source: Box<dyn RunSource> = match source {
        SourceArgs::Files {
            run_file,
            steps_file,
        } => Box::new(FileSource::new(run_file, steps_file)),
        SourceArgs::Url(base_url) => Box::new(HttpSource::new(&base_url)?),
    };

    let stop = Arc::new(AtomicBool::new(false));
    let stop_for_signal = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        stop_for_signal.store(true, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    let mut run = LiveRun::new(previous);
    let updates = live::watch(
        &mut run,
        source.as_ref(),
        config.poll.interval(),
        &stop,
        |run, outcome| {
            if let Err(e) = print_update(run, outcome, collapsed, config) {
                warn!(error = %e, "failed to print update");
            }
        },
    );

    if run.is_complete() {
        info!(updates, "watch finished");
    } else {
        info!(updates, "watch stopped before the run completed");
    }
    Ok(())
}

fn print_update(run: &LiveRun, outcome: TickOutcome, collapsed: bool, config: &Config) -> io::Result<()> {
    let graph = layout_graph(run.stages(), &config.layout, collapsed, &config.labels);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let heading = match outcome {
        TickOutcome::Complete => "Run complete".green().bold(),
        _ => "Run update".bold(),
    };
    writeln!(out, "{heading}")?;
    render_summary(&mut out, &graph)?;
    writeln!(out)?;
    out.flush()
}
