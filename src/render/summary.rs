//! Per-column listing of a positioned graph

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use colored::Colorize;

use super::indicators::{state_color, state_indicator};
use crate::layout::{NodeColumn, NodeInfo, NodeKind, PlaceholderKind, PositionedGraph};
use crate::models::stage::{StageRecord, StageState};
use crate::utils::{format_duration_millis, truncate};

const NAME_WIDTH: usize = 28;
/// Folded stage names listed after a counter node
const MAX_FOLDED_NAMES: usize = 5;

/// Render one line per stage column, nested stages indented under it, then
/// the overall result.
///
/// ```text
/// ✓ Build                        success   100%  9s   @08:00:01
/// ● Test                         running    50%  10s  @08:00:10
///     unit › Compile             running    50%  5s   @08:00:10
/// ○ Deploy                       pending     0%
/// Result: running
/// ```
pub fn render_summary<W: Write>(w: &mut W, graph: &PositionedGraph<'_>) -> io::Result<()> {
    let mut stages: Vec<&StageRecord> = Vec::new();

    for column in &graph.node_columns {
        if let Some(top_stage) = column.top_stage {
            render_column(w, column, top_stage)?;
            stages.push(top_stage);
            continue;
        }
        for node in column.nodes() {
            if let NodeKind::Placeholder(PlaceholderKind::Counter { stages: folded }) = &node.kind {
                render_counter(w, &node.name, folded)?;
                stages.extend(folded.iter().copied());
            }
        }
    }

    let overall = StageState::most_severe(stages);
    writeln!(
        w,
        "{} {}",
        "Result:".bold(),
        overall.to_string().color(state_color(overall)).bold()
    )
}

fn render_column<W: Write>(
    w: &mut W,
    column: &NodeColumn<'_>,
    top_stage: &StageRecord,
) -> io::Result<()> {
    render_stage_line(w, "", &top_stage.name, top_stage)?;

    for node in column.nodes() {
        let Some(stage) = node.stage() else {
            continue;
        };
        if stage.id == top_stage.id {
            continue;
        }
        render_stage_line(w, "    ", &nested_name(node), stage)?;
    }
    Ok(())
}

fn nested_name(node: &NodeInfo<'_>) -> String {
    match node.seq_container_name {
        Some(branch) => format!("{branch} › {}", node.name),
        None => node.name.clone(),
    }
}

fn render_stage_line<W: Write>(
    w: &mut W,
    indent: &str,
    name: &str,
    stage: &StageRecord,
) -> io::Result<()> {
    let pending = stage.skeleton && !stage.has_started();
    let width = NAME_WIDTH.saturating_sub(indent.chars().count());
    let name = format!("{:<width$}", truncate(name, width));

    if pending {
        return writeln!(
            w,
            "{indent}{} {} {:<9} {:>4}%",
            "○".dimmed(),
            name.dimmed(),
            "pending".dimmed(),
            0
        );
    }

    write!(
        w,
        "{indent}{} {} {} {:>4.0}%",
        state_indicator(stage.state),
        name,
        format!("{:<9}", stage.state).color(state_color(stage.state)),
        stage.complete_percent
    )?;
    if stage.total_duration_millis > 0 {
        write!(w, "  {}", format_duration_millis(stage.total_duration_millis))?;
    }
    if let Some(started) = format_start_time(stage.start_time_millis) {
        write!(w, "  {}", format!("@{started}").dimmed())?;
    }
    writeln!(w)
}

fn render_counter<W: Write>(w: &mut W, label: &str, folded: &[&StageRecord]) -> io::Result<()> {
    let mut names: Vec<&str> = folded
        .iter()
        .take(MAX_FOLDED_NAMES)
        .map(|stage| stage.name.as_str())
        .collect();
    if folded.len() > MAX_FOLDED_NAMES {
        names.push("...");
    }
    writeln!(w, "{} {}", label.bold(), names.join(", ").dimmed())
}

/// UTC wall-clock time of a start timestamp; `None` when not started.
fn format_start_time(start_time_millis: u64) -> Option<String> {
    if start_time_millis == 0 {
        return None;
    }
    let millis = i64::try_from(start_time_millis).ok()?;
    let started = DateTime::<Utc>::from_timestamp_millis(millis)?;
    Some(started.format("%H:%M:%S").to_string())
}
