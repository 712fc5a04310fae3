use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use super::load_stages;
use crate::config::Config;
use crate::layout::layout_graph;
use crate::render::render_summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored per-column summary
    #[default]
    Text,
    /// The positioned graph as JSON
    Json,
}

/// Lay out a stage file and print the result.
pub fn execute(
    stages_path: &Path,
    collapsed: bool,
    format: OutputFormat,
    config: &Config,
) -> Result<()> {
    let stages = load_stages(stages_path)?;
    let graph = layout_graph(&stages, &config.layout, collapsed, &config.labels);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &graph)
                .context("Failed to serialize layout")?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            render_summary(&mut out, &graph)?;
            writeln!(
                out,
                "{} nodes, {} connections, {}x{}",
                graph.node_count(),
                graph.connections.len(),
                graph.measured_width,
                graph.measured_height
            )?;
        }
    }
    Ok(())
}
