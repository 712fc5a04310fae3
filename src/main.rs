use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stagegraph::commands::layout::OutputFormat;
use stagegraph::commands::watch::SourceArgs;
use stagegraph::commands::{estimate, layout, merge, watch};
use stagegraph::config::Config;

#[derive(Parser)]
#[command(name = "stagegraph")]
#[command(about = "Pipeline run graph layout and live stage merging", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: <config dir>/stagegraph/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a run's stages as a graph
    Layout {
        /// Stage list or run snapshot JSON
        stages: PathBuf,

        /// Fold columns past the visible limit into a counter and drop labels
        #[arg(long)]
        collapsed: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Merge a current run over a previous run's stages
    Merge {
        /// Previous run's stages
        previous: PathBuf,

        /// Current run's stages
        current: PathBuf,

        /// Step list to project onto upcoming stages
        #[arg(long)]
        steps: Option<PathBuf>,
    },

    /// Estimate completion of a current run's stages
    Estimate {
        /// Previous run's stages
        previous: PathBuf,

        /// Current run's stages
        current: PathBuf,
    },

    /// Poll a run and print a summary on every change
    #[command(group(ArgGroup::new("source").required(true).args(["run_file", "url"])))]
    Watch {
        /// Previous run's stages
        #[arg(long)]
        previous: PathBuf,

        /// Current run snapshot, re-read on every poll
        #[arg(long)]
        run_file: Option<PathBuf>,

        /// Current run steps, re-read on every poll (default: no steps)
        #[arg(long, requires = "run_file")]
        steps_file: Option<PathBuf>,

        /// Base URL serving `/stages` and `/steps`
        #[arg(long, conflicts_with_all = ["run_file", "steps_file"])]
        url: Option<String>,

        #[arg(long)]
        collapsed: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Only fails when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Layout {
            stages,
            collapsed,
            format,
        } => layout::execute(&stages, collapsed, format, &config),
        Commands::Merge {
            previous,
            current,
            steps,
        } => merge::execute(&previous, &current, steps.as_deref()),
        Commands::Estimate { previous, current } => estimate::execute(&previous, &current),
        Commands::Watch {
            previous,
            run_file,
            steps_file,
            url,
            collapsed,
        } => {
            let source = match (run_file, url) {
                (Some(run_file), _) => SourceArgs::Files {
                    run_file,
                    steps_file,
                },
                (None, Some(url)) => SourceArgs::Url(url),
                (None, None) => anyhow::bail!("either --run-file or --url is required"),
            };
            watch::execute(&previous, source, collapsed, &config)
        }
    }
}
