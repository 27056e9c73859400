//! Argument parsing and the generate-and-write pipeline.

use std::{
    io::{self, Write},
    num::NonZeroUsize,
    path::PathBuf,
};

use clap::{ArgAction, Parser};
use graphgen_core::{GeneratorConfig, Generation, GraphGenError, GraphGenerator};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::{
    confirm::Confirm,
    output::{OutputLayout, WrittenFiles},
};

const DEFAULT_OUTPUT_DIR: &str = "graph-dataset/";

/// Options accepted by `graphgen`.
///
/// Short flags are accepted in either case, so `-d 100` and `-D 100` are the
/// same option.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "graphgen",
    about = "Generate a synthetic labeled-graph dataset with embedded frequent patterns.",
    disable_help_flag = true
)]
pub struct Cli {
    /// Directory receiving the DOT files.
    #[arg(short = 'O', short_alias = 'o', long = "output-dir", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Minimum support ratio of each pattern, in [0.01, 0.50] [default: 0.1].
    #[arg(short = 'S', short_alias = 's', long = "min-support")]
    pub min_support: Option<f64>,

    /// Number of graphs in the dataset, in [10, 100000] [default: 40].
    #[arg(short = 'D', short_alias = 'd', long = "dataset-len")]
    pub dataset_len: Option<usize>,

    /// Number of distinct frequent patterns [default: 4].
    #[arg(short = 'L', short_alias = 'l', long = "patterns")]
    pub patterns: Option<usize>,

    /// Number of distinct edge labels, in [1, 99] [default: 2].
    #[arg(short = 'E', short_alias = 'e', long = "edge-labels")]
    pub edge_labels: Option<usize>,

    /// Number of distinct vertex labels, in [2, 999] [default: 8].
    #[arg(short = 'V', short_alias = 'v', long = "vertex-labels")]
    pub vertex_labels: Option<usize>,

    /// Average graph size in edges, in [5, 100] [default: 9].
    #[arg(short = 'T', short_alias = 't', long = "avg-graph-size")]
    pub avg_graph_size: Option<usize>,

    /// Average pattern size in edges, in [2, 40] [default: 4].
    #[arg(short = 'I', short_alias = 'i', long = "avg-pattern-size")]
    pub avg_pattern_size: Option<usize>,

    /// Allow loop edges.
    #[arg(short = 'P', short_alias = 'p', long = "allow-loops")]
    pub allow_loops: bool,

    /// Generate undirected graphs.
    #[arg(short = 'U', short_alias = 'u', long = "undirected")]
    pub undirected: bool,

    /// Seed for reproducible runs; drawn at random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Consecutive rejected insertions tolerated before giving up; 0 retries
    /// forever [default: 1000000].
    #[arg(long = "retry-limit")]
    pub retry_limit: Option<usize>,

    /// Clear a non-empty output directory without asking.
    #[arg(short = 'Y', short_alias = 'y', long = "assume-yes")]
    pub assume_yes: bool,

    /// Print help.
    #[arg(short = 'H', short_alias = 'h', long = "help", action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Cli {
    /// Validates the options into a generator configuration.
    ///
    /// # Errors
    /// Returns [`GraphGenError::InvalidConfig`] listing every broken rule.
    pub fn config(&self) -> Result<GeneratorConfig, GraphGenError> {
        let mut builder = GeneratorConfig::builder()
            .with_directed(!self.undirected)
            .with_allow_loops(self.allow_loops);
        if let Some(min_support) = self.min_support {
            builder = builder.with_min_support(min_support);
        }
        if let Some(dataset_len) = self.dataset_len {
            builder = builder.with_dataset_len(dataset_len);
        }
        if let Some(patterns) = self.patterns {
            builder = builder.with_pattern_count(patterns);
        }
        if let Some(edge_labels) = self.edge_labels {
            builder = builder.with_edge_labels(edge_labels);
        }
        if let Some(vertex_labels) = self.vertex_labels {
            builder = builder.with_vertex_labels(vertex_labels);
        }
        if let Some(avg_graph_size) = self.avg_graph_size {
            builder = builder.with_avg_graph_size(avg_graph_size);
        }
        if let Some(avg_pattern_size) = self.avg_pattern_size {
            builder = builder.with_avg_pattern_size(avg_pattern_size);
        }
        if let Some(retry_limit) = self.retry_limit {
            builder = builder.with_retry_limit(NonZeroUsize::new(retry_limit));
        }
        builder.build()
    }
}

/// Errors surfaced while executing the CLI pipeline.
#[derive(Debug, Error)]
pub enum CliError {
    /// A filesystem operation on the output directory failed.
    #[error("failed to {action} `{path}`: {source}")]
    Io {
        /// Operation that failed, e.g. `write`.
        action: &'static str,
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The clear confirmation could not be read.
    #[error("failed to read confirmation: {source}")]
    Prompt {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Configuration or generation failed.
    #[error(transparent)]
    Core(#[from] GraphGenError),
}

/// Everything reported after a completed run.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Directory the files were written to.
    pub output_dir: PathBuf,
    /// Effective configuration.
    pub config: GeneratorConfig,
    /// Seed of the run's random generator.
    pub seed: u64,
    /// Files removed from a previously occupied output directory.
    pub cleared_files: usize,
    /// Generated patterns, dataset and reports.
    pub generation: Generation,
    /// Files written.
    pub written: WrittenFiles,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Files were generated and written.
    Completed(Box<ExecutionSummary>),
    /// The user declined to clear the output directory; nothing changed.
    Aborted,
}

/// Validates the options, prepares the output directory, generates the
/// dataset and writes it.
///
/// Nothing touches the filesystem until the configuration is valid. When the
/// output directory is non-empty `confirm` decides whether its files are
/// removed; declining returns [`Outcome::Aborted`].
///
/// # Errors
/// Returns [`CliError`] when validation, generation or file output fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use graphgen_cli::cli::{AssumeYes, Cli, Outcome, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let out = dir.path().join("dataset");
/// let cli = Cli::try_parse_from(["graphgen", "--seed", "1", "-O", out.to_str().ok_or("utf-8")?])?;
/// let Outcome::Completed(summary) = run_cli(cli, &mut AssumeYes)? else {
///     return Err("run aborted".into());
/// };
/// assert_eq!(summary.written.graphs, 40);
/// assert!(out.join("frequent-patterns").join("pattern_1.dot").is_file());
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli, confirm),
    fields(output_dir = %cli.output_dir.display(), seed = field::Empty),
)]
pub fn run_cli(cli: Cli, confirm: &mut dyn Confirm) -> Result<Outcome, CliError> {
    let config = cli.config()?;
    let layout = OutputLayout::new(cli.output_dir);

    let cleared_files = if layout.is_occupied()? {
        let accepted = confirm
            .confirm_clear(layout.root())
            .map_err(|source| CliError::Prompt { source })?;
        if !accepted {
            info!("output directory left untouched");
            return Ok(Outcome::Aborted);
        }
        layout.clear_files()?
    } else {
        0
    };

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
    Span::current().record("seed", seed);
    let mut rng = SmallRng::seed_from_u64(seed);
    let generation = GraphGenerator::new(&config).generate(&mut rng)?;
    let written = layout.write_generation(&generation, config.directed())?;

    info!(
        patterns = written.patterns,
        graphs = written.graphs,
        "all done"
    );
    Ok(Outcome::Completed(Box::new(ExecutionSummary {
        output_dir: layout.root().to_path_buf(),
        config,
        seed,
        cleared_files,
        generation,
        written,
    })))
}

/// Renders the effective parameters to `writer`.
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
pub fn render_parameters(
    output_dir: &std::path::Path,
    config: &GeneratorConfig,
    mut writer: impl Write,
) -> io::Result<()> {
    writeln!(writer, "output directory ....... {}", output_dir.display())?;
    writeln!(writer, "min support ............ {:.2}", config.min_support())?;
    writeln!(writer, "dataset graphs ......... {}", config.dataset_len())?;
    writeln!(writer, "frequent patterns ...... {}", config.pattern_count())?;
    writeln!(writer, "edge labels ............ {}", config.edge_labels())?;
    writeln!(writer, "vertex labels .......... {}", config.vertex_labels())?;
    writeln!(writer, "average graph size ..... {}", config.avg_graph_size())?;
    writeln!(writer, "average pattern size ... {}", config.avg_pattern_size())?;
    writeln!(writer, "directed ............... {}", config.directed())?;
    writeln!(writer, "allow loops ............ {}", config.allow_loops())?;
    writeln!(writer)
}

/// Renders the parameters, pattern placements and balancing figures of a
/// completed run.
///
/// Graph numbers are one-based, matching the file names.
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    render_parameters(&summary.output_dir, &summary.config, &mut writer)?;
    writeln!(writer, "seed: {}", summary.seed)?;
    if summary.cleared_files > 0 {
        writeln!(writer, "removed {} existing files", summary.cleared_files)?;
    }
    writeln!(writer)?;

    let embedding = summary.generation.embedding();
    for placement in embedding.placements() {
        writeln!(
            writer,
            "Pattern-#{} with {} edges and support of {:.1}%",
            placement.number(),
            placement.target_edges(),
            placement.support() * 100.0
        )?;
        writeln!(
            writer,
            "inserted in {} graphs: {}\n",
            placement.graphs().len(),
            one_based(placement.graphs())
        )?;
    }
    writeln!(
        writer,
        "The following {} graphs include at least one pattern:",
        embedding.covered().len()
    )?;
    writeln!(writer, "{}\n", one_based(embedding.covered()))?;

    let balance = summary.generation.balance();
    writeln!(
        writer,
        "average graph size: {:.2} after embedding, {:.2} after filling {} graphs, {:.2} final",
        balance.average_before_fill,
        balance.average_after_fill,
        balance.filled_graphs,
        balance.final_average
    )?;
    if balance.correction_edges > 0 {
        writeln!(writer, "added {} corrective edges", balance.correction_edges)?;
    }
    writeln!(
        writer,
        "wrote {} pattern files and {} graph files",
        summary.written.patterns, summary.written.graphs
    )?;
    writeln!(writer, "All done.")
}

fn one_based(indices: &[usize]) -> String {
    let numbers: Vec<String> = indices.iter().map(|index| (index + 1).to_string()).collect();
    format!("[{}]", numbers.join(", "))
}
