//! Command-line interface orchestration for graphgen.
//!
//! A single command validates the parameters, asks before clearing an
//! occupied output directory, generates the dataset and writes every pattern
//! and graph as a DOT file.

mod commands;
mod confirm;
mod output;

pub use commands::{
    Cli, CliError, ExecutionSummary, Outcome, render_parameters, render_summary, run_cli,
};
pub use confirm::{AssumeYes, Confirm, PromptConfirm, is_affirmative};
pub use output::{OutputLayout, WrittenFiles};

#[cfg(test)]
mod test_helpers;
