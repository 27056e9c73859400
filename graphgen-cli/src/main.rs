//! CLI entry point for generating a synthetic graph dataset.
//!
//! Parses the options with clap, runs the pipeline, renders the report to
//! stdout and maps failures to exit codes. Usage errors and help requests
//! exit successfully; configuration and I/O errors exit with a failure code.

use std::{
    io::{self, BufWriter, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;

use graphgen_cli::{
    cli::{AssumeYes, Cli, CliError, Confirm, Outcome, PromptConfirm, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Run the pipeline and render its report.
fn try_main(cli: Cli) -> Result<()> {
    let mut confirm: Box<dyn Confirm> = if cli.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(PromptConfirm::terminal())
    };
    let outcome = run_cli(cli, confirm.as_mut()).context("failed to generate dataset")?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    match outcome {
        Outcome::Completed(summary) => {
            render_summary(&summary, &mut writer).context("failed to render summary")?;
        }
        Outcome::Aborted => writeln!(writer, "ABORT.").context("failed to write output")?,
    }
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help output and malformed invocations both end the run cleanly.
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
    };

    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main(cli) {
        report_failure(&err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn report_failure(err: &anyhow::Error) {
    let core = err.downcast_ref::<CliError>().and_then(|cli_error| match cli_error {
        CliError::Core(core) => Some(core),
        CliError::Io { .. } | CliError::Prompt { .. } => None,
    });

    if let Some(core) = core {
        for violation in core.violations() {
            error!(code = %violation.code(), "{violation}");
        }
    }

    let code_field = core.map(|core| field::display(core.code().as_str()));
    error!(error = %err, code = code_field, "graph generation failed");
}

/// Tracing is not available yet, so write straight to stderr.
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
