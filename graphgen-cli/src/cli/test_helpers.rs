//! Small helpers shared across CLI tests.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use clap::Parser;
use tempfile::TempDir;

use super::{Cli, CliError, Confirm, ExecutionSummary, Outcome, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// Parses `args` as if they followed the binary name.
pub(super) fn parse(args: &[&str]) -> Cli {
    let argv = std::iter::once("graphgen").chain(args.iter().copied());
    match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => panic!("arguments must parse: {err}"),
    }
}

/// Parses `args` with `--output-dir` pointing at `out` and a fixed seed.
pub(super) fn parse_into(out: &Path, args: &[&str]) -> Cli {
    let mut cli = parse(args);
    cli.output_dir = out.to_path_buf();
    cli.seed.get_or_insert(7);
    cli
}

/// Answers the clear prompt with a fixed reply and remembers each question.
#[derive(Debug, Default)]
pub(super) struct ScriptedConfirm {
    pub(super) answer: bool,
    pub(super) asked: Vec<PathBuf>,
}

impl ScriptedConfirm {
    pub(super) fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Vec::new(),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm_clear(&mut self, directory: &Path) -> io::Result<bool> {
        self.asked.push(directory.to_path_buf());
        Ok(self.answer)
    }
}

/// Fails the test if asked anything.
pub(super) struct NeverAsked;

impl Confirm for NeverAsked {
    fn confirm_clear(&mut self, directory: &Path) -> io::Result<bool> {
        panic!("unexpected prompt for {}", directory.display());
    }
}

pub(super) fn run_completed(cli: Cli, confirm: &mut dyn Confirm) -> ExecutionSummary {
    match run_cli(cli, confirm) {
        Ok(Outcome::Completed(summary)) => *summary,
        Ok(Outcome::Aborted) => panic!("run must not abort"),
        Err(err) => panic!("run must succeed: {err}"),
    }
}

pub(super) fn run_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli, &mut NeverAsked) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

/// Sorted names of the regular files directly inside `dir`.
pub(super) fn file_names(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
