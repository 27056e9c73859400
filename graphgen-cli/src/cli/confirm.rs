//! Confirmation before clearing a non-empty output directory.

use std::{
    io::{self, BufRead, Write},
    path::Path,
};

const AFFIRMATIVE_ANSWERS: [&str; 5] = ["y", "yes", "yeah", "sure", "fine"];

/// Source of the answer to "delete the contents of this directory?".
pub trait Confirm {
    /// Asks whether the files in `directory` may be deleted.
    ///
    /// # Errors
    /// Returns an I/O error if the question cannot be asked or answered.
    fn confirm_clear(&mut self, directory: &Path) -> io::Result<bool>;
}

/// Whether `answer` counts as consent. Case and surrounding whitespace are
/// ignored.
///
/// # Examples
/// ```
/// use graphgen_cli::cli::is_affirmative;
///
/// assert!(is_affirmative(" Yeah\n"));
/// assert!(!is_affirmative("nope"));
/// ```
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE_ANSWERS.contains(&answer.as_str())
}

/// Asks on a writer and reads a single line from a reader, normally the
/// terminal.
#[derive(Debug)]
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    /// Prompts on `output` and reads answers from `input`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptConfirm<io::StdinLock<'static>, io::Stdout> {
    /// Prompts on standard output and reads standard input.
    #[must_use]
    pub fn terminal() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm_clear(&mut self, directory: &Path) -> io::Result<bool> {
        let shown = std::path::absolute(directory).unwrap_or_else(|_| directory.to_path_buf());
        write!(
            self.output,
            "WARNING: output directory is NOT empty:\n{}\nDELETE CONTENTS? [y/n] ",
            shown.display()
        )?;
        self.output.flush()?;
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

/// Accepts without asking, for `--assume-yes`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm_clear(&mut self, _directory: &Path) -> io::Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("y", true)]
    #[case("YES", true)]
    #[case("  sure  ", true)]
    #[case("fine\n", true)]
    #[case("yeah\r\n", true)]
    #[case("n", false)]
    #[case("", false)]
    #[case("yep", false)]
    fn recognises_affirmative_answers(#[case] answer: &str, #[case] expected: bool) {
        assert_eq!(is_affirmative(answer), expected);
    }

    #[test]
    fn prompt_names_the_directory_and_reads_one_line() {
        let mut output = Vec::new();
        let mut confirm = PromptConfirm::new(&b"Sure\nignored\n"[..], &mut output);
        let accepted = confirm
            .confirm_clear(Path::new("/tmp/dataset"))
            .expect("prompt must succeed");
        assert!(accepted);
        let prompt = String::from_utf8(output).expect("prompt is UTF-8");
        assert!(prompt.contains("/tmp/dataset"));
        assert!(prompt.ends_with("DELETE CONTENTS? [y/n] "));
    }

    #[test]
    fn end_of_input_declines() {
        let mut confirm = PromptConfirm::new(&b""[..], io::sink());
        assert!(!confirm.confirm_clear(Path::new("out")).expect("prompt must succeed"));
    }
}
