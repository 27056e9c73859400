//! Output directory preparation and DOT file layout.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use graphgen_core::{
    DotWriter, Generation, LabeledGraph, PATTERN_DIR, graph_file_name, pattern_file_name,
};
use tracing::{Span, debug, field, info, instrument};

use super::CliError;

/// Counts of files written by [`OutputLayout::write_generation`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WrittenFiles {
    /// Pattern files under the pattern sub-directory.
    pub patterns: usize,
    /// Dataset graph files in the output directory.
    pub graphs: usize,
}

/// Paths of everything a run writes below one output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Lays out files under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the pattern files.
    #[must_use]
    pub fn pattern_dir(&self) -> PathBuf {
        self.root.join(PATTERN_DIR)
    }

    /// Path of pattern `number` (one-based) out of `total`.
    #[must_use]
    pub fn pattern_path(&self, number: usize, total: usize) -> PathBuf {
        self.pattern_dir().join(pattern_file_name(number, total))
    }

    /// Path of dataset graph `number` (one-based) out of `total`.
    #[must_use]
    pub fn graph_path(&self, number: usize, total: usize) -> PathBuf {
        self.root.join(graph_file_name(number, total))
    }

    /// Whether the output directory exists and already has entries.
    ///
    /// # Errors
    /// Returns [`CliError::Io`] when an existing directory cannot be listed.
    pub fn is_occupied(&self) -> Result<bool, CliError> {
        if !self.root.is_dir() {
            return Ok(false);
        }
        let mut entries = fs::read_dir(&self.root).map_err(|source| CliError::Io {
            action: "list",
            path: self.root.clone(),
            source,
        })?;
        Ok(entries.next().is_some())
    }

    /// Removes the regular files directly inside the output directory.
    /// Sub-directories and their contents are left alone.
    ///
    /// # Errors
    /// Returns [`CliError::Io`] when listing or deleting fails.
    #[instrument(name = "cli.clear_output", err, skip(self), fields(removed = field::Empty))]
    pub fn clear_files(&self) -> Result<usize, CliError> {
        let list_error = |source| CliError::Io {
            action: "list",
            path: self.root.clone(),
            source,
        };
        let mut removed = 0;
        for entry in fs::read_dir(&self.root).map_err(list_error)? {
            let entry = entry.map_err(list_error)?;
            let file_type = entry.file_type().map_err(list_error)?;
            if !file_type.is_file() {
                continue;
            }
            let path = entry.path();
            fs::remove_file(&path).map_err(|source| CliError::Io {
                action: "remove",
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "removed");
            removed += 1;
        }
        Span::current().record("removed", removed);
        Ok(removed)
    }

    /// Creates the output directory and its pattern sub-directory.
    ///
    /// # Errors
    /// Returns [`CliError::Io`] when a directory cannot be created.
    pub fn create_dirs(&self) -> Result<(), CliError> {
        let pattern_dir = self.pattern_dir();
        fs::create_dir_all(&pattern_dir).map_err(|source| CliError::Io {
            action: "create",
            path: pattern_dir,
            source,
        })
    }

    /// Writes every pattern and dataset graph as a DOT file.
    ///
    /// # Errors
    /// Returns [`CliError::Io`] on the first file that cannot be written.
    #[instrument(
        name = "cli.write_outputs",
        err,
        skip(self, generation),
        fields(root = %self.root.display(), patterns = field::Empty, graphs = field::Empty),
    )]
    pub fn write_generation(
        &self,
        generation: &Generation,
        directed: bool,
    ) -> Result<WrittenFiles, CliError> {
        self.create_dirs()?;
        let writer = DotWriter::new(generation.alphabet(), directed);

        info!("writing patterns to output files");
        let pattern_total = generation.patterns().len();
        for (position, pattern) in generation.patterns().iter().enumerate() {
            let path = self.pattern_path(position + 1, pattern_total);
            write_dot_file(&writer, &path, pattern.graph())?;
        }

        info!("writing graph dataset to output files");
        let graph_total = generation.dataset().len();
        for (position, graph) in generation.dataset().iter().enumerate() {
            let path = self.graph_path(position + 1, graph_total);
            write_dot_file(&writer, &path, graph)?;
        }

        let span = Span::current();
        span.record("patterns", pattern_total);
        span.record("graphs", graph_total);
        Ok(WrittenFiles {
            patterns: pattern_total,
            graphs: graph_total,
        })
    }
}

/// Writes one graph, naming it after the file stem, and closes the file.
fn write_dot_file(writer: &DotWriter<'_>, path: &Path, graph: &LabeledGraph) -> Result<(), CliError> {
    let io_error = |source| CliError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    };
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = File::create(path).map_err(io_error)?;
    let mut buffered = BufWriter::new(file);
    writer
        .write_graph(&mut buffered, &name, graph)
        .map_err(io_error)?;
    buffered.flush().map_err(io_error)
}
