//! Persisting generated modules.
//!
//! Modules whose on-disk text already matches are left untouched so that
//! downstream watchers (`tsc --watch`, bundlers) only see real changes. The
//! same comparison backs the `validate` command.

use crate::error::{CliResult, WriteError};
use crate::generator::GeneratedFile;
use std::fs;
use std::path::{Path, PathBuf};

/// How modules reach the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Write changed modules.
    #[default]
    Write,
    /// Report what would be written without touching the disk.
    Preview,
}

/// What happened to one module.
#[derive(Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The module text changed and was written.
    Written { path: PathBuf, bytes: usize },
    /// The file already held this exact text.
    Unchanged { path: PathBuf },
    /// Preview mode; carries the text that would have been written.
    Previewed { path: PathBuf, content: String },
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written { path, .. }
            | WriteOutcome::Unchanged { path }
            | WriteOutcome::Previewed { path, .. } => path,
        }
    }

    /// Whether the disk was modified.
    pub fn touched_disk(&self) -> bool {
        matches!(self, WriteOutcome::Written { .. })
    }
}

/// Writes generated modules according to a [`WriteMode`].
#[derive(Debug, Default)]
pub struct ModuleWriter {
    mode: WriteMode,
}

impl ModuleWriter {
    pub fn new(mode: WriteMode) -> Self {
        Self { mode }
    }

    /// Writer for the `--dry-run` flag.
    pub fn from_dry_run(dry_run: bool) -> Self {
        Self::new(if dry_run {
            WriteMode::Preview
        } else {
            WriteMode::Write
        })
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Persist one module, creating its directory on demand.
    pub fn write(&self, file: &GeneratedFile) -> CliResult<WriteOutcome> {
        let path = file.path.clone();

        if self.mode == WriteMode::Preview {
            return Ok(WriteOutcome::Previewed {
                path,
                content: file.content.clone(),
            });
        }

        if is_current(file) {
            tracing::debug!(path = %path.display(), "module unchanged");
            return Ok(WriteOutcome::Unchanged { path });
        }

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        fs::write(&path, &file.content).map_err(|source| WriteError::WriteFile {
            path: path.clone(),
            source,
        })?;

        let bytes = file.content.len();
        tracing::debug!(path = %path.display(), bytes, "wrote module");
        Ok(WriteOutcome::Written { path, bytes })
    }

    /// Persist every module in order; the first failure stops the run.
    pub fn write_all(&self, files: &[GeneratedFile]) -> CliResult<Vec<WriteOutcome>> {
        files.iter().map(|file| self.write(file)).collect()
    }
}

fn is_current(file: &GeneratedFile) -> bool {
    fs::read_to_string(&file.path).is_ok_and(|existing| existing == file.content)
}

/// Paths whose on-disk text differs from the generated text, missing files
/// included.
pub fn outdated_files(files: &[GeneratedFile]) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|file| !is_current(file))
        .map(|file| file.path.clone())
        .collect()
}
