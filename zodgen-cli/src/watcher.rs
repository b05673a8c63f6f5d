//! Watching the input document for `generate --watch`.
//!
//! The parent directory is registered non-recursively rather than the file
//! itself: editors that save by replacing the file would otherwise detach the
//! watch after the first save.

use crate::error::{CliResult, WatchError};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A debounced change to the watched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// The document was written.
    Changed(PathBuf),
    /// The document is gone, possibly mid-save.
    Removed(PathBuf),
    /// The OS watcher reported a failure.
    Failed(String),
}

impl DocumentEvent {
    pub fn path(&self) -> Option<&Path> {
        match self {
            DocumentEvent::Changed(path) | DocumentEvent::Removed(path) => Some(path),
            DocumentEvent::Failed(_) => None,
        }
    }
}

/// Live watch handle. Dropping it stops the OS watcher.
pub struct WatchSession {
    _debouncer: Debouncer<RecommendedWatcher>,
    events: Receiver<DocumentEvent>,
}

impl WatchSession {
    /// Block until the next event; `None` once the watcher is gone.
    pub fn next_event(&self) -> Option<DocumentEvent> {
        self.events.recv().ok()
    }
}

/// Watches one OpenAPI document.
#[derive(Debug, Clone)]
pub struct DocumentWatcher {
    document: PathBuf,
    debounce: Duration,
}

impl DocumentWatcher {
    pub fn new(document: impl Into<PathBuf>) -> Self {
        Self {
            document: document.into(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Coalesce bursts of filesystem events arriving within `debounce`.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Start watching. Events arrive until the session is dropped.
    pub fn start(&self) -> CliResult<WatchSession> {
        let (tx, events) = mpsc::channel();
        let file_name = self.document.file_name().map(OsString::from);

        let mut debouncer = new_debouncer(
            self.debounce,
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| {
                forward(&tx, file_name.as_deref().map(Path::new), result)
            },
        )
        .map_err(WatchError::Debouncer)?;

        let dir = self.watch_dir();
        debouncer
            .watcher()
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Register {
                dir: dir.to_path_buf(),
                source,
            })?;

        tracing::debug!(document = %self.document.display(), "watching document");
        Ok(WatchSession {
            _debouncer: debouncer,
            events,
        })
    }

    fn watch_dir(&self) -> &Path {
        match self.document.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// Translate one debounced batch, dropping events for sibling files.
fn forward(
    tx: &Sender<DocumentEvent>,
    file_name: Option<&Path>,
    result: Result<Vec<DebouncedEvent>, notify::Error>,
) {
    let batch = match result {
        Ok(batch) => batch,
        Err(e) => {
            let _ = tx.send(DocumentEvent::Failed(e.to_string()));
            return;
        }
    };

    for path in batch.into_iter().map(|event| event.path) {
        if let Some(event) = classify(path, file_name) {
            let _ = tx.send(event);
        }
    }
}

fn classify(path: PathBuf, file_name: Option<&Path>) -> Option<DocumentEvent> {
    if path.file_name().map(Path::new) != file_name {
        return None;
    }
    Some(if path.exists() {
        DocumentEvent::Changed(path)
    } else {
        DocumentEvent::Removed(path)
    })
}
