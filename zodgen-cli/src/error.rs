//! Failures of the `zodgen` command line.
//!
//! Each stage of a run (config, document, engine, output, watch) has its own
//! error type carrying the path it was working on; [`CliError`] wraps them so
//! `main` can pick an exit code.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use zodgen::EngineError;

pub type CliResult<T> = Result<T, CliError>;

/// Any failure that ends a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot load document: {0}")]
    Load(#[from] LoadError),

    #[error("bad configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot write modules: {0}")]
    Write(#[from] WriteError),

    #[error("cannot watch document: {0}")]
    Watch(#[from] WatchError),

    /// Dangling references, or unsupported shapes under `--strict`.
    #[error("generation failed: {0}")]
    Engine(#[from] EngineError),

    /// Generated modules on disk are stale, or `init` would clobber a file.
    /// Exits with status 2.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The OpenAPI document could not be turned into a registry.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} is not valid YAML: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Parsed, but not shaped like an OpenAPI document.
    #[error("not an OpenAPI document: {message}")]
    InvalidDocument { message: String },
}

impl LoadError {
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}

/// `zodgen.toml` is missing, unreadable or holds unusable values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Only raised for an explicit `--config` path; a missing default file
    /// means built-in defaults.
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("'{key}' {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// A generated module could not be persisted.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The OS watcher could not be set up.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("debouncer setup failed: {0}")]
    Debouncer(#[source] notify::Error),

    #[error("cannot watch {}: {source}", dir.display())]
    Register {
        dir: PathBuf,
        #[source]
        source: notify::Error,
    },
}
