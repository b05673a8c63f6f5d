//! # zodgen-cli
//!
//! CLI library for generating TypeScript Zod models from OpenAPI documents.
//!
//! This crate provides the outer layer around the `zodgen` engine: reading
//! the document, configuring the run, and writing the generated modules.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`loader`] - OpenAPI document loading into a registry and usage map
//! - [`generator`] - Entity module generation using the zodgen engine
//! - [`writer`] - Module output, dry-run previews and up-to-date checks
//! - [`watcher`] - File system watching for development mode
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod loader;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{GeneratedFile, GeneratedOutput, SchemaGenerator};
pub use loader::{DocumentLoader, LoadedDocument};
pub use watcher::DocumentWatcher;
pub use writer::{ModuleWriter, WriteMode};
