//! Per-run diagnostics.
//!
//! Generation never stops at the first problem. Every schema-level event is
//! recorded here keyed by schema name, and [`GenerationReport::outcome`]
//! decides afterwards whether the run as a whole failed.

use std::collections::BTreeMap;

use crate::error::{
    EngineError, SchemaResolutionError, SymbolCollisionError, UnsupportedSchemaShapeError,
};

/// A single schema-level event.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A dangling reference aborted the schema.
    Resolution(SchemaResolutionError),

    /// A shape without mapping rule was degraded to `z.any()`.
    UnsupportedShape(UnsupportedSchemaShapeError),

    /// The schema's type, validator or DTO name is already exported by
    /// another schema.
    SymbolCollision(SymbolCollisionError),

    /// A reference closed a cycle and was replaced by a placeholder.
    RecursionGuard {
        /// The schema being generated.
        schema: String,
        /// The reference that was not expanded.
        target: String,
    },
}

impl Diagnostic {
    /// Check if this diagnostic fails the run regardless of mode.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Diagnostic::Resolution(_) | Diagnostic::SymbolCollision(_)
        )
    }

    /// Check if this diagnostic is a warning (fails only in strict mode).
    pub fn is_warning(&self) -> bool {
        matches!(self, Diagnostic::UnsupportedShape(_))
    }
}

/// Structured per-run report, keyed by schema name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    entries: BTreeMap<String, Vec<Diagnostic>>,
}

impl GenerationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic for a schema. Exact duplicates are dropped.
    pub fn record(&mut self, schema: impl Into<String>, diagnostic: Diagnostic) {
        let entry = self.entries.entry(schema.into()).or_default();
        if !entry.contains(&diagnostic) {
            entry.push(diagnostic);
        }
    }

    /// Record several diagnostics for a schema.
    pub fn extend(&mut self, schema: &str, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.record(schema, diagnostic);
        }
    }

    /// Diagnostics recorded for a schema.
    pub fn diagnostics(&self, schema: &str) -> &[Diagnostic] {
        self.entries.get(schema).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over (schema, diagnostics) pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Diagnostic>)> {
        self.entries.iter()
    }

    /// All resolution errors, in schema order.
    pub fn resolution_errors(&self) -> Vec<&SchemaResolutionError> {
        self.all()
            .filter_map(|d| match d {
                Diagnostic::Resolution(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    /// All unsupported-shape warnings, in schema order.
    pub fn unsupported_shapes(&self) -> Vec<&UnsupportedSchemaShapeError> {
        self.all()
            .filter_map(|d| match d {
                Diagnostic::UnsupportedShape(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    /// All exported-name collisions, in schema order.
    pub fn symbol_collisions(&self) -> Vec<&SymbolCollisionError> {
        self.all()
            .filter_map(|d| match d {
                Diagnostic::SymbolCollision(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    /// All (schema, target) pairs where the recursion guard fired.
    pub fn recursion_events(&self) -> Vec<(&str, &str)> {
        self.all()
            .filter_map(|d| match d {
                Diagnostic::RecursionGuard { schema, target } => {
                    Some((schema.as_str(), target.as_str()))
                }
                _ => None,
            })
            .collect()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.all().filter(|d| d.is_warning()).count()
    }

    /// Number of errors.
    pub fn error_count(&self) -> usize {
        self.all().filter(|d| d.is_error()).count()
    }

    /// Check whether the run succeeded.
    ///
    /// Resolution errors always fail; each dangling reference is listed
    /// once even when several schemas were aborted by it. Symbol
    /// collisions always fail. Unsupported shapes fail only when `strict`
    /// is set. Recursion events never fail.
    pub fn outcome(&self, strict: bool) -> Result<(), EngineError> {
        let mut resolution: Vec<_> = self.resolution_errors().into_iter().cloned().collect();
        resolution.sort();
        resolution.dedup();
        if !resolution.is_empty() {
            return Err(EngineError::Resolution(resolution));
        }
        let collisions: Vec<_> = self.symbol_collisions().into_iter().cloned().collect();
        if !collisions.is_empty() {
            return Err(EngineError::SymbolCollision(collisions));
        }
        if strict {
            let shapes: Vec<_> = self.unsupported_shapes().into_iter().cloned().collect();
            if !shapes.is_empty() {
                return Err(EngineError::Strict(shapes));
            }
        }
        Ok(())
    }

    fn all(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.values().flatten()
    }
}
