//! Error types for the engine.
//!
//! Per-schema failures are collected into a [`GenerationReport`](crate::report::GenerationReport)
//! rather than aborting the run; [`EngineError`] is what a run turns into
//! once the report decides it cannot succeed.

use thiserror::Error;

/// A `Ref` names a schema that does not exist in the registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Error)]
#[error("Schema '{schema}' references unknown schema '{reference}'")]
pub struct SchemaResolutionError {
    /// The schema that cited the dangling name.
    pub schema: String,
    /// The dangling name.
    pub reference: String,
}

impl SchemaResolutionError {
    /// Create a new resolution error.
    pub fn new(schema: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            reference: reference.into(),
        }
    }
}

/// A schema shape has no mapping rule and was degraded to `z.any()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported shape in '{schema}' at '{path}': {shape}")]
pub struct UnsupportedSchemaShapeError {
    /// The schema being generated.
    pub schema: String,
    /// Dotted property path inside the schema (empty for the root).
    pub path: String,
    /// What was found.
    pub shape: String,
}

impl UnsupportedSchemaShapeError {
    /// Create a new unsupported-shape error.
    pub fn new(
        schema: impl Into<String>,
        path: impl Into<String>,
        shape: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            path: path.into(),
            shape: shape.into(),
        }
    }
}

/// Two schemas map to the same exported name, e.g. `user_profile` and
/// `UserProfile`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Error)]
#[error("Schemas '{first}' and '{schema}' both export '{symbol}'")]
pub struct SymbolCollisionError {
    /// The schema whose symbol was already taken.
    pub schema: String,
    /// The schema that claimed the symbol first.
    pub first: String,
    /// The contested symbol.
    pub symbol: String,
}

impl SymbolCollisionError {
    /// Create a new collision error.
    pub fn new(
        schema: impl Into<String>,
        first: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            first: first.into(),
            symbol: symbol.into(),
        }
    }
}

/// Run-level failure.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// One or more references could not be resolved.
    #[error("Unresolved schema references:\n{}", format_list(.0))]
    Resolution(Vec<SchemaResolutionError>),

    /// Distinct schemas would export the same name.
    #[error("Conflicting exported names:\n{}", format_list(.0))]
    SymbolCollision(Vec<SymbolCollisionError>),

    /// Strict mode rejected degraded shapes.
    #[error("Unsupported schema shapes (strict mode):\n{}", format_list(.0))]
    Strict(Vec<UnsupportedSchemaShapeError>),
}

/// Format a list of errors for display.
fn format_list<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_display() {
        let err = SchemaResolutionError::new("Order", "Customer");
        assert_eq!(
            err.to_string(),
            "Schema 'Order' references unknown schema 'Customer'"
        );
    }

    #[test]
    fn test_engine_error_lists_every_reference() {
        let err = EngineError::Resolution(vec![
            SchemaResolutionError::new("A", "X"),
            SchemaResolutionError::new("B", "Y"),
        ]);
        let display = err.to_string();
        assert!(display.contains("1. Schema 'A' references unknown schema 'X'"));
        assert!(display.contains("2. Schema 'B' references unknown schema 'Y'"));
    }

    #[test]
    fn test_symbol_collision_display() {
        let err = SymbolCollisionError::new("user_profile", "UserProfile", "UserProfile");
        assert_eq!(
            err.to_string(),
            "Schemas 'UserProfile' and 'user_profile' both export 'UserProfile'"
        );
    }

    #[test]
    fn test_unsupported_shape_display() {
        let err = UnsupportedSchemaShapeError::new("Report", "meta", "nested object literal");
        assert!(err.to_string().contains("'Report' at 'meta'"));
    }
}
