//! Model generator trait.
//!
//! The engine drives generation through [`ModelGenerator`] so the per-schema
//! synthesis can be swapped without touching grouping, ordering or import
//! aggregation.

use crate::error::SchemaResolutionError;
use crate::generator::model::GeneratedModel;
use crate::ir::Schema;
use crate::registry::{ClosureIndex, SchemaRegistry};
use crate::report::Diagnostic;

/// The result of generating one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitResult {
    /// The generated model
    pub model: GeneratedModel,

    /// Warnings and recursion events raised while generating it
    pub diagnostics: Vec<Diagnostic>,
}

/// Per-schema code generator.
///
/// Implementations must be pure: the output depends only on the arguments,
/// so schemas can be generated in any order (or in parallel).
pub trait ModelGenerator: Send + Sync {
    /// Short lowercase identifier (e.g. "zod").
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn name(&self) -> &'static str;

    /// File extension for generated modules.
    fn file_extension(&self) -> &'static str;

    /// Generate the model for one schema.
    ///
    /// A dangling reference anywhere in the schema aborts the schema with a
    /// [`SchemaResolutionError`].
    fn generate(
        &self,
        name: &str,
        schema: &Schema,
        registry: &SchemaRegistry,
        closures: &ClosureIndex,
    ) -> Result<EmitResult, SchemaResolutionError>;

    /// Render a model's declarations as module text.
    fn render_model(&self, model: &GeneratedModel) -> String;
}
