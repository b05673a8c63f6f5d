//! # zodgen
//!
//! Schema resolution and [Zod](https://zod.dev/) model generation for
//! OpenAPI-style schema documents.
//!
//! Given a registry of named schemas and a usage map (which operation tags
//! consume which schemas), `zodgen` produces one TypeScript module per
//! entity containing runtime validators, static types and enum option
//! tuples, with cross-module imports resolved and declarations ordered so
//! nothing is referenced before it is defined.
//!
//! ## Quick Start
//!
//! ```rust
//! use zodgen::prelude::*;
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register(
//!     "User",
//!     Schema::object(
//!         vec![
//!             Property::new("id", Schema::string()),
//!             Property::new(
//!                 "tier",
//!                 StringSchema::new().with_enum(["free", "pro"]).into(),
//!             ),
//!         ],
//!         ["id", "tier"],
//!     ),
//! );
//! let usage: UsageMap = [("User", "Users")].into_iter().collect();
//!
//! let engine = ModelEngine::new(GeneratorConfig::default());
//! let output = engine.try_generate(&registry, &usage).unwrap();
//!
//! let users = output.entity("Users").unwrap();
//! assert!(users.content.contains("export const userTierOptions = [\"free\", \"pro\"] as const;"));
//! assert!(users.content.contains("export type User = z.infer<typeof UserValidationSchema>;"));
//! ```
//!
//! ## Pipeline
//!
//! | Phase | Module | Output |
//! |-------|--------|--------|
//! | Reference closures | [`registry`] | `schema -> reachable schemas` |
//! | Entity grouping | [`grouping`] | `schema -> entity` |
//! | Model generation | [`generator`] | one [`GeneratedModel`](generator::GeneratedModel) per schema |
//! | Exported names | [`symbols`] | enum declarations unique across modules |
//! | Declaration ordering | [`ordering`] | dependency-first order per entity |
//! | Import aggregation | [`imports`] | deduplicated import list per entity |
//!
//! [`engine::ModelEngine`] runs all phases; [`report::GenerationReport`]
//! collects what went wrong along the way.
//!
//! ## Recursion
//!
//! A schema that reaches itself through references (directly or through a
//! longer cycle) is marked recursive. The reference closing the cycle is
//! emitted as `z.any()` in the validator, and the model gets an explicit
//! structural type so the static type still names the referenced schema.

pub mod engine;
pub mod error;
pub mod generator;
pub mod grouping;
pub mod imports;
pub mod ir;
pub mod naming;
pub mod ordering;
pub mod registry;
pub mod report;
pub mod symbols;

pub use engine::{EntityBundle, GenerationOutput, ModelEngine};
pub use error::{
    EngineError, SchemaResolutionError, SymbolCollisionError, UnsupportedSchemaShapeError,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::{EntityBundle, GenerationOutput, ModelEngine};
    pub use crate::error::{
        EngineError, SchemaResolutionError, SymbolCollisionError, UnsupportedSchemaShapeError,
    };
    pub use crate::generator::{GeneratedModel, GeneratorConfig, IndentStyle, ModelGenerator};
    pub use crate::grouping::UsageMap;
    pub use crate::ir::{NumberSchema, OneOfSchema, Property, Schema, SchemaKind, StringSchema};
    pub use crate::registry::SchemaRegistry;
    pub use crate::report::{Diagnostic, GenerationReport};
}
