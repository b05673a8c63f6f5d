//! Model code generation.
//!
//! This module maps one named schema to a [`GeneratedModel`]: a validator
//! expression, a static type, auxiliary enum declarations and the set of
//! schemas it references.

pub mod annotations;
pub mod config;
pub mod model;
pub mod traits;
pub mod zod;

pub use config::{GeneratorConfig, IndentStyle, DEFAULT_HEADER};
pub use model::{
    AuxiliaryDeclaration, GeneratedModel, PropertyDecision, ScalarKind, TypeDeclaration,
    ValueShape,
};
pub use traits::{EmitResult, ModelGenerator};
pub use zod::{ZodEmitter, ZodTypeMapper};
