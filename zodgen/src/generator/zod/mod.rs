//! Zod model generator.
//!
//! # Components
//!
//! - [`ZodEmitter`] - The model generator implementing [`ModelGenerator`](crate::generator::ModelGenerator)
//! - [`ZodTypeMapper`] - Maps schemas in value position to Zod validators and TypeScript types

pub mod emitter;
pub mod type_mapper;

pub use emitter::ZodEmitter;
pub use type_mapper::{MappedValue, MappingContext, ZodTypeMapper};
