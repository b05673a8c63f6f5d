//! Intermediate Representation (IR) module.
//!
//! This module defines the schema data model that the engine consumes: a
//! closed set of nine schema kinds plus the attributes common to all of them.
//! Loaders build these values from an API document; generators only read them.

pub mod metadata;
pub mod schema;

pub use metadata::SchemaMetadata;
pub use schema::{
    ArraySchema, NumberSchema, ObjectSchema, OneOfSchema, Property, RecordSchema, Schema,
    SchemaKind, StringSchema,
};
