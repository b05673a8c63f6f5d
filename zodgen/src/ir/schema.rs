//! Schema IR definitions.
//!
//! A [`Schema`] is one value shape from the input document: a [`SchemaKind`]
//! (one of nine variants) plus [`SchemaMetadata`]. Object properties keep
//! their declaration order, since generated output follows it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::metadata::SchemaMetadata;

/// A typed description of one value shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The kind of schema and its kind-specific attributes
    pub kind: SchemaKind,

    /// Attributes common to all kinds
    #[serde(default)]
    pub metadata: SchemaMetadata,
}

impl Schema {
    /// Create a schema of the given kind with empty metadata.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            metadata: SchemaMetadata::default(),
        }
    }

    /// Plain string schema.
    pub fn string() -> Self {
        Self::new(SchemaKind::String(StringSchema::default()))
    }

    /// Plain number schema.
    pub fn number() -> Self {
        Self::new(SchemaKind::Number(NumberSchema::default()))
    }

    /// Integer schema.
    pub fn integer() -> Self {
        Self::new(SchemaKind::Number(NumberSchema::default().with_integer(true)))
    }

    /// Boolean schema.
    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    /// Null schema.
    pub fn null() -> Self {
        Self::new(SchemaKind::Null)
    }

    /// Object schema with the given properties and required names.
    pub fn object<I, S>(properties: Vec<Property>, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SchemaKind::Object(ObjectSchema::new(properties, required)))
    }

    /// Record (string-keyed map) schema.
    pub fn record(value: Schema) -> Self {
        Self::new(SchemaKind::Record(RecordSchema::new(value)))
    }

    /// Array schema.
    pub fn array(items: Schema) -> Self {
        Self::new(SchemaKind::Array(ArraySchema::new(Some(items))))
    }

    /// Array schema without an `items` declaration.
    pub fn untyped_array() -> Self {
        Self::new(SchemaKind::Array(ArraySchema::new(None)))
    }

    /// Union schema.
    pub fn one_of(branches: Vec<Schema>) -> Self {
        Self::new(SchemaKind::OneOf(OneOfSchema::new(branches)))
    }

    /// Reference to a named schema.
    pub fn reference(target: impl Into<String>) -> Self {
        Self::new(SchemaKind::Ref {
            target: target.into(),
        })
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    /// Set the nullable flag.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.metadata.nullable = nullable;
        self
    }

    /// Set the example value.
    pub fn with_example(mut self, example: Value) -> Self {
        self.metadata.example = Some(example);
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.metadata.default = Some(default);
        self
    }

    /// Check if this schema is one of the primitive kinds.
    pub fn is_primitive(&self) -> bool {
        self.kind.is_primitive()
    }

    /// The referenced schema name, if this is a `Ref`.
    pub fn ref_target(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Ref { target } => Some(target),
            _ => None,
        }
    }
}

impl From<SchemaKind> for Schema {
    fn from(kind: SchemaKind) -> Self {
        Schema::new(kind)
    }
}

impl From<StringSchema> for Schema {
    fn from(s: StringSchema) -> Self {
        Schema::new(SchemaKind::String(s))
    }
}

impl From<NumberSchema> for Schema {
    fn from(n: NumberSchema) -> Self {
        Schema::new(SchemaKind::Number(n))
    }
}

impl From<OneOfSchema> for Schema {
    fn from(o: OneOfSchema) -> Self {
        Schema::new(SchemaKind::OneOf(o))
    }
}

/// Schema kind enumeration.
///
/// The set is closed: every generator dispatches with an exhaustive match,
/// so adding a kind is a compile-time checked change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SchemaKind {
    /// String value, optionally an enum of literals
    String(StringSchema),

    /// Numeric value
    Number(NumberSchema),

    /// Boolean value
    Boolean,

    /// The `null` value
    Null,

    /// Object with named properties
    Object(ObjectSchema),

    /// String-keyed map with homogeneous values
    Record(RecordSchema),

    /// Homogeneous array
    Array(ArraySchema),

    /// Union of alternatives
    OneOf(OneOfSchema),

    /// Reference to another named schema
    Ref {
        /// The referenced schema name
        target: String,
    },
}

impl SchemaKind {
    /// Check if this is a primitive kind (no outgoing schema edges).
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            SchemaKind::String(_) | SchemaKind::Number(_) | SchemaKind::Boolean | SchemaKind::Null
        )
    }

    /// Short kind label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            SchemaKind::String(_) => "string",
            SchemaKind::Number(_) => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Null => "null",
            SchemaKind::Object(_) => "object",
            SchemaKind::Record(_) => "record",
            SchemaKind::Array(_) => "array",
            SchemaKind::OneOf(_) => "oneOf",
            SchemaKind::Ref { .. } => "ref",
        }
    }
}

/// String schema attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringSchema {
    /// Format hint (email, uuid, date-time, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Allowed literal values, in declaration order
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    /// Minimum length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// Maximum length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// Regular expression the value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl StringSchema {
    /// Create a plain string schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the enum literals.
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set the minimum length.
    pub fn with_min_length(mut self, min: u64) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set the maximum length.
    pub fn with_max_length(mut self, max: u64) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set the pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// Number schema attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberSchema {
    /// Inclusive lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Inclusive upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Whether only integers are accepted
    #[serde(default)]
    pub integer: bool,
}

impl NumberSchema {
    /// Create an unconstrained number schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower bound.
    pub fn with_minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    /// Set the upper bound.
    pub fn with_maximum(mut self, max: f64) -> Self {
        self.maximum = Some(max);
        self
    }

    /// Set the integer flag.
    pub fn with_integer(mut self, integer: bool) -> Self {
        self.integer = integer;
        self
    }
}

/// A named object property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property name as it appears on the wire
    pub name: String,

    /// Property value schema
    pub schema: Schema,
}

impl Property {
    /// Create a new property.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Object schema attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    /// Properties in declaration order
    #[serde(default)]
    pub properties: Vec<Property>,

    /// Names of required properties
    #[serde(default)]
    pub required: BTreeSet<String>,
}

impl ObjectSchema {
    /// Create a new object schema.
    pub fn new<I, S>(properties: Vec<Property>, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            properties,
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a property is required.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }
}

/// Record schema attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Schema of every value (`additionalProperties`)
    pub value: Box<Schema>,
}

impl RecordSchema {
    /// Create a new record schema.
    pub fn new(value: Schema) -> Self {
        Self {
            value: Box::new(value),
        }
    }
}

/// Array schema attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArraySchema {
    /// Item schema; `None` when the document omits `items`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
}

impl ArraySchema {
    /// Create a new array schema.
    pub fn new(items: Option<Schema>) -> Self {
        Self {
            items: items.map(Box::new),
        }
    }
}

/// Union schema attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneOfSchema {
    /// Alternatives in declaration order
    pub branches: Vec<Schema>,

    /// Discriminator property name, when the document declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
}

impl OneOfSchema {
    /// Create a new union schema.
    pub fn new(branches: Vec<Schema>) -> Self {
        Self {
            branches,
            discriminator: None,
        }
    }

    /// Set the discriminator property.
    pub fn with_discriminator(mut self, property: impl Into<String>) -> Self {
        self.discriminator = Some(property.into());
        self
    }
}
