//! Generated model output types.
//!
//! A [`GeneratedModel`] is everything produced for one schema. It is created
//! once by the emitter and only read afterwards by ordering, import
//! aggregation and rendering.

use serde_json::Value;

/// Per-schema generation output.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedModel {
    /// Schema name in the registry
    pub name: String,

    /// Exported type name (e.g. "User")
    pub type_name: String,

    /// Exported validator symbol (e.g. "UserValidationSchema")
    pub validator_name: String,

    /// Validator expression
    pub validator: String,

    /// How the static type is declared
    pub type_declaration: TypeDeclaration,

    /// Enum constant/type pairs emitted before the model
    pub auxiliaries: Vec<AuxiliaryDeclaration>,

    /// Schemas referenced directly, deduplicated, in first-seen order
    pub referenced_schemas: Vec<String>,

    /// Whether the schema reaches itself through references
    pub is_recursive: bool,

    /// Per-property decisions, for object models
    pub properties: Vec<PropertyDecision>,

    /// Whether the schema is an object (and gets a DTO class)
    pub is_object: bool,

    /// Schema description
    pub description: Option<String>,

    /// Schema example
    pub example: Option<Value>,
}

impl GeneratedModel {
    /// Check if the model declares an explicit structural type.
    pub fn is_explicitly_typed(&self) -> bool {
        matches!(self.type_declaration, TypeDeclaration::Explicit(_))
    }

    /// Check if the model references the given schema.
    pub fn references(&self, schema: &str) -> bool {
        self.referenced_schemas.iter().any(|r| r == schema)
    }
}

/// Static type declaration mode of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDeclaration {
    /// `type X = z.infer<typeof XValidationSchema>`
    Inferred,

    /// `type X = <structural type>`
    Explicit(String),
}

/// Named options tuple plus its element type alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryDeclaration {
    /// Constant name (e.g. "userTierOptions")
    pub constant_name: String,

    /// Element type alias (e.g. "UserTier"); `None` when the model's own
    /// type already names it
    pub type_name: Option<String>,

    /// Literal values, in declaration order
    pub values: Vec<String>,
}

/// The type decision taken for one object property.
///
/// Validators, explicit types and framework decorators are all rendered
/// from these.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecision {
    /// Property name
    pub name: String,

    /// Validator expression including modifiers
    pub validator: String,

    /// Static type expression, without `| null`
    pub ts_type: String,

    /// Whether the property is required
    pub required: bool,

    /// Whether `null` is accepted
    pub nullable: bool,

    /// Shape classification of the value
    pub shape: ValueShape,

    /// Property description
    pub description: Option<String>,

    /// Property example
    pub example: Option<Value>,
}

/// Coarse classification of a generated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueShape {
    /// string, number or boolean
    Scalar(ScalarKind),

    /// Enum backed by an options constant
    Enum(String),

    /// Single string literal
    Literal(String),

    /// Reference to another schema
    Reference {
        /// Referenced schema name
        schema: String,
        /// Whether the target is an object (has a DTO class)
        object: bool,
    },

    /// Array of a shape
    Array(Box<ValueShape>),

    /// String-keyed map
    Map,

    /// Union of several shapes
    Union,

    /// The null value
    Null,

    /// Unconstrained
    Unknown,
}

/// Scalar value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// string
    String,
    /// number
    Number,
    /// boolean
    Boolean,
}

impl ScalarKind {
    /// Constructor name used in framework decorators.
    pub fn constructor(&self) -> &'static str {
        match self {
            ScalarKind::String => "String",
            ScalarKind::Number => "Number",
            ScalarKind::Boolean => "Boolean",
        }
    }
}
