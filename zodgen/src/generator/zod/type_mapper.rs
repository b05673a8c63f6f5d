//! Schema to Zod mappings.
//!
//! This module maps a [`Schema`] in value position (a property, an array
//! item, a union branch, a record value, or a non-object root) to a pair of
//! parallel expressions: a Zod validator and a TypeScript type.
//!
//! # Mappings
//!
//! | Schema | Zod validator | TypeScript type |
//! |--------|---------------|-----------------|
//! | String | `z.string()` + format, `.min()`, `.max()`, `.regex()` | `string` |
//! | String enum (>1) | `z.enum(userTierOptions)` | `UserTier` |
//! | String enum (1) | `z.literal("free")` | `"free"` |
//! | Number | `z.number()` + `.int()`, `.min()`, `.max()` | `number` |
//! | Boolean / Null | `z.boolean()` / `z.null()` | `boolean` / `null` |
//! | Record | `z.record(z.string(), V)` | `Record<string, V>` |
//! | Array | `z.array(T)` | `Array<T>` |
//! | OneOf | `z.union([...])`, collapsed when one branch remains | `A \| B` |
//! | Ref | `{Name}ValidationSchema` | `{Name}` |
//! | Ref closing a cycle | `z.any()` | `{Name}` |

use tracing::{debug, warn};

use crate::error::{SchemaResolutionError, UnsupportedSchemaShapeError};
use crate::generator::model::{AuxiliaryDeclaration, ScalarKind, ValueShape};
use crate::ir::{
    ArraySchema, NumberSchema, ObjectSchema, OneOfSchema, RecordSchema, Schema, SchemaKind,
    StringSchema,
};
use crate::naming;
use crate::registry::{ClosureIndex, SchemaRegistry};
use crate::report::Diagnostic;

/// Placeholder validator for values that cannot be checked.
pub const ANY_VALIDATOR: &str = "z.any()";

/// The result of mapping one value.
///
/// `validator` and `ts_type` do not include the value's own nullability;
/// `nullable` carries it so the caller can apply it in the right place.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedValue {
    /// Zod validator expression
    pub validator: String,

    /// TypeScript type expression
    pub ts_type: String,

    /// Whether `null` is accepted
    pub nullable: bool,

    /// Shape classification
    pub shape: ValueShape,
}

impl MappedValue {
    fn new(validator: impl Into<String>, ts_type: impl Into<String>, shape: ValueShape) -> Self {
        Self {
            validator: validator.into(),
            ts_type: ts_type.into(),
            nullable: false,
            shape,
        }
    }

    fn any() -> Self {
        Self::new(ANY_VALIDATOR, "any", ValueShape::Unknown)
    }

    /// Fold nullability into both expressions.
    pub fn with_nullable_applied(mut self) -> Self {
        if self.nullable {
            self.validator.push_str(".nullable()");
            self.ts_type = format!("{} | null", self.ts_type);
            self.nullable = false;
        }
        self
    }
}

/// Accumulates everything a single schema's generation produces besides
/// the expressions themselves.
///
/// One context exists per generated schema. Nothing in it is shared between
/// schemas, so independent schemas can be generated in any order.
#[derive(Debug)]
pub struct MappingContext<'a> {
    /// The schema being generated
    pub owner: &'a str,
    registry: &'a SchemaRegistry,
    closures: &'a ClosureIndex,
    /// Enum declarations emitted so far
    pub auxiliaries: Vec<AuxiliaryDeclaration>,
    /// Schemas referenced so far, deduplicated
    pub references: Vec<String>,
    /// Warnings and recursion events
    pub diagnostics: Vec<Diagnostic>,
    /// Whether a reference closed a cycle
    pub recursive: bool,
}

impl<'a> MappingContext<'a> {
    /// Create a context for generating `owner`.
    pub fn new(owner: &'a str, registry: &'a SchemaRegistry, closures: &'a ClosureIndex) -> Self {
        Self {
            owner,
            registry,
            closures,
            auxiliaries: Vec::new(),
            references: Vec::new(),
            diagnostics: Vec::new(),
            recursive: false,
        }
    }

    fn reference(&mut self, target: &str) {
        if target != self.owner && !self.references.iter().any(|r| r == target) {
            self.references.push(target.to_string());
        }
    }

    fn unsupported(&mut self, path: &str, shape: impl Into<String>) {
        let error = UnsupportedSchemaShapeError::new(self.owner, path, shape);
        warn!(schema = %error.schema, path = %error.path, shape = %error.shape, "degrading unsupported shape to z.any()");
        self.diagnostics.push(Diagnostic::UnsupportedShape(error));
    }

    /// Register an enum declaration, returning the names actually used.
    ///
    /// Identical declarations are reused. A name already taken by different
    /// values gets a numeric suffix.
    fn register_enum(
        &mut self,
        constant: String,
        type_name: Option<String>,
        values: &[String],
    ) -> (String, Option<String>) {
        let mut attempt = 1;
        loop {
            let (c, t) = if attempt == 1 {
                (constant.clone(), type_name.clone())
            } else {
                (
                    format!("{}{}", constant, attempt),
                    type_name.as_ref().map(|t| format!("{}{}", t, attempt)),
                )
            };
            match self.auxiliaries.iter().find(|a| a.constant_name == c) {
                Some(existing) if existing.values == values => return (c, t),
                Some(_) => attempt += 1,
                None => {
                    self.auxiliaries.push(AuxiliaryDeclaration {
                        constant_name: c.clone(),
                        type_name: t.clone(),
                        values: values.to_vec(),
                    });
                    return (c, t);
                }
            }
        }
    }
}

/// Path of a value nested under `path` (`tags` + `items` -> `tags.items`).
fn child_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

/// Maps schemas in value position to Zod validators and TypeScript types.
#[derive(Debug, Clone)]
pub struct ZodTypeMapper {
    validator_suffix: String,
    explicit_typing: bool,
}

impl Default for ZodTypeMapper {
    fn default() -> Self {
        Self::new("ValidationSchema")
    }
}

impl ZodTypeMapper {
    /// Create a mapper that names validators `{Type}{suffix}`.
    pub fn new(validator_suffix: impl Into<String>) -> Self {
        Self {
            validator_suffix: validator_suffix.into(),
            explicit_typing: false,
        }
    }

    /// Whether referenced validators are declared as `z.ZodType<T>`.
    ///
    /// Such validators lose their object type, so they cannot be members
    /// of a `z.discriminatedUnion`.
    pub fn with_explicit_typing(mut self, explicit_typing: bool) -> Self {
        self.explicit_typing = explicit_typing;
        self
    }

    /// Map a value.
    ///
    /// `hint` names the value for enum declarations (the property name, or
    /// empty for a root schema). `path` is its dotted location inside the
    /// owning schema (`tags.items`), reported in diagnostics.
    pub fn map_value(
        &self,
        ctx: &mut MappingContext<'_>,
        schema: &Schema,
        hint: &str,
        path: &str,
    ) -> Result<MappedValue, SchemaResolutionError> {
        let mut mapped = match &schema.kind {
            SchemaKind::String(s) => self.map_string(ctx, s, hint),
            SchemaKind::Number(n) => self.map_number(n),
            SchemaKind::Boolean => MappedValue::new(
                "z.boolean()",
                "boolean",
                ValueShape::Scalar(ScalarKind::Boolean),
            ),
            SchemaKind::Null => MappedValue::new("z.null()", "null", ValueShape::Null),
            SchemaKind::Object(object) => self.map_object(ctx, object, hint, path)?,
            SchemaKind::Record(record) => self.map_record(ctx, record, hint, path)?,
            SchemaKind::Array(array) => self.map_array(ctx, array, hint, path)?,
            SchemaKind::OneOf(one_of) => self.map_one_of(ctx, one_of, hint, path)?,
            SchemaKind::Ref { target } => self.map_reference(ctx, target)?,
        };
        mapped.nullable |= schema.metadata.nullable;
        Ok(mapped)
    }

    /// Map a value nested in another value, with nullability folded in.
    pub fn map_nested(
        &self,
        ctx: &mut MappingContext<'_>,
        schema: &Schema,
        hint: &str,
        path: &str,
    ) -> Result<MappedValue, SchemaResolutionError> {
        Ok(self.map_value(ctx, schema, hint, path)?.with_nullable_applied())
    }

    fn map_string(&self, ctx: &mut MappingContext<'_>, s: &StringSchema, hint: &str) -> MappedValue {
        match s.enum_values.len() {
            0 => {}
            1 => {
                let literal = naming::quote(&s.enum_values[0]);
                return MappedValue::new(
                    format!("z.literal({})", literal),
                    literal.clone(),
                    ValueShape::Literal(s.enum_values[0].clone()),
                );
            }
            _ => {
                let constant = naming::enum_constant_name(ctx.owner, hint);
                let type_name = if hint.is_empty() {
                    None
                } else {
                    Some(naming::enum_type_name(ctx.owner, hint))
                };
                let (constant, type_name) = ctx.register_enum(constant, type_name, &s.enum_values);
                let ts_type =
                    type_name.unwrap_or_else(|| format!("(typeof {})[number]", constant));
                return MappedValue::new(
                    format!("z.enum({})", constant),
                    ts_type,
                    ValueShape::Enum(constant),
                );
            }
        }

        let mut validator = "z.string()".to_string();
        if let Some(refinement) = s.format.as_deref().and_then(format_refinement) {
            validator.push_str(refinement);
        }
        if let Some(min) = s.min_length {
            validator.push_str(&format!(".min({})", min));
        }
        if let Some(max) = s.max_length {
            validator.push_str(&format!(".max({})", max));
        }
        if let Some(pattern) = s.pattern.as_deref().filter(|p| !p.is_empty()) {
            validator.push_str(&format!(".regex(/{}/)", escape_regex(pattern)));
        }
        MappedValue::new(validator, "string", ValueShape::Scalar(ScalarKind::String))
    }

    fn map_number(&self, n: &NumberSchema) -> MappedValue {
        let mut validator = "z.number()".to_string();
        if n.integer {
            validator.push_str(".int()");
        }
        if let Some(min) = n.minimum {
            validator.push_str(&format!(".min({})", format_number(min)));
        }
        if let Some(max) = n.maximum {
            validator.push_str(&format!(".max({})", format_number(max)));
        }
        MappedValue::new(validator, "number", ValueShape::Scalar(ScalarKind::Number))
    }

    /// Map an object in value position.
    ///
    /// Nested object literals are not expanded. An object whose properties
    /// all are the same reference (or array of that reference) is read as a
    /// dictionary keyed by property name.
    fn map_object(
        &self,
        ctx: &mut MappingContext<'_>,
        object: &ObjectSchema,
        hint: &str,
        path: &str,
    ) -> Result<MappedValue, SchemaResolutionError> {
        let Some(first) = object.properties.first() else {
            return Ok(MappedValue::any());
        };

        let element = map_element_of(&first.schema);
        let homogeneous = element.is_some()
            && object
                .properties
                .iter()
                .all(|p| map_element_of(&p.schema) == element);

        if !homogeneous {
            ctx.unsupported(path, "nested object literal");
            return Ok(MappedValue::any());
        }

        let value = self.map_nested(ctx, &first.schema, hint, &child_path(path, &first.name))?;
        Ok(MappedValue::new(
            format!("z.record(z.string(), {})", value.validator),
            format!("Record<string, {}>", value.ts_type),
            ValueShape::Map,
        ))
    }

    fn map_record(
        &self,
        ctx: &mut MappingContext<'_>,
        record: &RecordSchema,
        hint: &str,
        path: &str,
    ) -> Result<MappedValue, SchemaResolutionError> {
        let value_path = child_path(path, "additionalProperties");
        let value = self.map_nested(ctx, &record.value, hint, &value_path)?;
        Ok(MappedValue::new(
            format!("z.record(z.string(), {})", value.validator),
            format!("Record<string, {}>", value.ts_type),
            ValueShape::Map,
        ))
    }

    fn map_array(
        &self,
        ctx: &mut MappingContext<'_>,
        array: &ArraySchema,
        hint: &str,
        path: &str,
    ) -> Result<MappedValue, SchemaResolutionError> {
        let Some(items) = &array.items else {
            ctx.unsupported(path, "array without items");
            return Ok(MappedValue::new(
                format!("z.array({})", ANY_VALIDATOR),
                "Array<any>",
                ValueShape::Array(Box::new(ValueShape::Unknown)),
            ));
        };

        let item_hint = naming::singularize(hint);
        let item = self.map_nested(ctx, items, &item_hint, &child_path(path, "items"))?;
        Ok(MappedValue::new(
            format!("z.array({})", item.validator),
            format!("Array<{}>", item.ts_type),
            ValueShape::Array(Box::new(item.shape)),
        ))
    }

    fn map_one_of(
        &self,
        ctx: &mut MappingContext<'_>,
        one_of: &OneOfSchema,
        hint: &str,
        path: &str,
    ) -> Result<MappedValue, SchemaResolutionError> {
        let has_null = one_of
            .branches
            .iter()
            .any(|b| matches!(b.kind, SchemaKind::Null));
        let branches: Vec<&Schema> = one_of
            .branches
            .iter()
            .filter(|b| !matches!(b.kind, SchemaKind::Null))
            .collect();

        let mut mapped = match branches.as_slice() {
            [] => MappedValue::new("z.null()", "null", ValueShape::Null),
            [single] => self.map_value(ctx, single, hint, path)?,
            _ => {
                let mut validators = Vec::with_capacity(branches.len());
                let mut types = Vec::with_capacity(branches.len());
                let mut discriminable = one_of.discriminator.is_some();
                for (index, branch) in branches.iter().enumerate() {
                    let branch_path = child_path(path, &format!("oneOf[{}]", index));
                    let value = self.map_value(ctx, branch, hint, &branch_path)?;
                    if let Some(property) = &one_of.discriminator {
                        discriminable &= !value.nullable
                            && self.is_discriminated_member(ctx, &value, property);
                    }
                    let value = value.with_nullable_applied();
                    validators.push(value.validator);
                    types.push(value.ts_type);
                }

                let discriminated = one_of.discriminator.as_ref().filter(|_| discriminable);
                let validator = match discriminated {
                    Some(property) => format!(
                        "z.discriminatedUnion({}, [{}])",
                        naming::quote(property),
                        validators.join(", ")
                    ),
                    None => format!("z.union([{}])", validators.join(", ")),
                };
                MappedValue::new(validator, types.join(" | "), ValueShape::Union)
            }
        };
        mapped.nullable |= has_null;
        Ok(mapped)
    }

    /// Check whether a union member can go into `z.discriminatedUnion`.
    ///
    /// zod only accepts plain object validators there, each declaring the
    /// discriminator as a required literal or enum. Nullable, recursive and
    /// explicitly typed targets are `ZodNullable`, `z.any()` or
    /// `z.ZodType<T>` and fall back to `z.union`.
    fn is_discriminated_member(
        &self,
        ctx: &MappingContext<'_>,
        value: &MappedValue,
        property: &str,
    ) -> bool {
        let ValueShape::Reference {
            schema: target,
            object: true,
        } = &value.shape
        else {
            return false;
        };
        if self.explicit_typing || value.validator == ANY_VALIDATOR {
            return false;
        }
        if ctx.closures.is_recursive(target) {
            return false;
        }
        let Some(referenced) = ctx.registry.get(target) else {
            return false;
        };
        let SchemaKind::Object(object) = &referenced.kind else {
            return false;
        };
        if referenced.metadata.nullable || !object.is_required(property) {
            return false;
        }
        object.properties.iter().any(|p| {
            p.name == property
                && !p.schema.metadata.nullable
                && matches!(&p.schema.kind, SchemaKind::String(s) if !s.enum_values.is_empty())
        })
    }

    fn map_reference(
        &self,
        ctx: &mut MappingContext<'_>,
        target: &str,
    ) -> Result<MappedValue, SchemaResolutionError> {
        let Some(referenced) = ctx.registry.get(target) else {
            return Err(SchemaResolutionError::new(ctx.owner, target));
        };
        let object = matches!(referenced.kind, SchemaKind::Object(_));
        ctx.reference(target);

        let shape = ValueShape::Reference {
            schema: target.to_string(),
            object,
        };
        let type_name = naming::type_name(target);

        if target == ctx.owner || ctx.closures.reaches(target, ctx.owner) {
            debug!(schema = %ctx.owner, target = %target, "recursion guard triggered");
            ctx.recursive = true;
            ctx.diagnostics.push(Diagnostic::RecursionGuard {
                schema: ctx.owner.to_string(),
                target: target.to_string(),
            });
            return Ok(MappedValue::new(ANY_VALIDATOR, type_name, shape));
        }

        Ok(MappedValue::new(
            naming::validator_name(target, &self.validator_suffix),
            type_name,
            shape,
        ))
    }
}

/// The map element a property value designates, if it is a reference or an
/// array of references.
fn map_element_of(schema: &Schema) -> Option<(bool, &str)> {
    match &schema.kind {
        SchemaKind::Ref { target } => Some((false, target.as_str())),
        SchemaKind::Array(ArraySchema { items: Some(items) }) => {
            items.ref_target().map(|target| (true, target))
        }
        _ => None,
    }
}

/// Zod refinement for a string format.
fn format_refinement(format: &str) -> Option<&'static str> {
    match format {
        "email" => Some(".email()"),
        "uuid" => Some(".uuid()"),
        "uri" | "url" => Some(".url()"),
        "date-time" => Some(".datetime()"),
        "date" => Some(".date()"),
        _ => None,
    }
}

/// Render a number literal, without a fractional part when it is integral.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Escape a regex pattern for use between the slashes of a JavaScript regex
/// literal.
///
/// Only a `/` that is not already escaped needs a backslash. Line
/// terminators cannot appear in a literal at all, and a dangling trailing
/// backslash would swallow the closing slash.
fn escape_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    let mut escaped = false;
    for c in pattern.chars() {
        if escaped {
            escaped = false;
            match c {
                '\n' => out.push('n'),
                '\r' => out.push('r'),
                '\u{2028}' => out.push_str("u2028"),
                '\u{2029}' => out.push_str("u2029"),
                _ => out.push(c),
            }
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '/' => out.push_str("\\/"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    if escaped {
        out.push('\\');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Property;

    struct Fixture {
        registry: SchemaRegistry,
        closures: ClosureIndex,
    }

    impl Fixture {
        fn new(schemas: Vec<(&str, Schema)>) -> Self {
            let registry: SchemaRegistry = schemas
                .into_iter()
                .map(|(n, s)| (n.to_string(), s))
                .collect();
            let closures = registry.closures();
            Self { registry, closures }
        }

        fn empty() -> Self {
            Self::new(vec![])
        }

        fn ctx<'a>(&'a self, owner: &'a str) -> MappingContext<'a> {
            MappingContext::new(owner, &self.registry, &self.closures)
        }
    }

    fn mapper() -> ZodTypeMapper {
        ZodTypeMapper::default()
    }

    #[test]
    fn test_plain_string() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("User");
        let v = mapper().map_value(&mut ctx, &Schema::string(), "id", "id").unwrap();
        assert_eq!(v.validator, "z.string()");
        assert_eq!(v.ts_type, "string");
        assert!(!v.nullable);
    }

    #[test]
    fn test_string_constraints_min_before_max() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("User");
        let schema: Schema = StringSchema::new()
            .with_max_length(20)
            .with_min_length(3)
            .with_format("email")
            .into();
        let v = mapper().map_value(&mut ctx, &schema, "email", "email").unwrap();
        assert_eq!(v.validator, "z.string().email().min(3).max(20)");
    }

    #[test]
    fn test_string_pattern_is_escaped() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Path");
        let schema: Schema = StringSchema::new().with_pattern("^/api/.*$").into();
        let v = mapper().map_value(&mut ctx, &schema, "p", "p").unwrap();
        assert_eq!(v.validator, "z.string().regex(/^\\/api\\/.*$/)");
    }

    #[test]
    fn test_escaped_slash_in_pattern_is_kept() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Path");
        let schema: Schema = StringSchema::new().with_pattern(r"^a\/b$").into();
        let v = mapper().map_value(&mut ctx, &schema, "p", "p").unwrap();
        assert_eq!(v.validator, r"z.string().regex(/^a\/b$/)");
    }

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex(r"[a/b]\d+"), r"[a\/b]\d+");
        assert_eq!(escape_regex(r"\\/"), r"\\\/");
        assert_eq!(escape_regex("a\nb"), r"a\nb");
        assert_eq!(escape_regex(r"ends\"), r"ends\\");
    }

    #[test]
    fn test_empty_pattern_is_skipped() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Path");
        let schema: Schema = StringSchema::new().with_pattern("").into();
        let v = mapper().map_value(&mut ctx, &schema, "p", "p").unwrap();
        assert_eq!(v.validator, "z.string()");
    }

    #[test]
    fn test_enum_emits_scoped_auxiliary() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("User");
        let schema: Schema = StringSchema::new()
            .with_enum(["free", "pro", "enterprise"])
            .into();
        let v = mapper().map_value(&mut ctx, &schema, "tier", "tier").unwrap();

        assert_eq!(v.validator, "z.enum(userTierOptions)");
        assert_eq!(v.ts_type, "UserTier");
        assert_eq!(
            ctx.auxiliaries,
            vec![AuxiliaryDeclaration {
                constant_name: "userTierOptions".into(),
                type_name: Some("UserTier".into()),
                values: vec!["free".into(), "pro".into(), "enterprise".into()],
            }]
        );
    }

    #[test]
    fn test_single_literal_enum_collapses() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Event");
        let schema: Schema = StringSchema::new().with_enum(["created"]).into();
        let v = mapper().map_value(&mut ctx, &schema, "kind", "kind").unwrap();

        assert_eq!(v.validator, "z.literal(\"created\")");
        assert_eq!(v.ts_type, "\"created\"");
        assert!(ctx.auxiliaries.is_empty());
    }

    #[test]
    fn test_root_enum_has_no_type_alias() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Status");
        let schema: Schema = StringSchema::new().with_enum(["on", "off"]).into();
        let v = mapper().map_value(&mut ctx, &schema, "", "").unwrap();

        assert_eq!(v.validator, "z.enum(statusOptions)");
        assert_eq!(v.ts_type, "(typeof statusOptions)[number]");
        assert_eq!(ctx.auxiliaries[0].type_name, None);
    }

    #[test]
    fn test_enum_name_collision_gets_suffix() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Pick");
        let a: Schema = StringSchema::new().with_enum(["a", "b"]).into();
        let b: Schema = StringSchema::new().with_enum(["c", "d"]).into();
        let m = mapper();
        let first = m.map_value(&mut ctx, &a, "choice", "choice").unwrap();
        let again = m.map_value(&mut ctx, &a, "choice", "choice").unwrap();
        let second = m.map_value(&mut ctx, &b, "choice", "choice").unwrap();

        assert_eq!(first.validator, "z.enum(pickChoiceOptions)");
        assert_eq!(again.validator, first.validator);
        assert_eq!(second.validator, "z.enum(pickChoiceOptions2)");
        assert_eq!(ctx.auxiliaries.len(), 2);
    }

    #[test]
    fn test_number_constraints() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Item");
        let schema: Schema = NumberSchema::new()
            .with_integer(true)
            .with_minimum(0.0)
            .with_maximum(99.5)
            .into();
        let v = mapper().map_value(&mut ctx, &schema, "qty", "qty").unwrap();
        assert_eq!(v.validator, "z.number().int().min(0).max(99.5)");
        assert_eq!(v.ts_type, "number");
    }

    #[test]
    fn test_boolean_and_null() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Flags");
        let m = mapper();
        assert_eq!(
            m.map_value(&mut ctx, &Schema::boolean(), "on", "on").unwrap().validator,
            "z.boolean()"
        );
        assert_eq!(
            m.map_value(&mut ctx, &Schema::null(), "nothing", "nothing").unwrap().validator,
            "z.null()"
        );
    }

    #[test]
    fn test_reference_records_dependency() {
        let f = Fixture::new(vec![("Address", Schema::object(vec![], Vec::<String>::new()))]);
        let mut ctx = f.ctx("User");
        let v = mapper()
            .map_value(&mut ctx, &Schema::reference("Address"), "address", "address")
            .unwrap();

        assert_eq!(v.validator, "AddressValidationSchema");
        assert_eq!(v.ts_type, "Address");
        assert_eq!(ctx.references, vec!["Address"]);
        assert!(!ctx.recursive);
        assert_eq!(
            v.shape,
            ValueShape::Reference {
                schema: "Address".into(),
                object: true
            }
        );
    }

    #[test]
    fn test_dangling_reference_is_error() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("User");
        let err = mapper()
            .map_value(&mut ctx, &Schema::reference("Ghost"), "g", "g")
            .unwrap_err();
        assert_eq!(err, SchemaResolutionError::new("User", "Ghost"));
    }

    #[test]
    fn test_self_reference_uses_placeholder() {
        let category = Schema::object(
            vec![Property::new("children", Schema::array(Schema::reference("Category")))],
            ["children"],
        );
        let f = Fixture::new(vec![("Category", category)]);
        let mut ctx = f.ctx("Category");
        let v = mapper()
            .map_value(
                &mut ctx,
                &Schema::array(Schema::reference("Category")),
                "children",
                "children",
            )
            .unwrap();

        assert_eq!(v.validator, "z.array(z.any())");
        assert_eq!(v.ts_type, "Array<Category>");
        assert!(ctx.recursive);
        assert!(ctx.references.is_empty());
        assert!(matches!(
            ctx.diagnostics[0],
            Diagnostic::RecursionGuard { ref target, .. } if target == "Category"
        ));
    }

    #[test]
    fn test_indirect_cycle_uses_placeholder() {
        let a = Schema::object(vec![Property::new("b", Schema::reference("B"))], ["b"]);
        let b = Schema::object(vec![Property::new("a", Schema::reference("A"))], ["a"]);
        let f = Fixture::new(vec![("A", a), ("B", b)]);
        let mut ctx = f.ctx("A");
        let v = mapper()
            .map_value(&mut ctx, &Schema::reference("B"), "b", "b")
            .unwrap();

        assert_eq!(v.validator, ANY_VALIDATOR);
        assert_eq!(v.ts_type, "B");
        assert!(ctx.recursive);
        assert_eq!(ctx.references, vec!["B"]);
    }

    #[test]
    fn test_array_of_primitive_enum_uses_singular_name() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Report");
        let schema = Schema::array(StringSchema::new().with_enum(["red", "blue"]).into());
        let v = mapper().map_value(&mut ctx, &schema, "colors", "colors").unwrap();

        assert_eq!(v.validator, "z.array(z.enum(reportColorOptions))");
        assert_eq!(v.ts_type, "Array<ReportColor>");
    }

    #[test]
    fn test_untyped_array_is_array_of_any() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Bag");
        let v = mapper()
            .map_value(&mut ctx, &Schema::untyped_array(), "items", "items")
            .unwrap();
        assert_eq!(v.validator, "z.array(z.any())");
        assert!(matches!(
            &ctx.diagnostics[0],
            Diagnostic::UnsupportedShape(e) if e.path == "items"
        ));
    }

    fn unsupported_paths<'c>(ctx: &'c MappingContext<'_>) -> Vec<&'c str> {
        ctx.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::UnsupportedShape(e) => Some(e.path.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_nested_unsupported_shapes_report_full_path() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Report");

        let matrix = Schema::array(Schema::untyped_array());
        mapper().map_value(&mut ctx, &matrix, "matrix", "matrix").unwrap();

        let meta = Schema::record(Schema::untyped_array());
        mapper().map_value(&mut ctx, &meta, "meta", "meta").unwrap();

        let value = Schema::one_of(vec![Schema::string(), Schema::untyped_array()]);
        mapper().map_value(&mut ctx, &value, "value", "value").unwrap();

        assert_eq!(
            unsupported_paths(&ctx),
            vec!["matrix.items", "meta.additionalProperties", "value.oneOf[1]"]
        );
    }

    #[test]
    fn test_record_maps_value() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Config");
        let v = mapper()
            .map_value(&mut ctx, &Schema::record(Schema::integer()), "limits", "limits")
            .unwrap();
        assert_eq!(v.validator, "z.record(z.string(), z.number().int())");
        assert_eq!(v.ts_type, "Record<string, number>");
    }

    #[test]
    fn test_one_of_with_null_collapses() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("User");
        let schema = Schema::one_of(vec![Schema::string(), Schema::null()]);
        let v = mapper().map_value(&mut ctx, &schema, "nick", "nick").unwrap();

        assert_eq!(v.validator, "z.string()");
        assert!(v.nullable);
    }

    #[test]
    fn test_one_of_union() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Value");
        let schema = Schema::one_of(vec![Schema::string(), Schema::number(), Schema::null()]);
        let v = mapper().map_value(&mut ctx, &schema, "v", "v").unwrap();

        assert_eq!(v.validator, "z.union([z.string(), z.number()])");
        assert_eq!(v.ts_type, "string | number");
        assert!(v.nullable);
    }

    fn tagged(kind: &str) -> Schema {
        Schema::object(
            vec![
                Property::new("kind", StringSchema::new().with_enum([kind]).into()),
                Property::new("name", Schema::string()),
            ],
            ["kind", "name"],
        )
    }

    fn pet_union() -> Schema {
        OneOfSchema::new(vec![Schema::reference("Cat"), Schema::reference("Dog")])
            .with_discriminator("kind")
            .into()
    }

    #[test]
    fn test_one_of_discriminated() {
        let f = Fixture::new(vec![("Cat", tagged("cat")), ("Dog", tagged("dog"))]);
        let mut ctx = f.ctx("Pet");
        let v = mapper().map_value(&mut ctx, &pet_union(), "", "").unwrap();

        assert_eq!(
            v.validator,
            "z.discriminatedUnion(\"kind\", [CatValidationSchema, DogValidationSchema])"
        );
        assert_eq!(v.ts_type, "Cat | Dog");
    }

    #[test]
    fn test_discriminator_with_explicit_typing_falls_back_to_union() {
        let f = Fixture::new(vec![("Cat", tagged("cat")), ("Dog", tagged("dog"))]);
        let mut ctx = f.ctx("Pet");
        let v = ZodTypeMapper::default()
            .with_explicit_typing(true)
            .map_value(&mut ctx, &pet_union(), "", "")
            .unwrap();

        assert_eq!(
            v.validator,
            "z.union([CatValidationSchema, DogValidationSchema])"
        );
    }

    #[test]
    fn test_discriminator_with_nullable_target_falls_back_to_union() {
        let f = Fixture::new(vec![
            ("Cat", tagged("cat")),
            ("Dog", tagged("dog").with_nullable(true)),
        ]);
        let mut ctx = f.ctx("Pet");
        let v = mapper().map_value(&mut ctx, &pet_union(), "", "").unwrap();

        assert!(v.validator.starts_with("z.union(["));
    }

    #[test]
    fn test_discriminator_with_nullable_branch_falls_back_to_union() {
        let f = Fixture::new(vec![("Cat", tagged("cat")), ("Dog", tagged("dog"))]);
        let mut ctx = f.ctx("Pet");
        let schema: Schema = OneOfSchema::new(vec![
            Schema::reference("Cat"),
            Schema::reference("Dog").with_nullable(true),
        ])
        .with_discriminator("kind")
        .into();
        let v = mapper().map_value(&mut ctx, &schema, "", "").unwrap();

        assert_eq!(
            v.validator,
            "z.union([CatValidationSchema, DogValidationSchema.nullable()])"
        );
    }

    #[test]
    fn test_discriminator_missing_on_target_falls_back_to_union() {
        let untagged = Schema::object(vec![Property::new("name", Schema::string())], ["name"]);
        let f = Fixture::new(vec![("Cat", tagged("cat")), ("Dog", untagged)]);
        let mut ctx = f.ctx("Pet");
        let v = mapper().map_value(&mut ctx, &pet_union(), "", "").unwrap();

        assert!(v.validator.starts_with("z.union(["));
    }

    #[test]
    fn test_one_of_only_null() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("Nothing");
        let v = mapper()
            .map_value(&mut ctx, &Schema::one_of(vec![Schema::null()]), "", "")
            .unwrap();
        assert_eq!(v.validator, "z.null()");
    }

    #[test]
    fn test_object_as_dictionary_of_refs() {
        let f = Fixture::new(vec![("Price", Schema::object(vec![], Vec::<String>::new()))]);
        let mut ctx = f.ctx("Catalog");
        let schema = Schema::object(
            vec![
                Property::new("eur", Schema::reference("Price")),
                Property::new("usd", Schema::reference("Price")),
            ],
            Vec::<String>::new(),
        );
        let v = mapper().map_value(&mut ctx, &schema, "prices", "prices").unwrap();

        assert_eq!(v.validator, "z.record(z.string(), PriceValidationSchema)");
        assert_eq!(v.ts_type, "Record<string, Price>");
        assert_eq!(ctx.references, vec!["Price"]);
    }

    #[test]
    fn test_mixed_nested_object_degrades_with_warning() {
        let f = Fixture::new(vec![("Price", Schema::object(vec![], Vec::<String>::new()))]);
        let mut ctx = f.ctx("Catalog");
        let schema = Schema::object(
            vec![
                Property::new("eur", Schema::reference("Price")),
                Property::new("label", Schema::string()),
            ],
            Vec::<String>::new(),
        );
        let v = mapper().map_value(&mut ctx, &schema, "prices", "prices").unwrap();

        assert_eq!(v.validator, ANY_VALIDATOR);
        assert!(matches!(ctx.diagnostics[0], Diagnostic::UnsupportedShape(_)));
    }

    #[test]
    fn test_nullable_applied_in_nested_position() {
        let f = Fixture::empty();
        let mut ctx = f.ctx("List");
        let schema = Schema::array(Schema::string().with_nullable(true));
        let v = mapper().map_value(&mut ctx, &schema, "names", "names").unwrap();
        assert_eq!(v.validator, "z.array(z.string().nullable())");
        assert_eq!(v.ts_type, "Array<string | null>");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(0.25), "0.25");
    }
}
