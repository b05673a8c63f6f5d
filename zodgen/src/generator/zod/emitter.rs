//! Zod model emitter.
//!
//! This module turns one named [`Schema`] into a [`GeneratedModel`] and
//! renders models as TypeScript declarations.
//!
//! # Features
//!
//! - Generates `z.object()` for object schemas, one line per property
//! - Applies `.default()`, `.optional()`, `.describe()`, `.nullable()` per property
//! - Emits enum option tuples and their element types before the model
//! - Chooses inferred (`z.infer<...>`) or explicit structural types
//! - Annotates explicitly typed validators with `z.ZodType<T>`
//! - Emits JSDoc from descriptions and examples

use crate::error::SchemaResolutionError;
use crate::generator::annotations;
use crate::generator::config::GeneratorConfig;
use crate::generator::model::{GeneratedModel, PropertyDecision, TypeDeclaration};
use crate::generator::traits::{EmitResult, ModelGenerator};
use crate::generator::zod::type_mapper::{MappingContext, ZodTypeMapper};
use crate::ir::{ObjectSchema, Schema, SchemaKind};
use crate::naming;
use crate::registry::{ClosureIndex, SchemaRegistry};

/// Zod model generator.
///
/// # Example
///
/// ```rust
/// use zodgen::generator::{GeneratorConfig, ModelGenerator, ZodEmitter};
/// use zodgen::ir::{Property, Schema};
/// use zodgen::registry::SchemaRegistry;
///
/// let mut registry = SchemaRegistry::new();
/// registry.register(
///     "User",
///     Schema::object(vec![Property::new("id", Schema::string())], ["id"]),
/// );
/// let closures = registry.closures();
///
/// let emitter = ZodEmitter::new(GeneratorConfig::default());
/// let user = registry.get("User").unwrap();
/// let result = emitter.generate("User", user, &registry, &closures).unwrap();
/// assert_eq!(result.model.validator_name, "UserValidationSchema");
/// ```
#[derive(Debug, Clone)]
pub struct ZodEmitter {
    config: GeneratorConfig,
    type_mapper: ZodTypeMapper,
}

impl Default for ZodEmitter {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl ZodEmitter {
    /// Create an emitter for the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        let type_mapper = ZodTypeMapper::new(config.validator_suffix.clone())
            .with_explicit_typing(config.explicit_typing());
        Self {
            config,
            type_mapper,
        }
    }

    /// The configuration this emitter renders with.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    // =========================================================================
    // Object Generation
    // =========================================================================

    fn generate_properties(
        &self,
        ctx: &mut MappingContext<'_>,
        object: &ObjectSchema,
    ) -> Result<Vec<PropertyDecision>, SchemaResolutionError> {
        object
            .properties
            .iter()
            .map(|property| {
                self.generate_property(
                    ctx,
                    &property.name,
                    &property.schema,
                    object.is_required(&property.name),
                )
            })
            .collect()
    }

    /// Decide validator and type for one property.
    ///
    /// Modifiers are chained as `.default()`, `.optional()`, `.describe()`,
    /// `.nullable()`.
    fn generate_property(
        &self,
        ctx: &mut MappingContext<'_>,
        name: &str,
        schema: &Schema,
        required: bool,
    ) -> Result<PropertyDecision, SchemaResolutionError> {
        let mapped = self.type_mapper.map_value(ctx, schema, name, name)?;
        let mut validator = mapped.validator;

        if let Some(default) = &schema.metadata.default {
            validator.push_str(&format!(".default({})", default));
        }
        if !required {
            validator.push_str(".optional()");
        }
        if let Some(description) = &schema.metadata.description {
            validator.push_str(&format!(".describe({})", naming::quote(description)));
        }
        if mapped.nullable {
            validator.push_str(".nullable()");
        }

        Ok(PropertyDecision {
            name: name.to_string(),
            validator,
            ts_type: mapped.ts_type,
            required,
            nullable: mapped.nullable,
            shape: mapped.shape,
            description: schema.metadata.description.clone(),
            example: schema.metadata.example.clone(),
        })
    }

    fn render_object_validator(&self, properties: &[PropertyDecision]) -> String {
        if properties.is_empty() {
            return "z.object({})".to_string();
        }
        let indent = self.config.indent_str();
        let fields: Vec<String> = properties
            .iter()
            .map(|p| format!("{}{}: {}", indent, naming::property_key(&p.name), p.validator))
            .collect();
        format!("z.object({{\n{}\n}})", fields.join(",\n"))
    }

    fn render_object_type(&self, properties: &[PropertyDecision]) -> String {
        if properties.is_empty() {
            return "{}".to_string();
        }
        let indent = self.config.indent_str();
        let fields: Vec<String> = properties
            .iter()
            .map(|p| {
                format!(
                    "{}{}{}: {};",
                    indent,
                    naming::property_key(&p.name),
                    if p.required { "" } else { "?" },
                    nullable_type(&p.ts_type, p.nullable)
                )
            })
            .collect();
        format!("{{\n{}\n}}", fields.join("\n"))
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn render_docs(&self, model: &GeneratedModel) -> Option<String> {
        if !self.config.generate_docs {
            return None;
        }
        let mut lines: Vec<String> = Vec::new();
        if let Some(description) = &model.description {
            lines.extend(description.lines().map(|l| escape_comment(l.trim_end())));
        }
        if let Some(example) = &model.example {
            lines.push(format!("@example {}", escape_comment(&example.to_string())));
        }
        if lines.is_empty() {
            return None;
        }
        let body: Vec<String> = lines
            .iter()
            .map(|l| if l.is_empty() { " *".to_string() } else { format!(" * {}", l) })
            .collect();
        Some(format!("/**\n{}\n */\n", body.join("\n")))
    }
}

impl ModelGenerator for ZodEmitter {
    fn id(&self) -> &'static str {
        "zod"
    }

    fn name(&self) -> &'static str {
        "Zod Model Generator"
    }

    fn file_extension(&self) -> &'static str {
        "ts"
    }

    fn generate(
        &self,
        name: &str,
        schema: &Schema,
        registry: &SchemaRegistry,
        closures: &ClosureIndex,
    ) -> Result<EmitResult, SchemaResolutionError> {
        let mut ctx = MappingContext::new(name, registry, closures);

        let (mut validator, ts_type, nullable, properties, is_object) = match &schema.kind {
            SchemaKind::Object(object) => {
                let properties = self.generate_properties(&mut ctx, object)?;
                (
                    self.render_object_validator(&properties),
                    self.render_object_type(&properties),
                    schema.metadata.nullable,
                    properties,
                    true,
                )
            }
            _ => {
                let mapped = self.type_mapper.map_value(&mut ctx, schema, "", "")?;
                (mapped.validator, mapped.ts_type, mapped.nullable, Vec::new(), false)
            }
        };

        if let Some(description) = &schema.metadata.description {
            validator.push_str(&format!(".describe({})", naming::quote(description)));
        }
        if nullable {
            validator.push_str(".nullable()");
        }

        let is_recursive = ctx.recursive || closures.is_recursive(name);
        let type_declaration = if self.config.explicit_typing() || is_recursive {
            TypeDeclaration::Explicit(nullable_type(&ts_type, nullable))
        } else {
            TypeDeclaration::Inferred
        };

        let model = GeneratedModel {
            name: name.to_string(),
            type_name: naming::type_name(name),
            validator_name: self.config.validator_name(name),
            validator,
            type_declaration,
            auxiliaries: ctx.auxiliaries,
            referenced_schemas: ctx.references,
            is_recursive,
            properties,
            is_object,
            description: schema.metadata.description.clone(),
            example: schema.metadata.example.clone(),
        };

        Ok(EmitResult {
            model,
            diagnostics: ctx.diagnostics,
        })
    }

    fn render_model(&self, model: &GeneratedModel) -> String {
        let mut out = String::new();

        for aux in &model.auxiliaries {
            let values: Vec<String> = aux.values.iter().map(|v| naming::quote(v)).collect();
            out.push_str(&format!(
                "export const {} = [{}] as const;\n",
                aux.constant_name,
                values.join(", ")
            ));
            if let Some(type_name) = &aux.type_name {
                out.push_str(&format!(
                    "export type {} = (typeof {})[number];\n",
                    type_name, aux.constant_name
                ));
            }
        }
        if !model.auxiliaries.is_empty() {
            out.push('\n');
        }

        if let Some(docs) = self.render_docs(model) {
            out.push_str(&docs);
        }

        match &model.type_declaration {
            TypeDeclaration::Explicit(ts_type) => {
                out.push_str(&format!("export type {} = {};\n", model.type_name, ts_type));
                out.push_str(&format!(
                    "export const {}: z.ZodType<{}> = {};\n",
                    model.validator_name, model.type_name, model.validator
                ));
            }
            TypeDeclaration::Inferred => {
                out.push_str(&format!(
                    "export const {} = {};\n",
                    model.validator_name, model.validator
                ));
                out.push_str(&format!(
                    "export type {} = z.infer<typeof {}>;\n",
                    model.type_name, model.validator_name
                ));
            }
        }

        if self.config.generate_framework_annotations {
            if let Some(dto) = annotations::render_dto(model, &self.config) {
                out.push('\n');
                out.push_str(&dto);
            }
        }

        out
    }
}

fn nullable_type(ts_type: &str, nullable: bool) -> String {
    if nullable {
        format!("{} | null", ts_type)
    } else {
        ts_type.to_string()
    }
}

fn escape_comment(text: &str) -> String {
    text.replace("*/", "*\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{OneOfSchema, Property, StringSchema};
    use crate::report::Diagnostic;
    use serde_json::json;

    fn registry(schemas: Vec<(&str, Schema)>) -> SchemaRegistry {
        schemas
            .into_iter()
            .map(|(n, s)| (n.to_string(), s))
            .collect()
    }

    fn generate_with(config: GeneratorConfig, registry: &SchemaRegistry, name: &str) -> EmitResult {
        let closures = registry.closures();
        let schema = registry.get(name).unwrap();
        ZodEmitter::new(config)
            .generate(name, schema, registry, &closures)
            .unwrap()
    }

    fn generate(registry: &SchemaRegistry, name: &str) -> EmitResult {
        generate_with(GeneratorConfig::default(), registry, name)
    }

    fn user() -> Schema {
        Schema::object(
            vec![
                Property::new("id", Schema::string()),
                Property::new(
                    "email",
                    StringSchema::new().with_format("email").into(),
                ),
                Property::new(
                    "tier",
                    StringSchema::new()
                        .with_enum(["free", "pro", "enterprise"])
                        .into(),
                ),
            ],
            ["id", "email", "tier"],
        )
    }

    #[test]
    fn test_object_validator() {
        let registry = registry(vec![("User", user())]);
        let model = generate(&registry, "User").model;

        assert_eq!(
            model.validator,
            "z.object({\n  id: z.string(),\n  email: z.string().email(),\n  tier: z.enum(userTierOptions)\n})"
        );
        assert_eq!(model.type_declaration, TypeDeclaration::Inferred);
        assert!(model.is_object);
        assert!(!model.is_recursive);
        assert_eq!(model.auxiliaries.len(), 1);
    }

    #[test]
    fn test_optional_property() {
        let report = Schema::object(
            vec![Property::new("tags", Schema::array(Schema::string()))],
            Vec::<String>::new(),
        );
        let registry = registry(vec![("Report", report)]);
        let model = generate(&registry, "Report").model;

        assert_eq!(model.properties[0].validator, "z.array(z.string()).optional()");
        assert!(!model.properties[0].required);
    }

    #[test]
    fn test_property_modifier_order() {
        let schema = Schema::object(
            vec![Property::new(
                "nick",
                Schema::string()
                    .with_nullable(true)
                    .with_description("Display name")
                    .with_default(json!("anon")),
            )],
            Vec::<String>::new(),
        );
        let registry = registry(vec![("Profile", schema)]);
        let model = generate(&registry, "Profile").model;

        assert_eq!(
            model.properties[0].validator,
            "z.string().default(\"anon\").optional().describe(\"Display name\").nullable()"
        );
    }

    #[test]
    fn test_recursion_forces_explicit_type() {
        let category = Schema::object(
            vec![
                Property::new("name", Schema::string()),
                Property::new("children", Schema::array(Schema::reference("Category"))),
            ],
            ["name", "children"],
        );
        let registry = registry(vec![("Category", category)]);
        let result = generate(&registry, "Category");
        let model = result.model;

        assert!(model.is_recursive);
        assert!(model.is_explicitly_typed());
        assert!(model.validator.contains("children: z.array(z.any())"));
        assert_eq!(
            model.type_declaration,
            TypeDeclaration::Explicit(
                "{\n  name: string;\n  children: Array<Category>;\n}".to_string()
            )
        );
        assert!(model.referenced_schemas.is_empty());
        assert!(result
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::RecursionGuard { .. })));
    }

    #[test]
    fn test_explicit_typing_mode() {
        let registry = registry(vec![("User", user())]);
        let config = GeneratorConfig::new().with_prefer_explicit_typing(true);
        let model = generate_with(config, &registry, "User").model;

        assert_eq!(
            model.type_declaration,
            TypeDeclaration::Explicit(
                "{\n  id: string;\n  email: string;\n  tier: UserTier;\n}".to_string()
            )
        );
    }

    #[test]
    fn test_optional_nullable_explicit_type() {
        let schema = Schema::object(
            vec![Property::new(
                "nick",
                Schema::one_of(vec![Schema::string(), Schema::null()]),
            )],
            Vec::<String>::new(),
        );
        let registry = registry(vec![("Profile", schema)]);
        let config = GeneratorConfig::new().with_prefer_explicit_typing(true);
        let model = generate_with(config, &registry, "Profile").model;

        assert_eq!(
            model.type_declaration,
            TypeDeclaration::Explicit("{\n  nick?: string | null;\n}".to_string())
        );
    }

    #[test]
    fn test_non_object_root() {
        let status: Schema = StringSchema::new().with_enum(["on", "off"]).into();
        let registry = registry(vec![("Status", status.with_description("Power state"))]);
        let model = generate(&registry, "Status").model;

        assert_eq!(
            model.validator,
            "z.enum(statusOptions).describe(\"Power state\")"
        );
        assert!(!model.is_object);
        assert_eq!(model.auxiliaries[0].type_name, None);
    }

    #[test]
    fn test_invalid_identifier_keys_are_quoted() {
        let schema = Schema::object(
            vec![Property::new("content-type", Schema::string())],
            ["content-type"],
        );
        let registry = registry(vec![("Header", schema)]);
        let model = generate(&registry, "Header").model;
        assert!(model.validator.contains("\"content-type\": z.string()"));
    }

    #[test]
    fn test_dangling_reference_aborts_schema() {
        let order = Schema::object(
            vec![Property::new("customer", Schema::reference("Customer"))],
            ["customer"],
        );
        let registry = registry(vec![("Order", order)]);
        let closures = registry.closures();
        let emitter = ZodEmitter::default();
        let err = emitter
            .generate("Order", registry.get("Order").unwrap(), &registry, &closures)
            .unwrap_err();
        assert_eq!(err.reference, "Customer");
    }

    #[test]
    fn test_render_inferred_model() {
        let registry = registry(vec![("User", user().with_description("A user"))]);
        let emitter = ZodEmitter::default();
        let model = generate(&registry, "User").model;
        let text = emitter.render_model(&model);

        assert!(text.starts_with(
            "export const userTierOptions = [\"free\", \"pro\", \"enterprise\"] as const;\n\
             export type UserTier = (typeof userTierOptions)[number];\n\n\
             /**\n * A user\n */\n"
        ));
        assert!(text.contains("export const UserValidationSchema = z.object({"));
        assert!(text.ends_with("export type User = z.infer<typeof UserValidationSchema>;\n"));
    }

    #[test]
    fn test_render_explicit_model() {
        let schema = Schema::object(
            vec![Property::new("id", Schema::string())],
            ["id"],
        );
        let registry = registry(vec![("Tag", schema)]);
        let config = GeneratorConfig::new().with_prefer_explicit_typing(true);
        let model = generate_with(config.clone(), &registry, "Tag").model;
        let text = ZodEmitter::new(config).render_model(&model);

        assert_eq!(
            text,
            "export type Tag = {\n  id: string;\n};\n\
             export const TagValidationSchema: z.ZodType<Tag> = z.object({\n  id: z.string()\n});\n"
        );
    }

    #[test]
    fn test_render_docs_with_example() {
        let schema = Schema::string()
            .with_description("Identifier")
            .with_example(json!("u_1"));
        let registry = registry(vec![("UserId", schema)]);
        let model = generate(&registry, "UserId").model;
        let text = ZodEmitter::default().render_model(&model);

        assert!(text.starts_with("/**\n * Identifier\n * @example \"u_1\"\n */\n"));

        let quiet = ZodEmitter::new(GeneratorConfig::new().with_generate_docs(false));
        assert!(!quiet.render_model(&model).contains("/**"));
    }

    #[test]
    fn test_explicit_typing_keeps_tagged_union_plain() {
        let tagged = |kind: &str| {
            Schema::object(
                vec![Property::new("kind", StringSchema::new().with_enum([kind]).into())],
                ["kind"],
            )
        };
        let pet: Schema = OneOfSchema::new(vec![Schema::reference("Cat"), Schema::reference("Dog")])
            .with_discriminator("kind")
            .into();
        let registry = registry(vec![
            ("Cat", tagged("cat")),
            ("Dog", tagged("dog").with_nullable(true)),
            ("Pet", pet),
        ]);

        let explicit = GeneratorConfig::new().with_prefer_explicit_typing(true);
        let model = generate_with(explicit, &registry, "Pet").model;
        assert_eq!(
            model.validator,
            "z.union([CatValidationSchema, DogValidationSchema])"
        );

        let model = generate(&registry, "Pet").model;
        assert!(!model.validator.contains("discriminatedUnion"));
    }

    #[test]
    fn test_render_with_annotations() {
        let registry = registry(vec![("User", user())]);
        let config = GeneratorConfig::new().with_framework_annotations(true);
        let model = generate_with(config.clone(), &registry, "User").model;
        let text = ZodEmitter::new(config).render_model(&model);

        assert!(text.contains("export const UserValidationSchema: z.ZodType<User>"));
        assert!(text.contains("export class UserDto {"));
    }
}
