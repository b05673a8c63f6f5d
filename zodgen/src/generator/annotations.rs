//! Framework DTO annotations.
//!
//! When framework annotations are enabled, every object model also gets a
//! DTO class whose properties carry `@ApiProperty({...})` decorators
//! (`@nestjs/swagger`). The decorators are built from the same
//! [`PropertyDecision`]s as the validator and the explicit type, so the
//! three never disagree.

use crate::generator::config::GeneratorConfig;
use crate::generator::model::{GeneratedModel, PropertyDecision, ValueShape};
use crate::naming;

/// Module the decorator is imported from.
pub const DECORATOR_SOURCE: &str = "@nestjs/swagger";

/// Decorator symbol.
pub const DECORATOR_SYMBOL: &str = "ApiProperty";

/// Render the DTO class of an object model.
///
/// Returns `None` for non-object models.
pub fn render_dto(model: &GeneratedModel, config: &GeneratorConfig) -> Option<String> {
    if !model.is_object {
        return None;
    }

    let indent = config.indent_str();
    let members: Vec<String> = model
        .properties
        .iter()
        .map(|property| {
            format!(
                "{indent}@{}({})\n{indent}{}{}: {};\n",
                DECORATOR_SYMBOL,
                decorator_options(property),
                naming::property_key(&property.name),
                if property.required { "!" } else { "?" },
                if property.nullable {
                    format!("{} | null", property.ts_type)
                } else {
                    property.ts_type.clone()
                },
                indent = indent,
            )
        })
        .collect();

    Some(format!(
        "export class {} {{\n{}}}\n",
        naming::dto_name(&model.name),
        members.join("\n")
    ))
}

/// Schemas whose DTO classes a model's decorators refer to, in first-seen
/// order.
pub fn referenced_dtos(model: &GeneratedModel) -> Vec<String> {
    let mut dtos = Vec::new();
    for property in &model.properties {
        if let Some(schema) = dto_target(&property.shape) {
            if schema != model.name && !dtos.iter().any(|d| d == schema) {
                dtos.push(schema.to_string());
            }
        }
    }
    dtos
}

fn dto_target(shape: &ValueShape) -> Option<&str> {
    match shape {
        ValueShape::Reference {
            schema,
            object: true,
        } => Some(schema.as_str()),
        ValueShape::Array(inner) => dto_target(inner),
        _ => None,
    }
}

/// Build the `{ ... }` argument of a property decorator.
fn decorator_options(property: &PropertyDecision) -> String {
    let mut options = Vec::new();
    shape_options(&property.shape, &mut options);

    if !property.required {
        options.push("required: false".to_string());
    }
    if property.nullable {
        options.push("nullable: true".to_string());
    }
    if let Some(description) = &property.description {
        options.push(format!("description: {}", naming::quote(description)));
    }
    if let Some(example) = &property.example {
        options.push(format!("example: {}", example));
    }

    if options.is_empty() {
        String::new()
    } else {
        format!("{{ {} }}", options.join(", "))
    }
}

fn shape_options(shape: &ValueShape, options: &mut Vec<String>) {
    match shape {
        ValueShape::Scalar(kind) => options.push(format!("type: {}", kind.constructor())),
        ValueShape::Enum(constant) => options.push(format!("enum: {}", constant)),
        ValueShape::Literal(value) => options.push(format!("enum: [{}]", naming::quote(value))),
        ValueShape::Reference {
            schema,
            object: true,
        } => options.push(format!("type: () => {}", naming::dto_name(schema))),
        ValueShape::Array(inner) => {
            shape_options(inner, options);
            options.push("isArray: true".to_string());
        }
        ValueShape::Map => options.push("type: Object".to_string()),
        ValueShape::Reference { object: false, .. }
        | ValueShape::Union
        | ValueShape::Null
        | ValueShape::Unknown => {}
    }
}
