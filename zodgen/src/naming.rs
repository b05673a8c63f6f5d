//! Name conversions for generated identifiers.
//!
//! Every function here is a pure string transformation. Case conversion goes
//! through `convert_case`; the symbol helpers build the names the generated
//! modules export.

use convert_case::{Case, Casing};

/// Convert an arbitrary name to a PascalCase identifier.
///
/// Names that already are PascalCase identifiers are returned unchanged, so
/// acronyms such as `HTTPError` survive.
pub fn pascal_identifier(name: &str) -> String {
    if is_pascal_identifier(name) {
        return name.to_string();
    }
    let converted = sanitize(name).to_case(Case::Pascal);
    prefix_digit(converted, '_')
}

/// Convert an arbitrary name to a camelCase identifier.
pub fn camel_identifier(name: &str) -> String {
    let converted = sanitize(name).to_case(Case::Camel);
    prefix_digit(converted, '_')
}

/// Type name for a schema (`user_profile` -> `UserProfile`).
pub fn type_name(schema: &str) -> String {
    pascal_identifier(schema)
}

/// Validator symbol for a schema (`User` -> `UserValidationSchema`).
pub fn validator_name(schema: &str, suffix: &str) -> String {
    format!("{}{}", type_name(schema), suffix)
}

/// Framework DTO class name for a schema.
pub fn dto_name(schema: &str) -> String {
    format!("{}Dto", type_name(schema))
}

/// Entity (module) name for a tag.
pub fn entity_name(tag: &str) -> String {
    pascal_identifier(tag)
}

/// Name of the options tuple constant for an enum.
///
/// Scoped by schema so two schemas with a `status` property do not collide:
/// (`User`, `tier`) -> `userTierOptions`.
pub fn enum_constant_name(schema: &str, property: &str) -> String {
    format!("{}Options", camel_identifier(&join_words(schema, property)))
}

/// Name of the enum type alias: (`User`, `tier`) -> `UserTier`.
pub fn enum_type_name(schema: &str, property: &str) -> String {
    sanitize(&join_words(schema, property)).to_case(Case::Pascal)
}

/// Singular form of a property name, used to name enums nested in arrays.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if ["sses", "shes", "ches", "xes", "zes", "uses"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        word[..word.len() - 2].to_string()
    } else if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        word.to_string()
    } else if lower.ends_with('s') && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Check if a name can be used as a bare JavaScript property key.
pub fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Render a property key, quoting it when it is not a valid identifier.
pub fn property_key(name: &str) -> String {
    if is_js_identifier(name) {
        name.to_string()
    } else {
        quote(name)
    }
}

/// Quote a string as a JavaScript string literal.
pub fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn is_pascal_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

fn join_words(schema: &str, property: &str) -> String {
    if property.is_empty() {
        schema.to_string()
    } else {
        format!("{} {}", schema, property)
    }
}

/// Replace characters that cannot appear in identifiers with word breaks.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_string()
}

fn prefix_digit(name: String, prefix: char) -> String {
    match name.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("{}{}", prefix, name),
        None => prefix.to_string(),
        _ => name,
    }
}
