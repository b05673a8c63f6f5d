//! Exported names across the whole output.
//!
//! The index module re-exports every entity, so an exported name has to be
//! unique across all entities, not only within one. TypeScript keeps values
//! and types in separate declaration spaces; uniqueness is required within
//! each.
//!
//! Schema types, validators and DTO classes follow from the schema names
//! and are never renamed here. Two schemas mapping to the same symbol (for
//! instance `user_profile` and `UserProfile`) are reported as
//! [`Diagnostic::SymbolCollision`]. Enum declarations are named per schema
//! during generation, so they may clash with each other or with schema
//! symbols; those get the first free numeric suffix.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::SymbolCollisionError;
use crate::generator::{GeneratedModel, GeneratorConfig, TypeDeclaration, ValueShape};
use crate::naming;
use crate::report::{Diagnostic, GenerationReport};

/// Names already exported, with the schema owning each.
#[derive(Debug, Default)]
struct ExportedNames {
    values: BTreeMap<String, String>,
    types: BTreeMap<String, String>,
}

impl ExportedNames {
    fn is_free(&self, constant: &str, type_name: Option<&str>) -> bool {
        !self.values.contains_key(constant)
            && type_name.map_or(true, |t| !self.types.contains_key(t))
    }
}

/// Check schema symbols for collisions and give every enum declaration a
/// unique name.
///
/// Models are visited in schema name order, so the outcome is
/// deterministic. Enums declared at the root of a schema (`statusOptions`
/// for `Status`) are placed before property enums, which keeps them
/// unsuffixed when a property enum elsewhere happens to produce the same
/// name.
pub fn allocate_symbols(
    models: &mut BTreeMap<String, GeneratedModel>,
    config: &GeneratorConfig,
    report: &mut GenerationReport,
) {
    let mut names = ExportedNames::default();

    for model in models.values() {
        let dto = (config.generate_framework_annotations && model.is_object)
            .then(|| naming::dto_name(&model.name));
        let values = [Some(&model.validator_name), dto.as_ref()];
        let types = [Some(&model.type_name), dto.as_ref()];

        for symbol in values.into_iter().flatten() {
            claim_schema_symbol(&mut names.values, symbol, &model.name, report);
        }
        for symbol in types.into_iter().flatten() {
            claim_schema_symbol(&mut names.types, symbol, &model.name, report);
        }
    }

    let mut declarations: Vec<(String, usize)> = Vec::new();
    for root_level in [true, false] {
        for model in models.values() {
            for (index, aux) in model.auxiliaries.iter().enumerate() {
                if aux.type_name.is_none() == root_level {
                    declarations.push((model.name.clone(), index));
                }
            }
        }
    }

    let mut renames: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for (schema, index) in declarations {
        let Some(aux) = models.get(&schema).and_then(|m| m.auxiliaries.get(index)) else {
            continue;
        };

        let mut suffix = 1;
        let (constant, type_name) = loop {
            let candidate = suffixed(&aux.constant_name, suffix);
            let candidate_type = aux.type_name.as_ref().map(|t| suffixed(t, suffix));
            if names.is_free(&candidate, candidate_type.as_deref()) {
                break (candidate, candidate_type);
            }
            suffix += 1;
        };

        names.values.insert(constant.clone(), schema.clone());
        if let Some(t) = &type_name {
            names.types.insert(t.clone(), schema.clone());
        }

        if suffix > 1 {
            debug!(schema = %schema, from = %aux.constant_name, to = %constant, "renamed enum declaration");
            let model_renames = renames.entry(schema.clone()).or_default();
            model_renames.insert(aux.constant_name.clone(), constant);
            if let (Some(from), Some(to)) = (&aux.type_name, type_name) {
                model_renames.insert(from.clone(), to);
            }
        }
    }

    for (schema, model_renames) in renames {
        if let Some(model) = models.get_mut(&schema) {
            rename_in_model(model, &model_renames);
        }
    }
}

fn claim_schema_symbol(
    space: &mut BTreeMap<String, String>,
    symbol: &str,
    schema: &str,
    report: &mut GenerationReport,
) {
    match space.get(symbol) {
        Some(first) if first != schema => {
            let error = SymbolCollisionError::new(schema, first.clone(), symbol);
            warn!(schema = %schema, first = %first, symbol = %symbol, "exported name collision");
            report.record(schema, Diagnostic::SymbolCollision(error));
        }
        Some(_) => {}
        None => {
            space.insert(symbol.to_string(), schema.to_string());
        }
    }
}

fn suffixed(name: &str, suffix: usize) -> String {
    if suffix == 1 {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// Apply enum renames to every expression of a model at once, so a new
/// name is never renamed again.
fn rename_in_model(model: &mut GeneratedModel, renames: &BTreeMap<String, String>) {
    model.validator = rename_identifiers(&model.validator, renames);
    if let TypeDeclaration::Explicit(ts_type) = &model.type_declaration {
        model.type_declaration = TypeDeclaration::Explicit(rename_identifiers(ts_type, renames));
    }
    for aux in &mut model.auxiliaries {
        if let Some(to) = renames.get(&aux.constant_name) {
            aux.constant_name = to.clone();
        }
        if let Some(to) = aux.type_name.as_ref().and_then(|t| renames.get(t)) {
            aux.type_name = Some(to.clone());
        }
    }
    for property in &mut model.properties {
        property.validator = rename_identifiers(&property.validator, renames);
        property.ts_type = rename_identifiers(&property.ts_type, renames);
        rename_in_shape(&mut property.shape, renames);
    }
}

fn rename_in_shape(shape: &mut ValueShape, renames: &BTreeMap<String, String>) {
    match shape {
        ValueShape::Enum(constant) => {
            if let Some(to) = renames.get(constant.as_str()) {
                *constant = to.clone();
            }
        }
        ValueShape::Array(item) => rename_in_shape(item, renames),
        _ => {}
    }
}

/// Replace whole identifiers in generated code, leaving string literals
/// alone.
fn rename_identifiers(code: &str, renames: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(code.len());
    let mut chars = code.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c == '"' || c == '\'' {
            out.push(c);
            let mut escaped = false;
            for (_, inner) in chars.by_ref() {
                out.push(inner);
                if escaped {
                    escaped = false;
                } else if inner == '\\' {
                    escaped = true;
                } else if inner == c {
                    break;
                }
            }
        } else if is_identifier_char(c) {
            let mut end = start + c.len_utf8();
            while let Some(&(i, next)) = chars.peek() {
                if !is_identifier_char(next) {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            let word = &code[start..end];
            match renames.get(word) {
                Some(to) if !c.is_ascii_digit() => out.push_str(to),
                _ => out.push_str(word),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
