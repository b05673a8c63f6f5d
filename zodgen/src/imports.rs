//! Cross-entity import aggregation.
//!
//! Every generated model yields its own import obligations as a value; the
//! obligations of one entity are merged afterwards, deduplicated by
//! `(source, symbol)` with first-seen order kept.

use std::collections::BTreeMap;

use crate::generator::annotations::{self, DECORATOR_SOURCE, DECORATOR_SYMBOL};
use crate::generator::{GeneratedModel, GeneratorConfig};
use crate::naming;

/// Module the validator library is imported from.
pub const ZOD_SOURCE: &str = "zod";

/// Validator library namespace symbol.
pub const ZOD_SYMBOL: &str = "z";

/// Ordered map from import source to ordered, deduplicated symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleImportMap {
    entries: Vec<(String, Vec<String>)>,
}

impl ModuleImportMap {
    /// Create an empty import map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `symbol` from `source`. Duplicates are ignored.
    pub fn insert(&mut self, source: &str, symbol: &str) {
        match self.entries.iter_mut().find(|(s, _)| s == source) {
            Some((_, symbols)) => {
                if !symbols.iter().any(|s| s == symbol) {
                    symbols.push(symbol.to_string());
                }
            }
            None => self
                .entries
                .push((source.to_string(), vec![symbol.to_string()])),
        }
    }

    /// Merge another map into this one, keeping this map's order first.
    pub fn merge(&mut self, other: &ModuleImportMap) {
        for (source, symbols) in &other.entries {
            for symbol in symbols {
                self.insert(source, symbol);
            }
        }
    }

    /// Symbols imported from a source.
    pub fn symbols(&self, source: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, symbols)| symbols.as_slice())
            .unwrap_or(&[])
    }

    /// Check whether `symbol` is imported from `source`.
    pub fn contains(&self, source: &str, symbol: &str) -> bool {
        self.symbols(source).iter().any(|s| s == symbol)
    }

    /// Import sources in insertion order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    /// Iterate over (source, symbols) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter().map(|(s, symbols)| (s, symbols))
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no imports.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as ES module import statements, one per source.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(source, symbols)| {
                format!("import {{ {} }} from '{}';\n", symbols.join(", "), source)
            })
            .collect()
    }
}

/// Import obligations of one model generated into `entity`.
///
/// A reference whose owning entity differs from `entity` imports the
/// validator symbol, plus the type symbol when the model declares an
/// explicit type, plus the DTO class when framework annotations are on.
pub fn model_imports(
    model: &GeneratedModel,
    entity: &str,
    schema_to_entity: &BTreeMap<String, String>,
    config: &GeneratorConfig,
) -> ModuleImportMap {
    let mut imports = ModuleImportMap::new();
    let foreign = |schema: &str| {
        schema_to_entity
            .get(schema)
            .filter(|owner| owner.as_str() != entity)
            .map(|owner| config.module_path(owner))
    };

    for schema in &model.referenced_schemas {
        let Some(path) = foreign(schema.as_str()) else {
            continue;
        };
        imports.insert(&path, &config.validator_name(schema));
        if model.is_explicitly_typed() {
            imports.insert(&path, &naming::type_name(schema));
        }
    }

    if config.generate_framework_annotations && model.is_object {
        imports.insert(DECORATOR_SOURCE, DECORATOR_SYMBOL);
        for schema in annotations::referenced_dtos(model) {
            if let Some(path) = foreign(schema.as_str()) {
                imports.insert(&path, &naming::dto_name(&schema));
            }
        }
    }

    imports
}

/// Merged imports of an entity's models, starting with the validator
/// library.
pub fn entity_imports<'a>(
    models: impl IntoIterator<Item = &'a GeneratedModel>,
    entity: &str,
    schema_to_entity: &BTreeMap<String, String>,
    config: &GeneratorConfig,
) -> ModuleImportMap {
    let mut imports = ModuleImportMap::new();
    imports.insert(ZOD_SOURCE, ZOD_SYMBOL);
    for model in models {
        imports.merge(&model_imports(model, entity, schema_to_entity, config));
    }
    imports
}
