//! Module generation for a loaded document.
//!
//! Runs [`ModelEngine`] over the registry and usage map of a
//! [`LoadedDocument`] and lays the result out as files: one module per
//! entity plus an index module re-exporting all of them.

use std::path::PathBuf;

use zodgen::engine::INDEX_MODULE;
use zodgen::{GenerationOutput, ModelEngine};

use crate::config::Config;
use crate::error::CliResult;
use crate::loader::LoadedDocument;

/// One file to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Entity the file holds; `None` for the index module.
    pub entity: Option<String>,

    /// Target path.
    pub path: PathBuf,

    /// Complete module text.
    pub content: String,
}

/// Generated files plus the engine output they came from.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Entity modules in entity order, then the index module.
    pub files: Vec<GeneratedFile>,

    /// Engine output, including the diagnostics report.
    pub output: GenerationOutput,
}

impl GeneratedOutput {
    /// Find the file of an entity.
    pub fn file(&self, entity: &str) -> Option<&GeneratedFile> {
        self.files
            .iter()
            .find(|f| f.entity.as_deref() == Some(entity))
    }

    /// Number of generated models across all entities.
    pub fn model_count(&self) -> usize {
        self.output.entities.iter().map(|e| e.models.len()).sum()
    }
}

/// Generator producing entity modules from a loaded document.
pub struct SchemaGenerator {
    config: Config,
}

impl SchemaGenerator {
    /// Create a new generator with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate every module of the document.
    ///
    /// Fails when the engine report does not allow the run: unresolved
    /// references always, unsupported shapes in strict mode.
    pub fn generate(&self, document: &LoadedDocument) -> CliResult<GeneratedOutput> {
        let generator_config = self.config.generator_config()?;
        let engine = ModelEngine::new(generator_config.clone());
        let output = engine.generate(&document.registry, &document.usage);

        output.outcome(generator_config.strict)?;

        let mut files: Vec<GeneratedFile> = output
            .entities
            .iter()
            .map(|entity| GeneratedFile {
                entity: Some(entity.name.clone()),
                path: self.config.module_file(&entity.name),
                content: entity.content.clone(),
            })
            .collect();

        files.push(GeneratedFile {
            entity: None,
            path: self.config.module_file(INDEX_MODULE),
            content: output.render_index(&generator_config),
        });

        tracing::debug!(files = files.len(), "laid out generated modules");
        Ok(GeneratedOutput { files, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zodgen::prelude::*;

    fn document() -> LoadedDocument {
        let mut registry = SchemaRegistry::new();
        registry.register(
            "Pet",
            Schema::object(vec![Property::new("name", Schema::string())], ["name"]),
        );
        registry.register(
            "Error",
            Schema::object(vec![Property::new("message", Schema::string())], ["message"]),
        );
        LoadedDocument {
            title: Some("Petstore".to_string()),
            registry,
            usage: [("Pet", "pets")].into_iter().collect(),
        }
    }

    #[test]
    fn test_files_per_entity_plus_index() {
        let output = SchemaGenerator::new(Config::default())
            .generate(&document())
            .unwrap();

        let paths: Vec<PathBuf> = output.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("./generated/Pets.ts"),
                PathBuf::from("./generated/Utils.ts"),
                PathBuf::from("./generated/index.ts"),
            ]
        );
        assert_eq!(output.model_count(), 2);

        let index = output.files.last().unwrap();
        assert!(index.entity.is_none());
        assert!(index.content.contains("export * from './Pets';"));
        assert!(index.content.contains("export * from './Utils';"));
    }

    #[test]
    fn test_entity_file_content() {
        let output = SchemaGenerator::new(Config::default())
            .generate(&document())
            .unwrap();
        let pets = output.file("Pets").unwrap();
        assert!(pets.content.contains("export const PetValidationSchema"));
        assert!(!pets.content.contains("ErrorValidationSchema"));
    }

    #[test]
    fn test_dangling_reference_fails() {
        let mut doc = document();
        doc.registry.register(
            "Order",
            Schema::object(vec![Property::new("pet", Schema::reference("Ghost"))], ["pet"]),
        );
        let result = SchemaGenerator::new(Config::default()).generate(&doc);
        assert!(matches!(result, Err(crate::error::CliError::Engine(_))));
    }
}
