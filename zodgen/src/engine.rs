//! Generation pipeline.
//!
//! [`ModelEngine::generate`] runs the phases in order:
//!
//! 1. reference closures for every schema
//! 2. entity assignment from the usage map
//! 3. per-schema generation (independent, no shared state)
//! 4. exported name allocation across all generated models
//! 5. per-entity ordering, import aggregation and rendering
//!
//! Phase 4 only starts once every schema of phase 3 is done. Problems are
//! collected in the [`GenerationReport`]; a failing schema never stops its
//! siblings.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::generator::{GeneratedModel, GeneratorConfig, ModelGenerator, ZodEmitter};
use crate::grouping::{assign_entities, UsageMap};
use crate::imports::{entity_imports, ModuleImportMap};
use crate::ordering::{order_models, DependencyOrder};
use crate::registry::SchemaRegistry;
use crate::report::{Diagnostic, GenerationReport};
use crate::symbols::allocate_symbols;

/// Name of the module re-exporting every entity.
pub const INDEX_MODULE: &str = "index";

/// One output module.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityBundle {
    /// Entity name (e.g. "Users")
    pub name: String,

    /// Module path used in imports (e.g. "./Users")
    pub module_path: String,

    /// Models in declaration order
    pub models: Vec<GeneratedModel>,

    /// Resolved imports
    pub imports: ModuleImportMap,

    /// The computed declaration order
    pub order: DependencyOrder,

    /// Final module text
    pub content: String,
}

impl EntityBundle {
    /// Find a model by schema name.
    pub fn model(&self, schema: &str) -> Option<&GeneratedModel> {
        self.models.iter().find(|m| m.name == schema)
    }

    /// Schema names in declaration order.
    pub fn schema_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutput {
    /// Bundles in entity name order; the shared entity is always present
    pub entities: Vec<EntityBundle>,

    /// Owning entity of every registered schema
    pub schema_to_entity: BTreeMap<String, String>,

    /// Validator symbol of every generated schema
    pub schema_to_validator_name: BTreeMap<String, String>,

    /// Per-schema diagnostics
    pub report: GenerationReport,
}

impl GenerationOutput {
    /// Find a bundle by entity name.
    pub fn entity(&self, name: &str) -> Option<&EntityBundle> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Find the generated model of a schema.
    pub fn model(&self, schema: &str) -> Option<&GeneratedModel> {
        let entity = self.schema_to_entity.get(schema)?;
        self.entity(entity)?.model(schema)
    }

    /// `entity -> models` in declaration order.
    pub fn entity_models(&self) -> BTreeMap<&str, &[GeneratedModel]> {
        self.entities
            .iter()
            .map(|e| (e.name.as_str(), e.models.as_slice()))
            .collect()
    }

    /// Render the index module re-exporting every entity.
    pub fn render_index(&self, config: &GeneratorConfig) -> String {
        let mut out = String::new();
        if !config.header.is_empty() {
            out.push_str(&config.header);
            out.push_str("\n\n");
        }
        for entity in &self.entities {
            out.push_str(&format!("export * from '{}';\n", entity.module_path));
        }
        out
    }

    /// Check whether the run succeeded under the given strictness.
    pub fn outcome(&self, strict: bool) -> Result<(), EngineError> {
        self.report.outcome(strict)
    }
}

/// The schema-to-module generation engine.
///
/// # Example
///
/// ```rust
/// use zodgen::engine::ModelEngine;
/// use zodgen::generator::GeneratorConfig;
/// use zodgen::grouping::UsageMap;
/// use zodgen::ir::{Property, Schema};
/// use zodgen::registry::SchemaRegistry;
///
/// let mut registry = SchemaRegistry::new();
/// registry.register(
///     "User",
///     Schema::object(vec![Property::new("id", Schema::string())], ["id"]),
/// );
/// let usage: UsageMap = [("User", "Users")].into_iter().collect();
///
/// let output = ModelEngine::new(GeneratorConfig::default()).generate(&registry, &usage);
/// assert_eq!(output.schema_to_entity["User"], "Users");
/// assert!(output.entity("Users").unwrap().content.contains("UserValidationSchema"));
/// ```
pub struct ModelEngine {
    config: GeneratorConfig,
    generator: Box<dyn ModelGenerator>,
}

impl ModelEngine {
    /// Create an engine generating Zod models.
    pub fn new(config: GeneratorConfig) -> Self {
        let generator = Box::new(ZodEmitter::new(config.clone()));
        Self { config, generator }
    }

    /// Create an engine with a custom model generator.
    pub fn with_generator(config: GeneratorConfig, generator: Box<dyn ModelGenerator>) -> Self {
        Self { config, generator }
    }

    /// The engine configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The model generator in use.
    pub fn generator(&self) -> &dyn ModelGenerator {
        self.generator.as_ref()
    }

    /// Run every phase and return the full output with its report.
    ///
    /// This never fails; use [`GenerationOutput::outcome`] (or
    /// [`ModelEngine::try_generate`]) to decide whether the run succeeded.
    #[tracing::instrument(skip_all, fields(schemas = registry.len(), generator = self.generator.id()))]
    pub fn generate(&self, registry: &SchemaRegistry, usage: &UsageMap) -> GenerationOutput {
        let mut report = GenerationReport::new();

        // Phase 1: closures
        let closures = registry.closures();

        // Phase 2: entity assignment
        let assignment = assign_entities(registry, usage, &self.config.shared_entity);

        // Phase 3: per-schema generation
        let mut generated: BTreeMap<String, GeneratedModel> = BTreeMap::new();
        for (name, schema) in registry.iter() {
            if let Some(Err(error)) = closures.get(name) {
                warn!(schema = %name, error = %error, "skipping schema with unresolved references");
                report.record(name.as_str(), Diagnostic::Resolution(error.clone()));
                continue;
            }
            match self.generator.generate(name, schema, registry, &closures) {
                Ok(result) => {
                    report.extend(name, result.diagnostics);
                    generated.insert(name.clone(), result.model);
                }
                Err(error) => {
                    warn!(schema = %name, error = %error, "schema generation failed");
                    report.record(name.as_str(), Diagnostic::Resolution(error));
                }
            }
        }

        // Phase 4: exported names
        allocate_symbols(&mut generated, &self.config, &mut report);
        let schema_to_validator_name = generated
            .values()
            .map(|model| (model.name.clone(), model.validator_name.clone()))
            .collect();

        // Phase 5: per-entity assembly
        let schema_to_entity = assignment.schema_to_entity().clone();
        let entities: Vec<EntityBundle> = assignment
            .iter()
            .map(|(entity, members)| {
                let models: Vec<GeneratedModel> = members
                    .iter()
                    .filter_map(|name| generated.remove(name))
                    .collect();
                self.assemble_entity(entity, models, &schema_to_entity)
            })
            .collect();

        info!(
            entities = entities.len(),
            models = entities.iter().map(|e| e.models.len()).sum::<usize>(),
            warnings = report.warning_count(),
            errors = report.error_count(),
            "generation finished"
        );

        GenerationOutput {
            entities,
            schema_to_entity,
            schema_to_validator_name,
            report,
        }
    }

    /// Run every phase and fail on resolution errors (or, in strict mode,
    /// on degraded shapes).
    pub fn try_generate(
        &self,
        registry: &SchemaRegistry,
        usage: &UsageMap,
    ) -> Result<GenerationOutput, EngineError> {
        let output = self.generate(registry, usage);
        output.outcome(self.config.strict)?;
        Ok(output)
    }

    #[tracing::instrument(skip_all, fields(entity = %entity, models = models.len()))]
    fn assemble_entity(
        &self,
        entity: &str,
        models: Vec<GeneratedModel>,
        schema_to_entity: &BTreeMap<String, String>,
    ) -> EntityBundle {
        let (models, order) = order_models(models);
        if order.has_cycles() {
            debug!(tie_breaks = ?order.tie_breaks, "declaration order contains cycles");
        }

        let imports = entity_imports(&models, entity, schema_to_entity, &self.config);
        let content = self.render_bundle(&imports, &models);

        EntityBundle {
            name: entity.to_string(),
            module_path: self.config.module_path(entity),
            models,
            imports,
            order,
            content,
        }
    }

    fn render_bundle(&self, imports: &ModuleImportMap, models: &[GeneratedModel]) -> String {
        let mut out = String::new();
        if !self.config.header.is_empty() {
            out.push_str(&self.config.header);
            out.push_str("\n\n");
        }
        out.push_str(&imports.render());
        for model in models {
            out.push('\n');
            out.push_str(&self.generator.render_model(model));
        }
        out
    }
}
