//! Entity grouping.
//!
//! Every schema is assigned to exactly one output module ("entity"). A schema
//! used by a single tag lives in that tag's entity; a schema used by several
//! tags, or by none, lives in the shared entity.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::naming;
use crate::registry::{ClosureIndex, SchemaRegistry};

/// Which tags consume which schemas.
///
/// Built by the operation generator: for every operation, the request body,
/// response bodies and parameter models are recorded together with their
/// reference closures under each of the operation's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageMap {
    usage: BTreeMap<String, BTreeSet<String>>,
}

impl UsageMap {
    /// Create an empty usage map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `tag` uses `schema` directly.
    pub fn record(&mut self, schema: impl Into<String>, tag: impl Into<String>) {
        self.usage
            .entry(schema.into())
            .or_default()
            .insert(tag.into());
    }

    /// Record that `tag` uses `schema` and everything in its closure.
    ///
    /// Closures that failed to resolve contribute only the schema itself.
    pub fn record_with_closure(&mut self, closures: &ClosureIndex, schema: &str, tag: &str) {
        self.record(schema, tag);
        if let Some(Ok(closure)) = closures.get(schema) {
            for name in closure {
                self.record(name.clone(), tag);
            }
        }
    }

    /// Tags that use a schema.
    pub fn tags(&self, schema: &str) -> Option<&BTreeSet<String>> {
        self.usage.get(schema)
    }

    /// Number of distinct tags that use a schema.
    pub fn tag_count(&self, schema: &str) -> usize {
        self.usage.get(schema).map_or(0, BTreeSet::len)
    }

    /// Iterate over (schema, tags) pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.usage.iter()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.usage.is_empty()
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for UsageMap {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut usage = UsageMap::new();
        for (schema, tag) in iter {
            usage.record(schema, tag);
        }
        usage
    }
}

/// The result of entity grouping: `entity -> [schema]` and its inverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityAssignment {
    entities: BTreeMap<String, Vec<String>>,
    schema_to_entity: BTreeMap<String, String>,
    shared: String,
}

impl EntityAssignment {
    /// Schemas of an entity, in name order.
    pub fn members(&self, entity: &str) -> &[String] {
        self.entities.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Owning entity of a schema.
    pub fn entity_of(&self, schema: &str) -> Option<&str> {
        self.schema_to_entity.get(schema).map(String::as_str)
    }

    /// Entity names, in order. The shared entity is always present.
    pub fn entity_names(&self) -> impl Iterator<Item = &String> {
        self.entities.keys()
    }

    /// Iterate over (entity, schemas) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entities.iter()
    }

    /// The `schema -> entity` map.
    pub fn schema_to_entity(&self) -> &BTreeMap<String, String> {
        &self.schema_to_entity
    }

    /// Name of the shared entity.
    pub fn shared_entity(&self) -> &str {
        &self.shared
    }
}

/// Assign every registered schema to exactly one entity.
///
/// `|usage(S)| == 1` places `S` in its tag's entity; anything else places it
/// in `shared_entity`. Tags are turned into entity names with
/// [`naming::entity_name`]; tags that normalize to the same name share an
/// entity.
pub fn assign_entities(
    registry: &SchemaRegistry,
    usage: &UsageMap,
    shared_entity: &str,
) -> EntityAssignment {
    let mut entities: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut schema_to_entity = BTreeMap::new();
    entities.insert(shared_entity.to_string(), Vec::new());

    for name in registry.schema_names() {
        let entity = match usage.tags(name) {
            Some(tags) if tags.len() == 1 => tags
                .iter()
                .next()
                .map(|tag| naming::entity_name(tag))
                .unwrap_or_else(|| shared_entity.to_string()),
            _ => shared_entity.to_string(),
        };
        entities.entry(entity.clone()).or_default().push(name.clone());
        schema_to_entity.insert(name.clone(), entity);
    }

    for (schema, _) in usage.iter() {
        if !registry.contains(schema) {
            debug!(schema = %schema, "usage recorded for unregistered schema");
        }
    }

    debug!(
        entities = entities.len(),
        schemas = schema_to_entity.len(),
        "assigned schemas to entities"
    );

    EntityAssignment {
        entities,
        schema_to_entity,
        shared: shared_entity.to_string(),
    }
}
