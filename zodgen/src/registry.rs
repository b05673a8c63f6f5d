//! Schema Registry and reference resolution.
//!
//! The [`SchemaRegistry`] holds every named schema of a document and computes
//! reference closures: the set of schema names reachable from a schema
//! through object properties, array items, record values, union branches and
//! `Ref` edges. Closures drive both usage propagation and recursion
//! detection.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::error::SchemaResolutionError;
use crate::ir::{Schema, SchemaKind};

/// Registry of named schemas, immutable once loading is done.
///
/// Schemas are stored in a `BTreeMap` so every iteration is in name order,
/// which keeps generated output deterministic.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaRegistry {
    /// Create a new empty schema registry.
    pub fn new() -> Self {
        Self {
            schemas: BTreeMap::new(),
        }
    }

    /// Register a schema under the given name, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, schema: Schema) {
        self.schemas.insert(name.into(), schema);
    }

    /// Get a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Check if a schema is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// All registered schema names, in order.
    pub fn schema_names(&self) -> impl Iterator<Item = &String> {
        self.schemas.keys()
    }

    /// All registered schemas, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.schemas.iter()
    }

    /// Get the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Compute the reference closure of a registered schema.
    ///
    /// The walk follows `Ref` edges depth-first, keeping the names on the
    /// current path in a stack. A reference to a name already on the stack
    /// closes a cycle: it is recorded as reachable but not descended into.
    /// The root itself is only part of its closure when a cycle leads back
    /// to it.
    pub fn closure(&self, name: &str) -> Result<BTreeSet<String>, SchemaResolutionError> {
        let root = self
            .schemas
            .get(name)
            .ok_or_else(|| SchemaResolutionError::new(name, name))?;

        let mut stack = vec![name.to_string()];
        let mut visited = BTreeSet::new();
        self.walk(root, &mut stack, &mut visited)?;
        Ok(visited)
    }

    /// Compute the closure of every registered schema.
    pub fn closures(&self) -> ClosureIndex {
        let closures = self
            .schemas
            .keys()
            .map(|name| {
                let closure = self.closure(name);
                if let Ok(reachable) = &closure {
                    trace!(schema = %name, reachable = reachable.len(), "computed closure");
                }
                (name.clone(), closure)
            })
            .collect();
        ClosureIndex { closures }
    }

    /// Check whether a schema can reach itself.
    pub fn is_recursive(&self, name: &str) -> Result<bool, SchemaResolutionError> {
        Ok(self.closure(name)?.contains(name))
    }

    fn walk(
        &self,
        schema: &Schema,
        stack: &mut Vec<String>,
        visited: &mut BTreeSet<String>,
    ) -> Result<(), SchemaResolutionError> {
        match &schema.kind {
            SchemaKind::String(_)
            | SchemaKind::Number(_)
            | SchemaKind::Boolean
            | SchemaKind::Null => Ok(()),
            SchemaKind::Object(object) => {
                for property in &object.properties {
                    self.walk(&property.schema, stack, visited)?;
                }
                Ok(())
            }
            SchemaKind::Record(record) => self.walk(&record.value, stack, visited),
            SchemaKind::Array(array) => match &array.items {
                Some(items) => self.walk(items, stack, visited),
                None => Ok(()),
            },
            SchemaKind::OneOf(one_of) => {
                for branch in &one_of.branches {
                    self.walk(branch, stack, visited)?;
                }
                Ok(())
            }
            SchemaKind::Ref { target } => {
                if stack.iter().any(|name| name == target) {
                    visited.insert(target.clone());
                    return Ok(());
                }
                if !visited.insert(target.clone()) {
                    return Ok(());
                }
                let next = self.schemas.get(target).ok_or_else(|| {
                    let citing = stack.last().cloned().unwrap_or_default();
                    SchemaResolutionError::new(citing, target.clone())
                })?;
                stack.push(target.clone());
                let result = self.walk(next, stack, visited);
                stack.pop();
                result
            }
        }
    }
}

impl FromIterator<(String, Schema)> for SchemaRegistry {
    fn from_iter<T: IntoIterator<Item = (String, Schema)>>(iter: T) -> Self {
        Self {
            schemas: iter.into_iter().collect(),
        }
    }
}

/// Precomputed closures for every schema in a registry.
///
/// Read-only once built; generation consults it to decide whether a
/// reference closes a cycle.
#[derive(Debug, Clone, Default)]
pub struct ClosureIndex {
    closures: BTreeMap<String, Result<BTreeSet<String>, SchemaResolutionError>>,
}

impl ClosureIndex {
    /// Closure of a schema, or the resolution error that aborted it.
    pub fn get(&self, name: &str) -> Option<&Result<BTreeSet<String>, SchemaResolutionError>> {
        self.closures.get(name)
    }

    /// Check whether `to` is reachable from `from`.
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        matches!(self.closures.get(from), Some(Ok(set)) if set.contains(to))
    }

    /// Check whether a schema reaches itself.
    pub fn is_recursive(&self, name: &str) -> bool {
        self.reaches(name, name)
    }

    /// Every resolution error, deduplicated and sorted.
    pub fn errors(&self) -> Vec<SchemaResolutionError> {
        let unique: BTreeSet<SchemaResolutionError> = self
            .closures
            .values()
            .filter_map(|r| r.as_ref().err().cloned())
            .collect();
        unique.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Property;

    fn object_with_ref(field: &str, target: &str) -> Schema {
        Schema::object(vec![Property::new(field, Schema::reference(target))], [field])
    }

    fn simple_object() -> Schema {
        Schema::object(vec![Property::new("id", Schema::string())], ["id"])
    }

    #[test]
    fn test_registry_new() {
        let registry = SchemaRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = SchemaRegistry::new();
        registry.register("User", simple_object());

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("User"));
        assert!(registry.get("User").is_some());
    }

    #[test]
    fn test_schema_names_are_sorted() {
        let mut registry = SchemaRegistry::new();
        registry.register("C", simple_object());
        registry.register("A", simple_object());
        registry.register("B", simple_object());

        let names: Vec<_> = registry.schema_names().cloned().collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_closure_is_transitive() {
        let mut registry = SchemaRegistry::new();
        registry.register("A", object_with_ref("b", "B"));
        registry.register("B", object_with_ref("c", "C"));
        registry.register("C", simple_object());

        let closure = registry.closure("A").unwrap();
        let expected: BTreeSet<String> = ["B", "C"].iter().map(|s| s.to_string()).collect();
        assert_eq!(closure, expected);
        assert!(!registry.is_recursive("A").unwrap());
    }

    #[test]
    fn test_closure_ignores_primitive_fields() {
        let mut registry = SchemaRegistry::new();
        registry.register("User", simple_object());
        assert!(registry.closure("User").unwrap().is_empty());
    }

    #[test]
    fn test_closure_follows_union_and_record_edges() {
        let mut registry = SchemaRegistry::new();
        registry.register(
            "Root",
            Schema::one_of(vec![
                Schema::reference("A"),
                Schema::record(Schema::reference("B")),
            ]),
        );
        registry.register("A", simple_object());
        registry.register("B", simple_object());

        let closure = registry.closure("Root").unwrap();
        assert!(closure.contains("A"));
        assert!(closure.contains("B"));
    }

    #[test]
    fn test_direct_self_reference_is_recursive() {
        let mut registry = SchemaRegistry::new();
        registry.register(
            "Category",
            Schema::object(
                vec![
                    Property::new("name", Schema::string()),
                    Property::new("children", Schema::array(Schema::reference("Category"))),
                ],
                ["name", "children"],
            ),
        );

        assert!(registry.is_recursive("Category").unwrap());
    }

    #[test]
    fn test_indirect_cycle_is_recursive_for_every_member() {
        let mut registry = SchemaRegistry::new();
        registry.register("A", object_with_ref("b", "B"));
        registry.register("B", object_with_ref("c", "C"));
        registry.register("C", object_with_ref("a", "A"));

        for name in ["A", "B", "C"] {
            assert!(registry.is_recursive(name).unwrap(), "{} should be recursive", name);
        }
    }

    #[test]
    fn test_schema_outside_cycle_is_not_recursive() {
        let mut registry = SchemaRegistry::new();
        registry.register("Entry", object_with_ref("a", "A"));
        registry.register("A", object_with_ref("b", "B"));
        registry.register("B", object_with_ref("a", "A"));

        assert!(!registry.is_recursive("Entry").unwrap());
        assert!(registry.closure("Entry").unwrap().contains("B"));
    }

    #[test]
    fn test_dangling_reference_names_citing_schema() {
        let mut registry = SchemaRegistry::new();
        registry.register("Order", object_with_ref("line", "Line"));
        registry.register("Line", object_with_ref("product", "Product"));

        let err = registry.closure("Order").unwrap_err();
        assert_eq!(err, SchemaResolutionError::new("Line", "Product"));
    }

    #[test]
    fn test_closure_index() {
        let mut registry = SchemaRegistry::new();
        registry.register("A", object_with_ref("b", "B"));
        registry.register("B", object_with_ref("a", "A"));
        registry.register("C", object_with_ref("x", "Missing"));

        let index = registry.closures();
        assert!(index.reaches("A", "B"));
        assert!(index.is_recursive("A"));
        assert!(!index.reaches("C", "A"));
        assert_eq!(
            index.errors(),
            vec![SchemaResolutionError::new("C", "Missing")]
        );
    }

    #[test]
    fn test_cycle_entered_from_visited_schema() {
        // A is walked first and passes through the B <-> C cycle
        let mut registry = SchemaRegistry::new();
        registry.register("A", object_with_ref("b", "B"));
        registry.register("B", object_with_ref("c", "C"));
        registry.register("C", object_with_ref("b", "B"));

        let index = registry.closures();
        assert!(!index.is_recursive("A"));
        assert!(index.is_recursive("B"));
        assert!(index.is_recursive("C"));
        assert!(index.reaches("A", "C"));
    }
}
