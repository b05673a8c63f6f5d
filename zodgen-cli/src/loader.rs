//! OpenAPI document loading.
//!
//! Reads an OpenAPI 3.x document (JSON or YAML) and produces the two inputs
//! the engine needs:
//!
//! - a [`SchemaRegistry`] built from `components.schemas`
//! - a [`UsageMap`] recording, for every tagged operation, the schemas its
//!   request body, responses and parameters reach
//!
//! Both formats are parsed into a [`serde_json::Value`] first, so the
//! conversion below only deals with one tree type.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use zodgen::grouping::UsageMap;
use zodgen::ir::{NumberSchema, ObjectSchema, OneOfSchema, Property, Schema, SchemaKind, StringSchema};
use zodgen::registry::SchemaRegistry;

use crate::error::LoadError;

/// Prefix of references into `components.schemas`.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// HTTP methods an OpenAPI path item may declare.
const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Parsed document contents.
#[derive(Debug, Clone, Default)]
pub struct LoadedDocument {
    /// Title from `info.title`, when present.
    pub title: Option<String>,

    /// Every schema under `components.schemas`.
    pub registry: SchemaRegistry,

    /// Which tags consume which schemas.
    pub usage: UsageMap,
}

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from the file extension; anything but `.yaml`/`.yml`
    /// is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Loader for OpenAPI documents.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Read and convert a document from disk.
    pub fn load(path: &Path) -> Result<LoadedDocument, LoadError> {
        if !path.exists() {
            return Err(LoadError::not_found(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let value = Self::parse(&content, DocumentFormat::from_path(path), path)?;
        Self::from_value(&value)
    }

    /// Parse document text in the given format.
    pub fn parse(content: &str, format: DocumentFormat, origin: &Path) -> Result<Value, LoadError> {
        match format {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| LoadError::Json {
                path: PathBuf::from(origin),
                source: e,
            }),
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| LoadError::Yaml {
                path: PathBuf::from(origin),
                source: e,
            }),
        }
    }

    /// Convert an already parsed document.
    pub fn from_value(document: &Value) -> Result<LoadedDocument, LoadError> {
        let root = document
            .as_object()
            .ok_or_else(|| LoadError::invalid("document root is not an object"))?;

        let title = root
            .get("info")
            .and_then(|info| info.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let empty = Map::new();
        let schemas = match root.get("components").and_then(|c| c.get("schemas")) {
            None => {
                warn!("document declares no components.schemas");
                &empty
            }
            Some(Value::Object(schemas)) => schemas,
            Some(_) => return Err(LoadError::invalid("components.schemas is not an object")),
        };

        let converter = SchemaConverter::new(schemas);
        let registry: SchemaRegistry = schemas
            .iter()
            .map(|(name, value)| (name.clone(), converter.convert(value)))
            .collect();

        let usage = collect_usage(document, &registry);

        info!(
            schemas = registry.len(),
            title = title.as_deref().unwrap_or(""),
            "loaded document"
        );

        Ok(LoadedDocument {
            title,
            registry,
            usage,
        })
    }
}

// =============================================================================
// Schema conversion
// =============================================================================

/// Converts JSON Schema objects into engine schemas.
///
/// `components` resolves the references inside multi-member `allOf`
/// compositions, whose members are merged into one object.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaConverter<'a> {
    components: Option<&'a Map<String, Value>>,
}

impl<'a> SchemaConverter<'a> {
    /// Create a converter resolving `allOf` references against `components`.
    pub fn new(components: &'a Map<String, Value>) -> Self {
        Self {
            components: Some(components),
        }
    }

    /// Convert one schema value.
    pub fn convert(&self, value: &Value) -> Schema {
        self.convert_guarded(value, &mut BTreeSet::new())
    }

    fn convert_guarded(&self, value: &Value, merging: &mut BTreeSet<String>) -> Schema {
        let Some(obj) = value.as_object() else {
            // Boolean schemas carry no shape
            return empty_object();
        };
        let mut schema = self.convert_kind(obj, merging);
        apply_metadata(&mut schema, obj);
        schema
    }

    fn convert_kind(&self, obj: &Map<String, Value>, merging: &mut BTreeSet<String>) -> Schema {
        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            return Schema::reference(ref_name(reference));
        }

        if let Some(branches) = obj
            .get("oneOf")
            .or_else(|| obj.get("anyOf"))
            .and_then(Value::as_array)
        {
            return self.convert_union(branches, obj, merging);
        }

        if let Some(parts) = obj.get("allOf").and_then(Value::as_array) {
            return self.convert_all_of(parts, merging);
        }

        let (types, has_null) = declared_types(obj);
        match types.as_slice() {
            [] if has_null => Schema::null(),
            [] => self.infer_kind(obj, merging),
            [single] => self.convert_typed(single, obj, merging),
            many => Schema::one_of(
                many.iter()
                    .map(|ty| self.convert_typed(ty, obj, merging))
                    .collect(),
            ),
        }
    }

    /// Kind of a schema that declares no `type`.
    fn infer_kind(&self, obj: &Map<String, Value>, merging: &mut BTreeSet<String>) -> Schema {
        if obj.contains_key("properties") || obj.contains_key("additionalProperties") {
            self.convert_object(obj, merging)
        } else if obj.contains_key("items") {
            self.convert_typed("array", obj, merging)
        } else if obj.contains_key("enum") {
            string_schema(obj)
        } else {
            empty_object()
        }
    }

    fn convert_typed(
        &self,
        ty: &str,
        obj: &Map<String, Value>,
        merging: &mut BTreeSet<String>,
    ) -> Schema {
        match ty {
            "string" => string_schema(obj),
            "number" => number_schema(obj, false),
            "integer" => number_schema(obj, true),
            "boolean" => Schema::boolean(),
            "array" => match obj.get("items") {
                Some(items) => Schema::array(self.convert_guarded(items, merging)),
                None => Schema::untyped_array(),
            },
            "object" => self.convert_object(obj, merging),
            other => {
                warn!(schema_type = other, "unknown schema type, treating as an empty object");
                empty_object()
            }
        }
    }

    fn convert_object(&self, obj: &Map<String, Value>, merging: &mut BTreeSet<String>) -> Schema {
        let properties: Vec<Property> = obj
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, value)| Property::new(name, self.convert_guarded(value, merging)))
                    .collect()
            })
            .unwrap_or_default();

        if properties.is_empty() {
            if let Some(value @ Value::Object(_)) = obj.get("additionalProperties") {
                return Schema::record(self.convert_guarded(value, merging));
            }
        }

        let required: Vec<&str> = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        Schema::object(properties, required)
    }

    fn convert_union(
        &self,
        branches: &[Value],
        obj: &Map<String, Value>,
        merging: &mut BTreeSet<String>,
    ) -> Schema {
        let mut converted: Vec<Schema> = branches
            .iter()
            .map(|branch| self.convert_guarded(branch, merging))
            .collect();

        if converted.len() == 1 {
            return converted.remove(0);
        }

        let mut union = OneOfSchema::new(converted);
        if let Some(property) = obj
            .get("discriminator")
            .and_then(|d| d.get("propertyName"))
            .and_then(Value::as_str)
        {
            union = union.with_discriminator(property);
        }
        Schema::new(SchemaKind::OneOf(union))
    }

    /// `allOf` with one member is that member; with several, the object
    /// members (inline or referenced) are merged into one object.
    fn convert_all_of(&self, parts: &[Value], merging: &mut BTreeSet<String>) -> Schema {
        if let [single] = parts {
            return self.convert_guarded(single, merging);
        }

        let mut merged = ObjectSchema::default();
        for part in parts {
            let converted = match part.get("$ref").and_then(Value::as_str) {
                Some(reference) => {
                    let name = ref_name(reference);
                    let target = self.components.and_then(|c| c.get(&name));
                    match target {
                        Some(target) if merging.insert(name.clone()) => {
                            let schema = self.convert_guarded(target, merging);
                            merging.remove(&name);
                            schema
                        }
                        _ => {
                            warn!(reference = %name, "cannot merge allOf member");
                            continue;
                        }
                    }
                }
                None => self.convert_guarded(part, merging),
            };

            match converted.kind {
                SchemaKind::Object(object) => {
                    for property in object.properties {
                        merged.properties.retain(|p| p.name != property.name);
                        merged.properties.push(property);
                    }
                    merged.required.extend(object.required);
                }
                other => warn!(kind = other.label(), "skipping non-object allOf member"),
            }
        }

        Schema::new(SchemaKind::Object(merged))
    }
}

/// Schema name of a `$ref`, decoding JSON pointer escapes.
pub fn ref_name(reference: &str) -> String {
    let raw = match reference.strip_prefix(SCHEMA_REF_PREFIX) {
        Some(name) => name,
        None => reference.rsplit('/').next().unwrap_or(reference),
    };
    raw.replace("~1", "/").replace("~0", "~")
}

/// Declared non-null types, and whether `null` was declared too.
fn declared_types(obj: &Map<String, Value>) -> (Vec<&str>, bool) {
    let declared: Vec<&str> = match obj.get("type") {
        Some(Value::String(ty)) => vec![ty.as_str()],
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };
    let has_null = declared.contains(&"null");
    let types = declared.into_iter().filter(|ty| *ty != "null").collect();
    (types, has_null)
}

fn string_schema(obj: &Map<String, Value>) -> Schema {
    let mut string = StringSchema::new();
    if let Some(format) = obj.get("format").and_then(Value::as_str) {
        string = string.with_format(format);
    }
    if let Some(values) = obj.get("enum").and_then(Value::as_array) {
        string = string.with_enum(values.iter().filter_map(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }));
    }
    if let Some(min) = obj.get("minLength").and_then(Value::as_u64) {
        string = string.with_min_length(min);
    }
    if let Some(max) = obj.get("maxLength").and_then(Value::as_u64) {
        string = string.with_max_length(max);
    }
    if let Some(pattern) = obj.get("pattern").and_then(Value::as_str) {
        string = string.with_pattern(pattern);
    }
    string.into()
}

fn number_schema(obj: &Map<String, Value>, integer: bool) -> Schema {
    let mut number = NumberSchema::new().with_integer(integer);
    if let Some(min) = obj.get("minimum").and_then(Value::as_f64) {
        number = number.with_minimum(min);
    }
    if let Some(max) = obj.get("maximum").and_then(Value::as_f64) {
        number = number.with_maximum(max);
    }
    number.into()
}

fn empty_object() -> Schema {
    Schema::object(Vec::new(), Vec::<String>::new())
}

fn apply_metadata(schema: &mut Schema, obj: &Map<String, Value>) {
    let (types, has_null) = declared_types(obj);
    if obj.get("nullable").and_then(Value::as_bool) == Some(true) || (has_null && !types.is_empty())
    {
        schema.metadata.nullable = true;
    }
    if let Some(description) = obj.get("description").and_then(Value::as_str) {
        schema.metadata.description = Some(description.to_string());
    }
    if let Some(example) = obj.get("example") {
        schema.metadata.example = Some(example.clone());
    }
    if let Some(default) = obj.get("default") {
        schema.metadata.default = Some(default.clone());
    }
}

// =============================================================================
// Usage collection
// =============================================================================

/// Record every schema a tagged operation reaches under each of its tags.
///
/// Untagged operations contribute nothing, so their schemas land in the
/// shared entity.
fn collect_usage(document: &Value, registry: &SchemaRegistry) -> UsageMap {
    let closures = registry.closures();
    let mut usage = UsageMap::new();

    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return usage;
    };

    for (route, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };

        for method in METHODS {
            let Some(operation) = item.get(method) else {
                continue;
            };

            let tags: Vec<&str> = operation
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| tags.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            if tags.is_empty() {
                debug!(route = %route, method, "skipping untagged operation");
                continue;
            }

            let mut used = BTreeSet::new();
            let mut followed = BTreeSet::new();
            for key in ["requestBody", "responses", "parameters"] {
                if let Some(value) = operation.get(key) {
                    collect_refs(document, value, &mut used, &mut followed);
                }
            }
            if let Some(shared) = item.get("parameters") {
                collect_refs(document, shared, &mut used, &mut followed);
            }

            for schema in &used {
                if !registry.contains(schema) {
                    debug!(schema = %schema, route = %route, "operation uses an unknown schema");
                    continue;
                }
                for tag in &tags {
                    usage.record_with_closure(&closures, schema, tag);
                }
            }
        }
    }

    usage
}

/// Collect schema names referenced anywhere under `value`, following
/// references to other components (request bodies, responses, parameters).
fn collect_refs(
    document: &Value,
    value: &Value,
    used: &mut BTreeSet<String>,
    followed: &mut BTreeSet<String>,
) {
    match value {
        Value::Object(obj) => {
            if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
                if reference.starts_with(SCHEMA_REF_PREFIX) {
                    used.insert(ref_name(reference));
                } else if let Some(pointer) = reference.strip_prefix('#') {
                    if followed.insert(reference.to_string()) {
                        if let Some(target) = document.pointer(pointer) {
                            collect_refs(document, target, used, followed);
                        }
                    }
                }
            }
            for (key, nested) in obj {
                if key != "$ref" {
                    collect_refs(document, nested, used, followed);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_refs(document, item, used, followed);
            }
        }
        _ => {}
    }
}
