//! Attributes shared by every schema kind.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Optional attributes common to all schema kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    /// Human-readable description (emitted as `.describe()` and JSDoc)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether `null` is an accepted value
    #[serde(default)]
    pub nullable: bool,

    /// Example value, used for documentation only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Default value (emitted as `.default()`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl SchemaMetadata {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && !self.nullable
            && self.example.is_none()
            && self.default.is_none()
    }
}
