//! Generator configuration.

/// Banner written at the top of every generated module.
pub const DEFAULT_HEADER: &str = "// This file is generated by zodgen. Do not edit it by hand.";

/// Generator configuration options.
///
/// Controls typing mode, naming of exported symbols, module paths and
/// formatting of the generated modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Emit explicit structural types instead of `z.infer<...>`
    pub prefer_explicit_typing: bool,

    /// Also emit framework DTO classes with per-property decorators
    pub generate_framework_annotations: bool,

    /// Fail the run on degraded shapes instead of warning
    pub strict: bool,

    /// Name of the entity that holds shared and unused schemas
    pub shared_entity: String,

    /// Suffix appended to a type name to form its validator symbol
    pub validator_suffix: String,

    /// Prefix of entity module paths in import statements
    pub import_prefix: String,

    /// Whether to generate JSDoc comments from descriptions and examples
    pub generate_docs: bool,

    /// Indentation style
    pub indent: IndentStyle,

    /// Banner at the top of each module; empty for none
    pub header: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            prefer_explicit_typing: false,
            generate_framework_annotations: false,
            strict: false,
            shared_entity: "Utils".to_string(),
            validator_suffix: "ValidationSchema".to_string(),
            import_prefix: "./".to_string(),
            generate_docs: true,
            indent: IndentStyle::default(),
            header: DEFAULT_HEADER.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set explicit typing.
    pub fn with_prefer_explicit_typing(mut self, explicit: bool) -> Self {
        self.prefer_explicit_typing = explicit;
        self
    }

    /// Set framework annotation output.
    pub fn with_framework_annotations(mut self, enabled: bool) -> Self {
        self.generate_framework_annotations = enabled;
        self
    }

    /// Set strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the shared entity name.
    pub fn with_shared_entity(mut self, name: impl Into<String>) -> Self {
        self.shared_entity = name.into();
        self
    }

    /// Set the validator suffix.
    pub fn with_validator_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.validator_suffix = suffix.into();
        self
    }

    /// Set the import prefix.
    pub fn with_import_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.import_prefix = prefix.into();
        self
    }

    /// Set whether to generate documentation comments.
    pub fn with_generate_docs(mut self, generate: bool) -> Self {
        self.generate_docs = generate;
        self
    }

    /// Set the indentation style.
    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }

    /// Set the module banner.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Effective typing mode: annotations imply explicit types.
    pub fn explicit_typing(&self) -> bool {
        self.prefer_explicit_typing || self.generate_framework_annotations
    }

    /// Module path of an entity as written in import statements.
    pub fn module_path(&self, entity: &str) -> String {
        format!("{}{}", self.import_prefix, entity)
    }

    /// Validator symbol of a schema.
    pub fn validator_name(&self, schema: &str) -> String {
        crate::naming::validator_name(schema, &self.validator_suffix)
    }

    /// Get the indentation string based on current settings.
    pub fn indent_str(&self) -> &str {
        self.indent.as_str()
    }
}

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    /// Use spaces for indentation (default: 2 spaces)
    #[default]
    Spaces2,

    /// Use 4 spaces for indentation
    Spaces4,

    /// Use tabs for indentation
    Tabs,
}

impl IndentStyle {
    /// Get the indentation string.
    pub fn as_str(&self) -> &str {
        match self {
            IndentStyle::Spaces2 => "  ",
            IndentStyle::Spaces4 => "    ",
            IndentStyle::Tabs => "\t",
        }
    }

    /// Parse an indentation name (`2`, `4`, `tab`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "2" | "spaces2" => Some(IndentStyle::Spaces2),
            "4" | "spaces4" => Some(IndentStyle::Spaces4),
            "tab" | "tabs" => Some(IndentStyle::Tabs),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert!(!config.prefer_explicit_typing);
        assert!(!config.generate_framework_annotations);
        assert!(!config.strict);
        assert_eq!(config.shared_entity, "Utils");
        assert_eq!(config.validator_suffix, "ValidationSchema");
        assert_eq!(config.indent_str(), "  ");
    }

    #[test]
    fn test_annotations_imply_explicit_typing() {
        let config = GeneratorConfig::new().with_framework_annotations(true);
        assert!(config.explicit_typing());
        assert!(!GeneratorConfig::new().explicit_typing());
    }

    #[test]
    fn test_module_path_and_validator_name() {
        let config = GeneratorConfig::new().with_import_prefix("@/models/");
        assert_eq!(config.module_path("Utils"), "@/models/Utils");
        assert_eq!(config.validator_name("Address"), "AddressValidationSchema");
    }

    #[test]
    fn test_indent_parse() {
        assert_eq!(IndentStyle::parse("4"), Some(IndentStyle::Spaces4));
        assert_eq!(IndentStyle::parse("Tab"), Some(IndentStyle::Tabs));
        assert_eq!(IndentStyle::parse("three"), None);
    }
}
