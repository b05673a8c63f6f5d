//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `zodgen.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use zodgen::generator::{GeneratorConfig, IndentStyle, DEFAULT_HEADER};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "zodgen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Naming conventions.
    pub naming: NamingConfig,

    /// Generation switches.
    pub generation: GenerationConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// Extension of every generated module.
    pub extension: String,

    /// Banner written at the top of each module.
    pub header: String,
}

/// Naming convention configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Entity holding schemas used by several tags or by none.
    pub shared_entity: String,

    /// Suffix of validator symbols.
    pub validator_suffix: String,

    /// Prefix of cross-entity import paths.
    pub import_prefix: String,
}

/// Generation switches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Declare structural types instead of inferring them.
    pub prefer_explicit_typing: bool,

    /// Emit DTO classes with framework property decorators.
    pub generate_framework_annotations: bool,

    /// Fail on unsupported shapes instead of degrading them.
    pub strict: bool,

    /// Emit JSDoc from descriptions and examples.
    pub generate_docs: bool,

    /// Indentation (`2`, `4` or `tab`).
    pub indent: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
            extension: "ts".to_string(),
            header: DEFAULT_HEADER.to_string(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            shared_entity: "Utils".to_string(),
            validator_suffix: "ValidationSchema".to_string(),
            import_prefix: "./".to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            prefer_explicit_typing: false,
            generate_framework_annotations: false,
            strict: false,
            generate_docs: true,
            indent: "2".to_string(),
        }
    }
}

impl Config {
    /// Build the engine configuration.
    pub fn generator_config(&self) -> CliResult<GeneratorConfig> {
        let indent = IndentStyle::parse(&self.generation.indent).ok_or_else(|| {
            ConfigError::invalid_value(
                "generation.indent",
                format!("must be 2, 4 or \"tab\", got \"{}\"", self.generation.indent),
            )
        })?;

        if self.naming.shared_entity.trim().is_empty() {
            return Err(
                ConfigError::invalid_value("naming.shared_entity", "must not be empty").into(),
            );
        }

        Ok(GeneratorConfig::new()
            .with_prefer_explicit_typing(self.generation.prefer_explicit_typing)
            .with_framework_annotations(self.generation.generate_framework_annotations)
            .with_strict(self.generation.strict)
            .with_generate_docs(self.generation.generate_docs)
            .with_shared_entity(self.naming.shared_entity.clone())
            .with_validator_suffix(self.naming.validator_suffix.clone())
            .with_import_prefix(self.naming.import_prefix.clone())
            .with_indent(indent)
            .with_header(self.output.header.clone()))
    }

    /// Path of the generated module for an entity.
    pub fn module_file(&self, module: &str) -> PathBuf {
        self.output
            .dir
            .join(format!("{}.{}", module, self.output.extension))
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without an explicit path, `zodgen.toml` in the working directory is
    /// used when present and defaults otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::not_found(path.to_path_buf()).into());
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            tracing::debug!("no configuration file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|source| {
            ConfigError::Io {
                path: config_path.clone(),
                source,
            }
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: config_path.clone(),
            source,
        })?;

        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(explicit) = args.prefer_explicit_typing {
            config.generation.prefer_explicit_typing = explicit;
        }

        if let Some(annotations) = args.generate_framework_annotations {
            config.generation.generate_framework_annotations = annotations;
        }

        if let Some(strict) = args.strict {
            config.generation.strict = strict;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> String {
        format!(
            r#"# zodgen configuration file

[output]
# Output directory for generated modules
dir = "./generated"

# Extension of every generated module
extension = "ts"

# Banner written at the top of each module (empty for none)
header = "{header}"

[naming]
# Entity holding schemas used by several tags or by none
shared_entity = "Utils"

# Suffix of validator symbols (e.g., UserValidationSchema)
validator_suffix = "ValidationSchema"

# Prefix of cross-entity import paths
import_prefix = "./"

[generation]
# Declare structural types (export type X = {{ ... }}) instead of z.infer
prefer_explicit_typing = false

# Emit DTO classes decorated with @ApiProperty (implies explicit typing)
generate_framework_annotations = false

# Fail on unsupported schema shapes instead of degrading them to z.any()
strict = false

# Emit JSDoc from schema descriptions and examples
generate_docs = true

# Indentation: 2, 4 or tab
indent = "2"
"#,
            header = DEFAULT_HEADER
        )
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Explicit typing override.
    pub prefer_explicit_typing: Option<bool>,

    /// Framework annotations override.
    pub generate_framework_annotations: Option<bool>,

    /// Strict mode override.
    pub strict: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.dir, PathBuf::from("./generated"));
        assert_eq!(config.output.extension, "ts");
        assert_eq!(config.output.header, DEFAULT_HEADER);
        assert_eq!(config.naming.shared_entity, "Utils");
        assert_eq!(config.naming.validator_suffix, "ValidationSchema");
        assert!(!config.generation.strict);
        assert!(config.generation.generate_docs);
    }

    #[test]
    fn test_default_config_matches_engine_defaults() {
        let generator = Config::default().generator_config().unwrap();
        let engine = GeneratorConfig::default();
        assert_eq!(generator.shared_entity, engine.shared_entity);
        assert_eq!(generator.validator_suffix, engine.validator_suffix);
        assert_eq!(generator.import_prefix, engine.import_prefix);
        assert_eq!(generator.header, engine.header);
        assert_eq!(generator.indent, engine.indent);
    }

    #[test]
    fn test_default_content_parses_to_defaults() {
        let content = ConfigManager::default_config_content();
        let config: Config = toml::from_str(&content).unwrap();
        let defaults = Config::default();
        assert_eq!(config.output.dir, defaults.output.dir);
        assert_eq!(config.output.header, defaults.output.header);
        assert_eq!(config.naming.import_prefix, defaults.naming.import_prefix);
        assert_eq!(config.generation.indent, defaults.generation.indent);
    }

    #[test]
    fn test_merge_cli_args_output() {
        let config = Config::default();
        let args = CliArgs {
            output: Some(PathBuf::from("./custom")),
            strict: Some(true),
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(config, &args);
        assert_eq!(merged.output.dir, PathBuf::from("./custom"));
        assert!(merged.generation.strict);
    }

    #[test]
    fn test_merge_cli_args_preserves_unset() {
        let config = Config::default();
        let args = CliArgs::default();

        let merged = ConfigManager::merge_cli_args(config.clone(), &args);
        assert_eq!(merged.output.dir, config.output.dir);
        assert_eq!(
            merged.generation.prefer_explicit_typing,
            config.generation.prefer_explicit_typing
        );
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[output]
dir = "./src/models"
extension = "mts"
header = ""

[naming]
shared_entity = "Common"
validator_suffix = "Schema"
import_prefix = "@/models/"

[generation]
generate_framework_annotations = true
strict = true
indent = "tab"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.module_file("Users"), PathBuf::from("./src/models/Users.mts"));

        let generator = config.generator_config().unwrap();
        assert_eq!(generator.shared_entity, "Common");
        assert_eq!(generator.validator_name("User"), "UserSchema");
        assert_eq!(generator.module_path("Users"), "@/models/Users");
        assert!(generator.explicit_typing());
        assert!(generator.strict);
        assert!(generator.header.is_empty());
        assert_eq!(generator.indent, IndentStyle::Tabs);
        // Unset keys keep their defaults
        assert!(generator.generate_docs);
    }

    #[test]
    fn test_invalid_indent_rejected() {
        let config: Config = toml::from_str("[generation]\nindent = \"3\"").unwrap();
        let err = config.generator_config().unwrap_err();
        assert!(err.to_string().contains("generation.indent"));
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let result = ConfigManager::load(Some(Path::new("/definitely/not/here/zodgen.toml")));
        assert!(matches!(
            result,
            Err(crate::error::CliError::Config(ConfigError::NotFound { .. }))
        ));
    }
}
