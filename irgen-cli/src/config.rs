//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `irgen.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use irgen::generator::{GeneratorConfig, IndentStyle};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "irgen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub package: PackageConfig,

    pub parse: ParseConfig,

    pub output: OutputConfig,
}

/// How the loaded package is named and located.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Package name; defaults to the source directory's name.
    pub name: Option<String>,

    /// Package path used in object identities; defaults to the name.
    pub path: Option<String>,
}

/// Which declarations are read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Interfaces that are checked but left out of the output.
    pub exclude: Vec<String>,

    /// Glob pattern that source file names must match.
    pub filter: Option<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// Zod schema file name.
    pub zod_file: String,

    /// Definition JSON file name.
    pub definition_file: String,

    /// Module that default-exports `ZodTypes`.
    pub types_import: String,

    /// "tabs", "2" or "4".
    pub indent: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
            zod_file: "schemas.gen.ts".to_string(),
            definition_file: "definition.json".to_string(),
            types_import: "./zod_types.gen".to_string(),
            indent: "tabs".to_string(),
        }
    }
}

impl Config {
    /// Zod generator settings derived from the output section.
    pub fn generator_config(&self) -> CliResult<GeneratorConfig> {
        let indent = IndentStyle::from_config(&self.output.indent).ok_or_else(|| {
            ConfigError::invalid_value(
                "output.indent",
                format!("expected \"tabs\", \"2\" or \"4\", got {:?}", self.output.indent),
            )
        })?;
        Ok(GeneratorConfig::new()
            .with_indent(indent)
            .with_types_import(self.output.types_import.clone()))
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without a path, `irgen.toml` in the working directory is tried. A
    /// missing file gives the default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values; excluded
    /// interfaces from both are kept.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref name) = args.package_name {
            config.package.name = Some(name.clone());
        }

        for name in &args.exclude {
            if !config.parse.exclude.contains(name) {
                config.parse.exclude.push(name.clone());
            }
        }

        if let Some(ref filter) = args.filter {
            config.parse.filter = Some(filter.clone());
        }

        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref types_import) = args.types_import {
            config.output.types_import = types_import.clone();
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# irgen configuration file

[package]
# Package name used in the definition (defaults to the source directory name)
# name = "services"

[parse]
# Interfaces that are checked but not included in the output
exclude = []

# Only read source files matching this glob
# filter = "*_service.rs"

[output]
# Output directory for generated files
dir = "./generated"

# Zod schema file name
zod_file = "schemas.gen.ts"

# Definition JSON file name
definition_file = "definition.json"

# Module that default-exports the ZodTypes custom scalars
types_import = "./zod_types.gen"

# Indentation of generated code: "tabs", "2" or "4"
indent = "tabs"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    pub package_name: Option<String>,

    /// Interfaces to exclude, added to the configured ones.
    pub exclude: Vec<String>,

    pub filter: Option<String>,

    pub output: Option<PathBuf>,

    pub types_import: Option<String>,
}
