//! Code generator trait definition.
//!
//! A generator turns a complete [`Definition`] into the text of one output
//! file. Generators are pure: the same definition and configuration always
//! produce the same text.

use crate::error::Result;
use crate::ir::Definition;

/// Trait for definition code generators.
pub trait CodeGenerator {
    /// Short, lowercase identifier used to select the generator (e.g. "zod").
    fn id(&self) -> &'static str;

    /// Human-readable name for display purposes.
    fn name(&self) -> &'static str;

    /// File extension of the generated file (e.g. "ts").
    fn file_extension(&self) -> &'static str;

    /// Generate the whole output file for a definition.
    fn generate(&self, def: &Definition, config: &GeneratorConfig) -> Result<GeneratedCode>;
}

/// Generator configuration options.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Indentation inside object bodies.
    pub indent: IndentStyle,

    /// Line ending style.
    pub line_ending: LineEnding,

    /// Module that default-exports the custom scalar schemas (`ZodTypes`).
    pub types_import: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent: IndentStyle::default(),
            line_ending: LineEnding::default(),
            types_import: "./zod_types.gen".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn with_types_import(mut self, types_import: impl Into<String>) -> Self {
        self.types_import = types_import.into();
        self
    }

    pub fn indent_str(&self) -> &str {
        self.indent.as_str()
    }

    pub fn line_ending_str(&self) -> &str {
        self.line_ending.as_str()
    }
}

/// Indentation used inside generated object bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    /// Two spaces.
    Spaces2,
    /// Four spaces.
    Spaces4,
    /// One tab per level.
    #[default]
    Tabs,
}

impl IndentStyle {
    pub fn as_str(&self) -> &str {
        match self {
            IndentStyle::Spaces2 => "  ",
            IndentStyle::Spaces4 => "    ",
            IndentStyle::Tabs => "\t",
        }
    }

    /// Parse a configuration value: "tabs", "2" or "4".
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "tabs" | "tab" => Some(IndentStyle::Tabs),
            "2" | "spaces2" => Some(IndentStyle::Spaces2),
            "4" | "spaces4" => Some(IndentStyle::Spaces4),
            _ => None,
        }
    }
}

/// Line ending style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Unix-style `\n`.
    #[default]
    Lf,
    /// Windows-style `\r\n`.
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Output of a generator.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    /// The generated source text.
    pub code: String,

    /// Number of object schemas in the code.
    pub objects: usize,
}

impl GeneratedCode {
    pub fn new(code: impl Into<String>, objects: usize) -> Self {
        Self {
            code: code.into(),
            objects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.indent_str(), "\t");
        assert_eq!(config.line_ending_str(), "\n");
        assert_eq!(config.types_import, "./zod_types.gen");
    }

    #[test]
    fn test_builder_methods() {
        let config = GeneratorConfig::new()
            .with_indent(IndentStyle::Spaces2)
            .with_line_ending(LineEnding::CrLf)
            .with_types_import("@/lib/zod-types");
        assert_eq!(config.indent_str(), "  ");
        assert_eq!(config.line_ending_str(), "\r\n");
        assert_eq!(config.types_import, "@/lib/zod-types");
    }

    #[test]
    fn test_indent_from_config() {
        assert_eq!(IndentStyle::from_config("tabs"), Some(IndentStyle::Tabs));
        assert_eq!(IndentStyle::from_config("4"), Some(IndentStyle::Spaces4));
        assert_eq!(IndentStyle::from_config("three"), None);
    }
}
