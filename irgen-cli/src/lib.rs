//! # irgen-cli
//!
//! CLI library for building definitions from Rust service declarations and
//! generating Zod schemas, definition JSON and example payloads from them.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Source file discovery for one package directory
//! - [`loader`] - Rust source parsing into declarations
//! - [`pipeline`] - Load, build and render steps used by the commands
//! - [`writer`] - File output and dry-run support
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod scanner;
pub mod writer;

pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use loader::RustLoader;
pub use scanner::{SourceFile, SourceScanner};
pub use writer::FileWriter;
