//! # irgen
//!
//! Builds a language-neutral definition of services and data objects from
//! resolved declarations, then generates Zod schemas and example payloads
//! from it.
//!
//! ## Pipeline
//!
//! 1. A [`DeclarationSource`](source::DeclarationSource) hands over the
//!    interfaces, structs and aliases of one package.
//! 2. [`DefinitionBuilder`](builder::DefinitionBuilder) turns interfaces into
//!    services and structs into objects, resolving every field type and
//!    pulling `key: value` metadata out of doc comments.
//! 3. Generators read the [`Definition`](ir::Definition):
//!    [`ZodEmitter`](generator::zod::ZodEmitter) for schemas,
//!    [`Definition::example`](ir::Definition::example) for payloads.
//!
//! ## Metadata
//!
//! Doc comment lines shaped like `key: <JSON>` become metadata. The keys the
//! Zod generator understands on fields:
//!
//! - `example: <value>` - Example value used in example payloads
//! - `options: [..]` - Emit `z.enum([...])`
//! - `type: "types.UUID"` - Emit a `ZodTypes` custom scalar
//! - `nullable: true` / `optional: true` - Append `.nullable()` / `.optional()`
//! - `extend: true` - Merge the field's object schema into this one
//! - `exclude: true` - Leave the field out of the schema

pub mod builder;
pub mod error;
pub mod example;
pub mod generator;
pub mod helpers;
pub mod ir;
pub mod metadata;
pub mod naming;
pub mod resolver;
pub mod source;
pub mod tags;

pub use builder::DefinitionBuilder;
pub use error::{Error, Result};
pub use generator::zod::ZodEmitter;
pub use generator::{CodeGenerator, GeneratorConfig};
pub use ir::Definition;
