//! Intermediate representation consumed by the generators.
//!
//! A [`Definition`] is built once by the
//! [`DefinitionBuilder`](crate::builder::DefinitionBuilder) and is read-only
//! afterwards. Every type serializes with camelCase keys so it can be handed
//! to an external template renderer as JSON.

mod definition;
mod types;

pub use definition::{Definition, Field, FieldTag, Method, Object, Service};
pub use types::{unqualified, FieldType, FieldTypeMap};
