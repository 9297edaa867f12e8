//! Zod schema generator.
//!
//! Transforms a [`Definition`](crate::ir::Definition) into TypeScript code
//! declaring one Zod schema per object.
//!
//! # Components
//!
//! - [`ZodEmitter`] - The code generator implementing
//!   [`CodeGenerator`](crate::generator::CodeGenerator)
//! - [`zod_custom_type`] - Maps `types.X` metadata to `ZodTypes.X`

pub mod custom_types;
pub mod emitter;

pub use custom_types::{zod_custom_type, ZOD_TYPES};
pub use emitter::ZodEmitter;
