//! Code generator module.
//!
//! This module defines the code generator trait and the Zod implementation.

pub mod traits;
pub mod zod;

pub use traits::{CodeGenerator, GeneratedCode, GeneratorConfig, IndentStyle, LineEnding};
