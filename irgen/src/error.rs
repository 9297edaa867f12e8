//! Error types for building definitions and generating code from them.
//!
//! Structural problems in the declarations ([`BuildError`], [`TagError`]) are
//! kept apart from lookups that miss ([`NotFoundError`]) and from mismatches
//! between the definition and the generator's fixed tables
//! ([`InvariantError`]), which indicate a configuration bug rather than bad
//! input.

use crate::source::Position;
use thiserror::Error;

/// Result type alias for definition operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    /// A declaration could not be turned into a definition.
    #[error("Failed to build definition: {0}")]
    Build(#[from] BuildError),

    /// A named object does not exist in the definition.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The definition asked for something the generator has no table entry for.
    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantError),

    /// A struct tag string could not be parsed.
    #[error("Invalid struct tag: {0}")]
    Tag(#[from] TagError),

    /// Serializing a definition or an example failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A template helper was called with an argument it cannot handle.
    #[error("{0}")]
    Helper(String),
}

impl Error {
    /// Whether the error signals a programmer or configuration mistake that
    /// no amount of input correction will fix.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Error::Invariant(_))
    }
}

/// Fatal problems found while walking declarations.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Service methods take exactly one request and return exactly one response.
    #[error(
        "{}{}.{}: invalid method signature: expected {}({}Request) {}Response",
        at(.position), .service, .method, .method, .method, .method
    )]
    InvalidMethodSignature {
        service: String,
        method: String,
        position: Option<Position>,
    },

    /// A field was typed with an inline struct instead of a named one.
    #[error("{}nested structs not supported (create another type instead)", at(.position))]
    NestedStruct { position: Option<Position> },

    /// Every field of a data object must be visible to the generated code.
    #[error("{}{}.{} must be exported", at(.position), .object, .field)]
    UnexportedField {
        object: String,
        field: String,
        position: Option<Position>,
    },

    /// The field's struct tag is malformed.
    #[error("{}{}.{}: parse tags {:?}: {}", at(.position), .object, .field, .tag, .source)]
    InvalidTag {
        object: String,
        field: String,
        tag: String,
        position: Option<Position>,
        #[source]
        source: TagError,
    },
}

/// Lookup of an object that is not part of the definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("object not found: {name}")]
pub struct NotFoundError {
    /// The name that was looked up.
    pub name: String,
}

/// Configuration mismatches between a definition and a generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// The `type` metadata names a scalar the generator does not know.
    #[error("{}.{}: unknown custom type {:?}", .object, .field, .name)]
    UnknownCustomType {
        object: String,
        field: String,
        name: String,
    },
}

/// Errors from the struct tag grammar (`key:"value,option"`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("bad syntax for struct tag key")]
    KeySyntax,

    #[error("bad syntax for struct tag value")]
    ValueSyntax,

    #[error("bad syntax for struct tag pair")]
    PairSyntax,
}

fn at(position: &Option<Position>) -> String {
    position
        .as_ref()
        .map(|p| format!("{p}: "))
        .unwrap_or_default()
}

impl BuildError {
    /// Create an invalid method signature error.
    pub fn invalid_method_signature(
        service: impl Into<String>,
        method: impl Into<String>,
        position: Option<Position>,
    ) -> Self {
        Self::InvalidMethodSignature {
            service: service.into(),
            method: method.into(),
            position,
        }
    }

    /// Create an unexported field error.
    pub fn unexported_field(
        object: impl Into<String>,
        field: impl Into<String>,
        position: Option<Position>,
    ) -> Self {
        Self::UnexportedField {
            object: object.into(),
            field: field.into(),
            position,
        }
    }

    /// Source position of the offending declaration, when known.
    pub fn position(&self) -> Option<&Position> {
        match self {
            Self::InvalidMethodSignature { position, .. }
            | Self::NestedStruct { position }
            | Self::UnexportedField { position, .. }
            | Self::InvalidTag { position, .. } => position.as_ref(),
        }
    }
}

impl NotFoundError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_method_signature_message_includes_position() {
        let err = BuildError::invalid_method_signature(
            "GreeterService",
            "Greet",
            Some(Position::new(PathBuf::from("greeter.rs"), 12, 5)),
        );
        assert_eq!(
            err.to_string(),
            "greeter.rs:12:5: GreeterService.Greet: invalid method signature: \
             expected Greet(GreetRequest) GreetResponse"
        );
    }

    #[test]
    fn test_nested_struct_message_without_position() {
        let err = BuildError::NestedStruct { position: None };
        assert_eq!(
            err.to_string(),
            "nested structs not supported (create another type instead)"
        );
    }

    #[test]
    fn test_invariant_errors_are_flagged() {
        let err: Error = InvariantError::UnknownCustomType {
            object: "Thing".into(),
            field: "Kind".into(),
            name: "types.Nope".into(),
        }
        .into();
        assert!(err.is_invariant_violation());

        let err: Error = NotFoundError::new("Thing").into();
        assert!(!err.is_invariant_violation());
        assert_eq!(err.to_string(), "object not found: Thing");
    }
}
