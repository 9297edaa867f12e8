//! Services exposed by the greeter package.

use crate::objects::{GreetRequest, GreetResponse, IgnoreRequest, IgnoreResponse};

/// GreeterService is a polite API.
/// featured: true
pub trait GreeterService {
    /// Greet prepares a lovely greeting.
    fn greet(&self, request: GreetRequest) -> Result<GreetResponse, Error>;
}

/// Ignorer is only used internally.
pub trait Ignorer {
    fn ignore(&self, request: IgnoreRequest) -> IgnoreResponse;
}
