//! Request and response objects of the greeter package.

/// GreetRequest is the request object for GreeterService.greet.
pub struct GreetRequest {
    /// Name of the person to greet.
    /// example: "Mat"
    pub name: String,

    pub page: shared::Page,

    /// Where the previous call stopped, if anywhere.
    pub cursor: Option<shared::Cursor>,
}

/// GreetResponse is the response object for GreeterService.greet.
pub struct GreetResponse {
    /// Greeting is the personalized greeting.
    /// example: "Hello there"
    pub greeting: Vec<String>,
}

pub struct IgnoreRequest;

pub struct IgnoreResponse;

pub mod shared {
    /// Page selects a window of results.
    pub struct Page {
        pub cursor: String,
        /// example: 25
        pub size: u32,
    }

    pub struct Cursor {
        pub token: String,
    }
}
