//! Data transfer objects for HTTP message serialization.

use serde::{Deserialize, Serialize};

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub input: String,
}

/// Response body for the chat endpoint, success or failure.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub output: String,
}

impl ChatReply {
    pub fn new(output: impl Into<String>) -> Self {
        Self { output: output.into() }
    }
}
