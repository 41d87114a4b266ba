//! HTTP route handlers for the menu server.

pub mod chat;
pub mod index;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
