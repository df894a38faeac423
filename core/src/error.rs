//! Error types for the todo client and sync controller.
//!
//! # Design
//! `ApiError` is everything that can go wrong talking to the service.
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the service rejected the call."
//! `SyncError` is what controller commands return: either the command was
//! rejected locally before any I/O, or the remote call failed.

use thiserror::Error;

/// Errors produced while building requests, executing them, or parsing
/// responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service reported that the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-200 status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response carried a GraphQL `errors` array.
    #[error("service returned errors: {}", messages.join("; "))]
    GraphQlError { messages: Vec<String> },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (connect, timeout, ...).
    #[error("transport failed: {0}")]
    TransportError(String),
}

/// Local input rejected before reaching the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
}

/// Outcome of a failed controller command.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("remote call failed: {0}")]
    Remote(#[from] ApiError),

    /// An update was requested while no todo is selected for editing.
    #[error("no todo is being edited")]
    NotEditing,

    /// A create was requested while the edit form is active.
    #[error("a todo is being edited")]
    Editing,

    /// The controller was unmounted before the remote call settled; the
    /// result was dropped.
    #[error("controller is no longer active")]
    Inactive,
}

/// Invalid or missing client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("endpoint must not be empty")]
    EmptyEndpoint,

    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}
