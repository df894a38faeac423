//! Client-side sync controller for a remote todo service.
//!
//! # Overview
//! Keeps a local view of a todo collection (the list, the create form, and
//! the current edit selection) consistent with a remote GraphQL-style
//! service. User commands go through `SyncController`, which validates,
//! calls the service through a `RemoteGateway`, and applies the result to
//! the `StateStore`.
//!
//! # Design
//! - Creates and updates are confirmed by reloading the whole list; deletes
//!   are applied to the cache immediately.
//! - `RemoteGateway` is injected. `HttpGateway` implements it on top of the
//!   stateless `TodoClient` (request building / response parsing, no I/O)
//!   and a `Transport` that does the HTTP round-trip.
//! - Every command returns `Result<_, SyncError>`; nothing panics and no
//!   failure discards unsaved input.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod mode;
pub mod queries;
pub mod store;
pub mod sync;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, SyncError, ValidationError};
pub use gateway::{HttpGateway, RemoteGateway};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mode::{EditTarget, FormBuffer, FormField, Mode, ModeController, ModeKind};
pub use store::{SharedStore, StateStore};
pub use sync::SyncController;
pub use transport::{ReqwestTransport, Transport};
pub use types::{CreateTodo, DeleteTodo, Todo, TodoConnection, TodoId, UpdateTodo};
