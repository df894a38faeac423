//! The remote todo service as seen by the sync controller.
//!
//! # Design
//! `RemoteGateway` is injected into `SyncController` rather than reached
//! through a global client, so tests substitute an in-memory double.
//! `HttpGateway` is the production implementation: it pairs the stateless
//! `TodoClient` with a `Transport` and runs build, execute, parse for each
//! operation.

use async_trait::async_trait;

use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

/// The four operations of the todo service.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;

    async fn create(&self, input: CreateTodo) -> Result<Todo, ApiError>;

    async fn update(&self, input: UpdateTodo) -> Result<Todo, ApiError>;

    async fn delete(&self, id: TodoId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpGateway<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> HttpGateway<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    /// Returns `Ok` once the service answers its health probe.
    pub async fn health_check(&self) -> Result<(), ApiError> {
        let response = self
            .transport
            .execute(self.client.build_health_check())
            .await?;
        self.client.parse_health_check(response)
    }
}

impl HttpGateway<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            TodoClient::from_config(config),
            ReqwestTransport::new(config)?,
        ))
    }
}

#[async_trait]
impl<T: Transport> RemoteGateway for HttpGateway<T> {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let request = self.client.build_list_todos()?;
        let response = self.transport.execute(request).await?;
        self.client.parse_list_todos(response)
    }

    async fn create(&self, input: CreateTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_create_todo(&input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_todo(response)
    }

    async fn update(&self, input: UpdateTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_update_todo(&input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_update_todo(response)
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let request = self.client.build_delete_todo(&id)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_delete_todo(response)
    }
}
