//! Stateless request builder and response parser for the todo GraphQL API.
//!
//! # Design
//! `TodoClient` holds only an endpoint and an optional API key and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. A `Transport` executes the round-trip in between.
//!
//! Every operation is a `POST {endpoint}/graphql` with a
//! `{query, operationName, variables}` body. The service reports failures
//! in-band as an `errors` array on a 200 response.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::queries::Operation;
use crate::types::{CreateTodo, DeleteTodo, Todo, TodoConnection, TodoId, UpdateTodo};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    #[serde(rename = "operationName")]
    operation_name: &'a str,
    variables: V,
}

#[derive(Serialize)]
struct InputVariables<'a, T> {
    input: &'a T,
}

#[derive(Serialize)]
struct NoVariables {}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    errors: Vec<GraphQlErrorBody>,
}

#[derive(Deserialize)]
struct GraphQlErrorBody {
    message: String,
    #[serde(rename = "errorType", default)]
    error_type: Option<String>,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let client = Self::new(&config.endpoint);
        match &config.api_key {
            Some(key) => client.with_api_key(key),
            None => client,
        }
    }

    /// Attach `key` as the `x-api-key` header on every request.
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn build_health_check(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/health", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_list_todos(&self) -> Result<HttpRequest, ApiError> {
        self.build_operation(Operation::ListTodos, NoVariables {})
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.build_operation(Operation::CreateTodo, InputVariables { input })
    }

    pub fn build_update_todo(&self, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        self.build_operation(Operation::UpdateTodo, InputVariables { input })
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> Result<HttpRequest, ApiError> {
        let input = DeleteTodo { id: id.clone() };
        self.build_operation(Operation::DeleteTodo, InputVariables { input: &input })
    }

    pub fn parse_health_check(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        let page: TodoConnection = parse_operation(Operation::ListTodos, response)?;
        Ok(page.items)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_operation(Operation::CreateTodo, response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_operation(Operation::UpdateTodo, response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        let _: IgnoredAny = parse_operation(Operation::DeleteTodo, response)?;
        Ok(())
    }

    fn build_operation<V: Serialize>(
        &self,
        op: Operation,
        variables: V,
    ) -> Result<HttpRequest, ApiError> {
        let payload = GraphQlRequest {
            query: op.document(),
            operation_name: op.name(),
            variables,
        };
        let body =
            serde_json::to_string(&payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;

        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        if let Some(key) = &self.api_key {
            headers.push((API_KEY_HEADER.to_string(), key.clone()));
        }

        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/graphql", self.base_url),
            headers,
            body: Some(body),
        })
    }
}

/// Decode the `data.<field>` payload for `op`, surfacing in-band errors.
fn parse_operation<T: DeserializeOwned>(op: Operation, response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response, 200)?;
    let envelope: GraphQlResponse = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;

    if !envelope.errors.is_empty() {
        if envelope
            .errors
            .iter()
            .any(|e| e.error_type.as_deref() == Some("NotFound"))
        {
            return Err(ApiError::NotFound);
        }
        return Err(ApiError::GraphQlError {
            messages: envelope.errors.into_iter().map(|e| e.message).collect(),
        });
    }

    let payload = envelope
        .data
        .and_then(|mut data| data.remove(op.data_field()))
        .filter(|value| !value.is_null())
        .ok_or_else(|| ApiError::DeserializationError(format!("missing data.{}", op.data_field())))?;

    serde_json::from_value(payload).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
