//! In-memory stand-in for the todo GraphQL service.
//!
//! Serves `POST /graphql` and dispatches on `operationName`; the query
//! document itself is not interpreted. Failures are reported the way the
//! real service does: HTTP 200 with an `errors` array.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTodoInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTodoInput {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteTodoInput {
    pub id: String,
}

#[derive(Deserialize)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub variables: Value,
}

#[derive(Deserialize)]
struct InputVariables<T> {
    input: T,
}

/// Todos in insertion order.
pub type Db = Arc<RwLock<Vec<Todo>>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    api_key: Option<Arc<str>>,
}

/// Service error carried in the `errors` array.
#[derive(Debug)]
struct GraphQlError {
    error_type: &'static str,
    message: String,
}

impl GraphQlError {
    fn not_found(id: &str) -> Self {
        Self {
            error_type: "NotFound",
            message: format!("todo {id} not found"),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error_type: "BadRequest",
            message: message.into(),
        }
    }
}

pub fn app() -> Router {
    build(None)
}

/// Like `app`, but every GraphQL call must carry `x-api-key: <key>`.
pub fn app_with_api_key(key: &str) -> Router {
    build(Some(Arc::from(key)))
}

fn build(api_key: Option<Arc<str>>) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Vec::new())),
        api_key,
    };
    Router::new()
        .route("/health", get(health))
        .route("/graphql", post(graphql))
        .with_state(state)
}

pub async fn run(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn health() -> &'static str {
    "ok"
}

async fn graphql(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GraphQlRequest>,
) -> Response {
    if let Some(expected) = &state.api_key {
        let provided = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
        if provided != Some(&**expected) {
            warn!("rejected request with missing or wrong api key");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"errors": [{"errorType": "UnauthorizedException", "message": "You are not authorized to make this call."}]})),
            )
                .into_response();
        }
    }

    let operation = request.operation_name.unwrap_or_default();
    debug!(%operation, "graphql request");

    let (field, result) = match operation.as_str() {
        "ListTodos" => ("listTodos", list_todos(&state.db).await),
        "CreateTodo" => ("createTodo", create_todo(&state.db, request.variables).await),
        "UpdateTodo" => ("updateTodo", update_todo(&state.db, request.variables).await),
        "DeleteTodo" => ("deleteTodo", delete_todo(&state.db, request.variables).await),
        other => {
            let err = GraphQlError::bad_request(format!("unknown operation {other:?}"));
            return Json(error_body(Value::Null, err)).into_response();
        }
    };

    let body = match result {
        Ok(value) => json!({ "data": single(field, value) }),
        Err(err) => error_body(single(field, Value::Null), err),
    };
    Json(body).into_response()
}

fn single(key: &str, value: Value) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn error_body(data: Value, err: GraphQlError) -> Value {
    json!({
        "data": data,
        "errors": [{ "errorType": err.error_type, "message": err.message }],
    })
}

fn input<T: DeserializeOwned>(variables: Value) -> Result<T, GraphQlError> {
    serde_json::from_value::<InputVariables<T>>(variables)
        .map(|v| v.input)
        .map_err(|e| GraphQlError::bad_request(e.to_string()))
}

fn to_value(todo: &Todo) -> Result<Value, GraphQlError> {
    serde_json::to_value(todo).map_err(|e| GraphQlError::bad_request(e.to_string()))
}

async fn list_todos(db: &Db) -> Result<Value, GraphQlError> {
    let todos = db.read().await;
    Ok(json!({ "items": todos.as_slice() }))
}

async fn create_todo(db: &Db, variables: Value) -> Result<Value, GraphQlError> {
    let input: CreateTodoInput = input(variables)?;
    if input.name.trim().is_empty() {
        return Err(GraphQlError::bad_request("name must not be empty"));
    }
    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        description: input.description,
    };
    db.write().await.push(todo.clone());
    info!(id = %todo.id, "created todo");
    to_value(&todo)
}

async fn update_todo(db: &Db, variables: Value) -> Result<Value, GraphQlError> {
    let input: UpdateTodoInput = input(variables)?;
    if input.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(GraphQlError::bad_request("name must not be empty"));
    }
    let mut todos = db.write().await;
    let todo = todos
        .iter_mut()
        .find(|t| t.id == input.id)
        .ok_or_else(|| GraphQlError::not_found(&input.id))?;
    if let Some(name) = input.name {
        todo.name = name;
    }
    if let Some(description) = input.description {
        todo.description = Some(description);
    }
    info!(id = %todo.id, "updated todo");
    to_value(todo)
}

async fn delete_todo(db: &Db, variables: Value) -> Result<Value, GraphQlError> {
    let input: DeleteTodoInput = input(variables)?;
    let mut todos = db.write().await;
    let index = todos
        .iter()
        .position(|t| t.id == input.id)
        .ok_or_else(|| GraphQlError::not_found(&input.id))?;
    let removed = todos.remove(index);
    info!(id = %removed.id, "deleted todo");
    to_value(&removed)
}
