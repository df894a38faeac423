//! GraphQL documents sent to the todo service.
//!
//! The service dispatches on `operationName`; the documents select every
//! field the client decodes.

pub const LIST_TODOS: &str = "query ListTodos {
  listTodos {
    items { id name description }
  }
}";

pub const CREATE_TODO: &str = "mutation CreateTodo($input: CreateTodoInput!) {
  createTodo(input: $input) { id name description }
}";

pub const UPDATE_TODO: &str = "mutation UpdateTodo($input: UpdateTodoInput!) {
  updateTodo(input: $input) { id name description }
}";

pub const DELETE_TODO: &str = "mutation DeleteTodo($input: DeleteTodoInput!) {
  deleteTodo(input: $input) { id }
}";

/// An operation as it appears in the request's `operationName` and the
/// response's `data` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListTodos,
    CreateTodo,
    UpdateTodo,
    DeleteTodo,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::ListTodos => "ListTodos",
            Operation::CreateTodo => "CreateTodo",
            Operation::UpdateTodo => "UpdateTodo",
            Operation::DeleteTodo => "DeleteTodo",
        }
    }

    pub fn data_field(self) -> &'static str {
        match self {
            Operation::ListTodos => "listTodos",
            Operation::CreateTodo => "createTodo",
            Operation::UpdateTodo => "updateTodo",
            Operation::DeleteTodo => "deleteTodo",
        }
    }

    pub fn document(self) -> &'static str {
        match self {
            Operation::ListTodos => LIST_TODOS,
            Operation::CreateTodo => CREATE_TODO,
            Operation::UpdateTodo => UPDATE_TODO,
            Operation::DeleteTodo => DELETE_TODO,
        }
    }
}
