//! In-memory snapshot of the todo list and the active form.
//!
//! No I/O happens here. `SyncController` is the only writer that talks to
//! the service; everything in this module is a plain field update.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::mode::{EditTarget, FormBuffer, FormField, Mode, ModeController, ModeKind};
use crate::types::{Todo, TodoId};

/// Store handle shared between the controller and its readers.
pub type SharedStore = Arc<RwLock<StateStore>>;

#[derive(Debug, Clone, Default)]
pub struct StateStore {
    todos: Vec<Todo>,
    form: FormBuffer,
    modes: ModeController,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Cached list, in the order of the last successful `list`.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// The create-form buffer.
    pub fn form(&self) -> &FormBuffer {
        &self.form
    }

    pub fn mode(&self) -> &Mode {
        self.modes.mode()
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.modes.kind()
    }

    pub fn edit_target(&self) -> Option<&EditTarget> {
        self.modes.edit_target()
    }

    pub fn replace_todos(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
    }

    /// Drop the cached entry for `id`. Returns whether anything was removed.
    pub fn remove_todo_by_id(&mut self, id: &TodoId) -> bool {
        let before = self.todos.len();
        self.todos.retain(|todo| &todo.id != id);
        self.todos.len() != before
    }

    /// Write `value` into whichever form is active and report which one.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> ModeKind {
        let value = value.into();
        match self.modes.edit_target_mut() {
            Some(target) => {
                target.form.set(field, value);
                ModeKind::Edit
            }
            None => {
                self.form.set(field, value);
                ModeKind::Create
            }
        }
    }

    pub fn begin_edit(&mut self, todo: &Todo) {
        self.modes.select_for_edit(todo);
    }

    pub fn end_edit(&mut self) {
        self.modes.cancel();
    }

    /// Leave edit mode if `id` is still the target. See
    /// [`ModeController::finish_edit`].
    pub fn finish_edit(&mut self, id: &TodoId) -> bool {
        self.modes.finish_edit(id)
    }

    pub fn reset_form(&mut self) {
        self.form = FormBuffer::default();
    }
}
