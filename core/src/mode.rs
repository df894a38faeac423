//! Which input form is active: creating a new todo or editing an existing one.
//!
//! # Design
//! The edit target lives inside `Mode::Editing`, so "a target exists" and
//! "edit mode is active" cannot disagree. The target is a value copy of the
//! selected todo; staged edits never touch the cached list.

use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

/// Scratch state behind a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBuffer {
    pub name: String,
    pub description: String,
}

impl FormBuffer {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Description => self.description = value,
        }
    }

    /// True when the trimmed name is non-empty.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn to_create(&self) -> CreateTodo {
        CreateTodo {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
}

/// A todo staged for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    id: TodoId,
    pub form: FormBuffer,
}

impl EditTarget {
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            id: todo.id.clone(),
            form: FormBuffer::new(&todo.name, &todo.description),
        }
    }

    pub fn id(&self) -> &TodoId {
        &self.id
    }

    pub fn to_update(&self) -> UpdateTodo {
        UpdateTodo {
            id: self.id.clone(),
            name: self.form.name.clone(),
            description: self.form.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Create,
    Edit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    /// Create form visible, nothing selected.
    #[default]
    Idle,
    Editing(EditTarget),
}

/// State machine over `Mode`. Starts `Idle` and has no terminal state.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn kind(&self) -> ModeKind {
        match self.mode {
            Mode::Idle => ModeKind::Create,
            Mode::Editing(_) => ModeKind::Edit,
        }
    }

    pub fn edit_target(&self) -> Option<&EditTarget> {
        match &self.mode {
            Mode::Idle => None,
            Mode::Editing(target) => Some(target),
        }
    }

    pub fn edit_target_mut(&mut self) -> Option<&mut EditTarget> {
        match &mut self.mode {
            Mode::Idle => None,
            Mode::Editing(target) => Some(target),
        }
    }

    /// Enter (or switch) edit mode on a copy of `todo`.
    pub fn select_for_edit(&mut self, todo: &Todo) {
        self.mode = Mode::Editing(EditTarget::from_todo(todo));
    }

    /// Drop the staged edit and return to the create form. No-op when idle.
    pub fn cancel(&mut self) {
        self.mode = Mode::Idle;
    }

    /// Leave edit mode after `id` was saved. Returns false, leaving the mode
    /// untouched, when the user has since moved on to a different target.
    pub fn finish_edit(&mut self, id: &TodoId) -> bool {
        let saved = matches!(&self.mode, Mode::Editing(target) if target.id() == id);
        if saved {
            self.mode = Mode::Idle;
        }
        saved
    }
}
