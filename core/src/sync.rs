//! Runs user commands against the remote service and applies the results to
//! the local store.
//!
//! # Design
//! - Writes are confirmed by a full reload: a successful create or update is
//!   followed by exactly one `list`, whose result replaces the cached list.
//!   The client never inserts a todo locally, so server-assigned ids are
//!   always what the list shows.
//! - Delete is the exception. The entry is removed from the cache before the
//!   remote call and stays removed whatever the outcome. A failure is logged
//!   and returned; reconciling (usually via `load_all`) is up to the caller.
//! - Blank names are rejected before any I/O and without logging.
//! - The store lock is never held across a gateway call. Results that arrive
//!   after `unmount` are dropped.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::error::{SyncError, ValidationError};
use crate::gateway::RemoteGateway;
use crate::mode::{EditTarget, FormBuffer, FormField, ModeKind};
use crate::store::{SharedStore, StateStore};
use crate::types::{Todo, TodoId};

pub struct SyncController<G> {
    gateway: G,
    store: SharedStore,
    active: AtomicBool,
}

impl<G: RemoteGateway> SyncController<G> {
    /// A controller over an empty store. Performs no I/O.
    pub fn new(gateway: G) -> Self {
        Self::with_store(gateway, StateStore::new().shared())
    }

    pub fn with_store(gateway: G, store: SharedStore) -> Self {
        Self {
            gateway,
            store,
            active: AtomicBool::new(true),
        }
    }

    /// Create a controller and run the initial `load_all`.
    pub async fn mount(gateway: G) -> Self {
        let controller = Self::new(gateway);
        if let Err(e) = controller.load_all().await {
            debug!(error = %e, "initial load failed; starting with an empty list");
        }
        controller
    }

    /// Stop applying results. Calls already in flight still complete but
    /// leave the store alone.
    pub fn unmount(&self) {
        debug!("sync controller unmounted");
        self.active.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Clone of the current store contents.
    pub async fn snapshot(&self) -> StateStore {
        self.store.read().await.clone()
    }

    /// Replace the cached list with the service's current list.
    pub async fn load_all(&self) -> Result<(), SyncError> {
        self.ensure_active()?;
        debug!("loading todos");
        let result = self.gateway.list().await;
        self.ensure_active()?;

        match result {
            Ok(todos) => {
                debug!(count = todos.len(), "replacing cached todos");
                self.store.write().await.replace_todos(todos);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load todos");
                Err(e.into())
            }
        }
    }

    /// Submit `form` as a new todo, then reload.
    ///
    /// On failure the create buffer is left as it was so the user can retry.
    pub async fn create(&self, form: FormBuffer) -> Result<Todo, SyncError> {
        self.ensure_active()?;
        if !form.has_name() {
            return Err(ValidationError::EmptyName.into());
        }

        let created = match self.gateway.create(form.to_create()).await {
            Ok(todo) => todo,
            Err(e) => {
                warn!(error = %e, "failed to create todo");
                return Err(e.into());
            }
        };
        self.ensure_active()?;
        debug!(id = %created.id, "created todo");

        {
            let mut store = self.store.write().await;
            // Input typed while the call was in flight is kept.
            if store.form() == &form {
                store.reset_form();
            }
        }
        self.refresh().await?;
        Ok(created)
    }

    /// Submit the staged edit, leave edit mode, then reload.
    ///
    /// On failure edit mode and the staged buffer are left as they were.
    pub async fn update(&self, target: EditTarget) -> Result<Todo, SyncError> {
        self.ensure_active()?;
        if !target.form.has_name() {
            return Err(ValidationError::EmptyName.into());
        }

        let updated = match self.gateway.update(target.to_update()).await {
            Ok(todo) => todo,
            Err(e) => {
                warn!(id = %target.id(), error = %e, "failed to update todo");
                return Err(e.into());
            }
        };
        self.ensure_active()?;
        debug!(id = %updated.id, "updated todo");

        self.store.write().await.finish_edit(target.id());
        self.refresh().await?;
        Ok(updated)
    }

    /// Remove `id` from the cache immediately, then delete it remotely.
    pub async fn delete(&self, id: &TodoId) -> Result<(), SyncError> {
        self.ensure_active()?;
        let removed = self.store.write().await.remove_todo_by_id(id);
        debug!(%id, removed, "removed todo from cache");

        if let Err(e) = self.gateway.delete(id.clone()).await {
            warn!(%id, error = %e, "failed to delete todo; cached list may be stale");
            return Err(e.into());
        }
        Ok(())
    }

    /// `create` with the store's current create buffer. Rejected while the
    /// edit form is active.
    pub async fn submit_create(&self) -> Result<Todo, SyncError> {
        let form = {
            let store = self.store.read().await;
            if store.mode_kind() == ModeKind::Edit {
                return Err(SyncError::Editing);
            }
            store.form().clone()
        };
        self.create(form).await
    }

    /// `update` with the store's current edit target.
    pub async fn submit_update(&self) -> Result<Todo, SyncError> {
        let target = self
            .store
            .read()
            .await
            .edit_target()
            .cloned()
            .ok_or(SyncError::NotEditing)?;
        self.update(target).await
    }

    pub async fn select_for_edit(&self, todo: &Todo) {
        self.store.write().await.begin_edit(todo);
    }

    pub async fn cancel(&self) {
        self.store.write().await.end_edit();
    }

    pub async fn set_field(&self, field: FormField, value: impl Into<String>) -> ModeKind {
        self.store.write().await.set_field(field, value)
    }

    /// Reload after a confirmed write. A failed reload is logged by
    /// `load_all` and does not fail the write.
    async fn refresh(&self) -> Result<(), SyncError> {
        match self.load_all().await {
            Err(SyncError::Inactive) => Err(SyncError::Inactive),
            _ => Ok(()),
        }
    }

    fn ensure_active(&self) -> Result<(), SyncError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(SyncError::Inactive)
        }
    }
}
