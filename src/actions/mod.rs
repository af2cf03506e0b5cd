//! Row action coordinator.
//!
//! Delete, update, create and notify actions for the rows of one list.
//! Mutations are applied to the list optimistically and rolled back when the
//! backend refuses them. Each outcome raises a toast. A record can have only
//! one mutation pending at a time; actions on different records are
//! independent and may overlap.

mod confirm;
mod pending;
mod toast;

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::gateway::{Gateway, GatewayError, Notification, Recipient, Record};
use crate::list::PaginatedList;

pub use confirm::{ConfirmAction, ConfirmDialogState};
pub use pending::{MutationKind, MutationPhase, PendingMutation};
pub use toast::{Toast, ToastLevel, ToastTimings, Toasts};

use pending::PendingTable;

/// Why an action was refused without contacting the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Another mutation is pending for this record
    Busy,
    /// The action needs a confirmation step that has not happened
    NotConfirming,
    /// Client-side validation failed
    Invalid(String),
}

/// Result of a row action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The backend accepted the action; carries the stored record for creates and updates
    Completed(Option<Record>),
    /// The backend refused the action and local changes were reverted
    RolledBack(GatewayError),
    /// Nothing was sent
    Rejected(Rejection),
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed(_))
    }
}

/// Coordinates row actions against one list
pub struct RowActions<G: Gateway> {
    list: Arc<PaginatedList<G>>,
    pending: Mutex<PendingTable>,
    toasts: Mutex<Toasts>,
}

impl<G: Gateway> RowActions<G> {
    pub fn new(list: Arc<PaginatedList<G>>, timings: ToastTimings) -> Self {
        Self {
            list,
            pending: Mutex::new(PendingTable::default()),
            toasts: Mutex::new(Toasts::new(timings)),
        }
    }

    pub fn list(&self) -> &Arc<PaginatedList<G>> {
        &self.list
    }

    /// Start the delete flow for a record.
    ///
    /// Returns the confirmation prompt, or `None` if the record already has a
    /// pending mutation.
    pub fn request_delete(&self, id: &str) -> Option<ConfirmDialogState> {
        let begun = self
            .pending
            .lock()
            .begin(id, MutationKind::Delete, MutationPhase::Confirming);
        if !begun {
            debug!(id, "delete request ignored, record busy");
            return None;
        }
        let record = self.list.get(id);
        Some(ConfirmDialogState::for_delete(id, record.as_ref()))
    }

    /// Leave the confirmation step without doing anything
    pub fn cancel_delete(&self, id: &str) -> bool {
        self.pending.lock().cancel(id, MutationKind::Delete)
    }

    /// Delete a record whose deletion was requested and is awaiting confirmation
    pub async fn confirm_delete(&self, id: &str) -> ActionOutcome {
        if !self.pending.lock().advance(id, MutationKind::Delete) {
            return ActionOutcome::Rejected(Rejection::NotConfirming);
        }

        let removed = self.list.remove(id);
        let resource = self.list.resource();
        let result = self.list.gateway().delete(resource, id).await;
        self.pending.lock().finish(id);

        match result {
            Ok(()) => {
                debug!(%resource, id, "record deleted");
                self.toasts.lock().success(format!("Deleted {id}"));
                ActionOutcome::Completed(None)
            }
            Err(err) => {
                warn!(%resource, id, error = %err, "delete failed, restoring record");
                if let Some(entry) = removed
                    && !self.list.restore(entry)
                {
                    debug!(%resource, id, "list reloaded during delete, nothing to restore");
                }
                self.toasts
                    .lock()
                    .error(format!("Could not delete {id}: {}", err.user_message()));
                ActionOutcome::RolledBack(err)
            }
        }
    }

    /// Update a record, showing the new values before the backend confirms
    pub async fn submit_update(&self, id: &str, fields: Map<String, Value>) -> ActionOutcome {
        if fields.is_empty() {
            return ActionOutcome::Rejected(Rejection::Invalid("no fields to update".to_string()));
        }
        if !self
            .pending
            .lock()
            .begin(id, MutationKind::Update, MutationPhase::Inflight)
        {
            return ActionOutcome::Rejected(Rejection::Busy);
        }

        let previous = self.list.entry(id);
        if let Some(previous) = &previous {
            let merged = previous.record.merged(&fields);
            self.list.replace_in(previous.generation, id, merged);
        }

        let resource = self.list.resource();
        let result = self.list.gateway().update(resource, id, &fields).await;
        self.pending.lock().finish(id);

        match result {
            Ok(stored) => {
                if previous.is_some() {
                    self.list.replace(id, stored.clone());
                }
                self.toasts.lock().success(format!("Updated {id}"));
                ActionOutcome::Completed(Some(stored))
            }
            Err(err) => {
                warn!(%resource, id, error = %err, "update failed, restoring record");
                if let Some(prev) = previous {
                    self.list.replace_in(prev.generation, id, prev.record);
                }
                self.toasts
                    .lock()
                    .error(format!("Could not update {id}: {}", err.user_message()));
                ActionOutcome::RolledBack(err)
            }
        }
    }

    /// Create a record, showing a placeholder at the top of the list until the
    /// backend answers
    pub async fn submit_create(&self, fields: Map<String, Value>) -> ActionOutcome {
        if fields.is_empty() {
            return ActionOutcome::Rejected(Rejection::Invalid("no fields given".to_string()));
        }

        let placeholder = Record::placeholder(fields.clone());
        let placeholder_id = placeholder.id().to_string();
        self.pending.lock().begin(
            &placeholder_id,
            MutationKind::Create,
            MutationPhase::Inflight,
        );
        self.list.insert_front(placeholder);

        let resource = self.list.resource();
        let result = self.list.gateway().create(resource, &fields).await;
        self.pending.lock().finish(&placeholder_id);

        match result {
            Ok(stored) => {
                self.list.replace(&placeholder_id, stored.clone());
                self.toasts
                    .lock()
                    .success(format!("Created {}", stored.id()));
                ActionOutcome::Completed(Some(stored))
            }
            Err(err) => {
                warn!(%resource, error = %err, "create failed, discarding placeholder");
                self.list.remove(&placeholder_id);
                self.toasts
                    .lock()
                    .error(format!("Could not create record: {}", err.user_message()));
                ActionOutcome::RolledBack(err)
            }
        }
    }

    /// Send a notification; the list is not touched
    pub async fn notify(&self, recipient: Recipient, notification: Notification) -> ActionOutcome {
        if let Err(reason) = notification.validate() {
            self.toasts.lock().warning(reason.clone());
            return ActionOutcome::Rejected(Rejection::Invalid(reason));
        }

        let result = self.list.gateway().notify(&recipient, &notification).await;

        match result {
            Ok(()) => {
                self.toasts
                    .lock()
                    .success(format!("Notification sent to {recipient}"));
                ActionOutcome::Completed(None)
            }
            Err(err) => {
                warn!(%recipient, error = %err, "notification failed");
                self.toasts
                    .lock()
                    .error(format!("Could not notify {recipient}: {}", err.user_message()));
                ActionOutcome::RolledBack(err)
            }
        }
    }

    pub fn pending(&self, id: &str) -> Option<PendingMutation> {
        self.pending.lock().get(id).cloned()
    }

    /// Number of records with a mutation awaiting confirmation or a response
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Toasts still visible, dropping expired ones
    pub fn toasts(&self) -> Vec<Toast> {
        let now = Instant::now();
        let mut toasts = self.toasts.lock();
        toasts.prune(now);
        toasts.active(now)
    }

    /// Take every queued toast, for one-shot presentation
    pub fn take_toasts(&self) -> Vec<Toast> {
        self.toasts.lock().drain()
    }
}
