//! Confirmation prompt shown before a destructive row action

use crate::gateway::Record;

/// The action to perform when confirmation is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Delete the record with this id
    Delete(String),
}

/// State for the confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialogState {
    /// Message to display to the user
    pub message: String,
    /// The action to perform if confirmed
    pub action: ConfirmAction,
}

impl ConfirmDialogState {
    /// Create a confirmation for deleting a record.
    ///
    /// Uses the record's `name` or `title` field when it is known.
    pub fn for_delete(id: &str, record: Option<&Record>) -> Self {
        let label = record
            .and_then(|r| r.display_field("name").or_else(|| r.display_field("title")))
            .filter(|label| !label.is_empty());

        let message = match label {
            Some(label) => format!("Delete '{label}' ({id})? This cannot be undone."),
            None => format!("Delete record '{id}'? This cannot be undone."),
        };
        Self {
            message,
            action: ConfirmAction::Delete(id.to_string()),
        }
    }
}
