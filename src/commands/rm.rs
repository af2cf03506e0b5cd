use std::sync::Arc;

use super::edit::into_result;
use super::interactive::{confirm, is_stdin_tty};
use super::{connect, lookup_error, print_toasts};
use crate::actions::{RowActions, ToastTimings};
use crate::error::{DeskError, Result};
use crate::gateway::{Gateway, Resource};
use crate::list::PaginatedList;

/// Delete a record after confirmation
pub async fn cmd_rm(resource: Resource, id: &str, yes: bool) -> Result<()> {
    let (config, gateway) = connect()?;

    // Fetch first so the prompt can name the record
    let record = gateway
        .get(resource, id)
        .await
        .map_err(|e| lookup_error(e, id))?;

    let list = Arc::new(PaginatedList::new(gateway, resource, config.page_size));
    list.insert_front(record);
    let actions = RowActions::new(list, ToastTimings::from(&config.toasts));

    let dialog = actions
        .request_delete(id)
        .ok_or_else(|| DeskError::Other(format!("a change to '{id}' is already pending")))?;

    if !yes {
        if !is_stdin_tty() {
            return Err(DeskError::Validation(
                "deletion requires --yes in non-interactive contexts".to_string(),
            ));
        }
        if !confirm(&dialog.message)? {
            actions.cancel_delete(id);
            println!("Cancelled");
            return Ok(());
        }
    }

    into_result(actions.confirm_delete(id).await)?;
    print_toasts(&actions.take_toasts());
    Ok(())
}
