//! `create` and `update` go through the row action coordinator so the same
//! optimistic path serves the command line and interactive screens.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::{connect, print_json, print_record, print_toasts};
use crate::actions::{ActionOutcome, Rejection, RowActions, ToastTimings};
use crate::error::{DeskError, Result};
use crate::gateway::{HttpGateway, Record, Resource};
use crate::list::PaginatedList;

fn row_actions(resource: Resource) -> Result<RowActions<HttpGateway>> {
    let (config, gateway) = connect()?;
    let list = Arc::new(PaginatedList::new(gateway, resource, config.page_size));
    Ok(RowActions::new(list, ToastTimings::from(&config.toasts)))
}

/// Map an action outcome to the stored record or an error
pub(crate) fn into_result(outcome: ActionOutcome) -> Result<Option<Record>> {
    match outcome {
        ActionOutcome::Completed(record) => Ok(record),
        ActionOutcome::RolledBack(err) => Err(err.into()),
        ActionOutcome::Rejected(Rejection::Invalid(reason)) => Err(DeskError::Validation(reason)),
        ActionOutcome::Rejected(rejection) => {
            Err(DeskError::Other(format!("action refused: {rejection:?}")))
        }
    }
}

fn report(actions: &RowActions<HttpGateway>, record: Option<Record>, json: bool) -> Result<()> {
    let toasts = actions.take_toasts();
    match (record, json) {
        (Some(record), true) => print_json(&serde_json::to_value(&record)?),
        (Some(record), false) => {
            print_toasts(&toasts);
            print_record(&record);
            Ok(())
        }
        (None, _) => {
            print_toasts(&toasts);
            Ok(())
        }
    }
}

/// Create a record
pub async fn cmd_create(resource: Resource, fields: Map<String, Value>, json: bool) -> Result<()> {
    let actions = row_actions(resource)?;
    let record = into_result(actions.submit_create(fields).await)?;
    report(&actions, record, json)
}

/// Update fields of a record
pub async fn cmd_update(
    resource: Resource,
    id: &str,
    fields: Map<String, Value>,
    json: bool,
) -> Result<()> {
    let actions = row_actions(resource)?;
    let record = into_result(actions.submit_update(id, fields).await)?;
    report(&actions, record, json)
}
