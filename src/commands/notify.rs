use std::sync::Arc;

use super::edit::into_result;
use super::{connect, print_toasts};
use crate::actions::{RowActions, ToastTimings};
use crate::error::Result;
use crate::gateway::{Notification, Recipient, Resource};
use crate::list::PaginatedList;

/// Send a notification to one recipient or to everyone
pub async fn cmd_notify(recipient: Recipient, title: &str, message: &str) -> Result<()> {
    let (config, gateway) = connect()?;
    let list = Arc::new(PaginatedList::new(
        gateway,
        Resource::Notifications,
        config.page_size,
    ));
    let actions = RowActions::new(list, ToastTimings::from(&config.toasts));

    into_result(
        actions
            .notify(recipient, Notification::new(title, message))
            .await,
    )?;
    print_toasts(&actions.take_toasts());
    Ok(())
}
