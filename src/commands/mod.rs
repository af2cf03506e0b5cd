mod config;
mod edit;
pub mod interactive;
mod ls;
mod notify;
mod rm;
mod search;
mod session;
mod show;

pub use config::{cmd_config_set, cmd_config_show};
pub use edit::{cmd_create, cmd_update};
pub use ls::{LsOptions, cmd_ls};
pub use notify::cmd_notify;
pub use rm::cmd_rm;
pub use search::cmd_search;
pub use session::{cmd_login, cmd_logout};
pub use show::cmd_show;

use std::collections::BTreeSet;
use std::sync::Arc;

use owo_colors::OwoColorize;
use reqwest::StatusCode;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::actions::{Toast, ToastLevel};
use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::gateway::record::ID_FIELDS;
use crate::gateway::{GatewayError, HttpGateway, Record, Resource};

/// Maximum number of columns shown in a table
const MAX_COLUMNS: usize = 6;

/// Longest cell rendered before truncation
const MAX_CELL_WIDTH: usize = 40;

/// Print a JSON value to stdout with pretty formatting
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Load configuration and build the HTTP gateway from it
pub(crate) fn connect() -> Result<(Config, Arc<HttpGateway>)> {
    let config = Config::load()?;
    let gateway = HttpGateway::from_config(&config)?;
    Ok((config, Arc::new(gateway)))
}

/// Turn a 404 for `id` into `NotFound`, keep every other failure as is
pub(crate) fn lookup_error(err: GatewayError, id: &str) -> DeskError {
    if err.status() == Some(StatusCode::NOT_FOUND) {
        DeskError::NotFound(id.to_string())
    } else {
        DeskError::Gateway(err)
    }
}

/// Print transient messages raised by row actions
pub(crate) fn print_toasts(toasts: &[Toast]) {
    for toast in toasts {
        match toast.level {
            ToastLevel::Error | ToastLevel::Warning => eprintln!("{}", toast.render()),
            ToastLevel::Info | ToastLevel::Success => println!("{}", toast.render()),
        }
    }
}

/// Columns to show for `records`: the id, the resource's preferred columns
/// that occur in the data, then other fields in name order
fn table_columns(resource: Resource, records: &[Record]) -> Vec<String> {
    let present: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.fields().keys().map(String::as_str))
        .collect();

    let mut columns = vec!["id".to_string()];
    columns.extend(
        resource
            .preferred_columns()
            .iter()
            .filter(|c| **c != "id" && present.contains(*c))
            .map(|c| c.to_string()),
    );

    for key in present {
        if columns.len() >= MAX_COLUMNS {
            break;
        }
        let is_id = ID_FIELDS.contains(&key);
        if !is_id && !columns.iter().any(|c| c == key) {
            columns.push(key.to_string());
        }
    }
    columns.truncate(MAX_COLUMNS);
    columns
}

fn truncate_cell(value: String) -> String {
    if value.chars().count() <= MAX_CELL_WIDTH {
        return value;
    }
    let mut cut: String = value.chars().take(MAX_CELL_WIDTH - 3).collect();
    cut.push_str("...");
    cut
}

/// Render records as a rounded table
pub(crate) fn render_table(resource: Resource, records: &[Record]) -> String {
    let columns = table_columns(resource, records);

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.to_uppercase()));
    for record in records {
        builder.push_record(columns.iter().map(|column| {
            let value = if column == "id" {
                Some(record.id().to_string())
            } else {
                record.display_field(column)
            };
            truncate_cell(value.unwrap_or_default())
        }));
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Print one record as aligned `key: value` lines
pub(crate) fn print_record(record: &Record) {
    let width = record.fields().keys().map(|k| k.len()).max().unwrap_or(0);
    for (key, value) in record.fields() {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        println!("{}  {}", format!("{key:width$}").cyan(), text);
    }
}
