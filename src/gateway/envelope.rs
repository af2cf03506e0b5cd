//! Response envelope parsing.
//!
//! Backend endpoints are not uniform: list endpoints return either a bare
//! array or an object wrapping the array (`items`, `data` or `results`),
//! optionally with a `total`. Error bodies carry a `detail` field that is
//! either a plain string or a list of validation entries with `msg`.

use serde_json::Value;

use super::error::{GatewayError, GatewayResult};
use super::{Page, Record};

const LIST_KEYS: [&str; 3] = ["items", "data", "results"];
const TOTAL_KEYS: [&str; 2] = ["total", "count"];
const RECORD_KEYS: [&str; 2] = ["data", "item"];

/// Extract the human-readable message from an error body
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail")?;

    match detail {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(entries) => {
            let messages: Vec<String> = entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s.clone()),
                    other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Null => None,
        Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

/// Parse a list response into a page
pub fn parse_page(body: &str) -> GatewayResult<Page> {
    let value: Value = serde_json::from_str(body)?;

    match value {
        Value::Array(items) => Ok(Page {
            items: records_from(items)?,
            total: None,
        }),
        Value::Object(ref map) => {
            let items = LIST_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
                .ok_or_else(|| GatewayError::transport("list response has no items array"))?;
            let total = TOTAL_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_u64));
            Ok(Page {
                items: records_from(items.clone())?,
                total,
            })
        }
        _ => Err(GatewayError::transport("unexpected list response")),
    }
}

/// Parse a search response; same shapes as a list response without a total
pub fn parse_records(body: &str) -> GatewayResult<Vec<Record>> {
    parse_page(body).map(|page| page.items)
}

/// Parse a single-record response, bare or wrapped in `data`/`item`
pub fn parse_record(body: &str) -> GatewayResult<Record> {
    let value: Value = serde_json::from_str(body)?;

    let inner = RECORD_KEYS
        .iter()
        .find_map(|key| value.get(*key).filter(|v| v.is_object()))
        .cloned();

    let candidate = match inner {
        Some(wrapped) if value.get("id").is_none() && value.get("_id").is_none() => wrapped,
        _ => value,
    };

    Record::try_from(candidate)
        .map_err(|e| GatewayError::transport(format!("malformed record: {e}")))
}

fn records_from(items: Vec<Value>) -> GatewayResult<Vec<Record>> {
    items
        .into_iter()
        .map(|item| {
            Record::try_from(item)
                .map_err(|e| GatewayError::transport(format!("malformed record: {e}")))
        })
        .collect()
}
