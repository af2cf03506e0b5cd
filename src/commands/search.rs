//! One-shot server search.
//!
//! The command line has no keystrokes to debounce, so the orchestrator runs
//! with a zero quiet period; the minimum query length still applies.

use std::time::Duration;

use serde_json::json;

use super::{connect, print_json, render_table};
use crate::error::{DeskError, Result};
use crate::gateway::{Record, Resource};
use crate::search::{SearchOrchestrator, SearchOutcome, SearchSettings};

/// Execute the search command
pub async fn cmd_search(
    resource: Resource,
    query: &str,
    limit: Option<u32>,
    json: bool,
) -> Result<()> {
    let (config, gateway) = connect()?;
    let mut settings = SearchSettings::from(&config.search);
    settings.debounce = Duration::ZERO;
    if let Some(limit) = limit {
        settings.limit = limit;
    }

    let search = SearchOrchestrator::new(gateway, resource, settings);
    let results: Vec<Record> = match search.input(query).await {
        SearchOutcome::Applied(_) => search.state().results,
        SearchOutcome::Cleared => {
            return Err(DeskError::Validation(format!(
                "search query must be at least {} characters",
                settings.min_query_len
            )));
        }
        SearchOutcome::Failed(err) => return Err(err.into()),
        SearchOutcome::Superseded | SearchOutcome::Stale => Vec::new(),
    };

    if json {
        return print_json(&json!({
            "resource": resource,
            "query": query.trim(),
            "results": results,
        }));
    }

    println!("Search results for: \"{}\"\n", query.trim());
    if results.is_empty() {
        println!("No matching {resource} found.");
    } else {
        println!("{}", render_table(resource, &results));
    }
    println!("\n{} result(s)", results.len());
    Ok(())
}
