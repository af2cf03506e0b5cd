use owo_colors::OwoColorize;
use serde_json::json;

use super::{connect, print_json, render_table};
use crate::error::Result;
use crate::gateway::{Record, Resource};
use crate::list::{LoadOutcome, PaginatedList};

/// Options for `ls`
pub struct LsOptions {
    pub resource: Resource,
    pub offset: u64,
    /// Page size; falls back to `page_size` from config
    pub limit: Option<u32>,
    /// Pages to fetch, or `None` to fetch until exhausted
    pub pages: Option<usize>,
    pub filters: Vec<(String, String)>,
    pub json: bool,
}

/// List records of a resource through the paginated list controller
pub async fn cmd_ls(options: LsOptions) -> Result<()> {
    let (config, gateway) = connect()?;
    let page_size = options.limit.unwrap_or(config.page_size);
    let list = PaginatedList::new(gateway, options.resource, page_size)
        .with_start_offset(options.offset);

    if let LoadOutcome::Failed(err) = list.initialize(options.filters).await {
        return Err(err.into());
    }
    let more_pages = options.pages.map(|pages| pages.saturating_sub(1));
    list.load_all(more_pages).await?;

    let window = list.snapshot();
    let has_more = list.has_more();

    if options.json {
        let items: Vec<&Record> = window.items.iter().collect();
        return print_json(&json!({
            "resource": options.resource,
            "items": items,
            "count": window.items.len(),
            "next_offset": window.offset,
            "total": window.total,
            "has_more": has_more,
        }));
    }

    if window.items.is_empty() {
        println!("No {} found.", options.resource);
        return Ok(());
    }

    println!("{}", render_table(options.resource, &window.items));

    let mut footer = format!("{} record(s)", window.items.len());
    if let Some(total) = window.total {
        footer.push_str(&format!(" of {total}"));
    }
    if has_more {
        footer.push_str(&format!(", more with --offset {}", window.offset));
    }
    println!("{}", footer.dimmed());
    Ok(())
}
