//! Configuration commands.
//!
//! - `config set`: Set a configuration value
//! - `config show`: Display current configuration

use owo_colors::OwoColorize;
use serde_json::json;

use super::print_json;
use crate::config::Config;
use crate::error::Result;

/// Mask a sensitive value by showing only the first 2 and last 2 characters
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?;
    let token = config.token();

    if json {
        return print_json(&json!({
            "base_url": config.base_url(),
            "request_timeout": config.request_timeout,
            "page_size": config.page_size,
            "auth": {
                "token_configured": token.is_some(),
            },
            "search": config.search,
            "toasts": config.toasts,
            "config_file": Config::config_path().to_string_lossy(),
        }));
    }

    let token_status = match &token {
        Some(token) => mask_sensitive_value(token).green().to_string(),
        None => "not configured".dimmed().to_string(),
    };

    println!("{}\n", "Configuration:".cyan().bold());
    println!("{}: {}", "base_url".cyan(), config.base_url());
    println!("{}: {}s", "request_timeout".cyan(), config.request_timeout);
    println!("{}: {}", "page_size".cyan(), config.page_size);
    println!("{}: {token_status}", "auth.token".cyan());
    println!();
    println!("{}:", "search".cyan());
    println!("  debounce_ms: {}", config.search.debounce_ms);
    println!("  min_query_len: {}", config.search.min_query_len);
    println!("  limit: {}", config.search.limit);
    println!("{}:", "toasts".cyan());
    println!("  success_secs: {}", config.toasts.success_secs);
    println!("  error_secs: {}", config.toasts.error_secs);
    println!();
    println!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    );
    Ok(())
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set_value(key, value)?;
    config.save()?;

    println!("Set {} to {value}", key.cyan());
    Ok(())
}
