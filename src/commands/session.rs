//! `login` and `logout` store and forget the bearer token.
//!
//! The backend issues tokens out of band; nothing is verified here.

use owo_colors::OwoColorize;

use crate::config::{Config, TOKEN_ENV};
use crate::error::{DeskError, Result};

pub fn cmd_login(token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(DeskError::Validation("token cannot be empty".to_string()));
    }

    let mut config = Config::load()?;
    config.set_token(token.to_string());
    config.save()?;

    println!("Token saved to {}", Config::config_path().display());
    Ok(())
}

pub fn cmd_logout() -> Result<()> {
    let mut config = Config::load()?;
    config.clear_token();
    config.save()?;

    println!("Signed out");
    if std::env::var(TOKEN_ENV).is_ok_and(|t| !t.is_empty()) {
        println!(
            "{}",
            format!("{TOKEN_ENV} is still set and will be used").yellow()
        );
    }
    Ok(())
}
