//! Session context injected into the gateway.
//!
//! The session is the single source of truth for the bearer token. It is
//! built once from configuration and handed to the gateway at construction;
//! nothing else reads the token.

use secrecy::{ExposeSecret, SecretBox};

use crate::config::Config;
use crate::gateway::GatewayError;

#[derive(Debug)]
pub enum Session {
    Authenticated { token: SecretBox<String> },
    Unauthenticated,
}

impl Session {
    /// Session for the given token; blank tokens yield an unauthenticated session
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Session::Unauthenticated;
        }
        Session::Authenticated {
            token: SecretBox::new(Box::new(trimmed.to_string())),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        match config.token() {
            Some(token) => Session::with_token(token),
            None => Session::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// Token to send as `Authorization: Bearer <token>`
    pub fn bearer(&self) -> Result<&str, GatewayError> {
        match self {
            Session::Authenticated { token } => Ok(token.expose_secret().as_str()),
            Session::Unauthenticated => Err(GatewayError::Unauthenticated),
        }
    }
}
