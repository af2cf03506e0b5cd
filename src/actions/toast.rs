//! Toast notification system
//!
//! Short-lived status messages shown after row actions. A toast expires a
//! fixed interval after it was raised; expired toasts are dropped the next
//! time the board is read.

use std::time::Duration;

use owo_colors::{OwoColorize, Style};
use tokio::time::Instant;

use crate::config::ToastConfig;

/// A toast notification message
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// The message to display
    pub message: String,
    /// The severity level of the toast
    pub level: ToastLevel,
    /// When the toast was created
    pub created_at: Instant,
    /// How long the toast stays visible
    pub ttl: Duration,
}

/// Severity level for toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.ttl
    }

    /// Terminal style associated with this toast's level
    pub fn style(&self) -> Style {
        match self.level {
            ToastLevel::Info => Style::new().cyan(),
            ToastLevel::Warning => Style::new().yellow(),
            ToastLevel::Error => Style::new().red().bold(),
            ToastLevel::Success => Style::new().green(),
        }
    }

    /// Message rendered with its level's style
    pub fn render(&self) -> String {
        self.message.style(self.style()).to_string()
    }
}

/// How long each kind of toast stays up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTimings {
    pub success: Duration,
    pub error: Duration,
}

impl Default for ToastTimings {
    fn default() -> Self {
        Self::from(&ToastConfig::default())
    }
}

impl From<&ToastConfig> for ToastTimings {
    fn from(config: &ToastConfig) -> Self {
        Self {
            success: Duration::from_secs(config.success_secs),
            error: Duration::from_secs(config.error_secs),
        }
    }
}

/// The set of currently visible toasts
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    items: Vec<Toast>,
    timings: ToastTimings,
}

impl Toasts {
    pub fn new(timings: ToastTimings) -> Self {
        Self {
            items: Vec::new(),
            timings,
        }
    }

    pub fn push(&mut self, toast: Toast) {
        self.items.push(toast);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastLevel::Success, self.timings.success));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastLevel::Warning, self.timings.error));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Toast::new(message, ToastLevel::Error, self.timings.error));
    }

    /// Drop expired toasts
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|t| !t.is_expired(now));
    }

    /// Toasts still visible at `now`, oldest first
    pub fn active(&self, now: Instant) -> Vec<Toast> {
        self.items
            .iter()
            .filter(|t| !t.is_expired(now))
            .cloned()
            .collect()
    }

    /// Remove and return every toast, expired or not
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
