pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod list;
pub mod search;
pub mod session;

#[cfg(test)]
mod testing;

pub use actions::{ActionOutcome, RowActions, Toast, ToastLevel};
pub use config::Config;
pub use error::{DeskError, Result};
pub use gateway::{Gateway, GatewayError, HttpGateway, Record, Resource};
pub use list::{LoadOutcome, LoadState, PaginatedList};
pub use search::{SearchOrchestrator, SearchOutcome};
pub use session::Session;
