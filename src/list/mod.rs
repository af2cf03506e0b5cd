//! Paginated, append-only record lists backing every table screen.

mod controller;
mod window;

pub use controller::{Entry, LoadOutcome, PaginatedList};
pub use window::{LoadState, PageWindow};
