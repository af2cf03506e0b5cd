//! Debounced remote search
//!
//! Keystrokes feed [`SearchOrchestrator::input`]. A query is sent only after
//! the input has been quiet for the debounce interval and only when it is
//! long enough. Every keystroke takes a new sequence number; a response is
//! applied only if no newer keystroke arrived while it was in flight.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::SearchConfig;
use crate::gateway::{Gateway, GatewayError, Record, Resource};

/// Tuning for the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
    pub limit: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: config.debounce(),
            min_query_len: config.min_query_len,
            limit: config.limit,
        }
    }
}

/// What the search box shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Raw text as last typed
    pub query: String,
    pub results: Vec<Record>,
    /// Whether the results panel is visible
    pub panel_open: bool,
    /// A request for the current query is outstanding
    pub in_flight: bool,
    pub error: Option<String>,
    latest_seq: u64,
}

/// What happened to one keystroke
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Query too short; results were cleared without a request
    Cleared,
    /// A newer keystroke arrived during the quiet period; nothing was sent
    Superseded,
    /// Results for this query are now displayed
    Applied(usize),
    /// A response arrived after a newer keystroke and was dropped
    Stale,
    Failed(GatewayError),
}

pub struct SearchOrchestrator<G: Gateway> {
    gateway: Arc<G>,
    resource: Resource,
    settings: SearchSettings,
    state: Mutex<SearchState>,
}

impl<G: Gateway> SearchOrchestrator<G> {
    pub fn new(gateway: Arc<G>, resource: Resource, settings: SearchSettings) -> Self {
        Self {
            gateway,
            resource,
            settings,
            state: Mutex::new(SearchState::default()),
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Handle one change of the search text
    pub async fn input(&self, query: &str) -> SearchOutcome {
        let term = query.trim().to_string();
        let seq = {
            let mut state = self.state.lock();
            state.latest_seq += 1;
            state.query = query.to_string();
            if term.chars().count() < self.settings.min_query_len {
                state.results.clear();
                state.panel_open = false;
                state.in_flight = false;
                state.error = None;
                return SearchOutcome::Cleared;
            }
            state.latest_seq
        };

        if !self.settings.debounce.is_zero() {
            tokio::time::sleep(self.settings.debounce).await;
        }

        {
            let mut state = self.state.lock();
            if state.latest_seq != seq {
                return SearchOutcome::Superseded;
            }
            state.in_flight = true;
        }

        debug!(resource = %self.resource, query = %term, seq, "searching");
        let result = self
            .gateway
            .search(self.resource, &term, self.settings.limit)
            .await;

        let mut state = self.state.lock();
        if state.latest_seq != seq {
            debug!(query = %term, seq, latest = state.latest_seq, "dropping stale search response");
            return SearchOutcome::Stale;
        }
        state.in_flight = false;
        match result {
            Ok(results) => {
                let count = results.len();
                state.results = results;
                state.panel_open = true;
                state.error = None;
                SearchOutcome::Applied(count)
            }
            Err(err) => {
                state.results.clear();
                state.panel_open = false;
                state.error = Some(err.user_message());
                SearchOutcome::Failed(err)
            }
        }
    }

    /// Hide the results panel; pending responses are ignored afterwards
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.latest_seq += 1;
        state.panel_open = false;
        state.in_flight = false;
    }

    /// Pick a result, closing the panel
    pub fn select(&self, id: &str) -> Option<Record> {
        let picked = {
            let state = self.state.lock();
            state.results.iter().find(|r| r.id() == id).cloned()
        };
        if picked.is_some() {
            self.close();
        }
        picked
    }

    pub fn state(&self) -> SearchState {
        self.state.lock().clone()
    }
}
