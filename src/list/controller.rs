//! Paginated list controller.
//!
//! One controller owns the page window of one list screen. Fetches are
//! serialized by the `Loading` state: the check and the transition happen
//! under a single lock acquisition before the gateway call is awaited, so a
//! second `load_more` issued while a fetch is outstanding is a no-op no matter
//! how the caller schedules it.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::gateway::{Gateway, GatewayError, PageRequest, Record, Resource};

use super::window::{LoadState, PageWindow};

/// What a call to `load_more` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and this many records were appended
    Appended(usize),
    /// Nothing was fetched: a fetch is already running or the list is exhausted
    Skipped,
    /// The fetch failed; the list is in the errored state
    Failed(GatewayError),
    /// The list was re-initialized while this fetch was in flight
    Discarded,
}

/// A record located in the list
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub index: usize,
    pub record: Record,
    /// Generation of the window the record was found in
    pub generation: u64,
}

#[derive(Debug)]
struct ListInner {
    window: PageWindow,
    state: LoadState,
    filters: Vec<(String, String)>,
    /// Bumped by `initialize`; fetches started under an older generation are dropped
    generation: u64,
}

/// Controller for an infinite-scroll list of one resource
pub struct PaginatedList<G: Gateway> {
    gateway: Arc<G>,
    resource: Resource,
    page_size: u32,
    start_offset: u64,
    inner: Mutex<ListInner>,
}

impl<G: Gateway> PaginatedList<G> {
    /// Create an empty list; nothing is fetched until `initialize` or `load_more`
    pub fn new(gateway: Arc<G>, resource: Resource, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        Self {
            gateway,
            resource,
            page_size,
            start_offset: 0,
            inner: Mutex::new(ListInner {
                window: PageWindow::new(page_size),
                state: LoadState::Idle,
                filters: Vec::new(),
                generation: 0,
            }),
        }
    }

    /// Begin every (re)initialized window at `offset` instead of the first record
    pub fn with_start_offset(mut self, offset: u64) -> Self {
        self.start_offset = offset;
        self.inner.get_mut().window = PageWindow::starting_at(self.page_size, offset);
        self
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Reset to an empty window with new filters and fetch the first page
    pub async fn initialize(&self, filters: Vec<(String, String)>) -> LoadOutcome {
        {
            let mut inner = self.inner.lock();
            inner.window = PageWindow::starting_at(self.page_size, self.start_offset);
            inner.state = LoadState::Idle;
            inner.filters = filters;
            inner.generation += 1;
        }
        self.load_more().await
    }

    /// Fetch the next page unless a fetch is running or the list is exhausted
    pub async fn load_more(&self) -> LoadOutcome {
        let (request, generation) = {
            let mut inner = self.inner.lock();
            if matches!(inner.state, LoadState::Loading | LoadState::Exhausted) {
                return LoadOutcome::Skipped;
            }
            inner.state = LoadState::Loading;
            let request = PageRequest {
                offset: inner.window.offset,
                limit: inner.window.limit,
                filters: inner.filters.clone(),
            };
            (request, inner.generation)
        };

        debug!(
            resource = %self.resource,
            offset = request.offset,
            limit = request.limit,
            "loading page"
        );

        let result = self.gateway.list(self.resource, &request).await;

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            debug!(resource = %self.resource, "discarding page from a previous initialize");
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                let count = page.items.len();
                let exhausted = inner.window.append(page, request.limit);
                inner.state = if exhausted {
                    LoadState::Exhausted
                } else {
                    LoadState::Idle
                };
                LoadOutcome::Appended(count)
            }
            Err(err) => {
                debug!(resource = %self.resource, error = %err, "page load failed");
                inner.state = LoadState::Errored(err.user_message());
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Keep loading until the list is exhausted or `max_pages` pages were fetched.
    ///
    /// Returns the number of records held afterwards.
    pub async fn load_all(&self, max_pages: Option<usize>) -> Result<usize, GatewayError> {
        let mut pages = 0;
        while max_pages.is_none_or(|max| pages < max) {
            match self.load_more().await {
                LoadOutcome::Appended(_) => pages += 1,
                LoadOutcome::Failed(err) => return Err(err),
                LoadOutcome::Skipped | LoadOutcome::Discarded => break,
            }
        }
        Ok(self.len())
    }

    pub fn state(&self) -> LoadState {
        self.inner.lock().state.clone()
    }

    pub fn has_more(&self) -> bool {
        self.inner.lock().state.has_more()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().window.is_empty()
    }

    /// Copy of the current window
    pub fn snapshot(&self) -> PageWindow {
        self.inner.lock().window.clone()
    }

    pub fn items(&self) -> Vec<Record> {
        self.inner.lock().window.items.clone()
    }

    pub fn get(&self, id: &str) -> Option<Record> {
        self.inner.lock().window.get(id).cloned()
    }

    /// Copy of a record together with its position and the window generation
    pub fn entry(&self, id: &str) -> Option<Entry> {
        let inner = self.inner.lock();
        let index = inner.window.position(id)?;
        Some(Entry {
            index,
            record: inner.window.items[index].clone(),
            generation: inner.generation,
        })
    }

    /// Remove a record locally, returning where it was
    pub fn remove(&self, id: &str) -> Option<Entry> {
        let mut inner = self.inner.lock();
        let generation = inner.generation;
        let (index, record) = inner.window.remove(id)?;
        Some(Entry {
            index,
            record,
            generation,
        })
    }

    /// Put a removed record back, as close to its old index as the list allows.
    ///
    /// Does nothing and returns false once the list has been reinitialized or
    /// when it already holds a record with the same id.
    pub fn restore(&self, entry: Entry) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != entry.generation
            || inner.window.position(entry.record.id()).is_some()
        {
            return false;
        }
        inner.window.restore(entry.index, entry.record);
        true
    }

    /// Swap the record with `id` for `record`, returning the previous value
    pub fn replace(&self, id: &str, record: Record) -> Option<Record> {
        self.inner.lock().window.replace(id, record)
    }

    /// Like [`replace`](Self::replace), but only while the window of `generation` is current
    pub fn replace_in(&self, generation: u64, id: &str, record: Record) -> Option<Record> {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return None;
        }
        inner.window.replace(id, record)
    }

    pub fn insert_front(&self, record: Record) {
        self.inner.lock().window.insert_front(record);
    }
}
