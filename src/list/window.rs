//! Page window and load state for a paginated list.

use crate::gateway::{Page, Record};

/// The records of one resource fetched so far, in fetch order
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow {
    pub items: Vec<Record>,
    /// Starting offset of the next fetch
    pub offset: u64,
    /// Page size requested on every fetch
    pub limit: u32,
    /// Total reported by the backend, if any
    pub total: Option<u64>,
}

impl PageWindow {
    pub fn new(limit: u32) -> Self {
        Self::starting_at(limit, 0)
    }

    /// Empty window whose first fetch begins at `offset`
    pub fn starting_at(limit: u32, offset: u64) -> Self {
        Self {
            items: Vec::new(),
            offset,
            limit: limit.max(1),
            total: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|r| r.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.items.iter().find(|r| r.id() == id)
    }

    /// Append a fetched page and advance the offset by the requested limit.
    ///
    /// Returns true when no further page should be requested.
    pub(crate) fn append(&mut self, page: Page, requested: u32) -> bool {
        let returned = page.items.len() as u64;
        self.items.extend(page.items);
        self.offset += u64::from(requested);
        if page.total.is_some() {
            self.total = page.total;
        }

        let short_page = returned < u64::from(requested);
        let total_reached = self.total.is_some_and(|total| self.offset >= total);
        short_page || total_reached
    }

    /// Remove a record, returning its index and value
    pub(crate) fn remove(&mut self, id: &str) -> Option<(usize, Record)> {
        let index = self.position(id)?;
        Some((index, self.items.remove(index)))
    }

    /// Re-insert a record at `index`, clamped to the current length
    pub(crate) fn restore(&mut self, index: usize, record: Record) {
        let index = index.min(self.items.len());
        self.items.insert(index, record);
    }

    /// Replace the record with `id` in place, returning the previous value
    pub(crate) fn replace(&mut self, id: &str, record: Record) -> Option<Record> {
        let index = self.position(id)?;
        Some(std::mem::replace(&mut self.items[index], record))
    }

    pub(crate) fn insert_front(&mut self, record: Record) {
        self.items.insert(0, record);
    }
}

/// Load state of a list instance
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    /// The last fetch came back short; nothing more to load
    Exhausted,
    /// The last fetch failed; items are untouched and a retry resumes at the same offset
    Errored(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn has_more(&self) -> bool {
        !matches!(self, LoadState::Exhausted)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Errored(message) => Some(message),
            _ => None,
        }
    }
}
