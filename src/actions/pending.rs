//! Pending mutations, at most one per record.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Delete,
    Update,
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    /// Waiting for the user to confirm; nothing has been sent
    Confirming,
    /// Request sent, local list already mutated
    Inflight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub record_id: String,
    pub kind: MutationKind,
    pub phase: MutationPhase,
}

/// Table of in-progress mutations keyed by record id
#[derive(Debug, Default)]
pub(crate) struct PendingTable {
    entries: HashMap<String, PendingMutation>,
}

impl PendingTable {
    /// Register a mutation; fails if the record already has one
    pub fn begin(&mut self, record_id: &str, kind: MutationKind, phase: MutationPhase) -> bool {
        if self.entries.contains_key(record_id) {
            return false;
        }
        self.entries.insert(
            record_id.to_string(),
            PendingMutation {
                record_id: record_id.to_string(),
                kind,
                phase,
            },
        );
        true
    }

    /// Move a confirming mutation of `kind` to in-flight
    pub fn advance(&mut self, record_id: &str, kind: MutationKind) -> bool {
        match self.entries.get_mut(record_id) {
            Some(entry) if entry.kind == kind && entry.phase == MutationPhase::Confirming => {
                entry.phase = MutationPhase::Inflight;
                true
            }
            _ => false,
        }
    }

    /// Drop a confirming mutation of `kind`; in-flight ones are left alone
    pub fn cancel(&mut self, record_id: &str, kind: MutationKind) -> bool {
        let confirming = self
            .entries
            .get(record_id)
            .is_some_and(|e| e.kind == kind && e.phase == MutationPhase::Confirming);
        if confirming {
            self.entries.remove(record_id);
        }
        confirming
    }

    pub fn finish(&mut self, record_id: &str) {
        self.entries.remove(record_id);
    }

    pub fn get(&self, record_id: &str) -> Option<&PendingMutation> {
        self.entries.get(record_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
