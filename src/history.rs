//! History Ledger
//!
//! Fixed-capacity, most-recent-first record of completed dispatches, kept
//! for operator review. In-memory only; nothing survives a process restart.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::types::HistoryEntry;

/// Bounded most-recent-first ledger of prediction history.
///
/// Capacity is fixed at construction. `record` prepends and truncates, so
/// the oldest entry is always the one evicted. Appends are serialized by an
/// internal mutex; reads return a snapshot.
#[derive(Debug)]
pub struct HistoryLedger {
    capacity: usize,
    entries: Mutex<VecDeque<HistoryEntry>>,
}

impl HistoryLedger {
    /// Create a ledger holding at most `capacity` entries.
    ///
    /// A zero capacity is clamped to 1 — an unrecordable ledger would
    /// silently violate the one-append-per-dispatch contract.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Record a completed dispatch, evicting the oldest entry if full.
    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Snapshot of retained entries, most recent first.
    pub fn recent(&self) -> Vec<HistoryEntry> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().cloned().collect()
    }

    /// Number of retained entries (never exceeds capacity).
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
