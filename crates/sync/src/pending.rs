//! Pending-change buffer: the set of edits not yet flushed.

use std::collections::BTreeMap;

use shiftgrid_client::CellWrite;
use shiftgrid_engine::ids::RowId;
use shiftgrid_engine::schedule::CellKey;

/// One queued, not-yet-synced edit to a single cell key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    pub key: CellKey,
    /// Raw text to upsert, or `None` marking deletion.
    pub value_raw: Option<String>,
}

/// Buffer of pending edits, at most one change per cell key.
///
/// A new edit to an already-pending key replaces the queued value — the
/// store only ever sees the newest text for a key. A BTreeMap keeps drain
/// order deterministic (row, then date), which also makes chunk contents
/// reproducible.
#[derive(Debug, Default)]
pub struct PendingBuffer {
    changes: BTreeMap<CellKey, Option<String>>,
}

impl PendingBuffer {
    pub fn new() -> Self {
        PendingBuffer::default()
    }

    /// Queue an upsert (`Some`) or deletion (`None`). Newest wins.
    pub fn upsert(&mut self, key: CellKey, value_raw: Option<String>) {
        self.changes.insert(key, value_raw);
    }

    pub fn remove(&mut self, key: &CellKey) {
        self.changes.remove(key);
    }

    /// Drop every pending change for a deleted row.
    pub fn remove_row(&mut self, row_id: RowId) {
        self.changes.retain(|key, _| key.row_id != row_id);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn get(&self, key: &CellKey) -> Option<PendingChange> {
        self.changes.get(key).map(|value_raw| PendingChange {
            key: *key,
            value_raw: value_raw.clone(),
        })
    }

    /// Drain the whole buffer into write batches of at most `chunk_size`
    /// items. The buffer is empty afterwards.
    pub fn drain_chunks(&mut self, chunk_size: usize) -> Vec<Vec<CellWrite>> {
        let changes = std::mem::take(&mut self.changes);
        let mut chunks: Vec<Vec<CellWrite>> = Vec::new();
        for (key, value_raw) in changes {
            if chunks.last().map_or(true, |c| c.len() >= chunk_size) {
                chunks.push(Vec::with_capacity(chunk_size.min(64)));
            }
            if let Some(chunk) = chunks.last_mut() {
                chunk.push(CellWrite {
                    row_id: key.row_id,
                    work_date: key.work_date,
                    value_raw,
                });
            }
        }
        chunks
    }
}
