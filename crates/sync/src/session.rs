//! The editing session: one open schedule plus everything needed to keep
//! it in sync with the remote store.

use std::time::Instant;

use rustc_hash::FxHashMap;

use shiftgrid_client::{RowPatch, SchedulePatch, ScheduleStore};
use shiftgrid_engine::ids::{PositionId, RowId};
use shiftgrid_engine::reading::{parse_reading, ReadingError};
use shiftgrid_engine::schedule::{Cell, CellKey, Row, Schedule};

use crate::pending::PendingBuffer;
use crate::scheduler::FlushScheduler;
use crate::state::{reconcile_chunk, ConfirmedCells};
use crate::SyncError;

/// Default number of cell writes per batch request.
pub const DEFAULT_CHUNK_SIZE: usize = 80;

/// Outcome of a completed flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushReport {
    /// Chunk requests issued (0 for a no-op flush).
    pub chunks_sent: usize,
    /// Authoritative cell records merged back into local state.
    pub cells_confirmed: usize,
}

/// An open schedule under edit.
///
/// The embedded [`Schedule`] always shows the optimistic view; the
/// confirmed shadow and the pending buffer track what the store knows and
/// what it still has to be told. Single-writer: the owning view drives
/// every mutation from one loop, so there is nothing to lock.
pub struct EditSession {
    schedule: Schedule,
    confirmed: ConfirmedCells,
    pending: PendingBuffer,
    scheduler: FlushScheduler,
    errors: FxHashMap<CellKey, ReadingError>,
    chunk_size: usize,
}

impl EditSession {
    /// Open a session over a freshly fetched schedule.
    pub fn new(schedule: Schedule) -> Self {
        Self::with_tuning(schedule, FlushScheduler::default(), DEFAULT_CHUNK_SIZE)
    }

    pub fn with_tuning(schedule: Schedule, scheduler: FlushScheduler, chunk_size: usize) -> Self {
        let confirmed = ConfirmedCells::from_schedule(&schedule);
        EditSession {
            schedule,
            confirmed,
            pending: PendingBuffer::new(),
            scheduler,
            errors: FxHashMap::default(),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Last confirmed record for a key, if any.
    pub fn confirmed_cell(&self, key: &CellKey) -> Option<&Cell> {
        self.confirmed.get(key)
    }

    /// Inline parse error attached to a cell key, until corrected.
    pub fn parse_error(&self, key: &CellKey) -> Option<ReadingError> {
        self.errors.get(key).copied()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Deadline the host should wake at, if a flush is scheduled.
    pub fn next_flush_due(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    /// Commit one cell edit at time `now`.
    ///
    /// The local cell updates immediately and the change is queued for the
    /// next flush. Empty text deletes the cell. Text that does not parse
    /// is rejected: the cell keeps its last good reading, nothing is
    /// queued, and the error stays attached to the key until a later edit
    /// replaces it.
    pub fn edit_cell(
        &mut self,
        row_id: RowId,
        date: chrono::NaiveDate,
        raw: &str,
        now: Instant,
    ) -> Result<(), ReadingError> {
        let key = CellKey::new(row_id, date);

        let reading = match parse_reading(raw) {
            Ok(reading) => reading,
            Err(err) => {
                self.errors.insert(key, err);
                return Err(err);
            }
        };

        if reading.is_empty() {
            self.schedule.remove_cell(&key);
            self.pending.upsert(key, None);
        } else {
            self.schedule.set_cell(Cell {
                row_id,
                work_date: date,
                value_raw: raw.to_string(),
                value: reading.value,
                unit_count: reading.count,
            });
            self.pending.upsert(key, Some(raw.to_string()));
        }

        self.errors.remove(&key);
        self.scheduler.note_change(now);
        Ok(())
    }

    /// Tick. Flushes when a deadline has passed and edits are pending.
    pub fn poll(
        &mut self,
        now: Instant,
        store: &impl ScheduleStore,
    ) -> Result<Option<FlushReport>, SyncError> {
        if !self.scheduler.due(now) {
            return Ok(None);
        }
        if self.pending.is_empty() {
            // Deadlines can outlive their edits (row deletion drains them).
            self.scheduler.disarm();
            return Ok(None);
        }
        self.flush(store).map(Some)
    }

    /// Drain every pending change to the store, in chunks, sequentially.
    ///
    /// The buffer is drained before the first request, so edits committed
    /// while a flush is in flight start a fresh burst. Each successful
    /// chunk is reconciled as its response arrives; the first failure
    /// aborts the remainder and the confirmed prefix stays merged.
    pub fn flush(&mut self, store: &impl ScheduleStore) -> Result<FlushReport, SyncError> {
        self.scheduler.disarm();
        if self.pending.is_empty() {
            return Ok(FlushReport::default());
        }

        let chunks = self.pending.drain_chunks(self.chunk_size);
        let mut report = FlushReport::default();

        for chunk in &chunks {
            match store.batch_update_cells(self.schedule.id, chunk) {
                Ok(records) => {
                    report.cells_confirmed += reconcile_chunk(
                        &mut self.schedule,
                        &mut self.confirmed,
                        &mut self.errors,
                        chunk,
                        records,
                    );
                    report.chunks_sent += 1;
                }
                Err(source) => {
                    log::warn!(
                        "flush aborted after {}/{} chunks: {}",
                        report.chunks_sent,
                        chunks.len(),
                        source
                    );
                    return Err(SyncError::Flush {
                        chunks_done: report.chunks_sent,
                        source,
                    });
                }
            }
        }

        log::debug!(
            "flushed {} chunks, {} cells confirmed",
            report.chunks_sent,
            report.cells_confirmed
        );
        Ok(report)
    }

    /// Teardown: drop scheduled deadlines. Anything already sent to the
    /// store stays in flight; anything still pending is lost with the
    /// session, as a reload refetches authoritative state anyway.
    pub fn cancel_scheduled(&mut self) {
        self.scheduler.disarm();
    }

    // ------------------------------------------------------------------
    // Row and schedule mutations. None of these are optimistic: the store
    // call runs first and local state changes only on success.
    // ------------------------------------------------------------------

    pub fn create_row(
        &mut self,
        store: &impl ScheduleStore,
        position_id: PositionId,
    ) -> Result<Row, SyncError> {
        let row = store
            .create_row(self.schedule.id, position_id)
            .map_err(SyncError::Store)?;
        self.schedule.push_row(row.clone());
        Ok(row)
    }

    pub fn update_row(
        &mut self,
        store: &impl ScheduleStore,
        row_id: RowId,
        patch: &RowPatch,
    ) -> Result<(), SyncError> {
        let row = store
            .update_row(self.schedule.id, row_id, patch)
            .map_err(SyncError::Store)?;
        self.schedule.replace_row(row);
        Ok(())
    }

    /// Delete a row and cascade everything local that hangs off it:
    /// cells, pending changes, error markers, confirmed records.
    pub fn delete_row(
        &mut self,
        store: &impl ScheduleStore,
        row_id: RowId,
    ) -> Result<(), SyncError> {
        store
            .delete_row(self.schedule.id, row_id)
            .map_err(SyncError::Store)?;
        self.schedule.remove_row(row_id);
        self.confirmed.remove_row(row_id);
        self.pending.remove_row(row_id);
        self.errors.retain(|key, _| key.row_id != row_id);
        Ok(())
    }

    pub fn set_planned_revenue(
        &mut self,
        store: &impl ScheduleStore,
        planned_revenue: Option<f64>,
    ) -> Result<(), SyncError> {
        let patch = SchedulePatch {
            planned_revenue: Some(planned_revenue),
        };
        let updated = store
            .update_schedule(self.schedule.id, &patch)
            .map_err(SyncError::Store)?;
        self.schedule.planned_revenue = updated.planned_revenue;
        Ok(())
    }
}
