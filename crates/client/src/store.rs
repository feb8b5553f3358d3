//! Store seam consumed by the sync layer.

use shiftgrid_engine::ids::{PositionId, RowId, ScheduleId};
use shiftgrid_engine::schedule::{Cell, Row, Schedule};

use crate::types::{CellWrite, RowPatch, SchedulePatch};
use crate::StoreError;

/// Remote schedule store contract.
///
/// One implementation talks HTTP ([`crate::StoreClient`]); tests use
/// in-memory fakes. All calls are synchronous; the sync layer relies on
/// that to keep batch chunks strictly ordered.
pub trait ScheduleStore {
    /// Write a batch of cell upserts/deletes. Returns the authoritative
    /// post-write cell records for reconciliation.
    fn batch_update_cells(
        &self,
        schedule_id: ScheduleId,
        items: &[CellWrite],
    ) -> Result<Vec<Cell>, StoreError>;

    fn create_row(&self, schedule_id: ScheduleId, position_id: PositionId)
        -> Result<Row, StoreError>;

    fn update_row(
        &self,
        schedule_id: ScheduleId,
        row_id: RowId,
        patch: &RowPatch,
    ) -> Result<Row, StoreError>;

    fn delete_row(&self, schedule_id: ScheduleId, row_id: RowId) -> Result<(), StoreError>;

    fn get_schedule(&self, schedule_id: ScheduleId) -> Result<Schedule, StoreError>;

    fn update_schedule(
        &self,
        schedule_id: ScheduleId,
        patch: &SchedulePatch,
    ) -> Result<Schedule, StoreError>;
}
