//! Two-state cell data: optimistic (live) vs confirmed (authoritative).
//!
//! The `Schedule` inside a session always shows the optimistic view — an
//! edit lands there before any network call. Beside it sits the confirmed
//! shadow: the last cell record the store acknowledged per key. Flush
//! responses are merged by [`reconcile_chunk`], a plain function with no
//! side channel, so merge behavior is unit-testable in isolation.

use rustc_hash::FxHashMap;

use shiftgrid_client::CellWrite;
use shiftgrid_engine::ids::RowId;
use shiftgrid_engine::reading::ReadingError;
use shiftgrid_engine::schedule::{Cell, CellKey, Schedule};

/// Authoritative cell records, as last confirmed by the store.
#[derive(Debug, Default)]
pub struct ConfirmedCells {
    cells: FxHashMap<CellKey, Cell>,
}

impl ConfirmedCells {
    /// Seed from a freshly fetched schedule — everything the store just
    /// returned is authoritative by definition.
    pub fn from_schedule(schedule: &Schedule) -> Self {
        ConfirmedCells {
            cells: schedule.cells().map(|c| (c.key(), c.clone())).collect(),
        }
    }

    pub fn get(&self, key: &CellKey) -> Option<&Cell> {
        self.cells.get(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn remove_row(&mut self, row_id: RowId) {
        self.cells.retain(|key, _| key.row_id != row_id);
    }
}

/// Merge one confirmed flush chunk into local state.
///
/// `sent` is the chunk as it went out; `records` is the store's
/// authoritative response. Deletions are confirmed by their absence from
/// the response, so they are applied off the sent items first; records
/// then replace whatever the optimistic layer held for their keys.
/// Parse-error markers die for every key the store confirmed.
///
/// Returns the number of confirmed records merged.
pub fn reconcile_chunk(
    schedule: &mut Schedule,
    confirmed: &mut ConfirmedCells,
    errors: &mut FxHashMap<CellKey, ReadingError>,
    sent: &[CellWrite],
    records: Vec<Cell>,
) -> usize {
    for write in sent {
        let key = CellKey::new(write.row_id, write.work_date);
        if write.value_raw.is_none() {
            schedule.remove_cell(&key);
            confirmed.cells.remove(&key);
        }
        errors.remove(&key);
    }

    let merged = records.len();
    for cell in records {
        let key = cell.key();
        schedule.set_cell(cell.clone());
        errors.remove(&key);
        confirmed.cells.insert(key, cell);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shiftgrid_engine::ids::{PositionId, RowId, ScheduleId};
    use shiftgrid_engine::schedule::{PayKind, Row, SalaryHandling};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn key(row: i64, day: u32) -> CellKey {
        CellKey::new(RowId::from_raw(row), date(day))
    }

    fn cell(row: i64, day: u32, raw: &str, value: f64) -> Cell {
        Cell {
            row_id: RowId::from_raw(row),
            work_date: date(day),
            value_raw: raw.into(),
            value: Some(value),
            unit_count: None,
        }
    }

    fn schedule() -> Schedule {
        let mut s = Schedule::new(ScheduleId::from_raw(1), "t", date(1), date(31));
        s.push_row(Row {
            id: RowId::from_raw(1),
            position_id: PositionId::from_raw(1),
            position_name: "Cook".into(),
            index: 1,
            pay_kind: PayKind::Hourly,
            pay_rate: Some(100.0),
            norm_hours: 0.0,
            rate_override: None,
            amount_override: None,
            salary_handling: SalaryHandling::Prorate,
        });
        s
    }

    #[test]
    fn test_confirmed_record_replaces_optimistic_cell() {
        let mut s = schedule();
        s.set_cell(cell(1, 1, "8,0", 8.0));
        let mut confirmed = ConfirmedCells::from_schedule(&s);
        let mut errors = FxHashMap::default();

        // Store canonicalized the raw text.
        let sent = vec![CellWrite {
            row_id: RowId::from_raw(1),
            work_date: date(1),
            value_raw: Some("8,0".into()),
        }];
        let merged = reconcile_chunk(
            &mut s,
            &mut confirmed,
            &mut errors,
            &sent,
            vec![cell(1, 1, "8", 8.0)],
        );

        assert_eq!(merged, 1);
        assert_eq!(s.cell(&key(1, 1)).unwrap().value_raw, "8");
        assert_eq!(confirmed.get(&key(1, 1)).unwrap().value_raw, "8");
    }

    #[test]
    fn test_deletion_confirmed_by_absence() {
        let mut s = schedule();
        s.set_cell(cell(1, 1, "8", 8.0));
        let mut confirmed = ConfirmedCells::from_schedule(&s);
        let mut errors = FxHashMap::default();
        assert_eq!(confirmed.len(), 1);

        let sent = vec![CellWrite {
            row_id: RowId::from_raw(1),
            work_date: date(1),
            value_raw: None,
        }];
        reconcile_chunk(&mut s, &mut confirmed, &mut errors, &sent, vec![]);

        assert!(s.cell(&key(1, 1)).is_none());
        assert!(confirmed.is_empty());
    }

    #[test]
    fn test_confirmation_clears_error_marker() {
        let mut s = schedule();
        let mut confirmed = ConfirmedCells::default();
        let mut errors = FxHashMap::default();
        errors.insert(key(1, 1), ReadingError::InvalidValue);

        let sent = vec![CellWrite {
            row_id: RowId::from_raw(1),
            work_date: date(1),
            value_raw: Some("8".into()),
        }];
        reconcile_chunk(
            &mut s,
            &mut confirmed,
            &mut errors,
            &sent,
            vec![cell(1, 1, "8", 8.0)],
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_remove_row_drops_confirmed_records() {
        let mut s = schedule();
        s.set_cell(cell(1, 1, "8", 8.0));
        s.set_cell(cell(2, 1, "6", 6.0));
        let mut confirmed = ConfirmedCells::from_schedule(&s);
        confirmed.remove_row(RowId::from_raw(1));
        assert_eq!(confirmed.len(), 1);
        assert!(confirmed.get(&key(2, 1)).is_some());
    }
}
