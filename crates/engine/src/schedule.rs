//! Schedule data model: rows, cells, and the grid they form.
//!
//! A schedule is a date range with one compensation row per staffing slot
//! and at most one cell per (row, date). A cell with empty raw text does
//! not exist in the set — absence means "no entry", never "zero entry".

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ids::{PositionId, RowId, ScheduleId};

/// How a row's base rate is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayKind {
    /// Rate per hour of attendance.
    #[default]
    Hourly,
    /// Rate per shift unit.
    Shift,
    /// Monthly salary, see [`SalaryHandling`].
    Salary,
}

/// What a SALARY row pays when attendance varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalaryHandling {
    /// Derive an hourly-equivalent rate from normative hours.
    #[default]
    Prorate,
    /// Flat amount regardless of units.
    Fixed,
}

/// One compensation line in a schedule, bound to a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: RowId,
    pub position_id: PositionId,
    pub position_name: String,
    /// 1-based index disambiguating multiple rows per position.
    pub index: u32,
    pub pay_kind: PayKind,
    /// Base rate; `None` when the position has no rate configured.
    #[serde(default)]
    pub pay_rate: Option<f64>,
    /// Normative hours a SALARY row is expected to work.
    #[serde(default)]
    pub norm_hours: f64,
    /// Per-row rate override, wins over `pay_rate`.
    #[serde(default)]
    pub rate_override: Option<f64>,
    /// Manual row amount. Wins unconditionally over any computed figure.
    #[serde(default)]
    pub amount_override: Option<f64>,
    #[serde(default)]
    pub salary_handling: SalaryHandling,
}

impl Row {
    /// Display label: position name plus the disambiguating index.
    pub fn label(&self) -> String {
        format!("{} {}", self.position_name, self.index)
    }

    /// Rate used by payroll math: override first, then base, then 0.
    pub fn effective_rate(&self) -> f64 {
        self.rate_override.or(self.pay_rate).unwrap_or(0.0)
    }
}

/// Unique cell address. At most one cell exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellKey {
    pub row_id: RowId,
    pub work_date: NaiveDate,
}

impl CellKey {
    pub fn new(row_id: RowId, work_date: NaiveDate) -> Self {
        CellKey { row_id, work_date }
    }
}

/// One attendance entry: raw text plus its parsed reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub row_id: RowId,
    pub work_date: NaiveDate,
    /// Text exactly as typed: `"8"`, `"2x12"`, `"8,5"`.
    pub value_raw: String,
    /// Parsed numeric value, if the raw text parses.
    #[serde(default)]
    pub value: Option<f64>,
    /// Repeat count from count syntax, `None` for bare numbers.
    #[serde(default)]
    pub unit_count: Option<f64>,
}

impl Cell {
    pub fn key(&self) -> CellKey {
        CellKey::new(self.row_id, self.work_date)
    }
}

/// A staffing schedule over an inclusive date range.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub id: ScheduleId,
    pub title: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    /// Ordered as displayed; order comes from the remote store.
    pub rows: Vec<Row>,
    cells: FxHashMap<CellKey, Cell>,
    pub planned_revenue: Option<f64>,
}

impl Schedule {
    pub fn new(id: ScheduleId, title: impl Into<String>, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Schedule {
            id,
            title: title.into(),
            date_from,
            date_to,
            rows: Vec::new(),
            cells: FxHashMap::default(),
            planned_revenue: None,
        }
    }

    /// All dates of the schedule, inclusive on both ends.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.date_from
            .iter_days()
            .take_while(move |d| *d <= self.date_to)
    }

    pub fn day_count(&self) -> usize {
        (self.date_to - self.date_from).num_days() as usize + 1
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.date_from && date <= self.date_to
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Replace a row in place, keeping display order.
    pub fn replace_row(&mut self, row: Row) {
        if let Some(slot) = self.row_mut(row.id) {
            *slot = row;
        }
    }

    /// Remove a row and cascade-delete all of its cells.
    pub fn remove_row(&mut self, id: RowId) {
        self.rows.retain(|r| r.id != id);
        self.cells.retain(|key, _| key.row_id != id);
    }

    pub fn cell(&self, key: &CellKey) -> Option<&Cell> {
        self.cells.get(key)
    }

    pub fn cell_at(&self, row_id: RowId, date: NaiveDate) -> Option<&Cell> {
        self.cells.get(&CellKey::new(row_id, date))
    }

    /// Upsert one cell. A cell with empty raw text is removed instead —
    /// the set never holds zero-filled placeholders.
    pub fn set_cell(&mut self, cell: Cell) {
        if cell.value_raw.trim().is_empty() {
            self.cells.remove(&cell.key());
        } else {
            self.cells.insert(cell.key(), cell);
        }
    }

    pub fn remove_cell(&mut self, key: &CellKey) -> Option<Cell> {
        self.cells.remove(key)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells_for_row(&self, row_id: RowId) -> impl Iterator<Item = &Cell> {
        self.cells.values().filter(move |c| c.row_id == row_id)
    }
}
