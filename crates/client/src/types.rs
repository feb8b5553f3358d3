//! Wire types for the schedule store API.
//!
//! The store is a web application; everything on the wire is camelCase
//! JSON. Rows and cells reuse the engine structs directly — their serde
//! shape is the wire shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shiftgrid_engine::ids::{RowId, ScheduleId};
use shiftgrid_engine::schedule::{Cell, Row, SalaryHandling, Schedule};

/// One cell write in a batch. `value_raw == None` deletes the cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellWrite {
    pub row_id: RowId,
    pub work_date: NaiveDate,
    /// Raw text to upsert, or explicit null to delete. Never skipped on
    /// the wire — the server distinguishes "absent" from "delete".
    pub value_raw: Option<String>,
}

/// Partial row update. Absent fields are left untouched by the server;
/// an explicit null clears the override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_handling: Option<SalaryHandling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_override: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_override: Option<Option<f64>>,
}

/// Partial schedule update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_revenue: Option<Option<f64>>,
}

/// Schedule as the store returns it: rows plus a flat cell list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    pub id: ScheduleId,
    pub title: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub planned_revenue: Option<f64>,
}

impl ScheduleRecord {
    /// Build the in-memory schedule. Cells keyed by (row, date); the
    /// store guarantees key uniqueness, a duplicate would keep the last.
    pub fn into_schedule(self) -> Schedule {
        let mut schedule = Schedule::new(self.id, self.title, self.date_from, self.date_to);
        schedule.planned_revenue = self.planned_revenue;
        for row in self.rows {
            schedule.push_row(row);
        }
        for cell in self.cells {
            schedule.set_cell(cell);
        }
        schedule
    }
}
