//! CSV dump of the schedule grid.
//!
//! Same snapshot as the workbook export, in plain rows: a header with the
//! day numbers, one line per schedule row with raw cell text, and a
//! trailing per-row total column.

use std::path::Path;

use chrono::Datelike;
use shiftgrid_engine::payroll;
use shiftgrid_engine::schedule::Schedule;

use crate::ExportError;

pub fn write_csv(schedule: &Schedule, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    let days: Vec<_> = schedule.dates().collect();

    let mut header = vec!["Position".to_string()];
    header.extend(days.iter().map(|d| format!("{:02}.{:02}", d.day(), d.month())));
    header.push("Amount".to_string());
    writer.write_record(&header).map_err(csv_error)?;

    for row in &schedule.rows {
        let mut record = vec![row.label()];
        for day in &days {
            record.push(
                schedule
                    .cell_at(row.id, *day)
                    .map(|c| c.value_raw.clone())
                    .unwrap_or_default(),
            );
        }
        let total = payroll::row_total(schedule, row);
        record.push(format!("{:.2}", total.amount));
        writer.write_record(&record).map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

fn csv_error(e: csv::Error) -> ExportError {
    ExportError::Encode(e.to_string())
}
