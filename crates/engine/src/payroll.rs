//! Wage math over rows and cells.
//!
//! Everything here is a pure function of the row configuration and the
//! cell set — no hidden state. Totals are sums over the two primitives
//! [`cell_amount`] and [`row_amount`]; there is no independent computation
//! path, so a column total always equals the sum of the cell amounts
//! visible in that column.

use chrono::NaiveDate;

use crate::schedule::{Cell, PayKind, Row, SalaryHandling, Schedule};

/// Units carried by one cell: `count * value` for count syntax, the bare
/// value otherwise.
pub fn cell_units(cell: &Cell) -> f64 {
    match (cell.unit_count, cell.value) {
        (Some(count), Some(value)) => count * value,
        (None, Some(value)) => value,
        _ => 0.0,
    }
}

/// Amount earned in a single cell. An absent cell pays nothing.
pub fn cell_amount(row: &Row, cell: Option<&Cell>) -> f64 {
    match cell {
        Some(cell) => amount_for_units(row, cell_units(cell)),
        None => 0.0,
    }
}

/// Per-row aggregate: summed units and the resulting amount.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowAmount {
    pub units: f64,
    pub amount: f64,
}

/// Row total over the given cells.
///
/// Units are summed first, the pay branch runs once over the sum, and a
/// manual `amount_override` then replaces the computed amount. The
/// override never touches units.
pub fn row_amount<'a>(row: &Row, cells: impl IntoIterator<Item = &'a Cell>) -> RowAmount {
    let units: f64 = cells.into_iter().map(cell_units).sum();
    let computed = amount_for_units(row, units);
    RowAmount {
        units,
        amount: row.amount_override.unwrap_or(computed),
    }
}

fn amount_for_units(row: &Row, units: f64) -> f64 {
    match row.pay_kind {
        PayKind::Salary => {
            let base = row.effective_rate();
            match row.salary_handling {
                SalaryHandling::Fixed => base,
                SalaryHandling::Prorate => {
                    // Guard: no normative hours means no derivable hourly
                    // rate. 0, never NaN or infinity.
                    if row.norm_hours > 0.0 {
                        base / row.norm_hours * units
                    } else {
                        0.0
                    }
                }
            }
        }
        PayKind::Hourly | PayKind::Shift => row.effective_rate() * units,
    }
}

/// Total for one day column: cell amounts summed down the column.
pub fn day_amount(schedule: &Schedule, date: NaiveDate) -> f64 {
    schedule
        .rows
        .iter()
        .map(|row| cell_amount(row, schedule.cell_at(row.id, date)))
        .sum()
}

/// Row total within a schedule.
pub fn row_total(schedule: &Schedule, row: &Row) -> RowAmount {
    row_amount(row, schedule.cells_for_row(row.id))
}

/// Grand total: cell amounts summed over the whole grid.
pub fn grand_amount(schedule: &Schedule) -> f64 {
    schedule.dates().map(|d| day_amount(schedule, d)).sum()
}

/// Payroll as a share of the planned revenue figure, when one is set and
/// positive.
pub fn labor_cost_percent(schedule: &Schedule) -> Option<f64> {
    let revenue = schedule.planned_revenue?;
    if revenue <= 0.0 {
        return None;
    }
    Some(grand_amount(schedule) / revenue * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{PositionId, RowId, ScheduleId};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn hourly_row(id: i64, rate: f64) -> Row {
        Row {
            id: RowId::from_raw(id),
            position_id: PositionId::from_raw(1),
            position_name: "Waiter".into(),
            index: 1,
            pay_kind: PayKind::Hourly,
            pay_rate: Some(rate),
            norm_hours: 0.0,
            rate_override: None,
            amount_override: None,
            salary_handling: SalaryHandling::Prorate,
        }
    }

    fn salary_row(id: i64, base: f64, norm_hours: f64, handling: SalaryHandling) -> Row {
        Row {
            pay_kind: PayKind::Salary,
            pay_rate: Some(base),
            norm_hours,
            salary_handling: handling,
            ..hourly_row(id, 0.0)
        }
    }

    fn cell(row: i64, day: u32, value: f64, count: Option<f64>) -> Cell {
        Cell {
            row_id: RowId::from_raw(row),
            work_date: date(day),
            value_raw: String::new(),
            value: Some(value),
            unit_count: count,
        }
    }

    fn schedule_with(rows: Vec<Row>, cells: Vec<Cell>) -> Schedule {
        let mut s = Schedule::new(ScheduleId::from_raw(1), "test", date(1), date(5));
        for row in rows {
            s.push_row(row);
        }
        for mut c in cells {
            // set_cell drops empty raw text; give each test cell some.
            if c.value_raw.is_empty() {
                c.value_raw = "x".into();
            }
            s.set_cell(c);
        }
        s
    }

    #[test]
    fn test_hourly_cell_amount() {
        let row = hourly_row(1, 200.0);
        let c = cell(1, 1, 8.0, None);
        assert_eq!(cell_amount(&row, Some(&c)), 1600.0);
        assert_eq!(cell_amount(&row, None), 0.0);
    }

    #[test]
    fn test_count_syntax_multiplies_units() {
        let row = hourly_row(1, 100.0);
        let c = cell(1, 1, 12.0, Some(2.0));
        assert_eq!(cell_units(&c), 24.0);
        assert_eq!(cell_amount(&row, Some(&c)), 2400.0);
    }

    #[test]
    fn test_rate_override_wins_over_base_rate() {
        let mut row = hourly_row(1, 200.0);
        row.rate_override = Some(300.0);
        let c = cell(1, 1, 10.0, None);
        assert_eq!(cell_amount(&row, Some(&c)), 3000.0);
    }

    #[test]
    fn test_salary_prorate() {
        // 30000 over 150 normative hours -> 200/h.
        let row = salary_row(1, 30_000.0, 150.0, SalaryHandling::Prorate);
        let c = cell(1, 1, 9.0, None);
        assert_eq!(cell_amount(&row, Some(&c)), 1800.0);
    }

    #[test]
    fn test_salary_prorate_zero_norm_hours() {
        let row = salary_row(1, 30_000.0, 0.0, SalaryHandling::Prorate);
        let c = cell(1, 1, 9.0, None);
        let amount = cell_amount(&row, Some(&c));
        assert_eq!(amount, 0.0);
        assert!(amount.is_finite());
    }

    #[test]
    fn test_salary_fixed_ignores_units() {
        let row = salary_row(1, 30_000.0, 150.0, SalaryHandling::Fixed);
        let schedule = schedule_with(
            vec![row.clone()],
            vec![cell(1, 1, 8.0, None), cell(1, 2, 12.0, None)],
        );
        let total = row_total(&schedule, &row);
        assert_eq!(total.units, 20.0);
        assert_eq!(total.amount, 30_000.0);
    }

    #[test]
    fn test_amount_override_replaces_amount_only() {
        let mut row = hourly_row(1, 200.0);
        row.amount_override = Some(45_000.0);
        let schedule = schedule_with(vec![row.clone()], vec![cell(1, 1, 8.0, None)]);
        let total = row_total(&schedule, &row);
        assert_eq!(total.amount, 45_000.0);
        // Units are untouched by the override.
        assert_eq!(total.units, 8.0);
    }

    #[test]
    fn test_totals_are_sums_of_cell_amounts() {
        let rows = vec![hourly_row(1, 100.0), hourly_row(2, 250.0)];
        let cells = vec![
            cell(1, 1, 8.0, None),
            cell(1, 2, 6.0, None),
            cell(2, 1, 12.0, Some(2.0)),
            cell(2, 4, 4.0, None),
        ];
        let schedule = schedule_with(rows, cells);

        // Column totals equal the sum of visible cell amounts in that column.
        let col1: f64 = schedule
            .rows
            .iter()
            .map(|r| cell_amount(r, schedule.cell_at(r.id, date(1))))
            .sum();
        assert_eq!(day_amount(&schedule, date(1)), col1);
        assert_eq!(col1, 8.0 * 100.0 + 24.0 * 250.0);

        // Grand total equals the sum over every visible cell.
        let by_cells: f64 = schedule
            .rows
            .iter()
            .flat_map(|r| {
                schedule
                    .cells_for_row(r.id)
                    .map(move |c| cell_amount(r, Some(c)))
            })
            .sum();
        assert!((grand_amount(&schedule) - by_cells).abs() < 1e-9);
    }

    #[test]
    fn test_labor_cost_percent() {
        let mut schedule = schedule_with(vec![hourly_row(1, 100.0)], vec![cell(1, 1, 8.0, None)]);
        assert_eq!(labor_cost_percent(&schedule), None);
        schedule.planned_revenue = Some(8000.0);
        assert_eq!(labor_cost_percent(&schedule), Some(10.0));
        schedule.planned_revenue = Some(0.0);
        assert_eq!(labor_cost_percent(&schedule), None);
    }

    #[test]
    fn test_missing_rate_pays_zero() {
        let mut row = hourly_row(1, 0.0);
        row.pay_rate = None;
        let c = cell(1, 1, 8.0, None);
        assert_eq!(cell_amount(&row, Some(&c)), 0.0);
    }
}
