// ShiftGrid CLI - headless schedule operations against the remote store

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use shiftgrid_client::{RowPatch, ScheduleStore, StoreClient};
use shiftgrid_config::Settings;
use shiftgrid_engine::ids::{PositionId, RowId, ScheduleId};
use shiftgrid_engine::payroll;
use shiftgrid_engine::schedule::{SalaryHandling, Schedule};
use shiftgrid_sync::{EditSession, FlushScheduler};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(name = "sgrid")]
#[command(about = "Restaurant schedule grid (CLI mode, headless)")]
#[command(version)]
struct Cli {
    /// API base URL (falls back to settings.json)
    #[arg(long, global = true, env = "SHIFTGRID_API")]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a schedule and print rows with payroll totals
    #[command(after_help = "\
Examples:
  sgrid show 12
  sgrid show 12 --days")]
    Show {
        schedule_id: i64,

        /// Also print per-day totals
        #[arg(long)]
        days: bool,
    },

    /// Write one cell value and sync it
    #[command(after_help = "\
Examples:
  sgrid set 12 3 2026-07-15 8
  sgrid set 12 3 2026-07-15 2x12
  sgrid set 12 3 2026-07-15 8,5")]
    Set {
        schedule_id: i64,
        row_id: i64,
        date: NaiveDate,
        value: String,
    },

    /// Clear a cell and sync the deletion
    Clear {
        schedule_id: i64,
        row_id: i64,
        date: NaiveDate,
    },

    /// Row operations
    Row {
        #[command(subcommand)]
        command: RowCommands,
    },

    /// Set or clear the planned revenue figure
    Revenue {
        schedule_id: i64,

        /// Omit to clear the figure
        amount: Option<f64>,
    },

    /// Export the schedule as a file
    #[command(after_help = "\
Examples:
  sgrid export 12 -f xlsx -o ~/exports
  sgrid export 12 -f jpeg")]
    Export {
        schedule_id: i64,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "xlsx")]
        format: Format,

        /// Output directory
        #[arg(long, short = 'o', default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum RowCommands {
    /// Add a row for a position
    Add { schedule_id: i64, position_id: i64 },

    /// Change row compensation fields
    Update {
        schedule_id: i64,
        row_id: i64,

        #[arg(long, value_enum)]
        salary_handling: Option<Handling>,

        #[arg(long, conflicts_with = "clear_rate_override")]
        rate_override: Option<f64>,

        #[arg(long)]
        clear_rate_override: bool,

        #[arg(long, conflicts_with = "clear_amount_override")]
        amount_override: Option<f64>,

        #[arg(long)]
        clear_amount_override: bool,
    },

    /// Delete a row (and all of its cells)
    Rm { schedule_id: i64, row_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Xlsx,
    Jpeg,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Handling {
    Prorate,
    Fixed,
}

impl From<Handling> for SalaryHandling {
    fn from(h: Handling) -> Self {
        match h {
            Handling::Prorate => SalaryHandling::Prorate,
            Handling::Fixed => SalaryHandling::Fixed,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(msg) => {
            eprintln!("error: {}", msg);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let settings = Settings::load();
    let api_base = cli.api.unwrap_or_else(|| settings.api_base_url.clone());
    let client =
        StoreClient::new(api_base, settings.api_token.clone()).map_err(|e| e.to_string())?;

    match cli.command {
        Commands::Show { schedule_id, days } => {
            let schedule = client
                .get_schedule(ScheduleId::from_raw(schedule_id))
                .map_err(|e| e.to_string())?;
            print_schedule(&schedule, days);
            Ok(())
        }

        Commands::Set {
            schedule_id,
            row_id,
            date,
            value,
        } => edit_and_flush(&client, &settings, schedule_id, row_id, date, &value),

        Commands::Clear {
            schedule_id,
            row_id,
            date,
        } => edit_and_flush(&client, &settings, schedule_id, row_id, date, ""),

        Commands::Row { command } => run_row(&client, &settings, command),

        Commands::Revenue {
            schedule_id,
            amount,
        } => {
            let schedule = client
                .get_schedule(ScheduleId::from_raw(schedule_id))
                .map_err(|e| e.to_string())?;
            let mut session = session_with_settings(schedule, &settings);
            session
                .set_planned_revenue(&client, amount)
                .map_err(|e| e.to_string())?;
            match amount {
                Some(v) => println!("Planned revenue set to {:.2}", v),
                None => println!("Planned revenue cleared"),
            }
            Ok(())
        }

        Commands::Export {
            schedule_id,
            format,
            out,
        } => {
            let schedule = client
                .get_schedule(ScheduleId::from_raw(schedule_id))
                .map_err(|e| e.to_string())?;
            let path = match format {
                Format::Xlsx => shiftgrid_io::export_workbook(&schedule, &out),
                Format::Jpeg => {
                    shiftgrid_io::export_image(&schedule, &out, settings.export_jpeg_quality)
                }
                Format::Csv => shiftgrid_io::export_csv(&schedule, &out),
            }
            .map_err(|e| e.to_string())?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

fn run_row(client: &StoreClient, settings: &Settings, command: RowCommands) -> Result<(), String> {
    match command {
        RowCommands::Add {
            schedule_id,
            position_id,
        } => {
            let schedule = client
                .get_schedule(ScheduleId::from_raw(schedule_id))
                .map_err(|e| e.to_string())?;
            let mut session = session_with_settings(schedule, settings);
            let row = session
                .create_row(client, PositionId::from_raw(position_id))
                .map_err(|e| e.to_string())?;
            println!("Added row {} ({})", row.id, row.label());
            Ok(())
        }

        RowCommands::Update {
            schedule_id,
            row_id,
            salary_handling,
            rate_override,
            clear_rate_override,
            amount_override,
            clear_amount_override,
        } => {
            let patch = RowPatch {
                salary_handling: salary_handling.map(Into::into),
                rate_override: override_patch(rate_override, clear_rate_override),
                amount_override: override_patch(amount_override, clear_amount_override),
            };
            if patch == RowPatch::default() {
                return Err("nothing to update".to_string());
            }
            let schedule = client
                .get_schedule(ScheduleId::from_raw(schedule_id))
                .map_err(|e| e.to_string())?;
            let mut session = session_with_settings(schedule, settings);
            session
                .update_row(client, RowId::from_raw(row_id), &patch)
                .map_err(|e| e.to_string())?;
            println!("Updated row {}", row_id);
            Ok(())
        }

        RowCommands::Rm {
            schedule_id,
            row_id,
        } => {
            let schedule = client
                .get_schedule(ScheduleId::from_raw(schedule_id))
                .map_err(|e| e.to_string())?;
            let mut session = session_with_settings(schedule, settings);
            session
                .delete_row(client, RowId::from_raw(row_id))
                .map_err(|e| e.to_string())?;
            println!("Deleted row {}", row_id);
            Ok(())
        }
    }
}

/// None unless the flag pair says otherwise: a value sets, `--clear-*`
/// sends an explicit null.
fn override_patch(value: Option<f64>, clear: bool) -> Option<Option<f64>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

fn session_with_settings(schedule: Schedule, settings: &Settings) -> EditSession {
    let scheduler = FlushScheduler::new(
        Duration::from_millis(settings.sync_debounce_ms),
        Duration::from_millis(settings.sync_max_wait_ms),
    );
    EditSession::with_tuning(schedule, scheduler, settings.sync_chunk_size)
}

fn edit_and_flush(
    client: &StoreClient,
    settings: &Settings,
    schedule_id: i64,
    row_id: i64,
    date: NaiveDate,
    value: &str,
) -> Result<(), String> {
    let schedule = client
        .get_schedule(ScheduleId::from_raw(schedule_id))
        .map_err(|e| e.to_string())?;
    if !schedule.contains_date(date) {
        return Err(format!(
            "{} is outside the schedule range {} - {}",
            date, schedule.date_from, schedule.date_to
        ));
    }

    let mut session = session_with_settings(schedule, settings);
    session
        .edit_cell(RowId::from_raw(row_id), date, value, std::time::Instant::now())
        .map_err(|e| e.to_string())?;
    let report = session.flush(client).map_err(|e| e.to_string())?;
    log::debug!("flush confirmed {} cells", report.cells_confirmed);

    if value.trim().is_empty() {
        println!("Cleared {} / {}", row_id, date);
    } else {
        println!("Set {} / {} = {}", row_id, date, value);
    }
    Ok(())
}

fn print_schedule(schedule: &Schedule, with_days: bool) {
    println!(
        "{} ({} - {})",
        schedule.title,
        schedule.date_from.format("%d.%m.%Y"),
        schedule.date_to.format("%d.%m.%Y"),
    );
    println!();

    let label_width = schedule
        .rows
        .iter()
        .map(|r| r.label().chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    println!("{:<label_width$}  {:>9}  {:>12}", "Position", "Units", "Amount");
    for row in &schedule.rows {
        let total = payroll::row_total(schedule, row);
        println!(
            "{:<label_width$}  {:>9.2}  {:>12.2}",
            row.label(),
            total.units,
            total.amount
        );
    }

    println!();
    println!("Grand total: {:.2}", payroll::grand_amount(schedule));
    if let Some(percent) = payroll::labor_cost_percent(schedule) {
        println!(
            "Planned revenue: {:.2} (labor {:.1}%)",
            schedule.planned_revenue.unwrap_or(0.0),
            percent
        );
    }

    if with_days {
        println!();
        for date in schedule.dates() {
            let amount = payroll::day_amount(schedule, date);
            if amount != 0.0 {
                println!("{}  {:>12.2}", date.format("%d.%m"), amount);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set_command() {
        let cli = Cli::parse_from(["sgrid", "set", "12", "3", "2026-07-15", "2x12"]);
        match cli.command {
            Commands::Set {
                schedule_id,
                row_id,
                date,
                value,
            } => {
                assert_eq!(schedule_id, 12);
                assert_eq!(row_id, 3);
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 7, 15).unwrap());
                assert_eq!(value, "2x12");
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_parse_export_defaults() {
        let cli = Cli::parse_from(["sgrid", "export", "12"]);
        match cli.command {
            Commands::Export { format, out, .. } => {
                assert_eq!(format, Format::Xlsx);
                assert_eq!(out, PathBuf::from("."));
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_override_patch_flags() {
        assert_eq!(override_patch(None, false), None);
        assert_eq!(override_patch(Some(250.0), false), Some(Some(250.0)));
        assert_eq!(override_patch(None, true), Some(None));
    }

    #[test]
    fn test_row_update_conflicting_flags_rejected() {
        let result = Cli::try_parse_from([
            "sgrid",
            "row",
            "update",
            "12",
            "3",
            "--rate-override",
            "250",
            "--clear-rate-override",
        ]);
        assert!(result.is_err());
    }
}
