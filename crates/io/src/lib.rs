//! Client-side schedule export.
//!
//! Three artifacts, all pure reads of an in-memory [`Schedule`] snapshot:
//! an XLSX workbook (OOXML parts in a ZIP container written from scratch,
//! no spreadsheet or archive library), a JPEG raster of the same grid, and
//! a CSV dump. Nothing here talks to the remote store.

pub mod csv_export;
pub mod raster;
pub mod xlsx;
pub mod zip;

mod font;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use shiftgrid_engine::schedule::Schedule;

/// Error type for export operations. One failure condition; the cause
/// rides along.
#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    /// Image/JPEG encoding failed.
    Encode(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "Export failed: {}", e),
            ExportError::Encode(msg) => write!(f, "Export failed: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Encode(_) => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Turn a schedule title into a safe filename stem: forbidden path
/// characters and control characters become underscores.
pub fn sanitize_filename(title: &str) -> String {
    static FORBIDDEN: OnceLock<Regex> = OnceLock::new();
    let re = FORBIDDEN.get_or_init(|| {
        Regex::new(r#"[/\\?%*:|"<>\x00-\x1f]"#).expect("filename pattern is valid")
    });
    let cleaned = re.replace_all(title.trim(), "_").to_string();
    if cleaned.is_empty() {
        "schedule".to_string()
    } else {
        cleaned
    }
}

/// Write `<title>.xlsx` into `dir`. Returns the written path.
pub fn export_workbook(schedule: &Schedule, dir: &Path) -> Result<PathBuf, ExportError> {
    let bytes = xlsx::workbook_archive(schedule, chrono::Local::now().naive_local());
    let path = dir.join(format!("{}.xlsx", sanitize_filename(&schedule.title)));
    std::fs::write(&path, &bytes)?;
    log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// Write `<title>.jpg` into `dir`. Returns the written path.
pub fn export_image(schedule: &Schedule, dir: &Path, quality: u8) -> Result<PathBuf, ExportError> {
    let bytes = raster::render_jpeg(schedule, quality)?;
    let path = dir.join(format!("{}.jpg", sanitize_filename(&schedule.title)));
    std::fs::write(&path, &bytes)?;
    log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// Write `<title>.csv` into `dir`. Returns the written path.
pub fn export_csv(schedule: &Schedule, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{}.csv", sanitize_filename(&schedule.title)));
    csv_export::write_csv(schedule, &path)?;
    Ok(path)
}
