use async_trait::async_trait;
use thiserror::Error;

use runway_core::{CellValue, RunwayError, SheetKind, SheetRange};

/// Transport failures talking to the backing spreadsheet
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spreadsheet returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unknown sheet: {0}")]
    UnknownSheet(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid range: {0}")]
    Range(#[from] RunwayError),
}

/// The four request shapes the store needs from a spreadsheet.
///
/// Reads return row-major, unformatted values with trailing empty cells and
/// rows trimmed, as the spreadsheet API does.
#[async_trait]
pub trait SheetBackend: Send + Sync {
    async fn read_range(&self, range: &SheetRange) -> Result<Vec<Vec<CellValue>>, BackendError>;

    /// Overwrite a rectangular range starting at its top-left cell
    async fn write_range(
        &self,
        range: &SheetRange,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), BackendError>;

    /// Append a row after the last populated row of a sheet
    async fn append_row(&self, sheet: SheetKind, values: Vec<CellValue>)
        -> Result<(), BackendError>;

    /// Internal numeric id of a sheet, needed for structural edits
    async fn sheet_id(&self, sheet: SheetKind) -> Result<i64, BackendError>;

    /// Delete sheet rows `[start, end)` (0-indexed), shifting later rows up
    async fn delete_rows(&self, sheet_id: i64, start: usize, end: usize)
        -> Result<(), BackendError>;
}
