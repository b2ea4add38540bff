use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, RunwayError};
use crate::schema::SheetKind;

/// Column labels for indices 0..=77 (A..Z, AA..AZ, BA..BZ).
///
/// Sheets wider than 78 columns are not supported: every schema fits in a
/// handful of columns, and association lists are expected to stay short.
pub const COLUMN_LABELS: [&str; 78] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M",
    "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
    "AA", "AB", "AC", "AD", "AE", "AF", "AG", "AH", "AI", "AJ", "AK", "AL", "AM",
    "AN", "AO", "AP", "AQ", "AR", "AS", "AT", "AU", "AV", "AW", "AX", "AY", "AZ",
    "BA", "BB", "BC", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BK", "BL", "BM",
    "BN", "BO", "BP", "BQ", "BR", "BS", "BT", "BU", "BV", "BW", "BX", "BY", "BZ",
];

/// Convert column index (0-indexed) to its label
pub fn col_to_label(col: usize) -> Result<&'static str> {
    COLUMN_LABELS
        .get(col)
        .copied()
        .ok_or(RunwayError::ColumnOutOfRange(col))
}

/// Cell coordinate (0-indexed internally, row 0 is the header row)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        CellCoord { row, col }
    }

    /// Convert to A1 notation (e.g., (0, 0) -> "A1")
    pub fn to_a1(&self) -> Result<String> {
        Ok(format!("{}{}", col_to_label(self.col)?, self.row + 1))
    }
}

/// A rectangular range of cells (e.g., C3:F3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellCoord,
    pub end: CellCoord,
}

impl CellRange {
    pub fn new(start: CellCoord, end: CellCoord) -> Self {
        // Normalize so start is top-left and end is bottom-right
        CellRange {
            start: CellCoord::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellCoord::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// A horizontal run of `width` cells on one row
    pub fn row_span(row: usize, start_col: usize, width: usize) -> Self {
        let end_col = start_col + width.max(1) - 1;
        CellRange::new(CellCoord::new(row, start_col), CellCoord::new(row, end_col))
    }

    /// Convert to A1:B1 notation
    pub fn to_a1(&self) -> Result<String> {
        if self.start == self.end {
            self.start.to_a1()
        } else {
            Ok(format!("{}:{}", self.start.to_a1()?, self.end.to_a1()?))
        }
    }

    pub fn row_count(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> usize {
        self.end.col - self.start.col + 1
    }
}

/// The part of a sheet a backend request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Span {
    /// Every populated cell of the sheet
    Sheet,
    Cells(CellRange),
}

/// A sheet-qualified range, rendered as `Inputs!C3:F3` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRange {
    pub sheet: SheetKind,
    pub span: Span,
}

impl SheetRange {
    pub fn sheet(sheet: SheetKind) -> Self {
        Self {
            sheet,
            span: Span::Sheet,
        }
    }

    pub fn cells(sheet: SheetKind, range: CellRange) -> Self {
        Self {
            sheet,
            span: Span::Cells(range),
        }
    }

    /// Render in A1 notation, failing for columns past BZ
    pub fn to_a1(&self) -> Result<String> {
        let sheet = self.sheet.sheet_name();
        match self.span {
            Span::Sheet => Ok(sheet.to_string()),
            Span::Cells(range) => Ok(format!("{sheet}!{}", range.to_a1()?)),
        }
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_a1() {
            Ok(a1) => write!(f, "{a1}"),
            Err(_) => write!(f, "{}!<out of range>", self.sheet),
        }
    }
}
