use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use runway_core::{CellValue, SheetKind, SheetRange, Span};

use super::backend::{BackendError, SheetBackend};

struct MemorySheet {
    id: i64,
    rows: Vec<Vec<CellValue>>,
}

/// In-process spreadsheet with the same read/write semantics as the remote API
pub struct MemorySheets {
    sheets: RwLock<HashMap<SheetKind, MemorySheet>>,
}

impl MemorySheets {
    /// A spreadsheet with no sheets at all
    pub fn new() -> Self {
        Self {
            sheets: RwLock::new(HashMap::new()),
        }
    }

    /// A spreadsheet with the three entity sheets and their header rows
    pub fn with_schema() -> Self {
        let sheets = SheetKind::ALL
            .into_iter()
            .enumerate()
            .map(|(index, kind)| {
                let header = kind.headers().iter().map(|h| CellValue::from(*h)).collect();
                let sheet = MemorySheet {
                    id: 1000 + index as i64,
                    rows: vec![header],
                };
                (kind, sheet)
            })
            .collect();
        Self {
            sheets: RwLock::new(sheets),
        }
    }

    /// Replace the full contents of a sheet, creating it if needed
    pub async fn set_rows(&self, sheet: SheetKind, rows: Vec<Vec<CellValue>>) {
        let mut sheets = self.sheets.write().await;
        let next_id = 1000 + sheets.len() as i64;
        sheets
            .entry(sheet)
            .or_insert_with(|| MemorySheet {
                id: next_id,
                rows: Vec::new(),
            })
            .rows = rows;
    }

    /// Current contents of a sheet, trimmed like a read
    pub async fn rows(&self, sheet: SheetKind) -> Vec<Vec<CellValue>> {
        let sheets = self.sheets.read().await;
        sheets
            .get(&sheet)
            .map(|s| trimmed(&s.rows))
            .unwrap_or_default()
    }
}

impl Default for MemorySheets {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_row(row: &[CellValue]) -> Vec<CellValue> {
    let len = row.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
    row[..len].to_vec()
}

fn trimmed(rows: &[Vec<CellValue>]) -> Vec<Vec<CellValue>> {
    let mut out: Vec<Vec<CellValue>> = rows.iter().map(|r| trim_row(r)).collect();
    while out.last().is_some_and(|r| r.is_empty()) {
        out.pop();
    }
    out
}

fn unknown(sheet: SheetKind) -> BackendError {
    BackendError::UnknownSheet(sheet.sheet_name().to_string())
}

#[async_trait]
impl SheetBackend for MemorySheets {
    async fn read_range(&self, range: &SheetRange) -> Result<Vec<Vec<CellValue>>, BackendError> {
        let sheets = self.sheets.read().await;
        let sheet = sheets.get(&range.sheet).ok_or_else(|| unknown(range.sheet))?;

        let values = match range.span {
            Span::Sheet => sheet.rows.clone(),
            Span::Cells(cells) => sheet
                .rows
                .iter()
                .skip(cells.start.row)
                .take(cells.row_count())
                .map(|row| {
                    row.iter()
                        .skip(cells.start.col)
                        .take(cells.col_count())
                        .cloned()
                        .collect()
                })
                .collect(),
        };
        Ok(trimmed(&values))
    }

    async fn write_range(
        &self,
        range: &SheetRange,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), BackendError> {
        let mut sheets = self.sheets.write().await;
        let sheet = sheets
            .get_mut(&range.sheet)
            .ok_or_else(|| unknown(range.sheet))?;

        let (start_row, start_col) = match range.span {
            Span::Sheet => (0, 0),
            Span::Cells(cells) => (cells.start.row, cells.start.col),
        };

        for (i, values) in values.into_iter().enumerate() {
            let row_index = start_row + i;
            if sheet.rows.len() <= row_index {
                sheet.rows.resize(row_index + 1, Vec::new());
            }
            let row = &mut sheet.rows[row_index];
            if row.len() < start_col + values.len() {
                row.resize(start_col + values.len(), CellValue::Empty);
            }
            for (j, value) in values.into_iter().enumerate() {
                row[start_col + j] = value;
            }
        }
        Ok(())
    }

    async fn append_row(
        &self,
        sheet: SheetKind,
        values: Vec<CellValue>,
    ) -> Result<(), BackendError> {
        let mut sheets = self.sheets.write().await;
        let target = sheets.get_mut(&sheet).ok_or_else(|| unknown(sheet))?;

        while target.rows.last().is_some_and(|r| r.iter().all(CellValue::is_empty)) {
            target.rows.pop();
        }
        target.rows.push(values);
        Ok(())
    }

    async fn sheet_id(&self, sheet: SheetKind) -> Result<i64, BackendError> {
        let sheets = self.sheets.read().await;
        sheets.get(&sheet).map(|s| s.id).ok_or_else(|| unknown(sheet))
    }

    async fn delete_rows(
        &self,
        sheet_id: i64,
        start: usize,
        end: usize,
    ) -> Result<(), BackendError> {
        let mut sheets = self.sheets.write().await;
        let sheet = sheets
            .values_mut()
            .find(|s| s.id == sheet_id)
            .ok_or_else(|| BackendError::UnknownSheet(sheet_id.to_string()))?;

        let end = end.min(sheet.rows.len());
        if start < end {
            sheet.rows.drain(start..end);
        }
        Ok(())
    }
}
