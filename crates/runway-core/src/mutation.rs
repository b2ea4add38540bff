//! Turns a mutation request plus the current sheet contents into the exact
//! cells to write. Executing the write is up to the caller.

use serde::{Deserialize, Serialize};

use crate::association::Association;
use crate::codec::{build_row, Fields};
use crate::error::{Result, RunwayError};
use crate::range::{col_to_label, CellRange, SheetRange};
use crate::schema::SheetKind;
use crate::value::CellValue;

/// A rectangular write of a single row's cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellWrite {
    pub range: SheetRange,
    pub values: Vec<CellValue>,
}

/// A row to append to the end of a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowAppend {
    pub sheet: SheetKind,
    pub values: Vec<CellValue>,
    /// Data row number the appended row will have
    pub number: usize,
}

fn header(sheet: SheetKind, block: &[Vec<CellValue>]) -> Result<&[CellValue]> {
    match block.first() {
        Some(header) if !header.is_empty() => Ok(header),
        _ => Err(RunwayError::MissingHeader(sheet)),
    }
}

/// Data row `number` lives at sheet row index `number` (row 0 is the header)
fn existing_row(sheet: SheetKind, block: &[Vec<CellValue>], number: usize) -> Result<&[CellValue]> {
    if number == 0 {
        return Err(RunwayError::RowNotFound { sheet, row: number });
    }
    block
        .get(number)
        .map(Vec::as_slice)
        .ok_or(RunwayError::RowNotFound { sheet, row: number })
}

pub fn plan_create(
    sheet: SheetKind,
    block: &[Vec<CellValue>],
    fields: &Fields,
    overflow: &[CellValue],
) -> Result<RowAppend> {
    let header = header(sheet, block)?;
    let values = build_row(header, fields, overflow);
    // Columns past BZ cannot be addressed later, so refuse them up front
    col_to_label(values.len().saturating_sub(1))?;

    Ok(RowAppend {
        sheet,
        values,
        number: block.len(),
    })
}

/// Overwrite a whole row.
///
/// The write is padded with empty cells to the current row width so a
/// shorter association list does not leave stale keys behind.
pub fn plan_update(
    sheet: SheetKind,
    block: &[Vec<CellValue>],
    number: usize,
    fields: &Fields,
    overflow: &[CellValue],
) -> Result<CellWrite> {
    let header = header(sheet, block)?;
    let current = existing_row(sheet, block, number)?;
    let mut values = build_row(header, fields, overflow);
    if values.len() < current.len() {
        values.resize(current.len(), CellValue::Empty);
    }

    let range = CellRange::row_span(number, 0, values.len());
    col_to_label(range.end.col)?;

    Ok(CellWrite {
        range: SheetRange::cells(sheet, range),
        values,
    })
}

/// Validate the row and return the `[start, end)` sheet row indices to delete
pub fn plan_delete(sheet: SheetKind, block: &[Vec<CellValue>], number: usize) -> Result<(usize, usize)> {
    existing_row(sheet, block, number)?;
    Ok((number, number + 1))
}

/// Current association of a row, with the cells it occupies
fn row_association(
    sheet: SheetKind,
    block: &[Vec<CellValue>],
    number: usize,
) -> Result<(usize, usize, Association)> {
    let first_list_col = header(sheet, block)?.len() - 1;
    let current = existing_row(sheet, block, number)?;
    let cells = current.get(first_list_col..).unwrap_or_default();
    Ok((first_list_col, cells.len(), Association::from_cells(cells)))
}

/// Rewrite the association cells of a row, blanking any cells it no longer fills
fn write_association(
    sheet: SheetKind,
    number: usize,
    first_list_col: usize,
    occupied: usize,
    association: &Association,
) -> Result<CellWrite> {
    let mut values = association.to_cells();
    if values.len() < occupied {
        values.resize(occupied, CellValue::Empty);
    }

    let range = CellRange::row_span(number, first_list_col, values.len());
    col_to_label(range.end.col)?;

    Ok(CellWrite {
        range: SheetRange::cells(sheet, range),
        values,
    })
}

/// Append `key` to a row's association
pub fn plan_add_association(
    sheet: SheetKind,
    block: &[Vec<CellValue>],
    number: usize,
    key: usize,
) -> Result<CellWrite> {
    let (first_list_col, occupied, mut association) = row_association(sheet, block, number)?;
    association.add(key);
    write_association(sheet, number, first_list_col, occupied, &association)
}

/// Drop the first occurrence of `key` from a row's association.
///
/// The vacated trailing cell is written empty.
pub fn plan_remove_association(
    sheet: SheetKind,
    block: &[Vec<CellValue>],
    number: usize,
    key: usize,
) -> Result<CellWrite> {
    let (first_list_col, occupied, mut association) = row_association(sheet, block, number)?;
    if !association.remove(key) {
        return Err(RunwayError::AssociationNotFound {
            sheet,
            row: number,
            key,
        });
    }
    write_association(sheet, number, first_list_col, occupied, &association)
}
