//! Tabular record codec.
//!
//! A sheet is a rectangular block whose first row names the fields. Every
//! following row decodes into a [`Record`]; the last declared field is always
//! array-valued and receives every cell from its column onwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::CellValue;

/// Named scalar fields of a row, in the shape callers hand to mutations
pub type Fields = BTreeMap<String, CellValue>;

/// A decoded field: positional fields are scalars, the trailing field is a list.
///
/// Records built outside the codec (API payloads) may carry a bare scalar in
/// the list position; see [`Record::normalize_list`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Many(Vec<CellValue>),
    One(CellValue),
}

impl FieldValue {
    pub fn into_list(self) -> Vec<CellValue> {
        match self {
            FieldValue::Many(values) => values,
            FieldValue::One(value) => vec![value],
        }
    }
}

/// One data row of a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based row number within the data block (header excluded)
    pub number: usize,
    pub fields: BTreeMap<String, FieldValue>,
}

static EMPTY: CellValue = CellValue::Empty;

impl Record {
    /// Scalar field lookup; absent fields read as empty
    pub fn get(&self, name: &str) -> &CellValue {
        match self.fields.get(name) {
            Some(FieldValue::One(value)) => value,
            Some(FieldValue::Many(values)) => values.first().unwrap_or(&EMPTY),
            None => &EMPTY,
        }
    }

    /// List field lookup; absent fields read as an empty list
    pub fn list(&self, name: &str) -> &[CellValue] {
        match self.fields.get(name) {
            Some(FieldValue::Many(values)) => values,
            Some(FieldValue::One(value)) => std::slice::from_ref(value),
            None => &[],
        }
    }

    /// Wrap a bare scalar in the list field into a one-element list.
    ///
    /// Only the scalar-to-singleton case is coerced; nothing else changes.
    pub fn normalize_list(&mut self, name: &str) {
        let normalized = match self.fields.remove(name) {
            Some(FieldValue::One(value)) => FieldValue::Many(vec![value]),
            Some(many) => many,
            None => FieldValue::Many(Vec::new()),
        };
        self.fields.insert(name.to_string(), normalized);
    }
}

/// Decode a header-first block into records
pub fn decode_block(block: &[Vec<CellValue>]) -> Vec<Record> {
    let Some((header, rows)) = block.split_first() else {
        return Vec::new();
    };
    let names: Vec<String> = header.iter().map(CellValue::as_text).collect();

    rows.iter()
        .enumerate()
        .map(|(index, row)| decode_row(&names, index + 1, row))
        .collect()
}

fn decode_row(names: &[String], number: usize, row: &[CellValue]) -> Record {
    let mut fields = BTreeMap::new();

    if let Some((last, positional)) = names.split_last() {
        for (col, name) in positional.iter().enumerate() {
            let value = row.get(col).cloned().unwrap_or_default();
            fields.insert(name.clone(), FieldValue::One(value));
        }
        let overflow = row.get(positional.len()..).unwrap_or_default().to_vec();
        fields.insert(last.clone(), FieldValue::Many(overflow));
    }

    Record { number, fields }
}

/// Build a value row for a sheet from its header row.
///
/// Each header except the last is looked up in `fields`; the overflow cells
/// follow. Missing fields are written as empty cells with a warning.
pub fn build_row(header: &[CellValue], fields: &Fields, overflow: &[CellValue]) -> Vec<CellValue> {
    let positional = header.len().saturating_sub(1);
    let mut row = Vec::with_capacity(positional + overflow.len());

    for name in header.iter().take(positional).map(CellValue::as_text) {
        match fields.get(&name) {
            Some(value) => row.push(value.clone()),
            None => {
                tracing::warn!(field = %name, "field missing from row, writing empty cell");
                row.push(CellValue::Empty);
            }
        }
    }
    row.extend_from_slice(overflow);

    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[f64]) -> Vec<CellValue> {
        values.iter().copied().map(CellValue::Number).collect()
    }

    fn header(names: &[&str]) -> Vec<CellValue> {
        names.iter().map(|n| CellValue::from(*n)).collect()
    }

    #[test]
    fn test_overflow_folds_into_last_field() {
        let block = vec![header(&["a", "b", "c"]), cells(&[1.0, 2.0, 3.0, 4.0, 5.0])];
        let records = decode_block(&block);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.number, 1);
        assert_eq!(record.get("a"), &CellValue::Number(1.0));
        assert_eq!(record.get("b"), &CellValue::Number(2.0));
        assert_eq!(record.list("c"), cells(&[3.0, 4.0, 5.0]).as_slice());
    }

    #[test]
    fn test_empty_overflow_is_empty_list() {
        let block = vec![header(&["a", "b", "c"]), cells(&[1.0, 2.0])];
        let record = &decode_block(&block)[0];

        assert_eq!(record.fields.get("c"), Some(&FieldValue::Many(Vec::new())));
    }

    #[test]
    fn test_short_rows_and_numbering() {
        let block = vec![header(&["a", "b", "c"]), cells(&[1.0]), vec![], cells(&[7.0, 8.0, 9.0])];
        let records = decode_block(&block);

        assert_eq!(records.iter().map(|r| r.number).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(records[0].get("b"), &CellValue::Empty);
        assert!(records[1].list("c").is_empty());
        assert_eq!(records[2].list("c"), cells(&[9.0]).as_slice());
    }

    #[test]
    fn test_empty_block() {
        assert!(decode_block(&[]).is_empty());
        assert!(decode_block(&[header(&["a", "b"])]).is_empty());
    }

    #[test]
    fn test_normalize_scalar_list() {
        let mut record = Record {
            number: 4,
            fields: BTreeMap::from([("c".to_string(), FieldValue::One(CellValue::Number(3.0)))]),
        };
        record.normalize_list("c");
        assert_eq!(
            record.fields.get("c"),
            Some(&FieldValue::Many(vec![CellValue::Number(3.0)]))
        );

        record.normalize_list("missing");
        assert_eq!(record.fields.get("missing"), Some(&FieldValue::Many(Vec::new())));
    }

    #[test]
    fn test_build_row_orders_by_header() {
        let fields = Fields::from([
            ("b".to_string(), CellValue::Number(2.0)),
            ("a".to_string(), CellValue::from("x")),
        ]);
        let row = build_row(&header(&["a", "b", "c"]), &fields, &cells(&[5.0, 6.0]));

        assert_eq!(
            row,
            vec![
                CellValue::from("x"),
                CellValue::Number(2.0),
                CellValue::Number(5.0),
                CellValue::Number(6.0),
            ]
        );
    }

    #[test]
    fn test_build_row_blanks_missing_fields() {
        let fields = Fields::from([("a".to_string(), CellValue::Number(1.0))]);
        let row = build_row(&header(&["a", "b", "c"]), &fields, &[]);

        assert_eq!(row, vec![CellValue::Number(1.0), CellValue::Empty]);
    }

    #[test]
    fn test_payload_accepts_scalar_or_list() {
        let one: FieldValue = serde_json::from_str("3").unwrap();
        assert_eq!(one, FieldValue::One(CellValue::Number(3.0)));
        let many: FieldValue = serde_json::from_str("[3, 4]").unwrap();
        assert_eq!(many.into_list(), cells(&[3.0, 4.0]));
    }
}
