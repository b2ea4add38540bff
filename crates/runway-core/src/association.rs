use serde::{Deserialize, Serialize};

use crate::codec::FieldValue;
use crate::value::CellValue;

/// One-to-many link from an owner row to related rows of another sheet.
///
/// Order is the order the keys were added; it decides the order resolved
/// entities come back in. Duplicates are kept as stored. Payloads may give a
/// bare key instead of a list; it reads as a one-element association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldValue", into = "Vec<usize>")]
pub struct Association {
    related: Vec<usize>,
}

impl Association {
    pub fn new(related: impl IntoIterator<Item = usize>) -> Self {
        Self {
            related: related.into_iter().collect(),
        }
    }

    /// Read foreign keys out of association cells; blank padding cells are skipped
    pub fn from_cells(cells: &[CellValue]) -> Self {
        let related = cells
            .iter()
            .filter(|cell| !cell.is_empty())
            .filter_map(|cell| {
                let key = cell.as_row_number();
                if key.is_none() {
                    tracing::warn!(cell = %cell.as_text(), "ignoring non-numeric foreign key");
                }
                key
            })
            .collect();
        Self { related }
    }

    pub fn to_cells(&self) -> Vec<CellValue> {
        self.related.iter().map(|&key| CellValue::from(key)).collect()
    }

    pub fn ids(&self) -> &[usize] {
        &self.related
    }

    pub fn add(&mut self, key: usize) {
        self.related.push(key);
    }

    /// Remove the first occurrence of `key`, reporting whether it was present
    pub fn remove(&mut self, key: usize) -> bool {
        match self.related.iter().position(|&k| k == key) {
            Some(index) => {
                self.related.remove(index);
                true
            }
            None => false,
        }
    }
}

impl From<FieldValue> for Association {
    fn from(value: FieldValue) -> Self {
        Association::from_cells(&value.into_list())
    }
}

impl From<Association> for Vec<usize> {
    fn from(assoc: Association) -> Self {
        assoc.related
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cells_skips_padding() {
        let cells = vec![
            CellValue::Number(3.0),
            CellValue::Empty,
            CellValue::Text("5".to_string()),
        ];
        assert_eq!(Association::from_cells(&cells).ids(), &[3, 5]);
    }

    #[test]
    fn test_remove_first_occurrence() {
        let mut assoc = Association::new([2, 4, 2]);
        assert!(assoc.remove(2));
        assert_eq!(assoc.ids(), &[4, 2]);
        assert!(!assoc.remove(9));
    }
}
