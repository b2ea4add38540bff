use serde::{Deserialize, Serialize};

/// A single cell as exchanged with the backing spreadsheet.
///
/// The store only ever sees JSON primitives, so this mirrors them directly.
/// Empty cells travel as `""`, which the spreadsheet treats as a cleared cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl CellValue {
    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Empty => None,
        }
    }

    /// Numeric coercion used by entity decoding; anything unparseable reads as zero
    pub fn number_or_zero(&self) -> f64 {
        self.as_number().filter(|n| n.is_finite()).unwrap_or(0.0)
    }

    /// Interpret the cell as a 1-based row number
    pub fn as_row_number(&self) -> Option<usize> {
        let n = self.as_number()?;
        if n >= 1.0 && n.fract() == 0.0 {
            Some(n as usize)
        } else {
            None
        }
    }

    /// Get the value as a string
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Bool(b) => CellValue::Boolean(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
            serde_json::Value::String(s) if s.is_empty() => CellValue::Empty,
            serde_json::Value::String(s) => CellValue::Text(s),
            // Nested values never come back from a values range; keep their text
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<CellValue> for serde_json::Value {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Empty => serde_json::Value::String(String::new()),
            CellValue::Number(n) => serde_json::Number::from_f64(n)
                .map_or(serde_json::Value::String(String::new()), serde_json::Value::Number),
            CellValue::Text(s) => serde_json::Value::String(s),
            CellValue::Boolean(b) => serde_json::Value::Bool(b),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_value_as_number() {
        assert_eq!(CellValue::Number(42.0).as_number(), Some(42.0));
        assert_eq!(CellValue::Boolean(true).as_number(), Some(1.0));
        assert_eq!(CellValue::Text(" 123 ".to_string()).as_number(), Some(123.0));
        assert_eq!(CellValue::Empty.as_number(), None);
        assert_eq!(CellValue::Text("abc".to_string()).number_or_zero(), 0.0);
    }

    #[test]
    fn test_row_number() {
        assert_eq!(CellValue::Number(3.0).as_row_number(), Some(3));
        assert_eq!(CellValue::Text("7".to_string()).as_row_number(), Some(7));
        assert_eq!(CellValue::Number(0.0).as_row_number(), None);
        assert_eq!(CellValue::Number(2.5).as_row_number(), None);
        assert_eq!(CellValue::Empty.as_row_number(), None);
    }

    #[test]
    fn test_json_primitives() {
        let row: Vec<CellValue> = serde_json::from_value(json!(["a", 2, true, "", null])).unwrap();
        assert_eq!(
            row,
            vec![
                CellValue::Text("a".to_string()),
                CellValue::Number(2.0),
                CellValue::Boolean(true),
                CellValue::Empty,
                CellValue::Empty,
            ]
        );

        let back = serde_json::to_value(&row).unwrap();
        assert_eq!(back, json!(["a", 2.0, true, "", ""]));
    }
}
