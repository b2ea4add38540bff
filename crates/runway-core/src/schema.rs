use serde::{Deserialize, Serialize};
use std::fmt;

/// The three sheets that make up a Runway workbook.
///
/// Every schema declares its association column last: the codec folds all
/// trailing cells of a row into that column.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum SheetKind {
    Models,
    Inputs,
    Curves,
}

pub const MODEL_HEADERS: &[&str] = &["name", "defaultDays", "defaultOffset", "inputs"];

pub const INPUT_HEADERS: &[&str] = &[
    "name",
    "notes",
    "frequency",
    "size",
    "growthPercent",
    "growthFreq",
    "saturation",
    "seed",
    "variability",
    "curves",
];

pub const CURVE_HEADERS: &[&str] = &["name", "period", "curve"];

impl SheetKind {
    pub const ALL: [SheetKind; 3] = [SheetKind::Models, SheetKind::Inputs, SheetKind::Curves];

    /// Sheet (tab) name in the backing spreadsheet
    pub fn sheet_name(&self) -> &'static str {
        match self {
            SheetKind::Models => "Models",
            SheetKind::Inputs => "Inputs",
            SheetKind::Curves => "Curves",
        }
    }

    /// Header row written when a sheet is created
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            SheetKind::Models => MODEL_HEADERS,
            SheetKind::Inputs => INPUT_HEADERS,
            SheetKind::Curves => CURVE_HEADERS,
        }
    }

    /// Name of the trailing array-valued column
    pub fn association_field(&self) -> &'static str {
        let headers = self.headers();
        headers[headers.len() - 1]
    }
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sheet_name())
    }
}
