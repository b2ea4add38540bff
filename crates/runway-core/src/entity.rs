use serde::{Deserialize, Serialize};

use crate::association::Association;
use crate::codec::{Fields, Record};
use crate::schema::SheetKind;
use crate::value::CellValue;

/// Maps a domain entity onto one row of its sheet
pub trait SheetEntity: Sized {
    const SHEET: SheetKind;

    /// Build the entity from a decoded row, coercing cell types as needed
    fn from_record(record: &Record) -> Self;

    /// Scalar columns, keyed by header name
    fn to_fields(&self) -> Fields;

    /// Cells written from the association column onwards
    fn overflow(&self) -> Vec<CellValue>;
}

/// A seasonal multiplier curve, resampled to exactly `period` entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curve {
    pub number: usize,
    pub name: String,
    pub period: usize,
    pub curve: Vec<f64>,
}

impl Curve {
    /// Multiplier applied on simulated day `day`
    pub fn multiplier(&self, day: u32) -> f64 {
        if self.period == 0 {
            return 1.0;
        }
        self.curve
            .get(day as usize % self.period)
            .copied()
            .unwrap_or(1.0)
    }
}

/// A curve as stored: the raw multipliers may have any length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveRecord {
    #[serde(default)]
    pub number: usize,
    pub name: String,
    pub period: usize,
    #[serde(default)]
    pub curve: Vec<f64>,
}

impl CurveRecord {
    /// Resample the raw multipliers to the declared period
    pub fn resample(&self) -> Curve {
        Curve {
            number: self.number,
            name: self.name.clone(),
            period: self.period,
            curve: resample_curve(&self.curve, self.period),
        }
    }
}

/// Nearest-index resampling: `out[i] = raw[floor(i * L / P)]`.
///
/// Values are selected, never blended. An empty raw curve yields neutral
/// multipliers.
pub fn resample_curve(raw: &[f64], period: usize) -> Vec<f64> {
    if raw.is_empty() {
        return vec![1.0; period];
    }
    (0..period).map(|i| raw[i * raw.len() / period]).collect()
}

impl SheetEntity for CurveRecord {
    const SHEET: SheetKind = SheetKind::Curves;

    /// Blank cells inside the curve read as 0 so later points keep their
    /// index; only trailing blanks are dropped.
    fn from_record(record: &Record) -> Self {
        let cells = record.list("curve");
        let len = cells.iter().rposition(|cell| !cell.is_empty()).map_or(0, |i| i + 1);

        Self {
            number: record.number,
            name: record.get("name").as_text(),
            period: count(record.get("period")) as usize,
            curve: cells[..len].iter().map(CellValue::number_or_zero).collect(),
        }
    }

    fn to_fields(&self) -> Fields {
        Fields::from([
            ("name".to_string(), CellValue::from(self.name.as_str())),
            ("period".to_string(), CellValue::from(self.period)),
        ])
    }

    fn overflow(&self) -> Vec<CellValue> {
        self.curve.iter().copied().map(CellValue::Number).collect()
    }
}

/// A recurring revenue or cost source.
///
/// `C` is the curve link: an [`Association`] as stored, or the resolved
/// curves once dereferenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input<C> {
    #[serde(default)]
    pub number: usize,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    pub frequency: f64,
    /// Value per unit; negative sizes are costs
    pub size: f64,
    #[serde(default)]
    pub growth_percent: f64,
    #[serde(default)]
    pub growth_freq: f64,
    #[serde(default)]
    pub saturation: f64,
    pub seed: f64,
    #[serde(default)]
    pub variability: f64,
    #[serde(default)]
    pub curves: C,
}

pub type InputRecord = Input<Association>;
pub type ResolvedInput = Input<Vec<Curve>>;

impl<C> Input<C> {
    pub fn is_cost(&self) -> bool {
        self.size <= 0.0
    }

    /// Same input with a different curve link
    pub fn with_curves<D>(&self, curves: D) -> Input<D> {
        Input {
            number: self.number,
            name: self.name.clone(),
            notes: self.notes.clone(),
            frequency: self.frequency,
            size: self.size,
            growth_percent: self.growth_percent,
            growth_freq: self.growth_freq,
            saturation: self.saturation,
            seed: self.seed,
            variability: self.variability,
            curves,
        }
    }
}

impl SheetEntity for InputRecord {
    const SHEET: SheetKind = SheetKind::Inputs;

    fn from_record(record: &Record) -> Self {
        Self {
            number: record.number,
            name: record.get("name").as_text(),
            notes: record.get("notes").as_text(),
            frequency: record.get("frequency").number_or_zero(),
            size: record.get("size").number_or_zero(),
            growth_percent: record.get("growthPercent").number_or_zero(),
            growth_freq: record.get("growthFreq").number_or_zero(),
            saturation: record.get("saturation").number_or_zero(),
            seed: record.get("seed").number_or_zero(),
            variability: record.get("variability").number_or_zero(),
            curves: Association::from_cells(record.list("curves")),
        }
    }

    fn to_fields(&self) -> Fields {
        Fields::from([
            ("name".to_string(), CellValue::from(self.name.as_str())),
            ("notes".to_string(), CellValue::from(self.notes.as_str())),
            ("frequency".to_string(), CellValue::Number(self.frequency)),
            ("size".to_string(), CellValue::Number(self.size)),
            ("growthPercent".to_string(), CellValue::Number(self.growth_percent)),
            ("growthFreq".to_string(), CellValue::Number(self.growth_freq)),
            ("saturation".to_string(), CellValue::Number(self.saturation)),
            ("seed".to_string(), CellValue::Number(self.seed)),
            ("variability".to_string(), CellValue::Number(self.variability)),
        ])
    }

    fn overflow(&self) -> Vec<CellValue> {
        self.curves.to_cells()
    }
}

/// A projection model: a named bundle of inputs with default run lengths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model<I> {
    #[serde(default)]
    pub number: usize,
    pub name: String,
    pub default_days: u32,
    #[serde(default)]
    pub default_offset: u32,
    #[serde(default)]
    pub inputs: I,
}

pub type ModelRecord = Model<Association>;
pub type ResolvedModel = Model<Vec<ResolvedInput>>;

impl<I> Model<I> {
    pub fn with_inputs<J>(&self, inputs: J) -> Model<J> {
        Model {
            number: self.number,
            name: self.name.clone(),
            default_days: self.default_days,
            default_offset: self.default_offset,
            inputs,
        }
    }
}

impl SheetEntity for ModelRecord {
    const SHEET: SheetKind = SheetKind::Models;

    fn from_record(record: &Record) -> Self {
        Self {
            number: record.number,
            name: record.get("name").as_text(),
            default_days: count(record.get("defaultDays")),
            default_offset: count(record.get("defaultOffset")),
            inputs: Association::from_cells(record.list("inputs")),
        }
    }

    fn to_fields(&self) -> Fields {
        Fields::from([
            ("name".to_string(), CellValue::from(self.name.as_str())),
            ("defaultDays".to_string(), CellValue::from(self.default_days as usize)),
            ("defaultOffset".to_string(), CellValue::from(self.default_offset as usize)),
        ])
    }

    fn overflow(&self) -> Vec<CellValue> {
        self.inputs.to_cells()
    }
}

/// Non-negative whole number from a cell
fn count(cell: &CellValue) -> u32 {
    cell.number_or_zero().max(0.0).round() as u32
}
