use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scenario::Scenario;

/// One input's projected volume and revenue on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDay {
    pub input: String,
    pub input_number: usize,
    pub day: u32,
    pub count: f64,
    pub revenue: f64,
}

/// Revenue summed across visible inputs for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotal {
    pub day: u32,
    pub revenue: f64,
}

/// Output of a single scenario run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub series: Vec<InputDay>,
    pub totals: Vec<DayTotal>,
    /// Sum of positive daily revenues
    pub profit: f64,
    /// Magnitude of the sum of negative daily revenues
    pub loss: f64,
}

impl ScenarioResult {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            series: Vec::new(),
            totals: Vec::new(),
            profit: 0.0,
            loss: 0.0,
        }
    }

    pub fn net(&self) -> f64 {
        self.profit - self.loss
    }

    /// Running total of daily revenue
    pub fn cumulative(&self) -> Vec<DayTotal> {
        self.totals
            .iter()
            .scan(0.0, |acc, total| {
                *acc += total.revenue;
                Some(DayTotal {
                    day: total.day,
                    revenue: *acc,
                })
            })
            .collect()
    }

    /// Total revenue per input row number over the reported days
    pub fn input_totals(&self) -> BTreeMap<usize, f64> {
        let mut totals = BTreeMap::new();
        for point in &self.series {
            *totals.entry(point.input_number).or_insert(0.0) += point.revenue;
        }
        totals
    }

    /// The series of a single input, in day order
    pub fn series_for(&self, input_number: usize) -> impl Iterator<Item = &InputDay> {
        self.series
            .iter()
            .filter(move |point| point.input_number == input_number)
    }
}

/// Figures derived from one scenario's series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub scenario: Scenario,
    pub net: f64,
    pub cumulative: Vec<DayTotal>,
    pub input_totals: BTreeMap<usize, f64>,
}

impl From<&ScenarioResult> for ScenarioSummary {
    fn from(result: &ScenarioResult) -> Self {
        Self {
            scenario: result.scenario,
            net: result.net(),
            cumulative: result.cumulative(),
            input_totals: result.input_totals(),
        }
    }
}

/// All three scenarios of a model run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub selected: Scenario,
    pub low: ScenarioResult,
    pub mid: ScenarioResult,
    pub high: ScenarioResult,
}

impl Projection {
    pub fn get(&self, scenario: Scenario) -> &ScenarioResult {
        match scenario {
            Scenario::Low => &self.low,
            Scenario::Mid => &self.mid,
            Scenario::High => &self.high,
        }
    }

    /// Result for the scenario the caller asked to look at
    pub fn selected(&self) -> &ScenarioResult {
        self.get(self.selected)
    }

    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary::from(self.selected())
    }
}
