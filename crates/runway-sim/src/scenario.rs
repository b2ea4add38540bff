use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Projection band
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Low,
    #[default]
    Mid,
    High,
}

impl Scenario {
    /// Direction variability pushes counts in
    pub fn sign(self) -> f64 {
        match self {
            Scenario::Low => -1.0,
            Scenario::Mid => 0.0,
            Scenario::High => 1.0,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Low => write!(f, "low"),
            Scenario::Mid => write!(f, "mid"),
            Scenario::High => write!(f, "high"),
        }
    }
}

/// Caller options for a model run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunParams {
    /// Scenario the caller is looking at; all three are computed regardless
    #[serde(default)]
    pub scenario: Scenario,
    /// Reported days; defaults to the model's `defaultDays`
    #[serde(default)]
    pub days: Option<u32>,
    /// Warm-up days simulated but not reported; defaults to `defaultOffset`
    #[serde(default)]
    pub offset_day: Option<u32>,
    /// Input row numbers left out of the run
    #[serde(default)]
    pub hidden_inputs: BTreeSet<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_from_json() {
        let params: RunParams =
            serde_json::from_str(r#"{"scenario":"high","offsetDay":3,"hiddenInputs":[2]}"#)
                .unwrap();
        assert_eq!(params.scenario, Scenario::High);
        assert_eq!(params.days, None);
        assert_eq!(params.offset_day, Some(3));
        assert!(params.hidden_inputs.contains(&2));
    }
}
