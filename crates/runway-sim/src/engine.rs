use std::collections::BTreeSet;

use runway_core::{ResolvedInput, ResolvedModel};

use crate::error::SimError;
use crate::result::{DayTotal, InputDay, Projection, ScenarioResult};
use crate::scenario::{RunParams, Scenario};

/// Per-input state carried across days within one scenario run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulator {
    /// Full-precision volume; never rounded in place
    pub current_count: f64,
    /// Once set, growth stops for the rest of the run
    pub saturated: bool,
}

impl Accumulator {
    pub fn new(seed: f64) -> Self {
        Self {
            current_count: seed,
            saturated: false,
        }
    }

    /// Advance one day and return the count observed on `day`
    pub fn step(&mut self, input: &ResolvedInput, day: u32, scenario: Scenario) -> f64 {
        if !self.saturated && input.growth_freq != 0.0 {
            self.current_count += self.current_count * (input.growth_percent / input.growth_freq);
        }

        let mut count = round_half_up(self.current_count);
        if input.saturation > 0.0 && count >= input.saturation {
            self.saturated = true;
        }

        for curve in &input.curves {
            count *= curve.multiplier(day);
        }

        let cost_sign = if input.is_cost() { -1.0 } else { 1.0 };
        count += count * input.variability * scenario.sign() * cost_sign;

        count
    }
}

/// Rounds .5 towards positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn daily_revenue(input: &ResolvedInput, count: f64) -> f64 {
    if input.frequency == 0.0 {
        return 0.0;
    }
    count / input.frequency * input.size
}

/// Day-stepped projection of a resolved model
pub struct Simulator<'a> {
    model: &'a ResolvedModel,
    offset: u32,
    last_day: u32,
    hidden: &'a BTreeSet<usize>,
}

impl<'a> Simulator<'a> {
    /// Fails when warm-up plus reported days overflow the day counter
    pub fn new(model: &'a ResolvedModel, params: &'a RunParams) -> Result<Self, SimError> {
        let days = params.days.unwrap_or(model.default_days);
        let offset = params.offset_day.unwrap_or(model.default_offset);
        let last_day = offset
            .checked_add(days)
            .ok_or(SimError::HorizonOverflow { offset, days })?;

        Ok(Self {
            model,
            offset,
            last_day,
            hidden: &params.hidden_inputs,
        })
    }

    /// Run one scenario from fresh accumulators
    pub fn run(&self, scenario: Scenario) -> ScenarioResult {
        let inputs: Vec<&ResolvedInput> = self
            .model
            .inputs
            .iter()
            .filter(|input| !self.hidden.contains(&input.number))
            .collect();
        let mut accumulators: Vec<Accumulator> =
            inputs.iter().map(|input| Accumulator::new(input.seed)).collect();

        let mut result = ScenarioResult::new(scenario);

        for day in 1..=self.last_day {
            let reported = day > self.offset;
            let mut day_revenue = 0.0;

            for (input, acc) in inputs.iter().zip(accumulators.iter_mut()) {
                let count = acc.step(input, day, scenario);
                if !reported {
                    continue;
                }

                let revenue = daily_revenue(input, count);
                if revenue > 0.0 {
                    result.profit += revenue;
                } else {
                    result.loss -= revenue;
                }
                day_revenue += revenue;

                result.series.push(InputDay {
                    input: input.name.clone(),
                    input_number: input.number,
                    day,
                    count,
                    revenue,
                });
            }

            if reported {
                result.totals.push(DayTotal {
                    day,
                    revenue: day_revenue,
                });
            }
        }

        result
    }
}

/// Run low, mid and high scenarios of a model
pub fn simulate(model: &ResolvedModel, params: &RunParams) -> Result<Projection, SimError> {
    let simulator = Simulator::new(model, params)?;
    Ok(Projection {
        selected: params.scenario,
        low: simulator.run(Scenario::Low),
        mid: simulator.run(Scenario::Mid),
        high: simulator.run(Scenario::High),
    })
}
