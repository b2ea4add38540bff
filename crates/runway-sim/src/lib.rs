pub mod engine;
pub mod error;
pub mod result;
pub mod scenario;

pub use engine::{simulate, Accumulator, Simulator};
pub use error::SimError;
pub use result::{DayTotal, InputDay, Projection, ScenarioResult, ScenarioSummary};
pub use scenario::{RunParams, Scenario};
