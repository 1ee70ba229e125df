//! Scenario projection engine: prices, power, cash flows, payback and metrics.

pub mod engine;
pub mod metrics;
/// Break-even detection.
pub mod payback;
/// Effective discharge power.
pub mod power;
/// Compounding price trajectories.
pub mod price;
pub mod report;
pub mod types;

pub use engine::{ScenarioEngine, project};
pub use metrics::compute_metrics;
pub use payback::{Payback, find_payback};
pub use report::{ProjectOverview, ProjectionReport, ProjectionSummary};
pub use types::{PeriodGranularity, PeriodRow, ProjectionResult};
