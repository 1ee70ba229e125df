//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::config::ProjectConfig;
use crate::model::report::{ProjectOverview, ProjectionSummary, ScenarioFailure};
use crate::model::types::ProjectionResult;

/// `GET /config` body.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config: ProjectConfig,
    pub overview: ProjectOverview,
}

/// `GET /scenarios` body.
#[derive(Debug, Serialize)]
pub struct ScenariosResponse {
    pub scenarios: Vec<ProjectionSummary>,
    /// Scenarios that could not be projected.
    pub failures: Vec<ScenarioFailure>,
    pub best_by_npv: Option<String>,
    pub fastest_payback: Option<String>,
}

/// `GET /scenarios/{name}` body.
#[derive(Debug, Serialize)]
pub struct ScenarioResponse {
    pub summary: ProjectionSummary,
    pub result: ProjectionResult,
}

/// Optional range query parameters for the periods endpoint.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// First period (inclusive, 1-based).
    pub from: Option<usize>,
    /// Last period (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
