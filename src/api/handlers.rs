//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ConfigResponse, ErrorResponse, PeriodQuery, ScenarioResponse, ScenariosResponse};
use crate::model::report::ProjectionSummary;
use crate::model::types::{PeriodRow, ProjectionResult};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found(name: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("unknown scenario \"{name}\""),
        }),
    )
}

fn find<'a>(state: &'a AppState, name: &str) -> Result<&'a ProjectionResult, ApiError> {
    state.report.get(name).ok_or_else(|| not_found(name))
}

/// `GET /config` → 200 + `ConfigResponse` JSON
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        config: state.config.clone(),
        overview: state.overview.clone(),
    })
}

/// `GET /scenarios` → 200 + `ScenariosResponse` JSON, in projection order
pub async fn list_scenarios(State(state): State<Arc<AppState>>) -> Json<ScenariosResponse> {
    let report = &state.report;
    Json(ScenariosResponse {
        scenarios: report.summaries(),
        failures: report.failures.clone(),
        best_by_npv: report.best_by_npv().map(|r| r.scenario.clone()),
        fastest_payback: report.fastest_payback().map(|r| r.scenario.clone()),
    })
}

/// Returns one scenario with summary and full result.
///
/// `GET /scenarios/{name}` → 200 + `ScenarioResponse` JSON
/// `GET /scenarios/missing` → 404 + `ErrorResponse`
pub async fn get_scenario(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ScenarioResponse>, ApiError> {
    let result = find(&state, &name)?;
    Ok(Json(ScenarioResponse {
        summary: ProjectionSummary::from_result(result),
        result: result.clone(),
    }))
}

/// Returns period rows, optionally filtered by period range.
///
/// `GET /scenarios/{name}/periods` → 200 + `Vec<PeriodRow>` JSON
/// `GET /scenarios/{name}/periods?from=N&to=M` → filtered range (inclusive)
/// `GET /scenarios/{name}/periods?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_periods(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<PeriodRow>>, ApiError> {
    let from = query.from.unwrap_or(1);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let result = find(&state, &name)?;
    let rows: Vec<PeriodRow> = result
        .rows
        .iter()
        .filter(|r| r.period >= from && r.period <= to)
        .cloned()
        .collect();

    Ok(Json(rows))
}
