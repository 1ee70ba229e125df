//! REST API over a finished projection run.
//!
//! Provides four GET endpoints:
//! - `/config` - project configuration and derived battery figures
//! - `/scenarios` - summary of every projected scenario
//! - `/scenarios/{name}` - one scenario with its full period table
//! - `/scenarios/{name}/periods` - period rows with optional range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::config::ProjectConfig;
use crate::model::{ProjectOverview, ProjectionReport, ScenarioEngine};
use crate::reference::StaticPriceSource;

pub use types::{ConfigResponse, ErrorResponse, PeriodQuery, ScenarioResponse, ScenariosResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once after the projection run and wrapped in `Arc`; handlers only read.
pub struct AppState {
    pub config: ProjectConfig,
    pub overview: ProjectOverview,
    pub report: ProjectionReport,
}

impl AppState {
    pub fn new(config: ProjectConfig, engine: &ScenarioEngine, report: ProjectionReport) -> Self {
        Self {
            config,
            overview: ProjectOverview::new(engine, &StaticPriceSource),
            report,
        }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared config, overview and projected report
///
/// # Returns
///
/// A router serving `/config`, `/scenarios`, `/scenarios/{name}` and
/// `/scenarios/{name}/periods`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/config", get(handlers::get_config))
        .route("/scenarios", get(handlers::list_scenarios))
        .route("/scenarios/{name}", get(handlers::get_scenario))
        .route("/scenarios/{name}/periods", get(handlers::get_periods))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
