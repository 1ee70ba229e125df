#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use afrr_sim::api::{AppState, router};
use afrr_sim::config::ProjectConfig;
use afrr_sim::model::{ProjectionReport, ScenarioEngine};

const PROJECT_TOML: &str = r#"
[battery]
capacity_mwh = 2.0
power_rating_mw = 1.0
reserved_capacity_pct = 10.0

[operational]
granularity = "month"
life_periods = 24

[[scenarios]]
preset = "base"

[[scenarios]]
name = "Broken"
preset = "base"
initial_capacity_price = nan
"#;

fn build_state(toml: &str) -> Arc<AppState> {
    let config = ProjectConfig::from_toml_str(toml).expect("valid TOML");
    let engine = ScenarioEngine::new(
        config.battery.clone(),
        config.operational.clone(),
        config.financial.clone(),
    )
    .expect("valid configs");
    let mut scenarios = afrr_sim::scenario::ScenarioSet::new();
    for entry in &config.scenarios {
        let params = entry
            .resolve(config.operational.granularity, "scenarios")
            .expect("entry resolves");
        let name = if entry.name.is_empty() {
            "Base".to_string()
        } else {
            entry.name.clone()
        };
        scenarios.insert(name, params);
    }
    let report = ProjectionReport::run(&engine, &scenarios);
    Arc::new(AppState::new(config, &engine, report))
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn monthly_project_serves_config_and_failures() {
    let state = build_state(PROJECT_TOML);

    let (status, json) = get(state.clone(), "/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["config"]["operational"]["granularity"], "month");
    common::assert_close(
        json["overview"]["effective_power_mw"].as_f64().unwrap(),
        0.95,
        1e-12,
    );

    let (status, json) = get(state, "/scenarios").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scenarios"].as_array().unwrap().len(), 1);
    assert_eq!(json["failures"][0]["scenario"], "Broken");
}

#[tokio::test]
async fn monthly_periods_and_payback() {
    let state = build_state(PROJECT_TOML);

    let (status, json) = get(state.clone(), "/scenarios/Base").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["payback"]["status"], "achieved");
    let months = json["summary"]["payback_years"].as_f64().unwrap() * 12.0;
    assert!(months > 10.0 && months < 13.0, "payback {months} months");

    let (status, json) = get(state.clone(), "/scenarios/Base/periods?from=13").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 12);
    assert_eq!(json[0]["period"], 13);

    let (status, _) = get(state, "/scenarios/Broken").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
