//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use afrr_sim::config::{BatteryConfig, FinancialConfig, OperationalConfig};
use afrr_sim::scenario::ScenarioParams;

/// Reference battery (2 MWh, 1 MW, 90 % efficiency, 10 % reserved, 95 % available).
pub fn reference_battery() -> BatteryConfig {
    BatteryConfig {
        capacity_mwh: 2.0,
        power_rating_mw: 1.0,
        efficiency_pct: 90.0,
        reserved_capacity_pct: 10.0,
        availability_pct: 95.0,
    }
}

/// 15 % activation over 15 yearly periods.
pub fn reference_operational() -> OperationalConfig {
    OperationalConfig::default()
}

/// 350 000 per MWh, 8 % discount rate.
pub fn reference_financial() -> FinancialConfig {
    FinancialConfig::default()
}

/// Base market prices (50/1.8 %, 80/1.8 %, 110/2.2 %).
pub fn base_prices() -> ScenarioParams {
    ScenarioParams {
        initial_electricity_cost: 50.0,
        electricity_growth_pct: 1.8,
        initial_capacity_price: 80.0,
        capacity_price_growth_pct: 1.8,
        initial_activation_price: 110.0,
        activation_price_growth_pct: 2.2,
    }
}

/// Base prices with every growth rate set to zero.
pub fn flat_prices() -> ScenarioParams {
    ScenarioParams {
        electricity_growth_pct: 0.0,
        capacity_price_growth_pct: 0.0,
        activation_price_growth_pct: 0.0,
        ..base_prices()
    }
}

/// Asserts `a` and `b` agree within a relative tolerance.
pub fn assert_close(a: f64, b: f64, rel: f64) {
    let scale = a.abs().max(b.abs()).max(1.0);
    assert!(
        (a - b).abs() <= rel * scale,
        "expected {a} ≈ {b} (rel tol {rel})"
    );
}
