//! Projection engine turning configs and a price scenario into per-period cash flows.

use tracing::{debug, warn};

use super::metrics::compute_metrics;
use super::payback::{Payback, find_payback};
use super::power::effective_power_mw;
use super::price::{PriceTrajectory, first_negative_period};
use super::types::{PeriodRow, ProjectionResult, ProjectionWarning};
use crate::config::{BatteryConfig, FinancialConfig, OperationalConfig};
use crate::error::{ProjectionError, Result};
use crate::scenario::ScenarioParams;

/// Validated battery, operational and financial inputs shared by every scenario.
///
/// Construction validates once; [`ScenarioEngine::project`] is then a pure
/// function of the stored configs and the scenario passed in.
#[derive(Debug, Clone)]
pub struct ScenarioEngine {
    battery: BatteryConfig,
    operational: OperationalConfig,
    financial: FinancialConfig,
}

impl ScenarioEngine {
    /// Creates an engine after validating all three configs.
    ///
    /// # Arguments
    ///
    /// * `battery` - Capacity, depth of discharge, efficiency and availability
    /// * `operational` - Operating hours, activation bound, granularity and horizon
    /// * `financial` - Investment components and optional discount rate
    ///
    /// # Returns
    ///
    /// An engine ready to project any number of scenarios.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError::InvalidConfig` listing every out-of-range field.
    pub fn new(
        battery: BatteryConfig,
        operational: OperationalConfig,
        financial: FinancialConfig,
    ) -> Result<Self> {
        let mut errors = battery.validate();
        errors.extend(operational.validate());
        errors.extend(financial.validate());
        if !errors.is_empty() {
            return Err(ProjectionError::InvalidConfig(errors));
        }
        Ok(Self {
            battery,
            operational,
            financial,
        })
    }

    pub fn battery(&self) -> &BatteryConfig {
        &self.battery
    }

    pub fn operational(&self) -> &OperationalConfig {
        &self.operational
    }

    pub fn financial(&self) -> &FinancialConfig {
        &self.financial
    }

    /// Capacity times investment cost per MWh.
    pub fn total_investment(&self) -> f64 {
        self.financial.total_investment(&self.battery)
    }

    /// Usable discharge power of the configured battery (MW).
    pub fn effective_power_mw(&self) -> f64 {
        effective_power_mw(&self.battery)
    }

    /// Projects one named scenario over the operational life.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError::InvalidConfig` if a scenario value is not finite.
    pub fn project(&self, name: &str, scenario: &ScenarioParams) -> Result<ProjectionResult> {
        let errors = scenario.validate(&format!("scenario[{name}]"));
        if !errors.is_empty() {
            return Err(ProjectionError::InvalidConfig(errors));
        }

        let periods = self.operational.life_periods;
        let granularity = self.operational.granularity;
        let hours = self.operational.hours_per_period();
        let power_mw = self.effective_power_mw();
        let activation_share = self.operational.activation_rate_pct / 100.0;
        let efficiency = self.battery.efficiency_pct / 100.0;
        let total_investment = self.total_investment();

        let electricity = PriceTrajectory::new(
            scenario.initial_electricity_cost,
            scenario.electricity_growth_pct,
        )
        .generate(periods);
        let capacity = PriceTrajectory::new(
            scenario.initial_capacity_price,
            scenario.capacity_price_growth_pct,
        )
        .generate(periods);
        let activation = PriceTrajectory::new(
            scenario.initial_activation_price,
            scenario.activation_price_growth_pct,
        )
        .generate(periods);

        let mut warnings = Vec::new();
        for (series, prices) in [
            ("electricity", &electricity),
            ("capacity", &capacity),
            ("activation", &activation),
        ] {
            if let Some(period) = first_negative_period(prices) {
                warn!(scenario = name, series, period, "simulated price turned negative");
                warnings.push(ProjectionWarning::NegativePrice { series, period });
            }
        }

        let mut rows = Vec::with_capacity(periods);
        let mut cumulative = -total_investment;
        for i in 0..periods {
            let capacity_revenue = power_mw * capacity[i] * hours;
            let energy_activated = power_mw * activation_share * hours;
            let activation_revenue = energy_activated * activation[i];
            let energy_charged = energy_activated / efficiency;
            let charging_cost = energy_charged * electricity[i];
            let net_revenue = capacity_revenue + activation_revenue - charging_cost;
            cumulative += net_revenue;

            rows.push(PeriodRow {
                period: i + 1,
                electricity_price: electricity[i],
                capacity_price: capacity[i],
                activation_price: activation[i],
                capacity_revenue,
                activation_revenue,
                charging_cost,
                net_revenue,
                cumulative_cash_flow: cumulative,
            });
        }

        let mut result = ProjectionResult {
            scenario: name.to_string(),
            granularity,
            effective_power_mw: power_mw,
            total_investment,
            rows,
            payback: Payback::NotWithinLife,
            metrics: None,
            warnings,
        };

        result.payback = find_payback(total_investment, &result.cumulative_cash_flows());
        if let Payback::Degenerate { period } = result.payback {
            warn!(scenario = name, period, "degenerate payback");
            result
                .warnings
                .push(ProjectionWarning::DegeneratePayback { period });
        }

        if let Some(rate) = self.financial.discount_rate_pct {
            let metrics =
                compute_metrics(total_investment, &result.net_cash_flows(), rate, granularity);
            if metrics.irr_period_pct.is_none() {
                result.warnings.push(ProjectionWarning::IrrNotConverged);
            }
            result.metrics = Some(metrics);
        }

        debug!(
            scenario = name,
            periods,
            %granularity,
            effective_power_mw = power_mw,
            final_cash_flow = cumulative,
            "projection complete"
        );

        Ok(result)
    }
}

/// Validates the configs and projects a single scenario.
///
/// # Errors
///
/// Returns `ProjectionError::InvalidConfig` for any out-of-range input;
/// no partial result is produced.
pub fn project(
    name: &str,
    battery: &BatteryConfig,
    operational: &OperationalConfig,
    financial: &FinancialConfig,
    scenario: &ScenarioParams,
) -> Result<ProjectionResult> {
    ScenarioEngine::new(battery.clone(), operational.clone(), financial.clone())?
        .project(name, scenario)
}
