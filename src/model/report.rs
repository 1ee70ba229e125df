//! Post-hoc summaries and multi-scenario comparison.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use super::engine::ScenarioEngine;
use super::payback::Payback;
use super::power::{daily_reserve_mwh, usable_capacity_mwh};
use super::types::{PeriodGranularity, ProjectionResult};
use crate::reference::PriceSource;
use crate::scenario::ScenarioSet;

/// Scenario-independent figures of the configured project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectOverview {
    pub capacity_mwh: f64,
    pub usable_capacity_mwh: f64,
    pub effective_power_mw: f64,
    /// Energy held available for the market each day (MWh).
    pub daily_reserve_mwh: f64,
    pub total_investment: f64,
    pub granularity: PeriodGranularity,
    pub life_periods: usize,
    pub discount_rate_pct: Option<f64>,
    pub price_source: String,
}

impl ProjectOverview {
    pub fn new(engine: &ScenarioEngine, prices: &dyn PriceSource) -> Self {
        let battery = engine.battery();
        let operational = engine.operational();
        Self {
            capacity_mwh: battery.capacity_mwh,
            usable_capacity_mwh: usable_capacity_mwh(battery),
            effective_power_mw: engine.effective_power_mw(),
            daily_reserve_mwh: daily_reserve_mwh(battery, operational.operating_hours_per_day),
            total_investment: engine.total_investment(),
            granularity: operational.granularity,
            life_periods: operational.life_periods,
            discount_rate_pct: engine.financial().discount_rate_pct,
            price_source: prices.source_name().to_string(),
        }
    }
}

impl fmt::Display for ProjectOverview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Project ---")?;
        writeln!(
            f,
            "Capacity:               {:.2} MWh ({:.2} MWh usable)",
            self.capacity_mwh, self.usable_capacity_mwh
        )?;
        writeln!(f, "Effective power:        {:.3} MW", self.effective_power_mw)?;
        writeln!(f, "Daily reserve:          {:.2} MWh", self.daily_reserve_mwh)?;
        writeln!(f, "Total investment:       {:.2}", self.total_investment)?;
        writeln!(
            f,
            "Horizon:                {} {} periods",
            self.life_periods, self.granularity
        )?;
        if let Some(rate) = self.discount_rate_pct {
            writeln!(f, "Discount rate:          {rate:.2}% per year")?;
        }
        write!(f, "Price baseline:         {}", self.price_source)
    }
}

/// Aggregate figures derived from one projection.
///
/// Computed post-hoc from the period rows so the summary always agrees
/// with the table it describes.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionSummary {
    pub scenario: String,
    pub effective_power_mw: f64,
    pub total_investment: f64,
    pub total_capacity_revenue: f64,
    pub total_activation_revenue: f64,
    pub total_charging_cost: f64,
    pub total_net_revenue: f64,
    /// Net revenue of the first period.
    pub first_period_net_revenue: f64,
    /// Mean net revenue per year of operation.
    pub average_annual_net_revenue: f64,
    /// Cumulative cash flow at end of life.
    pub final_cash_flow: f64,
    /// `(total_net_revenue - total_investment) / total_investment`, percent.
    pub roi_pct: Option<f64>,
    /// Break-even outcome; tells a degenerate crossing apart from no crossing.
    pub payback: Payback,
    pub payback_periods: Option<f64>,
    pub payback_years: Option<f64>,
    pub payback_months: Option<f64>,
    pub npv: Option<f64>,
    pub discount_rate_pct: Option<f64>,
    pub irr_annual_pct: Option<f64>,
    pub warnings: Vec<String>,
}

impl ProjectionSummary {
    pub fn from_result(result: &ProjectionResult) -> Self {
        let mut capacity = 0.0;
        let mut activation = 0.0;
        let mut charging = 0.0;
        let mut net = 0.0;
        for r in &result.rows {
            capacity += r.capacity_revenue;
            activation += r.activation_revenue;
            charging += r.charging_cost;
            net += r.net_revenue;
        }

        let years = result.rows.len() as f64 / f64::from(result.granularity.periods_per_year());
        let average_annual_net_revenue = if years > 0.0 { net / years } else { 0.0 };
        let roi_pct = (result.total_investment > 0.0)
            .then(|| 100.0 * (net - result.total_investment) / result.total_investment);

        Self {
            scenario: result.scenario.clone(),
            effective_power_mw: result.effective_power_mw,
            total_investment: result.total_investment,
            total_capacity_revenue: capacity,
            total_activation_revenue: activation,
            total_charging_cost: charging,
            total_net_revenue: net,
            first_period_net_revenue: result.rows.first().map_or(0.0, |r| r.net_revenue),
            average_annual_net_revenue,
            final_cash_flow: result.final_cash_flow(),
            roi_pct,
            payback: result.payback,
            payback_periods: result.payback.periods(),
            payback_years: result.payback_years(),
            payback_months: result.payback.months(result.granularity),
            npv: result.metrics.map(|m| m.npv),
            discount_rate_pct: result.metrics.map(|m| m.discount_rate_pct),
            irr_annual_pct: result.metrics.and_then(|m| m.irr_annual_pct),
            warnings: result.warnings.iter().map(ToString::to_string).collect(),
        }
    }

    /// Whether the investment is recovered within the operational life.
    pub fn breaks_even(&self) -> bool {
        self.payback_periods.is_some()
    }
}

fn fmt_opt(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}{suffix}"))
}

impl fmt::Display for ProjectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Scenario: {} ---", self.scenario)?;
        writeln!(f, "Effective power:        {:.3} MW", self.effective_power_mw)?;
        writeln!(f, "Total investment:       {:.2}", self.total_investment)?;
        writeln!(f, "Capacity revenue:       {:.2}", self.total_capacity_revenue)?;
        writeln!(f, "Activation revenue:     {:.2}", self.total_activation_revenue)?;
        writeln!(f, "Charging cost:          {:.2}", self.total_charging_cost)?;
        writeln!(f, "Total net revenue:      {:.2}", self.total_net_revenue)?;
        writeln!(
            f,
            "Average net per year:   {:.2}",
            self.average_annual_net_revenue
        )?;
        writeln!(f, "Final cash flow:        {:.2}", self.final_cash_flow)?;
        writeln!(f, "ROI:                    {}", fmt_opt(self.roi_pct, "%"))?;
        let payback = match (self.payback_years, self.payback_months) {
            (Some(y), Some(m)) => format!("{y:.2} years ({m:.1} months)"),
            _ => self.payback.to_string(),
        };
        writeln!(f, "Payback:                {payback}")?;
        if let Some(rate) = self.discount_rate_pct {
            writeln!(
                f,
                "NPV @ {rate:.1}%:            {}",
                fmt_opt(self.npv, "")
            )?;
            writeln!(
                f,
                "IRR (annual):           {}",
                fmt_opt(self.irr_annual_pct, "%")
            )?;
        }
        for w in &self.warnings {
            writeln!(f, "warning: {w}")?;
        }
        Ok(())
    }
}

/// A scenario that could not be projected.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioFailure {
    pub scenario: String,
    pub error: String,
}

/// Projections of several scenarios against the same battery and finances.
///
/// Results keep the insertion order of the scenario set. A failing
/// scenario is recorded and does not stop the others.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionReport {
    pub results: Vec<ProjectionResult>,
    pub failures: Vec<ScenarioFailure>,
}

impl ProjectionReport {
    /// Projects every scenario in `scenarios`.
    pub fn run(engine: &ScenarioEngine, scenarios: &ScenarioSet) -> Self {
        let mut results = Vec::with_capacity(scenarios.len());
        let mut failures = Vec::new();
        for (name, params) in scenarios.iter() {
            match engine.project(name, params) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(scenario = name, error = %e, "scenario skipped");
                    failures.push(ScenarioFailure {
                        scenario: name.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }
        Self { results, failures }
    }

    pub fn get(&self, name: &str) -> Option<&ProjectionResult> {
        self.results.iter().find(|r| r.scenario == name)
    }

    pub fn summaries(&self) -> Vec<ProjectionSummary> {
        self.results.iter().map(ProjectionSummary::from_result).collect()
    }

    /// Scenario with the highest NPV, if NPV was computed.
    pub fn best_by_npv(&self) -> Option<&ProjectionResult> {
        self.results
            .iter()
            .filter_map(|r| r.metrics.map(|m| (r, m.npv)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(r, _)| r)
    }

    /// Scenario that pays back soonest.
    pub fn fastest_payback(&self) -> Option<&ProjectionResult> {
        self.results
            .iter()
            .filter_map(|r| r.payback.periods().map(|p| (r, p)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(r, _)| r)
    }
}

impl fmt::Display for ProjectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Projection Report ---")?;
        writeln!(
            f,
            "{:<16} {:>16} {:>16} {:>12} {:>16} {:>10}",
            "scenario", "net revenue", "final cash", "payback (y)", "npv", "irr (%)"
        )?;
        for s in self.summaries() {
            writeln!(
                f,
                "{:<16} {:>16.2} {:>16.2} {:>12} {:>16} {:>10}",
                s.scenario,
                s.total_net_revenue,
                s.final_cash_flow,
                fmt_opt(s.payback_years, ""),
                fmt_opt(s.npv, ""),
                fmt_opt(s.irr_annual_pct, ""),
            )?;
        }
        for failure in &self.failures {
            writeln!(f, "{:<16} failed: {}", failure.scenario, failure.error)?;
        }
        if let Some(best) = self.best_by_npv() {
            writeln!(f, "Best scenario by NPV:   {}", best.scenario)?;
        }
        match self.fastest_payback() {
            Some(fastest) => write!(f, "Fastest payback:        {}", fastest.scenario),
            None => write!(f, "Fastest payback:        none within operational life"),
        }
    }
}
