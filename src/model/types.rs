//! Core projection types: period granularity, per-period rows and results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::payback::Payback;

/// Hours in a (non-leap) year.
pub const HOURS_PER_YEAR: f64 = 24.0 * 365.0;

/// Length of one projection period.
///
/// # Examples
///
/// ```
/// use afrr_sim::model::types::PeriodGranularity;
///
/// assert_eq!(PeriodGranularity::Quarter.periods_per_year(), 4);
/// assert_eq!(PeriodGranularity::Year.hours_per_period(), 8760.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodGranularity {
    #[default]
    Year,
    Quarter,
    Month,
}

impl PeriodGranularity {
    /// Number of periods that make up one year.
    pub fn periods_per_year(self) -> u32 {
        match self {
            Self::Year => 1,
            Self::Quarter => 4,
            Self::Month => 12,
        }
    }

    /// Hours in one period at full-day market participation.
    pub fn hours_per_period(self) -> f64 {
        HOURS_PER_YEAR / f64::from(self.periods_per_year())
    }

    /// Singular unit label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Quarter => "quarter",
            Self::Month => "month",
        }
    }

    /// Converts an annual percentage rate into the equivalent compounded rate per period.
    pub fn period_rate_pct(self, annual_pct: f64) -> f64 {
        let ppy = f64::from(self.periods_per_year());
        ((1.0 + annual_pct / 100.0).powf(1.0 / ppy) - 1.0) * 100.0
    }

    /// Converts a per-period percentage rate into the equivalent annual rate.
    pub fn annual_rate_pct(self, period_pct: f64) -> f64 {
        let ppy = f64::from(self.periods_per_year());
        ((1.0 + period_pct / 100.0).powf(ppy) - 1.0) * 100.0
    }
}

impl fmt::Display for PeriodGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Financial record of one projection period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRow {
    /// Period index, starting at 1.
    pub period: usize,
    /// Electricity price paid to recharge (per MWh).
    pub electricity_price: f64,
    /// Capacity reservation price (per MW per hour).
    pub capacity_price: f64,
    /// Activated-energy price (per MWh).
    pub activation_price: f64,
    pub capacity_revenue: f64,
    pub activation_revenue: f64,
    pub charging_cost: f64,
    /// `capacity_revenue + activation_revenue - charging_cost`.
    pub net_revenue: f64,
    /// Running sum of net revenue, starting from minus the total investment.
    pub cumulative_cash_flow: f64,
}

impl fmt::Display for PeriodRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p={:>3} | elec={:>8.2}  cap={:>8.2}  act={:>8.2} | \
             cap_rev={:>14.2}  act_rev={:>14.2}  charge={:>14.2} | \
             net={:>14.2}  cum={:>15.2}",
            self.period,
            self.electricity_price,
            self.capacity_price,
            self.activation_price,
            self.capacity_revenue,
            self.activation_revenue,
            self.charging_cost,
            self.net_revenue,
            self.cumulative_cash_flow,
        )
    }
}

/// NPV and IRR of one projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    /// Annual discount rate used for `npv` (percent).
    pub discount_rate_pct: f64,
    pub npv: f64,
    /// Internal rate of return per period (percent); `None` when the solver found no root.
    pub irr_period_pct: Option<f64>,
    /// `irr_period_pct` compounded to a yearly rate.
    pub irr_annual_pct: Option<f64>,
}

/// Non-fatal conditions detected while projecting a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionWarning {
    /// A compounded price went below zero.
    NegativePrice { series: &'static str, period: usize },
    /// Payback crossing has non-positive marginal net revenue.
    DegeneratePayback { period: usize },
    /// IRR solver found no root.
    IrrNotConverged,
}

impl fmt::Display for ProjectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativePrice { series, period } => {
                write!(f, "{series} price is negative from period {period}")
            }
            Self::DegeneratePayback { period } => write!(
                f,
                "cumulative cash flow crosses zero at period {period} without positive net revenue"
            ),
            Self::IrrNotConverged => f.write_str("IRR could not be determined"),
        }
    }
}

/// Complete projection of one named scenario.
///
/// Built once by the engine from a fixed set of inputs and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionResult {
    pub scenario: String,
    pub granularity: PeriodGranularity,
    /// Usable discharge power after capping and availability (MW).
    pub effective_power_mw: f64,
    pub total_investment: f64,
    pub rows: Vec<PeriodRow>,
    pub payback: Payback,
    pub metrics: Option<Metrics>,
    pub warnings: Vec<ProjectionWarning>,
}

impl ProjectionResult {
    /// Net revenue per period, in period order.
    pub fn net_cash_flows(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.net_revenue).collect()
    }

    /// Cumulative cash flow per period, in period order.
    pub fn cumulative_cash_flows(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.cumulative_cash_flow).collect()
    }

    /// Cumulative cash flow after the last period.
    pub fn final_cash_flow(&self) -> f64 {
        self.rows
            .last()
            .map_or(-self.total_investment, |r| r.cumulative_cash_flow)
    }

    /// Payback expressed in years, if reached.
    pub fn payback_years(&self) -> Option<f64> {
        self.payback.years(self.granularity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_per_period_splits_year() {
        assert_eq!(PeriodGranularity::Year.hours_per_period(), 8760.0);
        assert_eq!(PeriodGranularity::Quarter.hours_per_period(), 2190.0);
        assert_eq!(PeriodGranularity::Month.hours_per_period(), 730.0);
    }

    #[test]
    fn rate_conversion_is_consistent() {
        let monthly = PeriodGranularity::Month.period_rate_pct(12.0);
        let back = PeriodGranularity::Month.annual_rate_pct(monthly);
        assert!((back - 12.0).abs() < 1e-9);
        assert!(monthly < 1.0);
        assert!((PeriodGranularity::Year.period_rate_pct(5.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn granularity_parses_from_toml_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            g: PeriodGranularity,
        }
        let w: Wrapper = toml::from_str("g = \"quarter\"").unwrap();
        assert_eq!(w.g, PeriodGranularity::Quarter);
    }

    #[test]
    fn period_row_display_does_not_panic() {
        let row = PeriodRow {
            period: 1,
            electricity_price: 50.0,
            capacity_price: 80.0,
            activation_price: 110.0,
            capacity_revenue: 665_520.0,
            activation_revenue: 137_313.0,
            charging_cost: 69_350.0,
            net_revenue: 733_483.0,
            cumulative_cash_flow: 33_483.0,
        };
        assert!(!format!("{row}").is_empty());
    }
}
