//! Break-even detection on a cumulative cash-flow series.

use std::fmt;

use serde::Serialize;

use super::types::PeriodGranularity;
use crate::error::{ProjectionError, Result};

/// Outcome of scanning a cumulative cash-flow series for break-even.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Payback {
    /// Investment recovered after a fractional number of periods.
    Achieved { periods: f64 },
    /// Cumulative cash flow stays negative over the whole horizon.
    NotWithinLife,
    /// Cumulative cash flow reaches zero at `period` without positive net revenue.
    Degenerate { period: usize },
}

impl Payback {
    /// Payback in periods, if achieved.
    pub fn periods(&self) -> Option<f64> {
        match self {
            Self::Achieved { periods } => Some(*periods),
            Self::NotWithinLife | Self::Degenerate { .. } => None,
        }
    }

    pub fn years(&self, granularity: PeriodGranularity) -> Option<f64> {
        self.periods()
            .map(|p| p / f64::from(granularity.periods_per_year()))
    }

    pub fn months(&self, granularity: PeriodGranularity) -> Option<f64> {
        self.years(granularity).map(|y| y * 12.0)
    }

    /// Payback in periods, or the reason there is none.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError::DegenerateScenario` when payback was not achieved.
    pub fn require(&self) -> Result<f64> {
        match self {
            Self::Achieved { periods } => Ok(*periods),
            Self::NotWithinLife => Err(ProjectionError::DegenerateScenario(
                "investment not recovered within operational life".to_string(),
            )),
            Self::Degenerate { period } => Err(ProjectionError::DegenerateScenario(format!(
                "non-positive net revenue at break-even period {period}"
            ))),
        }
    }
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Achieved { periods } => write!(f, "{periods:.2} periods"),
            Self::NotWithinLife => f.write_str("not within operational life"),
            Self::Degenerate { .. } => f.write_str("N/A (degenerate)"),
        }
    }
}

/// Finds the fractional period at which cumulative cash flow turns non-negative.
///
/// `cumulative[i]` is the cash position after period `i + 1`; the position
/// before period 1 is `-total_investment`. The first period reaching `>= 0`
/// wins, and the fraction within it is interpolated linearly from that
/// period's net revenue.
///
/// # Arguments
///
/// * `total_investment` - Up-front cost, the negated opening cash position
/// * `cumulative` - Cumulative cash position after each period
///
/// # Returns
///
/// `Payback::Achieved` with the fractional period count,
/// `Payback::NotWithinLife` if no period reaches zero, or
/// `Payback::Degenerate` if the crossing period earned nothing.
///
/// # Examples
///
/// ```
/// use afrr_sim::model::payback::{Payback, find_payback};
///
/// // 100 invested, 40 earned per period
/// let p = find_payback(100.0, &[-60.0, -20.0, 20.0]);
/// assert_eq!(p, Payback::Achieved { periods: 2.5 });
/// ```
pub fn find_payback(total_investment: f64, cumulative: &[f64]) -> Payback {
    let mut previous = -total_investment;
    for (idx, &position) in cumulative.iter().enumerate() {
        if position >= 0.0 {
            let net_revenue = position - previous;
            if net_revenue <= 0.0 {
                return Payback::Degenerate { period: idx + 1 };
            }
            let cash_needed = (-previous).max(0.0);
            return Payback::Achieved {
                periods: idx as f64 + cash_needed / net_revenue,
            };
        }
        previous = position;
    }
    Payback::NotWithinLife
}
