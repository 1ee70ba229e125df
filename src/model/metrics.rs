//! Net present value and internal rate of return.

use tracing::warn;

use super::types::{Metrics, PeriodGranularity};
use crate::error::{ProjectionError, Result};

/// Bisection iteration budget for [`irr`].
pub const IRR_MAX_ITERATIONS: usize = 200;

/// Relative width of the rate bracket at which [`irr`] stops.
const IRR_RATE_TOLERANCE: f64 = 1e-12;

/// Rates scanned for a sign change before doubling upward.
const BRACKET_RATES: &[f64] = &[
    -0.99, -0.9, -0.75, -0.5, -0.25, -0.1, 0.0, 0.1, 0.25, 0.5, 1.0,
];

/// Highest rate tried when widening the bracket.
const IRR_UPPER_LIMIT: f64 = 1.0e6;

/// Discounted sum of `cash_flows[t] / (1 + rate)^t`, with `t = 0` undiscounted.
///
/// # Examples
///
/// ```
/// use afrr_sim::model::metrics::npv;
///
/// let v = npv(0.1, &[-100.0, 110.0]);
/// assert!(v.abs() < 1e-9);
/// ```
pub fn npv(rate: f64, cash_flows: &[f64]) -> f64 {
    let one_plus_r = 1.0 + rate;
    let mut discount = 1.0;
    let mut total = 0.0;
    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount *= one_plus_r;
        }
        total += cf / discount;
    }
    total
}

/// First pair of adjacent scanned rates whose NPVs differ in sign.
///
/// Rates where NPV is not finite (long series near -100 %) are skipped.
/// An exact root is returned as a zero-width bracket.
fn bracket(cash_flows: &[f64]) -> Option<(f64, f64, f64)> {
    let doublings = std::iter::successors(Some(2.0_f64), |r| {
        let next = r * 2.0;
        (next <= IRR_UPPER_LIMIT).then_some(next)
    });

    let mut previous: Option<(f64, f64)> = None;
    for rate in BRACKET_RATES.iter().copied().chain(doublings) {
        let value = npv(rate, cash_flows);
        if !value.is_finite() {
            continue;
        }
        if value == 0.0 {
            return Some((rate, rate, value));
        }
        if let Some((prev_rate, prev_value)) = previous {
            if prev_value.signum() != value.signum() {
                return Some((prev_rate, rate, prev_value));
            }
        }
        previous = Some((rate, value));
    }
    None
}

/// Rate per period at which [`npv`] is zero, found by bracketed bisection.
///
/// # Errors
///
/// Returns `ProjectionError::NoConvergence` when the flows never change
/// sign, no bracket is found in `(-1, 1e6]`, or the iteration budget runs out.
pub fn irr(cash_flows: &[f64]) -> Result<f64> {
    let has_positive = cash_flows.iter().any(|cf| *cf > 0.0);
    let has_negative = cash_flows.iter().any(|cf| *cf < 0.0);
    if !(has_positive && has_negative) {
        return Err(ProjectionError::NoConvergence { iterations: 0 });
    }

    let Some((mut lo, mut hi, mut f_lo)) = bracket(cash_flows) else {
        return Err(ProjectionError::NoConvergence { iterations: 0 });
    };
    if lo == hi {
        return Ok(lo);
    }

    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let f_mid = npv(mid, cash_flows);
        if f_mid == 0.0 || (hi - lo) <= IRR_RATE_TOLERANCE * (1.0 + mid.abs()) {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(ProjectionError::NoConvergence {
        iterations: IRR_MAX_ITERATIONS,
    })
}

/// NPV and IRR of an investment followed by per-period net cash flows.
///
/// `discount_rate_pct` is an annual rate; it is converted to the
/// equivalent rate per period of `granularity` before discounting. A
/// failed IRR is logged and reported as `None` while NPV is still returned.
///
/// # Arguments
///
/// * `total_investment` - Outflow at period 0
/// * `net_cash_flows` - Net revenue of periods 1..=N
/// * `discount_rate_pct` - Annual discount rate in percent
/// * `granularity` - Period length used for rate conversion and IRR annualization
///
/// # Returns
///
/// NPV at the converted rate and the annualized IRR, `None` when no root exists.
pub fn compute_metrics(
    total_investment: f64,
    net_cash_flows: &[f64],
    discount_rate_pct: f64,
    granularity: PeriodGranularity,
) -> Metrics {
    let mut flows = Vec::with_capacity(net_cash_flows.len() + 1);
    flows.push(-total_investment);
    flows.extend_from_slice(net_cash_flows);

    let period_rate = granularity.period_rate_pct(discount_rate_pct) / 100.0;
    let npv = npv(period_rate, &flows);

    let irr_period_pct = match irr(&flows) {
        Ok(rate) => Some(rate * 100.0),
        Err(e) => {
            warn!(error = %e, "IRR unavailable");
            None
        }
    };

    Metrics {
        discount_rate_pct,
        npv,
        irr_period_pct,
        irr_annual_pct: irr_period_pct.map(|r| granularity.annual_rate_pct(r)),
    }
}
