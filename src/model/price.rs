//! Compounding price trajectories.

/// Price series that grows by a fixed percentage every period.
///
/// Entry `i` (1-indexed) is `initial * (1 + growth_pct / 100)^(i - 1)`.
/// Negative growth is allowed and never clamped; a growth below -100 %
/// makes the sign alternate.
///
/// # Examples
///
/// ```
/// use afrr_sim::model::price::PriceTrajectory;
///
/// let prices = PriceTrajectory::new(100.0, 10.0).generate(3);
/// assert_eq!(prices.len(), 3);
/// assert!((prices[2] - 121.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTrajectory {
    pub initial: f64,
    pub growth_pct: f64,
}

impl PriceTrajectory {
    pub fn new(initial: f64, growth_pct: f64) -> Self {
        Self {
            initial,
            growth_pct,
        }
    }

    /// Generates `periods` prices starting at period 1.
    pub fn generate(&self, periods: usize) -> Vec<f64> {
        let factor = 1.0 + self.growth_pct / 100.0;
        let mut prices = Vec::with_capacity(periods);
        let mut price = self.initial;
        for _ in 0..periods {
            prices.push(price);
            price *= factor;
        }
        prices
    }
}

/// Index (1-based) of the first negative price in a series, if any.
pub fn first_negative_period(prices: &[f64]) -> Option<usize> {
    prices.iter().position(|p| *p < 0.0).map(|i| i + 1)
}
