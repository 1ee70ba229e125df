//! Static reference market prices.
//!
//! There is no live market-data feed; the loader below serves a fixed
//! baseline that seeds the `Base` scenario preset.

use crate::model::types::PeriodGranularity;
use crate::scenario::ScenarioParams;

/// Baseline aFRR market prices with yearly growth rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePrices {
    /// Where the figures come from.
    pub source: &'static str,
    /// Prices and yearly growth rates.
    pub params: ScenarioParams,
}

pub const REFERENCE_PRICES: ReferencePrices = ReferencePrices {
    source: "static baseline",
    params: ScenarioParams {
        initial_electricity_cost: 50.0,
        electricity_growth_pct: 1.8,
        initial_capacity_price: 80.0,
        capacity_price_growth_pct: 1.8,
        initial_activation_price: 110.0,
        activation_price_growth_pct: 2.2,
    },
};

/// Source of baseline scenario parameters.
pub trait PriceSource {
    /// Baseline parameters expressed per period of `granularity`.
    fn baseline(&self, granularity: PeriodGranularity) -> ScenarioParams;

    /// Human-readable origin of the prices.
    fn source_name(&self) -> &str;
}

/// Loader stub returning [`REFERENCE_PRICES`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticPriceSource;

impl PriceSource for StaticPriceSource {
    fn baseline(&self, granularity: PeriodGranularity) -> ScenarioParams {
        REFERENCE_PRICES.params.from_annual(granularity)
    }

    fn source_name(&self) -> &str {
        REFERENCE_PRICES.source
    }
}
