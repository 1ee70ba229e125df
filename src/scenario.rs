//! Market price scenarios: parameters, preset table and ordered scenario sets.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::types::PeriodGranularity;
use crate::reference::REFERENCE_PRICES;

/// Starting prices and per-period growth rates of one market scenario.
///
/// Prices are hourly market prices (electricity and activation per MWh,
/// capacity per MW per hour); growth rates are percentages per period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioParams {
    pub initial_electricity_cost: f64,
    pub electricity_growth_pct: f64,
    pub initial_capacity_price: f64,
    pub capacity_price_growth_pct: f64,
    pub initial_activation_price: f64,
    pub activation_price_growth_pct: f64,
}

impl ScenarioParams {
    /// Re-expresses yearly growth rates as compounded rates per period of `granularity`.
    ///
    /// Prices are hourly and stay unchanged.
    pub fn from_annual(self, granularity: PeriodGranularity) -> Self {
        Self {
            electricity_growth_pct: granularity.period_rate_pct(self.electricity_growth_pct),
            capacity_price_growth_pct: granularity.period_rate_pct(self.capacity_price_growth_pct),
            activation_price_growth_pct: granularity
                .period_rate_pct(self.activation_price_growth_pct),
            ..self
        }
    }

    /// Checks that every value is finite.
    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let fields = [
            ("initial_electricity_cost", self.initial_electricity_cost),
            ("electricity_growth_pct", self.electricity_growth_pct),
            ("initial_capacity_price", self.initial_capacity_price),
            ("capacity_price_growth_pct", self.capacity_price_growth_pct),
            ("initial_activation_price", self.initial_activation_price),
            (
                "activation_price_growth_pct",
                self.activation_price_growth_pct,
            ),
        ];
        fields
            .into_iter()
            .filter(|(_, v)| !v.is_finite())
            .map(|(name, _)| ConfigError::new(format!("{prefix}.{name}"), "must be finite"))
            .collect()
    }
}

/// Built-in market outlooks.
///
/// Deserializes from a case-insensitive name, so TOML may say `"base"` or `"Base"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ScenarioPreset {
    Optimistic,
    Base,
    Pessimistic,
}

/// Yearly parameters of each preset.
const PRESET_TABLE: &[(ScenarioPreset, ScenarioParams)] = &[
    (
        ScenarioPreset::Optimistic,
        ScenarioParams {
            initial_electricity_cost: 45.0,
            electricity_growth_pct: 1.5,
            initial_capacity_price: 95.0,
            capacity_price_growth_pct: 2.5,
            initial_activation_price: 130.0,
            activation_price_growth_pct: 3.0,
        },
    ),
    (ScenarioPreset::Base, REFERENCE_PRICES.params),
    (
        ScenarioPreset::Pessimistic,
        ScenarioParams {
            initial_electricity_cost: 60.0,
            electricity_growth_pct: 2.5,
            initial_capacity_price: 65.0,
            capacity_price_growth_pct: 0.5,
            initial_activation_price: 90.0,
            activation_price_growth_pct: 1.0,
        },
    ),
];

impl ScenarioPreset {
    pub const ALL: [Self; 3] = [Self::Optimistic, Self::Base, Self::Pessimistic];

    /// Display name used as the scenario key.
    pub fn name(self) -> &'static str {
        match self {
            Self::Optimistic => "Optimistic",
            Self::Base => "Base",
            Self::Pessimistic => "Pessimistic",
        }
    }

    /// Yearly parameters from the preset table.
    pub fn annual_params(self) -> ScenarioParams {
        PRESET_TABLE
            .iter()
            .find(|(preset, _)| *preset == self)
            .map(|(_, params)| *params)
            .unwrap_or(REFERENCE_PRICES.params)
    }

    /// Parameters expressed per period of `granularity`.
    pub fn params(self, granularity: PeriodGranularity) -> ScenarioParams {
        self.annual_params().from_annual(granularity)
    }

    /// Looks a preset up by case-insensitive name.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the name is unknown.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                ConfigError::new(
                    "scenario.preset",
                    format!("unknown preset \"{name}\", available: {}", names.join(", ")),
                )
            })
    }
}

impl TryFrom<String> for ScenarioPreset {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::from_name(&name)
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Insertion-ordered mapping from scenario name to parameters.
///
/// Re-inserting an existing name replaces its parameters but keeps the
/// original position, so display and export order stays stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenarioSet {
    scenarios: IndexMap<String, ScenarioParams>,
}

impl ScenarioSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three presets in Optimistic, Base, Pessimistic order.
    pub fn presets(granularity: PeriodGranularity) -> Self {
        let mut set = Self::new();
        for preset in ScenarioPreset::ALL {
            set.insert(preset.name(), preset.params(granularity));
        }
        set
    }

    /// Adds or replaces a scenario; returns the previous parameters.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        params: ScenarioParams,
    ) -> Option<ScenarioParams> {
        self.scenarios.insert(name.into(), params)
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioParams> {
        self.scenarios.get(name)
    }

    /// Keeps only the named scenario.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if no scenario has that name.
    pub fn retain_only(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.scenarios.contains_key(name) {
            return Err(ConfigError::new(
                "scenario",
                format!(
                    "unknown scenario \"{name}\", available: {}",
                    self.names().collect::<Vec<_>>().join(", ")
                ),
            ));
        }
        self.scenarios.retain(|k, _| k == name);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScenarioParams)> {
        self.scenarios.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom() -> ScenarioParams {
        ScenarioParams {
            initial_electricity_cost: 55.0,
            electricity_growth_pct: 2.0,
            initial_capacity_price: 70.0,
            capacity_price_growth_pct: 1.0,
            initial_activation_price: 100.0,
            activation_price_growth_pct: 2.0,
        }
    }

    #[test]
    fn preset_table_covers_every_preset() {
        for preset in ScenarioPreset::ALL {
            assert!(PRESET_TABLE.iter().any(|(p, _)| *p == preset));
        }
    }

    #[test]
    fn optimistic_beats_pessimistic_prices() {
        let opt = ScenarioPreset::Optimistic.annual_params();
        let pes = ScenarioPreset::Pessimistic.annual_params();
        assert!(opt.initial_capacity_price > pes.initial_capacity_price);
        assert!(opt.initial_electricity_cost < pes.initial_electricity_cost);
    }

    #[test]
    fn base_preset_matches_reference_prices() {
        assert_eq!(
            ScenarioPreset::Base.params(PeriodGranularity::Year),
            REFERENCE_PRICES.params.from_annual(PeriodGranularity::Year)
        );
    }

    #[test]
    fn quarterly_growth_compounds_back_to_annual() {
        let q = ScenarioPreset::Base.params(PeriodGranularity::Quarter);
        let annual = ScenarioPreset::Base.annual_params();
        assert_eq!(q.initial_capacity_price, annual.initial_capacity_price);
        let back = PeriodGranularity::Quarter.annual_rate_pct(q.capacity_price_growth_pct);
        assert!((back - annual.capacity_price_growth_pct).abs() < 1e-9);
    }

    #[test]
    fn preset_lookup_is_case_insensitive() {
        assert_eq!(
            ScenarioPreset::from_name("pessimistic").ok(),
            Some(ScenarioPreset::Pessimistic)
        );
        let err = ScenarioPreset::from_name("moonshot").unwrap_err();
        assert!(err.message.contains("unknown preset"));
    }

    #[test]
    fn set_preserves_insertion_order() {
        let mut set = ScenarioSet::new();
        set.insert("zeta", custom());
        set.insert("alpha", custom());
        set.insert("mid", custom());
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);

        let mut replaced = custom();
        replaced.initial_capacity_price = 1.0;
        assert!(set.insert("zeta", replaced).is_some());
        assert_eq!(set.names().next(), Some("zeta"));
        assert_eq!(set.get("zeta").map(|p| p.initial_capacity_price), Some(1.0));
    }

    #[test]
    fn retain_only_rejects_unknown_name() {
        let mut set = ScenarioSet::presets(PeriodGranularity::Year);
        assert!(set.retain_only("Nope").is_err());
        assert_eq!(set.len(), 3);
        assert!(set.retain_only("Base").is_ok());
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["Base"]);
    }

    #[test]
    fn validate_flags_non_finite_values() {
        let mut p = custom();
        p.initial_activation_price = f64::NAN;
        let errors = p.validate("scenarios[0]");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "scenarios[0].initial_activation_price");
    }
}
