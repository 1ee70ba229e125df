//! TOML-based project configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::types::PeriodGranularity;
use crate::scenario::{ScenarioParams, ScenarioPreset, ScenarioSet};

/// Longest accepted horizon: 100 years of monthly periods.
pub const MAX_LIFE_PERIODS: usize = 1200;

/// Top-level project configuration parsed from TOML.
///
/// All sections have defaults matching the baseline project. Load from
/// TOML with [`ProjectConfig::from_toml_file`] or use
/// [`ProjectConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Battery specification.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Market participation and projection horizon.
    #[serde(default)]
    pub operational: OperationalConfig,
    /// Investment and discounting.
    #[serde(default)]
    pub financial: FinancialConfig,
    /// Scenarios to project, in display order. Empty means all presets.
    #[serde(default)]
    pub scenarios: Vec<ScenarioEntry>,
}

/// Battery specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Energy capacity (MWh, must be > 0).
    pub capacity_mwh: f64,
    /// Nameplate power rating (MW, must be > 0).
    pub power_rating_mw: f64,
    /// Round-trip efficiency (percent, in (0, 100]).
    pub efficiency_pct: f64,
    /// Share of capacity permanently held back (percent, 0–100).
    pub reserved_capacity_pct: f64,
    /// Technical availability (percent, 0–100).
    pub availability_pct: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_mwh: 10.0,
            power_rating_mw: 5.0,
            efficiency_pct: 90.0,
            reserved_capacity_pct: 0.0,
            availability_pct: 95.0,
        }
    }
}

impl BatteryConfig {
    /// Checks ranges; returns every violation.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(self.capacity_mwh.is_finite() && self.capacity_mwh > 0.0) {
            errors.push(ConfigError::new("battery.capacity_mwh", "must be > 0"));
        }
        if !(self.power_rating_mw.is_finite() && self.power_rating_mw > 0.0) {
            errors.push(ConfigError::new("battery.power_rating_mw", "must be > 0"));
        }
        if !(self.efficiency_pct > 0.0 && self.efficiency_pct <= 100.0) {
            errors.push(ConfigError::new(
                "battery.efficiency_pct",
                "must be in (0, 100]",
            ));
        }
        if !(0.0..=100.0).contains(&self.reserved_capacity_pct) {
            errors.push(ConfigError::new(
                "battery.reserved_capacity_pct",
                "must be in [0, 100]",
            ));
        }
        if !(0.0..=100.0).contains(&self.availability_pct) {
            errors.push(ConfigError::new(
                "battery.availability_pct",
                "must be in [0, 100]",
            ));
        }
        errors
    }
}

/// Market participation and projection horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperationalConfig {
    /// Share of offered power that is actually activated (percent).
    pub activation_rate_pct: f64,
    /// Upper bound accepted for `activation_rate_pct` (percent, 0–100).
    pub max_activation_rate_pct: f64,
    /// Number of projected periods (must be >= 1).
    pub life_periods: usize,
    /// Length of one period.
    pub granularity: PeriodGranularity,
    /// Hours per day the battery is offered to the market (1–24).
    pub operating_hours_per_day: f64,
}

impl Default for OperationalConfig {
    fn default() -> Self {
        Self {
            activation_rate_pct: 15.0,
            max_activation_rate_pct: 100.0,
            life_periods: 15,
            granularity: PeriodGranularity::Year,
            operating_hours_per_day: 24.0,
        }
    }
}

impl OperationalConfig {
    /// Checks ranges; returns every violation.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(0.0..=100.0).contains(&self.max_activation_rate_pct) {
            errors.push(ConfigError::new(
                "operational.max_activation_rate_pct",
                "must be in [0, 100]",
            ));
        }
        if !(0.0..=self.max_activation_rate_pct).contains(&self.activation_rate_pct) {
            errors.push(ConfigError::new(
                "operational.activation_rate_pct",
                format!("must be in [0, {}]", self.max_activation_rate_pct),
            ));
        }
        if !(1..=MAX_LIFE_PERIODS).contains(&self.life_periods) {
            errors.push(ConfigError::new(
                "operational.life_periods",
                format!("must be in [1, {MAX_LIFE_PERIODS}]"),
            ));
        }
        if !(1.0..=24.0).contains(&self.operating_hours_per_day) {
            errors.push(ConfigError::new(
                "operational.operating_hours_per_day",
                "must be in [1, 24]",
            ));
        }
        errors
    }

    /// Hours of market participation in one period.
    pub fn hours_per_period(&self) -> f64 {
        self.granularity.hours_per_period() * self.operating_hours_per_day / 24.0
    }
}

/// Investment and discounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinancialConfig {
    /// Installed cost per MWh of capacity (must be >= 0).
    pub investment_cost_per_mwh: f64,
    /// Annual discount rate for NPV (percent). `None` skips NPV and IRR.
    pub discount_rate_pct: Option<f64>,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            investment_cost_per_mwh: 350_000.0,
            discount_rate_pct: Some(8.0),
        }
    }
}

impl FinancialConfig {
    /// Checks ranges; returns every violation.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(self.investment_cost_per_mwh.is_finite() && self.investment_cost_per_mwh >= 0.0) {
            errors.push(ConfigError::new(
                "financial.investment_cost_per_mwh",
                "must be >= 0",
            ));
        }
        if let Some(rate) = self.discount_rate_pct {
            if !(rate.is_finite() && rate > -100.0) {
                errors.push(ConfigError::new(
                    "financial.discount_rate_pct",
                    "must be > -100",
                ));
            }
        }
        errors
    }

    /// Capacity times cost per MWh.
    pub fn total_investment(&self, battery: &BatteryConfig) -> f64 {
        battery.capacity_mwh * self.investment_cost_per_mwh
    }
}

/// One `[[scenarios]]` entry.
///
/// Either names a `preset` (whose yearly growth is converted to the
/// project granularity) and optionally overrides some values, or gives all
/// six parameters directly, already expressed per period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioEntry {
    pub name: String,
    pub preset: Option<ScenarioPreset>,
    pub initial_electricity_cost: Option<f64>,
    pub electricity_growth_pct: Option<f64>,
    pub initial_capacity_price: Option<f64>,
    pub capacity_price_growth_pct: Option<f64>,
    pub initial_activation_price: Option<f64>,
    pub activation_price_growth_pct: Option<f64>,
}

impl ScenarioEntry {
    /// Resolves the entry into concrete per-period parameters.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for every missing value when no preset is set.
    pub fn resolve(
        &self,
        granularity: PeriodGranularity,
        field: &str,
    ) -> Result<ScenarioParams, Vec<ConfigError>> {
        let base = self.preset.map(|p| p.params(granularity));
        let mut missing = Vec::new();
        let mut pick = |name: &str, value: Option<f64>, fallback: Option<f64>| {
            value.or(fallback).unwrap_or_else(|| {
                missing.push(ConfigError::new(
                    format!("{field}.{name}"),
                    "required when no preset is given",
                ));
                0.0
            })
        };

        let params = ScenarioParams {
            initial_electricity_cost: pick(
                "initial_electricity_cost",
                self.initial_electricity_cost,
                base.map(|b| b.initial_electricity_cost),
            ),
            electricity_growth_pct: pick(
                "electricity_growth_pct",
                self.electricity_growth_pct,
                base.map(|b| b.electricity_growth_pct),
            ),
            initial_capacity_price: pick(
                "initial_capacity_price",
                self.initial_capacity_price,
                base.map(|b| b.initial_capacity_price),
            ),
            capacity_price_growth_pct: pick(
                "capacity_price_growth_pct",
                self.capacity_price_growth_pct,
                base.map(|b| b.capacity_price_growth_pct),
            ),
            initial_activation_price: pick(
                "initial_activation_price",
                self.initial_activation_price,
                base.map(|b| b.initial_activation_price),
            ),
            activation_price_growth_pct: pick(
                "activation_price_growth_pct",
                self.activation_price_growth_pct,
                base.map(|b| b.activation_price_growth_pct),
            ),
        };

        if missing.is_empty() {
            Ok(params)
        } else {
            Err(missing)
        }
    }
}

impl ProjectConfig {
    /// Returns the baseline project: 10 MWh / 5 MW battery over 15 years, all presets.
    pub fn baseline() -> Self {
        Self {
            battery: BatteryConfig::default(),
            operational: OperationalConfig::default(),
            financial: FinancialConfig::default(),
            scenarios: Vec::new(),
        }
    }

    /// Returns the 2 MWh reference project used for calibration.
    pub fn reference_2mwh() -> Self {
        Self {
            battery: BatteryConfig {
                capacity_mwh: 2.0,
                power_rating_mw: 1.0,
                efficiency_pct: 90.0,
                reserved_capacity_pct: 10.0,
                availability_pct: 95.0,
            },
            scenarios: vec![ScenarioEntry {
                name: "Base".to_string(),
                preset: Some(ScenarioPreset::Base),
                ..ScenarioEntry::default()
            }],
            ..Self::baseline()
        }
    }

    /// Returns the baseline project projected quarterly over 15 years.
    pub fn quarterly() -> Self {
        Self {
            operational: OperationalConfig {
                life_periods: 60,
                granularity: PeriodGranularity::Quarter,
                ..OperationalConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns a monthly projection with the activation rate capped at 20 %.
    pub fn monthly_strict() -> Self {
        Self {
            operational: OperationalConfig {
                activation_rate_pct: 12.0,
                max_activation_rate_pct: 20.0,
                life_periods: 180,
                granularity: PeriodGranularity::Month,
                ..OperationalConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "reference_2mwh", "quarterly", "monthly_strict"];

    /// Loads a project from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "reference_2mwh" => Ok(Self::reference_2mwh()),
            "quarterly" => Ok(Self::quarterly()),
            "monthly_strict" => Ok(Self::monthly_strict()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a project from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a project from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all sections and scenarios and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.battery.validate();
        errors.extend(self.operational.validate());
        errors.extend(self.financial.validate());
        if let Err(scenario_errors) = self.scenario_set() {
            errors.extend(scenario_errors);
        }
        errors
    }

    /// Resolves `[[scenarios]]` into an ordered set; all presets when none are listed.
    ///
    /// # Errors
    ///
    /// Returns every missing, duplicate, unnamed or non-finite scenario value.
    pub fn scenario_set(&self) -> Result<ScenarioSet, Vec<ConfigError>> {
        let granularity = self.operational.granularity;
        if self.scenarios.is_empty() {
            return Ok(ScenarioSet::presets(granularity));
        }

        let mut set = ScenarioSet::new();
        let mut errors = Vec::new();
        for (i, entry) in self.scenarios.iter().enumerate() {
            let field = format!("scenarios[{i}]");
            let name = if entry.name.is_empty() {
                match entry.preset {
                    Some(p) => p.name().to_string(),
                    None => {
                        errors.push(ConfigError::new(format!("{field}.name"), "must not be empty"));
                        continue;
                    }
                }
            } else {
                entry.name.clone()
            };
            match entry.resolve(granularity, &field) {
                Ok(params) => {
                    errors.extend(params.validate(&field));
                    if set.insert(name.clone(), params).is_some() {
                        errors.push(ConfigError::new(
                            format!("{field}.name"),
                            format!("duplicate scenario name \"{name}\""),
                        ));
                    }
                }
                Err(missing) => errors.extend(missing),
            }
        }

        if errors.is_empty() {
            Ok(set)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ProjectConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ProjectConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ProjectConfig::PRESETS {
            let cfg = ProjectConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[battery]
capacity_mwh = 2.0
power_rating_mw = 1.0
efficiency_pct = 90.0
reserved_capacity_pct = 10.0
availability_pct = 95.0

[operational]
activation_rate_pct = 15.0
life_periods = 15
granularity = "year"

[financial]
investment_cost_per_mwh = 350000.0
discount_rate_pct = 6.0

[[scenarios]]
name = "Custom"
initial_electricity_cost = 50.0
electricity_growth_pct = 1.8
initial_capacity_price = 80.0
capacity_price_growth_pct = 1.8
initial_activation_price = 110.0
activation_price_growth_pct = 2.2

[[scenarios]]
preset = "pessimistic"
"#;
        let cfg = ProjectConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.unwrap();
        assert_eq!(cfg.battery.capacity_mwh, 2.0);
        assert_eq!(cfg.financial.discount_rate_pct, Some(6.0));
        let set = cfg.scenario_set().unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["Custom", "Pessimistic"]);
    }

    #[test]
    fn scenario_preset_names_are_case_insensitive() {
        let toml = r#"
[[scenarios]]
preset = "Optimistic"

[[scenarios]]
name = "Low"
preset = "PESSIMISTIC"
"#;
        let cfg = ProjectConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.scenarios[0].preset, Some(ScenarioPreset::Optimistic));
        assert_eq!(cfg.scenarios[1].preset, Some(ScenarioPreset::Pessimistic));

        let err = ProjectConfig::from_toml_str("[[scenarios]]\npreset = \"moonshot\"\n")
            .unwrap_err();
        assert!(err.message.contains("unknown preset"), "{err}");
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
capacity_mwh = 2.0
bogus_field = true
"#;
        assert!(ProjectConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[operational]
granularity = "month"
life_periods = 120
"#;
        let cfg = ProjectConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.operational.granularity, PeriodGranularity::Month);
        assert_eq!(cfg.battery.capacity_mwh, 10.0);
        assert_eq!(cfg.operational.activation_rate_pct, 15.0);
    }

    #[test]
    fn validation_catches_bad_battery() {
        let mut cfg = ProjectConfig::baseline();
        cfg.battery.capacity_mwh = 0.0;
        cfg.battery.power_rating_mw = -1.0;
        cfg.battery.efficiency_pct = 0.0;
        cfg.battery.availability_pct = 101.0;
        let errors = cfg.validate();
        for field in [
            "battery.capacity_mwh",
            "battery.power_rating_mw",
            "battery.efficiency_pct",
            "battery.availability_pct",
        ] {
            assert!(errors.iter().any(|e| e.field == field), "missing {field}");
        }
    }

    #[test]
    fn validation_catches_zero_life() {
        let mut cfg = ProjectConfig::baseline();
        cfg.operational.life_periods = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "operational.life_periods"));
    }

    #[test]
    fn validation_rejects_oversized_life() {
        let toml = "[operational]\nlife_periods = 9000000000000000000\n";
        let cfg = ProjectConfig::from_toml_str(toml).unwrap();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "operational.life_periods"));

        let mut cfg = ProjectConfig::baseline();
        cfg.operational.granularity = PeriodGranularity::Month;
        cfg.operational.life_periods = MAX_LIFE_PERIODS;
        assert!(cfg.validate().is_empty());
        cfg.operational.life_periods = MAX_LIFE_PERIODS + 1;
        assert_eq!(cfg.validate().len(), 1);
    }

    #[test]
    fn activation_bound_is_configurable() {
        let mut cfg = ProjectConfig::baseline();
        cfg.operational.activation_rate_pct = 35.0;
        assert!(cfg.validate().is_empty());

        cfg.operational.max_activation_rate_pct = 20.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "operational.activation_rate_pct")
        );
    }

    #[test]
    fn custom_scenario_requires_all_values() {
        let mut cfg = ProjectConfig::baseline();
        cfg.scenarios.push(ScenarioEntry {
            name: "Half".to_string(),
            initial_capacity_price: Some(70.0),
            ..ScenarioEntry::default()
        });
        let errors = cfg.validate();
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors.iter().all(|e| e.field.starts_with("scenarios[0].")));
    }

    #[test]
    fn preset_entry_accepts_overrides() {
        let entry = ScenarioEntry {
            name: "Cheap power".to_string(),
            preset: Some(ScenarioPreset::Base),
            initial_electricity_cost: Some(20.0),
            ..ScenarioEntry::default()
        };
        let params = entry.resolve(PeriodGranularity::Year, "s").unwrap();
        assert_eq!(params.initial_electricity_cost, 20.0);
        assert_eq!(params.initial_capacity_price, 80.0);
    }

    #[test]
    fn duplicate_scenario_names_rejected() {
        let mut cfg = ProjectConfig::baseline();
        for _ in 0..2 {
            cfg.scenarios.push(ScenarioEntry {
                preset: Some(ScenarioPreset::Base),
                ..ScenarioEntry::default()
            });
        }
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.message.contains("duplicate")));
    }

    #[test]
    fn total_investment_scales_with_capacity() {
        let cfg = ProjectConfig::reference_2mwh();
        assert_eq!(cfg.financial.total_investment(&cfg.battery), 700_000.0);
    }

    #[test]
    fn reduced_operating_hours_shrink_period() {
        let op = OperationalConfig {
            operating_hours_per_day: 12.0,
            ..OperationalConfig::default()
        };
        assert_eq!(op.hours_per_period(), 4380.0);
    }
}
