//! Error types shared by the projection engine, config loader and exporters.

use std::fmt;

use thiserror::Error;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_mwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Out-of-range or non-positive inputs; every offending field is listed.
    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ConfigError>),

    /// Payback cannot be derived from the cumulative cash flow.
    #[error("degenerate scenario: {0}")]
    DegenerateScenario(String),

    /// The IRR solver found no root.
    #[error("IRR did not converge after {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<ConfigError> for ProjectionError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(vec![err])
    }
}

impl From<Vec<ConfigError>> for ProjectionError {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::InvalidConfig(errors)
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_lists_every_field() {
        let err = ProjectionError::InvalidConfig(vec![
            ConfigError::new("battery.capacity_mwh", "must be > 0"),
            ConfigError::new("operational.life_periods", "must be >= 1"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("battery.capacity_mwh"));
        assert!(msg.contains("operational.life_periods"));
    }

    #[test]
    fn config_error_display_includes_field() {
        let e = ConfigError::new("battery.efficiency_pct", "must be in (0, 100]");
        assert_eq!(
            e.to_string(),
            "config error: battery.efficiency_pct: must be in (0, 100]"
        );
    }
}
