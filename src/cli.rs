//! Command-line argument parsing for the `afrr-sim` binary.

use std::env;
use std::path::PathBuf;

use crate::config::ProjectConfig;

/// Default port for `--serve`.
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    /// TOML project file; mutually exclusive with `preset`.
    pub config: Option<PathBuf>,
    /// Built-in project preset; defaults to `baseline` when no config is given.
    pub preset: Option<String>,
    /// Restrict the run to one named scenario.
    pub scenario: Option<String>,
    /// Overrides `financial.discount_rate_pct`.
    pub discount_rate_pct: Option<f64>,
    /// CSV destination for every projected period.
    pub export: Option<PathBuf>,
    /// Suppress the per-period tables.
    pub quiet: bool,
    pub help: bool,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: u16,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_options(&args)
}

pub fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut config = None;
    let mut preset = None;
    let mut scenario = None;
    let mut discount_rate_pct = None;
    let mut export = None;
    let mut quiet = false;
    let mut help = false;
    #[cfg(feature = "api")]
    let mut serve = false;
    #[cfg(feature = "api")]
    let mut port = DEFAULT_PORT;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --config (expected a TOML file path)",
                )?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(
                    i,
                    "missing value for --preset (expected a preset name)",
                )?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--scenario" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --scenario (expected a scenario name)")?;
                if scenario.replace(name.to_string()).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--discount-rate" => {
                i += 1;
                let raw = args.next_or_err(
                    i,
                    "missing value for --discount-rate (expected an annual percentage)",
                )?;
                let rate = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|r| r.is_finite())
                    .ok_or_else(|| format!("--discount-rate value \"{raw}\" is not a number"))?;
                discount_rate_pct = Some(rate);
            }
            "--export" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --export (expected a file path)")?;
                if export.replace(PathBuf::from(path)).is_some() {
                    return Err("--export provided more than once".to_string());
                }
            }
            "--quiet" | "-q" => quiet = true,
            "--help" | "-h" => help = true,
            #[cfg(feature = "api")]
            "--serve" => serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if config.is_some() && preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if config.is_none() && preset.is_none() {
        preset = Some("baseline".to_string());
    }

    Ok(CliOptions {
        config,
        preset,
        scenario,
        discount_rate_pct,
        export,
        quiet,
        help,
        #[cfg(feature = "api")]
        serve,
        #[cfg(feature = "api")]
        port,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("afrr-sim - battery storage projections for the aFRR market");
    eprintln!();
    eprintln!("Usage: afrr-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load project from a TOML file");
    eprintln!("  --preset <name>          Use a built-in project:");
    eprintln!("                           {}", ProjectConfig::PRESETS.join(", "));
    eprintln!("  --scenario <name>        Project only the named scenario");
    eprintln!("  --discount-rate <pct>    Override the annual discount rate");
    eprintln!("  --export <path>          Write all projected periods to CSV");
    eprintln!("  -q, --quiet              Print summaries only");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after projecting");
        eprintln!("  --port <u16>             API server port (default: {DEFAULT_PORT})");
    }
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("If neither --config nor --preset is given, the baseline preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: afrr_sim=info).");
}

#[cfg(test)]
mod tests {
    use super::parse_options;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_baseline_preset() {
        let opts = parse_options(&[]).expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("baseline"));
        assert!(opts.config.is_none());
        assert!(!opts.quiet);
        assert!(!opts.help);
    }

    #[test]
    fn supports_config_cli() {
        let opts =
            parse_options(&args(&["--config", "project.toml"])).expect("parse should succeed");
        assert_eq!(
            opts.config.as_deref().and_then(|p| p.to_str()),
            Some("project.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn supports_all_run_flags() {
        let opts = parse_options(&args(&[
            "--preset",
            "quarterly",
            "--scenario",
            "Base",
            "--discount-rate",
            "6.5",
            "--export",
            "out.csv",
            "-q",
        ]))
        .expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("quarterly"));
        assert_eq!(opts.scenario.as_deref(), Some("Base"));
        assert_eq!(opts.discount_rate_pct, Some(6.5));
        assert_eq!(opts.export.as_deref().and_then(|p| p.to_str()), Some("out.csv"));
        assert!(opts.quiet);
    }

    #[test]
    fn config_and_preset_conflict() {
        let err =
            parse_options(&args(&["--config", "a.toml", "--preset", "baseline"])).unwrap_err();
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn missing_value_is_reported() {
        let err = parse_options(&args(&["--export"])).unwrap_err();
        assert!(err.contains("--export"));
    }

    #[test]
    fn rejects_bad_discount_rate() {
        assert!(parse_options(&args(&["--discount-rate", "abc"])).is_err());
        assert!(parse_options(&args(&["--discount-rate", "NaN"])).is_err());
    }

    #[test]
    fn rejects_unknown_flag() {
        let err = parse_options(&args(&["--seed", "42"])).unwrap_err();
        assert_eq!(err, "unknown argument: --seed");
    }

    #[test]
    fn help_is_flagged_not_fatal() {
        let opts = parse_options(&args(&["--help"])).expect("parse should succeed");
        assert!(opts.help);
    }
}
