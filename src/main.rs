//! aFRR projection entry point: CLI wiring and config-driven engine construction.

use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use afrr_sim::cli::{self, CliOptions};
use afrr_sim::config::ProjectConfig;
use afrr_sim::io::export::export_report_csv;
use afrr_sim::model::{ProjectOverview, ProjectionReport, ProjectionSummary, ScenarioEngine};
use afrr_sim::reference::StaticPriceSource;

fn load_config(cli: &CliOptions) -> ProjectConfig {
    // --config takes priority; the parser falls back to the baseline preset
    let loaded = if let Some(ref path) = cli.config {
        ProjectConfig::from_toml_file(path)
    } else {
        ProjectConfig::from_preset(cli.preset.as_deref().unwrap_or("baseline"))
    };
    match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn main() {
    let cli = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };
    if cli.help {
        cli::print_usage();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("afrr_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut project = load_config(&cli);

    if let Some(rate) = cli.discount_rate_pct {
        project.financial.discount_rate_pct = Some(rate);
    }

    let errors = project.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let engine = match ScenarioEngine::new(
        project.battery.clone(),
        project.operational.clone(),
        project.financial.clone(),
    ) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let mut scenarios = match project.scenario_set() {
        Ok(set) => set,
        Err(errors) => {
            for e in &errors {
                eprintln!("{e}");
            }
            process::exit(1);
        }
    };
    if let Some(ref name) = cli.scenario {
        if let Err(e) = scenarios.retain_only(name) {
            eprintln!("{e}");
            process::exit(1);
        }
    }

    info!(
        scenarios = scenarios.len(),
        periods = project.operational.life_periods,
        granularity = %project.operational.granularity,
        "projecting"
    );
    let report = ProjectionReport::run(&engine, &scenarios);

    println!("{}\n", ProjectOverview::new(&engine, &StaticPriceSource));

    for result in &report.results {
        if !cli.quiet {
            for r in &result.rows {
                println!("{r}");
            }
            println!();
        }
        println!("{}", ProjectionSummary::from_result(result));
    }

    println!("{report}");

    if let Some(ref path) = cli.export {
        if let Err(e) = export_report_csv(&report, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path.display(), "projection table written");
    }

    if report.results.is_empty() {
        process::exit(1);
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(afrr_sim::api::AppState::new(project, &engine, report));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("error: failed to create tokio runtime: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = rt.block_on(afrr_sim::api::serve(state, addr)) {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
