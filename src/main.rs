//! Solar estimator entry point: CLI wiring and scenario-driven estimates.

mod cli;

use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use solar_roi::config::ScenarioConfig;
use solar_roi::engine::types::{SimulationInput, SimulationResult};
use solar_roi::engine::{Estimator, WhatIf};
use solar_roi::io::batch::read_batch_file;
use solar_roi::io::export::{ExportRow, export_csv};
use solar_roi::settings::{SOLAR_CONSTANTS, SettingMap};

use cli::{BatchArgs, Cli, Commands, RunArgs};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("solar_roi=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints the message and exits with status 1.
fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}

fn load_settings(path: Option<&Path>) -> SettingMap {
    match path {
        Some(p) => SettingMap::from_toml_file(p).unwrap_or_else(|e| fail(e)),
        None => SettingMap::new(),
    }
}

fn write_csv_or_exit(rows: &[ExportRow<'_>], path: &Path) {
    if let Err(e) = export_csv(rows, path) {
        fail(format!("error: failed to write CSV: {e}"));
    }
    eprintln!("Results written to {}", path.display());
}

fn load_scenario(args: &RunArgs) -> ScenarioConfig {
    // --scenario takes priority, then --preset, then the Paris default
    let mut scenario = if let Some(ref path) = args.scenario {
        ScenarioConfig::from_toml_file(path).unwrap_or_else(|e| fail(e))
    } else if let Some(ref name) = args.preset {
        ScenarioConfig::from_preset(name).unwrap_or_else(|e| fail(e))
    } else {
        ScenarioConfig::paris()
    };

    let overlay = load_settings(args.settings.as_deref());
    scenario.settings = scenario.settings.merged(&overlay);

    let input = &mut scenario.input;
    if let Some(bill) = args.bill {
        input.monthly_bill = bill;
    }
    if let Some(ref country) = args.country {
        input.country.clone_from(country);
    }
    if let Some(kwh) = args.production_per_kwc {
        input.pvgis_production_per_kwc = kwh;
    }
    if let Some(ref address) = args.address {
        input.address.clone_from(address);
    }
    if args.battery {
        input.with_battery = true;
    }
    if args.future_proof {
        input.future_proof = true;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    scenario
}

fn run(args: &RunArgs) {
    let scenario = load_scenario(args);
    let input = scenario.to_input().unwrap_or_else(|e| fail(e));
    let estimator = Estimator::new(scenario.settings).with_config(scenario.engine);

    let result = estimator
        .calculate(&input)
        .unwrap_or_else(|e| fail(format!("error: {e}")));
    println!("{result}");

    let mut estimates: Vec<(SimulationInput, SimulationResult)> = Vec::new();
    if args.compare_battery {
        let change = WhatIf::battery(!input.with_battery);
        let (alt_input, alt_result) = estimator
            .recalculate(&input, &change)
            .unwrap_or_else(|e| fail(format!("error: {e}")));
        let label = if alt_input.with_battery {
            "avec batterie"
        } else {
            "sans batterie"
        };
        println!("\n[{label}]\n{alt_result}");
        estimates.push((alt_input, alt_result));
    }

    if let Some(years) = args.projection_years {
        let projection = estimator.project(&result, years);
        println!("\n{projection}");
    }

    if let Some(ref path) = args.csv_out {
        let mut rows = vec![ExportRow {
            input: &input,
            result: &result,
        }];
        rows.extend(estimates.iter().map(|(i, r)| ExportRow {
            input: i,
            result: r,
        }));
        write_csv_or_exit(&rows, path);
    }
}

fn batch(args: &BatchArgs) {
    let rows = read_batch_file(&args.input).unwrap_or_else(|e| fail(format!("error: {e}")));
    let estimator = Estimator::new(load_settings(args.settings.as_deref()));

    let mut results = Vec::with_capacity(rows.len());
    for row in &rows {
        match estimator.calculate(&row.input) {
            Ok(r) => results.push(r),
            Err(e) => fail(format!("error: batch line {}: {e}", row.line)),
        }
    }

    for (row, result) in rows.iter().zip(&results) {
        println!(
            "{} {:>7.2} €/mois -> {} kWc, net {}, retour {}",
            row.input.country_code,
            row.input.monthly_bill,
            result.system_size,
            solar_roi::report::format_eur(result.net_cost),
            result.roi_years
        );
    }

    if let Some(ref path) = args.csv_out {
        let export: Vec<ExportRow<'_>> = rows
            .iter()
            .zip(&results)
            .map(|(row, result)| ExportRow {
                input: &row.input,
                result,
            })
            .collect();
        write_csv_or_exit(&export, path);
    }
}

fn defaults() {
    for (key, value) in SOLAR_CONSTANTS {
        println!("{key} = {value}");
    }
}

#[cfg(feature = "api")]
fn serve(args: &cli::ServeArgs) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(solar_roi::api::AppState {
        estimator: Estimator::new(load_settings(args.settings.as_deref())),
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let rt = tokio::runtime::Runtime::new()
        .unwrap_or_else(|e| fail(format!("error: failed to create tokio runtime: {e}")));
    if let Err(e) = rt.block_on(solar_roi::api::serve(state, addr)) {
        fail(format!("error: API server failed: {e}"));
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(ref args) => run(args),
        Commands::Batch(ref args) => batch(args),
        Commands::Defaults => defaults(),
        #[cfg(feature = "api")]
        Commands::Serve(ref args) => serve(args),
    }
}
