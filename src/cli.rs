//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

const MAX_PROJECTION_YEARS: i64 = 100;

#[derive(Debug, Parser)]
#[command(name = "solar-roi")]
#[command(author, version, about = "Solar sizing and payback estimator (FR / BE)")]
#[command(
    long_about = "Recommends a standard solar kit from a monthly electricity bill and \
    estimates production, savings, subsidies and payback.\n\
    \nExamples:\n  \
    solar-roi run                                  # Paris preset\n  \
    solar-roi run --preset bruxelles --battery\n  \
    solar-roi run --scenario home.toml --compare-battery\n  \
    solar-roi batch --input leads.csv --csv-out results.csv"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Estimate one household from a preset or scenario file
    Run(RunArgs),
    /// Estimate every household of a CSV file
    Batch(BatchArgs),
    /// Print the built-in settings defaults
    Defaults,
    /// Serve the HTTP API
    #[cfg(feature = "api")]
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Load scenario from TOML config file
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Built-in preset (paris, lyon_battery, bruxelles, liege)
    #[arg(long)]
    pub preset: Option<String>,

    /// TOML settings file overlaid on the scenario's settings
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Override the monthly bill (€)
    #[arg(long)]
    pub bill: Option<f64>,

    /// Override the country (FR or BE)
    #[arg(long)]
    pub country: Option<String>,

    /// Override the yield (kWh/kWc/yr)
    #[arg(long = "yield")]
    pub production_per_kwc: Option<f64>,

    /// Override the address (used for the Belgian region)
    #[arg(long)]
    pub address: Option<String>,

    /// Assume a home battery
    #[arg(long)]
    pub battery: bool,

    /// Size one tier up for anticipated consumption
    #[arg(long)]
    pub future_proof: bool,

    /// Also print the estimate with the battery option toggled
    #[arg(long)]
    pub compare_battery: bool,

    /// Print a savings projection over this many years (1-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_PROJECTION_YEARS))]
    pub projection_years: Option<u32>,

    /// Export the estimate(s) to CSV
    #[arg(long)]
    pub csv_out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// CSV file of households
    #[arg(long)]
    pub input: PathBuf,

    /// TOML settings file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Export results to CSV
    #[arg(long)]
    pub csv_out: Option<PathBuf>,
}

#[cfg(feature = "api")]
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// TOML settings file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// API server port
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}
