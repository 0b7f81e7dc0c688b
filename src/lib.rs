//! Residential solar sizing and payback estimation for France and Belgium.

#[cfg(feature = "api")]
pub mod api;
/// Scenario files, presets and engine tunables.
pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod report;
/// Tariff and subsidy settings with built-in fallbacks.
pub mod settings;

pub use error::SimulationError;
