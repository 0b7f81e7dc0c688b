//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use solar_roi::config::EngineConfig;
use solar_roi::engine::types::{CountryCode, SimulationInput};
use solar_roi::settings::SettingMap;

/// Tolerance for monetary and energy comparisons.
pub const EPS: f64 = 1e-6;

/// Paris household: 100 €/month, 1100 kWh/kWc, no battery.
pub fn paris_input() -> SimulationInput {
    SimulationInput::builder(CountryCode::Fr)
        .monthly_bill(100.0)
        .coordinates(48.8566, 2.3522)
        .production_per_kwc(1100.0)
        .address("10 rue de Rivoli, 75004 Paris")
        .build()
}

/// Ixelles household: 80 €/month, 950 kWh/kWc, Brussels region.
pub fn ixelles_input() -> SimulationInput {
    SimulationInput::builder(CountryCode::Be)
        .monthly_bill(80.0)
        .coordinates(50.8333, 4.3667)
        .production_per_kwc(950.0)
        .address("Place Flagey 18, 1050 Ixelles")
        .build()
}

/// Liège household: 110 €/month, 930 kWh/kWc, Walloon region.
pub fn liege_input() -> SimulationInput {
    SimulationInput::builder(CountryCode::Be)
        .monthly_bill(110.0)
        .coordinates(50.6326, 5.5797)
        .production_per_kwc(930.0)
        .address("Rue Saint-Gilles 12, 4000 Liège")
        .build()
}

/// Empty snapshot: every setting resolves to its built-in default.
pub fn default_settings() -> SettingMap {
    SettingMap::new()
}

pub fn default_engine() -> EngineConfig {
    EngineConfig::default()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}
