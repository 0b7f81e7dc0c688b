//! Sizing and financial-return engine.
//!
//! Everything here is synchronous and side-effect free apart from `tracing`
//! events; callers fetch yield and settings beforehand and pass them in.

pub mod calculator;
/// Bill-to-consumption conversion.
pub mod consumption;
/// Installation cost, premium bands and net cost.
pub mod cost;
pub mod policy;
pub mod production;
pub mod projection;
/// Belgian region inference.
pub mod region;
pub mod roi;
/// Discrete sizing table.
pub mod sizing;
pub mod types;
pub mod what_if;

pub use calculator::calculate_recommended_system;
pub use policy::{Belgium, CountryPolicy, France, Policy};
pub use projection::{SavingsProjection, project_savings};
pub use region::{BelgianRegion, classify_belgian_region};
pub use roi::Payback;
pub use types::{CountryCode, SimulationInput, SimulationResult};
pub use what_if::{WhatIf, recalculate};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::settings::SettingMap;

/// Settings snapshot and engine tunables bundled for repeated estimates.
///
/// Settings are fetched once per session and reused across recalculations;
/// the estimator itself holds no per-call state.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    settings: SettingMap,
    config: EngineConfig,
}

impl Estimator {
    pub fn new(settings: SettingMap) -> Self {
        Self {
            settings,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn settings(&self) -> &SettingMap {
        &self.settings
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calculate(&self, input: &SimulationInput) -> Result<SimulationResult> {
        calculate_recommended_system(input, &self.settings, &self.config)
    }

    pub fn recalculate(
        &self,
        input: &SimulationInput,
        change: &WhatIf,
    ) -> Result<(SimulationInput, SimulationResult)> {
        recalculate(input, change, &self.settings, &self.config)
    }

    /// Projection using the snapshot's `ELECTRICITY_PRICE_INFLATION`.
    pub fn project(&self, result: &SimulationResult, horizon_years: u32) -> SavingsProjection {
        let inflation = self
            .settings
            .number(crate::settings::keys::ELECTRICITY_PRICE_INFLATION)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        project_savings(result, horizon_years, inflation)
    }
}
