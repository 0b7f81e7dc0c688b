//! Production and self-consumption savings.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Self-consumption assumptions per country, plus the battery uplift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelfConsumptionRates {
    /// Share of production consumed on site without storage (FR).
    pub france: f64,
    /// Share of production consumed on site without storage (BE).
    pub belgium: f64,
    /// Absolute increase of the share when a battery is installed.
    pub battery_uplift: f64,
}

impl Default for SelfConsumptionRates {
    fn default() -> Self {
        Self {
            france: 0.45,
            belgium: 0.40,
            battery_uplift: 0.20,
        }
    }
}

impl SelfConsumptionRates {
    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors: Vec<ConfigError> = [("france", self.france), ("belgium", self.belgium)]
            .into_iter()
            .filter(|(_, v)| !(0.0..=1.0).contains(v))
            .map(|(name, _)| ConfigError {
                field: format!("{prefix}.{name}"),
                message: "must be in [0.0, 1.0]".into(),
            })
            .collect();
        // a battery must strictly raise the self-consumed share
        if !(self.battery_uplift > 0.0 && self.battery_uplift <= 1.0) {
            errors.push(ConfigError {
                field: format!("{prefix}.battery_uplift"),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
        errors
    }
}

/// Annual production (kWh) of `system_size_kwc` at the given yield.
pub fn annual_production(system_size_kwc: f64, production_per_kwc: f64) -> f64 {
    system_size_kwc * production_per_kwc
}

/// Self-consumption share after the optional battery uplift, clamped to 1.
pub fn effective_rate(base_rate: f64, with_battery: bool, battery_uplift: f64) -> f64 {
    let rate = if with_battery {
        base_rate + battery_uplift
    } else {
        base_rate
    };
    rate.clamp(0.0, 1.0)
}

/// Splits production into `(self_consumed_kwh, surplus_kwh)`.
pub fn split_production(annual_production_kwh: f64, rate: f64) -> (f64, f64) {
    let self_consumed = annual_production_kwh * rate;
    (self_consumed, annual_production_kwh - self_consumed)
}
