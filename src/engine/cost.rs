//! Installation cost and incentive arithmetic.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::Result;
use crate::settings::{SettingMap, keys};

/// One premium power band: systems up to and including `max_kwc` receive the
/// per-kWc amount stored under `setting_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PremiumBand {
    pub max_kwc: f64,
    pub setting_key: String,
}

/// Premium bands keyed by installed power, independent of the sizing tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PremiumTable {
    pub bands: Vec<PremiumBand>,
}

impl Default for PremiumTable {
    fn default() -> Self {
        let band = |max_kwc: f64, key: &str| PremiumBand {
            max_kwc,
            setting_key: key.to_string(),
        };
        Self {
            bands: vec![
                band(3.0, keys::FR_PRIME_AUTOCONSO_3KW),
                band(9.0, keys::FR_PRIME_AUTOCONSO_9KW),
                band(36.0, keys::FR_PRIME_AUTOCONSO_36KW),
            ],
        }
    }
}

impl PremiumTable {
    /// Band applying to `system_size_kwc`, or `None` above the last band.
    pub fn band_for(&self, system_size_kwc: f64) -> Option<&PremiumBand> {
        self.bands.iter().find(|b| system_size_kwc <= b.max_kwc)
    }

    /// Premium (€) for `system_size_kwc`: the band's per-kWc rate times size.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when the band's setting is non-finite.
    pub fn premium(&self, system_size_kwc: f64, settings: &SettingMap) -> Result<f64> {
        match self.band_for(system_size_kwc) {
            Some(band) => Ok(settings.credit(&band.setting_key)? * system_size_kwc),
            None => Ok(0.0),
        }
    }

    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut previous = 0.0_f64;
        for (i, band) in self.bands.iter().enumerate() {
            if !band.max_kwc.is_finite() || band.max_kwc <= previous {
                errors.push(ConfigError {
                    field: format!("{prefix}.bands[{i}].max_kwc"),
                    message: format!("must be finite and > {previous}"),
                });
            }
            if band.setting_key.trim().is_empty() {
                errors.push(ConfigError {
                    field: format!("{prefix}.bands[{i}].setting_key"),
                    message: "must not be empty".into(),
                });
            }
            previous = band.max_kwc;
        }
        errors
    }
}

/// Gross installation cost (€).
pub fn total_cost(system_size_kwc: f64, cost_per_kwc: f64) -> f64 {
    system_size_kwc * cost_per_kwc
}

/// Net cost (€) after subtracting `premium`, clamped at zero.
///
/// A premium larger than the installation cost points at bad settings data;
/// it is logged, not treated as an error.
pub fn net_cost(total_cost: f64, premium: f64) -> f64 {
    let premium = premium.max(0.0);
    if premium > total_cost {
        tracing::warn!(
            total_cost,
            premium,
            "premium exceeds installation cost, clamping net cost to 0"
        );
        return 0.0;
    }
    total_cost - premium
}
