//! Tariff, cost and subsidy settings with built-in fallbacks.
//!
//! Settings arrive from an external key-value store as a flat map of
//! `key -> number | string`. Every key the engine reads has a default in
//! [`SOLAR_CONSTANTS`], so an empty map is a valid snapshot. Unknown keys are
//! carried along and ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::{Result, SimulationError};

/// Recognized setting keys.
pub mod keys {
    pub const FR_ELECTRICITY_PRICE: &str = "FR_ELECTRICITY_PRICE";
    pub const BE_ELECTRICITY_PRICE: &str = "BE_ELECTRICITY_PRICE";
    pub const FR_COST_PER_KWC: &str = "FR_COST_PER_KWC";
    pub const BE_COST_PER_KWC: &str = "BE_COST_PER_KWC";
    pub const FR_SURPLUS_RESALE: &str = "FR_SURPLUS_RESALE";
    pub const BE_INJECTION_PRICE: &str = "BE_INJECTION_PRICE";
    pub const BE_PROSUMER_TAX: &str = "BE_PROSUMER_TAX";
    pub const FR_PRIME_AUTOCONSO_3KW: &str = "FR_PRIME_AUTOCONSO_3KW";
    pub const FR_PRIME_AUTOCONSO_9KW: &str = "FR_PRIME_AUTOCONSO_9KW";
    pub const FR_PRIME_AUTOCONSO_36KW: &str = "FR_PRIME_AUTOCONSO_36KW";
    pub const BE_GREEN_CERTS_BRU: &str = "BE_GREEN_CERTS_BRU";
    pub const BE_GREEN_CERTS_WAL: &str = "BE_GREEN_CERTS_WAL";
    pub const ELECTRICITY_PRICE_INFLATION: &str = "ELECTRICITY_PRICE_INFLATION";
}

/// Built-in defaults used when a key is absent from the snapshot.
///
/// Units: prices in €/kWh, costs, premiums, certificates and the prosumer
/// tax in €/kWc (the tax per year), inflation as a yearly fraction.
pub const SOLAR_CONSTANTS: &[(&str, f64)] = &[
    (keys::FR_ELECTRICITY_PRICE, 0.27),
    (keys::BE_ELECTRICITY_PRICE, 0.37),
    (keys::FR_COST_PER_KWC, 1800.0),
    (keys::BE_COST_PER_KWC, 1500.0),
    (keys::FR_SURPLUS_RESALE, 0.13),
    (keys::BE_INJECTION_PRICE, 0.05),
    (keys::BE_PROSUMER_TAX, 88.0),
    (keys::FR_PRIME_AUTOCONSO_3KW, 220.0),
    (keys::FR_PRIME_AUTOCONSO_9KW, 160.0),
    (keys::FR_PRIME_AUTOCONSO_36KW, 100.0),
    (keys::BE_GREEN_CERTS_BRU, 500.0),
    (keys::BE_GREEN_CERTS_WAL, 0.0),
    (keys::ELECTRICITY_PRICE_INFLATION, 0.03),
];

/// Returns the built-in default for `key`, if it is a recognized key.
pub fn default_value(key: &str) -> Option<f64> {
    SOLAR_CONSTANTS
        .iter()
        .find_map(|(k, v)| if *k == key { Some(*v) } else { None })
}

/// A single setting value as stored by the settings provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(f64),
    Text(String),
}

impl SettingValue {
    /// Numeric reading of the value.
    ///
    /// Text is accepted when it parses as a number, with either `.` or `,`
    /// as decimal separator (`"0,27"`).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        }
    }
}

impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Snapshot of the settings store, passed explicitly to every estimation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingMap {
    values: BTreeMap<String, SettingValue>,
}

impl SettingMap {
    /// Creates an empty snapshot; every lookup falls back to the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a snapshot holding every built-in default explicitly.
    pub fn with_defaults() -> Self {
        SOLAR_CONSTANTS
            .iter()
            .fold(Self::new(), |map, (k, v)| map.with(k, *v))
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<SettingValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<SettingValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlays `other` on top of `self`; keys in `other` win.
    pub fn merged(mut self, other: &SettingMap) -> Self {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
        self
    }

    /// Resolves a numeric setting, falling back to the built-in default.
    ///
    /// Returns `None` only for an unrecognized key that is also absent from
    /// the snapshot.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(value) => match value.as_number() {
                Some(n) => Some(n),
                None => {
                    tracing::debug!(key, ?value, "non-numeric setting, using default");
                    default_value(key)
                }
            },
            None => default_value(key),
        }
    }

    /// Resolves a setting that must be strictly positive (prices, costs).
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when the resolved value is zero,
    /// negative, non-finite or absent.
    pub fn positive(&self, key: &str) -> Result<f64> {
        let value = self.resolve(key)?;
        if value <= 0.0 {
            return Err(SimulationError::configuration(
                key,
                format!("must be > 0, got {value}"),
            ));
        }
        Ok(value)
    }

    /// Resolves a setting that may be zero but never negative.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when the resolved value is negative,
    /// non-finite or absent.
    pub fn non_negative(&self, key: &str) -> Result<f64> {
        let value = self.resolve(key)?;
        if value < 0.0 {
            return Err(SimulationError::configuration(
                key,
                format!("must be >= 0, got {value}"),
            ));
        }
        Ok(value)
    }

    /// Resolves a credit amount (premium, certificates). Negative values are
    /// a data anomaly: logged and treated as no credit.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when the value is non-finite or absent.
    pub fn credit(&self, key: &str) -> Result<f64> {
        let value = self.resolve(key)?;
        if value < 0.0 {
            tracing::warn!(key, value, "negative credit in settings, treating as 0");
            return Ok(0.0);
        }
        Ok(value)
    }

    fn resolve(&self, key: &str) -> Result<f64> {
        let value = self
            .number(key)
            .ok_or_else(|| SimulationError::configuration(key, "no value and no default"))?;
        if !value.is_finite() {
            return Err(SimulationError::configuration(key, "must be finite"));
        }
        Ok(value)
    }

    /// Parses a flat TOML table of settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or a value is neither
    /// a number nor a string.
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "settings".to_string(),
            message: e.to_string(),
        })
    }

    /// Reads a flat TOML settings file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "settings".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }
}
