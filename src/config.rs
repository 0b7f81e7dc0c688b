//! TOML-based scenario configuration, engine tunables and presets.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::cost::PremiumTable;
use crate::engine::production::SelfConsumptionRates;
use crate::engine::sizing::SizingTable;
use crate::engine::types::{CountryCode, DEFAULT_AZIMUTH_DEG, DEFAULT_SLOPE_DEG, SimulationInput};
use crate::error::SimulationError;
use crate::settings::SettingMap;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"input.pvgis_production_per_kwc"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

/// Engine tunables: sizing tiers, self-consumption assumptions and premium
/// bands. Defaults are placeholders to be checked against reference
/// calculations; all of them can be overridden from a scenario file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub sizing: SizingTable,
    pub self_consumption: SelfConsumptionRates,
    pub premiums: PremiumTable,
}

impl EngineConfig {
    /// Validates all tables and returns a list of errors.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.sizing.validate("engine.sizing");
        errors.extend(self.self_consumption.validate("engine.self_consumption"));
        errors.extend(self.premiums.validate("engine.premiums"));
        errors
    }

    /// Fails with the first validation problem, as a `Configuration` error.
    pub fn ensure_valid(&self) -> Result<(), SimulationError> {
        match self.validate().into_iter().next() {
            Some(e) => Err(SimulationError::Configuration {
                key: e.field,
                message: e.message,
            }),
            None => Ok(()),
        }
    }
}

/// Household section of a scenario file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// `"FR"` or `"BE"`, case-insensitive.
    pub country: String,
    /// Monthly electricity bill (€).
    pub monthly_bill: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Annual yield per kWc for the chosen orientation (kWh/kWc).
    pub pvgis_production_per_kwc: f64,
    /// Tilt (degrees).
    pub slope: f64,
    /// Azimuth (degrees, 0 = south).
    pub azimuth: f64,
    pub with_battery: bool,
    pub address: String,
    pub future_proof: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            country: "FR".to_string(),
            monthly_bill: 100.0,
            lat: Some(48.8566),
            lon: Some(2.3522),
            pvgis_production_per_kwc: 1100.0,
            slope: DEFAULT_SLOPE_DEG,
            azimuth: DEFAULT_AZIMUTH_DEG,
            with_battery: false,
            address: "10 rue de Rivoli, 75004 Paris".to_string(),
            future_proof: false,
        }
    }
}

/// Top-level scenario configuration parsed from TOML.
///
/// ```toml
/// [input]
/// country = "BE"
/// monthly_bill = 80
///
/// [settings]
/// BE_PROSUMER_TAX = 0
///
/// [engine.self_consumption]
/// battery_uplift = 0.15
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub input: InputConfig,
    /// Settings snapshot; free-form keys, unknown keys ignored.
    #[serde(default)]
    pub settings: SettingMap,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["paris", "lyon_battery", "bruxelles", "liege"];

    /// Paris, 100 €/month, default settings.
    pub fn paris() -> Self {
        Self::default()
    }

    /// Lyon, larger bill, battery, better yield.
    pub fn lyon_battery() -> Self {
        Self {
            input: InputConfig {
                monthly_bill: 150.0,
                lat: Some(45.764),
                lon: Some(4.8357),
                pvgis_production_per_kwc: 1250.0,
                with_battery: true,
                address: "Place Bellecour, 69002 Lyon".to_string(),
                ..InputConfig::default()
            },
            ..Self::default()
        }
    }

    /// Brussels (Ixelles): certificates credited, prosumer tax charged.
    pub fn bruxelles() -> Self {
        Self {
            input: InputConfig {
                country: "BE".to_string(),
                monthly_bill: 80.0,
                lat: Some(50.8333),
                lon: Some(4.3667),
                pvgis_production_per_kwc: 950.0,
                address: "Place Flagey 18, 1050 Ixelles".to_string(),
                ..InputConfig::default()
            },
            ..Self::default()
        }
    }

    /// Liège: Wallonia, no certificate credit by default.
    pub fn liege() -> Self {
        Self {
            input: InputConfig {
                country: "BE".to_string(),
                monthly_bill: 110.0,
                lat: Some(50.6326),
                lon: Some(5.5797),
                pvgis_production_per_kwc: 930.0,
                address: "Rue Saint-Gilles 12, 4000 Liège".to_string(),
                ..InputConfig::default()
            },
            ..Self::default()
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "paris" => Ok(Self::paris()),
            "lyon_battery" => Ok(Self::lyon_battery()),
            "bruxelles" => Ok(Self::bruxelles()),
            "liege" => Ok(Self::liege()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let i = &self.input;

        if let Err(e) = i.country.parse::<CountryCode>() {
            errors.push(ConfigError {
                field: "input.country".into(),
                message: e.to_string(),
            });
        }
        if !i.monthly_bill.is_finite() || i.monthly_bill < 0.0 {
            errors.push(ConfigError {
                field: "input.monthly_bill".into(),
                message: "must be a finite number >= 0".into(),
            });
        }
        for (field, value, bound) in [("input.lat", i.lat, 90.0), ("input.lon", i.lon, 180.0)] {
            match value {
                None => errors.push(ConfigError {
                    field: field.into(),
                    message: "is required".into(),
                }),
                Some(v) if !(-bound..=bound).contains(&v) => errors.push(ConfigError {
                    field: field.into(),
                    message: format!("must be within [-{bound}, {bound}]"),
                }),
                Some(_) => {}
            }
        }
        if !i.pvgis_production_per_kwc.is_finite() || i.pvgis_production_per_kwc <= 0.0 {
            errors.push(ConfigError {
                field: "input.pvgis_production_per_kwc".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=90.0).contains(&i.slope) {
            errors.push(ConfigError {
                field: "input.slope".into(),
                message: "must be in [0, 90]".into(),
            });
        }
        if !(-180.0..=180.0).contains(&i.azimuth) {
            errors.push(ConfigError {
                field: "input.azimuth".into(),
                message: "must be in [-180, 180]".into(),
            });
        }

        errors.extend(self.engine.validate());
        errors
    }

    /// Builds the engine input from the `[input]` section.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` on `input.country` if the country is unknown.
    pub fn to_input(&self) -> Result<SimulationInput, ConfigError> {
        let i = &self.input;
        let country = i.country.parse::<CountryCode>().map_err(|e| ConfigError {
            field: "input.country".into(),
            message: e.to_string(),
        })?;
        Ok(SimulationInput {
            monthly_bill: i.monthly_bill,
            lat: i.lat,
            lon: i.lon,
            country_code: country,
            pvgis_production_per_kwc: i.pvgis_production_per_kwc,
            slope: i.slope,
            azimuth: i.azimuth,
            with_battery: i.with_battery,
            address: i.address.clone(),
            future_proof: i.future_proof,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::keys;

    #[test]
    fn paris_preset_valid() {
        let cfg = ScenarioConfig::paris();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "paris should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("marseille");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[input]
country = "be"
monthly_bill = 80
lat = 50.8333
lon = 4.3667
pvgis_production_per_kwc = 950
address = "Place Flagey 18, 1050 Ixelles"
with_battery = true

[settings]
BE_PROSUMER_TAX = 0
BE_GREEN_CERTS_BRU = "450"
SOME_CMS_KEY = "ignored"

[engine.self_consumption]
battery_uplift = 0.15

[engine.sizing]
small_bill_limit = 50
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        let input = cfg.as_ref().map(|c| c.to_input());
        assert_eq!(
            input.as_ref().and_then(|i| i.as_ref().ok()).map(|i| i.country_code),
            Some(CountryCode::Be)
        );
        assert_eq!(
            cfg.as_ref().and_then(|c| c.settings.number(keys::BE_GREEN_CERTS_BRU)),
            Some(450.0)
        );
        assert_eq!(
            cfg.as_ref().map(|c| c.engine.self_consumption.battery_uplift),
            Some(0.15)
        );
        // unset tables keep defaults
        assert_eq!(cfg.as_ref().map(|c| c.engine.sizing.largest_size_kwc), Some(9.0));
        assert_eq!(cfg.as_ref().map(|c| c.engine.sizing.small_bill_limit), Some(50.0));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[input]
monthly_bill = 100
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[input]
monthly_bill = 140
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.input.monthly_bill), Some(140.0));
        assert_eq!(cfg.as_ref().map(|c| &*c.input.country), Some("FR"));
        assert_eq!(cfg.as_ref().map(|c| c.settings.is_empty()), Some(true));
    }

    #[test]
    fn validation_catches_unknown_country() {
        let mut cfg = ScenarioConfig::paris();
        cfg.input.country = "DE".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "input.country"));
        assert!(cfg.to_input().is_err());
    }

    #[test]
    fn validation_catches_missing_coordinates() {
        let mut cfg = ScenarioConfig::paris();
        cfg.input.lon = None;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "input.lon"));
    }

    #[test]
    fn validation_catches_zero_yield() {
        let mut cfg = ScenarioConfig::paris();
        cfg.input.pvgis_production_per_kwc = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "input.pvgis_production_per_kwc"));
    }

    #[test]
    fn validation_reports_engine_tables() {
        let mut cfg = ScenarioConfig::paris();
        cfg.engine.self_consumption.battery_uplift = -0.1;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "engine.self_consumption.battery_uplift")
        );
    }

    #[test]
    fn ensure_valid_names_first_problem() {
        let mut engine = EngineConfig::default();
        engine.sizing.small_size_kwc = 0.0;
        let err = engine.ensure_valid().unwrap_err();
        assert_eq!(err.subject(), "engine.sizing.sizes");
    }
}
