//! Engine input and result types.
//!
//! Field names serialize in camelCase: downstream formatting (lead capture,
//! report email, display) reads `systemSize`, `annualProduction`, ... with
//! the units documented on each field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::region::BelgianRegion;
use super::roi::Payback;
use crate::error::SimulationError;

/// Default panel tilt in degrees.
pub const DEFAULT_SLOPE_DEG: f64 = 35.0;
/// Default panel azimuth in degrees (0 = south).
pub const DEFAULT_AZIMUTH_DEG: f64 = 0.0;

/// Supported markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CountryCode {
    Fr,
    Be,
}

impl CountryCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fr => "FR",
            Self::Be => "BE",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountryCode {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FR" => Ok(Self::Fr),
            "BE" => Ok(Self::Be),
            other => Err(SimulationError::invalid_input(
                "countryCode",
                format!("unsupported country \"{other}\", expected FR or BE"),
            )),
        }
    }
}

impl TryFrom<String> for CountryCode {
    type Error = SimulationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CountryCode> for String {
    fn from(c: CountryCode) -> Self {
        c.as_str().to_string()
    }
}

fn default_slope() -> f64 {
    DEFAULT_SLOPE_DEG
}

/// Everything the engine needs about one household, already resolved by the
/// caller (coordinates geocoded, yield fetched for the chosen orientation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    /// Current monthly electricity spend (€).
    pub monthly_bill: f64,
    /// Latitude (decimal degrees). Required.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude (decimal degrees). Required.
    #[serde(default)]
    pub lon: Option<f64>,
    pub country_code: CountryCode,
    /// Annual yield per installed kWc at this tilt/azimuth (kWh/kWc/yr).
    pub pvgis_production_per_kwc: f64,
    /// Panel tilt (degrees, 0-90).
    #[serde(default = "default_slope")]
    pub slope: f64,
    /// Panel orientation (degrees, 0 = south).
    #[serde(default)]
    pub azimuth: f64,
    #[serde(default)]
    pub with_battery: bool,
    /// Free-text address; only used to infer the Belgian region.
    #[serde(default)]
    pub address: String,
    /// Household expects higher consumption soon (EV, heat pump).
    #[serde(default)]
    pub future_proof: bool,
}

impl SimulationInput {
    /// Starts a builder with the documented defaults for optional fields.
    pub fn builder(country_code: CountryCode) -> SimulationInputBuilder {
        SimulationInputBuilder {
            input: Self {
                monthly_bill: 0.0,
                lat: None,
                lon: None,
                country_code,
                pvgis_production_per_kwc: 0.0,
                slope: DEFAULT_SLOPE_DEG,
                azimuth: DEFAULT_AZIMUTH_DEG,
                with_battery: false,
                address: String::new(),
                future_proof: false,
            },
        }
    }
}

/// Builder for [`SimulationInput`]. Performs no validation; the engine does.
#[derive(Debug, Clone)]
pub struct SimulationInputBuilder {
    input: SimulationInput,
}

impl SimulationInputBuilder {
    pub fn monthly_bill(mut self, eur: f64) -> Self {
        self.input.monthly_bill = eur;
        self
    }

    pub fn coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.input.lat = Some(lat);
        self.input.lon = Some(lon);
        self
    }

    pub fn production_per_kwc(mut self, kwh: f64) -> Self {
        self.input.pvgis_production_per_kwc = kwh;
        self
    }

    pub fn orientation(mut self, slope: f64, azimuth: f64) -> Self {
        self.input.slope = slope;
        self.input.azimuth = azimuth;
        self
    }

    pub fn with_battery(mut self, with_battery: bool) -> Self {
        self.input.with_battery = with_battery;
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.input.address = address.into();
        self
    }

    pub fn future_proof(mut self, future_proof: bool) -> Self {
        self.input.future_proof = future_proof;
        self
    }

    pub fn build(self) -> SimulationInput {
        self.input
    }
}

/// Inputs retained alongside a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDetails {
    pub lat: f64,
    pub lon: f64,
    pub pvgis_production_per_kwc: f64,
    /// Belgian region used for the certificate credit (BE only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<BelgianRegion>,
    /// Set when the size was raised one tier for anticipated consumption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub future_proof_mode: Option<bool>,
}

/// How the annual savings figure was obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsBreakdown {
    /// Effective share of production consumed on site (0-1).
    pub self_consumption_rate: f64,
    pub self_consumed_kwh: f64,
    pub surplus_kwh: f64,
    /// € saved on the bill by self-consumed energy.
    pub self_consumption_savings: f64,
    /// € earned from exported surplus.
    pub resale_income: f64,
    /// € per year charged to producers (BE prosumer tax, 0 in FR).
    pub prosumer_tax: f64,
    /// € credited against the installation cost.
    pub premium: f64,
}

/// Recommended installation and its financial outlook.
///
/// Created fresh by every estimation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Recommended capacity (kWc), always one of the sizing tiers.
    pub system_size: f64,
    /// kWh/an, exactly `system_size * pvgis_production_per_kwc`.
    pub annual_production: f64,
    /// kWh/an derived from the bill.
    pub estimated_consumption: f64,
    /// €/an, after country-specific charges. May be zero or negative.
    pub annual_savings: f64,
    /// € gross installation cost.
    pub total_cost: f64,
    /// € after premiums, in `[0, total_cost]`.
    pub net_cost: f64,
    /// Simple payback; `null` when savings are not positive.
    pub roi_years: Payback,
    /// Echo of the input bill (€/month).
    pub monthly_bill: f64,
    pub details: ResultDetails,
    pub breakdown: SavingsBreakdown,
}
