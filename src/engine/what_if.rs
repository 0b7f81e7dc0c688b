//! What-if recalculation on top of a previous input.
//!
//! A recalculation never touches the previous result: it derives a new input
//! and runs the engine again. Yield depends on tilt and azimuth, so changing
//! either requires the caller to supply a freshly fetched yield.

use serde::Deserialize;

use super::calculator::calculate_recommended_system;
use super::types::{SimulationInput, SimulationResult};
use crate::config::EngineConfig;
use crate::error::{Result, SimulationError};
use crate::settings::SettingMap;

/// Fields a visitor can change after the first estimate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WhatIf {
    pub slope: Option<f64>,
    pub azimuth: Option<f64>,
    pub with_battery: Option<bool>,
    pub monthly_bill: Option<f64>,
    pub future_proof: Option<bool>,
    /// Yield re-fetched for the new orientation (kWh/kWc/yr).
    pub pvgis_production_per_kwc: Option<f64>,
}

impl WhatIf {
    pub fn battery(with_battery: bool) -> Self {
        Self {
            with_battery: Some(with_battery),
            ..Self::default()
        }
    }

    pub fn orientation(slope: f64, azimuth: f64, production_per_kwc: f64) -> Self {
        Self {
            slope: Some(slope),
            azimuth: Some(azimuth),
            pvgis_production_per_kwc: Some(production_per_kwc),
            ..Self::default()
        }
    }

    /// Whether the change alters tilt or azimuth relative to `input`.
    pub fn changes_orientation(&self, input: &SimulationInput) -> bool {
        self.slope.is_some_and(|s| s != input.slope)
            || self.azimuth.is_some_and(|a| a != input.azimuth)
    }

    /// Derives the new input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` on `pvgisProductionPerKwc` when the orientation
    /// changes without a new yield.
    pub fn apply(&self, input: &SimulationInput) -> Result<SimulationInput> {
        if self.changes_orientation(input) && self.pvgis_production_per_kwc.is_none() {
            return Err(SimulationError::invalid_input(
                "pvgisProductionPerKwc",
                "tilt or azimuth changed; a yield for the new orientation is required",
            ));
        }
        Ok(SimulationInput {
            slope: self.slope.unwrap_or(input.slope),
            azimuth: self.azimuth.unwrap_or(input.azimuth),
            with_battery: self.with_battery.unwrap_or(input.with_battery),
            monthly_bill: self.monthly_bill.unwrap_or(input.monthly_bill),
            future_proof: self.future_proof.unwrap_or(input.future_proof),
            pvgis_production_per_kwc: self
                .pvgis_production_per_kwc
                .unwrap_or(input.pvgis_production_per_kwc),
            ..input.clone()
        })
    }
}

/// Applies `change` to `input` and computes a fresh result.
///
/// Returns the derived input with its result so the caller can keep both
/// for the next recalculation.
///
/// # Errors
///
/// Propagates [`WhatIf::apply`] and engine errors. The caller keeps its
/// previous result on failure.
pub fn recalculate(
    input: &SimulationInput,
    change: &WhatIf,
    settings: &SettingMap,
    config: &EngineConfig,
) -> Result<(SimulationInput, SimulationResult)> {
    let next = change.apply(input)?;
    let result = calculate_recommended_system(&next, settings, config)?;
    Ok((next, result))
}
