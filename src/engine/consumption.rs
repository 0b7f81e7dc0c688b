//! Bill-to-consumption conversion.

use crate::error::{Result, SimulationError};

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Estimates annual consumption (kWh) from a monthly bill (€) and the
/// electricity price (€/kWh): `monthly_bill * 12 / price_per_kwh`.
///
/// A bill of zero or less yields zero consumption rather than an error; the
/// caller-facing form is expected to reject such bills earlier.
///
/// # Errors
///
/// Returns a `Configuration` error when `price_per_kwh` is not a positive
/// finite number.
pub fn estimate_annual_consumption(monthly_bill: f64, price_per_kwh: f64) -> Result<f64> {
    if !price_per_kwh.is_finite() || price_per_kwh <= 0.0 {
        return Err(SimulationError::configuration(
            "electricity_price",
            format!("price per kWh must be > 0, got {price_per_kwh}"),
        ));
    }
    if monthly_bill <= 0.0 {
        return Ok(0.0);
    }
    Ok(monthly_bill * MONTHS_PER_YEAR / price_per_kwh)
}
