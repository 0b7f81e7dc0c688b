//! Recommended-system calculation.

use super::consumption::estimate_annual_consumption;
use super::cost::{net_cost, total_cost};
use super::policy::{CountryPolicy, Policy};
use super::production::{annual_production, effective_rate, split_production};
use super::roi::payback;
use super::types::{ResultDetails, SavingsBreakdown, SimulationInput, SimulationResult};
use crate::config::EngineConfig;
use crate::error::{Result, SimulationError};
use crate::settings::SettingMap;

const MAX_SLOPE_DEG: f64 = 90.0;
const MAX_ABS_AZIMUTH_DEG: f64 = 180.0;

/// Computes the recommended installation for one household.
///
/// Pure: the result depends only on `input`, `settings` and `config`.
///
/// # Errors
///
/// - `InvalidInput` for a non-positive yield, missing or out-of-range
///   coordinates, or an out-of-range orientation.
/// - `Configuration` when a price or cost resolves to a non-positive value,
///   or when `config` fails validation.
pub fn calculate_recommended_system(
    input: &SimulationInput,
    settings: &SettingMap,
    config: &EngineConfig,
) -> Result<SimulationResult> {
    let (lat, lon) = validate_input(input)?;
    config.ensure_valid()?;

    let policy = Policy::for_country(input.country_code, config);

    let price = policy.electricity_price(settings)?;
    let cost_per_kwc = policy.cost_per_kwc(settings)?;
    let resale_price = policy.resale_price(settings)?;

    let estimated_consumption = estimate_annual_consumption(input.monthly_bill, price)?;

    let sizing = &config.sizing;
    let tier = sizing.select_index(input.monthly_bill, estimated_consumption);
    let (tier, future_proof_mode) = if input.future_proof {
        (sizing.step_up(tier), Some(true))
    } else {
        (tier, None)
    };
    let system_size = sizing.size_at(tier);

    let production = annual_production(system_size, input.pvgis_production_per_kwc);
    let rate = effective_rate(
        policy.base_self_consumption_rate(&config.self_consumption),
        input.with_battery,
        config.self_consumption.battery_uplift,
    );
    let (self_consumed_kwh, surplus_kwh) = split_production(production, rate);
    let self_consumption_savings = self_consumed_kwh * price;
    let resale_income = surplus_kwh * resale_price;
    let prosumer_tax = policy.annual_charge(system_size, settings)?;
    let annual_savings = self_consumption_savings + resale_income - prosumer_tax;

    let region = policy.region(&input.address);
    let gross_cost = total_cost(system_size, cost_per_kwc);
    let premium = policy.premium(system_size, region, settings)?;
    let net = net_cost(gross_cost, premium);

    let roi_years = payback(net, annual_savings);
    if !roi_years.is_computable() {
        tracing::debug!(annual_savings, "savings not positive, payback not computable");
    }

    tracing::debug!(
        country = %input.country_code,
        system_size,
        annual_production = production,
        annual_savings,
        net_cost = net,
        "recommended system computed"
    );

    Ok(SimulationResult {
        system_size,
        annual_production: production,
        estimated_consumption,
        annual_savings,
        total_cost: gross_cost,
        net_cost: net,
        roi_years,
        monthly_bill: input.monthly_bill,
        details: ResultDetails {
            lat,
            lon,
            pvgis_production_per_kwc: input.pvgis_production_per_kwc,
            region,
            future_proof_mode,
        },
        breakdown: SavingsBreakdown {
            self_consumption_rate: rate,
            self_consumed_kwh,
            surplus_kwh,
            self_consumption_savings,
            resale_income,
            prosumer_tax,
            premium: gross_cost - net,
        },
    })
}

/// Rejects unusable inputs before any arithmetic. Returns `(lat, lon)`.
fn validate_input(input: &SimulationInput) -> Result<(f64, f64)> {
    let yield_kwh = input.pvgis_production_per_kwc;
    if !yield_kwh.is_finite() || yield_kwh <= 0.0 {
        return Err(SimulationError::invalid_input(
            "pvgisProductionPerKwc",
            format!("must be a finite number > 0, got {yield_kwh}"),
        ));
    }

    let lat = coordinate(input.lat, "lat", 90.0)?;
    let lon = coordinate(input.lon, "lon", 180.0)?;

    if !input.monthly_bill.is_finite() {
        return Err(SimulationError::invalid_input(
            "monthlyBill",
            "must be a finite number",
        ));
    }
    if !(0.0..=MAX_SLOPE_DEG).contains(&input.slope) {
        return Err(SimulationError::invalid_input(
            "slope",
            format!("must be in [0, {MAX_SLOPE_DEG}] degrees, got {}", input.slope),
        ));
    }
    if !(-MAX_ABS_AZIMUTH_DEG..=MAX_ABS_AZIMUTH_DEG).contains(&input.azimuth) {
        return Err(SimulationError::invalid_input(
            "azimuth",
            format!(
                "must be in [-{MAX_ABS_AZIMUTH_DEG}, {MAX_ABS_AZIMUTH_DEG}] degrees, got {}",
                input.azimuth
            ),
        ));
    }

    Ok((lat, lon))
}

fn coordinate(value: Option<f64>, field: &'static str, bound: f64) -> Result<f64> {
    let v = value.ok_or_else(|| SimulationError::invalid_input(field, "is required"))?;
    if !v.is_finite() || !(-bound..=bound).contains(&v) {
        return Err(SimulationError::invalid_input(
            field,
            format!("must be within [-{bound}, {bound}], got {v}"),
        ));
    }
    Ok(v)
}
