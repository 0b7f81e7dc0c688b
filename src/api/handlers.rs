//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, RecalculateRequest, RecalculateResponse, SettingsResponse};
use crate::engine::types::{SimulationInput, SimulationResult};
use crate::error::SimulationError;
use crate::settings::SOLAR_CONSTANTS;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn unprocessable(e: &SimulationError) -> ApiError {
    tracing::info!(error = %e, "estimate rejected");
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::from(e)))
}

/// Runs the initial estimate.
///
/// `POST /simulate` → 200 + `SimulationResult` JSON
/// invalid input or configuration → 422 + `ErrorResponse`
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SimulationInput>,
) -> Result<Json<SimulationResult>, ApiError> {
    state
        .estimator
        .calculate(&input)
        .map(Json)
        .map_err(|e| unprocessable(&e))
}

/// Runs a what-if estimate from a previous input.
///
/// `POST /recalculate` → 200 + `RecalculateResponse` JSON
/// orientation change without a new yield → 422 + `ErrorResponse`
pub async fn recalculate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecalculateRequest>,
) -> Result<Json<RecalculateResponse>, ApiError> {
    let (input, result) = state
        .estimator
        .recalculate(&req.input, &req.change)
        .map_err(|e| unprocessable(&e))?;
    Ok(Json(RecalculateResponse { input, result }))
}

/// Returns the effective numeric value of every recognized setting.
///
/// `GET /settings/defaults` → 200 + `SettingsResponse` JSON
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    let snapshot = state.estimator.settings();
    let settings = SOLAR_CONSTANTS
        .iter()
        .filter_map(|(key, _)| snapshot.number(key).map(|v| ((*key).to_string(), v)))
        .collect();
    Json(SettingsResponse { settings })
}
