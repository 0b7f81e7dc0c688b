//! API request and response types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::WhatIf;
use crate::engine::types::{SimulationInput, SimulationResult};
use crate::error::SimulationError;

/// Previous input plus the fields the visitor changed.
#[derive(Debug, Deserialize)]
pub struct RecalculateRequest {
    pub input: SimulationInput,
    #[serde(default)]
    pub change: WhatIf,
}

/// Derived input and its fresh result; the client replaces its previous pair.
#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub input: SimulationInput,
    pub result: SimulationResult,
}

/// Effective numeric settings: snapshot values over built-in defaults.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: BTreeMap<String, f64>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Offending input field or setting key.
    pub field: String,
}

impl From<&SimulationError> for ErrorResponse {
    fn from(e: &SimulationError) -> Self {
        Self {
            error: e.to_string(),
            field: e.subject().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_carries_field() {
        let e = SimulationError::InvalidInput {
            field: "lat",
            message: "is required".into(),
        };
        let body = ErrorResponse::from(&e);
        assert_eq!(body.field, "lat");
        assert!(body.error.contains("is required"));
    }

    #[test]
    fn recalculate_request_defaults_to_no_change() {
        let json = r#"{
            "input": {
                "monthlyBill": 100,
                "lat": 48.85,
                "lon": 2.35,
                "countryCode": "FR",
                "pvgisProductionPerKwc": 1100
            }
        }"#;
        let req: RecalculateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.change, WhatIf::default());
    }
}
