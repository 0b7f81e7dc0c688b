//! Error types shared by the estimation engine and its callers.

use thiserror::Error;

/// Failure of a single estimation.
///
/// The engine never returns a partially filled result: either every field of
/// a [`crate::engine::SimulationResult`] is computed, or one of these is
/// returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A caller-supplied field is missing, non-finite or out of range.
    #[error("invalid input `{field}`: {message}")]
    InvalidInput {
        /// Wire name of the offending field (e.g. `"pvgisProductionPerKwc"`).
        field: &'static str,
        message: String,
    },

    /// A price, cost or table resolved to an unusable value after fallback.
    #[error("configuration error `{key}`: {message}")]
    Configuration {
        /// Setting key or dotted engine-config path.
        key: String,
        message: String,
    },
}

impl SimulationError {
    pub(crate) fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Field name or setting key the error refers to.
    pub fn subject(&self) -> &str {
        match self {
            Self::InvalidInput { field, .. } => field,
            Self::Configuration { key, .. } => key,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
