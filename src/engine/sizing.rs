//! Discrete system-size selection.
//!
//! Installers only sell standard kits, so the recommendation is always one
//! of a few sizes. The mapping from consumption to size is an ordered table
//! rather than a chain of conditionals, so each boundary can be checked row
//! by row.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// One consumption band: consumption up to and including
/// `max_consumption_kwh` gets `size_kwc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizingTier {
    pub max_consumption_kwh: f64,
    pub size_kwc: f64,
}

/// Ordered sizing table.
///
/// Every limit is inclusive on the lower tier: a value exactly on a limit
/// selects the smaller size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingTable {
    /// Monthly bills up to this amount (€) get the small kit regardless of
    /// the consumption estimate.
    pub small_bill_limit: f64,
    pub small_size_kwc: f64,
    /// Consumption bands in ascending order.
    pub tiers: Vec<SizingTier>,
    /// Size for consumption above the last band.
    pub largest_size_kwc: f64,
}

impl Default for SizingTable {
    fn default() -> Self {
        Self {
            small_bill_limit: 60.0,
            small_size_kwc: 2.5,
            tiers: vec![
                SizingTier {
                    max_consumption_kwh: 3500.0,
                    size_kwc: 3.0,
                },
                SizingTier {
                    max_consumption_kwh: 8000.0,
                    size_kwc: 6.0,
                },
            ],
            largest_size_kwc: 9.0,
        }
    }
}

impl SizingTable {
    /// All offered sizes in ascending order.
    pub fn sizes(&self) -> Vec<f64> {
        let mut sizes = Vec::with_capacity(self.tiers.len() + 2);
        sizes.push(self.small_size_kwc);
        sizes.extend(self.tiers.iter().map(|t| t.size_kwc));
        sizes.push(self.largest_size_kwc);
        sizes
    }

    /// Index into [`Self::sizes`] for a household.
    pub fn select_index(&self, monthly_bill: f64, annual_consumption_kwh: f64) -> usize {
        if monthly_bill <= self.small_bill_limit {
            return 0;
        }
        self.tiers
            .iter()
            .position(|t| annual_consumption_kwh <= t.max_consumption_kwh)
            .map_or(self.tiers.len() + 1, |i| i + 1)
    }

    /// Recommended size (kWc) for a household.
    pub fn select(&self, monthly_bill: f64, annual_consumption_kwh: f64) -> f64 {
        self.size_at(self.select_index(monthly_bill, annual_consumption_kwh))
    }

    /// Index one tier above `index`, capped at the largest size.
    pub fn step_up(&self, index: usize) -> usize {
        (index + 1).min(self.tiers.len() + 1)
    }

    /// Size at `index`; out-of-range indices map to the largest size.
    pub fn size_at(&self, index: usize) -> f64 {
        if index == 0 {
            self.small_size_kwc
        } else {
            self.tiers
                .get(index - 1)
                .map_or(self.largest_size_kwc, |t| t.size_kwc)
        }
    }

    /// Checks ordering and positivity; `prefix` is the dotted config path.
    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !self.small_bill_limit.is_finite() || self.small_bill_limit < 0.0 {
            errors.push(ConfigError {
                field: format!("{prefix}.small_bill_limit"),
                message: "must be a finite number >= 0".into(),
            });
        }

        let mut previous_limit = 0.0_f64;
        for (i, tier) in self.tiers.iter().enumerate() {
            if !tier.max_consumption_kwh.is_finite() || tier.max_consumption_kwh <= previous_limit
            {
                errors.push(ConfigError {
                    field: format!("{prefix}.tiers[{i}].max_consumption_kwh"),
                    message: format!("must be finite and > {previous_limit}"),
                });
            }
            previous_limit = tier.max_consumption_kwh;
        }

        let sizes = self.sizes();
        if sizes.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            errors.push(ConfigError {
                field: format!("{prefix}.sizes"),
                message: "every size must be finite and > 0".into(),
            });
        }
        if sizes.windows(2).any(|w| w[0] >= w[1]) {
            errors.push(ConfigError {
                field: format!("{prefix}.sizes"),
                message: format!("sizes must be strictly ascending, got {sizes:?}"),
            });
        }

        errors
    }
}
