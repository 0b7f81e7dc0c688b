//! Multi-year savings projection.

use std::fmt;

use serde::Serialize;

use super::types::SimulationResult;

/// Default projection horizon (years), the usual panel warranty.
pub const DEFAULT_HORIZON_YEARS: u32 = 25;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionYear {
    pub year: u32,
    pub savings: f64,
    pub cumulative_savings: f64,
    /// Cumulative savings minus net cost.
    pub net_gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProjection {
    pub years: Vec<ProjectionYear>,
    /// First year in which cumulative savings cover the net cost.
    pub break_even_year: Option<u32>,
}

impl SavingsProjection {
    pub fn final_net_gain(&self) -> f64 {
        self.years.last().map_or(0.0, |y| y.net_gain)
    }
}

/// Projects savings over `horizon_years`.
///
/// Only the bill savings from self-consumption follow electricity prices
/// (`inflation` per year). Resale income is a fixed-price contract and the
/// prosumer tax is held flat.
pub fn project_savings(
    result: &SimulationResult,
    horizon_years: u32,
    inflation: f64,
) -> SavingsProjection {
    let b = &result.breakdown;
    let mut years = Vec::new();
    let mut cumulative = 0.0_f64;
    let mut break_even_year = None;
    let mut escalation = 1.0_f64;

    for year in 1..=horizon_years {
        let savings = b.self_consumption_savings * escalation + b.resale_income - b.prosumer_tax;
        cumulative += savings;
        let net_gain = cumulative - result.net_cost;
        if break_even_year.is_none() && net_gain >= 0.0 {
            break_even_year = Some(year);
        }
        years.push(ProjectionYear {
            year,
            savings,
            cumulative_savings: cumulative,
            net_gain,
        });
        escalation *= 1.0 + inflation;
    }

    SavingsProjection {
        years,
        break_even_year,
    }
}

impl fmt::Display for SavingsProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let horizon = self.years.len();
        match self.break_even_year {
            Some(y) => write!(f, "Amorti en année {y}, ")?,
            None => write!(f, "Non amorti sur {horizon} ans, ")?,
        }
        write!(
            f,
            "gain net sur {horizon} ans: {:.0} €",
            self.final_net_gain()
        )
    }
}
