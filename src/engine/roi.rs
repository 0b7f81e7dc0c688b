//! Simple payback period.

use std::fmt;

use serde::Serialize;

/// Years for cumulative savings to cover the net cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "Option<f64>")]
pub enum Payback {
    Years(f64),
    /// Savings are zero or negative: the installation never pays back.
    NotComputable,
}

impl Payback {
    pub fn years(self) -> Option<f64> {
        match self {
            Self::Years(y) => Some(y),
            Self::NotComputable => None,
        }
    }

    pub fn is_computable(self) -> bool {
        matches!(self, Self::Years(_))
    }
}

impl From<Payback> for Option<f64> {
    fn from(p: Payback) -> Self {
        p.years()
    }
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years(y) => write!(f, "{y:.1} ans"),
            Self::NotComputable => f.write_str("non rentable"),
        }
    }
}

/// `net_cost / annual_savings`, or [`Payback::NotComputable`] when savings
/// are not positive or the quotient is not finite.
pub fn payback(net_cost: f64, annual_savings: f64) -> Payback {
    if annual_savings <= 0.0 || !annual_savings.is_finite() {
        return Payback::NotComputable;
    }
    let years = net_cost / annual_savings;
    if years.is_finite() {
        Payback::Years(years)
    } else {
        Payback::NotComputable
    }
}
