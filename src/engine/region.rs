//! Belgian region inference from postal codes.

use std::fmt;

use serde::Serialize;

/// Brussels-Capital postal range (inclusive).
const BRUSSELS_POSTAL_RANGE: std::ops::RangeInclusive<u32> = 1000..=1299;

/// Region label used for lead labelling and certificate credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BelgianRegion {
    Bruxelles,
    Wallonie,
}

impl BelgianRegion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bruxelles => "Bruxelles",
            Self::Wallonie => "Wallonie",
        }
    }
}

impl fmt::Display for BelgianRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a Belgian postal code. Anything outside the Brussels range,
/// including codes that are not Belgian at all, is Wallonia.
pub fn classify_belgian_region(postal_code: u32) -> BelgianRegion {
    if BRUSSELS_POSTAL_RANGE.contains(&postal_code) {
        BelgianRegion::Bruxelles
    } else {
        BelgianRegion::Wallonie
    }
}

/// Last standalone group of exactly four digits in `address`; Belgian
/// addresses put the postal code after the street and house number.
pub fn extract_postal_code(address: &str) -> Option<u32> {
    address
        .split(|c: char| !c.is_ascii_digit())
        .rfind(|group| group.len() == 4)
        .and_then(|group| group.parse().ok())
}

/// Region for a free-text Belgian address; defaults to Wallonia when no
/// postal code can be found.
pub fn infer_region(address: &str) -> BelgianRegion {
    match extract_postal_code(address) {
        Some(code) => classify_belgian_region(code),
        None => {
            tracing::debug!(address, "no postal code in address, assuming Wallonie");
            BelgianRegion::Wallonie
        }
    }
}
