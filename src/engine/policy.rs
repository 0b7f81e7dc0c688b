//! Country-specific tariff and incentive rules.
//!
//! France and Belgium differ in structure, not only in constants: Belgium
//! levies a prosumer tax and credits green certificates by region, France
//! grants a self-consumption premium by power band. Each country owns its
//! rules behind [`CountryPolicy`]; the calculator never branches on the
//! country itself.

use super::cost::PremiumTable;
use super::production::SelfConsumptionRates;
use super::region::{BelgianRegion, infer_region};
use super::types::CountryCode;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::settings::{SettingMap, keys};

/// Tariff structure of one market.
pub trait CountryPolicy {
    fn country(&self) -> CountryCode;

    /// Grid electricity price (€/kWh).
    fn electricity_price(&self, settings: &SettingMap) -> Result<f64>;

    /// Installed cost (€/kWc).
    fn cost_per_kwc(&self, settings: &SettingMap) -> Result<f64>;

    /// Price paid for exported surplus (€/kWh).
    fn resale_price(&self, settings: &SettingMap) -> Result<f64>;

    /// Self-consumption share without storage.
    fn base_self_consumption_rate(&self, rates: &SelfConsumptionRates) -> f64;

    /// Region relevant to incentives, if the market has regional rules.
    fn region(&self, _address: &str) -> Option<BelgianRegion> {
        None
    }

    /// Yearly charge (€) subtracted from savings.
    fn annual_charge(&self, _system_size_kwc: f64, _settings: &SettingMap) -> Result<f64> {
        Ok(0.0)
    }

    /// One-off credit (€) subtracted from the installation cost.
    fn premium(
        &self,
        system_size_kwc: f64,
        region: Option<BelgianRegion>,
        settings: &SettingMap,
    ) -> Result<f64>;
}

/// French rules: surplus resale contract and self-consumption premium.
#[derive(Debug, Clone, Default)]
pub struct France {
    premiums: PremiumTable,
}

impl France {
    pub fn new(premiums: PremiumTable) -> Self {
        Self { premiums }
    }
}

impl CountryPolicy for France {
    fn country(&self) -> CountryCode {
        CountryCode::Fr
    }

    fn electricity_price(&self, settings: &SettingMap) -> Result<f64> {
        settings.positive(keys::FR_ELECTRICITY_PRICE)
    }

    fn cost_per_kwc(&self, settings: &SettingMap) -> Result<f64> {
        settings.positive(keys::FR_COST_PER_KWC)
    }

    fn resale_price(&self, settings: &SettingMap) -> Result<f64> {
        settings.non_negative(keys::FR_SURPLUS_RESALE)
    }

    fn base_self_consumption_rate(&self, rates: &SelfConsumptionRates) -> f64 {
        rates.france
    }

    fn premium(
        &self,
        system_size_kwc: f64,
        _region: Option<BelgianRegion>,
        settings: &SettingMap,
    ) -> Result<f64> {
        self.premiums.premium(system_size_kwc, settings)
    }
}

/// Belgian rules: injection price, prosumer tax and regional certificates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Belgium;

impl CountryPolicy for Belgium {
    fn country(&self) -> CountryCode {
        CountryCode::Be
    }

    fn electricity_price(&self, settings: &SettingMap) -> Result<f64> {
        settings.positive(keys::BE_ELECTRICITY_PRICE)
    }

    fn cost_per_kwc(&self, settings: &SettingMap) -> Result<f64> {
        settings.positive(keys::BE_COST_PER_KWC)
    }

    fn resale_price(&self, settings: &SettingMap) -> Result<f64> {
        settings.non_negative(keys::BE_INJECTION_PRICE)
    }

    fn base_self_consumption_rate(&self, rates: &SelfConsumptionRates) -> f64 {
        rates.belgium
    }

    fn region(&self, address: &str) -> Option<BelgianRegion> {
        Some(infer_region(address))
    }

    fn annual_charge(&self, system_size_kwc: f64, settings: &SettingMap) -> Result<f64> {
        Ok(settings.non_negative(keys::BE_PROSUMER_TAX)? * system_size_kwc)
    }

    fn premium(
        &self,
        system_size_kwc: f64,
        region: Option<BelgianRegion>,
        settings: &SettingMap,
    ) -> Result<f64> {
        let key = match region.unwrap_or(BelgianRegion::Wallonie) {
            BelgianRegion::Bruxelles => keys::BE_GREEN_CERTS_BRU,
            BelgianRegion::Wallonie => keys::BE_GREEN_CERTS_WAL,
        };
        Ok(settings.credit(key)? * system_size_kwc)
    }
}

/// Policy selected from a [`CountryCode`].
#[derive(Debug, Clone)]
pub enum Policy {
    France(France),
    Belgium(Belgium),
}

impl Policy {
    pub fn for_country(country: CountryCode, config: &EngineConfig) -> Self {
        match country {
            CountryCode::Fr => Self::France(France::new(config.premiums.clone())),
            CountryCode::Be => Self::Belgium(Belgium),
        }
    }

    fn inner(&self) -> &dyn CountryPolicy {
        match self {
            Self::France(p) => p,
            Self::Belgium(p) => p,
        }
    }
}

impl CountryPolicy for Policy {
    fn country(&self) -> CountryCode {
        self.inner().country()
    }

    fn electricity_price(&self, settings: &SettingMap) -> Result<f64> {
        self.inner().electricity_price(settings)
    }

    fn cost_per_kwc(&self, settings: &SettingMap) -> Result<f64> {
        self.inner().cost_per_kwc(settings)
    }

    fn resale_price(&self, settings: &SettingMap) -> Result<f64> {
        self.inner().resale_price(settings)
    }

    fn base_self_consumption_rate(&self, rates: &SelfConsumptionRates) -> f64 {
        self.inner().base_self_consumption_rate(rates)
    }

    fn region(&self, address: &str) -> Option<BelgianRegion> {
        self.inner().region(address)
    }

    fn annual_charge(&self, system_size_kwc: f64, settings: &SettingMap) -> Result<f64> {
        self.inner().annual_charge(system_size_kwc, settings)
    }

    fn premium(
        &self,
        system_size_kwc: f64,
        region: Option<BelgianRegion>,
        settings: &SettingMap,
    ) -> Result<f64> {
        self.inner().premium(system_size_kwc, region, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> SettingMap {
        SettingMap::new()
    }

    #[test]
    fn france_has_no_annual_charge_or_region() {
        let fr = France::default();
        assert_eq!(fr.annual_charge(6.0, &defaults()), Ok(0.0));
        assert_eq!(fr.region("Avenue Louise, 1050 Ixelles"), None);
    }

    #[test]
    fn france_premium_follows_power_band() {
        let fr = France::default();
        assert_eq!(fr.premium(3.0, None, &defaults()), Ok(660.0));
        assert_eq!(fr.premium(6.0, None, &defaults()), Ok(960.0));
    }

    #[test]
    fn belgium_charges_prosumer_tax_per_kwc() {
        assert_eq!(Belgium.annual_charge(3.0, &defaults()), Ok(264.0));
    }

    #[test]
    fn belgium_credits_certificates_in_brussels_only_by_default() {
        let bru = Belgium.premium(3.0, Some(BelgianRegion::Bruxelles), &defaults());
        let wal = Belgium.premium(3.0, Some(BelgianRegion::Wallonie), &defaults());
        assert_eq!(bru, Ok(1500.0));
        assert_eq!(wal, Ok(0.0));
    }

    #[test]
    fn wallonia_credit_comes_from_settings() {
        let settings = defaults().with(keys::BE_GREEN_CERTS_WAL, 100.0);
        assert_eq!(
            Belgium.premium(6.0, Some(BelgianRegion::Wallonie), &settings),
            Ok(600.0)
        );
    }

    #[test]
    fn policy_dispatches_by_country() {
        let cfg = EngineConfig::default();
        let fr = Policy::for_country(CountryCode::Fr, &cfg);
        let be = Policy::for_country(CountryCode::Be, &cfg);
        assert_eq!(fr.country(), CountryCode::Fr);
        assert_eq!(be.country(), CountryCode::Be);
        assert_eq!(fr.electricity_price(&defaults()), Ok(0.27));
        assert_eq!(be.electricity_price(&defaults()), Ok(0.37));
        assert_eq!(be.base_self_consumption_rate(&cfg.self_consumption), 0.40);
    }
}
