//! Human-readable rendering of estimation results.

use std::fmt;

use crate::engine::types::SimulationResult;

/// Formats an amount in euros with a thin grouping space, no decimals.
pub fn format_eur(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped} €")
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Estimation ---")?;
        writeln!(f, "Facture mensuelle:      {}", format_eur(self.monthly_bill))?;
        writeln!(
            f,
            "Consommation estimée:   {:.0} kWh/an",
            self.estimated_consumption
        )?;
        writeln!(f, "Puissance recommandée:  {} kWc", self.system_size)?;
        writeln!(
            f,
            "Production annuelle:    {:.0} kWh/an",
            self.annual_production
        )?;
        writeln!(
            f,
            "Autoconsommation:       {:.0}%",
            self.breakdown.self_consumption_rate * 100.0
        )?;
        writeln!(
            f,
            "Économies annuelles:    {}",
            format_eur(self.annual_savings)
        )?;
        writeln!(f, "Coût total:             {}", format_eur(self.total_cost))?;
        writeln!(f, "Coût net (aides):       {}", format_eur(self.net_cost))?;
        if let Some(region) = self.details.region {
            writeln!(f, "Région:                 {region}")?;
        }
        if self.details.future_proof_mode == Some(true) {
            writeln!(f, "Dimensionnement:        anticipé (+1 palier)")?;
        }
        write!(f, "Retour sur invest.:     {}", self.roi_years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::calculate_recommended_system;
    use crate::engine::types::{CountryCode, SimulationInput};
    use crate::settings::SettingMap;

    #[test]
    fn euros_are_grouped_by_thousands() {
        assert_eq!(format_eur(10_800.0), "10 800 €");
        assert_eq!(format_eur(960.0), "960 €");
        assert_eq!(format_eur(1_234_567.4), "1 234 567 €");
        assert_eq!(format_eur(-120.6), "-121 €");
        assert_eq!(format_eur(0.2), "0 €");
    }

    #[test]
    fn report_has_units() {
        let input = SimulationInput::builder(CountryCode::Fr)
            .monthly_bill(100.0)
            .coordinates(48.85, 2.35)
            .production_per_kwc(1100.0)
            .build();
        let r = calculate_recommended_system(&input, &SettingMap::new(), &EngineConfig::default())
            .unwrap();
        let text = r.to_string();
        assert!(text.contains("Puissance recommandée:  6 kWc"));
        assert!(text.contains("6600 kWh/an"));
        assert!(text.contains("10 800 €"));
        assert!(text.contains("ans"));
    }
}
