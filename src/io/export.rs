//! CSV export of estimation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::engine::types::{SimulationInput, SimulationResult};

/// Schema v1 column header for CSV result export.
const HEADER: &str = "country,monthly_bill,pvgis_production_per_kwc,with_battery,\
                      system_size_kwc,annual_production_kwh,estimated_consumption_kwh,\
                      annual_savings_eur,total_cost_eur,net_cost_eur,roi_years,region";

/// One exported line: the input an estimate was computed from and its result.
#[derive(Debug, Clone)]
pub struct ExportRow<'a> {
    pub input: &'a SimulationInput,
    pub result: &'a SimulationResult,
}

/// Exports results to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[ExportRow<'_>], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes results as CSV to any writer.
///
/// Produces deterministic output for identical inputs. `roi_years` is left
/// empty when payback is not computable; `region` is empty outside Belgium.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[ExportRow<'_>], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for ExportRow { input, result: r } in rows {
        wtr.write_record(&[
            input.country_code.to_string(),
            format!("{:.2}", r.monthly_bill),
            format!("{:.1}", r.details.pvgis_production_per_kwc),
            input.with_battery.to_string(),
            format!("{}", r.system_size),
            format!("{:.1}", r.annual_production),
            format!("{:.1}", r.estimated_consumption),
            format!("{:.2}", r.annual_savings),
            format!("{:.2}", r.total_cost),
            format!("{:.2}", r.net_cost),
            r.roi_years
                .years()
                .map(|y| format!("{y:.2}"))
                .unwrap_or_default(),
            r.details
                .region
                .map(|region| region.to_string())
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
