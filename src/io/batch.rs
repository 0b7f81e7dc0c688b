//! CSV batch import of household inputs.
//!
//! Required columns: `country,monthly_bill,lat,lon,pvgis_production_per_kwc`.
//! Optional columns: `slope,azimuth,with_battery,address,future_proof`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::types::{DEFAULT_AZIMUTH_DEG, DEFAULT_SLOPE_DEG, SimulationInput};
use crate::error::SimulationError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("cannot open batch file: {0}")]
    Io(#[from] std::io::Error),

    #[error("batch line {line}: {source}")]
    Record {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("batch line {line}: {source}")]
    Input {
        line: u64,
        #[source]
        source: SimulationError,
    },
}

#[derive(Debug, Deserialize)]
struct BatchRecord {
    country: String,
    monthly_bill: f64,
    lat: f64,
    lon: f64,
    pvgis_production_per_kwc: f64,
    #[serde(default)]
    slope: Option<f64>,
    #[serde(default)]
    azimuth: Option<f64>,
    #[serde(default)]
    with_battery: Option<bool>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    future_proof: Option<bool>,
}

impl BatchRecord {
    fn into_input(self) -> Result<SimulationInput, SimulationError> {
        Ok(SimulationInput {
            monthly_bill: self.monthly_bill,
            lat: Some(self.lat),
            lon: Some(self.lon),
            country_code: self.country.parse()?,
            pvgis_production_per_kwc: self.pvgis_production_per_kwc,
            slope: self.slope.unwrap_or(DEFAULT_SLOPE_DEG),
            azimuth: self.azimuth.unwrap_or(DEFAULT_AZIMUTH_DEG),
            with_battery: self.with_battery.unwrap_or(false),
            address: self.address.unwrap_or_default(),
            future_proof: self.future_proof.unwrap_or(false),
        })
    }
}

/// One household read from a batch file, with the line its record starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub line: u64,
    pub input: SimulationInput,
}

fn record_error(source: csv::Error) -> BatchError {
    BatchError::Record {
        line: source.position().map_or(0, csv::Position::line),
        source,
    }
}

/// Line on which the record at `pos` starts.
///
/// The reader stamps a record with the position where it resumed scanning,
/// which sits before any blank lines it skipped.
fn record_start_line(data: &[u8], pos: &csv::Position) -> u64 {
    let start = usize::try_from(pos.byte()).map_or(data.len(), |b| b.min(data.len()));
    let skipped = data[start..]
        .iter()
        .take_while(|b| matches!(b, b'\n' | b'\r'))
        .filter(|&&b| b == b'\n')
        .count();
    pos.line() + skipped as u64
}

/// Reads every input from a CSV source.
///
/// # Errors
///
/// Stops at the first malformed record and reports the line it starts on.
pub fn read_batch(mut reader: impl Read) -> Result<Vec<BatchRow>, BatchError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_slice());
    let headers = rdr.headers().map_err(record_error)?.clone();
    let mut record = csv::StringRecord::new();
    let mut rows = Vec::new();

    while rdr.read_record(&mut record).map_err(record_error)? {
        let line = record
            .position()
            .map_or(0, |pos| record_start_line(&data, pos));
        let parsed: BatchRecord = record
            .deserialize(Some(&headers))
            .map_err(|source| BatchError::Record { line, source })?;
        let input = parsed
            .into_input()
            .map_err(|source| BatchError::Input { line, source })?;
        rows.push(BatchRow { line, input });
    }

    Ok(rows)
}

/// Reads every input from a CSV file.
///
/// # Errors
///
/// Returns a `BatchError` if the file cannot be opened or a record is malformed.
pub fn read_batch_file(path: &Path) -> Result<Vec<BatchRow>, BatchError> {
    read_batch(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::CountryCode;

    #[test]
    fn reads_required_and_optional_columns() {
        let data = "\
country,monthly_bill,lat,lon,pvgis_production_per_kwc,with_battery,address
FR,100,48.85,2.35,1100,false,
be,80,50.83,4.36,950,true,\"Place Flagey 18, 1050 Ixelles\"
";
        let rows = read_batch(data.as_bytes()).expect("batch should parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].input.country_code, CountryCode::Fr);
        assert_eq!(rows[0].input.slope, DEFAULT_SLOPE_DEG);
        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[1].input.country_code, CountryCode::Be);
        assert!(rows[1].input.with_battery);
        assert_eq!(rows[1].input.address, "Place Flagey 18, 1050 Ixelles");
    }

    #[test]
    fn missing_required_column_is_reported() {
        let data = "\
country,monthly_bill,lon,pvgis_production_per_kwc
FR,100,2.35,1100
";
        let err = read_batch(data.as_bytes()).unwrap_err();
        assert!(matches!(err, BatchError::Record { line: 2, .. }), "{err}");
        assert!(err.to_string().contains("lat"));
    }

    #[test]
    fn unknown_country_names_the_line() {
        let data = "\
country,monthly_bill,lat,lon,pvgis_production_per_kwc
FR,100,48.85,2.35,1100
NL,90,52.37,4.90,900
";
        let err = read_batch(data.as_bytes()).unwrap_err();
        assert!(matches!(err, BatchError::Input { line: 3, .. }), "{err}");
    }

    #[test]
    fn blank_lines_do_not_shift_line_numbers() {
        let data = "\
country,monthly_bill,lat,lon,pvgis_production_per_kwc
FR,100,48.85,2.35,1100

NL,90,52.37,4.90,900
";
        let err = read_batch(data.as_bytes()).unwrap_err();
        assert!(matches!(err, BatchError::Input { line: 4, .. }), "{err}");
    }

    #[test]
    fn multi_line_address_keeps_following_line_numbers() {
        let data = "\
country,monthly_bill,lat,lon,pvgis_production_per_kwc,address
BE,80,50.83,4.36,950,\"Place Flagey 18
1050 Ixelles\"
NL,90,52.37,4.90,900,Amsterdam
";
        let err = read_batch(data.as_bytes()).unwrap_err();
        assert!(matches!(err, BatchError::Input { line: 4, .. }), "{err}");
    }

    #[test]
    fn crlf_and_blank_lines_report_start_line() {
        let data = "country,monthly_bill,lat,lon,pvgis_production_per_kwc\r\n\
FR,100,48.85,2.35,1100\r\n\r\n\r\n\
BE,80,50.83,4.36,950\r\n";
        let rows = read_batch(data.as_bytes()).expect("batch should parse");
        assert_eq!(rows.iter().map(|r| r.line).collect::<Vec<_>>(), [2, 5]);
    }

    #[test]
    fn empty_body_is_empty_batch() {
        let data = "country,monthly_bill,lat,lon,pvgis_production_per_kwc\n";
        assert!(read_batch(data.as_bytes()).unwrap().is_empty());
    }
}
