//! Time-series export reader.
//!
//! The query adapter writes one header-less CSV row per sensor:
//!
//! ```text
//! LEO-E_1_1_1_5TM,0.31,0.30,-9999,0.29
//! LEO-E_1_1_2_5TM,-9999,-9999,-9999,-9999
//! ```
//!
//! Rows may have different lengths. Tokens that are empty, non-numeric or
//! non-finite are dropped from the series and counted; they never become zero.

use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

use soilwatch_types::{Reading, SensorSeries, SeriesSet};

use crate::AdapterError;

/// Result of reading a series export.
#[derive(Debug, Clone, Default)]
pub struct SeriesIngest {
    /// Parsed series keyed by sensor name.
    pub series: SeriesSet,
    /// Number of malformed tokens dropped, per sensor name. Sensors with no
    /// dropped tokens are absent.
    pub dropped: BTreeMap<String, usize>,
    /// Sensor names that appeared on more than one row (the last row wins).
    pub duplicates: Vec<String>,
    /// Rows skipped because they had no sensor name.
    pub unnamed_rows: usize,
}

impl SeriesIngest {
    /// Total number of dropped tokens across all sensors.
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }
}

/// Parse one reading token. Returns `None` for malformed values.
pub fn parse_reading(token: &str) -> Option<Reading> {
    token
        .trim()
        .parse::<Reading>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Read a series export from any reader.
pub fn read_series<R: io::Read>(reader: R) -> Result<SeriesIngest, AdapterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut ingest = SeriesIngest::default();

    for record in csv_reader.records() {
        let record = record?;
        let Some(name) = record.get(0) else {
            continue;
        };
        if name.is_empty() {
            if record.iter().any(|field| !field.is_empty()) {
                ingest.unnamed_rows += 1;
            }
            continue;
        }

        let mut series = SensorSeries::new();
        let mut dropped = 0;
        for token in record.iter().skip(1) {
            match parse_reading(token) {
                Some(value) => series.push(value),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            ingest.dropped.insert(name.to_string(), dropped);
        } else {
            ingest.dropped.remove(name);
        }
        if ingest.series.insert(name.to_string(), series).is_some() {
            ingest.duplicates.push(name.to_string());
        }
    }

    Ok(ingest)
}

/// Read a series export from a file.
pub fn read_series_file(path: impl AsRef<Path>) -> Result<SeriesIngest, AdapterError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AdapterError::io(path, e))?;
    read_series(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_reading() {
        assert_eq!(parse_reading(" 5.25 "), Some(5.25));
        assert_eq!(parse_reading("-9999"), Some(-9999.0));
        assert_eq!(parse_reading(""), None);
        assert_eq!(parse_reading("n/a"), None);
        assert_eq!(parse_reading("NaN"), None);
        assert_eq!(parse_reading("inf"), None);
    }

    #[test]
    fn test_read_ragged_rows() {
        let data = "LEO-E_1_1_1_5TM,0.31,0.30,-9999\nLEO-E_1_1_2_5TM,-9999\nLEO-E_1_1_3_5TM\n";
        let ingest = read_series(data.as_bytes()).unwrap();

        assert_eq!(ingest.series.len(), 3);
        assert_eq!(
            ingest.series["LEO-E_1_1_1_5TM"].readings(),
            &[0.31, 0.30, -9999.0]
        );
        assert_eq!(ingest.series["LEO-E_1_1_2_5TM"].readings(), &[-9999.0]);
        assert!(ingest.series["LEO-E_1_1_3_5TM"].is_empty());
        assert_eq!(ingest.dropped_total(), 0);
    }

    #[test]
    fn test_malformed_tokens_are_dropped_not_zeroed() {
        let data = "LEO-W_2_1_1_MPS-2,-100.5,,abc,-120\nLEO-W_2_1_2_MPS-2,,\n";
        let ingest = read_series(data.as_bytes()).unwrap();

        assert_eq!(
            ingest.series["LEO-W_2_1_1_MPS-2"].readings(),
            &[-100.5, -120.0]
        );
        assert!(ingest.series["LEO-W_2_1_2_MPS-2"].is_empty());
        assert_eq!(ingest.dropped["LEO-W_2_1_1_MPS-2"], 2);
        assert_eq!(ingest.dropped["LEO-W_2_1_2_MPS-2"], 2);
        assert_eq!(ingest.dropped_total(), 4);
    }

    #[test]
    fn test_duplicate_rows_last_wins() {
        let data = "LEO-C_1_1_1_5TM,1,2\nLEO-C_1_1_1_5TM,3,x\n";
        let ingest = read_series(data.as_bytes()).unwrap();

        assert_eq!(ingest.series["LEO-C_1_1_1_5TM"].readings(), &[3.0]);
        assert_eq!(ingest.duplicates, vec!["LEO-C_1_1_1_5TM".to_string()]);
        assert_eq!(ingest.dropped["LEO-C_1_1_1_5TM"], 1);
    }

    #[test]
    fn test_unnamed_rows_are_counted() {
        let data = ",1,2\nLEO-C_1_1_1_5TM,3\n";
        let ingest = read_series(data.as_bytes()).unwrap();

        assert_eq!(ingest.series.len(), 1);
        assert_eq!(ingest.unnamed_rows, 1);
    }

    #[test]
    fn test_read_series_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "LEO-E_1_1_1_5TM,5.0,6.1,7.2").unwrap();

        let ingest = read_series_file(file.path()).unwrap();
        assert_eq!(ingest.series["LEO-E_1_1_1_5TM"].len(), 3);
    }

    #[test]
    fn test_read_series_missing_file() {
        let err = read_series_file("/nonexistent/true_data_east.csv").unwrap_err();
        assert!(matches!(err, AdapterError::Io { .. }));
    }
}
