//! CSV Data Loader Module
//! Reads the haplogroup frequency CSV with Polars and validates it.

use super::types::{frame_from_records, FrequencyRecord, FrequencyTable, LoadReport};
use log::{info, warn};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Minimum number of columns: Country, Haplogroup, Frequency.
const REQUIRED_COLUMNS: usize = 3;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read CSV {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error(
        "Expected at least 3 columns (Country, Haplogroup, Frequency), found {}: [{}]",
        .found.len(),
        .found.join(", ")
    )]
    TooFewColumns { found: Vec<String> },
    #[error("No valid numeric values in the Frequency column ({rows} rows read)")]
    NoValidFrequencies { rows: usize },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Loads the frequency CSV.
///
/// The first three columns are taken positionally as Country, Haplogroup and
/// Frequency. Header names are kept only in the [`LoadReport`].
pub struct FrequencyLoader;

impl FrequencyLoader {
    pub fn load(path: impl AsRef<Path>) -> Result<FrequencyTable, LoaderError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let unreadable = |source: PolarsError| LoaderError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        let size = std::fs::metadata(path)
            .map_err(|e| unreadable(PolarsError::from(e)))?
            .len();
        if size == 0 {
            return Err(unreadable(PolarsError::NoData("empty CSV".into())));
        }

        // Every column as String so coercion of Frequency is ours, not the inferrer's
        let raw = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(unreadable)?;

        let source_columns: Vec<String> = raw
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        if source_columns.len() < REQUIRED_COLUMNS {
            return Err(LoaderError::TooFewColumns {
                found: source_columns,
            });
        }

        let columns = raw.get_columns();
        let country_col = columns[0].cast(&DataType::String)?;
        let haplogroup_col = columns[1].cast(&DataType::String)?;
        let frequency_col = columns[2].cast(&DataType::String)?;
        let countries = country_col.str()?;
        let haplogroups = haplogroup_col.str()?;
        let frequencies = frequency_col.str()?;

        let parsed: Vec<Option<f64>> = frequencies
            .into_iter()
            .map(|v| v.and_then(parse_frequency))
            .collect();

        let rows_read = raw.height();
        if parsed.iter().all(Option::is_none) {
            return Err(LoaderError::NoValidFrequencies { rows: rows_read });
        }

        let mut records = Vec::with_capacity(rows_read);
        let mut invalid_frequencies = 0;
        let mut missing_labels = 0;

        for ((country, haplogroup), frequency) in countries
            .into_iter()
            .zip(haplogroups)
            .zip(parsed.iter().copied())
        {
            let Some(frequency) = frequency else {
                invalid_frequencies += 1;
                continue;
            };
            match (country, haplogroup) {
                (Some(country), Some(haplogroup)) => {
                    records.push(FrequencyRecord::new(country, haplogroup, frequency));
                }
                _ => missing_labels += 1,
            }
        }

        let report = LoadReport {
            source_path: Some(path.to_path_buf()),
            source_columns,
            rows_read,
            invalid_frequencies,
            missing_labels,
        };

        if invalid_frequencies > 0 {
            warn!(
                "{}: dropped {} of {} rows with a non-numeric Frequency",
                path.display(),
                invalid_frequencies,
                rows_read
            );
        }
        if missing_labels > 0 {
            warn!(
                "{}: dropped {} rows with an empty Country or Haplogroup",
                path.display(),
                missing_labels
            );
        }
        info!(
            "Loaded {} frequency records from {} (columns: {})",
            records.len(),
            path.display(),
            report.source_columns.join(", ")
        );

        let df = frame_from_records(&records)?;
        let table = FrequencyTable::new(df, report);
        if table.is_empty() {
            warn!("{}: no rows left with both labels and a valid Frequency", path.display());
        }
        Ok(table)
    }
}

/// Coerce one Frequency cell. Anything that is not a finite, non-negative number is missing.
fn parse_frequency(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
