//! Frequency dataset types shared by the loader, the processor and the aggregator.

use polars::prelude::*;
use std::path::PathBuf;

/// Column names of the normalized frequency table.
pub const COUNTRY: &str = "Country";
pub const HAPLOGROUP: &str = "Haplogroup";
pub const FREQUENCY: &str = "Frequency";

/// One row of the frequency dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyRecord {
    pub country: String,
    pub haplogroup: String,
    pub frequency: f64,
}

impl FrequencyRecord {
    pub fn new(country: &str, haplogroup: &str, frequency: f64) -> Self {
        Self {
            country: country.to_string(),
            haplogroup: haplogroup.to_string(),
            frequency,
        }
    }
}

/// What happened while reading the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub source_path: Option<PathBuf>,
    /// Header names exactly as found in the file, before positional renaming.
    pub source_columns: Vec<String>,
    pub rows_read: usize,
    /// Rows dropped because Frequency did not coerce to a non-negative number.
    pub invalid_frequencies: usize,
    /// Rows dropped because Country or Haplogroup was empty.
    pub missing_labels: usize,
}

impl LoadReport {
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.invalid_frequencies - self.missing_labels
    }

    pub fn has_drops(&self) -> bool {
        self.invalid_frequencies > 0 || self.missing_labels > 0
    }
}

/// The loaded frequency dataset. Immutable once built.
///
/// The frame always has exactly the columns [`COUNTRY`], [`HAPLOGROUP`] (String)
/// and [`FREQUENCY`] (Float64), with no nulls.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    df: DataFrame,
    report: LoadReport,
}

impl FrequencyTable {
    pub(crate) fn new(df: DataFrame, report: LoadReport) -> Self {
        Self { df, report }
    }

    /// Build a table from in-memory records.
    pub fn from_records(records: &[FrequencyRecord]) -> PolarsResult<Self> {
        let df = frame_from_records(records)?;
        let report = LoadReport {
            rows_read: records.len(),
            ..Default::default()
        };
        Ok(Self { df, report })
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// All records in file order.
    pub fn records(&self) -> PolarsResult<Vec<FrequencyRecord>> {
        records_from_frame(&self.df)
    }
}

pub(crate) fn frame_from_records(records: &[FrequencyRecord]) -> PolarsResult<DataFrame> {
    let mut countries: Vec<String> = Vec::with_capacity(records.len());
    let mut haplogroups: Vec<String> = Vec::with_capacity(records.len());
    let mut frequencies: Vec<f64> = Vec::with_capacity(records.len());

    for record in records {
        countries.push(record.country.clone());
        haplogroups.push(record.haplogroup.clone());
        frequencies.push(record.frequency);
    }

    DataFrame::new(vec![
        Column::new(COUNTRY.into(), countries),
        Column::new(HAPLOGROUP.into(), haplogroups),
        Column::new(FREQUENCY.into(), frequencies),
    ])
}

pub(crate) fn records_from_frame(df: &DataFrame) -> PolarsResult<Vec<FrequencyRecord>> {
    let countries = df.column(COUNTRY)?.str()?;
    let haplogroups = df.column(HAPLOGROUP)?.str()?;
    let frequencies = df.column(FREQUENCY)?.f64()?;

    let records = countries
        .into_iter()
        .zip(haplogroups)
        .zip(frequencies)
        .filter_map(|((country, haplogroup), frequency)| {
            Some(FrequencyRecord {
                country: country?.to_string(),
                haplogroup: haplogroup?.to_string(),
                frequency: frequency?,
            })
        })
        .collect();

    Ok(records)
}
