//! Summary Aggregator Module
//! Per-country totals and percentage shares for one haplogroup.

use crate::data::{DataProcessor, FrequencyRecord, FrequencyTable};
use log::warn;
use polars::prelude::PolarsError;
use std::collections::HashMap;
use thiserror::Error;

/// Shares below this render as [`BELOW_ONE_PERCENT`].
pub const DISPLAY_THRESHOLD: f64 = 1.0;
pub const BELOW_ONE_PERCENT: &str = "<1%";

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("No records found for haplogroup '{haplogroup}'")]
    EmptySelection { haplogroup: String },
    #[error("Frequencies for haplogroup '{haplogroup}' sum to zero; shares are undefined")]
    ZeroTotal { haplogroup: String },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Totals for a single country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySummary {
    pub country: String,
    pub total_frequency: f64,
    /// Raw share used for ordering; never rounded.
    pub share_percent: f64,
    /// Report text derived from `share_percent`.
    pub share_display: String,
}

/// All countries for one haplogroup, highest total first.
#[derive(Debug, Clone, PartialEq)]
pub struct HaplogroupSummary {
    pub haplogroup: String,
    pub grand_total: f64,
    pub rows: Vec<CountrySummary>,
}

impl HaplogroupSummary {
    pub fn share_sum(&self) -> f64 {
        self.rows.iter().map(|r| r.share_percent).sum()
    }
}

pub struct Aggregator;

impl Aggregator {
    /// Filter the table to `haplogroup` and summarize it.
    pub fn summarize(
        table: &FrequencyTable,
        haplogroup: &str,
    ) -> Result<HaplogroupSummary, AggregateError> {
        let records = DataProcessor::filter_by_haplogroup(table, haplogroup)?;
        Self::summarize_records(haplogroup, &records)
    }

    /// Summarize records already filtered to one haplogroup.
    pub fn summarize_records(
        haplogroup: &str,
        records: &[FrequencyRecord],
    ) -> Result<HaplogroupSummary, AggregateError> {
        if records.is_empty() {
            warn!("No records for haplogroup '{}'", haplogroup);
            return Err(AggregateError::EmptySelection {
                haplogroup: haplogroup.to_string(),
            });
        }

        // Group in first-appearance order so the stable sort breaks ties by it
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut totals: Vec<(&str, f64)> = Vec::new();
        for record in records {
            match index.get(record.country.as_str()) {
                Some(&i) => totals[i].1 += record.frequency,
                None => {
                    index.insert(record.country.as_str(), totals.len());
                    totals.push((record.country.as_str(), record.frequency));
                }
            }
        }

        let grand_total: f64 = totals.iter().map(|(_, total)| total).sum();
        if grand_total <= 0.0 {
            warn!("Frequencies for haplogroup '{}' sum to zero", haplogroup);
            return Err(AggregateError::ZeroTotal {
                haplogroup: haplogroup.to_string(),
            });
        }

        totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let rows = totals
            .into_iter()
            .map(|(country, total_frequency)| {
                let share_percent = total_frequency / grand_total * 100.0;
                CountrySummary {
                    country: country.to_string(),
                    total_frequency,
                    share_percent,
                    share_display: Self::format_share(share_percent),
                }
            })
            .collect();

        Ok(HaplogroupSummary {
            haplogroup: haplogroup.to_string(),
            grand_total,
            rows,
        })
    }

    /// `"<1%"` below one percent, otherwise two decimals rounded half away from zero.
    pub fn format_share(share_percent: f64) -> String {
        if share_percent < DISPLAY_THRESHOLD {
            BELOW_ONE_PERCENT.to_string()
        } else {
            format!("{:.2}%", (share_percent * 100.0).round() / 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rec(country: &str, frequency: f64) -> FrequencyRecord {
        FrequencyRecord::new(country, "H1", frequency)
    }

    #[test]
    fn shares_sum_to_one_hundred() {
        let records = vec![
            rec("France", 3.3),
            rec("Spain", 7.1),
            rec("Italy", 0.01),
            rec("France", 11.0),
            rec("Norway", 1.0 / 3.0),
        ];
        let summary = Aggregator::summarize_records("H1", &records).unwrap();
        assert!((summary.share_sum() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn sorted_descending_by_total() {
        let records = vec![rec("A", 30.0), rec("B", 10.0), rec("C", 60.0)];
        let summary = Aggregator::summarize_records("H1", &records).unwrap();
        let totals: Vec<f64> = summary.rows.iter().map(|r| r.total_frequency).collect();
        assert_eq!(totals, vec![60.0, 30.0, 10.0]);
    }

    #[test]
    fn ties_keep_first_appearance_order() {
        let records = vec![rec("B", 5.0), rec("A", 5.0), rec("C", 9.0)];
        let summary = Aggregator::summarize_records("H1", &records).unwrap();
        let countries: Vec<&str> = summary.rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["C", "B", "A"]);
    }

    #[test]
    fn duplicate_countries_are_summed() {
        let records = vec![rec("France", 2.0), rec("Spain", 1.0), rec("France", 4.0)];
        let summary = Aggregator::summarize_records("H1", &records).unwrap();
        assert_eq!(summary.rows[0].country, "France");
        assert_eq!(summary.rows[0].total_frequency, 6.0);
        assert_eq!(summary.grand_total, 7.0);
    }

    #[test]
    fn display_share_is_separate_from_raw_share() {
        let records = vec![rec("Big", 199.0), rec("Small", 1.0)];
        let summary = Aggregator::summarize_records("H1", &records).unwrap();
        let small = &summary.rows[1];
        assert_eq!(small.share_percent, 0.5);
        assert_eq!(small.share_display, BELOW_ONE_PERCENT);
        assert_eq!(summary.rows[0].share_display, "99.50%");
    }

    #[test]
    fn format_share_rounds_to_two_decimals() {
        assert_eq!(Aggregator::format_share(0.5), "<1%");
        assert_eq!(Aggregator::format_share(0.999), "<1%");
        assert_eq!(Aggregator::format_share(1.0), "1.00%");
        assert_eq!(Aggregator::format_share(12.345), "12.35%");
        assert_eq!(Aggregator::format_share(100.0), "100.00%");
    }

    #[test]
    fn empty_selection_is_reported() {
        let err = Aggregator::summarize_records("L3", &[]).unwrap_err();
        assert!(matches!(err, AggregateError::EmptySelection { ref haplogroup } if haplogroup == "L3"));
    }

    #[test]
    fn zero_total_is_reported() {
        let records = vec![rec("France", 0.0), rec("Spain", 0.0)];
        let err = Aggregator::summarize_records("H1", &records).unwrap_err();
        assert!(matches!(err, AggregateError::ZeroTotal { .. }));
    }

    #[test]
    fn summarize_filters_the_table_first() {
        let table = FrequencyTable::from_records(&[
            FrequencyRecord::new("France", "H1", 10.0),
            FrequencyRecord::new("Spain", "H1", 30.0),
            FrequencyRecord::new("France", "H2", 5.0),
        ])
        .unwrap();
        let summary = Aggregator::summarize(&table, "H1").unwrap();
        assert_eq!(
            summary.rows,
            vec![
                CountrySummary {
                    country: "Spain".to_string(),
                    total_frequency: 30.0,
                    share_percent: 75.0,
                    share_display: "75.00%".to_string(),
                },
                CountrySummary {
                    country: "France".to_string(),
                    total_frequency: 10.0,
                    share_percent: 25.0,
                    share_display: "25.00%".to_string(),
                },
            ]
        );
    }
}
