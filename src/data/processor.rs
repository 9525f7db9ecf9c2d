//! Data Processor Module
//! Haplogroup listing and selection over a loaded frequency table.

use super::types::{records_from_frame, FrequencyRecord, FrequencyTable, HAPLOGROUP};
use polars::prelude::*;
use std::collections::BTreeSet;

/// Read-only queries over a [`FrequencyTable`].
pub struct DataProcessor;

impl DataProcessor {
    /// Distinct haplogroups, sorted ascending.
    pub fn haplogroups(table: &FrequencyTable) -> PolarsResult<Vec<String>> {
        let haplogroups = table.dataframe().column(HAPLOGROUP)?.str()?;
        let distinct: BTreeSet<&str> = haplogroups.into_iter().flatten().collect();
        Ok(distinct.into_iter().map(str::to_string).collect())
    }

    /// Records whose haplogroup equals `haplogroup` exactly, in file order.
    pub fn filter_by_haplogroup(
        table: &FrequencyTable,
        haplogroup: &str,
    ) -> PolarsResult<Vec<FrequencyRecord>> {
        let filtered = table
            .dataframe()
            .clone()
            .lazy()
            .filter(col(HAPLOGROUP).eq(lit(haplogroup)))
            .collect()?;
        records_from_frame(&filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> FrequencyTable {
        FrequencyTable::from_records(&[
            FrequencyRecord::new("France", "H1", 10.0),
            FrequencyRecord::new("Spain", "U5", 30.0),
            FrequencyRecord::new("France", "h1", 5.0),
            FrequencyRecord::new("Italy", "H1", 2.0),
        ])
        .unwrap()
    }

    #[test]
    fn haplogroups_are_distinct_and_sorted() {
        assert_eq!(
            DataProcessor::haplogroups(&table()).unwrap(),
            vec!["H1", "U5", "h1"]
        );
    }

    #[test]
    fn haplogroup_listing_reports_a_bad_frame() {
        let df = DataFrame::new(vec![Column::new("Other".into(), vec!["H1"])]).unwrap();
        let table = FrequencyTable::new(df, Default::default());
        assert!(DataProcessor::haplogroups(&table).is_err());
    }

    #[test]
    fn filter_is_case_sensitive_and_keeps_order() {
        let records = DataProcessor::filter_by_haplogroup(&table(), "H1").unwrap();
        assert_eq!(
            records,
            vec![
                FrequencyRecord::new("France", "H1", 10.0),
                FrequencyRecord::new("Italy", "H1", 2.0),
            ]
        );
    }

    #[test]
    fn filter_with_no_match_is_empty() {
        let records = DataProcessor::filter_by_haplogroup(&table(), "L3").unwrap();
        assert!(records.is_empty());
    }
}
