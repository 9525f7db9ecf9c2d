//! Tabular view of a haplogroup summary.

use super::aggregator::HaplogroupSummary;

pub const REPORT_HEADERS: [&str; 3] = ["Country", "Frequency", "Share"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub country: String,
    pub total_frequency: String,
    pub share: String,
}

/// Report rows in aggregator order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub haplogroup: String,
    pub rows: Vec<ReportRow>,
}

impl From<&HaplogroupSummary> for ReportTable {
    fn from(summary: &HaplogroupSummary) -> Self {
        let rows = summary
            .rows
            .iter()
            .map(|r| ReportRow {
                country: r.country.clone(),
                total_frequency: r.total_frequency.to_string(),
                share: r.share_display.clone(),
            })
            .collect();

        Self {
            haplogroup: summary.haplogroup.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FrequencyRecord;
    use crate::summary::Aggregator;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_follow_summary_order_and_use_display_share() {
        let records = vec![
            FrequencyRecord::new("France", "H1", 10.5),
            FrequencyRecord::new("Spain", "H1", 30.0),
            FrequencyRecord::new("Malta", "H1", 0.2),
        ];
        let summary = Aggregator::summarize_records("H1", &records).unwrap();
        let table = ReportTable::from(&summary);

        let cells: Vec<(&str, &str, &str)> = table
            .rows
            .iter()
            .map(|r| (r.country.as_str(), r.total_frequency.as_str(), r.share.as_str()))
            .collect();
        assert_eq!(
            cells,
            vec![
                ("Spain", "30", "73.71%"),
                ("France", "10.5", "25.80%"),
                ("Malta", "0.2", "<1%"),
            ]
        );
    }
}
