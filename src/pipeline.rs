//! One interaction, end to end: (datasets, haplogroup, view mode) -> (summary, render target).

use crate::config::Rgb;
use crate::data::{DataProcessor, FrequencyTable, GeometrySet};
use crate::map::{ChoroplethMap, MapJoin};
use crate::summary::{AggregateError, Aggregator, HaplogroupSummary, ReportTable};
use polars::prelude::{PolarsError, PolarsResult};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl PipelineError {
    /// Non-fatal: only the current render is skipped.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            PipelineError::Aggregate(
                AggregateError::EmptySelection { .. } | AggregateError::ZeroTotal { .. }
            )
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Map,
    Report,
}

/// Both inputs, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub frequencies: FrequencyTable,
    pub geometries: GeometrySet,
}

impl Datasets {
    pub fn haplogroups(&self) -> PolarsResult<Vec<String>> {
        DataProcessor::haplogroups(&self.frequencies)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderTarget {
    Map(ChoroplethMap),
    Report(ReportTable),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// `None` only for a map whose frequencies all sum to zero.
    pub summary: Option<HaplogroupSummary>,
    pub target: RenderTarget,
}

/// Recompute everything for one selection. Holds no state between calls.
pub fn run(
    datasets: &Datasets,
    haplogroup: &str,
    mode: ViewMode,
    ramp: &[Rgb],
) -> Result<PipelineOutput, PipelineError> {
    let records = DataProcessor::filter_by_haplogroup(&datasets.frequencies, haplogroup)?;
    let summary = match Aggregator::summarize_records(haplogroup, &records) {
        Ok(summary) => Some(summary),
        // The map colours raw frequencies and does not need shares
        Err(AggregateError::ZeroTotal { .. }) if mode == ViewMode::Map => None,
        Err(e) => return Err(e.into()),
    };

    let target = match (mode, &summary) {
        (ViewMode::Report, Some(summary)) => RenderTarget::Report(ReportTable::from(summary)),
        _ => RenderTarget::Map(MapJoin::join(
            &datasets.geometries,
            &records,
            haplogroup,
            ramp,
        )),
    };

    Ok(PipelineOutput { summary, target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapStyle;
    use crate::data::{CountryGeometry, FrequencyLoader, FrequencyRecord, LoaderError, PolygonShape};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn geometry(admin: &str) -> CountryGeometry {
        CountryGeometry {
            admin: admin.to_string(),
            polygons: vec![PolygonShape {
                exterior: vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)],
                interiors: Vec::new(),
            }],
        }
    }

    fn datasets() -> Datasets {
        Datasets {
            frequencies: FrequencyTable::from_records(&[
                FrequencyRecord::new("France", "H1", 10.0),
                FrequencyRecord::new("Spain", "H1", 30.0),
                FrequencyRecord::new("France", "H2", 5.0),
            ])
            .unwrap(),
            geometries: GeometrySet::new(vec![
                geometry("France"),
                geometry("Spain"),
                geometry("Portugal"),
            ])
            .unwrap(),
        }
    }

    #[test]
    fn report_for_selected_haplogroup() {
        let ramp = MapStyle::default().ramp;
        let output = run(&datasets(), "H1", ViewMode::Report, &ramp).unwrap();

        let rows: Vec<(&str, f64, &str)> = output
            .summary
            .as_ref()
            .unwrap()
            .rows
            .iter()
            .map(|r| (r.country.as_str(), r.total_frequency, r.share_display.as_str()))
            .collect();
        assert_eq!(rows, vec![("Spain", 30.0, "75.00%"), ("France", 10.0, "25.00%")]);

        let RenderTarget::Report(table) = output.target else {
            panic!("expected a report");
        };
        assert_eq!(table.rows[0].country, "Spain");
        assert_eq!(table.rows[1].share, "25.00%");
    }

    #[test]
    fn map_uses_raw_frequencies_of_filtered_records() {
        let ramp = MapStyle::default().ramp;
        let output = run(&datasets(), "H1", ViewMode::Map, &ramp).unwrap();

        let RenderTarget::Map(map) = output.target else {
            panic!("expected a map");
        };
        let regions: Vec<(&str, Option<f64>)> = map
            .regions
            .iter()
            .map(|r| (r.admin.as_str(), r.frequency))
            .collect();
        assert_eq!(
            regions,
            vec![("France", Some(10.0)), ("Spain", Some(30.0)), ("Portugal", None)]
        );
        assert_eq!(output.summary.unwrap().rows.len(), 2);
    }

    #[test]
    fn unknown_haplogroup_is_a_non_fatal_empty_selection() {
        let ramp = MapStyle::default().ramp;
        for mode in [ViewMode::Map, ViewMode::Report] {
            let err = run(&datasets(), "L3", mode, &ramp).unwrap_err();
            assert!(matches!(
                err,
                PipelineError::Aggregate(AggregateError::EmptySelection { .. })
            ));
            assert!(err.is_warning());
        }
    }

    #[test]
    fn all_zero_haplogroup_still_maps_but_has_no_report() {
        let datasets = Datasets {
            frequencies: FrequencyTable::from_records(&[
                FrequencyRecord::new("France", "K", 0.0),
                FrequencyRecord::new("Spain", "K", 0.0),
            ])
            .unwrap(),
            ..datasets()
        };
        let style = MapStyle::default();

        let output = run(&datasets, "K", ViewMode::Map, &style.ramp).unwrap();
        assert!(output.summary.is_none());
        let RenderTarget::Map(map) = output.target else {
            panic!("expected a map");
        };
        assert_eq!(map.matched_regions(), 2);
        let scale = map.scale.as_ref().unwrap();
        assert_ne!(scale.color_for(0.0), style.no_data);

        let err = run(&datasets, "K", ViewMode::Report, &style.ramp).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Aggregate(AggregateError::ZeroTotal { .. })
        ));
        assert!(err.is_warning());
    }

    #[test]
    fn non_numeric_frequencies_stop_before_any_summary() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Country,Haplogroup,Frequency\nFrance,H1,abc\nSpain,H1,--\n").unwrap();

        let err = FrequencyLoader::load(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::NoValidFrequencies { .. }));
    }

    #[test]
    fn haplogroup_choices_come_from_the_table() {
        assert_eq!(datasets().haplogroups().unwrap(), vec!["H1", "H2"]);
    }
}
