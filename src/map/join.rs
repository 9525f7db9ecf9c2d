//! Left join of country geometries against filtered frequency records.

use super::color::ColorScale;
use crate::config::Rgb;
use crate::data::{FrequencyRecord, GeometrySet};
use log::debug;
use std::collections::{HashMap, HashSet};

/// One joined row: a geometry and the raw frequency of a matching record, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRegion {
    pub geometry_index: usize,
    pub admin: String,
    pub frequency: Option<f64>,
}

impl MapRegion {
    pub fn has_data(&self) -> bool {
        self.frequency.is_some()
    }
}

/// Everything the map presenter needs for one haplogroup.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethMap {
    pub haplogroup: String,
    pub regions: Vec<MapRegion>,
    /// `None` when no record matched any geometry.
    pub scale: Option<ColorScale>,
    /// Record countries with no geometry of the same `ADMIN` name.
    pub unmatched_countries: Vec<String>,
}

impl ChoroplethMap {
    pub fn matched_regions(&self) -> usize {
        self.regions.iter().filter(|r| r.has_data()).count()
    }
}

pub struct MapJoin;

impl MapJoin {
    /// Keep every geometry. Match on exact `ADMIN == Country`; a geometry with
    /// several matching records yields one region per record, in record order.
    pub fn join(
        geometries: &GeometrySet,
        records: &[FrequencyRecord],
        haplogroup: &str,
        ramp: &[Rgb],
    ) -> ChoroplethMap {
        let mut by_country: HashMap<&str, Vec<f64>> = HashMap::new();
        for record in records {
            by_country
                .entry(record.country.as_str())
                .or_default()
                .push(record.frequency);
        }

        let mut regions = Vec::with_capacity(geometries.len());
        for (geometry_index, geometry) in geometries.countries().iter().enumerate() {
            match by_country.get(geometry.admin.as_str()) {
                Some(frequencies) => {
                    regions.extend(frequencies.iter().map(|&f| MapRegion {
                        geometry_index,
                        admin: geometry.admin.clone(),
                        frequency: Some(f),
                    }));
                }
                None => regions.push(MapRegion {
                    geometry_index,
                    admin: geometry.admin.clone(),
                    frequency: None,
                }),
            }
        }

        let admins: HashSet<&str> = geometries
            .countries()
            .iter()
            .map(|g| g.admin.as_str())
            .collect();
        let mut unmatched_countries: Vec<String> = Vec::new();
        for record in records {
            let country = record.country.as_str();
            if !admins.contains(country) && !unmatched_countries.iter().any(|c| c == country) {
                unmatched_countries.push(country.to_string());
            }
        }
        if !unmatched_countries.is_empty() {
            debug!(
                "{} countries have no matching geometry: {}",
                unmatched_countries.len(),
                unmatched_countries.join(", ")
            );
        }

        let scale = ColorScale::fit(regions.iter().filter_map(|r| r.frequency), ramp);

        ChoroplethMap {
            haplogroup: haplogroup.to_string(),
            regions,
            scale,
            unmatched_countries,
        }
    }
}
