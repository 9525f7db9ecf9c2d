//! Application settings, read from an optional `haplomap.json`.

use crate::map::ColorScale;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "haplomap.json";

pub type Rgb = [u8; 3];

const NO_DATA_FALLBACKS: [Rgb; 5] = [
    [200, 200, 200],
    [128, 128, 128],
    [90, 90, 90],
    [70, 130, 180],
    [148, 0, 211],
];

/// Positions sampled along the ramp when checking the no-data colour.
const RAMP_SAMPLES: usize = 256;
/// Smallest channel-sum distance between no-data and any ramp colour.
const NO_DATA_MIN_DISTANCE: u32 = 24;

/// Map raster size and colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub width: u32,
    pub height: u32,
    /// Colour stops from lowest to highest frequency.
    pub ramp: Vec<Rgb>,
    pub no_data: Rgb,
    pub stroke: Rgb,
    pub stroke_width: u32,
    pub background: Rgb,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 680,
            ramp: vec![
                [255, 255, 204],
                [254, 217, 118],
                [253, 141, 60],
                [227, 26, 28],
                [128, 0, 38],
            ],
            no_data: [200, 200, 200],
            stroke: [60, 60, 60],
            stroke_width: 1,
            background: [255, 255, 255],
        }
    }
}

impl MapStyle {
    /// Replace unusable values with defaults.
    fn sanitize(&mut self) {
        let defaults = MapStyle::default();
        if self.ramp.len() < 2 {
            warn!("Map colour ramp needs at least 2 stops, using the default ramp");
            self.ramp = defaults.ramp.clone();
        }
        if self.ramp_is_close_to(self.no_data) {
            let fallback = NO_DATA_FALLBACKS
                .into_iter()
                .find(|c| !self.ramp_is_close_to(*c))
                .unwrap_or(defaults.no_data);
            warn!(
                "No-data colour {:?} is too close to the colour ramp, using {:?}",
                self.no_data, fallback
            );
            self.no_data = fallback;
        }
        if self.width < 200 || self.height < 150 {
            warn!("Map size {}x{} too small, using default", self.width, self.height);
            self.width = defaults.width;
            self.height = defaults.height;
        }
    }

    /// True when `color` nearly matches a colour the ramp paints anywhere between its ends.
    fn ramp_is_close_to(&self, color: Rgb) -> bool {
        let scale = ColorScale::new(0.0, 1.0, self.ramp.clone());
        (0..RAMP_SAMPLES).any(|i| {
            let sample = scale.color_for(i as f64 / (RAMP_SAMPLES - 1) as f64);
            channel_distance(sample, color) < NO_DATA_MIN_DISTANCE
        })
    }
}

fn channel_distance(a: Rgb, b: Rgb) -> u32 {
    a.iter().zip(b).map(|(&x, y)| x.abs_diff(y) as u32).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub frequency_path: PathBuf,
    pub geometry_path: PathBuf,
    pub map: MapStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frequency_path: PathBuf::from("data/haplogroup_frequencies.csv"),
            geometry_path: PathBuf::from(
                "data/ne_110m_admin_0_countries/ne_110m_admin_0_countries.shp",
            ),
            map: MapStyle::default(),
        }
    }
}

impl AppConfig {
    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.map.sanitize();

        info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Like [`AppConfig::load`], falling back to defaults on error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{:#}; using default settings", e);
            Self::default()
        })
    }
}
