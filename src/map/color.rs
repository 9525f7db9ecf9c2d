//! Continuous colour scale over raw frequency values.

use crate::config::{MapStyle, Rgb};
use plotters::style::RGBColor;

/// Linear ramp between `min` and `max`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
    ramp: Vec<Rgb>,
}

impl ColorScale {
    pub fn new(min: f64, max: f64, ramp: Vec<Rgb>) -> Self {
        Self { min, max, ramp }
    }

    /// Fit the range to `values`. `None` when there are no values.
    pub fn fit(values: impl IntoIterator<Item = f64>, ramp: &[Rgb]) -> Option<Self> {
        let (min, max) = values.into_iter().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })?;
        Some(Self::new(min, max, ramp.to_vec()))
    }

    /// Position of `value` on the ramp, clamped to `0.0..=1.0`. A flat range maps to 0.
    pub fn position(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn color_for(&self, value: f64) -> Rgb {
        match self.ramp.len() {
            0 => [0, 0, 0],
            1 => self.ramp[0],
            n => {
                let scaled = self.position(value) * (n - 1) as f64;
                let i = (scaled.floor() as usize).min(n - 2);
                let t = scaled - i as f64;
                lerp(self.ramp[i], self.ramp[i + 1], t)
            }
        }
    }
}

fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let channel = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    [channel(a[0], b[0]), channel(a[1], b[1]), channel(a[2], b[2])]
}

/// Fill for one region: the ramp colour when it has data, the no-data colour otherwise.
pub fn region_fill(frequency: Option<f64>, scale: Option<&ColorScale>, style: &MapStyle) -> Rgb {
    match (frequency, scale) {
        (Some(value), Some(scale)) => scale.color_for(value),
        _ => style.no_data,
    }
}

pub fn to_rgb_color(c: Rgb) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}
