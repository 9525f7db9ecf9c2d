//! Static Map Renderer
//! Rasterizes a choropleth into an in-memory RGB buffer with plotters.
//!
//! Layout:
//! 1. Map area on the left, aspect ratio of the geometry bounds preserved
//! 2. Colour bar on the right, labelled with raw frequency
//! 3. "No data" swatch below the colour bar

use super::color::{region_fill, to_rgb_color, ColorScale};
use super::join::ChoroplethMap;
use crate::config::MapStyle;
use crate::data::{Bounds, GeometrySet};
use log::error;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use thiserror::Error;

const LEGEND_WIDTH: u32 = 150;
const SWATCH_HEIGHT: u32 = 60;
const MAP_MARGIN: u32 = 10;
const CAPTION_HEIGHT: u32 = 40;
const LEGEND_STEPS: usize = 64;

type DrawResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw map: {0}")]
    Drawing(String),
}

pub struct StaticMapRenderer;

impl StaticMapRenderer {
    /// Render to a `width * height * 3` RGB buffer sized by `style`.
    pub fn render_rgb(
        geometries: &GeometrySet,
        map: &ChoroplethMap,
        style: &MapStyle,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; style.width as usize * style.height as usize * 3];
        Self::draw(&mut buffer, geometries, map, style).map_err(|e| {
            error!("Map render for '{}' failed: {}", map.haplogroup, e);
            RenderError::Drawing(e.to_string())
        })?;
        Ok(buffer)
    }

    fn draw(
        buffer: &mut [u8],
        geometries: &GeometrySet,
        map: &ChoroplethMap,
        style: &MapStyle,
    ) -> DrawResult {
        let root =
            BitMapBackend::with_buffer(buffer, (style.width, style.height)).into_drawing_area();
        root.fill(&to_rgb_color(style.background))?;

        let (map_area, legend_area) =
            root.split_horizontally(style.width.saturating_sub(LEGEND_WIDTH) as i32);

        let (w, h) = map_area.dim_in_pixel();
        let (x_range, y_range) = Self::fit_ranges(
            geometries.bounds(),
            (
                w.saturating_sub(2 * MAP_MARGIN),
                h.saturating_sub(2 * MAP_MARGIN + CAPTION_HEIGHT),
            ),
        );

        let mut chart = ChartBuilder::on(&map_area)
            .margin(MAP_MARGIN as i32)
            .caption(
                format!("Haplogroup {}", map.haplogroup),
                ("sans-serif", 24).into_font(),
            )
            .build_cartesian_2d(x_range, y_range)?;

        let stroke = to_rgb_color(style.stroke).stroke_width(style.stroke_width);
        let countries = geometries.countries();

        // Holed polygons first; enclaves are separate features painted over them
        for holed in [true, false] {
            for region in &map.regions {
                let Some(geometry) = countries.get(region.geometry_index) else {
                    continue;
                };
                let fill =
                    to_rgb_color(region_fill(region.frequency, map.scale.as_ref(), style));
                chart.draw_series(
                    geometry
                        .polygons
                        .iter()
                        .filter(|p| p.interiors.is_empty() != holed)
                        .map(|p| Polygon::new(p.exterior.clone(), fill.filled())),
                )?;
            }
        }

        for geometry in countries {
            chart.draw_series(
                geometry
                    .polygons
                    .iter()
                    .flat_map(|p| p.rings())
                    .map(|ring| PathElement::new(ring.to_vec(), stroke)),
            )?;
        }

        Self::draw_legend(&legend_area, map.scale.as_ref(), style)?;
        root.present()?;
        Ok(())
    }

    fn draw_legend(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        scale: Option<&ColorScale>,
        style: &MapStyle,
    ) -> DrawResult {
        let (_, height) = area.dim_in_pixel();
        let (bar_area, swatch_area) =
            area.split_vertically(height.saturating_sub(SWATCH_HEIGHT) as i32);

        if let Some(scale) = scale {
            let (lo, hi) = if scale.max > scale.min {
                (scale.min, scale.max)
            } else {
                (scale.min - 0.5, scale.max + 0.5)
            };

            let mut chart = ChartBuilder::on(&bar_area)
                .margin(10)
                .caption("Frequency", ("sans-serif", 16).into_font())
                .y_label_area_size(60)
                .build_cartesian_2d(0f64..1f64, lo..hi)?;

            chart
                .configure_mesh()
                .disable_mesh()
                .disable_x_axis()
                .y_labels(6)
                .draw()?;

            let step = (hi - lo) / LEGEND_STEPS as f64;
            chart.draw_series((0..LEGEND_STEPS).map(|k| {
                let v0 = lo + step * k as f64;
                let v1 = v0 + step;
                let color = to_rgb_color(scale.color_for((v0 + v1) / 2.0));
                Rectangle::new([(0.0, v0), (1.0, v1)], color.filled())
            }))?;
        }

        let no_data = to_rgb_color(style.no_data);
        swatch_area.draw(&Rectangle::new([(15, 15), (45, 35)], no_data.filled()))?;
        swatch_area.draw(&Rectangle::new(
            [(15, 15), (45, 35)],
            to_rgb_color(style.stroke).stroke_width(1),
        ))?;
        swatch_area.draw(&Text::new(
            "No data",
            (52, 18),
            ("sans-serif", 14).into_font(),
        ))?;
        Ok(())
    }

    /// Data ranges covering `bounds` at equal scale on both axes for a `size` pixel plot.
    pub fn fit_ranges(bounds: Bounds, size: (u32, u32)) -> (Range<f64>, Range<f64>) {
        let pw = size.0.max(1) as f64;
        let ph = size.1.max(1) as f64;
        let bw = if bounds.width() > 0.0 { bounds.width() } else { 1.0 };
        let bh = if bounds.height() > 0.0 { bounds.height() } else { 1.0 };

        let units_per_px = (bw / pw).max(bh / ph);
        let half_w = pw * units_per_px / 2.0;
        let half_h = ph * units_per_px / 2.0;
        let cx = (bounds.min_x + bounds.max_x) / 2.0;
        let cy = (bounds.min_y + bounds.max_y) / 2.0;

        (cx - half_w..cx + half_w, cy - half_h..cy + half_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CountryGeometry, FrequencyRecord, PolygonShape};
    use crate::map::MapJoin;
    use pretty_assertions::assert_eq;

    fn square(admin: &str, x: f64) -> CountryGeometry {
        CountryGeometry {
            admin: admin.to_string(),
            polygons: vec![PolygonShape {
                exterior: vec![(x, 0.0), (x, 10.0), (x + 10.0, 10.0), (x + 10.0, 0.0), (x, 0.0)],
                interiors: Vec::new(),
            }],
        }
    }

    fn pixel(buffer: &[u8], width: u32, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * width as usize + x as usize) * 3;
        [buffer[i], buffer[i + 1], buffer[i + 2]]
    }

    #[test]
    fn fills_matched_and_unmatched_countries() {
        let style = MapStyle {
            width: 600,
            height: 400,
            ..MapStyle::default()
        };
        let geometries =
            GeometrySet::new(vec![square("France", 0.0), square("Germany", 10.0)]).unwrap();
        let records = vec![FrequencyRecord::new("France", "H1", 12.0)];
        let map = MapJoin::join(&geometries, &records, "H1", &style.ramp);

        let buffer = match StaticMapRenderer::render_rgb(&geometries, &map, &style) {
            Ok(buffer) => buffer,
            Err(e) => {
                // Captions need a system font
                eprintln!("skipping render check: {e}");
                return;
            }
        };
        assert_eq!(buffer.len(), 600 * 400 * 3);

        // Map area is 450px wide; the two squares split its plot width in half
        let plot_left = MAP_MARGIN;
        let plot_width = 600 - LEGEND_WIDTH - 2 * MAP_MARGIN;
        let row = 220;
        let france_x = plot_left + plot_width / 4;
        let germany_x = plot_left + plot_width * 3 / 4;

        let france = region_fill(Some(12.0), map.scale.as_ref(), &style);
        assert_eq!(pixel(&buffer, 600, france_x, row), france);
        assert_eq!(pixel(&buffer, 600, germany_x, row), style.no_data);
        assert_eq!(pixel(&buffer, 600, 2, 2), style.background);

        let border = plot_left + plot_width / 2;
        let stroked = (border - 6..=border + 6).any(|x| pixel(&buffer, 600, x, row) == style.stroke);
        assert!(stroked, "no border stroke near x={border}");
    }

    fn world() -> Bounds {
        Bounds {
            min_x: -180.0,
            min_y: -90.0,
            max_x: 180.0,
            max_y: 90.0,
        }
    }

    #[test]
    fn fit_ranges_keeps_aspect_ratio() {
        let (x, y) = StaticMapRenderer::fit_ranges(world(), (1000, 400));
        let units_x = (x.end - x.start) / 1000.0;
        let units_y = (y.end - y.start) / 400.0;
        assert!((units_x - units_y).abs() < 1e-9);
        // Height is the binding axis: 180 degrees over 400px
        assert!((y.end - y.start - 180.0).abs() < 1e-9);
        assert!(x.start <= -180.0 && x.end >= 180.0);
    }

    #[test]
    fn fit_ranges_handles_degenerate_bounds() {
        let point = Bounds {
            min_x: 5.0,
            min_y: 5.0,
            max_x: 5.0,
            max_y: 5.0,
        };
        let (x, y) = StaticMapRenderer::fit_ranges(point, (100, 100));
        assert!(x.end > x.start && y.end > y.start);
        assert!(x.contains(&5.0) && y.contains(&5.0));
    }
}
