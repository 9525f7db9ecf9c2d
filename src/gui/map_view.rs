//! Map Viewer Widget
//! Shows the rendered choropleth texture.

use crate::map::ChoroplethMap;
use egui::{ColorImage, RichText, ScrollArea, TextureHandle, TextureOptions};

pub struct MapView {
    texture: TextureHandle,
    matched: usize,
    regions: usize,
    unmatched: Vec<String>,
}

impl MapView {
    /// Upload an RGB buffer from the static renderer.
    pub fn new(
        ctx: &egui::Context,
        rgb: &[u8],
        size: [usize; 2],
        map: &ChoroplethMap,
    ) -> Self {
        let image = ColorImage::from_rgb(size, rgb);
        let texture = ctx.load_texture("choropleth", image, TextureOptions::LINEAR);

        Self {
            texture,
            matched: map.matched_regions(),
            regions: map.regions.len(),
            unmatched: map.unmatched_countries.clone(),
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new(format!(
                "{} of {} regions with data",
                self.matched, self.regions
            ))
            .size(12.0),
        );
        if !self.unmatched.is_empty() {
            ui.label(
                RichText::new(format!(
                    "No geometry named: {}",
                    self.unmatched.join(", ")
                ))
                .size(11.0)
                .color(egui::Color32::GRAY),
            );
        }
        ui.add_space(6.0);

        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            ui.add(egui::Image::new(&self.texture).shrink_to_fit());
        });
    }
}
