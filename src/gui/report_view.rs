//! Report table drawn as a striped grid.

use crate::summary::{ReportTable, REPORT_HEADERS};
use egui::{RichText, ScrollArea};

pub fn show_report(ui: &mut egui::Ui, table: &ReportTable) {
    ui.label(
        RichText::new(format!("Haplogroup {}", table.haplogroup))
            .size(18.0)
            .strong(),
    );
    ui.add_space(8.0);

    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("report_{}", table.haplogroup)))
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        for header in REPORT_HEADERS {
                            ui.label(RichText::new(header).strong().size(12.0));
                        }
                        ui.end_row();

                        for row in &table.rows {
                            ui.label(RichText::new(&row.country).size(12.0));
                            ui.label(RichText::new(&row.total_frequency).size(12.0));
                            ui.label(RichText::new(&row.share).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    });
}
