//! Control Panel Widget
//! Left side panel with data sources, haplogroup chooser and view toggle.

use crate::pipeline::ViewMode;
use egui::{Color32, ComboBox, RichText};
use std::path::{Path, PathBuf};

/// User selections
#[derive(Default, Clone)]
pub struct UserSettings {
    pub frequency_path: PathBuf,
    pub geometry_path: PathBuf,
    pub haplogroup: String,
    pub mode: ViewMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Warning,
    Error,
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub haplogroups: Vec<String>,
    pub status: String,
    pub status_level: StatusLevel,
}

impl ControlPanel {
    pub fn new(frequency_path: PathBuf, geometry_path: PathBuf) -> Self {
        Self {
            settings: UserSettings {
                frequency_path,
                geometry_path,
                ..Default::default()
            },
            haplogroups: Vec::new(),
            status: "Ready".to_string(),
            status_level: StatusLevel::Info,
        }
    }

    /// Replace the chooser entries, keeping the current pick when it still exists.
    pub fn update_haplogroups(&mut self, haplogroups: Vec<String>) {
        if !haplogroups.contains(&self.settings.haplogroup) {
            self.settings.haplogroup = haplogroups.first().cloned().unwrap_or_default();
        }
        self.haplogroups = haplogroups;
    }

    pub fn set_status(&mut self, level: StatusLevel, status: &str) {
        self.status_level = level;
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🧬 Haplomap")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Haplogroup frequencies by country")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Sources").size(14.0).strong());
        ui.add_space(5.0);

        if Self::source_row(ui, "Frequencies", &self.settings.frequency_path) {
            action = ControlPanelAction::BrowseFrequencies;
        }
        ui.add_space(4.0);
        if Self::source_row(ui, "Geometry", &self.settings.geometry_path) {
            action = ControlPanelAction::BrowseGeometry;
        }
        ui.add_space(6.0);
        ui.vertical_centered(|ui| {
            if ui.button("🔄 Reload").clicked() {
                action = ControlPanelAction::Reload;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Selection Section =====
        ui.label(RichText::new("🔧 Selection").size(14.0).strong());
        ui.add_space(8.0);

        ui.add_enabled_ui(!self.haplogroups.is_empty(), |ui| {
            ui.horizontal(|ui| {
                ui.add_sized([90.0, 20.0], egui::Label::new("Haplogroup:"));
                ComboBox::from_id_salt("haplogroup")
                    .width(160.0)
                    .selected_text(&self.settings.haplogroup)
                    .show_ui(ui, |ui| {
                        for haplogroup in &self.haplogroups {
                            if ui
                                .selectable_label(self.settings.haplogroup == *haplogroup, haplogroup)
                                .clicked()
                                && self.settings.haplogroup != *haplogroup
                            {
                                self.settings.haplogroup = haplogroup.clone();
                                action = ControlPanelAction::SelectionChanged;
                            }
                        }
                    });
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.add_sized([90.0, 20.0], egui::Label::new("View:"));
                let map = ui.radio_value(&mut self.settings.mode, ViewMode::Map, "Map");
                let report = ui.radio_value(&mut self.settings.mode, ViewMode::Report, "Report");
                if map.changed() || report.changed() {
                    action = ControlPanelAction::SelectionChanged;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = match self.status_level {
            StatusLevel::Info => Color32::GRAY,
            StatusLevel::Warning => Color32::from_rgb(230, 160, 20),
            StatusLevel::Error => Color32::from_rgb(220, 53, 69),
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// File name with a Browse button. Returns true when Browse was clicked.
    fn source_row(ui: &mut egui::Ui, label: &str, path: &Path) -> bool {
        let mut clicked = false;
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.vertical(|ui| {
                        ui.label(RichText::new(label).size(10.0).color(Color32::GRAY));
                        ui.label(RichText::new(&name).size(12.0))
                            .on_hover_text(path.display().to_string());
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            clicked = true;
                        }
                    });
                });
            });
        clicked
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseFrequencies,
    BrowseGeometry,
    Reload,
    SelectionChanged,
}
