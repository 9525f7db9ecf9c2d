//! Haplomap Main Application
//! Main window with control panel and map/report viewer.

use crate::config::AppConfig;
use crate::data::{FrequencyLoader, GeometryLoader};
use crate::gui::{show_report, ControlPanel, ControlPanelAction, MapView, StatusLevel};
use crate::map::StaticMapRenderer;
use crate::pipeline::{self, Datasets, RenderTarget};
use crate::summary::ReportTable;
use anyhow::{Context, Result};
use egui::{RichText, SidePanel};
use log::{error, info, warn};
use std::path::Path;

/// What the central panel shows.
enum ViewState {
    Message(String),
    Map(MapView),
    Report(ReportTable),
}

/// Main application window.
pub struct HaplomapApp {
    config: AppConfig,
    datasets: Option<Datasets>,
    control_panel: ControlPanel,
    view: ViewState,
    /// Non-fatal issues from the last load, repeated next to selection status.
    load_notice: Option<String>,
}

impl HaplomapApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let control_panel =
            ControlPanel::new(config.frequency_path.clone(), config.geometry_path.clone());
        let mut app = Self {
            config,
            datasets: None,
            control_panel,
            view: ViewState::Message("No Data".to_string()),
            load_notice: None,
        };
        app.load_datasets(&cc.egui_ctx);
        app
    }

    /// Both datasets plus the haplogroup choices they offer.
    fn read_datasets(
        frequency_path: &Path,
        geometry_path: &Path,
    ) -> Result<(Datasets, Vec<String>)> {
        let frequencies = FrequencyLoader::load(frequency_path)?;
        let geometries = GeometryLoader::load(geometry_path)?;
        let datasets = Datasets {
            frequencies,
            geometries,
        };
        let haplogroups = datasets
            .haplogroups()
            .context("Failed to list haplogroups")?;
        Ok((datasets, haplogroups))
    }

    /// Load both sources from the current paths, replacing any previous datasets.
    fn load_datasets(&mut self, ctx: &egui::Context) {
        let settings = &self.control_panel.settings;
        match Self::read_datasets(&settings.frequency_path, &settings.geometry_path) {
            Ok((datasets, haplogroups)) => {
                let report = datasets.frequencies.report();
                self.load_notice = report.has_drops().then(|| {
                    format!(
                        "Dropped {} rows with a non-numeric Frequency and {} with an empty label ({} kept).",
                        report.invalid_frequencies,
                        report.missing_labels,
                        report.rows_kept()
                    )
                });
                info!(
                    "Datasets ready: {} records, {} geometries",
                    datasets.frequencies.len(),
                    datasets.geometries.len()
                );

                self.control_panel.update_haplogroups(haplogroups);
                self.datasets = Some(datasets);
                self.refresh(ctx);
            }
            Err(e) => {
                error!("{:#}", e);
                self.datasets = None;
                self.load_notice = None;
                self.control_panel.update_haplogroups(Vec::new());
                self.control_panel
                    .set_status(StatusLevel::Error, &format!("Error: {:#}", e));
                self.view = ViewState::Message("No Data".to_string());
            }
        }
    }

    /// Rerun the pipeline for the current selection.
    fn refresh(&mut self, ctx: &egui::Context) {
        let Some(datasets) = &self.datasets else {
            return;
        };
        let settings = &self.control_panel.settings;
        let haplogroup = settings.haplogroup.clone();

        let ramp = &self.config.map.ramp;
        let output = match pipeline::run(datasets, &haplogroup, settings.mode, ramp) {
            Ok(output) => output,
            Err(e) => {
                let level = if e.is_warning() {
                    warn!("{}", e);
                    StatusLevel::Warning
                } else {
                    error!("{}", e);
                    StatusLevel::Error
                };
                self.control_panel.set_status(level, &e.to_string());
                self.view = ViewState::Message(e.to_string());
                return;
            }
        };

        let (mut status, mut level) = match &output.summary {
            Some(summary) => (
                format!(
                    "{}: {} countries, total frequency {}",
                    haplogroup,
                    summary.rows.len(),
                    summary.grand_total
                ),
                StatusLevel::Info,
            ),
            None => (
                format!("{}: all frequencies are 0, shares are undefined", haplogroup),
                StatusLevel::Warning,
            ),
        };

        let view = match output.target {
            RenderTarget::Report(table) => ViewState::Report(table),
            RenderTarget::Map(map) => {
                let style = &self.config.map;
                match StaticMapRenderer::render_rgb(&datasets.geometries, &map, style) {
                    Ok(rgb) => {
                        if !map.unmatched_countries.is_empty() {
                            status.push_str(&format!(
                                "; {} without geometry",
                                map.unmatched_countries.len()
                            ));
                        }
                        let size = [style.width as usize, style.height as usize];
                        ViewState::Map(MapView::new(ctx, &rgb, size, &map))
                    }
                    Err(e) => {
                        self.control_panel
                            .set_status(StatusLevel::Error, &format!("Error: {}", e));
                        self.view = ViewState::Message(e.to_string());
                        return;
                    }
                }
            }
        };
        self.view = view;

        if let Some(notice) = &self.load_notice {
            status.push('\n');
            status.push_str(notice);
            level = StatusLevel::Warning;
        }
        self.control_panel.set_status(level, &status);
    }

    fn handle_browse_frequencies(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.settings.frequency_path = path;
            self.load_datasets(ctx);
        }
    }

    fn handle_browse_geometry(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Shapefile", &["shp"])
            .add_filter("GeoJSON", &["geojson", "json"])
            .pick_file()
        {
            self.control_panel.settings.geometry_path = path;
            self.load_datasets(ctx);
        }
    }
}

impl eframe::App for HaplomapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseFrequencies => {
                            self.handle_browse_frequencies(ctx)
                        }
                        ControlPanelAction::BrowseGeometry => self.handle_browse_geometry(ctx),
                        ControlPanelAction::Reload => self.load_datasets(ctx),
                        ControlPanelAction::SelectionChanged => self.refresh(ctx),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Map or Report
        egui::CentralPanel::default().show(ctx, |ui| match &self.view {
            ViewState::Message(text) => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(text).size(20.0));
                });
            }
            ViewState::Map(map_view) => map_view.show(ui),
            ViewState::Report(table) => show_report(ui, table),
        });
    }
}
