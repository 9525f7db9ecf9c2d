//! GUI module - User interface components

mod app;
mod control_panel;
mod map_view;
mod report_view;

pub use app::HaplomapApp;
pub use control_panel::{ControlPanel, ControlPanelAction, StatusLevel};
pub use map_view::MapView;
pub use report_view::show_report;
