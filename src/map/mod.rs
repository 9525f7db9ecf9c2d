//! Map module - geometry join, colour scale and rendering

mod color;
mod join;
mod renderer;

pub use color::ColorScale;
pub use join::{ChoroplethMap, MapJoin};
pub use renderer::StaticMapRenderer;
