//! UI modules for the SKYWARN Radar viewer.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, radar status, and alert counts
//! - Left panel: Site, product, tilt and opacity controls
//! - Central canvas: Basemap, radar overlays and alert polygons
//! - Bottom panel: Animation controls
//! - Right panel: Layer toggles

mod bottom_panel;
mod canvas;
mod colors;
mod left_panel;
mod right_panel;
mod top_bar;

pub use bottom_panel::render_bottom_panel;
pub use canvas::{render_canvas, CanvasLayers};
pub use left_panel::render_left_panel;
pub use right_panel::render_right_panel;
pub use top_bar::render_top_bar;
