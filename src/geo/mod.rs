//! Geographic math for the map canvas.
//!
//! This module provides the radar coverage bounds calculation and the
//! Web Mercator projection used to place tiles, image overlays and alert
//! polygons on screen.

mod bounds;
mod projection;

pub use bounds::{calculate_bounds, GeoBounds, COVERAGE_RADIUS_KM};
pub use projection::{MapProjection, MapView, TileId, MAX_ZOOM, MIN_ZOOM};
