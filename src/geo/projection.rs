//! Map projection and slippy tile math.
//!
//! Uses spherical Web Mercator so the canvas lines up with standard
//! `{z}/{x}/{y}` raster tiles. Handles converting between geographic
//! coordinates (lat/lon) and screen coordinates for rendering.

use super::GeoBounds;
use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;
use std::f64::consts::PI;

/// Edge length of a raster tile in screen points.
pub const TILE_SIZE: f64 = 256.0;

/// Zoom limits for the map view.
pub const MIN_ZOOM: f64 = 3.0;
pub const MAX_ZOOM: f64 = 11.0;

/// Web Mercator is undefined at the poles; clamp to the usual square extent.
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Center and zoom of the map, the only view command the canvas accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    /// Fractional slippy-map zoom level
    pub zoom: f64,
}

impl Default for MapView {
    fn default() -> Self {
        // Continental US
        Self {
            center_lat: 39.8283,
            center_lon: -98.5795,
            zoom: 4.0,
        }
    }
}

impl MapView {
    pub fn new(center_lat: f64, center_lon: f64, zoom: f64) -> Self {
        Self {
            center_lat,
            center_lon,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Moves the center by a screen-space drag delta.
    pub fn pan_pixels(&mut self, delta: Vec2) {
        let (cx, cy) = world_pixels(self.center_lat, self.center_lon, self.zoom);
        let (lat, lon) = from_world_pixels(cx - delta.x as f64, cy - delta.y as f64, self.zoom);
        self.center_lat = lat;
        self.center_lon = wrap_lon(lon);
    }

    /// Changes zoom while keeping the geographic point under `anchor` fixed.
    pub fn zoom_around(&mut self, anchor: Pos2, screen_rect: Rect, new_zoom: f64) {
        let new_zoom = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let anchor_geo = MapProjection::new(*self, screen_rect).screen_to_geo(anchor);

        self.zoom = new_zoom;

        // Re-center so the anchor lands on the same screen position again
        let offset = anchor - screen_rect.center();
        let (ax, ay) = world_pixels(anchor_geo.y, anchor_geo.x, new_zoom);
        let (lat, lon) = from_world_pixels(ax - offset.x as f64, ay - offset.y as f64, new_zoom);
        self.center_lat = lat;
        self.center_lon = wrap_lon(lon);
    }
}

/// Identifies a single raster tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    /// The tile containing a geographic point at zoom `z`.
    pub fn containing(lat: f64, lon: f64, z: u8) -> Self {
        let n = 1u64 << z;
        let (px, py) = world_pixels(lat, wrap_lon(lon), z as f64);
        let x = ((px / TILE_SIZE).floor() as i64).rem_euclid(n as i64) as u32;
        let y = ((py / TILE_SIZE).floor() as i64).clamp(0, n as i64 - 1) as u32;
        Self { z, x, y }
    }

    /// Expands a `{z}/{x}/{y}` URL template. `{s}` picks a subdomain and
    /// `{r}` is the (empty) retina suffix.
    pub fn url(&self, template: &str) -> String {
        let subdomain = ["a", "b", "c"][((self.x + self.y) % 3) as usize];
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
            .replace("{s}", subdomain)
            .replace("{r}", "")
    }
}

/// A tile that intersects the screen along with where to draw it.
#[derive(Debug, Clone, Copy)]
pub struct VisibleTile {
    pub id: TileId,
    pub rect: Rect,
}

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    pub view: MapView,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl MapProjection {
    pub fn new(view: MapView, screen_rect: Rect) -> Self {
        Self { view, screen_rect }
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let (cx, cy) = world_pixels(self.view.center_lat, self.view.center_lon, self.view.zoom);
        let (px, py) = world_pixels(coord.y, coord.x, self.view.zoom);
        let center = self.screen_rect.center();
        Pos2::new(center.x + (px - cx) as f32, center.y + (py - cy) as f32)
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let (cx, cy) = world_pixels(self.view.center_lat, self.view.center_lon, self.view.zoom);
        let center = self.screen_rect.center();
        let (lat, lon) = from_world_pixels(
            cx + (pos.x - center.x) as f64,
            cy + (pos.y - center.y) as f64,
            self.view.zoom,
        );
        Coord { x: lon, y: lat }
    }

    /// Screen rectangle covered by a geographic box.
    pub fn bounds_to_rect(&self, bounds: &GeoBounds) -> Rect {
        let top_left = self.geo_to_screen(Coord {
            x: bounds.west,
            y: bounds.north,
        });
        let bottom_right = self.geo_to_screen(Coord {
            x: bounds.east,
            y: bounds.south,
        });
        Rect::from_min_max(top_left, bottom_right)
    }

    /// Returns the visible geographic bounds.
    pub fn visible_bounds(&self) -> GeoBounds {
        let top_left = self.screen_to_geo(self.screen_rect.left_top());
        let bottom_right = self.screen_to_geo(self.screen_rect.right_bottom());

        GeoBounds {
            south: bottom_right.y.min(top_left.y),
            west: top_left.x.min(bottom_right.x),
            north: top_left.y.max(bottom_right.y),
            east: top_left.x.max(bottom_right.x),
        }
    }

    /// Checks if a coordinate is within the visible bounds (with margin).
    pub fn is_visible(&self, coord: Coord<f64>, margin_deg: f64) -> bool {
        let b = self.visible_bounds();
        coord.x >= b.west - margin_deg
            && coord.x <= b.east + margin_deg
            && coord.y >= b.south - margin_deg
            && coord.y <= b.north + margin_deg
    }

    /// Integer zoom used when requesting tiles for this view.
    pub fn tile_zoom(&self) -> u8 {
        self.view.zoom.round().clamp(0.0, MAX_ZOOM) as u8
    }

    /// All tiles needed to cover the screen at the current tile zoom.
    pub fn visible_tiles(&self) -> Vec<VisibleTile> {
        let z = self.tile_zoom();
        let n = 1i64 << z;
        // Tiles at integer zoom `z` drawn at fractional zoom
        let tile_px = TILE_SIZE * 2f64.powf(self.view.zoom - z as f64);

        let (cx, cy) = world_pixels(self.view.center_lat, self.view.center_lon, self.view.zoom);
        let half_w = self.screen_rect.width() as f64 / 2.0;
        let half_h = self.screen_rect.height() as f64 / 2.0;

        let min_tx = ((cx - half_w) / tile_px).floor() as i64;
        let max_tx = ((cx + half_w) / tile_px).floor() as i64;
        let min_ty = (((cy - half_h) / tile_px).floor() as i64).max(0);
        let max_ty = (((cy + half_h) / tile_px).floor() as i64).min(n - 1);

        let center = self.screen_rect.center();
        let mut tiles = Vec::new();
        for ty in min_ty..=max_ty {
            for tx in min_tx..=max_tx {
                let left = center.x as f64 + (tx as f64 * tile_px - cx);
                let top = center.y as f64 + (ty as f64 * tile_px - cy);
                let rect = Rect::from_min_size(
                    Pos2::new(left as f32, top as f32),
                    Vec2::splat(tile_px as f32),
                );
                tiles.push(VisibleTile {
                    id: TileId {
                        z,
                        x: tx.rem_euclid(n) as u32,
                        y: ty as u32,
                    },
                    rect,
                });
            }
        }
        tiles
    }
}

/// Projects (lat, lon) to world pixel coordinates at `zoom`.
fn world_pixels(lat: f64, lon: f64, zoom: f64) -> (f64, f64) {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (lon + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale;
    (x, y)
}

/// Inverse of [`world_pixels`], returns (lat, lon).
fn from_world_pixels(x: f64, y: f64, zoom: f64) -> (f64, f64) {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let lon = x / scale * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / scale;
    let lat = n.sinh().atan().to_degrees();
    (lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), lon)
}

fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_center_maps_to_screen_center() {
        let projection = MapProjection::new(MapView::new(35.3331, -97.2775, 8.0), screen());
        let pos = projection.geo_to_screen(Coord {
            x: -97.2775,
            y: 35.3331,
        });
        assert!((pos.x - 400.0).abs() < 0.01);
        assert!((pos.y - 300.0).abs() < 0.01);
    }

    #[test]
    fn test_screen_geo_round_trip() {
        let projection = MapProjection::new(MapView::new(41.73, -93.72, 6.5), screen());
        let geo = projection.screen_to_geo(Pos2::new(120.0, 510.0));
        let back = projection.geo_to_screen(geo);
        assert!((back.x - 120.0).abs() < 0.01);
        assert!((back.y - 510.0).abs() < 0.01);
    }

    #[test]
    fn test_north_is_up() {
        let projection = MapProjection::new(MapView::default(), screen());
        let north = projection.geo_to_screen(Coord { x: -98.0, y: 45.0 });
        let south = projection.geo_to_screen(Coord { x: -98.0, y: 30.0 });
        assert!(north.y < south.y);
    }

    #[test]
    fn test_tile_containing() {
        // Zoom 0 has exactly one tile
        assert_eq!(
            TileId::containing(35.0, -97.0, 0),
            TileId { z: 0, x: 0, y: 0 }
        );

        // Western/northern hemisphere lands in the top-left quadrant at zoom 1
        assert_eq!(
            TileId::containing(35.0, -97.0, 1),
            TileId { z: 1, x: 0, y: 0 }
        );
        assert_eq!(
            TileId::containing(-35.0, 97.0, 1),
            TileId { z: 1, x: 1, y: 1 }
        );
    }

    #[test]
    fn test_tile_url_template() {
        let tile = TileId { z: 4, x: 3, y: 6 };
        assert_eq!(
            tile.url("https://tile.open-meteo.com/radar/usa/{z}/{x}/{y}.png?frame=2"),
            "https://tile.open-meteo.com/radar/usa/4/3/6.png?frame=2"
        );
        assert_eq!(
            tile.url("https://{s}.example.com/{z}/{x}/{y}{r}.png"),
            "https://a.example.com/4/3/6.png"
        );
    }

    #[test]
    fn test_visible_tiles_cover_screen() {
        let projection = MapProjection::new(MapView::default(), screen());
        let tiles = projection.visible_tiles();
        assert!(!tiles.is_empty());

        let rect = screen();
        let covered = tiles.iter().fold(Rect::NOTHING, |acc, t| acc.union(t.rect));
        assert!(covered.contains_rect(rect));
        assert!(tiles.iter().all(|t| t.id.z == 4));
    }

    #[test]
    fn test_zoom_around_keeps_anchor() {
        let rect = screen();
        let mut view = MapView::new(39.0, -98.0, 5.0);
        let anchor = Pos2::new(650.0, 150.0);
        let before = MapProjection::new(view, rect).screen_to_geo(anchor);

        view.zoom_around(anchor, rect, 6.0);
        let after = MapProjection::new(view, rect).screen_to_geo(anchor);

        assert!((view.zoom - 6.0).abs() < 1e-9);
        assert!((before.x - after.x).abs() < 1e-6);
        assert!((before.y - after.y).abs() < 1e-6);
    }

    #[test]
    fn test_pan_moves_center() {
        let mut view = MapView::new(39.0, -98.0, 5.0);
        view.pan_pixels(Vec2::new(100.0, 0.0));
        // Dragging right reveals terrain to the west
        assert!(view.center_lon < -98.0);
        assert!((view.center_lat - 39.0).abs() < 1e-9);
    }
}
