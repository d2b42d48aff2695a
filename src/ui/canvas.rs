//! Central canvas UI: basemap, radar overlays, alert polygons and site markers.

use super::colors;
use crate::alerts::{AlertCategory, AlertFeature, AlertLayers};
use crate::data::{get_site, NEXRAD_SITES};
use crate::geo::{MapProjection, MAX_ZOOM, MIN_ZOOM};
use crate::nexrad::{FrameKind, FrameTextures, OverlayFrame, OverlaySet, TileCache};
use crate::state::{AppState, UiEvent};
use eframe::egui::{self, Color32, Painter, Pos2, Rect, RichText, Sense, Stroke, Vec2};
use geo_types::Coord;

/// Pixel distance within which a click or hover hits a site marker.
const SITE_HIT_RADIUS: f32 = 8.0;

/// Everything the canvas draws from, besides the app state.
pub struct CanvasLayers<'a> {
    pub overlays: &'a OverlaySet,
    pub alerts: &'a AlertLayers,
    pub frame_textures: &'a FrameTextures,
    pub basemap_url: &'a str,
}

pub fn render_canvas(
    ctx: &egui::Context,
    state: &mut AppState,
    layers: CanvasLayers<'_>,
    tiles: &mut TileCache,
) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());
            let rect = response.rect;

            painter.rect_filled(rect, 0.0, colors::canvas::BACKGROUND);

            let projection = MapProjection::new(state.view, rect);

            render_basemap(&painter, &projection, tiles, layers.basemap_url);
            render_overlays(
                &painter,
                &projection,
                layers.overlays,
                layers.frame_textures,
                tiles,
            );
            render_alerts(&painter, &projection, layers.alerts, state);

            if state.layer_state.site_markers {
                render_sites(&painter, &projection, state.selection.site_id.as_deref());
            }

            draw_overlay_info(ui, &rect, state);
            draw_attribution(&painter, &rect);

            handle_canvas_interaction(&response, &projection, state, layers.alerts);
        });
}

fn render_basemap(
    painter: &Painter,
    projection: &MapProjection,
    tiles: &mut TileCache,
    basemap_url: &str,
) {
    for tile in projection.visible_tiles() {
        let url = tile.id.url(basemap_url);
        if let Some(texture) = tiles.request(&url) {
            painter.image(texture.id(), tile.rect, full_uv(), Color32::WHITE);
        }
    }
}

fn render_overlays(
    painter: &Painter,
    projection: &MapProjection,
    overlays: &OverlaySet,
    frame_textures: &FrameTextures,
    tiles: &mut TileCache,
) {
    let mut frames: Vec<&OverlayFrame> = overlays.frames().iter().collect();
    frames.sort_by_key(|f| f.z_index);

    // Visible frame first so its tiles win the fetch queue
    let visible_tiles = projection.visible_tiles();
    for frame in frames.iter().filter(|f| f.is_visible()) {
        let tint = Color32::from_white_alpha((frame.opacity.clamp(0.0, 1.0) * 255.0) as u8);
        match &frame.kind {
            FrameKind::Image { bounds, .. } => {
                if let Some(texture) = frame_textures.get(frame.id) {
                    let image_rect = projection.bounds_to_rect(bounds);
                    painter.image(texture.id(), image_rect, full_uv(), tint);
                }
            }
            FrameKind::Tile { url_template } => {
                for tile in &visible_tiles {
                    let url = tile.id.url(url_template);
                    if let Some(texture) = tiles.request(&url) {
                        painter.image(texture.id(), tile.rect, full_uv(), tint);
                    }
                }
            }
        }
    }

    // Prefetch hidden tile frames so the loop plays without gaps
    for frame in frames.iter().filter(|f| !f.is_visible()) {
        if let FrameKind::Tile { url_template } = &frame.kind {
            for tile in &visible_tiles {
                tiles.request(&tile.id.url(url_template));
            }
        }
    }
}

fn render_alerts(
    painter: &Painter,
    projection: &MapProjection,
    alerts: &AlertLayers,
    state: &AppState,
) {
    // Bottom to top: discussions under warnings, tornado on top
    let draw_order = [
        AlertCategory::MesoscaleDiscussion,
        AlertCategory::SevereThunderstorm,
        AlertCategory::Tornado,
    ];
    for category in draw_order {
        if !state.layer_state.alert_visible(category) {
            continue;
        }
        for feature in alerts.group(category) {
            render_alert_feature(painter, projection, feature);
        }
    }
}

fn render_alert_feature(painter: &Painter, projection: &MapProjection, feature: &AlertFeature) {
    let stroke = Stroke::new(2.0, feature.category.stroke_color());
    let fill = feature.category.fill_color();

    for rings in &feature.polygons {
        let screen_rings: Vec<Vec<Pos2>> = rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|(lat, lon)| projection.geo_to_screen(Coord { x: *lon, y: *lat }))
                    .collect()
            })
            .collect();

        let (vertices, indices) = triangulate_rings(&screen_rings);
        if !indices.is_empty() {
            let mut mesh = egui::Mesh::default();
            for pos in vertices {
                mesh.colored_vertex(pos, fill);
            }
            for tri in indices.chunks_exact(3) {
                mesh.add_triangle(tri[0] as u32, tri[1] as u32, tri[2] as u32);
            }
            painter.add(egui::Shape::mesh(mesh));
        }

        for points in screen_rings.iter().filter(|r| r.len() >= 2) {
            for i in 0..points.len() {
                let next = (i + 1) % points.len();
                painter.line_segment([points[i], points[next]], stroke);
            }
        }
    }
}

/// Triangulates an exterior ring and its holes.
///
/// Returns the flattened vertices and triangle indices into them. Closing
/// duplicates are dropped and rings with fewer than three points are skipped.
fn triangulate_rings(rings: &[Vec<Pos2>]) -> (Vec<Pos2>, Vec<usize>) {
    let mut vertices: Vec<Pos2> = Vec::new();
    let mut coords: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();

    for (ring_index, ring) in rings.iter().enumerate() {
        let mut points = ring.as_slice();
        if points.len() > 1 && points.first() == points.last() {
            points = &points[..points.len() - 1];
        }
        if points.len() < 3 {
            if ring_index == 0 {
                return (Vec::new(), Vec::new());
            }
            continue;
        }
        if ring_index > 0 {
            hole_indices.push(vertices.len());
        }
        for p in points {
            coords.push(p.x as f64);
            coords.push(p.y as f64);
            vertices.push(*p);
        }
    }

    match earcutr::earcut(&coords, &hole_indices, 2) {
        Ok(indices) => (vertices, indices),
        Err(e) => {
            log::debug!("Alert polygon triangulation failed: {:?}", e);
            (Vec::new(), Vec::new())
        }
    }
}

fn render_sites(painter: &Painter, projection: &MapProjection, current_site: Option<&str>) {
    let visible = projection.visible_bounds();
    let show_labels = projection.view.zoom >= 6.0;

    for site in NEXRAD_SITES.iter() {
        let is_current = current_site.is_some_and(|id| id.eq_ignore_ascii_case(site.id));
        if !is_current && !visible.contains(site.lat, site.lon) {
            continue;
        }

        let pos = projection.geo_to_screen(Coord {
            x: site.lon,
            y: site.lat,
        });

        if is_current {
            painter.circle_filled(pos, 6.0, colors::sites::CURRENT);
            painter.circle_stroke(pos, 9.0, Stroke::new(2.0, colors::sites::CURRENT_STROKE));
        } else {
            painter.circle_filled(pos, 4.0, colors::sites::OTHER);
            painter.circle_stroke(pos, 4.0, Stroke::new(1.0, colors::sites::OTHER_STROKE));
        }

        if show_labels || is_current {
            painter.text(
                pos + Vec2::new(8.0, -8.0),
                egui::Align2::LEFT_BOTTOM,
                site.id,
                egui::FontId::proportional(11.0),
                if is_current {
                    colors::sites::CURRENT
                } else {
                    colors::sites::LABEL
                },
            );
        }
    }
}

/// Site marker under a screen position, if any.
fn site_at(projection: &MapProjection, pos: Pos2) -> Option<&'static str> {
    NEXRAD_SITES
        .iter()
        .map(|site| {
            let marker = projection.geo_to_screen(Coord {
                x: site.lon,
                y: site.lat,
            });
            (site.id, marker.distance(pos))
        })
        .filter(|(_, d)| *d <= SITE_HIT_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

fn alert_at<'a>(
    projection: &MapProjection,
    alerts: &'a AlertLayers,
    state: &AppState,
    pos: Pos2,
) -> Option<&'a AlertFeature> {
    let coord = projection.screen_to_geo(pos);
    alerts.hit_test(coord.y, coord.x, |c| state.layer_state.alert_visible(c))
}

fn draw_overlay_info(ui: &mut egui::Ui, rect: &Rect, state: &AppState) {
    let overlay_pos = rect.left_top() + Vec2::new(10.0, 10.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(220.0, 60.0));

    let site_text = state
        .selection
        .site_id
        .as_deref()
        .and_then(get_site)
        .map(|s| s.label())
        .unwrap_or_else(|| "National composite".to_string());

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            ui.label(
                RichText::new(site_text)
                    .monospace()
                    .size(12.0)
                    .color(colors::canvas::INFO_TEXT),
            );
            if !state.animation.label.is_empty() {
                ui.label(
                    RichText::new(&state.animation.label)
                        .monospace()
                        .size(12.0)
                        .color(colors::canvas::INFO_TEXT),
                );
            }
            ui.label(
                RichText::new(format!("Zoom: {:.1}", state.view.zoom))
                    .monospace()
                    .size(12.0)
                    .color(colors::canvas::INFO_TEXT),
            );
        });
    });
}

fn draw_attribution(painter: &Painter, rect: &Rect) {
    painter.text(
        rect.right_bottom() + Vec2::new(-6.0, -4.0),
        egui::Align2::RIGHT_BOTTOM,
        "© OpenStreetMap contributors © CARTO",
        egui::FontId::proportional(10.0),
        colors::canvas::attribution(),
    );
}

fn handle_canvas_interaction(
    response: &egui::Response,
    projection: &MapProjection,
    state: &mut AppState,
    alerts: &AlertLayers,
) {
    let rect = projection.screen_rect;

    if response.dragged() {
        state.view.pan_pixels(response.drag_delta());
    }

    if response.hovered() {
        let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta);
        if scroll_delta.y != 0.0 {
            if let Some(pointer) = response.hover_pos() {
                let new_zoom = (state.view.zoom + scroll_delta.y as f64 * 0.002)
                    .clamp(MIN_ZOOM, MAX_ZOOM);
                state.view.zoom_around(pointer, rect, new_zoom);
            }
        }
    }

    if response.double_clicked() {
        if let Some(pointer) = response.interact_pointer_pos() {
            let new_zoom = (state.view.zoom + 1.0).clamp(MIN_ZOOM, MAX_ZOOM);
            state.view.zoom_around(pointer, rect, new_zoom);
        }
        return;
    }

    if response.clicked() {
        if let Some(pointer) = response.interact_pointer_pos() {
            if state.layer_state.site_markers {
                if let Some(site_id) = site_at(projection, pointer) {
                    state.push_event(UiEvent::SelectSite(Some(site_id.to_string())));
                    return;
                }
            }
            let hit = alert_at(projection, alerts, state, pointer);
            if let Some(link) = hit.and_then(|f| f.popup.link()) {
                response.ctx.open_url(egui::OpenUrl::new_tab(link));
            }
        }
    }

    if let Some(pointer) = response.hover_pos() {
        let site = if state.layer_state.site_markers {
            site_at(projection, pointer).and_then(get_site)
        } else {
            None
        };
        let hovered_alert = alert_at(projection, alerts, state, pointer);
        let hover_text = match site {
            Some(site) => Some(site.label()),
            None => hovered_alert.map(|f| f.popup.summary()),
        };

        if let Some(text) = hover_text {
            response.clone().on_hover_text_at_pointer(text);
        }
    }
}

fn full_uv() -> Rect {
    Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{MapView, TileId};

    fn projection_at(lat: f64, lon: f64) -> MapProjection {
        MapProjection::new(
            MapView::new(lat, lon, 8.0),
            Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        )
    }

    fn triangle_area(a: Pos2, b: Pos2, c: Pos2) -> f32 {
        ((b - a).x * (c - a).y - (b - a).y * (c - a).x).abs() / 2.0
    }

    fn filled_area(rings: &[Vec<Pos2>]) -> (f32, Vec<Pos2>) {
        let (vertices, indices) = triangulate_rings(rings);
        let mut area = 0.0;
        let mut centroids = Vec::new();
        for tri in indices.chunks_exact(3) {
            let (a, b, c) = (vertices[tri[0]], vertices[tri[1]], vertices[tri[2]]);
            area += triangle_area(a, b, c);
            centroids.push(Pos2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0));
        }
        (area, centroids)
    }

    #[test]
    fn test_concave_ring_fill_stays_inside() {
        // L shape with the top-right square missing
        let ring = vec![
            Pos2::new(0.0, 0.0),
            Pos2::new(20.0, 0.0),
            Pos2::new(20.0, 10.0),
            Pos2::new(10.0, 10.0),
            Pos2::new(10.0, 20.0),
            Pos2::new(0.0, 20.0),
            Pos2::new(0.0, 0.0),
        ];
        let (area, centroids) = filled_area(&[ring]);

        assert!((area - 300.0).abs() < 1e-3);
        assert!(centroids
            .iter()
            .all(|c| !(c.x > 10.0 && c.y > 10.0)));
    }

    #[test]
    fn test_hole_is_not_filled() {
        let square = |min: f32, max: f32| {
            vec![
                Pos2::new(min, min),
                Pos2::new(max, min),
                Pos2::new(max, max),
                Pos2::new(min, max),
            ]
        };
        let (area, centroids) = filled_area(&[square(0.0, 40.0), square(10.0, 30.0)]);

        assert!((area - 1200.0).abs() < 1e-2);
        assert!(centroids
            .iter()
            .all(|c| !(c.x > 10.0 && c.x < 30.0 && c.y > 10.0 && c.y < 30.0)));
    }

    #[test]
    fn test_degenerate_ring_yields_no_triangles() {
        let (vertices, indices) =
            triangulate_rings(&[vec![Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)]]);
        assert!(vertices.is_empty());
        assert!(indices.is_empty());
    }

    #[test]
    fn test_site_at_center_marker() {
        let projection = projection_at(35.3331, -97.2775);
        let center = projection.screen_rect.center();
        assert_eq!(site_at(&projection, center), Some("KTLX"));
        assert_eq!(site_at(&projection, center + Vec2::new(40.0, 40.0)), None);
    }

    #[test]
    fn test_center_tile_is_visible() {
        let projection = projection_at(35.3331, -97.2775);
        let tile = TileId::containing(35.3331, -97.2775, projection.tile_zoom());
        assert!(projection.visible_tiles().iter().any(|t| t.id == tile));
    }
}
