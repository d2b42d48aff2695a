#![warn(clippy::all)]

//! SKYWARN Radar - a live NEXRAD radar and severe weather alert viewer.
//!
//! Shows looping radar imagery for a single WSR-88D site or a national
//! composite on a slippy map, with NWS tornado and severe thunderstorm
//! warnings and SPC mesoscale discussions drawn on top.

mod alerts;
mod controller;
mod data;
mod geo;
mod nexrad;
mod state;
mod ui;

use alerts::AlertChannel;
use controller::{EventEffects, FrameUpdate, MapController};
use eframe::egui;
use nexrad::{FrameChannel, FrameRequest, FrameResult, FrameTarget, FrameTextures, TileCache};
use state::ViewerSettings;
use web_time::Instant;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SKYWARN Radar",
        native_options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(ViewerApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct ViewerApp {
    /// Selection, overlays, animation and alerts
    controller: MapController,

    /// Channel for async overlay frame loads
    frame_channel: FrameChannel,

    /// Textures for image frames of the current sequence
    frame_textures: FrameTextures,

    /// Basemap and radar tile textures
    tiles: TileCache,

    /// Channel for async alert feed fetches
    alert_channel: AlertChannel,

    basemap_url: String,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let settings = ViewerSettings::load();
        log::info!(
            "Starting with site {:?}, product {:?}, provider {}",
            settings.initial_site,
            settings.initial_product,
            settings.national_provider
        );

        let frame_channel = FrameChannel::new(settings.user_agent.clone());
        let tiles = TileCache::new(
            settings.max_tiles_in_flight,
            settings.tile_cache_capacity,
            settings.user_agent.clone(),
        );
        let alert_channel = AlertChannel::new(
            settings.warnings_feed_url.clone(),
            settings.discussions_feed_url.clone(),
            settings.user_agent.clone(),
        );
        let basemap_url = settings.basemap_url.clone();

        let mut app = Self {
            controller: MapController::new(settings),
            frame_channel,
            frame_textures: FrameTextures::new(),
            tiles,
            alert_channel,
            basemap_url,
        };

        let effects = app.controller.start(Instant::now());
        app.dispatch(&cc.egui_ctx, effects);
        app
    }

    /// Starts the network work an event or startup asked for.
    fn dispatch(&mut self, ctx: &egui::Context, effects: EventEffects) {
        self.request_frames(ctx, effects.frame_requests);
        if let Some(generation) = effects.alert_cycle {
            self.alert_channel.fetch_cycle(ctx, generation);
        }
    }

    fn request_frames(&mut self, ctx: &egui::Context, requests: Vec<FrameRequest>) {
        self.frame_textures
            .sync_generation(self.controller.generation());
        for request in requests {
            self.frame_channel.request(ctx, request);
        }
    }

    /// Applies finished frame loads.
    fn poll_frames(&mut self, ctx: &egui::Context, now: Instant) {
        while let Some(result) = self.frame_channel.try_recv() {
            let FrameResult {
                generation,
                frame_id,
                url,
                target,
                image,
            } = result;
            let current = generation == self.controller.generation();

            let loaded = match image {
                Ok(image) => {
                    if current {
                        match target {
                            FrameTarget::Image => {
                                let texture = ctx.load_texture(
                                    format!("frame_{}_{}", generation, frame_id),
                                    image,
                                    egui::TextureOptions::LINEAR,
                                );
                                self.frame_textures.insert(generation, frame_id, texture);
                            }
                            FrameTarget::CenterTile => {
                                self.tiles.insert_ready(ctx, &url, image);
                            }
                        }
                    }
                    true
                }
                Err(e) => {
                    if current {
                        log::warn!("Frame {} failed ({}): {}", frame_id, url, e);
                    }
                    false
                }
            };

            match self
                .controller
                .handle_frame_result(generation, frame_id, loaded, now)
            {
                FrameUpdate::Stale => {}
                FrameUpdate::Applied { requests } => {
                    if !loaded {
                        self.frame_textures.remove(frame_id);
                    }
                    if !requests.is_empty() {
                        self.request_frames(ctx, requests);
                    }
                }
            }
        }
    }

    fn poll_alerts(&mut self) {
        while let Some(result) = self.alert_channel.try_recv() {
            self.controller.handle_alert_result(result);
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.tiles.begin_frame();
        self.poll_frames(ctx, now);
        self.poll_alerts();

        if self.controller.update(now) {
            let generation = self.controller.begin_alert_cycle(now);
            self.alert_channel.fetch_cycle(ctx, generation);
        }

        let (state, overlays, alerts) = self.controller.render_parts();
        ui::render_top_bar(ctx, state, alerts);
        ui::render_bottom_panel(ctx, state);
        ui::render_left_panel(ctx, state);
        ui::render_right_panel(ctx, state, alerts);
        ui::render_canvas(
            ctx,
            state,
            ui::CanvasLayers {
                overlays,
                alerts,
                frame_textures: &self.frame_textures,
                basemap_url: &self.basemap_url,
            },
            &mut self.tiles,
        );

        let events = self.controller.state_mut().take_events();
        for event in events {
            let effects = self.controller.handle_event(event, now);
            self.dispatch(ctx, effects);
        }

        self.tiles.pump(ctx);
        self.tiles.poll(ctx);

        ctx.request_repaint_after(self.controller.time_until_next_update(Instant::now()));
    }
}
