//! Map controller.
//!
//! Owns the map view, the overlay set, the frame animator, the alert groups
//! and the user's selection. UI events and network results are applied here
//! and nowhere else.
//!
//! Every radar sequence gets a new generation number. Frame loads are tagged
//! with the generation that requested them, and results from an older
//! generation are dropped so a slow response can never leak into a newer
//! selection. Alert refresh cycles are numbered the same way.

use crate::alerts::{AlertFeed, AlertFeedResult, AlertLayers, RefreshTimer};
use crate::data::{
    default_product, get_product, get_site, products_for_site, RadarProduct, RadarSite,
};
use crate::geo::{MapView, TileId};
use crate::nexrad::{
    FrameAnimator, FrameKind, FrameRequest, FrameTarget, LoadState, OverlaySet, OverlaySource,
    Ridge2Source, SequenceRequest,
};
use crate::state::{AnimationStatus, AppState, UiEvent, ViewerSettings};
use web_time::Instant;

/// Work the app shell has to start after an event.
#[derive(Debug, Default, PartialEq)]
pub struct EventEffects {
    /// Frame loads for a freshly built sequence.
    pub frame_requests: Vec<FrameRequest>,
    /// Generation of a newly started alert cycle, if one began.
    pub alert_cycle: Option<u64>,
}

impl EventEffects {
    fn merge(&mut self, other: EventEffects) {
        self.frame_requests.extend(other.frame_requests);
        if other.alert_cycle.is_some() {
            self.alert_cycle = other.alert_cycle;
        }
    }
}

/// Outcome of applying a frame load result.
#[derive(Debug, PartialEq)]
pub enum FrameUpdate {
    /// The result belonged to a superseded sequence and was ignored.
    Stale,
    /// The result was applied. A fallback sequence may need loading.
    Applied { requests: Vec<FrameRequest> },
}

pub struct MapController {
    state: AppState,
    settings: ViewerSettings,
    overlays: OverlaySet,
    animator: FrameAnimator,
    alerts: AlertLayers,

    /// Generation of the current overlay sequence.
    generation: u64,
    /// Frames in the sequence as built, before any failures.
    sequence_len: usize,
    failed_frames: usize,
    source_name: &'static str,
    /// Explains why the map is not showing what was selected.
    fallback_note: Option<String>,

    alert_generation: u64,
    alert_timer: RefreshTimer,
    failed_feeds: Vec<AlertFeed>,
}

impl MapController {
    pub fn new(settings: ViewerSettings) -> Self {
        let state = AppState::new(&settings);
        let animator = FrameAnimator::new(
            state.playback_state.speed.period(),
            state.playback_state.opacity(),
        );
        let alert_timer = RefreshTimer::new(settings.alert_refresh_interval());
        Self {
            state,
            settings,
            overlays: OverlaySet::new(),
            animator,
            alerts: AlertLayers::new(),
            generation: 0,
            sequence_len: 0,
            failed_frames: 0,
            source_name: "",
            fallback_note: None,
            alert_generation: 0,
            alert_timer,
            failed_feeds: Vec::new(),
        }
    }

    /// Loads the initial radar view and starts the first alert cycle.
    pub fn start(&mut self, now: Instant) -> EventEffects {
        let initial_product = self.settings.initial_product.as_deref();
        if let Some(product) = initial_product.and_then(get_product) {
            self.state.selection.product_id = product.id.to_string();
        }

        let initial_site = self.settings.initial_site.clone();
        let frame_requests = match initial_site.as_deref().and_then(get_site) {
            Some(site) => self.load_site(site, true, now),
            None => {
                if let Some(id) = &initial_site {
                    log::warn!("Unknown startup site {}, showing national composite", id);
                }
                self.load_national(now)
            }
        };

        self.sync_status();
        EventEffects {
            frame_requests,
            alert_cycle: Some(self.begin_alert_cycle(now)),
        }
    }

    /// Applies a UI event.
    pub fn handle_event(&mut self, event: UiEvent, now: Instant) -> EventEffects {
        log::debug!("UI event: {:?}", event);
        let mut effects = EventEffects::default();

        match event {
            UiEvent::SelectSite(site_id) => {
                effects.frame_requests = self.select_site(site_id.as_deref(), false, now);
            }
            UiEvent::SelectProduct(product_id) => {
                let Some(product) = get_product(&product_id) else {
                    log::warn!("Unknown product {}", product_id);
                    return effects;
                };
                self.state.selection.product_id = product.id.to_string();
                self.state.selection.tilt_index = 0;
                effects.frame_requests = self.reload(now);
            }
            UiEvent::SelectTilt(tilt_index) => {
                let max = self.current_product().tilt_count().saturating_sub(1);
                self.state.selection.tilt_index = tilt_index.min(max);
                effects.frame_requests = self.reload(now);
            }
            UiEvent::SetOpacity(percent) => {
                self.state.playback_state.opacity_percent = percent.min(100);
                let opacity = self.state.playback_state.opacity();
                self.animator
                    .set_display_opacity(opacity, self.overlays.frames_mut());
            }
            UiEvent::ToggleAlertLayer(category, visible) => {
                self.state.layer_state.set_alert_visible(category, visible);
            }
            UiEvent::Refresh => {
                effects.alert_cycle = Some(self.begin_alert_cycle(now));
                effects.merge(EventEffects {
                    frame_requests: self.reload(now),
                    alert_cycle: None,
                });
            }
            UiEvent::ToggleAnimation => {
                if self.animator.is_running() {
                    self.animator.stop(self.overlays.frames_mut());
                } else {
                    self.animator.start(self.overlays.frames_mut(), now);
                }
            }
            UiEvent::SetSpeed(speed) => {
                self.state.playback_state.speed = speed;
                self.animator
                    .set_period(speed.period(), self.overlays.frames_mut(), now);
            }
            UiEvent::SetNationalProvider(provider) => {
                if self.state.selection.national_provider != provider {
                    self.state.selection.national_provider = provider;
                    if self.state.selection.site_id.is_none() {
                        effects.frame_requests = self.load_national(now);
                    }
                }
            }
        }

        self.sync_status();
        effects
    }

    /// Selects a site, or the national composite when `site_id` is `None`.
    ///
    /// Selecting the site that is already shown does nothing unless `force`
    /// is set.
    pub fn select_site(
        &mut self,
        site_id: Option<&str>,
        force: bool,
        now: Instant,
    ) -> Vec<FrameRequest> {
        let requests = match site_id {
            Some(id) => match get_site(id) {
                Some(site) => self.load_site(site, force, now),
                None => {
                    log::warn!("Unknown site {}", id);
                    return Vec::new();
                }
            },
            None => {
                if !force && self.state.selection.site_id.is_none() && !self.overlays.is_empty() {
                    return Vec::new();
                }
                self.load_national(now)
            }
        };
        self.sync_status();
        requests
    }

    fn load_site(
        &mut self,
        site: &'static RadarSite,
        force: bool,
        now: Instant,
    ) -> Vec<FrameRequest> {
        if !force && self.state.selection.site_id.as_deref() == Some(site.id) {
            return Vec::new();
        }
        log::info!("Selecting site {}", site.id);

        self.fallback_note = None;
        self.state.selection.site_id = Some(site.id.to_string());

        if !site.supports(&self.state.selection.product_id) {
            let product = products_for_site(Some(site))
                .first()
                .copied()
                .unwrap_or_else(default_product);
            log::info!(
                "{} does not publish {}, switching to {}",
                site.id,
                self.state.selection.product_id,
                product.id
            );
            self.state.selection.product_id = product.id.to_string();
            self.state.selection.tilt_index = 0;
        }

        let product = self.current_product();
        let max_tilt = product.tilt_count().saturating_sub(1);
        self.state.selection.tilt_index = self.state.selection.tilt_index.min(max_tilt);

        self.state.view = MapView::new(site.lat, site.lon, self.settings.site_zoom);
        self.begin_sequence(&Ridge2Source, Some(site), product, now)
    }

    fn load_national(&mut self, now: Instant) -> Vec<FrameRequest> {
        let provider = self.state.selection.national_provider;
        log::info!("Showing national composite from {}", provider);

        self.state.selection.site_id = None;
        let (lat, lon) = self.settings.national_center;
        self.state.view = MapView::new(lat, lon, self.settings.national_zoom);

        let source = provider.source();
        let product = self.current_product();
        self.begin_sequence(source.as_ref(), None, product, now)
    }

    /// Reloads whatever is selected, bypassing the same-site check.
    fn reload(&mut self, now: Instant) -> Vec<FrameRequest> {
        self.fallback_note = None;
        let site_id = self.state.selection.site_id.clone();
        self.select_site(site_id.as_deref(), true, now)
    }

    /// Tears down the current sequence and builds a new one.
    fn begin_sequence(
        &mut self,
        source: &dyn OverlaySource,
        site: Option<&RadarSite>,
        product: &RadarProduct,
        now: Instant,
    ) -> Vec<FrameRequest> {
        self.animator.stop(self.overlays.frames_mut());
        self.animator.reset();
        self.overlays.clear();
        self.generation += 1;

        let frames = source.build_frames(&SequenceRequest {
            site,
            product,
            tilt_index: self.state.selection.tilt_index,
            frame_count: self.settings.frame_count,
            radius_km: self.settings.coverage_radius_km,
            z_index: self.settings.overlay_z_index,
        });
        log::info!(
            "Built {} frames from {} (generation {})",
            frames.len(),
            source.name(),
            self.generation
        );

        self.sequence_len = frames.len();
        self.failed_frames = 0;
        self.source_name = source.name();
        self.overlays.replace(self.generation, frames);
        self.animator.start(self.overlays.frames_mut(), now);

        self.frame_requests()
    }

    /// Load requests for every frame in the current sequence.
    fn frame_requests(&self) -> Vec<FrameRequest> {
        let view = self.state.view;
        let center = TileId::containing(
            view.center_lat,
            view.center_lon,
            view.zoom.round().max(0.0) as u8,
        );
        self.overlays
            .frames()
            .iter()
            .map(|frame| FrameRequest {
                generation: self.generation,
                frame_id: frame.id,
                url: frame.load_url(center),
                target: match frame.kind {
                    FrameKind::Image { .. } => FrameTarget::Image,
                    FrameKind::Tile { .. } => FrameTarget::CenterTile,
                },
            })
            .collect()
    }

    /// Applies the outcome of a frame load.
    ///
    /// A failed frame is dropped from the sequence. When every frame of a
    /// site sequence fails the national composite is loaded instead; when the
    /// national composite fails too the map is left without radar.
    pub fn handle_frame_result(
        &mut self,
        generation: u64,
        frame_id: usize,
        loaded: bool,
        now: Instant,
    ) -> FrameUpdate {
        if generation != self.generation {
            log::debug!(
                "Dropping frame {} from stale generation {} (current {})",
                frame_id,
                generation,
                self.generation
            );
            return FrameUpdate::Stale;
        }

        if loaded {
            if let Some(frame) = self.overlays.get_mut(frame_id) {
                frame.load_state = LoadState::Loaded;
            }
            self.sync_status();
            return FrameUpdate::Applied {
                requests: Vec::new(),
            };
        }

        if let Some(index) = self.overlays.remove(frame_id) {
            log::warn!("Frame {} unavailable, removing it", frame_id);
            self.failed_frames += 1;
            self.animator
                .frame_removed(index, self.overlays.frames_mut(), now);
        }

        let mut requests = Vec::new();
        if self.overlays.is_empty() {
            match self.state.selection.site_id.clone() {
                Some(site_id) => {
                    log::warn!(
                        "No frames available for {}, falling back to national composite",
                        site_id
                    );
                    requests = self.load_national(now);
                    self.fallback_note = Some(format!("{} unavailable", site_id));
                }
                None => {
                    log::warn!("National composite unavailable");
                    self.fallback_note = None;
                }
            }
        }

        self.sync_status();
        FrameUpdate::Applied { requests }
    }

    /// Clears the alert groups and starts a new refresh cycle. Returns the
    /// cycle's generation.
    pub fn begin_alert_cycle(&mut self, now: Instant) -> u64 {
        self.alert_generation += 1;
        self.alerts.clear_all();
        self.failed_feeds.clear();
        self.alert_timer.reset(now);
        self.alert_generation
    }

    /// Applies one feed's result. Returns false if it was stale.
    pub fn handle_alert_result(&mut self, result: AlertFeedResult) -> bool {
        if result.generation != self.alert_generation {
            log::debug!(
                "Dropping {} from stale alert cycle {}",
                result.feed.label(),
                result.generation
            );
            return false;
        }

        match result.features {
            Ok(features) => {
                log::info!("{}: {} polygons", result.feed.label(), features.len());
                self.alerts.extend(features);
            }
            Err(e) => {
                log::warn!("{} unavailable: {}", result.feed.label(), e);
                if !self.failed_feeds.contains(&result.feed) {
                    self.failed_feeds.push(result.feed);
                }
            }
        }

        self.state.alert_status = if self.failed_feeds.is_empty() {
            None
        } else {
            let names: Vec<&str> = self.failed_feeds.iter().map(|f| f.label()).collect();
            Some(format!("Alerts: {} unavailable", names.join(", ")))
        };
        true
    }

    /// Drives the animation. Returns true if an alert cycle is due.
    pub fn update(&mut self, now: Instant) -> bool {
        if self.animator.update(self.overlays.frames_mut(), now) {
            self.sync_animation();
        }
        self.alert_timer.is_due(now)
    }

    /// Time until the controller next needs an update.
    pub fn time_until_next_update(&self, now: Instant) -> std::time::Duration {
        let alerts = self.alert_timer.time_until_due(now);
        match self.animator.time_until_next_tick(now) {
            Some(tick) => tick.min(alerts),
            None => alerts,
        }
    }

    fn current_product(&self) -> &'static RadarProduct {
        get_product(&self.state.selection.product_id).unwrap_or_else(default_product)
    }

    fn sequence_label(&self) -> String {
        match &self.state.selection.site_id {
            Some(id) => format!("{} {}", id, self.state.selection.product_id),
            None => format!("National ({})", self.state.selection.national_provider),
        }
    }

    fn sync_status(&mut self) {
        let label = self.sequence_label();
        let loaded = self.overlays.loaded_count();
        let remaining = self.overlays.len();

        let base = if remaining == 0 {
            "No radar imagery available".to_string()
        } else if self.failed_frames > 0 {
            format!(
                "{}: {} of {} frames unavailable",
                label, self.failed_frames, self.sequence_len
            )
        } else if loaded < remaining {
            format!("{}: loading {}/{} frames", label, loaded, remaining)
        } else {
            format!("{}: {} frames", label, remaining)
        };

        self.state.status_message = match &self.fallback_note {
            Some(note) => format!("{}, showing national composite. {}", note, base),
            None => base,
        };
        self.sync_animation();
    }

    fn sync_animation(&mut self) {
        let displayed = self.animator.displayed();
        self.state.animation = AnimationStatus {
            running: self.animator.is_running(),
            displayed,
            frame_count: self.overlays.len(),
            label: displayed
                .and_then(|i| self.overlays.frames().get(i))
                .map(|f| f.label.clone())
                .unwrap_or_default(),
            source: self.source_name.to_string(),
        };
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    #[cfg(test)]
    pub fn overlays(&self) -> &OverlaySet {
        &self.overlays
    }

    #[cfg(test)]
    pub fn animator(&self) -> &FrameAnimator {
        &self.animator
    }

    #[cfg(test)]
    pub fn alerts(&self) -> &AlertLayers {
        &self.alerts
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    pub fn alert_generation(&self) -> u64 {
        self.alert_generation
    }

    /// Split borrow for rendering: panels mutate the state while reading the
    /// overlays and alerts.
    pub fn render_parts(&mut self) -> (&mut AppState, &OverlaySet, &AlertLayers) {
        (&mut self.state, &self.overlays, &self.alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertCategory, FeedError};
    use crate::nexrad::{FetchError, NationalProvider};
    use crate::state::AnimationSpeed;

    fn controller() -> (MapController, Instant) {
        let mut controller = MapController::new(ViewerSettings::default());
        let now = Instant::now();
        controller.start(now);
        (controller, now)
    }

    fn fail_all(
        controller: &mut MapController,
        requests: &[FrameRequest],
        now: Instant,
    ) -> Vec<FrameRequest> {
        let mut follow_up = Vec::new();
        for request in requests {
            if let FrameUpdate::Applied { requests } =
                controller.handle_frame_result(request.generation, request.frame_id, false, now)
            {
                follow_up.extend(requests);
            }
        }
        follow_up
    }

    #[test]
    fn test_starts_on_national_composite() {
        let (controller, _) = controller();
        assert!(controller.state().selection.site_id.is_none());
        assert_eq!(controller.overlays().len(), 12);
        assert!(controller.animator().is_running());
        let view = controller.state().view;
        assert!((view.center_lat - 39.8283).abs() < 1e-9);
        assert!((view.center_lon - -98.5795).abs() < 1e-9);
        assert!((view.zoom - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_select_ktlx_n0q() {
        let (mut controller, now) = controller();
        let previous_timer = controller.animator().timer_id();

        let effects = controller.handle_event(UiEvent::SelectSite(Some("KTLX".to_string())), now);

        // The national animation was cancelled and replaced by exactly one timer
        assert_ne!(controller.animator().timer_id(), previous_timer);
        assert_eq!(controller.animator().active_timers(), 1);

        let mut urls: Vec<String> = effects
            .frame_requests
            .iter()
            .map(|r| r.url.clone())
            .collect();
        urls.sort();
        let mut expected: Vec<String> = (0..12)
            .map(|i| {
                format!(
                    "https://radar.weather.gov/ridge/RadarImg/N0Q/KTLX_N0Q_{}.png",
                    i
                )
            })
            .collect();
        expected.sort();
        assert_eq!(urls, expected);
        assert!(effects
            .frame_requests
            .iter()
            .all(|r| r.generation == controller.generation() && r.target == FrameTarget::Image));

        let view = controller.state().view;
        assert!((view.center_lat - 35.3331).abs() < 1e-9);
        assert!((view.center_lon - -97.2775).abs() < 1e-9);
        assert!((view.zoom - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_site_is_noop_unless_forced() {
        let (mut controller, now) = controller();
        controller.handle_event(UiEvent::SelectSite(Some("KTLX".to_string())), now);
        let generation = controller.generation();

        let effects = controller.handle_event(UiEvent::SelectSite(Some("KTLX".to_string())), now);
        assert!(effects.frame_requests.is_empty());
        assert_eq!(controller.generation(), generation);

        let forced = controller.select_site(Some("KTLX"), true, now);
        assert_eq!(forced.len(), 12);
        assert_eq!(controller.generation(), generation + 1);
    }

    #[test]
    fn test_product_change_resets_tilt_and_reloads() {
        let (mut controller, now) = controller();
        controller.handle_event(UiEvent::SelectSite(Some("KTLX".to_string())), now);
        let effects = controller.handle_event(UiEvent::SelectTilt(2), now);
        assert!(effects.frame_requests[0].url.contains("KTLX_N2Q_"));
        assert_eq!(controller.state().selection.tilt_index, 2);

        // Tilts above the highest published one are clamped
        controller.handle_event(UiEvent::SelectTilt(9), now);
        assert_eq!(controller.state().selection.tilt_index, 3);

        let effects = controller.handle_event(UiEvent::SelectProduct("N0U".to_string()), now);
        assert_eq!(controller.state().selection.tilt_index, 0);
        assert_eq!(effects.frame_requests.len(), 12);
        assert!(effects.frame_requests[0].url.contains("/N0U/KTLX_N0U_"));
    }

    #[test]
    fn test_unsupported_product_switches_on_site_change() {
        let (mut controller, now) = controller();
        controller.handle_event(UiEvent::SelectProduct("NET".to_string()), now);
        controller.handle_event(UiEvent::SelectSite(Some("PAHG".to_string())), now);
        assert_eq!(controller.state().selection.product_id, "N0Q");
    }

    #[test]
    fn test_stale_frame_results_are_ignored() {
        let (mut controller, now) = controller();
        let old_generation = controller.generation();
        controller.handle_event(UiEvent::SelectSite(Some("KTLX".to_string())), now);

        assert_eq!(
            controller.handle_frame_result(old_generation, 0, false, now),
            FrameUpdate::Stale
        );
        assert_eq!(controller.overlays().len(), 12);
    }

    #[test]
    fn test_failed_frames_are_removed() {
        let (mut controller, now) = controller();
        let effects = controller.handle_event(UiEvent::SelectSite(Some("KTLX".to_string())), now);
        let generation = controller.generation();

        controller.handle_frame_result(generation, effects.frame_requests[0].frame_id, true, now);
        for request in &effects.frame_requests[1..4] {
            controller.handle_frame_result(generation, request.frame_id, false, now);
        }

        assert_eq!(controller.overlays().len(), 9);
        assert_eq!(controller.overlays().loaded_count(), 1);
        assert_eq!(
            controller.state().status_message,
            "KTLX N0Q: 3 of 12 frames unavailable"
        );
        assert!(controller.animator().index() < controller.overlays().len());
    }

    #[test]
    fn test_all_failed_falls_back_to_national() {
        let (mut controller, now) = controller();
        let effects = controller.handle_event(UiEvent::SelectSite(Some("KTLX".to_string())), now);

        let follow_up = fail_all(&mut controller, &effects.frame_requests, now);

        assert!(controller.state().selection.site_id.is_none());
        assert_eq!(follow_up.len(), 12);
        let generation = controller.generation();
        assert!(follow_up
            .iter()
            .all(|r| r.target == FrameTarget::CenterTile && r.generation == generation));
        assert!(controller
            .state()
            .status_message
            .starts_with("KTLX unavailable, showing national composite."));
        assert!((controller.state().view.zoom - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_national_failure_leaves_map_empty() {
        let (mut controller, now) = controller();
        let requests = controller.select_site(None, true, now);

        let follow_up = fail_all(&mut controller, &requests, now);

        assert!(follow_up.is_empty());
        assert!(controller.overlays().is_empty());
        assert_eq!(controller.animator().active_timers(), 0);
        assert_eq!(
            controller.state().status_message,
            "No radar imagery available"
        );
    }

    #[test]
    fn test_opacity_propagates_live() {
        let (mut controller, now) = controller();
        let timer = controller.animator().timer_id();
        controller.handle_event(UiEvent::SetOpacity(30), now);

        let visible: Vec<f32> = controller.overlays().visible().map(|f| f.opacity).collect();
        assert_eq!(visible.len(), 1);
        assert!((visible[0] - 0.3).abs() < 1e-6);
        assert_eq!(controller.animator().timer_id(), timer);
    }

    #[test]
    fn test_toggle_animation() {
        let (mut controller, now) = controller();
        controller.handle_event(UiEvent::ToggleAnimation, now);
        assert!(!controller.animator().is_running());
        assert_eq!(controller.overlays().visible().count(), 0);
        assert!(!controller.state().animation.running);

        controller.handle_event(UiEvent::ToggleAnimation, now);
        assert!(controller.animator().is_running());
        assert_eq!(controller.overlays().visible().count(), 1);
    }

    #[test]
    fn test_speed_change_keeps_pause() {
        let (mut controller, now) = controller();
        controller.handle_event(UiEvent::ToggleAnimation, now);
        controller.handle_event(UiEvent::SetSpeed(AnimationSpeed::Fast), now);
        assert!(!controller.animator().is_running());
        assert_eq!(
            controller.animator().period(),
            AnimationSpeed::Fast.period()
        );
    }

    #[test]
    fn test_provider_change_reloads_national() {
        let (mut controller, now) = controller();
        let effects = controller.handle_event(
            UiEvent::SetNationalProvider(NationalProvider::Mesonet),
            now,
        );
        assert_eq!(effects.frame_requests.len(), 12);
        assert!(effects.frame_requests[0].url.contains("mesonet.agron.iastate.edu"));
    }

    #[test]
    fn test_alert_cycles() {
        let (mut controller, now) = controller();
        let first = controller.alert_generation();
        let second = controller
            .handle_event(UiEvent::Refresh, now)
            .alert_cycle
            .unwrap();
        assert_eq!(second, first + 1);

        let body = r#"{"type":"FeatureCollection","features":[{"type":"Feature",
            "geometry":{"type":"Polygon","coordinates":[[[-97.5,35.0],[-97.1,35.0],[-97.1,35.3],[-97.5,35.3]]]},
            "properties":{"event":"Tornado Warning"}}]}"#;

        // Late result from the first cycle is dropped
        assert!(!controller.handle_alert_result(AlertFeedResult {
            generation: first,
            feed: AlertFeed::Warnings,
            features: AlertFeed::Warnings.parse(body),
        }));
        assert!(controller.alerts().is_empty());

        assert!(controller.handle_alert_result(AlertFeedResult {
            generation: second,
            feed: AlertFeed::Warnings,
            features: AlertFeed::Warnings.parse(body),
        }));
        assert!(controller.handle_alert_result(AlertFeedResult {
            generation: second,
            feed: AlertFeed::Discussions,
            features: Err(FeedError::Fetch(FetchError::Status(503))),
        }));

        let alerts = controller.alerts();
        assert_eq!(alerts.count(AlertCategory::Tornado), 1);
        assert_eq!(alerts.count(AlertCategory::MesoscaleDiscussion), 0);
        assert_eq!(
            controller.state().alert_status.as_deref(),
            Some("Alerts: SPC discussions unavailable")
        );

        controller.begin_alert_cycle(now);
        assert!(controller.alerts().is_empty());
    }

    #[test]
    fn test_empty_feeds_leave_groups_empty() {
        let (mut controller, _) = controller();
        let generation = controller.alert_generation();
        let empty = r#"{"type":"FeatureCollection","features":[]}"#;
        for feed in [AlertFeed::Warnings, AlertFeed::Discussions] {
            controller.handle_alert_result(AlertFeedResult {
                generation,
                feed,
                features: feed.parse(empty),
            });
        }
        assert!(controller.alerts().is_empty());
        assert!(controller.state().alert_status.is_none());
    }

    #[test]
    fn test_alert_timer_due_after_interval() {
        let (mut controller, now) = controller();
        assert!(!controller.update(now));
        assert!(controller.update(now + std::time::Duration::from_secs(60)));
    }

    #[test]
    fn test_checkbox_does_not_touch_data() {
        let (mut controller, now) = controller();
        let generation = controller.alert_generation();
        controller.handle_alert_result(AlertFeedResult {
            generation,
            feed: AlertFeed::Discussions,
            features: Ok(Vec::new()),
        });
        controller.handle_event(
            UiEvent::ToggleAlertLayer(AlertCategory::Tornado, false),
            now,
        );
        assert!(!controller.state().layer_state.tornado_warnings);
        assert_eq!(controller.alert_generation(), generation);
    }
}
