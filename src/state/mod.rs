//! Application state management.
//!
//! This module contains the state structures shared between the UI panels
//! and the map controller. Panels read this state and push [`UiEvent`]s;
//! the controller applies the events once per frame.

mod layer;
mod playback;
mod settings;
mod url_state;

pub use layer::LayerState;
pub use playback::{AnimationSpeed, PlaybackState};
pub use settings::ViewerSettings;

use crate::alerts::AlertCategory;
use crate::geo::MapView;
use crate::nexrad::NationalProvider;

/// What the user has picked in the selection panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// `None` shows the national composite.
    pub site_id: Option<String>,
    pub product_id: String,
    pub tilt_index: usize,
    pub national_provider: NationalProvider,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            site_id: None,
            product_id: crate::data::default_product().id.to_string(),
            tilt_index: 0,
            national_provider: NationalProvider::default(),
        }
    }
}

/// Read-only view of the animation for the bottom panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationStatus {
    pub running: bool,
    /// Index of the frame on screen, if any
    pub displayed: Option<usize>,
    pub frame_count: usize,
    /// Label of the frame on screen
    pub label: String,
    /// Provider that built the current sequence
    pub source: String,
}

/// User actions raised by the panels and the map canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// `None` switches to the national composite.
    SelectSite(Option<String>),
    SelectProduct(String),
    SelectTilt(usize),
    /// Opacity percentage, 0-100
    SetOpacity(u32),
    ToggleAlertLayer(AlertCategory, bool),
    Refresh,
    ToggleAnimation,
    SetSpeed(AnimationSpeed),
    SetNationalProvider(NationalProvider),
}

/// Root application state containing all sub-states.
#[derive(Default)]
pub struct AppState {
    pub selection: Selection,

    /// Map center and zoom
    pub view: MapView,

    /// Layer visibility toggles
    pub layer_state: LayerState,

    /// Animation controls state
    pub playback_state: PlaybackState,

    /// Mirror of the animator for display
    pub animation: AnimationStatus,

    /// Radar status message displayed in top bar
    pub status_message: String,

    /// Alert feed status, shown next to the radar status when set
    pub alert_status: Option<String>,

    /// Events raised this frame, drained by the controller
    pub pending_events: Vec<UiEvent>,
}

impl AppState {
    pub fn new(settings: &ViewerSettings) -> Self {
        Self {
            selection: Selection {
                national_provider: settings.national_provider,
                ..Default::default()
            },
            view: MapView::new(
                settings.national_center.0,
                settings.national_center.1,
                settings.national_zoom,
            ),
            playback_state: PlaybackState {
                speed: settings.speed,
                opacity_percent: settings.opacity_percent.min(100),
            },
            status_message: "Ready".to_string(),
            ..Default::default()
        }
    }

    /// Queues an event for the controller.
    pub fn push_event(&mut self, event: UiEvent) {
        self.pending_events.push(event);
    }

    /// Takes every queued event.
    pub fn take_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_settings() {
        let settings = ViewerSettings {
            opacity_percent: 40,
            speed: AnimationSpeed::Slow,
            national_provider: NationalProvider::Mesonet,
            ..Default::default()
        };
        let state = AppState::new(&settings);
        assert_eq!(state.playback_state.opacity_percent, 40);
        assert_eq!(state.playback_state.speed, AnimationSpeed::Slow);
        assert_eq!(state.selection.national_provider, NationalProvider::Mesonet);
        assert_eq!(state.selection.product_id, "N0Q");
        assert!((state.view.zoom - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_events_drain() {
        let mut state = AppState::default();
        state.push_event(UiEvent::Refresh);
        state.push_event(UiEvent::SelectTilt(2));
        assert_eq!(
            state.take_events(),
            vec![UiEvent::Refresh, UiEvent::SelectTilt(2)]
        );
        assert!(state.take_events().is_empty());
    }
}
