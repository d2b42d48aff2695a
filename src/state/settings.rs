//! Viewer configuration.
//!
//! All tunables live in one typed struct. The browser build applies
//! overrides from the page's query string; the native build can read a JSON
//! file named by `SKYWARN_RADAR_CONFIG`. Nothing is written back.

use super::playback::AnimationSpeed;
use super::url_state::UrlParams;
use crate::nexrad::NationalProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable naming a JSON settings file (native only).
pub const CONFIG_ENV_VAR: &str = "SKYWARN_RADAR_CONFIG";

const WARNINGS_FEED_URL: &str = "https://api.weather.gov/alerts/active?status=actual&message_type=alert&event=Tornado%20Warning,Severe%20Thunderstorm%20Warning";
const DISCUSSIONS_FEED_URL: &str = "https://www.spc.noaa.gov/products/md/mdGeoJson.json";
const BASEMAP_URL: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Initial animation speed.
    pub speed: AnimationSpeed,
    /// Initial overlay opacity, 0-100.
    pub opacity_percent: u32,
    /// Frames per animation sequence.
    pub frame_count: usize,
    /// Stacking order of radar overlays relative to the basemap.
    pub overlay_z_index: i32,
    /// Radius of the per-site image box.
    pub coverage_radius_km: f64,
    pub site_zoom: f64,
    pub national_zoom: f64,
    pub national_center: (f64, f64),
    pub national_provider: NationalProvider,
    pub alert_refresh_secs: u64,
    pub warnings_feed_url: String,
    pub discussions_feed_url: String,
    pub basemap_url: String,
    pub max_tiles_in_flight: usize,
    pub tile_cache_capacity: usize,
    /// Sent on native requests; api.weather.gov rejects anonymous clients.
    pub user_agent: String,
    /// Site to open at startup; `None` shows the national composite.
    pub initial_site: Option<String>,
    pub initial_product: Option<String>,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            speed: AnimationSpeed::Normal,
            opacity_percent: 70,
            frame_count: 12,
            overlay_z_index: 200,
            coverage_radius_km: crate::geo::COVERAGE_RADIUS_KM,
            site_zoom: 8.0,
            national_zoom: 4.0,
            national_center: (39.8283, -98.5795),
            national_provider: NationalProvider::OpenMeteo,
            alert_refresh_secs: 60,
            warnings_feed_url: WARNINGS_FEED_URL.to_string(),
            discussions_feed_url: DISCUSSIONS_FEED_URL.to_string(),
            basemap_url: BASEMAP_URL.to_string(),
            max_tiles_in_flight: 12,
            tile_cache_capacity: 600,
            user_agent: format!(
                "{}/{} (NEXRAD radar viewer)",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
            initial_site: None,
            initial_product: None,
        }
    }
}

impl ViewerSettings {
    /// Builds the settings for this run.
    pub fn load() -> Self {
        let mut settings = Self::load_base();
        settings.apply_url_params(&super::url_state::parse_from_url());
        settings
    }

    #[cfg(target_arch = "wasm32")]
    fn load_base() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_base() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parses settings JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid settings: {}", e))
    }

    /// Applies startup overrides from the query string.
    pub fn apply_url_params(&mut self, params: &UrlParams) {
        if let Some(site) = &params.site {
            self.initial_site = Some(site.to_ascii_uppercase());
        }
        if let Some(product) = &params.product {
            self.initial_product = Some(product.to_ascii_uppercase());
        }
        if let Some(provider) = params.provider {
            self.national_provider = provider;
        }
        if let Some(speed) = params.speed {
            self.speed = speed;
        }
    }

    pub fn alert_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.alert_refresh_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.speed.period(), Duration::from_millis(800));
        assert_eq!(settings.frame_count, 12);
        assert_eq!(settings.overlay_z_index, 200);
        assert_eq!(settings.opacity_percent, 70);
        assert_eq!(settings.alert_refresh_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            ViewerSettings::from_json(r#"{"frame_count": 6, "national_provider": "mesonet"}"#)
                .unwrap();
        assert_eq!(settings.frame_count, 6);
        assert_eq!(settings.national_provider, NationalProvider::Mesonet);
        assert_eq!(settings.site_zoom, 8.0);
        assert!(ViewerSettings::from_json("{not json").is_err());
    }

    #[test]
    fn test_url_overrides() {
        let mut settings = ViewerSettings::default();
        settings.apply_url_params(&UrlParams {
            site: Some("ktlx".to_string()),
            product: Some("n0u".to_string()),
            provider: Some(NationalProvider::Mesonet),
            speed: Some(AnimationSpeed::Fast),
        });
        assert_eq!(settings.initial_site.as_deref(), Some("KTLX"));
        assert_eq!(settings.initial_product.as_deref(), Some("N0U"));
        assert_eq!(settings.national_provider, NationalProvider::Mesonet);
        assert_eq!(settings.speed, AnimationSpeed::Fast);
    }
}
