//! Radar imagery providers.
//!
//! Each provider knows how to turn a selection into an ordered sequence of
//! overlay frames. Frames are ordered oldest first so that playback moves
//! forward in time.

use super::overlay::OverlayFrame;
use crate::data::{RadarProduct, RadarSite};
use crate::geo::calculate_bounds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on frames for the Mesonet archive (five-minute steps, one hour).
const MESONET_MAX_FRAMES: usize = 12;

/// Minutes between Mesonet archive frames.
const MESONET_STEP_MINUTES: usize = 5;

/// Everything a provider needs to build a sequence.
#[derive(Debug, Clone, Copy)]
pub struct SequenceRequest<'a> {
    /// `None` for the national composite.
    pub site: Option<&'a RadarSite>,
    pub product: &'a RadarProduct,
    pub tilt_index: usize,
    pub frame_count: usize,
    pub radius_km: f64,
    pub z_index: i32,
}

/// A source of radar overlay frames.
pub trait OverlaySource {
    /// Human-readable provider name for status lines and logs.
    fn name(&self) -> &'static str;

    /// Builds the frame sequence for a request. Returns an empty sequence
    /// when the provider cannot serve the request.
    fn build_frames(&self, request: &SequenceRequest<'_>) -> Vec<OverlayFrame>;
}

/// Per-site Level III images from the NWS RIDGE2 service.
///
/// Image `0` is the latest scan, `1` the one before it, and so on.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ridge2Source;

impl Ridge2Source {
    const BASE_URL: &'static str = "https://radar.weather.gov/ridge/RadarImg";

    pub fn image_url(site_id: &str, product_code: &str, image_index: usize) -> String {
        format!(
            "{}/{}/{}_{}_{}.png",
            Self::BASE_URL,
            product_code,
            site_id,
            product_code,
            image_index
        )
    }
}

impl OverlaySource for Ridge2Source {
    fn name(&self) -> &'static str {
        "NWS RIDGE2"
    }

    fn build_frames(&self, request: &SequenceRequest<'_>) -> Vec<OverlayFrame> {
        let Some(site) = request.site else {
            return Vec::new();
        };
        let code = request.product.code_for_tilt(request.tilt_index);
        let bounds = calculate_bounds(site.lat, site.lon, request.radius_km);
        let n = request.frame_count;

        (0..n)
            .map(|id| {
                let age = n - 1 - id;
                let label = if age == 0 {
                    "Latest".to_string()
                } else {
                    format!("Scan -{}", age)
                };
                OverlayFrame::image(
                    id,
                    Self::image_url(site.id, &code, age),
                    bounds,
                    request.z_index,
                )
                .with_label(label)
            })
            .collect()
    }
}

/// National composite tiles from Open-Meteo.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenMeteoSource;

impl OpenMeteoSource {
    pub fn url_template(frame: usize) -> String {
        format!(
            "https://tile.open-meteo.com/radar/usa/{{z}}/{{x}}/{{y}}.png?frame={}",
            frame
        )
    }
}

impl OverlaySource for OpenMeteoSource {
    fn name(&self) -> &'static str {
        "Open-Meteo"
    }

    fn build_frames(&self, request: &SequenceRequest<'_>) -> Vec<OverlayFrame> {
        (0..request.frame_count)
            .map(|i| {
                OverlayFrame::tile(i, Self::url_template(i), request.z_index)
                    .with_label(format!("Frame {}", i + 1))
            })
            .collect()
    }
}

/// National base reflectivity mosaic from the Iowa Environmental Mesonet
/// tile cache, which keeps the last hour in five-minute steps.
#[derive(Debug, Default, Clone, Copy)]
pub struct MesonetSource;

impl MesonetSource {
    pub fn url_template(minutes_ago: usize) -> String {
        let layer = if minutes_ago == 0 {
            "nexrad-n0q-900913".to_string()
        } else {
            format!("nexrad-n0q-900913-m{:02}m", minutes_ago)
        };
        format!(
            "https://mesonet.agron.iastate.edu/cache/tile.py/1.0.0/{}/{{z}}/{{x}}/{{y}}.png",
            layer
        )
    }
}

impl OverlaySource for MesonetSource {
    fn name(&self) -> &'static str {
        "Iowa Mesonet"
    }

    fn build_frames(&self, request: &SequenceRequest<'_>) -> Vec<OverlayFrame> {
        let n = request.frame_count.min(MESONET_MAX_FRAMES);
        (0..n)
            .map(|id| {
                let minutes_ago = (n - 1 - id) * MESONET_STEP_MINUTES;
                let label = if minutes_ago == 0 {
                    "Now".to_string()
                } else {
                    format!("-{} min", minutes_ago)
                };
                OverlayFrame::tile(id, Self::url_template(minutes_ago), request.z_index)
                    .with_label(label)
            })
            .collect()
    }
}

/// Which provider backs the national composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NationalProvider {
    #[default]
    OpenMeteo,
    Mesonet,
}

impl NationalProvider {
    pub fn all() -> &'static [NationalProvider] {
        &[NationalProvider::OpenMeteo, NationalProvider::Mesonet]
    }

    pub fn label(&self) -> &'static str {
        match self {
            NationalProvider::OpenMeteo => "Open-Meteo",
            NationalProvider::Mesonet => "Iowa Mesonet",
        }
    }

    pub fn source(&self) -> Box<dyn OverlaySource> {
        match self {
            NationalProvider::OpenMeteo => Box::new(OpenMeteoSource),
            NationalProvider::Mesonet => Box::new(MesonetSource),
        }
    }

    /// Parses the short names used in URL query strings.
    pub fn from_query(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "open-meteo" | "openmeteo" => Some(NationalProvider::OpenMeteo),
            "mesonet" | "iem" => Some(NationalProvider::Mesonet),
            _ => None,
        }
    }
}

impl fmt::Display for NationalProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{get_product, get_site};
    use crate::nexrad::overlay::FrameKind;

    fn request<'a>(site: Option<&'a RadarSite>, product: &'a RadarProduct) -> SequenceRequest<'a> {
        SequenceRequest {
            site,
            product,
            tilt_index: 0,
            frame_count: 12,
            radius_km: 230.0,
            z_index: 200,
        }
    }

    #[test]
    fn test_ridge2_requests_every_image() {
        let site = get_site("KTLX").unwrap();
        let product = get_product("N0Q").unwrap();
        let frames = Ridge2Source.build_frames(&request(Some(site), product));

        assert_eq!(frames.len(), 12);
        let mut urls: Vec<String> = frames
            .iter()
            .map(|f| match &f.kind {
                FrameKind::Image { url, .. } => url.clone(),
                FrameKind::Tile { .. } => panic!("expected image frame"),
            })
            .collect();
        // Oldest first
        assert!(urls[0].ends_with("KTLX_N0Q_11.png"));
        assert!(urls[11].ends_with("KTLX_N0Q_0.png"));

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
        assert!(frames.iter().all(|f| f.z_index == 200 && f.opacity == 0.0));
    }

    #[test]
    fn test_ridge2_uses_tilt_code() {
        let site = get_site("KTLX").unwrap();
        let product = get_product("N0Q").unwrap();
        let mut req = request(Some(site), product);
        req.tilt_index = 2;
        req.frame_count = 1;
        let frames = Ridge2Source.build_frames(&req);
        assert_eq!(
            frames[0].kind,
            FrameKind::Image {
                url: "https://radar.weather.gov/ridge/RadarImg/N2Q/KTLX_N2Q_0.png".to_string(),
                bounds: calculate_bounds(site.lat, site.lon, 230.0),
            }
        );
    }

    #[test]
    fn test_ridge2_without_site_is_empty() {
        let product = get_product("N0Q").unwrap();
        let frames = Ridge2Source.build_frames(&request(None, product));
        assert!(frames.is_empty());
    }

    #[test]
    fn test_open_meteo_templates() {
        let product = get_product("N0Q").unwrap();
        let frames = OpenMeteoSource.build_frames(&request(None, product));
        assert_eq!(frames.len(), 12);
        assert_eq!(
            frames[3].kind,
            FrameKind::Tile {
                url_template: "https://tile.open-meteo.com/radar/usa/{z}/{x}/{y}.png?frame=3"
                    .to_string()
            }
        );
    }

    #[test]
    fn test_mesonet_offsets() {
        assert_eq!(
            MesonetSource::url_template(0),
            "https://mesonet.agron.iastate.edu/cache/tile.py/1.0.0/nexrad-n0q-900913/{z}/{x}/{y}.png"
        );
        assert_eq!(
            MesonetSource::url_template(5),
            "https://mesonet.agron.iastate.edu/cache/tile.py/1.0.0/nexrad-n0q-900913-m05m/{z}/{x}/{y}.png"
        );

        let product = get_product("N0Q").unwrap();
        let mut req = request(None, product);
        req.frame_count = 30;
        let frames = MesonetSource.build_frames(&req);
        assert_eq!(frames.len(), MESONET_MAX_FRAMES);
        assert_eq!(frames[0].label, "-55 min");
        assert_eq!(frames[11].label, "Now");
    }

    #[test]
    fn test_provider_query_names() {
        assert_eq!(
            NationalProvider::from_query("Mesonet"),
            Some(NationalProvider::Mesonet)
        );
        assert_eq!(
            NationalProvider::from_query("open-meteo"),
            Some(NationalProvider::OpenMeteo)
        );
        assert_eq!(NationalProvider::from_query("rainviewer"), None);
        assert_eq!(NationalProvider::default().source().name(), "Open-Meteo");
    }
}
