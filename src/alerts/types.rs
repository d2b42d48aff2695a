//! Alert polygon types.

use eframe::egui::Color32;
use std::fmt;

/// The three alert groups drawn on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertCategory {
    Tornado,
    SevereThunderstorm,
    MesoscaleDiscussion,
}

impl AlertCategory {
    pub fn all() -> &'static [AlertCategory] {
        &[
            AlertCategory::Tornado,
            AlertCategory::SevereThunderstorm,
            AlertCategory::MesoscaleDiscussion,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertCategory::Tornado => "Tornado Warnings",
            AlertCategory::SevereThunderstorm => "Severe Thunderstorm Warnings",
            AlertCategory::MesoscaleDiscussion => "Mesoscale Discussions",
        }
    }

    /// Maps an NWS `event` property to a warning group.
    pub fn from_event(event: &str) -> Option<Self> {
        match event {
            "Tornado Warning" => Some(AlertCategory::Tornado),
            "Severe Thunderstorm Warning" => Some(AlertCategory::SevereThunderstorm),
            _ => None,
        }
    }

    /// Outline color.
    pub fn stroke_color(&self) -> Color32 {
        match self {
            AlertCategory::Tornado => Color32::from_rgb(0xdc, 0x26, 0x26),
            AlertCategory::SevereThunderstorm => Color32::from_rgb(0xea, 0x58, 0x0c),
            AlertCategory::MesoscaleDiscussion => Color32::from_rgb(0x7c, 0x3a, 0xed),
        }
    }

    /// Fill color at 30% opacity.
    pub fn fill_color(&self) -> Color32 {
        self.stroke_color().gamma_multiply(0.3)
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Popup content for an alert polygon.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertPopup {
    Warning {
        headline: String,
        area: String,
        /// Formatted expiry, or "Unknown"
        expires: String,
    },
    Discussion {
        /// Empty when the feed omits the number
        number: String,
        link: String,
    },
}

impl AlertPopup {
    /// Text shown when hovering the polygon.
    pub fn summary(&self) -> String {
        match self {
            AlertPopup::Warning {
                headline,
                area,
                expires,
            } => format!("{}\n{}\nUntil {}", headline, area, expires),
            AlertPopup::Discussion { number, .. } => {
                format!("SPC Mesoscale Discussion #{}", number)
            }
        }
    }

    pub fn link(&self) -> Option<&str> {
        match self {
            AlertPopup::Discussion { link, .. } => Some(link),
            AlertPopup::Warning { .. } => None,
        }
    }
}

/// A ring of (lat, lon) vertices.
pub type Ring = Vec<(f64, f64)>;

/// One alert with its polygons. Each polygon is an exterior ring followed by
/// any holes.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertFeature {
    pub category: AlertCategory,
    pub polygons: Vec<Vec<Ring>>,
    pub popup: AlertPopup,
}

impl AlertFeature {
    /// Point-in-polygon test honoring holes.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.polygons.iter().any(|rings| {
            let Some((exterior, holes)) = rings.split_first() else {
                return false;
            };
            ring_contains(exterior, lat, lon) && !holes.iter().any(|h| ring_contains(h, lat, lon))
        })
    }
}

/// Even-odd ray casting.
fn ring_contains(ring: &[(f64, f64)], lat: f64, lon: f64) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (lat_i, lon_i) = ring[i];
        let (lat_j, lon_j) = ring[j];
        if (lat_i > lat) != (lat_j > lat)
            && lon < (lon_j - lon_i) * (lat - lat_i) / (lat_j - lat_i) + lon_i
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// The three alert groups, rebuilt every refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct AlertLayers {
    pub tornado: Vec<AlertFeature>,
    pub severe: Vec<AlertFeature>,
    pub mesoscale: Vec<AlertFeature>,
}

impl AlertLayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_all(&mut self) {
        self.tornado.clear();
        self.severe.clear();
        self.mesoscale.clear();
    }

    pub fn group(&self, category: AlertCategory) -> &[AlertFeature] {
        match category {
            AlertCategory::Tornado => &self.tornado,
            AlertCategory::SevereThunderstorm => &self.severe,
            AlertCategory::MesoscaleDiscussion => &self.mesoscale,
        }
    }

    /// Files each feature into its group.
    pub fn extend(&mut self, features: Vec<AlertFeature>) {
        for feature in features {
            match feature.category {
                AlertCategory::Tornado => self.tornado.push(feature),
                AlertCategory::SevereThunderstorm => self.severe.push(feature),
                AlertCategory::MesoscaleDiscussion => self.mesoscale.push(feature),
            }
        }
    }

    pub fn count(&self, category: AlertCategory) -> usize {
        self.group(category).len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tornado.is_empty() && self.severe.is_empty() && self.mesoscale.is_empty()
    }

    /// Topmost feature under a point, considering only visible groups.
    ///
    /// Groups are drawn mesoscale first and tornado last, so the search runs
    /// in reverse draw order.
    pub fn hit_test(
        &self,
        lat: f64,
        lon: f64,
        visible: impl Fn(AlertCategory) -> bool,
    ) -> Option<&AlertFeature> {
        [
            AlertCategory::Tornado,
            AlertCategory::SevereThunderstorm,
            AlertCategory::MesoscaleDiscussion,
        ]
        .into_iter()
        .filter(|c| visible(*c))
        .flat_map(|c| self.group(c).iter().rev())
        .find(|f| f.contains(lat, lon))
    }
}
