//! Alert feed parsing.
//!
//! Converts the NWS active-alerts feed and the SPC mesoscale discussion feed
//! into alert polygons. GeoJSON positions are `[lon, lat]`; every ring is
//! reordered to `(lat, lon)` here so nothing downstream has to care.

use super::types::{AlertCategory, AlertFeature, AlertPopup, Ring};
use crate::nexrad::FetchError;
use chrono::{DateTime, Utc};
use geojson::{Feature, GeoJson, Geometry, JsonObject, Value};

/// Landing page used when a discussion has no number.
pub const MCD_INDEX_URL: &str = "https://www.spc.noaa.gov/products/md/";

/// Errors that can occur while loading an alert feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    /// The request failed.
    Fetch(FetchError),
    /// The body is not valid GeoJSON.
    Parse(String),
    /// The body is GeoJSON but not a feature collection.
    NotFeatureCollection,
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Fetch(e) => write!(f, "Feed fetch failed: {}", e),
            FeedError::Parse(msg) => write!(f, "Feed parse failed: {}", msg),
            FeedError::NotFeatureCollection => write!(f, "Feed is not a FeatureCollection"),
        }
    }
}

impl std::error::Error for FeedError {}

impl From<FetchError> for FeedError {
    fn from(e: FetchError) -> Self {
        FeedError::Fetch(e)
    }
}

impl From<std::string::FromUtf8Error> for FeedError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        FeedError::Parse(e.to_string())
    }
}

/// Which upstream feed a body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertFeed {
    /// NWS tornado and severe thunderstorm warnings
    Warnings,
    /// SPC mesoscale discussions
    Discussions,
}

impl AlertFeed {
    pub fn label(&self) -> &'static str {
        match self {
            AlertFeed::Warnings => "NWS warnings",
            AlertFeed::Discussions => "SPC discussions",
        }
    }

    /// Parses a body from this feed.
    pub fn parse(&self, body: &str) -> Result<Vec<AlertFeature>, FeedError> {
        match self {
            AlertFeed::Warnings => parse_warnings(body),
            AlertFeed::Discussions => parse_discussions(body),
        }
    }
}

/// Builds tornado and severe thunderstorm polygons from the NWS feed.
///
/// Features with another event type or without polygon geometry are
/// skipped.
pub fn parse_warnings(body: &str) -> Result<Vec<AlertFeature>, FeedError> {
    let features = parse_features(body)?;
    let mut alerts = Vec::new();

    for feature in &features {
        let Some(props) = feature.properties.as_ref() else {
            continue;
        };
        let Some(category) = string_prop(props, "event")
            .as_deref()
            .and_then(AlertCategory::from_event)
        else {
            continue;
        };
        let Some(polygons) = feature.geometry.as_ref().and_then(convert_polygons) else {
            continue;
        };

        let expiry = string_prop(props, "ends").or_else(|| string_prop(props, "expires"));
        alerts.push(AlertFeature {
            category,
            polygons,
            popup: AlertPopup::Warning {
                headline: string_prop(props, "headline").unwrap_or_default(),
                area: string_prop(props, "areaDesc").unwrap_or_default(),
                expires: format_expiry(expiry.as_deref()),
            },
        });
    }

    Ok(alerts)
}

/// Builds mesoscale discussion polygons from the SPC feed.
pub fn parse_discussions(body: &str) -> Result<Vec<AlertFeature>, FeedError> {
    let features = parse_features(body)?;
    let mut alerts = Vec::new();

    for feature in &features {
        let Some(polygons) = feature.geometry.as_ref().and_then(convert_polygons) else {
            continue;
        };
        let number = feature
            .properties
            .as_ref()
            .and_then(|p| string_prop(p, "mcdnum"))
            .unwrap_or_default();

        alerts.push(AlertFeature {
            category: AlertCategory::MesoscaleDiscussion,
            polygons,
            popup: AlertPopup::Discussion {
                link: discussion_link(&number),
                number,
            },
        });
    }

    Ok(alerts)
}

/// Link to an SPC discussion page, or the index when the number is unknown.
pub fn discussion_link(number: &str) -> String {
    if number.is_empty() {
        MCD_INDEX_URL.to_string()
    } else {
        format!("{}{}.html", MCD_INDEX_URL, number)
    }
}

/// Formats an RFC 3339 timestamp for display; absent or unparseable values
/// read "Unknown".
pub fn format_expiry(value: Option<&str>) -> String {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%b %-d, %Y %H:%M UTC")
                .to_string()
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

fn parse_features(body: &str) -> Result<Vec<Feature>, FeedError> {
    let geojson: GeoJson = body
        .parse()
        .map_err(|e: geojson::Error| FeedError::Parse(e.to_string()))?;

    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc.features),
        _ => Err(FeedError::NotFeatureCollection),
    }
}

/// Reads a property as a string; numbers are stringified.
fn string_prop(props: &JsonObject, key: &str) -> Option<String> {
    match props.get(key)? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Converts Polygon/MultiPolygon geometry to (lat, lon) rings.
fn convert_polygons(geometry: &Geometry) -> Option<Vec<Vec<Ring>>> {
    let polygons: Vec<Vec<Ring>> = match &geometry.value {
        Value::Polygon(rings) => vec![convert_rings(rings)],
        Value::MultiPolygon(polygons) => polygons.iter().map(|p| convert_rings(p)).collect(),
        _ => return None,
    };

    let polygons: Vec<Vec<Ring>> = polygons
        .into_iter()
        .filter(|rings| rings.first().is_some_and(|r| r.len() >= 3))
        .collect();

    if polygons.is_empty() {
        None
    } else {
        Some(polygons)
    }
}

fn convert_rings(rings: &[Vec<Vec<f64>>]) -> Vec<Ring> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter(|pos| pos.len() >= 2)
                .map(|pos| (pos[1], pos[0]))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WARNING_FEED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-97.5,35.0],[-97.1,35.0],[-97.1,35.3],[-97.5,35.3],[-97.5,35.0]]]
                },
                "properties": {
                    "event": "Tornado Warning",
                    "headline": "Tornado Warning issued May 20 at 3:10PM CDT",
                    "areaDesc": "Cleveland, OK; McClain, OK",
                    "ends": "2024-05-20T15:45:00-05:00"
                }
            },
            {
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-96.0,36.0],[-95.8,36.0],[-95.8,36.2],[-96.0,36.0]]],
                        [[[-95.0,36.0],[-94.8,36.0],[-94.8,36.2],[-95.0,36.0]]]
                    ]
                },
                "properties": {
                    "event": "Severe Thunderstorm Warning",
                    "headline": "Severe Thunderstorm Warning",
                    "areaDesc": "Tulsa, OK"
                }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": { "event": "Tornado Warning" }
            },
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-90.0,30.0],[-89.0,30.0],[-89.0,31.0],[-90.0,30.0]]]
                },
                "properties": { "event": "Flash Flood Warning" }
            }
        ]
    }"#;

    #[test]
    fn test_rings_are_reordered_to_lat_lon() {
        let body = r#"{"type":"FeatureCollection","features":[{"type":"Feature",
            "geometry":{"type":"Polygon","coordinates":[[[-97.5,35.0],[-97.1,35.0],[-97.1,35.3],[-97.5,35.3]]]},
            "properties":{"event":"Tornado Warning"}}]}"#;
        let alerts = parse_warnings(body).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].polygons[0][0][0], (35.0, -97.5));
        assert_eq!(alerts[0].polygons[0][0][2], (35.3, -97.1));
    }

    #[test]
    fn test_parse_warnings() {
        let alerts = parse_warnings(WARNING_FEED).unwrap();
        assert_eq!(alerts.len(), 2);

        assert_eq!(alerts[0].category, AlertCategory::Tornado);
        assert_eq!(
            alerts[0].popup,
            AlertPopup::Warning {
                headline: "Tornado Warning issued May 20 at 3:10PM CDT".to_string(),
                area: "Cleveland, OK; McClain, OK".to_string(),
                expires: "May 20, 2024 20:45 UTC".to_string(),
            }
        );

        assert_eq!(alerts[1].category, AlertCategory::SevereThunderstorm);
        assert_eq!(alerts[1].polygons.len(), 2);
        match &alerts[1].popup {
            AlertPopup::Warning { expires, .. } => assert_eq!(expires, "Unknown"),
            other => panic!("unexpected popup {:?}", other),
        }
    }

    #[test]
    fn test_parse_discussions() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[-100.0,40.0],[-99.0,40.0],[-99.0,41.0],[-100.0,40.0]]]},
             "properties":{"mcdnum":"0734"}},
            {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[-90.0,40.0],[-89.0,40.0],[-89.0,41.0],[-90.0,40.0]]]},
             "properties":{"mcdnum":735}},
            {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[-80.0,40.0],[-79.0,40.0],[-79.0,41.0],[-80.0,40.0]]]},
             "properties":{}}
        ]}"#;
        let alerts = parse_discussions(body).unwrap();
        assert_eq!(alerts.len(), 3);
        assert!(alerts
            .iter()
            .all(|a| a.category == AlertCategory::MesoscaleDiscussion));
        assert_eq!(
            alerts[0].popup.link(),
            Some("https://www.spc.noaa.gov/products/md/0734.html")
        );
        assert_eq!(
            alerts[1].popup.link(),
            Some("https://www.spc.noaa.gov/products/md/735.html")
        );
        assert_eq!(
            alerts[2].popup.link(),
            Some("https://www.spc.noaa.gov/products/md/")
        );
    }

    #[test]
    fn test_empty_feed() {
        let body = r#"{"type":"FeatureCollection","features":[]}"#;
        assert!(parse_warnings(body).unwrap().is_empty());
        assert!(parse_discussions(body).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_feed() {
        let result = parse_warnings("<html>503</html>");
        assert!(matches!(result, Err(FeedError::Parse(_))));
        assert_eq!(
            parse_discussions(r#"{"type":"Point","coordinates":[1.0,2.0]}"#),
            Err(FeedError::NotFeatureCollection)
        );
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(
            format_expiry(Some("2024-05-20T15:45:00-05:00")),
            "May 20, 2024 20:45 UTC"
        );
        assert_eq!(format_expiry(None), "Unknown");
        assert_eq!(format_expiry(Some("soon")), "Unknown");
    }
}
