//! Live severe weather alerts.
//!
//! Fetches tornado and severe thunderstorm warnings from the NWS alerts API
//! and mesoscale discussions from the SPC, and keeps them as three polygon
//! groups that the map can show or hide independently.

mod channel;
mod feed;
mod types;

pub use channel::{AlertChannel, AlertFeedResult, RefreshTimer};
pub use feed::{AlertFeed, FeedError};
pub use types::{AlertCategory, AlertFeature, AlertLayers};
