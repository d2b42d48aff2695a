//! Animation playback state.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Frame period choices offered by the speed selector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
    VeryFast,
}

impl AnimationSpeed {
    pub fn label(&self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "Slow",
            AnimationSpeed::Normal => "Normal",
            AnimationSpeed::Fast => "Fast",
            AnimationSpeed::VeryFast => "Very fast",
        }
    }

    pub fn all() -> &'static [AnimationSpeed] {
        &[
            AnimationSpeed::Slow,
            AnimationSpeed::Normal,
            AnimationSpeed::Fast,
            AnimationSpeed::VeryFast,
        ]
    }

    /// Time each frame stays on screen.
    pub fn period(&self) -> Duration {
        Duration::from_millis(match self {
            AnimationSpeed::Slow => 1200,
            AnimationSpeed::Normal => 800,
            AnimationSpeed::Fast => 500,
            AnimationSpeed::VeryFast => 250,
        })
    }

    /// Closest speed for a period in milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self::all()
            .iter()
            .copied()
            .min_by_key(|s| (s.period().as_millis() as i64 - ms as i64).unsigned_abs())
            .unwrap_or_default()
    }

    /// Parses the names used in URL query strings.
    pub fn from_query(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "slow" => Some(AnimationSpeed::Slow),
            "normal" => Some(AnimationSpeed::Normal),
            "fast" => Some(AnimationSpeed::Fast),
            "very-fast" | "veryfast" => Some(AnimationSpeed::VeryFast),
            other => other.parse::<u64>().ok().map(Self::from_millis),
        }
    }
}

/// State for the animation controls.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub speed: AnimationSpeed,

    /// Overlay opacity slider value, 0-100
    pub opacity_percent: u32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            speed: AnimationSpeed::default(),
            opacity_percent: 70,
        }
    }
}

impl PlaybackState {
    pub fn opacity(&self) -> f32 {
        self.opacity_percent.min(100) as f32 / 100.0
    }
}
