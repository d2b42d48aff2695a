//! Overlay frame definitions.
//!
//! An overlay frame is one renderable radar layer: either a tile layer bound
//! to a `{z}/{x}/{y}` URL template or a single image placed on a geographic
//! box. A sequence of frames makes up one animation.

use crate::geo::{GeoBounds, TileId};

/// What a frame draws and where its pixels come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameKind {
    /// Slippy tile layer; tiles are fetched for whatever is on screen.
    Tile { url_template: String },
    /// Single image stretched over a lat/lon box.
    Image { url: String, bounds: GeoBounds },
}

/// Network state of a frame's imagery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded,
    Failed,
}

/// A single renderable layer in an animation sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    /// Position in the sequence as built; stable even after other frames are dropped.
    pub id: usize,
    pub kind: FrameKind,
    /// Opacity in [0, 1]
    pub opacity: f32,
    pub z_index: i32,
    pub load_state: LoadState,
    /// Short label shown in the frame indicator (e.g. "-55 min")
    pub label: String,
}

impl OverlayFrame {
    pub fn tile(id: usize, url_template: impl Into<String>, z_index: i32) -> Self {
        Self {
            id,
            kind: FrameKind::Tile {
                url_template: url_template.into(),
            },
            opacity: 0.0,
            z_index,
            load_state: LoadState::Pending,
            label: String::new(),
        }
    }

    pub fn image(id: usize, url: impl Into<String>, bounds: GeoBounds, z_index: i32) -> Self {
        Self {
            id,
            kind: FrameKind::Image {
                url: url.into(),
                bounds,
            },
            opacity: 0.0,
            z_index,
            load_state: LoadState::Pending,
            label: String::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// URL whose response decides whether this frame is usable.
    ///
    /// Image frames have exactly one URL. Tile frames are checked with the
    /// tile under the given point so a dead frame is found without waiting
    /// for the whole screen to load.
    pub fn load_url(&self, center_tile: TileId) -> String {
        match &self.kind {
            FrameKind::Image { url, .. } => url.clone(),
            FrameKind::Tile { url_template } => center_tile.url(url_template),
        }
    }
}

/// The ordered set of frames currently on the map.
///
/// Every set carries the generation of the selection that built it so
/// that late network results for an abandoned selection can be told apart.
#[derive(Debug, Default)]
pub struct OverlaySet {
    generation: u64,
    frames: Vec<OverlayFrame>,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Swaps in a freshly built sequence.
    pub fn replace(&mut self, generation: u64, frames: Vec<OverlayFrame>) {
        self.generation = generation;
        self.frames = frames;
    }

    /// Removes every frame; the generation is kept.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn frames(&self) -> &[OverlayFrame] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [OverlayFrame] {
        &mut self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Finds a frame by id.
    pub fn get_mut(&mut self, frame_id: usize) -> Option<&mut OverlayFrame> {
        self.frames.iter_mut().find(|f| f.id == frame_id)
    }

    /// Drops a frame, returning the index it occupied.
    pub fn remove(&mut self, frame_id: usize) -> Option<usize> {
        let index = self.frames.iter().position(|f| f.id == frame_id)?;
        self.frames.remove(index);
        Some(index)
    }

    /// Number of frames whose imagery arrived.
    pub fn loaded_count(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| f.load_state == LoadState::Loaded)
            .count()
    }

    /// Frames that are currently drawn (nonzero opacity).
    #[cfg(test)]
    pub fn visible(&self) -> impl Iterator<Item = &OverlayFrame> {
        self.frames.iter().filter(|f| f.is_visible())
    }
}
