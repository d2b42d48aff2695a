//! Overlay frame loading pipeline.
//!
//! Uses channel-based communication to bridge async image fetches with
//! egui's synchronous update loop. Every request carries the generation of
//! the sequence that asked for it; the controller drops results whose
//! generation has been superseded.

use super::fetch::{decode_png, spawn_fetch, FetchError};
use eframe::egui;
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Whether a frame is a stand-alone image or the center tile of a tile layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTarget {
    Image,
    CenterTile,
}

/// A request to load one frame's imagery.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRequest {
    pub generation: u64,
    pub frame_id: usize,
    pub url: String,
    pub target: FrameTarget,
}

/// A completed (or failed) frame load.
#[derive(Debug)]
pub struct FrameResult {
    pub generation: u64,
    pub frame_id: usize,
    pub url: String,
    pub target: FrameTarget,
    pub image: Result<egui::ColorImage, FetchError>,
}

/// Channel-based loader for overlay frames.
pub struct FrameChannel {
    sender: Sender<FrameResult>,
    receiver: Receiver<FrameResult>,
    user_agent: String,
}

impl FrameChannel {
    pub fn new(user_agent: impl Into<String>) -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            user_agent: user_agent.into(),
        }
    }

    /// Spawns the fetch and decode for a frame.
    pub fn request(&self, ctx: &egui::Context, request: FrameRequest) {
        log::debug!(
            "Requesting frame {} (gen {}): {}",
            request.frame_id,
            request.generation,
            request.url
        );
        let sender = self.sender.clone();
        let FrameRequest {
            generation,
            frame_id,
            url,
            target,
        } = request;

        spawn_fetch(
            ctx.clone(),
            url.clone(),
            self.user_agent.clone(),
            move |bytes| {
                let image = bytes.and_then(|b| decode_png(&b));
                let _ = sender.send(FrameResult {
                    generation,
                    frame_id,
                    url,
                    target,
                    image,
                });
            },
        );
    }

    /// Non-blocking check for a completed frame.
    pub fn try_recv(&self) -> Option<FrameResult> {
        self.receiver.try_recv().ok()
    }
}

/// GPU textures for the image frames of the current sequence.
///
/// Textures are keyed by frame id and dropped wholesale whenever a new
/// generation begins.
#[derive(Default)]
pub struct FrameTextures {
    generation: u64,
    textures: HashMap<usize, egui::TextureHandle>,
}

impl FrameTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every texture that belongs to an older generation.
    pub fn sync_generation(&mut self, generation: u64) {
        if self.generation != generation {
            self.generation = generation;
            self.textures.clear();
        }
    }

    pub fn insert(&mut self, generation: u64, frame_id: usize, texture: egui::TextureHandle) {
        self.sync_generation(generation);
        self.textures.insert(frame_id, texture);
    }

    pub fn remove(&mut self, frame_id: usize) {
        self.textures.remove(&frame_id);
    }

    pub fn get(&self, frame_id: usize) -> Option<&egui::TextureHandle> {
        self.textures.get(&frame_id)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.textures.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_texture(ctx: &egui::Context, name: &str) -> egui::TextureHandle {
        ctx.load_texture(
            name,
            egui::ColorImage::from_rgba_unmultiplied([1, 1], &[0, 0, 0, 0]),
            egui::TextureOptions::LINEAR,
        )
    }

    #[test]
    fn test_textures_dropped_on_new_generation() {
        let ctx = egui::Context::default();
        let mut textures = FrameTextures::new();

        textures.insert(1, 0, blank_texture(&ctx, "a"));
        textures.insert(1, 1, blank_texture(&ctx, "b"));
        assert_eq!(textures.len(), 2);

        textures.sync_generation(1);
        assert_eq!(textures.len(), 2);

        textures.insert(2, 5, blank_texture(&ctx, "c"));
        assert_eq!(textures.len(), 1);
        assert!(textures.get(5).is_some());
        assert!(textures.get(0).is_none());

        textures.remove(5);
        assert!(textures.is_empty());
    }

    #[test]
    fn test_channel_starts_empty() {
        let channel = FrameChannel::new("test-agent");
        assert!(channel.try_recv().is_none());
    }
}
