//! Texture cache for slippy map tiles.
//!
//! Used for both the basemap and tile-based radar frames. Tiles are keyed by
//! their fully expanded URL. The cache keeps a bounded number of fetches in
//! flight, forgets queued tiles that scrolled off screen before their fetch
//! started, and evicts least-recently-used textures once it is over capacity.

use super::fetch::{decode_png, spawn_fetch, FetchError};
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Load state of a single tile.
#[derive(Clone)]
pub enum TileSlot {
    Queued,
    InFlight,
    Ready(TextureHandle),
    Failed,
}

impl TileSlot {
    fn is_settled(&self) -> bool {
        matches!(self, TileSlot::Ready(_) | TileSlot::Failed)
    }
}

struct TileEntry {
    slot: TileSlot,
    /// Frame counter of the last request for this tile.
    last_used: u64,
}

type TileResult = (String, Result<ColorImage, FetchError>);

pub struct TileCache {
    entries: HashMap<String, TileEntry>,
    queue: VecDeque<String>,
    in_flight: usize,
    max_in_flight: usize,
    capacity: usize,
    frame: u64,
    user_agent: String,
    sender: Sender<TileResult>,
    receiver: Receiver<TileResult>,
}

impl TileCache {
    pub fn new(max_in_flight: usize, capacity: usize, user_agent: impl Into<String>) -> Self {
        let (sender, receiver) = channel();
        Self {
            entries: HashMap::new(),
            queue: VecDeque::new(),
            in_flight: 0,
            max_in_flight: max_in_flight.max(1),
            capacity: capacity.max(1),
            frame: 0,
            user_agent: user_agent.into(),
            sender,
            receiver,
        }
    }

    /// Marks the start of a UI frame.
    ///
    /// Queued tiles nobody asked for during the previous frame are dropped
    /// so that panning quickly does not build a backlog of stale fetches.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        let frame = self.frame;
        let entries = &mut self.entries;
        self.queue.retain(|url| {
            let keep = entries.get(url).is_some_and(|e| e.last_used + 1 >= frame);
            if !keep {
                entries.remove(url);
            }
            keep
        });
    }

    /// Asks for a tile and returns its texture if it is ready.
    pub fn request(&mut self, url: &str) -> Option<&TextureHandle> {
        let frame = self.frame;
        if !self.entries.contains_key(url) {
            self.entries.insert(
                url.to_string(),
                TileEntry {
                    slot: TileSlot::Queued,
                    last_used: frame,
                },
            );
            self.queue.push_back(url.to_string());
        }

        let entry = self.entries.get_mut(url)?;
        entry.last_used = frame;
        match &entry.slot {
            TileSlot::Ready(texture) => Some(texture),
            _ => None,
        }
    }

    /// Current slot for a tile without touching its recency.
    #[cfg(test)]
    fn slot(&self, url: &str) -> Option<&TileSlot> {
        self.entries.get(url).map(|e| &e.slot)
    }

    /// Moves queued tiles into flight, up to the throttle limit, and returns
    /// the URLs that should now be fetched.
    pub fn next_batch(&mut self) -> Vec<String> {
        let mut batch = Vec::new();
        while self.in_flight < self.max_in_flight {
            let Some(url) = self.queue.pop_front() else {
                break;
            };
            if let Some(entry) = self.entries.get_mut(&url) {
                if matches!(entry.slot, TileSlot::Queued) {
                    entry.slot = TileSlot::InFlight;
                    self.in_flight += 1;
                    batch.push(url);
                }
            }
        }
        batch
    }

    /// Starts fetches for as many queued tiles as the throttle allows.
    pub fn pump(&mut self, ctx: &egui::Context) {
        for url in self.next_batch() {
            let sender = self.sender.clone();
            let tile_url = url.clone();
            spawn_fetch(ctx.clone(), url, self.user_agent.clone(), move |bytes| {
                let image = bytes.and_then(|b| decode_png(&b));
                let _ = sender.send((tile_url, image));
            });
        }
    }

    /// Drains completed fetches into textures.
    pub fn poll(&mut self, ctx: &egui::Context) {
        while let Ok((url, result)) = self.receiver.try_recv() {
            match result {
                Ok(image) => {
                    let texture = load_tile_texture(ctx, &url, image);
                    self.complete(&url, Some(texture));
                }
                Err(e) => {
                    log::debug!("Tile failed {}: {}", url, e);
                    self.complete(&url, None);
                }
            }
        }
        self.evict();
    }

    /// Records the outcome of an in-flight fetch.
    pub fn complete(&mut self, url: &str, texture: Option<TextureHandle>) {
        let Some(entry) = self.entries.get_mut(url) else {
            return;
        };
        if matches!(entry.slot, TileSlot::InFlight) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        entry.slot = match texture {
            Some(texture) => TileSlot::Ready(texture),
            None => TileSlot::Failed,
        };
    }

    /// Stores a tile that was fetched through another path, such as a tile
    /// frame's availability check.
    pub fn insert_ready(&mut self, ctx: &egui::Context, url: &str, image: ColorImage) {
        let texture = load_tile_texture(ctx, url, image);
        match self.entries.get_mut(url) {
            Some(entry) => {
                if matches!(entry.slot, TileSlot::InFlight) {
                    self.in_flight = self.in_flight.saturating_sub(1);
                }
                entry.slot = TileSlot::Ready(texture);
            }
            None => {
                self.entries.insert(
                    url.to_string(),
                    TileEntry {
                        slot: TileSlot::Ready(texture),
                        last_used: self.frame,
                    },
                );
            }
        }
    }

    /// Evicts least-recently-used settled tiles until under capacity.
    ///
    /// Tiles requested during the current frame are on screen and are never
    /// evicted, so the cache may stay above capacity while they are in use.
    pub fn evict(&mut self) {
        if self.entries.len() <= self.capacity {
            return;
        }
        let frame = self.frame;
        let mut settled: Vec<(u64, String)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.slot.is_settled() && e.last_used < frame)
            .map(|(url, e)| (e.last_used, url.clone()))
            .collect();
        settled.sort();

        let excess = self.entries.len() - self.capacity;
        for (_, url) in settled.into_iter().take(excess) {
            self.entries.remove(&url);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.in_flight
    }
}

fn load_tile_texture(ctx: &egui::Context, url: &str, image: ColorImage) -> TextureHandle {
    ctx.load_texture(
        url,
        image,
        TextureOptions {
            magnification: egui::TextureFilter::Linear,
            minification: egui::TextureFilter::Linear,
            ..Default::default()
        },
    )
}
