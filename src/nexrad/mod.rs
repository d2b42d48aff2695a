//! NEXRAD imagery integration module.
//!
//! This module provides functionality for:
//! - Building overlay frame sequences from radar imagery providers
//! - Animating a sequence by cycling frame opacity
//! - Fetching and decoding frame images and map tiles off the UI thread

mod fetch;
mod frame_animator;
mod frame_channel;
mod overlay;
mod source;
mod tile_cache;

pub use fetch::{spawn_fetch, FetchError};
pub use frame_animator::FrameAnimator;
pub use frame_channel::{FrameChannel, FrameRequest, FrameResult, FrameTarget, FrameTextures};
pub use overlay::{FrameKind, LoadState, OverlayFrame, OverlaySet};
pub use source::{NationalProvider, OverlaySource, Ridge2Source, SequenceRequest};
pub use tile_cache::TileCache;
