//! Frame animation controller.
//!
//! Cycles opacity across an ordered list of overlay frames to simulate radar
//! motion. Exactly one frame is drawn at a time; the rest sit at zero
//! opacity so that their imagery stays loaded and swapping is instant.
//!
//! The animator owns no clock of its own. The app's update loop calls
//! [`FrameAnimator::update`] with the current instant and the animator fires
//! a tick whenever the armed deadline has passed.

use super::overlay::OverlayFrame;
use std::time::Duration;
use web_time::Instant;

/// Default time between frame advances.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(800);

/// Default opacity of the frame being displayed.
pub const DEFAULT_DISPLAY_OPACITY: f32 = 0.7;

/// An armed periodic timer.
#[derive(Debug, Clone, Copy)]
struct AnimationTimer {
    id: u64,
    next_tick: Instant,
}

/// Drives frame-by-frame playback of an overlay sequence.
#[derive(Debug)]
pub struct FrameAnimator {
    /// Index of the frame the next tick will show.
    index: usize,

    /// Index of the frame currently shown, if any.
    displayed: Option<usize>,

    period: Duration,
    display_opacity: f32,

    /// `None` when stopped or when the sequence has a single frame.
    timer: Option<AnimationTimer>,

    /// Monotonic counter used to tag timers.
    timers_created: u64,
}

impl Default for FrameAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD, DEFAULT_DISPLAY_OPACITY)
    }
}

impl FrameAnimator {
    pub fn new(period: Duration, display_opacity: f32) -> Self {
        Self {
            index: 0,
            displayed: None,
            period,
            display_opacity: display_opacity.clamp(0.0, 1.0),
            timer: None,
            timers_created: 0,
        }
    }

    /// Starts playback from the next frame in sequence.
    ///
    /// Any armed timer is cancelled first, so calling this repeatedly never
    /// leaves more than one timer behind. With a single frame the frame is
    /// shown and no timer is armed.
    pub fn start(&mut self, frames: &mut [OverlayFrame], now: Instant) {
        self.cancel_timer();

        match frames.len() {
            0 => {}
            1 => self.show_single(frames),
            n => {
                if self.index >= n {
                    self.index = 0;
                }
                self.tick(frames);
                self.arm(now);
            }
        }
    }

    /// Stops playback and hides every frame. The next start plays from the
    /// first frame.
    ///
    /// A single-frame sequence has nothing to animate, so its frame is put
    /// back on screen.
    pub fn stop(&mut self, frames: &mut [OverlayFrame]) {
        self.cancel_timer();
        self.index = 0;
        for frame in frames.iter_mut() {
            frame.opacity = 0.0;
        }
        self.displayed = None;

        if frames.len() == 1 {
            self.show_single(frames);
        }
    }

    /// Forgets position and timer; used when a sequence is replaced.
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.index = 0;
        self.displayed = None;
    }

    /// Advances if the armed deadline has passed. Returns true when a tick
    /// fired.
    ///
    /// A stalled update loop gets at most one catch-up tick; the next
    /// deadline is re-armed relative to `now`.
    pub fn update(&mut self, frames: &mut [OverlayFrame], now: Instant) -> bool {
        let Some(timer) = self.timer else {
            return false;
        };
        if now < timer.next_tick || frames.len() < 2 {
            return false;
        }

        self.tick(frames);
        if let Some(timer) = self.timer.as_mut() {
            timer.next_tick = now + self.period;
        }
        true
    }

    /// Changes the tick period. A running animation is restarted so the new
    /// period takes effect; a paused one stays paused.
    pub fn set_period(&mut self, period: Duration, frames: &mut [OverlayFrame], now: Instant) {
        self.period = period;
        if self.is_running() {
            self.start(frames, now);
        }
    }

    /// Applies a new display opacity to whatever is currently on screen and
    /// to every later tick.
    pub fn set_display_opacity(&mut self, opacity: f32, frames: &mut [OverlayFrame]) {
        self.display_opacity = opacity.clamp(0.0, 1.0);
        for (i, frame) in frames.iter_mut().enumerate() {
            if self.displayed == Some(i) || frame.is_visible() {
                frame.opacity = self.display_opacity;
            }
        }
    }

    /// Fixes up playback after the frame at `removed_index` was dropped from
    /// `frames`.
    pub fn frame_removed(
        &mut self,
        removed_index: usize,
        frames: &mut [OverlayFrame],
        now: Instant,
    ) {
        let n = frames.len();
        if n == 0 {
            self.reset();
            return;
        }

        if removed_index < self.index {
            self.index -= 1;
        }
        if self.index >= n {
            self.index = 0;
        }

        let removed_displayed = self.displayed == Some(removed_index);
        self.displayed = match self.displayed {
            Some(d) if d == removed_index => None,
            Some(d) if d > removed_index => Some(d - 1),
            other => other,
        };

        if n == 1 {
            self.cancel_timer();
            self.show_single(frames);
            return;
        }

        // Keep something on screen when the shown frame went away
        if removed_displayed && self.is_running() {
            self.tick(frames);
            self.arm(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Number of armed timers (zero or one).
    #[cfg(test)]
    pub fn active_timers(&self) -> usize {
        usize::from(self.timer.is_some())
    }

    /// Id of the armed timer, if any.
    #[cfg(test)]
    pub fn timer_id(&self) -> Option<u64> {
        self.timer.map(|t| t.id)
    }

    /// Time left until the next tick, for scheduling repaints.
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        let timer = self.timer?;
        Some(timer.next_tick.saturating_duration_since(now))
    }

    #[cfg(test)]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn displayed(&self) -> Option<usize> {
        self.displayed
    }

    #[cfg(test)]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Shows frame `index` and hides the rest, then advances the index.
    fn tick(&mut self, frames: &mut [OverlayFrame]) {
        let n = frames.len();
        if n == 0 {
            return;
        }
        for (i, frame) in frames.iter_mut().enumerate() {
            frame.opacity = if i == self.index {
                self.display_opacity
            } else {
                0.0
            };
        }
        self.displayed = Some(self.index);
        self.index = (self.index + 1) % n;
    }

    fn show_single(&mut self, frames: &mut [OverlayFrame]) {
        if let Some(frame) = frames.first_mut() {
            frame.opacity = self.display_opacity;
            self.index = 0;
            self.displayed = Some(0);
        }
    }

    fn arm(&mut self, now: Instant) {
        self.timers_created += 1;
        self.timer = Some(AnimationTimer {
            id: self.timers_created,
            next_tick: now + self.period,
        });
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            log::debug!("Cancelled animation timer {}", timer.id);
        }
    }
}
