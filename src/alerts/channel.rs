//! Periodic alert feed refresh.
//!
//! Each refresh cycle fetches both feeds in the background and reports the
//! parsed features back through a channel. Results carry the cycle's
//! generation so a slow response from an earlier cycle cannot overwrite a
//! newer one.

use super::feed::{AlertFeed, FeedError};
use super::types::AlertFeature;
use crate::nexrad::spawn_fetch;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;
use web_time::Instant;

/// Parsed result of one feed in one cycle.
#[derive(Debug)]
pub struct AlertFeedResult {
    pub generation: u64,
    pub feed: AlertFeed,
    pub features: Result<Vec<AlertFeature>, FeedError>,
}

/// Channel-based fetcher for the alert feeds.
pub struct AlertChannel {
    sender: Sender<AlertFeedResult>,
    receiver: Receiver<AlertFeedResult>,
    warnings_url: String,
    discussions_url: String,
    user_agent: String,
}

impl AlertChannel {
    pub fn new(
        warnings_url: impl Into<String>,
        discussions_url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            warnings_url: warnings_url.into(),
            discussions_url: discussions_url.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Spawns fetches for both feeds tagged with `generation`.
    pub fn fetch_cycle(&self, ctx: &egui::Context, generation: u64) {
        log::debug!("Starting alert cycle {}", generation);
        self.fetch_feed(ctx, generation, AlertFeed::Warnings, &self.warnings_url);
        self.fetch_feed(
            ctx,
            generation,
            AlertFeed::Discussions,
            &self.discussions_url,
        );
    }

    fn fetch_feed(&self, ctx: &egui::Context, generation: u64, feed: AlertFeed, url: &str) {
        let sender = self.sender.clone();
        spawn_fetch(
            ctx.clone(),
            url.to_string(),
            self.user_agent.clone(),
            move |bytes| {
                let features = bytes
                    .map_err(FeedError::from)
                    .and_then(|b| String::from_utf8(b).map_err(FeedError::from))
                    .and_then(|body| feed.parse(&body));
                let _ = sender.send(AlertFeedResult {
                    generation,
                    feed,
                    features,
                });
            },
        );
    }

    /// Non-blocking check for a completed feed.
    pub fn try_recv(&self) -> Option<AlertFeedResult> {
        self.receiver.try_recv().ok()
    }
}

/// Fixed-interval deadline driven by the update loop.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// True when a cycle should start. A timer that was never reset is due
    /// immediately.
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.is_none_or(|due| now >= due)
    }

    /// Pushes the next deadline a full interval past `now`.
    pub fn reset(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_timer() {
        let mut timer = RefreshTimer::new(Duration::from_secs(60));
        let now = Instant::now();
        assert!(timer.is_due(now));

        timer.reset(now);
        assert!(!timer.is_due(now + Duration::from_secs(59)));
        assert!(timer.is_due(now + Duration::from_secs(60)));
        assert_eq!(
            timer.time_until_due(now + Duration::from_secs(45)),
            Duration::from_secs(15)
        );
    }

    #[test]
    fn test_channel_starts_empty() {
        let channel = AlertChannel::new("http://a", "http://b", "test");
        assert!(channel.try_recv().is_none());
    }
}
