//! Timeout handling for players leaving the frame.

use std::time::{Duration, Instant};

use log::info;

/// Watches for both players being absent from the detection stream at the same time and signals
/// when they have stayed gone for too long.
///
/// The manager only tracks visibility; the caller performs the actual match reset when
/// [`TimeoutManager::update`] returns `true`.
#[derive(Debug, Default)]
pub struct TimeoutManager {
    started: Option<Instant>,
}

impl TimeoutManager {
    /// How long both players may stay invisible before the match is reset.
    pub const TIMEOUT_DURATION: Duration = Duration::from_secs(60);

    /// Remaining time at which [`TimeoutManager::should_warn`] turns on.
    pub const WARNING_THRESHOLD: Duration = Duration::from_secs(5);

    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds this frame's visibility pair.
    ///
    /// The countdown starts when both players are invisible and is cancelled as soon as either
    /// becomes visible again. Returns `true` exactly once when the timeout is reached; the
    /// caller must then reset the match.
    pub fn update(&mut self, p1_visible: bool, p2_visible: bool, now: Instant) -> bool {
        if !p1_visible && !p2_visible {
            if self.started.is_none() {
                info!("both players invisible, starting timeout timer");
                self.started = Some(now);
            }
        } else if self.started.take().is_some() {
            info!("player visible again, cancelling timeout timer");
        }

        if self
            .started
            .is_some_and(|started| now.duration_since(started) >= Self::TIMEOUT_DURATION)
        {
            self.started = None;
            return true;
        }

        false
    }

    /// Whether the countdown is currently running.
    pub fn is_active(&self) -> bool {
        self.started.is_some()
    }

    /// Time left until the timeout fires, zero when the countdown is not running.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.started {
            Some(started) => Self::TIMEOUT_DURATION.saturating_sub(now.duration_since(started)),
            None => Duration::ZERO,
        }
    }

    /// Elapsed fraction of the timeout in percent (0–100), for progress bars.
    pub fn progress_percent(&self, now: Instant) -> f32 {
        match self.started {
            Some(started) => {
                let elapsed = now.duration_since(started).as_secs_f32();
                (elapsed / Self::TIMEOUT_DURATION.as_secs_f32() * 100.0).min(100.0)
            }
            None => 0.0,
        }
    }

    /// Whether the HUD should display a warning (countdown running and almost expired).
    pub fn should_warn(&self, now: Instant) -> bool {
        self.is_active() && self.remaining(now) <= Self::WARNING_THRESHOLD
    }

    /// Cancels any running countdown.
    pub fn reset(&mut self) {
        self.started = None;
    }
}
