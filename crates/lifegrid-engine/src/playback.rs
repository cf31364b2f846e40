//! Interval timer for continuous playback.
//!
//! [`Playback`] only decides *when* a step is due. The coordinator asks
//! it on every `tick` and requests a step only when it is also idle, so
//! a slow stepper stretches the effective interval instead of building
//! a backlog. An interval of zero makes a step due whenever the previous
//! one has been committed.

use std::time::{Duration, Instant};

/// Playback state: playing flag, interval, and next due time.
#[derive(Clone, Debug)]
pub struct Playback {
    playing: bool,
    interval: Duration,
    next_due: Option<Instant>,
}

impl Playback {
    /// Paused playback with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            playing: false,
            interval,
            next_due: None,
        }
    }

    /// Whether playback is running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start playing with `interval`; the first step is due immediately.
    pub fn play(&mut self, interval: Duration, now: Instant) {
        self.playing = true;
        self.interval = interval;
        self.next_due = Some(now);
    }

    /// Stop scheduling steps.
    pub fn pause(&mut self) {
        self.playing = false;
        self.next_due = None;
    }

    /// Change the interval. While playing, the next step is rescheduled
    /// relative to the previous request rather than delayed further.
    pub fn set_interval(&mut self, interval: Duration) {
        if let Some(due) = self.next_due {
            let last = due.checked_sub(self.interval).unwrap_or(due);
            self.next_due = Some(last + interval);
        }
        self.interval = interval;
    }

    /// Whether a step should be requested at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.playing && self.next_due.is_some_and(|due| now >= due)
    }

    /// Record that a step was requested at `now`.
    pub fn mark_requested(&mut self, now: Instant) {
        if self.playing {
            self.next_due = Some(now + self.interval);
        }
    }

    /// Time from `now` until the next step is due, if playing.
    pub fn until_due(&self, now: Instant) -> Option<Duration> {
        if !self.playing {
            return None;
        }
        self.next_due
            .map(|due| due.saturating_duration_since(now))
    }
}
