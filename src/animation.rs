//! Animation pacing module.
//!
//! This module drives the session's stepwise runs at a user-controlled speed, so that each
//! expansion or wall shows up on screen before the next one happens.

use std::time::{Duration, Instant};

use crate::session::Session;

/// Default delay between two animation steps, in milliseconds.
pub(crate) const DEFAULT_DELAY_MS: u64 = 25;

/// Upper bound on the delay between two animation steps, in milliseconds.
const MAX_DELAY_MS: u64 = 500;

/// Amount by which [`AnimationManager::faster`] and [`AnimationManager::slower`] change the delay.
const DELAY_STEP_MS: u64 = 5;

/// Upper bound on the steps performed by one update, so a zero delay still redraws.
const MAX_STEPS_PER_UPDATE: usize = 64;

/// Animation state manager for the session's runs.
///
/// This structure tracks the time of the last performed step and decides how many steps are due
/// whenever the event loop comes around.
#[derive(Debug)]
pub(crate) struct AnimationManager {
    /// Delay between two steps.
    delay: Duration,
    /// Timestamp of the last update that performed steps.
    last_update_time: Instant,
}

impl Default for AnimationManager {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DELAY_MS))
    }
}

impl AnimationManager {
    /// Creates a new animation manager with the given delay, capped at the maximum delay.
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay: delay.min(Duration::from_millis(MAX_DELAY_MS)),
            last_update_time: Instant::now(),
        }
    }

    /// Delay between two steps.
    pub(crate) const fn delay(&self) -> Duration {
        self.delay
    }

    /// Shortens the delay by one notch, down to zero.
    pub(crate) fn faster(&mut self) {
        self.delay = self
            .delay
            .saturating_sub(Duration::from_millis(DELAY_STEP_MS));
    }

    /// Lengthens the delay by one notch, up to the maximum delay.
    pub(crate) fn slower(&mut self) {
        self.delay = (self.delay + Duration::from_millis(DELAY_STEP_MS))
            .min(Duration::from_millis(MAX_DELAY_MS));
    }

    /// Restarts the timer so the next step waits a full delay.
    pub(crate) fn restart(&mut self) {
        self.last_update_time = Instant::now();
    }

    /// Time left before the next step is due.
    pub(crate) fn time_until_next(&self) -> Duration {
        self.delay.saturating_sub(self.last_update_time.elapsed())
    }

    /// Advances the session's run by as many steps as are due and returns how many were performed.
    ///
    /// One step is due per elapsed delay since the last update, bounded so that slow frames do not
    /// stall the interface. An idle session only keeps the timer fresh.
    pub(crate) fn update(&mut self, session: &mut Session) -> usize {
        if !session.is_busy() {
            self.restart();
            return 0;
        }

        let elapsed = self.last_update_time.elapsed();
        if elapsed < self.delay {
            return 0;
        }

        let due = elapsed
            .as_millis()
            .checked_div(self.delay.as_millis())
            .and_then(|due| usize::try_from(due).ok())
            .map_or(MAX_STEPS_PER_UPDATE, |due| due.clamp(1, MAX_STEPS_PER_UPDATE));

        let mut performed = 0;
        while performed < due && session.is_busy() {
            let _ = session.step();
            performed += 1;
        }

        self.restart();

        performed
    }
}
