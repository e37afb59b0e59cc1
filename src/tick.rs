//! Fixed interval update ticks, decoupled from the render rate.

use std::time::Duration;

use web_time::Instant;

/// Fires a callback at a fixed interval.
///
/// The source doesn't own a timer, it's polled from the event loop with the current time and fires the callback once for every whole interval that elapsed since the previous poll.
/// The callback is passed when polling, so it's always the latest one that gets invoked.
///
/// The schedule is a resource acquired with [`Self::start`] and released with [`Self::stop`], while stopped the callback is never invoked.
#[derive(Debug, Clone)]
pub struct TickSource {
    /// Time between two ticks.
    interval: Duration,
    /// Maximum amount of ticks fired in a single poll.
    max_ticks_per_poll: u32,
    /// Timing state, `None` when stopped.
    schedule: Option<Schedule>,
    /// Total amount of fired ticks.
    ticks: u64,
}

/// Timing state of a running tick source.
#[derive(Debug, Clone, Copy)]
struct Schedule {
    /// Moment of the previous poll.
    last_time: Instant,
    /// Elapsed time not yet consumed by a tick.
    accumulator: Duration,
}

impl TickSource {
    /// Create a stopped tick source.
    ///
    /// # Arguments
    ///
    /// * `interval` - Time between two ticks.
    /// * `max_ticks_per_poll` - Upper bound of ticks fired for a single poll, elapsed time above it is dropped.
    ///
    /// # Panics
    ///
    /// - When `interval` is zero.
    #[inline]
    #[must_use]
    pub fn new(interval: Duration, max_ticks_per_poll: u32) -> Self {
        assert!(!interval.is_zero(), "Tick interval can't be zero");

        Self {
            interval,
            max_ticks_per_poll,
            schedule: None,
            ticks: 0,
        }
    }

    /// Start firing ticks, counting from `now`.
    ///
    /// Does nothing when already running.
    #[inline]
    pub fn start(&mut self, now: Instant) {
        if self.schedule.is_some() {
            return;
        }

        log::debug!("Starting tick source with an interval of {:?}", self.interval);

        self.schedule = Some(Schedule {
            last_time: now,
            accumulator: Duration::ZERO,
        });
    }

    /// Stop firing ticks.
    ///
    /// After this the callback passed to [`Self::run_due`] won't be called anymore until [`Self::start`] is called again.
    #[inline]
    pub fn stop(&mut self) {
        if self.schedule.take().is_some() {
            log::debug!("Stopped tick source after {} ticks", self.ticks);
        }
    }

    /// Whether the source is started.
    #[inline]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    /// Total amount of ticks fired.
    #[inline]
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Fire the callback for every tick that's due at `now`.
    ///
    /// # Arguments
    ///
    /// * `now` - Current time, a moment before the previous poll fires nothing.
    /// * `callback` - Called with the index of the tick, once for every fired tick.
    ///
    /// # Returns
    ///
    /// - Amount of ticks fired, always `0` when stopped.
    #[inline]
    pub fn run_due(&mut self, now: Instant, mut callback: impl FnMut(u64)) -> u32 {
        let Some(schedule) = &mut self.schedule else {
            return 0;
        };

        // Ensure a long stall can't result in a burst of ticks
        let frame_time = now
            .saturating_duration_since(schedule.last_time)
            .min(self.interval.saturating_mul(self.max_ticks_per_poll));
        schedule.last_time = now;
        schedule.accumulator += frame_time;

        let mut fired = 0;
        while schedule.accumulator >= self.interval {
            schedule.accumulator -= self.interval;

            log::trace!("Tick {}", self.ticks);

            callback(self.ticks);

            self.ticks += 1;
            fired += 1;
        }

        fired
    }
}
