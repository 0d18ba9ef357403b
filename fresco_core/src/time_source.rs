// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Periodic tick sources.
//!
//! A [`TimeSource`] is polled with the current host time by whatever loop
//! owns the compositor context, and reports whether a tick boundary was
//! crossed since the last poll. Nothing here spawns threads or timers: the
//! owner decides when to poll, typically after sleeping for
//! [`DelayBasedTimeSource::pending_delay`].

use core::fmt;

use crate::time::{Duration, HostTime};

/// A source of periodic ticks.
pub trait TimeSource: fmt::Debug {
    /// Starts or stops ticking. `now` anchors the first tick on activation.
    fn set_active(&mut self, active: bool, now: HostTime);

    /// Returns whether the source is ticking.
    fn is_active(&self) -> bool;

    /// Changes the tick phase and period.
    ///
    /// Takes effect when the next tick is scheduled; an already-scheduled
    /// tick is not moved.
    fn set_timebase_and_interval(&mut self, timebase: HostTime, interval: Duration);

    /// The tick period.
    fn interval(&self) -> Duration;

    /// The ideal time of the most recent tick, if any fired.
    fn last_tick_time(&self) -> Option<HostTime>;

    /// The time the next tick is due, if active.
    fn next_tick_time(&self) -> Option<HostTime>;

    /// Returns `true` once if `now` has reached the next tick.
    fn poll(&mut self, now: HostTime) -> bool;
}

/// Ticks on boundaries `timebase + k * interval`.
///
/// Missed boundaries are coalesced: polling long after a tick was due fires
/// once and schedules the first boundary after `now`.
#[derive(Clone, Debug)]
pub struct DelayBasedTimeSource {
    timebase: HostTime,
    interval: Duration,
    next_tick: Option<HostTime>,
    last_tick: Option<HostTime>,
}

impl DelayBasedTimeSource {
    /// Creates an inactive source.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    #[must_use]
    pub fn new(timebase: HostTime, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "time source interval must be non-zero");
        Self {
            timebase,
            interval,
            next_tick: None,
            last_tick: None,
        }
    }

    /// Time left until the next tick, or `None` while inactive.
    #[must_use]
    pub fn pending_delay(&self, now: HostTime) -> Option<Duration> {
        self.next_tick.map(|t| t.saturating_duration_since(now))
    }

    /// First aligned boundary strictly after `now`.
    fn boundary_after(&self, now: HostTime) -> HostTime {
        if now < self.timebase {
            return self.timebase;
        }
        let period = self.interval.ticks();
        let elapsed = now.ticks() - self.timebase.ticks();
        let periods = elapsed / period + 1;
        HostTime(
            self.timebase
                .ticks()
                .saturating_add(periods.saturating_mul(period)),
        )
    }
}

impl TimeSource for DelayBasedTimeSource {
    fn set_active(&mut self, active: bool, now: HostTime) {
        match (active, self.next_tick.is_some()) {
            (true, false) => self.next_tick = Some(self.boundary_after(now)),
            (false, true) => self.next_tick = None,
            _ => {}
        }
    }

    fn is_active(&self) -> bool {
        self.next_tick.is_some()
    }

    fn set_timebase_and_interval(&mut self, timebase: HostTime, interval: Duration) {
        assert!(!interval.is_zero(), "time source interval must be non-zero");
        self.timebase = timebase;
        self.interval = interval;
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn last_tick_time(&self) -> Option<HostTime> {
        self.last_tick
    }

    fn next_tick_time(&self) -> Option<HostTime> {
        self.next_tick
    }

    fn poll(&mut self, now: HostTime) -> bool {
        let Some(due) = self.next_tick else {
            return false;
        };
        if now < due {
            return false;
        }
        let next = self.boundary_after(now);
        let latest = HostTime(next.ticks().saturating_sub(self.interval.ticks()));
        self.last_tick = Some(latest.max(due));
        self.next_tick = Some(next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> DelayBasedTimeSource {
        DelayBasedTimeSource::new(HostTime(0), Duration(16))
    }

    #[test]
    fn inactive_never_ticks() {
        let mut ts = source();
        assert!(!ts.poll(HostTime(1_000)));
        assert_eq!(ts.next_tick_time(), None);
        assert_eq!(ts.pending_delay(HostTime(0)), None);
    }

    #[test]
    fn ticks_on_aligned_boundaries() {
        let mut ts = source();
        ts.set_active(true, HostTime(5));
        assert_eq!(ts.next_tick_time(), Some(HostTime(16)));
        assert_eq!(ts.pending_delay(HostTime(5)), Some(Duration(11)));
        assert!(!ts.poll(HostTime(15)));
        assert!(ts.poll(HostTime(16)));
        assert!(!ts.poll(HostTime(16)));
        assert_eq!(ts.last_tick_time(), Some(HostTime(16)));
        assert_eq!(ts.next_tick_time(), Some(HostTime(32)));
    }

    #[test]
    fn missed_boundaries_coalesce() {
        let mut ts = source();
        ts.set_active(true, HostTime(0));
        assert!(ts.poll(HostTime(70)));
        assert_eq!(ts.last_tick_time(), Some(HostTime(64)));
        assert_eq!(ts.next_tick_time(), Some(HostTime(80)));
        assert!(!ts.poll(HostTime(79)));
    }

    #[test]
    fn first_tick_waits_for_timebase() {
        let mut ts = DelayBasedTimeSource::new(HostTime(100), Duration(10));
        ts.set_active(true, HostTime(3));
        assert_eq!(ts.next_tick_time(), Some(HostTime(100)));
    }

    #[test]
    fn deactivation_cancels_pending_tick() {
        let mut ts = source();
        ts.set_active(true, HostTime(0));
        ts.set_active(false, HostTime(8));
        assert!(!ts.is_active());
        assert!(!ts.poll(HostTime(16)));
    }

    #[test]
    fn new_interval_applies_after_next_tick() {
        let mut ts = source();
        ts.set_active(true, HostTime(0));
        ts.set_timebase_and_interval(HostTime(0), Duration(10));
        assert_eq!(ts.next_tick_time(), Some(HostTime(16)));
        assert!(ts.poll(HostTime(16)));
        assert_eq!(ts.next_tick_time(), Some(HostTime(20)));
        assert_eq!(ts.interval(), Duration(10));
    }

    #[test]
    #[should_panic(expected = "time source interval must be non-zero")]
    fn zero_interval_rejected() {
        let _ = DelayBasedTimeSource::new(HostTime(0), Duration::ZERO);
    }
}
