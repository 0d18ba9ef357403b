// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame pacing with a bound on frames in flight.
//!
//! The [`FrameRateController`] turns ticks into
//! [`vsync_tick`](FrameRateControllerClient::vsync_tick) calls. A tick is
//! *throttled* when the number of frames begun but not yet finished has
//! reached [`FrameRateConfig::max_frames_pending`]; the client must not start
//! drawing on a throttled tick.
//!
//! # Tick modes
//!
//! - **Throttled**: ticks come from a [`TimeSource`], typically aligned to
//!   the display refresh.
//! - **Unthrottled**: there is no time source. The controller posts a
//!   manual tick to itself after every unthrottled tick and after every
//!   finished frame, so frames are produced as fast as the pipeline drains.
//!   At most one manual tick is outstanding; [`FrameRateController::poll`]
//!   delivers it.
//!
//! The client is passed to each call that may tick rather than stored, so the
//! controller can live next to its client inside the same owner.

use alloc::boxed::Box;

use crate::time::{Duration, HostTime};
use crate::time_source::TimeSource;

/// Receives ticks from a [`FrameRateController`].
pub trait FrameRateControllerClient {
    /// A tick arrived. `throttled` is `true` when too many frames are in
    /// flight to start another one.
    fn vsync_tick(&mut self, throttled: bool);
}

/// Configuration for the [`FrameRateController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRateConfig {
    /// Maximum number of frames begun but not yet finished.
    pub max_frames_pending: u32,
    /// Whether the output surface reports swap completion. Without it,
    /// finished frames are never signalled, so begun frames are not counted.
    pub swap_buffers_complete_supported: bool,
}

impl FrameRateConfig {
    /// The default limit on frames in flight.
    pub const DEFAULT_MAX_FRAMES_PENDING: u32 = 2;

    /// Double buffering with swap-complete acknowledgements.
    #[must_use]
    pub const fn double_buffered() -> Self {
        Self {
            max_frames_pending: Self::DEFAULT_MAX_FRAMES_PENDING,
            swap_buffers_complete_supported: true,
        }
    }

    /// At most one frame in flight; lowest latency.
    #[must_use]
    pub const fn single_buffered() -> Self {
        Self {
            max_frames_pending: 1,
            swap_buffers_complete_supported: true,
        }
    }

    /// An output surface that never acknowledges swaps.
    #[must_use]
    pub const fn without_swap_ack() -> Self {
        Self {
            max_frames_pending: Self::DEFAULT_MAX_FRAMES_PENDING,
            swap_buffers_complete_supported: false,
        }
    }
}

impl Default for FrameRateConfig {
    fn default() -> Self {
        Self::double_buffered()
    }
}

#[derive(Debug)]
enum TickSource {
    Throttled(Box<dyn TimeSource>),
    Unthrottled { manual_tick_pending: bool },
}

/// Paces frame production; see the [module docs](self).
#[derive(Debug)]
pub struct FrameRateController {
    source: TickSource,
    active: bool,
    max_frames_pending: u32,
    num_frames_pending: u32,
    swap_buffers_complete_supported: bool,
    tick_count: u64,
}

impl FrameRateController {
    /// Creates a controller that ticks from `time_source`.
    ///
    /// # Panics
    ///
    /// Panics if `config.max_frames_pending` is zero.
    #[must_use]
    pub fn with_time_source(config: FrameRateConfig, time_source: Box<dyn TimeSource>) -> Self {
        Self::new(config, TickSource::Throttled(time_source))
    }

    /// Creates a controller that ticks as fast as frames finish.
    ///
    /// # Panics
    ///
    /// Panics if `config.max_frames_pending` is zero.
    #[must_use]
    pub fn unthrottled(config: FrameRateConfig) -> Self {
        Self::new(
            config,
            TickSource::Unthrottled {
                manual_tick_pending: false,
            },
        )
    }

    fn new(config: FrameRateConfig, source: TickSource) -> Self {
        assert!(
            config.max_frames_pending > 0,
            "max_frames_pending must be at least 1"
        );
        Self {
            source,
            active: false,
            max_frames_pending: config.max_frames_pending,
            num_frames_pending: 0,
            swap_buffers_complete_supported: config.swap_buffers_complete_supported,
            tick_count: 0,
        }
    }

    /// Starts or stops ticking.
    pub fn set_active(&mut self, active: bool, now: HostTime) {
        if self.active == active {
            return;
        }
        self.active = active;
        match &mut self.source {
            TickSource::Throttled(ts) => ts.set_active(active, now),
            TickSource::Unthrottled {
                manual_tick_pending,
            } => *manual_tick_pending = active,
        }
    }

    /// Returns whether the controller is ticking.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns `true` if this controller has no time source.
    #[must_use]
    pub fn is_unthrottled(&self) -> bool {
        matches!(self.source, TickSource::Unthrottled { .. })
    }

    /// Changes the frames-in-flight limit.
    ///
    /// # Panics
    ///
    /// Panics if `max` is zero.
    pub fn set_max_frames_pending(&mut self, max: u32) {
        assert!(max > 0, "max_frames_pending must be at least 1");
        self.max_frames_pending = max;
    }

    /// The frames-in-flight limit.
    #[must_use]
    pub fn max_frames_pending(&self) -> u32 {
        self.max_frames_pending
    }

    /// Frames begun and not yet finished.
    #[must_use]
    pub fn num_frames_pending(&self) -> u32 {
        self.num_frames_pending
    }

    /// Number of ticks delivered to the client so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Enables or disables frame counting. See
    /// [`FrameRateConfig::swap_buffers_complete_supported`].
    pub fn set_swap_buffers_complete_supported(&mut self, supported: bool) {
        self.swap_buffers_complete_supported = supported;
    }

    /// Forwards new phase and period to the time source. No effect when
    /// unthrottled.
    pub fn set_timebase_and_interval(&mut self, timebase: HostTime, interval: Duration) {
        if let TickSource::Throttled(ts) = &mut self.source {
            ts.set_timebase_and_interval(timebase, interval);
        }
    }

    /// When the next time-source tick is due. Always `None` when unthrottled.
    #[must_use]
    pub fn next_tick_time(&self) -> Option<HostTime> {
        match &self.source {
            TickSource::Throttled(ts) => ts.next_tick_time(),
            TickSource::Unthrottled { .. } => None,
        }
    }

    /// The ideal time of the latest time-source tick.
    #[must_use]
    pub fn last_tick_time(&self) -> Option<HostTime> {
        match &self.source {
            TickSource::Throttled(ts) => ts.last_tick_time(),
            TickSource::Unthrottled { .. } => None,
        }
    }

    /// Returns `true` if a tick is scheduled: a manual tick is posted, or
    /// the time source is running.
    #[must_use]
    pub fn has_pending_tick(&self) -> bool {
        match &self.source {
            TickSource::Throttled(ts) => self.active && ts.is_active(),
            TickSource::Unthrottled {
                manual_tick_pending,
            } => self.active && *manual_tick_pending,
        }
    }

    /// Delivers at most one tick to `client`. Returns `true` if it did.
    pub fn poll(&mut self, now: HostTime, client: &mut dyn FrameRateControllerClient) -> bool {
        let fired = match &mut self.source {
            TickSource::Throttled(ts) => ts.poll(now),
            TickSource::Unthrottled {
                manual_tick_pending,
            } => core::mem::take(manual_tick_pending),
        };
        if !fired || !self.active {
            return false;
        }
        self.on_timer_tick(client);
        true
    }

    /// The client started producing a frame.
    pub fn did_begin_frame(&mut self) {
        if self.swap_buffers_complete_supported {
            self.num_frames_pending += 1;
        } else {
            self.post_manual_tick();
        }
    }

    /// A frame finished (its swap completed).
    pub fn did_finish_frame(&mut self) {
        debug_assert!(
            self.swap_buffers_complete_supported,
            "did_finish_frame without swap-complete support"
        );
        self.num_frames_pending = self.num_frames_pending.saturating_sub(1);
        self.post_manual_tick();
    }

    /// Forgets every frame in flight, e.g. after the output surface was lost.
    pub fn did_abort_all_pending_frames(&mut self) {
        self.num_frames_pending = 0;
    }

    fn on_timer_tick(&mut self, client: &mut dyn FrameRateControllerClient) {
        let throttled = self.num_frames_pending >= self.max_frames_pending;
        self.tick_count += 1;
        client.vsync_tick(throttled);
        if self.swap_buffers_complete_supported && !throttled {
            self.post_manual_tick();
        }
    }

    fn post_manual_tick(&mut self) {
        if !self.active {
            return;
        }
        if let TickSource::Unthrottled {
            manual_tick_pending,
        } = &mut self.source
        {
            *manual_tick_pending = true;
        }
    }
}
