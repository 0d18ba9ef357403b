// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-loop instrumentation.
//!
//! [`TraceSink`] has one method per event, each defaulting to a no-op. The
//! compositor's frame loop emits events at its call sites; the data types in
//! this workspace never trace on their own.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. With the `trace`
//! feature **off**, every `Tracer` method compiles to nothing. With it **on**,
//! each method is a single `Option` branch followed by the dispatch.
//!
//! Events carry primitive fields (layer ids, pass indices, byte counts) so
//! this crate does not depend on render-pass or resource types.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies.
//! - `trace-rich` (implies `trace`) adds [`QuadsAppendedEvent`] and
//!   damage-rect lists.

use crate::geometry::IntRect;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// A measured stage of one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Receiving the child's frame and handing it to the delegated layer.
    BeginFrame,
    /// Appending contributing render passes to the parent pass list.
    AppendPasses,
    /// Merging quads into target passes.
    AppendQuads,
    /// Sending resources and the frame to the parent.
    Submit,
}

impl PhaseKind {
    /// All phases in frame order.
    pub const ALL: [Self; 4] = [
        Self::BeginFrame,
        Self::AppendPasses,
        Self::AppendQuads,
        Self::Submit,
    ];

    const fn index(self) -> usize {
        match self {
            Self::BeginFrame => 0,
            Self::AppendPasses => 1,
            Self::AppendQuads => 2,
            Self::Submit => 3,
        }
    }
}

/// How the frames-in-flight count changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PendingChange {
    /// A frame was begun.
    Begin,
    /// A frame finished.
    Finish,
    /// All frames in flight were dropped.
    AbortAll,
}

/// Why a delegated layer dropped its render passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClearReason {
    /// The owner cleared the layer.
    Explicit,
    /// The output surface was lost.
    OutputSurfaceLost,
}

/// What happened to a pooled resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceEventKind {
    /// The pool asked the provider for a new resource.
    Allocated,
    /// The pool handed out a resource from its free list.
    Recycled,
    /// A resource went back onto the free list.
    Returned,
    /// The pool deleted a resource to stay within budget.
    Destroyed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// An axis-aligned damage rectangle in target pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl From<IntRect> for DamageRect {
    fn from(r: IntRect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

/// Emitted when the frame-rate controller delivers a tick.
#[derive(Clone, Copy, Debug)]
pub struct VsyncTickEvent {
    /// Monotonic tick counter; doubles as the frame index of other events.
    pub tick_index: u64,
    /// Host time of the tick.
    pub now: HostTime,
    /// Whether the tick was throttled.
    pub throttled: bool,
    /// Frames in flight when the tick was delivered.
    pub frames_pending: u32,
}

/// Emitted when the frames-in-flight count changes.
#[derive(Clone, Copy, Debug)]
pub struct PendingFramesEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// What changed.
    pub change: PendingChange,
    /// Frames in flight after the change.
    pub frames_pending: u32,
    /// Host time of the change.
    pub timestamp: HostTime,
}

/// Marks the start of a phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase.
    pub phase: PhaseKind,
    /// Host time at the start.
    pub timestamp: HostTime,
}

/// Marks the end of a phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase.
    pub phase: PhaseKind,
    /// Host time at the end.
    pub timestamp: HostTime,
}

/// Emitted after a delegated layer takes a new list of render passes.
#[derive(Clone, Copy, Debug)]
pub struct RenderPassesSetEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Id of the delegated layer.
    pub layer_id: i32,
    /// Number of passes now owned.
    pub pass_count: u32,
    /// Root pass damage after absorbing the previous root's damage.
    pub root_damage: DamageRect,
}

/// Emitted when a delegated layer drops its render passes.
#[derive(Clone, Copy, Debug)]
pub struct RenderPassesClearedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Id of the delegated layer.
    pub layer_id: i32,
    /// Why the passes were dropped.
    pub reason: ClearReason,
}

/// Emitted for resource pool traffic.
#[derive(Clone, Copy, Debug)]
pub struct ResourceEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// What happened.
    pub kind: ResourceEventKind,
    /// Provider id of the resource.
    pub resource_id: u32,
    /// Size of the resource in bytes.
    pub bytes: u64,
    /// Pool usage after the event.
    pub memory_usage_bytes: u64,
}

/// Emitted when the parent acknowledges a frame and returns resources.
#[derive(Clone, Copy, Debug)]
pub struct FrameAckEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of the acknowledgement.
    pub timestamp: HostTime,
    /// Number of resources returned.
    pub resource_count: u32,
}

/// Emitted when the output surface's context is lost.
#[derive(Clone, Copy, Debug)]
pub struct ContextLostEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time the loss was noticed.
    pub timestamp: HostTime,
}

/// Per-frame summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of the tick that started the frame.
    pub now: HostTime,
    /// Whether the tick was throttled (no frame was drawn).
    pub throttled: bool,
    /// Frames in flight at the tick.
    pub frames_pending: u32,
    /// Render passes appended to the parent.
    pub pass_count: u32,
    /// Quads appended to the parent.
    pub quad_count: u32,
    /// Begin-frame duration in ticks (0 if not measured).
    pub begin_frame_ticks: u64,
    /// Pass-append duration in ticks (0 if not measured).
    pub append_passes_ticks: u64,
    /// Quad-append duration in ticks (0 if not measured).
    pub append_quads_ticks: u64,
    /// Submit duration in ticks (0 if not measured).
    pub submit_ticks: u64,
}

/// Quads merged from one delegated pass into a target pass.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct QuadsAppendedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Id of the delegated layer.
    pub layer_id: i32,
    /// Layer id of the target pass.
    pub target_layer_id: i32,
    /// Index of the target pass.
    pub target_index: i32,
    /// Quads appended.
    pub quad_count: u32,
    /// Shared quad states appended.
    pub shared_state_count: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives frame-loop events. Every method defaults to a no-op.
pub trait TraceSink {
    /// A tick was delivered.
    fn on_vsync_tick(&mut self, e: &VsyncTickEvent) {
        _ = e;
    }

    /// The frames-in-flight count changed.
    fn on_pending_frames(&mut self, e: &PendingFramesEvent) {
        _ = e;
    }

    /// A phase started.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// A phase ended.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// A delegated layer took new passes.
    fn on_render_passes_set(&mut self, e: &RenderPassesSetEvent) {
        _ = e;
    }

    /// A delegated layer dropped its passes.
    fn on_render_passes_cleared(&mut self, e: &RenderPassesClearedEvent) {
        _ = e;
    }

    /// The resource pool allocated, recycled, returned, or destroyed a
    /// resource.
    fn on_resource(&mut self, e: &ResourceEvent) {
        _ = e;
    }

    /// The parent acknowledged a frame.
    fn on_frame_ack(&mut self, e: &FrameAckEvent) {
        _ = e;
    }

    /// The context was lost.
    fn on_context_lost(&mut self, e: &ContextLostEvent) {
        _ = e;
    }

    /// A frame finished; here is its summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Quads were merged into a target pass (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_quads_appended(&mut self, e: &QuadsAppendedEvent) {
        _ = e;
    }

    /// Per-frame damage rects (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        _ = (frame_index, rects);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Expands to a `Tracer` method that forwards one event reference.
macro_rules! forward {
    ($(#[$doc:meta])* $name:ident => $method:ident($ty:ty)) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$ty) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards everything.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`VsyncTickEvent`].
        vsync_tick => on_vsync_tick(VsyncTickEvent)
    );
    forward!(
        /// Emits a [`PendingFramesEvent`].
        pending_frames => on_pending_frames(PendingFramesEvent)
    );
    forward!(
        /// Emits a [`PhaseBeginEvent`].
        phase_begin => on_phase_begin(PhaseBeginEvent)
    );
    forward!(
        /// Emits a [`PhaseEndEvent`].
        phase_end => on_phase_end(PhaseEndEvent)
    );
    forward!(
        /// Emits a [`RenderPassesSetEvent`].
        render_passes_set => on_render_passes_set(RenderPassesSetEvent)
    );
    forward!(
        /// Emits a [`RenderPassesClearedEvent`].
        render_passes_cleared => on_render_passes_cleared(RenderPassesClearedEvent)
    );
    forward!(
        /// Emits a [`ResourceEvent`].
        resource => on_resource(ResourceEvent)
    );
    forward!(
        /// Emits a [`FrameAckEvent`].
        frame_ack => on_frame_ack(FrameAckEvent)
    );
    forward!(
        /// Emits a [`ContextLostEvent`].
        context_lost => on_context_lost(ContextLostEvent)
    );
    forward!(
        /// Emits a [`FrameSummary`].
        frame_summary => on_frame_summary(FrameSummary)
    );

    /// Emits a [`QuadsAppendedEvent`] (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn quads_appended(&mut self, e: &QuadsAppendedEvent) {
        if let Some(s) = &mut self.sink {
            s.on_quads_appended(e);
        }
    }

    /// Emits damage rects (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        if let Some(s) = &mut self.sink {
            s.on_damage_rects(frame_index, rects);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps and counts during a frame.
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    tick: VsyncTickEvent,
    phase_starts: [Option<HostTime>; 4],
    phase_ends: [Option<HostTime>; 4],
    pass_count: u32,
    quad_count: u32,
}

impl FrameSummaryBuilder {
    /// Starts a summary for the frame opened by `tick`.
    #[must_use]
    pub fn new(tick: &VsyncTickEvent) -> Self {
        Self {
            tick: *tick,
            phase_starts: [None; 4],
            phase_ends: [None; 4],
            pass_count: 0,
            quad_count: 0,
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_starts[phase.index()] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_ends[phase.index()] = Some(t);
    }

    /// Adds appended render passes.
    pub fn add_passes(&mut self, n: u32) {
        self.pass_count += n;
    }

    /// Adds appended quads.
    pub fn add_quads(&mut self, n: u32) {
        self.quad_count += n;
    }

    /// Produces the summary.
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.tick.tick_index,
            now: self.tick.now,
            throttled: self.tick.throttled,
            frames_pending: self.tick.frames_pending,
            pass_count: self.pass_count,
            quad_count: self.quad_count,
            begin_frame_ticks: self.phase_duration(PhaseKind::BeginFrame),
            append_passes_ticks: self.phase_duration(PhaseKind::AppendPasses),
            append_quads_ticks: self.phase_duration(PhaseKind::AppendQuads),
            submit_ticks: self.phase_duration(PhaseKind::Submit),
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let i = phase.index();
        match (self.phase_starts[i], self.phase_ends[i]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).ticks(),
            _ => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
