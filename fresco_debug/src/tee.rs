// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use fresco_core::trace::{
    ContextLostEvent, DamageRect, FrameAckEvent, FrameSummary, PendingFramesEvent,
    PhaseBeginEvent, PhaseEndEvent, QuadsAppendedEvent, RenderPassesClearedEvent,
    RenderPassesSetEvent, ResourceEvent, TraceSink, VsyncTickEvent,
};

/// A [`TraceSink`] that forwards every event to two sinks, `first` then
/// `second`.
///
/// Lets a single [`Tracer`](fresco_core::trace::Tracer) feed a live printer
/// and a recorder at once.
#[derive(Debug)]
pub struct TeeSink<A, B> {
    /// Receives each event first.
    pub first: A,
    /// Receives each event second.
    pub second: B,
}

impl<A: TraceSink, B: TraceSink> TeeSink<A, B> {
    /// Creates a tee over two sinks.
    #[must_use]
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Splits the tee back into its two sinks.
    #[must_use]
    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

macro_rules! forward {
    ($($name:ident($ty:ty)),* $(,)?) => {
        $(
            fn $name(&mut self, e: &$ty) {
                self.first.$name(e);
                self.second.$name(e);
            }
        )*
    };
}

impl<A: TraceSink, B: TraceSink> TraceSink for TeeSink<A, B> {
    forward! {
        on_vsync_tick(VsyncTickEvent),
        on_pending_frames(PendingFramesEvent),
        on_phase_begin(PhaseBeginEvent),
        on_phase_end(PhaseEndEvent),
        on_render_passes_set(RenderPassesSetEvent),
        on_render_passes_cleared(RenderPassesClearedEvent),
        on_resource(ResourceEvent),
        on_frame_ack(FrameAckEvent),
        on_context_lost(ContextLostEvent),
        on_frame_summary(FrameSummary),
        on_quads_appended(QuadsAppendedEvent),
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        self.first.on_damage_rects(frame_index, rects);
        self.second.on_damage_rects(frame_index, rects);
    }
}
