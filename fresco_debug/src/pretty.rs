// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use fresco_core::time::{HostTime, Timebase};
use fresco_core::trace::{
    ClearReason, ContextLostEvent, DamageRect, FrameAckEvent, FrameSummary, PendingChange,
    PendingFramesEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, QuadsAppendedEvent,
    RenderPassesClearedEvent, RenderPassesSetEvent, ResourceEvent, ResourceEventKind, TraceSink,
    VsyncTickEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ticks_to_us(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_nanos(ticks) as f64 / 1000.0
    }

    fn host_us(&self, t: HostTime) -> f64 {
        self.ticks_to_us(t.ticks())
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::BeginFrame => "begin-frame",
        PhaseKind::AppendPasses => "append-passes",
        PhaseKind::AppendQuads => "append-quads",
        PhaseKind::Submit => "submit",
    }
}

fn resource_kind_name(kind: ResourceEventKind) -> &'static str {
    match kind {
        ResourceEventKind::Allocated => "alloc",
        ResourceEventKind::Recycled => "recycle",
        ResourceEventKind::Returned => "return",
        ResourceEventKind::Destroyed => "destroy",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_vsync_tick(&mut self, e: &VsyncTickEvent) {
        let mode = if e.throttled { "THROTTLED" } else { "ok" };
        let _ = writeln!(
            self.writer,
            "[vsync] tick={} now={:.1}µs pending={} {mode}",
            e.tick_index,
            self.host_us(e.now),
            e.frames_pending,
        );
    }

    fn on_pending_frames(&mut self, e: &PendingFramesEvent) {
        let change = match e.change {
            PendingChange::Begin => "begin",
            PendingChange::Finish => "finish",
            PendingChange::AbortAll => "abort-all",
        };
        let _ = writeln!(
            self.writer,
            "[pending] frame={} {change} pending={} at {:.1}µs",
            e.frame_index,
            e.frames_pending,
            self.host_us(e.timestamp),
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            phase_name(e.phase),
            self.host_us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.1}µs",
            e.frame_index,
            phase_name(e.phase),
            self.host_us(e.timestamp),
        );
    }

    fn on_render_passes_set(&mut self, e: &RenderPassesSetEvent) {
        let d = e.root_damage;
        let _ = writeln!(
            self.writer,
            "[passes:set] frame={} layer={} passes={} damage={}x{}+{}+{}",
            e.frame_index, e.layer_id, e.pass_count, d.width, d.height, d.x, d.y,
        );
    }

    fn on_render_passes_cleared(&mut self, e: &RenderPassesClearedEvent) {
        let reason = match e.reason {
            ClearReason::Explicit => "explicit",
            ClearReason::OutputSurfaceLost => "output-surface-lost",
        };
        let _ = writeln!(
            self.writer,
            "[passes:clear] frame={} layer={} reason={reason}",
            e.frame_index, e.layer_id,
        );
    }

    fn on_resource(&mut self, e: &ResourceEvent) {
        let _ = writeln!(
            self.writer,
            "[resource] frame={} {} id={} bytes={} usage={}",
            e.frame_index,
            resource_kind_name(e.kind),
            e.resource_id,
            e.bytes,
            e.memory_usage_bytes,
        );
    }

    fn on_frame_ack(&mut self, e: &FrameAckEvent) {
        let _ = writeln!(
            self.writer,
            "[ack] frame={} resources={} at {:.1}µs",
            e.frame_index,
            e.resource_count,
            self.host_us(e.timestamp),
        );
    }

    fn on_context_lost(&mut self, e: &ContextLostEvent) {
        let _ = writeln!(
            self.writer,
            "[context] frame={} LOST at {:.1}µs",
            e.frame_index,
            self.host_us(e.timestamp),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let mode = if s.throttled { "THROTTLED" } else { "ok" };
        let _ = writeln!(
            self.writer,
            "[summary] frame={} pending={} passes={} quads={} begin={:.1}µs \
             passes={:.1}µs quads={:.1}µs submit={:.1}µs {mode}",
            s.frame_index,
            s.frames_pending,
            s.pass_count,
            s.quad_count,
            self.ticks_to_us(s.begin_frame_ticks),
            self.ticks_to_us(s.append_passes_ticks),
            self.ticks_to_us(s.append_quads_ticks),
            self.ticks_to_us(s.submit_ticks),
        );
    }

    fn on_quads_appended(&mut self, e: &QuadsAppendedEvent) {
        let _ = writeln!(
            self.writer,
            "[quads] frame={} layer={} -> target=({}, {}) quads={} states={}",
            e.frame_index,
            e.layer_id,
            e.target_layer_id,
            e.target_index,
            e.quad_count,
            e.shared_state_count,
        );
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        let _ = writeln!(
            self.writer,
            "[damage] frame={frame_index} rects={}",
            rects.len(),
        );
    }
}
