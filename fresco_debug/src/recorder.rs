// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! [`on_damage_rects`](TraceSink::on_damage_rects) stores only the count.

use fresco_core::time::HostTime;
use fresco_core::trace::{
    ClearReason, ContextLostEvent, DamageRect, FrameAckEvent, FrameSummary, PendingChange,
    PendingFramesEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, QuadsAppendedEvent,
    RenderPassesClearedEvent, RenderPassesSetEvent, ResourceEvent, ResourceEventKind, TraceSink,
    VsyncTickEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_VSYNC_TICK: u8 = 1;
const TAG_PENDING_FRAMES: u8 = 2;
const TAG_PHASE_BEGIN: u8 = 3;
const TAG_PHASE_END: u8 = 4;
const TAG_RENDER_PASSES_SET: u8 = 5;
const TAG_RENDER_PASSES_CLEARED: u8 = 6;
const TAG_RESOURCE: u8 = 7;
const TAG_FRAME_ACK: u8 = 8;
const TAG_CONTEXT_LOST: u8 = 9;
const TAG_FRAME_SUMMARY: u8 = 10;
const TAG_QUADS_APPENDED: u8 = 11;
const TAG_DAMAGE_RECTS_COUNT: u8 = 12;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::BeginFrame => 0,
            PhaseKind::AppendPasses => 1,
            PhaseKind::AppendQuads => 2,
            PhaseKind::Submit => 3,
        });
    }

    fn write_damage(&mut self, r: DamageRect) {
        self.write_i32(r.x);
        self.write_i32(r.y);
        self.write_u32(r.width);
        self.write_u32(r.height);
    }
}

impl TraceSink for RecorderSink {
    fn on_vsync_tick(&mut self, e: &VsyncTickEvent) {
        self.write_u8(TAG_VSYNC_TICK);
        self.write_u64(e.tick_index);
        self.write_u64(e.now.ticks());
        self.write_bool(e.throttled);
        self.write_u32(e.frames_pending);
    }

    fn on_pending_frames(&mut self, e: &PendingFramesEvent) {
        self.write_u8(TAG_PENDING_FRAMES);
        self.write_u64(e.frame_index);
        self.write_u8(match e.change {
            PendingChange::Begin => 0,
            PendingChange::Finish => 1,
            PendingChange::AbortAll => 2,
        });
        self.write_u32(e.frames_pending);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_render_passes_set(&mut self, e: &RenderPassesSetEvent) {
        self.write_u8(TAG_RENDER_PASSES_SET);
        self.write_u64(e.frame_index);
        self.write_i32(e.layer_id);
        self.write_u32(e.pass_count);
        self.write_damage(e.root_damage);
    }

    fn on_render_passes_cleared(&mut self, e: &RenderPassesClearedEvent) {
        self.write_u8(TAG_RENDER_PASSES_CLEARED);
        self.write_u64(e.frame_index);
        self.write_i32(e.layer_id);
        self.write_u8(match e.reason {
            ClearReason::Explicit => 0,
            ClearReason::OutputSurfaceLost => 1,
        });
    }

    fn on_resource(&mut self, e: &ResourceEvent) {
        self.write_u8(TAG_RESOURCE);
        self.write_u64(e.frame_index);
        self.write_u8(match e.kind {
            ResourceEventKind::Allocated => 0,
            ResourceEventKind::Recycled => 1,
            ResourceEventKind::Returned => 2,
            ResourceEventKind::Destroyed => 3,
        });
        self.write_u32(e.resource_id);
        self.write_u64(e.bytes);
        self.write_u64(e.memory_usage_bytes);
    }

    fn on_frame_ack(&mut self, e: &FrameAckEvent) {
        self.write_u8(TAG_FRAME_ACK);
        self.write_u64(e.frame_index);
        self.write_u64(e.timestamp.ticks());
        self.write_u32(e.resource_count);
    }

    fn on_context_lost(&mut self, e: &ContextLostEvent) {
        self.write_u8(TAG_CONTEXT_LOST);
        self.write_u64(e.frame_index);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u64(s.now.ticks());
        self.write_bool(s.throttled);
        self.write_u32(s.frames_pending);
        self.write_u32(s.pass_count);
        self.write_u32(s.quad_count);
        self.write_u64(s.begin_frame_ticks);
        self.write_u64(s.append_passes_ticks);
        self.write_u64(s.append_quads_ticks);
        self.write_u64(s.submit_ticks);
    }

    fn on_quads_appended(&mut self, e: &QuadsAppendedEvent) {
        self.write_u8(TAG_QUADS_APPENDED);
        self.write_u64(e.frame_index);
        self.write_i32(e.layer_id);
        self.write_i32(e.target_layer_id);
        self.write_i32(e.target_index);
        self.write_u32(e.quad_count);
        self.write_u32(e.shared_state_count);
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        self.write_u8(TAG_DAMAGE_RECTS_COUNT);
        self.write_u64(frame_index);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "damage rect count capped at u32::MAX for recording"
        )]
        self.write_u32(rects.len().min(u32::MAX as usize) as u32);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`VsyncTickEvent`].
    VsyncTick(VsyncTickEvent),
    /// A [`PendingFramesEvent`].
    PendingFrames(PendingFramesEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`RenderPassesSetEvent`].
    RenderPassesSet(RenderPassesSetEvent),
    /// A [`RenderPassesClearedEvent`].
    RenderPassesCleared(RenderPassesClearedEvent),
    /// A [`ResourceEvent`].
    Resource(ResourceEvent),
    /// A [`FrameAckEvent`].
    FrameAck(FrameAckEvent),
    /// A [`ContextLostEvent`].
    ContextLost(ContextLostEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
    /// A [`QuadsAppendedEvent`].
    QuadsAppended(QuadsAppendedEvent),
    /// Damage-rect count for a frame.
    DamageRectsCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of damage rects.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|b| b != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::BeginFrame,
            1 => PhaseKind::AppendPasses,
            2 => PhaseKind::AppendQuads,
            _ => PhaseKind::Submit,
        })
    }

    fn read_damage(&mut self) -> Option<DamageRect> {
        Some(DamageRect {
            x: self.read_i32()?,
            y: self.read_i32()?,
            width: self.read_u32()?,
            height: self.read_u32()?,
        })
    }

    fn decode_vsync_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::VsyncTick(VsyncTickEvent {
            tick_index: self.read_u64()?,
            now: self.read_time()?,
            throttled: self.read_bool()?,
            frames_pending: self.read_u32()?,
        }))
    }

    fn decode_pending_frames(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let change = match self.read_u8()? {
            0 => PendingChange::Begin,
            1 => PendingChange::Finish,
            _ => PendingChange::AbortAll,
        };
        Some(RecordedEvent::PendingFrames(PendingFramesEvent {
            frame_index,
            change,
            frames_pending: self.read_u32()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_render_passes_set(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RenderPassesSet(RenderPassesSetEvent {
            frame_index: self.read_u64()?,
            layer_id: self.read_i32()?,
            pass_count: self.read_u32()?,
            root_damage: self.read_damage()?,
        }))
    }

    fn decode_render_passes_cleared(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let layer_id = self.read_i32()?;
        let reason = match self.read_u8()? {
            0 => ClearReason::Explicit,
            _ => ClearReason::OutputSurfaceLost,
        };
        Some(RecordedEvent::RenderPassesCleared(RenderPassesClearedEvent {
            frame_index,
            layer_id,
            reason,
        }))
    }

    fn decode_resource(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let kind = match self.read_u8()? {
            0 => ResourceEventKind::Allocated,
            1 => ResourceEventKind::Recycled,
            2 => ResourceEventKind::Returned,
            _ => ResourceEventKind::Destroyed,
        };
        Some(RecordedEvent::Resource(ResourceEvent {
            frame_index,
            kind,
            resource_id: self.read_u32()?,
            bytes: self.read_u64()?,
            memory_usage_bytes: self.read_u64()?,
        }))
    }

    fn decode_frame_ack(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameAck(FrameAckEvent {
            frame_index: self.read_u64()?,
            timestamp: self.read_time()?,
            resource_count: self.read_u32()?,
        }))
    }

    fn decode_context_lost(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ContextLost(ContextLostEvent {
            frame_index: self.read_u64()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            now: self.read_time()?,
            throttled: self.read_bool()?,
            frames_pending: self.read_u32()?,
            pass_count: self.read_u32()?,
            quad_count: self.read_u32()?,
            begin_frame_ticks: self.read_u64()?,
            append_passes_ticks: self.read_u64()?,
            append_quads_ticks: self.read_u64()?,
            submit_ticks: self.read_u64()?,
        }))
    }

    fn decode_quads_appended(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::QuadsAppended(QuadsAppendedEvent {
            frame_index: self.read_u64()?,
            layer_id: self.read_i32()?,
            target_layer_id: self.read_i32()?,
            target_index: self.read_i32()?,
            quad_count: self.read_u32()?,
            shared_state_count: self.read_u32()?,
        }))
    }

    fn decode_damage_rects_count(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::DamageRectsCount { frame_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_VSYNC_TICK => self.decode_vsync_tick(),
            TAG_PENDING_FRAMES => self.decode_pending_frames(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_RENDER_PASSES_SET => self.decode_render_passes_set(),
            TAG_RENDER_PASSES_CLEARED => self.decode_render_passes_cleared(),
            TAG_RESOURCE => self.decode_resource(),
            TAG_FRAME_ACK => self.decode_frame_ack(),
            TAG_CONTEXT_LOST => self.decode_context_lost(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            TAG_QUADS_APPENDED => self.decode_quads_appended(),
            TAG_DAMAGE_RECTS_COUNT => self.decode_damage_rects_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
