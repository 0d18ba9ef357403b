// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Phases become `B`/`E` duration pairs, frames-in-flight becomes a counter
//! track, and everything else is an instant event.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use fresco_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
/// Events that carry no timestamp of their own are placed at the most recent
/// timestamp seen in the recording.
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut last_ts = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::VsyncTick(e) => {
                last_ts = ticks_to_us(e.now.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "VsyncTick",
                    "cat": "FrameRate",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "tick_index": e.tick_index,
                        "throttled": e.throttled,
                        "frames_pending": e.frames_pending,
                    }
                }));
            }
            RecordedEvent::PendingFrames(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "C",
                    "name": "FramesPending",
                    "cat": "FrameRate",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pending": e.frames_pending,
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::RenderPassesSet(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "RenderPassesSet",
                    "cat": "Delegated",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": e.layer_id,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "pass_count": e.pass_count,
                        "damage": [
                            e.root_damage.x,
                            e.root_damage.y,
                            e.root_damage.width,
                            e.root_damage.height,
                        ],
                    }
                }));
            }
            RecordedEvent::RenderPassesCleared(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "RenderPassesCleared",
                    "cat": "Delegated",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": e.layer_id,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "reason": format!("{:?}", e.reason),
                    }
                }));
            }
            RecordedEvent::Resource(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("Resource{:?}", e.kind),
                    "cat": "Resources",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "resource_id": e.resource_id,
                        "bytes": e.bytes,
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "PoolMemory",
                    "cat": "Resources",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "bytes": e.memory_usage_bytes,
                    }
                }));
            }
            RecordedEvent::FrameAck(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "FrameAck",
                    "cat": "Renderer",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "resource_count": e.resource_count,
                    }
                }));
            }
            RecordedEvent::ContextLost(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "ContextLost",
                    "cat": "Renderer",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": ticks_to_us(s.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": s.frame_index,
                        "throttled": s.throttled,
                        "frames_pending": s.frames_pending,
                        "pass_count": s.pass_count,
                        "quad_count": s.quad_count,
                        "begin_frame_us": ticks_to_us(s.begin_frame_ticks, timebase),
                        "append_passes_us": ticks_to_us(s.append_passes_ticks, timebase),
                        "append_quads_us": ticks_to_us(s.append_quads_ticks, timebase),
                        "submit_us": ticks_to_us(s.submit_ticks, timebase),
                    }
                }));
            }
            RecordedEvent::QuadsAppended(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "QuadsAppended",
                    "cat": "Rich",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": e.layer_id,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "target": [e.target_layer_id, e.target_index],
                        "quad_count": e.quad_count,
                        "shared_state_count": e.shared_state_count,
                    }
                }));
            }
            RecordedEvent::DamageRectsCount { frame_index, count } => {
                events.push(json!({
                    "ph": "i",
                    "name": "DamageRects",
                    "cat": "Rich",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "frame_index": frame_index,
                        "count": count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}
