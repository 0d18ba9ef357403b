// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry, host time, frame pacing, and tracing primitives for fresco.
//!
//! `fresco_core` holds the pieces of the compositor that do not know about
//! render passes or resources. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   TimeSource::poll(now)
//!       │ tick boundary crossed
//!       ▼
//!   FrameRateController ──► FrameRateControllerClient::vsync_tick(throttled)
//!       ▲                                  │
//!       │ did_begin_frame / did_finish_frame
//!       └──────────────────────────────────┘
//! ```
//!
//! **[`frame_rate`]** — Paces frame production against a tick source and
//! throttles to a bounded number of frames in flight.
//!
//! **[`time_source`]** — The [`TimeSource`](time_source::TimeSource) contract
//! and a timebase-aligned [`DelayBasedTimeSource`](time_source::DelayBasedTimeSource).
//!
//! **[`geometry`]** — Integer pixel rects and sizes, damage-rect union, and
//! matrix-aware clipped rect mapping.
//!
//! **[`transform`]** — Column-major 4×4 transform.
//!
//! **[`time`]** — Monotonic host time, durations, and timebase conversion.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with the zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-append
//!   quad events and damage-rect lists.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod frame_rate;
pub mod geometry;
pub mod time;
pub mod time_source;
pub mod trace;
pub mod transform;
