// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for fresco
//! diagnostics.
//!
//! This crate provides [`TraceSink`](fresco_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`] — compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`] — writes Chrome Trace Event Format JSON from
//!   recorded bytes.
//! - [`TeeSink`] — forwards every event to two sinks.

pub mod chrome;
pub mod pretty;
pub mod recorder;

mod tee;

pub use tee::TeeSink;
