// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Destinations for appended quads and render passes.

use alloc::vec::Vec;

use crate::pass::{DrawQuad, RenderPass, RenderPassId, SharedQuadState, SharedQuadStateId};

/// Per-append context and results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppendQuadsData {
    /// The pass quads are being appended to.
    pub render_pass_id: RenderPassId,
    /// Set when content outside the target surface occluded appended quads.
    pub had_occlusion_from_outside_target_surface: bool,
    /// Set when an appended tile was not fully ready.
    pub had_incomplete_tile: bool,
    /// Number of tiles drawn as placeholders.
    pub num_missing_tiles: u64,
}

impl AppendQuadsData {
    /// Context for appending into `render_pass_id`.
    #[must_use]
    pub const fn new(render_pass_id: RenderPassId) -> Self {
        Self {
            render_pass_id,
            had_occlusion_from_outside_target_surface: false,
            had_incomplete_tile: false,
            num_missing_tiles: 0,
        }
    }
}

/// Receives quads for one target pass.
pub trait QuadSink {
    /// Stores a shared quad state and returns the handle quads should use.
    fn use_shared_quad_state(&mut self, state: SharedQuadState) -> SharedQuadStateId;

    /// Appends a quad. Returns `false` if the quad was culled.
    fn append(&mut self, quad: DrawQuad, data: &mut AppendQuadsData) -> bool;
}

/// Receives whole render passes.
pub trait RenderPassSink {
    /// Appends a pass.
    fn append_render_pass(&mut self, pass: RenderPass);
}

impl RenderPassSink for Vec<RenderPass> {
    fn append_render_pass(&mut self, pass: RenderPass) {
        self.push(pass);
    }
}

/// A [`QuadSink`] that writes straight into a pass, culling nothing.
#[derive(Debug)]
pub struct RenderPassQuadSink<'a> {
    pass: &'a mut RenderPass,
}

impl<'a> RenderPassQuadSink<'a> {
    /// Appends into `pass`.
    pub fn new(pass: &'a mut RenderPass) -> Self {
        Self { pass }
    }
}

impl QuadSink for RenderPassQuadSink<'_> {
    fn use_shared_quad_state(&mut self, state: SharedQuadState) -> SharedQuadStateId {
        self.pass.append_shared_quad_state(state)
    }

    fn append(&mut self, quad: DrawQuad, _data: &mut AppendQuadsData) -> bool {
        self.pass.append_quad(quad);
        true
    }
}
