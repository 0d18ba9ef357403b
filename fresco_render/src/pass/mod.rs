// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render pass data model.
//!
//! A frame is an ordered list of [`RenderPass`]es in draw order: every pass
//! comes after the passes it draws through [`Material::RenderPass`] quads, and
//! the last pass is the root. Each pass owns its quads and the
//! [`SharedQuadState`]s they point at by index.

mod filter;
mod id;
mod quad;
mod render_pass;
mod shared_state;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

pub use filter::{FilterOperation, FilterOperations};
pub use id::RenderPassId;
pub use quad::{
    Color, DrawQuad, EdgeAntiAliasing, IoSurfaceOrientation, Material, RenderPassQuad,
    TextureQuad, TileQuad, VideoPlane,
};
pub use render_pass::RenderPass;
pub use shared_state::{SharedQuadState, SharedQuadStateId};

/// Passes in draw order; the last one is the root.
pub type RenderPassList = Vec<RenderPass>;

/// Position of each pass in a [`RenderPassList`], by id.
pub type RenderPassIndex = BTreeMap<RenderPassId, usize>;
