// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-group quad state.

use core::fmt;

use fresco_core::geometry::IntRect;
use fresco_core::transform::Transform3d;

/// Index of a [`SharedQuadState`] within the pass that owns it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SharedQuadStateId(usize);

impl SharedQuadStateId {
    /// Wraps a position in a pass's shared-quad-state list.
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in the owning pass's shared-quad-state list.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for SharedQuadStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedQuadStateId({})", self.0)
    }
}

/// Transform, clip, and opacity shared by a run of quads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharedQuadState {
    /// Maps content space into the target pass.
    pub content_to_target_transform: Transform3d,
    /// Part of the content that is visible, in content space.
    pub visible_content_rect: IntRect,
    /// Bounds of the drawn content in target space after clipping.
    pub clipped_rect_in_target: IntRect,
    /// Clip in target space; meaningful only when `is_clipped`.
    pub clip_rect: IntRect,
    /// Whether `clip_rect` applies.
    pub is_clipped: bool,
    /// Opacity multiplier for every quad in the group.
    pub opacity: f32,
}

impl SharedQuadState {
    /// Creates a state.
    #[must_use]
    pub const fn new(
        content_to_target_transform: Transform3d,
        visible_content_rect: IntRect,
        clipped_rect_in_target: IntRect,
        clip_rect: IntRect,
        is_clipped: bool,
        opacity: f32,
    ) -> Self {
        Self {
            content_to_target_transform,
            visible_content_rect,
            clipped_rect_in_target,
            clip_rect,
            is_clipped,
            opacity,
        }
    }

    /// An unclipped, fully opaque state with an identity transform whose
    /// content covers `rect`.
    #[must_use]
    pub const fn unclipped(rect: IntRect) -> Self {
        Self::new(Transform3d::IDENTITY, rect, rect, IntRect::new(0, 0, 0, 0), false, 1.0)
    }
}

impl Default for SharedQuadState {
    fn default() -> Self {
        Self::unclipped(IntRect::default())
    }
}
