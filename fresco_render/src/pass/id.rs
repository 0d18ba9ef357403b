// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render pass identity.

use core::fmt;

/// Identifies a render pass as `(layer_id, index)`.
///
/// `layer_id` is the layer that produced the pass. `index` tells apart the
/// passes of one layer: index 0 is the pass a layer generates for its own
/// render surface, and passes a layer forwards on behalf of a delegated
/// compositor are numbered from 1.
///
/// Ids order by layer, then index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderPassId {
    /// Producing layer.
    pub layer_id: i32,
    /// Pass number within the layer.
    pub index: i32,
}

impl RenderPassId {
    /// The id of a pass that has not been set up yet.
    pub const INVALID: Self = Self::new(-1, -1);

    /// Creates an id.
    #[inline]
    #[must_use]
    pub const fn new(layer_id: i32, index: i32) -> Self {
        Self { layer_id, index }
    }

    /// Returns `true` if the id can name a real pass: the layer id is
    /// positive and the index is not negative.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.layer_id > 0 && self.index >= 0
    }
}

impl fmt::Debug for RenderPassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RenderPassId({}.{})", self.layer_id, self.index)
    }
}
