// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single composited draw target.

use alloc::vec::Vec;

use fresco_core::geometry::IntRect;
use fresco_core::transform::Transform3d;
use kurbo::Rect;

use super::filter::FilterOperations;
use super::id::RenderPassId;
use super::quad::DrawQuad;
use super::shared_state::{SharedQuadState, SharedQuadStateId};

/// One draw target: where it lands, what changed, and the quads that fill it.
///
/// A pass is set up in two steps. [`set_new`](Self::set_new) or
/// [`set_all`](Self::set_all) give it an identity and geometry; the
/// quad-appending phase then fills [`quad_list`](Self::quad_list) and
/// [`shared_quad_state_list`](Self::shared_quad_state_list). Setting up a pass
/// that already has content is a logic error and panics.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPass {
    /// Identity.
    pub id: RenderPassId,
    /// Bounds of the target in target pixels.
    pub output_rect: IntRect,
    /// Region of the target that changed since the previous frame.
    pub damage_rect: Rect,
    /// Maps target space to the root target.
    pub transform_to_root_target: Transform3d,
    /// Whether the target starts transparent rather than opaque.
    pub has_transparent_background: bool,
    /// Whether content outside this target occludes it.
    pub has_occlusion_from_outside_target_surface: bool,
    /// Filters applied to the pass output.
    pub filters: FilterOperations,
    /// Filters applied to what is behind the pass.
    pub background_filters: FilterOperations,
    /// Quads in draw order.
    pub quad_list: Vec<DrawQuad>,
    /// States referenced by `quad_list`.
    pub shared_quad_state_list: Vec<SharedQuadState>,
}

impl Default for RenderPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass {
    /// An unset pass: invalid id, transparent background, no content.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: RenderPassId::INVALID,
            output_rect: IntRect::default(),
            damage_rect: Rect::ZERO,
            transform_to_root_target: Transform3d::IDENTITY,
            has_transparent_background: true,
            has_occlusion_from_outside_target_surface: false,
            filters: FilterOperations::new(),
            background_filters: FilterOperations::new(),
            quad_list: Vec::new(),
            shared_quad_state_list: Vec::new(),
        }
    }

    /// Sets identity and geometry, leaving the flags and filters alone.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not valid or the pass already has content.
    pub fn set_new(
        &mut self,
        id: RenderPassId,
        output_rect: IntRect,
        damage_rect: Rect,
        transform_to_root_target: Transform3d,
    ) {
        self.assert_settable(id);
        self.id = id;
        self.output_rect = output_rect;
        self.damage_rect = damage_rect;
        self.transform_to_root_target = transform_to_root_target;
    }

    /// Sets every attribute except content.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not valid or the pass already has content.
    pub fn set_all(
        &mut self,
        id: RenderPassId,
        output_rect: IntRect,
        damage_rect: Rect,
        transform_to_root_target: Transform3d,
        has_transparent_background: bool,
        has_occlusion_from_outside_target_surface: bool,
        filters: FilterOperations,
        background_filters: FilterOperations,
    ) {
        self.set_new(id, output_rect, damage_rect, transform_to_root_target);
        self.has_transparent_background = has_transparent_background;
        self.has_occlusion_from_outside_target_surface = has_occlusion_from_outside_target_surface;
        self.filters = filters;
        self.background_filters = background_filters;
    }

    /// A pass with the same attributes under `new_id` and no content.
    ///
    /// # Panics
    ///
    /// Panics if `new_id` equals the current id or is not valid.
    #[must_use]
    pub fn copy(&self, new_id: RenderPassId) -> Self {
        assert!(
            new_id != self.id,
            "render pass copy must change the id: {new_id:?}"
        );
        let mut pass = Self::new();
        pass.set_all(
            new_id,
            self.output_rect,
            self.damage_rect,
            self.transform_to_root_target,
            self.has_transparent_background,
            self.has_occlusion_from_outside_target_surface,
            self.filters.clone(),
            self.background_filters.clone(),
        );
        pass
    }

    /// Adds a shared quad state and returns its handle.
    pub fn append_shared_quad_state(&mut self, state: SharedQuadState) -> SharedQuadStateId {
        self.shared_quad_state_list.push(state);
        SharedQuadStateId::new(self.shared_quad_state_list.len() - 1)
    }

    /// Adds a quad.
    ///
    /// # Panics
    ///
    /// Panics if the quad's shared quad state is not in this pass.
    pub fn append_quad(&mut self, quad: DrawQuad) {
        assert!(
            quad.shared_quad_state.index() < self.shared_quad_state_list.len(),
            "quad references a shared quad state outside its pass: {:?}",
            quad.shared_quad_state
        );
        self.quad_list.push(quad);
    }

    /// The state a handle refers to.
    ///
    /// # Panics
    ///
    /// Panics if the handle is not from this pass.
    #[must_use]
    pub fn shared_quad_state(&self, id: SharedQuadStateId) -> &SharedQuadState {
        &self.shared_quad_state_list[id.index()]
    }

    /// Returns `true` if the pass has neither quads nor states.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quad_list.is_empty() && self.shared_quad_state_list.is_empty()
    }

    fn assert_settable(&self, id: RenderPassId) {
        assert!(id.is_valid(), "invalid render pass id: {id:?}");
        assert!(
            self.is_empty(),
            "render pass {:?} already has content",
            self.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::filter::FilterOperation;
    use crate::pass::quad::{Color, DrawQuad};

    fn populated(id: RenderPassId) -> RenderPass {
        let mut pass = RenderPass::new();
        pass.set_new(
            id,
            IntRect::new(0, 0, 100, 100),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Transform3d::IDENTITY,
        );
        let sqs = pass.append_shared_quad_state(SharedQuadState::unclipped(pass.output_rect));
        pass.append_quad(DrawQuad::solid_color(sqs, pass.output_rect, Color::WHITE));
        pass
    }

    #[test]
    fn new_pass_defaults() {
        let pass = RenderPass::new();
        assert_eq!(pass.id, RenderPassId::INVALID);
        assert!(pass.has_transparent_background);
        assert!(!pass.has_occlusion_from_outside_target_surface);
        assert!(pass.is_empty());
    }

    #[test]
    fn copy_keeps_attributes_and_drops_content() {
        let mut pass = populated(RenderPassId::new(3, 2));
        pass.has_transparent_background = false;
        pass.filters.append(FilterOperation::Blur(2.0));

        let copy = pass.copy(RenderPassId::new(7, 1));
        assert_eq!(copy.id, RenderPassId::new(7, 1));
        assert_eq!(copy.output_rect, pass.output_rect);
        assert_eq!(copy.damage_rect, pass.damage_rect);
        assert!(!copy.has_transparent_background);
        assert_eq!(copy.filters, pass.filters);
        assert!(copy.is_empty());
    }

    #[test]
    fn shared_state_handles_index_the_list() {
        let pass = populated(RenderPassId::new(1, 0));
        let quad = &pass.quad_list[0];
        assert_eq!(pass.shared_quad_state(quad.shared_quad_state).opacity, 1.0);
    }

    #[test]
    #[should_panic(expected = "already has content")]
    fn set_new_on_populated_pass_panics() {
        let mut pass = populated(RenderPassId::new(1, 0));
        pass.set_new(
            RenderPassId::new(1, 1),
            IntRect::default(),
            Rect::ZERO,
            Transform3d::IDENTITY,
        );
    }

    #[test]
    #[should_panic(expected = "invalid render pass id")]
    fn set_new_with_invalid_id_panics() {
        let mut pass = RenderPass::new();
        pass.set_new(
            RenderPassId::new(0, 1),
            IntRect::default(),
            Rect::ZERO,
            Transform3d::IDENTITY,
        );
    }

    #[test]
    #[should_panic(expected = "render pass copy must change the id")]
    fn copy_with_same_id_panics() {
        let pass = populated(RenderPassId::new(4, 1));
        let _ = pass.copy(RenderPassId::new(4, 1));
    }

    #[test]
    #[should_panic(expected = "outside its pass")]
    fn quad_with_foreign_state_panics() {
        let mut pass = RenderPass::new();
        pass.append_quad(DrawQuad::solid_color(
            SharedQuadStateId::new(0),
            IntRect::new(0, 0, 1, 1),
            Color::BLACK,
        ));
    }
}
