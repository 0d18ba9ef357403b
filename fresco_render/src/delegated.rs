// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A layer whose content is a render pass list from another compositor.
//!
//! A child compositor produces a list of [`RenderPass`]es in draw order; the
//! last one is its root. [`DelegatedRendererLayer`] owns that list and splices
//! it into the parent's frame:
//!
//! - Every pass except the root is *contributing*. The parent asks for them
//!   with [`append_contributing_render_passes`], which re-homes each into this
//!   layer's id space as `(layer_id, position + 1)`. Index 0 stays reserved
//!   for the pass the parent generates for this layer itself.
//! - The root is never emitted as a pass. When the parent appends quads into
//!   an index-0 target, the root's quads are merged straight into that target.
//!   If that target belongs to an ancestor rather than to this layer, each
//!   shared quad state is composed with the layer's draw transform, clip and
//!   opacity on the way.
//! - Render-pass quads are rewritten to point at the re-homed ids.
//!
//! Passes must be appended before quads are merged, since the root may
//! reference contributing passes by id.
//!
//! [`append_contributing_render_passes`]: DelegatedRendererLayer::append_contributing_render_passes

use alloc::vec::Vec;

use fresco_core::geometry::{IntRect, map_clipped_int_rect, union_rects};
use fresco_core::transform::Transform3d;

use crate::pass::{RenderPass, RenderPassId, RenderPassIndex, SharedQuadState, SharedQuadStateId};
use crate::sink::{AppendQuadsData, QuadSink, RenderPassSink};

/// Placement of a layer in its render target, computed by the layer tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerDrawProperties {
    /// Id of the layer whose surface this layer draws into.
    pub render_target: i32,
    /// Maps layer space into the render target.
    pub draw_transform: Transform3d,
    /// Accumulated opacity.
    pub draw_opacity: f32,
    /// Clip in target space, if any.
    pub clip_rect: Option<IntRect>,
}

impl LayerDrawProperties {
    /// Unclipped, opaque, untransformed placement in `render_target`.
    #[must_use]
    pub const fn new(render_target: i32) -> Self {
        Self {
            render_target,
            draw_transform: Transform3d::IDENTITY,
            draw_opacity: 1.0,
            clip_rect: None,
        }
    }
}

/// See the [module docs](self).
#[derive(Debug)]
pub struct DelegatedRendererLayer {
    id: i32,
    draw_properties: LayerDrawProperties,
    render_passes_in_draw_order: Vec<RenderPass>,
    render_passes_index_by_id: RenderPassIndex,
}

impl DelegatedRendererLayer {
    /// An empty layer that owns its render surface.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not positive.
    #[must_use]
    pub fn new(id: i32) -> Self {
        assert!(id > 0, "layer id must be positive, got {id}");
        Self {
            id,
            draw_properties: LayerDrawProperties::new(id),
            render_passes_in_draw_order: Vec::new(),
            render_passes_index_by_id: RenderPassIndex::new(),
        }
    }

    /// Layer id.
    #[must_use]
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Current placement.
    #[must_use]
    pub fn draw_properties(&self) -> &LayerDrawProperties {
        &self.draw_properties
    }

    /// Updates placement; called by the layer tree before drawing.
    pub fn set_draw_properties(&mut self, draw_properties: LayerDrawProperties) {
        self.draw_properties = draw_properties;
    }

    /// Returns `true` if the layer draws into its own surface.
    #[must_use]
    pub fn owns_render_surface(&self) -> bool {
        self.draw_properties.render_target == self.id
    }

    /// The owned passes in draw order.
    #[must_use]
    pub fn render_passes(&self) -> &[RenderPass] {
        &self.render_passes_in_draw_order
    }

    /// Returns `true` if any passes are owned.
    #[must_use]
    pub fn has_delegated_content(&self) -> bool {
        !self.render_passes_in_draw_order.is_empty()
    }

    /// Returns `true` if there are passes besides the root.
    #[must_use]
    pub fn has_contributing_delegated_render_passes(&self) -> bool {
        self.render_passes_in_draw_order.len() > 1
    }

    /// Takes ownership of a new frame's passes, replacing the old ones.
    ///
    /// The new root's damage absorbs the old root's damage so that damage
    /// reported by the replaced frame is not lost.
    ///
    /// # Panics
    ///
    /// Panics if two passes share an id.
    pub fn set_render_passes(&mut self, render_passes_in_draw_order: Vec<RenderPass>) {
        let old_root_damage = self
            .render_passes_in_draw_order
            .last()
            .map(|root| root.damage_rect);

        self.clear_render_passes();

        let mut index_by_id = RenderPassIndex::new();
        for (i, pass) in render_passes_in_draw_order.iter().enumerate() {
            let previous = index_by_id.insert(pass.id, i);
            assert!(
                previous.is_none(),
                "duplicate delegated render pass id: {:?}",
                pass.id
            );
        }
        self.render_passes_in_draw_order = render_passes_in_draw_order;
        self.render_passes_index_by_id = index_by_id;

        if let (Some(root), Some(old)) = (self.render_passes_in_draw_order.last_mut(), old_root_damage) {
            root.damage_rect = union_rects(root.damage_rect, old);
        }
    }

    /// Drops every owned pass.
    pub fn clear_render_passes(&mut self) {
        self.render_passes_in_draw_order.clear();
        self.render_passes_index_by_id.clear();
    }

    /// The output surface went away; all delegated content is invalid.
    pub fn did_lose_output_surface(&mut self) {
        self.clear_render_passes();
    }

    /// Id of the first contributing pass in this layer's id space.
    #[must_use]
    pub fn first_contributing_render_pass_id(&self) -> RenderPassId {
        RenderPassId::new(self.id, 1)
    }

    /// Id of the contributing pass after `previous`.
    #[must_use]
    pub fn next_contributing_render_pass_id(&self, previous: RenderPassId) -> RenderPassId {
        RenderPassId::new(previous.layer_id, previous.index + 1)
    }

    /// Maps a child compositor's pass id into this layer's id space.
    ///
    /// # Panics
    ///
    /// Panics if no owned pass has that id.
    #[must_use]
    pub fn convert_delegated_render_pass_id(&self, delegated: RenderPassId) -> RenderPassId {
        let Some(&position) = self.render_passes_index_by_id.get(&delegated) else {
            panic!("unknown delegated render pass id: {delegated:?}");
        };
        RenderPassId::new(self.id, index_for_position(position))
    }

    /// Emits empty copies of every contributing pass, re-homed into this
    /// layer's id space.
    ///
    /// # Panics
    ///
    /// Panics if there are no contributing passes.
    pub fn append_contributing_render_passes(&self, sink: &mut dyn RenderPassSink) {
        assert!(
            self.has_contributing_delegated_render_passes(),
            "layer {} has no contributing delegated render passes",
            self.id
        );
        let contributing = self.render_passes_in_draw_order.len() - 1;
        for pass in &self.render_passes_in_draw_order[..contributing] {
            let output_id = self.convert_delegated_render_pass_id(pass.id);
            assert!(
                output_id.index > 0,
                "contributing pass {output_id:?} collides with the layer's own pass"
            );
            sink.append_render_pass(pass.copy(output_id));
        }
    }

    /// Appends quads for the target named in `data`.
    ///
    /// An index-0 target is a pass generated by the parent; the root pass is
    /// merged into it. Any other target is one of this layer's contributing
    /// passes, and that pass's quads are appended.
    ///
    /// # Panics
    ///
    /// Panics if an index-0 target is not this layer's render target, if a
    /// contributing target belongs to another layer or is out of range, or if
    /// a render-pass quad would reference the pass it is drawn into.
    pub fn append_quads(&self, sink: &mut dyn QuadSink, data: &mut AppendQuadsData) {
        let Some(root) = self.render_passes_in_draw_order.last() else {
            return;
        };

        let target = data.render_pass_id;
        let merge_root_with_target = target.index == 0;
        if merge_root_with_target {
            assert!(
                target.layer_id == self.draw_properties.render_target,
                "target {target:?} is not the render target of layer {}",
                self.id
            );
            self.append_render_pass_quads(sink, data, root);
        } else {
            assert!(
                target.layer_id == self.id,
                "target {target:?} was not created by layer {}",
                self.id
            );
            let position = self.position_for_index(target.index);
            self.append_render_pass_quads(sink, data, &self.render_passes_in_draw_order[position]);
        }
    }

    fn append_render_pass_quads(
        &self,
        sink: &mut dyn QuadSink,
        data: &mut AppendQuadsData,
        delegated: &RenderPass,
    ) {
        let target_is_from_this_layer = data.render_pass_id.layer_id == self.id;
        // (state in `delegated`, its copy in the sink)
        let mut current: Option<(SharedQuadStateId, SharedQuadStateId)> = None;

        for quad in &delegated.quad_list {
            let copied_state = match current {
                Some((source, copied)) if source == quad.shared_quad_state => copied,
                _ => {
                    let mut state = *delegated.shared_quad_state(quad.shared_quad_state);
                    if !target_is_from_this_layer {
                        assert!(
                            !self.owns_render_surface(),
                            "layer {} draws into its own surface",
                            self.id
                        );
                        state = self.compose_with_draw_properties(state);
                    }
                    let copied = sink.use_shared_quad_state(state);
                    current = Some((quad.shared_quad_state, copied));
                    copied
                }
            };

            let copy = match quad.render_pass_id() {
                None => quad.copy(copied_state),
                Some(delegated_id) => {
                    let contributing = self.convert_delegated_render_pass_id(delegated_id);
                    assert!(
                        contributing != data.render_pass_id,
                        "render pass quad in {contributing:?} references itself"
                    );
                    quad.copy_render_pass_quad(copied_state, contributing)
                }
            };
            sink.append(copy, data);
        }
    }

    fn compose_with_draw_properties(&self, mut state: SharedQuadState) -> SharedQuadState {
        let props = &self.draw_properties;
        let transform = props.draw_transform;

        state.content_to_target_transform = transform * state.content_to_target_transform;
        state.clipped_rect_in_target = map_clipped_int_rect(&transform, state.clipped_rect_in_target);
        if state.is_clipped {
            state.clip_rect = map_clipped_int_rect(&transform, state.clip_rect);
        }
        if let Some(layer_clip) = props.clip_rect {
            state.clip_rect = if state.is_clipped {
                state.clip_rect.intersect(&layer_clip)
            } else {
                layer_clip
            };
            state.is_clipped = true;
        }
        state.opacity *= props.draw_opacity;
        state
    }

    fn position_for_index(&self, index: i32) -> usize {
        let position = usize::try_from(index - 1).ok();
        match position {
            Some(position) if position < self.render_passes_in_draw_order.len() => position,
            _ => panic!(
                "layer {} has no delegated render pass with index {index}",
                self.id
            ),
        }
    }
}

fn index_for_position(position: usize) -> i32 {
    let Ok(index) = i32::try_from(position + 1) else {
        panic!("delegated render pass position {position} out of range");
    };
    index
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Rect;

    use super::*;
    use crate::pass::{Color, DrawQuad, Material};
    use crate::sink::RenderPassQuadSink;

    const LAYER: i32 = 9;
    const PARENT: i32 = 1;

    fn pass(id: RenderPassId, damage: Rect) -> RenderPass {
        let mut pass = RenderPass::new();
        pass.set_new(id, IntRect::new(0, 0, 100, 100), damage, Transform3d::IDENTITY);
        pass
    }

    fn with_solid_quads(mut pass: RenderPass, states: &[usize]) -> RenderPass {
        let a = pass.append_shared_quad_state(SharedQuadState::unclipped(pass.output_rect));
        let mut b = SharedQuadState::unclipped(pass.output_rect);
        b.opacity = 0.5;
        let b = pass.append_shared_quad_state(b);
        for &s in states {
            let sqs = if s == 0 { a } else { b };
            pass.append_quad(DrawQuad::solid_color(sqs, IntRect::new(0, 0, 10, 10), Color::WHITE));
        }
        pass
    }

    /// (5,1), (5,2), root (5,3); the root draws (5,1) and (5,2).
    fn three_pass_frame() -> Vec<RenderPass> {
        let first = with_solid_quads(pass(RenderPassId::new(5, 1), Rect::ZERO), &[0]);
        let second = with_solid_quads(pass(RenderPassId::new(5, 2), Rect::ZERO), &[0, 1]);
        let mut root = pass(RenderPassId::new(5, 3), Rect::new(0.0, 0.0, 10.0, 10.0));
        let sqs = root.append_shared_quad_state(SharedQuadState::unclipped(root.output_rect));
        root.append_quad(DrawQuad::render_pass(sqs, IntRect::new(0, 0, 50, 50), RenderPassId::new(5, 1)));
        root.append_quad(DrawQuad::render_pass(sqs, IntRect::new(50, 0, 50, 50), RenderPassId::new(5, 2)));
        root.append_quad(DrawQuad::solid_color(sqs, IntRect::new(0, 50, 100, 50), Color::BLACK));
        vec![first, second, root]
    }

    fn layer_with(passes: Vec<RenderPass>) -> DelegatedRendererLayer {
        let mut layer = DelegatedRendererLayer::new(LAYER);
        layer.set_render_passes(passes);
        layer
    }

    #[test]
    fn three_pass_frame_end_to_end() {
        let layer = layer_with(three_pass_frame());
        assert!(layer.has_delegated_content());
        assert!(layer.has_contributing_delegated_render_passes());

        let mut passes = Vec::new();
        layer.append_contributing_render_passes(&mut passes);
        let ids: Vec<_> = passes.iter().map(|p| p.id).collect();
        assert_eq!(ids, [RenderPassId::new(LAYER, 1), RenderPassId::new(LAYER, 2)]);
        assert!(passes.iter().all(RenderPass::is_empty));
        assert_eq!(
            layer.convert_delegated_render_pass_id(RenderPassId::new(5, 3)),
            RenderPassId::new(LAYER, 3)
        );
    }

    #[test]
    fn content_flags_track_pass_count() {
        let mut layer = DelegatedRendererLayer::new(LAYER);
        assert!(!layer.has_delegated_content());

        layer.set_render_passes(vec![pass(RenderPassId::new(2, 1), Rect::ZERO)]);
        assert!(layer.has_delegated_content());
        assert!(!layer.has_contributing_delegated_render_passes());

        layer.set_render_passes(three_pass_frame());
        assert!(layer.has_contributing_delegated_render_passes());

        layer.set_render_passes(Vec::new());
        assert!(!layer.has_delegated_content());
    }

    #[test]
    fn new_root_damage_absorbs_old_root_damage() {
        let mut layer = layer_with(vec![pass(
            RenderPassId::new(5, 1),
            Rect::new(0.0, 0.0, 10.0, 10.0),
        )]);
        layer.set_render_passes(vec![
            pass(RenderPassId::new(5, 7), Rect::new(90.0, 90.0, 95.0, 95.0)),
            pass(RenderPassId::new(5, 8), Rect::new(20.0, 20.0, 30.0, 30.0)),
        ]);
        let root = layer.render_passes().last().map(|p| p.damage_rect);
        assert_eq!(root, Some(Rect::new(0.0, 0.0, 30.0, 30.0)));
        // Contributing passes keep their own damage.
        assert_eq!(layer.render_passes()[0].damage_rect, Rect::new(90.0, 90.0, 95.0, 95.0));
    }

    #[test]
    fn empty_old_damage_leaves_new_damage_alone() {
        let mut layer = layer_with(vec![pass(RenderPassId::new(5, 1), Rect::ZERO)]);
        layer.set_render_passes(vec![pass(RenderPassId::new(5, 1), Rect::new(1.0, 2.0, 3.0, 4.0))]);
        assert_eq!(layer.render_passes()[0].damage_rect, Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn remapping_is_a_bijection_onto_positive_indices() {
        let ids = [
            RenderPassId::new(3, 0),
            RenderPassId::new(3, 4),
            RenderPassId::new(8, 1),
            RenderPassId::new(2, 2),
        ];
        let layer = layer_with(ids.iter().map(|&id| pass(id, Rect::ZERO)).collect());
        let mut mapped: Vec<_> = ids
            .iter()
            .map(|&id| layer.convert_delegated_render_pass_id(id))
            .collect();
        assert!(mapped.iter().all(|id| id.layer_id == LAYER && id.index > 0));
        mapped.sort();
        mapped.dedup();
        assert_eq!(mapped.len(), ids.len());
    }

    #[test]
    fn contributing_id_sequence() {
        let layer = DelegatedRendererLayer::new(LAYER);
        let first = layer.first_contributing_render_pass_id();
        assert_eq!(first, RenderPassId::new(LAYER, 1));
        assert_eq!(layer.next_contributing_render_pass_id(first), RenderPassId::new(LAYER, 2));
    }

    #[test]
    fn contributing_target_gets_its_quads_unchanged() {
        let layer = layer_with(three_pass_frame());
        let mut passes = Vec::new();
        layer.append_contributing_render_passes(&mut passes);

        let target = &mut passes[1];
        let mut data = AppendQuadsData::new(target.id);
        layer.append_quads(&mut RenderPassQuadSink::new(target), &mut data);

        assert_eq!(target.quad_list.len(), 2);
        assert_eq!(target.shared_quad_state_list.len(), 2);
        assert_eq!(target.shared_quad_state_list[1].opacity, 0.5);
    }

    #[test]
    fn quads_sharing_a_state_share_one_copy() {
        let root = with_solid_quads(pass(RenderPassId::new(5, 1), Rect::ZERO), &[0, 0, 1, 1, 0]);
        let mut layer = layer_with(vec![root]);
        layer.set_draw_properties(LayerDrawProperties::new(PARENT));

        let mut target = pass(RenderPassId::new(PARENT, 0), Rect::ZERO);
        let mut data = AppendQuadsData::new(target.id);
        layer.append_quads(&mut RenderPassQuadSink::new(&mut target), &mut data);

        let states: Vec<_> = target
            .quad_list
            .iter()
            .map(|q| q.shared_quad_state.index())
            .collect();
        assert_eq!(states, [0, 0, 1, 1, 2]);
        assert_eq!(target.shared_quad_state_list.len(), 3);
    }

    #[test]
    fn merged_root_remaps_render_pass_quads() {
        let mut layer = layer_with(three_pass_frame());
        layer.set_draw_properties(LayerDrawProperties::new(PARENT));

        let mut target = pass(RenderPassId::new(PARENT, 0), Rect::ZERO);
        let mut data = AppendQuadsData::new(target.id);
        layer.append_quads(&mut RenderPassQuadSink::new(&mut target), &mut data);

        let referenced: Vec<_> = target.quad_list.iter().filter_map(|q| q.render_pass_id()).collect();
        assert_eq!(referenced, [RenderPassId::new(LAYER, 1), RenderPassId::new(LAYER, 2)]);
        assert!(matches!(target.quad_list[2].material, Material::SolidColor { .. }));
    }

    #[test]
    fn merging_into_ancestor_composes_placement() {
        let root = with_solid_quads(pass(RenderPassId::new(5, 1), Rect::ZERO), &[0]);
        let mut layer = layer_with(vec![root]);
        layer.set_draw_properties(LayerDrawProperties {
            render_target: PARENT,
            draw_transform: Transform3d::from_translation(10.0, 20.0, 0.0),
            draw_opacity: 0.5,
            clip_rect: Some(IntRect::new(0, 0, 50, 50)),
        });

        let mut target = pass(RenderPassId::new(PARENT, 0), Rect::ZERO);
        let mut data = AppendQuadsData::new(target.id);
        layer.append_quads(&mut RenderPassQuadSink::new(&mut target), &mut data);

        let state = target.shared_quad_state_list[0];
        assert_eq!(
            state.content_to_target_transform,
            Transform3d::from_translation(10.0, 20.0, 0.0)
        );
        assert_eq!(state.clipped_rect_in_target, IntRect::new(10, 20, 100, 100));
        assert!(state.is_clipped);
        assert_eq!(state.clip_rect, IntRect::new(0, 0, 50, 50));
        assert_eq!(state.opacity, 0.5);
        // The quad itself stays in content space.
        assert_eq!(target.quad_list[0].rect, IntRect::new(0, 0, 10, 10));
    }

    #[test]
    fn content_transform_applies_before_layer_placement() {
        let mut root = pass(RenderPassId::new(5, 1), Rect::ZERO);
        let mut scaled = SharedQuadState::unclipped(root.output_rect);
        scaled.content_to_target_transform = Transform3d::from_scale(2.0, 2.0, 1.0);
        let sqs = root.append_shared_quad_state(scaled);
        root.append_quad(DrawQuad::solid_color(sqs, IntRect::new(0, 0, 10, 10), Color::WHITE));

        let mut layer = layer_with(vec![root]);
        layer.set_draw_properties(LayerDrawProperties {
            draw_transform: Transform3d::from_translation(10.0, 20.0, 0.0),
            ..LayerDrawProperties::new(PARENT)
        });

        let mut target = pass(RenderPassId::new(PARENT, 0), Rect::ZERO);
        let mut data = AppendQuadsData::new(target.id);
        layer.append_quads(&mut RenderPassQuadSink::new(&mut target), &mut data);

        let composed = target.shared_quad_state_list[0].content_to_target_transform;
        // Scale then translate; the other order would give (22, 42).
        assert_eq!(composed.map_point(1.0, 1.0), [12.0, 22.0, 0.0, 1.0]);
        assert_eq!(
            composed,
            Transform3d::from_translation(10.0, 20.0, 0.0) * Transform3d::from_scale(2.0, 2.0, 1.0)
        );
    }

    #[test]
    fn existing_clip_is_mapped_then_intersected() {
        let mut root = pass(RenderPassId::new(5, 1), Rect::ZERO);
        let mut clipped = SharedQuadState::unclipped(root.output_rect);
        clipped.is_clipped = true;
        clipped.clip_rect = IntRect::new(0, 0, 40, 40);
        let sqs = root.append_shared_quad_state(clipped);
        root.append_quad(DrawQuad::solid_color(sqs, IntRect::new(0, 0, 10, 10), Color::WHITE));

        let mut layer = layer_with(vec![root]);
        layer.set_draw_properties(LayerDrawProperties {
            render_target: PARENT,
            draw_transform: Transform3d::from_translation(20.0, 0.0, 0.0),
            draw_opacity: 1.0,
            clip_rect: Some(IntRect::new(0, 0, 50, 50)),
        });

        let mut target = pass(RenderPassId::new(PARENT, 0), Rect::ZERO);
        let mut data = AppendQuadsData::new(target.id);
        layer.append_quads(&mut RenderPassQuadSink::new(&mut target), &mut data);

        assert_eq!(target.shared_quad_state_list[0].clip_rect, IntRect::new(20, 0, 30, 40));
    }

    #[test]
    fn own_surface_target_is_not_composed() {
        let root = with_solid_quads(pass(RenderPassId::new(5, 1), Rect::ZERO), &[1]);
        let mut layer = layer_with(vec![root]);
        layer.set_draw_properties(LayerDrawProperties {
            draw_opacity: 0.25,
            ..LayerDrawProperties::new(LAYER)
        });
        assert!(layer.owns_render_surface());

        let mut target = pass(RenderPassId::new(LAYER, 0), Rect::ZERO);
        let mut data = AppendQuadsData::new(target.id);
        layer.append_quads(&mut RenderPassQuadSink::new(&mut target), &mut data);
        assert_eq!(target.shared_quad_state_list[0].opacity, 0.5);
    }

    #[test]
    fn no_content_appends_nothing() {
        let layer = DelegatedRendererLayer::new(LAYER);
        let mut target = pass(RenderPassId::new(7, 0), Rect::ZERO);
        let mut data = AppendQuadsData::new(target.id);
        layer.append_quads(&mut RenderPassQuadSink::new(&mut target), &mut data);
        assert!(target.is_empty());
    }

    #[test]
    fn surface_loss_clears_content() {
        let mut layer = layer_with(three_pass_frame());
        layer.did_lose_output_surface();
        assert!(!layer.has_delegated_content());
        assert!(layer.render_passes().is_empty());
    }

    #[test]
    #[should_panic(expected = "unknown delegated render pass id")]
    fn lookup_after_clear_panics() {
        let mut layer = layer_with(three_pass_frame());
        assert_eq!(
            layer.convert_delegated_render_pass_id(RenderPassId::new(5, 1)),
            RenderPassId::new(LAYER, 1)
        );
        layer.clear_render_passes();
        let _ = layer.convert_delegated_render_pass_id(RenderPassId::new(5, 1));
    }

    #[test]
    #[should_panic(expected = "duplicate delegated render pass id")]
    fn duplicate_ids_panic() {
        let mut layer = DelegatedRendererLayer::new(LAYER);
        layer.set_render_passes(vec![
            pass(RenderPassId::new(5, 1), Rect::ZERO),
            pass(RenderPassId::new(5, 1), Rect::ZERO),
        ]);
    }

    #[test]
    #[should_panic(expected = "has no contributing delegated render passes")]
    fn contributing_passes_require_more_than_a_root() {
        let layer = layer_with(vec![pass(RenderPassId::new(5, 1), Rect::ZERO)]);
        layer.append_contributing_render_passes(&mut Vec::new());
    }

    #[test]
    #[should_panic(expected = "is not the render target of layer")]
    fn merging_into_foreign_target_panics() {
        let layer = layer_with(three_pass_frame());
        let mut target = pass(RenderPassId::new(PARENT, 0), Rect::ZERO);
        let mut data = AppendQuadsData::new(target.id);
        layer.append_quads(&mut RenderPassQuadSink::new(&mut target), &mut data);
    }

    #[test]
    #[should_panic(expected = "has no delegated render pass with index")]
    fn contributing_target_out_of_range_panics() {
        let layer = layer_with(three_pass_frame());
        let mut target = pass(RenderPassId::new(LAYER, 4), Rect::ZERO);
        let mut data = AppendQuadsData::new(target.id);
        layer.append_quads(&mut RenderPassQuadSink::new(&mut target), &mut data);
    }

    #[test]
    #[should_panic(expected = "layer id must be positive")]
    fn zero_layer_id_panics() {
        let _ = DelegatedRendererLayer::new(0);
    }
}
