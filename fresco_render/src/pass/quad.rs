// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw quads.
//!
//! A [`DrawQuad`] is a rect in content space plus a [`Material`] saying what
//! fills it. Kind-specific data lives in the material variant; the only
//! kind-specific behavior the compositor needs is rewriting the pass id of
//! [`Material::RenderPass`] quads when passes are re-homed.

use core::fmt;

use fresco_core::geometry::{IntRect, IntSize};
use fresco_core::transform::Transform3d;
use kurbo::Rect;

use crate::pass::id::RenderPassId;
use crate::pass::shared_state::SharedQuadStateId;
use crate::resource::{ResourceId, TextureFormat};

/// A 32-bit ARGB color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self(0xff00_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xffff_ffff);

    /// Packs components into a color.
    #[inline]
    #[must_use]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(u32::from_be_bytes([a, r, g, b]))
    }

    /// Alpha component.
    #[inline]
    #[must_use]
    pub const fn alpha(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// Returns `true` if alpha is 255.
    #[inline]
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.alpha() == u8::MAX
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:08x})", self.0)
    }
}

/// Whether an `IOSurface` is stored upside down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IoSurfaceOrientation {
    /// Rows run top to bottom.
    Unflipped,
    /// Rows run bottom to top.
    Flipped,
}

/// A quad that draws the output of another render pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderPassQuad {
    /// The pass whose output is drawn.
    pub render_pass_id: RenderPassId,
    /// Whether this draws a reflection of the pass.
    pub is_replica: bool,
    /// Optional mask texture.
    pub mask_resource_id: Option<ResourceId>,
    /// Region of the pass output that changed since the previous frame.
    pub contents_changed_since_last_frame: IntRect,
    /// Normalized mask texture coordinates.
    pub mask_uv_rect: Rect,
}

/// A quad that samples a texture resource.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureQuad {
    /// Source texture.
    pub resource_id: ResourceId,
    /// Whether color channels are premultiplied by alpha.
    pub premultiplied_alpha: bool,
    /// Normalized texture coordinates.
    pub uv_rect: Rect,
    /// Per-corner opacity, clockwise from the top left.
    pub vertex_opacity: [f32; 4],
    /// Whether the texture is stored upside down.
    pub flipped: bool,
}

/// Which edges of a tile get anti-aliased.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EdgeAntiAliasing {
    /// Left edge.
    pub left: bool,
    /// Top edge.
    pub top: bool,
    /// Right edge.
    pub right: bool,
    /// Bottom edge.
    pub bottom: bool,
}

/// A quad that samples one tile of a tiled layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileQuad {
    /// Tile texture.
    pub resource_id: ResourceId,
    /// Texel coordinates of the drawn region.
    pub tex_coord_rect: Rect,
    /// Allocated texture size.
    pub texture_size: IntSize,
    /// Whether red and blue are swapped in the texture.
    pub swizzle_contents: bool,
    /// Anti-aliased edges.
    pub edge_aa: EdgeAntiAliasing,
}

/// One plane of a planar video frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VideoPlane {
    /// Plane texture.
    pub resource_id: ResourceId,
    /// Plane size in texels.
    pub size: IntSize,
    /// Plane texel format.
    pub format: TextureFormat,
}

/// What fills a quad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Material {
    /// Placeholder pattern for content that is not ready.
    Checkerboard {
        /// Pattern color.
        color: Color,
    },
    /// Outline used by debugging overlays.
    DebugBorder {
        /// Border color.
        color: Color,
        /// Border width in pixels.
        width: u32,
    },
    /// A platform `IOSurface`.
    IoSurface {
        /// Surface size.
        io_surface_size: IntSize,
        /// Texture bound to the surface.
        io_surface_texture_id: u32,
        /// Row order.
        orientation: IoSurfaceOrientation,
    },
    /// The output of another render pass.
    RenderPass(RenderPassQuad),
    /// A flat color.
    SolidColor {
        /// Fill color.
        color: Color,
    },
    /// An externally produced video texture.
    StreamVideo {
        /// External texture.
        texture_id: u32,
        /// Texture coordinate transform.
        matrix: Transform3d,
    },
    /// A texture resource.
    Texture(TextureQuad),
    /// One tile of a tiled layer.
    Tile(TileQuad),
    /// A planar Y/U/V video frame.
    YuvVideo {
        /// Luma plane.
        y_plane: VideoPlane,
        /// First chroma plane.
        u_plane: VideoPlane,
        /// Second chroma plane.
        v_plane: VideoPlane,
    },
}

impl Material {
    /// Short name of the material kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Checkerboard { .. } => "checkerboard",
            Self::DebugBorder { .. } => "debug_border",
            Self::IoSurface { .. } => "io_surface",
            Self::RenderPass(_) => "render_pass",
            Self::SolidColor { .. } => "solid_color",
            Self::StreamVideo { .. } => "stream_video",
            Self::Texture(_) => "texture",
            Self::Tile(_) => "tile",
            Self::YuvVideo { .. } => "yuv_video",
        }
    }
}

/// A rect of content and what fills it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawQuad {
    /// What fills the quad.
    pub material: Material,
    /// Transform, clip, and opacity, indexed into the owning pass.
    pub shared_quad_state: SharedQuadStateId,
    /// Quad bounds in content space.
    pub rect: IntRect,
    /// Part of `rect` known to be fully opaque.
    pub opaque_rect: IntRect,
    /// Part of `rect` that is not occluded.
    pub visible_rect: IntRect,
    /// Whether drawing needs blending even where `opaque_rect` says opaque.
    pub needs_blending: bool,
}

impl DrawQuad {
    /// A fully visible, non-opaque quad.
    #[must_use]
    pub fn new(shared_quad_state: SharedQuadStateId, rect: IntRect, material: Material) -> Self {
        Self {
            material,
            shared_quad_state,
            rect,
            opaque_rect: IntRect::default(),
            visible_rect: rect,
            needs_blending: false,
        }
    }

    /// A solid-color quad, opaque when the color is.
    #[must_use]
    pub fn solid_color(shared_quad_state: SharedQuadStateId, rect: IntRect, color: Color) -> Self {
        let mut quad = Self::new(shared_quad_state, rect, Material::SolidColor { color });
        if color.is_opaque() {
            quad.opaque_rect = rect;
        }
        quad
    }

    /// A quad drawing the output of `render_pass_id`.
    #[must_use]
    pub fn render_pass(
        shared_quad_state: SharedQuadStateId,
        rect: IntRect,
        render_pass_id: RenderPassId,
    ) -> Self {
        Self::new(
            shared_quad_state,
            rect,
            Material::RenderPass(RenderPassQuad {
                render_pass_id,
                is_replica: false,
                mask_resource_id: None,
                contents_changed_since_last_frame: rect,
                mask_uv_rect: Rect::ZERO,
            }),
        )
    }

    /// Replaces the opaque rect.
    #[must_use]
    pub fn with_opaque_rect(mut self, opaque_rect: IntRect) -> Self {
        self.opaque_rect = opaque_rect;
        self
    }

    /// Replaces the visible rect.
    #[must_use]
    pub fn with_visible_rect(mut self, visible_rect: IntRect) -> Self {
        self.visible_rect = visible_rect;
        self
    }

    /// Forces blending.
    #[must_use]
    pub fn with_needs_blending(mut self, needs_blending: bool) -> Self {
        self.needs_blending = needs_blending;
        self
    }

    /// The pass this quad draws, for render-pass quads.
    #[must_use]
    pub fn render_pass_id(&self) -> Option<RenderPassId> {
        match &self.material {
            Material::RenderPass(q) => Some(q.render_pass_id),
            Material::Checkerboard { .. }
            | Material::DebugBorder { .. }
            | Material::IoSurface { .. }
            | Material::SolidColor { .. }
            | Material::StreamVideo { .. }
            | Material::Texture(_)
            | Material::Tile(_)
            | Material::YuvVideo { .. } => None,
        }
    }

    /// A verbatim copy that points at `shared_quad_state`.
    #[must_use]
    pub fn copy(&self, shared_quad_state: SharedQuadStateId) -> Self {
        Self {
            shared_quad_state,
            ..*self
        }
    }

    /// Copies a render-pass quad, pointing it at `shared_quad_state` and
    /// `render_pass_id`.
    ///
    /// # Panics
    ///
    /// Panics if this is not a render-pass quad.
    #[must_use]
    pub fn copy_render_pass_quad(
        &self,
        shared_quad_state: SharedQuadStateId,
        render_pass_id: RenderPassId,
    ) -> Self {
        let Material::RenderPass(mut q) = self.material else {
            panic!("not a render pass quad: {}", self.material.name());
        };
        q.render_pass_id = render_pass_id;
        Self {
            material: Material::RenderPass(q),
            shared_quad_state,
            ..*self
        }
    }

    /// Calls `f` with every resource the quad samples.
    pub fn for_each_resource(&self, mut f: impl FnMut(ResourceId)) {
        match &self.material {
            Material::RenderPass(q) => {
                if let Some(mask) = q.mask_resource_id {
                    f(mask);
                }
            }
            Material::Texture(q) => f(q.resource_id),
            Material::Tile(q) => f(q.resource_id),
            Material::YuvVideo {
                y_plane,
                u_plane,
                v_plane,
            } => {
                f(y_plane.resource_id);
                f(u_plane.resource_id);
                f(v_plane.resource_id);
            }
            Material::Checkerboard { .. }
            | Material::DebugBorder { .. }
            | Material::IoSurface { .. }
            | Material::SolidColor { .. }
            | Material::StreamVideo { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn sqs(i: usize) -> SharedQuadStateId {
        SharedQuadStateId::new(i)
    }

    #[test]
    fn color_components() {
        let c = Color::from_argb(0x80, 1, 2, 3);
        assert_eq!(c, Color(0x8001_0203));
        assert_eq!(c.alpha(), 0x80);
        assert!(!c.is_opaque());
        assert!(Color::WHITE.is_opaque());
    }

    #[test]
    fn solid_color_opacity_follows_alpha() {
        let rect = IntRect::new(0, 0, 8, 8);
        assert_eq!(DrawQuad::solid_color(sqs(0), rect, Color::BLACK).opaque_rect, rect);
        assert!(
            DrawQuad::solid_color(sqs(0), rect, Color::TRANSPARENT)
                .opaque_rect
                .is_empty()
        );
    }

    #[test]
    fn copy_keeps_everything_but_state() {
        let quad = DrawQuad::solid_color(sqs(0), IntRect::new(1, 2, 3, 4), Color::WHITE)
            .with_visible_rect(IntRect::new(1, 2, 1, 1))
            .with_needs_blending(true);
        let copy = quad.copy(sqs(5));
        assert_eq!(copy.shared_quad_state, sqs(5));
        assert_eq!(copy.material, quad.material);
        assert_eq!(copy.visible_rect, quad.visible_rect);
        assert!(copy.needs_blending);
    }

    #[test]
    fn render_pass_quad_copy_rewrites_id() {
        let quad = DrawQuad::render_pass(sqs(0), IntRect::new(0, 0, 4, 4), RenderPassId::new(9, 2));
        let copy = quad.copy_render_pass_quad(sqs(1), RenderPassId::new(3, 2));
        assert_eq!(copy.render_pass_id(), Some(RenderPassId::new(3, 2)));
        assert_eq!(quad.render_pass_id(), Some(RenderPassId::new(9, 2)));
        assert_eq!(copy.rect, quad.rect);
    }

    #[test]
    fn only_render_pass_quads_reference_a_pass() {
        let solid = DrawQuad::solid_color(sqs(0), IntRect::new(0, 0, 4, 4), Color::BLACK);
        assert_eq!(solid.render_pass_id(), None);

        let overlay = DrawQuad::render_pass(sqs(0), IntRect::new(0, 0, 4, 4), RenderPassId::new(2, 1))
            .with_opaque_rect(IntRect::new(1, 1, 2, 2));
        assert_eq!(overlay.opaque_rect, IntRect::new(1, 1, 2, 2));
        assert_eq!(overlay.copy(sqs(3)).opaque_rect, IntRect::new(1, 1, 2, 2));
    }

    #[test]
    #[should_panic(expected = "not a render pass quad")]
    fn render_pass_copy_of_other_kind_panics() {
        let quad = DrawQuad::solid_color(sqs(0), IntRect::new(0, 0, 1, 1), Color::BLACK);
        let _ = quad.copy_render_pass_quad(sqs(0), RenderPassId::new(1, 1));
    }

    #[test]
    fn resources_sampled_by_quads() {
        let plane = |id| VideoPlane {
            resource_id: ResourceId(id),
            size: IntSize::new(4, 4),
            format: TextureFormat::Rgba8,
        };
        let yuv = DrawQuad::new(
            sqs(0),
            IntRect::new(0, 0, 4, 4),
            Material::YuvVideo {
                y_plane: plane(1),
                u_plane: plane(2),
                v_plane: plane(3),
            },
        );
        let mut seen = Vec::new();
        yuv.for_each_resource(|id| seen.push(id));
        assert_eq!(seen, [ResourceId(1), ResourceId(2), ResourceId(3)]);

        let mut none = Vec::new();
        DrawQuad::solid_color(sqs(0), IntRect::new(0, 0, 1, 1), Color::BLACK)
            .for_each_resource(|id| none.push(id));
        assert!(none.is_empty());
    }
}
