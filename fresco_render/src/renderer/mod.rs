// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer interface.

mod delegating;

use core::fmt;

use fresco_core::geometry::IntRect;

use crate::pass::RenderPassList;
use crate::resource::{ResourceProvider, TextureFormat};

pub use delegating::DelegatingRenderer;

/// What a renderer can do, as probed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RendererCapabilities {
    /// Preferred format for new resources.
    pub best_texture_format: TextureFormat,
    /// Largest supported texture edge in texels.
    pub max_texture_size: u32,
    /// Swaps can present a sub-rectangle.
    pub using_partial_swap: bool,
    /// Content is painted on the GPU.
    pub using_accelerated_painting: bool,
    /// The context accepts visibility hints.
    pub using_set_visibility: bool,
    /// Swap completion is reported asynchronously.
    pub using_swap_complete_callback: bool,
    /// GPU memory budgets are managed externally.
    pub using_gpu_memory_manager: bool,
    /// External EGL images can be sampled.
    pub using_egl_image: bool,
    /// Textures may be updated in part.
    pub allow_partial_texture_updates: bool,
}

impl Default for RendererCapabilities {
    fn default() -> Self {
        Self {
            best_texture_format: TextureFormat::Rgba8,
            max_texture_size: 0,
            using_partial_swap: false,
            using_accelerated_painting: false,
            using_set_visibility: false,
            using_swap_complete_callback: false,
            using_gpu_memory_manager: false,
            using_egl_image: false,
            allow_partial_texture_updates: false,
        }
    }
}

/// Renderer configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RendererSettings {
    /// Paint content on the GPU when the context supports it.
    pub accelerate_painting: bool,
}

/// Receives notifications from a renderer.
pub trait RendererClient {
    /// A submitted frame has been presented.
    fn on_swap_buffers_complete(&mut self);

    /// The output surface is gone. Delegated content must be dropped and
    /// rebuilt from scratch.
    fn did_lose_output_surface(&mut self);
}

/// Errors reported by renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererError {
    /// The graphics context could not be made current.
    ContextNotCurrent,
    /// This renderer does not draw frames itself.
    DrawFrameUnsupported,
    /// This renderer has no framebuffer to read back.
    ReadPixelsUnsupported,
}

impl fmt::Display for RendererError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextNotCurrent => f.write_str("graphics context could not be made current"),
            Self::DrawFrameUnsupported => f.write_str("renderer does not draw frames directly"),
            Self::ReadPixelsUnsupported => f.write_str("renderer cannot read back pixels"),
        }
    }
}

impl core::error::Error for RendererError {}

/// A compositor backend that turns render passes into output.
pub trait Renderer {
    /// Probed capabilities.
    fn capabilities(&self) -> &RendererCapabilities;

    /// Draws a frame.
    fn draw_frame(&mut self, render_passes_in_draw_order: &mut RenderPassList) -> Result<(), RendererError>;

    /// Presents the last drawn frame. Returns `false` on failure.
    fn swap_buffers(&mut self) -> bool;

    /// Copies `rect` of the framebuffer into `pixels`.
    fn read_pixels(&mut self, pixels: &mut [u8], rect: IntRect) -> Result<(), RendererError>;

    /// Returns `true` if the graphics context has been lost.
    fn is_context_lost(&mut self, provider: &mut dyn ResourceProvider) -> bool;

    /// Records whether output is visible.
    fn set_visible(&mut self, visible: bool);

    /// Whether output is visible.
    fn visible(&self) -> bool;
}
