// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A renderer whose output is handed to a parent compositor.
//!
//! [`DelegatingRenderer`] never draws. Delegated content reaches the parent
//! as render passes through
//! [`DelegatedRendererLayer::append_quads`](crate::DelegatedRendererLayer::append_quads);
//! this renderer only probes capabilities, takes back resources the parent
//! acknowledges, and reports context loss.

use fresco_core::geometry::IntRect;

use super::{Renderer, RendererCapabilities, RendererClient, RendererError, RendererSettings};
use crate::pass::RenderPassList;
use crate::resource::{CompositorFrameAck, GlExtensions, ResourceProvider, TextureFormat};

/// Group marker pushed on the context at initialization.
const CONTEXT_GROUP_MARKER: &str = "CompositorContext";

/// See the [module docs](self).
#[derive(Debug)]
pub struct DelegatingRenderer {
    settings: RendererSettings,
    capabilities: RendererCapabilities,
    extensions: Option<GlExtensions>,
    visible: bool,
}

impl DelegatingRenderer {
    /// Creates and initializes a renderer.
    ///
    /// Without a graphics context the renderer runs in software mode and
    /// skips extension probing.
    ///
    /// # Errors
    ///
    /// Returns [`RendererError::ContextNotCurrent`] if the provider has a
    /// context that cannot be made current.
    ///
    /// # Panics
    ///
    /// Panics if the context offers `IOSurface`s without rectangle textures.
    pub fn create(
        settings: RendererSettings,
        provider: &mut dyn ResourceProvider,
    ) -> Result<Self, RendererError> {
        let mut renderer = Self {
            settings,
            capabilities: RendererCapabilities::default(),
            extensions: None,
            visible: true,
        };
        renderer.initialize(provider)?;
        Ok(renderer)
    }

    fn initialize(&mut self, provider: &mut dyn ResourceProvider) -> Result<(), RendererError> {
        let caps = &mut self.capabilities;
        caps.using_partial_swap = false;
        caps.using_swap_complete_callback = true;
        caps.max_texture_size = provider.max_texture_size();
        caps.best_texture_format = provider.best_texture_format();
        caps.allow_partial_texture_updates = false;

        let Some(context) = provider.graphics_context_3d() else {
            return Ok(());
        };
        if !context.make_context_current() {
            return Err(RendererError::ContextNotCurrent);
        }
        context.push_group_marker(CONTEXT_GROUP_MARKER);
        let extensions = GlExtensions::parse(context.extensions());

        if extensions.iosurface {
            assert!(
                extensions.texture_rectangle,
                "GL_CHROMIUM_iosurface requires GL_ARB_texture_rectangle"
            );
        }

        caps.using_accelerated_painting = self.settings.accelerate_painting
            && caps.best_texture_format == TextureFormat::Bgra8
            && extensions.read_format_bgra;
        caps.using_set_visibility = extensions.set_visibility;
        caps.using_gpu_memory_manager = false;
        caps.using_egl_image = extensions.egl_image_external;

        self.extensions = Some(extensions);
        Ok(())
    }

    /// Settings the renderer was created with.
    #[must_use]
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// Returns `true` if there is no graphics context.
    #[must_use]
    pub fn is_software(&self) -> bool {
        self.extensions.is_none()
    }

    /// Extensions found at initialization, if there is a context.
    #[must_use]
    pub fn extensions(&self) -> Option<&GlExtensions> {
        self.extensions.as_ref()
    }

    /// The parent finished with a frame: its resources go back to the
    /// provider and the client learns the swap completed.
    pub fn receive_compositor_frame_ack(
        &mut self,
        provider: &mut dyn ResourceProvider,
        client: &mut dyn RendererClient,
        ack: &CompositorFrameAck,
    ) {
        provider.receive_from_parent(&ack.resources);
        client.on_swap_buffers_complete();
    }

    /// Forwards a lost context to the client as a lost output surface.
    pub fn on_context_lost(&mut self, client: &mut dyn RendererClient) {
        client.did_lose_output_surface();
    }
}

impl Renderer for DelegatingRenderer {
    fn capabilities(&self) -> &RendererCapabilities {
        &self.capabilities
    }

    fn draw_frame(&mut self, _render_passes_in_draw_order: &mut RenderPassList) -> Result<(), RendererError> {
        Err(RendererError::DrawFrameUnsupported)
    }

    fn swap_buffers(&mut self) -> bool {
        true
    }

    fn read_pixels(&mut self, _pixels: &mut [u8], _rect: IntRect) -> Result<(), RendererError> {
        Err(RendererError::ReadPixelsUnsupported)
    }

    fn is_context_lost(&mut self, provider: &mut dyn ResourceProvider) -> bool {
        provider
            .graphics_context_3d()
            .is_some_and(|context| context.graphics_reset_status().is_lost())
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use fresco_core::geometry::IntSize;

    use super::*;
    use crate::resource::{GraphicsContext3d, ResetStatus, SoftwareResourceProvider, TextureUsage};

    #[derive(Debug, Default)]
    struct ContextState {
        cannot_make_current: bool,
        reset_status: ResetStatus,
        markers: Vec<String>,
    }

    #[derive(Debug)]
    struct FakeContext {
        extensions: String,
        state: Rc<RefCell<ContextState>>,
    }

    impl GraphicsContext3d for FakeContext {
        fn make_context_current(&mut self) -> bool {
            !self.state.borrow().cannot_make_current
        }

        fn extensions(&self) -> &str {
            &self.extensions
        }

        fn graphics_reset_status(&mut self) -> ResetStatus {
            self.state.borrow().reset_status
        }

        fn push_group_marker(&mut self, marker: &str) {
            self.state.borrow_mut().markers.push(marker.to_string());
        }
    }

    #[derive(Debug, Default)]
    struct RecordingClient {
        swaps_completed: u32,
        surfaces_lost: u32,
    }

    impl RendererClient for RecordingClient {
        fn on_swap_buffers_complete(&mut self) {
            self.swaps_completed += 1;
        }

        fn did_lose_output_surface(&mut self) {
            self.surfaces_lost += 1;
        }
    }

    fn gl_provider(extensions: &str) -> (SoftwareResourceProvider, Rc<RefCell<ContextState>>) {
        let state = Rc::new(RefCell::new(ContextState::default()));
        let context = FakeContext {
            extensions: extensions.to_string(),
            state: Rc::clone(&state),
        };
        (
            SoftwareResourceProvider::new().with_context(Box::new(context)),
            state,
        )
    }

    #[test]
    fn software_path_skips_probing() {
        let mut provider = SoftwareResourceProvider::new().with_max_texture_size(2048);
        let mut renderer = DelegatingRenderer::create(RendererSettings::default(), &mut provider)
            .expect("software renderer");

        assert!(renderer.is_software());
        let caps = renderer.capabilities();
        assert_eq!(caps.max_texture_size, 2048);
        assert_eq!(caps.best_texture_format, TextureFormat::Rgba8);
        assert!(!caps.using_partial_swap);
        assert!(caps.using_swap_complete_callback);
        assert!(!caps.allow_partial_texture_updates);
        assert!(!caps.using_set_visibility);
        assert!(!renderer.is_context_lost(&mut provider));
    }

    #[test]
    fn context_capabilities_follow_extensions() {
        let (mut provider, state) = gl_provider(
            "GL_CHROMIUM_set_visibility GL_OES_EGL_image_external GL_CHROMIUM_gpu_memory_manager",
        );
        let renderer = DelegatingRenderer::create(RendererSettings::default(), &mut provider)
            .expect("gl renderer");

        assert!(!renderer.is_software());
        let caps = renderer.capabilities();
        assert!(caps.using_set_visibility);
        assert!(caps.using_egl_image);
        assert!(!caps.using_gpu_memory_manager);
        assert!(!caps.using_accelerated_painting);
        assert_eq!(state.borrow().markers, ["CompositorContext"]);
    }

    #[test]
    fn accelerated_painting_needs_setting_format_and_readback() {
        let settings = RendererSettings {
            accelerate_painting: true,
        };

        let (provider, _) = gl_provider("GL_EXT_read_format_bgra");
        let mut provider = provider.with_best_texture_format(TextureFormat::Bgra8);
        let renderer = DelegatingRenderer::create(settings, &mut provider).expect("gl renderer");
        assert!(renderer.capabilities().using_accelerated_painting);

        let (mut rgba, _) = gl_provider("GL_EXT_read_format_bgra");
        let renderer = DelegatingRenderer::create(settings, &mut rgba).expect("gl renderer");
        assert!(!renderer.capabilities().using_accelerated_painting);

        let (provider, _) = gl_provider("");
        let mut no_readback = provider.with_best_texture_format(TextureFormat::Bgra8);
        let renderer = DelegatingRenderer::create(settings, &mut no_readback).expect("gl renderer");
        assert!(!renderer.capabilities().using_accelerated_painting);
    }

    #[test]
    fn context_that_cannot_be_made_current_fails() {
        let (mut provider, state) = gl_provider("");
        state.borrow_mut().cannot_make_current = true;
        let result = DelegatingRenderer::create(RendererSettings::default(), &mut provider);
        assert_eq!(result.err(), Some(RendererError::ContextNotCurrent));
        assert!(state.borrow().markers.is_empty());
    }

    #[test]
    #[should_panic(expected = "requires GL_ARB_texture_rectangle")]
    fn iosurface_without_rectangle_textures_panics() {
        let (mut provider, _) = gl_provider("GL_CHROMIUM_iosurface");
        let _ = DelegatingRenderer::create(RendererSettings::default(), &mut provider);
    }

    #[test]
    fn ack_returns_resources_and_completes_swap() {
        let mut provider = SoftwareResourceProvider::new();
        let mut renderer = DelegatingRenderer::create(RendererSettings::default(), &mut provider)
            .expect("software renderer");
        let mut client = RecordingClient::default();

        let id = provider.create_managed_resource(
            IntSize::new(8, 8),
            TextureFormat::Rgba8,
            TextureUsage::Any,
        );
        let sent = provider.prepare_send_to_parent(&[id]);
        assert!(provider.in_use_by_consumer(id));

        renderer.receive_compositor_frame_ack(&mut provider, &mut client, &CompositorFrameAck::new(sent));
        assert!(!provider.in_use_by_consumer(id));
        assert_eq!(client.swaps_completed, 1);
    }

    #[test]
    fn context_loss_is_reported_to_the_client() {
        let (mut provider, state) = gl_provider("");
        let mut renderer = DelegatingRenderer::create(RendererSettings::default(), &mut provider)
            .expect("gl renderer");
        let mut client = RecordingClient::default();
        assert!(!renderer.is_context_lost(&mut provider));

        state.borrow_mut().reset_status = ResetStatus::UnknownContextReset;
        assert!(renderer.is_context_lost(&mut provider));
        renderer.on_context_lost(&mut client);
        assert_eq!(client.surfaces_lost, 1);
    }

    #[test]
    fn drawing_entry_points_are_unsupported() {
        let mut provider = SoftwareResourceProvider::new();
        let mut renderer = DelegatingRenderer::create(RendererSettings::default(), &mut provider)
            .expect("software renderer");

        assert_eq!(
            renderer.draw_frame(&mut Vec::new()),
            Err(RendererError::DrawFrameUnsupported)
        );
        assert!(renderer.swap_buffers());
        let mut pixels = [0_u8; 16];
        assert_eq!(
            renderer.read_pixels(&mut pixels, IntRect::new(0, 0, 2, 2)),
            Err(RendererError::ReadPixelsUnsupported)
        );
    }

    #[test]
    fn visibility_is_recorded() {
        let mut provider = SoftwareResourceProvider::new();
        let mut renderer = DelegatingRenderer::create(RendererSettings::default(), &mut provider)
            .expect("software renderer");
        assert!(renderer.visible());
        renderer.set_visible(false);
        assert!(!renderer.visible());
    }
}
