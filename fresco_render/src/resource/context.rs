// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The 3D graphics context contract.

use core::fmt;

/// Result of a graphics reset query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResetStatus {
    /// The context is usable.
    #[default]
    NoError,
    /// This context caused a reset.
    GuiltyContextReset,
    /// Another context caused a reset.
    InnocentContextReset,
    /// A reset of unknown origin happened.
    UnknownContextReset,
}

impl ResetStatus {
    /// Returns `true` if the context has been lost.
    #[inline]
    #[must_use]
    pub const fn is_lost(self) -> bool {
        !matches!(self, Self::NoError)
    }
}

/// The subset of a GL-style context that compositor code talks to directly.
pub trait GraphicsContext3d: fmt::Debug {
    /// Binds the context to the calling thread. Returns `false` on failure.
    fn make_context_current(&mut self) -> bool;

    /// Space-separated extension names.
    fn extensions(&self) -> &str;

    /// Whether, and why, the context was reset.
    fn graphics_reset_status(&mut self) -> ResetStatus;

    /// Opens a named group in the context's debug output.
    fn push_group_marker(&mut self, marker: &str);
}

/// Extensions the compositor cares about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlExtensions {
    /// `GL_EXT_read_format_bgra`
    pub read_format_bgra: bool,
    /// `GL_CHROMIUM_set_visibility`
    pub set_visibility: bool,
    /// `GL_CHROMIUM_iosurface`
    pub iosurface: bool,
    /// `GL_ARB_texture_rectangle`
    pub texture_rectangle: bool,
    /// `GL_CHROMIUM_gpu_memory_manager`
    pub gpu_memory_manager: bool,
    /// `GL_OES_EGL_image_external`
    pub egl_image_external: bool,
}

impl GlExtensions {
    /// Parses a space-separated extension string. Unknown names are ignored.
    #[must_use]
    pub fn parse(extensions: &str) -> Self {
        let mut out = Self::default();
        for name in extensions.split_ascii_whitespace() {
            match name {
                "GL_EXT_read_format_bgra" => out.read_format_bgra = true,
                "GL_CHROMIUM_set_visibility" => out.set_visibility = true,
                "GL_CHROMIUM_iosurface" => out.iosurface = true,
                "GL_ARB_texture_rectangle" => out.texture_rectangle = true,
                "GL_CHROMIUM_gpu_memory_manager" => out.gpu_memory_manager = true,
                "GL_OES_EGL_image_external" => out.egl_image_external = true,
                _ => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_picks_known_names() {
        let ext = GlExtensions::parse(
            "GL_OES_texture_npot GL_EXT_read_format_bgra  GL_CHROMIUM_iosurface\tGL_ARB_texture_rectangle",
        );
        assert!(ext.read_format_bgra);
        assert!(ext.iosurface);
        assert!(ext.texture_rectangle);
        assert!(!ext.set_visibility);
        assert!(!ext.gpu_memory_manager);
        assert!(!ext.egl_image_external);
    }

    #[test]
    fn empty_string_has_nothing() {
        assert_eq!(GlExtensions::parse(""), GlExtensions::default());
    }

    #[test]
    fn only_no_error_is_live() {
        assert!(!ResetStatus::NoError.is_lost());
        assert!(ResetStatus::InnocentContextReset.is_lost());
    }
}
