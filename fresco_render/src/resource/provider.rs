// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The resource provider contract.

use core::fmt;

use fresco_core::geometry::IntSize;

use super::context::GraphicsContext3d;
use super::transfer::TransferableResourceList;

/// Handle to a provider-owned resource.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(pub u32);

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({})", self.0)
    }
}

/// Texel layout of a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit red, green, blue, alpha.
    Rgba8,
    /// 8-bit blue, green, red, alpha.
    Bgra8,
}

impl TextureFormat {
    /// Bytes per texel.
    #[inline]
    #[must_use]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::Rgba8 | Self::Bgra8 => 4,
        }
    }

    /// Bytes needed to store `size` texels in this format.
    #[inline]
    #[must_use]
    pub const fn bytes_for(self, size: IntSize) -> u64 {
        size.area() * self.bytes_per_pixel() as u64
    }
}

/// How a resource will be used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureUsage {
    /// Sampled, uploaded to, or both.
    #[default]
    Any,
    /// Rendered into.
    Framebuffer,
}

/// The arbiter of resource lifetime and lock state.
///
/// A resource is *write-locked* while a producer fills it and *read-locked*
/// while a consumer samples it. Once sent to the parent compositor it is
/// *exported* and cannot be locked until the parent returns it. Pooling code
/// only recycles a resource once [`can_lock_for_write`] says so.
///
/// Methods taking a [`ResourceId`] panic when the id is unknown.
///
/// [`can_lock_for_write`]: ResourceProvider::can_lock_for_write
pub trait ResourceProvider {
    /// Allocates a resource.
    fn create_managed_resource(
        &mut self,
        size: IntSize,
        format: TextureFormat,
        usage: TextureUsage,
    ) -> ResourceId;

    /// Deletes a resource. Deletion of an exported resource is deferred
    /// until the parent returns it.
    fn delete_resource(&mut self, id: ResourceId);

    /// Returns `true` if nothing reads, writes, or holds the resource.
    fn can_lock_for_write(&self, id: ResourceId) -> bool;

    /// While enabled, a read lock keeps the resource unwritable until the
    /// reads are known to have completed, not merely until it is unlocked.
    fn enable_read_lock_fences(&mut self, id: ResourceId, enable: bool);

    /// Largest supported texture edge in texels.
    fn max_texture_size(&self) -> u32;

    /// Preferred format for new resources.
    fn best_texture_format(&self) -> TextureFormat;

    /// Takes back resources the parent has finished with.
    fn receive_from_parent(&mut self, resources: &TransferableResourceList);

    /// The 3D context backing the provider, if any. `None` means software
    /// compositing.
    fn graphics_context_3d(&mut self) -> Option<&mut dyn GraphicsContext3d>;

    /// Takes a read lock.
    fn lock_for_read(&mut self, id: ResourceId);

    /// Releases a read lock.
    fn unlock_for_read(&mut self, id: ResourceId);

    /// Takes the write lock.
    fn lock_for_write(&mut self, id: ResourceId);

    /// Releases the write lock.
    fn unlock_for_write(&mut self, id: ResourceId);

    /// Exports resources to the parent. Resources that are already exported
    /// are skipped.
    fn prepare_send_to_parent(&mut self, ids: &[ResourceId]) -> TransferableResourceList;

    /// Returns `true` if a consumer holds the resource.
    fn in_use_by_consumer(&self, id: ResourceId) -> bool;
}
