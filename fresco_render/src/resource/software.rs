// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory resource provider.
//!
//! Resources are zeroed byte buffers. Lock state, exports, deferred deletion
//! and read-lock fences are tracked exactly as a GPU-backed provider would,
//! which makes this provider the reference for the [`ResourceProvider`]
//! contract in tests and demos.
//!
//! Read-lock fences model GPU completion: with fences enabled on a resource,
//! taking a read lock arms a fence that keeps the resource unwritable after
//! the lock is released, until [`SoftwareResourceProvider::signal_read_lock_fences`]
//! reports that every outstanding read has finished.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use fresco_core::geometry::IntSize;

use super::context::GraphicsContext3d;
use super::provider::{ResourceId, ResourceProvider, TextureFormat, TextureUsage};
use super::transfer::{MAILBOX_NAME_LEN, Mailbox, TransferableResource, TransferableResourceList};

/// Default maximum texture edge.
pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 4096;

#[derive(Debug)]
struct Resource {
    size: IntSize,
    format: TextureFormat,
    usage: TextureUsage,
    pixels: Vec<u8>,
    read_lock_count: u32,
    locked_for_write: bool,
    exported: bool,
    marked_for_deletion: bool,
    read_lock_fences_enabled: bool,
    read_lock_fence_pending: bool,
    mailbox: Mailbox,
}

/// A [`ResourceProvider`] backed by plain memory.
#[derive(Debug)]
pub struct SoftwareResourceProvider {
    resources: BTreeMap<ResourceId, Resource>,
    next_id: u32,
    next_sync_point: u32,
    mailbox_generation: u32,
    max_texture_size: u32,
    best_texture_format: TextureFormat,
    context: Option<Box<dyn GraphicsContext3d>>,
    created: u64,
}

impl Default for SoftwareResourceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareResourceProvider {
    /// A provider with no 3D context, RGBA resources, and
    /// [`DEFAULT_MAX_TEXTURE_SIZE`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: BTreeMap::new(),
            next_id: 1,
            next_sync_point: 1,
            mailbox_generation: 0,
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            best_texture_format: TextureFormat::Rgba8,
            context: None,
            created: 0,
        }
    }

    /// Reports `context` from [`ResourceProvider::graphics_context_3d`].
    #[must_use]
    pub fn with_context(mut self, context: Box<dyn GraphicsContext3d>) -> Self {
        self.context = Some(context);
        self
    }

    /// Overrides the preferred texture format.
    #[must_use]
    pub fn with_best_texture_format(mut self, format: TextureFormat) -> Self {
        self.best_texture_format = format;
        self
    }

    /// Overrides the maximum texture edge.
    #[must_use]
    pub fn with_max_texture_size(mut self, max_texture_size: u32) -> Self {
        self.max_texture_size = max_texture_size;
        self
    }

    /// Number of live resources, including exported ones awaiting deletion.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Number of resources ever created.
    #[must_use]
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Returns `true` if `id` names a live resource.
    #[must_use]
    pub fn contains(&self, id: ResourceId) -> bool {
        self.resources.contains_key(&id)
    }

    /// Size of a resource.
    ///
    /// # Panics
    ///
    /// Panics if `id` is unknown.
    #[must_use]
    pub fn size(&self, id: ResourceId) -> IntSize {
        self.get(id).size
    }

    /// Format of a resource.
    ///
    /// # Panics
    ///
    /// Panics if `id` is unknown.
    #[must_use]
    pub fn format(&self, id: ResourceId) -> TextureFormat {
        self.get(id).format
    }

    /// Usage a resource was created with.
    ///
    /// # Panics
    ///
    /// Panics if `id` is unknown.
    #[must_use]
    pub fn usage(&self, id: ResourceId) -> TextureUsage {
        self.get(id).usage
    }

    /// Returns `true` if the resource has been sent to the parent and not
    /// yet returned.
    ///
    /// # Panics
    ///
    /// Panics if `id` is unknown.
    #[must_use]
    pub fn is_exported(&self, id: ResourceId) -> bool {
        self.get(id).exported
    }

    /// Contents of a resource.
    ///
    /// # Panics
    ///
    /// Panics if `id` is unknown.
    #[must_use]
    pub fn pixels(&self, id: ResourceId) -> &[u8] {
        &self.get(id).pixels
    }

    /// Writable contents of a write-locked resource.
    ///
    /// # Panics
    ///
    /// Panics if `id` is unknown or not write-locked.
    pub fn pixels_mut(&mut self, id: ResourceId) -> &mut [u8] {
        let resource = self.get_mut(id);
        assert!(
            resource.locked_for_write,
            "writing pixels of {id:?} requires the write lock"
        );
        &mut resource.pixels
    }

    /// Marks every outstanding read as complete, disarming all read-lock
    /// fences.
    pub fn signal_read_lock_fences(&mut self) {
        for resource in self.resources.values_mut() {
            resource.read_lock_fence_pending = false;
        }
    }

    fn get(&self, id: ResourceId) -> &Resource {
        let Some(resource) = self.resources.get(&id) else {
            panic!("unknown resource: {id:?}");
        };
        resource
    }

    fn get_mut(&mut self, id: ResourceId) -> &mut Resource {
        let Some(resource) = self.resources.get_mut(&id) else {
            panic!("unknown resource: {id:?}");
        };
        resource
    }

    fn next_mailbox(&mut self, id: ResourceId) -> Mailbox {
        self.mailbox_generation = self.mailbox_generation.wrapping_add(1);
        let mut name = [0_u8; MAILBOX_NAME_LEN];
        name[..4].copy_from_slice(&id.0.to_le_bytes());
        name[4..8].copy_from_slice(&self.mailbox_generation.to_le_bytes());
        Mailbox::new(name)
    }
}

impl ResourceProvider for SoftwareResourceProvider {
    fn create_managed_resource(
        &mut self,
        size: IntSize,
        format: TextureFormat,
        usage: TextureUsage,
    ) -> ResourceId {
        assert!(!size.is_empty(), "cannot create an empty resource: {size:?}");
        assert!(
            size.width <= self.max_texture_size && size.height <= self.max_texture_size,
            "resource {size:?} exceeds the maximum texture size {}",
            self.max_texture_size
        );
        let Ok(len) = usize::try_from(format.bytes_for(size)) else {
            panic!("resource {size:?} does not fit in memory");
        };

        let id = ResourceId(self.next_id);
        self.next_id += 1;
        self.created += 1;
        self.resources.insert(
            id,
            Resource {
                size,
                format,
                usage,
                pixels: vec![0; len],
                read_lock_count: 0,
                locked_for_write: false,
                exported: false,
                marked_for_deletion: false,
                read_lock_fences_enabled: false,
                read_lock_fence_pending: false,
                mailbox: Mailbox::ZERO,
            },
        );
        id
    }

    fn delete_resource(&mut self, id: ResourceId) {
        let resource = self.get_mut(id);
        assert!(
            !resource.locked_for_write && resource.read_lock_count == 0,
            "cannot delete locked resource {id:?}"
        );
        assert!(
            !resource.marked_for_deletion,
            "resource {id:?} deleted twice"
        );
        if resource.exported {
            resource.marked_for_deletion = true;
        } else {
            self.resources.remove(&id);
        }
    }

    fn can_lock_for_write(&self, id: ResourceId) -> bool {
        let resource = self.get(id);
        !resource.locked_for_write
            && resource.read_lock_count == 0
            && !resource.exported
            && !resource.read_lock_fence_pending
    }

    fn enable_read_lock_fences(&mut self, id: ResourceId, enable: bool) {
        self.get_mut(id).read_lock_fences_enabled = enable;
    }

    fn max_texture_size(&self) -> u32 {
        self.max_texture_size
    }

    fn best_texture_format(&self) -> TextureFormat {
        self.best_texture_format
    }

    fn receive_from_parent(&mut self, resources: &TransferableResourceList) {
        for returned in &resources.resources {
            let resource = self.get_mut(returned.id);
            assert!(
                resource.exported,
                "parent returned {:?}, which was never sent",
                returned.id
            );
            resource.exported = false;
            resource.mailbox = returned.mailbox;
            if resource.marked_for_deletion {
                self.resources.remove(&returned.id);
            }
        }
    }

    fn graphics_context_3d(&mut self) -> Option<&mut dyn GraphicsContext3d> {
        match &mut self.context {
            Some(context) => Some(context.as_mut()),
            None => None,
        }
    }

    fn lock_for_read(&mut self, id: ResourceId) {
        let resource = self.get_mut(id);
        assert!(
            !resource.locked_for_write && !resource.exported,
            "cannot read-lock {id:?} while it is written or exported"
        );
        resource.read_lock_count += 1;
        if resource.read_lock_fences_enabled {
            resource.read_lock_fence_pending = true;
        }
    }

    fn unlock_for_read(&mut self, id: ResourceId) {
        let resource = self.get_mut(id);
        assert!(resource.read_lock_count > 0, "{id:?} is not read-locked");
        resource.read_lock_count -= 1;
    }

    fn lock_for_write(&mut self, id: ResourceId) {
        assert!(
            self.can_lock_for_write(id),
            "cannot write-lock {id:?} while it is in use"
        );
        self.get_mut(id).locked_for_write = true;
    }

    fn unlock_for_write(&mut self, id: ResourceId) {
        let resource = self.get_mut(id);
        assert!(resource.locked_for_write, "{id:?} is not write-locked");
        resource.locked_for_write = false;
    }

    fn prepare_send_to_parent(&mut self, ids: &[ResourceId]) -> TransferableResourceList {
        let mut list = TransferableResourceList::new();
        for &id in ids {
            let resource = self.get(id);
            assert!(
                !resource.locked_for_write && resource.read_lock_count == 0,
                "cannot send locked resource {id:?}"
            );
            if resource.exported {
                continue;
            }
            let mut mailbox = resource.mailbox;
            if mailbox.is_zero() {
                mailbox = self.next_mailbox(id);
            }
            let resource = self.get_mut(id);
            resource.mailbox = mailbox;
            resource.exported = true;
            list.resources.push(TransferableResource {
                id,
                format: resource.format,
                size: resource.size,
                mailbox,
            });
        }
        if !list.is_empty() {
            list.sync_point = self.next_sync_point;
            self.next_sync_point = self.next_sync_point.wrapping_add(1).max(1);
        }
        list
    }

    fn in_use_by_consumer(&self, id: ResourceId) -> bool {
        let resource = self.get(id);
        resource.read_lock_count > 0 || resource.exported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(p: &mut SoftwareResourceProvider) -> ResourceId {
        p.create_managed_resource(IntSize::new(16, 16), TextureFormat::Rgba8, TextureUsage::Any)
    }

    #[test]
    fn create_allocates_zeroed_memory() {
        let mut p = SoftwareResourceProvider::new();
        let id = tile(&mut p);
        assert_eq!(id, ResourceId(1));
        assert_eq!(p.pixels(id).len(), 16 * 16 * 4);
        assert!(p.pixels(id).iter().all(|&b| b == 0));
        assert!(p.can_lock_for_write(id));
        assert_eq!(p.created_count(), 1);
    }

    #[test]
    fn usage_is_recorded_per_resource() {
        let mut p = SoftwareResourceProvider::new();
        let sampled = tile(&mut p);
        let target =
            p.create_managed_resource(IntSize::new(8, 8), TextureFormat::Rgba8, TextureUsage::Framebuffer);
        assert_eq!(p.usage(sampled), TextureUsage::Any);
        assert_eq!(p.usage(target), TextureUsage::Framebuffer);
    }

    #[test]
    fn write_lock_excludes_other_locks() {
        let mut p = SoftwareResourceProvider::new();
        let id = tile(&mut p);
        p.lock_for_write(id);
        assert!(!p.can_lock_for_write(id));
        p.pixels_mut(id)[0] = 0xff;
        p.unlock_for_write(id);
        assert_eq!(p.pixels(id)[0], 0xff);

        p.lock_for_read(id);
        assert!(!p.can_lock_for_write(id));
        assert!(p.in_use_by_consumer(id));
        p.unlock_for_read(id);
        assert!(p.can_lock_for_write(id));
    }

    #[test]
    fn fences_outlive_read_locks() {
        let mut p = SoftwareResourceProvider::new();
        let id = tile(&mut p);
        p.enable_read_lock_fences(id, true);
        p.lock_for_read(id);
        p.unlock_for_read(id);
        assert!(!p.can_lock_for_write(id));
        assert!(!p.in_use_by_consumer(id));

        p.signal_read_lock_fences();
        assert!(p.can_lock_for_write(id));
    }

    #[test]
    fn export_round_trip() {
        let mut p = SoftwareResourceProvider::new();
        let a = tile(&mut p);
        let b = tile(&mut p);

        let sent = p.prepare_send_to_parent(&[a, b]);
        assert_eq!(sent.len(), 2);
        assert_ne!(sent.sync_point, 0);
        assert!(sent.resources.iter().all(|r| !r.mailbox.is_zero()));
        assert!(p.is_exported(a));
        assert!(!p.can_lock_for_write(a));

        // Already exported: skipped.
        assert!(p.prepare_send_to_parent(&[a]).is_empty());

        p.receive_from_parent(&sent);
        assert!(!p.is_exported(a));
        assert!(p.can_lock_for_write(b));
    }

    #[test]
    fn deleting_exported_resource_waits_for_return() {
        let mut p = SoftwareResourceProvider::new();
        let id = tile(&mut p);
        let sent = p.prepare_send_to_parent(&[id]);
        p.delete_resource(id);
        assert!(p.contains(id));

        p.receive_from_parent(&sent);
        assert!(!p.contains(id));
        assert_eq!(p.resource_count(), 0);
    }

    #[test]
    fn empty_send_has_no_sync_point() {
        let mut p = SoftwareResourceProvider::new();
        let list = p.prepare_send_to_parent(&[]);
        assert!(list.is_empty());
        assert_eq!(list.sync_point, 0);
    }

    #[test]
    fn no_context_by_default() {
        let mut p = SoftwareResourceProvider::new();
        assert!(p.graphics_context_3d().is_none());
    }

    #[test]
    #[should_panic(expected = "cannot delete locked resource")]
    fn deleting_locked_resource_panics() {
        let mut p = SoftwareResourceProvider::new();
        let id = tile(&mut p);
        p.lock_for_read(id);
        p.delete_resource(id);
    }

    #[test]
    #[should_panic(expected = "unknown resource")]
    fn unknown_id_panics() {
        let p = SoftwareResourceProvider::new();
        let _ = p.can_lock_for_write(ResourceId(9));
    }

    #[test]
    #[should_panic(expected = "exceeds the maximum texture size")]
    fn oversized_resource_panics() {
        let mut p = SoftwareResourceProvider::new().with_max_texture_size(8);
        let _ = tile(&mut p);
    }
}
