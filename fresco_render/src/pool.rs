// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recycling allocator for provider resources.
//!
//! The pool hands out [`PooledResource`]s keyed by size and format. Released
//! resources go on a free list and are handed out again once the provider
//! reports them writable; a read-lock fence is enabled on every resource the
//! pool allocates so that a resource is not recycled while reads of it are
//! still in flight.
//!
//! The pool is bounded by a memory budget. The running usage counts every
//! resource the pool has allocated and not destroyed, whether checked out or
//! free. Releasing while over budget destroys the resource instead of keeping
//! it; lowering the budget evicts free resources oldest first.
//!
//! A pool must be emptied with [`ResourcePool::evict_all`] before it is
//! dropped; it cannot reach the provider from `Drop`.

use alloc::collections::{BTreeSet, VecDeque};

use fresco_core::geometry::IntSize;

use crate::resource::{ResourceId, ResourceProvider, TextureFormat, TextureUsage};

/// A resource checked out of a [`ResourcePool`].
///
/// Not `Clone`: a resource is either held by one caller or sitting in the
/// pool's free list, and [`ResourcePool::release_resource`] takes it by
/// value.
#[derive(Debug, PartialEq, Eq)]
pub struct PooledResource {
    id: ResourceId,
    size: IntSize,
    format: TextureFormat,
}

impl PooledResource {
    /// Provider id.
    #[must_use]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Size in texels.
    #[must_use]
    pub fn size(&self) -> IntSize {
        self.size
    }

    /// Texel format.
    #[must_use]
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Bytes the resource counts against the pool budget.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.format.bytes_for(self.size)
    }
}

/// Lifetime counters for a [`ResourcePool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Resources allocated from the provider.
    pub allocations: u64,
    /// Acquires served from the free list.
    pub recycles: u64,
    /// Resources deleted, on release or eviction.
    pub destroyed: u64,
}

/// See the [module docs](self).
#[derive(Debug, Default)]
pub struct ResourcePool {
    max_memory_usage_bytes: u64,
    memory_usage_bytes: u64,
    free: VecDeque<PooledResource>,
    checked_out: BTreeSet<ResourceId>,
    stats: PoolStats,
}

impl ResourcePool {
    /// An empty pool with a zero budget. Until a budget is set, every
    /// released resource is destroyed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty pool with the given budget.
    #[must_use]
    pub fn with_max_memory_usage_bytes(max_memory_usage_bytes: u64) -> Self {
        Self {
            max_memory_usage_bytes,
            memory_usage_bytes: 0,
            free: VecDeque::new(),
            checked_out: BTreeSet::new(),
            stats: PoolStats::default(),
        }
    }

    /// Hands out a resource of exactly `size` and `format`, recycling a free
    /// one the provider reports writable, or allocating a new one.
    pub fn acquire_resource(
        &mut self,
        provider: &mut dyn ResourceProvider,
        size: IntSize,
        format: TextureFormat,
    ) -> PooledResource {
        let reusable = self.free.iter().position(|r| {
            r.size == size && r.format == format && provider.can_lock_for_write(r.id)
        });
        if let Some(resource) = reusable.and_then(|i| self.free.remove(i)) {
            self.stats.recycles += 1;
            self.checked_out.insert(resource.id);
            return resource;
        }

        let id = provider.create_managed_resource(size, format, TextureUsage::Any);
        provider.enable_read_lock_fences(id, true);
        let resource = PooledResource { id, size, format };
        self.memory_usage_bytes += resource.bytes();
        self.stats.allocations += 1;
        self.checked_out.insert(id);
        resource
    }

    /// Returns a resource to the pool. Over budget, the resource is deleted
    /// instead of kept.
    ///
    /// # Panics
    ///
    /// Panics if the resource is not checked out of this pool.
    pub fn release_resource(&mut self, provider: &mut dyn ResourceProvider, resource: PooledResource) {
        assert!(
            self.checked_out.remove(&resource.id),
            "{:?} was not acquired from this pool",
            resource.id
        );
        if self.memory_usage_bytes > self.max_memory_usage_bytes {
            self.destroy(provider, resource);
            return;
        }
        self.free.push_back(resource);
    }

    /// Sets the budget and evicts free resources, oldest first, until usage
    /// fits or nothing free is left.
    pub fn set_max_memory_usage_bytes(
        &mut self,
        provider: &mut dyn ResourceProvider,
        max_memory_usage_bytes: u64,
    ) {
        self.max_memory_usage_bytes = max_memory_usage_bytes;
        while self.memory_usage_bytes > self.max_memory_usage_bytes {
            let Some(resource) = self.free.pop_front() else {
                break;
            };
            self.destroy(provider, resource);
        }
    }

    /// Drops the budget to zero, deleting every free resource.
    pub fn evict_all(&mut self, provider: &mut dyn ResourceProvider) {
        self.set_max_memory_usage_bytes(provider, 0);
    }

    /// Bytes of every resource allocated and not yet destroyed.
    #[must_use]
    pub fn memory_usage_bytes(&self) -> u64 {
        self.memory_usage_bytes
    }

    /// Current budget.
    #[must_use]
    pub fn max_memory_usage_bytes(&self) -> u64 {
        self.max_memory_usage_bytes
    }

    /// Number of resources handed out and not yet released.
    #[must_use]
    pub fn checked_out_count(&self) -> usize {
        self.checked_out.len()
    }

    /// Number of resources on the free list.
    #[must_use]
    pub fn free_resource_count(&self) -> usize {
        self.free.len()
    }

    /// Resources on the free list, oldest first. Eviction removes them in
    /// this order.
    pub fn free_resources(&self) -> impl Iterator<Item = &PooledResource> {
        self.free.iter()
    }

    /// Lifetime counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    fn destroy(&mut self, provider: &mut dyn ResourceProvider, resource: PooledResource) {
        self.memory_usage_bytes -= resource.bytes();
        self.stats.destroyed += 1;
        provider.delete_resource(resource.id);
    }
}

impl Drop for ResourcePool {
    fn drop(&mut self) {
        debug_assert!(
            self.free.is_empty(),
            "pool dropped holding {} free resources; call evict_all first",
            self.free.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::SoftwareResourceProvider;

    const TILE: IntSize = IntSize::new(64, 64);
    const TILE_BYTES: u64 = 64 * 64 * 4;

    #[test]
    fn release_then_acquire_recycles() {
        let mut provider = SoftwareResourceProvider::new();
        let mut pool = ResourcePool::with_max_memory_usage_bytes(TILE_BYTES * 4);

        let first = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        let id = first.id();
        pool.release_resource(&mut provider, first);
        let second = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);

        assert_eq!(second.id(), id);
        assert_eq!(provider.created_count(), 1);
        assert_eq!(pool.stats().allocations, 1);
        assert_eq!(pool.stats().recycles, 1);
        assert_eq!(pool.memory_usage_bytes(), TILE_BYTES);
    }

    #[test]
    fn size_and_format_must_match() {
        let mut provider = SoftwareResourceProvider::new();
        let mut pool = ResourcePool::with_max_memory_usage_bytes(TILE_BYTES * 4);

        let r = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        pool.release_resource(&mut provider, r);

        let bgra = pool.acquire_resource(&mut provider, TILE, TextureFormat::Bgra8);
        let small = pool.acquire_resource(&mut provider, IntSize::new(32, 32), TextureFormat::Rgba8);
        assert_eq!(provider.created_count(), 3);
        assert_eq!(pool.free_resource_count(), 1);
        pool.release_resource(&mut provider, bgra);
        pool.release_resource(&mut provider, small);
        pool.evict_all(&mut provider);
    }

    #[test]
    fn fenced_resource_is_not_recycled_until_signalled() {
        let mut provider = SoftwareResourceProvider::new();
        let mut pool = ResourcePool::with_max_memory_usage_bytes(TILE_BYTES * 4);

        let r = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        let id = r.id();
        provider.lock_for_read(id);
        provider.unlock_for_read(id);
        pool.release_resource(&mut provider, r);

        let other = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        assert_ne!(other.id(), id);

        provider.signal_read_lock_fences();
        let again = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        assert_eq!(again.id(), id);
        pool.release_resource(&mut provider, other);
        pool.release_resource(&mut provider, again);
        pool.evict_all(&mut provider);
    }

    #[test]
    fn release_over_budget_destroys() {
        let mut provider = SoftwareResourceProvider::new();
        let mut pool = ResourcePool::with_max_memory_usage_bytes(TILE_BYTES);

        let a = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        let b = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        assert_eq!(pool.memory_usage_bytes(), 2 * TILE_BYTES);

        pool.release_resource(&mut provider, a);
        assert_eq!(pool.free_resource_count(), 0);
        assert_eq!(pool.memory_usage_bytes(), TILE_BYTES);
        assert_eq!(provider.resource_count(), 1);

        pool.release_resource(&mut provider, b);
        assert_eq!(pool.free_resource_count(), 1);
        assert_eq!(pool.stats().destroyed, 1);
        pool.evict_all(&mut provider);
    }

    #[test]
    fn zero_budget_with_default_pool_destroys_on_release() {
        let mut provider = SoftwareResourceProvider::new();
        let mut pool = ResourcePool::new();
        let r = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        pool.release_resource(&mut provider, r);
        assert_eq!(pool.memory_usage_bytes(), 0);
        assert_eq!(provider.resource_count(), 0);
    }

    #[test]
    fn lowering_budget_evicts_oldest_first() {
        let mut provider = SoftwareResourceProvider::new();
        let mut pool = ResourcePool::with_max_memory_usage_bytes(TILE_BYTES * 3);

        let a = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        let b = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        let c = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        let (a_id, c_id) = (a.id(), c.id());
        pool.release_resource(&mut provider, a);
        pool.release_resource(&mut provider, b);
        pool.release_resource(&mut provider, c);
        let order: alloc::vec::Vec<_> = pool.free_resources().map(PooledResource::id).collect();
        assert_eq!(order.first(), Some(&a_id));
        assert_eq!(order.last(), Some(&c_id));

        pool.set_max_memory_usage_bytes(&mut provider, TILE_BYTES);
        assert_eq!(pool.free_resource_count(), 1);
        assert!(!provider.contains(a_id));
        assert!(provider.contains(c_id));
        pool.evict_all(&mut provider);
    }

    #[test]
    fn evict_all_empties_the_pool() {
        let mut provider = SoftwareResourceProvider::new();
        let mut pool = ResourcePool::with_max_memory_usage_bytes(TILE_BYTES * 8);
        let held: alloc::vec::Vec<_> = (0..4)
            .map(|_| pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8))
            .collect();
        for r in held {
            pool.release_resource(&mut provider, r);
        }

        pool.set_max_memory_usage_bytes(&mut provider, 0);
        assert_eq!(pool.free_resource_count(), 0);
        assert_eq!(pool.memory_usage_bytes(), 0);
        assert_eq!(provider.resource_count(), 0);

        pool.evict_all(&mut provider);
        assert_eq!(pool.stats().destroyed, 4);
    }

    #[test]
    fn checked_out_resources_survive_eviction() {
        let mut provider = SoftwareResourceProvider::new();
        let mut pool = ResourcePool::with_max_memory_usage_bytes(TILE_BYTES * 2);
        let held = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);

        pool.evict_all(&mut provider);
        assert_eq!(pool.memory_usage_bytes(), TILE_BYTES);
        assert!(provider.contains(held.id()));

        pool.release_resource(&mut provider, held);
        assert_eq!(pool.memory_usage_bytes(), 0);
    }

    #[test]
    #[should_panic(expected = "was not acquired from this pool")]
    fn releasing_into_another_pool_panics() {
        let mut provider = SoftwareResourceProvider::new();
        let mut a = ResourcePool::with_max_memory_usage_bytes(TILE_BYTES * 2);
        let mut b = ResourcePool::with_max_memory_usage_bytes(TILE_BYTES * 2);
        let from_a = a.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        let _from_b = b.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);

        b.release_resource(&mut provider, from_a);
    }

    #[test]
    fn recycled_resource_is_checked_out_again() {
        let mut provider = SoftwareResourceProvider::new();
        let mut pool = ResourcePool::with_max_memory_usage_bytes(TILE_BYTES * 2);
        let r = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        assert_eq!(pool.checked_out_count(), 1);
        pool.release_resource(&mut provider, r);
        assert_eq!(pool.checked_out_count(), 0);

        let again = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        assert_eq!(pool.checked_out_count(), 1);
        pool.release_resource(&mut provider, again);
        pool.evict_all(&mut provider);
        assert_eq!(provider.resource_count(), 0);
    }

    #[test]
    #[should_panic(expected = "call evict_all first")]
    #[cfg(debug_assertions)]
    fn dropping_a_pool_with_free_resources_panics() {
        let mut provider = SoftwareResourceProvider::new();
        let mut pool = ResourcePool::with_max_memory_usage_bytes(TILE_BYTES);
        let r = pool.acquire_resource(&mut provider, TILE, TextureFormat::Rgba8);
        pool.release_resource(&mut provider, r);
        drop(pool);
    }
}
