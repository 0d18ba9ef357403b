// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Types that move resources between a child and its parent compositor.

use alloc::vec::Vec;
use core::fmt;

use fresco_core::geometry::IntSize;

use super::provider::{ResourceId, TextureFormat};

/// Size of a mailbox name in bytes.
pub const MAILBOX_NAME_LEN: usize = 64;

/// A name under which a texture can be shared across contexts.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mailbox {
    name: [u8; MAILBOX_NAME_LEN],
}

impl Mailbox {
    /// The unset mailbox.
    pub const ZERO: Self = Self {
        name: [0; MAILBOX_NAME_LEN],
    };

    /// Wraps a raw name.
    #[must_use]
    pub const fn new(name: [u8; MAILBOX_NAME_LEN]) -> Self {
        Self { name }
    }

    /// Raw name bytes.
    #[must_use]
    pub const fn name(&self) -> &[u8; MAILBOX_NAME_LEN] {
        &self.name
    }

    /// Returns `true` if no name has been assigned.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.name.iter().all(|&b| b == 0)
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mailbox(")?;
        for b in &self.name[..8] {
            write!(f, "{b:02x}")?;
        }
        f.write_str("..)")
    }
}

/// A resource as seen by the compositor it was sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferableResource {
    /// Id in the sending provider.
    pub id: ResourceId,
    /// Texel format.
    pub format: TextureFormat,
    /// Size in texels.
    pub size: IntSize,
    /// Shared name of the backing texture.
    pub mailbox: Mailbox,
}

/// A batch of resources crossing the compositor boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferableResourceList {
    /// The resources.
    pub resources: Vec<TransferableResource>,
    /// Point the receiver must wait on before using the resources; zero
    /// when there is nothing to wait for.
    pub sync_point: u32,
}

impl TransferableResourceList {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            resources: Vec::new(),
            sync_point: 0,
        }
    }

    /// Returns `true` if there are no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Ids of the resources, in order.
    pub fn ids(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.resources.iter().map(|r| r.id)
    }
}

/// The parent's acknowledgement of a submitted frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositorFrameAck {
    /// Resources the parent no longer needs.
    pub resources: TransferableResourceList,
}

impl CompositorFrameAck {
    /// An ack returning `resources`.
    #[must_use]
    pub const fn new(resources: TransferableResourceList) -> Self {
        Self { resources }
    }
}
