// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resources and the provider that owns them.
//!
//! The [`ResourceProvider`] trait is the boundary to whatever actually backs
//! resources. [`SoftwareResourceProvider`] implements it in memory.

mod context;
mod provider;
mod software;
mod transfer;

pub use context::{GlExtensions, GraphicsContext3d, ResetStatus};
pub use provider::{ResourceId, ResourceProvider, TextureFormat, TextureUsage};
pub use software::{DEFAULT_MAX_TEXTURE_SIZE, SoftwareResourceProvider};
pub use transfer::{
    CompositorFrameAck, MAILBOX_NAME_LEN, Mailbox, TransferableResource, TransferableResourceList,
};
