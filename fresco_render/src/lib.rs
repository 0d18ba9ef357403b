// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render passes, delegated rendering, and resource management for fresco.
//!
//! This crate sits on top of [`fresco_core`] and holds everything that knows
//! about render passes and resources:
//!
//! - [`pass`] — [`RenderPass`], [`RenderPassId`], draw quads and shared quad
//!   state
//! - [`DelegatedRendererLayer`] — splices a child compositor's passes into
//!   the parent frame
//! - [`QuadSink`] / [`RenderPassSink`] — where appended content goes
//! - [`resource`] — the [`ResourceProvider`](resource::ResourceProvider)
//!   contract, transfer types, and an in-memory provider
//! - [`ResourcePool`] — recycles resources under a memory budget
//! - [`renderer`] — the [`Renderer`](renderer::Renderer) trait and
//!   [`DelegatingRenderer`](renderer::DelegatingRenderer)
//!
//! Everything here is single-threaded and synchronous. Collaborators such as
//! the resource provider and renderer client are passed into each call
//! rather than stored.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod delegated;
mod pool;
mod sink;

pub mod pass;
pub mod renderer;
pub mod resource;

pub use delegated::{DelegatedRendererLayer, LayerDrawProperties};
pub use pass::{RenderPass, RenderPassId};
pub use pool::{PoolStats, PooledResource, ResourcePool};
pub use sink::{AppendQuadsData, QuadSink, RenderPassQuadSink, RenderPassSink};
