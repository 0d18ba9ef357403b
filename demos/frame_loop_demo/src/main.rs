// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated delegated-compositing frame loop that exercises the whole
//! pipeline.
//!
//! A child compositor draws a three-pass frame on every unthrottled tick,
//! filling tiles taken from a [`ResourcePool`]. A parent
//! [`DelegatedRendererLayer`] splices the frame into its own pass list, the
//! tiles are sent to the parent, and the parent acknowledges each frame a few
//! ticks later. Partway through, the graphics context is lost and rebuilt.
//!
//! Events go to both a [`PrettyPrintSink`] on stdout and a [`RecorderSink`];
//! the recording is then exported as a Chrome trace.

use std::cell::Cell;
use std::collections::VecDeque;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use fresco_core::frame_rate::{FrameRateConfig, FrameRateController, FrameRateControllerClient};
use fresco_core::geometry::{IntRect, IntSize, map_clipped_rect};
use fresco_core::time::{Duration, HostTime, Timebase};
use fresco_core::time_source::DelayBasedTimeSource;
use fresco_core::trace::{
    ClearReason, ContextLostEvent, DamageRect, FrameAckEvent, FrameSummaryBuilder, PendingChange,
    PendingFramesEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, QuadsAppendedEvent,
    RenderPassesClearedEvent, RenderPassesSetEvent, ResourceEvent, ResourceEventKind, Tracer,
    VsyncTickEvent,
};
use fresco_core::transform::Transform3d;
use fresco_debug::TeeSink;
use fresco_debug::pretty::PrettyPrintSink;
use fresco_debug::recorder::RecorderSink;
use fresco_render::pass::{
    Color, DrawQuad, EdgeAntiAliasing, Material, RenderPassList, SharedQuadState, TileQuad,
};
use fresco_render::renderer::{
    DelegatingRenderer, Renderer, RendererClient, RendererError, RendererSettings,
};
use fresco_render::resource::{
    CompositorFrameAck, GraphicsContext3d, ResetStatus, ResourceProvider,
    SoftwareResourceProvider, TextureFormat, TransferableResourceList,
};
use fresco_render::{
    AppendQuadsData, DelegatedRendererLayer, LayerDrawProperties, PooledResource, RenderPass,
    RenderPassId, RenderPassQuadSink, ResourcePool,
};
use kurbo::Rect;

const INTERVAL_COUNT: u64 = 60;
/// 16.6ms refresh interval in nanoseconds (≈60 Hz).
const REFRESH_INTERVAL_NS: u64 = 16_666_667;
/// Interval on which the context goes away.
const CONTEXT_LOSS_INTERVAL: u64 = 30;
/// Ticks between submitting a frame and the parent acknowledging it.
const ACK_LATENCY: u64 = 3;

const PARENT_LAYER_ID: i32 = 1;
const DELEGATED_LAYER_ID: i32 = 2;
/// Layer id the child compositor uses for its own passes.
const CHILD_LAYER_ID: i32 = 5;

const VIEWPORT: IntRect = IntRect::new(0, 0, 800, 600);
const CHILD_VIEWPORT: IntRect = IntRect::new(0, 0, 256, 256);
const TILE_SIZE: IntSize = IntSize::new(64, 64);
const TILES_PER_FRAME: i32 = 4;
const POOL_BUDGET_BYTES: u64 = 10 * TextureFormat::Rgba8.bytes_for(TILE_SIZE);

// ---------------------------------------------------------------------------
// Simulated platform
// ---------------------------------------------------------------------------

/// A graphics context whose loss is controlled from outside.
#[derive(Debug)]
struct DemoContext {
    lost: Rc<Cell<bool>>,
}

impl GraphicsContext3d for DemoContext {
    fn make_context_current(&mut self) -> bool {
        !self.lost.get()
    }

    fn extensions(&self) -> &str {
        "GL_EXT_read_format_bgra GL_CHROMIUM_set_visibility"
    }

    fn graphics_reset_status(&mut self) -> ResetStatus {
        if self.lost.get() {
            ResetStatus::InnocentContextReset
        } else {
            ResetStatus::NoError
        }
    }

    fn push_group_marker(&mut self, _marker: &str) {}
}

#[derive(Debug, Default)]
struct DemoClient {
    tick: Option<bool>,
    swaps_completed: u32,
    output_surface_lost: bool,
}

impl FrameRateControllerClient for DemoClient {
    fn vsync_tick(&mut self, throttled: bool) {
        self.tick = Some(throttled);
    }
}

impl RendererClient for DemoClient {
    fn on_swap_buffers_complete(&mut self) {
        self.swaps_completed += 1;
    }

    fn did_lose_output_surface(&mut self) {
        self.output_surface_lost = true;
    }
}

/// A frame the parent has not acknowledged yet.
#[derive(Debug)]
struct InFlightFrame {
    frame_index: u64,
    tiles: Vec<PooledResource>,
    resources: TransferableResourceList,
}

// ---------------------------------------------------------------------------
// Compositor
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Demo {
    lost: Rc<Cell<bool>>,
    settings: RendererSettings,
    provider: SoftwareResourceProvider,
    renderer: DelegatingRenderer,
    pool: ResourcePool,
    layer: DelegatedRendererLayer,
    frame_rate: FrameRateController,
    client: DemoClient,
    in_flight: VecDeque<InFlightFrame>,
    frames_acknowledged: u64,
}

impl Demo {
    fn new(
        start: HostTime,
        interval: Duration,
        lost: Rc<Cell<bool>>,
    ) -> Result<Self, RendererError> {
        let settings = RendererSettings {
            accelerate_painting: true,
        };
        let mut provider = new_provider(&lost);
        let renderer = DelegatingRenderer::create(settings, &mut provider)?;

        let mut layer = DelegatedRendererLayer::new(DELEGATED_LAYER_ID);
        layer.set_draw_properties(LayerDrawProperties {
            render_target: PARENT_LAYER_ID,
            draw_transform: Transform3d::from_translation(120.0, 80.0, 0.0),
            draw_opacity: 0.9,
            clip_rect: Some(VIEWPORT),
        });

        let mut frame_rate = FrameRateController::with_time_source(
            FrameRateConfig::double_buffered(),
            Box::new(DelayBasedTimeSource::new(start, interval)),
        );
        frame_rate.set_active(true, start);

        Ok(Self {
            lost,
            settings,
            provider,
            renderer,
            pool: ResourcePool::with_max_memory_usage_bytes(POOL_BUDGET_BYTES),
            layer,
            frame_rate,
            client: DemoClient::default(),
            in_flight: VecDeque::new(),
            frames_acknowledged: 0,
        })
    }

    /// Runs one refresh interval ending at `now`.
    fn step(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> Result<(), RendererError> {
        if self.renderer.is_context_lost(&mut self.provider) {
            self.recover_from_context_loss(now, tracer)?;
        }
        self.deliver_acks(now, tracer);

        if !self.frame_rate.poll(now, &mut self.client) {
            return Ok(());
        }
        let Some(throttled) = self.client.tick.take() else {
            return Ok(());
        };
        let tick = VsyncTickEvent {
            tick_index: self.frame_rate.tick_count(),
            now,
            throttled,
            frames_pending: self.frame_rate.num_frames_pending(),
        };
        tracer.vsync_tick(&tick);
        if !throttled {
            self.produce_frame(&tick, tracer);
        }
        Ok(())
    }

    fn produce_frame(&mut self, tick: &VsyncTickEvent, tracer: &mut Tracer<'_>) {
        let frame_index = tick.tick_index;
        let mut summary = FrameSummaryBuilder::new(tick);
        let mut t = tick.now;

        // -- begin frame: the child draws and hands over its passes ----------
        begin_phase(tracer, &mut summary, frame_index, PhaseKind::BeginFrame, t);
        self.frame_rate.did_begin_frame();
        tracer.pending_frames(&PendingFramesEvent {
            frame_index,
            change: PendingChange::Begin,
            frames_pending: self.frame_rate.num_frames_pending(),
            timestamp: t,
        });
        let mut tiles = Vec::new();
        for i in 0..TILES_PER_FRAME {
            tiles.push(self.acquire_tile(frame_index, i, tracer));
        }
        self.layer.set_render_passes(child_frame(frame_index, &tiles));
        let child_damage = self
            .layer
            .render_passes()
            .last()
            .map_or(Rect::ZERO, |root| root.damage_rect);
        tracer.render_passes_set(&RenderPassesSetEvent {
            frame_index,
            layer_id: self.layer.id(),
            pass_count: count(self.layer.render_passes().len()),
            root_damage: IntRect::enclosing(child_damage).into(),
        });
        t = t.saturating_add(Duration(400_000));
        end_phase(tracer, &mut summary, frame_index, PhaseKind::BeginFrame, t);

        // -- contributing passes ---------------------------------------------
        begin_phase(tracer, &mut summary, frame_index, PhaseKind::AppendPasses, t);
        let mut frame: RenderPassList = Vec::new();
        if self.layer.has_contributing_delegated_render_passes() {
            self.layer.append_contributing_render_passes(&mut frame);
        }
        for pass in &mut frame {
            let mut data = AppendQuadsData::new(pass.id);
            self.layer
                .append_quads(&mut RenderPassQuadSink::new(pass), &mut data);
            tracer.quads_appended(&QuadsAppendedEvent {
                frame_index,
                layer_id: self.layer.id(),
                target_layer_id: pass.id.layer_id,
                target_index: pass.id.index,
                quad_count: count(pass.quad_list.len()),
                shared_state_count: count(pass.shared_quad_state_list.len()),
            });
        }
        summary.add_passes(count(frame.len()));
        t = t.saturating_add(Duration(150_000));
        end_phase(tracer, &mut summary, frame_index, PhaseKind::AppendPasses, t);

        // -- parent root pass --------------------------------------------------
        begin_phase(tracer, &mut summary, frame_index, PhaseKind::AppendQuads, t);
        let parent_damage =
            map_clipped_rect(&self.layer.draw_properties().draw_transform, child_damage);
        let mut root = RenderPass::new();
        root.set_new(
            RenderPassId::new(PARENT_LAYER_ID, 0),
            VIEWPORT,
            parent_damage,
            Transform3d::IDENTITY,
        );
        let background = root.append_shared_quad_state(SharedQuadState::unclipped(VIEWPORT));
        root.append_quad(DrawQuad::solid_color(
            background,
            VIEWPORT,
            Color::from_argb(0xff, 0x20, 0x20, 0x28),
        ));
        let quads_before = root.quad_list.len();
        let states_before = root.shared_quad_state_list.len();
        let mut data = AppendQuadsData::new(root.id);
        self.layer
            .append_quads(&mut RenderPassQuadSink::new(&mut root), &mut data);
        tracer.quads_appended(&QuadsAppendedEvent {
            frame_index,
            layer_id: self.layer.id(),
            target_layer_id: root.id.layer_id,
            target_index: root.id.index,
            quad_count: count(root.quad_list.len() - quads_before),
            shared_state_count: count(root.shared_quad_state_list.len() - states_before),
        });
        frame.push(root);
        summary.add_passes(1);
        summary.add_quads(count(frame.iter().map(|pass| pass.quad_list.len()).sum()));
        t = t.saturating_add(Duration(1_800_000));
        end_phase(tracer, &mut summary, frame_index, PhaseKind::AppendQuads, t);

        // -- submit ------------------------------------------------------------
        begin_phase(tracer, &mut summary, frame_index, PhaseKind::Submit, t);
        let mut ids = Vec::new();
        for quad in frame.iter().flat_map(|pass| &pass.quad_list) {
            quad.for_each_resource(|id| ids.push(id));
        }
        let resources = self.provider.prepare_send_to_parent(&ids);
        let presented = self.renderer.swap_buffers();
        debug_assert!(presented, "a delegating swap cannot fail");
        let damage = DamageRect::from(IntRect::enclosing(parent_damage));
        tracer.damage_rects(frame_index, &[damage]);
        self.in_flight.push_back(InFlightFrame {
            frame_index,
            tiles,
            resources,
        });
        t = t.saturating_add(Duration(100_000));
        end_phase(tracer, &mut summary, frame_index, PhaseKind::Submit, t);

        tracer.frame_summary(&summary.finish());
    }

    /// Acknowledges every frame the parent has had for [`ACK_LATENCY`] ticks.
    fn deliver_acks(&mut self, now: HostTime, tracer: &mut Tracer<'_>) {
        let ticks = self.frame_rate.tick_count();
        while self
            .in_flight
            .front()
            .is_some_and(|frame| frame.frame_index + ACK_LATENCY <= ticks)
        {
            let Some(frame) = self.in_flight.pop_front() else {
                break;
            };
            self.acknowledge(frame, now, tracer);
        }
    }

    fn acknowledge(&mut self, frame: InFlightFrame, now: HostTime, tracer: &mut Tracer<'_>) {
        let ack = CompositorFrameAck::new(frame.resources);
        self.renderer
            .receive_compositor_frame_ack(&mut self.provider, &mut self.client, &ack);
        self.frames_acknowledged += 1;
        tracer.frame_ack(&FrameAckEvent {
            frame_index: frame.frame_index,
            timestamp: now,
            resource_count: count(ack.resources.len()),
        });

        while self.client.swaps_completed > 0 {
            self.client.swaps_completed -= 1;
            self.frame_rate.did_finish_frame();
            tracer.pending_frames(&PendingFramesEvent {
                frame_index: frame.frame_index,
                change: PendingChange::Finish,
                frames_pending: self.frame_rate.num_frames_pending(),
                timestamp: now,
            });
        }

        for tile in frame.tiles {
            self.release_tile(frame.frame_index, tile, tracer);
        }
    }

    /// Drops all delegated content and in-flight frames, then rebuilds the
    /// provider and renderer on a fresh context.
    fn recover_from_context_loss(
        &mut self,
        now: HostTime,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), RendererError> {
        let frame_index = self.frame_rate.tick_count();
        tracer.context_lost(&ContextLostEvent {
            frame_index,
            timestamp: now,
        });
        self.renderer.on_context_lost(&mut self.client);
        if !std::mem::take(&mut self.client.output_surface_lost) {
            return Ok(());
        }

        self.layer.did_lose_output_surface();
        tracer.render_passes_cleared(&RenderPassesClearedEvent {
            frame_index,
            layer_id: self.layer.id(),
            reason: ClearReason::OutputSurfaceLost,
        });

        self.frame_rate.did_abort_all_pending_frames();
        tracer.pending_frames(&PendingFramesEvent {
            frame_index,
            change: PendingChange::AbortAll,
            frames_pending: self.frame_rate.num_frames_pending(),
            timestamp: now,
        });

        // The parent will never return what it holds; the old provider keeps
        // those resources marked for deletion and is dropped with them.
        let budget = self.pool.max_memory_usage_bytes();
        self.evict_pool(frame_index, tracer);
        while let Some(frame) = self.in_flight.pop_front() {
            for tile in frame.tiles {
                self.release_tile(frame_index, tile, tracer);
            }
        }

        self.lost.set(false);
        self.provider = new_provider(&self.lost);
        self.pool.set_max_memory_usage_bytes(&mut self.provider, budget);
        self.renderer = DelegatingRenderer::create(self.settings, &mut self.provider)?;
        Ok(())
    }

    fn shutdown(&mut self, now: HostTime, tracer: &mut Tracer<'_>) {
        let frame_index = self.frame_rate.tick_count();
        self.layer.clear_render_passes();
        tracer.render_passes_cleared(&RenderPassesClearedEvent {
            frame_index,
            layer_id: self.layer.id(),
            reason: ClearReason::Explicit,
        });
        while let Some(frame) = self.in_flight.pop_front() {
            self.acknowledge(frame, now, tracer);
        }
        self.evict_pool(frame_index, tracer);
        self.frame_rate.set_active(false, now);
        self.renderer.set_visible(false);
    }

    fn acquire_tile(
        &mut self,
        frame_index: u64,
        fill: i32,
        tracer: &mut Tracer<'_>,
    ) -> PooledResource {
        let recycles = self.pool.stats().recycles;
        let tile = self
            .pool
            .acquire_resource(&mut self.provider, TILE_SIZE, TextureFormat::Rgba8);
        let kind = if self.pool.stats().recycles > recycles {
            ResourceEventKind::Recycled
        } else {
            ResourceEventKind::Allocated
        };
        tracer.resource(&ResourceEvent {
            frame_index,
            kind,
            resource_id: tile.id().0,
            bytes: tile.bytes(),
            memory_usage_bytes: self.pool.memory_usage_bytes(),
        });

        let id = tile.id();
        self.provider.lock_for_write(id);
        let shade = u8::try_from(fill * 0x40).unwrap_or(u8::MAX);
        self.provider.pixels_mut(id).fill(shade);
        self.provider.unlock_for_write(id);
        tile
    }

    fn release_tile(&mut self, frame_index: u64, tile: PooledResource, tracer: &mut Tracer<'_>) {
        let (resource_id, bytes) = (tile.id().0, tile.bytes());
        let destroyed = self.pool.stats().destroyed;
        self.pool.release_resource(&mut self.provider, tile);
        let kind = if self.pool.stats().destroyed > destroyed {
            ResourceEventKind::Destroyed
        } else {
            ResourceEventKind::Returned
        };
        tracer.resource(&ResourceEvent {
            frame_index,
            kind,
            resource_id,
            bytes,
            memory_usage_bytes: self.pool.memory_usage_bytes(),
        });
    }

    fn evict_pool(&mut self, frame_index: u64, tracer: &mut Tracer<'_>) {
        let evicted: Vec<_> = self
            .pool
            .free_resources()
            .map(|r| (r.id().0, r.bytes()))
            .collect();
        self.pool.evict_all(&mut self.provider);
        let memory_usage_bytes = self.pool.memory_usage_bytes();
        for (resource_id, bytes) in evicted {
            tracer.resource(&ResourceEvent {
                frame_index,
                kind: ResourceEventKind::Destroyed,
                resource_id,
                bytes,
                memory_usage_bytes,
            });
        }
    }
}

fn new_provider(lost: &Rc<Cell<bool>>) -> SoftwareResourceProvider {
    SoftwareResourceProvider::new()
        .with_best_texture_format(TextureFormat::Bgra8)
        .with_context(Box::new(DemoContext {
            lost: Rc::clone(lost),
        }))
}

/// The child compositor's frame: a tiled pass, a translucent overlay pass,
/// and a root that draws both.
fn child_frame(frame_index: u64, tiles: &[PooledResource]) -> Vec<RenderPass> {
    let tiled_rect = IntRect::new(0, 0, 128, 128);
    let mut tiled = RenderPass::new();
    tiled.set_new(
        RenderPassId::new(CHILD_LAYER_ID, 1),
        tiled_rect,
        tiled_rect.to_kurbo(),
        Transform3d::IDENTITY,
    );
    let state = tiled.append_shared_quad_state(SharedQuadState::unclipped(tiled_rect));
    for (i, tile) in (0_i32..).zip(tiles) {
        let rect = IntRect::new((i % 2) * 64, (i / 2) * 64, TILE_SIZE.width, TILE_SIZE.height);
        tiled.append_quad(DrawQuad::new(
            state,
            rect,
            Material::Tile(TileQuad {
                resource_id: tile.id(),
                tex_coord_rect: Rect::new(0.0, 0.0, 64.0, 64.0),
                texture_size: TILE_SIZE,
                swizzle_contents: false,
                edge_aa: EdgeAntiAliasing::default(),
            }),
        ));
    }

    let overlay_rect = IntRect::new(0, 0, 64, 64);
    let mut overlay = RenderPass::new();
    overlay.set_new(
        RenderPassId::new(CHILD_LAYER_ID, 2),
        overlay_rect,
        Rect::ZERO,
        Transform3d::IDENTITY,
    );
    let state = overlay.append_shared_quad_state(SharedQuadState::unclipped(overlay_rect));
    overlay.append_quad(DrawQuad::solid_color(
        state,
        overlay_rect,
        Color::from_argb(0x80, 0xff, 0x40, 0x00),
    ));

    // A 32px damage strip sweeping across the child viewport.
    let sweep = f64::from(u8::try_from(frame_index % 8).unwrap_or(0)) * 32.0;
    let mut root = RenderPass::new();
    root.set_new(
        RenderPassId::new(CHILD_LAYER_ID, 3),
        CHILD_VIEWPORT,
        Rect::new(sweep, 0.0, sweep + 32.0, 32.0),
        Transform3d::IDENTITY,
    );
    let state = root.append_shared_quad_state(SharedQuadState::unclipped(CHILD_VIEWPORT));
    root.append_quad(DrawQuad::render_pass(state, tiled_rect, tiled.id));
    root.append_quad(DrawQuad::render_pass(
        state,
        IntRect::new(160, 160, 64, 64),
        overlay.id,
    ));
    root.append_quad(DrawQuad::solid_color(
        state,
        CHILD_VIEWPORT,
        Color::from_argb(0xff, 0xf0, 0xf0, 0xf0),
    ));

    vec![tiled, overlay, root]
}

fn begin_phase(
    tracer: &mut Tracer<'_>,
    summary: &mut FrameSummaryBuilder,
    frame_index: u64,
    phase: PhaseKind,
    timestamp: HostTime,
) {
    summary.phase_begin(phase, timestamp);
    tracer.phase_begin(&PhaseBeginEvent {
        frame_index,
        phase,
        timestamp,
    });
}

fn end_phase(
    tracer: &mut Tracer<'_>,
    summary: &mut FrameSummaryBuilder,
    frame_index: u64,
    phase: PhaseKind,
    timestamp: HostTime,
) {
    summary.phase_end(phase, timestamp);
    tracer.phase_end(&PhaseEndEvent {
        frame_index,
        phase,
        timestamp,
    });
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn main() -> Result<(), Box<dyn Error>> {
    let timebase = Timebase::NANOS;
    let interval = Duration::from_nanos(REFRESH_INTERVAL_NS, timebase);
    let start = HostTime(1_000_000_000); // start at 1s

    // -- sinks -------------------------------------------------------------
    let mut sinks = TeeSink::new(
        PrettyPrintSink::new(Box::new(std::io::stdout()), timebase),
        RecorderSink::new(),
    );

    // -- simulated loop ----------------------------------------------------
    let lost = Rc::new(Cell::new(false));
    let mut demo = Demo::new(start, interval, Rc::clone(&lost))?;
    {
        let mut tracer = Tracer::new(&mut sinks);
        let mut now = start;
        for step in 0..INTERVAL_COUNT {
            now = now.saturating_add(interval);
            if step == CONTEXT_LOSS_INTERVAL {
                lost.set(true);
            }
            demo.step(now, &mut tracer)?;
        }
        demo.shutdown(now, &mut tracer);
    }

    let stats = demo.pool.stats();
    println!(
        "pool: {} allocated, {} recycled, {} destroyed, {} bytes held by the provider",
        stats.allocations,
        stats.recycles,
        stats.destroyed,
        demo.pool.memory_usage_bytes(),
    );

    // -- export Chrome trace -----------------------------------------------
    let (_, recorder) = sinks.into_inner();
    let path = "trace.json";
    let mut writer = BufWriter::new(File::create(path)?);
    fresco_debug::chrome::export(recorder.as_bytes(), timebase, &mut writer)?;

    println!(
        "Wrote {path} ({} ticks, {} frames acknowledged)",
        demo.frame_rate.tick_count(),
        demo.frames_acknowledged,
    );
    Ok(())
}
