//! Immediate-mode style drawing surface for custom geometry.
//!
//! The host renderer owns global state for its 2D layer. Custom drawing is
//! bracketed by `begin_custom`/`end_custom`, and everything set in between
//! must be forgotten again at `end_custom`. [`RawGraphicsScope`] holds the
//! context exclusively for the bracket and guarantees the closing call.

use std::ops::{Deref, DerefMut};

use engine_core::{TerrainVertex, TextureHandle};
use glam::Mat4;

/// Raw drawing calls a backend exposes to custom renderers.
pub trait GraphicsContext {
    /// Enter custom drawing. Saves whatever the host needs restored.
    fn begin_custom(&mut self);
    /// Leave custom drawing. Flushes pending work and resets all state set
    /// since `begin_custom`.
    fn end_custom(&mut self);

    fn clear(&mut self, color: [f32; 4], depth: f32);
    /// `None` disables the depth test.
    fn set_depth_test(&mut self, compare: Option<wgpu::CompareFunction>);
    /// `None` disables blending.
    fn set_blend(&mut self, blend: Option<wgpu::BlendState>);
    fn set_projection(&mut self, projection: Mat4);
    fn set_model_view(&mut self, model_view: Mat4);
    fn bind_texture(&mut self, texture: TextureHandle);
    /// Draw `vertices` as one standalone triangle strip.
    fn draw_strip(&mut self, vertices: &[TerrainVertex]);
}

/// Exclusive hold on a [`GraphicsContext`] between `begin_custom` and
/// `end_custom`. Dropping the scope ends it.
pub struct RawGraphicsScope<'a, C: GraphicsContext + ?Sized> {
    ctx: &'a mut C,
    released: bool,
}

impl<'a, C: GraphicsContext + ?Sized> RawGraphicsScope<'a, C> {
    pub fn acquire(ctx: &'a mut C) -> Self {
        ctx.begin_custom();
        Self { ctx, released: false }
    }

    /// End the custom bracket now. Later calls and the eventual drop are no-ops.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.ctx.end_custom();
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<C: GraphicsContext + ?Sized> Deref for RawGraphicsScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.ctx
    }
}

impl<C: GraphicsContext + ?Sized> DerefMut for RawGraphicsScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        assert!(!self.released, "graphics scope used after release");
        &mut *self.ctx
    }
}

impl<C: GraphicsContext + ?Sized> Drop for RawGraphicsScope<'_, C> {
    fn drop(&mut self) {
        self.release();
    }
}

/// One recorded call on a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicsCommand {
    BeginCustom,
    EndCustom,
    Clear { color: [f32; 4], depth: f32 },
    DepthTest(Option<wgpu::CompareFunction>),
    Blend(Option<wgpu::BlendState>),
    Projection(Mat4),
    ModelView(Mat4),
    BindTexture(TextureHandle),
    DrawStrip(Vec<TerrainVertex>),
}

/// Context that records every call instead of drawing. Useful for checking
/// what a custom renderer emits without a GPU.
///
/// Calls outside a `begin_custom`/`end_custom` bracket panic, as do nested
/// brackets.
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<GraphicsCommand>,
    active: bool,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[GraphicsCommand] {
        &self.commands
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Vertices of every recorded strip, in submission order.
    pub fn strips(&self) -> impl Iterator<Item = &[TerrainVertex]> + '_ {
        self.commands.iter().filter_map(|c| match c {
            GraphicsCommand::DrawStrip(v) => Some(v.as_slice()),
            _ => None,
        })
    }

    pub fn take_commands(&mut self) -> Vec<GraphicsCommand> {
        std::mem::take(&mut self.commands)
    }

    fn record(&mut self, command: GraphicsCommand) {
        assert!(self.active, "{:?} issued outside a custom draw", command);
        self.commands.push(command);
    }
}

impl GraphicsContext for RecordingContext {
    fn begin_custom(&mut self) {
        assert!(!self.active, "custom draw already in progress");
        self.active = true;
        self.commands.push(GraphicsCommand::BeginCustom);
    }

    fn end_custom(&mut self) {
        assert!(self.active, "end_custom without begin_custom");
        self.commands.push(GraphicsCommand::EndCustom);
        self.active = false;
    }

    fn clear(&mut self, color: [f32; 4], depth: f32) {
        self.record(GraphicsCommand::Clear { color, depth });
    }

    fn set_depth_test(&mut self, compare: Option<wgpu::CompareFunction>) {
        self.record(GraphicsCommand::DepthTest(compare));
    }

    fn set_blend(&mut self, blend: Option<wgpu::BlendState>) {
        self.record(GraphicsCommand::Blend(blend));
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.record(GraphicsCommand::Projection(projection));
    }

    fn set_model_view(&mut self, model_view: Mat4) {
        self.record(GraphicsCommand::ModelView(model_view));
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.record(GraphicsCommand::BindTexture(texture));
    }

    fn draw_strip(&mut self, vertices: &[TerrainVertex]) {
        self.record(GraphicsCommand::DrawStrip(vertices.to_vec()));
    }
}
