//! Render pass for the scrolling terrain background.
//!
//! One frame walks a fixed sequence:
//! `Idle -> FrameBegun -> StateConfigured -> TextureBound -> Submitting* -> FrameEnded -> Idle`.
//! Configuring clears the target and sets depth, blend and both matrices. A
//! missing texture region skips straight from `StateConfigured` to
//! `FrameEnded`. Calls out of order panic so no half-configured state leaks
//! into the sprite layer drawn afterwards.

use engine_core::{TerrainQuad, TextureRegion};

use crate::camera::BackgroundCamera;
use crate::context::{GraphicsContext, RawGraphicsScope};

/// Sky blue behind the terrain.
pub const SKY_COLOR: [f32; 4] = [0.0, 0.2, 0.5, 1.0];
/// The depth test passes on greater-or-equal, so depth starts at the minimum.
pub const CLEAR_DEPTH: f32 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Idle,
    FrameBegun,
    StateConfigured,
    TextureBound,
    Submitting,
    FrameEnded,
}

/// What a finished frame did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub texture_bound: bool,
    pub quads_submitted: usize,
}

/// Owns the fixed render state of the background and tracks frame progress.
#[derive(Debug)]
pub struct BackgroundPass {
    camera: BackgroundCamera,
    clear_color: [f32; 4],
    state: PassState,
}

impl Default for BackgroundPass {
    fn default() -> Self {
        Self::new(BackgroundCamera::default())
    }
}

impl BackgroundPass {
    pub fn new(camera: BackgroundCamera) -> Self {
        Self {
            camera,
            clear_color: SKY_COLOR,
            state: PassState::Idle,
        }
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    pub fn camera(&self) -> &BackgroundCamera {
        &self.camera
    }

    /// Take the context for one frame.
    ///
    /// # Panics
    /// If a previous frame was leaked instead of dropped.
    pub fn begin_frame<'a, C: GraphicsContext + ?Sized>(
        &'a mut self,
        ctx: &'a mut C,
    ) -> BackgroundFrame<'a, C> {
        assert_eq!(self.state, PassState::Idle, "background frame already in progress");
        let scope = RawGraphicsScope::acquire(ctx);
        self.state = PassState::FrameBegun;
        BackgroundFrame {
            pass: self,
            scope,
            stats: FrameStats::default(),
        }
    }

    /// Run a whole frame: configure, bind `region` and submit `quads`.
    ///
    /// With no region the frame still clears and configures but submits
    /// nothing.
    pub fn draw<C: GraphicsContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        region: Option<&TextureRegion>,
        quads: &[TerrainQuad],
    ) -> FrameStats {
        let mut frame = self.begin_frame(ctx);
        frame.configure();
        if frame.bind_texture(region) {
            for quad in quads {
                frame.submit(quad);
            }
        }
        frame.end()
    }
}

/// A frame in progress. Dropping it ends the frame and releases the context
/// on every path, including early returns.
pub struct BackgroundFrame<'a, C: GraphicsContext + ?Sized> {
    pass: &'a mut BackgroundPass,
    scope: RawGraphicsScope<'a, C>,
    stats: FrameStats,
}

impl<C: GraphicsContext + ?Sized> BackgroundFrame<'_, C> {
    pub fn state(&self) -> PassState {
        self.pass.state
    }

    /// Clear, then set depth test, blending, projection and model-view.
    pub fn configure(&mut self) {
        self.require(&[PassState::FrameBegun], "configure");
        let camera = self.pass.camera;
        self.scope.clear(self.pass.clear_color, CLEAR_DEPTH);
        self.scope.set_depth_test(Some(wgpu::CompareFunction::GreaterEqual));
        self.scope.set_blend(Some(wgpu::BlendState::ALPHA_BLENDING));
        self.scope.set_projection(camera.projection_matrix());
        self.scope.set_model_view(camera.model_view_matrix());
        self.pass.state = PassState::StateConfigured;
    }

    /// Bind the region's texture. Returns `false` when there is no region,
    /// in which case the frame ends without submitting anything.
    pub fn bind_texture(&mut self, region: Option<&TextureRegion>) -> bool {
        self.require(&[PassState::StateConfigured], "bind_texture");
        match region {
            Some(region) => {
                self.scope.bind_texture(region.texture);
                self.pass.state = PassState::TextureBound;
                self.stats.texture_bound = true;
                true
            }
            None => {
                self.finish();
                false
            }
        }
    }

    /// Submit one quad as a standalone strip.
    pub fn submit(&mut self, quad: &TerrainQuad) {
        self.require(&[PassState::TextureBound, PassState::Submitting], "submit");
        self.scope.draw_strip(quad);
        self.pass.state = PassState::Submitting;
        self.stats.quads_submitted += 1;
    }

    /// End the frame and report what it did.
    pub fn end(mut self) -> FrameStats {
        self.finish();
        self.stats
    }

    fn finish(&mut self) {
        if self.pass.state == PassState::Idle {
            return;
        }
        self.pass.state = PassState::FrameEnded;
        self.scope.release();
        self.pass.state = PassState::Idle;
    }

    fn require(&self, allowed: &[PassState], op: &str) {
        assert!(
            allowed.contains(&self.pass.state),
            "{} called in state {:?}",
            op,
            self.pass.state
        );
    }
}

impl<C: GraphicsContext + ?Sized> Drop for BackgroundFrame<'_, C> {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{GraphicsCommand, RecordingContext};
    use engine_core::{TerrainVertex, TextureHandle};

    fn quad(h: f32) -> TerrainQuad {
        [TerrainVertex::new([0.0, 0.0, h], h, [0.0, 0.0]); 4]
    }

    fn region() -> TextureRegion {
        TextureRegion::full(TextureHandle(5))
    }

    #[test]
    fn frame_issues_state_in_order() {
        let mut ctx = RecordingContext::new();
        let mut pass = BackgroundPass::default();
        let quads = [quad(0.1), quad(0.2)];

        let stats = pass.draw(&mut ctx, Some(&region()), &quads);

        let camera = BackgroundCamera::default();
        assert_eq!(
            ctx.commands(),
            &[
                GraphicsCommand::BeginCustom,
                GraphicsCommand::Clear { color: SKY_COLOR, depth: 0.0 },
                GraphicsCommand::DepthTest(Some(wgpu::CompareFunction::GreaterEqual)),
                GraphicsCommand::Blend(Some(wgpu::BlendState::ALPHA_BLENDING)),
                GraphicsCommand::Projection(camera.projection_matrix()),
                GraphicsCommand::ModelView(camera.model_view_matrix()),
                GraphicsCommand::BindTexture(TextureHandle(5)),
                GraphicsCommand::DrawStrip(quads[0].to_vec()),
                GraphicsCommand::DrawStrip(quads[1].to_vec()),
                GraphicsCommand::EndCustom,
            ]
        );
        assert_eq!(stats, FrameStats { texture_bound: true, quads_submitted: 2 });
        assert_eq!(pass.state(), PassState::Idle);
    }

    #[test]
    fn missing_region_configures_but_submits_nothing() {
        let mut ctx = RecordingContext::new();
        let mut pass = BackgroundPass::default();

        let stats = pass.draw(&mut ctx, None, &[quad(0.5)]);

        assert_eq!(stats, FrameStats::default());
        assert_eq!(ctx.strips().count(), 0);
        let commands = ctx.commands();
        assert!(matches!(commands[1], GraphicsCommand::Clear { .. }));
        assert!(commands.contains(&GraphicsCommand::Blend(Some(wgpu::BlendState::ALPHA_BLENDING))));
        assert!(!commands.iter().any(|c| matches!(c, GraphicsCommand::BindTexture(_))));
        assert_eq!(commands.last(), Some(&GraphicsCommand::EndCustom));
        assert_eq!(pass.state(), PassState::Idle);
        assert!(!ctx.is_active());
    }

    #[test]
    fn states_advance_through_the_frame() {
        let mut ctx = RecordingContext::new();
        let mut pass = BackgroundPass::default();
        {
            let mut frame = pass.begin_frame(&mut ctx);
            assert_eq!(frame.state(), PassState::FrameBegun);
            frame.configure();
            assert_eq!(frame.state(), PassState::StateConfigured);
            assert!(frame.bind_texture(Some(&region())));
            assert_eq!(frame.state(), PassState::TextureBound);
            frame.submit(&quad(0.3));
            assert_eq!(frame.state(), PassState::Submitting);
        }
        assert_eq!(pass.state(), PassState::Idle);
        assert!(!ctx.is_active());
    }

    #[test]
    fn dropped_frame_releases_context() {
        let mut ctx = RecordingContext::new();
        let mut pass = BackgroundPass::default();
        drop(pass.begin_frame(&mut ctx));
        assert_eq!(pass.state(), PassState::Idle);
        assert_eq!(ctx.commands(), &[GraphicsCommand::BeginCustom, GraphicsCommand::EndCustom]);

        // The pass is reusable for the next frame.
        let stats = pass.draw(&mut ctx, Some(&region()), &[quad(0.9)]);
        assert_eq!(stats.quads_submitted, 1);
    }

    #[test]
    #[should_panic(expected = "submit called in state StateConfigured")]
    fn submit_before_bind_panics() {
        let mut ctx = RecordingContext::new();
        let mut pass = BackgroundPass::default();
        let mut frame = pass.begin_frame(&mut ctx);
        frame.configure();
        frame.submit(&quad(0.1));
    }

    #[test]
    #[should_panic(expected = "bind_texture called in state FrameBegun")]
    fn bind_before_configure_panics() {
        let mut ctx = RecordingContext::new();
        let mut pass = BackgroundPass::default();
        let mut frame = pass.begin_frame(&mut ctx);
        frame.bind_texture(Some(&region()));
    }

    #[test]
    #[should_panic(expected = "submit called in state Idle")]
    fn submit_after_missing_region_panics() {
        let mut ctx = RecordingContext::new();
        let mut pass = BackgroundPass::default();
        let mut frame = pass.begin_frame(&mut ctx);
        frame.configure();
        assert!(!frame.bind_texture(None));
        frame.submit(&quad(0.1));
    }
}
