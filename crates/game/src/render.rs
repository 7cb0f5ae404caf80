//! Frame rendering: terrain background first, then sprites and HUD on top.

use anyhow::Result;

use crate::{hud, GameState};

/// Draw one frame. Called from `GameState::render()`.
///
/// A lost or outdated surface is reconfigured and the frame skipped. Running
/// out of GPU memory is the only error returned.
pub fn run(state: &mut GameState) -> Result<()> {
    let (output, mut encoder) = match state.renderer.begin_frame() {
        Ok(frame) => frame,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            log::debug!("Surface lost or outdated, reconfiguring");
            state.renderer.reconfigure();
            return Ok(());
        }
        Err(wgpu::SurfaceError::OutOfMemory) => anyhow::bail!("GPU out of memory"),
        Err(e) => {
            log::warn!("Skipping frame: {}", e);
            return Ok(());
        }
    };
    let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

    {
        let mut ctx = state.renderer.custom_draw(&mut encoder, &view);
        state.background.draw(&mut ctx);
    }

    // Overlay coordinates are playfield units, independent of DPI scaling.
    let bounds = state.session.bounds();
    let overlay = hud::build(&state.session, state.time.elapsed_millis(), bounds.x, bounds.y);
    state.renderer.render_overlay(&mut encoder, &view, &overlay);

    state.renderer.end_frame(output, encoder);
    Ok(())
}
