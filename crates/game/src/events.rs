//! Window event handling for GameState.

use winit::event::WindowEvent;
use winit::keyboard::{KeyCode, PhysicalKey};

impl crate::GameState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                    if key == KeyCode::Escape && event.state.is_pressed() {
                        self.running = false;
                        return true;
                    }
                }
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    log::error!("Render error: {}", e);
                    self.running = false;
                    return true;
                }
                self.window.request_redraw();
                false
            }
            _ => false,
        }
    }
}
