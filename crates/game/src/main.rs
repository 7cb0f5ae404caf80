//! SkyScroll: a small vertical shooter over a scrolling procedural landscape.

mod background;
mod beam;
mod config;
mod events;
mod falling;
mod hud;
mod player;
mod render;
mod session;

use anyhow::Result;
use engine_core::{TextureRegion, Time};
use input::InputState;
use rand::{rngs::StdRng, SeedableRng};
use renderer::Renderer;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use background::ScrollingBackground;
use config::GameConfig;
use session::Session;

/// Everything the running game owns.
pub(crate) struct GameState {
    pub window: Arc<Window>,
    pub renderer: Renderer,
    pub input: InputState,
    pub time: Time,
    pub rng: StdRng,
    pub background: ScrollingBackground,
    pub session: Session,
    pub running: bool,
}

impl GameState {
    async fn new(window: Arc<Window>, config: &GameConfig) -> Result<Self> {
        let mut renderer = Renderer::new(window.clone(), config.vsync).await?;

        let mut rng = match config.seed {
            Some(seed) => {
                log::info!("Using seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        let region = load_background_region(&mut renderer, config);
        let background = ScrollingBackground::new(&config.terrain, region, &mut rng)?;
        let session = Session::new(config.window_width as f32, config.window_height as f32);

        Ok(Self {
            window,
            renderer,
            input: InputState::new(),
            time: Time::new(),
            rng,
            background,
            session,
            running: true,
        })
    }

    /// One game tick: session first, then the background scroll.
    fn update(&mut self) {
        self.time.update();
        let controls = self.input.controls();
        self.session.update(controls, self.time.delta_millis(), &mut self.rng);
        self.background.scroll(&mut self.rng);
        self.input.end_frame();
    }

    fn render(&mut self) -> Result<()> {
        render::run(self)
    }
}

/// A missing or unusable texture leaves the background as plain sky.
fn load_background_region(renderer: &mut Renderer, config: &GameConfig) -> Option<TextureRegion> {
    match renderer.load_texture_region(&config.background_texture) {
        Ok(region) => region,
        Err(e) => {
            log::warn!("{}; drawing sky only", e);
            None
        }
    }
}

/// Application handler for winit.
struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = GameConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title(config.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height))
                .with_resizable(false);

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let state = pollster::block_on(GameState::new(window.clone(), &config));
            match state {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize game: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("SkyScroll");
    println!("  Arrows / WASD - Move");
    println!("  Space         - Fire");
    println!("  Escape        - Quit");

    log::info!("Starting SkyScroll");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
