use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::clock::FrameClock;
use crate::config::{Config, NUM_COLUMNS, NUM_ROWS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::input::InputState;
use crate::map::Map;
use crate::player::Player;
use crate::surface::{FrameBuffer, blit_nearest};

mod clock;
mod config;
mod input;
mod map;
mod player;
mod raycast;
mod renderer;
mod surface;

type WindowSurface = softbuffer::Surface<Rc<Window>, Rc<Window>>;

struct App {
    config: Config,
    window: Option<Rc<Window>>,
    surface: Option<WindowSurface>,
    startup_error: Option<anyhow::Error>,

    map: Map,
    player: Player,
    input: InputState,
    clock: FrameClock,
    frame: FrameBuffer,

    // FPS logging
    frame_counter: u32,
    last_fps_log: Instant,
}

impl App {
    fn new(config: Config, map: Map, player: Player) -> Self {
        Self {
            frame: FrameBuffer::new(config.screen_width as usize, config.screen_height as usize),
            config,
            window: None,
            surface: None,
            startup_error: None,
            map,
            player,
            input: InputState::default(),
            clock: FrameClock::new(),
            frame_counter: 0,
            last_fps_log: Instant::now(),
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title("First Person")
            .with_resizable(false)
            .with_inner_size(PhysicalSize::new(
                self.config.screen_width,
                self.config.screen_height,
            ));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .context("creating window")?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer surface: {e}"))?;

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        self.clock.reset();
        Ok(())
    }

    fn set_key(&mut self, code: KeyCode, pressed: bool) {
        match code {
            KeyCode::KeyA | KeyCode::ArrowLeft => self.input.turn_left = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => self.input.turn_right = pressed,
            KeyCode::KeyW | KeyCode::ArrowUp => self.input.move_forward = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => self.input.move_backward = pressed,
            _ => {}
        }
    }

    /// Input -> logic, once per frame.
    fn tick(&mut self) {
        let dt = self.clock.tick();
        self.input.apply(&mut self.player);
        self.player.update(&self.map, dt);
    }

    fn draw(&mut self, id: WindowId) {
        renderer::render_frame(&mut self.frame, &self.map, &self.player, &self.config);

        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return,
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return; // minimized
        };

        if let Err(e) = surface.resize(dw, dh) {
            log::warn!("skipping frame, resize failed: {e}");
            return;
        }
        let mut buf = match surface.buffer_mut() {
            Ok(buf) => buf,
            Err(e) => {
                log::warn!("skipping frame, no buffer: {e}");
                return;
            }
        };
        blit_nearest(
            &mut buf,
            dw.get() as usize,
            self.frame.front(),
            self.frame.width(),
            self.frame.height(),
        );
        if let Err(e) = buf.present() {
            log::warn!("present failed: {e}");
        }

        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_log).as_secs_f32();
        if elapsed >= 1.0 {
            log::debug!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_log = now;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                self.set_key(code, state == ElementState::Pressed);
            }

            WindowEvent::Resized(size) => {
                log::debug!("window is {}x{}", size.width, size.height);
            }

            WindowEvent::RedrawRequested => {
                self.tick();
                self.draw(id);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting grid_raycaster v{}", env!("CARGO_PKG_VERSION"));

    run()?;
    log::info!("shut down cleanly");
    Ok(())
}

fn run() -> Result<()> {
    let config = Config::new(SCREEN_WIDTH, SCREEN_HEIGHT, NUM_COLUMNS, NUM_ROWS)
        .context("invalid display configuration")?;
    log::info!(
        "{}x{} window, {} columns x {} rows",
        config.screen_width,
        config.screen_height,
        config.num_columns,
        config.num_rows
    );

    let map = match std::env::args_os().nth(1) {
        Some(path) => Map::load(&path)
            .with_context(|| format!("loading map {}", path.to_string_lossy()))?,
        None => Map::reference(),
    };
    log::info!("map is {}x{}", map.width(), map.height());

    let player = Player::new(8.0, 8.0, 0.0);
    if map.is_wall(player.x.floor() as i32, player.y.floor() as i32) {
        anyhow::bail!("start position ({}, {}) is inside a wall", player.x, player.y);
    }

    let event_loop = EventLoop::new().context("creating event loop")?;
    // Redraws continuously; the frame loop is driven by RedrawRequested.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, map, player);
    event_loop.run_app(&mut app).context("event loop")?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
