#![deny(clippy::all)]
#![forbid(unsafe_code)]

use error_iter::ErrorIter as _;
use life_grid::{GridCell, GridSize, Loc, World};
use log::{error, info};
use pixels::wgpu::Color;
use pixels::{Error, Pixels, PixelsBuilder, SurfaceTexture};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Cursor, CursorIcon, Fullscreen, Window, WindowId};

const BACKGROUND_COLOR: Color = Color::WHITE;

pub fn window_size_to_grid_size(window_size: PhysicalSize<u32>, cell_pixel_width: u32) -> GridSize {
    GridSize::new(
        window_size.width / cell_pixel_width,
        window_size.height / cell_pixel_width,
    )
}

pub fn animate<W, F>(tick_interval: Duration, build_world: F) -> Result<(), Error>
where
    W: World,
    F: Fn(PhysicalSize<u32>) -> W,
{
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut handler = AppEventHandler::new(tick_interval, build_world);
    event_loop.run_app(&mut handler).unwrap();
    match handler.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum RunState {
    Stopped,
    Running,
}

impl RunState {
    fn toggled(self) -> Self {
        match self {
            RunState::Stopped => RunState::Running,
            RunState::Running => RunState::Stopped,
        }
    }
}

struct App<W: World> {
    world: W,
    window: Arc<Window>,
    pixels: Pixels<'static>,
    tick_interval: Duration,
    next_update: Instant,
    run_state: RunState,
    cursor_position: Option<(f32, f32)>,
}

impl<W: World> App<W> {
    fn new<F>(
        event_loop: &ActiveEventLoop,
        tick_interval: Duration,
        build_world: &F,
    ) -> Result<Self, Error>
    where
        F: Fn(PhysicalSize<u32>) -> W,
    {
        let window = Arc::new(Self::build_window(event_loop));
        let world = build_world(window.inner_size());
        let pixels = Self::build_pixels(&window, world.width(), world.height())?;
        Ok(Self {
            world,
            window,
            pixels,
            tick_interval,
            next_update: Instant::now(),
            run_state: RunState::Stopped,
            cursor_position: None,
        })
    }

    fn build_window(event_loop: &ActiveEventLoop) -> Window {
        let window_attributes = Window::default_attributes()
            .with_cursor(Cursor::Icon(CursorIcon::Crosshair))
            .with_fullscreen(Some(Fullscreen::Borderless(None)))
            .with_visible(false);
        event_loop.create_window(window_attributes).unwrap()
    }

    fn build_pixels(
        window: &Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        PixelsBuilder::new(width, height, surface_texture)
            .clear_color(BACKGROUND_COLOR)
            .build()
    }

    fn on_create(&mut self) {
        self.window.request_redraw();
        self.window.set_visible(true);
    }

    fn on_time_step(&mut self) {
        self.world.update();
        self.window.request_redraw();

        while self.next_update < Instant::now() {
            self.next_update += self.tick_interval;
        }
    }

    fn toggle_run_state(&mut self) {
        self.run_state = self.run_state.toggled();
        match self.run_state {
            RunState::Running => {
                // The first generation advances as soon as play starts.
                self.next_update = Instant::now();
                info!("simulation running");
            }
            RunState::Stopped => info!("simulation stopped"),
        }
    }

    fn on_cursor_moved(&mut self, x: f32, y: f32) {
        self.cursor_position = Some((x, y));
    }

    fn on_click(&mut self) {
        let Some(position) = self.cursor_position else {
            return;
        };
        // Clicks that map to no grid cell are ignored.
        if let Ok((pixel_x, pixel_y)) = self.pixels.window_pos_to_pixel(position) {
            self.world
                .toggle_cell(Loc::new(pixel_y as u32, pixel_x as u32));
            self.window.request_redraw();
        }
    }

    fn randomize_world(&mut self) {
        self.world.randomize();
        self.window.request_redraw();
    }

    fn clear_world(&mut self) {
        self.world.clear();
        self.window.request_redraw();
    }

    fn on_redraw(&mut self) -> Result<(), Error> {
        let screen = self.pixels.frame_mut();
        debug_assert_eq!(screen.len(), 4 * self.world.num_cells());

        for (cell, pixel) in self.world.cells_iter().zip(screen.chunks_exact_mut(4)) {
            pixel.copy_from_slice(&cell.color_rgba());
        }
        self.pixels.render()
    }
}

struct AppEventHandler<W, F>
where
    W: World,
    F: Fn(PhysicalSize<u32>) -> W,
{
    tick_interval: Duration,
    build_world: F,
    app: Option<App<W>>,
    error: Option<Error>,
}

impl<W, F> AppEventHandler<W, F>
where
    W: World,
    F: Fn(PhysicalSize<u32>) -> W,
{
    fn new(tick_interval: Duration, build_world: F) -> Self {
        Self {
            tick_interval,
            build_world,
            app: None,
            error: None,
        }
    }

    fn app(&mut self) -> &mut App<W> {
        self.app.as_mut().unwrap()
    }
}

impl<W, F> ApplicationHandler for AppEventHandler<W, F>
where
    W: World,
    F: Fn(PhysicalSize<u32>) -> W,
{
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        // A tick timer still in flight when the user stops must not advance
        // the world.
        if let StartCause::ResumeTimeReached { .. } = cause
            && let Some(app) = self.app.as_mut()
            && app.run_state == RunState::Running
        {
            app.on_time_step();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_none() {
            match App::new(event_loop, self.tick_interval, &self.build_world) {
                Ok(app) => {
                    self.app = Some(app);
                    self.app().on_create();
                }
                Err(err) => {
                    log_error("create pixels surface", &err);
                    self.error = Some(err);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.app.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.app()
                    .on_cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.app().on_click();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Released,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape | KeyCode::KeyQ | KeyCode::KeyX => {
                    event_loop.exit();
                }
                KeyCode::Space => self.app().toggle_run_state(),
                KeyCode::KeyR => self.app().randomize_world(),
                KeyCode::KeyC => self.app().clear_world(),
                _ => (),
            },
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.app().on_redraw() {
                    log_error("render", &err);
                    self.error = Some(err);
                    event_loop.exit();
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(app) = self.app.as_ref() else {
            return;
        };
        match app.run_state {
            RunState::Running => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(app.next_update));
            }
            RunState::Stopped => {
                event_loop.set_control_flow(ControlFlow::Wait);
            }
        }
    }
}

fn log_error<E: std::error::Error + 'static>(context: &str, err: &E) {
    error!("{context} failed: {err}");
    for source in err.sources().skip(1) {
        error!("  caused by: {source}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_state_toggles_between_the_two_states() {
        assert_eq!(RunState::Stopped.toggled(), RunState::Running);
        assert_eq!(RunState::Running.toggled(), RunState::Stopped);
    }

    #[test]
    fn grid_size_comes_from_integer_division_of_the_window() {
        let grid_size = window_size_to_grid_size(PhysicalSize::new(1280, 725), 10);
        assert_eq!(grid_size, GridSize::new(128, 72));
    }
}
