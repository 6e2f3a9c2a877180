use std::time::{Duration, Instant};

use pixels::{PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::graphics::Renderer2d;
use crate::input::{PointerEvent, PointerTracker, TouchPhase};
use crate::pixels_renderer::PixelsRenderer2d;
use crate::surface::SurfaceSize;
use crate::ui::Point2;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("pixel surface unavailable: {0}")]
    Pixels(#[from] pixels::Error),
}

pub struct AppConfig {
    pub title: String,
    pub desired_size: SurfaceSize,
    pub clamp_to_monitor: bool,
    pub vsync: Option<bool>,
}

pub struct AppContext {
    pub window: Window,
    pub renderer: PixelsRenderer2d,
    pub surface_size: SurfaceSize,
}

/// A frame-driven game hosted by `run_game`.
///
/// Per redraw the loop calls, in order: `update_state` with every pointer event queued since
/// the previous frame, `render`, then `handle_effects` with whatever `update_state` returned.
/// Nothing else touches the state between those calls.
pub trait GameApp {
    type State;
    type Effect;

    fn init_state(&mut self, ctx: &mut AppContext) -> Self::State;

    fn update_state(
        &mut self,
        state: &mut Self::State,
        events: &[PointerEvent],
        dt: Duration,
        ctx: &mut AppContext,
    ) -> Vec<Self::Effect>;

    /// Draws one frame. Takes the state mutably so per-frame animation can be applied while
    /// drawing.
    fn render(&mut self, state: &mut Self::State, renderer: &mut dyn Renderer2d);

    fn handle_effects(
        &mut self,
        _state: &mut Self::State,
        _effects: Vec<Self::Effect>,
        _ctx: &mut AppContext,
    ) {
    }

    fn on_resize(&mut self, _state: &mut Self::State, _size: SurfaceSize) {}

    fn on_exit(&mut self, _state: &Self::State) {}
}

fn map_touch_phase(phase: winit::event::TouchPhase) -> TouchPhase {
    match phase {
        winit::event::TouchPhase::Started => TouchPhase::Started,
        winit::event::TouchPhase::Moved => TouchPhase::Moved,
        winit::event::TouchPhase::Ended => TouchPhase::Ended,
        winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}

fn to_point(x: f64, y: f64) -> Point2 {
    Point2::new(x.max(0.0) as f32, y.max(0.0) as f32)
}

pub fn run_game<G: GameApp + 'static>(config: AppConfig, mut game: G) -> Result<(), AppError> {
    let event_loop = EventLoop::new();
    let desired = PhysicalSize::new(config.desired_size.width, config.desired_size.height);
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = if let Some(monitor) = monitor_size {
        PhysicalSize::new(
            desired.width.min(monitor.width),
            desired.height.min(monitor.height),
        )
    } else {
        desired
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width.max(1), window_size.height.max(1));

    let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
    let mut pixels_builder =
        PixelsBuilder::new(surface_size.width, surface_size.height, surface_texture);
    if let Some(vsync) = config.vsync {
        pixels_builder = pixels_builder.enable_vsync(vsync);
    }
    let pixels = pixels_builder.build()?;
    let renderer = PixelsRenderer2d::new(pixels, surface_size)?;

    let mut ctx = AppContext {
        window,
        renderer,
        surface_size,
    };
    let mut state = game.init_state(&mut ctx);
    let mut pointer = PointerTracker::default();
    let mut last_frame = Instant::now();

    tracing::info!(
        width = surface_size.width,
        height = surface_size.height,
        "window ready"
    );

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    let size = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = ctx.renderer.resize(size) {
                        tracing::warn!(error = %err, "resize failed");
                    }
                    if !size.is_empty() {
                        ctx.surface_size = size;
                        game.on_resize(&mut state, size);
                    }
                    ctx.window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    pointer.cursor_moved(to_point(position.x, position.y));
                }
                WindowEvent::MouseInput {
                    state: button_state,
                    button: MouseButton::Left,
                    ..
                } => {
                    pointer.mouse_button(*button_state == ElementState::Pressed);
                }
                WindowEvent::Touch(touch) => {
                    pointer.touch(
                        touch.id,
                        map_touch_phase(touch.phase),
                        to_point(touch.location.x, touch.location.y),
                    );
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                let events = pointer.drain();
                let effects = game.update_state(&mut state, &events, dt, &mut ctx);

                ctx.renderer.draw_frame(|gfx| {
                    game.render(&mut state, gfx);
                });
                if let Err(err) = ctx.renderer.present() {
                    tracing::warn!(error = %err, "present failed");
                }

                game.handle_effects(&mut state, effects, &mut ctx);
            }
            Event::MainEventsCleared => {
                ctx.window.request_redraw();
            }
            Event::LoopDestroyed => {
                game.on_exit(&state);
            }
            _ => {}
        }
    });
}
