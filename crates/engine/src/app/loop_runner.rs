use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::config::{validate_loop_config, ConfigError};
use crate::sim::{Engine, Grid};

use super::input::{InputAction, InputCollector};
use super::metrics::MetricsAccumulator;
use super::Renderer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopConfig {
    pub window_title: String,
    pub grid: Grid,
    pub start_running: bool,
    pub metrics_log_interval_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Grid Engine".to_string(),
            grid: Grid::default(),
            start_running: true,
            metrics_log_interval_ms: 1000,
        }
    }
}

impl LoopConfig {
    pub fn metrics_log_interval(&self) -> Duration {
        normalize_non_zero_duration(
            Duration::from_millis(self.metrics_log_interval_ms),
            Duration::from_secs(1),
        )
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Opens the window, lets `setup` populate the engine, then drives one
/// engine frame per redraw until Escape or close.
pub fn run_app<F>(config: LoopConfig, setup: F) -> Result<(), AppError>
where
    F: FnOnce(&mut Engine),
{
    validate_loop_config(&config)?;
    let grid = config.grid;
    let (canvas_width, canvas_height) = grid.canvas_size_px();

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                canvas_width as f64,
                canvas_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window), grid).map_err(AppError::CreateRenderer)?;

    let mut engine = Engine::new(grid);
    engine.set_running(config.start_running);
    setup(&mut engine);
    info!(
        cols = grid.cols,
        rows = grid.rows,
        cell_width = grid.cell_width,
        cell_height = grid.cell_height,
        entity_count = engine.entity_count(),
        running = engine.is_running(),
        "engine_ready"
    );

    event_loop.set_control_flow(ControlFlow::Poll);

    let metrics_log_interval = config.metrics_log_interval();
    info!(
        window_title = config.window_title.as_str(),
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_frame_instant = Instant::now();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input_collector.mark_quit_requested();
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let position_px =
                        renderer.window_to_pointer_px(position.x as f32, position.y as f32);
                    let pointer_event = input_collector.cursor_moved(position_px);
                    engine.handle_pointer(pointer_event);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    if let Some(pointer_event) = input_collector.mouse_input(button, state) {
                        engine.handle_pointer(pointer_event);
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    match input_collector.key_input(event.physical_key, event.state, event.repeat)
                    {
                        Some(InputAction::Key(key)) => engine.handle_key(key),
                        Some(InputAction::Quit) => {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                        None => {}
                    }
                }
                WindowEvent::RedrawRequested => {
                    if input_collector.quit_requested() {
                        return;
                    }
                    let now = Instant::now();
                    let frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    if let Err(error) = renderer.render_frame(&mut engine, now) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    metrics_accumulator.record_frame(frame_dt, &engine);

                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            frame_time_ms = snapshot.frame_time_ms,
                            active_entities = snapshot.active_entities,
                            backup_entities = snapshot.backup_entities,
                            running = snapshot.running,
                            drag_state = ?snapshot.drag_state,
                            drag_frames = snapshot.drag_frames,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!(entity_count = engine.entity_count(), "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
