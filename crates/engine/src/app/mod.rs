mod input;
mod loop_runner;
mod metrics;
pub(crate) mod rendering;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{draw_drag_icon, FrameSurface, Renderer, Rgba, Surface, CLEAR_COLOR};
