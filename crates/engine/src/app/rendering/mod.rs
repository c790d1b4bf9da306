mod renderer;
pub(crate) mod surface;

pub use renderer::Renderer;
pub use surface::{draw_drag_icon, FrameSurface, Rgba, Surface, CLEAR_COLOR};
