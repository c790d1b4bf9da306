use std::sync::Arc;
use std::time::Instant;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::sim::{Engine, Grid, Vec2};

use super::surface::{FrameSurface, Surface};

/// Presents the grid canvas through `pixels`, scaled to the window.
pub struct Renderer {
    pixels: Pixels<'static>,
    grid: Grid,
}

impl Renderer {
    pub fn new(window: Arc<Window>, grid: Grid) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(window, size.width, size.height, grid)?;
        Ok(Self { pixels, grid })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }

    /// Window position to pointer-space pixels, clamped to the canvas.
    pub fn window_to_pointer_px(&self, x: f32, y: f32) -> Vec2 {
        let (px, py) = match self.pixels.window_pos_to_pixel((x, y)) {
            Ok((px, py)) => (px as f32, py as f32),
            Err(outside) => {
                let (px, py) = self.pixels.clamp_pixel_pos(outside);
                (px as f32, py as f32)
            }
        };
        Vec2 {
            x: px + self.grid.origin_px.x,
            y: py + self.grid.origin_px.y,
        }
    }

    pub fn render_frame(&mut self, engine: &mut Engine, now: Instant) -> Result<(), Error> {
        let (width, height) = self.grid.canvas_size_px();
        {
            let mut surface = FrameSurface::new(self.pixels.frame_mut(), width, height, self.grid);
            surface.clear();
            engine.frame(now, &mut surface);
        }
        self.pixels.render()
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
        grid: Grid,
    ) -> Result<Pixels<'static>, Error> {
        let (canvas_width, canvas_height) = grid.canvas_size_px();
        let surface = SurfaceTexture::new(width.max(1), height.max(1), window);
        Pixels::new(canvas_width, canvas_height, surface)
    }
}
