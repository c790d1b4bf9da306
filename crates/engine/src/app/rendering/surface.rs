use crate::sim::{Grid, GridCell, GridRect, Vec2};

pub type Rgba = [u8; 4];

pub const CLEAR_COLOR: Rgba = [255, 255, 255, 255];
const DRAG_ICON_FILL: Rgba = [0, 0, 255, 77];
const DRAG_ICON_STROKE: Rgba = [0, 0, 0, 77];
const DRAG_ICON_SCALE: f32 = 3.0;
const DRAG_ICON_OUTLINE: [(f32, f32); 6] = [
    (0.0, -0.5),
    (-0.5, 0.0),
    (-0.5, 1.0),
    (0.5, 1.0),
    (0.5, -0.5),
    (0.0, -0.5),
];

/// Drawable handle passed to `Entity::render`. Positions and sizes are in
/// grid units unless the parameter name says `_px`.
pub trait Surface {
    fn grid(&self) -> &Grid;
    fn clear(&mut self);
    fn fill_screen(&mut self, color: Rgba);
    fn fill_rect(&mut self, rect: GridRect, color: Rgba);
    fn draw_line(&mut self, from: Vec2, to: Vec2, width_px: f32, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius_px: f32, color: Rgba);
    fn fill_polygon(&mut self, points: &[Vec2], fill: Rgba, stroke: Rgba);
}

/// Arrow-shaped drag affordance centred on the pointer cell.
pub fn draw_drag_icon(surface: &mut dyn Surface, cell: GridCell) {
    let points: Vec<Vec2> = DRAG_ICON_OUTLINE
        .iter()
        .map(|(dx, dy)| Vec2 {
            x: cell.x as f32 + dx * DRAG_ICON_SCALE + 0.5,
            y: cell.y as f32 + dy * DRAG_ICON_SCALE + 0.5,
        })
        .collect();
    surface.fill_polygon(&points, DRAG_ICON_FILL, DRAG_ICON_STROKE);
}

/// Software surface over an RGBA8 frame such as `Pixels::frame_mut`.
pub struct FrameSurface<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    grid: Grid,
}

impl<'a> FrameSurface<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32, grid: Grid) -> Self {
        Self {
            frame,
            width,
            height,
            grid,
        }
    }

    fn to_px(&self, point: Vec2) -> (f32, f32) {
        let px = self.grid.grid_to_canvas_px(point);
        (px.x, px.y)
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let Some(pixel) = self.frame.get_mut(offset..offset + 4) else {
            return;
        };
        let alpha = color[3] as u32;
        if alpha == 255 {
            pixel.copy_from_slice(&color);
            return;
        }
        for channel in 0..3 {
            let src = color[channel] as u32;
            let dst = pixel[channel] as u32;
            pixel[channel] = ((src * alpha + dst * (255 - alpha) + 127) / 255) as u8;
        }
        pixel[3] = pixel[3].max(color[3]);
    }

    fn fill_px_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32, color: Rgba) {
        let left = left.max(0);
        let top = top.max(0);
        let right = right.min(self.width as i32);
        let bottom = bottom.min(self.height as i32);
        for y in top..bottom {
            for x in left..right {
                self.blend_pixel(x, y, color);
            }
        }
    }

    fn stroke_px_segment(&mut self, from: (f32, f32), to: (f32, f32), width_px: f32, color: Rgba) {
        let half = (width_px.max(1.0) / 2.0)
            .floor()
            .min(self.width.max(self.height) as f32);
        let reach = half + 1.0;
        let Some((from, to)) = clip_segment(
            from,
            to,
            (-reach, -reach),
            (self.width as f32 + reach, self.height as f32 + reach),
        ) else {
            return;
        };
        let half = half as i32;
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;
        let mut last: Option<(i32, i32)> = None;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = (from.0 + dx * t).round() as i32;
            let y = (from.1 + dy * t).round() as i32;
            if last == Some((x, y)) {
                continue;
            }
            last = Some((x, y));
            self.fill_px_rect(x - half, y - half, x + half + 1, y + half + 1, color);
        }
    }
}

/// Pixel indices `first..=last` of `lo..=hi` that fall inside `0..limit`.
/// Clamped as floats so huge or non-finite bounds never reach an integer cast.
fn clamp_span(lo: f32, hi: f32, limit: u32) -> Option<(i32, i32)> {
    let max = limit as f32 - 1.0;
    if lo.is_nan() || hi.is_nan() || lo > hi || hi < 0.0 || lo > max {
        return None;
    }
    Some((lo.max(0.0) as i32, hi.min(max) as i32))
}

/// Liang-Barsky clip of a segment against the box `min..max`. Runs in f64 so
/// a far-off endpoint does not swamp the visible part.
fn clip_segment(
    from: (f32, f32),
    to: (f32, f32),
    min: (f32, f32),
    max: (f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    let (x0, y0) = (f64::from(from.0), f64::from(from.1));
    let dx = f64::from(to.0) - x0;
    let dy = f64::from(to.1) - y0;
    if ![x0, y0, dx, dy].iter().all(|value| value.is_finite()) {
        return None;
    }
    let mut enter = 0.0f64;
    let mut exit = 1.0f64;
    for (p, q) in [
        (-dx, x0 - f64::from(min.0)),
        (dx, f64::from(max.0) - x0),
        (-dy, y0 - f64::from(min.1)),
        (dy, f64::from(max.1) - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            enter = enter.max(t);
        } else {
            exit = exit.min(t);
        }
        if enter > exit {
            return None;
        }
    }
    Some((
        ((x0 + dx * enter) as f32, (y0 + dy * enter) as f32),
        ((x0 + dx * exit) as f32, (y0 + dy * exit) as f32),
    ))
}

impl Surface for FrameSurface<'_> {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn clear(&mut self) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }
    }

    fn fill_screen(&mut self, color: Rgba) {
        self.fill_px_rect(0, 0, self.width as i32, self.height as i32, color);
    }

    fn fill_rect(&mut self, rect: GridRect, color: Rgba) {
        let (left, top) = self.to_px(rect.origin());
        let (right, bottom) = self.to_px(Vec2 {
            x: rect.x + rect.w,
            y: rect.y + rect.h,
        });
        self.fill_px_rect(
            left.round() as i32,
            top.round() as i32,
            right.round() as i32,
            bottom.round() as i32,
            color,
        );
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width_px: f32, color: Rgba) {
        let from = self.to_px(from);
        let to = self.to_px(to);
        self.stroke_px_segment(from, to, width_px, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius_px: f32, color: Rgba) {
        let (cx, cy) = self.to_px(center);
        let radius = radius_px.max(0.0);
        let Some((top, bottom)) =
            clamp_span((cy - radius).floor(), (cy + radius).ceil(), self.height)
        else {
            return;
        };
        let Some((left, right)) =
            clamp_span((cx - radius).floor(), (cx + radius).ceil(), self.width)
        else {
            return;
        };
        for y in top..=bottom {
            for x in left..=right {
                let ddx = x as f32 + 0.5 - cx;
                let ddy = y as f32 + 0.5 - cy;
                if ddx * ddx + ddy * ddy <= radius * radius {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Even-odd scanline fill sampled at pixel centres, then a 1px outline.
    fn fill_polygon(&mut self, points: &[Vec2], fill: Rgba, stroke: Rgba) {
        if points.len() < 3 {
            return;
        }
        let px: Vec<(f32, f32)> = points.iter().map(|point| self.to_px(*point)).collect();
        let min_y = px.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = px.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let top = (min_y.floor() as i32).max(0);
        let bottom = (max_y.ceil() as i32).min(self.height as i32);

        let mut crossings: Vec<f32> = Vec::new();
        for y in top..bottom {
            let sample_y = y as f32 + 0.5;
            crossings.clear();
            for index in 0..px.len() {
                let a = px[index];
                let b = px[(index + 1) % px.len()];
                if (a.1 <= sample_y) != (b.1 <= sample_y) {
                    let t = (sample_y - a.1) / (b.1 - a.1);
                    crossings.push(a.0 + t * (b.0 - a.0));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil();
                let end = (pair[1] - 0.5).floor();
                let Some((start, end)) = clamp_span(start, end, self.width) else {
                    continue;
                };
                for x in start..=end {
                    self.blend_pixel(x, y, fill);
                }
            }
        }

        for index in 0..px.len() {
            let a = px[index];
            let b = px[(index + 1) % px.len()];
            self.stroke_px_segment(a, b, 1.0, stroke);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Surface that only counts draw calls.
    #[derive(Default)]
    pub(crate) struct CountingSurface {
        pub grid: Grid,
        pub rects: usize,
        pub polygons: usize,
    }

    impl Surface for CountingSurface {
        fn grid(&self) -> &Grid {
            &self.grid
        }

        fn clear(&mut self) {}

        fn fill_screen(&mut self, _color: Rgba) {}

        fn fill_rect(&mut self, _rect: GridRect, _color: Rgba) {
            self.rects += 1;
        }

        fn draw_line(&mut self, _from: Vec2, _to: Vec2, _width_px: f32, _color: Rgba) {}

        fn fill_circle(&mut self, _center: Vec2, _radius_px: f32, _color: Rgba) {}

        fn fill_polygon(&mut self, _points: &[Vec2], _fill: Rgba, _stroke: Rgba) {
            self.polygons += 1;
        }
    }
}
