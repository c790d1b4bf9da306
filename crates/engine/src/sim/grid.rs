use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Integer address of one grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset of this cell relative to `origin`, in cell units.
    pub fn offset_from(self, origin: Vec2) -> Vec2 {
        Vec2 {
            x: self.x as f32 - origin.x,
            y: self.y as f32 - origin.y,
        }
    }

    pub fn as_point(self) -> Vec2 {
        Vec2 {
            x: self.x as f32,
            y: self.y as f32,
        }
    }
}

/// Axis-aligned box in grid units; `x`/`y` is the top-left cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl GridRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn origin(&self) -> Vec2 {
        Vec2 {
            x: self.x,
            y: self.y,
        }
    }

    /// Half-open containment: `[x, x + w) × [y, y + h)`.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }

    pub fn contains_cell(&self, cell: GridCell) -> bool {
        self.contains_point(cell.as_point())
    }
}

/// Cell size, board dimensions and canvas placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Grid {
    pub cell_width: u32,
    pub cell_height: u32,
    pub cols: u32,
    pub rows: u32,
    /// Pixel position of the canvas top-left inside the pointer coordinate space.
    pub origin_px: Vec2,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            cell_width: 8,
            cell_height: 8,
            cols: 100,
            rows: 75,
            origin_px: Vec2::default(),
        }
    }
}

impl Grid {
    pub fn canvas_size_px(&self) -> (u32, u32) {
        (
            self.cell_width.saturating_mul(self.cols),
            self.cell_height.saturating_mul(self.rows),
        )
    }

    pub fn pixel_to_cell(&self, pixel: Vec2) -> GridCell {
        let cell_width = self.cell_width.max(1) as f32;
        let cell_height = self.cell_height.max(1) as f32;
        GridCell {
            x: ((pixel.x - self.origin_px.x) / cell_width).floor() as i32,
            y: ((pixel.y - self.origin_px.y) / cell_height).floor() as i32,
        }
    }

    /// Canvas-relative pixel position of a point given in grid units.
    pub fn grid_to_canvas_px(&self, point: Vec2) -> Vec2 {
        Vec2 {
            x: point.x * self.cell_width as f32,
            y: point.y * self.cell_height as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_to_cell_floors_into_cells() {
        let grid = Grid {
            cell_width: 10,
            cell_height: 20,
            ..Grid::default()
        };
        assert_eq!(grid.pixel_to_cell(Vec2::new(0.0, 0.0)), GridCell::new(0, 0));
        assert_eq!(grid.pixel_to_cell(Vec2::new(9.9, 19.9)), GridCell::new(0, 0));
        assert_eq!(grid.pixel_to_cell(Vec2::new(10.0, 20.0)), GridCell::new(1, 1));
        assert_eq!(grid.pixel_to_cell(Vec2::new(35.0, 41.0)), GridCell::new(3, 2));
    }

    #[test]
    fn pixel_to_cell_subtracts_canvas_origin() {
        let grid = Grid {
            cell_width: 10,
            cell_height: 10,
            origin_px: Vec2::new(100.0, 50.0),
            ..Grid::default()
        };
        assert_eq!(grid.pixel_to_cell(Vec2::new(105.0, 55.0)), GridCell::new(0, 0));
        assert_eq!(grid.pixel_to_cell(Vec2::new(95.0, 45.0)), GridCell::new(-1, -1));
    }

    #[test]
    fn rect_containment_is_half_open() {
        let rect = GridRect::new(2.0, 3.0, 1.0, 2.0);
        assert!(rect.contains_cell(GridCell::new(2, 3)));
        assert!(rect.contains_cell(GridCell::new(2, 4)));
        assert!(!rect.contains_cell(GridCell::new(3, 3)));
        assert!(!rect.contains_cell(GridCell::new(2, 5)));
        assert!(!rect.contains_cell(GridCell::new(1, 3)));
    }

    #[test]
    fn canvas_size_multiplies_cells() {
        let grid = Grid {
            cell_width: 8,
            cell_height: 6,
            cols: 10,
            rows: 5,
            origin_px: Vec2::default(),
        };
        assert_eq!(grid.canvas_size_px(), (80, 30));
    }

    #[test]
    fn offset_from_subtracts_origin() {
        let cell = GridCell::new(7, 4);
        assert_eq!(cell.offset_from(Vec2::new(5.0, 1.0)), Vec2::new(2.0, 3.0));
        assert_eq!(cell.offset_from(Vec2::new(6.5, 0.0)), Vec2::new(0.5, 4.0));
    }
}
