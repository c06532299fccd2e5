// Pixel <-> grid mapping for the fixed 10x10 board.
use crate::model::GridPos;

const EDGE_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Corner,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTransform {
    pub cell_size: f64,
    pub scale: f64,
}

impl CoordinateTransform {
    /// `viewport_side` is the canvas edge length in pixels; the board is square.
    pub fn new(viewport_side: f64, cell_size: f64, grid_cells: u32) -> Self {
        let logical = cell_size * grid_cells as f64;
        let scale = if logical > 0.0 { viewport_side / logical } else { 1.0 };
        Self { cell_size, scale }
    }

    fn cell_px(&self) -> f64 {
        self.cell_size * self.scale
    }

    /// Cell containing the pixel. Points off the board map to cells nobody
    /// occupies.
    pub fn to_grid(&self, p: PixelPoint) -> GridPos {
        let cell = self.cell_px();
        // `(g * c) / c` can come out as `g - 1e-16` when c is not a power of two;
        // the epsilon keeps such corner pixels in cell g. Real pointer input is
        // never that close to a boundary.
        let axis = |v: f64| (v / cell + EDGE_EPSILON).floor() as i32;
        GridPos::new(axis(p.x), axis(p.y))
    }

    pub fn to_pixel(&self, g: GridPos, anchor: Anchor) -> PixelPoint {
        let cell = self.cell_px();
        let offset = match anchor {
            Anchor::Corner => 0.0,
            Anchor::Center => 0.5,
        };
        PixelPoint::new((g.x as f64 + offset) * cell, (g.y as f64 + offset) * cell)
    }
}
