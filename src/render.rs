//! Frame projection of the board and the editor state onto a 2-D surface.
//!
//! `render` keeps no state between calls: every frame clears the surface and
//! draws all layers again, so calling it twice in a row is harmless.

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::config::BoardConfig;
use crate::model::{BoardModel, Connection, GridPos};
use crate::state::ConnectionEditor;

/// Drawing operations the renderer needs. Coordinates are logical board units
/// (cell size before viewport scaling).
pub trait Surface {
    type Image;

    fn clear(&mut self);
    /// Uniform scale from logical units to surface pixels, applied on `clear`.
    fn set_scale(&mut self, scale: f64);
    fn set_stroke(&mut self, color: &str, width: f64);
    /// Empty slice means solid.
    fn set_dash(&mut self, pattern: &[f64]);
    fn stroke_polyline(&mut self, points: &[(f64, f64)]);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64, w: f64, h: f64);
}

fn cell_center(pos: GridPos, cell: f64) -> (f64, f64) {
    (
        pos.x as f64 * cell + cell / 2.0,
        pos.y as f64 * cell + cell / 2.0,
    )
}

fn stroke_connection<S: Surface>(surface: &mut S, c: &Connection, cell: f64) {
    surface.stroke_polyline(&[cell_center(c.from, cell), cell_center(c.to, cell)]);
}

pub fn render<S: Surface>(
    surface: &mut S,
    board: &BoardModel,
    editor: &ConnectionEditor,
    icons: &HashMap<String, S::Image>,
    cfg: &BoardConfig,
) {
    let cell = cfg.cell_size;
    surface.clear();
    surface.set_dash(&[]);

    // River points sit half a cell off the grid lines.
    if board.river.path.len() >= 2 {
        let path: Vec<(f64, f64)> = board
            .river
            .path
            .iter()
            .map(|p| (p.x * cell - cell / 2.0, p.y * cell - cell / 2.0))
            .collect();
        surface.set_stroke(&cfg.river_color, cfg.river_width);
        surface.stroke_polyline(&path);
    }

    surface.set_stroke(&cfg.district_color, cfg.district_width);
    for d in &board.districts {
        surface.stroke_rect(
            d.x as f64 * cell,
            d.y as f64 * cell,
            d.width as f64 * cell,
            d.height as f64 * cell,
        );
    }

    surface.set_dash(&cfg.prebaked_dash);
    for c in &board.prebaked {
        surface.set_stroke(&c.color, cfg.prebaked_width);
        stroke_connection(surface, c, cell);
    }
    surface.set_dash(&[]);

    for c in editor.connections() {
        surface.set_stroke(&c.color, cfg.user_width);
        stroke_connection(surface, c, cell);
    }

    let inset = cfg.station_inset;
    for s in &board.stations {
        if let Some(icon) = icons.get(&s.texture) {
            surface.draw_image(
                icon,
                s.x as f64 * cell + inset,
                s.y as f64 * cell + inset,
                cell - 2.0 * inset,
                cell - 2.0 * inset,
            );
        }
    }

    let size = cell * cfg.intersection_scale;
    let offset = (cell - size) / 2.0;
    for i in &board.intersections {
        if let Some(icon) = icons.get(&i.texture) {
            surface.draw_image(
                icon,
                i.x as f64 * cell + offset,
                i.y as f64 * cell + offset,
                size,
                size,
            );
        }
    }

    if let Some(preview) = editor.preview(board) {
        surface.set_stroke(&preview.color, cfg.preview_width);
        surface.stroke_polyline(&[
            cell_center(preview.from, cell),
            cell_center(preview.to, cell),
        ]);
    }
}

/// `Surface` backed by a 2-D canvas context with the viewport scale applied.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    scale: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        Ok(Self {
            canvas,
            ctx,
            scale: 1.0,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Resizes the backing store to a square and returns the side length.
    pub fn fit_to_parent(&mut self, fallback: f64) -> f64 {
        let side = self
            .canvas
            .parent_element()
            .map(|el| el.client_width() as f64)
            .filter(|w| *w > 0.0)
            .unwrap_or(fallback);
        self.canvas.set_width(side as u32);
        self.canvas.set_height(side as u32);
        // Resizing resets context state.
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        side
    }

    /// Blanks the canvas regardless of the current transform.
    pub fn wipe(&self) {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn clear(&mut self) {
        self.wipe();
        self.ctx
            .set_transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0)
            .ok();
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn set_stroke(&mut self, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
    }

    fn set_dash(&mut self, pattern: &[f64]) {
        let segments = js_sys::Array::new();
        for p in pattern {
            segments.push(&JsValue::from_f64(*p));
        }
        self.ctx.set_line_dash(&segments).ok();
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)]) {
        let Some(((x0, y0), rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(*x0, *y0);
        for (x, y) in rest {
            self.ctx.line_to(*x, *y);
        }
        self.ctx.stroke();
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.stroke_rect(x, y, w, h);
    }

    fn draw_image(&mut self, image: &HtmlImageElement, x: f64, y: f64, w: f64, h: f64) {
        // A broken image only loses its own slot.
        let _ = self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, w, h);
    }
}
