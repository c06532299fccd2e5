//! The live board: editor, transform and surface wired to pointer input, and
//! the slot that holds at most one of them at a time.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::config::BoardConfig;
use crate::loader::IconCache;
use crate::model::BoardModel;
use crate::render::{CanvasSurface, Surface, render};
use crate::state::{ConnectionEditor, CoordinateTransform, PixelPoint};
use crate::util::clog;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerInput {
    Down,
    Move,
    Up,
    Secondary,
}

/// Board data plus everything that reacts to pointer input on it.
pub struct BoardSession<S: Surface> {
    board: Rc<BoardModel>,
    editor: ConnectionEditor,
    transform: CoordinateTransform,
    icons: HashMap<String, S::Image>,
    surface: S,
    cfg: BoardConfig,
}

impl<S: Surface> BoardSession<S> {
    /// Builds the session and draws the first frame.
    pub fn new(
        surface: S,
        board: Rc<BoardModel>,
        icons: HashMap<String, S::Image>,
        editor: ConnectionEditor,
        cfg: BoardConfig,
        viewport_side: f64,
    ) -> Self {
        let transform = CoordinateTransform::new(viewport_side, cfg.cell_size, cfg.grid_cells);
        let mut session = Self {
            board,
            editor,
            transform,
            icons,
            surface,
            cfg,
        };
        session.set_viewport(viewport_side);
        session
    }

    pub fn board(&self) -> &BoardModel {
        &self.board
    }

    pub fn editor(&self) -> &ConnectionEditor {
        &self.editor
    }

    pub fn transform(&self) -> CoordinateTransform {
        self.transform
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Edge length of the whole board in logical units.
    pub fn logical_side(&self) -> f64 {
        self.cfg.cell_size * self.cfg.grid_cells as f64
    }

    pub fn set_viewport(&mut self, side: f64) {
        self.transform = CoordinateTransform::new(side, self.cfg.cell_size, self.cfg.grid_cells);
        self.surface.set_scale(self.transform.scale);
        self.redraw();
    }

    pub fn redraw(&mut self) {
        render(&mut self.surface, &self.board, &self.editor, &self.icons, &self.cfg);
    }

    pub fn set_color(&mut self, color: &str) {
        if self.editor.set_selected_color(color) {
            self.redraw();
        }
    }

    /// Feeds one pointer event at a surface-local pixel. Redraws and returns
    /// true when the editor changed.
    pub fn pointer(&mut self, input: PointerInput, at: PixelPoint) -> bool {
        let pos = self.transform.to_grid(at);
        let board = &self.board;
        let changed = match input {
            PointerInput::Down => self.editor.pointer_down(board, pos),
            PointerInput::Move => self.editor.pointer_move(board, pos),
            PointerInput::Up => self.editor.pointer_up(board, pos),
            PointerInput::Secondary => self.editor.secondary_click(board, pos),
        };
        if changed {
            self.redraw();
        }
        changed
    }
}

/// Holds at most one live board. Every teardown bumps the generation so a
/// load started earlier can tell it has been superseded.
#[derive(Debug)]
pub struct BoardSlot<B> {
    active: Option<B>,
    generation: u64,
}

impl<B> Default for BoardSlot<B> {
    fn default() -> Self {
        Self {
            active: None,
            generation: 0,
        }
    }
}

impl<B> BoardSlot<B> {
    /// Tears down the current board and returns the ticket for a new load.
    pub fn begin_load(&mut self) -> u64 {
        self.teardown();
        self.generation
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.generation
    }

    /// Installs `board` if `ticket` is still current; otherwise drops it.
    pub fn install(&mut self, ticket: u64, board: B) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.active = Some(board);
        true
    }

    pub fn teardown(&mut self) {
        self.active = None;
        self.generation += 1;
    }

    pub fn active(&self) -> Option<&B> {
        self.active.as_ref()
    }
}

type SharedSession = Rc<RefCell<BoardSession<CanvasSurface>>>;

/// A board attached to a canvas. Dropping it detaches every listener and
/// blanks the canvas.
pub struct ActiveBoard {
    session: SharedSession,
    listeners: Vec<EventListener>,
}

impl ActiveBoard {
    pub fn attach(
        canvas: HtmlCanvasElement,
        board: Rc<BoardModel>,
        icons: IconCache,
        editor: ConnectionEditor,
        cfg: BoardConfig,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let mut surface = CanvasSurface::new(canvas.clone())?;
        let side = surface.fit_to_parent(cfg.cell_size * cfg.grid_cells as f64);
        let session: SharedSession = Rc::new(RefCell::new(BoardSession::new(
            surface, board, icons, editor, cfg, side,
        )));

        let listeners = vec![
            mouse_listener(&canvas, &canvas, "mousedown", &session, PointerInput::Down),
            mouse_listener(&canvas, &canvas, "mousemove", &session, PointerInput::Move),
            // Releasing outside the canvas still ends the drag.
            mouse_listener(&window, &canvas, "mouseup", &session, PointerInput::Up),
            mouse_listener(&canvas, &canvas, "contextmenu", &session, PointerInput::Secondary),
            touch_listener(&canvas, "touchstart", &session, PointerInput::Down),
            touch_listener(&canvas, "touchmove", &session, PointerInput::Move),
            touch_listener(&canvas, "touchend", &session, PointerInput::Up),
            resize_listener(&window, &session),
        ];
        Ok(Self { session, listeners })
    }

    pub fn set_color(&self, color: &str) {
        if let Ok(mut s) = self.session.try_borrow_mut() {
            s.set_color(color);
        }
    }
}

impl Drop for ActiveBoard {
    fn drop(&mut self) {
        self.listeners.clear();
        if let Ok(s) = self.session.try_borrow() {
            s.surface().wipe();
        }
        clog("board torn down");
    }
}

fn local_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> PixelPoint {
    let rect = canvas.get_bounding_client_rect();
    PixelPoint::new(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

fn mouse_listener(
    target: &EventTarget,
    canvas: &HtmlCanvasElement,
    event: &'static str,
    session: &SharedSession,
    input: PointerInput,
) -> EventListener {
    let session = session.clone();
    let canvas = canvas.clone();
    let options = if input == PointerInput::Secondary {
        EventListenerOptions::enable_prevent_default()
    } else {
        EventListenerOptions::default()
    };
    EventListener::new_with_options(target, event, options, move |e| {
        let Some(e) = e.dyn_ref::<MouseEvent>() else {
            return;
        };
        match input {
            PointerInput::Secondary => e.prevent_default(),
            PointerInput::Down if e.button() != 0 => return,
            _ => {}
        }
        let at = local_point(&canvas, e.client_x(), e.client_y());
        if let Ok(mut s) = session.try_borrow_mut() {
            s.pointer(input, at);
        }
    })
}

fn touch_listener(
    canvas: &HtmlCanvasElement,
    event: &'static str,
    session: &SharedSession,
    input: PointerInput,
) -> EventListener {
    let session = session.clone();
    let target = canvas.clone();
    EventListener::new_with_options(
        canvas,
        event,
        EventListenerOptions::enable_prevent_default(),
        move |e| {
            let Some(e) = e.dyn_ref::<TouchEvent>() else {
                return;
            };
            e.prevent_default();
            // A lifted finger is only listed in changedTouches.
            let touches = if input == PointerInput::Up {
                e.changed_touches()
            } else {
                e.touches()
            };
            let Some(t) = touches.get(0) else {
                return;
            };
            let at = local_point(&target, t.client_x(), t.client_y());
            if let Ok(mut s) = session.try_borrow_mut() {
                s.pointer(input, at);
            }
        },
    )
}

fn resize_listener(window: &web_sys::Window, session: &SharedSession) -> EventListener {
    let session = session.clone();
    EventListener::new(window, "resize", move |_| {
        if let Ok(mut s) = session.try_borrow_mut() {
            let fallback = s.logical_side();
            let side = s.surface_mut().fit_to_parent(fallback);
            s.set_viewport(side);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GridPos, ScoreSheet, Station};
    use crate::state::{Anchor, DragState, PreviewColor};

    #[derive(Default)]
    struct Counter {
        clears: usize,
        scale: f64,
    }

    impl Surface for Counter {
        type Image = ();

        fn clear(&mut self) {
            self.clears += 1;
        }
        fn set_scale(&mut self, scale: f64) {
            self.scale = scale;
        }
        fn set_stroke(&mut self, _: &str, _: f64) {}
        fn set_dash(&mut self, _: &[f64]) {}
        fn stroke_polyline(&mut self, _: &[(f64, f64)]) {}
        fn stroke_rect(&mut self, _: f64, _: f64, _: f64, _: f64) {}
        fn draw_image(&mut self, _: &(), _: f64, _: f64, _: f64, _: f64) {}
    }

    fn board() -> Rc<BoardModel> {
        let station = |x, y| Station {
            x,
            y,
            shape: Some("circle".into()),
            is_monument: false,
            starting_position: -1,
            texture: "s".into(),
        };
        Rc::new(BoardModel::new(
            10,
            10,
            vec![station(1, 1), station(3, 1)],
            vec![],
            vec![],
            Default::default(),
            vec![],
            ScoreSheet::default(),
        ))
    }

    fn session(side: f64) -> BoardSession<Counter> {
        BoardSession::new(
            Counter::default(),
            board(),
            HashMap::new(),
            ConnectionEditor::new("red", PreviewColor::Selected),
            BoardConfig::default(),
            side,
        )
    }

    #[test]
    fn first_frame_is_drawn_at_viewport_scale() {
        let s = session(375.0);
        assert_eq!(s.surface().clears, 1);
        assert_eq!(s.surface().scale, 0.5);
    }

    #[test]
    fn drag_between_stations_in_pixels() {
        let mut s = session(375.0);
        let t = s.transform();
        let a = t.to_pixel(GridPos::new(1, 1), Anchor::Center);
        let b = t.to_pixel(GridPos::new(3, 1), Anchor::Center);

        assert!(s.pointer(PointerInput::Down, a));
        assert!(s.pointer(PointerInput::Move, b));
        assert!(s.pointer(PointerInput::Up, b));
        assert_eq!(s.editor().connections().len(), 1);
        assert_eq!(s.editor().drag(), DragState::Idle);
        assert_eq!(s.surface().clears, 4);
    }

    #[test]
    fn absorbed_events_do_not_redraw() {
        let mut s = session(750.0);
        let empty = s.transform().to_pixel(GridPos::new(5, 5), Anchor::Center);
        assert!(!s.pointer(PointerInput::Down, empty));
        assert!(!s.pointer(PointerInput::Secondary, empty));
        s.set_color("blue");
        assert_eq!(s.surface().clears, 1);
    }

    #[test]
    fn resize_rescales_hit_testing() {
        let mut s = session(750.0);
        s.set_viewport(300.0);
        assert_eq!(s.surface().scale, 0.4);
        // 45px is the middle of cell (1, _) at 30px per cell.
        assert!(s.pointer(PointerInput::Down, PixelPoint::new(45.0, 45.0)));
    }

    #[test]
    fn stale_tickets_are_refused() {
        let mut slot = BoardSlot::<&str>::default();
        let first = slot.begin_load();
        let second = slot.begin_load();
        assert!(!slot.install(first, "old"));
        assert!(slot.active().is_none());
        assert!(slot.install(second, "new"));
        assert_eq!(slot.active(), Some(&"new"));

        slot.teardown();
        assert!(slot.active().is_none());
        assert!(!slot.is_current(second));
    }

    #[test]
    fn teardown_drops_the_board() {
        let marker = Rc::new(());
        let mut slot = BoardSlot::default();
        let ticket = slot.begin_load();
        slot.install(ticket, marker.clone());
        assert_eq!(Rc::strong_count(&marker), 2);
        slot.begin_load();
        assert_eq!(Rc::strong_count(&marker), 1);
    }
}
