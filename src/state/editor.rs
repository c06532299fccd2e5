//! Connection drawing state machine.
//!
//! The editor works in grid space; the board view converts pointer pixels with
//! [`CoordinateTransform`](super::CoordinateTransform) before forwarding them.
//! Every handler returns whether the visible state changed so the caller knows
//! when to redraw.

use crate::config::{DEFAULT_COLOR, STARTING_COLORS};
use crate::error::InteractionError;
use crate::model::{BoardModel, Connection, ConnectionKind, GridPos};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    /// `current` is the last station the pointer passed over.
    Dragging { origin: GridPos, current: GridPos },
}

/// Which color a drag preview and the committed connection use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreviewColor {
    /// The color picked in the palette.
    #[default]
    Selected,
    /// The line color of the origin's starting position; stations without one
    /// use the selected color.
    StartingPosition,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreviewLine {
    pub from: GridPos,
    pub to: GridPos,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionEditor {
    connections: Vec<Connection>,
    drag: DragState,
    selected_color: String,
    preview: PreviewColor,
}

impl Default for ConnectionEditor {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR, PreviewColor::default())
    }
}

impl ConnectionEditor {
    pub fn new(selected_color: impl Into<String>, preview: PreviewColor) -> Self {
        Self {
            connections: Vec::new(),
            drag: DragState::Idle,
            selected_color: selected_color.into(),
            preview,
        }
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn selected_color(&self) -> &str {
        &self.selected_color
    }

    /// Returns true when a drag preview is on screen and must be redrawn.
    pub fn set_selected_color(&mut self, color: impl Into<String>) -> bool {
        self.selected_color = color.into();
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn pointer_down(&mut self, board: &BoardModel, pos: GridPos) -> bool {
        if self.drag != DragState::Idle || board.station_at(pos).is_none() {
            return false;
        }
        self.drag = DragState::Dragging {
            origin: pos,
            current: pos,
        };
        true
    }

    pub fn pointer_move(&mut self, board: &BoardModel, pos: GridPos) -> bool {
        let DragState::Dragging { origin, current } = self.drag else {
            return false;
        };
        if pos == current || board.station_at(pos).is_none() {
            return false;
        }
        self.drag = DragState::Dragging {
            origin,
            current: pos,
        };
        true
    }

    pub fn pointer_up(&mut self, board: &BoardModel, pos: GridPos) -> bool {
        let DragState::Dragging { origin, .. } = std::mem::take(&mut self.drag) else {
            return false;
        };
        if let Ok(connection) = self.try_commit(board, origin, pos) {
            self.connections.push(connection);
        }
        true
    }

    /// Erases every user connection touching the station under the pointer
    /// and abandons any drag in progress.
    pub fn secondary_click(&mut self, board: &BoardModel, pos: GridPos) -> bool {
        if board.station_at(pos).is_none() {
            return false;
        }
        let was_dragging = std::mem::take(&mut self.drag) != DragState::Idle;
        let before = self.connections.len();
        self.connections.retain(|c| !c.touches(pos));
        was_dragging || self.connections.len() != before
    }

    pub fn preview(&self, board: &BoardModel) -> Option<PreviewLine> {
        match self.drag {
            DragState::Idle => None,
            DragState::Dragging { origin, current } => Some(PreviewLine {
                from: origin,
                to: current,
                color: self.color_for(board, origin),
            }),
        }
    }

    fn try_commit(
        &self,
        board: &BoardModel,
        origin: GridPos,
        pos: GridPos,
    ) -> Result<Connection, InteractionError> {
        if board.station_at(origin).is_none() {
            return Err(InteractionError::StaleStation(origin));
        }
        if board.station_at(pos).is_none() {
            return Err(InteractionError::NoStation(pos));
        }
        if pos == origin {
            return Err(InteractionError::SameStation);
        }
        Ok(Connection {
            from: origin,
            to: pos,
            color: self.color_for(board, origin),
            kind: ConnectionKind::User,
        })
    }

    fn color_for(&self, board: &BoardModel, origin: GridPos) -> String {
        let start_color = match self.preview {
            PreviewColor::Selected => None,
            PreviewColor::StartingPosition => board
                .station_at(origin)
                .and_then(|s| s.starting_slot())
                .map(|slot| STARTING_COLORS[slot]),
        };
        start_color.unwrap_or(&self.selected_color).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiverLayout, ScoreSheet, Station};

    fn station(x: i32, y: i32, starting_position: i32) -> Station {
        Station {
            x,
            y,
            shape: None,
            is_monument: false,
            starting_position,
            texture: "s".into(),
        }
    }

    fn board(stations: Vec<Station>) -> BoardModel {
        BoardModel::new(
            10,
            10,
            stations,
            Vec::new(),
            Vec::new(),
            RiverLayout::default(),
            Vec::new(),
            ScoreSheet::default(),
        )
    }

    fn drag(editor: &mut ConnectionEditor, b: &BoardModel, from: GridPos, to: GridPos) {
        editor.pointer_down(b, from);
        editor.pointer_move(b, to);
        editor.pointer_up(b, to);
    }

    #[test]
    fn pointer_down_off_station_stays_idle() {
        let b = board(vec![station(1, 1, -1)]);
        let mut e = ConnectionEditor::default();
        assert!(!e.pointer_down(&b, GridPos::new(2, 2)));
        assert_eq!(e.drag(), DragState::Idle);
        assert!(e.pointer_down(&b, GridPos::new(1, 1)));
        assert_eq!(
            e.drag(),
            DragState::Dragging {
                origin: GridPos::new(1, 1),
                current: GridPos::new(1, 1)
            }
        );
    }

    #[test]
    fn move_over_empty_cell_keeps_last_target() {
        let b = board(vec![station(1, 1, -1), station(3, 1, -1)]);
        let mut e = ConnectionEditor::default();
        e.pointer_down(&b, GridPos::new(1, 1));
        assert!(e.pointer_move(&b, GridPos::new(3, 1)));
        assert!(!e.pointer_move(&b, GridPos::new(5, 5)));
        let preview = e.preview(&b).unwrap();
        assert_eq!(preview.to, GridPos::new(3, 1));
        assert_eq!(preview.color, DEFAULT_COLOR);
    }

    #[test]
    fn release_commits_only_on_distinct_station() {
        let b = board(vec![station(1, 1, -1), station(3, 1, -1)]);
        let mut e = ConnectionEditor::new("red", PreviewColor::Selected);

        // Released on empty cell: preview target was valid but nothing commits.
        e.pointer_down(&b, GridPos::new(1, 1));
        e.pointer_move(&b, GridPos::new(3, 1));
        assert!(e.pointer_up(&b, GridPos::new(4, 4)));
        assert!(e.connections().is_empty());
        assert_eq!(e.drag(), DragState::Idle);

        // Released on origin.
        drag(&mut e, &b, GridPos::new(1, 1), GridPos::new(1, 1));
        assert!(e.connections().is_empty());

        drag(&mut e, &b, GridPos::new(1, 1), GridPos::new(3, 1));
        assert_eq!(e.connections().len(), 1);
        let c = &e.connections()[0];
        assert_eq!((c.from, c.to), (GridPos::new(1, 1), GridPos::new(3, 1)));
        assert_eq!(c.color, "red");
        assert_eq!(c.kind, ConnectionKind::User);
    }

    #[test]
    fn pointer_up_while_idle_is_noop() {
        let b = board(vec![station(1, 1, -1)]);
        let mut e = ConnectionEditor::default();
        assert!(!e.pointer_up(&b, GridPos::new(1, 1)));
        assert!(!e.pointer_move(&b, GridPos::new(1, 1)));
    }

    #[test]
    fn stale_origin_is_absorbed() {
        let b = board(vec![station(1, 1, -1), station(3, 1, -1)]);
        let replaced = board(vec![station(3, 1, -1)]);
        let mut e = ConnectionEditor::default();
        e.pointer_down(&b, GridPos::new(1, 1));
        assert!(e.pointer_up(&replaced, GridPos::new(3, 1)));
        assert!(e.connections().is_empty());
        assert_eq!(
            e.try_commit(&replaced, GridPos::new(1, 1), GridPos::new(3, 1)),
            Err(InteractionError::StaleStation(GridPos::new(1, 1)))
        );
    }

    #[test]
    fn erase_by_station_touches_either_endpoint() {
        let b = board(vec![station(1, 1, -1), station(3, 1, -1), station(5, 5, -1)]);
        let mut e = ConnectionEditor::default();
        drag(&mut e, &b, GridPos::new(1, 1), GridPos::new(3, 1));
        drag(&mut e, &b, GridPos::new(5, 5), GridPos::new(3, 1));
        assert_eq!(e.connections().len(), 2);

        assert!(!e.secondary_click(&b, GridPos::new(0, 0)));
        assert!(e.secondary_click(&b, GridPos::new(1, 1)));
        assert_eq!(e.connections().len(), 1);
        assert!(e.secondary_click(&b, GridPos::new(3, 1)));
        assert!(e.connections().is_empty());
        // Nothing left to erase.
        assert!(!e.secondary_click(&b, GridPos::new(3, 1)));
    }

    #[test]
    fn secondary_click_cancels_drag() {
        let b = board(vec![station(1, 1, -1), station(3, 1, -1)]);
        let mut e = ConnectionEditor::default();
        e.pointer_down(&b, GridPos::new(1, 1));
        assert!(e.secondary_click(&b, GridPos::new(3, 1)));
        assert_eq!(e.drag(), DragState::Idle);
        assert!(e.preview(&b).is_none());
    }

    #[test]
    fn starting_position_color_variant() {
        let b = board(vec![station(1, 1, 2), station(3, 1, -1)]);
        let mut e = ConnectionEditor::new("white", PreviewColor::StartingPosition);
        drag(&mut e, &b, GridPos::new(1, 1), GridPos::new(3, 1));
        drag(&mut e, &b, GridPos::new(3, 1), GridPos::new(1, 1));
        assert_eq!(e.connections()[0].color, STARTING_COLORS[2]);
        assert_eq!(e.connections()[1].color, "white");
    }
}
