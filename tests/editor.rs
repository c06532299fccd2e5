use next_station_board::model::{BoardModel, ConnectionKind, GridPos};
use next_station_board::state::{Anchor, ConnectionEditor, CoordinateTransform, DragState, PixelPoint, PreviewColor};

const BOARD: &str = r#"{
    "stations": [
        { "x": 1, "y": 1, "type": "circle", "startingPosition": 0, "texture": "circle" },
        { "x": 3, "y": 1, "type": "square", "texture": "square" },
        { "x": 6, "y": 4, "type": "triangle", "texture": "triangle" },
        { "x": 8, "y": 8, "isMonument": true, "texture": "monument" }
    ],
    "intersections": [{ "x": 2, "y": 1, "texture": "cross" }],
    "districts": [{ "x": 0, "y": 0, "width": 5, "height": 5 }],
    "riverLayout": { "path": [{ "x": 0.5, "y": 3.5 }, { "x": 9.5, "y": 3.5 }] },
    "connections": [{ "x1": 6, "y1": 4, "x2": 8, "y2": 8 }]
}"#;

fn board() -> BoardModel {
    BoardModel::from_json(BOARD).unwrap()
}

fn drag(editor: &mut ConnectionEditor, board: &BoardModel, from: GridPos, to: GridPos) {
    editor.pointer_down(board, from);
    editor.pointer_move(board, to);
    editor.pointer_up(board, to);
}

#[test]
fn commit_then_erase_by_endpoint() {
    let b = board();
    let a = GridPos::new(1, 1);
    let c = GridPos::new(6, 4);
    let mut e = ConnectionEditor::new("rgb(52, 152, 219)", PreviewColor::Selected);

    drag(&mut e, &b, a, GridPos::new(3, 1));
    assert_eq!(e.connections().len(), 1);
    let line = &e.connections()[0];
    assert_eq!(line.kind, ConnectionKind::User);
    assert_eq!(line.color, "rgb(52, 152, 219)");

    assert!(!e.secondary_click(&b, c));
    assert_eq!(e.connections().len(), 1);

    assert!(e.secondary_click(&b, a));
    assert!(e.connections().is_empty());
}

#[test]
fn erase_leaves_prebaked_routes_alone() {
    let b = board();
    let mut e = ConnectionEditor::default();
    assert!(!e.secondary_click(&b, GridPos::new(6, 4)));
    assert_eq!(b.prebaked.len(), 1);
}

#[test]
fn release_over_empty_cell_is_absorbed() {
    let b = board();
    let mut e = ConnectionEditor::default();
    e.pointer_down(&b, GridPos::new(1, 1));
    e.pointer_move(&b, GridPos::new(5, 5));
    assert_eq!(
        e.drag(),
        DragState::Dragging {
            origin: GridPos::new(1, 1),
            current: GridPos::new(1, 1),
        }
    );
    assert!(e.pointer_up(&b, GridPos::new(5, 5)));
    assert_eq!(e.drag(), DragState::Idle);
    assert!(e.connections().is_empty());
}

#[test]
fn pointer_pixels_drive_the_editor() {
    let b = board();
    let t = CoordinateTransform::new(600.0, 75.0, 10);
    let mut e = ConnectionEditor::new("red", PreviewColor::Selected);

    let from = t.to_grid(PixelPoint::new(61.0, 89.0));
    let to = t.to_grid(t.to_pixel(GridPos::new(3, 1), Anchor::Center));
    assert_eq!(from, GridPos::new(1, 1));
    drag(&mut e, &b, from, to);
    assert_eq!(e.connections()[0].to, GridPos::new(3, 1));
}

#[test]
fn round_trip_covers_the_whole_grid() {
    for side in [300.0, 487.0, 750.0, 1024.0] {
        let t = CoordinateTransform::new(side, 75.0, 10);
        for x in 0..10 {
            for y in 0..10 {
                let p = GridPos::new(x, y);
                assert_eq!(t.to_grid(t.to_pixel(p, Anchor::Corner)), p);
                assert_eq!(t.to_grid(t.to_pixel(p, Anchor::Center)), p);
            }
        }
    }
}

#[test]
fn starting_position_variant_colors_by_origin() {
    let b = board();
    let mut e = ConnectionEditor::new("red", PreviewColor::StartingPosition);
    drag(&mut e, &b, GridPos::new(1, 1), GridPos::new(3, 1));
    drag(&mut e, &b, GridPos::new(3, 1), GridPos::new(6, 4));
    assert_ne!(e.connections()[0].color, "red");
    assert_eq!(e.connections()[1].color, "red");
}
