use std::rc::Rc;

use gloo::console;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use crate::config::{AssetPaths, BoardConfig};
use crate::loader::{fetch_board, load_icons};
use crate::model::BoardModel;
use crate::session::{ActiveBoard, BoardSlot};
use crate::state::{ConnectionEditor, PreviewColor};
use crate::util::clog;

#[derive(Properties, PartialEq, Clone)]
pub struct BoardViewProps {
    pub board_id: String,
    pub selected_color: String,
    #[prop_or_default]
    pub preview: PreviewColor,
    pub on_loaded: Callback<Rc<BoardModel>>,
    pub on_error: Callback<String>,
}

#[function_component(BoardView)]
pub fn board_view(props: &BoardViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let slot = use_mut_ref(BoardSlot::<ActiveBoard>::default);
    // Read by a load that finishes after the color changed.
    let color = use_mut_ref(|| props.selected_color.clone());

    {
        let slot = slot.clone();
        let color = color.clone();
        use_effect_with(props.selected_color.clone(), move |selected| {
            *color.borrow_mut() = selected.clone();
            if let Some(active) = slot.borrow().active() {
                active.set_color(selected);
            }
            || ()
        });
    }

    {
        let slot = slot.clone();
        let canvas_ref = canvas_ref.clone();
        let on_loaded = props.on_loaded.clone();
        let on_error = props.on_error.clone();
        let preview = props.preview;
        use_effect_with(props.board_id.trim().to_string(), move |board_id| {
            let ticket = slot.borrow_mut().begin_load();
            if !board_id.is_empty() {
                let board_id = board_id.clone();
                let slot = slot.clone();
                spawn_local(async move {
                    let paths = AssetPaths::from_window();
                    clog(&format!("loading board {}", board_id));
                    let board = match fetch_board(&paths, &board_id).await {
                        Ok(b) => b,
                        Err(e) => {
                            if slot.borrow().is_current(ticket) {
                                console::error!(format!("board {}: {}", board_id, e));
                                on_error.emit(e.to_string());
                            }
                            return;
                        }
                    };
                    if !slot.borrow().is_current(ticket) {
                        return;
                    }
                    let icons = load_icons(&paths, &board_id, board.textures()).await;
                    if !slot.borrow().is_current(ticket) {
                        return;
                    }
                    let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() else {
                        let msg = format!("board {}: canvas is not mounted", board_id);
                        console::warn!(msg.clone());
                        on_error.emit(msg);
                        return;
                    };
                    clog(&format!(
                        "board {} ready: {} stations, {} intersections, {} icons",
                        board_id,
                        board.stations.len(),
                        board.intersections.len(),
                        icons.len()
                    ));
                    let board = Rc::new(board);
                    let editor = ConnectionEditor::new(color.borrow().clone(), preview);
                    match ActiveBoard::attach(canvas, board.clone(), icons, editor, BoardConfig::default()) {
                        Ok(active) => {
                            if slot.borrow_mut().install(ticket, active) {
                                on_loaded.emit(board);
                            }
                        }
                        Err(e) => {
                            let msg = format!("cannot attach board: {:?}", e);
                            console::error!(msg.clone());
                            on_error.emit(msg);
                        }
                    }
                });
            }
            move || slot.borrow_mut().teardown()
        });
    }

    html! {
        <div class="board-container" style="width:100%; max-width:750px; aspect-ratio:1 / 1; margin:0 auto;">
            <canvas ref={canvas_ref} id="gameCanvas" style="display:block; width:100%; height:100%; touch-action:none;"></canvas>
        </div>
    }
}
