use std::rc::Rc;

use super::{board_view::BoardView, color_picker::ColorPicker, score_pad::ScorePadView};
use crate::config::Preferences;
use crate::model::BoardModel;
use crate::state::PreviewColor;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let prefs = use_state(Preferences::load);
    let board = use_state(|| None::<Rc<BoardModel>>);
    let status = use_state(|| None::<String>);

    // Persist preference changes
    {
        use_effect_with((*prefs).clone(), move |p| {
            p.save();
            || ()
        });
    }

    let on_board_id = {
        let prefs = prefs.clone();
        let board = board.clone();
        let status = status.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let (next, changed) = prefs.with_board_id(&input.value());
            prefs.set(next);
            // The board view only reloads when the trimmed id changes.
            if changed {
                board.set(None);
                status.set(None);
            }
        })
    };
    let on_color = {
        let prefs = prefs.clone();
        Callback::from(move |color: String| {
            prefs.set(Preferences {
                selected_color: color,
                ..(*prefs).clone()
            });
        })
    };
    let on_loaded = {
        let board = board.clone();
        let status = status.clone();
        Callback::from(move |b: Rc<BoardModel>| {
            board.set(Some(b));
            status.set(None);
        })
    };
    let on_error = {
        let status = status.clone();
        Callback::from(move |msg: String| status.set(Some(msg)))
    };

    let board_id = prefs.effective_board_id().to_string();
    html! {
        <div id="root" style="font-family:sans-serif; max-width:900px; margin:0 auto; padding:12px;">
            <div id="top-bar" style="display:flex; flex-wrap:wrap; gap:16px; align-items:center; margin-bottom:10px;">
                <label style="display:flex; gap:6px; align-items:center;">
                    { "Board" }
                    <input id="board-id" type="text" value={prefs.board_id.clone()} oninput={on_board_id} style="padding:4px; width:10em;" />
                </label>
                <ColorPicker selected={prefs.selected_color.clone()} on_select={on_color} />
            </div>
            {
                match &*status {
                    Some(msg) => html! { <div id="status" style="color:#b71c1c; margin-bottom:8px;">{ msg.clone() }</div> },
                    None if board_id.is_empty() => html! { <div id="status" style="color:#666; margin-bottom:8px;">{ "Enter a board id to load a board." }</div> },
                    None => html! {},
                }
            }
            <BoardView
                board_id={board_id.clone()}
                selected_color={prefs.selected_color.clone()}
                preview={PreviewColor::Selected}
                {on_loaded}
                {on_error}
            />
            {
                match &*board {
                    Some(b) => html! { <ScorePadView key={board_id.clone()} board={b.clone()} board_id={board_id.clone()} /> },
                    None => html! {},
                }
            }
        </div>
    }
}
