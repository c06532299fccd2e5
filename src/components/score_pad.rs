use std::rc::Rc;

use gloo::console;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::config::AssetPaths;
use crate::model::BoardModel;
use crate::score::pad::PAD_COLUMNS;
use crate::score::{CellAddr, PadSlot, ScoreAction, ScorePad, ScorePadState};

#[derive(Properties, PartialEq, Clone)]
pub struct ScorePadViewProps {
    pub board: Rc<BoardModel>,
    pub board_id: String,
}

const INPUT_STYLE: &str = "width:3.2em; text-align:center; font-size:15px; padding:3px; border:1px solid #bbb; border-radius:4px;";

fn cell_content(
    slot: Option<&PadSlot>,
    pad: &ScorePad,
    paths: &AssetPaths,
    board_id: &str,
    dispatch: &UseReducerDispatcher<ScorePadState>,
) -> Html {
    let Some(slot) = slot else {
        return html! {};
    };
    match slot {
        PadSlot::Icon { texture, label } => html! {
            <img class="score-icon" src={paths.texture(board_id, texture)} alt={label.clone()} title={label.clone()} style="width:32px; height:32px;" />
        },
        PadSlot::CommonGoalIcon => html! {
            <img class="score-icon" src={paths.common_goal_icon()} alt="common goal" style="width:32px; height:32px;" />
        },
        PadSlot::Operator(symbol) => html! {
            <span class="score-table-operation-symbol" style="font-weight:bold; color:#555;">{ *symbol }</span>
        },
        PadSlot::Input(addr) => {
            let addr = *addr;
            let dispatch = dispatch.clone();
            let oninput = Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                dispatch.dispatch(ScoreAction::Input { addr, raw: input.value() });
            });
            html! { <input type="number" class="score-input" style={INPUT_STYLE} {oninput} /> }
        }
        PadSlot::Toggle(addr) => {
            let addr = *addr;
            let dispatch = dispatch.clone();
            let onclick = Callback::from(move |_: MouseEvent| dispatch.dispatch(ScoreAction::Toggle(addr)));
            html! { <input type="checkbox" class="score-input" checked={pad.is_on(addr)} {onclick} /> }
        }
        PadSlot::Output(addr) => html! {
            <input type="text" readonly=true class="score-input score-output" style={format!("{} background:#f3f3f3;", INPUT_STYLE)} value={pad.formatted(*addr)} />
        },
        PadSlot::BonusLabel(text) => html! {
            <div class="common-goal-text" style="font-size:13px; color:#2e7d32;">{ text.clone() }</div>
        },
        PadSlot::Monument { addr, texture } => {
            let addr = *addr;
            let selected = pad.is_on(addr);
            let dispatch = dispatch.clone();
            let onclick = Callback::from(move |_: MouseEvent| dispatch.dispatch(ScoreAction::Toggle(addr)));
            let filter = if selected {
                "filter:drop-shadow(0 0 4px #f1c40f);"
            } else {
                "filter:grayscale(80%); opacity:0.6;"
            };
            html! {
                <div class="monument-icon-container" data-selected={selected.to_string()} style={format!("cursor:pointer; {}", filter)} {onclick}>
                    <img src={paths.texture(board_id, texture)} alt="monument" style="width:36px; height:36px;" />
                </div>
            }
        }
    }
}

#[function_component(ScorePadView)]
pub fn score_pad_view(props: &ScorePadViewProps) -> Html {
    let board = props.board.clone();
    let state = use_reducer(move || ScorePadState::new(&board.sheet));
    let paths = use_memo((), |_| AssetPaths::from_window());

    {
        let failure = state.pad.as_ref().err().cloned();
        use_effect_with(failure, |failure| {
            if let Some(e) = failure {
                console::error!(format!("score pad unavailable: {}", e));
            }
            || ()
        });
    }
    {
        let rejected = state.last_error.clone();
        use_effect_with(rejected, |rejected| {
            if let Some(e) = rejected {
                console::error!(format!("rejected score edit: {}", e));
            }
            || ()
        });
    }

    let pad = match &state.pad {
        Ok(pad) => pad,
        Err(e) => {
            return html! {
                <div class="score-pad-error" style="padding:12px; color:#b71c1c; border:1px solid #e57373; border-radius:6px;">
                    { format!("The score pad for this board could not be built: {}", e) }
                </div>
            };
        }
    };
    let dispatch = state.dispatcher();

    html! {
        <table id="score-table" style="border-collapse:collapse; margin:12px auto;">
            <tbody>
            { for (0..pad.rows()).map(|row| html! {
                <tr>
                { for (0..PAD_COLUMNS).map(|col| {
                    let slot = pad.slot(CellAddr::new(col, row));
                    html! {
                        <td style="padding:2px 4px; text-align:center; vertical-align:middle;">
                            { cell_content(slot, pad, &paths, &props.board_id, &dispatch) }
                        </td>
                    }
                }) }
                </tr>
            }) }
            </tbody>
        </table>
    }
}
