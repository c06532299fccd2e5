// Reducer state behind the score table component.
use std::rc::Rc;

use yew::Reducible;

use super::graph::CellAddr;
use super::pad::ScorePad;
use crate::error::ScoreError;
use crate::model::ScoreSheet;

#[derive(Clone, Debug, PartialEq)]
pub enum ScoreAction {
    /// Raw text from a numeric input, before parsing.
    Input { addr: CellAddr, raw: String },
    Toggle(CellAddr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScorePadState {
    /// `Err` when the pad could not be wired; no edits are accepted then.
    pub pad: Result<ScorePad, ScoreError>,
    /// The most recent rejected write, if the last action failed.
    pub last_error: Option<ScoreError>,
}

impl ScorePadState {
    pub fn new(sheet: &ScoreSheet) -> Self {
        Self {
            pad: ScorePad::build(sheet),
            last_error: None,
        }
    }
}

impl Reducible for ScorePadState {
    type Action = ScoreAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let Ok(pad) = &self.pad else {
            return self;
        };
        let mut pad = pad.clone();
        let outcome = match action {
            ScoreAction::Input { addr, raw } => pad.set_raw(addr, &raw),
            ScoreAction::Toggle(addr) => pad.toggle(addr).map(|_| ()),
        };
        Rc::new(Self {
            pad: Ok(pad),
            last_error: outcome.err(),
        })
    }
}
