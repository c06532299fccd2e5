//! Score pad: the paper scoring sheet wired as a [`ScoreGraph`].
//!
//! Layout (column, row) on a 16 x 9 grid:
//! - turns in columns 1/3/5/7, contributors A/B/C in rows 0/2/4, each turn
//!   total `A x B + C` in row 6 and their sum at (9, 6);
//! - end-game inputs at (11, r), weighted results at (13, r), sum at (13, 6);
//! - progress total at (11, 6), compound inputs in row 7, monuments from row 8
//!   on, wrapping every 16;
//! - common-goal checkboxes at (15, 2) and (15, 4), bonus sum at (15, 6);
//! - grand total at (13, 7).

use std::collections::BTreeMap;

use super::graph::{CellAddr, CellValue, Formula, LeafKind, ScoreGraph, ScoreGraphBuilder};
use crate::config::COMMON_GOAL_BONUS;
use crate::error::ScoreError;
use crate::model::{CompoundContributor, Contributor, MonumentSet, ProgressContributor, ScoreSheet};
use crate::util::format_score;

pub const PAD_COLUMNS: u32 = 16;
/// Rows every pad has; monument sets wider than the grid wrap below.
pub const PAD_ROWS: u32 = 9;

pub const TURN_COLUMNS: [u32; 4] = [1, 3, 5, 7];
pub const CONTRIBUTOR_ROWS: [u32; 3] = [0, 2, 4];
pub const TOTALS_ROW: u32 = 6;
pub const TURN_WISE_TOTAL: CellAddr = CellAddr::new(9, 6);
pub const END_GAME_INPUT_COL: u32 = 11;
pub const END_GAME_RESULT_COL: u32 = 13;
pub const END_GAME_TOTAL: CellAddr = CellAddr::new(13, 6);
pub const PROGRESS_TOTAL: CellAddr = CellAddr::new(11, 6);
pub const PROGRESS_ROW: u32 = 7;
/// Input columns of compound sub-contributors A, B and C (right to left).
pub const COMPOUND_COLUMNS: [u32; 3] = [11, 7, 3];
pub const MONUMENT_ROW: u32 = 8;
pub const COMMON_GOALS: [CellAddr; 2] = [CellAddr::new(15, 2), CellAddr::new(15, 4)];
pub const COMMON_GOAL_TOTAL: CellAddr = CellAddr::new(15, 6);
pub const GRAND_TOTAL: CellAddr = CellAddr::new(13, 7);

const TURN_SYMBOLS: [&str; 3] = ["×", "+", "="];

/// What the score table shows at one address.
#[derive(Clone, Debug, PartialEq)]
pub enum PadSlot {
    Icon { texture: String, label: String },
    CommonGoalIcon,
    Operator(&'static str),
    Input(CellAddr),
    Toggle(CellAddr),
    Output(CellAddr),
    BonusLabel(String),
    Monument { addr: CellAddr, texture: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScorePad {
    graph: ScoreGraph,
    layout: BTreeMap<CellAddr, PadSlot>,
    rows: u32,
}

struct PadBuilder {
    graph: ScoreGraphBuilder,
    layout: BTreeMap<CellAddr, PadSlot>,
}

impl PadBuilder {
    fn place(&mut self, col: u32, row: u32, slot: PadSlot) {
        self.layout.insert(CellAddr::new(col, row), slot);
    }

    fn icon(&mut self, col: u32, row: u32, c: &Contributor) {
        self.place(
            col,
            row,
            PadSlot::Icon {
                texture: c.texture.clone(),
                label: c.kind.clone(),
            },
        );
    }

    fn input(&mut self, addr: CellAddr) -> Result<CellAddr, ScoreError> {
        self.layout.insert(addr, PadSlot::Input(addr));
        self.graph.leaf(addr, LeafKind::Number)
    }

    fn output(&mut self, addr: CellAddr, deps: &[CellAddr], formula: Formula) -> Result<CellAddr, ScoreError> {
        self.layout.insert(addr, PadSlot::Output(addr));
        self.graph.derived(addr, deps, formula)
    }

    fn turn_wise(&mut self, contributors: &[Contributor; 3]) -> Result<(), ScoreError> {
        for (k, (c, &row)) in contributors.iter().zip(&CONTRIBUTOR_ROWS).enumerate() {
            self.icon(0, row, c);
            for &col in &TURN_COLUMNS {
                self.input(CellAddr::new(col, row))?;
                self.place(col, row + 1, PadSlot::Operator(TURN_SYMBOLS[k]));
            }
        }
        let mut turn_totals = Vec::with_capacity(TURN_COLUMNS.len());
        for (i, &col) in TURN_COLUMNS.iter().enumerate() {
            let deps = CONTRIBUTOR_ROWS.map(|row| CellAddr::new(col, row));
            turn_totals.push(self.output(CellAddr::new(col, TOTALS_ROW), &deps, Formula::MultiplyAdd)?);
            let joiner = if i + 1 == TURN_COLUMNS.len() { "=" } else { "+" };
            self.place(col + 1, TOTALS_ROW, PadSlot::Operator(joiner));
        }
        self.output(TURN_WISE_TOTAL, &turn_totals, Formula::Sum)?;
        Ok(())
    }

    fn end_game(&mut self, contributors: &[Contributor; 3]) -> Result<(), ScoreError> {
        let mut results = Vec::with_capacity(contributors.len());
        for (c, &row) in contributors.iter().zip(&CONTRIBUTOR_ROWS) {
            self.icon(END_GAME_INPUT_COL - 2, row, c);
            self.place(END_GAME_INPUT_COL - 1, row, PadSlot::Operator("×"));
            let input = self.input(CellAddr::new(END_GAME_INPUT_COL, row))?;
            self.place(END_GAME_INPUT_COL + 1, row, PadSlot::Operator("="));
            let result = CellAddr::new(END_GAME_RESULT_COL, row);
            results.push(self.output(result, &[input], Formula::Scale(c.multiplier))?);
            let joiner = if row == CONTRIBUTOR_ROWS[2] { "=" } else { "+" };
            self.place(END_GAME_RESULT_COL, row + 1, PadSlot::Operator(joiner));
        }
        self.output(END_GAME_TOTAL, &results, Formula::Sum)?;
        Ok(())
    }

    fn compound(&mut self, compound: &CompoundContributor) -> Result<(), ScoreError> {
        let subs = [&compound.a, &compound.b, &compound.c];
        let mut inputs = Vec::new();
        let mut weights = Vec::new();
        for (i, (sub, &col)) in subs.iter().zip(&COMPOUND_COLUMNS).enumerate() {
            // Absent sub-contributors are not wired at all.
            let Some(sub) = sub else { continue };
            if i > 0 {
                self.place(col + 1, PROGRESS_ROW, PadSlot::Operator("+"));
            }
            inputs.push(self.input(CellAddr::new(col, PROGRESS_ROW))?);
            weights.push(sub.multiplier);
            self.place(col - 1, PROGRESS_ROW, PadSlot::Operator("×"));
            self.icon(col - 2, PROGRESS_ROW, sub);
        }
        self.output(PROGRESS_TOTAL, &inputs, Formula::WeightedSum(weights))?;
        Ok(())
    }

    fn monuments(&mut self, set: &MonumentSet) -> Result<(), ScoreError> {
        let mut toggles = Vec::with_capacity(set.textures.len());
        for (i, texture) in set.textures.iter().enumerate() {
            let i = i as u32;
            let addr = CellAddr::new(i % PAD_COLUMNS, MONUMENT_ROW + i / PAD_COLUMNS);
            self.layout.insert(
                addr,
                PadSlot::Monument {
                    addr,
                    texture: texture.clone(),
                },
            );
            toggles.push(self.graph.leaf(addr, LeafKind::Toggle)?);
        }
        self.output(PROGRESS_TOTAL, &toggles, Formula::CountLookup(set.table.clone()))?;
        Ok(())
    }

    fn common_goals(&mut self) -> Result<(), ScoreError> {
        self.place(15, 0, PadSlot::CommonGoalIcon);
        self.place(15, 1, PadSlot::Operator("⇓"));
        for addr in COMMON_GOALS {
            self.layout.insert(addr, PadSlot::Toggle(addr));
            self.graph.leaf(addr, LeafKind::Toggle)?;
            self.place(
                addr.col,
                addr.row + 1,
                PadSlot::BonusLabel(format!("+{}", format_score(COMMON_GOAL_BONUS))),
            );
        }
        self.output(
            COMMON_GOAL_TOTAL,
            &COMMON_GOALS,
            Formula::WeightedSum(vec![COMMON_GOAL_BONUS; COMMON_GOALS.len()]),
        )?;
        Ok(())
    }
}

impl ScorePad {
    pub fn build(sheet: &ScoreSheet) -> Result<Self, ScoreError> {
        let mut b = PadBuilder {
            graph: ScoreGraphBuilder::new(),
            layout: BTreeMap::new(),
        };
        b.turn_wise(&sheet.turn_wise)?;
        b.end_game(&sheet.end_game)?;
        match &sheet.progress {
            Some(ProgressContributor::Compound(c)) => b.compound(c)?,
            Some(ProgressContributor::MonumentSet(m)) => b.monuments(m)?,
            None => {
                b.output(PROGRESS_TOTAL, &[], Formula::Sum)?;
            }
        }
        b.common_goals()?;
        for (col, op) in [(10, "+"), (12, "+"), (14, "+")] {
            b.place(col, TOTALS_ROW, PadSlot::Operator(op));
        }
        b.output(
            GRAND_TOTAL,
            &[TURN_WISE_TOTAL, PROGRESS_TOTAL, END_GAME_TOTAL, COMMON_GOAL_TOTAL],
            Formula::Sum,
        )?;
        let rows = b
            .layout
            .keys()
            .map(|a| a.row + 1)
            .max()
            .unwrap_or(0)
            .max(PAD_ROWS);
        Ok(Self {
            graph: b.graph.build(),
            layout: b.layout,
            rows,
        })
    }

    pub fn graph(&self) -> &ScoreGraph {
        &self.graph
    }

    /// Rows the table must render to reach every slot.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn slot(&self, addr: CellAddr) -> Option<&PadSlot> {
        self.layout.get(&addr)
    }

    pub fn set_raw(&mut self, addr: CellAddr, raw: &str) -> Result<(), ScoreError> {
        self.graph.set_raw(addr, raw)
    }

    pub fn set_leaf(&mut self, addr: CellAddr, value: CellValue) -> Result<(), ScoreError> {
        self.graph.set_leaf(addr, value)
    }

    pub fn toggle(&mut self, addr: CellAddr) -> Result<bool, ScoreError> {
        self.graph.toggle(addr)
    }

    pub fn number(&self, addr: CellAddr) -> f64 {
        self.graph.number(addr)
    }

    pub fn is_on(&self, addr: CellAddr) -> bool {
        self.graph.number(addr) != 0.0
    }

    pub fn formatted(&self, addr: CellAddr) -> String {
        format_score(self.graph.number(addr))
    }
}
