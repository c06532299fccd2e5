//! Reactive cell graph behind the score pad.
//!
//! Cells live on a `(column, row)` grid. Leaves hold user input; derived cells
//! hold a [`Formula`] over cells that already existed when they were added, so
//! creation order is a valid evaluation order and the graph cannot contain a
//! cycle. Editing a leaf recomputes its transitive dependents in that order.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::ScoreError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddr {
    pub col: u32,
    pub row: u32,
}

impl CellAddr {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for CellAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Toggle(bool),
}

impl CellValue {
    /// Toggles count as 1 or 0 in arithmetic.
    pub fn as_number(self) -> f64 {
        match self {
            CellValue::Number(n) => n,
            CellValue::Toggle(true) => 1.0,
            CellValue::Toggle(false) => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafKind {
    Number,
    Toggle,
}

impl LeafKind {
    fn zero(self) -> CellValue {
        match self {
            LeafKind::Number => CellValue::Number(0.0),
            LeafKind::Toggle => CellValue::Toggle(false),
        }
    }

    fn coerce(self, value: CellValue) -> CellValue {
        match self {
            LeafKind::Number => CellValue::Number(value.as_number()),
            LeafKind::Toggle => CellValue::Toggle(value.as_number() != 0.0),
        }
    }

    /// Raw control text; anything unparseable reads as zero/false.
    fn parse(self, raw: &str) -> CellValue {
        let raw = raw.trim();
        match self {
            LeafKind::Number => {
                let n = raw.parse::<f64>().ok().filter(|n| n.is_finite());
                CellValue::Number(n.unwrap_or(0.0))
            }
            LeafKind::Toggle => CellValue::Toggle(matches!(raw, "true" | "on" | "1")),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Formula {
    Sum,
    /// `inputs[0] * inputs[1] + inputs[2]`, one turn column of the pad.
    MultiplyAdd,
    Scale(f64),
    WeightedSum(Vec<f64>),
    /// Looks up how many inputs are non-zero; past the table end scores zero.
    CountLookup(Vec<f64>),
}

impl Formula {
    pub fn evaluate(&self, inputs: &[f64]) -> f64 {
        let at = |i: usize| inputs.get(i).copied().unwrap_or(0.0);
        let raw = match self {
            Formula::Sum => inputs.iter().sum(),
            Formula::MultiplyAdd => at(0) * at(1) + at(2),
            Formula::Scale(factor) => at(0) * factor,
            Formula::WeightedSum(weights) => {
                inputs.iter().zip(weights).map(|(v, w)| v * w).sum()
            }
            Formula::CountLookup(table) => {
                let selected = inputs.iter().filter(|v| **v != 0.0).count();
                table.get(selected).copied().unwrap_or(0.0)
            }
        };
        round_cents(raw)
    }
}

pub fn round_cents(v: f64) -> f64 {
    let r = (v * 100.0).round() / 100.0;
    // Normalize -0.0 so it never formats as "-0".
    if r == 0.0 { 0.0 } else { r }
}

#[derive(Clone, Debug, PartialEq)]
enum CellKind {
    Leaf(LeafKind),
    Derived {
        deps: Vec<usize>,
        formula: Formula,
    },
}

#[derive(Clone, Debug, PartialEq)]
struct Cell {
    addr: CellAddr,
    kind: CellKind,
    value: CellValue,
}

/// Collects cells in evaluation order. Only a fully wired graph can be built,
/// so edits are never accepted against a half-constructed pad.
#[derive(Debug, Default)]
pub struct ScoreGraphBuilder {
    cells: Vec<Cell>,
    index: HashMap<CellAddr, usize>,
}

impl ScoreGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, addr: CellAddr, kind: CellKind, value: CellValue) -> Result<CellAddr, ScoreError> {
        if self.index.contains_key(&addr) {
            return Err(ScoreError::DuplicateCell(addr));
        }
        self.index.insert(addr, self.cells.len());
        self.cells.push(Cell { addr, kind, value });
        Ok(addr)
    }

    pub fn leaf(&mut self, addr: CellAddr, kind: LeafKind) -> Result<CellAddr, ScoreError> {
        self.push(addr, CellKind::Leaf(kind), kind.zero())
    }

    pub fn derived(
        &mut self,
        addr: CellAddr,
        deps: &[CellAddr],
        formula: Formula,
    ) -> Result<CellAddr, ScoreError> {
        let deps = deps
            .iter()
            .map(|d| {
                self.index.get(d).copied().ok_or(ScoreError::MissingDependency {
                    cell: addr,
                    dependency: *d,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let inputs: Vec<f64> = deps.iter().map(|&i| self.cells[i].value.as_number()).collect();
        let value = CellValue::Number(formula.evaluate(&inputs));
        self.push(addr, CellKind::Derived { deps, formula }, value)
    }

    pub fn build(self) -> ScoreGraph {
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.cells.len()];
        for (i, cell) in self.cells.iter().enumerate() {
            if let CellKind::Derived { deps, .. } = &cell.kind {
                for &d in deps {
                    dependents[d].push(i);
                }
            }
        }
        ScoreGraph {
            cells: self.cells,
            index: self.index,
            dependents,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreGraph {
    cells: Vec<Cell>,
    index: HashMap<CellAddr, usize>,
    dependents: Vec<Vec<usize>>,
}

impl ScoreGraph {
    pub fn contains(&self, addr: CellAddr) -> bool {
        self.index.contains_key(&addr)
    }

    pub fn leaf_kind(&self, addr: CellAddr) -> Option<LeafKind> {
        match self.cells[*self.index.get(&addr)?].kind {
            CellKind::Leaf(kind) => Some(kind),
            CellKind::Derived { .. } => None,
        }
    }

    pub fn is_derived(&self, addr: CellAddr) -> bool {
        self.index
            .get(&addr)
            .is_some_and(|&i| matches!(self.cells[i].kind, CellKind::Derived { .. }))
    }

    pub fn value(&self, addr: CellAddr) -> Option<CellValue> {
        self.index.get(&addr).map(|&i| self.cells[i].value)
    }

    /// Numeric view of a cell; unknown addresses read as zero.
    pub fn number(&self, addr: CellAddr) -> f64 {
        self.value(addr).map_or(0.0, CellValue::as_number)
    }

    pub fn addresses(&self) -> impl Iterator<Item = CellAddr> + '_ {
        self.cells.iter().map(|c| c.addr)
    }

    fn leaf_index(&self, addr: CellAddr) -> Result<(usize, LeafKind), ScoreError> {
        match self.index.get(&addr) {
            Some(&i) => match self.cells[i].kind {
                CellKind::Leaf(kind) => Ok((i, kind)),
                CellKind::Derived { .. } => Err(ScoreError::InvalidAddress(addr)),
            },
            None => Err(ScoreError::InvalidAddress(addr)),
        }
    }

    pub fn set_leaf(&mut self, addr: CellAddr, value: CellValue) -> Result<(), ScoreError> {
        let (i, kind) = self.leaf_index(addr)?;
        self.cells[i].value = kind.coerce(value);
        self.propagate(i);
        Ok(())
    }

    /// Stores the raw text of an input control.
    pub fn set_raw(&mut self, addr: CellAddr, raw: &str) -> Result<(), ScoreError> {
        let (i, kind) = self.leaf_index(addr)?;
        self.cells[i].value = kind.parse(raw);
        self.propagate(i);
        Ok(())
    }

    /// Flips a toggle leaf and returns its new state.
    pub fn toggle(&mut self, addr: CellAddr) -> Result<bool, ScoreError> {
        let (i, kind) = self.leaf_index(addr)?;
        if kind != LeafKind::Toggle {
            return Err(ScoreError::InvalidAddress(addr));
        }
        let on = self.cells[i].value.as_number() == 0.0;
        self.cells[i].value = CellValue::Toggle(on);
        self.propagate(i);
        Ok(on)
    }

    fn propagate(&mut self, from: usize) {
        // Dependents always have larger indices than their inputs, so walking
        // the dirty set in index order evaluates every input before its users.
        let mut dirty = BTreeSet::new();
        let mut stack = vec![from];
        while let Some(i) = stack.pop() {
            for &d in &self.dependents[i] {
                if dirty.insert(d) {
                    stack.push(d);
                }
            }
        }
        for i in dirty {
            let value = self.recompute(i);
            self.cells[i].value = CellValue::Number(value);
        }
    }

    fn recompute(&self, i: usize) -> f64 {
        match &self.cells[i].kind {
            CellKind::Leaf(_) => self.cells[i].value.as_number(),
            CellKind::Derived { deps, formula } => {
                let inputs: Vec<f64> = deps.iter().map(|&d| self.cells[d].value.as_number()).collect();
                formula.evaluate(&inputs)
            }
        }
    }

    /// Evaluates a cell straight from the leaves, ignoring cached values.
    pub fn evaluate_fresh(&self, addr: CellAddr) -> Option<f64> {
        self.index.get(&addr).map(|&i| self.fresh(i))
    }

    fn fresh(&self, i: usize) -> f64 {
        match &self.cells[i].kind {
            CellKind::Leaf(_) => self.cells[i].value.as_number(),
            CellKind::Derived { deps, formula } => {
                let inputs: Vec<f64> = deps.iter().map(|&d| self.fresh(d)).collect();
                formula.evaluate(&inputs)
            }
        }
    }
}
