pub mod graph;
pub mod pad;
pub mod reducer;

pub use graph::{CellAddr, CellValue, Formula, LeafKind, ScoreGraph, ScoreGraphBuilder};
pub use pad::{PadSlot, ScorePad};
pub use reducer::{ScoreAction, ScorePadState};
