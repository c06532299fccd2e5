//! Error kinds surfaced by board loading, score pad wiring and the
//! connection editor.

use thiserror::Error;

use crate::model::GridPos;
use crate::score::CellAddr;

/// Board document or texture could not be fetched or decoded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no browser window available")]
    NoWindow,
    #[error("request to {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("board document is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("texture '{texture}' could not be loaded: {reason}")]
    Image { texture: String, reason: String },
}

/// Score graph wiring and editing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("no leaf cell at {0}")]
    InvalidAddress(CellAddr),
    #[error("cell {cell} depends on {dependency}, which does not exist yet")]
    MissingDependency { cell: CellAddr, dependency: CellAddr },
    #[error("cell {0} was defined twice")]
    DuplicateCell(CellAddr),
}

/// Pointer interactions that cannot produce a connection. The editor never
/// raises these to the host; they are absorbed as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("station at {0} is no longer on the board")]
    StaleStation(GridPos),
    #[error("connection would start and end at the same station")]
    SameStation,
    #[error("no station at {0}")]
    NoStation(GridPos),
}
