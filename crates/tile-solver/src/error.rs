//! Error types for board construction and bounded search.

use std::time::Duration;

use thiserror::Error;

/// A tile grid that does not describe a valid puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Board dimension {dimension} is too small (minimum is 2)")]
    TooSmall { dimension: usize },

    #[error("Row {row} has {len} tiles but the board has dimension {dimension}")]
    NotSquare {
        row: usize,
        len: usize,
        dimension: usize,
    },

    #[error("Tile {tile} is outside 0..{limit}")]
    TileOutOfRange { tile: u32, limit: u32 },

    #[error("Tile {tile} appears more than once")]
    DuplicateTile { tile: u32 },

    #[error("Malformed board text: {0}")]
    Parse(String),
}

/// Reasons a configured search stopped before reaching a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("Search timed out after {elapsed:?} ({expansions} expansions)")]
    Timeout {
        elapsed: Duration,
        expansions: usize,
    },

    #[error("Search stopped after reaching the expansion limit of {limit}")]
    ExpansionLimit { limit: usize },

    #[error(transparent)]
    Board(#[from] BoardError),
}
