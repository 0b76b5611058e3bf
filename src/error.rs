//! Error types shared by the search engine and its problem domains.
//!
//! "No solution" is not an error: an unsolvable tile configuration or an
//! exhausted frontier is reported through
//! [`SearchOutcome`](crate::search::SearchOutcome). The variants here cover
//! malformed input and broken engine invariants.

use thiserror::Error;

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The frontier has no entries left to extract.
    #[error("frontier is empty")]
    EmptyFrontier,

    /// A state on the predecessor chain has no recorded predecessor.
    ///
    /// The drivers only set predecessors for states they have reached, so this
    /// always indicates a bug in the engine.
    #[error("predecessor chain broken at state {state}")]
    BrokenChain { state: String },

    /// The maze has no start marker (`I`).
    #[error("maze has no start marker 'I'")]
    InvalidStart,

    /// The maze has no finish marker (`F`).
    #[error("maze has no finish marker 'F'")]
    InvalidGoal,

    /// A tile board is not a permutation of `0..16` laid out on a 4x4 grid.
    #[error("invalid board: {0}")]
    InvalidBoard(String),

    /// A maze grid is malformed (ragged rows, unknown cells, duplicate markers).
    #[error("invalid maze: {0}")]
    InvalidMaze(String),

    /// A tic-tac-toe move targets an occupied or out-of-range cell.
    #[error("invalid move: {0}")]
    InvalidMove(String),
}
