use crate::puzzle::{Board, GoalPositions, BLANK, PUZZLE_SIZE};
use crate::grid::Position;
use std::fmt;
use std::str::FromStr;

/// Sums, over every non-blank tile, the Manhattan distance between its current
/// cell and its cell on the goal board.
///
/// Each move slides exactly one tile by one cell, so it changes this sum by
/// exactly one. The estimate therefore never exceeds the true number of moves
/// left, and differs by at most one between adjacent boards.
///
/// # Arguments
/// * `board`: The board to evaluate.
/// * `goals`: Precomputed goal cell of every tile.
///
/// # Returns
/// The total distance as `u32`; `0` only for the goal board.
pub fn manhattan_distance(board: &Board, goals: &GoalPositions) -> u32 {
    let mut total = 0;
    for r in 0..PUZZLE_SIZE {
        for c in 0..PUZZLE_SIZE {
            let tile = board.get_tile(r, c);
            if tile != BLANK {
                total += Position::new(r, c).manhattan_distance(goals.of(tile));
            }
        }
    }
    total
}

/// Counts the non-blank tiles that are not on their goal cell.
///
/// Every misplaced tile needs at least one move, so this is admissible too,
/// but it is never larger than [`manhattan_distance`] and guides the search
/// less.
pub fn misplaced_tiles(board: &Board, goals: &GoalPositions) -> u32 {
    let mut misplaced = 0;
    for r in 0..PUZZLE_SIZE {
        for c in 0..PUZZLE_SIZE {
            let tile = board.get_tile(r, c);
            if tile != BLANK && goals.of(tile) != Position::new(r, c) {
                misplaced += 1;
            }
        }
    }
    misplaced
}

/// Heuristic used by the sliding-tile search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileHeuristic {
    /// Sum of per-tile Manhattan distances.
    #[default]
    Manhattan,
    /// Number of tiles off their goal cell.
    MisplacedTiles,
    /// Always zero; A* then orders purely by moves made.
    Zero,
}

impl TileHeuristic {
    pub const ALL: [TileHeuristic; 3] = [
        TileHeuristic::Manhattan,
        TileHeuristic::MisplacedTiles,
        TileHeuristic::Zero,
    ];

    pub fn evaluate(self, board: &Board, goals: &GoalPositions) -> u32 {
        match self {
            TileHeuristic::Manhattan => manhattan_distance(board, goals),
            TileHeuristic::MisplacedTiles => misplaced_tiles(board, goals),
            TileHeuristic::Zero => 0,
        }
    }
}

impl fmt::Display for TileHeuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileHeuristic::Manhattan => "manhattan",
            TileHeuristic::MisplacedTiles => "misplaced",
            TileHeuristic::Zero => "zero",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TileHeuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manhattan" => Ok(TileHeuristic::Manhattan),
            "misplaced" | "misplaced-tiles" => Ok(TileHeuristic::MisplacedTiles),
            "zero" | "none" => Ok(TileHeuristic::Zero),
            other => Err(format!(
                "unknown heuristic '{}' (expected manhattan, misplaced or zero)",
                other
            )),
        }
    }
}
