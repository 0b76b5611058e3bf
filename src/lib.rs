//! # Tile & Maze Solver Library
//!
//! This library solves discrete state-space search problems: finding a
//! minimum-move solution to the 15-puzzle, and finding a shortest path through
//! a grid maze. Both run on one generic search engine with breadth-first,
//! depth-first, and A* drivers.
//!
//! It is used by four binaries:
//! - `puzzle_solver`: Solves a 15-puzzle with A* and animates the solution.
//! - `maze_solver`: Solves a maze with DFS, BFS and A* and prints each path.
//! - `search_evaluator`: Compares tile heuristics on seeded scrambles.
//! - `tic_tac_toe`: Plays 4x4 tic-tac-toe against a minimax opponent.
//!
//! ## Modules
//! - `search`: The `SearchProblem` trait, the A* frontier and cost table, the
//!   search drivers, and path reconstruction.
//! - `puzzle`: The 15-puzzle board (`Board`), its parity check, and the
//!   `SlidingPuzzle` search problem.
//! - `maze`: Maze parsing, expansion, and path rendering (`Maze`).
//! - `heuristics`: Admissible tile heuristics (Manhattan, misplaced tiles).
//! - `grid`: Cell coordinates and the fixed move order shared by both domains.
//! - `minimax`: Tic-tac-toe with alpha-beta minimax; independent of the search engine.
//! - `utils`: Parsing boards and mazes from string rows.
//! - `error`: The `SolverError` type.

pub mod error;
pub mod grid;
pub mod heuristics;
pub mod maze;
pub mod minimax;
pub mod puzzle;
pub mod search;
pub mod utils;

pub use error::{Result, SolverError};
pub use search::{SearchConfig, SearchOutcome, SearchProblem, SolutionPath};
