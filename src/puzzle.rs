//! The 15-puzzle: a 4x4 frame holding fifteen numbered tiles and one blank.
//!
//! This module defines:
//! - `Board`: an immutable tile configuration, with move generation, the
//!   solvability parity check, and seeded scrambles.
//! - `GoalPositions`: the goal cell of every tile, built once and shared with
//!   the heuristics.
//! - `SlidingPuzzle`: the [`SearchProblem`] that A* solves, with a selectable
//!   [`TileHeuristic`].
use crate::error::{Result, SolverError};
use crate::grid::{Direction, Position};
use crate::heuristics::{manhattan_distance, TileHeuristic};
use crate::search::{astar, SearchConfig, SearchOutcome, SearchProblem};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Width and height of the board.
pub const PUZZLE_SIZE: usize = 4;

/// Number of cells, i.e. fifteen tiles plus the blank.
pub const TILE_COUNT: usize = PUZZLE_SIZE * PUZZLE_SIZE;

/// Value stored in the blank cell.
pub const BLANK: u8 = 0;

const GOAL_GRID: [[u8; PUZZLE_SIZE]; PUZZLE_SIZE] = [
    [1, 2, 3, 4],
    [5, 6, 7, 8],
    [9, 10, 11, 12],
    [13, 14, 15, BLANK],
];

/// A tile configuration.
///
/// Boards compare equal iff every cell matches. The derived `Ord` compares
/// cells in row-major order and is the frontier's final tie-break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Board {
    grid: [[u8; PUZZLE_SIZE]; PUZZLE_SIZE],
}

impl Board {
    /// The solved board: tiles 1..15 in row-major order, blank last.
    ///
    /// # Examples
    /// ```
    /// use tile_maze_solver::puzzle::Board;
    /// let goal = Board::goal();
    /// assert_eq!(goal.get_tile(0, 0), 1);
    /// assert_eq!(goal.get_tile(3, 3), 0);
    /// assert!(goal.is_goal());
    /// ```
    pub const fn goal() -> Self {
        Board { grid: GOAL_GRID }
    }

    /// Builds a board from a grid that must contain each value `0..16` exactly once.
    pub fn from_grid(grid: [[u8; PUZZLE_SIZE]; PUZZLE_SIZE]) -> Result<Self> {
        let mut seen = [false; TILE_COUNT];
        for (r, row) in grid.iter().enumerate() {
            for (c, &tile) in row.iter().enumerate() {
                let index = tile as usize;
                if index >= TILE_COUNT {
                    return Err(SolverError::InvalidBoard(format!(
                        "tile {} at ({}, {}) is out of range 0..{}",
                        tile, r, c, TILE_COUNT
                    )));
                }
                if seen[index] {
                    return Err(SolverError::InvalidBoard(format!(
                        "tile {} appears more than once",
                        tile
                    )));
                }
                seen[index] = true;
            }
        }
        Ok(Board { grid })
    }

    /// Returns the tile at row `r`, column `c`; `BLANK` for the empty cell.
    ///
    /// # Panics
    /// Panics if `r` or `c` is not below `PUZZLE_SIZE`.
    pub fn get_tile(&self, r: usize, c: usize) -> u8 {
        self.grid[r][c]
    }

    pub fn get_grid(&self) -> &[[u8; PUZZLE_SIZE]; PUZZLE_SIZE] {
        &self.grid
    }

    pub fn blank_position(&self) -> Position {
        self.position_of(BLANK)
    }

    /// Cell currently holding `tile`.
    ///
    /// # Panics
    /// Panics if `tile` is not in `0..16`; a validated board holds every such value.
    pub fn position_of(&self, tile: u8) -> Position {
        for r in 0..PUZZLE_SIZE {
            for c in 0..PUZZLE_SIZE {
                if self.grid[r][c] == tile {
                    return Position::new(r, c);
                }
            }
        }
        panic!("tile {} is not on the board", tile);
    }

    pub fn is_goal(&self) -> bool {
        self.grid == GOAL_GRID
    }

    /// Number of tile pairs (blank excluded) that appear in the opposite order
    /// from the goal when the board is read row by row.
    pub fn inversion_count(&self) -> usize {
        let flat: Vec<u8> = self
            .grid
            .iter()
            .flatten()
            .copied()
            .filter(|&tile| tile != BLANK)
            .collect();
        let mut inversions = 0;
        for i in 0..flat.len() {
            for j in i + 1..flat.len() {
                if flat[i] > flat[j] {
                    inversions += 1;
                }
            }
        }
        inversions
    }

    /// Whether the goal board is reachable from this one.
    ///
    /// On a 4-wide board a configuration is solvable iff the inversion count
    /// and the blank's row counted from the bottom (1-based) have opposite
    /// parity.
    pub fn is_solvable(&self) -> bool {
        let blank_row_from_bottom = PUZZLE_SIZE - self.blank_position().row;
        let inversions_odd = self.inversion_count() % 2 == 1;
        let row_odd = blank_row_from_bottom % 2 == 1;
        inversions_odd != row_odd
    }

    /// Moves the blank one cell in `direction`, swapping it with the tile there.
    /// Returns `None` when the blank is on that edge.
    pub fn slide(&self, direction: Direction) -> Option<Board> {
        let blank = self.blank_position();
        let target = blank.step(direction, PUZZLE_SIZE, PUZZLE_SIZE)?;
        let mut grid = self.grid;
        grid[blank.row][blank.col] = grid[target.row][target.col];
        grid[target.row][target.col] = BLANK;
        Some(Board { grid })
    }

    /// Every board one move away, in `Direction::ALL` order (up, down, left,
    /// right), each tagged with the direction the blank moved.
    pub fn successors(&self) -> Vec<(Direction, Board)> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| self.slide(direction).map(|board| (direction, board)))
            .collect()
    }

    /// Direction the blank moved to turn `self` into `next`, if they are one move apart.
    pub fn move_between(&self, next: &Board) -> Option<Direction> {
        self.successors()
            .into_iter()
            .find(|(_, board)| board == next)
            .map(|(direction, _)| direction)
    }

    /// Scrambles the goal board with `moves` random blank moves.
    ///
    /// A move never undoes the previous one. The walk only uses legal moves, so
    /// the result is always solvable; the same seed always gives the same board.
    pub fn scrambled(seed: u64, moves: usize) -> Board {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Board::goal();
        let mut last: Option<Direction> = None;

        for _ in 0..moves {
            let options: Vec<(Direction, Board)> = board
                .successors()
                .into_iter()
                .filter(|(direction, _)| Some(direction.opposite()) != last)
                .collect();
            let (direction, next) = options[rng.gen_range(0..options.len())];
            board = next;
            last = Some(direction);
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::goal()
    }
}

impl fmt::Display for Board {
    /// Draws the board inside a dashed frame, blank as spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(13))?;
        for row in &self.grid {
            let cells: Vec<String> = row
                .iter()
                .map(|&tile| {
                    if tile == BLANK {
                        "  ".to_string()
                    } else {
                        format!("{:2}", tile)
                    }
                })
                .collect();
            writeln!(f, "| {} |", cells.join(" "))?;
        }
        write!(f, "{}", "-".repeat(13))
    }
}

/// Goal cell of every tile value, indexed by tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalPositions {
    positions: [Position; TILE_COUNT],
}

/// Lookup for the standard goal, built at compile time.
static STANDARD_GOAL_POSITIONS: GoalPositions = GoalPositions::from_goal_grid(&GOAL_GRID);

impl GoalPositions {
    const fn from_goal_grid(grid: &[[u8; PUZZLE_SIZE]; PUZZLE_SIZE]) -> Self {
        let mut positions = [Position::new(0, 0); TILE_COUNT];
        let mut r = 0;
        while r < PUZZLE_SIZE {
            let mut c = 0;
            while c < PUZZLE_SIZE {
                positions[grid[r][c] as usize] = Position::new(r, c);
                c += 1;
            }
            r += 1;
        }
        GoalPositions { positions }
    }

    pub fn for_board(goal: &Board) -> Self {
        let mut positions = [Position::new(0, 0); TILE_COUNT];
        for r in 0..PUZZLE_SIZE {
            for c in 0..PUZZLE_SIZE {
                positions[goal.get_tile(r, c) as usize] = Position::new(r, c);
            }
        }
        GoalPositions { positions }
    }

    /// Shared lookup table for [`Board::goal`].
    pub fn standard() -> &'static GoalPositions {
        &STANDARD_GOAL_POSITIONS
    }

    pub fn of(&self, tile: u8) -> Position {
        self.positions[tile as usize]
    }
}

/// The 15-puzzle as a search problem. Every move costs 1.
#[derive(Clone, Debug)]
pub struct SlidingPuzzle {
    goal_positions: GoalPositions,
    heuristic: TileHeuristic,
    config: SearchConfig,
}

impl SlidingPuzzle {
    pub fn new() -> Self {
        Self::with_heuristic(TileHeuristic::default())
    }

    pub fn with_heuristic(heuristic: TileHeuristic) -> Self {
        SlidingPuzzle {
            goal_positions: GoalPositions::standard().clone(),
            heuristic,
            config: SearchConfig::default(),
        }
    }

    /// Replaces the search limits used by [`SlidingPuzzle::solve`].
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn heuristic_kind(&self) -> TileHeuristic {
        self.heuristic
    }

    pub fn goal_positions(&self) -> &GoalPositions {
        &self.goal_positions
    }

    /// Solves `start` with A*.
    ///
    /// Returns [`SearchOutcome::Unsolvable`] without expanding anything when
    /// the parity check rules the board out.
    pub fn solve(&self, start: &Board) -> SearchOutcome<Board> {
        if !start.is_solvable() {
            tracing::info!(
                inversions = start.inversion_count(),
                blank = %start.blank_position(),
                "board fails the parity check, skipping search"
            );
            return SearchOutcome::Unsolvable;
        }
        astar(self, *start, &self.config)
    }
}

impl Default for SlidingPuzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchProblem for SlidingPuzzle {
    type State = Board;

    fn is_goal(&self, state: &Board) -> bool {
        state.is_goal()
    }

    fn successors(&self, state: &Board) -> Vec<(Board, u32)> {
        state
            .successors()
            .into_iter()
            .map(|(_, board)| (board, 1))
            .collect()
    }

    fn heuristic(&self, state: &Board) -> u32 {
        self.heuristic.evaluate(state, &self.goal_positions)
    }
}

/// Solves `start` with A* and the Manhattan heuristic.
pub fn solve(start: &Board) -> SearchOutcome<Board> {
    SlidingPuzzle::new().solve(start)
}

pub fn is_goal(board: &Board) -> bool {
    board.is_goal()
}

/// Manhattan distance of `board` from the goal.
pub fn heuristic(board: &Board) -> u32 {
    manhattan_distance(board, GoalPositions::standard())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::misplaced_tiles;
    use crate::search::breadth_first;
    use crate::utils::board_from_str_array;
    use proptest::prelude::*;

    fn demo_board() -> Board {
        Board::from_grid([[1, 2, 3, 4], [5, 6, 7, 8], [9, 15, 14, 12], [13, 11, 10, 0]]).unwrap()
    }

    fn assert_valid_path(path: &[Board]) {
        for pair in path.windows(2) {
            let reachable = pair[0].successors().iter().any(|(_, b)| *b == pair[1]);
            assert!(reachable, "{} does not lead to {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_goal_board_properties() {
        let goal = Board::goal();
        assert!(goal.is_goal());
        assert!(is_goal(&goal));
        assert_eq!(goal.inversion_count(), 0);
        assert!(goal.is_solvable());
        assert_eq!(goal.blank_position(), Position::new(3, 3));
        assert_eq!(heuristic(&goal), 0);
    }

    #[test]
    fn test_from_grid_rejects_invalid_boards() {
        let duplicate = Board::from_grid([[1, 1, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 0]]);
        assert!(matches!(duplicate, Err(SolverError::InvalidBoard(_))));

        let out_of_range =
            Board::from_grid([[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 16, 0]]);
        let err = out_of_range.unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_successors_order_from_corner() {
        let goal = Board::goal();
        let directions: Vec<Direction> = goal.successors().iter().map(|(d, _)| *d).collect();
        assert_eq!(directions, vec![Direction::Up, Direction::Left]);
        assert!(goal.slide(Direction::Down).is_none());
        assert!(goal.slide(Direction::Right).is_none());

        let up = goal.slide(Direction::Up).unwrap();
        assert_eq!(up.get_tile(2, 3), BLANK);
        assert_eq!(up.get_tile(3, 3), 12);
    }

    #[test]
    fn test_successors_from_center_has_four_moves() {
        let board = board_from_str_array(&[
            "1 2 3 4",
            "5 0 6 8",
            "9 10 7 12",
            "13 14 11 15",
        ])
        .unwrap();
        let directions: Vec<Direction> = board.successors().iter().map(|(d, _)| *d).collect();
        assert_eq!(directions, Direction::ALL.to_vec());
    }

    #[test]
    fn test_move_between() {
        let goal = Board::goal();
        let up = goal.slide(Direction::Up).unwrap();
        assert_eq!(goal.move_between(&up), Some(Direction::Up));
        assert_eq!(up.move_between(&goal), Some(Direction::Down));
        assert_eq!(goal.move_between(&goal), None);
        assert_eq!(goal.move_between(&demo_board()), None);
    }

    #[test]
    fn test_parity_check() {
        assert!(demo_board().is_solvable());

        let swapped = Board::from_grid([[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 15, 14, 0]])
            .unwrap();
        assert_eq!(swapped.inversion_count(), 1);
        assert!(!swapped.is_solvable());

        // Moving the blank up one row flips the row parity, and with it solvability.
        let blank_up = Board::goal().slide(Direction::Up).unwrap();
        assert!(blank_up.is_solvable());
    }

    #[test]
    fn test_solve_goal_is_zero_moves() {
        let outcome = solve(&Board::goal());
        let path = outcome.path().unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.moves(), 0);
        assert_eq!(outcome.expansions(), 1);
    }

    #[test]
    fn test_solve_one_move_from_goal() {
        let start = Board::from_grid([[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 0, 15]])
            .unwrap();
        let outcome = solve(&start);
        let path = outcome.path().unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.states(), &[start, Board::goal()]);
        assert!(outcome.expansions() <= 5);
    }

    #[test]
    fn test_solve_unsolvable_skips_search() {
        let start = Board::from_grid([[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 15, 14, 0]])
            .unwrap();
        let outcome = solve(&start);
        assert_eq!(outcome, SearchOutcome::Unsolvable);
        assert_eq!(outcome.expansions(), 0);
    }

    #[test]
    fn test_solve_demo_board() {
        let start = demo_board();
        let outcome = solve(&start);
        let path = outcome.path().unwrap();
        assert_eq!(path.start(), Some(&start));
        assert_eq!(path.goal(), Some(&Board::goal()));
        // The blank starts and ends in the corner, so the move count is even.
        assert_eq!(path.moves() % 2, 0);
        assert!(path.moves() as u32 >= heuristic(&start));
        assert_valid_path(path.states());
    }

    #[test]
    fn test_solve_is_deterministic() {
        let start = Board::scrambled(42, 20);
        let first = solve(&start);
        let second = solve(&start);
        assert_eq!(first.path(), second.path());
        assert_eq!(first.expansions(), second.expansions());
    }

    #[test]
    fn test_solve_respects_expansion_budget() {
        // The demo board needs at least eight moves, so three expansions cannot reach the goal.
        let puzzle = SlidingPuzzle::new().with_config(SearchConfig::with_max_expansions(3));
        assert_eq!(puzzle.heuristic_kind(), TileHeuristic::Manhattan);
        let outcome = puzzle.solve(&demo_board());
        assert!(matches!(
            outcome,
            SearchOutcome::Exhausted { expansions: 3, .. }
        ));
    }

    #[test]
    fn test_scrambled_is_deterministic_and_solvable() {
        assert_eq!(Board::scrambled(9, 25), Board::scrambled(9, 25));
        assert_eq!(Board::scrambled(9, 0), Board::goal());
        for seed in 0..20 {
            assert!(Board::scrambled(seed, 50).is_solvable());
        }
    }

    #[test]
    fn test_display_board_formatting() {
        let text = Board::goal().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "-------------");
        assert_eq!(lines[1], "|  1  2  3  4 |");
        assert_eq!(lines[4], "| 13 14 15    |");
        assert_eq!(lines[5], "-------------");
    }

    #[test]
    fn test_standard_goal_positions_match_goal_board() {
        let shared = GoalPositions::standard();
        assert_eq!(shared, &GoalPositions::for_board(&Board::goal()));
        assert!(std::ptr::eq(shared, GoalPositions::standard()));

        let start = demo_board();
        assert_eq!(heuristic(&start), manhattan_distance(&start, shared));
        assert_eq!(heuristic(&start), 8);
    }

    #[test]
    fn test_goal_positions_lookup() {
        let goals = GoalPositions::standard();
        assert_eq!(goals.of(1), Position::new(0, 0));
        assert_eq!(goals.of(12), Position::new(2, 3));
        assert_eq!(goals.of(BLANK), Position::new(3, 3));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_manhattan_is_admissible(seed in any::<u64>(), moves in 0usize..9) {
            let start = Board::scrambled(seed, moves);
            let puzzle = SlidingPuzzle::new();
            let oracle = breadth_first(&puzzle, start, &SearchConfig::default());
            let shortest = oracle.path().unwrap();
            let total = shortest.moves();

            for (i, board) in shortest.iter().enumerate() {
                let remaining = (total - i) as u32;
                prop_assert!(heuristic(board) <= remaining);
                prop_assert!(misplaced_tiles(board, puzzle.goal_positions()) <= remaining);
            }

            let informed = puzzle.solve(&start);
            prop_assert_eq!(informed.path().unwrap().moves(), total);
        }

        #[test]
        fn prop_manhattan_is_consistent(seed in any::<u64>(), moves in 0usize..60) {
            let board = Board::scrambled(seed, moves);
            let h = heuristic(&board);
            for (_, next) in board.successors() {
                let h_next = heuristic(&next);
                prop_assert!(h.abs_diff(h_next) <= 1);
            }
        }
    }
}
