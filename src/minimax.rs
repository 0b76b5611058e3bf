//! 4x4 tic-tac-toe against a depth-limited minimax player with alpha-beta pruning.
//!
//! A line is a full row, a full column, or one of the two diagonals. The human
//! plays `X` and moves first; the computer plays `O`.
use crate::error::{Result, SolverError};
use crate::grid::Position;
use rand::Rng;
use std::fmt;

/// Width and height of the board.
pub const BOARD_SIDE: usize = 4;

/// Plies searched below the candidate move; deeper positions score as a draw.
pub const DEFAULT_MAX_DEPTH: u32 = 4;

const WIN_SCORE: i32 = 10;

const CORNERS: [Position; 4] = [
    Position::new(0, 0),
    Position::new(0, BOARD_SIDE - 1),
    Position::new(BOARD_SIDE - 1, 0),
    Position::new(BOARD_SIDE - 1, BOARD_SIDE - 1),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Mark),
    Draw,
}

const LINE_COUNT: usize = 2 * BOARD_SIDE + 2;

/// Every row, column and diagonal of the board.
const LINES: [[Position; BOARD_SIDE]; LINE_COUNT] = build_lines();

const fn build_lines() -> [[Position; BOARD_SIDE]; LINE_COUNT] {
    let mut lines = [[Position::new(0, 0); BOARD_SIDE]; LINE_COUNT];
    let mut i = 0;
    while i < BOARD_SIDE {
        let mut j = 0;
        while j < BOARD_SIDE {
            lines[2 * i][j] = Position::new(i, j);
            lines[2 * i + 1][j] = Position::new(j, i);
            j += 1;
        }
        lines[2 * BOARD_SIDE][i] = Position::new(i, i);
        lines[2 * BOARD_SIDE + 1][i] = Position::new(i, BOARD_SIDE - 1 - i);
        i += 1;
    }
    lines
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TicTacToe {
    cells: [[Option<Mark>; BOARD_SIDE]; BOARD_SIDE],
}

impl TicTacToe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Position) -> Option<Mark> {
        self.cells[pos.row][pos.col]
    }

    /// Puts `mark` on an empty cell.
    pub fn place(&mut self, pos: Position, mark: Mark) -> Result<()> {
        if pos.row >= BOARD_SIDE || pos.col >= BOARD_SIDE {
            return Err(SolverError::InvalidMove(format!(
                "{} is outside the {}x{} board",
                pos, BOARD_SIDE, BOARD_SIDE
            )));
        }
        if let Some(existing) = self.get(pos) {
            return Err(SolverError::InvalidMove(format!(
                "{} is already taken by {}",
                pos,
                existing.to_char()
            )));
        }
        self.cells[pos.row][pos.col] = Some(mark);
        Ok(())
    }

    fn clear(&mut self, pos: Position) {
        self.cells[pos.row][pos.col] = None;
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Position> {
        let mut empty = Vec::new();
        for r in 0..BOARD_SIDE {
            for c in 0..BOARD_SIDE {
                if self.cells[r][c].is_none() {
                    empty.push(Position::new(r, c));
                }
            }
        }
        empty
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }

    /// The first completed line, if any.
    pub fn winning_line(&self) -> Option<(Mark, [Position; BOARD_SIDE])> {
        LINES.into_iter().find_map(|line| {
            let first = self.get(line[0])?;
            line.iter()
                .all(|&pos| self.get(pos) == Some(first))
                .then_some((first, line))
        })
    }

    pub fn winner(&self) -> Option<Mark> {
        self.winning_line().map(|(mark, _)| mark)
    }

    pub fn status(&self) -> GameStatus {
        match self.winner() {
            Some(mark) => GameStatus::Won(mark),
            None if self.is_full() => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for c in 0..BOARD_SIDE {
            write!(f, " {}  ", c)?;
        }
        for (r, row) in self.cells.iter().enumerate() {
            write!(f, "\n{} ", r)?;
            let cells: Vec<String> = row
                .iter()
                .map(|cell| format!(" {} ", cell.map_or(' ', Mark::to_char)))
                .collect();
            write!(f, "{}", cells.join("|"))?;
            if r < BOARD_SIDE - 1 {
                write!(f, "\n  {}", vec!["---"; BOARD_SIDE].join("+"))?;
            }
        }
        Ok(())
    }
}

/// Computer opponent scoring positions with minimax and alpha-beta pruning.
///
/// A win for the computer scores `10 - depth` and a loss `depth - 10`, so
/// quicker wins and slower losses are preferred. Draws, and positions past
/// `max_depth`, score 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinimaxPlayer {
    mark: Mark,
    max_depth: u32,
}

impl MinimaxPlayer {
    pub fn new(mark: Mark) -> Self {
        MinimaxPlayer {
            mark,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Picks the computer's next cell, or `None` if the game is already over.
    ///
    /// On an empty board a random corner is played without searching. Among
    /// equally scored moves the first in row-major order wins.
    pub fn choose_move(&self, board: &TicTacToe, rng: &mut impl Rng) -> Option<Position> {
        if board.status() != GameStatus::InProgress {
            return None;
        }
        if board.is_empty() {
            return Some(CORNERS[rng.gen_range(0..CORNERS.len())]);
        }

        let mut scratch = board.clone();
        let mut best: Option<(i32, Position)> = None;
        for pos in board.empty_cells() {
            scratch.cells[pos.row][pos.col] = Some(self.mark);
            let score = self.minimax(&mut scratch, 0, false, i32::MIN, i32::MAX);
            scratch.clear(pos);
            tracing::trace!(cell = %pos, score, "scored candidate move");
            if !best.is_some_and(|(best_score, _)| score <= best_score) {
                best = Some((score, pos));
            }
        }
        best.map(|(_, pos)| pos)
    }

    /// Scores `board` from the computer's point of view. `maximizing` is true
    /// when the computer is to move.
    pub fn minimax(
        &self,
        board: &mut TicTacToe,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        match board.winner() {
            Some(mark) if mark == self.mark => return WIN_SCORE - depth as i32,
            Some(_) => return depth as i32 - WIN_SCORE,
            None => {}
        }
        if board.is_full() || depth > self.max_depth {
            return 0;
        }

        let to_move = if maximizing {
            self.mark
        } else {
            self.mark.opponent()
        };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for pos in board.empty_cells() {
            board.cells[pos.row][pos.col] = Some(to_move);
            let score = self.minimax(board, depth + 1, !maximizing, alpha, beta);
            board.clear(pos);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }
        best
    }
}
