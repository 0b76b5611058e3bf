//! Grid coordinates and orthogonal moves shared by the tile and maze domains.

use std::fmt;

/// A `(row, col)` cell coordinate, 0-based from the top-left corner.
///
/// Ordering is row-major, which is also the tie-break order the search
/// frontier uses for maze states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Returns the neighbouring cell in `direction`, or `None` when it falls
    /// outside a `rows` x `cols` grid.
    ///
    /// # Examples
    /// ```
    /// use tile_maze_solver::grid::{Direction, Position};
    /// let corner = Position::new(0, 0);
    /// assert_eq!(corner.step(Direction::Up, 3, 3), None);
    /// assert_eq!(corner.step(Direction::Down, 3, 3), Some(Position::new(1, 0)));
    /// ```
    pub fn step(self, direction: Direction, rows: usize, cols: usize) -> Option<Position> {
        let (dr, dc) = direction.delta();
        let nr = self.row as isize + dr;
        let nc = self.col as isize + dc;
        if nr >= 0 && nr < rows as isize && nc >= 0 && nc < cols as isize {
            Some(Position::new(nr as usize, nc as usize))
        } else {
            None
        }
    }

    /// Manhattan distance `|row - other.row| + |col - other.col|`.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four orthogonal moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Expansion order used by every search in this crate. Changing it changes
    /// which of several equal-cost paths is returned.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row and column delta of a single step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{}", name)
    }
}
