use crate::error::{Result, SolverError};
use crate::maze::Maze;
use crate::puzzle::{Board, BLANK, PUZZLE_SIZE};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

/// Parses an array of string slices into a 15-puzzle `Board`.
///
/// Each string slice is one row, top row first, holding exactly `PUZZLE_SIZE`
/// whitespace-separated tiles. A tile is a number in `1..=15`; the blank is
/// written as `0` or `.`.
///
/// # Arguments
/// * `s`: The rows of the board.
///
/// # Returns
/// * `Ok(Board)` if every row parses and the tiles form a permutation of `0..16`.
/// * `Err(SolverError::InvalidBoard)` if:
///     - The number of rows is not `PUZZLE_SIZE`.
///     - A row does not have `PUZZLE_SIZE` tiles.
///     - A tile is not a number, or a value is missing or repeated.
///
/// # Examples
/// ```
/// use tile_maze_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&[
///     "1 2 3 4",
///     "5 6 7 8",
///     "9 10 11 12",
///     "13 14 15 .",
/// ])
/// .unwrap();
/// assert!(board.is_goal());
///
/// assert!(board_from_str_array(&["1 2 3 4"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board> {
    if s.len() != PUZZLE_SIZE {
        return Err(SolverError::InvalidBoard(format!(
            "expected {} rows, found {}",
            PUZZLE_SIZE,
            s.len()
        )));
    }

    let mut grid = [[BLANK; PUZZLE_SIZE]; PUZZLE_SIZE];
    for (r, row_str) in s.iter().enumerate() {
        let tokens: Vec<&str> = row_str.split_whitespace().collect();
        if tokens.len() != PUZZLE_SIZE {
            return Err(SolverError::InvalidBoard(format!(
                "row {} has {} tiles, expected {}",
                r,
                tokens.len(),
                PUZZLE_SIZE
            )));
        }
        for (c, token) in tokens.iter().enumerate() {
            grid[r][c] = match *token {
                "." => BLANK,
                number => number.parse::<u8>().map_err(|_| {
                    SolverError::InvalidBoard(format!(
                        "unrecognized tile '{}' in row {} col {}",
                        number, r, c
                    ))
                })?,
            };
        }
    }
    Board::from_grid(grid)
}

/// Parses an array of string slices into a `Maze`, one character per cell.
///
/// Recognized cells are `#` (wall), ` ` (open), `I` (start) and `F` (finish).
/// See [`Maze::from_chars`] for the errors reported.
pub fn maze_from_str_array(s: &[&str]) -> Result<Maze> {
    let grid: Vec<Vec<char>> = s.iter().map(|row| row.chars().collect()).collect();
    Maze::from_chars(&grid)
}

/// Splits board file contents into rows, dropping lines that hold only
/// whitespace and trailing `\r`.
pub fn non_empty_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Splits maze file contents into rows.
///
/// A row of spaces is a row of open cells and is kept. Only lines that are
/// empty once the trailing `\r` is removed are dropped.
pub fn maze_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Installs the global `tracing` subscriber for a binary, writing to stderr.
///
/// `verbosity` counts `-v` flags: 0 shows warnings, 1 info, 2 debug, 3+ trace.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;

    #[test]
    fn test_board_from_str_array_valid() {
        let board = board_from_str_array(&[
            "1 2 3 4",
            "5 6 7 8",
            "9 15 14 12",
            "13 11 10 0",
        ])
        .unwrap();
        assert_eq!(board.get_tile(2, 1), 15);
        assert_eq!(board.get_tile(3, 3), BLANK);
        assert_eq!(board.blank_position(), Position::new(3, 3));
    }

    #[test]
    fn test_board_from_str_array_extra_whitespace() {
        let board = board_from_str_array(&[
            "  1  2  3  4",
            "5\t6 7 8 ",
            "9 10 11 12",
            "13 14  . 15",
        ])
        .unwrap();
        assert_eq!(board.get_tile(3, 2), BLANK);
        assert_eq!(board.get_tile(3, 3), 15);
    }

    #[test]
    fn test_board_from_str_array_invalid_token() {
        let result = board_from_str_array(&["1 2 3 4", "5 6 7 8", "9 10 11 12", "13 14 x 0"]);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unrecognized tile 'x'"));
    }

    #[test]
    fn test_board_from_str_array_wrong_shape() {
        let too_few_rows = board_from_str_array(&["1 2 3 4", "5 6 7 8", "9 10 11 12"]);
        assert!(too_few_rows.unwrap_err().to_string().contains("expected 4 rows"));

        let short_row = board_from_str_array(&["1 2 3 4", "5 6 7", "8 9 10 11 12", "13 14 15 0"]);
        assert!(short_row.unwrap_err().to_string().contains("row 1 has 3 tiles"));
    }

    #[test]
    fn test_board_from_str_array_duplicate_tile() {
        let result = board_from_str_array(&["1 2 3 4", "5 6 7 8", "9 10 11 12", "13 14 14 0"]);
        assert!(matches!(result, Err(SolverError::InvalidBoard(_))));
    }

    #[test]
    fn test_maze_from_str_array_keeps_edge_spaces() {
        let maze = maze_from_str_array(&[" I ", "F  "]).unwrap();
        assert_eq!(maze.cols(), 3);
        assert_eq!(maze.start(), Position::new(0, 1));
        assert_eq!(maze.finish(), Position::new(1, 0));
    }

    #[test]
    fn test_non_empty_lines() {
        let content = "I  #\r\n\n  F \r\n   \n";
        assert_eq!(non_empty_lines(content), vec!["I  #", "  F "]);
    }

    #[test]
    fn test_maze_lines_keeps_open_rows() {
        let content = "I#\r\n  \n\nF#\n";
        let lines = maze_lines(content);
        assert_eq!(lines, vec!["I#", "  ", "F#"]);

        let maze = maze_from_str_array(&lines).unwrap();
        assert_eq!(maze.rows(), 3);
        assert_eq!(maze.finish(), Position::new(2, 0));
        let outcome = crate::maze::solve(&maze);
        assert_eq!(outcome.path().unwrap().moves(), 2);
    }
}
