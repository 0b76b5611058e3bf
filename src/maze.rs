//! Grid mazes: walls, open cells, one start (`I`) and one finish (`F`).
//!
//! A [`Maze`] is immutable once parsed. Searching never marks the grid; the
//! solution path is drawn afterwards by [`Maze::render_path`].
use crate::error::{Result, SolverError};
use crate::grid::{Direction, Position};
use crate::search::{
    astar, breadth_first, depth_first, SearchConfig, SearchOutcome, SearchProblem,
};
use std::fmt;
use std::str::FromStr;

/// Character drawn on cells of a solution path.
pub const PATH_MARK: char = '*';

/// The 20x20 labyrinth used by the `maze_solver` binary when no file is given.
pub const DEMO_MAZE: &[&str] = &[
    "I ##################",
    "# #         #      #",
    "# # ####### # #### #",
    "#   #     # # #    #",
    "### # ### # # # ####",
    "#     #   #        #",
    "# ##### ######### ##",
    "#     # #          #",
    "# ### # # ######## #",
    "#   #           #  #",
    "# # ########### # ##",
    "# #     #     # #  #",
    "# ##### # ### # ## #",
    "#     #     #   #  #",
    "##### ##### ##### ##",
    "#         #     #  #",
    "# ####### # ### # ##",
    "# #       #        #",
    "# # ####### # #### F",
    "####################",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Open,
    Wall,
    Start,
    Finish,
}

impl Cell {
    pub fn from_char(ch: char) -> Option<Cell> {
        match ch {
            ' ' => Some(Cell::Open),
            '#' => Some(Cell::Wall),
            'I' => Some(Cell::Start),
            'F' => Some(Cell::Finish),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Open => ' ',
            Cell::Wall => '#',
            Cell::Start => 'I',
            Cell::Finish => 'F',
        }
    }

    pub fn is_passable(self) -> bool {
        self != Cell::Wall
    }
}

/// A rectangular maze with exactly one start and one finish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    cells: Vec<Vec<Cell>>,
    rows: usize,
    cols: usize,
    start: Position,
    finish: Position,
}

impl Maze {
    /// Parses a grid of marker characters.
    ///
    /// # Errors
    /// * `InvalidMaze` for an empty grid, rows of different lengths, unknown
    ///   characters, or more than one `I` or `F`.
    /// * `InvalidStart` if there is no `I`.
    /// * `InvalidGoal` if there is no `F`.
    pub fn from_chars(grid: &[Vec<char>]) -> Result<Maze> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(SolverError::InvalidMaze("maze has no cells".to_string()));
        }

        let mut cells = Vec::with_capacity(rows);
        let mut start = None;
        let mut finish = None;

        for (r, row) in grid.iter().enumerate() {
            if row.len() != cols {
                return Err(SolverError::InvalidMaze(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    cols
                )));
            }
            let mut parsed = Vec::with_capacity(cols);
            for (c, &ch) in row.iter().enumerate() {
                let cell = Cell::from_char(ch).ok_or_else(|| {
                    SolverError::InvalidMaze(format!(
                        "unrecognized character '{}' at ({}, {})",
                        ch, r, c
                    ))
                })?;
                let marker = match cell {
                    Cell::Start => Some(&mut start),
                    Cell::Finish => Some(&mut finish),
                    _ => None,
                };
                if let Some(slot) = marker {
                    if slot.is_some() {
                        return Err(SolverError::InvalidMaze(format!(
                            "more than one '{}' marker",
                            ch
                        )));
                    }
                    *slot = Some(Position::new(r, c));
                }
                parsed.push(cell);
            }
            cells.push(parsed);
        }

        Ok(Maze {
            cells,
            rows,
            cols,
            start: start.ok_or(SolverError::InvalidStart)?,
            finish: finish.ok_or(SolverError::InvalidGoal)?,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn finish(&self) -> Position {
        self.finish
    }

    /// # Panics
    /// Panics if `pos` lies outside the maze.
    pub fn get_cell(&self, pos: Position) -> Cell {
        self.cells[pos.row][pos.col]
    }

    /// Open neighbours of `pos` in up, down, left, right order.
    pub fn neighbours(&self, pos: Position) -> Vec<Position> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| pos.step(direction, self.rows, self.cols))
            .filter(|&next| self.get_cell(next).is_passable())
            .collect()
    }

    /// Searches from the start marker to the finish marker.
    pub fn solve(&self, algorithm: Algorithm) -> SearchOutcome<Position> {
        self.solve_with_config(algorithm, &SearchConfig::default())
    }

    pub fn solve_with_config(
        &self,
        algorithm: Algorithm,
        config: &SearchConfig,
    ) -> SearchOutcome<Position> {
        match algorithm {
            Algorithm::DepthFirst => depth_first(self, self.start, config),
            Algorithm::BreadthFirst => breadth_first(self, self.start, config),
            Algorithm::AStar => astar(self, self.start, config),
        }
    }

    /// Draws the maze with `path` marked by [`PATH_MARK`]. The start and
    /// finish keep their own markers. Cells are separated by single spaces.
    pub fn render_path(&self, path: &[Position]) -> String {
        let mut canvas: Vec<Vec<char>> = self
            .cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_char()).collect())
            .collect();
        for pos in path {
            if self.get_cell(*pos) == Cell::Open {
                canvas[pos.row][pos.col] = PATH_MARK;
            }
        }
        canvas
            .iter()
            .map(|row| {
                row.iter()
                    .map(char::to_string)
                    .collect::<Vec<String>>()
                    .join(" ")
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_path(&[]))
    }
}

impl SearchProblem for Maze {
    type State = Position;

    fn is_goal(&self, state: &Position) -> bool {
        *state == self.finish
    }

    fn successors(&self, state: &Position) -> Vec<(Position, u32)> {
        self.neighbours(*state).into_iter().map(|pos| (pos, 1)).collect()
    }

    fn heuristic(&self, state: &Position) -> u32 {
        state.manhattan_distance(self.finish)
    }
}

/// Solves `maze` with A*.
pub fn solve(maze: &Maze) -> SearchOutcome<Position> {
    maze.solve(Algorithm::AStar)
}

/// Search strategy for [`Maze::solve`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    DepthFirst,
    BreadthFirst,
    #[default]
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::DepthFirst,
        Algorithm::BreadthFirst,
        Algorithm::AStar,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Algorithm::DepthFirst => "Depth-first search (DFS)",
            Algorithm::BreadthFirst => "Breadth-first search (BFS)",
            Algorithm::AStar => "Informed search (A*)",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::DepthFirst => "dfs",
            Algorithm::BreadthFirst => "bfs",
            Algorithm::AStar => "astar",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dfs" | "depth-first" => Ok(Algorithm::DepthFirst),
            "bfs" | "breadth-first" => Ok(Algorithm::BreadthFirst),
            "astar" | "a*" => Ok(Algorithm::AStar),
            other => Err(format!(
                "unknown algorithm '{}' (expected dfs, bfs or astar)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::maze_from_str_array;

    fn small_maze() -> Maze {
        Maze::from_chars(&[
            vec!['I', '#', ' '],
            vec![' ', '#', ' '],
            vec![' ', ' ', 'F'],
        ])
        .unwrap()
    }

    fn demo_maze() -> Maze {
        maze_from_str_array(DEMO_MAZE).unwrap()
    }

    fn assert_walkable(maze: &Maze, path: &[Position]) {
        assert_eq!(path.first(), Some(&maze.start()));
        assert_eq!(path.last(), Some(&maze.finish()));
        for pos in path {
            assert!(maze.get_cell(*pos).is_passable(), "path crosses a wall at {}", pos);
        }
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
    }

    #[test]
    fn test_small_maze_astar_path() {
        let maze = small_maze();
        assert_eq!(maze.start(), Position::new(0, 0));
        assert_eq!(maze.finish(), Position::new(2, 2));

        let outcome = solve(&maze);
        let path = outcome.path().unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(
            path.states(),
            &[
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_small_maze_all_algorithms_agree() {
        let maze = small_maze();
        for algorithm in Algorithm::ALL {
            let outcome = maze.solve(algorithm);
            let path = outcome.path().unwrap();
            assert_eq!(path.moves(), 4, "{} found a different path", algorithm);
            assert_walkable(&maze, path.states());
        }
    }

    #[test]
    fn test_render_path_marks_open_cells() {
        let maze = small_maze();
        let outcome = solve(&maze);
        let rendered = maze.render_path(outcome.path().unwrap().states());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["I #  ", "* #  ", "* * F"]);
        assert_eq!(maze.to_string().lines().last(), Some("    F"));
    }

    #[test]
    fn test_blocked_maze_is_exhausted() {
        let maze = maze_from_str_array(&["I#F", " # "]).unwrap();
        for algorithm in Algorithm::ALL {
            let outcome = maze.solve(algorithm);
            assert!(matches!(outcome, SearchOutcome::Exhausted { expansions: 2, .. }));
        }
    }

    #[test]
    fn test_zero_budget_is_exhausted_before_expanding() {
        let maze = maze_from_str_array(&["I  F"]).unwrap();
        let config = SearchConfig::with_max_expansions(0);
        for algorithm in Algorithm::ALL {
            let outcome = maze.solve_with_config(algorithm, &config);
            assert!(
                matches!(outcome, SearchOutcome::Exhausted { expansions: 0, .. }),
                "{} expanded past a zero budget",
                algorithm
            );
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(maze_from_str_array(&["  F"]), Err(SolverError::InvalidStart));
        assert_eq!(maze_from_str_array(&["I  "]), Err(SolverError::InvalidGoal));
        assert!(matches!(
            maze_from_str_array(&["I F", "  "]),
            Err(SolverError::InvalidMaze(_))
        ));
        assert!(matches!(
            maze_from_str_array(&["I?F"]),
            Err(SolverError::InvalidMaze(_))
        ));
        assert!(matches!(
            maze_from_str_array(&["I F", "I  "]),
            Err(SolverError::InvalidMaze(_))
        ));
        assert!(matches!(
            maze_from_str_array(&[]),
            Err(SolverError::InvalidMaze(_))
        ));
    }

    #[test]
    fn test_neighbours_skip_walls_and_edges() {
        let maze = small_maze();
        assert_eq!(maze.neighbours(Position::new(0, 0)), vec![Position::new(1, 0)]);
        assert_eq!(
            maze.neighbours(Position::new(2, 1)),
            vec![Position::new(2, 0), Position::new(2, 2)]
        );
    }

    #[test]
    fn test_demo_maze_shortest_paths() {
        let maze = demo_maze();
        assert_eq!((maze.rows(), maze.cols()), (20, 20));

        let informed = maze.solve(Algorithm::AStar);
        let uninformed = maze.solve(Algorithm::BreadthFirst);
        assert_eq!(informed.path().unwrap().moves(), 41);
        assert_eq!(uninformed.path().unwrap().moves(), 41);
        assert_walkable(&maze, informed.path().unwrap().states());
        assert_walkable(&maze, uninformed.path().unwrap().states());

        let depth = maze.solve(Algorithm::DepthFirst);
        let path = depth.path().unwrap();
        assert!(path.moves() >= 41);
        assert_walkable(&maze, path.states());
    }

    #[test]
    fn test_demo_maze_heuristic_admissible_and_consistent() {
        let maze = demo_maze();
        for r in 0..maze.rows() {
            for c in 0..maze.cols() {
                let pos = Position::new(r, c);
                if !maze.get_cell(pos).is_passable() {
                    continue;
                }
                let h = maze.heuristic(&pos);
                let exact = breadth_first(&maze, pos, &SearchConfig::default());
                assert!(h as usize <= exact.path().unwrap().moves());
                for next in maze.neighbours(pos) {
                    assert!(h.abs_diff(maze.heuristic(&next)) <= 1);
                }
            }
        }
    }

    #[test]
    fn test_algorithm_parse_and_display() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>(), Ok(algorithm));
        }
        assert_eq!("A*".parse::<Algorithm>(), Ok(Algorithm::AStar));
        assert!("greedy".parse::<Algorithm>().is_err());
    }
}
