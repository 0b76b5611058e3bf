use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tile_maze_solver::heuristics::TileHeuristic;
use tile_maze_solver::puzzle::{Board, SlidingPuzzle};
use tile_maze_solver::search::{SearchConfig, SearchOutcome, SolutionPath};
use tile_maze_solver::utils::{board_from_str_array, init_logging, non_empty_lines};

const DEFAULT_START: [[u8; 4]; 4] = [[1, 2, 3, 4], [5, 6, 7, 8], [9, 15, 14, 12], [13, 11, 10, 0]];

#[derive(Parser, Debug)]
#[clap(author, version, about = "Solve the 15-puzzle with A*", long_about = None)]
struct Args {
    /// Path to a board file: four rows of four tiles, 0 or '.' for the blank
    #[clap(short, long, conflicts_with = "scramble")]
    board_file: Option<PathBuf>,

    /// Start from the goal scrambled by this many random moves
    #[clap(short, long)]
    scramble: Option<usize>,

    /// Seed for --scramble
    #[clap(long, default_value_t = 514514)]
    seed: u64,

    /// Heuristic guiding A*: manhattan, misplaced or zero
    #[clap(long, default_value_t = TileHeuristic::Manhattan)]
    heuristic: TileHeuristic,

    /// Give up after this many expansions
    #[clap(long)]
    max_expansions: Option<usize>,

    /// Pause between animation frames, in milliseconds
    #[clap(long, default_value_t = 800)]
    delay_ms: u64,

    /// Print the solution as a list of moves instead of animating it
    #[clap(long)]
    no_animate: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_board_file(path: &Path) -> Result<Board> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file {}", path.display()))?;
    let lines = non_empty_lines(&content);
    board_from_str_array(&lines)
        .with_context(|| format!("Invalid board format in {}", path.display()))
}

fn clear_screen() {
    print!("\x1b[2J\x1b[H");
}

fn animate_solution(path: &SolutionPath<Board>, delay: Duration) {
    println!("\nStarting animation in 3 seconds...");
    thread::sleep(Duration::from_secs(3));

    let total = path.moves();
    for (i, board) in path.iter().enumerate() {
        clear_screen();
        println!("Solving the 15-puzzle...");
        println!("\nStep {} / {}", i, total);
        println!("{}", board);
        thread::sleep(delay);
    }
    println!("\nPuzzle solved!");
}

fn print_moves(path: &SolutionPath<Board>) {
    let moves: Vec<String> = path
        .states()
        .windows(2)
        .filter_map(|pair| pair[0].move_between(&pair[1]))
        .map(|direction| direction.to_string())
        .collect();
    if moves.is_empty() {
        println!("Blank moves: none, the board is already solved.");
    } else {
        println!("Blank moves: {}", moves.join(" "));
    }
    if let Some(goal) = path.goal() {
        println!("Final board:\n{}", goal);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let start = match (&args.board_file, args.scramble) {
        (Some(path), _) => read_board_file(path)?,
        (None, Some(moves)) => Board::scrambled(args.seed, moves),
        (None, None) => Board::from_grid(DEFAULT_START)?,
    };

    clear_screen();
    println!("Initial puzzle state:");
    println!("{}", start);

    if !start.is_solvable() {
        println!("\nThis puzzle has no solution.");
        return Ok(());
    }

    println!(
        "\nComputing the optimal solution with A* ({} heuristic)...",
        args.heuristic
    );
    let config = SearchConfig {
        max_expansions: args.max_expansions,
    };
    let puzzle = SlidingPuzzle::with_heuristic(args.heuristic).with_config(config);

    match puzzle.solve(&start) {
        SearchOutcome::Solved {
            path,
            elapsed,
            expansions,
        } => {
            println!("Solution found");
            println!("Total moves: {}", path.moves());
            println!("States expanded by A*: {}", expansions);
            println!("Computation time: {:.5} seconds.", elapsed.as_secs_f64());
            if args.no_animate {
                print_moves(&path);
            } else {
                animate_solution(&path, Duration::from_millis(args.delay_ms));
            }
        }
        SearchOutcome::Exhausted {
            elapsed,
            expansions,
        } => {
            println!(
                "No solution found after {} expansions ({:.5} seconds).",
                expansions,
                elapsed.as_secs_f64()
            );
        }
        SearchOutcome::Unsolvable => {
            println!("\nThis puzzle has no solution.");
        }
    }
    Ok(())
}
