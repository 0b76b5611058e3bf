use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tile_maze_solver::maze::{Algorithm, Maze, DEMO_MAZE};
use tile_maze_solver::search::{SearchConfig, SearchOutcome};
use tile_maze_solver::utils::{init_logging, maze_from_str_array, maze_lines};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Find a path through a grid maze", long_about = None)]
struct Args {
    /// Path to a maze file ('#' wall, ' ' open, 'I' start, 'F' finish).
    /// The built-in 20x20 labyrinth is used when omitted.
    maze_file: Option<PathBuf>,

    /// Run only this algorithm: dfs, bfs or astar. All three run by default.
    #[clap(short, long)]
    algorithm: Option<Algorithm>,

    /// Give up after this many expansions
    #[clap(long)]
    max_expansions: Option<usize>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_maze_file(path: &Path) -> Result<Maze> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read maze file {}", path.display()))?;
    let lines = maze_lines(&content);
    maze_from_str_array(&lines).with_context(|| format!("Invalid maze in {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let maze = match &args.maze_file {
        Some(path) => read_maze_file(path)?,
        None => maze_from_str_array(DEMO_MAZE).context("Built-in maze is invalid")?,
    };
    let config = SearchConfig {
        max_expansions: args.max_expansions,
    };
    let algorithms = match args.algorithm {
        Some(algorithm) => vec![algorithm],
        None => Algorithm::ALL.to_vec(),
    };

    println!("--- Initial maze ---\n");
    println!("{}\n", maze);

    for (i, algorithm) in algorithms.iter().enumerate() {
        println!("{}. Solution with {}:", i + 1, algorithm.description());
        match maze.solve_with_config(*algorithm, &config) {
            SearchOutcome::Solved {
                path,
                elapsed,
                expansions,
            } => {
                println!("{}", maze.render_path(path.states()));
                println!(
                    "Moves: {}, cells expanded: {}, time: {:.5} seconds.\n",
                    path.moves(),
                    expansions,
                    elapsed.as_secs_f64()
                );
            }
            SearchOutcome::Exhausted { expansions, .. } => {
                println!(
                    "No solution found with {} ({} cells expanded).\n",
                    algorithm, expansions
                );
            }
            SearchOutcome::Unsolvable => {
                println!("No solution found with {}.\n", algorithm);
            }
        }
    }
    Ok(())
}
