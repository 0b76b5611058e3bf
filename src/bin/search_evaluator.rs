use anyhow::Result;
use clap::Parser;
use std::collections::HashMap;
use tile_maze_solver::heuristics::TileHeuristic;
use tile_maze_solver::puzzle::{Board, SlidingPuzzle};
use tile_maze_solver::search::{SearchConfig, SearchOutcome};
use tile_maze_solver::utils::init_logging;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare tile heuristics on seeded 15-puzzle scrambles", long_about = None)]
struct Args {
    /// Number of boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first board; board i uses start_seed + i
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Random moves applied to the goal to build each board
    #[clap(short, long, default_value_t = 24)]
    depth: usize,

    /// Expansion budget per search
    #[clap(long, default_value_t = 200_000)]
    max_expansions: usize,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Default)]
struct Tally {
    expansions: Vec<usize>,
    solved: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = SearchConfig::with_max_expansions(args.max_expansions);
    let mut tallies: HashMap<TileHeuristic, Tally> = HashMap::new();

    println!(
        "Starting heuristic evaluation for {} boards ({} scramble moves)...",
        args.boards, args.depth
    );

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx as u64;
        let start = Board::scrambled(seed, args.depth);
        println!("\nEvaluating Board {} (Seed: {})", board_idx, seed);

        for heuristic in TileHeuristic::ALL {
            let puzzle = SlidingPuzzle::with_heuristic(heuristic).with_config(config);
            let outcome = puzzle.solve(&start);
            let tally = tallies.entry(heuristic).or_default();
            tally.expansions.push(outcome.expansions());

            match &outcome {
                SearchOutcome::Solved { path, elapsed, .. } => {
                    tally.solved += 1;
                    println!(
                        "  Heuristic: {:<10} Moves: {:<4} Expanded: {:<8} Time: {:.5} s",
                        heuristic.to_string(),
                        path.moves(),
                        outcome.expansions(),
                        elapsed.as_secs_f64()
                    );
                }
                SearchOutcome::Exhausted { elapsed, .. } => {
                    println!(
                        "  Heuristic: {:<10} gave up    Expanded: {:<8} Time: {:.5} s",
                        heuristic.to_string(),
                        outcome.expansions(),
                        elapsed.as_secs_f64()
                    );
                }
                SearchOutcome::Unsolvable => {
                    println!("  Heuristic: {:<10} unsolvable board", heuristic.to_string());
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", args.boards);
    println!("\n--- Average Expansions ---");

    let mut averages: Vec<(TileHeuristic, f64, usize)> = tallies
        .iter()
        .filter(|(_, tally)| !tally.expansions.is_empty())
        .map(|(heuristic, tally)| {
            let total: usize = tally.expansions.iter().sum();
            let avg = total as f64 / tally.expansions.len() as f64;
            (*heuristic, avg, tally.solved)
        })
        .collect();

    // Fewest expansions first
    averages.sort_by(|a, b| a.1.total_cmp(&b.1));

    for (heuristic, avg, solved) in averages {
        println!(
            "Heuristic {:<10}: Average Expanded = {:.1}, Solved = {}/{}",
            heuristic.to_string(),
            avg,
            solved,
            args.boards
        );
    }
    Ok(())
}
