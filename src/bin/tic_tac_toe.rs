use anyhow::Result;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io::{self, Write};
use tile_maze_solver::grid::Position;
use tile_maze_solver::minimax::{
    GameStatus, Mark, MinimaxPlayer, TicTacToe, BOARD_SIDE, DEFAULT_MAX_DEPTH,
};
use tile_maze_solver::utils::init_logging;

const HUMAN: Mark = Mark::X;
const COMPUTER: Mark = Mark::O;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play 4x4 tic-tac-toe against a minimax opponent", long_about = None)]
struct Args {
    /// Plies the computer searches beyond its candidate move
    #[clap(short, long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: u32,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn report_end(status: GameStatus) -> bool {
    match status {
        GameStatus::Won(mark) if mark == HUMAN => println!("You win!"),
        GameStatus::Won(_) => println!("The computer wins!"),
        GameStatus::Draw => println!("It's a draw!"),
        GameStatus::InProgress => return false,
    }
    println!("Enter 'r' to play again or 'q' to quit.");
    true
}

fn parse_cell(input: &str) -> Option<Position> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.len() != 2 {
        return None;
    }
    match (parts[0].parse::<usize>(), parts[1].parse::<usize>()) {
        (Ok(r), Ok(c)) if r < BOARD_SIDE && c < BOARD_SIDE => Some(Position::new(r, c)),
        _ => None,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let player = MinimaxPlayer::new(COMPUTER).with_max_depth(args.depth);
    let mut rng = SmallRng::from_entropy();
    let mut game = TicTacToe::new();
    println!("Welcome to 4x4 tic-tac-toe! You play {}.", HUMAN.to_char());

    loop {
        println!("\n{}", game);
        print!("Enter your move (row col), or 'r' to restart, 'q' to quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let trimmed_input = input.trim();

        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }
        if trimmed_input == "r" {
            game = TicTacToe::new();
            println!("New game started.");
            continue;
        }
        if game.status() != GameStatus::InProgress {
            println!("The game is over. Enter 'r' to play again or 'q' to quit.");
            continue;
        }

        let Some(cell) = parse_cell(trimmed_input) else {
            println!(
                "Invalid input: enter row and column between 0 and {} (e.g. '1 2'), 'r', or 'q'.",
                BOARD_SIDE - 1
            );
            continue;
        };
        if let Err(err) = game.place(cell, HUMAN) {
            println!("{}", err);
            continue;
        }
        if report_end(game.status()) {
            println!("\n{}", game);
            continue;
        }

        println!("The computer is thinking...");
        if let Some(reply) = player.choose_move(&game, &mut rng) {
            game.place(reply, COMPUTER)?;
            println!("The computer plays {} {}.", reply.row, reply.col);
        }
        if report_end(game.status()) {
            println!("\n{}", game);
        }
    }
    Ok(())
}
