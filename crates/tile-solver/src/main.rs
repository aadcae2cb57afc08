//! CLI entry point for the tile solver.
//!
//! Usage:
//!   tile-solver solve <puzzle.txt> [options]
//!   tile-solver solve --stdin [options]
//!
//! Puzzles are read in the text format (dimension, then rows of tiles) or
//! as JSON (`{"tiles": [[...]]}`) when the input starts with `{`.
//!
//! Options:
//!   --json                  Print the result as JSON
//!   --closed-set            Never re-expand a board already expanded
//!   --timeout <seconds>     Maximum search time (default: unlimited)
//!   --max-expansions <n>    Maximum lockstep iterations (default: unlimited)

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use tile_solver::{Board, BoardError, CycleGuard, Solver, SolverConfig};

#[derive(Parser)]
#[command(name = "tile-solver")]
#[command(about = "A* solver for N-by-N sliding-tile puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a shortest solution, or report that none exists
    Solve {
        /// Path to puzzle file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Track every expanded board instead of only the parent
        #[arg(long)]
        closed_set: bool,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Maximum lockstep iterations
        #[arg(long)]
        max_expansions: Option<usize>,
    },
}

/// Output format for a solve result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solvable: bool,
    moves: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<Vec<Board>>,
    main_expansions: usize,
    twin_expansions: usize,
    time_elapsed_ms: u64,
}

const EXIT_UNSOLVABLE: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            json,
            closed_set,
            timeout,
            max_expansions,
        } => {
            // Read puzzle input
            let content = if stdin {
                let mut buffer = String::new();
                if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                    eprintln!("Error reading from stdin: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
                buffer
            } else if let Some(path) = file {
                match fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        eprintln!("Error reading file {:?}: {}", path, e);
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            } else {
                eprintln!("Error: Must provide either a file path or --stdin");
                return ExitCode::from(EXIT_ERROR);
            };

            let board = match parse_board(&content) {
                Ok(board) => board,
                Err(e) => {
                    eprintln!("Error parsing puzzle: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            };

            let config = SolverConfig {
                cycle_guard: if closed_set {
                    CycleGuard::Closed
                } else {
                    CycleGuard::Parent
                },
                timeout: timeout.map(Duration::from_secs),
                max_expansions,
            };

            let solver = match Solver::with_config(board, &config) {
                Ok(solver) => solver,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            };

            if json {
                let output = format_result(&solver);
                match serde_json::to_string_pretty(&output) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Error encoding result: {}", e);
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            } else {
                print_solution(&solver);
            }

            if solver.is_solvable() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_UNSOLVABLE)
            }
        }
    }
}

fn parse_board(content: &str) -> Result<Board, BoardError> {
    if content.trim_start().starts_with('{') {
        serde_json::from_str(content).map_err(|e| BoardError::Parse(e.to_string()))
    } else {
        content.parse()
    }
}

fn print_solution(solver: &Solver) {
    match solver.solution() {
        Some(path) => {
            println!("Minimum number of moves = {}", solver.moves());
            for board in path {
                println!("{}", board);
            }
        }
        None => println!("No solution possible"),
    }
}

fn format_result(solver: &Solver) -> SolveOutput {
    let stats = solver.stats();
    SolveOutput {
        solvable: solver.is_solvable(),
        moves: solver.moves(),
        solution: solver.solution().map(<[Board]>::to_vec),
        main_expansions: stats.main_expansions,
        twin_expansions: stats.twin_expansions,
        time_elapsed_ms: stats.time_elapsed_ms,
    }
}
