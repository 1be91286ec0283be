//! CLI entry point for the water sort solver.
//!
//! Usage:
//!   water-sort-solver solve --tubes "ABBA,AB,BA," --method bfs
//!   water-sort-solver solve --colors 5 --empty-tubes 2 --seed 42 --json
//!   water-sort-solver generate --colors 6 --seed 7
//!
//! Layouts list tubes bottom to top, comma separated, one letter per token.
//! Exit codes: 0 = solved, 1 = no solution exists, 2 = error (bad input or
//! internal failure).

use std::fmt;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use water_sort_solver::{
    backtrack, breadth_first_with_stats, depth_first_with_stats, Pour, PuzzleParams, PuzzleState,
    SearchOutcome,
};

#[derive(Parser)]
#[command(name = "water-sort-solver")]
#[command(about = "Solve water sort puzzles by uninformed graph search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle and print the pour sequence
    Solve {
        /// Tube layout such as "ABBA,AB,BA," (random deal when omitted)
        #[arg(long, value_name = "LAYOUT")]
        tubes: Option<String>,

        /// Tube capacity; for --tubes the fullest tube sets it when omitted
        #[arg(long)]
        tube_size: Option<usize>,

        /// Spare tubes mixed into a random deal
        #[arg(long, default_value = "2")]
        empty_tubes: usize,

        /// Distinct colors in a random deal
        #[arg(long, default_value = "5")]
        colors: usize,

        /// Seed for a reproducible random deal
        #[arg(short, long)]
        seed: Option<u64>,

        /// Search strategy
        #[arg(short, long, value_enum, default_value = "bfs")]
        method: Method,

        /// Emit a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Deal a random puzzle and print its layout
    Generate {
        /// Tube capacity
        #[arg(long, default_value = "4")]
        tube_size: usize,

        /// Spare tubes mixed into the deal
        #[arg(long, default_value = "2")]
        empty_tubes: usize,

        /// Distinct colors in the deal (at most 26 for a printable layout)
        #[arg(long, default_value = "5")]
        colors: usize,

        /// Seed for a reproducible deal
        #[arg(short, long)]
        seed: Option<u64>,

        /// Emit the deal as JSON instead of a layout string
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum Method {
    /// Breadth-first: shortest pour sequence
    Bfs,
    /// Depth-first: any pour sequence
    Dfs,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Bfs => write!(f, "bfs"),
            Method::Dfs => write!(f, "dfs"),
        }
    }
}

/// Output format for solve results
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveReport {
    solved: bool,
    method: Method,
    tube_size: usize,
    start: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<Pour>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution_depth: Option<usize>,
    expanded: usize,
    generated: usize,
    duplicates: usize,
    visited: usize,
    peak_frontier: usize,
    time_elapsed_ms: u64,
}

/// Output format for generated deals
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateReport {
    layout: String,
    tubes: Vec<String>,
    tube_size: usize,
    colors: usize,
    empty_tubes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            tubes,
            tube_size,
            empty_tubes,
            colors,
            seed,
            method,
            json,
        } => {
            let start = match tubes {
                Some(layout) => match PuzzleState::parse_layout(&layout, tube_size) {
                    Ok(state) => state,
                    Err(e) => {
                        eprintln!("Error parsing tube layout: {}", e);
                        process::exit(2);
                    }
                },
                None => {
                    let params = PuzzleParams {
                        tube_size: tube_size.unwrap_or(4),
                        empty_tubes,
                        color_count: colors,
                    };
                    match PuzzleState::random(params, &mut seeded_rng(seed)) {
                        Ok(state) => state,
                        Err(e) => {
                            eprintln!("Error dealing a random puzzle: {}", e);
                            process::exit(2);
                        }
                    }
                }
            };

            let outcome = match method {
                Method::Bfs => breadth_first_with_stats(start.clone()),
                Method::Dfs => depth_first_with_stats(start.clone()),
            };
            let mut path = backtrack(outcome.goal.clone());
            path.reverse();

            if json {
                print_json(&build_solve_report(&start, method, &outcome, &path));
            } else {
                print_solution(&start, method, &outcome, &path);
            }
            process::exit(if outcome.goal.is_some() { 0 } else { 1 });
        }

        Commands::Generate {
            tube_size,
            empty_tubes,
            colors,
            seed,
            json,
        } => {
            // Layout strings spell one letter per token.
            if colors > 26 {
                eprintln!("Error: a layout renders colors as single letters; use at most 26");
                process::exit(2);
            }
            let params = PuzzleParams {
                tube_size,
                empty_tubes,
                color_count: colors,
            };
            let state = match PuzzleState::random(params, &mut seeded_rng(seed)) {
                Ok(state) => state,
                Err(e) => {
                    eprintln!("Error dealing a random puzzle: {}", e);
                    process::exit(2);
                }
            };
            let tubes = tube_strings(&state);
            let layout = tubes.join(",");
            if json {
                print_json(&GenerateReport {
                    layout,
                    tubes,
                    tube_size,
                    colors,
                    empty_tubes,
                    seed,
                });
            } else {
                println!("{}", layout);
            }
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn tube_strings(state: &PuzzleState) -> Vec<String> {
    state.tubes().iter().map(|tube| tube.to_string()).collect()
}

/// `path` is the solution root first, empty when there is none.
fn build_solve_report(
    start: &PuzzleState,
    method: Method,
    outcome: &SearchOutcome<PuzzleState>,
    path: &[PuzzleState],
) -> SolveReport {
    let moves = outcome
        .goal
        .as_ref()
        .map(|_| path.iter().filter_map(|state| state.last_pour()).collect());
    SolveReport {
        solved: outcome.goal.is_some(),
        method,
        tube_size: start.tube_size(),
        start: tube_strings(start),
        moves,
        solution_depth: outcome.goal.as_ref().map(|goal| goal.depth()),
        expanded: outcome.stats.expanded,
        generated: outcome.stats.generated,
        duplicates: outcome.stats.duplicates,
        visited: outcome.stats.visited,
        peak_frontier: outcome.stats.peak_frontier,
        time_elapsed_ms: outcome.stats.elapsed.as_millis() as u64,
    }
}

fn print_solution(
    start: &PuzzleState,
    method: Method,
    outcome: &SearchOutcome<PuzzleState>,
    path: &[PuzzleState],
) {
    println!(
        "start {} [{} tubes, capacity {}]",
        start,
        start.tube_count(),
        start.tube_size()
    );
    let stats = &outcome.stats;
    match &outcome.goal {
        Some(goal) => {
            println!(
                "solved in {} pours by {} ({} states expanded, {:.3?} elapsed)",
                goal.depth(),
                method,
                stats.expanded,
                stats.elapsed
            );
            for (step, state) in path.iter().enumerate().skip(1) {
                if let Some(pour) = state.last_pour() {
                    println!("{:3}. pour {}   {}", step, pour, state);
                }
            }
        }
        None => {
            println!(
                "no solution: search space exhausted after {} states in {:.3?}",
                stats.visited, stats.elapsed
            );
        }
    }
}

fn print_json<T: Serialize>(report: &T) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing report: {}", e);
            process::exit(2);
        }
    }
}
