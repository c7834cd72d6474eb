mod board;
mod piece;
mod pqueue;
mod puzzles;
mod solver;
mod zobrist;

use board::Board;
use clap::Parser;
use puzzles::{ParseOptions, Puzzles};
use solver::{LoggingTracer, NullTracer, SearchMode, Solver, Tracer};
use std::io;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Instant;
use tracing::info;

fn print_solution(solved: &Rc<Board>) {
    let path = solver::reconstruct_path(solved);
    let strokes = solver::stroke_path(&path);
    let total = strokes.len() - 1;

    println!("\nStarting position:\n{}", strokes[0]);
    for (count, board) in strokes.iter().enumerate().skip(1) {
        let movement = board.movements()[count - 1];
        println!(
            "Stroke {}/{}: {}\n{}",
            count,
            total,
            board.describe(&movement),
            board
        );
    }
}

struct PuzzleStats {
    solved: bool,
    strokes: usize,
    states_explored: usize,
    elapsed_ms: u128,
}

struct SolveOpts {
    puzzle_num: usize,
    mode: SearchMode,
    print_solution: bool,
    trace: bool,
}

fn solve_puzzle(root: &Board, opts: SolveOpts) -> PuzzleStats {
    if opts.trace {
        let tracer = LoggingTracer::new(opts.puzzle_num);
        run_solver(root, opts, tracer)
    } else {
        run_solver(root, opts, NullTracer)
    }
}

fn run_solver<T: Tracer>(root: &Board, opts: SolveOpts, tracer: T) -> PuzzleStats {
    let mut solver = Solver::new(opts.mode, tracer);
    let start = Instant::now();
    let solutions = solver.solve(root);
    let elapsed_ms = start.elapsed().as_millis();
    let states_explored = solver.nodes_explored();
    info!(
        puzzle = opts.puzzle_num,
        generated = solver.nodes_generated(),
        distinct = solver.states_seen(),
        "Search statistics"
    );

    let best = solver::shortest(&solutions);
    let (solved_char, strokes) = match best {
        Some(board) => ('Y', board.strokes()),
        None => ('N', 0),
    };

    println!(
        "puzzle: {:<3}  solved: {}  strokes: {:<5}  solutions: {:<6}  states: {:<10}  elapsed: {} ms",
        opts.puzzle_num,
        solved_char,
        strokes,
        solutions.len(),
        states_explored,
        elapsed_ms
    );

    if opts.print_solution {
        if let Some(board) = best {
            print_solution(board);
        }
    }

    PuzzleStats {
        solved: best.is_some(),
        strokes,
        states_explored,
        elapsed_ms,
    }
}

#[derive(Parser)]
#[command(name = "klotski")]
#[command(about = "A sliding-block puzzle solver", long_about = None)]
struct Args {
    /// Path to the puzzle file
    #[arg(value_name = "FILE")]
    puzzles_file: String,

    /// Puzzle number to solve (1-indexed), or start of range
    #[arg(value_name = "PUZZLE", default_value = "1")]
    puzzle_start: usize,

    /// Optional end of puzzle range (inclusive, 1-indexed)
    #[arg(value_name = "PUZZLE_END")]
    puzzle_end: Option<usize>,

    /// Collect every solution path instead of stopping at the first
    #[arg(short, long)]
    all: bool,

    /// Print the solution stroke by stroke
    #[arg(short, long)]
    print_solution: bool,

    /// Character marking immovable boundary cells
    #[arg(long, default_value = "X")]
    wall: char,

    /// Character marking the goal region
    #[arg(long, default_value = "Z")]
    goal: char,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .init();

    let options = ParseOptions {
        wall: args.wall,
        goal: args.goal,
    };
    let puzzles = match Puzzles::from_file(&args.puzzles_file, &options) {
        Ok(puzzles) => puzzles,
        Err(e) => {
            eprintln!("Error loading puzzles: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if puzzles.is_empty() {
        eprintln!("Error: no puzzles found in {}", args.puzzles_file);
        return ExitCode::FAILURE;
    }

    let puzzle_end = args.puzzle_end.unwrap_or(args.puzzle_start);

    if args.puzzle_start == 0 {
        eprintln!("Error: puzzle numbers must be at least 1");
        return ExitCode::FAILURE;
    }

    if puzzle_end < args.puzzle_start {
        eprintln!("Error: puzzle end must be >= puzzle start");
        return ExitCode::FAILURE;
    }

    if puzzle_end > puzzles.len() {
        eprintln!(
            "Error: puzzle {} not found (file contains {} puzzles)",
            puzzle_end,
            puzzles.len()
        );
        return ExitCode::FAILURE;
    }

    let num_puzzles = puzzle_end - args.puzzle_start + 1;
    if args.print_solution && num_puzzles > 1 {
        eprintln!("Error: solution printing only supported when solving a single puzzle");
        return ExitCode::FAILURE;
    }

    let mode = if args.all {
        SearchMode::All
    } else {
        SearchMode::First
    };

    let mut total_solved = 0;
    let mut total_strokes = 0;
    let mut total_states = 0;
    let mut total_time_ms = 0;

    for (puzzle_num, root) in (args.puzzle_start..=puzzle_end)
        .filter_map(|num| puzzles.get(num - 1).map(|root| (num, root)))
    {
        let opts = SolveOpts {
            puzzle_num,
            mode,
            print_solution: args.print_solution,
            trace: args.verbose > 0,
        };
        let stats = solve_puzzle(root, opts);

        if stats.solved {
            total_solved += 1;
        }
        total_strokes += stats.strokes;
        total_states += stats.states_explored;
        total_time_ms += stats.elapsed_ms;
    }

    if num_puzzles > 1 {
        println!("---");
        println!(
            "solved: {:>3}/{:<3}  strokes: {:<5}  states: {:<10}  elapsed: {} ms",
            total_solved, num_puzzles, total_strokes, total_states, total_time_ms
        );
    }

    ExitCode::SUCCESS
}
