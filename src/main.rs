use clap::{Parser, ValueEnum};
use log::debug;
use sokobot::{Levels, MoveSequence, Puzzle, SolveResult, Solver, SolverConfig, Strategy};
use std::fmt;
use std::ops::RangeInclusive;
use std::process;
use std::time::Instant;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Optimal,
    Greedy,
}

impl From<StrategyArg> for Strategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Optimal => Strategy::Optimal,
            StrategyArg::Greedy => Strategy::Greedy,
        }
    }
}

#[derive(Parser)]
#[command(name = "sokobot")]
#[command(about = "A Sokoban solver", long_about = None)]
struct Args {
    /// Path to the levels file (XSB format)
    #[arg(value_name = "FILE")]
    levels_file: String,

    /// Level number to solve (1-indexed), or start of range
    #[arg(value_name = "LEVEL")]
    level_start: usize,

    /// Optional end of level range (inclusive, 1-indexed)
    #[arg(value_name = "LEVEL_END")]
    level_end: Option<usize>,

    /// Print the solution step-by-step
    #[arg(short, long)]
    print_solution: bool,

    /// Maximum number of states to expand before giving up (unlimited if omitted)
    #[arg(short = 'n', long)]
    max_nodes: Option<usize>,

    /// Ordering of the open list
    #[arg(short, long, value_enum, default_value = "optimal")]
    strategy: StrategyArg,
}

/// Outcome of one level, as shown on its summary line.
struct Outcome {
    result: SolveResult,
    expanded: usize,
    elapsed_ms: u128,
}

impl Outcome {
    fn moves(&self) -> usize {
        match &self.result {
            SolveResult::Solved(solution) => solution.len(),
            SolveResult::NoSolution | SolveResult::Cutoff => 0,
        }
    }

    fn status(&self) -> char {
        match self.result {
            SolveResult::Solved(_) => 'Y',
            SolveResult::Cutoff => 'N',
            SolveResult::NoSolution => 'X',
        }
    }
}

#[derive(Default)]
struct Totals {
    levels: usize,
    solved: usize,
    moves: usize,
    expanded: usize,
    elapsed_ms: u128,
}

impl Totals {
    fn record(&mut self, outcome: &Outcome) {
        self.levels += 1;
        if matches!(outcome.result, SolveResult::Solved(_)) {
            self.solved += 1;
        }
        self.moves += outcome.moves();
        self.expanded += outcome.expanded;
        self.elapsed_ms += outcome.elapsed_ms;
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total: {}/{} solved  moves: {:<6} expanded: {:<12} time: {} ms",
            self.solved, self.levels, self.moves, self.expanded, self.elapsed_ms
        )
    }
}

/// 1-indexed level numbers to solve, checked against the collection size.
fn level_range(args: &Args, available: usize) -> Result<RangeInclusive<usize>, String> {
    let first = args.level_start;
    let last = args.level_end.unwrap_or(first);

    if first == 0 {
        return Err("level numbers start at 1".to_string());
    }
    if last < first {
        return Err(format!("empty level range {}..={}", first, last));
    }
    if last > available {
        return Err(format!(
            "level {} requested but the file has only {}",
            last, available
        ));
    }
    if args.print_solution && last > first {
        return Err("--print-solution needs a single level".to_string());
    }
    Ok(first..=last)
}

fn print_solution(puzzle: &Puzzle, solution: &MoveSequence) {
    println!("\nStart:\n{}", puzzle);
    let mut puzzle = puzzle.clone();
    for (count, &direction) in solution.iter().enumerate() {
        if puzzle.step(direction).is_none() {
            eprintln!("Error: move {} ({}) is not legal", count + 1, direction);
            return;
        }
        println!("{} {}/{}:\n{}", direction, count + 1, solution.len(), puzzle);
    }
    println!("Moves: {}", solution);
}

fn solve_level(puzzle: &Puzzle, level_num: usize, config: SolverConfig) -> Outcome {
    let mut solver = Solver::new(puzzle, config);
    let start = Instant::now();
    let result = solver.solve();
    let elapsed_ms = start.elapsed().as_millis();
    debug!("Level {}: {}", level_num, solver.stats());

    Outcome {
        result,
        expanded: solver.nodes_explored(),
        elapsed_ms,
    }
}

fn run(args: &Args) -> Result<(), String> {
    let levels = Levels::from_file(&args.levels_file)
        .map_err(|e| format!("cannot load {}: {}", args.levels_file, e))?;
    let range = level_range(args, levels.len())?;
    let config = SolverConfig {
        strategy: args.strategy.into(),
        max_nodes: args.max_nodes,
    };

    let mut totals = Totals::default();
    for level_num in range {
        let Some(puzzle) = levels.get(level_num - 1) else {
            continue;
        };
        let outcome = solve_level(puzzle, level_num, config);
        println!(
            "level: {:<3}  solved: {}  moves: {:<6} expanded: {:<12} time: {} ms",
            level_num,
            outcome.status(),
            outcome.moves(),
            outcome.expanded,
            outcome.elapsed_ms
        );
        if args.print_solution {
            if let SolveResult::Solved(solution) = &outcome.result {
                print_solution(puzzle, solution);
            }
        }
        totals.record(&outcome);
    }

    if totals.levels > 1 {
        println!("{}", totals);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(message) = run(&args) {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}
