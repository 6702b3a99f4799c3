//! A Sokoban solver: best-first search over player moves, guided by a
//! single-box push-distance table and deduplicated with Zobrist hashes.

pub mod board;
pub mod deadlocks;
pub mod frontier;
pub mod heuristic;
pub mod levels;
pub mod puzzle;
pub mod solver;
pub mod state;
pub mod zobrist;

pub use board::{Direction, Position};
pub use frontier::Strategy;
pub use levels::{LevelError, Levels};
pub use puzzle::{BoardError, Puzzle};
pub use solver::{MoveSequence, SearchStats, SolveResult, Solver, SolverConfig};

/// Solve a puzzle given as a layout grid and an items grid.
///
/// Layout cells: `#` wall, `.` goal, anything else floor.
/// Item cells: `@` player, `$` box, anything else empty.
///
/// An unsolvable puzzle is `Ok(SolveResult::NoSolution)`; only malformed
/// input is an error.
pub fn solve<S: AsRef<str>>(
    width: usize,
    height: usize,
    layout: &[S],
    items: &[S],
) -> Result<SolveResult, BoardError> {
    solve_with(width, height, layout, items, SolverConfig::default())
}

/// Like [`solve`], with the search strategy and node budget taken from
/// `config`.
pub fn solve_with<S: AsRef<str>>(
    width: usize,
    height: usize,
    layout: &[S],
    items: &[S],
    config: SolverConfig,
) -> Result<SolveResult, BoardError> {
    let puzzle = Puzzle::from_grids(width, height, layout, items)?;
    Ok(Solver::new(&puzzle, config).solve())
}
