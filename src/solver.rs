use crate::board::Direction;
use crate::frontier::{Frontier, Strategy};
use crate::puzzle::Puzzle;
use crate::state::{Context, State, StateId};
use log::{debug, info, trace};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// Stop after expanding this many states. None searches to exhaustion.
    pub max_nodes: Option<usize>,
}

/// Player moves from the start position, first move first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSequence(Vec<Direction>);

impl MoveSequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Direction] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Direction> {
        self.0.iter()
    }
}

impl From<Vec<Direction>> for MoveSequence {
    fn from(moves: Vec<Direction>) -> Self {
        MoveSequence(moves)
    }
}

impl fmt::Display for MoveSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for direction in &self.0 {
            write!(f, "{}", direction.to_char())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Solved(MoveSequence),
    /// Every reachable state was explored without reaching the goal.
    NoSolution,
    /// The node budget ran out first, or the arena reached
    /// [`MAX_STATES`](crate::state::MAX_STATES).
    Cutoff,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States taken from the open list and expanded
    pub expanded: usize,
    /// Successors generated
    pub generated: usize,
    /// Successors dropped because their fingerprint was already seen
    pub duplicates: usize,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded: {}  generated: {}  duplicates: {}",
            self.expanded, self.generated, self.duplicates
        )
    }
}

/// Best-first search over player moves.
///
/// All states live in one arena and refer to their parent by index, so a
/// solution path is recovered by walking indices back to the root.
pub struct Solver<'a> {
    puzzle: &'a Puzzle,
    ctx: Context<'a>,
    config: SolverConfig,
    states: Vec<State>,
    stats: SearchStats,
}

impl<'a> Solver<'a> {
    pub fn new(puzzle: &'a Puzzle, config: SolverConfig) -> Self {
        Solver {
            puzzle,
            ctx: Context::new(puzzle.board()),
            config,
            states: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn solve(&mut self) -> SolveResult {
        self.states.clear();
        self.stats = SearchStats::default();

        let mut frontier = Frontier::new(self.config.strategy);
        let root = State::root(&self.ctx, self.puzzle.player(), self.puzzle.boxes().clone());
        debug!(
            "Searching with {:?} strategy, root estimate {:?}",
            self.config.strategy,
            root.h()
        );
        frontier.offer(root.zobrist_hash(), root.g(), root.h(), StateId::ROOT);
        self.states.push(root);

        while let Some(id) = frontier.pop() {
            let state = &self.states[id.index()];
            if state.is_goal(self.ctx.board) {
                let solution = reconstruct_path(&self.states, id);
                info!("Solved in {} moves ({})", solution.len(), self.stats);
                return SolveResult::Solved(solution);
            }

            if self
                .config
                .max_nodes
                .is_some_and(|max| self.stats.expanded >= max)
            {
                info!("Node budget exhausted ({})", self.stats);
                return SolveResult::Cutoff;
            }

            trace!(
                "expand #{}: player={} g={} h={:?} open={}",
                self.stats.expanded,
                state.player(),
                state.g(),
                state.h(),
                frontier.len()
            );
            self.stats.expanded += 1;

            for successor in state.successors(id, &self.ctx) {
                self.stats.generated += 1;
                let Some(successor_id) = StateId::new(self.states.len()) else {
                    info!("State arena full ({})", self.stats);
                    return SolveResult::Cutoff;
                };
                if frontier.offer(successor.zobrist_hash(), successor.g(), successor.h(), successor_id) {
                    self.states.push(successor);
                } else {
                    self.stats.duplicates += 1;
                }
            }
        }

        info!(
            "No solution after {} unique states ({})",
            frontier.seen_count(),
            self.stats
        );
        SolveResult::NoSolution
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn nodes_explored(&self) -> usize {
        self.stats.expanded
    }
}

/// Follow parent links from `goal` back to the root and return the moves in
/// the order they were played.
pub fn reconstruct_path(states: &[State], goal: StateId) -> MoveSequence {
    let mut moves = Vec::new();
    let mut current = &states[goal.index()];
    while let Some(parent) = current.parent() {
        if let Some(direction) = current.direction() {
            moves.push(direction);
        }
        current = &states[parent.index()];
    }
    moves.reverse();
    MoveSequence(moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ALL_DIRECTIONS;
    use crate::puzzle::Step;
    use std::collections::{HashSet, VecDeque};

    const SCENARIO_D: &str = "######\n\
                              #@$ .#\n\
                              #    #\n\
                              # $ .#\n\
                              #    #\n\
                              ######";

    const MICROBAN_3: &str = "  ####\n\
                              ###  ####\n\
                              #     $ #\n\
                              # #  #$ #\n\
                              # . .#@ #\n\
                              #########";

    fn solve_text(text: &str, config: SolverConfig) -> SolveResult {
        let puzzle = Puzzle::from_text(text).unwrap();
        Solver::new(&puzzle, config).solve()
    }

    fn greedy() -> SolverConfig {
        SolverConfig {
            strategy: Strategy::Greedy,
            max_nodes: None,
        }
    }

    /// Play the moves, panicking on an illegal one. Returns the final
    /// position and the number of pushes.
    fn replay(puzzle: &Puzzle, moves: &MoveSequence) -> (Puzzle, usize) {
        let mut puzzle = puzzle.clone();
        let mut pushes = 0;
        for &direction in moves.iter() {
            match puzzle.step(direction) {
                Some(Step::Push) => pushes += 1,
                Some(Step::Walk) => {}
                None => panic!("illegal move {} in {}", direction, moves),
            }
        }
        (puzzle, pushes)
    }

    /// Breadth-first search over every (player, boxes) pair.
    fn shortest_solution(puzzle: &Puzzle) -> Option<usize> {
        let mut seen: HashSet<_> = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert((puzzle.player(), puzzle.boxes().clone()));
        queue.push_back((puzzle.clone(), 0));

        while let Some((current, dist)) = queue.pop_front() {
            if current.is_solved() {
                return Some(dist);
            }
            for direction in ALL_DIRECTIONS {
                let mut next = current.clone();
                if next.step(direction).is_some()
                    && seen.insert((next.player(), next.boxes().clone()))
                {
                    queue.push_back((next, dist + 1));
                }
            }
        }
        None
    }

    #[test]
    fn test_solve_single_push() {
        let puzzle = Puzzle::from_text(
            "#####\n\
             #@$.#\n\
             #####",
        )
        .unwrap();
        let mut solver = Solver::new(&puzzle, SolverConfig::default());
        let result = solver.solve();

        assert_eq!(
            result,
            SolveResult::Solved(MoveSequence::from(vec![Direction::Right]))
        );
        assert_eq!(
            solver.stats(),
            SearchStats {
                expanded: 1,
                generated: 1,
                duplicates: 0
            }
        );
    }

    #[test]
    fn test_solve_already_solved() {
        let result = solve_text(
            "####\n\
             #@*#\n\
             ####",
            SolverConfig::default(),
        );
        assert_eq!(result, SolveResult::Solved(MoveSequence::default()));
    }

    #[test]
    fn test_corner_only_path_has_no_solution() {
        let text = "######\n\
                    #.@$ #\n\
                    ######";
        for config in [SolverConfig::default(), greedy()] {
            let puzzle = Puzzle::from_text(text).unwrap();
            let mut solver = Solver::new(&puzzle, config);
            assert_eq!(solver.solve(), SolveResult::NoSolution);
            assert_eq!(solver.stats().expanded, 2);
        }
    }

    #[test]
    fn test_independent_boxes() {
        let puzzle = Puzzle::from_text(SCENARIO_D).unwrap();
        let result = Solver::new(&puzzle, SolverConfig::default()).solve();
        let SolveResult::Solved(moves) = result else {
            panic!("expected a solution, got {:?}", result);
        };

        let ctx = Context::new(puzzle.board());
        let root = State::root(&ctx, puzzle.player(), puzzle.boxes().clone());
        let (end, pushes) = replay(&puzzle, &moves);

        assert!(end.is_solved());
        assert_eq!(root.h().pushes, 4);
        assert_eq!(pushes, root.h().pushes as usize);
        assert_eq!(moves.len(), 8);
        assert_eq!(Some(moves.len()), shortest_solution(&puzzle));
    }

    #[test]
    fn test_optimal_matches_exhaustive_search() {
        let boards = [
            SCENARIO_D,
            "######\n\
             #    #\n\
             # #$ #\n\
             # .@ #\n\
             ######",
            "######\n\
             #.  .#\n\
             # $$ #\n\
             #  @ #\n\
             ######",
            "######\n\
             #. $ #\n\
             # ## #\n\
             #  @ #\n\
             ######",
            "######\n\
             #.@$ #\n\
             ######",
            MICROBAN_3,
        ];

        for text in boards {
            let puzzle = Puzzle::from_text(text).unwrap();
            let expected = shortest_solution(&puzzle);
            match Solver::new(&puzzle, SolverConfig::default()).solve() {
                SolveResult::Solved(moves) => {
                    assert_eq!(Some(moves.len()), expected, "board:\n{}", text);
                    assert!(replay(&puzzle, &moves).0.is_solved());
                }
                SolveResult::NoSolution => assert_eq!(expected, None, "board:\n{}", text),
                SolveResult::Cutoff => panic!("unexpected cutoff"),
            }
        }
    }

    #[test]
    fn test_greedy_solutions_are_valid() {
        for text in [SCENARIO_D, MICROBAN_3] {
            let puzzle = Puzzle::from_text(text).unwrap();
            let SolveResult::Solved(moves) = Solver::new(&puzzle, greedy()).solve() else {
                panic!("greedy search failed on:\n{}", text);
            };
            let (end, _) = replay(&puzzle, &moves);
            assert!(end.is_solved());
            assert!(Some(moves.len()) >= shortest_solution(&puzzle));
        }
    }

    #[test]
    fn test_deterministic() {
        for config in [SolverConfig::default(), greedy()] {
            let first = solve_text(MICROBAN_3, config);
            let second = solve_text(MICROBAN_3, config);
            assert!(matches!(first, SolveResult::Solved(_)));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_terminates_under_node_ceiling() {
        for config in [SolverConfig::default(), greedy()] {
            let config = SolverConfig {
                max_nodes: Some(200_000),
                ..config
            };
            for text in [SCENARIO_D, MICROBAN_3] {
                assert!(matches!(solve_text(text, config), SolveResult::Solved(_)));
            }
            // unsolvable boards run out of states long before the ceiling
            let unsolvable = "######\n\
                              #.#  #\n\
                              # #$ #\n\
                              #  @ #\n\
                              ######";
            assert_eq!(solve_text(unsolvable, config), SolveResult::NoSolution);
        }
    }

    #[test]
    fn test_cutoff() {
        let puzzle = Puzzle::from_text(SCENARIO_D).unwrap();
        let mut solver = Solver::new(
            &puzzle,
            SolverConfig {
                max_nodes: Some(1),
                ..SolverConfig::default()
            },
        );
        assert_eq!(solver.solve(), SolveResult::Cutoff);
        assert_eq!(solver.nodes_explored(), 1);

        // a solved root is reported even with no budget at all
        let result = solve_text(
            "####\n\
             #@*#\n\
             ####",
            SolverConfig {
                max_nodes: Some(0),
                ..SolverConfig::default()
            },
        );
        assert_eq!(result, SolveResult::Solved(MoveSequence::default()));
    }

    #[test]
    fn test_solver_can_run_twice() {
        let puzzle = Puzzle::from_text(SCENARIO_D).unwrap();
        let mut solver = Solver::new(&puzzle, SolverConfig::default());
        let first = solver.solve();
        let first_stats = solver.stats();
        assert_eq!(solver.solve(), first);
        assert_eq!(solver.stats(), first_stats);
    }

    #[test]
    fn test_reconstruct_path() {
        let puzzle = Puzzle::from_text(
            "######\n\
             #    #\n\
             # @$.#\n\
             #    #\n\
             ######",
        )
        .unwrap();
        let ctx = Context::new(puzzle.board());
        let root = State::root(&ctx, puzzle.player(), puzzle.boxes().clone());

        let mut states = vec![root];
        assert!(reconstruct_path(&states, StateId::new(0).unwrap()).is_empty());

        for direction in [Direction::Up, Direction::Right, Direction::Down] {
            let id = StateId::new(states.len() - 1).unwrap();
            let next = states[id.index()]
                .successors(id, &ctx)
                .into_iter()
                .find(|s| s.direction() == Some(direction))
                .unwrap();
            states.push(next);
        }

        let path = reconstruct_path(&states, StateId::new(3).unwrap());
        assert_eq!(
            path.as_slice(),
            &[Direction::Up, Direction::Right, Direction::Down]
        );
        assert_eq!(path.to_string(), "urd");
        // the last move pushed the box down off its row
        assert_eq!(states[3].boxes().as_slice(), &[crate::board::Position::new(3, 3)]);
    }
}
