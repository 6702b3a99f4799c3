use crate::board::{ALL_DIRECTIONS, Board, Direction, Position};
use crate::deadlocks::DeadSquares;
use crate::heuristic::{Estimate, PushDistances};
use crate::zobrist::Zobrist;
use arrayvec::ArrayVec;
use log::debug;
use std::hash::{Hash, Hasher};
use std::slice;

pub const MAX_BOXES: usize = 32;

/// Box positions kept sorted row-major, so two sets holding the same cells
/// compare and hash equal regardless of how they were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoxSet {
    positions: ArrayVec<Position, MAX_BOXES>,
}

impl BoxSet {
    /// Panics if given more than [`MAX_BOXES`] positions.
    pub fn new(positions: impl IntoIterator<Item = Position>) -> Self {
        let mut positions: ArrayVec<Position, MAX_BOXES> = positions.into_iter().collect();
        positions.sort_unstable();
        BoxSet { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Position> {
        self.positions.iter()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.positions
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions.binary_search(&pos).is_ok()
    }

    /// A copy with the box at `from` moved to `to`, re-sorted.
    pub fn moved(&self, from: Position, to: Position) -> BoxSet {
        let mut positions = self.positions.clone();
        if let Ok(idx) = positions.binary_search(&from) {
            positions[idx] = to;
        }
        positions.sort_unstable();
        BoxSet { positions }
    }
}

/// Per-puzzle tables, built once and shared by every state.
pub struct Context<'a> {
    pub board: &'a Board,
    pub dead_squares: DeadSquares,
    pub push_distances: PushDistances,
    pub zobrist: Zobrist,
}

impl<'a> Context<'a> {
    pub fn new(board: &'a Board) -> Self {
        let dead_squares = DeadSquares::new(board);
        let push_distances = PushDistances::new(board);
        let zobrist = Zobrist::new(board);
        debug!(
            "Built tables for {}x{} board: {} goals, {} dead squares",
            board.width(),
            board.height(),
            board.goals().len(),
            dead_squares.count()
        );

        Context {
            board,
            dead_squares,
            push_distances,
            zobrist,
        }
    }
}

/// Index of a state in the solver's arena.
///
/// Indices are 32 bits wide, so an arena holds at most [`MAX_STATES`] states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(u32);

pub const MAX_STATES: usize = u32::MAX as usize;

impl StateId {
    pub const ROOT: StateId = StateId(0);

    /// None once `index` reaches [`MAX_STATES`].
    pub fn new(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .filter(|&index| index < u32::MAX)
            .map(StateId)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the search graph.
///
/// States are never mutated once built. Equality and hashing use only the
/// Zobrist fingerprint, so two states reached by different paths are the
/// same state.
#[derive(Debug, Clone)]
pub struct State {
    player: Position,
    boxes: BoxSet,
    g: u32,
    h: Estimate,
    parent: Option<StateId>,
    direction: Option<Direction>,
    hash: u64,
}

impl State {
    pub fn root(ctx: &Context<'_>, player: Position, boxes: BoxSet) -> Self {
        Self::new(ctx, player, boxes, 0, None, None)
    }

    fn new(
        ctx: &Context<'_>,
        player: Position,
        boxes: BoxSet,
        g: u32,
        parent: Option<StateId>,
        direction: Option<Direction>,
    ) -> Self {
        let h = ctx.push_distances.estimate(&boxes);
        let hash = ctx.zobrist.compute_hash(player, &boxes);
        State {
            player,
            boxes,
            g,
            h,
            parent,
            direction,
            hash,
        }
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn boxes(&self) -> &BoxSet {
        &self.boxes
    }

    /// Moves made from the root.
    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn h(&self) -> Estimate {
        self.h
    }

    /// Moves made plus the push-distance estimate.
    pub fn f(&self) -> u32 {
        self.g + self.h.pushes
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// The move that produced this state, None for the root.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    /// Check if all boxes are on goals
    pub fn is_goal(&self, board: &Board) -> bool {
        self.boxes.iter().all(|&pos| board.is_goal(pos))
    }

    /// Generate the states reachable by one player move, in up, down, left,
    /// right order. `id` is this state's own arena index.
    pub fn successors(&self, id: StateId, ctx: &Context<'_>) -> ArrayVec<State, 4> {
        let board = ctx.board;
        let mut successors = ArrayVec::new();

        for direction in ALL_DIRECTIONS {
            let Some(target) = board.neighbor(self.player, direction) else {
                continue;
            };
            if board.is_wall(target) {
                continue;
            }

            let boxes = if self.boxes.contains(target) {
                let Some(beyond) = board.neighbor(target, direction) else {
                    continue;
                };
                if board.is_wall(beyond)
                    || self.boxes.contains(beyond)
                    || ctx.dead_squares.is_dead(beyond)
                {
                    continue;
                }
                self.boxes.moved(target, beyond)
            } else {
                self.boxes.clone()
            };

            successors.push(State::new(
                ctx,
                target,
                boxes,
                self.g + 1,
                Some(id),
                Some(direction),
            ));
        }

        successors
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}
