use crate::board::{ALL_DIRECTIONS, Board, Position};
use crate::state::BoxSet;
use std::collections::VecDeque;

/// Cost charged for a box standing on a cell from which no goal can be reached.
pub const UNREACHABLE_PENALTY: u32 = 1000;

/// Weight of the row in the positional tie-breaker (`row * 100 + col`).
const TIE_BREAK_ROW_WEIGHT: u32 = 100;

/// Heuristic value of a state, kept as two separate keys so the positional
/// tie-breaker can never outweigh a difference in push distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Estimate {
    /// Sum over boxes of the minimum pushes to the nearest goal.
    pub pushes: u32,
    /// Sum over boxes of `row * 100 + col`.
    pub tie_break: u32,
}

/// Pattern database: minimum pushes to move a lone box from each cell to any goal.
///
/// Other boxes and the player's ability to walk to the pushing side are
/// ignored, so every entry is a lower bound for that box alone.
pub struct PushDistances {
    distances: Vec<u16>,
    width: u8,
}

impl PushDistances {
    pub const UNREACHABLE: u16 = u16::MAX;

    pub fn new(board: &Board) -> Self {
        let mut distances = vec![Self::UNREACHABLE; board.cell_count()];
        let mut queue = VecDeque::new();

        for &goal in board.goals() {
            distances[board.index(goal)] = 0;
            queue.push_back(goal);
        }

        // BFS using pulls: a box at `prev` pushed in `direction` lands on `box_pos`,
        // with the player standing one further cell back.
        while let Some(box_pos) = queue.pop_front() {
            let dist = distances[board.index(box_pos)];

            for direction in ALL_DIRECTIONS {
                let Some(prev) = board.behind(box_pos, direction) else {
                    continue;
                };
                if !board.is_interior(prev) || board.is_wall(prev) {
                    continue;
                }
                let Some(player) = board.behind(prev, direction) else {
                    continue;
                };
                if board.is_wall(player) {
                    continue;
                }

                let idx = board.index(prev);
                if distances[idx] == Self::UNREACHABLE {
                    distances[idx] = dist + 1;
                    queue.push_back(prev);
                }
            }
        }

        PushDistances {
            distances,
            width: board.width(),
        }
    }

    /// Minimum pushes from `pos` to a goal, or None if no goal can be reached.
    pub fn get(&self, pos: Position) -> Option<u16> {
        let dist = self.distances[pos.row as usize * self.width as usize + pos.col as usize];
        (dist != Self::UNREACHABLE).then_some(dist)
    }

    /// Compute the heuristic for a box configuration.
    pub fn estimate(&self, boxes: &BoxSet) -> Estimate {
        let mut estimate = Estimate::default();
        for &pos in boxes.iter() {
            estimate.pushes += match self.get(pos) {
                Some(dist) => dist as u32,
                None => UNREACHABLE_PENALTY,
            };
            estimate.tie_break += pos.row as u32 * TIE_BREAK_ROW_WEIGHT + pos.col as u32;
        }
        estimate
    }
}
