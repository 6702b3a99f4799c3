use crate::board::{Board, Position};

/// Cells where a box can never be pushed back out.
///
/// Only the simple corner pattern is detected: a non-goal cell with a wall
/// above or below and a wall left or right. Boxes freezing each other are
/// not caught here.
pub struct DeadSquares {
    dead: Vec<bool>,
    width: u8,
}

impl DeadSquares {
    pub fn new(board: &Board) -> Self {
        let mut dead = vec![false; board.cell_count()];

        for pos in board.positions() {
            if !board.is_interior(pos) || board.is_wall(pos) || board.is_goal(pos) {
                continue;
            }

            let wall_at = |row: u8, col: u8| board.is_wall(Position::new(row, col));
            let vertical = wall_at(pos.row - 1, pos.col) || wall_at(pos.row + 1, pos.col);
            let horizontal = wall_at(pos.row, pos.col - 1) || wall_at(pos.row, pos.col + 1);

            if vertical && horizontal {
                dead[board.index(pos)] = true;
            }
        }

        DeadSquares {
            dead,
            width: board.width(),
        }
    }

    /// Returns true if a box pushed onto `pos` can never reach a goal.
    pub fn is_dead(&self, pos: Position) -> bool {
        self.dead[pos.row as usize * self.width as usize + pos.col as usize]
    }

    pub fn count(&self) -> usize {
        self.dead.iter().filter(|&&dead| dead).count()
    }
}
