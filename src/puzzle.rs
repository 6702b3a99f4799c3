use crate::board::{ALL_DIRECTIONS, Board, Direction, MAX_SIZE, Position, Tile};
use crate::state::{BoxSet, MAX_BOXES};
use std::error::Error;
use std::fmt;

/// Reasons a puzzle is rejected before any search starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// No rows or no columns
    Empty,
    /// Width or height exceeds [`MAX_SIZE`]
    TooLarge { width: usize, height: usize },
    /// The number of grid rows differs from the declared height
    RowCountMismatch { expected: usize, found: usize },
    /// A grid row differs in length from the declared width
    RowLengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    InvalidCharacter { ch: char, row: usize, col: usize },
    MissingPlayer,
    MultiplePlayers,
    /// The player or a box sits on a wall cell
    ItemOnWall { row: usize, col: usize },
    TooManyBoxes(usize),
    BoxGoalCountMismatch { boxes: usize, goals: usize },
    /// The player's region reaches the outermost ring of cells
    UnenclosedBoard,
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Empty => write!(f, "Empty board"),
            BoardError::TooLarge { width, height } => write!(
                f,
                "Board size {}x{} exceeds maximum size {}",
                width, height, MAX_SIZE
            ),
            BoardError::RowCountMismatch { expected, found } => {
                write!(f, "Expected {} rows, found {}", expected, found)
            }
            BoardError::RowLengthMismatch {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} cells, expected {}",
                row, found, expected
            ),
            BoardError::InvalidCharacter { ch, row, col } => {
                write!(f, "Invalid character '{}' at position ({}, {})", ch, row, col)
            }
            BoardError::MissingPlayer => write!(f, "No player found on board"),
            BoardError::MultiplePlayers => write!(f, "Multiple players found"),
            BoardError::ItemOnWall { row, col } => {
                write!(f, "Player or box on a wall at position ({}, {})", row, col)
            }
            BoardError::TooManyBoxes(count) => write!(
                f,
                "Board has {} boxes, maximum is {}",
                count, MAX_BOXES
            ),
            BoardError::BoxGoalCountMismatch { boxes, goals } => write!(
                f,
                "Goal count ({}) does not match box count ({})",
                goals, boxes
            ),
            BoardError::UnenclosedBoard => write!(f, "Board is not enclosed by walls"),
        }
    }
}

impl Error for BoardError {}

/// Result of a single legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Walk,
    Push,
}

/// A validated board together with the starting player and box positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    board: Board,
    player: Position,
    boxes: BoxSet,
}

impl Puzzle {
    /// Build a puzzle from separate layout and item grids.
    ///
    /// Layout cells: `#` is a wall, `.` a goal, anything else floor.
    /// Item cells: `@` is the player, `$` a box, anything else empty.
    pub fn from_grids<S: AsRef<str>>(
        width: usize,
        height: usize,
        layout: &[S],
        items: &[S],
    ) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::Empty);
        }
        if width > MAX_SIZE || height > MAX_SIZE {
            return Err(BoardError::TooLarge { width, height });
        }
        for grid in [layout, items] {
            if grid.len() != height {
                return Err(BoardError::RowCountMismatch {
                    expected: height,
                    found: grid.len(),
                });
            }
            for (row, line) in grid.iter().enumerate() {
                let found = line.as_ref().chars().count();
                if found != width {
                    return Err(BoardError::RowLengthMismatch {
                        row,
                        expected: width,
                        found,
                    });
                }
            }
        }

        let mut tiles = Vec::with_capacity(width * height);
        for line in layout {
            tiles.extend(line.as_ref().chars().map(|ch| match ch {
                '#' => Tile::Wall,
                '.' => Tile::Goal,
                _ => Tile::Floor,
            }));
        }

        let mut player = None;
        let mut boxes = Vec::new();
        for (row, line) in items.iter().enumerate() {
            for (col, ch) in line.as_ref().chars().enumerate() {
                let pos = Position::new(row as u8, col as u8);
                match ch {
                    '@' => {
                        if player.is_some() {
                            return Err(BoardError::MultiplePlayers);
                        }
                        player = Some(pos);
                    }
                    '$' => boxes.push(pos),
                    _ => {}
                }
            }
        }

        let board = Board::new(width as u8, height as u8, tiles);
        Self::validate(board, player, boxes)
    }

    /// Parse a single puzzle from XSB text.
    ///
    /// Characters:
    /// - `#` = Wall
    /// - ` `, `-`, `_` = Floor
    /// - `.` = Goal
    /// - `$` = Box
    /// - `@` = Player
    /// - `*` = Box on goal
    /// - `+` = Player on goal
    pub fn from_text(text: &str) -> Result<Self, BoardError> {
        let lines: Vec<&str> = text.lines().collect();

        let height = lines.len();
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        if width == 0 || height == 0 {
            return Err(BoardError::Empty);
        }
        if width > MAX_SIZE || height > MAX_SIZE {
            return Err(BoardError::TooLarge { width, height });
        }

        let mut tiles = vec![Tile::Floor; width * height];
        let mut player = None;
        let mut boxes = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let pos = Position::new(row as u8, col as u8);
                let tile = &mut tiles[row * width + col];
                match ch {
                    '#' => *tile = Tile::Wall,
                    ' ' | '-' | '_' => *tile = Tile::Floor,
                    '.' => *tile = Tile::Goal,
                    '$' => boxes.push(pos),
                    '*' => {
                        *tile = Tile::Goal;
                        boxes.push(pos);
                    }
                    '@' | '+' => {
                        if ch == '+' {
                            *tile = Tile::Goal;
                        }
                        if player.is_some() {
                            return Err(BoardError::MultiplePlayers);
                        }
                        player = Some(pos);
                    }
                    _ => return Err(BoardError::InvalidCharacter { ch, row, col }),
                }
            }
        }

        let board = Board::new(width as u8, height as u8, tiles);
        Self::validate(board, player, boxes)
    }

    fn validate(
        board: Board,
        player: Option<Position>,
        boxes: Vec<Position>,
    ) -> Result<Self, BoardError> {
        let player = player.ok_or(BoardError::MissingPlayer)?;

        if let Some(&pos) = std::iter::once(&player)
            .chain(&boxes)
            .find(|&&pos| board.is_wall(pos))
        {
            return Err(BoardError::ItemOnWall {
                row: pos.row as usize,
                col: pos.col as usize,
            });
        }

        if boxes.len() > MAX_BOXES {
            return Err(BoardError::TooManyBoxes(boxes.len()));
        }

        let goals = board.goals().len();
        if boxes.len() != goals {
            return Err(BoardError::BoxGoalCountMismatch {
                boxes: boxes.len(),
                goals,
            });
        }

        if !Self::is_enclosed(&board, player) {
            return Err(BoardError::UnenclosedBoard);
        }

        Ok(Puzzle {
            board,
            player,
            boxes: BoxSet::new(boxes),
        })
    }

    /// Flood fill over non-wall cells from the player, ignoring boxes.
    /// The board is enclosed if the fill never touches the outer ring.
    fn is_enclosed(board: &Board, player: Position) -> bool {
        let mut visited = vec![false; board.cell_count()];
        let mut stack = vec![player];
        visited[board.index(player)] = true;

        while let Some(pos) = stack.pop() {
            if !board.is_interior(pos) {
                return false;
            }
            for dir in ALL_DIRECTIONS {
                if let Some(next) = board.neighbor(pos, dir) {
                    let idx = board.index(next);
                    if !visited[idx] && !board.is_wall(next) {
                        visited[idx] = true;
                        stack.push(next);
                    }
                }
            }
        }

        true
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn boxes(&self) -> &BoxSet {
        &self.boxes
    }

    /// Apply one move under the game rules.
    /// Returns None and leaves the puzzle untouched if the move is illegal.
    pub fn step(&mut self, dir: Direction) -> Option<Step> {
        let target = self.board.neighbor(self.player, dir)?;
        if self.board.is_wall(target) {
            return None;
        }

        if !self.boxes.contains(target) {
            self.player = target;
            return Some(Step::Walk);
        }

        let beyond = self.board.neighbor(target, dir)?;
        if self.board.is_wall(beyond) || self.boxes.contains(beyond) {
            return None;
        }

        self.boxes = self.boxes.moved(target, beyond);
        self.player = target;
        Some(Step::Push)
    }

    /// Check if all boxes are on goals (win condition)
    pub fn is_solved(&self) -> bool {
        self.boxes.iter().all(|&pos| self.board.is_goal(pos))
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.board.height() {
            let mut line = String::new();
            for col in 0..self.board.width() {
                let pos = Position::new(row, col);
                let tile = self.board.tile(pos);

                let ch = if pos == self.player {
                    match tile {
                        Tile::Goal => '+',
                        _ => '@',
                    }
                } else if self.boxes.contains(pos) {
                    match tile {
                        Tile::Goal => '*',
                        _ => '$',
                    }
                } else {
                    match tile {
                        Tile::Wall => '#',
                        Tile::Floor => ' ',
                        Tile::Goal => '.',
                    }
                };
                line.push(ch);
            }
            // Trim trailing spaces to match the input format
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
