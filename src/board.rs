use std::fmt;

/// Largest supported width or height; coordinates are stored as `u8`.
pub const MAX_SIZE: usize = u8::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Floor,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Expansion order of successor moves.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    /// Row and column offsets of a single step.
    fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Lowercase move letter used in solution strings.
    pub fn to_char(self) -> char {
        match self {
            Direction::Up => 'u',
            Direction::Down => 'd',
            Direction::Left => 'l',
            Direction::Right => 'r',
        }
    }

    pub fn from_char(ch: char) -> Option<Direction> {
        match ch.to_ascii_lowercase() {
            'u' => Some(Direction::Up),
            'd' => Some(Direction::Down),
            'l' => Some(Direction::Left),
            'r' => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

/// A cell on the board. Orders row-major, which is the canonical box order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The static part of a puzzle: walls, floor and goals.
///
/// A board never changes once built. The search holds a single board and
/// lends it to every state, see [`crate::state::Context`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    tiles: Vec<Tile>,
    goals: Vec<Position>,
}

impl Board {
    /// Build a board from row-major tiles. `tiles.len()` must equal `width * height`.
    pub(crate) fn new(width: u8, height: u8, tiles: Vec<Tile>) -> Self {
        assert_eq!(
            tiles.len(),
            width as usize * height as usize,
            "tile count does not match board dimensions"
        );

        let goals = (0..height)
            .flat_map(|row| (0..width).map(move |col| Position::new(row, col)))
            .filter(|&pos| tiles[pos.row as usize * width as usize + pos.col as usize] == Tile::Goal)
            .collect();

        Board {
            width,
            height,
            tiles,
            goals,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of cells, used to size per-cell tables.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major index of a position, for per-cell tables.
    pub fn index(&self, pos: Position) -> usize {
        pos.row as usize * self.width as usize + pos.col as usize
    }

    pub fn tile(&self, pos: Position) -> Tile {
        self.tiles[self.index(pos)]
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.tile(pos) == Tile::Wall
    }

    pub fn is_goal(&self, pos: Position) -> bool {
        self.tile(pos) == Tile::Goal
    }

    /// Goal cells in row-major order.
    pub fn goals(&self) -> &[Position] {
        &self.goals
    }

    /// True when `pos` is not on the outermost ring of cells.
    pub fn is_interior(&self, pos: Position) -> bool {
        pos.row > 0 && pos.col > 0 && pos.row + 1 < self.height && pos.col + 1 < self.width
    }

    /// Step from `pos` in the given direction.
    /// Returns None if the new position would leave the board.
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        let row = pos.row as i32 + dr as i32;
        let col = pos.col as i32 + dc as i32;

        if row >= 0 && col >= 0 && row < self.height as i32 && col < self.width as i32 {
            Some(Position::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Step from `pos` against the given direction.
    pub fn behind(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        let row = pos.row as i32 - dr as i32;
        let col = pos.col as i32 - dc as i32;

        if row >= 0 && col >= 0 && row < self.height as i32 && col < self.width as i32 {
            Some(Position::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Position::new(row, col)))
    }
}
