use crate::puzzle::{BoardError, Puzzle};
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Error type for level parsing operations.
#[derive(Debug)]
pub enum LevelError {
    /// IO error when reading from file
    Io(io::Error),
    /// Invalid level content, with the 0-indexed position of the level in the file
    InvalidLevel { index: usize, error: BoardError },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(err) => write!(f, "IO error: {}", err),
            LevelError::InvalidLevel { index, error } => {
                write!(f, "Invalid level {}: {}", index + 1, error)
            }
        }
    }
}

impl Error for LevelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LevelError::Io(err) => Some(err),
            LevelError::InvalidLevel { error, .. } => Some(error),
        }
    }
}

impl From<io::Error> for LevelError {
    fn from(err: io::Error) -> Self {
        LevelError::Io(err)
    }
}

/// Puzzles read from one XSB collection, in file order.
#[derive(Debug)]
pub struct Levels {
    levels: Vec<Puzzle>,
}

impl Levels {
    /// Parse an XSB collection.
    ///
    /// A level is a run of board lines. Lines starting with `;` and blank
    /// lines end the current level; anything else is board text.
    pub fn from_text(contents: &str) -> Result<Self, LevelError> {
        let mut levels = Vec::new();
        let mut block: Vec<&str> = Vec::new();

        for line in contents.lines().chain(std::iter::once("")) {
            if !line.trim().is_empty() && !line.trim_start().starts_with(';') {
                block.push(line);
                continue;
            }
            if block.is_empty() {
                continue;
            }

            let index = levels.len();
            let puzzle = Puzzle::from_text(&block.join("\n"))
                .map_err(|error| LevelError::InvalidLevel { index, error })?;
            levels.push(puzzle);
            block.clear();
        }

        Ok(Levels { levels })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let contents = fs::read_to_string(path)?;
        Self::from_text(&contents)
    }

    /// The level at `index`, counting from 0.
    pub fn get(&self, index: usize) -> Option<&Puzzle> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
