use crate::board::{Board, Position};
use crate::state::BoxSet;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Zobrist hash for search states
pub struct Zobrist {
    box_hashes: Vec<u64>,
    player_hashes: Vec<u64>,
    width: u8,
}

impl Zobrist {
    const SEED: u64 = 0x123456789abcdef0;

    pub fn new(board: &Board) -> Self {
        // Use a seeded PRNG for reproducible Zobrist hashes
        let mut rng = ChaCha8Rng::seed_from_u64(Self::SEED);

        let cells = board.cell_count();
        let box_hashes = (0..cells).map(|_| rng.next_u64()).collect();
        let player_hashes = (0..cells).map(|_| rng.next_u64()).collect();

        Zobrist {
            box_hashes,
            player_hashes,
            width: board.width(),
        }
    }

    fn index(&self, pos: Position) -> usize {
        pos.row as usize * self.width as usize + pos.col as usize
    }

    /// Get hash value for a box at a specific position
    pub fn box_hash(&self, pos: Position) -> u64 {
        self.box_hashes[self.index(pos)]
    }

    /// Get hash value for player position
    pub fn player_hash(&self, pos: Position) -> u64 {
        self.player_hashes[self.index(pos)]
    }

    /// Compute the hash for a state (player hash XOR every box hash)
    pub fn compute_hash(&self, player: Position, boxes: &BoxSet) -> u64 {
        boxes
            .iter()
            .fold(self.player_hash(player), |hash, &pos| hash ^ self.box_hash(pos))
    }
}
