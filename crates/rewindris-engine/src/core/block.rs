use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Enum representing the type of block (tetromino).
#[derive(
    Debug, derive_more::Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum BlockKind {
    /// I-block.
    I = 0,
    /// J-block.
    J = 1,
    /// L-block.
    L = 2,
    /// O-block.
    O = 3,
    /// S-block.
    S = 4,
    /// T-block.
    T = 5,
    /// Z-block.
    Z = 6,
}

impl Distribution<BlockKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BlockKind {
        match rng.random_range(0..=6) {
            0 => BlockKind::I,
            1 => BlockKind::J,
            2 => BlockKind::L,
            3 => BlockKind::O,
            4 => BlockKind::S,
            5 => BlockKind::T,
            _ => BlockKind::Z,
        }
    }
}

impl BlockKind {
    /// Number of block kinds (7).
    pub const LEN: usize = 7;

    /// All block kinds, in declaration order.
    pub const ALL: [BlockKind; Self::LEN] = [
        BlockKind::I,
        BlockKind::J,
        BlockKind::L,
        BlockKind::O,
        BlockKind::S,
        BlockKind::T,
        BlockKind::Z,
    ];

    /// Side length of the square bounding box the blueprint lives in.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            BlockKind::I => 4,
            BlockKind::O => 2,
            _ => 3,
        }
    }

    /// Cell value painted into the grid when a block of this kind locks.
    ///
    /// Zero is reserved for empty cells, so kinds map to `1..=7`.
    #[must_use]
    pub const fn color_id(self) -> u8 {
        self as u8 + 1
    }

    /// Returns the single character representation of this block kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            BlockKind::I => 'I',
            BlockKind::J => 'J',
            BlockKind::L => 'L',
            BlockKind::O => 'O',
            BlockKind::S => 'S',
            BlockKind::T => 'T',
            BlockKind::Z => 'Z',
        }
    }

    /// Parses a block kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(BlockKind::I),
            'J' => Some(BlockKind::J),
            'L' => Some(BlockKind::L),
            'O' => Some(BlockKind::O),
            'S' => Some(BlockKind::S),
            'T' => Some(BlockKind::T),
            'Z' => Some(BlockKind::Z),
            _ => None,
        }
    }

    const fn blueprint(self) -> &'static Blueprint {
        &BLUEPRINTS[self as usize]
    }
}

/// A block: one immutable shape blueprint per kind, plus a rotation state.
///
/// Rotation is a view transform, not a bitmap copy: [`Block::cell`] maps the
/// queried coordinate back into the shared blueprint with a pure coordinate
/// transform, so rotating never allocates.
///
/// # Coordinate system
///
/// Cell coordinates are local to the block's square bounding box, with `y`
/// growing upward (matching the playfield: row 0 is the bottom). Rotation
/// state `1` is one quarter turn clockwise as seen on screen, applied modulo
/// four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    rotation: u8,
}

impl Block {
    /// Creates a block of the given kind in its spawn rotation.
    #[must_use]
    pub const fn new(kind: BlockKind) -> Self {
        Self { kind, rotation: 0 }
    }

    #[must_use]
    pub const fn kind(self) -> BlockKind {
        self.kind
    }

    /// Current rotation state, always in `0..4`.
    #[must_use]
    pub const fn rotation(self) -> u8 {
        self.rotation
    }

    /// Bounding box side length (2 for O, 4 for I, 3 otherwise).
    #[must_use]
    pub const fn width(self) -> usize {
        self.kind.size()
    }

    /// Replaces the kind in place, resetting rotation to the spawn state.
    ///
    /// Blocks are reset rather than reallocated so that an observer holding
    /// on to a preview/hold slot keeps watching the same block.
    pub const fn set_kind(&mut self, kind: BlockKind) {
        self.kind = kind;
        self.rotation = 0;
    }

    /// Sets the rotation state, normalizing any integer into `0..4`.
    pub const fn set_rotation(&mut self, rotation: i32) {
        self.rotation = rotation.rem_euclid(4) as u8;
    }

    /// Whether the cell at `(x, y)` of the rotated view is filled.
    ///
    /// Coordinates outside the bounding box are empty.
    #[must_use]
    pub const fn cell(self, x: usize, y: usize) -> bool {
        let size = self.kind.size();
        if x >= size || y >= size {
            return false;
        }
        let (sx, sy) = source_index(x, y, self.rotation, size);
        self.kind.blueprint()[sy][sx]
    }

    /// Iterates over the filled cells of the rotated view as `(x, y)` pairs.
    pub fn filled_cells(self) -> impl Iterator<Item = (usize, usize)> {
        let size = self.kind.size();
        (0..size).flat_map(move |y| (0..size).filter_map(move |x| self.cell(x, y).then_some((x, y))))
    }
}

/// Maps a cell coordinate of the rotated view back to blueprint coordinates.
///
/// One quarter turn clockwise (with `y` up) sends `(x, y)` to
/// `(y, size - 1 - x)`; this applies the inverse `rotation` times.
const fn source_index(mut x: usize, mut y: usize, rotation: u8, size: usize) -> (usize, usize) {
    let mut i = 0;
    while i < rotation {
        let t = x;
        x = size - 1 - y;
        y = t;
        i += 1;
    }
    (x, y)
}

/// Shape blueprint in a 4×4 bounding box (smaller blocks use the lower-left
/// corner). Row 0 is the bottom row.
type Blueprint = [[bool; 4]; 4];

const BLUEPRINTS: [Blueprint; BlockKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    [
        // I-block
        [EEEE, EEEE, [C, C, C, C], EEEE],
        // J-block
        [EEEE, [C, C, C, E], [C, E, E, E], EEEE],
        // L-block
        [EEEE, [C, C, C, E], [E, E, C, E], EEEE],
        // O-block
        [[C, C, E, E], [C, C, E, E], EEEE, EEEE],
        // S-block
        [EEEE, [C, C, E, E], [E, C, C, E], EEEE],
        // T-block
        [EEEE, [C, C, C, E], [E, C, E, E], EEEE],
        // Z-block
        [EEEE, [E, C, C, E], [C, C, E, E], EEEE],
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(block: Block) -> Vec<(usize, usize)> {
        block.filled_cells().collect()
    }

    #[test]
    fn every_kind_has_four_cells_in_every_rotation() {
        for kind in BlockKind::ALL {
            let mut block = Block::new(kind);
            for rotation in 0..4 {
                block.set_rotation(rotation);
                assert_eq!(
                    block.filled_cells().count(),
                    4,
                    "{kind} at rotation {rotation}"
                );
            }
        }
    }

    #[test]
    fn t_block_spawns_pointing_up() {
        let block = Block::new(BlockKind::T);
        assert_eq!(cells(block), vec![(0, 1), (1, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn t_block_rotated_right_points_right() {
        let mut block = Block::new(BlockKind::T);
        block.set_rotation(1);
        assert_eq!(cells(block), vec![(1, 0), (1, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn t_block_rotated_twice_points_down() {
        let mut block = Block::new(BlockKind::T);
        block.set_rotation(2);
        assert_eq!(cells(block), vec![(1, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn i_block_rotated_right_is_vertical() {
        let mut block = Block::new(BlockKind::I);
        block.set_rotation(1);
        assert_eq!(cells(block), vec![(2, 0), (2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn o_block_is_rotation_invariant() {
        let mut block = Block::new(BlockKind::O);
        let spawn = cells(block);
        for rotation in 1..4 {
            block.set_rotation(rotation);
            assert_eq!(cells(block), spawn);
        }
    }

    #[test]
    fn rotation_is_normalized_into_range() {
        let mut block = Block::new(BlockKind::L);
        block.set_rotation(-1);
        assert_eq!(block.rotation(), 3);
        block.set_rotation(6);
        assert_eq!(block.rotation(), 2);
    }

    #[test]
    fn set_kind_resets_rotation() {
        let mut block = Block::new(BlockKind::S);
        block.set_rotation(2);
        block.set_kind(BlockKind::Z);
        assert_eq!(block.rotation(), 0);
        assert_eq!(block.kind(), BlockKind::Z);
    }

    #[test]
    fn kind_char_round_trip() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(BlockKind::from_char('X'), None);
    }

    #[test]
    fn kind_serde_round_trip() {
        for kind in BlockKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: BlockKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
        assert_eq!(serde_json::to_string(&BlockKind::T).unwrap(), "\"T\"");
    }

    #[test]
    fn color_ids_are_distinct_and_nonzero() {
        let mut seen = [false; 8];
        for kind in BlockKind::ALL {
            let id = kind.color_id() as usize;
            assert!(id >= 1 && id <= 7);
            assert!(!seen[id], "duplicate color id {id}");
            seen[id] = true;
        }
    }
}
