use std::{collections::VecDeque, fmt::Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::BlockKind;

/// 7-bag block randomizer.
///
/// Each "bag" is a random permutation of the seven block kinds, so every
/// kind appears exactly once per seven draws and no kind can drought for
/// long. As a genre-standard fairness rule, the first bag of a session is
/// rotated until it starts with an I, J, L, or T block.
///
/// The queue supports pushing a drawn kind back to the front, which is how
/// spawn events are undone during rewind: the RNG itself is never rewound,
/// but restoring the queue contents makes the future draw sequence identical
/// either way.
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    queue: VecDeque<BlockKind>,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceBag {
    /// Creates a bag with a random seed. For deterministic draws use
    /// [`Self::with_seed`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but seeded for a reproducible draw sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let rng = Pcg32::from_seed(seed.0);
        let mut this = Self {
            rng,
            queue: VecDeque::with_capacity(BlockKind::LEN * 2),
        };
        this.fill();

        // First block of the first bag is always I, J, L, or T. Rotating
        // only the leading 7 keeps every bag a full permutation.
        let first_bag = &mut this.queue.make_contiguous()[..BlockKind::LEN];
        while !matches!(
            first_bag[0],
            BlockKind::I | BlockKind::J | BlockKind::L | BlockKind::T
        ) {
            first_bag.rotate_left(1);
        }

        this
    }

    /// Tops the queue up with shuffled bags until a full bag of lookahead is
    /// available.
    fn fill(&mut self) {
        while self.queue.len() <= BlockKind::LEN {
            let mut bag = BlockKind::ALL;
            bag.shuffle(&mut self.rng);
            self.queue.extend(bag);
        }
    }

    /// Draws the next block kind.
    pub fn pop_next(&mut self) -> BlockKind {
        self.fill();
        self.queue
            .pop_front()
            .expect("piece bag is refilled before every draw")
    }

    /// Peeks at the kind the next [`Self::pop_next`] will return.
    pub fn peek_next(&mut self) -> BlockKind {
        self.fill();
        self.queue[0]
    }

    /// Returns a drawn kind to the front of the queue (rewind of a draw).
    pub(crate) fn push_front(&mut self, kind: BlockKind) {
        self.queue.push_front(kind);
    }
}

/// Seed for deterministic block generation.
///
/// A 128-bit seed for the piece RNG. Reusing a seed reproduces the same draw
/// sequence, which an outer layer can use for reproducible sessions and
/// deterministic tests. Serializes as a 32-character hex string.
#[derive(Debug, Clone, Copy)]
pub struct PieceSeed([u8; 16]);

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex = String::with_capacity(2 * self.0.len());
        write!(&mut hex, "{num:032x}").unwrap();
        serializer.serialize_str(&hex)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        if hex.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid seed: expected 32 hex characters, got {}",
                hex.len()
            )));
        }
        let num = u128::from_str_radix(&hex, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid seed: {hex} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn draw(bag: &mut PieceBag, n: usize) -> Vec<BlockKind> {
        (0..n).map(|_| bag.pop_next()).collect()
    }

    #[test]
    fn every_bag_is_a_permutation() {
        let mut bag = PieceBag::new();
        for _ in 0..10 {
            let kinds: HashSet<_> = draw(&mut bag, BlockKind::LEN).into_iter().collect();
            assert_eq!(kinds.len(), BlockKind::LEN);
        }
    }

    #[test]
    fn first_draw_of_a_session_is_i_j_l_or_t() {
        for _ in 0..50 {
            let mut bag = PieceBag::new();
            let first = bag.pop_next();
            assert!(
                matches!(
                    first,
                    BlockKind::I | BlockKind::J | BlockKind::L | BlockKind::T
                ),
                "got {first}"
            );
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let seed: PieceSeed = rand::rng().random();
        let mut a = PieceBag::with_seed(seed);
        let mut b = PieceBag::with_seed(seed);
        assert_eq!(draw(&mut a, 30), draw(&mut b, 30));
    }

    #[test]
    fn push_front_restores_the_draw_sequence() {
        let seed: PieceSeed = rand::rng().random();
        let mut bag = PieceBag::with_seed(seed);
        let expected = draw(&mut PieceBag::with_seed(seed), 10);

        let first = bag.pop_next();
        bag.push_front(first);
        assert_eq!(draw(&mut bag, 10), expected);
    }

    #[test]
    fn peek_matches_next_pop() {
        let mut bag = PieceBag::new();
        for _ in 0..20 {
            let peeked = bag.peek_next();
            assert_eq!(bag.pop_next(), peeked);
        }
    }

    #[test]
    fn seed_serializes_as_32_char_hex() {
        let seed: PieceSeed = rand::rng().random();
        let serialized = serde_json::to_string(&seed).unwrap();
        let hex = serialized.trim_matches('"');
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));

        let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(seed.0, deserialized.0);
    }

    #[test]
    fn seed_deserialization_rejects_bad_input() {
        assert!(serde_json::from_str::<PieceSeed>("\"zz\"").is_err());
        assert!(
            serde_json::from_str::<PieceSeed>("\"0123456789abcdef0123456789abcdeg\"").is_err()
        );
    }
}
