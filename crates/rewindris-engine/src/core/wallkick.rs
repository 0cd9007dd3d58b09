use arrayvec::ArrayVec;

/// Rotation direction for wall-kick lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDir {
    /// Rotate right (clockwise).
    Clockwise,
    /// Rotate left (counter-clockwise).
    CounterClockwise,
}

/// A candidate `(dx, dy)` translation tried alongside a rotation.
pub type KickOffset = (i32, i32);

/// Returns the ordered kick candidates for a block of the given bounding-box
/// `width` rotating out of `rotation` in direction `dir`.
///
/// The first candidate is always the zero offset (a pure rotation); O-blocks
/// have only that one. A width outside `{2, 3, 4}` or a rotation outside
/// `0..4` is a logic bug, not a runtime condition, and panics.
#[must_use]
pub fn kick_candidates(width: usize, rotation: u8, dir: RotationDir) -> ArrayVec<KickOffset, 5> {
    let by_width = match dir {
        RotationDir::Clockwise => &RIGHT_KICKS,
        RotationDir::CounterClockwise => &LEFT_KICKS,
    };
    let table = match width {
        2 => &by_width[0],
        3 => &by_width[1],
        4 => &by_width[2],
        _ => unreachable!("no wall-kick table for block width {width}"),
    };
    assert!(rotation < 4, "rotation state {rotation} out of range");
    table[rotation as usize].iter().copied().collect()
}

// O-blocks never kick.
const NO_KICK: &[KickOffset] = &[(0, 0)];

/// Kick tables for clockwise rotation, indexed by width class (2, 3, 4) and
/// then by source rotation state.
const RIGHT_KICKS: [[&[KickOffset]; 4]; 3] = [
    [NO_KICK, NO_KICK, NO_KICK, NO_KICK],
    [
        &[(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        &[(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        &[(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    [
        &[(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
        &[(0, 0), (-2, 0), (1, 0), (1, 2), (-2, -1)],
        &[(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
        &[(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -1)],
    ],
];

/// Kick tables for counter-clockwise rotation, same indexing as
/// [`RIGHT_KICKS`].
const LEFT_KICKS: [[&[KickOffset]; 4]; 3] = [
    [NO_KICK, NO_KICK, NO_KICK, NO_KICK],
    [
        &[(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        &[(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        &[(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    [
        &[(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
        &[(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -1)],
        &[(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
        &[(0, 0), (2, 0), (-1, 0), (-1, 2), (2, -1)],
    ],
];
