use crate::core::{Block, BlockKind, RotationDir, kick_candidates};

use super::{event::FieldEvent, field::Field, scoring};

/// Cap on gravity speed, in cells per second.
pub const MAX_DOWN_SPEED: f64 = 20.0;

/// Shortest allowed lock delay, in seconds.
pub const MIN_LOCK_TIME: f64 = 0.25;

/// Lock delay at level 1, in seconds; shrinks with level.
pub const MAX_LOCK_TIME: f64 = 1.0;

/// How the last successful motion of the falling block came about. Locks
/// immediately after a rotation are candidates for T-spin scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    None,
    Translation,
    Rotation { kicked: bool },
}

/// The active piece: a block plus its grid position and motion bookkeeping.
///
/// There is one live falling block per session; its contents are replaced in
/// place on every spawn so external observers keep a stable subject. `(x, y)`
/// is the lower-left corner of the block's bounding box, and `y` grows
/// upward. Points earned while this piece falls (soft/hard drop cells)
/// accumulate here and are folded into the lock scoring event.
#[derive(Debug, Clone, Copy)]
pub struct FallingBlock {
    pub(crate) block: Block,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) points: u32,
    pub(crate) last_move_time: f64,
    pub(crate) last_move_down_time: f64,
    pub(crate) last_motion: Motion,
}

impl FallingBlock {
    pub(crate) fn spawned(kind: BlockKind, x: i32, y: i32, time: f64) -> Self {
        Self {
            block: Block::new(kind),
            x,
            y,
            points: 0,
            last_move_time: time,
            last_move_down_time: time,
            last_motion: Motion::None,
        }
    }

    #[must_use]
    pub fn block(&self) -> Block {
        self.block
    }

    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.block.kind()
    }

    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.block.rotation()
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Drop points accumulated while controlling this piece.
    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn last_motion(&self) -> Motion {
        self.last_motion
    }
}

/// What is pushing the falling block down, which decides the points per
/// dropped cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    /// Automatic gravity; no points.
    Gravity,
    /// Player-initiated soft drop.
    Soft,
    /// Hard drop.
    Hard,
}

impl DropKind {
    fn cell_points(self) -> u32 {
        match self {
            DropKind::Gravity => 0,
            DropKind::Soft => scoring::SOFT_DROP,
            DropKind::Hard => scoring::HARD_DROP,
        }
    }
}

impl Field {
    /// Attempts to move the falling block one cell left.
    pub fn move_left(&mut self) -> bool {
        self.translate(-1, 0, DropKind::Gravity)
    }

    /// Attempts to move the falling block one cell right.
    pub fn move_right(&mut self) -> bool {
        self.translate(1, 0, DropKind::Gravity)
    }

    /// Attempts to move the falling block one cell down, awarding drop
    /// points per `drop`.
    pub fn move_down(&mut self, drop: DropKind) -> bool {
        self.translate(0, -1, drop)
    }

    /// Hard-drops the falling block to the floor and locks it.
    pub fn hard_drop(&mut self) {
        while self.move_down(DropKind::Hard) {}
        self.lock_falling();
    }

    /// Attempts to rotate the falling block clockwise, trying wall kicks.
    pub fn rotate_right(&mut self) -> bool {
        self.rotate(RotationDir::Clockwise)
    }

    /// Attempts to rotate the falling block counter-clockwise, trying wall
    /// kicks.
    pub fn rotate_left(&mut self) -> bool {
        self.rotate(RotationDir::CounterClockwise)
    }

    fn translate(&mut self, dx: i32, dy: i32, drop: DropKind) -> bool {
        if self.state().ended || !self.can_move(dx, dy) {
            return false;
        }
        let falling = self.state().falling;
        let points = if dy < 0 { drop.cell_points() } else { 0 };
        self.record(FieldEvent::Move {
            dx,
            dy,
            points,
            moved_down: dy < 0,
            new_time: self.current_time(),
            prev_last_move_time: falling.last_move_time,
            prev_last_move_down_time: falling.last_move_down_time,
            prev_motion: falling.last_motion,
        });
        true
    }

    /// Tries each wall-kick candidate in table order and commits the first
    /// collision-free placement. With no fit, the rotation is abandoned and
    /// no event is recorded.
    fn rotate(&mut self, dir: RotationDir) -> bool {
        if self.state().ended {
            return false;
        }
        let falling = self.state().falling;
        let from = falling.block.rotation();
        let to = match dir {
            RotationDir::Clockwise => (from + 1) % 4,
            RotationDir::CounterClockwise => (from + 3) % 4,
        };
        let mut candidate = falling.block;
        candidate.set_rotation(i32::from(to));

        for (dx, dy) in kick_candidates(candidate.width(), from, dir) {
            if self.collides(candidate, falling.x + dx, falling.y + dy) {
                continue;
            }
            self.record(FieldEvent::Rotate {
                from,
                to,
                dx,
                dy,
                kicked: (dx, dy) != (0, 0),
                new_time: self.current_time(),
                prev_last_move_time: falling.last_move_time,
                prev_motion: falling.last_motion,
            });
            return true;
        }
        false
    }

    pub(crate) fn can_move(&self, dx: i32, dy: i32) -> bool {
        let falling = &self.state().falling;
        !self.collides(falling.block, falling.x + dx, falling.y + dy)
    }

    /// Per-frame gravity and lock-delay bookkeeping. Only called while the
    /// timeline is advancing forward and the game has not ended.
    pub(crate) fn step_falling(&mut self) {
        let now = self.current_time();
        let level = f64::from(self.level());

        let gravity_interval = 1.0 / level.min(MAX_DOWN_SPEED);
        if now - self.state().falling.last_move_down_time > gravity_interval {
            self.move_down(DropKind::Gravity);
        }

        let lock_delay = MIN_LOCK_TIME.max(MAX_LOCK_TIME / level);
        if now - self.state().falling.last_move_time > lock_delay && !self.can_move(0, -1) {
            self.lock_falling();
        }
    }
}
