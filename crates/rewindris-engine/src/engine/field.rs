use std::mem;

use arrayvec::ArrayVec;
use rand::Rng as _;

use crate::{
    InvalidFieldSizeError,
    core::{Block, BlockKind, FIELD_HEIGHT, FIELD_WIDTH, Grid, HIDDEN_ROWS},
};

use super::{
    bag::{PieceBag, PieceSeed},
    event::FieldEvent,
    falling::{FallingBlock, Motion},
    scoring,
    timeline::{Timeline, TimelineState},
};

/// A discrete player action, one per frame, as translated by an external
/// controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Left,
    Right,
    Down,
    Drop,
    RotateCw,
    RotateCcw,
    Hold,
    /// Hold-to-rewind control.
    Time,
}

/// Which block slot a [`FieldNotification::PieceChanged`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSlot {
    Falling,
    Next,
    Hold,
}

/// Synchronous change notifications for the presentation layer, pushed from
/// inside event apply/undo and consumed via [`Field::drain_notifications`].
///
/// Undo pushes the direction-preserving counterpart of what apply pushed
/// (`RowRestored` for `RowCleared`, `PointsRevoked` for `PointsEarned`,
/// `GameResumed` for `GameEnded`, `HoldCleared` when an undo empties the
/// hold slot), so a presentation layer can resync during rewind instead of
/// going stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNotification {
    PieceChanged { slot: BlockSlot, kind: BlockKind },
    /// The hold slot reverted to empty (undo of a session's first hold).
    HoldCleared,
    RowCleared { y: usize },
    RowRestored { y: usize },
    PointsEarned { points: u32 },
    PointsRevoked { points: u32 },
    GameEnded,
    GameResumed,
}

/// All mutable game state, separated from the [`Timeline`] so events can
/// borrow it mutably while the timeline drives them.
#[derive(Debug, Clone)]
pub(crate) struct FieldState {
    pub(crate) grid: Grid,
    pub(crate) falling: FallingBlock,
    pub(crate) next: Block,
    pub(crate) hold: Option<Block>,
    pub(crate) bag: PieceBag,
    pub(crate) lines_cleared: u32,
    pub(crate) score: u32,
    pub(crate) combo: u32,
    pub(crate) back_to_back: bool,
    pub(crate) hold_used: bool,
    pub(crate) ended: bool,
    pub(crate) notifications: Vec<FieldNotification>,
}

impl FieldState {
    pub(crate) fn notify(&mut self, notification: FieldNotification) {
        self.notifications.push(notification);
    }
}

/// The playfield: grid, falling block, previews, scoring, and the timeline
/// that makes all of it reversible.
///
/// Every mutation goes through a [`FieldEvent`](super::event::FieldEvent)
/// recorded on the timeline; the only public mutators are the operations
/// defined here and on the falling block, plus [`Field::update`] which
/// drives the clock.
#[derive(Debug, Clone)]
pub struct Field {
    state: FieldState,
    timeline: Timeline<FieldEvent>,
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

impl Field {
    /// Creates a standard 10×20 field (plus hidden buffer) with a random
    /// piece seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a deterministic piece seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_size(FIELD_WIDTH, FIELD_HEIGHT, seed).expect("default dimensions are valid")
    }

    /// Creates a field with custom visible dimensions. The hidden buffer is
    /// added on top of `visible_height`.
    pub fn with_size(
        width: usize,
        visible_height: usize,
        seed: PieceSeed,
    ) -> Result<Self, InvalidFieldSizeError> {
        if width == 0 || visible_height == 0 {
            return Err(InvalidFieldSizeError {
                width,
                height: visible_height,
            });
        }

        let mut bag = PieceBag::with_seed(seed);
        let first = bag.pop_next();
        let next = Block::new(bag.pop_next());
        let grid = Grid::new(width, visible_height + HIDDEN_ROWS);
        let (spawn_x, spawn_y) = spawn_position(&grid, first);

        Ok(Self {
            state: FieldState {
                falling: FallingBlock::spawned(first, spawn_x, spawn_y, 0.0),
                grid,
                next,
                hold: None,
                bag,
                lines_cleared: 0,
                score: 0,
                combo: 0,
                back_to_back: false,
                hold_used: false,
                ended: false,
                notifications: Vec::new(),
            },
            timeline: Timeline::new(),
        })
    }

    /// Advances one frame: the timeline first (forward or rewinding), then
    /// gravity and lock-delay handling while playing forward.
    ///
    /// After a game over the clock freezes; rewind requests still go
    /// through, and undoing the fatal lock resumes play.
    pub fn update(&mut self, elapsed: f64) {
        let rewinding = self.timeline.is_rewind_requested();
        if self.state.ended && !rewinding {
            return;
        }
        self.timeline.update(elapsed, &mut self.state);
        if rewinding || self.timeline.state().is_stopped() || self.state.ended {
            return;
        }
        self.step_falling();
    }

    /// Executes one discrete player action. Returns whether it had any
    /// effect. While the game is over, only [`Action::Time`] works.
    pub fn perform(&mut self, action: Action) -> bool {
        if self.state.ended && action != Action::Time {
            return false;
        }
        match action {
            Action::None => false,
            Action::Left => self.move_left(),
            Action::Right => self.move_right(),
            Action::Down => self.move_down(super::falling::DropKind::Soft),
            Action::Drop => {
                self.hard_drop();
                true
            }
            Action::RotateCw => self.rotate_right(),
            Action::RotateCcw => self.rotate_left(),
            Action::Hold => self.switch_holding_block(),
            Action::Time => {
                self.rewind_frame();
                true
            }
        }
    }

    /// Cell value at `(x, y)`: `-1` out of bounds, `0` empty, otherwise the
    /// locked block's color id. `y` grows upward from the floor.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> i32 {
        self.state.grid.cell(x, y)
    }

    /// Whether `block` placed with its bounding box at `(x, y)` overlaps a
    /// filled cell or leaves the grid. Pure query.
    #[must_use]
    pub fn collides(&self, block: Block, x: i32, y: i32) -> bool {
        block.filled_cells().any(|(bx, by)| {
            self.state.grid.cell(x + bx as i32, y + by as i32) != 0
        })
    }

    /// Where the falling block would come to rest on a hard drop.
    #[must_use]
    pub fn ghost_position(&self) -> (i32, i32) {
        let falling = &self.state.falling;
        let mut y = falling.y;
        while !self.collides(falling.block, falling.x, y - 1) {
            y -= 1;
        }
        (falling.x, y)
    }

    /// Commits the falling block into the grid, clears any completed rows,
    /// applies the lock's scoring atomically, and spawns the next block
    /// (unless the lock ended the game). No-op while the game is over.
    pub fn lock_falling(&mut self) {
        if self.state.ended {
            return;
        }
        let falling = self.state.falling;
        let visible_top = (self.state.grid.height() - HIDDEN_ROWS) as i32;

        let cells: ArrayVec<(i32, i32), 4> = falling
            .block
            .filled_cells()
            .map(|(bx, by)| (falling.x + bx as i32, falling.y + by as i32))
            .collect();
        let ends_game = cells.iter().any(|&(_, y)| y >= visible_top);

        // T-spin classification reads diagonal occupancy before any row is
        // removed.
        let tspin = self.is_tspin_lock();
        let level = self.level();

        self.record(FieldEvent::Lock {
            cells,
            color: falling.block.kind().color_id(),
            ends_game,
        });

        // Scan bottom-to-top; each removal shifts the rows above down, so
        // the index only advances past non-full rows.
        let mut cleared = 0_usize;
        let mut y = 0;
        while y < self.state.grid.height() {
            if self.state.grid.row(y).is_full() {
                let snapshot = self.state.grid.row(y).cells().to_vec();
                self.record(FieldEvent::ClearRow { y, cells: snapshot });
                cleared += 1;
            } else {
                y += 1;
            }
        }

        let mut clear_points = if tspin {
            scoring::tspin_points(cleared, level)
        } else {
            scoring::clear_lines_points(cleared, level)
        };
        let difficult = scoring::is_difficult(cleared, tspin);
        if difficult && self.state.back_to_back {
            clear_points = scoring::back_to_back(clear_points);
        }
        let new_combo = if cleared > 0 { self.state.combo + 1 } else { 0 };
        let new_back_to_back = if cleared > 0 {
            difficult
        } else {
            self.state.back_to_back
        };
        let points = falling.points + clear_points + scoring::combo_points(new_combo, level);

        if points > 0
            || cleared > 0
            || new_combo != self.state.combo
            || new_back_to_back != self.state.back_to_back
        {
            self.record(FieldEvent::Score {
                points,
                lines: cleared as u32,
                prev_score: self.state.score,
                prev_combo: self.state.combo,
                new_combo,
                prev_back_to_back: self.state.back_to_back,
                new_back_to_back,
            });
        }

        if !ends_game {
            self.spawn_next();
        }
    }

    /// Swaps the falling block with the hold slot (stashing into an empty
    /// slot draws a replacement from the bag). One hold per piece; the gate
    /// resets when a piece locks.
    pub fn switch_holding_block(&mut self) -> bool {
        if self.state.hold_used || self.state.ended {
            return false;
        }
        let prev = self.state.falling;
        let prev_held = self.state.hold.map(Block::kind);
        let (kind, drew_from_bag) = match prev_held {
            Some(held) => (held, false),
            None => (self.state.bag.peek_next(), true),
        };
        let (spawn_x, spawn_y) = spawn_position(&self.state.grid, kind);
        self.record(FieldEvent::Hold {
            prev,
            kind,
            prev_held,
            drew_from_bag,
            spawn_x,
            spawn_y,
            time: self.current_time(),
        });
        true
    }

    fn spawn_next(&mut self) {
        let kind = self.state.next.kind();
        let next_kind = self.state.bag.peek_next();
        let (spawn_x, spawn_y) = spawn_position(&self.state.grid, kind);
        self.record(FieldEvent::Spawn {
            prev: self.state.falling,
            kind,
            next_kind,
            prev_hold_used: self.state.hold_used,
            spawn_x,
            spawn_y,
            time: self.current_time(),
        });
    }

    /// A lock counts as a T-spin when a T-block's last motion was a
    /// rotation, it is boxed in (cannot translate), and at least three of
    /// the four diagonal neighbors of its center are occupied.
    fn is_tspin_lock(&self) -> bool {
        let falling = &self.state.falling;
        if falling.block.kind() != BlockKind::T {
            return false;
        }
        if !matches!(falling.last_motion, Motion::Rotation { .. }) {
            return false;
        }
        if self.can_move(-1, 0) || self.can_move(1, 0) || self.can_move(0, -1) {
            return false;
        }
        let (cx, cy) = (falling.x + 1, falling.y + 1);
        let corners = [
            (cx - 1, cy - 1),
            (cx + 1, cy - 1),
            (cx - 1, cy + 1),
            (cx + 1, cy + 1),
        ];
        corners
            .iter()
            .filter(|&&(x, y)| self.state.grid.cell(x, y) != 0)
            .count()
            >= 3
    }

    // --- rewind and clock controls -------------------------------------

    /// Requests one frame's worth of rewind, consumed by the next
    /// [`Field::update`].
    pub fn rewind_frame(&mut self) {
        self.timeline.rewind_frame();
    }

    /// Resets the ramped rewind speed; call when the rewind control is
    /// released.
    pub fn stop_rewinding(&mut self) {
        self.timeline.reset_rewind_speed();
    }

    /// Freezes the clock (pause).
    pub fn stop(&mut self) {
        self.timeline.stop();
    }

    /// Unfreezes the clock.
    pub fn resume(&mut self) {
        self.timeline.resume();
    }

    #[must_use]
    pub fn timeline_state(&self) -> TimelineState {
        self.timeline.state()
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.timeline.current_time()
    }

    /// Number of events in the rewindable history.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.timeline.history_len()
    }

    // --- read-only queries ----------------------------------------------

    #[must_use]
    pub fn width(&self) -> usize {
        self.state.grid.width()
    }

    /// Visible height, excluding the hidden buffer.
    #[must_use]
    pub fn visible_height(&self) -> usize {
        self.state.grid.height() - HIDDEN_ROWS
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Current level: one step per ten cleared lines, starting at 1.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.state.lines_cleared / 10 + 1
    }

    #[must_use]
    pub fn lines_cleared(&self) -> u32 {
        self.state.lines_cleared
    }

    #[must_use]
    pub fn current_combo(&self) -> u32 {
        self.state.combo
    }

    #[must_use]
    pub fn is_back_to_back_enabled(&self) -> bool {
        self.state.back_to_back
    }

    #[must_use]
    pub fn has_ended(&self) -> bool {
        self.state.ended
    }

    #[must_use]
    pub fn falling(&self) -> &FallingBlock {
        &self.state.falling
    }

    #[must_use]
    pub fn next_kind(&self) -> BlockKind {
        self.state.next.kind()
    }

    #[must_use]
    pub fn held_kind(&self) -> Option<BlockKind> {
        self.state.hold.map(Block::kind)
    }

    /// Takes all notifications accumulated since the last drain, in the
    /// order they fired.
    pub fn drain_notifications(&mut self) -> Vec<FieldNotification> {
        mem::take(&mut self.state.notifications)
    }

    // --- internal --------------------------------------------------------

    pub(crate) fn state(&self) -> &FieldState {
        &self.state
    }

    pub(crate) fn record(&mut self, event: FieldEvent) -> f64 {
        self.timeline.record(event, &mut self.state)
    }
}

/// SRS spawn position: horizontally centered with the 3-wide blocks nudged
/// one column left (I spans columns 3-6, O spans 4-5, the rest span 3-5 on a
/// standard field), bounding box flush with the grid top.
fn spawn_position(grid: &Grid, kind: BlockKind) -> (i32, i32) {
    let size = kind.size();
    let nudge = i32::from(size == 3);
    let x = (grid.width() / 2) as i32 - (size / 2) as i32 - nudge;
    let y = grid.height() as i32 - size as i32;
    (x, y)
}
