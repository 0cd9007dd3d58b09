use arrayvec::ArrayVec;

use crate::core::{Block, BlockKind, Row};

use super::{
    falling::{FallingBlock, Motion},
    field::{BlockSlot, FieldNotification, FieldState},
    timeline::Reversible,
};

/// A reversible mutation of the field state.
///
/// Events are the command-pattern rendering of the apply/undo closure pair:
/// each variant captures the exact prior values it overwrites (timestamps,
/// score, row snapshots), so `undo` restores state byte-for-byte instead of
/// recomputing it. Events are applied exactly once, when recorded, and
/// undone at most once, during rewind.
#[derive(Debug, Clone)]
pub(crate) enum FieldEvent {
    /// Successful translation of the falling block.
    Move {
        dx: i32,
        dy: i32,
        /// Drop points credited to the falling block for this step.
        points: u32,
        moved_down: bool,
        new_time: f64,
        prev_last_move_time: f64,
        prev_last_move_down_time: f64,
        prev_motion: Motion,
    },
    /// Successful rotation, possibly displaced by a wall kick.
    Rotate {
        from: u8,
        to: u8,
        dx: i32,
        dy: i32,
        kicked: bool,
        new_time: f64,
        prev_last_move_time: f64,
        prev_motion: Motion,
    },
    /// The falling block is committed into the grid.
    Lock {
        cells: ArrayVec<(i32, i32), 4>,
        color: u8,
        ends_game: bool,
    },
    /// A full row is removed; `cells` is its snapshot for reinsertion.
    ClearRow { y: usize, cells: Vec<u8> },
    /// Score, combo, back-to-back, and the cleared-line counter move
    /// together so partial rewind can never observe them out of sync.
    Score {
        points: u32,
        lines: u32,
        prev_score: u32,
        prev_combo: u32,
        new_combo: u32,
        prev_back_to_back: bool,
        new_back_to_back: bool,
    },
    /// The next block becomes the falling block; a fresh kind is drawn.
    Spawn {
        prev: FallingBlock,
        kind: BlockKind,
        next_kind: BlockKind,
        prev_hold_used: bool,
        spawn_x: i32,
        spawn_y: i32,
        time: f64,
    },
    /// The falling block swaps with the hold slot (or stashes into an empty
    /// one, drawing a replacement from the bag).
    Hold {
        prev: FallingBlock,
        kind: BlockKind,
        prev_held: Option<BlockKind>,
        drew_from_bag: bool,
        spawn_x: i32,
        spawn_y: i32,
        time: f64,
    },
}

impl Reversible for FieldEvent {
    type State = FieldState;

    fn apply(&self, state: &mut FieldState) {
        match *self {
            FieldEvent::Move {
                dx,
                dy,
                points,
                moved_down,
                new_time,
                ..
            } => {
                let falling = &mut state.falling;
                falling.x += dx;
                falling.y += dy;
                falling.points += points;
                falling.last_move_time = new_time;
                if moved_down {
                    falling.last_move_down_time = new_time;
                }
                falling.last_motion = Motion::Translation;
            }
            FieldEvent::Rotate {
                to,
                dx,
                dy,
                kicked,
                new_time,
                ..
            } => {
                let falling = &mut state.falling;
                falling.block.set_rotation(i32::from(to));
                falling.x += dx;
                falling.y += dy;
                falling.last_move_time = new_time;
                falling.last_motion = Motion::Rotation { kicked };
            }
            FieldEvent::Lock {
                ref cells,
                color,
                ends_game,
            } => {
                for &(x, y) in cells {
                    state.grid.set_cell(x as usize, y as usize, color);
                }
                if ends_game {
                    state.ended = true;
                    state.notify(FieldNotification::GameEnded);
                }
            }
            FieldEvent::ClearRow { y, .. } => {
                state.grid.remove_row(y);
                state.notify(FieldNotification::RowCleared { y });
            }
            FieldEvent::Score {
                points,
                lines,
                prev_score,
                new_combo,
                new_back_to_back,
                ..
            } => {
                state.score = prev_score + points;
                state.lines_cleared += lines;
                state.combo = new_combo;
                state.back_to_back = new_back_to_back;
                state.notify(FieldNotification::PointsEarned { points });
            }
            FieldEvent::Spawn {
                kind,
                next_kind,
                spawn_x,
                spawn_y,
                time,
                ..
            } => {
                let drawn = state.bag.pop_next();
                debug_assert_eq!(drawn, next_kind, "spawn event replays a stale draw");
                state.falling = FallingBlock::spawned(kind, spawn_x, spawn_y, time);
                state.next.set_kind(next_kind);
                state.hold_used = false;
                state.notify(FieldNotification::PieceChanged {
                    slot: BlockSlot::Falling,
                    kind,
                });
                state.notify(FieldNotification::PieceChanged {
                    slot: BlockSlot::Next,
                    kind: next_kind,
                });
            }
            FieldEvent::Hold {
                ref prev,
                kind,
                drew_from_bag,
                spawn_x,
                spawn_y,
                time,
                ..
            } => {
                if drew_from_bag {
                    let drawn = state.bag.pop_next();
                    debug_assert_eq!(drawn, kind, "hold event replays a stale draw");
                }
                state.hold = Some(Block::new(prev.block.kind()));
                state.falling = FallingBlock::spawned(kind, spawn_x, spawn_y, time);
                state.hold_used = true;
                state.notify(FieldNotification::PieceChanged {
                    slot: BlockSlot::Falling,
                    kind,
                });
                state.notify(FieldNotification::PieceChanged {
                    slot: BlockSlot::Hold,
                    kind: prev.block.kind(),
                });
            }
        }
    }

    fn undo(&self, state: &mut FieldState) {
        match *self {
            FieldEvent::Move {
                dx,
                dy,
                points,
                moved_down,
                prev_last_move_time,
                prev_last_move_down_time,
                prev_motion,
                ..
            } => {
                let falling = &mut state.falling;
                falling.x -= dx;
                falling.y -= dy;
                falling.points -= points;
                falling.last_move_time = prev_last_move_time;
                if moved_down {
                    falling.last_move_down_time = prev_last_move_down_time;
                }
                falling.last_motion = prev_motion;
            }
            FieldEvent::Rotate {
                from,
                dx,
                dy,
                prev_last_move_time,
                prev_motion,
                ..
            } => {
                let falling = &mut state.falling;
                falling.block.set_rotation(i32::from(from));
                falling.x -= dx;
                falling.y -= dy;
                falling.last_move_time = prev_last_move_time;
                falling.last_motion = prev_motion;
            }
            FieldEvent::Lock {
                ref cells,
                ends_game,
                ..
            } => {
                for &(x, y) in cells {
                    state.grid.set_cell(x as usize, y as usize, 0);
                }
                if ends_game {
                    state.ended = false;
                    state.notify(FieldNotification::GameResumed);
                }
            }
            FieldEvent::ClearRow { y, ref cells } => {
                state.grid.insert_row(y, Row::from_cells(cells.clone()));
                state.notify(FieldNotification::RowRestored { y });
            }
            FieldEvent::Score {
                points,
                lines,
                prev_score,
                prev_combo,
                prev_back_to_back,
                ..
            } => {
                state.score = prev_score;
                state.lines_cleared -= lines;
                state.combo = prev_combo;
                state.back_to_back = prev_back_to_back;
                state.notify(FieldNotification::PointsRevoked { points });
            }
            FieldEvent::Spawn {
                ref prev,
                kind,
                next_kind,
                prev_hold_used,
                ..
            } => {
                state.bag.push_front(next_kind);
                state.next.set_kind(kind);
                state.falling = *prev;
                state.hold_used = prev_hold_used;
                state.notify(FieldNotification::PieceChanged {
                    slot: BlockSlot::Falling,
                    kind: prev.block.kind(),
                });
                state.notify(FieldNotification::PieceChanged {
                    slot: BlockSlot::Next,
                    kind,
                });
            }
            FieldEvent::Hold {
                ref prev,
                kind,
                prev_held,
                drew_from_bag,
                ..
            } => {
                if drew_from_bag {
                    state.bag.push_front(kind);
                }
                state.hold = prev_held.map(Block::new);
                state.falling = *prev;
                state.hold_used = false;
                state.notify(FieldNotification::PieceChanged {
                    slot: BlockSlot::Falling,
                    kind: prev.block.kind(),
                });
                match prev_held {
                    Some(held) => state.notify(FieldNotification::PieceChanged {
                        slot: BlockSlot::Hold,
                        kind: held,
                    }),
                    None => state.notify(FieldNotification::HoldCleared),
                }
            }
        }
    }
}
