//! Core data structures: block blueprints, the playfield grid, and the
//! wall-kick tables.

pub use self::{block::*, row::*, wallkick::*};

pub(crate) mod block;
pub(crate) mod row;
pub(crate) mod wallkick;

/// Playable field width in cells.
pub const FIELD_WIDTH: usize = 10;

/// Visible field height in cells.
pub const FIELD_HEIGHT: usize = 20;

/// Buffer rows above the visible top. Pieces may move through them freely,
/// but locking a cell inside the buffer ends the game.
pub const HIDDEN_ROWS: usize = 2;
