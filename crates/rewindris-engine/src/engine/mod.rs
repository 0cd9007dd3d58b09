//! Game engine logic and state management.
//!
//! This module provides the high-level game logic that orchestrates the core
//! data structures into a rewindable falling-block game:
//!
//! - [`Field`] - The playfield: grid, falling block, previews, and scoring
//! - [`FallingBlock`] - The active piece and its motion bookkeeping
//! - [`Timeline`] - The reversible event log and game clock
//! - [`PieceBag`] / [`PieceSeed`] - Deterministic 7-bag piece generation
//! - [`scoring`] - Point values and scoring rules
//!
//! # Game Flow
//!
//! A typical game progresses as follows:
//!
//! 1. Initialize a [`Field`] with a random seed
//! 2. Feed player input via [`Field::perform`] (move, rotate, hold, drop)
//! 3. Call [`Field::update`] once per frame to drive gravity and locking
//! 4. Completed rows clear, points accrue, and the next block spawns
//! 5. Hold [`Action::Time`] to rewind any of it, including a top-out
//!
//! Every mutation is recorded as a reversible event, so rewinding restores
//! the exact prior state: grid contents, score, combo, previews, and the
//! falling block's position all walk backwards together.
//!
//! # Example
//!
//! ```
//! use rewindris_engine::{Action, Field};
//!
//! let mut field = Field::new();
//!
//! field.perform(Action::Left);
//! field.perform(Action::RotateCw);
//! field.perform(Action::Drop);
//!
//! // Regret it.
//! while field.history_len() > 0 {
//!     field.perform(Action::Time);
//!     field.update(1.0 / 60.0);
//! }
//! ```

pub use self::{bag::*, falling::*, field::*, timeline::*};

mod bag;
mod event;
mod falling;
mod field;
pub mod scoring;
mod timeline;
