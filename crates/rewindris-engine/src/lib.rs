//! Rewindris engine: a falling-block puzzle simulation with a fully
//! reversible timeline.
//!
//! Every state mutation (movement, rotation, locking, line clears, scoring,
//! hold swaps) is recorded as a reversible event on a [`Timeline`], so the
//! game can be rewound continuously to any earlier point and resumed from
//! there. The engine is a pure library: rendering, audio, and input polling
//! are external consumers of its read-only queries and its notification
//! queue.
//!
//! # Example
//!
//! ```
//! use rewindris_engine::{Action, Field};
//!
//! let mut field = Field::new();
//!
//! // One frame of forward play.
//! field.perform(Action::Left);
//! field.perform(Action::RotateCw);
//! field.update(1.0 / 60.0);
//!
//! // Hold the rewind control to play history backwards.
//! field.rewind_frame();
//! field.update(1.0 / 60.0);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("field dimensions must be nonzero (got {width}x{height})")]
pub struct InvalidFieldSizeError {
    pub width: usize,
    pub height: usize,
}
