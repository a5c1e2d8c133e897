use crate::engine::Mode;

/// Errors raised by the engine for precondition violations and bad input.
///
/// Shifting in a terminal mode and shifting without any effect are not
/// errors; see [`crate::engine::ShiftOutcome`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),
    #[error("cannot spawn a tile: no empty cell")]
    NoEmptyCell,
    #[error("invalid grid size {0} (must be at least 2)")]
    InvalidGridSize(usize),
    #[error("invalid tile value {0} (must be a power of two >= 2)")]
    InvalidTile(u64),
    #[error("invalid target value {0} (must be a power of two >= 4)")]
    InvalidTarget(u64),
    #[error("grid shape mismatch: expected {expected} cells per line, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
    #[error("cannot continue play from mode {0:?}")]
    CannotContinue(Mode),
}
