//! Grid transformation and game-state engine.
//!
//! - [`line`]: compaction and merging of a single oriented line
//! - [`grid`]: the N×N cell store, directions and the line coordinate transform
//! - [`game`]: score, mode state machine, spawning and win/loss evaluation
//! - [`events`]: notifications for views and score keepers
//!
//! The engine holds no randomness and does no I/O; spawning takes any
//! `rand::Rng` so games replay exactly from a seed.

pub mod events;
pub mod game;
pub mod grid;
pub mod line;

pub use events::{GameEvent, GameObserver};
pub use game::{Game, Mode, ShiftOutcome, Snapshot, SPAWN_VALUE};
pub use grid::{Axis, Direction, Grid};
pub use line::{compute, Score, Tile, MAX_TILE};
