//! State-change notifications emitted by [`crate::engine::Game`].
//!
//! Observers run synchronously, after the change they describe has been
//! applied, so reading the game from inside a callback is never needed:
//! every event carries the data a view or a score keeper reacts to.

use super::game::Mode;
use super::grid::Direction;
use super::line::{Score, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Tiles moved toward `direction`. Sent for every changing shift,
    /// including ones without a merge (`score_delta == 0`).
    Shifted { direction: Direction, score_delta: Score },
    /// A shift merged tiles. `total` is the score after adding `delta`.
    ScoreChanged { delta: Score, total: Score },
    TileSpawned { row: usize, col: usize, value: Tile },
    ModeChanged { from: Mode, to: Mode },
    /// Grid cleared and score reset; the two opening spawns follow.
    Restarted,
}

/// Receiver of [`GameEvent`]s.
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> GameObserver for F
where
    F: FnMut(&GameEvent),
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}
