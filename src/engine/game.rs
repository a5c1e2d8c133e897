use std::fmt;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, GameObserver};
use super::grid::{Direction, Grid};
use super::line::{self, Score, Tile};
use crate::config::GameConfig;
use crate::error::EngineError;

/// Value of every spawned tile.
pub const SPAWN_VALUE: Tile = 2;

/// Top-level game state gating which inputs are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Normal,
    Won,
    Lost,
    /// Play continued after a win.
    Overtime,
}

impl Mode {
    /// `Won` (before continuing) and `Lost` ignore shifts.
    #[inline]
    pub fn accepts_shifts(self) -> bool {
        matches!(self, Mode::Normal | Mode::Overtime)
    }
}

/// Result of [`Game::shift`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOutcome {
    /// Tiles moved; one tile was spawned afterwards.
    Moved { score_delta: Score },
    /// No line changed. Nothing was modified and nothing spawned.
    Unchanged,
    /// The mode does not accept shifts. Nothing was modified.
    Rejected(Mode),
}

impl ShiftOutcome {
    #[inline]
    pub fn moved(&self) -> bool {
        matches!(self, ShiftOutcome::Moved { .. })
    }
}

/// Owned, read-only view of a game for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: usize,
    pub cells: Vec<Vec<Option<Tile>>>,
    pub score: Score,
    pub mode: Mode,
}

/// Grid, score and mode of one game, plus the observers watching it.
///
/// Randomness is never owned by the game: every operation that spawns a
/// tile takes the random source as an argument.
///
/// ```
/// use puzzle_2048::config::GameConfig;
/// use puzzle_2048::engine::{Direction, Game, Mode};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut game = Game::start(GameConfig::default(), &mut rng).unwrap();
/// assert_eq!(game.grid().count_empty(), 14);
/// for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
///     game.shift(dir, &mut rng).unwrap();
/// }
/// assert_eq!(game.mode(), Mode::Normal);
/// ```
pub struct Game {
    config: GameConfig,
    grid: Grid,
    score: Score,
    mode: Mode,
    observers: Vec<Box<dyn GameObserver>>,
}

impl Game {
    /// An empty game in `Normal` mode. Call [`Game::restart`] to place the
    /// opening tiles, or use [`Game::start`].
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = Grid::new(config.size)?;
        Ok(Game { config, grid, score: 0, mode: Mode::Normal, observers: Vec::new() })
    }

    /// A fresh game with the two opening tiles placed.
    pub fn start<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self, EngineError> {
        let mut game = Game::new(config)?;
        game.restart(rng)?;
        Ok(game)
    }

    /// A `Normal` game with score 0 around a prepared grid.
    pub fn from_grid(config: GameConfig, grid: Grid) -> Result<Self, EngineError> {
        config.validate()?;
        if grid.size() != config.size {
            return Err(EngineError::ShapeMismatch { expected: config.size, got: grid.size() });
        }
        Ok(Game { config, grid, score: 0, mode: Mode::Normal, observers: Vec::new() })
    }

    /// Register an observer; it receives every later event.
    pub fn subscribe<O: GameObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.score
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.grid.size(),
            cells: self.grid.rows(),
            score: self.score,
            mode: self.mode,
        }
    }

    /// Slide and merge every line toward `dir`, then spawn a tile and
    /// update the mode.
    ///
    /// Shifting in `Won` or `Lost` is ignored, and a shift that changes no
    /// line leaves the game untouched; neither is an error. The only error
    /// is a failed spawn, which a changing shift rules out.
    ///
    /// Two [`MAX_TILE`](super::line::MAX_TILE) tiles never merge, and the
    /// score saturates at `u64::MAX`.
    pub fn shift<R>(&mut self, dir: Direction, rng: &mut R) -> Result<ShiftOutcome, EngineError>
    where
        R: Rng + ?Sized,
    {
        if !self.mode.accepts_shifts() {
            debug!("shift {} ignored in mode {:?}", dir, self.mode);
            return Ok(ShiftOutcome::Rejected(self.mode));
        }
        let Some((lines, score_delta)) = self.plan_shift(dir) else {
            debug!("shift {} changed nothing", dir);
            return Ok(ShiftOutcome::Unchanged);
        };

        for (idx, merged) in lines.iter().enumerate() {
            self.grid.write_line(dir, idx, merged);
        }
        self.score = self.score.saturating_add(score_delta);
        debug!("shift {}: +{} (score {})", dir, score_delta, self.score);
        self.emit(GameEvent::Shifted { direction: dir, score_delta });
        if score_delta > 0 {
            self.emit(GameEvent::ScoreChanged { delta: score_delta, total: self.score });
        }

        if self.mode == Mode::Normal && self.grid.contains(self.config.target) {
            self.set_mode(Mode::Won);
        }
        self.spawn(rng)?;
        if !self.moves_available() {
            self.set_mode(Mode::Lost);
        }
        Ok(ShiftOutcome::Moved { score_delta })
    }

    /// True if shifting toward `dir` would change at least one line.
    pub fn can_shift(&self, dir: Direction) -> bool {
        (0..self.grid.size()).any(|idx| {
            let original = self.grid.read_line(dir, idx);
            let (merged, _) = line::compute(original.iter().copied());
            line::line_changed(&original, &merged)
        })
    }

    /// True if some direction has a legal shift. Every row and column is
    /// checked in both orientations.
    pub fn moves_available(&self) -> bool {
        Direction::ALL.into_iter().any(|dir| self.can_shift(dir))
    }

    /// Place a [`SPAWN_VALUE`] tile in a uniformly chosen empty cell and
    /// return its `(row, col)`.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(usize, usize), EngineError> {
        let empty = self.grid.count_empty();
        if empty == 0 {
            return Err(EngineError::NoEmptyCell);
        }
        let pick = rng.gen_range(0..empty);
        let idx = self.grid.empty_cells().nth(pick).ok_or(EngineError::NoEmptyCell)?;
        self.grid.set_index(idx, Some(SPAWN_VALUE));

        let size = self.grid.size();
        let (row, col) = (idx / size, idx % size);
        self.emit(GameEvent::TileSpawned { row, col, value: SPAWN_VALUE });
        Ok((row, col))
    }

    /// Clear the grid, reset score and mode, and place two tiles.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        let size = self.config.size;
        info!("restarting {}x{} game (previous score {})", size, size, self.score);
        self.grid.clear();
        self.score = 0;
        self.emit(GameEvent::Restarted);
        self.set_mode(Mode::Normal);
        self.spawn(rng)?;
        self.spawn(rng)?;
        Ok(())
    }

    /// Keep playing after a win (`Won -> Overtime`).
    ///
    /// Fails when the game has not been won, or when the configuration
    /// ends the game on a win.
    pub fn continue_play(&mut self) -> Result<(), EngineError> {
        match self.mode {
            Mode::Won if self.config.allow_overtime => {
                self.set_mode(Mode::Overtime);
                Ok(())
            }
            other => Err(EngineError::CannotContinue(other)),
        }
    }

    /// Merged lines and total score for `dir`, or `None` if nothing changes.
    fn plan_shift(&self, dir: Direction) -> Option<(Vec<Vec<Tile>>, Score)> {
        let size = self.grid.size();
        let mut lines = Vec::with_capacity(size);
        let mut score: Score = 0;
        let mut changed = false;
        for idx in 0..size {
            let original = self.grid.read_line(dir, idx);
            let (merged, line_score) = line::compute(original.iter().copied());
            changed |= line::line_changed(&original, &merged);
            score = score.saturating_add(line_score);
            lines.push(merged);
        }
        changed.then_some((lines, score))
    }

    fn set_mode(&mut self, to: Mode) {
        let from = self.mode;
        if from == to {
            return;
        }
        info!("mode {:?} -> {:?} at score {}", from, to, self.score);
        self.mode = to;
        self.emit(GameEvent::ModeChanged { from, to });
    }

    fn emit(&mut self, event: GameEvent) {
        for observer in self.observers.iter_mut() {
            observer.on_event(&event);
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("config", &self.config)
            .field("grid", &self.grid)
            .field("score", &self.score)
            .field("mode", &self.mode)
            .field("observers", &self.observers.len())
            .finish()
    }
}
