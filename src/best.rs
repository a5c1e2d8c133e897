//! Best-score bookkeeping.
//!
//! The best score lives outside the engine: it is loaded once, fed by
//! [`GameEvent::ScoreChanged`] and written back whenever it is beaten. The
//! file holds a single decimal number. Storage failures are logged and
//! never reach the game.

use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::engine::{GameEvent, GameObserver, Score};

#[derive(thiserror::Error, Debug)]
pub enum BestScoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed best score: {0}")]
    Parse(#[from] ParseIntError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BestScore {
    path: Option<PathBuf>,
    value: Score,
}

impl BestScore {
    /// A best score that is never persisted.
    pub fn in_memory() -> Self {
        BestScore::default()
    }

    /// Load from `path`, starting at 0 when the file is missing or unreadable.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let value = match read_score(&path) {
            Ok(v) => v,
            Err(BestScoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                warn!("ignoring best score file {}: {}", path.display(), e);
                0
            }
        };
        BestScore { path: Some(path), value }
    }

    #[inline]
    pub fn value(&self) -> Score {
        self.value
    }

    /// Record `score`; persists and returns true if it beats the best.
    pub fn observe(&mut self, score: Score) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        if let Err(e) = self.save() {
            warn!("failed to save best score: {}", e);
        }
        true
    }

    pub fn save(&self) -> Result<(), BestScoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.value.to_string())?;
        debug!("best score {} written to {}", self.value, path.display());
        Ok(())
    }
}

impl GameObserver for BestScore {
    fn on_event(&mut self, event: &GameEvent) {
        if let GameEvent::ScoreChanged { total, .. } = event {
            self.observe(*total);
        }
    }
}

fn read_score(path: &Path) -> Result<Score, BestScoreError> {
    let text = fs::read_to_string(path)?;
    Ok(text.trim().parse()?)
}
