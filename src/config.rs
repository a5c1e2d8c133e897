use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::Tile;
use crate::error::EngineError;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Game(#[from] EngineError),
}

/// Rules of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length N of the grid.
    #[serde(default = "defaults::size")]
    pub size: usize,
    /// Tile value that wins the game.
    #[serde(default = "defaults::target")]
    pub target: Tile,
    /// Allow play to continue after a win. When false, reaching the
    /// target ends the game.
    #[serde(default = "defaults::allow_overtime")]
    pub allow_overtime: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: defaults::size(),
            target: defaults::target(),
            allow_overtime: defaults::allow_overtime(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.size < 2 {
            return Err(EngineError::InvalidGridSize(self.size));
        }
        if self.target < 4 || !self.target.is_power_of_two() {
            return Err(EngineError::InvalidTarget(self.target));
        }
        Ok(())
    }
}

/// Runner configuration, usually read from a TOML file.
///
/// ```
/// use puzzle_2048::config::Config;
/// let cfg = Config::from_toml_str("seed = 5\n[game]\nsize = 3\n").unwrap();
/// assert_eq!(cfg.game.size, 3);
/// assert_eq!(cfg.game.target, 2048);
/// assert_eq!(cfg.seed, Some(5));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    /// File holding the best score, `high_score` in the working directory
    /// unless set. `None` keeps it in memory only.
    #[serde(default = "defaults::best_score_path")]
    pub best_score_path: Option<PathBuf>,
    /// Seed for tile spawns. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            best_score_path: defaults::best_score_path(),
            seed: None,
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.game.validate()?;
        Ok(cfg)
    }
}

mod defaults {
    use std::path::PathBuf;

    use crate::engine::Tile;

    pub fn size() -> usize {
        4
    }

    pub fn target() -> Tile {
        2048
    }

    pub fn allow_overtime() -> bool {
        true
    }

    pub fn best_score_path() -> Option<PathBuf> {
        Some(PathBuf::from("high_score"))
    }
}
