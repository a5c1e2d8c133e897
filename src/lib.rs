//! puzzle-2048: a sliding-tile merge puzzle engine
//!
//! This crate provides:
//! - A pure line merge (`engine::line::compute`) with classic single-pass semantics
//! - An N×N `Game` with score, win/loss state machine and injectable randomness (`engine` module)
//! - Change notifications for views and score keepers (`engine::events`)
//! - TOML configuration (`config`) and a file-backed best score (`best`)
//!
//! Quick start:
//! ```
//! use puzzle_2048::config::GameConfig;
//! use puzzle_2048::engine::{Direction, Game, Mode, ShiftOutcome};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut game = Game::start(GameConfig::default(), &mut rng).unwrap();
//!
//! match game.shift(Direction::Left, &mut rng).unwrap() {
//!     ShiftOutcome::Moved { score_delta } => assert!(game.score() >= score_delta),
//!     ShiftOutcome::Unchanged => assert_eq!(game.grid().count_empty(), 14),
//!     ShiftOutcome::Rejected(_) => unreachable!(),
//! }
//! assert_eq!(game.mode(), Mode::Normal);
//! ```
//!
//! Full loop with a score keeper
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use puzzle_2048::best::BestScore;
//! use puzzle_2048::config::GameConfig;
//! use puzzle_2048::engine::{Direction, Game, GameEvent, GameObserver};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let best = Rc::new(RefCell::new(BestScore::in_memory()));
//! let mut rng = StdRng::seed_from_u64(123);
//! let mut game = Game::start(GameConfig { size: 3, ..GameConfig::default() }, &mut rng).unwrap();
//! let keeper = best.clone();
//! game.subscribe(move |e: &GameEvent| keeper.borrow_mut().on_event(e));
//!
//! let mut moves = 0u32;
//! while game.moves_available() && game.mode().accepts_shifts() && moves < 50 {
//!     let dir = Direction::ALL[(moves % 4) as usize];
//!     game.shift(dir, &mut rng).unwrap();
//!     moves += 1;
//! }
//! assert_eq!(best.borrow().value(), game.score());
//! ```
//!
pub mod best;
pub mod config;
pub mod engine;
pub mod error;

pub use error::EngineError;
