use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rayon::prelude::*;

use puzzle_2048::config::GameConfig;
use puzzle_2048::engine::{Direction, Game, GameEvent, Mode, Score, Tile};
use puzzle_2048::EngineError;

#[derive(Debug, Parser)]
#[command(name = "selfplay", about = "Play random-policy games in parallel and report statistics")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 1000)]
    games: u64,

    /// Grid side length
    #[arg(long, default_value_t = 4)]
    size: usize,

    /// Winning tile value
    #[arg(long, default_value_t = 2048)]
    target: u64,

    /// Base seed; game i is seeded with seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop each game after this many moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Number of worker threads (defaults to Rayon default)
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GameResult {
    score: Score,
    moves: u64,
    highest: Tile,
    won: bool,
}

/// Play one game, choosing uniformly among the legal directions. A win
/// is recorded and play continues in overtime.
fn play_one(
    config: &GameConfig,
    seed: u64,
    max_moves: Option<u64>,
) -> Result<GameResult, EngineError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::start(config.clone(), &mut rng)?;
    let won = Rc::new(Cell::new(false));
    let flag = won.clone();
    game.subscribe(move |e: &GameEvent| {
        if let GameEvent::ModeChanged { to: Mode::Won, .. } = e {
            flag.set(true);
        }
    });

    let mut moves = 0u64;
    loop {
        if game.mode() == Mode::Won {
            game.continue_play()?;
        }
        if !game.mode().accepts_shifts() || max_moves.is_some_and(|m| moves >= m) {
            break;
        }
        let legal: Vec<Direction> =
            Direction::ALL.into_iter().filter(|&d| game.can_shift(d)).collect();
        let Some(&dir) = legal.choose(&mut rng) else { break };
        game.shift(dir, &mut rng)?;
        moves += 1;
    }

    Ok(GameResult {
        score: game.score(),
        moves,
        highest: game.grid().highest_tile().unwrap_or(0),
        won: won.get(),
    })
}

#[derive(Debug, Default)]
struct Summary {
    games: u64,
    wins: u64,
    total_score: u64,
    max_score: Score,
    total_moves: u64,
    highest_tiles: BTreeMap<Tile, u64>,
}

impl Summary {
    fn from_results(results: &[GameResult]) -> Self {
        results.iter().fold(Summary::default(), |mut s, r| {
            s.games += 1;
            s.wins += r.won as u64;
            s.total_score += r.score;
            s.max_score = s.max_score.max(r.score);
            s.total_moves += r.moves;
            *s.highest_tiles.entry(r.highest).or_insert(0) += 1;
            s
        })
    }

    fn mean_score(&self) -> f64 {
        self.total_score as f64 / (self.games.max(1) as f64)
    }

    fn win_rate(&self) -> f64 {
        self.wins as f64 / (self.games.max(1) as f64)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Some(n) = args.workers {
        rayon::ThreadPoolBuilder::new().num_threads(n).build_global()?;
    }
    let config = GameConfig { size: args.size, target: args.target, allow_overtime: true };
    config.validate()?;

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template(concat!(
                "{spinner:.green} [{elapsed_precise}] ",
                "[{wide_bar:.cyan/blue}] {pos}/{len} games ({eta})",
            ))?
            .progress_chars("=>-"),
        );
        pb
    };

    let results = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let r = play_one(&config, args.seed.wrapping_add(i), args.max_moves);
            pb.inc(1);
            r
        })
        .collect::<Result<Vec<_>, _>>()?;
    pb.finish_and_clear();

    let summary = Summary::from_results(&results);
    info!(
        "{} games on {}x{}: mean score {:.1}, max score {}, win rate {:.2}%, mean moves {:.1}",
        summary.games,
        config.size,
        config.size,
        summary.mean_score(),
        summary.max_score,
        summary.win_rate() * 100.0,
        summary.total_moves as f64 / (summary.games.max(1) as f64),
    );
    println!("highest tile | games");
    for (tile, count) in &summary.highest_tiles {
        println!("{:>12} | {}", tile, count);
    }
    Ok(())
}
