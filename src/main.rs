//! Terminal runner: reads one command per line from stdin and prints the
//! grid after every accepted move.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use puzzle_2048::best::BestScore;
use puzzle_2048::config::Config;
use puzzle_2048::engine::{Direction, Game, GameEvent, GameObserver, Mode, Score, ShiftOutcome};
use puzzle_2048::EngineError;

#[derive(Debug, Parser)]
#[command(name = "puzzle-2048", version, about = "Sliding-tile merge puzzle in the terminal")]
struct Args {
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Grid side length (overrides the config file)
    #[arg(long)]
    size: Option<usize>,

    /// Winning tile value (overrides the config file)
    #[arg(long)]
    target: Option<u64>,

    /// Seed for tile spawns, for replayable games
    #[arg(long)]
    seed: Option<u64>,

    /// File holding the best score (default: ./high_score)
    #[arg(long, value_name = "FILE", conflicts_with = "no_best_file")]
    best_file: Option<PathBuf>,

    /// Keep the best score in memory only
    #[arg(long)]
    no_best_file: bool,

    /// End the game on reaching the target instead of offering to continue
    #[arg(long)]
    no_overtime: bool,
}

enum Command {
    Shift(Direction),
    Continue,
    NewGame,
    Quit,
}

fn parse_command(input: &str) -> Result<Command, EngineError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "c" | "continue" => Ok(Command::Continue),
        "n" | "new" => Ok(Command::NewGame),
        "q" | "quit" => Ok(Command::Quit),
        other => other.parse().map(Command::Shift),
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_toml(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(size) = args.size {
        config.game.size = size;
    }
    if let Some(target) = args.target {
        config.game.target = target;
    }
    if args.no_overtime {
        config.game.allow_overtime = false;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.best_file.is_some() {
        config.best_score_path = args.best_file.clone();
    }
    if args.no_best_file {
        config.best_score_path = None;
    }
    config.game.validate()?;
    Ok(config)
}

fn render<W: Write>(out: &mut W, game: &Game, best: Score) -> io::Result<()> {
    write!(out, "{}", game.grid())?;
    writeln!(out, "SCORE {:>8}    BEST {:>8}", game.score(), best)?;
    match game.mode() {
        Mode::Won if game.config().allow_overtime => {
            writeln!(out, "You won! 'c' to keep going, 'n' for a new game")?
        }
        Mode::Won => writeln!(out, "You won! 'n' for a new game")?,
        Mode::Lost => writeln!(out, "You lost! 'n' for a new game")?,
        Mode::Normal | Mode::Overtime => {}
    }
    write!(out, "> ")?;
    out.flush()
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = load_config(&args)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let best = Rc::new(RefCell::new(match &config.best_score_path {
        Some(path) => BestScore::load(path),
        None => BestScore::in_memory(),
    }));

    let mut game = Game::start(config.game.clone(), &mut rng)?;
    let keeper = best.clone();
    game.subscribe(move |e: &GameEvent| keeper.borrow_mut().on_event(e));
    info!("started {}x{} game, target {}", config.game.size, config.game.size, config.game.target);

    let mut stdout = io::stdout();
    render(&mut stdout, &game, best.borrow().value())?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::NewGame) => game.restart(&mut rng)?,
            Ok(Command::Continue) => {
                if let Err(e) = game.continue_play() {
                    write!(stdout, "{}\n> ", e)?;
                    stdout.flush()?;
                    continue;
                }
            }
            Ok(Command::Shift(dir)) => match game.shift(dir, &mut rng)? {
                ShiftOutcome::Moved { .. } => {}
                ShiftOutcome::Unchanged => {
                    write!(stdout, "nothing moves {}\n> ", dir)?;
                    stdout.flush()?;
                    continue;
                }
                ShiftOutcome::Rejected(mode) => {
                    write!(stdout, "game is {:?}\n> ", mode)?;
                    stdout.flush()?;
                    continue;
                }
            },
            Err(e) => {
                write!(stdout, "{} (w/a/s/d, h/j/k/l, c, n or q)\n> ", e)?;
                stdout.flush()?;
                continue;
            }
        }
        render(&mut stdout, &game, best.borrow().value())?;
    }

    info!("final score {}, best {}", game.score(), best.borrow().value());
    Ok(())
}
