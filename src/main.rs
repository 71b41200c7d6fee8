/// Entry point: command line, setup and teardown around the game loop.

mod config;
mod domain;
mod error;
mod game;
mod sim;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use crossterm::terminal;

use config::GameConfig;
use error::GameError;
use game::{Exit, Game};
use sim::layout::{self, Layout};
use sim::tick::{ThreadAlarm, TickScheduler};
use sim::world::GameState;
use ui::renderer::{Renderer, Surface};
use ui::signals::PendingFlags;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Steer a self-accelerating car onto its parking place.
#[derive(Parser, Debug)]
#[command(name = "cargame", disable_version_flag = true)]
struct Cli {
    /// Toggle use of game borders
    #[arg(short = 'b')]
    toggle_borders: bool,
    /// Print car characters
    #[arg(short = 'c')]
    car_chars: bool,
    /// Show maximum level size
    #[arg(short = 's')]
    max_size: bool,
    /// Show version information
    #[arg(short = 'v')]
    version: bool,
    /// Level file to play
    #[arg(value_name = "LEVELFILE")]
    level_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = GameConfig::load();

    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }
    if cli.car_chars {
        print_car_chars(&config);
        return ExitCode::SUCCESS;
    }
    if cli.max_size {
        return match print_max_level_size() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(&e),
        };
    }
    let Some(level_file) = cli.level_file else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("{NAME}: {e}");
        }
        return ExitCode::FAILURE;
    };

    init_logging(&config);
    let borders = config.borders != cli.toggle_borders;

    match play(&level_file, &config, borders) {
        Ok(Exit::Quit) => ExitCode::SUCCESS,
        Ok(Exit::Terminated) => {
            log::info!("terminated by request");
            ExitCode::FAILURE
        }
        Err(e) => fail(&e),
    }
}

fn fail(e: &GameError) -> ExitCode {
    log::error!("{e}");
    eprintln!("{NAME}: {e}");
    ExitCode::FAILURE
}

/// Everything that can be rejected is checked before the display is opened.
fn play(level_file: &Path, config: &GameConfig, borders: bool) -> Result<Exit, GameError> {
    let level = sim::level::load(level_file, &config.glyphs, config.start_direction)?;
    let term = terminal::size().map_err(|e| GameError::resource("querying the terminal size", e))?;
    Layout::new(&level, term, borders)?;

    let flags = PendingFlags::new();
    let _signals = flags.install()?;
    let alarm = ThreadAlarm::spawn(flags.clone())?;
    let ticker = TickScheduler::new(config.speed, Box::new(alarm));

    let mut renderer = Renderer::new(config.colors);
    if let Err(e) = renderer.init(&flags) {
        let _ = renderer.cleanup();
        return Err(GameError::resource("initializing the terminal", e));
    }

    let result = run(level, &mut renderer, ticker, flags, config, borders);

    if let Err(e) = renderer.cleanup() {
        log::warn!("terminal cleanup failed: {e}");
    }
    result
}

fn run(
    level: sim::level::Level,
    renderer: &mut Renderer,
    ticker: TickScheduler,
    flags: PendingFlags,
    config: &GameConfig,
    borders: bool,
) -> Result<Exit, GameError> {
    // raw mode and the alternate screen may report a different size
    let term = renderer.size();
    let state = GameState::new(level, term, config, borders)?;
    Game::new(state, renderer, ticker, flags).run()
}

/// Log to the configured file; without one only `RUST_LOG` enables stderr
/// output, which would otherwise scribble over the game.
fn init_logging(config: &GameConfig) {
    let env = env_logger::Env::default().default_filter_or(if config.log_file.is_some() { "info" } else { "off" });
    let mut builder = env_logger::Builder::from_env(env);

    if let Some(path) = &config.log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("{NAME}: cannot open log file {}: {e}", path.display()),
        }
    }
    builder.init();
}

fn print_version() {
    println!("{NAME}, version {VERSION}");
    println!("License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>");
    println!("This is free software; you are free to change and redistribute it.");
    println!("There is NO WARRANTY, to the extent permitted by law.");
}

fn print_car_chars(config: &GameConfig) {
    let g = &config.glyphs;
    println!("car down: {}", g.car_down);
    println!("car left: {}", g.car_left);
    println!("car right: {}", g.car_right);
    println!("car up: {}", g.car_up);
}

fn print_max_level_size() -> Result<(), GameError> {
    let term = terminal::size().map_err(|e| GameError::resource("querying the terminal size", e))?;
    for (label, borders) in [("with", true), ("without", false)] {
        let (lines, cols) = layout::max_level_size(term, borders);
        println!("max level size {label} borders:\n  lines: {lines}\n  cols: {cols}");
    }
    Ok(())
}
