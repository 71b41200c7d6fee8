/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the current
/// directory or `~/.config/cargame`. Falls back to built-in defaults if the
/// file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::style::Color;

use crate::domain::direction::Direction;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub glyphs: Glyphs,
    pub speed: SpeedConfig,
    pub colors: ColorConfig,
    pub borders: bool,
    pub start_direction: Direction,
    pub log_file: Option<PathBuf>,
}

/// Characters used for the car, and the markers looked up in level files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyphs {
    pub car_left: char,
    pub car_right: char,
    pub car_up: char,
    pub car_down: char,
    pub goal: char,
    pub start: char,
    pub blank: char,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedConfig {
    pub start_period: Duration,
    pub step: Duration,
    pub max_period: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorConfig {
    pub car_fg: Color,
    pub goal_fg: Color,
    pub status_fg: Color,
    pub status_bg: Color,
}

impl Glyphs {
    pub fn car(&self, direction: Direction) -> char {
        match direction {
            Direction::Left => self.car_left,
            Direction::Right => self.car_right,
            Direction::Up => self.car_up,
            Direction::Down => self.car_down,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    glyphs: TomlGlyphs,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    colors: TomlColors,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGlyphs {
    #[serde(default = "default_car_left")]
    car_left: char,
    #[serde(default = "default_car_right")]
    car_right: char,
    #[serde(default = "default_car_up")]
    car_up: char,
    #[serde(default = "default_car_down")]
    car_down: char,
    #[serde(default = "default_goal")]
    goal: char,
    #[serde(default = "default_start")]
    start: char,
    #[serde(default = "default_blank")]
    blank: char,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_start_period")]
    start_period_ms: u64,
    #[serde(default = "default_step")]
    step_ms: u64,
    #[serde(default = "default_max_period")]
    max_period_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlColors {
    #[serde(default = "default_car_fg")]
    car_fg: String,
    #[serde(default = "default_goal_fg")]
    goal_fg: String,
    #[serde(default = "default_status_fg")]
    status_fg: String,
    #[serde(default = "default_status_bg")]
    status_bg: String,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_borders")]
    borders: bool,
    #[serde(default = "default_start_direction")]
    start_direction: Direction,
    #[serde(default)]
    log_file: Option<String>,
}

// ── Defaults ──

fn default_car_left() -> char { '←' }
fn default_car_right() -> char { '→' }
fn default_car_up() -> char { '↑' }
fn default_car_down() -> char { '↓' }
fn default_goal() -> char { 'x' }
fn default_start() -> char { '@' }
fn default_blank() -> char { ' ' }

fn default_start_period() -> u64 { 250 }
fn default_step() -> u64 { 10 }     // must stay below one second
fn default_max_period() -> u64 { 2000 }

fn default_car_fg() -> String { "red".into() }
fn default_goal_fg() -> String { "green".into() }
fn default_status_fg() -> String { "white".into() }
fn default_status_bg() -> String { "red".into() }

fn default_borders() -> bool { true }
fn default_start_direction() -> Direction { Direction::Right }

impl Default for TomlGlyphs {
    fn default() -> Self {
        TomlGlyphs {
            car_left: default_car_left(),
            car_right: default_car_right(),
            car_up: default_car_up(),
            car_down: default_car_down(),
            goal: default_goal(),
            start: default_start(),
            blank: default_blank(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            start_period_ms: default_start_period(),
            step_ms: default_step(),
            max_period_ms: default_max_period(),
        }
    }
}

impl Default for TomlColors {
    fn default() -> Self {
        TomlColors {
            car_fg: default_car_fg(),
            goal_fg: default_goal_fg(),
            status_fg: default_status_fg(),
            status_bg: default_status_bg(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            borders: default_borders(),
            start_direction: default_start_direction(),
            log_file: None,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        load_from(&candidate_dirs())
    }

    /// Parse a config document. Errors are reported to the caller so that
    /// `load` can decide to warn and fall back.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let step_ms = cfg.speed.step_ms.clamp(1, 999);
        let start_ms = cfg.speed.start_period_ms.max(step_ms);
        let max_ms = cfg.speed.max_period_ms.max(start_ms);

        GameConfig {
            glyphs: Glyphs {
                car_left: cfg.glyphs.car_left,
                car_right: cfg.glyphs.car_right,
                car_up: cfg.glyphs.car_up,
                car_down: cfg.glyphs.car_down,
                goal: cfg.glyphs.goal,
                start: cfg.glyphs.start,
                blank: cfg.glyphs.blank,
            },
            speed: SpeedConfig {
                start_period: Duration::from_millis(start_ms),
                step: Duration::from_millis(step_ms),
                max_period: Duration::from_millis(max_ms),
            },
            colors: ColorConfig {
                car_fg: parse_color(&cfg.colors.car_fg),
                goal_fg: parse_color(&cfg.colors.goal_fg),
                status_fg: parse_color(&cfg.colors.status_fg),
                status_bg: parse_color(&cfg.colors.status_bg),
            },
            borders: cfg.general.borders,
            start_direction: cfg.general.start_direction,
            log_file: cfg.general.log_file.map(PathBuf::from),
        }
    }
}

/// Unknown names fall back to the terminal default.
fn parse_color(name: &str) -> Color {
    Color::try_from(name).unwrap_or(Color::Reset)
}

/// Candidate directories to search: exe dir + CWD + user config dir.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let user = PathBuf::from(&home).join(".config/cargame");
        if user.is_dir() && !dirs.iter().any(|d| d == &user) {
            dirs.push(user);
        }
    }

    dirs
}

/// Search for config.toml in candidate directories. This runs before the
/// logger exists, so problems are reported on stderr.
fn load_from(search_dirs: &[PathBuf]) -> GameConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match GameConfig::parse(&text) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    eprintln!("Warning: {}: parse error: {e}", path.display());
                    eprintln!("Using default settings.");
                    return GameConfig::default();
                }
            },
            Err(e) => {
                eprintln!("Warning: could not read {}: {e}", path.display());
            }
        }
    }
    GameConfig::default()
}
