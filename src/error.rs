/// Error types for the whole game.
///
/// Every failure is fatal for the current run: callers propagate with `?`
/// up to `main`, which restores the terminal and prints one line.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Level and geometry invariants that do not hold.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("level file contains no lines")]
    NoContent,
    #[error("{count} goal positions in the level file (must be 1)")]
    MultipleOrMissingGoal { count: usize },
    #[error("{count} start positions in the level file (must be 1)")]
    MultipleOrMissingStart { count: usize },
    #[error("terminal too small for this level: level is {level_lines}x{level_cols}, play area is {area_lines}x{area_cols}")]
    LevelTooLarge {
        level_lines: usize,
        level_cols: usize,
        area_lines: i32,
        area_cols: i32,
    },
    #[error("car out of screen after resize (at {x},{y})")]
    VehicleOffScreen { x: i32, y: i32 },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{what}: {source}")]
    Resource {
        what: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GameError {
    pub fn resource(what: &'static str, source: io::Error) -> Self {
        GameError::Resource { what, source }
    }
}
