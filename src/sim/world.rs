/// GameState: everything the game loop owns for one run.
///
/// ## Coordinates
///
/// `vehicle` and `goal` positions are screen space relative to the play
/// area (see `sim::layout`). The level itself stays in grid space and is
/// mapped on demand.
///
/// ## Ownership
///
/// Only the game loop mutates a `GameState`; asynchronous notifications
/// never touch it (they latch `ui::signals::PendingFlags` instead).

use crate::config::GameConfig;
use crate::domain::geometry::Pos;
use crate::domain::vehicle::Vehicle;
use crate::error::ValidationError;
use crate::sim::event::Outcome;
use crate::sim::layout::Layout;
use crate::sim::level::Level;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Running,
    /// Won or crashed, waiting for a y/n answer.
    AwaitingPlayAgain(Outcome),
    Terminated,
}

/// The parking place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Goal {
    pub pos: Pos,
    pub glyph: char,
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub level: Level,
    pub layout: Layout,
    pub vehicle: Vehicle,
    pub goal: Goal,
    pub phase: Phase,
    /// Text for the status line, if any.
    pub status: Option<String>,
}

impl GameState {
    /// Place goal and car for a terminal of `term` = (cols, lines).
    pub fn new(level: Level, term: (u16, u16), config: &GameConfig, borders: bool) -> Result<Self, ValidationError> {
        let layout = Layout::new(&level, term, borders)?;
        let goal = Goal {
            pos: layout.to_screen(&level, level.goal()),
            glyph: config.glyphs.goal,
        };
        let home = layout.to_screen(&level, level.start());
        let vehicle = Vehicle::new(home, level.start_direction(), config.glyphs);

        Ok(GameState {
            level,
            layout,
            vehicle,
            goal,
            phase: Phase::Running,
            status: None,
        })
    }

    pub fn borders(&self) -> bool {
        self.layout.borders
    }

    /// Re-center after the terminal changed size. The level must still fit
    /// and the car must still be addressable afterwards, unless it already
    /// crashed through a border and the loss prompt is up.
    pub fn resize(&mut self, term: (u16, u16)) -> Result<(), ValidationError> {
        let delta = self.layout.relayout(&self.level, term)?;
        self.goal.pos = self.goal.pos + delta;
        self.vehicle.shift(delta);

        let pos = self.vehicle.pos;
        let crashed = self.phase == Phase::AwaitingPlayAgain(Outcome::Crashed);
        if !crashed && !self.layout.area.contains(pos) {
            return Err(ValidationError::VehicleOffScreen { x: pos.x, y: pos.y });
        }
        Ok(())
    }

    /// Back to the start position for another round.
    pub fn reset(&mut self) {
        self.vehicle.reset();
        self.phase = Phase::Running;
        self.status = None;
    }
}
