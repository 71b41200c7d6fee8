/// Game loop and event dispatch.
///
/// One iteration: draw, block for the next event, dispatch it. Pending
/// flags are handled in a fixed order: tick, then resize, then terminate.
/// Only one flag is handled per iteration; the others are still latched and
/// interrupt the very next wait.

use crate::error::GameError;
use crate::sim::event::Outcome;
use crate::sim::step;
use crate::sim::tick::TickScheduler;
use crate::sim::world::{GameState, Phase};
use crate::ui::input::{play_again_answer, Command, InputEvent, Key};
use crate::ui::renderer::Surface;
use crate::ui::signals::PendingFlags;
use crate::ui::view;

const INPUT_ERROR: &str = "Input Error";

/// How the loop ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Exit {
    /// Quit key or "no" at the prompt.
    Quit,
    /// Termination request; leave without a message.
    Terminated,
}

pub struct Game<'a, S: Surface> {
    state: GameState,
    surface: &'a mut S,
    ticker: TickScheduler,
    flags: PendingFlags,
    input_error: bool,
}

impl<'a, S: Surface> Game<'a, S> {
    pub fn new(state: GameState, surface: &'a mut S, ticker: TickScheduler, flags: PendingFlags) -> Self {
        Game { state, surface, ticker, flags, input_error: false }
    }

    #[cfg(test)]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub fn ticker(&self) -> &TickScheduler {
        &self.ticker
    }

    pub fn run(&mut self) -> Result<Exit, GameError> {
        loop {
            self.render()?;

            let Some(event) = self.read_event() else {
                continue;
            };

            let exit = match self.state.phase {
                Phase::Running => self.on_running(event)?,
                Phase::AwaitingPlayAgain(_) => self.on_prompt(event)?,
                Phase::Terminated => Some(Exit::Quit),
            };

            if let Some(exit) = exit {
                self.state.phase = Phase::Terminated;
                log::info!("game loop ended: {:?}", exit);
                return Ok(exit);
            }
        }
    }

    fn render(&mut self) -> Result<(), GameError> {
        view::draw(&self.state, self.surface);
        self.surface
            .present()
            .map_err(|e| GameError::resource("drawing to the terminal", e))
    }

    /// Blocking read. A failed read shows a transient status message and is
    /// retried by the caller; interruptions are retried silently.
    fn read_event(&mut self) -> Option<InputEvent> {
        match self.surface.next_event(&self.flags) {
            Ok(event) => {
                if self.input_error {
                    self.input_error = false;
                    self.state.status = prompt_for(self.state.phase);
                }
                Some(event)
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => None,
            Err(e) => {
                log::warn!("input error: {e}");
                self.input_error = true;
                self.state.status = Some(INPUT_ERROR.to_string());
                None
            }
        }
    }

    fn on_running(&mut self, event: InputEvent) -> Result<Option<Exit>, GameError> {
        match event {
            InputEvent::Interrupted => {
                if self.flags.take_tick() {
                    let outcome = step::tick(&mut self.state);
                    self.conclude(outcome)?;
                } else if self.flags.take_resize() {
                    self.resize()?;
                } else if self.flags.take_terminate() {
                    return Ok(Some(Exit::Terminated));
                }
            }
            InputEvent::Resize => self.resize()?,
            InputEvent::Key(key) => return self.on_command(key),
        }
        Ok(None)
    }

    fn on_command(&mut self, key: Key) -> Result<Option<Exit>, GameError> {
        match Command::from_key(key) {
            Some(Command::Accelerate) => {
                if self.ticker.accelerate()? {
                    log::debug!("faster: tick period {:?}", self.ticker.period());
                }
            }
            Some(Command::Decelerate) => {
                if self.ticker.decelerate()? {
                    log::debug!("slower: tick period {:?}", self.ticker.period());
                }
            }
            Some(Command::TurnLeft) => self.state.vehicle.turn_left(),
            Some(Command::TurnRight) => self.state.vehicle.turn_right(),
            Some(Command::Quit) => return Ok(Some(Exit::Quit)),
            None => {}
        }
        Ok(None)
    }

    /// Freeze the car and ask to play again once the round is decided.
    fn conclude(&mut self, outcome: Outcome) -> Result<(), GameError> {
        if outcome == Outcome::Continue {
            return Ok(());
        }
        self.ticker.stop()?;
        log::info!("round over: {:?} at {:?}", outcome, self.state.vehicle.pos);
        self.state.phase = Phase::AwaitingPlayAgain(outcome);
        self.state.status = prompt_for(self.state.phase);
        Ok(())
    }

    fn on_prompt(&mut self, event: InputEvent) -> Result<Option<Exit>, GameError> {
        match event {
            InputEvent::Interrupted => {
                // the timer is stopped; a tick latched before that is stale
                let _ = self.flags.take_tick();
                if self.flags.take_resize() {
                    self.resize()?;
                } else if self.flags.take_terminate() {
                    return Ok(Some(Exit::Terminated));
                }
            }
            InputEvent::Resize => self.resize()?,
            InputEvent::Key(key) => match play_again_answer(key) {
                Some(true) => {
                    self.ticker.stop()?;
                    self.flags.take_tick();
                    self.state.reset();
                    log::info!("new round");
                }
                Some(false) => return Ok(Some(Exit::Quit)),
                None => {}
            },
        }
        Ok(None)
    }

    fn resize(&mut self) -> Result<(), GameError> {
        let term = self
            .surface
            .refresh_size()
            .map_err(|e| GameError::resource("querying the terminal size", e))?;
        self.state.resize(term)?;
        log::info!("resized to {}x{}", term.0, term.1);
        Ok(())
    }
}

fn prompt_for(phase: Phase) -> Option<String> {
    match phase {
        Phase::AwaitingPlayAgain(outcome) => outcome.prompt().map(str::to_string),
        Phase::Running | Phase::Terminated => None,
    }
}
