/// Keyboard input: translation of terminal events into game input.
///
/// The blocking read itself lives in the surface (`ui::renderer`); this
/// module only decides what a terminal event means.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::direction::Direction;
use crate::ui::signals::PendingFlags;

/// What the blocking read returned.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    Key(Key),
    /// The terminal changed size.
    Resize,
    /// A pending flag was latched while waiting.
    Interrupted,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Char(char),
    Arrow(Direction),
}

/// What a key does while driving.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Accelerate,
    Decelerate,
    TurnLeft,
    TurnRight,
    Quit,
}

impl Command {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Arrow(Direction::Up) | Key::Char('a') => Some(Command::Accelerate),
            Key::Arrow(Direction::Down) | Key::Char('b') => Some(Command::Decelerate),
            Key::Arrow(Direction::Left) => Some(Command::TurnLeft),
            Key::Arrow(Direction::Right) => Some(Command::TurnRight),
            Key::Char('q') => Some(Command::Quit),
            Key::Char(_) => None,
        }
    }
}

/// Answer to the play-again prompt. Every other key is ignored.
pub fn play_again_answer(key: Key) -> Option<bool> {
    match key {
        Key::Char('y') => Some(true),
        Key::Char('n') => Some(false),
        _ => None,
    }
}

/// Map a raw terminal event. Ctrl+C arrives as a key in raw mode; it is
/// turned into a termination request just like SIGINT.
pub fn translate(event: Event, flags: &PendingFlags) -> Option<InputEvent> {
    match event {
        Event::Resize(..) => Some(InputEvent::Resize),
        Event::Key(key) => translate_key(key, flags),
        _ => None,
    }
}

fn translate_key(key: KeyEvent, flags: &PendingFlags) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        flags.raise_terminate();
        return Some(InputEvent::Interrupted);
    }
    let key = match key.code {
        KeyCode::Up => Key::Arrow(Direction::Up),
        KeyCode::Down => Key::Arrow(Direction::Down),
        KeyCode::Left => Key::Arrow(Direction::Left),
        KeyCode::Right => Key::Arrow(Direction::Right),
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    Some(InputEvent::Key(key))
}
