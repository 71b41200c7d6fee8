/// In-memory surface driven by a script, for exercising the game loop
/// without a terminal.

use std::collections::VecDeque;
use std::io;

use crossterm::style::Color;

use crate::ui::input::{InputEvent, Key};
use crate::ui::renderer::{FrameBuffer, Style, Surface};
use crate::ui::signals::PendingFlags;

#[derive(Clone, Copy, Debug)]
pub enum Step {
    Key(Key),
    /// The alarm fired.
    Tick,
    /// The terminal now has this (cols, lines) size.
    Resize(u16, u16),
    /// SIGCONT-style resize request through the flag.
    ResizeSignal(u16, u16),
    Terminate,
    ReadError,
    /// Several flag steps latched before the loop wakes up.
    Latch(&'static [Step]),
}

pub struct ScriptedSurface {
    size: (u16, u16),
    pending_size: (u16, u16),
    frame: FrameBuffer,
    script: VecDeque<Step>,
    /// Every presented frame, oldest first.
    pub frames: Vec<Vec<String>>,
}

impl ScriptedSurface {
    pub fn new(cols: u16, lines: u16, script: Vec<Step>) -> Self {
        ScriptedSurface {
            size: (cols, lines),
            pending_size: (cols, lines),
            frame: FrameBuffer::new(cols as usize, lines as usize),
            script: script.into(),
            frames: vec![],
        }
    }

    /// Current (unpresented) frame as text rows.
    pub fn lines(&self) -> Vec<String> {
        (0..self.size.1 as usize).map(|y| self.frame.row_text(y)).collect()
    }

    pub fn last_frame(&self) -> &[String] {
        self.frames.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn latch(&mut self, step: Step, flags: &PendingFlags) {
        match step {
            Step::Tick => flags.raise_tick(),
            Step::ResizeSignal(c, l) => {
                self.pending_size = (c, l);
                flags.raise_resize();
            }
            Step::Terminate => flags.raise_terminate(),
            other => panic!("{other:?} cannot be latched"),
        }
    }
}

impl Surface for ScriptedSurface {
    fn size(&self) -> (u16, u16) {
        self.size
    }

    fn refresh_size(&mut self) -> io::Result<(u16, u16)> {
        self.size = self.pending_size;
        self.frame.resize(self.size.0 as usize, self.size.1 as usize);
        Ok(self.size)
    }

    fn clear(&mut self) {
        self.frame.clear();
    }

    fn put_glyph(&mut self, col: i32, row: i32, ch: char, _style: Style) {
        self.frame.put_char(col, row, ch, Color::Reset, Color::Reset);
    }

    fn put_str(&mut self, col: i32, row: i32, text: &str, _style: Style) {
        self.frame.put_str(col, row, text, Color::Reset, Color::Reset);
    }

    fn present(&mut self) -> io::Result<()> {
        self.frames.push(self.lines());
        Ok(())
    }

    fn next_event(&mut self, flags: &PendingFlags) -> io::Result<InputEvent> {
        if flags.any() {
            return Ok(InputEvent::Interrupted);
        }
        let step = self.script.pop_front().expect("script exhausted before the game ended");
        match step {
            Step::Key(k) => Ok(InputEvent::Key(k)),
            Step::Resize(c, l) => {
                self.pending_size = (c, l);
                Ok(InputEvent::Resize)
            }
            Step::Tick | Step::ResizeSignal(..) | Step::Terminate => {
                self.latch(step, flags);
                Ok(InputEvent::Interrupted)
            }
            Step::Latch(steps) => {
                for &step in steps {
                    self.latch(step, flags);
                }
                Ok(InputEvent::Interrupted)
            }
            Step::ReadError => Err(io::Error::new(io::ErrorKind::Other, "read failed")),
        }
    }
}
