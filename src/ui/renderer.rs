/// Presentation layer: double-buffered, diff-based terminal surface.
///
/// How it works:
///   1. The game composes the next frame into `front` (array of Cell)
///   2. `present` compares each cell with `back` (previous frame)
///   3. Only cells that changed are emitted, batched with `queue!`
///   4. Swap front/back
///
/// Input is read on a separate thread and forwarded over a channel, so the
/// wait in `next_event` is a plain blocking receive that a raised flag can
/// interrupt through the flags' bell.
///
/// The same `Surface` trait is implemented by an in-memory surface in tests,
/// so the game loop never talks to crossterm directly.

use std::io::{self, BufWriter, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor::{self, MoveTo},
    event, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::ColorConfig;
use crate::sim::level::glyph_width;
use crate::ui::input::{self, InputEvent};
use crate::ui::signals::PendingFlags;

/// Pause after a failed terminal read before trying again.
const READ_RETRY: Duration = Duration::from_millis(100);

/// Semantic style of a drawn glyph; the surface picks the colors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Style {
    Plain,
    Car,
    Goal,
    Status,
}

/// Character-grid display the game draws on.
///
/// Coordinates are terminal cells, `(col, row)` from the top-left corner.
/// Writes outside the surface are clipped.
pub trait Surface {
    /// Current size as (cols, lines).
    fn size(&self) -> (u16, u16);
    /// Re-query the size after a resize notification.
    fn refresh_size(&mut self) -> io::Result<(u16, u16)>;
    fn clear(&mut self);
    fn put_glyph(&mut self, col: i32, row: i32, ch: char, style: Style);
    fn put_str(&mut self, col: i32, row: i32, text: &str, style: Style);
    fn present(&mut self) -> io::Result<()>;
    /// Block until a key or resize arrives, or return `Interrupted` as soon
    /// as any pending flag is latched.
    fn next_event(&mut self, flags: &PendingFlags) -> io::Result<InputEvent>;
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    wide: bool, // occupies this and the next column
    cont: bool, // right half of a wide glyph, never printed
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::Reset, bg: Color::Reset, wide: false, cont: false };

    const WIDE_CONT: Cell = Cell { ch: ' ', fg: Color::Reset, bg: Color::Reset, wide: false, cont: true };

    /// Differs from any real cell, so every position gets diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta, wide: false, cont: false };
}

// ── FrameBuffer: a 2D grid of Cells ──

#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Place one glyph; returns its display width. A wide glyph that does
    /// not fit in the last column is dropped.
    pub fn put_char(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color) -> usize {
        let w = glyph_width(ch);
        if w == 0 || x < 0 || y < 0 {
            return w;
        }
        let (x, y) = (x as usize, y as usize);
        if x + w > self.width || y >= self.height {
            return w;
        }
        self.set(x, y, Cell { ch, fg, bg, wide: w > 1, cont: false });
        for i in 1..w {
            self.set(x + i, y, Cell::WIDE_CONT);
        }
        w
    }

    /// Write a string at (x, y), advancing by each glyph's display width.
    pub fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width as i32 {
                break;
            }
            cx += self.put_char(cx, y, ch, fg, bg) as i32;
        }
    }

    /// Row text with continuation cells removed.
    #[cfg(test)]
    pub fn row_text(&self, y: usize) -> String {
        (0..self.width)
            .map(|x| self.get(x, y))
            .filter(|c| !c.cont)
            .map(|c| c.ch)
            .collect()
    }
}

// ── Terminal surface ──

/// What the reader thread and the bell deliver.
enum Wake {
    Input(io::Result<InputEvent>),
    Flag,
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    colors: ColorConfig,
    events: Option<Receiver<Wake>>,
}

impl Renderer {
    pub fn new(colors: ColorConfig) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            colors,
            events: None,
        }
    }

    /// Enter raw mode and the alternate screen, then start reading input.
    pub fn init(&mut self, flags: &PendingFlags) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.writer, terminal::EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        self.refresh_size()?;

        let (tx, rx) = mpsc::channel();
        let bell = tx.clone();
        flags.set_bell(move || {
            let _ = bell.send(Wake::Flag);
        });
        spawn_reader(tx, flags.clone())?;
        self.events = Some(rx);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    fn colors_for(&self, style: Style) -> (Color, Color) {
        match style {
            Style::Plain => (Color::Reset, Color::Reset),
            Style::Car => (self.colors.car_fg, Color::Reset),
            Style::Goal => (self.colors.goal_fg, Color::Reset),
            Style::Status => (self.colors.status_fg, self.colors.status_bg),
        }
    }

    /// A changed lead cell, or an unchanged wide lead whose tail changed.
    fn dirty(&self, x: usize, y: usize) -> bool {
        let cell = self.front.get(x, y);
        cell != self.back.get(x, y)
            || (cell.wide && self.front.get(x + 1, y) != self.back.get(x + 1, y))
    }
}

/// Blocking terminal reads on their own thread. The thread ends once the
/// receiving side is gone and the next event arrives.
fn spawn_reader(tx: Sender<Wake>, flags: PendingFlags) -> io::Result<()> {
    thread::Builder::new()
        .name("input".into())
        .spawn(move || loop {
            let wake = match event::read() {
                Ok(ev) => match input::translate(ev, &flags) {
                    Some(ev) => Wake::Input(Ok(ev)),
                    None => continue,
                },
                Err(e) => {
                    thread::sleep(READ_RETRY);
                    Wake::Input(Err(e))
                }
            };
            if tx.send(wake).is_err() {
                return;
            }
        })?;
    Ok(())
}

impl Surface for Renderer {
    fn size(&self) -> (u16, u16) {
        (self.front.width as u16, self.front.height as u16)
    }

    fn refresh_size(&mut self) -> io::Result<(u16, u16)> {
        let (tw, th) = terminal::size()?;
        self.front.resize(tw as usize, th as usize);
        self.back.resize(tw as usize, th as usize);
        // Force full repaint after resize.
        self.back.cells.fill(Cell::INVALID);
        queue!(self.writer, ResetColor, Clear(ClearType::All))?;
        Ok((tw, th))
    }

    fn clear(&mut self) {
        self.front.clear();
    }

    fn put_glyph(&mut self, col: i32, row: i32, ch: char, style: Style) {
        let (fg, bg) = self.colors_for(style);
        self.front.put_char(col, row, ch, fg, bg);
    }

    fn put_str(&mut self, col: i32, row: i32, text: &str, style: Style) {
        let (fg, bg) = self.colors_for(style);
        self.front.put_str(col, row, text, fg, bg);
    }

    /// Diff flush: only write changed cells.
    fn present(&mut self) -> io::Result<()> {
        // where the terminal cursor is after the last print
        let mut cursor: Option<(usize, usize)> = None;
        let mut pen = (Color::Reset, Color::Reset);
        queue!(self.writer, ResetColor)?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell.cont || !self.dirty(x, y) {
                    continue;
                }
                if cursor != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != pen.0 {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                }
                if cell.bg != pen.1 {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                }
                pen = (cell.fg, cell.bg);
                queue!(self.writer, Print(cell.ch))?;
                cursor = Some((x + if cell.wide { 2 } else { 1 }, y));
            }
        }

        self.writer.flush()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn next_event(&mut self, flags: &PendingFlags) -> io::Result<InputEvent> {
        let events = self
            .events
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "input reader not started"))?;
        loop {
            if flags.any() {
                return Ok(InputEvent::Interrupted);
            }
            match events.recv() {
                Ok(Wake::Input(ev)) => return ev,
                // recheck the flags
                Ok(Wake::Flag) => {}
                Err(_) => {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "input reader exited"));
                }
            }
        }
    }
}
