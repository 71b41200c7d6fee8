/// Screen-space primitives: positions, the usable play area and centering
/// offsets.
///
/// Screen coordinates are relative to the top-left cell of the play area,
/// i.e. inside the border box when borders are on. They are signed so that a
/// car driving through a border can be represented before the collision
/// check rejects it.

use std::ops::{Add, Sub};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }
}

impl Add for Pos {
    type Output = Pos;
    fn add(self, rhs: Pos) -> Pos {
        Pos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Pos {
    type Output = Pos;
    fn sub(self, rhs: Pos) -> Pos {
        Pos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Rows reserved below the play area for the status line.
pub const STATUS_LINES: i32 = 1;
/// Border box thickness on each side.
pub const BORDER_MARGIN: i32 = 1;

/// Usable play area in cells.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlayArea {
    pub cols: i32,
    pub lines: i32,
}

impl PlayArea {
    /// Area left over from a terminal of `cols` x `lines` cells.
    pub fn from_terminal(cols: u16, lines: u16, borders: bool) -> Self {
        let margin = if borders { BORDER_MARGIN } else { 0 };
        PlayArea {
            cols: cols as i32 - 2 * margin,
            lines: lines as i32 - STATUS_LINES - 2 * margin,
        }
    }

    pub fn contains(&self, p: Pos) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.cols && p.y < self.lines
    }

    /// Does a level of the given display size fit?
    pub fn fits(&self, level_cols: usize, level_lines: usize) -> bool {
        level_cols as i64 <= self.cols as i64 && level_lines as i64 <= self.lines as i64
    }

    /// Terminal cell of the play area's (0, 0).
    pub fn origin(borders: bool) -> Pos {
        if borders {
            Pos::new(BORDER_MARGIN, BORDER_MARGIN)
        } else {
            Pos::new(0, 0)
        }
    }
}

/// Centering offset of the level inside the play area.
pub fn centering(area: PlayArea, level_cols: usize, level_lines: usize) -> Pos {
    // `/` truncates toward zero for negative values as well
    Pos::new(
        (area.cols - level_cols as i32) / 2,
        (area.lines - level_lines as i32) / 2,
    )
}
