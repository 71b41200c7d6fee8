/// Level loader.
///
/// ## Format
///   Plain text, one map row per line. Rows may differ in length.
///   Exactly one goal glyph (`x` by default) and exactly one start marker must
///   appear in the whole file. A start marker is either a car glyph (its
///   direction becomes the initial facing) or the generic start glyph (`@`),
///   which uses the configured default facing. Every other non-blank glyph is
///   a wall.
///
/// ## Grid space vs. display space
///   `rows[r][c]` indexes characters (grid space). Terminals draw wide glyphs
///   over two cells and zero-width glyphs over none, so each row also keeps a
///   display-space tile row where `tiles[r][dc]` is the tile drawn at display
///   column `dc`.

use std::path::Path;

use unicode_width::UnicodeWidthChar;

use crate::config::Glyphs;
use crate::domain::direction::Direction;
use crate::domain::tile::Tile;
use crate::error::{GameError, ValidationError};

/// Row/column index into the raw level text.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

#[derive(Clone, Debug)]
pub struct Level {
    rows: Vec<Vec<char>>,
    tiles: Vec<Vec<Tile>>,
    cols: usize,
    goal: GridPos,
    start: GridPos,
    start_direction: Direction,
}

/// Display width of one glyph: 2 for wide glyphs, 0 for control and
/// combining characters.
pub fn glyph_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

pub fn text_width<'a>(chars: impl IntoIterator<Item = &'a char>) -> usize {
    chars.into_iter().map(|&c| glyph_width(c)).sum()
}

/// Read and parse a level file.
pub fn load(path: &Path, glyphs: &Glyphs, default_direction: Direction) -> Result<Level, GameError> {
    let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let level = Level::parse(&text, glyphs, default_direction)?;
    log::info!(
        "loaded {}: {}x{} cells, goal at {:?}, start at {:?} facing {:?}",
        path.display(),
        level.lines(),
        level.cols(),
        level.goal(),
        level.start(),
        level.start_direction(),
    );
    Ok(level)
}

impl Level {
    pub fn parse(text: &str, glyphs: &Glyphs, default_direction: Direction) -> Result<Self, ValidationError> {
        let mut rows: Vec<Vec<char>> = text.lines().map(|l| l.chars().collect()).collect();
        if rows.is_empty() {
            return Err(ValidationError::NoContent);
        }

        let mut goal = None;
        let mut goal_count = 0;
        let mut start = None;
        let mut start_count = 0;

        for (r, row) in rows.iter().enumerate() {
            for (c, &ch) in row.iter().enumerate() {
                if ch == glyphs.goal {
                    goal_count += 1;
                    goal = Some(GridPos { row: r, col: c });
                } else if let Some(dir) = start_marker(ch, glyphs, default_direction) {
                    start_count += 1;
                    start = Some((GridPos { row: r, col: c }, dir));
                }
            }
        }

        let goal = match (goal_count, goal) {
            (1, Some(g)) => g,
            _ => return Err(ValidationError::MultipleOrMissingGoal { count: goal_count }),
        };
        let (start, start_direction) = match (start_count, start) {
            (1, Some(s)) => s,
            _ => return Err(ValidationError::MultipleOrMissingStart { count: start_count }),
        };

        // The marker must not be drawn as a wall later on.
        rows[start.row][start.col] = glyphs.blank;

        let tiles: Vec<Vec<Tile>> = rows.iter().map(|row| display_tiles(row, glyphs)).collect();
        let cols = tiles.iter().map(Vec::len).max().unwrap_or(0);

        Ok(Level { rows, tiles, cols, goal, start, start_direction })
    }

    /// Number of rows.
    pub fn lines(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in display columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn goal(&self) -> GridPos {
        self.goal
    }

    pub fn start(&self) -> GridPos {
        self.start
    }

    pub fn start_direction(&self) -> Direction {
        self.start_direction
    }

    pub fn row(&self, r: usize) -> &[char] {
        self.rows.get(r).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Display width of `row[..col]`.
    pub fn prefix_width(&self, pos: GridPos) -> usize {
        let row = self.row(pos.row);
        text_width(&row[..pos.col.min(row.len())])
    }

    /// Tile at a display-space cell. Anything outside the text is empty.
    pub fn tile_at(&self, row: i32, display_col: i32) -> Tile {
        if row < 0 || display_col < 0 {
            return Tile::Empty;
        }
        self.tiles
            .get(row as usize)
            .and_then(|r| r.get(display_col as usize))
            .copied()
            .unwrap_or(Tile::Empty)
    }
}

fn start_marker(ch: char, glyphs: &Glyphs, default_direction: Direction) -> Option<Direction> {
    if ch == glyphs.start {
        return Some(default_direction);
    }
    Direction::ALL.into_iter().find(|&d| glyphs.car(d) == ch)
}

fn display_tiles(row: &[char], glyphs: &Glyphs) -> Vec<Tile> {
    let mut out = Vec::with_capacity(row.len());
    for &ch in row {
        let w = glyph_width(ch);
        if w == 0 {
            continue;
        }
        out.push(if ch == glyphs.blank {
            Tile::Empty
        } else if ch == glyphs.goal {
            Tile::Goal
        } else {
            Tile::Wall
        });
        out.extend(std::iter::repeat(Tile::WideTail).take(w - 1));
    }
    out
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
