/// Coordinate translation between level grid space and screen space.
///
/// The level is centered inside the play area. A grid cell's screen column
/// is the display width of everything before it in its row plus the column
/// offset; its screen row is the row index plus the row offset.
///
/// On resize the offsets are recomputed and every stored screen position is
/// shifted by the difference, so positions derived earlier stay consistent
/// with each other.

use crate::domain::geometry::{centering, PlayArea, Pos};
use crate::error::ValidationError;
use crate::sim::level::{GridPos, Level};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub area: PlayArea,
    pub offset: Pos,
    pub borders: bool,
}

impl Layout {
    /// Layout for a terminal of `term` = (cols, lines). Fails if the level
    /// does not fit.
    pub fn new(level: &Level, term: (u16, u16), borders: bool) -> Result<Self, ValidationError> {
        let area = PlayArea::from_terminal(term.0, term.1, borders);
        check_fits(level, area)?;
        Ok(Layout {
            area,
            offset: centering(area, level.cols(), level.lines()),
            borders,
        })
    }

    pub fn to_screen(&self, level: &Level, grid: GridPos) -> Pos {
        Pos::new(
            level.prefix_width(grid) as i32 + self.offset.x,
            grid.row as i32 + self.offset.y,
        )
    }

    /// Screen position → (row, display column) inside the level text.
    pub fn to_display(&self, pos: Pos) -> (i32, i32) {
        (pos.y - self.offset.y, pos.x - self.offset.x)
    }

    /// Recompute for a new terminal size. Returns the offset delta that
    /// callers must apply to every stored screen position.
    pub fn relayout(&mut self, level: &Level, term: (u16, u16)) -> Result<Pos, ValidationError> {
        let area = PlayArea::from_terminal(term.0, term.1, self.borders);
        check_fits(level, area)?;
        let offset = centering(area, level.cols(), level.lines());
        let delta = offset - self.offset;
        self.area = area;
        self.offset = offset;
        log::debug!("relayout: area {}x{}, offset {:?}, delta {:?}", area.lines, area.cols, offset, delta);
        Ok(delta)
    }
}

/// Largest level (lines, cols) for a terminal with and without borders.
pub fn max_level_size(term: (u16, u16), borders: bool) -> (i32, i32) {
    let area = PlayArea::from_terminal(term.0, term.1, borders);
    (area.lines.max(0), area.cols.max(0))
}

fn check_fits(level: &Level, area: PlayArea) -> Result<(), ValidationError> {
    if area.fits(level.cols(), level.lines()) {
        Ok(())
    } else {
        Err(ValidationError::LevelTooLarge {
            level_lines: level.lines(),
            level_cols: level.cols(),
            area_lines: area.lines,
            area_cols: area.cols,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::direction::Direction;

    fn level(text: &str) -> Level {
        Level::parse(text, &GameConfig::default().glyphs, Direction::Right).unwrap()
    }

    #[test]
    fn centers_level_in_area() {
        let lvl = level("@  \n   \n  x\n");
        // borders: area = 8 cols x 6 lines
        let layout = Layout::new(&lvl, (10, 9), true).unwrap();
        assert_eq!(layout.area, PlayArea { cols: 8, lines: 6 });
        assert_eq!(layout.offset, Pos::new(2, 1));
        assert_eq!(layout.to_screen(&lvl, lvl.goal()), Pos::new(4, 3));
        assert_eq!(layout.to_screen(&lvl, lvl.start()), Pos::new(2, 1));
    }

    #[test]
    fn wide_prefix_shifts_column() {
        let lvl = level("壁@\nx\n");
        let layout = Layout::new(&lvl, (3, 3), false).unwrap();
        assert_eq!(layout.offset, Pos::new(0, 0));
        assert_eq!(layout.to_screen(&lvl, lvl.start()), Pos::new(2, 0));
    }

    #[test]
    fn too_small_terminal_is_rejected() {
        let lvl = level("@   x\n");
        let err = Layout::new(&lvl, (6, 4), true).unwrap_err();
        assert!(matches!(err, ValidationError::LevelTooLarge { level_cols: 5, area_cols: 4, .. }));
        assert!(Layout::new(&lvl, (6, 4), false).is_ok());
    }

    #[test]
    fn resize_and_back_is_symmetric() {
        let lvl = level("@  \n   \n  x\n");
        let mut layout = Layout::new(&lvl, (20, 12), true).unwrap();
        let goal = layout.to_screen(&lvl, lvl.goal());

        let grow = layout.relayout(&lvl, (41, 30)).unwrap();
        let shrink = layout.relayout(&lvl, (20, 12)).unwrap();
        assert_eq!(grow + shrink, Pos::new(0, 0));
        assert_eq!(goal + grow + shrink, goal);
        assert_eq!(layout.to_screen(&lvl, lvl.goal()), goal);
    }

    #[test]
    fn relayout_rejects_shrinking_below_level() {
        let lvl = level("@  \n   \n  x\n");
        let mut layout = Layout::new(&lvl, (20, 12), true).unwrap();
        assert!(layout.relayout(&lvl, (4, 12)).is_err());
        // failed relayout leaves the old geometry in place
        assert_eq!(layout.area, PlayArea { cols: 18, lines: 9 });
    }

    #[test]
    fn display_mapping_inverts_offset() {
        let lvl = level("@x\n");
        let layout = Layout::new(&lvl, (12, 8), false).unwrap();
        let p = layout.to_screen(&lvl, lvl.goal());
        assert_eq!(layout.to_display(p), (0, 1));
    }

    #[test]
    fn max_size_for_both_modes() {
        assert_eq!(max_level_size((80, 24), true), (21, 78));
        assert_eq!(max_level_size((80, 24), false), (23, 80));
    }
}
