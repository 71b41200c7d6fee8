/// Composes one frame of the game onto a `Surface`.
///
/// Layout, top to bottom: optional border box around the play area, the
/// play area itself, and a single status line on the last terminal row.

use crate::domain::geometry::PlayArea;
use crate::sim::world::GameState;
use crate::ui::renderer::{Style, Surface};

const BOX_H: char = '─';
const BOX_V: char = '│';
const BOX_TL: char = '┌';
const BOX_TR: char = '┐';
const BOX_BL: char = '└';
const BOX_BR: char = '┘';

pub fn draw(state: &GameState, surface: &mut impl Surface) {
    let (cols, lines) = surface.size();
    let (cols, lines) = (cols as i32, lines as i32);
    let origin = PlayArea::origin(state.borders());

    surface.clear();

    if state.borders() {
        draw_box(surface, cols, lines - 1);
    }

    let offset = state.layout.offset;
    for (r, row) in state.level.rows().enumerate() {
        let text: String = row.iter().collect();
        surface.put_str(origin.x + offset.x, origin.y + offset.y + r as i32, &text, Style::Plain);
    }

    let goal = state.goal.pos;
    surface.put_glyph(origin.x + goal.x, origin.y + goal.y, state.goal.glyph, Style::Goal);

    // A car that just drove through a border is not drawn on the frame.
    let car = state.vehicle.pos;
    if state.layout.area.contains(car) {
        surface.put_glyph(origin.x + car.x, origin.y + car.y, state.vehicle.glyph(), Style::Car);
    }

    if let Some(msg) = &state.status {
        surface.put_str(0, lines - 1, msg, Style::Status);
    }
}

fn draw_box(surface: &mut impl Surface, cols: i32, lines: i32) {
    if cols < 2 || lines < 2 {
        return;
    }
    for x in 1..cols - 1 {
        surface.put_glyph(x, 0, BOX_H, Style::Plain);
        surface.put_glyph(x, lines - 1, BOX_H, Style::Plain);
    }
    for y in 1..lines - 1 {
        surface.put_glyph(0, y, BOX_V, Style::Plain);
        surface.put_glyph(cols - 1, y, BOX_V, Style::Plain);
    }
    surface.put_glyph(0, 0, BOX_TL, Style::Plain);
    surface.put_glyph(cols - 1, 0, BOX_TR, Style::Plain);
    surface.put_glyph(0, lines - 1, BOX_BL, Style::Plain);
    surface.put_glyph(cols - 1, lines - 1, BOX_BR, Style::Plain);
}
