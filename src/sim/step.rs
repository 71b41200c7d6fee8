/// One tick of forward motion and the check that follows it.
///
/// Order of checks:
///   1. On the parking place         → Won
///   2. Did not move (wrapped in place) → Continue
///   3. Borders on and outside area  → Crashed
///   4. Non-empty level cell         → Crashed
///   5. Otherwise                    → Continue
///
/// Collisions are decided from the level's display-space tiles, not from
/// what happens to be drawn on screen.

use crate::sim::event::Outcome;
use crate::sim::world::GameState;

/// Move the car one cell and classify the result.
pub fn tick(state: &mut GameState) -> Outcome {
    let area = state.layout.area;
    let borders = state.borders();
    state.vehicle.move_forward(area, borders);
    evaluate(state)
}

pub fn evaluate(state: &GameState) -> Outcome {
    let car = &state.vehicle;

    if car.pos == state.goal.pos {
        return Outcome::Won;
    }

    if !car.moved() {
        return Outcome::Continue;
    }

    if state.borders() && !state.layout.area.contains(car.pos) {
        return Outcome::Crashed;
    }

    let (row, col) = state.layout.to_display(car.pos);
    if state.level.tile_at(row, col).is_passable() {
        Outcome::Continue
    } else {
        Outcome::Crashed
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::direction::Direction;
    use crate::domain::geometry::Pos;
    use crate::sim::level::Level;

    fn state(text: &str, term: (u16, u16), borders: bool) -> GameState {
        let config = GameConfig::default();
        let level = Level::parse(text, &config.glyphs, Direction::Right).unwrap();
        GameState::new(level, term, &config, borders).unwrap()
    }

    #[test]
    fn drives_into_goal() {
        let mut s = state("→ x\n", (3, 2), false);
        assert_eq!(tick(&mut s), Outcome::Continue);
        assert_eq!(tick(&mut s), Outcome::Won);
    }

    #[test]
    fn wall_is_a_crash() {
        let mut s = state("→#x\n", (3, 2), false);
        assert_eq!(tick(&mut s), Outcome::Crashed);
    }

    #[test]
    fn wide_glyph_tail_is_a_crash() {
        // car below the right half of a wide glyph, driving up into it
        let mut s = state("壁 x\n ↑\n", (4, 3), false);
        assert_eq!(s.vehicle.pos, Pos::new(1, 1));
        assert_eq!(tick(&mut s), Outcome::Crashed);
    }

    #[test]
    fn border_exit_is_a_crash() {
        // level fills the area exactly, car points off the left edge
        let mut s = state("← x\n", (5, 4), true);
        assert_eq!(s.vehicle.pos, Pos::new(0, 0));
        assert_eq!(tick(&mut s), Outcome::Crashed);
        assert_eq!(s.vehicle.pos, Pos::new(-1, 0));
    }

    #[test]
    fn wraps_through_edge_without_borders() {
        let mut s = state("← \nx\n", (3, 3), false);
        assert_eq!(tick(&mut s), Outcome::Continue);
        assert_eq!(s.vehicle.pos, Pos::new(2, 0));
    }

    #[test]
    fn wrapping_into_wall_is_a_crash() {
        let mut s = state("← #\nx\n", (3, 3), false);
        assert_eq!(tick(&mut s), Outcome::Crashed);
    }

    #[test]
    fn open_space_around_level_is_passable() {
        let mut s = state("↑\nx\n", (9, 9), true);
        // area 7x6, offset (3, 2); driving up leaves the level text
        assert_eq!(tick(&mut s), Outcome::Continue);
        assert_eq!(tick(&mut s), Outcome::Continue);
        assert_eq!(s.vehicle.pos, Pos::new(3, 0));
        assert_eq!(tick(&mut s), Outcome::Crashed);
    }

    #[test]
    fn standing_still_continues() {
        let mut s = state("→x\n", (2, 2), false);
        s.goal.pos = Pos::new(5, 5);
        s.vehicle.turn_left(); // up, area has a single line
        assert_eq!(tick(&mut s), Outcome::Continue);
        assert!(!s.vehicle.moved());
    }
}
