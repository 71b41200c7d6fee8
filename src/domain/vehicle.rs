/// The car: position, facing and the glyph bound to that facing.

use crate::config::Glyphs;

use super::direction::Direction;
use super::geometry::{PlayArea, Pos};

#[derive(Clone, Debug)]
pub struct Vehicle {
    pub pos: Pos,
    /// Position before the last `move_forward`.
    pub prev: Pos,
    pub home: Pos,
    pub direction: Direction,
    pub home_direction: Direction,
    glyph: char,
    glyphs: Glyphs,
}

impl Vehicle {
    pub fn new(home: Pos, home_direction: Direction, glyphs: Glyphs) -> Self {
        Vehicle {
            pos: home,
            prev: home,
            home,
            direction: home_direction,
            home_direction,
            glyph: glyphs.car(home_direction),
            glyphs,
        }
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn turn_left(&mut self) {
        self.set_direction(self.direction.turned_left());
    }

    pub fn turn_right(&mut self) {
        self.set_direction(self.direction.turned_right());
    }

    /// Advance one cell. Without borders the play area is a torus; with
    /// borders the position may leave the area and the caller decides.
    pub fn move_forward(&mut self, area: PlayArea, borders: bool) {
        self.prev = self.pos;
        let (dx, dy) = self.direction.delta();
        let mut next = Pos::new(self.pos.x + dx, self.pos.y + dy);
        if !borders {
            next.x = wrap(next.x, area.cols);
            next.y = wrap(next.y, area.lines);
        }
        self.pos = next;
    }

    pub fn moved(&self) -> bool {
        self.pos != self.prev
    }

    pub fn reset(&mut self) {
        self.pos = self.home;
        self.prev = self.home;
        self.set_direction(self.home_direction);
    }

    /// Translate every stored position, used when the play area is re-centered.
    pub fn shift(&mut self, delta: Pos) {
        self.pos = self.pos + delta;
        self.prev = self.prev + delta;
        self.home = self.home + delta;
    }

    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.glyph = self.glyphs.car(direction);
    }
}

fn wrap(v: i32, len: i32) -> i32 {
    if len <= 0 { v } else { v.rem_euclid(len) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn car_at(x: i32, y: i32, d: Direction) -> Vehicle {
        Vehicle::new(Pos::new(x, y), d, GameConfig::default().glyphs)
    }

    const AREA: PlayArea = PlayArea { cols: 5, lines: 4 };

    #[test]
    fn turning_updates_glyph() {
        let mut car = car_at(1, 1, Direction::Right);
        assert_eq!(car.glyph(), '→');
        car.turn_left();
        assert_eq!(car.direction, Direction::Up);
        assert_eq!(car.glyph(), '↑');
        car.turn_right();
        car.turn_right();
        assert_eq!(car.direction, Direction::Down);
        assert_eq!(car.glyph(), '↓');
    }

    #[test]
    fn wraps_on_every_edge_without_borders() {
        let mut car = car_at(4, 0, Direction::Right);
        car.move_forward(AREA, false);
        assert_eq!(car.pos, Pos::new(0, 0));

        car.turn_right(); car.turn_right(); // left
        car.move_forward(AREA, false);
        assert_eq!(car.pos, Pos::new(4, 0));

        car.turn_right(); // up
        car.move_forward(AREA, false);
        assert_eq!(car.pos, Pos::new(4, 3));

        car.turn_right(); car.turn_right(); // down
        car.move_forward(AREA, false);
        assert_eq!(car.pos, Pos::new(4, 0));
    }

    #[test]
    fn leaves_area_with_borders() {
        let mut car = car_at(0, 0, Direction::Left);
        car.move_forward(AREA, true);
        assert_eq!(car.pos, Pos::new(-1, 0));
        assert!(!AREA.contains(car.pos));

        let mut car = car_at(2, 3, Direction::Down);
        car.move_forward(AREA, true);
        assert_eq!(car.pos, Pos::new(2, 4));
        assert!(!AREA.contains(car.pos));
    }

    #[test]
    fn move_records_previous_position() {
        let mut car = car_at(1, 1, Direction::Down);
        car.move_forward(AREA, true);
        assert_eq!(car.prev, Pos::new(1, 1));
        assert!(car.moved());
    }

    #[test]
    fn single_cell_area_wraps_to_same_cell() {
        let area = PlayArea { cols: 1, lines: 1 };
        let mut car = car_at(0, 0, Direction::Right);
        car.move_forward(area, false);
        assert!(!car.moved());
    }

    #[test]
    fn reset_restores_home_and_facing() {
        let mut car = car_at(2, 2, Direction::Up);
        car.turn_left();
        car.move_forward(AREA, true);
        car.reset();
        assert_eq!(car.pos, Pos::new(2, 2));
        assert_eq!(car.prev, Pos::new(2, 2));
        assert_eq!(car.direction, Direction::Up);
        assert_eq!(car.glyph(), '↑');
    }

    #[test]
    fn shift_moves_all_positions() {
        let mut car = car_at(2, 2, Direction::Up);
        car.move_forward(AREA, true);
        car.shift(Pos::new(3, -1));
        assert_eq!(car.pos, Pos::new(5, 0));
        assert_eq!(car.prev, Pos::new(5, 1));
        assert_eq!(car.home, Pos::new(5, 1));
    }
}
