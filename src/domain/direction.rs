/// Facing of the car. Turning is a fixed cyclic permutation, not a rotation
/// by an angle: every match below is exhaustive.

use serde::Deserialize;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Counter-clockwise: DOWN → RIGHT → UP → LEFT → DOWN.
    pub fn turned_left(self) -> Self {
        match self {
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
        }
    }

    /// Clockwise, the inverse of `turned_left`.
    pub fn turned_right(self) -> Self {
        match self {
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
        }
    }

    /// Unit step in screen space (x grows right, y grows down).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_left_turns_are_identity() {
        for d in Direction::ALL {
            let mut t = d;
            for _ in 0..4 { t = t.turned_left(); }
            assert_eq!(t, d);
        }
    }

    #[test]
    fn four_right_turns_are_identity() {
        for d in Direction::ALL {
            let mut t = d;
            for _ in 0..4 { t = t.turned_right(); }
            assert_eq!(t, d);
        }
    }

    #[test]
    fn right_undoes_left() {
        for d in Direction::ALL {
            assert_eq!(d.turned_left().turned_right(), d);
        }
    }

    #[test]
    fn left_cycle_order() {
        assert_eq!(Direction::Down.turned_left(), Direction::Right);
        assert_eq!(Direction::Right.turned_left(), Direction::Up);
        assert_eq!(Direction::Up.turned_left(), Direction::Left);
        assert_eq!(Direction::Left.turned_left(), Direction::Down);
    }
}
