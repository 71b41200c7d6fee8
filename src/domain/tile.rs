/// Level cell types in display space.
/// Properties are queried via methods, so the collision rule lives here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    /// Any non-blank glyph that is not the goal.
    Wall,
    /// Right half of a double-width glyph.
    WideTail,
    Goal,
}

impl Tile {
    /// Can the car occupy this cell without crashing?
    pub fn is_passable(self) -> bool {
        matches!(self, Tile::Empty)
    }
}
