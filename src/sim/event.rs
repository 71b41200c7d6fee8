/// Result of evaluating the car's position after a tick.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// Keep driving.
    Continue,
    /// The car reached the parking place.
    Won,
    /// The car hit a wall or drove through a border.
    Crashed,
}

impl Outcome {
    /// Status line question shown before the player decides to play again.
    pub fn prompt(self) -> Option<&'static str> {
        match self {
            Outcome::Continue => None,
            Outcome::Won => Some("Won! Play again? [y/n]"),
            Outcome::Crashed => Some("Game over. Play again? [y/n]"),
        }
    }
}
