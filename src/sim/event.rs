/// Commands flowing into the simulation and events flowing out of it.
/// The presentation layer turns raw key/pad input into `Command`s and
/// shows the last `GameEvent` in the status line.

use crate::domain::actor::{BlockReason, Direction};
use crate::domain::geom::Cell;
use crate::sim::world::Phase;

/// One discrete key-down (or pad button press), already decoded.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(Direction),
    Quit,
    /// Any other key; only meaningful on the intro screen.
    Other,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PhaseChanged(Phase),
    Moved { to: Cell },
    Blocked(BlockReason),
    /// Collision found no tile at `cell`; handled as a blocked move.
    GridGap { cell: Cell },
}
