/// Tile kinds and the static tile entity.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

use super::geom::{Cell, Rect};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileKind {
    Empty,
    Wall,
}

impl TileKind {
    /// Map legend. The spawn marker is an Empty tile; anything else is not a tile.
    pub fn from_marker(ch: char) -> Option<TileKind> {
        match ch {
            FILLER | PLAYER_MARKER => Some(TileKind::Empty),
            WALL_MARKER => Some(TileKind::Wall),
            _ => None,
        }
    }

    /// Can the player stand in a cell of this kind?
    pub fn is_passable(self) -> bool {
        matches!(self, TileKind::Empty)
    }
}

/// Empty cell marker; also pads short rows.
pub const FILLER: char = '.';
pub const WALL_MARKER: char = '#';
pub const PLAYER_MARKER: char = '@';

/// A map tile. Created once at level generation and never mutated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tile {
    pub kind: TileKind,
    pub cell: Cell,
    pub rect: Rect,
}
