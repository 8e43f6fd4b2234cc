/// The player actor and grid-stepping movement.
///
/// A move is tentative: the position is translated, mapped back to a grid
/// cell through the spawn inset, and reverted unless that cell is in bounds
/// and the tile under the actor's box is passable.

use super::geom::{Cell, Geometry, Rect};
use super::tile_map::TileMap;
use crate::error::GameError;

/// Movement direction. Each produces a single-axis, one-tile delta.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn delta(self, g: &Geometry) -> (i32, i32) {
        match self {
            Direction::Left => (-g.tile_w, 0),
            Direction::Right => (g.tile_w, 0),
            Direction::Up => (0, -g.tile_h),
            Direction::Down => (0, g.tile_h),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlockReason {
    OutOfBounds,
    Wall,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Moved { to: Cell },
    Blocked(BlockReason),
}

#[derive(Clone, Debug)]
pub struct Actor {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Actor {
    /// Place the actor in `cell`, offset by the geometry's inset.
    pub fn spawn(cell: Cell, g: &Geometry) -> Self {
        let (x, y) = g.spawn_position(cell);
        Actor { x, y, w: g.player_w, h: g.player_h }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn cell(&self, g: &Geometry) -> Cell {
        g.cell_of(self.x, self.y)
    }

    pub fn step(&mut self, dir: Direction, map: &TileMap) -> Result<MoveOutcome, GameError> {
        let (dx, dy) = dir.delta(&map.geometry);
        self.try_move(dx, dy, map)
    }

    /// Translate by `(dx, dy)` unless the destination is out of bounds or a wall.
    /// On any rejection (including `InconsistentGrid`) the position is unchanged.
    pub fn try_move(&mut self, dx: i32, dy: i32, map: &TileMap) -> Result<MoveOutcome, GameError> {
        self.x += dx;
        self.y += dy;

        let cell = self.cell(&map.geometry);
        if !map.in_bounds(cell) {
            self.revert(dx, dy);
            return Ok(MoveOutcome::Blocked(BlockReason::OutOfBounds));
        }

        match map.collide_any(&self.rect()) {
            Some(tile) if tile.kind.is_passable() => Ok(MoveOutcome::Moved { to: cell }),
            Some(_) => {
                self.revert(dx, dy);
                Ok(MoveOutcome::Blocked(BlockReason::Wall))
            }
            None => {
                self.revert(dx, dy);
                Err(GameError::InconsistentGrid { col: cell.col, row: cell.row })
            }
        }
    }

    fn revert(&mut self, dx: i32, dy: i32) {
        self.x -= dx;
        self.y -= dy;
    }
}
