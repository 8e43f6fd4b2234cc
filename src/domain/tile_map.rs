/// The generated level: every tile plus grid dimensions and the spawn cell.

use super::geom::{Cell, Geometry, Rect};
use super::tile::Tile;

#[derive(Clone, Debug)]
pub struct TileMap {
    /// Tiles in raster order. Cells with unrecognized map characters are absent.
    pub tiles: Vec<Tile>,
    pub width: i32,
    pub height: i32,
    pub spawn: Cell,
    pub geometry: Geometry,
}

impl TileMap {
    /// Is `cell` inside `[0, width) × [0, height)`?
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.col >= 0 && cell.col < self.width && cell.row >= 0 && cell.row < self.height
    }

    /// First tile (raster order) whose rect overlaps `rect`.
    /// A grid-aligned player box overlaps at most one tile.
    pub fn collide_any(&self, rect: &Rect) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.rect.overlaps(rect))
    }

    /// Size of the whole level in pixels.
    pub fn pixel_size(&self) -> (i32, i32) {
        (self.width * self.geometry.tile_w, self.height * self.geometry.tile_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::TileKind;

    fn map_from(rows: &[&str]) -> TileMap {
        let g = Geometry::default();
        let mut tiles = vec![];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if let Some(kind) = TileKind::from_marker(ch) {
                    let cell = Cell::new(x as i32, y as i32);
                    tiles.push(Tile { kind, cell, rect: g.tile_rect(cell) });
                }
            }
        }
        TileMap {
            tiles,
            width: rows[0].len() as i32,
            height: rows.len() as i32,
            spawn: Cell::new(0, 0),
            geometry: g,
        }
    }

    #[test]
    fn bounds() {
        let m = map_from(&["...", "..."]);
        assert!(m.in_bounds(Cell::new(0, 0)));
        assert!(m.in_bounds(Cell::new(2, 1)));
        assert!(!m.in_bounds(Cell::new(3, 0)));
        assert!(!m.in_bounds(Cell::new(0, 2)));
        assert!(!m.in_bounds(Cell::new(-1, 0)));
    }

    #[test]
    fn collide_any_finds_tile_under_player_box() {
        let m = map_from(&[".#", ".."]);
        let player = Rect::new(65, 5, 20, 40);
        let hit = m.collide_any(&player).unwrap();
        assert_eq!(hit.cell, Cell::new(1, 0));
        assert_eq!(hit.kind, TileKind::Wall);
    }

    #[test]
    fn collide_any_misses_gap() {
        let m = map_from(&[".x"]);
        assert!(m.collide_any(&Rect::new(65, 5, 20, 40)).is_none());
    }

    #[test]
    fn pixel_size() {
        let m = map_from(&["....", "....", "...."]);
        assert_eq!(m.pixel_size(), (200, 150));
    }
}
