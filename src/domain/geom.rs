/// Pixel geometry: rectangles, grid cells, and the tile/player size constants.
///
/// All positions are integer pixels. Rectangles are half-open:
/// a rect covers `[x, x + w) × [y, y + h)`, so two rects that merely
/// share an edge do not overlap.

/// Integer (col, row) address into the level grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub fn new(col: i32, row: i32) -> Self {
        Cell { col, row }
    }
}

/// Axis-aligned box in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Half-open intersection test. Zero-area contact is not an overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Largest tile, player or viewport dimension accepted from config.
/// Keeps pixel arithmetic on realistic maps well inside `i32`.
pub const MAX_PIXELS: i32 = 10_000;

/// Tile size, player box size, and the player's inset inside its tile.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Geometry {
    pub tile_w: i32,
    pub tile_h: i32,
    pub inset_x: i32,
    pub inset_y: i32,
    pub player_w: i32,
    pub player_h: i32,
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry {
            tile_w: 50,
            tile_h: 50,
            inset_x: 15,
            inset_y: 5,
            player_w: 20,
            player_h: 40,
        }
    }
}

impl Geometry {
    /// The player box must sit strictly inside a single tile, so a
    /// grid-aligned player overlaps exactly one tile.
    pub fn is_valid(&self) -> bool {
        let in_range = |v: i32, min: i32| (min..=MAX_PIXELS).contains(&v);
        in_range(self.tile_w, 1)
            && in_range(self.tile_h, 1)
            && in_range(self.player_w, 1)
            && in_range(self.player_h, 1)
            && in_range(self.inset_x, 0)
            && in_range(self.inset_y, 0)
            && self.inset_x + self.player_w <= self.tile_w
            && self.inset_y + self.player_h <= self.tile_h
    }

    /// Pixel rect of the tile at `cell`.
    pub fn tile_rect(&self, cell: Cell) -> Rect {
        Rect::new(cell.col * self.tile_w, cell.row * self.tile_h, self.tile_w, self.tile_h)
    }

    /// Player pixel position when standing in `cell`.
    pub fn spawn_position(&self, cell: Cell) -> (i32, i32) {
        (cell.col * self.tile_w + self.inset_x, cell.row * self.tile_h + self.inset_y)
    }

    /// Inverse of `spawn_position`, using floor division so that
    /// positions left of / above the grid map to negative cells.
    pub fn cell_of(&self, x: i32, y: i32) -> Cell {
        Cell::new(
            (x - self.inset_x).div_euclid(self.tile_w),
            (y - self.inset_y).div_euclid(self.tile_h),
        )
    }
}
