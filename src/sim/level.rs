/// Level loader.
///
/// ## Map format (`.txt`):
///   One grid row per line. Surrounding whitespace on each line is ignored.
///   Short rows are right-padded with `.` to the longest row.
///
/// ## Tile legend:
///   '.' = Empty           '#' = Wall
///   '@' = Player spawn (Empty tile; exactly one required)
///   anything else = no tile at that cell

use std::path::Path;

use tracing::{debug, info, warn};

use crate::domain::geom::{Cell, Geometry};
use crate::domain::tile::{Tile, TileKind, FILLER, PLAYER_MARKER};
use crate::domain::tile_map::TileMap;
use crate::error::MapFormatError;

/// Read and build a level from a map file.
pub fn load_map(path: &Path, geometry: Geometry) -> Result<TileMap, MapFormatError> {
    let raw = std::fs::read_to_string(path).map_err(|source| MapFormatError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse_rows(&raw)?;
    let map = generate(&rows, geometry)?;
    info!(
        path = %path.display(),
        width = map.width,
        height = map.height,
        spawn = ?(map.spawn.col, map.spawn.row),
        "map loaded",
    );
    Ok(map)
}

/// Split raw map text into trimmed rows, padded with the filler to uniform width.
pub fn parse_rows(raw: &str) -> Result<Vec<String>, MapFormatError> {
    let rows: Vec<&str> = raw.lines().map(str::trim).collect();
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    if width == 0 {
        return Err(MapFormatError::Empty);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let pad = width - row.chars().count();
            let mut padded = String::with_capacity(width);
            padded.push_str(row);
            padded.extend(std::iter::repeat(FILLER).take(pad));
            padded
        })
        .collect())
}

/// Build tiles from padded rows in raster order and locate the spawn cell.
pub fn generate(rows: &[String], geometry: Geometry) -> Result<TileMap, MapFormatError> {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.chars().count());
    if width == 0 {
        return Err(MapFormatError::Empty);
    }

    let mut tiles = Vec::with_capacity(width * height);
    let mut spawns = vec![];

    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let cell = Cell::new(x as i32, y as i32);
            match TileKind::from_marker(ch) {
                Some(kind) => {
                    tiles.push(Tile { kind, cell, rect: geometry.tile_rect(cell) });
                    if ch == PLAYER_MARKER {
                        spawns.push(cell);
                    }
                }
                None => warn!(col = x, row = y, ch = %ch, "unrecognized map character dropped"),
            }
        }
    }

    let spawn = match spawns.as_slice() {
        [only] => *only,
        _ => return Err(MapFormatError::SpawnCount(spawns.len())),
    };
    debug!(tiles = tiles.len(), "level generated");

    Ok(TileMap {
        tiles,
        width: width as i32,
        height: height as i32,
        spawn,
        geometry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    // ── parse_rows ──

    #[test]
    fn pads_to_longest_row_and_keeps_prefix() {
        let out = parse_rows("#\n###..\n\n#@").unwrap();
        assert_eq!(out, rows(&["#....", "###..", ".....", "#@..."]));

        let cases = [
            "#\n###..\n\n#@",
            "@#.",
            "##\n@.\n#.",
            "#\n..@####\n.#",
        ];
        for input in cases {
            let out = parse_rows(input).unwrap();
            let longest = input.lines().map(str::len).max().unwrap();
            assert_eq!(out.len(), input.lines().count(), "{input:?}");
            for (orig, padded) in input.lines().zip(&out) {
                assert_eq!(padded.len(), longest, "{input:?}");
                assert!(padded.starts_with(orig), "{input:?}");
                assert!(padded[orig.len()..].chars().all(|c| c == '.'), "{input:?}");
            }
        }
    }

    #[test]
    fn lines_are_trimmed() {
        let out = parse_rows("  ##  \r\n\t#@\n").unwrap();
        assert_eq!(out, rows(&["##", "#@"]));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_rows(""), Err(MapFormatError::Empty)));
        assert!(matches!(parse_rows("\n  \n"), Err(MapFormatError::Empty)));
    }

    // ── generate ──

    #[test]
    fn spawn_matches_marker_cell() {
        let map = generate(
            &rows(&["....", "....", "....", "..@.", "...."]),
            Geometry::default(),
        ).unwrap();
        assert_eq!(map.spawn, Cell::new(2, 3));
        assert_eq!((map.width, map.height), (4, 5));
    }

    #[test]
    fn spawn_cell_is_an_empty_tile() {
        let map = generate(&rows(&["#@#"]), Geometry::default()).unwrap();
        let kinds: Vec<_> = map.tiles.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TileKind::Wall, TileKind::Empty, TileKind::Wall]);
    }

    #[test]
    fn tiles_are_in_raster_order_with_pixel_rects() {
        let map = generate(&rows(&["@#", ".."]), Geometry::default()).unwrap();
        let cells: Vec<_> = map.tiles.iter().map(|t| (t.cell.col, t.cell.row)).collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(map.tiles[3].rect.x, 50);
        assert_eq!(map.tiles[3].rect.y, 50);
    }

    #[test]
    fn unknown_characters_leave_gaps() {
        let map = generate(&rows(&["@x#"]), Geometry::default()).unwrap();
        assert_eq!(map.tiles.len(), 2);
        assert!(map.tiles.iter().all(|t| t.cell.col != 1));
    }

    #[test]
    fn missing_spawn_is_rejected() {
        let err = generate(&rows(&["..", "#."]), Geometry::default()).unwrap_err();
        assert!(matches!(err, MapFormatError::SpawnCount(0)));
    }

    #[test]
    fn multiple_spawns_are_rejected() {
        let err = generate(&rows(&["@.", ".@"]), Geometry::default()).unwrap_err();
        assert!(matches!(err, MapFormatError::SpawnCount(2)));
    }

    // ── load_map ──

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_map(&dir.path().join("nope.txt"), Geometry::default()).unwrap_err();
        assert!(matches!(err, MapFormatError::Unreadable { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.txt");
        std::fs::write(&path, "###\n#@#\n###\n").unwrap();
        let map = load_map(&path, Geometry::default()).unwrap();
        assert_eq!(map.spawn, Cell::new(1, 1));
        assert_eq!(map.tiles.len(), 9);
    }
}
