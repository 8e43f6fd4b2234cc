/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Game pixels map to terminal cells by integer division by the tile size;
/// one tile is `CELL_W` terminal columns wide and one row tall.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::actor::BlockReason;
use crate::sim::event::GameEvent;
use crate::sim::world::{GameWorld, Phase};
use crate::ui::assets::{Sprite, SpriteSheet};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for cells outside the viewport.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }

    /// Draw a two-column sprite. A transparent sprite keeps the existing background.
    fn put_sprite(&mut self, x: usize, y: usize, sprite: &Sprite) {
        for (i, ch) in sprite.glyph.iter().enumerate() {
            let bg = sprite.bg.unwrap_or_else(|| self.get(x + i, y).bg);
            self.set(x + i, y, Cell::new(*ch, sprite.fg, bg));
        }
    }
}

// ── Renderer ──

/// Each tile is drawn two terminal columns wide.
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };

const INTRO_TEXT: [&str; 4] = [
    "TILEWALK",
    "Move the player with the arrow keys.",
    "Find your way around the walls, please.",
    "Press any key to continue",
];

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &GameWorld, sheet: &SpriteSheet) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Detect phase change → clear for clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        match world.phase {
            Phase::Intro => compose_intro(&mut self.front, sheet),
            Phase::Playing => compose_game(&mut self.front, world, sheet),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

/// Intro: background sprite across the whole screen, text lines on top.
fn compose_intro(buf: &mut FrameBuffer, sheet: &SpriteSheet) {
    let bg = sheet.background();
    let fill_bg = bg.bg.unwrap_or(Cell::BASE_BG);
    for y in 0..buf.height {
        for x in 0..buf.width {
            buf.set(x, y, Cell::new(bg.glyph[x % 2], bg.fg, fill_bg));
        }
    }

    let mut row = 2;
    for line in INTRO_TEXT {
        row += 1;
        buf.put_str(4, row, line, Color::Black, fill_bg);
        row += 1;
    }
}

/// Play screen: HUD, one draw pass over the world's draw list, status and help rows.
fn compose_game(buf: &mut FrameBuffer, w: &GameWorld, sheet: &SpriteSheet) {
    let g = &w.map.geometry;
    let (view_w, view_h) = w.view_size();
    let view_cols = (view_w + g.tile_w - 1) / g.tile_w;
    let view_rows = (view_h + g.tile_h - 1) / g.tile_h;

    // ── HUD row ──
    let cell = w.player_cell();
    let hud = format!(
        " {}  {}x{}  Player ({}, {})  Camera: {} ",
        w.map_name, w.map.width, w.map.height,
        cell.col, cell.row,
        if w.camera.is_some() { "follow" } else { "fixed" },
    );
    buf.fill_row(HUD_ROW, HUD_BG);
    buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

    // ── Map: tiles then player, positions already camera-adjusted ──
    for item in w.draw_list() {
        let col = item.pos.0.div_euclid(g.tile_w);
        let row = item.pos.1.div_euclid(g.tile_h);
        if col < 0 || row < 0 || col >= view_cols || row >= view_rows {
            continue;
        }
        buf.put_sprite(col as usize * CELL_W, MAP_ROW + row as usize, sheet.get(item.sprite));
    }

    // ── Status bar ──
    let status_row = MAP_ROW + view_rows as usize + 1;
    if let Some(msg) = w.last_event.and_then(status_text) {
        buf.put_str(0, status_row, &format!(" {msg} "), Color::Black, Color::Rgb { r: 200, g: 180, b: 50 });
    }

    // ── Help bar ──
    let help = " ←→↑↓ / WASD: Move   Esc / Q: Quit";
    buf.put_str(0, status_row + 2, help, Color::DarkGrey, Cell::BASE_BG);
}

fn status_text(event: GameEvent) -> Option<String> {
    match event {
        GameEvent::Blocked(BlockReason::Wall) => Some("Bump! A wall is in the way.".into()),
        GameEvent::Blocked(BlockReason::OutOfBounds) => Some("That's the edge of the map.".into()),
        GameEvent::GridGap { cell } => Some(format!("Nothing to stand on at ({}, {}).", cell.col, cell.row)),
        GameEvent::Moved { .. } | GameEvent::PhaseChanged(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::config::CameraConfig;
    use crate::domain::actor::Direction;
    use crate::domain::geom::Geometry;
    use crate::sim::event::Command;
    use crate::sim::level::{generate, parse_rows};

    const SHEET: &str = r##"
[empty]
glyph = "."
fg = "green"
bg = "black"

[wall]
glyph = "#"
fg = "yellow"
bg = "dark_yellow"

[player]
glyph = "@@"
fg = "red"

[background]
glyph = " "
fg = "black"
bg = "blue"
"##;

    fn sheet() -> SpriteSheet {
        SpriteSheet::from_toml_str(SHEET, Path::new("test")).unwrap()
    }

    fn playing(text: &str) -> GameWorld {
        let map = generate(&parse_rows(text).unwrap(), Geometry::default()).unwrap();
        let cam = CameraConfig { enabled: false, viewport_width: 0, viewport_height: 0 };
        let mut w = GameWorld::new(map, &cam, "test");
        w.handle(Command::Other);
        w
    }

    fn row_text(buf: &FrameBuffer, y: usize, len: usize) -> String {
        (0..len).map(|x| buf.get(x, y).ch).collect()
    }

    #[test]
    fn game_map_draws_tiles_then_player_over_them() {
        let w = playing("#@.");
        let mut buf = FrameBuffer::new(40, 10);
        compose_game(&mut buf, &w, &sheet());
        assert_eq!(row_text(&buf, MAP_ROW, 6), "##@@..");
        // player sprite is transparent: it keeps the empty tile's background
        assert_eq!(buf.get(2, MAP_ROW).bg, Color::Black);
        assert_eq!(buf.get(2, MAP_ROW).fg, Color::Red);
    }

    #[test]
    fn status_line_reports_blocked_move() {
        let mut w = playing("#@.");
        w.handle(Command::Move(Direction::Left));
        let mut buf = FrameBuffer::new(60, 10);
        compose_game(&mut buf, &w, &sheet());
        let status = row_text(&buf, MAP_ROW + 2, 10);
        assert_eq!(status, " Bump! A w");
    }

    #[test]
    fn intro_fills_background_and_prints_title() {
        let mut buf = FrameBuffer::new(50, 12);
        compose_intro(&mut buf, &sheet());
        assert_eq!(buf.get(0, 0).bg, Color::Blue);
        assert_eq!(buf.get(49, 11).bg, Color::Blue);
        assert_eq!(row_text(&buf, 3, 12), "    TILEWALK");
    }

    #[test]
    fn put_str_clips_at_edge() {
        let mut buf = FrameBuffer::new(3, 1);
        buf.put_str(1, 0, "abc", Color::White, Color::Black);
        assert_eq!(row_text(&buf, 0, 3), " ab");
    }
}
