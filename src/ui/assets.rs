/// Sprite sheet: the glyph and colors used for each drawable thing.
///
/// Loaded from `sprites.toml` in the data directory:
///
/// ```toml
/// [wall]
/// glyph = "▓"          # 1 char (doubled) or 2 chars: one tile = 2 columns
/// fg = "#b47a3c"       # color name or #rrggbb
/// bg = "dark_yellow"   # optional; omitted = keep what is underneath
/// ```
///
/// Required sprites: `empty`, `wall`, `player`, `background`.
/// Sizes never come from here; tile and player boxes are configured in pixels.

use std::path::{Path, PathBuf};

use crossterm::style::Color;
use serde::Deserialize;

use crate::error::GameError;
use crate::sim::world::SpriteId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Sprite {
    pub glyph: [char; 2],
    pub fg: Color,
    /// `None` = transparent: draw over whatever background is already there.
    pub bg: Option<Color>,
}

#[derive(Clone, Debug)]
pub struct SpriteSheet {
    empty: Sprite,
    wall: Sprite,
    player: Sprite,
    background: Sprite,
}

#[derive(Deserialize)]
struct RawSheet {
    empty: Option<RawSprite>,
    wall: Option<RawSprite>,
    player: Option<RawSprite>,
    background: Option<RawSprite>,
}

#[derive(Deserialize)]
struct RawSprite {
    glyph: String,
    fg: String,
    bg: Option<String>,
}

impl SpriteSheet {
    pub fn load(path: &Path) -> Result<Self, GameError> {
        if !path.is_file() {
            return Err(GameError::AssetMissing(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|e| invalid(path, e.to_string()))?;
        Self::from_toml_str(&text, path)
    }

    /// `path` is only used in error messages.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, GameError> {
        let raw: RawSheet = toml::from_str(text).map_err(|e| invalid(path, e.to_string()))?;
        let sprite = |name: &str, entry: Option<RawSprite>| -> Result<Sprite, GameError> {
            let entry = entry.ok_or_else(|| invalid(path, format!("missing sprite '{name}'")))?;
            build_sprite(&entry).map_err(|reason| invalid(path, format!("sprite '{name}': {reason}")))
        };

        Ok(SpriteSheet {
            empty: sprite("empty", raw.empty)?,
            wall: sprite("wall", raw.wall)?,
            player: sprite("player", raw.player)?,
            background: sprite("background", raw.background)?,
        })
    }

    pub fn get(&self, id: SpriteId) -> &Sprite {
        match id {
            SpriteId::Empty => &self.empty,
            SpriteId::Wall => &self.wall,
            SpriteId::Player => &self.player,
        }
    }

    /// Fill used behind the intro text.
    pub fn background(&self) -> &Sprite {
        &self.background
    }
}

fn invalid(path: &Path, reason: String) -> GameError {
    GameError::AssetInvalid { path: PathBuf::from(path), reason }
}

fn build_sprite(raw: &RawSprite) -> Result<Sprite, String> {
    let chars: Vec<char> = raw.glyph.chars().collect();
    let glyph = match chars.as_slice() {
        [c] => [*c, *c],
        [a, b] => [*a, *b],
        _ => return Err(format!("glyph must be 1 or 2 characters, got {:?}", raw.glyph)),
    };
    let fg = parse_color(&raw.fg).ok_or_else(|| format!("unknown color {:?}", raw.fg))?;
    let bg = match &raw.bg {
        Some(s) => Some(parse_color(s).ok_or_else(|| format!("unknown color {s:?}"))?),
        None => None,
    };
    Ok(Sprite { glyph, fg, bg })
}

/// Color name (`dark_green`, `grey`, ...) or `#rrggbb`.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(Color::Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? });
    }

    let color = match s.to_lowercase().replace(['-', ' '], "_").as_str() {
        "reset" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "dark_grey" | "dark_gray" => Color::DarkGrey,
        "dark_red" => Color::DarkRed,
        "dark_green" => Color::DarkGreen,
        "dark_yellow" => Color::DarkYellow,
        "dark_blue" => Color::DarkBlue,
        "dark_magenta" => Color::DarkMagenta,
        "dark_cyan" => Color::DarkCyan,
        _ => return None,
    };
    Some(color)
}
