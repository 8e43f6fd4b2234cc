/// External configuration loader.
///
/// Reads `config.toml` from an explicit path, the executable's directory,
/// the CWD, or `~/.config/tilewalk` (first hit wins).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// Logging is not up yet while this runs (the log file path lives in here),
/// so problems are collected in `warnings` and reported by `main` later.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::geom::{Geometry, MAX_PIXELS};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub data_dir: PathBuf,
    pub map: String,
    pub sprites: String,
    pub log_file: PathBuf,
    pub frame_ms: u64,
    pub geometry: Geometry,
    pub camera: CameraConfig,
    pub gamepad: GamepadConfig,
    /// Non-fatal problems found while loading.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraConfig {
    pub enabled: bool,
    /// Viewport size in pixels. 0 = the level's own pixel size.
    pub viewport_width: i32,
    pub viewport_height: i32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    camera: TomlCamera,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_data_dir")]
    data_dir: String,
    #[serde(default = "default_map")]
    map: String,
    #[serde(default = "default_sprites")]
    sprites: String,
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_tile_size")]
    tile_width: i32,
    #[serde(default = "default_tile_size")]
    tile_height: i32,
    #[serde(default = "default_inset_x")]
    inset_x: i32,
    #[serde(default = "default_inset_y")]
    inset_y: i32,
    #[serde(default = "default_player_width")]
    player_width: i32,
    #[serde(default = "default_player_height")]
    player_height: i32,
}

#[derive(Deserialize, Debug, Default)]
struct TomlCamera {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    viewport_width: i32,
    #[serde(default)]
    viewport_height: i32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_data_dir() -> String { "data".into() }
fn default_map() -> String { "mapFile.txt".into() }
fn default_sprites() -> String { "sprites.toml".into() }
fn default_log_file() -> String { "tilewalk.log".into() }
fn default_frame_ms() -> u64 { 16 }

fn default_tile_size() -> i32 { 50 }
fn default_inset_x() -> i32 { 15 }
fn default_inset_y() -> i32 { 5 }
fn default_player_width() -> i32 { 20 }
fn default_player_height() -> i32 { 40 }

fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            data_dir: default_data_dir(),
            map: default_map(),
            sprites: default_sprites(),
            log_file: default_log_file(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid {
            tile_width: default_tile_size(),
            tile_height: default_tile_size(),
            inset_x: default_inset_x(),
            inset_y: default_inset_y(),
            player_width: default_player_width(),
            player_height: default_player_height(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { quit: default_quit() }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[], vec![])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// `explicit` (from `--config`) is tried before the search directories.
    pub fn load(explicit: Option<&Path>) -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = vec![];

        let toml_cfg = match explicit {
            Some(path) => match read_toml(path) {
                Ok(cfg) => cfg,
                Err(msg) => {
                    warnings.push(msg);
                    TomlConfig::default()
                }
            },
            None => search_toml(&search_dirs, &mut warnings),
        };

        GameConfig::from_toml(toml_cfg, &search_dirs, warnings)
    }

    /// Parse config from a TOML string. Data paths are taken as written.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(cfg, &[], vec![]))
    }

    fn from_toml(cfg: TomlConfig, search_dirs: &[PathBuf], mut warnings: Vec<String>) -> Self {
        let data_dir = resolve_dir(&cfg.general.data_dir, search_dirs);

        let grid = &cfg.grid;
        let requested = Geometry {
            tile_w: grid.tile_width,
            tile_h: grid.tile_height,
            inset_x: grid.inset_x,
            inset_y: grid.inset_y,
            player_w: grid.player_width,
            player_h: grid.player_height,
        };
        let geometry = if requested.is_valid() {
            requested
        } else {
            warnings.push(format!(
                "[grid] player box {}x{} at inset ({}, {}) in a {}x{} tile is out of range or does not fit; using defaults",
                requested.player_w, requested.player_h,
                requested.inset_x, requested.inset_y,
                requested.tile_w, requested.tile_h,
            ));
            Geometry::default()
        };

        let mut camera = CameraConfig {
            enabled: cfg.camera.enabled,
            viewport_width: cfg.camera.viewport_width,
            viewport_height: cfg.camera.viewport_height,
        };
        let viewport_ok = |v: i32| (0..=MAX_PIXELS).contains(&v);
        if !viewport_ok(camera.viewport_width) || !viewport_ok(camera.viewport_height) {
            warnings.push(format!(
                "[camera] viewport {}x{} outside 0..={MAX_PIXELS}; fitting to level instead",
                camera.viewport_width, camera.viewport_height,
            ));
            camera.viewport_width = 0;
            camera.viewport_height = 0;
        }

        GameConfig {
            data_dir,
            map: cfg.general.map,
            sprites: cfg.general.sprites,
            log_file: PathBuf::from(cfg.general.log_file),
            frame_ms: cfg.general.frame_ms.max(1),
            geometry,
            camera,
            gamepad: GamepadConfig { quit: cfg.gamepad.quit },
            warnings,
        }
    }

    pub fn map_path(&self) -> PathBuf {
        self.data_dir.join(&self.map)
    }

    pub fn sprites_path(&self) -> PathBuf {
        self.data_dir.join(&self.sprites)
    }
}

/// Absolute paths are kept; relative ones are looked up in the search dirs.
fn resolve_dir(dir: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let as_path = PathBuf::from(dir);
    if as_path.is_absolute() {
        return as_path;
    }
    search_dirs.iter()
        .map(|d| d.join(dir))
        .find(|p| p.is_dir())
        .unwrap_or(as_path)
}

/// Candidate directories to search: exe dir + CWD + user config dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. ~/.config/tilewalk
    if let Ok(home) = std::env::var("HOME") {
        let user = PathBuf::from(&home).join(".config/tilewalk");
        if user.is_dir() && !dirs.iter().any(|d| d == &user) {
            dirs.push(user);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn read_toml(path: &Path) -> Result<TomlConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read {}: {e}; using default settings", path.display()))?;
    toml::from_str::<TomlConfig>(&text)
        .map_err(|e| format!("{} parse error: {e}; using default settings", path.display()))
}

/// Search for config.toml in candidate directories.
fn search_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match read_toml(&path) {
                Ok(cfg) => return cfg,
                Err(msg) => {
                    warnings.push(msg);
                    return TomlConfig::default();
                }
            }
        }
    }
    TomlConfig::default()
}
