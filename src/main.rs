/// Entry point and frame loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use error::GameError;
use sim::event::Command;
use sim::level::load_map;
use sim::world::{Flow, GameWorld};
use ui::assets::SpriteSheet;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

#[derive(Parser)]
#[command(name = "tilewalk", version, about = "Grid-stepping tile platformer for the terminal")]
struct Cli {
    /// Map file inside the data directory (overrides config.toml)
    #[arg(short, long)]
    map: Option<String>,

    /// Ask for the map file name before starting
    #[arg(long, conflicts_with = "map")]
    ask: bool,

    /// Keep the player centered with the wrapping camera
    #[arg(long, overrides_with = "no_camera")]
    camera: bool,

    /// Draw the level at fixed positions
    #[arg(long, overrides_with = "camera")]
    no_camera: bool,

    /// Path to config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = GameConfig::load(cli.config.as_deref());
    if cli.camera {
        config.camera.enabled = true;
    }
    if cli.no_camera {
        config.camera.enabled = false;
    }

    init_logging(&config.log_file, cli.verbose);
    for w in &config.warnings {
        warn!("config: {w}");
    }

    if let Some(map) = cli.map {
        config.map = map;
    } else if cli.ask {
        config.map = prompt_map_name(&config.map).context("reading map name")?;
    }

    let map = load_map(&config.map_path(), config.geometry)?;
    let sheet = SpriteSheet::load(&config.sprites_path())?;
    let mut world = GameWorld::new(map, &config.camera, config.map.clone());
    info!(camera = config.camera.enabled, "starting");

    let mut renderer = Renderer::new();
    renderer.init().context("terminal init failed")?;

    let result = game_loop(&mut world, &mut renderer, &sheet, &config);

    if let Err(e) = renderer.cleanup() {
        warn!(error = %e, "terminal cleanup failed");
    }
    result?;

    info!("clean exit");
    println!("Thanks for walking!");
    Ok(())
}

fn game_loop(
    world: &mut GameWorld,
    renderer: &mut Renderer,
    sheet: &SpriteSheet,
    config: &GameConfig,
) -> Result<(), GameError> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new(&config.gamepad);
    let frame = Duration::from_millis(config.frame_ms);

    loop {
        let mut commands: Vec<Command> = kb.drain_events()?.to_vec();
        commands.extend_from_slice(gp.drain_events());

        for cmd in commands {
            if world.handle(cmd) == Flow::Quit {
                return Ok(());
            }
        }

        world.update_camera();
        renderer.render(world, sheet)?;
        std::thread::sleep(frame);
    }
}

/// Logs go to a file: the terminal is in raw mode while the game runs.
/// `RUST_LOG` wins over `--verbose`.
fn init_logging(path: &Path, verbose: bool) {
    let file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", path.display());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

/// Interactive map selection, before the terminal enters raw mode.
/// An empty answer keeps `default`.
fn prompt_map_name(default: &str) -> io::Result<String> {
    print!("Map file [{default}]: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let name = line.trim();
    Ok(if name.is_empty() { default.to_string() } else { name.to_string() })
}
