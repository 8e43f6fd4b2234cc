/// GameWorld: the complete state of a running game.
///
/// Owned by the frame loop and passed by reference; there is no global
/// state, so tests can build as many independent worlds as they like.
///
/// ## Frame order
///   1. `handle()` every pending command (at most one move each)
///   2. `update_camera()`
///   3. `draw_list()` → renderer
///
/// ## Camera
///
/// With the camera off, entities are drawn at their level pixel positions.
/// With it on, every entity (tiles and player alike) goes through
/// `Camera::apply`, which wraps around the viewport edges.

use tracing::{debug, info, warn};

use crate::config::CameraConfig;
use crate::domain::actor::{Actor, BlockReason, Direction, MoveOutcome};
use crate::domain::camera::Camera;
use crate::domain::geom::Cell;
use crate::domain::tile::TileKind;
use crate::domain::tile_map::TileMap;
use crate::error::GameError;
use crate::sim::event::{Command, GameEvent};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Intro,
    Playing,
}

/// What the frame loop should do after a command.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

/// Sprite handle understood by the asset store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SpriteId {
    Empty,
    Wall,
    Player,
}

impl From<TileKind> for SpriteId {
    fn from(kind: TileKind) -> Self {
        match kind {
            TileKind::Empty => SpriteId::Empty,
            TileKind::Wall => SpriteId::Wall,
        }
    }
}

/// One entry of the per-frame draw pass: screen-space pixel position + sprite.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DrawItem {
    pub pos: (i32, i32),
    pub sprite: SpriteId,
}

pub struct GameWorld {
    pub map: TileMap,
    pub player: Actor,
    pub camera: Option<Camera>,
    pub phase: Phase,
    pub map_name: String,
    pub last_event: Option<GameEvent>,
}

// ── Construction ──

impl GameWorld {
    pub fn new(map: TileMap, camera_cfg: &CameraConfig, map_name: impl Into<String>) -> Self {
        let player = Actor::spawn(map.spawn, &map.geometry);
        let camera = camera_cfg.enabled.then(|| {
            let (level_w, level_h) = map.pixel_size();
            let w = if camera_cfg.viewport_width > 0 { camera_cfg.viewport_width } else { level_w };
            let h = if camera_cfg.viewport_height > 0 { camera_cfg.viewport_height } else { level_h };
            Camera::new(w, h)
        });

        let mut world = GameWorld {
            map,
            player,
            camera,
            phase: Phase::Intro,
            map_name: map_name.into(),
            last_event: None,
        };
        world.update_camera();
        world
    }
}

// ── Frame update ──

impl GameWorld {
    /// Apply one decoded input command.
    pub fn handle(&mut self, cmd: Command) -> Flow {
        if cmd == Command::Quit {
            info!(phase = ?self.phase, "quit requested");
            return Flow::Quit;
        }

        match self.phase {
            Phase::Intro => {
                self.phase = Phase::Playing;
                self.last_event = Some(GameEvent::PhaseChanged(Phase::Playing));
                info!("intro dismissed; playing");
            }
            Phase::Playing => {
                if let Command::Move(dir) = cmd {
                    self.last_event = Some(self.move_player(dir));
                }
            }
        }
        Flow::Continue
    }

    /// Step the player one tile. A missing tile under the player is
    /// reported as `GridGap` and the player stays put.
    pub fn move_player(&mut self, dir: Direction) -> GameEvent {
        let result = self.player.step(dir, &self.map);
        move_event(dir, result)
    }

    /// Recenter the camera on the player (no-op with the camera off).
    pub fn update_camera(&mut self) {
        let target = self.player.rect();
        if let Some(cam) = self.camera.as_mut() {
            cam.update(&target);
        }
    }

    pub fn player_cell(&self) -> Cell {
        self.player.cell(&self.map.geometry)
    }

    /// Size of the drawable area in pixels.
    pub fn view_size(&self) -> (i32, i32) {
        match &self.camera {
            Some(cam) => (cam.view_w, cam.view_h),
            None => self.map.pixel_size(),
        }
    }
}

/// Any failure leaves the actor where it was, so every error is a blocked
/// move. Only a gap in the grid gets its own event.
fn move_event(dir: Direction, result: Result<MoveOutcome, GameError>) -> GameEvent {
    match result {
        Ok(MoveOutcome::Moved { to }) => {
            debug!(?dir, col = to.col, row = to.row, "moved");
            GameEvent::Moved { to }
        }
        Ok(MoveOutcome::Blocked(reason)) => {
            debug!(?dir, ?reason, "move blocked");
            GameEvent::Blocked(reason)
        }
        Err(GameError::InconsistentGrid { col, row }) => {
            warn!(?dir, col, row, "no tile under player; move treated as blocked");
            GameEvent::GridGap { cell: Cell::new(col, row) }
        }
        Err(e) => {
            warn!(?dir, error = %e, "move failed; player stays put");
            GameEvent::Blocked(BlockReason::Wall)
        }
    }
}

// ── Draw pass ──

impl GameWorld {
    /// Tiles in raster order, then the player; camera already applied.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let place = |pos: (i32, i32)| match &self.camera {
            Some(cam) => cam.apply(pos),
            None => pos,
        };

        let mut items: Vec<DrawItem> = self.map.tiles.iter()
            .map(|t| DrawItem { pos: place((t.rect.x, t.rect.y)), sprite: t.kind.into() })
            .collect();
        items.push(DrawItem { pos: place(self.player.position()), sprite: SpriteId::Player });
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use crate::domain::geom::Geometry;
    use crate::sim::level::{generate, parse_rows};

    fn world_from(text: &str, camera: CameraConfig) -> GameWorld {
        let rows = parse_rows(text).unwrap();
        let map = generate(&rows, Geometry::default()).unwrap();
        GameWorld::new(map, &camera, "test")
    }

    fn no_camera() -> CameraConfig {
        CameraConfig { enabled: false, viewport_width: 0, viewport_height: 0 }
    }

    fn camera(w: i32, h: i32) -> CameraConfig {
        CameraConfig { enabled: true, viewport_width: w, viewport_height: h }
    }

    fn playing(text: &str, cam: CameraConfig) -> GameWorld {
        let mut w = world_from(text, cam);
        w.handle(Command::Other);
        assert_eq!(w.phase, Phase::Playing);
        w
    }

    // ── phases ──

    #[test]
    fn starts_on_intro_and_ignores_moves_there() {
        let mut w = world_from("@.", no_camera());
        assert_eq!(w.phase, Phase::Intro);
        let before = w.player.position();
        assert_eq!(w.handle(Command::Move(Direction::Right)), Flow::Continue);
        // the key only dismisses the intro
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.player.position(), before);
        assert_eq!(w.last_event, Some(GameEvent::PhaseChanged(Phase::Playing)));
    }

    #[test]
    fn quit_from_either_phase() {
        let mut w = world_from("@", no_camera());
        assert_eq!(w.handle(Command::Quit), Flow::Quit);
        let mut w = playing("@", no_camera());
        assert_eq!(w.handle(Command::Quit), Flow::Quit);
    }

    #[test]
    fn other_keys_do_nothing_while_playing() {
        let mut w = playing("@.", no_camera());
        let before = w.player.position();
        assert_eq!(w.handle(Command::Other), Flow::Continue);
        assert_eq!(w.player.position(), before);
        assert_eq!(w.phase, Phase::Playing);
    }

    // ── movement ──

    #[test]
    fn boxed_in_player_cannot_move() {
        let mut w = playing("###\n#@#\n###", no_camera());
        assert_eq!(w.map.spawn, Cell::new(1, 1));
        let before = w.player.position();
        for dir in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
            w.handle(Command::Move(dir));
            assert_eq!(w.last_event, Some(GameEvent::Blocked(BlockReason::Wall)), "{dir:?}");
            assert_eq!(w.player.position(), before, "{dir:?}");
        }
    }

    #[test]
    fn accepted_moves_always_land_on_empty_in_bounds_cells() {
        let mut w = playing("@..#\n.#..\n....", no_camera());
        let dirs = [
            Direction::Right, Direction::Right, Direction::Right, Direction::Down,
            Direction::Down, Direction::Left, Direction::Up, Direction::Left,
            Direction::Down, Direction::Down, Direction::Left, Direction::Left,
        ];
        for dir in dirs {
            w.handle(Command::Move(dir));
            let cell = w.player_cell();
            assert!(w.map.in_bounds(cell));
            let tile = w.map.tiles.iter().find(|t| t.cell == cell).unwrap();
            assert_eq!(tile.kind, TileKind::Empty);
        }
    }

    #[test]
    fn grid_gap_blocks_without_panicking() {
        let mut w = playing("@?", no_camera());
        let before = w.player.position();
        w.handle(Command::Move(Direction::Right));
        assert_eq!(w.last_event, Some(GameEvent::GridGap { cell: Cell::new(1, 0) }));
        assert_eq!(w.player.position(), before);
    }

    #[test]
    fn other_move_errors_are_blocked_moves() {
        let err = GameError::AssetMissing(PathBuf::from("sprites.toml"));
        assert_eq!(
            move_event(Direction::Up, Err(err)),
            GameEvent::Blocked(BlockReason::Wall),
        );
        assert_eq!(
            move_event(Direction::Up, Err(GameError::InconsistentGrid { col: 2, row: 1 })),
            GameEvent::GridGap { cell: Cell::new(2, 1) },
        );
    }

    #[test]
    fn independent_worlds_do_not_share_state() {
        let mut a = playing("@.", no_camera());
        let b = playing("@.", no_camera());
        a.handle(Command::Move(Direction::Right));
        assert_eq!(a.player_cell(), Cell::new(1, 0));
        assert_eq!(b.player_cell(), Cell::new(0, 0));
    }

    // ── draw pass / camera ──

    #[test]
    fn draw_list_is_tiles_then_player() {
        let w = world_from("#@", no_camera());
        let items = w.draw_list();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], DrawItem { pos: (0, 0), sprite: SpriteId::Wall });
        assert_eq!(items[1], DrawItem { pos: (50, 0), sprite: SpriteId::Empty });
        assert_eq!(items[2], DrawItem { pos: (65, 5), sprite: SpriteId::Player });
    }

    #[test]
    fn camera_viewport_defaults_to_level_size() {
        let w = world_from("...\n.@.", camera(0, 0));
        assert_eq!(w.view_size(), (150, 100));
        let w = world_from("...\n.@.", no_camera());
        assert_eq!(w.view_size(), (150, 100));
    }

    #[test]
    fn camera_keeps_player_centered() {
        let mut w = playing(".....\n.....\n@....", camera(800, 600));
        let center = |w: &GameWorld| {
            let p = w.draw_list().last().copied().unwrap();
            (p.pos.0 + w.player.w / 2, p.pos.1 + w.player.h / 2)
        };
        assert_eq!(center(&w), (400, 300));

        w.handle(Command::Move(Direction::Right));
        w.update_camera();
        assert_eq!(center(&w), (400, 300));
    }

    #[test]
    fn camera_wraps_tiles_around_viewport() {
        // 4x1 level, 200x50 viewport, player in column 0:
        // offset = (100 - 25, 25 - 25) = (75, 0)
        let w = world_from("@...", camera(200, 50));
        let xs: Vec<i32> = w.draw_list().iter().take(4).map(|d| d.pos.0).collect();
        assert_eq!(xs, vec![75, 125, 175, 25]);
    }
}
