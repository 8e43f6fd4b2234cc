//! Pure game model: geometry, tiles, the actor, and the camera.
//! Nothing in here touches the terminal or the filesystem.

pub mod actor;
pub mod camera;
pub mod geom;
pub mod tile;
pub mod tile_map;
