/// Error taxonomy.
///
/// Everything except `InconsistentGrid` is fatal: `main` prints it and exits.
/// `InconsistentGrid` is caught by the frame loop and treated as a blocked move.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems with the level map itself.
#[derive(Debug, Error)]
pub enum MapFormatError {
    #[error("map file '{}' could not be read: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("map is empty")]
    Empty,
    #[error("map must contain exactly one player marker '@', found {0}")]
    SpawnCount(usize),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Map(#[from] MapFormatError),

    #[error("asset file '{}' not found", .0.display())]
    AssetMissing(PathBuf),

    #[error("asset file '{}' is invalid: {reason}", path.display())]
    AssetInvalid { path: PathBuf, reason: String },

    /// Collision lookup found no tile under the actor.
    #[error("no tile under actor at cell ({col}, {row})")]
    InconsistentGrid { col: i32, row: i32 },

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}
