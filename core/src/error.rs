use thiserror::Error;

use crate::*;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Unknown pipe kind code {0}")]
    UnknownKindCode(u8),
    #[error("Level data holds {len} cells, expected {rows}x{cols}")]
    InvalidLevelShape { rows: Coord, cols: Coord, len: usize },
    #[error("Level must have at least one row and one column")]
    ZeroLevelSize,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Session needs at least one level")]
    NoLevels,
}

pub type Result<T> = core::result::Result<T, GameError>;
