use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::*;

/// Compass direction of one cell face.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    pub const fn rotated_cw(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    pub const fn as_set(self) -> DirSet {
        match self {
            Self::North => DirSet::NORTH,
            Self::East => DirSet::EAST,
            Self::South => DirSet::SOUTH,
            Self::West => DirSet::WEST,
        }
    }

    /// Steps one cell in this direction, returning a value only while it
    /// remains inside `bounds` (rows, cols). Row 0 is the northernmost row.
    pub fn step(self, (row, col): Coord2, (rows, cols): Coord2) -> Option<Coord2> {
        let next = match self {
            Self::North => (row.checked_sub(1)?, col),
            Self::East => (row, col.checked_add(1)?),
            Self::South => (row.checked_add(1)?, col),
            Self::West => (row, col.checked_sub(1)?),
        };
        (next.0 < rows && next.1 < cols).then_some(next)
    }

    /// Direction from `a` to an orthogonally adjacent `b`, if any.
    pub fn between(a: Coord2, b: Coord2) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dir| dir.step(a, (Coord::MAX, Coord::MAX)) == Some(b))
    }
}

bitflags! {
    /// Set of faces a cell conducts water through.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    pub struct DirSet: u8 {
        const NORTH = 0b0001;
        const EAST = 0b0010;
        const SOUTH = 0b0100;
        const WEST = 0b1000;
    }
}

impl DirSet {
    /// Rotates every face in the set a quarter turn clockwise.
    pub const fn rotated_cw(self) -> Self {
        let bits = self.bits();
        Self::from_bits_truncate(((bits << 1) | (bits >> 3)) & Self::all().bits())
    }

    pub const fn rotated_cw_by(self, steps: u8) -> Self {
        let mut set = self;
        let mut left = steps % 4;
        while left > 0 {
            set = set.rotated_cw();
            left -= 1;
        }
        set
    }

    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |dir| self.contains(dir.as_set()))
    }
}
