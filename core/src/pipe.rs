use serde::{Deserialize, Serialize};

use crate::*;

/// Pipe segment shapes, one per stable level-data code. The base direction
/// set is what the segment conducts through before any rotation is applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PipeKind {
    Empty = 0,
    Source = 1,
    StraightNS = 2,
    StraightEW = 3,
    ElbowNE = 4,
    ElbowES = 5,
    ElbowSW = 6,
}

impl PipeKind {
    pub const fn from_code(code: u8) -> Result<Self> {
        Ok(match code {
            0 => Self::Empty,
            1 => Self::Source,
            2 => Self::StraightNS,
            3 => Self::StraightEW,
            4 => Self::ElbowNE,
            5 => Self::ElbowES,
            6 => Self::ElbowSW,
            _ => return Err(GameError::UnknownKindCode(code)),
        })
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn base_directions(self) -> DirSet {
        match self {
            Self::Empty => DirSet::empty(),
            // a source conducts on every face no matter what it touches
            Self::Source => DirSet::all(),
            Self::StraightNS => DirSet::NORTH.union(DirSet::SOUTH),
            Self::StraightEW => DirSet::EAST.union(DirSet::WEST),
            Self::ElbowNE => DirSet::NORTH.union(DirSet::EAST),
            Self::ElbowES => DirSet::EAST.union(DirSet::SOUTH),
            Self::ElbowSW => DirSet::SOUTH.union(DirSet::WEST),
        }
    }

    pub const fn is_conducting(self) -> bool {
        !matches!(self, Self::Empty)
    }

    pub const fn is_source(self) -> bool {
        matches!(self, Self::Source)
    }

    /// Whether a quarter turn leaves the open-direction set unchanged.
    pub const fn is_rotation_symmetric(self) -> bool {
        matches!(self, Self::Empty | Self::Source)
    }
}

impl Default for PipeKind {
    fn default() -> Self {
        Self::Empty
    }
}

/// One board position. `filled` is derived state: only the flow
/// recomputation writes it, everything else reads it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeCell {
    kind: PipeKind,
    rotation_steps: u8,
    filled: bool,
}

impl PipeCell {
    pub const fn new(kind: PipeKind) -> Self {
        Self {
            kind,
            rotation_steps: 0,
            filled: false,
        }
    }

    pub const fn kind(self) -> PipeKind {
        self.kind
    }

    pub const fn rotation_steps(self) -> u8 {
        self.rotation_steps
    }

    pub const fn is_filled(self) -> bool {
        self.filled
    }

    /// Faces this cell conducts through in its current orientation.
    pub const fn open_directions(self) -> DirSet {
        self.kind.base_directions().rotated_cw_by(self.rotation_steps)
    }

    /// Replaces the segment, dropping orientation and fill state.
    pub(crate) fn set_kind(&mut self, kind: PipeKind) -> EditOutcome {
        if self.kind == kind && self.rotation_steps == 0 {
            return EditOutcome::NoChange;
        }
        self.kind = kind;
        self.rotation_steps = 0;
        self.filled = false;
        EditOutcome::Changed
    }

    /// Advances a quarter turn clockwise; symmetric kinds stay put.
    pub(crate) fn rotate(&mut self) -> EditOutcome {
        if self.kind.is_rotation_symmetric() {
            return EditOutcome::NoChange;
        }
        self.rotation_steps = (self.rotation_steps + 1) % 4;
        self.filled = false;
        EditOutcome::Changed
    }

    pub(crate) fn set_filled(&mut self, filled: bool) {
        self.filled = filled;
    }
}
