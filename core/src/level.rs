use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Persistent level description: board size plus row-major kind codes
/// (`index = row * cols + col`). The code-to-shape mapping is a stable
/// contract with level authors, see [`PipeKind`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub rows: Coord,
    pub cols: Coord,
    pub cells: Vec<u8>,
}

impl LevelData {
    pub fn new(rows: Coord, cols: Coord, cells: Vec<u8>) -> Result<Self> {
        let level = Self { rows, cols, cells };
        level.validate()?;
        Ok(level)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::ZeroLevelSize);
        }
        if self.cells.len() != self.total_cells() as usize {
            return Err(GameError::InvalidLevelShape {
                rows: self.rows,
                cols: self.cols,
                len: self.cells.len(),
            });
        }
        for &code in &self.cells {
            PipeKind::from_code(code)?;
        }
        Ok(())
    }

    /// Builds a fresh, unrotated, unfilled board. Malformed data fails here
    /// without constructing anything.
    pub fn build_grid(&self) -> Result<Grid> {
        self.validate()?;
        let kinds: Vec<PipeKind> = self
            .cells
            .iter()
            .map(|&code| PipeKind::from_code(code))
            .collect::<Result<_>>()?;
        Ok(Grid::from_kinds(self.rows, self.cols, &kinds))
    }

    pub fn from_json(text: &str) -> core::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> core::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
