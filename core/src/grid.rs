use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// The playing board: an arena of cells indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<PipeCell>,
}

impl Grid {
    pub(crate) fn from_kinds(rows: Coord, cols: Coord, kinds: &[PipeKind]) -> Self {
        let cells = kinds.iter().map(|&kind| PipeCell::new(kind)).collect();
        let cells = Array2::from_shape_vec((rows as usize, cols as usize), cells)
            .expect("kind count matches the declared shape");
        Self { cells }
    }

    /// Board size as `(rows, cols)`.
    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size.0 && coords.1 < size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> PipeCell {
        self.cells[coords.to_nd_index()]
    }

    /// Adjacent coordinates in the given compass direction, if on the board.
    pub fn neighbor(&self, coords: Coord2, direction: Direction) -> Option<Coord2> {
        direction.step(coords, self.size())
    }

    /// Neighbors reachable from `coords` through a shared face both cells
    /// have open. Water conducts exactly along these edges.
    pub fn connected_neighbors(&self, coords: Coord2) -> SmallVec<[Coord2; 4]> {
        let cell = self.cell_at(coords);
        let mut connected = SmallVec::new();
        for direction in cell.open_directions().directions() {
            let Some(next) = self.neighbor(coords, direction) else {
                continue;
            };
            let other = self.cell_at(next);
            if other.open_directions().contains(direction.opposite().as_set()) {
                connected.push(next);
            }
        }
        connected
    }

    /// Rotates the cell a quarter turn clockwise. The fill state is stale
    /// until the next recomputation.
    pub fn rotate(&mut self, coords: Coord2) -> EditOutcome {
        self.cells[coords.to_nd_index()].rotate()
    }

    /// Replaces the cell's segment kind. The fill state is stale until the
    /// next recomputation.
    pub fn set_kind(&mut self, coords: Coord2, kind: PipeKind) -> EditOutcome {
        self.cells[coords.to_nd_index()].set_kind(kind)
    }

    pub(crate) fn set_filled(&mut self, coords: Coord2, filled: bool) {
        self.cells[coords.to_nd_index()].set_filled(filled);
    }

    pub(crate) fn clear_fill(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.set_filled(false);
        }
    }

    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    /// Cells that originate flow, re-derived from the live board.
    pub fn source_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_coords()
            .filter(|&coords| self.cell_at(coords).kind().is_source())
    }

    pub fn conducting_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.kind().is_conducting())
            .count()
            .try_into()
            .unwrap()
    }

    pub fn filled_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_filled())
            .count()
            .try_into()
            .unwrap()
    }

    /// Row-major kind codes, the persistent form of the board.
    pub fn kind_codes(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.kind().code()).collect()
    }

    /// Snapshot of the current kinds as level data. Orientation is not
    /// persisted: a reloaded level starts unrotated.
    pub fn to_level(&self) -> LevelData {
        let (rows, cols) = self.size();
        LevelData {
            rows,
            cols,
            cells: self.kind_codes(),
        }
    }
}

impl Index<Coord2> for Grid {
    type Output = PipeCell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
