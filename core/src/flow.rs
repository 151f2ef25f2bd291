use alloc::collections::VecDeque;
use hashbrown::HashSet;

use crate::*;

/// Result of one full fill recomputation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FillSummary {
    pub filled: CellCount,
    pub conducting: CellCount,
}

impl FillSummary {
    /// Whether every non-empty cell is filled. An all-empty board is
    /// trivially complete.
    pub const fn is_complete(self) -> bool {
        self.filled == self.conducting
    }
}

/// Recomputes the filled set from scratch: breadth-first from every source
/// through mutually open faces. Empty cells are never enqueued and never
/// filled. Runs to completion; each cell enqueues at most once.
pub fn recompute(grid: &mut Grid) -> FillSummary {
    grid.clear_fill();

    let mut visited: HashSet<Coord2> = grid.source_coords().collect();
    let mut worklist: VecDeque<Coord2> = visited.iter().copied().collect();
    log::trace!("flow recompute, {} source cells", worklist.len());

    while let Some(coords) = worklist.pop_front() {
        for next in grid.connected_neighbors(coords) {
            if visited.insert(next) {
                log::trace!("water reaches {:?} from {:?}", next, coords);
                worklist.push_back(next);
            }
        }
    }

    for &coords in &visited {
        grid.set_filled(coords, true);
    }

    let summary = FillSummary {
        filled: visited.len().try_into().unwrap(),
        conducting: grid.conducting_count(),
    };
    log::debug!(
        "flow recompute done, {}/{} cells filled",
        summary.filled,
        summary.conducting
    );
    summary
}
