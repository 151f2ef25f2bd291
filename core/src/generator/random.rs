use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashSet;

use super::*;

const WALK_ATTEMPTS: usize = 16;

/// Carves a self-avoiding random walk across the board and turns it into a
/// level: the walk head becomes the source, every other walk cell the
/// straight or elbow shape class its bends require. Orientation is the
/// player's job, so the emitted codes stay unrotated base shapes.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomWalkGenerator {
    seed: u64,
    size: Coord2,
    target_len: CellCount,
}

impl RandomWalkGenerator {
    pub fn new(seed: u64, (rows, cols): Coord2, target_len: CellCount) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let cols = cols.clamp(1, Coord::MAX);
        let target_len = target_len.clamp(1, mult(rows, cols));
        Self {
            seed,
            size: (rows, cols),
            target_len,
        }
    }
}

impl LevelGenerator for RandomWalkGenerator {
    fn generate(self) -> LevelData {
        use rand::prelude::*;

        let (rows, cols) = self.size;
        let mut rng = SmallRng::seed_from_u64(self.seed);

        // self-avoiding walks dead-end early on narrow boards, keep the
        // longest of a bounded number of tries
        let mut best: Vec<Coord2> = Vec::new();
        for _ in 0..WALK_ATTEMPTS {
            let walk = carve_walk(&mut rng, self.size, self.target_len);
            if walk.len() > best.len() {
                best = walk;
            }
            if best.len() >= self.target_len as usize {
                break;
            }
        }
        if (best.len() as CellCount) < self.target_len {
            log::warn!(
                "walk stopped at {} cells, requested {}",
                best.len(),
                self.target_len
            );
        }

        let mut cells = vec![PipeKind::Empty.code(); mult(rows, cols) as usize];
        for (i, &(row, col)) in best.iter().enumerate() {
            let code = if i == 0 {
                PipeKind::Source.code()
            } else {
                shape_code(best[i - 1], (row, col), best.get(i + 1).copied())
            };
            cells[row as usize * cols as usize + col as usize] = code;
        }

        LevelData { rows, cols, cells }
    }
}

/// Shape class a walk cell needs: a straight when it is passed through in a
/// line (or is the walk tail), an elbow when the walk bends.
fn shape_code(prev: Coord2, cell: Coord2, next: Option<Coord2>) -> u8 {
    let Some(next) = next else {
        return PipeKind::StraightNS.code();
    };
    match (Direction::between(cell, prev), Direction::between(cell, next)) {
        (Some(inward), Some(outward)) if outward == inward.opposite() => {
            PipeKind::StraightNS.code()
        }
        _ => PipeKind::ElbowNE.code(),
    }
}

fn carve_walk(
    rng: &mut rand::rngs::SmallRng,
    (rows, cols): Coord2,
    target: CellCount,
) -> Vec<Coord2> {
    use rand::prelude::*;

    let start = (rng.random_range(0..rows), rng.random_range(0..cols));
    let mut occupied = HashSet::new();
    occupied.insert(start);
    let mut walk = vec![start];

    while (walk.len() as CellCount) < target {
        let Some(&head) = walk.last() else {
            break;
        };
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        let next = directions
            .into_iter()
            .find_map(|dir| dir.step(head, (rows, cols)).filter(|next| !occupied.contains(next)));
        match next {
            Some(next) => {
                occupied.insert(next);
                walk.push(next);
            }
            None => break,
        }
    }
    walk
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64, size: Coord2, target: CellCount) -> LevelData {
        RandomWalkGenerator::new(seed, size, target).generate()
    }

    /// Exhaustive rotation search, small boards only.
    fn is_solvable(level: &LevelData) -> bool {
        let grid = level.build_grid().unwrap();
        let rotatable: Vec<Coord2> = grid
            .iter_coords()
            .filter(|&coords| {
                let kind = grid.cell_at(coords).kind();
                kind.is_conducting() && !kind.is_rotation_symmetric()
            })
            .collect();
        assert!(rotatable.len() <= 8, "exhaustive search only for tiny boards");

        for combo in 0..4usize.pow(rotatable.len() as u32) {
            let mut candidate = grid.clone();
            let mut remaining = combo;
            for &coords in &rotatable {
                for _ in 0..(remaining % 4) {
                    candidate.rotate(coords);
                }
                remaining /= 4;
            }
            if flow::recompute(&mut candidate).is_complete() {
                return true;
            }
        }
        false
    }

    #[test]
    fn generated_levels_validate() {
        for seed in 0..8 {
            let level = generate(seed, (5, 5), 12);
            level.validate().unwrap();
            assert_eq!(level.total_cells(), 25);
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        assert_eq!(generate(42, (6, 6), 20), generate(42, (6, 6), 20));
        assert_ne!(generate(42, (6, 6), 20), generate(43, (6, 6), 20));
    }

    #[test]
    fn exactly_one_source_and_only_walk_shapes() {
        let level = generate(7, (5, 5), 10);
        let sources = level
            .cells
            .iter()
            .filter(|&&code| code == PipeKind::Source.code())
            .count();
        assert_eq!(sources, 1);
        for &code in &level.cells {
            assert!([0, 1, 2, 4].contains(&code), "unexpected code {}", code);
        }
    }

    #[test]
    fn generated_levels_are_solvable_by_rotation() {
        for seed in 0..4 {
            let level = generate(seed, (3, 3), 6);
            assert!(is_solvable(&level), "seed {} produced an unsolvable level", seed);
        }
    }

    #[test]
    fn degenerate_sizes_still_generate() {
        let level = generate(1, (1, 1), 5);
        level.validate().unwrap();
        assert_eq!(level.cells, alloc::vec![PipeKind::Source.code()]);
    }
}
