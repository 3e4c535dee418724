//! Random perfect mazes, carved with a randomized Prim's algorithm.
//!
//! Passages live on the odd `(row, col)` lattice and walls fill everything
//! else, so the border is always walled and every passage is connected.

use rand::Rng;
use rand::seq::IndexedRandom;
use smallvec::SmallVec;
use thiserror::Error;

use crate::problems::maze::CellType;
use crate::problems::maze::Maze;
use crate::problems::maze::MazeError;

pub const MIN_SIZE: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Maze size has to be odd for proper bounds, got {0}")]
    EvenSize(usize),
    #[error("Maze size has to be at least {MIN_SIZE}, got {0}")]
    TooSmall(usize),
    #[error("Generated an invalid maze: {e}")]
    InvalidMaze {
        #[from]
        e: MazeError,
    },
}

type Position = (usize, usize);

/// Lattice cells two steps away in each direction.
fn lattice_neighbours(size: usize, (row, col): Position) -> SmallVec<[Position; 4]> {
    let mut v = SmallVec::new();
    if row >= 2 {
        v.push((row - 2, col));
    }
    if col + 2 < size {
        v.push((row, col + 2));
    }
    if row + 2 < size {
        v.push((row + 2, col));
    }
    if col >= 2 {
        v.push((row, col - 2));
    }
    v
}

/// Generates a `size`x`size` maze with the source at the top-left passage
/// and the destination at the bottom-right one.
pub fn generate<R: Rng>(size: usize, rng: &mut R) -> Result<Maze, GeneratorError> {
    if size < MIN_SIZE {
        return Err(GeneratorError::TooSmall(size));
    }
    if size % 2 == 0 {
        return Err(GeneratorError::EvenSize(size));
    }

    let mut passage = vec![vec![false; size]; size];
    let mut queued = vec![vec![false; size]; size];
    let mut frontier = Vec::<Position>::new();

    let start: Position = (1, 1);
    passage[start.0][start.1] = true;
    for (r, c) in lattice_neighbours(size, start) {
        queued[r][c] = true;
        frontier.push((r, c));
    }

    while !frontier.is_empty() {
        let cell = frontier.swap_remove(rng.random_range(0..frontier.len()));

        let carved: SmallVec<[Position; 4]> = lattice_neighbours(size, cell)
            .into_iter()
            .filter(|&(r, c)| passage[r][c])
            .collect();
        if let Some(&other) = carved.choose(rng) {
            // Knock down the wall between both cells.
            passage[cell.0][cell.1] = true;
            passage[(cell.0 + other.0) / 2][(cell.1 + other.1) / 2] = true;
        }

        for (r, c) in lattice_neighbours(size, cell) {
            if !passage[r][c] && !queued[r][c] {
                queued[r][c] = true;
                frontier.push((r, c));
            }
        }
    }

    let mut grid: Vec<Vec<CellType>> = passage
        .iter()
        .map(|row| {
            row.iter()
                .map(|&open| if open { CellType::Empty } else { CellType::Wall })
                .collect()
        })
        .collect();
    grid[1][1] = CellType::Source;
    grid[size - 2][size - 2] = CellType::Destination;

    let maze = Maze::from_grid(grid)?;
    log::debug!("Generated {maze:?}");
    Ok(maze)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use crate::problems::maze::Coord;

    #[test]
    fn rejects_bad_sizes() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(generate(3, &mut rng).unwrap_err(), GeneratorError::TooSmall(3));
        assert_eq!(generate(8, &mut rng).unwrap_err(), GeneratorError::EvenSize(8));
    }

    #[test]
    fn lattice_is_fully_carved() {
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let size = 11;
            let maze = generate(size, &mut rng).unwrap();

            assert_eq!(maze.dimensions(), (size, size));
            assert_eq!(maze.source(), Coord::new(1, 1));
            assert_eq!(maze.destination(), Coord::new(9, 9));

            for cell in maze.cells() {
                let (r, c) = (cell.coordinate.row as usize, cell.coordinate.col as usize);
                let border = r == 0 || c == 0 || r == size - 1 || c == size - 1;
                if border || (r % 2 == 0 && c % 2 == 0) {
                    assert_eq!(cell.kind, CellType::Wall, "{}", cell.coordinate);
                }
                if r % 2 == 1 && c % 2 == 1 {
                    assert!(!cell.is_blocking(), "{}", cell.coordinate);
                }
            }

            // A spanning tree over the lattice has one passage per edge.
            let lattice = (size / 2) * (size / 2);
            let open = maze.cells().filter(|c| !c.is_blocking()).count();
            assert_eq!(open, lattice + (lattice - 1));
        }
    }

    #[test]
    fn deterministic_per_seed() {
        let a = generate(15, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let b = generate(15, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let c = generate(15, &mut ChaCha8Rng::seed_from_u64(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
