//! The JSON maze definition written by the maze editor.
//!
//! A file holds the grid as an array of rows, each cell stored as
//!
//! ```json
//! { "Coordinate": { "Item1": 3, "Item2": 1 }, "Type": 5 }
//! ```
//!
//! Coordinates are written column first (`Item1` is the column) and are read
//! back as `(row, col)`. `Type` is the position of the kind in [`CellType`].

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::problems::maze::Cell;
use crate::problems::maze::CellType;
use crate::problems::maze::Coord;
use crate::problems::maze::CoordIntrinsic;
use crate::problems::maze::Maze;
use crate::problems::maze::MazeError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCoordinate {
    /// Column
    #[serde(rename = "Item1")]
    pub x: CoordIntrinsic,
    /// Row
    #[serde(rename = "Item2")]
    pub y: CoordIntrinsic,
}

impl From<Coord> for FileCoordinate {
    fn from(c: Coord) -> Self {
        FileCoordinate { x: c.col, y: c.row }
    }
}

impl From<FileCoordinate> for Coord {
    fn from(c: FileCoordinate) -> Self {
        Coord::new(c.y, c.x)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressedCell {
    #[serde(rename = "Coordinate")]
    pub coordinate: FileCoordinate,
    #[serde(rename = "Type")]
    pub kind: CellType,
}

impl From<&Cell> for CompressedCell {
    fn from(cell: &Cell) -> Self {
        CompressedCell {
            coordinate: cell.coordinate.into(),
            kind: cell.kind,
        }
    }
}

impl From<CompressedCell> for Cell {
    fn from(cell: CompressedCell) -> Self {
        Cell::new(cell.coordinate.into(), cell.kind)
    }
}

#[derive(Debug, Error)]
pub enum MazeFileError {
    #[error("I/O error when accessing '{p}': {e}")]
    IOError { p: PathBuf, e: std::io::Error },
    #[error("Malformed maze JSON: {e}")]
    JsonError {
        #[from]
        e: serde_json::Error,
    },
    #[error("Invalid maze: {e}")]
    InvalidMaze {
        #[from]
        e: MazeError,
    },
}

/// Lays the maze out the way it's stored.
pub fn to_file_cells(maze: &Maze) -> Vec<Vec<CompressedCell>> {
    let cells: Vec<Cell> = maze.cells().collect();
    let (_, cols) = maze.dimensions();
    cells
        .chunks(cols)
        .map(|row| row.iter().map(CompressedCell::from).collect())
        .collect()
}

/// Rebuilds and validates a maze from its stored layout.
pub fn from_file_cells(grid: Vec<Vec<CompressedCell>>) -> Result<Maze, MazeError> {
    let rows = grid.len();
    let cols = grid.first().map(Vec::len).unwrap_or(0);

    let mut cells = Vec::<Cell>::with_capacity(rows * cols);
    for (row, line) in grid.into_iter().enumerate() {
        if line.len() != cols {
            return Err(MazeError::RaggedRow {
                row,
                expected: cols,
                found: line.len(),
            });
        }
        cells.extend(line.into_iter().map(Cell::from));
    }

    Maze::from_cells(rows, cols, cells)
}

pub fn to_json(maze: &Maze) -> Result<String, MazeFileError> {
    Ok(serde_json::to_string_pretty(&to_file_cells(maze))?)
}

pub fn from_json(json: &str) -> Result<Maze, MazeFileError> {
    let grid: Vec<Vec<CompressedCell>> = serde_json::from_str(json)?;
    Ok(from_file_cells(grid)?)
}

pub fn load(p: &Path) -> Result<Maze, MazeFileError> {
    let json = std::fs::read_to_string(p).map_err(|e| MazeFileError::IOError {
        p: p.to_path_buf(),
        e,
    })?;
    let maze = from_json(&json)?;
    log::debug!("Loaded {maze:?} from {p:?}");
    Ok(maze)
}

pub fn save(maze: &Maze, p: &Path) -> Result<(), MazeFileError> {
    let json = to_json(maze)?;
    std::fs::write(p, json).map_err(|e| MazeFileError::IOError {
        p: p.to_path_buf(),
        e,
    })?;
    log::debug!("Saved {maze:?} to {p:?}");
    Ok(())
}
