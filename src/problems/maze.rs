//! A grid maze with a single moving selection.
//!
//! The maze has a fixed shape. Exploring it means moving the selection from
//! the source towards the destination, leaving a trail of visited cells
//! behind, so every search step works on its own clone.

use std::hash::Hash;
use std::hash::Hasher;

use derive_more::Display;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub type CoordIntrinsic = u32;

/// Number of cell-steps between a goal cell and the destination.
///
/// The search stops next to the destination, not on it.
pub const GOAL_DISTANCE: CoordIntrinsic = 1;

/// A `(row, col)` position in the grid.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("({row},{col})")]
pub struct Coord {
    pub row: CoordIntrinsic,
    pub col: CoordIntrinsic,
}

impl Coord {
    #[inline(always)]
    pub const fn new(row: CoordIntrinsic, col: CoordIntrinsic) -> Self {
        Self { row, col }
    }

    pub fn new_from_usize(row: usize, col: usize) -> Option<Coord> {
        let row = (row < CoordIntrinsic::MAX as usize).then_some(row as CoordIntrinsic)?;
        let col = (col < CoordIntrinsic::MAX as usize).then_some(col as CoordIntrinsic)?;
        Some(Coord { row, col })
    }

    /// Moves one step towards `direction`.
    ///
    /// Stepping off the top or left edge wraps around to `CoordIntrinsic::MAX`,
    /// which no maze can contain, so bounds checks reject it.
    #[inline(always)]
    pub fn wrapping_step(&self, direction: Direction) -> Coord {
        let (d_row, d_col) = direction.offset();
        Coord {
            row: self.row.wrapping_add(d_row),
            col: self.col.wrapping_add(d_col),
        }
    }

    /// Grid (Manhattan) distance.
    #[inline(always)]
    pub fn manhattan_distance(&self, other: &Coord) -> CoordIntrinsic {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Direction {
    #[display("↑")]
    Up, // row--
    #[display("↓")]
    Down, // row++
    #[display("←")]
    Left, // col--
    #[display("→")]
    Right, // col++
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[inline(always)]
    fn offset(self) -> (CoordIntrinsic, CoordIntrinsic) {
        let prev = CoordIntrinsic::MAX;
        let same = 0 as CoordIntrinsic;
        let next = 1 as CoordIntrinsic;

        #[rustfmt::skip]
        let offset = match self {
            Direction::Up    => (prev, same),
            Direction::Down  => (next, same),
            Direction::Left  => (same, prev),
            Direction::Right => (same, next),
        };
        offset
    }
}

/// The movement model: orthogonal single-cell moves, expanded in this order.
///
/// Manhattan distance never overestimates the number of these moves, which
/// keeps A* optimal.
pub const MOVEMENT: [Direction; 4] = Direction::ALL;

/// Cell kinds, stored in maze files by their position in this list.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CellType {
    #[default]
    #[display(" ")]
    Empty,
    #[display("s")]
    Source,
    #[display("d")]
    Destination,
    #[display("*")]
    Visited,
    #[display("$")]
    Selected,
    #[display("%")]
    Wall,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellParseError {
    #[error("Invalid character '{0}' found.")]
    InvalidCharacter(char),
    #[error("Invalid cell tag {0}.")]
    InvalidTag(u8),
}

impl std::convert::From<CellType> for u8 {
    fn from(kind: CellType) -> u8 {
        match kind {
            CellType::Empty => 0,
            CellType::Source => 1,
            CellType::Destination => 2,
            CellType::Visited => 3,
            CellType::Selected => 4,
            CellType::Wall => 5,
        }
    }
}

impl std::convert::TryFrom<u8> for CellType {
    type Error = CellParseError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(CellType::Empty),
            1 => Ok(CellType::Source),
            2 => Ok(CellType::Destination),
            3 => Ok(CellType::Visited),
            4 => Ok(CellType::Selected),
            5 => Ok(CellType::Wall),
            tag => Err(CellParseError::InvalidTag(tag)),
        }
    }
}

impl std::convert::TryFrom<char> for CellType {
    type Error = CellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            ' ' | '.' => Ok(CellType::Empty),
            's' => Ok(CellType::Source),
            'd' => Ok(CellType::Destination),
            '*' => Ok(CellType::Visited),
            '$' => Ok(CellType::Selected),
            '%' | '#' => Ok(CellType::Wall),
            ch => Err(CellParseError::InvalidCharacter(ch)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub coordinate: Coord,
    pub kind: CellType,
}

impl Cell {
    #[inline(always)]
    pub const fn new(coordinate: Coord, kind: CellType) -> Self {
        Self { coordinate, kind }
    }

    #[inline(always)]
    pub fn distance_to(&self, other: &Cell) -> CoordIntrinsic {
        self.coordinate.manhattan_distance(&other.coordinate)
    }

    #[inline(always)]
    pub fn is_blocking(&self) -> bool {
        self.kind == CellType::Wall
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("Empty maze")]
    EmptyGrid,
    #[error("A {rows}x{cols} maze is too large")]
    TooLarge { rows: usize, cols: usize },
    #[error("Expected {expected} cells, found {found}")]
    CellCount { expected: usize, found: usize },
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid cell {e} found at ({row},{col})")]
    InvalidCell {
        e: CellParseError,
        row: usize,
        col: usize,
    },
    #[error("Cell stored at ({row},{col}) claims to be at {found}")]
    CoordinateMismatch { row: usize, col: usize, found: Coord },
    #[error("{coord} is outside of a {rows}x{cols} maze")]
    OutOfBounds {
        coord: Coord,
        rows: usize,
        cols: usize,
    },
    #[error("Source and destination overlap at {0}")]
    OverlappingEndpoints(Coord),
    #[error("A maze needs exactly one source, found {0}")]
    SourceCount(usize),
    #[error("A maze needs exactly one destination, found {0}")]
    DestinationCount(usize),
    #[error("A maze allows at most one selected cell, found {0}")]
    SelectedCount(usize),
}

/// A rectangular grid of cells with a source, a destination and the
/// currently selected cell.
///
/// Only the kind of each cell is stored, its coordinate follows from its
/// position. Every search state owns a copy of this grid.
///
/// Two mazes are equal when their grids are equal cell-by-cell, visited
/// trail included. Since the selection can't step onto visited cells, the
/// trail changes which moves remain and is part of the search state.
#[derive(Clone)]
pub struct Maze {
    rows: usize,
    cols: usize,
    /// Row-major cell kinds.
    kinds: Vec<CellType>,
    source: Coord,
    destination: Coord,
    selected: Coord,
}

impl Maze {
    /// Builds a maze from row-major cells, checking the cells sit where they
    /// claim and that there's a single source, a single destination and at
    /// most one selected cell.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Result<Self, MazeError> {
        if rows == 0 || cols == 0 {
            return Err(MazeError::EmptyGrid);
        }
        if Coord::new_from_usize(rows, cols).is_none() {
            return Err(MazeError::TooLarge { rows, cols });
        }
        if cells.len() != rows * cols {
            return Err(MazeError::CellCount {
                expected: rows * cols,
                found: cells.len(),
            });
        }

        let mut source: Option<Coord> = None;
        let mut destination: Option<Coord> = None;
        let mut selected: Option<Coord> = None;
        let (mut num_sources, mut num_destinations, mut num_selected) = (0usize, 0usize, 0usize);

        let mut kinds = Vec::<CellType>::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            let (row, col) = (i / cols, i % cols);
            if cell.coordinate.row as usize != row || cell.coordinate.col as usize != col {
                return Err(MazeError::CoordinateMismatch {
                    row,
                    col,
                    found: cell.coordinate,
                });
            }

            match cell.kind {
                CellType::Source => {
                    num_sources += 1;
                    source = Some(cell.coordinate);
                }
                CellType::Destination => {
                    num_destinations += 1;
                    destination = Some(cell.coordinate);
                }
                CellType::Selected => {
                    num_selected += 1;
                    selected = Some(cell.coordinate);
                }
                _ => {}
            }
            kinds.push(cell.kind);
        }

        if num_sources != 1 {
            return Err(MazeError::SourceCount(num_sources));
        }
        if num_destinations != 1 {
            return Err(MazeError::DestinationCount(num_destinations));
        }
        if num_selected > 1 {
            return Err(MazeError::SelectedCount(num_selected));
        }

        match (source, destination) {
            (Some(source), Some(destination)) => {
                let maze = Maze {
                    rows,
                    cols,
                    kinds,
                    source,
                    destination,
                    selected: selected.unwrap_or(source),
                };
                maze.verify();
                Ok(maze)
            }
            _ => unreachable!("Counts were checked above"),
        }
    }

    /// Builds a maze from row-major cell types.
    pub fn from_grid(grid: Vec<Vec<CellType>>) -> Result<Self, MazeError> {
        let rows = grid.len();
        let cols = grid.first().map(Vec::len).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(MazeError::EmptyGrid);
        }
        if Coord::new_from_usize(rows, cols).is_none() {
            return Err(MazeError::TooLarge { rows, cols });
        }

        let mut cells = Vec::<Cell>::with_capacity(rows * cols);
        for (row, line) in grid.iter().enumerate() {
            if line.len() != cols {
                return Err(MazeError::RaggedRow {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
            for (col, kind) in line.iter().enumerate() {
                let coordinate = Coord::new(row as CoordIntrinsic, col as CoordIntrinsic);
                cells.push(Cell::new(coordinate, *kind));
            }
        }

        Self::from_cells(rows, cols, cells)
    }

    /// An open maze with only its endpoints marked.
    pub fn with_endpoints(
        rows: usize,
        cols: usize,
        source: Coord,
        destination: Coord,
    ) -> Result<Self, MazeError> {
        for coord in [source, destination] {
            if coord.row as usize >= rows || coord.col as usize >= cols {
                return Err(MazeError::OutOfBounds { coord, rows, cols });
            }
        }
        if source == destination {
            return Err(MazeError::OverlappingEndpoints(source));
        }

        let mut grid = vec![vec![CellType::Empty; cols]; rows];
        grid[source.row as usize][source.col as usize] = CellType::Source;
        grid[destination.row as usize][destination.col as usize] = CellType::Destination;
        Self::from_grid(grid)
    }

    /// `(rows, cols)`
    #[inline(always)]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn source(&self) -> Coord {
        self.source
    }
    pub fn destination(&self) -> Coord {
        self.destination
    }
    pub fn selected(&self) -> Coord {
        self.selected
    }

    /// The stored grid, one kind per cell in row-major order.
    pub fn kinds(&self) -> &[CellType] {
        &self.kinds
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.kinds.iter().enumerate().map(|(i, kind)| {
            let row = (i / self.cols) as CoordIntrinsic;
            let col = (i % self.cols) as CoordIntrinsic;
            Cell::new(Coord::new(row, col), *kind)
        })
    }

    /// Iterates rows of cell kinds.
    pub fn rows(&self) -> impl Iterator<Item = &[CellType]> {
        self.kinds.chunks(self.cols)
    }

    #[inline(always)]
    fn index_of(&self, coord: &Coord) -> Option<usize> {
        let (row, col) = (coord.row as usize, coord.col as usize);
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    #[inline(always)]
    pub fn contains(&self, coord: &Coord) -> bool {
        self.index_of(coord).is_some()
    }

    /// The cell at `coord`, if it's inside the maze.
    #[inline(always)]
    pub fn lookup(&self, coord: &Coord) -> Option<Cell> {
        self.index_of(coord).map(|i| Cell::new(*coord, self.kinds[i]))
    }

    /// Accesses one of the distinguished coordinates, which are always valid.
    #[inline(always)]
    fn at_mut(&mut self, coord: Coord) -> &mut CellType {
        match self.index_of(&coord) {
            Some(i) => &mut self.kinds[i],
            None => unreachable!("{coord} escaped a {}x{} maze", self.rows, self.cols),
        }
    }

    #[inline(always)]
    fn at(&self, coord: Coord) -> Cell {
        match self.lookup(&coord) {
            Some(cell) => cell,
            None => unreachable!("{coord} escaped a {}x{} maze", self.rows, self.cols),
        }
    }

    pub fn source_cell(&self) -> Cell {
        self.at(self.source)
    }
    pub fn destination_cell(&self) -> Cell {
        self.at(self.destination)
    }
    pub fn selected_cell(&self) -> Cell {
        self.at(self.selected)
    }

    /// The orthogonal neighbours of `coord` as `[top, right, bottom, left]`.
    pub fn neighbors(&self, coord: &Coord) -> [Option<Cell>; 4] {
        [
            self.lookup(&coord.wrapping_step(Direction::Up)),
            self.lookup(&coord.wrapping_step(Direction::Right)),
            self.lookup(&coord.wrapping_step(Direction::Down)),
            self.lookup(&coord.wrapping_step(Direction::Left)),
        ]
    }

    /// Whether the selection could move towards `direction`.
    #[inline(always)]
    pub fn can_move(&self, direction: Direction) -> bool {
        self.index_of(&self.selected.wrapping_step(direction))
            .is_some_and(|i| self.kinds[i] == CellType::Empty)
    }

    /// Moves the selection one step, leaving a visited mark behind.
    ///
    /// Only empty cells can be entered. Anything else (walls, the trail, the
    /// endpoints or the outside of the maze) leaves the maze untouched.
    /// Returns whether the selection moved.
    pub fn move_selection(&mut self, direction: Direction) -> bool {
        if !self.can_move(direction) {
            return false;
        }
        let target = self.selected.wrapping_step(direction);

        let current = self.at_mut(self.selected);
        if *current != CellType::Source {
            *current = CellType::Visited;
        }
        self.selected = target;
        *self.at_mut(target) = CellType::Selected;

        self.verify();
        true
    }

    /// Heuristic distance from the selection to the destination.
    #[inline(always)]
    pub fn selection_distance(&self) -> CoordIntrinsic {
        self.selected.manhattan_distance(&self.destination)
    }

    /// Whether the selection reached the cell next to the destination.
    #[inline(always)]
    pub fn is_goal(&self) -> bool {
        self.selection_distance() == GOAL_DISTANCE
    }

    /// Counts open cells boxed in on three sides.
    pub fn dead_ends(&self) -> usize {
        self.cells()
            .filter(|cell| !cell.is_blocking())
            .filter(|cell| {
                let blocked = self
                    .neighbors(&cell.coordinate)
                    .iter()
                    .filter(|n| n.is_none_or(|c| c.is_blocking()))
                    .count();
                blocked == 3
            })
            .count()
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify(&self) {
        // All good... (hopefully)
    }
    #[cfg(feature = "verify")]
    pub(crate) fn verify(&self) {
        assert!(self.contains(&self.source));
        assert!(self.contains(&self.destination));
        assert!(self.contains(&self.selected));
        assert_eq!(self.source_cell().kind, CellType::Source);
        assert_eq!(self.destination_cell().kind, CellType::Destination);
        if self.selected != self.source {
            assert_eq!(self.selected_cell().kind, CellType::Selected);
        }
        let count = |kind: CellType| self.kinds.iter().filter(|k| **k == kind).count();
        assert_eq!(count(CellType::Source), 1);
        assert_eq!(count(CellType::Destination), 1);
        assert!(count(CellType::Selected) <= 1);
    }
}

impl PartialEq for Maze {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.selected == other.selected
            && self.kinds == other.kinds
    }
}
impl Eq for Maze {}

/// Hashes the same data `PartialEq` compares.
impl Hash for Maze {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rows.hash(state);
        self.cols.hash(state);
        self.selected.hash(state);
        self.kinds.hash(state);
    }
}

/// Renders one character per cell and one line per row.
impl std::fmt::Display for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in self.rows() {
            for kind in row {
                write!(f, "{kind}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Maze({}x{}, s:{}, d:{}, $:{})",
            self.rows, self.cols, self.source, self.destination, self.selected
        )
    }
}

/// Parses a rendered maze back.
impl std::convert::TryFrom<&str> for Maze {
    type Error = MazeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut grid = Vec::<Vec<CellType>>::new();
        for (row, line) in s.lines().enumerate() {
            let cells = line
                .chars()
                .enumerate()
                .map(|(col, ch)| {
                    CellType::try_from(ch).map_err(|e| MazeError::InvalidCell { e, row, col })
                })
                .collect::<Result<Vec<CellType>, MazeError>>()?;
            grid.push(cells);
        }

        Self::from_grid(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::hash_map::DefaultHasher;

    use indoc::indoc;

    fn hash_of(maze: &Maze) -> u64 {
        let mut hasher = DefaultHasher::new();
        maze.hash(&mut hasher);
        hasher.finish()
    }

    fn corridor() -> Maze {
        Maze::try_from(indoc! {"
            %%%%%
            %s  %
            %%% %
            %d  %
            %%%%%
        "})
        .unwrap()
    }

    #[test]
    fn parses_and_renders() {
        let text = indoc! {"
            %%%%%
            %s  %
            %%% %
            %d  %
            %%%%%
        "};
        let maze = Maze::try_from(text).unwrap();

        assert_eq!(maze.dimensions(), (5, 5));
        assert_eq!(maze.source(), Coord::new(1, 1));
        assert_eq!(maze.destination(), Coord::new(3, 1));
        assert_eq!(maze.selected(), maze.source());
        assert_eq!(maze.to_string(), text);
    }

    #[test]
    fn accepts_aliases() {
        let maze = Maze::try_from("#s.d#").unwrap();
        assert_eq!(maze.to_string(), "%s d%\n");
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(Maze::try_from(""), Err(MazeError::EmptyGrid));
        assert_eq!(
            Maze::try_from("s d\n%"),
            Err(MazeError::RaggedRow {
                row: 1,
                expected: 3,
                found: 1
            })
        );
        assert_eq!(
            Maze::try_from("s?d"),
            Err(MazeError::InvalidCell {
                e: CellParseError::InvalidCharacter('?'),
                row: 0,
                col: 1
            })
        );
    }

    #[test]
    fn validates_cardinality() {
        assert_eq!(Maze::try_from("  d"), Err(MazeError::SourceCount(0)));
        assert_eq!(Maze::try_from("ssd"), Err(MazeError::SourceCount(2)));
        assert_eq!(Maze::try_from("s  "), Err(MazeError::DestinationCount(0)));
        assert_eq!(Maze::try_from("sdd"), Err(MazeError::DestinationCount(2)));
        assert_eq!(Maze::try_from("s$$d"), Err(MazeError::SelectedCount(2)));

        let maze = Maze::try_from("s*$ d").unwrap();
        assert_eq!(maze.selected(), Coord::new(0, 2));
    }

    #[test]
    fn rejects_misplaced_cells() {
        let cells = vec![
            Cell::new(Coord::new(0, 0), CellType::Source),
            Cell::new(Coord::new(0, 0), CellType::Destination),
        ];
        assert_eq!(
            Maze::from_cells(1, 2, cells),
            Err(MazeError::CoordinateMismatch {
                row: 0,
                col: 1,
                found: Coord::new(0, 0)
            })
        );
    }

    #[test]
    fn with_endpoints() {
        let maze = Maze::with_endpoints(3, 4, Coord::new(0, 0), Coord::new(2, 3)).unwrap();
        assert_eq!(maze.to_string(), "s   \n    \n   d\n");

        assert_eq!(
            Maze::with_endpoints(3, 4, Coord::new(0, 0), Coord::new(0, 0)),
            Err(MazeError::OverlappingEndpoints(Coord::new(0, 0)))
        );
        assert_eq!(
            Maze::with_endpoints(3, 4, Coord::new(3, 0), Coord::new(0, 0)),
            Err(MazeError::OutOfBounds {
                coord: Coord::new(3, 0),
                rows: 3,
                cols: 4
            })
        );
    }

    #[test]
    fn lookup_out_of_bounds() {
        let maze = corridor();
        assert!(maze.lookup(&Coord::new(5, 0)).is_none());
        assert!(maze.lookup(&Coord::new(0, 5)).is_none());
        assert!(
            maze.lookup(&Coord::new(0, 0).wrapping_step(Direction::Up))
                .is_none()
        );
        assert_eq!(
            maze.lookup(&Coord::new(1, 1)).map(|c| c.kind),
            Some(CellType::Source)
        );
    }

    #[test]
    fn neighbors_cover_all_four_sides() {
        let maze = corridor();
        let kinds = maze
            .neighbors(&Coord::new(1, 2))
            .map(|n| n.map(|c| c.coordinate));
        assert_eq!(
            kinds,
            [
                Some(Coord::new(0, 2)),
                Some(Coord::new(1, 3)),
                Some(Coord::new(2, 2)),
                Some(Coord::new(1, 1)),
            ]
        );

        let corner = maze.neighbors(&Coord::new(0, 0));
        assert!(corner[0].is_none());
        assert!(corner[1].is_some());
        assert!(corner[2].is_some());
        assert!(corner[3].is_none());
    }

    #[test]
    fn move_selection_leaves_a_trail() {
        let mut maze = corridor();

        // Walls and the outside don't move the selection.
        assert!(!maze.move_selection(Direction::Up));
        assert!(!maze.move_selection(Direction::Left));
        assert_eq!(maze.selected(), maze.source());

        assert!(maze.move_selection(Direction::Right));
        assert_eq!(maze.selected(), Coord::new(1, 2));
        // The source keeps its marking.
        assert_eq!(maze.source_cell().kind, CellType::Source);
        assert_eq!(maze.selected_cell().kind, CellType::Selected);

        assert!(maze.move_selection(Direction::Right));
        assert_eq!(maze.lookup(&Coord::new(1, 2)).unwrap().kind, CellType::Visited);

        // The trail can't be re-entered.
        assert!(!maze.move_selection(Direction::Left));
        assert_eq!(
            maze.to_string(),
            indoc! {"
                %%%%%
                %s*$%
                %%% %
                %d  %
                %%%%%
            "}
        );
    }

    #[test]
    fn move_selection_stays_on_valid_cells() {
        let mut maze = corridor();
        for direction in [
            Direction::Down,
            Direction::Right,
            Direction::Right,
            Direction::Up,
            Direction::Down,
            Direction::Down,
            Direction::Down,
            Direction::Left,
            Direction::Left,
            Direction::Left,
        ] {
            maze.move_selection(direction);
            let kind = maze.selected_cell().kind;
            assert!(
                matches!(kind, CellType::Source | CellType::Selected | CellType::Visited),
                "{kind:?} under the selection"
            );
        }
        // The destination is never entered, the walk stops next to it.
        assert_eq!(maze.selected(), Coord::new(3, 2));
        assert!(maze.is_goal());
    }

    #[test]
    fn clones_are_independent() {
        let original = corridor();
        let mut clone = original.clone();
        assert_eq!(original, clone);

        clone.move_selection(Direction::Right);
        assert_ne!(original, clone);
        assert_eq!(original.selected(), original.source());
        assert_eq!(
            original.lookup(&Coord::new(1, 2)).unwrap().kind,
            CellType::Empty
        );
    }

    #[test]
    fn equality_and_hash_are_structural() {
        let text = indoc! {"
            %%%%
            %s %
            %  %
            % d%
            %%%%
        "};
        let a = Maze::try_from(text).unwrap();
        let b = Maze::try_from(text).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        // Same position reached through different trails.
        let mut right_down = a.clone();
        right_down.move_selection(Direction::Right);
        right_down.move_selection(Direction::Down);
        let mut down_right = a.clone();
        down_right.move_selection(Direction::Down);
        down_right.move_selection(Direction::Right);
        assert_eq!(right_down.selected(), down_right.selected());
        assert_ne!(right_down, down_right);

        // Same trail reached twice.
        let mut again = a.clone();
        again.move_selection(Direction::Right);
        again.move_selection(Direction::Down);
        assert_eq!(right_down, again);
        assert_eq!(hash_of(&right_down), hash_of(&again));
    }

    #[test]
    fn distance_and_goal() {
        let maze = corridor();
        assert_eq!(maze.selection_distance(), 2);
        assert!(!maze.is_goal());
        assert_eq!(
            maze.source_cell().distance_to(&maze.destination_cell()),
            maze.selection_distance()
        );
    }

    #[test]
    fn cells_follow_their_position() {
        let maze = corridor();
        assert_eq!(maze.kinds().len(), 25);

        let cells: Vec<Cell> = maze.cells().collect();
        assert_eq!(cells.len(), 25);
        assert_eq!(cells[6], Cell::new(Coord::new(1, 1), CellType::Source));
        assert_eq!(cells[16], Cell::new(Coord::new(3, 1), CellType::Destination));
        for cell in &cells {
            assert_eq!(maze.lookup(&cell.coordinate), Some(*cell));
        }
    }

    #[test]
    fn counts_dead_ends() {
        let maze = corridor();
        // (1,1) source pocket, (3,1) destination pocket.
        assert_eq!(maze.dead_ends(), 2);

        let open = Maze::with_endpoints(3, 3, Coord::new(0, 0), Coord::new(2, 2)).unwrap();
        assert_eq!(open.dead_ends(), 0);
    }
}
