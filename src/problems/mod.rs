//! The maze problem: the grid, its file format and a random generator.

pub mod generator;
pub mod maze;
pub mod maze_file;
