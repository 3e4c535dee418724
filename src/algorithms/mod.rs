//! Implementation of search algorithms.
//!
//! Both solvers walk the same `SearchTree` of maze states and only differ in
//! the order they expand states.

pub mod astar;
pub mod bfs;
