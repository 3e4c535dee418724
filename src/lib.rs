use shadow_rs::shadow;

shadow!(build);

// Problems
// --------
pub mod problems;

// Search space
// ------------
pub mod search;
pub mod solver;

// Algorithms
// ----------
pub mod algorithms;
