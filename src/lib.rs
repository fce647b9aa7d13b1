//! **maze_level** carves perfect mazes on a rectangular 0/1 grid with a randomized depth first
//! backtracker and packages them as game levels.

pub mod cells;
pub mod coordinates;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod level;
pub mod renderers;
pub mod units;

pub use crate::generators::{generate, GeneratorOptions, StartMode};
pub use crate::grid::Grid;
