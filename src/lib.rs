//! **mazegame** builds perfect mazes over rectangular grids with a randomised Prim's algorithm and
//! answers path queries between any two cells of the finished maze.
#![recursion_limit = "1024"]

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod pathing;
pub mod units;
mod utils;
