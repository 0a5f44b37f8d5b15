//! Spatial model: terrain cells and the toroidal occupancy grid

pub mod grid;
pub mod terrain;

pub use grid::Grid;
pub use terrain::{Cell, Terrain};
