#![warn(missing_docs)]
//! Utilities for generating sparse, bordered grid mazes

pub mod error;
pub mod generator;
pub mod grid;
pub mod render;
pub mod settings;

pub use error::MazeError;
pub use generator::{generate, Maze, MazeGenerator, RandomSource};
pub use grid::{Cell, Grid};
pub use settings::MazeSettings;
