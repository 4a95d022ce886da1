//! A maze generator built for animation: a randomized backtracking walk
//! over a rectangular grid that yields every grid mutation as it happens.
//!
//! Construct a [`Maze`], then pull steps out of [`Maze::create`]. The walk
//! enters from a random border cell, carves its way to a 3x3 goal block in
//! the interior, then grows short dead-end corridors off the confirmed
//! solution path. Each step reports the cells it touched, so a renderer can
//! redraw exactly what changed.

mod display;
pub mod error;
pub mod geometry;
pub mod maze;

pub use error::Error;
pub use maze::{Cell, Maze, Step, StepKind, Steps};
