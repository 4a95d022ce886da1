use thiserror::Error;

use crate::geometry::Coordinate;

/// Errors surfaced by maze construction and cell lookup.
///
/// `OutOfBounds` and `InvalidLink` indicate caller defects rather than
/// runtime conditions: the generation walk only ever links cells obtained
/// through neighbour enumeration, so neither occurs during a normal
/// [`create`](crate::maze::Maze::create) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("maze must be at least 9x9, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("position {position} is outside the grid")]
    OutOfBounds { position: Coordinate },

    #[error("cannot link {to} from {from}: cells are not adjacent")]
    InvalidLink { from: Coordinate, to: Coordinate },
}
