pub mod cell;
mod grid;
mod steps;

use rand::Rng;
use rand::{SeedableRng, rngs::StdRng};

pub use cell::Cell;
pub use steps::{Step, StepKind, Steps};

use crate::error::Error;
use crate::geometry::Coordinate;
use grid::Grid;

/// Smallest legal maze. The 3x3 goal block and the border margin around it
/// do not fit below this.
pub const MIN_SIZE: i32 = 9;

/// A rectangular grid of cells plus the walk that carves a maze into it.
///
/// Construct one, then drive [`Maze::create`] to exhaustion: every step it
/// yields is one grid mutation, sized for animated re-rendering. When the
/// iterator is done the grid holds a finished maze and [`Maze::solution`]
/// is the path from start to goal.
pub struct Maze {
    grid: Grid,
    width: i32,
    height: i32,
    circumference: Vec<Coordinate>,
    inside: Vec<Coordinate>,
    solution: Vec<Coordinate>,
}

impl Maze {
    /// Creates a new maze with the given dimensions, all cells fresh.
    /// Fails with [`Error::InvalidDimensions`] below [`MIN_SIZE`].
    pub fn new(width: i32, height: i32) -> Result<Self, Error> {
        if width < MIN_SIZE || height < MIN_SIZE {
            return Err(Error::InvalidDimensions { width, height });
        }

        let mut circumference = Vec::new();
        let mut inside = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let position = Coordinate::new(x, y);
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    circumference.push(position);
                } else {
                    inside.push(position);
                }
            }
        }

        Ok(Maze {
            grid: Grid::new(width, height),
            width,
            height,
            circumference,
            inside,
            solution: Vec::new(),
        })
    }

    /// Returns the width of the maze in cells.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Returns the height of the maze in cells.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Checks if the given position is within the bounds of the maze.
    pub fn is_in_bounds(&self, position: Coordinate) -> bool {
        self.grid.in_bounds(position)
    }

    /// Bounds-checked cell lookup.
    pub fn get(&self, position: Coordinate) -> Result<&Cell, Error> {
        self.grid.get(position)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter()
    }

    /// Border positions, in row-major order. The start is drawn from these.
    pub fn circumference(&self) -> &[Coordinate] {
        &self.circumference
    }

    /// Positions strictly inside the border. The goal block is centred on
    /// one of these (with extra margin, see the generation steps).
    pub fn inside(&self) -> &[Coordinate] {
        &self.inside
    }

    /// The current walk stack during generation; the start-to-goal path once
    /// the goal has been reached. Secondary branching never mutates it.
    pub fn solution(&self) -> impl Iterator<Item = &Cell> {
        self.solution.iter().map(|&position| &self.grid[position])
    }

    /// Throws away all mutated state so generation can start over: every
    /// cell is reallocated fresh and the solution is cleared. Any previous
    /// [`Steps`] iterator must be dropped before calling this.
    pub fn reset(&mut self) {
        self.grid = Grid::new(self.width, self.height);
        self.solution.clear();
    }

    /// Starts generation with an OS-seeded random source.
    pub fn create(&mut self) -> Steps<'_, StdRng> {
        self.create_seeded(None)
    }

    /// Starts generation, optionally seeded for reproducibility. The same
    /// seed on an identically sized maze replays the same steps.
    ///
    /// The grid must be fresh (newly constructed or [`reset`](Maze::reset));
    /// re-running generation over a half-carved grid is not meaningful.
    pub fn create_seeded(&mut self, seed: Option<u64>) -> Steps<'_, StdRng> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.create_with_rng(rng)
    }

    /// Starts generation with a caller-supplied random source.
    pub fn create_with_rng<R: Rng>(&mut self, rng: R) -> Steps<'_, R> {
        Steps::new(self, rng)
    }
}
