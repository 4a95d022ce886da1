use std::collections::HashSet;

use crate::error::Error;
use crate::geometry::{Coordinate, Direction};

/// One grid position together with its connectivity state.
///
/// Directions are stored as unit vectors, not absolute positions:
/// `connected_from` points back at the cell this one was entered from during
/// the walk, and `connected_to` holds the directions of cells that were
/// entered from here. A cell is linked at most once, so the links over the
/// whole grid always form a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Coordinate,
    connected_to: HashSet<Coordinate>,
    connected_from: Option<Coordinate>,
    is_start: bool,
    is_end: bool,
}

impl Cell {
    pub(crate) fn new(position: Coordinate) -> Self {
        Cell {
            position,
            connected_to: HashSet::new(),
            connected_from: None,
            is_start: false,
            is_end: false,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn is_start(&self) -> bool {
        self.is_start
    }

    pub fn is_end(&self) -> bool {
        self.is_end
    }

    /// Records that this cell was entered from `other`: sets our
    /// `connected_from` to point back at `other` and adds the forward
    /// direction to `other.connected_to`. The two cells must be
    /// grid-adjacent, otherwise the offset between them is not a unit
    /// direction and the link would be meaningless.
    pub(crate) fn link_from(&mut self, other: &mut Cell) -> Result<(), Error> {
        let vector = self.position - other.position;
        if !Direction::ALL.contains(&vector) {
            return Err(Error::InvalidLink {
                from: other.position,
                to: self.position,
            });
        }
        self.connected_from = Some(-vector);
        other.connected_to.insert(vector);
        Ok(())
    }

    /// Marks this cell as the start, entered from the off-grid position
    /// `entered_from` so the entrance renders as an open side.
    pub(crate) fn mark_start(&mut self, entered_from: Coordinate) {
        self.is_start = true;
        self.connected_from = Some(entered_from - self.position);
    }

    pub(crate) fn mark_end(&mut self) {
        self.is_end = true;
    }

    /// Opens a side without touching `connected_from`. Used to pre-link the
    /// cells of the goal block to each other.
    pub(crate) fn connect_to(&mut self, direction: Coordinate) {
        self.connected_to.insert(direction);
    }

    /// The directions this cell is open in: where it was entered from plus
    /// everywhere it leads to.
    pub fn open_sides(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.connected_from
            .into_iter()
            .chain(self.connected_to.iter().copied())
    }

    /// The complement of [`open_sides`](Cell::open_sides) within the four
    /// directions.
    pub fn closed_sides(&self) -> impl Iterator<Item = Coordinate> + '_ {
        Direction::ALL.into_iter().filter(|direction| {
            Some(*direction) != self.connected_from && !self.connected_to.contains(direction)
        })
    }

    /// Whether the walk has been through this cell. The start counts as
    /// visited even though nothing links into it from the grid.
    pub fn visited(&self) -> bool {
        self.connected_from.is_some() || self.is_start
    }

    /// Visited, or part of the goal block. Assigned cells are ineligible for
    /// re-traversal.
    pub fn assigned(&self) -> bool {
        self.visited() || self.is_end
    }
}
