use crate::error::Error;
use crate::geometry::Coordinate;

use super::cell::Cell;

/// Flat backing store for the maze: exactly one [`Cell`] per position in
/// `[0, width) x [0, height)`, row-major.
pub(crate) struct Grid {
    cells: Box<[Cell]>,
    width: i32,
    height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(Coordinate::new(x, y))))
            .collect();
        Grid {
            cells,
            width,
            height,
        }
    }

    pub fn in_bounds(&self, position: Coordinate) -> bool {
        (0..self.width).contains(&position.x) && (0..self.height).contains(&position.y)
    }

    fn ravel_index(&self, position: Coordinate) -> usize {
        (position.y * self.width + position.x) as usize
    }

    pub fn get(&self, position: Coordinate) -> Result<&Cell, Error> {
        if self.in_bounds(position) {
            Ok(&self.cells[self.ravel_index(position)])
        } else {
            Err(Error::OutOfBounds { position })
        }
    }

    /// Links `to` from `from`, mutating both cells.
    pub fn link(&mut self, from: Coordinate, to: Coordinate) -> Result<(), Error> {
        let (from_cell, to_cell) = self.pair_mut(from, to)?;
        to_cell.link_from(from_cell)
    }

    /// Mutable access to two distinct cells at once.
    fn pair_mut(&mut self, a: Coordinate, b: Coordinate) -> Result<(&mut Cell, &mut Cell), Error> {
        if !self.in_bounds(a) {
            return Err(Error::OutOfBounds { position: a });
        }
        if !self.in_bounds(b) {
            return Err(Error::OutOfBounds { position: b });
        }
        if a == b {
            return Err(Error::InvalidLink { from: a, to: b });
        }
        let (i, j) = (self.ravel_index(a), self.ravel_index(b));
        if i < j {
            let (head, tail) = self.cells.split_at_mut(j);
            Ok((&mut head[i], &mut tail[0]))
        } else {
            let (head, tail) = self.cells.split_at_mut(i);
            Ok((&mut tail[0], &mut head[j]))
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }
}

impl std::ops::Index<Coordinate> for Grid {
    type Output = Cell;

    fn index(&self, position: Coordinate) -> &Cell {
        assert!(
            self.in_bounds(position),
            "position {position} is outside the grid"
        );
        &self.cells[self.ravel_index(position)]
    }
}

impl std::ops::IndexMut<Coordinate> for Grid {
    fn index_mut(&mut self, position: Coordinate) -> &mut Cell {
        assert!(
            self.in_bounds(position),
            "position {position} is outside the grid"
        );
        let index = self.ravel_index(position);
        &mut self.cells[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_position_has_its_own_cell() {
        let grid = Grid::new(9, 11);
        assert_eq!(grid.iter().count(), 99);
        for y in 0..11 {
            for x in 0..9 {
                let position = Coordinate::new(x, y);
                assert_eq!(grid[position].position(), position);
            }
        }
    }

    #[test]
    fn test_get_rejects_out_of_bounds_lookups() {
        let grid = Grid::new(9, 9);
        // (-1, 2) would ravel to a valid index if bounds were not checked.
        for position in [
            Coordinate::new(-1, 2),
            Coordinate::new(9, 0),
            Coordinate::new(0, 9),
        ] {
            assert_eq!(grid.get(position), Err(Error::OutOfBounds { position }));
        }
        assert!(grid.get(Coordinate::new(8, 8)).is_ok());
    }

    #[test]
    fn test_link_mutates_both_ends() {
        let mut grid = Grid::new(9, 9);
        let (from, to) = (Coordinate::new(4, 4), Coordinate::new(5, 4));

        grid.link(from, to).unwrap();

        assert!(grid[to].visited());
        assert!(!grid[from].visited());
        assert_eq!(grid[from].open_sides().count(), 1);
    }

    #[test]
    fn test_link_refuses_a_cell_with_itself() {
        let mut grid = Grid::new(9, 9);
        let position = Coordinate::new(3, 3);
        assert_eq!(
            grid.link(position, position),
            Err(Error::InvalidLink {
                from: position,
                to: position,
            })
        );
    }
}
