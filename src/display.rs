use std::collections::HashSet;
use std::fmt;

use crossterm::style::{Color, Stylize};

use crate::geometry::{Coordinate, Direction};
use crate::maze::{Cell, Maze};

/// Tile glyphs indexed by the open-side bitmask (up=1, down=2, left=4,
/// right=8). Lines run along open passages; the second character bridges
/// into the next column whenever the right side is open.
const TILES: [&str; 16] = [
    "· ", // fully closed (an unreached cell)
    "╵ ", "╷ ", "│ ", "╴ ", "┘ ", "┐ ", "┤ ", "╶─", "└─", "┌─", "├─", "──", "┴─", "┬─", "┼─",
];

impl fmt::Display for Maze {
    /// Renders the maze one 2-column tile per cell: start green, goal block
    /// red, solution path yellow.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_path: HashSet<Coordinate> = self.solution().map(Cell::position).collect();

        for (index, cell) in self.cells().enumerate() {
            let tile = TILES[Direction::to_int(cell.open_sides()) as usize];

            #[cfg(debug_assertions)]
            {
                use unicode_width::UnicodeWidthStr;
                debug_assert_eq!(
                    tile.width(),
                    2,
                    "Each tile must occupy exactly two character widths."
                );
            }

            let styled = if cell.is_start() {
                tile.with(Color::Green)
            } else if cell.is_end() {
                tile.with(Color::Red)
            } else if on_path.contains(&cell.position()) {
                tile.with(Color::Yellow)
            } else {
                tile.with(Color::Reset)
            };
            write!(f, "{}", styled)?;
            if (index + 1) % self.width() as usize == 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn test_every_tile_is_two_columns_wide() {
        for tile in TILES {
            assert_eq!(tile.width(), 2);
        }
    }

    #[test]
    fn test_display_emits_one_line_per_row() {
        let mut maze = Maze::new(9, 11).unwrap();
        for _ in maze.create_seeded(Some(8)) {}
        assert_eq!(maze.to_string().lines().count(), 11);
    }
}
