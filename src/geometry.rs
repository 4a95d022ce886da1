use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use itertools::Itertools;

/// An integer grid position or offset. Arithmetic returns new values; a
/// `Coordinate` is never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Coordinate { x, y }
    }

    /// The four positions one step away, in [`Direction::ALL`] order.
    /// Bounds are not checked; off-grid neighbours are the caller's problem.
    pub fn neighbours(self) -> impl Iterator<Item = Coordinate> {
        Direction::ALL.into_iter().map(move |direction| self + direction)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Coordinate {
    type Output = Coordinate;

    fn neg(self) -> Coordinate {
        Coordinate::new(-self.x, -self.y)
    }
}

impl Mul<i32> for Coordinate {
    type Output = Coordinate;

    fn mul(self, scale: i32) -> Coordinate {
        Coordinate::new(self.x * scale, self.y * scale)
    }
}

/// The four cardinal unit vectors. Connectivity between cells is stored as
/// these vectors, so a cell's open sides can be folded into a bitmask for
/// tile-selection lookups.
pub struct Direction;

impl Direction {
    pub const UP: Coordinate = Coordinate::new(0, -1);
    pub const DOWN: Coordinate = Coordinate::new(0, 1);
    pub const LEFT: Coordinate = Coordinate::new(-1, 0);
    pub const RIGHT: Coordinate = Coordinate::new(1, 0);

    pub const ALL: [Coordinate; 4] = [Self::UP, Self::DOWN, Self::LEFT, Self::RIGHT];

    /// Folds a set of directions into a bitmask: up=1, down=2, left=4,
    /// right=8. Vectors that are not unit directions contribute nothing, and
    /// repeated directions contribute their bit once.
    pub fn to_int(directions: impl IntoIterator<Item = Coordinate>) -> u8 {
        directions
            .into_iter()
            .fold(0, |mask, direction| mask | Self::bit(direction))
    }

    fn bit(direction: Coordinate) -> u8 {
        match direction {
            Self::UP => 1,
            Self::DOWN => 2,
            Self::LEFT => 4,
            Self::RIGHT => 8,
            _ => 0,
        }
    }

    /// Every ordered selection of distinct directions, starting with the
    /// empty one: 65 in total. Renderers use this to pre-build the full set
    /// of tile variants; generation itself never calls it.
    pub fn combinations() -> impl Iterator<Item = Vec<Coordinate>> {
        std::iter::once(Vec::new())
            .chain((1..=Self::ALL.len()).flat_map(|length| Self::ALL.into_iter().permutations(length)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_arithmetic() {
        let a = Coordinate::new(3, -2);
        let b = Coordinate::new(1, 5);
        assert_eq!(a + b, Coordinate::new(4, 3));
        assert_eq!(a - b, Coordinate::new(2, -7));
        assert_eq!(-a, Coordinate::new(-3, 2));
        assert_eq!(a * 2, Coordinate::new(6, -4));
    }

    #[test]
    fn test_neighbours_order() {
        let neighbours: Vec<_> = Coordinate::new(2, 2).neighbours().collect();
        assert_eq!(
            neighbours,
            vec![
                Coordinate::new(2, 1),
                Coordinate::new(2, 3),
                Coordinate::new(1, 2),
                Coordinate::new(3, 2),
            ]
        );
    }

    #[test]
    fn test_to_int_bits() {
        assert_eq!(Direction::to_int([]), 0);
        assert_eq!(Direction::to_int([Direction::UP]), 1);
        assert_eq!(Direction::to_int([Direction::DOWN]), 2);
        assert_eq!(Direction::to_int([Direction::LEFT]), 4);
        assert_eq!(Direction::to_int([Direction::RIGHT]), 8);
        assert_eq!(Direction::to_int(Direction::ALL), 15);
    }

    #[test]
    fn test_to_int_is_a_set_mask() {
        // Duplicates count once, unknown vectors count for nothing.
        assert_eq!(Direction::to_int([Direction::UP, Direction::UP]), 1);
        assert_eq!(Direction::to_int([Coordinate::new(2, 0)]), 0);
    }

    #[test]
    fn test_combinations_count() {
        // 1 empty + 4 singles + 12 pairs + 24 triples + 24 quadruples
        let all: Vec<_> = Direction::combinations().collect();
        assert_eq!(all.len(), 65);
        assert_eq!(all[0], Vec::new());
        // Every selection uses distinct directions.
        for selection in &all {
            for (i, a) in selection.iter().enumerate() {
                assert!(!selection[i + 1..].contains(a));
            }
        }
    }
}
