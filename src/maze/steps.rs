use rand::Rng;
use tracing::{debug, trace};

use crate::geometry::{Coordinate, Direction};

use super::Maze;
use super::cell::Cell;
use super::grid::Grid;

/// How a single generation step changed the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// The start cell was placed on the border.
    PlaceStart,
    /// The 3x3 goal block was placed in the interior.
    PlaceEnd,
    /// A cell was linked into the maze and appended to the active path.
    Advance,
    /// A dead end was dropped from the active path.
    Backtrack,
}

/// One increment of maze generation: snapshots of every cell mutated (or
/// dropped from the active path) since the previous step, so a renderer can
/// redraw exactly the tiles that changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub kind: StepKind,
    pub cells: Vec<Cell>,
}

enum Phase {
    PlaceStart,
    PlaceEnd,
    Walk,
    /// Growing dead-end corridors off the finished solution path. The field
    /// is the branch stack: the solution minus the goal, plus whatever has
    /// been linked off it since.
    Branch(Vec<Coordinate>),
    Done,
}

/// Pull-based maze generation. Each [`next`](Iterator::next) call performs
/// exactly one step - placing the start, placing the goal block, linking one
/// cell, or retiring one dead end - and then suspends. The maze is
/// well-formed at every suspension point, so abandoning the iterator early
/// always leaves a renderable (if unfinished) maze.
///
/// Exhausting the iterator and asking again is a no-op; to generate a new
/// maze, drop this, [`reset`](Maze::reset), and call
/// [`create`](Maze::create) again.
pub struct Steps<'m, R: Rng> {
    maze: &'m mut Maze,
    rng: R,
    phase: Phase,
}

impl<'m, R: Rng> Steps<'m, R> {
    pub(super) fn new(maze: &'m mut Maze, rng: R) -> Self {
        Steps {
            maze,
            rng,
            phase: Phase::PlaceStart,
        }
    }

    /// Picks a border cell, marks it as entered from outside the grid, and
    /// seeds the walk stack with it.
    fn place_start(&mut self) -> Step {
        let maze = &mut *self.maze;
        let index = self.rng.random_range(0..maze.circumference.len());
        let position = maze.circumference[index];
        // Corner cells have two external neighbours; we take the first in
        // `Direction::ALL` order, consistently.
        let outside = position
            .neighbours()
            .find(|&neighbour| !maze.grid.in_bounds(neighbour))
            .expect("circumference cells always have an external neighbour");

        maze.grid[position].mark_start(outside);
        maze.solution.push(position);
        debug!("[generate] start placed at {}", position);

        Step {
            kind: StepKind::PlaceStart,
            cells: vec![maze.grid[position].clone()],
        }
    }

    /// Marks a 3x3 block of interior cells as the goal and pre-links its
    /// cells to each other, so the block behaves as a single absorbing
    /// region once the walk touches any of it.
    fn place_end(&mut self) -> Step {
        let maze = &mut *self.maze;
        // Keep the block centre well away from the border, to improve the
        // chances of an interestingly long solution.
        let centres: Vec<Coordinate> = maze
            .inside
            .iter()
            .copied()
            .filter(|c| {
                (4..maze.width - 3).contains(&c.x) && (4..maze.height - 3).contains(&c.y)
            })
            .collect();
        let centre = centres[self.rng.random_range(0..centres.len())];

        let block: Vec<Coordinate> = (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| centre + Coordinate::new(dx, dy)))
            .collect();
        for &position in &block {
            maze.grid[position].mark_end();
        }
        for &position in &block {
            for direction in Direction::ALL {
                if block.contains(&(position + direction)) {
                    maze.grid[position].connect_to(direction);
                }
            }
        }
        debug!("[generate] goal block centred at {}", centre);

        Step {
            kind: StepKind::PlaceEnd,
            cells: block.iter().map(|&p| maze.grid[p].clone()).collect(),
        }
    }

    /// Advances one walk step on `path`: links a random cell from
    /// `possible` and pushes it, or retires `here` as a dead end. Either
    /// way, reports the cells a renderer would need to redraw.
    fn step_path(
        grid: &mut Grid,
        rng: &mut R,
        path: &mut Vec<Coordinate>,
        here: Coordinate,
        possible: Vec<Coordinate>,
    ) -> Step {
        if possible.is_empty() {
            // During the primary walk `here` is the tip of the path; during
            // branching it may sit anywhere in it.
            let index = path
                .iter()
                .position(|&p| p == here)
                .expect("here is taken from the active path");
            path.remove(index);
            trace!("[generate] dead end at {}", here);
            return Step {
                kind: StepKind::Backtrack,
                cells: vec![grid[here].clone()],
            };
        }

        let there = possible[rng.random_range(0..possible.len())];
        grid.link(here, there)
            .expect("possible cells are grid-adjacent to here");
        path.push(there);
        trace!("[generate] linked {} from {}", there, here);

        // The freshly linked cell, plus every assigned neighbour whose tile
        // may now show a new opening (`here` itself is among them).
        let mut cells = vec![grid[there].clone()];
        cells.extend(
            there
                .neighbours()
                .filter(|&n| grid.in_bounds(n) && grid[n].assigned())
                .map(|n| grid[n].clone()),
        );
        Step {
            kind: StepKind::Advance,
            cells,
        }
    }
}

impl<R: Rng> Iterator for Steps<'_, R> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::PlaceStart => {
                    let step = self.place_start();
                    self.phase = Phase::PlaceEnd;
                    return Some(step);
                }
                Phase::PlaceEnd => {
                    let step = self.place_end();
                    self.phase = Phase::Walk;
                    return Some(step);
                }
                Phase::Walk => {
                    let here = *self
                        .maze
                        .solution
                        .last()
                        .expect("the walk stack holds at least the start");
                    if self.maze.grid[here].is_end() {
                        // The solution is complete and stays frozen from here
                        // on; branching works on a copy without the goal.
                        let mut remainder = self.maze.solution.clone();
                        remainder.pop();
                        debug!(
                            "[generate] goal reached, solution is {} cells long",
                            self.maze.solution.len()
                        );
                        self.phase = Phase::Branch(remainder);
                        continue;
                    }
                    let possible: Vec<Coordinate> = here
                        .neighbours()
                        .filter(|&n| self.maze.grid.in_bounds(n) && !self.maze.grid[n].visited())
                        .collect();
                    let step = Self::step_path(
                        &mut self.maze.grid,
                        &mut self.rng,
                        &mut self.maze.solution,
                        here,
                        possible,
                    );
                    self.phase = Phase::Walk;
                    return Some(step);
                }
                Phase::Branch(mut remainder) => {
                    if remainder.is_empty() {
                        debug!("[generate] branching exhausted, maze complete");
                        return None;
                    }
                    // Choosing between a random branch cell and the current
                    // tip biases toward many short false corridors rather
                    // than a few long ones.
                    let anywhere = remainder[self.rng.random_range(0..remainder.len())];
                    let tip = *remainder
                        .last()
                        .expect("remainder was just checked non-empty");
                    let here = if self.rng.random_range(0..2) == 0 {
                        anywhere
                    } else {
                        tip
                    };
                    // Unlike the primary walk, branches must not re-enter
                    // the goal block, so assigned cells are excluded.
                    let possible: Vec<Coordinate> = here
                        .neighbours()
                        .filter(|&n| self.maze.grid.in_bounds(n) && !self.maze.grid[n].assigned())
                        .collect();
                    let step =
                        Self::step_path(&mut self.maze.grid, &mut self.rng, &mut remainder, here, possible);
                    self.phase = Phase::Branch(remainder);
                    return Some(step);
                }
                Phase::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;

    use super::*;
    use crate::error::Error;
    use crate::maze::Maze;

    /// A random source with no entropy at all: every `random_range` call
    /// resolves to the low end of its range.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    fn generate(width: i32, height: i32, seed: u64) -> (Maze, Vec<Step>) {
        let mut maze = Maze::new(width, height).unwrap();
        let steps: Vec<Step> = maze.create_seeded(Some(seed)).collect();
        (maze, steps)
    }

    #[test]
    fn test_placement_steps_come_first() {
        let (_, steps) = generate(9, 9, 1);
        assert_eq!(steps[0].kind, StepKind::PlaceStart);
        assert_eq!(steps[0].cells.len(), 1);
        assert!(steps[0].cells[0].is_start());

        assert_eq!(steps[1].kind, StepKind::PlaceEnd);
        assert_eq!(steps[1].cells.len(), 9);
        assert!(steps[1].cells.iter().all(Cell::is_end));
        // The block is pre-linked internally: corner cells open two sides,
        // edge cells three, the centre four.
        assert!(
            steps[1]
                .cells
                .iter()
                .all(|cell| cell.open_sides().count() >= 2)
        );
    }

    #[test]
    fn test_every_cell_is_assigned_after_exhaustion() {
        for seed in [0, 7, 42] {
            let (maze, _) = generate(9, 9, seed);
            assert!(maze.cells().all(Cell::assigned));
        }
    }

    #[test]
    fn test_links_form_a_tree_rooted_at_the_start() {
        let (maze, _) = generate(11, 9, 23);
        for cell in maze.cells().filter(|cell| cell.visited()) {
            // Walking back along connected_from must hit the start without
            // revisiting anything.
            let mut position = cell.position();
            let mut hops = 0;
            while !maze.get(position).unwrap().is_start() {
                // connected_from is always the first open side reported.
                let back = maze
                    .get(position)
                    .unwrap()
                    .open_sides()
                    .next()
                    .expect("visited non-start cells have a predecessor");
                position = position + back;
                hops += 1;
                assert!(hops <= 11 * 9, "cycle detected at {position}");
            }
        }
    }

    #[test]
    fn test_solution_is_a_simple_path_from_start_to_goal() {
        let (maze, _) = generate(9, 13, 5);
        let solution: Vec<&Cell> = maze.solution().collect();

        assert!(solution.first().unwrap().is_start());
        assert!(solution.last().unwrap().is_end());
        for pair in solution.windows(2) {
            let offset = pair[1].position() - pair[0].position();
            assert!(Direction::ALL.contains(&offset), "path must be contiguous");
        }
        for (i, cell) in solution.iter().enumerate() {
            assert!(
                !solution[i + 1..]
                    .iter()
                    .any(|other| other.position() == cell.position()),
                "path must not repeat cells"
            );
        }
    }

    #[test]
    fn test_same_seed_replays_the_same_steps() {
        let (_, first) = generate(11, 11, 99);
        let (_, second) = generate(11, 11, 99);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_rng_starts_at_the_first_border_cell() {
        let mut maze = Maze::new(9, 9).unwrap();
        let steps: Vec<Step> = maze.create_with_rng(ZeroRng).collect();

        let origin = maze.circumference()[0];
        assert!(maze.get(origin).unwrap().is_start());
        assert!(
            steps.len() <= 2 * 9 * 9 + 2,
            "generation must terminate within the step budget, took {}",
            steps.len()
        );
        assert!(maze.cells().all(Cell::assigned));
    }

    #[test]
    fn test_exhausted_steps_are_a_no_op() {
        let mut maze = Maze::new(9, 9).unwrap();
        let mut steps = maze.create_seeded(Some(3));
        for _ in steps.by_ref() {}

        assert!(steps.next().is_none());
        assert!(steps.next().is_none());
        drop(steps);
        assert!(maze.cells().all(Cell::assigned));
    }

    #[test]
    fn test_advance_reports_cover_the_linked_cell_and_its_neighbours() {
        let (_maze, steps) = generate(9, 9, 12);
        for step in steps.iter().filter(|s| s.kind == StepKind::Advance) {
            let linked = &step.cells[0];
            assert!(linked.visited());
            // Everything else in the report is adjacent to the linked cell
            // and already carved, so a renderer redraws a tight patch.
            assert!(
                step.cells[1..].iter().all(|cell| {
                    cell.assigned()
                        && Direction::ALL.contains(&(cell.position() - linked.position()))
                })
            );
        }
    }

    #[test]
    fn test_branches_never_touch_the_goal_block() {
        // Goal cells reachable from outside the block are exactly the one
        // the solution enters through: every other goal cell keeps its
        // pre-placed links only.
        let (maze, _) = generate(9, 9, 31);
        let entered: Vec<&Cell> = maze
            .cells()
            .filter(|cell| cell.is_end() && cell.visited())
            .collect();
        assert_eq!(entered.len(), 1);
    }

    #[test]
    fn test_out_of_bounds_error_mentions_the_position() {
        let maze = Maze::new(9, 9).unwrap();
        let err = maze.get(Coordinate::new(-3, 0)).unwrap_err();
        assert_eq!(
            err,
            Error::OutOfBounds {
                position: Coordinate::new(-3, 0)
            }
        );
    }
}
