// Grid pathfinding behind a trait so the planner can run on any search

use ::pathfinding::directed::astar::astar;

use crate::threat::OccupancyOverlay;
use crate::types::{Direction, Position};

/// A route between two cells, both endpoints included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub cells: Vec<Position>,
    pub cost: u32,
}

/// Black-box grid search over the occupancy overlay.
///
/// Implementations may return the path in either orientation (start first or
/// goal first). Start and goal are enterable even when the overlay blocks them.
pub trait PathFinder {
    fn search(&self, grid: &OccupancyOverlay, start: Position, goal: Position) -> Option<Path>;
}

/// A* with unit step cost and a Manhattan heuristic, returning start first
#[derive(Debug, Clone, Copy, Default)]
pub struct AStar;

impl PathFinder for AStar {
    fn search(&self, grid: &OccupancyOverlay, start: Position, goal: Position) -> Option<Path> {
        let side = grid.side() as i32;
        let on_grid = |p: &Position| p.x >= 0 && p.y >= 0 && p.x < side && p.y < side;
        if !on_grid(&start) || !on_grid(&goal) {
            return None;
        }

        let (cells, cost) = astar(
            &start,
            |here| {
                Direction::all()
                    .into_iter()
                    .map(|dir| here.offset(dir, 1))
                    .filter(|next| on_grid(next) && (*next == goal || !grid.is_blocked(next)))
                    .map(|next| (next, 1u32))
                    .collect::<Vec<_>>()
            },
            |here| here.manhattan(&goal) as u32,
            |here| *here == goal,
        )?;
        Some(Path { cells, cost })
    }
}
