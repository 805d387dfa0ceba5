// Path-based move planning
//
// Turns a destination into exactly one order for one tank: search a route on
// the round's overlay, look at the first step and either turn towards it or
// drive into it.

use std::collections::HashSet;

use log::debug;

use crate::board::Board;
use crate::pathfinding::{Path, PathFinder};
use crate::threat::OccupancyOverlay;
use crate::types::{Direction, Order, Position, Tank};

/// Cells already claimed as next steps by our tanks this round
#[derive(Debug, Default, Clone)]
pub struct PendingSteps {
    claimed: HashSet<Position>,
}

impl PendingSteps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `cell`; false when another tank already holds it
    pub fn claim(&mut self, cell: Position) -> bool {
        self.claimed.insert(cell)
    }

    pub fn contains(&self, cell: &Position) -> bool {
        self.claimed.contains(cell)
    }
}

/// First cell after `from` on a path of either orientation
pub fn next_step(path: &Path, from: Position) -> Option<Position> {
    let cells = &path.cells;
    if cells.len() < 2 {
        return None;
    }
    if cells[0] == from {
        Some(cells[1])
    } else {
        Some(cells[cells.len() - 2])
    }
}

pub struct MovePlanner<'a, P: PathFinder> {
    pub board: &'a Board,
    pub finder: &'a P,
}

impl<'a, P: PathFinder> MovePlanner<'a, P> {
    pub fn new(board: &'a Board, finder: &'a P) -> Self {
        MovePlanner { board, finder }
    }

    /// Plans one step for `tank` towards `destination`.
    ///
    /// With no route (or already at the destination) the tank is told to turn
    /// to its current facing, which leaves it in place.
    pub fn plan_move(
        &self,
        overlay: &OccupancyOverlay,
        tank: &Tank,
        destination: Position,
        enemies: &[Position],
        pending: &mut PendingSteps,
    ) -> Order {
        let stall = Order::turn_to(tank.id, tank.dir);

        let Some(path) = self.finder.search(overlay, tank.pos, destination) else {
            debug!(
                "Tank {}: no route from ({}, {}) to ({}, {})",
                tank.id, tank.pos.x, tank.pos.y, destination.x, destination.y
            );
            return stall;
        };
        let Some(next) = next_step(&path, tank.pos) else {
            return stall;
        };

        let dir = Direction::between(&tank.pos, &next);
        let already_facing = tank.dir == dir;

        if self.board.is_wall(&next) || enemies.contains(&next) {
            debug!("Tank {}: next cell ({}, {}) is blocked", tank.id, next.x, next.y);
            return if !already_facing {
                Order::move_to(tank.id, tank.dir)
            } else if dir.is_vertical() {
                Order::turn_to(tank.id, Direction::Right)
            } else {
                Order::turn_to(tank.id, Direction::Up)
            };
        }

        if !already_facing {
            return Order::turn_to(tank.id, dir);
        }

        if pending.claim(next) {
            Order::move_to(tank.id, dir)
        } else {
            debug!("Tank {}: ({}, {}) already claimed this round", tank.id, next.x, next.y);
            Order::turn_to(tank.id, dir)
        }
    }
}
