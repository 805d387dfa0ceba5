// Threat projection: per-round occupancy overlay
//
// The overlay starts from the static board and marks every live tank, every
// live shell and every cell a shell will sweep this round as blocked. It is
// rebuilt from scratch whenever it is needed and never outlives a round.

use crate::board::{Board, Cell};
use crate::types::{Position, Shell, Tank};

/// Cells a shell sweeps beyond its own this round, never more than the board side
pub fn shell_reach(shell_speed: i32, horizon: i32, side: usize) -> i32 {
    shell_speed
        .max(0)
        .saturating_mul(horizon.max(0))
        .min(side as i32)
}

/// Conservative "do not be here" map for the current round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyOverlay {
    side: usize,
    blocked: Vec<bool>,
    threatened: Vec<bool>,
}

impl OccupancyOverlay {
    /// Overlay with only the static terrain applied
    pub fn from_board(board: &Board) -> Self {
        let blocked = board
            .cells()
            .iter()
            .map(|cell| matches!(cell, Cell::Wall | Cell::Unset))
            .collect();
        OccupancyOverlay {
            side: board.side(),
            blocked,
            threatened: vec![false; board.side() * board.side()],
        }
    }

    /// Builds the overlay for one round.
    ///
    /// Each shell marks its own cell plus `shell_speed * horizon` cells ahead of
    /// it. Marks that would land outside the board are dropped.
    pub fn project(
        board: &Board,
        tanks: &[Tank],
        shells: &[Shell],
        shell_speed: i32,
        horizon: i32,
    ) -> Self {
        let mut overlay = Self::from_board(board);

        for tank in tanks {
            overlay.block(&tank.pos);
        }

        let reach = shell_reach(shell_speed, horizon, board.side());
        for shell in shells {
            overlay.threaten(&shell.pos);
            for step in 1..=reach {
                let swept = shell.pos.offset(shell.dir, step);
                if !overlay.threaten(&swept) {
                    break;
                }
            }
        }

        overlay
    }

    fn index(&self, pos: &Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.side || y >= self.side {
            return None;
        }
        Some(x * self.side + y)
    }

    /// Marks a cell impassable. Returns false when the cell is off the board.
    pub fn block(&mut self, pos: &Position) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.blocked[i] = true;
                true
            }
            None => false,
        }
    }

    /// Marks a cell as swept by a shell (and therefore impassable)
    pub fn threaten(&mut self, pos: &Position) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.blocked[i] = true;
                self.threatened[i] = true;
                true
            }
            None => false,
        }
    }

    /// Off-board cells count as blocked
    pub fn is_blocked(&self, pos: &Position) -> bool {
        self.index(pos).map_or(true, |i| self.blocked[i])
    }

    /// True when a shell sits on or will sweep through the cell this round
    pub fn is_threatened(&self, pos: &Position) -> bool {
        self.index(pos).map_or(false, |i| self.threatened[i])
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of blocked cells, terrain included
    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|b| **b).count()
    }

    /// Renders the overlay as rows of `.`, `#` and `*` for debug logs
    pub fn render(&self, rows: usize) -> String {
        let rows = rows.min(self.side);
        let mut out = String::with_capacity(rows * (rows + 1));
        for x in 0..rows {
            for y in 0..rows {
                let i = x * self.side + y;
                out.push(if self.threatened[i] {
                    '*'
                } else if self.blocked[i] {
                    '#'
                } else {
                    '.'
                });
            }
            out.push('\n');
        }
        out
    }
}
