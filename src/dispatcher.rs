// Per-round order computation
//
// Each of our tanks, in roster order, goes through three checks and stops at
// the first that yields an order:
// 1. dodge an inbound shell sweeping its cell
// 2. fire along the best-scoring ray
// 3. step towards the destination its role prescribes

use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use rand::Rng;

use crate::board::Board;
use crate::config::{AttackerTarget, BaitSource, Config, RoleStrategy};
use crate::line_of_fire::{FireScorer, Targets};
use crate::pathfinding::PathFinder;
use crate::planner::{MovePlanner, PendingSteps};
use crate::roster::Roster;
use crate::threat::{shell_reach, OccupancyOverlay};
use crate::types::{Direction, GameArguments, GameState, Order, Position, Shell, Tank};

/// Behaviour bound to a tank for the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Chases an enemy tank
    Attacker,
    /// Heads for the centre and loiters there
    FlagCapturer,
    /// Patrols a ring around the centre
    Guard,
    /// Wanders to random cells near the centre
    Roamer,
    /// Reserved; issues nothing
    Scout,
    /// No behaviour for this slot
    Idle,
}

impl Role {
    pub fn assign(strategy: RoleStrategy, slot: usize, tank_id: i32) -> Role {
        match strategy {
            RoleStrategy::Slot => match slot {
                0 => Role::Attacker,
                1 => Role::FlagCapturer,
                2 => Role::Guard,
                3 => Role::Scout,
                _ => Role::Idle,
            },
            RoleStrategy::Parity => {
                if tank_id % 2 == 0 {
                    Role::FlagCapturer
                } else {
                    Role::Roamer
                }
            }
        }
    }
}

/// Escape order for a tank whose cell an aligned shell will sweep.
/// A tank lying along the shell's axis turns across it; otherwise it keeps driving.
pub fn dodge_order(tank: &Tank, shell: &Shell) -> Order {
    let same_axis = tank.dir.is_vertical() == shell.dir.is_vertical();
    if !same_axis {
        Order::move_to(tank.id, tank.dir)
    } else if shell.dir.is_vertical() {
        Order::turn_to(tank.id, Direction::Right)
    } else {
        Order::turn_to(tank.id, Direction::Up)
    }
}

/// Shell threatening `pos`: the first one on its row or column that will
/// sweep it, else the first one merely aligned with it. Sweeps stop at the
/// board edge.
fn inbound_shell<'s>(
    board: &Board,
    shells: &'s [Shell],
    pos: &Position,
    reach: i32,
) -> Option<&'s Shell> {
    let aligned: Vec<&Shell> = shells
        .iter()
        .filter(|s| s.pos.x == pos.x || s.pos.y == pos.y)
        .collect();
    aligned
        .iter()
        .find(|s| {
            (0..=reach)
                .map(|step| s.pos.offset(s.dir, step))
                .take_while(|cell| board.in_bounds(cell))
                .any(|cell| cell == *pos)
        })
        .or_else(|| aligned.first())
        .copied()
}

/// Order computation for one game
pub struct Dispatcher<'a, P: PathFinder> {
    pub board: &'a Board,
    pub args: &'a GameArguments,
    pub config: &'a Config,
    pub finder: &'a P,
}

impl<'a, P: PathFinder> Dispatcher<'a, P> {
    pub fn new(board: &'a Board, args: &'a GameArguments, config: &'a Config, finder: &'a P) -> Self {
        Dispatcher {
            board,
            args,
            config,
            finder,
        }
    }

    /// Orders for every tank in `roster` this round.
    ///
    /// A fire order ends the round for all remaining tanks unless
    /// `dispatch.fire_ends_round` is off. Tanks whose role has no destination
    /// get no order.
    pub fn compute_round_orders<R: Rng>(
        &self,
        roster: &Roster,
        state: &GameState,
        rng: &mut R,
    ) -> Vec<Order> {
        let started = Instant::now();
        let budget = self.config.dispatch.budget(self.args.round_timeout_in_ms);
        let horizon = self.config.threat.trajectory_horizon;
        let overlay = OccupancyOverlay::project(
            self.board,
            &state.tanks,
            &state.shells,
            self.args.shell_speed,
            horizon,
        );
        if log::log_enabled!(log::Level::Trace) {
            trace!("Overlay:\n{}", overlay.render(self.board.map_size()));
        }

        let (friendlies, enemies): (Vec<&Tank>, Vec<&Tank>) =
            state.tanks.iter().partition(|t| roster.contains(t.id));
        let friendly_cells: Vec<Position> = friendlies.iter().map(|t| t.pos).collect();
        let enemy_cells: Vec<Position> = enemies.iter().map(|t| t.pos).collect();

        let scorer = FireScorer {
            board_width: self.board.width(),
            speed_offset: self.args.speed_offset(),
            min_fire_score: self.config.scorer.min_fire_score,
            termination: self.config.scorer.ray_termination,
        };
        let targets = Targets {
            enemies: &enemy_cells,
            friendlies: &friendly_cells,
            bait: self.bait(state),
        };
        let planner = MovePlanner::new(self.board, self.finder);
        let mut pending = PendingSteps::new();
        let mut searches = 0usize;
        let mut orders = Vec::new();

        for (slot, id) in roster.ids().enumerate() {
            let Some(tank) = state.tank(id) else {
                continue;
            };

            if overlay.is_threatened(&tank.pos) {
                let reach = shell_reach(self.args.shell_speed, horizon, self.board.side());
                if let Some(shell) = inbound_shell(self.board, &state.shells, &tank.pos, reach) {
                    let order = dodge_order(tank, shell);
                    debug!("Tank {}: dodging shell {} with {}", tank.id, shell.id, order);
                    orders.push(order);
                    continue;
                }
            }

            if let Some(dir) = scorer.pick(self.board, tank.pos, &targets) {
                debug!("Tank {}: firing {}", tank.id, dir.as_str());
                orders.push(Order::fire(tank.id, dir));
                if self.config.dispatch.fire_ends_round {
                    break;
                }
                continue;
            }

            let role = Role::assign(self.config.roles.strategy, slot, tank.id);
            let Some(destination) = self.destination(role, tank, &enemy_cells, rng) else {
                debug!("Tank {}: {:?} has nothing to do", tank.id, role);
                continue;
            };

            if searches >= self.config.dispatch.max_path_searches
                || Self::over_budget(started, budget)
            {
                warn!(
                    "Tank {}: round search budget spent ({} searches, {}ms), holding",
                    tank.id,
                    searches,
                    started.elapsed().as_millis()
                );
                orders.push(Order::turn_to(tank.id, tank.dir));
                continue;
            }
            searches += 1;

            let order = planner.plan_move(&overlay, tank, destination, &enemy_cells, &mut pending);
            debug!(
                "Tank {}: {:?} heading to ({}, {}) with {}",
                tank.id, role, destination.x, destination.y, order
            );
            orders.push(order);
        }

        orders
    }

    /// Cell the scorer treats as bait this round
    pub fn bait(&self, state: &GameState) -> Option<Position> {
        match self.config.scorer.bait_source {
            BaitSource::Fixed => self.config.scorer.bait_cell,
            BaitSource::Grass => {
                let anchor = state.flag_pos.unwrap_or_else(|| self.board.center_position());
                let grass = self
                    .board
                    .nearest_grass(&anchor, self.config.scorer.grass_radius);
                trace!("Bait near ({}, {}): {:?}", anchor.x, anchor.y, grass);
                grass
            }
        }
    }

    fn over_budget(started: Instant, budget: Option<Duration>) -> bool {
        budget.map_or(false, |limit| started.elapsed() >= limit)
    }

    /// Where `role` sends `tank` this round, clamped onto the map
    pub fn destination<R: Rng>(
        &self,
        role: Role,
        tank: &Tank,
        enemies: &[Position],
        rng: &mut R,
    ) -> Option<Position> {
        let center = self.board.center_position();
        let width = self.board.width();

        let target = match role {
            Role::Attacker => match self.config.roles.attacker_target {
                AttackerTarget::First => enemies.first().copied(),
                AttackerTarget::Nearest => enemies
                    .iter()
                    .min_by_key(|pos| pos.manhattan(&tank.pos))
                    .copied(),
            }?,
            Role::FlagCapturer => {
                if tank.pos == center {
                    let jitter = self.config.roles.capturer_jitter.max(0);
                    Position::new(
                        center.x + rng.random_range(-jitter..=jitter),
                        center.y + rng.random_range(-jitter..=jitter),
                    )
                } else {
                    center
                }
            }
            Role::Guard => {
                let spread = width / self.config.roles.guard_spread_divisor.max(1);
                Position::new(
                    center.x + rng.random_range(-spread..=spread),
                    center.y + rng.random_range(-spread..=spread),
                )
            }
            Role::Roamer => {
                let reach = (width - 1).max(0);
                Position::new(
                    center.x + rng.random_range(0..=reach),
                    center.y + rng.random_range(0..=reach),
                )
            }
            Role::Scout | Role::Idle => return None,
        };

        Some(self.clamp(target))
    }

    fn clamp(&self, pos: Position) -> Position {
        let last = (self.board.map_size() as i32 - 1).max(0);
        Position::new(pos.x.clamp(0, last), pos.y.clamp(0, last))
    }
}
