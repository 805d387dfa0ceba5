// One game's worth of agent state
//
// Everything the player service receives is kept here: constants, terrain,
// roster, the current snapshot and a bounded history of past snapshots.
// Handlers mutate it one call at a time.

use std::collections::VecDeque;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::Board;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{ParameterError, SessionError};
use crate::pathfinding::{AStar, PathFinder};
use crate::roster::Roster;
use crate::types::{GameArguments, GameState, Order};

pub struct GameSession<P: PathFinder = AStar> {
    config: Config,
    finder: P,
    rng: StdRng,
    args: Option<GameArguments>,
    board: Option<Board>,
    roster: Roster,
    state: GameState,
    round: i64,
    history: VecDeque<GameState>,
}

impl GameSession<AStar> {
    pub fn new(config: Config) -> Self {
        Self::with_finder(config, AStar)
    }
}

impl<P: PathFinder> GameSession<P> {
    pub fn with_finder(config: Config, finder: P) -> Self {
        let rng = match config.session.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        GameSession {
            history: VecDeque::with_capacity(config.session.history_capacity),
            config,
            finder,
            rng,
            args: None,
            board: None,
            roster: Roster::default(),
            state: GameState::default(),
            round: -1,
        }
    }

    /// Stores the game constants after checking they make the scorer usable
    pub fn upload_parameters(&mut self, args: GameArguments) -> Result<(), SessionError> {
        if args.tank_speed <= 0 {
            return Err(ParameterError::TankSpeed(args.tank_speed).into());
        }
        if args.shell_speed <= 0 {
            return Err(ParameterError::ShellSpeed(args.shell_speed).into());
        }
        let capacity = self.config.board.capacity;
        let fastest = args.tank_speed.max(args.shell_speed);
        if fastest as usize > capacity {
            return Err(ParameterError::TooFast {
                speed: fastest,
                capacity,
            }
            .into());
        }
        if args.speed_offset() < 1 {
            return Err(ParameterError::SpeedOffset {
                shell: args.shell_speed,
                tank: args.tank_speed,
            }
            .into());
        }
        info!(
            "Parameters: tank speed {}, shell speed {}, {} rounds of {}ms",
            args.tank_speed, args.shell_speed, args.max_round, args.round_timeout_in_ms
        );
        self.args = Some(args);
        Ok(())
    }

    /// Replaces the board. A rejected map leaves the previous board in place.
    pub fn upload_map(&mut self, grid: &[Vec<i32>]) -> Result<(), SessionError> {
        let board = Board::load(grid, self.config.board.capacity)?;
        info!(
            "Map loaded: {}x{}, centre ({}, {})",
            board.map_size(),
            board.map_size(),
            board.center(),
            board.center()
        );
        self.board = Some(board);
        Ok(())
    }

    pub fn assign_tanks(&mut self, ids: &[i32]) {
        self.roster = Roster::assign(ids);
        info!("Assigned tanks {:?}", self.roster.ids().collect::<Vec<_>>());
    }

    /// Makes `state` current and archives it
    pub fn latest_state(&mut self, state: GameState) {
        self.round += 1;
        if self.config.session.history_capacity > 0 {
            if self.history.len() == self.config.session.history_capacity {
                self.history.pop_front();
            }
            self.history.push_back(state.clone());
        }
        debug!(
            "Round {}: {} tanks, {} shells",
            self.round,
            state.tanks.len(),
            state.shells.len()
        );
        self.state = state;
    }

    /// Reconciles the roster with the current state and computes this round's orders
    pub fn get_new_orders(&mut self) -> Result<Vec<Order>, SessionError> {
        let args = self.args.ok_or(SessionError::NotReady("parameters"))?;
        let board = self.board.as_ref().ok_or(SessionError::NotReady("map"))?;

        let before = self.roster.tank_count();
        self.roster.reconcile(&self.state);
        if self.roster.tank_count() < before {
            warn!(
                "Round {}: lost {} tank(s), {} left",
                self.round,
                before - self.roster.tank_count(),
                self.roster.tank_count()
            );
        }

        let dispatcher = Dispatcher::new(board, &args, &self.config, &self.finder);
        let orders = dispatcher.compute_round_orders(&self.roster, &self.state, &mut self.rng);

        info!(
            "Round {}: {} order(s) [{}]",
            self.round,
            orders.len(),
            orders
                .iter()
                .map(|o| o.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(orders)
    }

    /// Rounds processed minus one; -1 before the first state arrives
    pub fn round(&self) -> i64 {
        self.round
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &VecDeque<GameState> {
        &self.history
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn args(&self) -> Option<&GameArguments> {
        self.args.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::types::{Direction, Position, Tank};

    fn args() -> GameArguments {
        GameArguments {
            tank_speed: 1,
            shell_speed: 2,
            tank_hp: 5,
            tank_score: 1,
            flag_score: 1,
            max_round: 100,
            round_timeout_in_ms: 2000,
        }
    }

    fn seeded() -> GameSession {
        let mut config = Config::default_hardcoded();
        config.session.rng_seed = Some(42);
        GameSession::new(config)
    }

    #[test]
    fn test_round_counter_starts_at_minus_one() {
        let mut session = seeded();
        assert_eq!(session.round(), -1);
        session.latest_state(GameState::default());
        assert_eq!(session.round(), 0);
        session.latest_state(GameState::default());
        assert_eq!(session.round(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut config = Config::default_hardcoded();
        config.session.history_capacity = 3;
        let mut session = GameSession::new(config);
        for flag in 0..5 {
            session.latest_state(GameState {
                your_flag_no: flag,
                ..GameState::default()
            });
        }
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.history().front().unwrap().your_flag_no, 2);
        assert_eq!(session.state().your_flag_no, 4);
    }

    #[test]
    fn test_orders_require_uploads() {
        let mut session = seeded();
        assert_eq!(
            session.get_new_orders(),
            Err(SessionError::NotReady("parameters"))
        );
        session.upload_parameters(args()).unwrap();
        assert_eq!(session.get_new_orders(), Err(SessionError::NotReady("map")));
    }

    #[test]
    fn test_bad_parameters_rejected() {
        let mut session = seeded();
        let slow_shell = GameArguments {
            shell_speed: 1,
            ..args()
        };
        assert_eq!(
            session.upload_parameters(slow_shell),
            Err(SessionError::Parameters(ParameterError::SpeedOffset {
                shell: 1,
                tank: 1
            }))
        );
        assert!(session.args().is_none());
    }

    #[test]
    fn test_speeds_beyond_board_rejected() {
        let mut session = seeded();
        let runaway = GameArguments {
            shell_speed: 1_500_000_000,
            ..args()
        };
        assert_eq!(
            session.upload_parameters(runaway),
            Err(SessionError::Parameters(ParameterError::TooFast {
                speed: 1_500_000_000,
                capacity: 50
            }))
        );
        assert!(session.args().is_none());

        let edge = GameArguments {
            shell_speed: 50,
            ..args()
        };
        assert!(session.upload_parameters(edge).is_ok());
    }

    #[test]
    fn test_rejected_map_keeps_previous_board() {
        let mut session = seeded();
        session.upload_map(&vec![vec![0; 10]; 10]).unwrap();
        let err = session.upload_map(&vec![vec![0; 60]; 60]).unwrap_err();
        assert_eq!(
            err,
            SessionError::Board(BoardError::TooLarge {
                size: 60,
                capacity: 50
            })
        );
        assert_eq!(session.board().unwrap().map_size(), 10);
    }

    #[test]
    fn test_get_new_orders_reconciles_roster() {
        let mut session = seeded();
        session.upload_parameters(args()).unwrap();
        session.upload_map(&vec![vec![0; 10]; 10]).unwrap();
        session.assign_tanks(&[1, 2, 3]);
        session.latest_state(GameState {
            tanks: vec![Tank {
                id: 3,
                pos: Position::new(0, 0),
                dir: Direction::Down,
                hp: 1,
            }],
            ..GameState::default()
        });
        session.get_new_orders().unwrap();
        assert_eq!(session.roster().slots()[0], Some(3));
        assert_eq!(session.roster().tank_count(), 1);
    }
}
