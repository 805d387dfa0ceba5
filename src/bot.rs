// Player service facade
//
// One Bot serves one game session. The session sits behind a mutex so that
// the transport may call in from any worker thread, but calls are still
// handled strictly one at a time.

use log::{error, warn};
use parking_lot::Mutex;

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::error::SessionError;
use crate::session::GameSession;
use crate::types::{GameArguments, GameState, Order};

/// Tank commander with one method per player-service call
pub struct Bot {
    session: Mutex<GameSession>,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    pub fn new(config: Config) -> Self {
        Self::with_logger(config, DebugLogger::disabled())
    }

    pub fn with_logger(config: Config, logger: DebugLogger) -> Self {
        Bot {
            session: Mutex::new(GameSession::new(config)),
            logger,
        }
    }

    pub fn ping(&self) -> bool {
        true
    }

    pub fn upload_parameters(&self, args: GameArguments) -> Result<(), SessionError> {
        self.session.lock().upload_parameters(args).map_err(|e| {
            warn!("Rejected parameters: {}", e);
            e
        })
    }

    pub fn upload_map(&self, grid: &[Vec<i32>]) -> Result<(), SessionError> {
        self.session.lock().upload_map(grid).map_err(|e| {
            warn!("Rejected map: {}", e);
            e
        })
    }

    pub fn assign_tanks(&self, ids: &[i32]) {
        self.session.lock().assign_tanks(ids);
    }

    pub fn latest_state(&self, state: GameState) {
        self.session.lock().latest_state(state);
    }

    /// This round's orders. A session that cannot plan answers with no orders.
    pub fn get_new_orders(&self) -> Vec<Order> {
        let mut session = self.session.lock();
        let orders = match session.get_new_orders() {
            Ok(orders) => orders,
            Err(e) => {
                error!("Round {}: no orders ({})", session.round(), e);
                Vec::new()
            }
        };

        if self.logger.is_enabled() {
            self.logger
                .log_round(session.round(), session.state().clone(), orders.clone());
        }
        orders
    }
}
