// Library exports for the tank commander
// The service binary and the replay tool both drive the decision core through these

pub mod board;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod dispatcher;
pub mod error;
pub mod line_of_fire;
pub mod pathfinding;
pub mod planner;
pub mod replay;
pub mod roster;
pub mod session;
pub mod threat;
pub mod types;
