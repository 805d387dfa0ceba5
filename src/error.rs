// Error types for map and parameter uploads
//
// Per-round outcomes (no route, no shot) are ordinary control flow and never
// appear here. Only uploads that would leave the session inconsistent fail.

use thiserror::Error;

use crate::types::Position;

/// Failures while loading or reading the board
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("cell ({}, {}) is outside the {side}x{side} board", .pos.x, .pos.y)]
    OutOfBounds { pos: Position, side: usize },
    #[error("map is empty")]
    EmptyMap,
    #[error("map row {row} has {len} cells, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },
    #[error("map side {size} exceeds board capacity {capacity}")]
    TooLarge { size: usize, capacity: usize },
    #[error("unknown cell value {value} at ({row}, {col})")]
    InvalidCell { row: usize, col: usize, value: i32 },
}

/// Rejected game arguments
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("tank speed must be positive, got {0}")]
    TankSpeed(i32),
    #[error("shell speed must be positive, got {0}")]
    ShellSpeed(i32),
    #[error("shell speed {shell} must exceed tank speed {tank}")]
    SpeedOffset { shell: i32, tank: i32 },
    #[error("speed {speed} exceeds the board capacity {capacity}")]
    TooFast { speed: i32, capacity: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    #[error("session not ready: {0} not uploaded")]
    NotReady(&'static str),
}
