// Debug logging module for asynchronous round logging
//
// Each round's state and the orders we answered with are appended to a JSONL
// file from a spawned task, so the order response never waits on disk.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::{GameState, Order};

/// One line of the round log
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoundLogEntry {
    pub round: i64,
    pub state: GameState,
    pub orders: Vec<Order>,
    pub timestamp: String,
}

/// Shared debug logger state
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Round logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create round log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a round asynchronously (fire-and-forget).
    /// Must be called from within a tokio runtime when enabled.
    pub fn log_round(&self, round: i64, state: GameState, orders: Vec<Order>) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        let entry = RoundLogEntry {
            round,
            state,
            orders,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    /// Appends one entry and flushes
    pub async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: RoundLogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write round log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush round log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize round log entry: {}", e);
                }
            }
        }
    }

    /// Writes an entry and waits for it to land; used where ordering matters
    pub async fn log_round_now(&self, round: i64, state: GameState, orders: Vec<Order>) {
        if !self.enabled {
            return;
        }
        let entry = RoundLogEntry {
            round,
            state,
            orders,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        Self::write_entry(self.file.clone(), entry).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Position, Tank};

    #[tokio::test]
    async fn test_entries_written_as_json_lines() {
        let path = std::env::temp_dir().join(format!("tank_log_{}.jsonl", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        let logger = DebugLogger::new(true, &path_str).await;
        assert!(logger.is_enabled());

        let state = GameState {
            tanks: vec![Tank {
                id: 1,
                pos: Position::new(1, 2),
                dir: Direction::Left,
                hp: 3,
            }],
            ..GameState::default()
        };
        logger
            .log_round_now(0, state.clone(), vec![Order::fire(1, Direction::Left)])
            .await;
        logger.log_round_now(1, state, vec![]).await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let entries: Vec<RoundLogEntry> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].orders, vec![Order::fire(1, Direction::Left)]);
        assert_eq!(entries[1].round, 1);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_disabled_logger_is_noop() {
        let logger = DebugLogger::new(false, "unused.jsonl").await;
        assert!(!logger.is_enabled());
        logger.log_round(0, GameState::default(), vec![]);
        assert!(!std::path::Path::new("unused.jsonl").exists());
    }
}
