// Replay module for analyzing round logs and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL round logs written by the debug logger
// 2. Re-run the decision core on each logged state
// 3. Compare logged vs replayed orders
// 4. Generate a summary report

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::RoundLogEntry;
use crate::session::GameSession;
use crate::types::{GameArguments, Order};

/// Result of replaying a single round
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub round: i64,
    pub original_orders: Vec<Order>,
    pub replayed_orders: Vec<Order>,
    pub matches: bool,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_rounds: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Game setup that the round log does not carry
#[derive(Debug, Clone)]
pub struct ReplaySetup {
    pub args: GameArguments,
    pub map: Vec<Vec<i32>>,
    pub tanks: Vec<i32>,
}

/// Replay engine for analyzing round logs
pub struct ReplayEngine {
    config: Config,
    setup: ReplaySetup,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine. Without a configured seed, a fixed one is
    /// used so that replays are repeatable.
    pub fn new(mut config: Config, setup: ReplaySetup, verbose: bool) -> Self {
        config.session.rng_seed.get_or_insert(0);
        config.debug.enabled = false;
        ReplayEngine {
            config,
            setup,
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<RoundLogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: RoundLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Fresh session with the game setup applied
    fn prepared_session(&self) -> Result<GameSession, String> {
        let mut session = GameSession::new(self.config.clone());
        session
            .upload_parameters(self.setup.args)
            .map_err(|e| e.to_string())?;
        session
            .upload_map(&self.setup.map)
            .map_err(|e| e.to_string())?;
        session.assign_tanks(&self.setup.tanks);
        Ok(session)
    }

    /// Feeds one logged state to `session` and compares the orders it produces
    fn replay_next(
        &self,
        session: &mut GameSession,
        entry: &RoundLogEntry,
    ) -> Result<ReplayResult, String> {
        let start_time = Instant::now();

        session.latest_state(entry.state.clone());
        let replayed_orders = session.get_new_orders().map_err(|e| e.to_string())?;

        let matches = replayed_orders == entry.orders;
        let result = ReplayResult {
            round: entry.round,
            original_orders: entry.orders.clone(),
            replayed_orders,
            matches,
            computation_time_ms: start_time.elapsed().as_millis(),
        };

        if self.verbose {
            if matches {
                info!("Round {}: ✓ MATCH - {}", entry.round, format_orders(&result.replayed_orders));
            } else {
                warn!(
                    "Round {}: ✗ MISMATCH - Original: {}, Replayed: {}",
                    entry.round,
                    format_orders(&result.original_orders),
                    format_orders(&result.replayed_orders)
                );
            }
        }

        Ok(result)
    }

    /// Re-runs one logged round on its own. Only rounds that do not depend on
    /// earlier random draws reproduce this way; use `replay_all` for the rest.
    pub fn replay_entry(&self, entry: &RoundLogEntry) -> Result<ReplayResult, String> {
        let mut session = self.prepared_session()?;
        self.replay_next(&mut session, entry)
    }

    /// Replays every entry in round order through one session, so the random
    /// stream and the roster evolve exactly as they did live
    pub fn replay_all(&self, entries: &[RoundLogEntry]) -> Result<Vec<ReplayResult>, String> {
        let mut ordered: Vec<&RoundLogEntry> = entries.iter().collect();
        ordered.sort_by_key(|e| e.round);

        let mut session = self.prepared_session()?;
        ordered
            .into_iter()
            .map(|entry| self.replay_next(&mut session, entry))
            .collect()
    }

    /// Replays specific rounds, running every earlier round first
    pub fn replay_rounds(
        &self,
        entries: &[RoundLogEntry],
        rounds: &[i64],
    ) -> Result<Vec<ReplayResult>, String> {
        if let Some(missing) = rounds
            .iter()
            .find(|round| !entries.iter().any(|e| e.round == **round))
        {
            return Err(format!("Round {} not found in log file", missing));
        }

        let last = rounds.iter().copied().max().unwrap_or(-1);
        let prefix: Vec<RoundLogEntry> = entries
            .iter()
            .filter(|e| e.round <= last)
            .cloned()
            .collect();
        let results = self.replay_all(&prefix)?;

        Ok(rounds
            .iter()
            .filter_map(|round| results.iter().find(|r| r.round == *round).cloned())
            .collect())
    }

    /// Checks that each expected order shows up among the replayed orders of its round
    pub fn validate_expected_orders(
        &self,
        entries: &[RoundLogEntry],
        expected: &[(i64, Order)],
    ) -> Result<(), String> {
        let rounds: Vec<i64> = expected.iter().map(|(round, _)| *round).collect();
        let results = self.replay_rounds(entries, &rounds)?;

        for ((round, order), result) in expected.iter().zip(results.iter()) {
            if !result.replayed_orders.contains(order) {
                return Err(format!(
                    "Round {}: expected {}, got {}",
                    round,
                    order,
                    format_orders(&result.replayed_orders)
                ));
            }
        }
        Ok(())
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_rounds = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_rounds > 0 {
            (matches as f64 / total_rounds as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_rounds,
            matches,
            mismatches: total_rounds - matches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Rounds:   {}", stats.total_rounds);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        for result in results.iter().filter(|r| !r.matches) {
            println!(
                "Round {}: {} → {}",
                result.round,
                format_orders(&result.original_orders),
                format_orders(&result.replayed_orders)
            );
        }
    }
}

/// Renders orders as `id:kind:dir` separated by spaces
pub fn format_orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "(none)".to_string();
    }
    orders
        .iter()
        .map(|o| o.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, GameState, Position, Tank};

    fn setup() -> ReplaySetup {
        ReplaySetup {
            args: GameArguments {
                tank_speed: 1,
                shell_speed: 3,
                tank_hp: 5,
                tank_score: 1,
                flag_score: 1,
                max_round: 100,
                round_timeout_in_ms: 2000,
            },
            map: vec![vec![0; 20]; 20],
            tanks: vec![1],
        }
    }

    fn entry(round: i64, orders: Vec<Order>) -> RoundLogEntry {
        RoundLogEntry {
            round,
            state: GameState {
                tanks: vec![
                    Tank {
                        id: 1,
                        pos: Position::new(2, 2),
                        dir: Direction::Down,
                        hp: 5,
                    },
                    Tank {
                        id: 9,
                        pos: Position::new(2, 5),
                        dir: Direction::Left,
                        hp: 5,
                    },
                ],
                ..GameState::default()
            },
            orders,
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_replay_matches_logged_fire_order() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), setup(), false);
        let result = engine
            .replay_entry(&entry(0, vec![Order::fire(1, Direction::Right)]))
            .unwrap();
        assert!(result.matches);
    }

    #[test]
    fn test_replay_reports_mismatch() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), setup(), false);
        let results = engine
            .replay_all(&[
                entry(0, vec![Order::fire(1, Direction::Right)]),
                entry(1, vec![Order::move_to(1, Direction::Down)]),
            ])
            .unwrap();
        let stats = engine.generate_stats(&results);
        assert_eq!(stats.total_rounds, 2);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.mismatches, 1);
    }

    #[test]
    fn test_missing_round_is_an_error() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), setup(), false);
        assert!(engine.replay_rounds(&[entry(0, vec![])], &[3]).is_err());
    }

    #[test]
    fn test_validate_expected_orders() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), setup(), false);
        let entries = vec![entry(0, vec![])];
        assert!(engine
            .validate_expected_orders(&entries, &[(0, Order::fire(1, Direction::Right))])
            .is_ok());
        assert!(engine
            .validate_expected_orders(&entries, &[(0, Order::move_to(1, Direction::Up))])
            .is_err());
    }

    #[test]
    fn test_format_orders() {
        assert_eq!(format_orders(&[]), "(none)");
        assert_eq!(
            format_orders(&[Order::fire(1, Direction::Up), Order::turn_to(2, Direction::Left)]),
            "1:fire:up 2:turnTo:left"
        );
    }
}
