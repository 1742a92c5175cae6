// Replay of recorded decision logs
//
// Loads the JSONL written by the decision logger, runs the engine again on each
// recorded snapshot and reports where today's engine disagrees with the log.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::Config;
use crate::debug_logger::NO_MOVE;
use crate::engine::{DecisionEngine, Strategy};
use crate::types::{Direction, SnapshotRequest};

/// One line of a decision log
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub turn: u64,
    pub chosen_move: String,
    pub snapshot: SnapshotRequest,
    pub timestamp: String,
}

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: u64,
    /// `None` when the log recorded an undecided call
    pub original_move: Option<Direction>,
    pub replayed_move: Option<Direction>,
    pub matches: bool,
    pub strategy: Strategy,
    pub compute_time_us: u64,
}

#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
    pub fallbacks: usize,
}

pub struct ReplayEngine {
    engine: DecisionEngine,
    verbose: bool,
}

fn move_name(dir: Option<Direction>) -> &'static str {
    dir.map_or(NO_MOVE, |d| d.as_str())
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            engine: DecisionEngine::new(config),
            verbose,
        }
    }

    /// Loads all entries from a JSONL file, skipping blank lines
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;
            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Runs the engine on one recorded snapshot and compares with the log
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        let original_move = Self::parse_move(&entry.chosen_move)?;
        let decision = self.engine.decide_request(&entry.snapshot);
        let matches = original_move == decision.direction;

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: MATCH {} ({:?}, {}us)",
                    entry.turn,
                    move_name(decision.direction),
                    decision.strategy,
                    decision.compute_time_us
                );
            } else {
                warn!(
                    "Turn {}: MISMATCH logged {}, replayed {} ({:?})",
                    entry.turn,
                    move_name(original_move),
                    move_name(decision.direction),
                    decision.strategy
                );
            }
        }

        Ok(ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move: decision.direction,
            matches,
            strategy: decision.strategy,
            compute_time_us: decision.compute_time_us,
        })
    }

    /// Replays every entry; entries with an unreadable move are skipped
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                    None
                }
            })
            .collect()
    }

    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[u64],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;
            results.push(self.replay_entry(entry)?);
        }

        Ok(results)
    }

    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate,
            fallbacks: results
                .iter()
                .filter(|r| matches!(r.strategy, Strategy::Fallback | Strategy::ContinueStraight))
                .count(),
        }
    }

    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("Fallbacks:      {}", stats.fallbacks);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time = results.iter().map(|r| r.compute_time_us as f64).sum::<f64>()
                / results.len() as f64;
            println!("Average Decision Time:   {:.1}us\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");
            for result in mismatches {
                println!(
                    "Turn {}: {} → {} ({:?}, {}us)",
                    result.turn,
                    move_name(result.original_move),
                    move_name(result.replayed_move),
                    result.strategy,
                    result.compute_time_us
                );
            }
            println!();
        }
    }

    /// Checks the logged move of each listed turn against its acceptable set
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(u64, Vec<Direction>)],
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual = Self::parse_move(&entry.chosen_move)?;
            if !actual.is_some_and(|dir| acceptable.contains(&dir)) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    move_name(actual)
                ));
            }
        }

        Ok(())
    }

    fn parse_move(s: &str) -> Result<Option<Direction>, String> {
        if s.eq_ignore_ascii_case(NO_MOVE) {
            return Ok(None);
        }
        Direction::parse(s).map(Some)
    }
}
