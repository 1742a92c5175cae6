// Configuration module for reading Snake.toml
// Board dimensions, engine budgets and session settings live here rather than in code

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub board: BoardConfig,
    pub engine: EngineConfig,
    pub session: SessionConfig,
    pub debug: DebugConfig,
}

/// Board dimensions and starting snake
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
    pub initial_length: usize,
}

/// Decision engine settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    /// Soft per-decision budget; exceeding it is reported, never enforced
    pub compute_budget_us: u64,
}

/// Headless session settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionConfig {
    pub max_moves: u64,
    pub seed: u64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardConfig {
                width: 20,
                height: 20,
                initial_length: 3,
            },
            engine: EngineConfig {
                compute_budget_us: 10_000,
            },
            session: SessionConfig {
                max_moves: 20_000,
                seed: 42,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "snake_decisions.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    /// Rejects settings no session could start with
    pub fn validate(&self) -> Result<(), String> {
        let board = &self.board;
        if board.width <= 0 || board.height <= 0 {
            return Err(format!(
                "Board dimensions must be positive, got {}x{}",
                board.width, board.height
            ));
        }
        if board.initial_length < crate::snake::MIN_LENGTH {
            return Err(format!(
                "Initial snake length must be at least {}, got {}",
                crate::snake::MIN_LENGTH,
                board.initial_length
            ));
        }
        // The starting snake is laid out to the left of the board's centre
        if board.initial_length as i32 > board.width / 2 + 1 {
            return Err(format!(
                "Initial snake length {} does not fit a board {} cells wide",
                board.initial_length, board.width
            ));
        }
        Ok(())
    }
}
