//! Headless batch runner for the decision engine
//!
//! Plays many seeded sessions in parallel and reports how the engine fares.
//!
//! Usage: simulate [--games N] [--seed S] [--max-moves M] [--config path]

use rayon::prelude::*;
use std::env;
use std::process;

use ouroboros_snake::config::Config;
use ouroboros_snake::engine::DecisionEngine;
use ouroboros_snake::game::{GameSession, GameStatus};

struct GameSummary {
    seed: u64,
    status: GameStatus,
    score: u32,
    moves: u64,
    average_decision_us: f64,
}

fn parse_number(flag: &str, value: Option<&String>) -> u64 {
    let Some(value) = value else {
        eprintln!("Error: {} requires an argument", flag);
        process::exit(1);
    };
    value.parse().unwrap_or_else(|e| {
        eprintln!("Error: invalid value '{}' for {}: {}", value, flag, e);
        process::exit(1);
    })
}

fn play(config: &Config, engine: &DecisionEngine, seed: u64, max_moves: u64) -> Option<GameSummary> {
    let mut session = match GameSession::new(&config.board, seed) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Cannot start session with seed {}: {}", seed, e);
            return None;
        }
    };

    let status = session.run(engine, max_moves);
    Some(GameSummary {
        seed,
        status,
        score: session.score(),
        moves: session.moves(),
        average_decision_us: session.average_decision_us(),
    })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut games = 100;
    let mut seed = None;
    let mut max_moves = None;
    let mut config_path = "Snake.toml".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                games = parse_number("--games", args.get(i + 1));
                i += 1;
            }
            "--seed" => {
                seed = Some(parse_number("--seed", args.get(i + 1)));
                i += 1;
            }
            "--max-moves" => {
                max_moves = Some(parse_number("--max-moves", args.get(i + 1)));
                i += 1;
            }
            "--config" => {
                let Some(path) = args.get(i + 1) else {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                };
                config_path = path.clone();
                i += 1;
            }
            other => {
                eprintln!("Error: Unknown option '{}'", other);
                eprintln!("Usage: {} [--games N] [--seed S] [--max-moves M] [--config path]", args[0]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        Config::default_hardcoded()
    });
    let base_seed = seed.unwrap_or(config.session.seed);
    let max_moves = max_moves.unwrap_or(config.session.max_moves);
    let engine = DecisionEngine::new(config.clone());

    println!("\n═══════════════════════════════════════════════════════════");
    println!("                 SNAKE SIMULATION");
    println!("═══════════════════════════════════════════════════════════");
    println!("Board:        {}x{}", config.board.width, config.board.height);
    println!("Games:        {}", games);
    println!("Seeds:        {}..{}", base_seed, base_seed + games);
    println!("Move limit:   {}", max_moves);
    println!("═══════════════════════════════════════════════════════════\n");

    let summaries: Vec<GameSummary> = (0..games)
        .into_par_iter()
        .filter_map(|n| play(&config, &engine, base_seed + n, max_moves))
        .collect();

    if summaries.is_empty() {
        eprintln!("No game could be started");
        process::exit(1);
    }

    let played = summaries.len() as f64;
    let wins = summaries.iter().filter(|s| s.status == GameStatus::Won).count();
    let deaths = summaries.iter().filter(|s| s.status == GameStatus::Over).count();
    let avg_score = summaries.iter().map(|s| s.score as f64).sum::<f64>() / played;
    let avg_moves = summaries.iter().map(|s| s.moves as f64).sum::<f64>() / played;
    let avg_decision = summaries.iter().map(|s| s.average_decision_us).sum::<f64>() / played;

    println!("Wins:                   {} ({:.1}%)", wins, wins as f64 / played * 100.0);
    println!("Deaths:                 {}", deaths);
    println!("Unfinished:             {}", summaries.len() - wins - deaths);
    println!("Average Score:          {:.1}", avg_score);
    println!("Average Moves:          {:.1}", avg_moves);
    println!("Average Decision Time:  {:.1}us", avg_decision);

    if let Some(best) = summaries.iter().max_by_key(|s| s.score) {
        println!("Best Game:              seed {} (score {})", best.seed, best.score);
    }
    if let Some(worst) = summaries.iter().min_by_key(|s| s.score) {
        println!("Worst Game:             seed {} (score {})", worst.seed, worst.score);
    }
}
