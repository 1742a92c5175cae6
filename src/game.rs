// Headless game session: owns the board and snake, applies one move per tick
//
// The session is what the engine's caller looks like: it spawns food, moves the
// snake, detects collisions and the win condition, and re-synchronises the
// board before every decision. Food placement uses a seeded RNG so runs are
// reproducible.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::Board;
use crate::config::BoardConfig;
use crate::engine::{Decision, DecisionEngine};
use crate::error::{EngineError, SnakeError};
use crate::snake::Snake;
use crate::types::{CellKind, Direction, Position, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Running,
    Paused,
    Over,
    /// The snake fills every open cell
    Won,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing happened because the game is not running
    Idle,
    Moved,
    Ate,
    Died,
    Won,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    snake: Snake,
    status: GameStatus,
    moves: u64,
    decisions: u64,
    total_decision_us: u64,
    rng: StdRng,
}

impl GameSession {
    /// New session with the snake centred and heading right
    pub fn new(config: &BoardConfig, seed: u64) -> Result<Self, EngineError> {
        let board = Board::new(config.width, config.height)?;
        let start = Position::new(config.width / 2, config.height / 2);
        let snake = Snake::new(start, Direction::Right, config.initial_length);
        Self::with_board(board, snake, seed)
    }

    /// Session on a prepared board (walls are kept); food is spawned fresh
    pub fn with_board(board: Board, snake: Snake, seed: u64) -> Result<Self, EngineError> {
        for segment in snake.segments() {
            if !board.is_in_bounds(*segment) || board.cell(*segment) == CellKind::Wall {
                return Err(EngineError::InvalidSnake(SnakeError::OutOfBounds(*segment)));
            }
        }

        let mut session = GameSession {
            board,
            snake,
            status: GameStatus::Running,
            moves: 0,
            decisions: 0,
            total_decision_us: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        session.board.set_food(None);
        session.board.sync_with(&session.snake);
        session.spawn_food();
        Ok(session)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn score(&self) -> u32 {
        self.snake.score()
    }

    /// Mean engine time per decision, in microseconds
    pub fn average_decision_us(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.total_decision_us as f64 / self.decisions as f64
        }
    }

    /// Owned copy of the current state for the engine
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            snake: Some(self.snake.clone()),
        }
    }

    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Running,
            other => other,
        };
    }

    /// Places food on a uniformly random open cell the snake does not occupy.
    /// With no such cell left the game is won.
    fn spawn_food(&mut self) {
        self.board.set_food(None);

        let free: Vec<Position> = self
            .board
            .positions()
            .filter(|pos| self.board.cell(*pos) == CellKind::Empty)
            .collect();

        if free.is_empty() {
            info!("No free cell left for food, game won");
            self.status = GameStatus::Won;
            return;
        }

        let food = free[self.rng.random_range(0..free.len())];
        debug!("Spawned food at ({}, {})", food.x, food.y);
        self.board.set_food(Some(food));
    }

    fn collided(&self) -> bool {
        let head = self.snake.head();
        !self.board.is_in_bounds(head)
            || self.board.cell(head) == CellKind::Wall
            || self.snake.collides_with_self()
    }

    /// Advances the game one tick. `None` keeps the current heading, as does a
    /// requested reversal.
    pub fn update(&mut self, direction: Option<Direction>) -> TickOutcome {
        if self.status != GameStatus::Running {
            return TickOutcome::Idle;
        }

        if let Some(dir) = direction {
            if let Err(e) = self.snake.set_direction(dir) {
                debug!("Ignoring input: {}", e);
            }
        }

        let will_eat = Some(self.snake.next_head_position()) == self.board.food();
        self.snake.advance(will_eat);
        self.moves += 1;

        if self.collided() {
            info!(
                "Game over after {} moves (score: {})",
                self.moves,
                self.snake.score()
            );
            self.status = GameStatus::Over;
            return TickOutcome::Died;
        }

        // Sync before respawning so food never lands on the new head
        self.board.sync_with(&self.snake);

        if !will_eat {
            return TickOutcome::Moved;
        }

        self.spawn_food();
        if self.snake.len() >= self.board.open_cells() {
            self.status = GameStatus::Won;
        }

        if self.status == GameStatus::Won {
            info!("Board filled after {} moves", self.moves);
            TickOutcome::Won
        } else {
            TickOutcome::Ate
        }
    }

    /// Asks the engine for a direction and applies it. No decision is
    /// requested unless the game is running.
    pub fn step(&mut self, engine: &DecisionEngine) -> Option<(Decision, TickOutcome)> {
        if self.status != GameStatus::Running {
            return None;
        }

        let decision = engine.decide(&self.snapshot());
        self.decisions += 1;
        self.total_decision_us += decision.compute_time_us;

        let outcome = self.update(decision.direction);
        Some((decision, outcome))
    }

    /// Plays until the game ends or `max_moves` ticks have passed
    pub fn run(&mut self, engine: &DecisionEngine, max_moves: u64) -> GameStatus {
        while self.status == GameStatus::Running && self.moves < max_moves {
            self.step(engine);
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn small_config(width: i32, height: i32) -> BoardConfig {
        BoardConfig {
            width,
            height,
            initial_length: 3,
        }
    }

    #[test]
    fn test_new_session_places_snake_and_food() {
        let session = GameSession::new(&small_config(10, 10), 7).unwrap();
        assert_eq!(session.status(), GameStatus::Running);
        assert_eq!(session.snake().head(), Position::new(5, 5));
        assert_eq!(session.snake().len(), 3);

        let food = session.board().food().unwrap();
        assert!(!session.snake().contains(food));
        assert_eq!(session.board().cell(food), CellKind::Food);
    }

    #[test]
    fn test_same_seed_spawns_same_food() {
        let a = GameSession::new(&small_config(10, 10), 99).unwrap();
        let b = GameSession::new(&small_config(10, 10), 99).unwrap();
        assert_eq!(a.board().food(), b.board().food());
    }

    #[test]
    fn test_eating_grows_and_respawns_food() {
        let board = Board::new(6, 6).unwrap();
        let snake = Snake::new(Position::new(2, 2), Direction::Right, 3);
        let mut session = GameSession::with_board(board, snake, 1).unwrap();
        session.board.set_food(Some(Position::new(3, 2)));
        session.board.sync_with(&session.snake);

        let outcome = session.update(None);

        assert_eq!(outcome, TickOutcome::Ate);
        assert_eq!(session.snake().len(), 4);
        assert_eq!(session.score(), 1);
        let food = session.board().food().unwrap();
        assert_ne!(food, Position::new(3, 2));
        assert!(!session.snake().contains(food));
    }

    #[test]
    fn test_running_into_wall_ends_game() {
        let mut session = GameSession::new(&small_config(6, 6), 3).unwrap();
        session.board.set_food(Some(Position::new(0, 0)));
        session.board.sync_with(&session.snake);

        // Head starts at (3, 3) heading right; two moves reach x = 5, the third leaves
        assert_eq!(session.update(None), TickOutcome::Moved);
        assert_eq!(session.update(None), TickOutcome::Moved);
        assert_eq!(session.update(None), TickOutcome::Died);
        assert_eq!(session.status(), GameStatus::Over);
        assert_eq!(session.update(None), TickOutcome::Idle);
    }

    #[test]
    fn test_reverse_input_is_ignored() {
        let mut session = GameSession::new(&small_config(8, 8), 5).unwrap();
        session.board.set_food(Some(Position::new(0, 0)));
        session.board.sync_with(&session.snake);

        session.update(Some(Direction::Left));
        assert_eq!(session.snake().head(), Position::new(5, 4));
        assert_eq!(session.snake().direction(), Direction::Right);
    }

    #[test]
    fn test_paused_session_does_not_move() {
        let mut session = GameSession::new(&small_config(8, 8), 5).unwrap();
        let head = session.snake().head();
        session.toggle_pause();
        assert_eq!(session.update(Some(Direction::Up)), TickOutcome::Idle);
        assert_eq!(session.snake().head(), head);
        session.toggle_pause();
        assert_eq!(session.status(), GameStatus::Running);
    }

    #[test]
    fn test_filling_last_cell_wins() {
        // 2x2 board, three segments, food on the only free cell
        let board = Board::new(2, 2).unwrap();
        let snake = Snake::from_segments(
            vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)],
            Direction::Left,
        )
        .unwrap();
        let mut session = GameSession::with_board(board, snake, 0).unwrap();
        assert_eq!(session.board().food(), Some(Position::new(0, 1)));

        session.update(Some(Direction::Down));

        assert_eq!(session.status(), GameStatus::Won);
        assert_eq!(session.snake().len(), 4);
        assert_eq!(session.board().food(), None);
    }

    #[test]
    fn test_engine_driven_session_keeps_body_invariants() {
        let engine = DecisionEngine::new(Config::default_hardcoded());
        let mut session = GameSession::new(&small_config(8, 8), 11).unwrap();

        for _ in 0..300 {
            if session.status() != GameStatus::Running {
                break;
            }
            let (decision, _) = session.step(&engine).unwrap();
            assert!(decision.direction.is_some());

            let body: Vec<Position> = session.snake().segments().copied().collect();
            for pair in body.windows(2) {
                assert!(pair[0].is_adjacent(&pair[1]));
            }
            if let Some(food) = session.board().food() {
                assert!(!session.snake().contains(food));
            }
        }

        assert!(session.moves() > 0);
        assert!(session.average_decision_us() >= 0.0);
    }

    #[test]
    fn test_step_requests_nothing_when_not_running() {
        let engine = DecisionEngine::new(Config::default_hardcoded());
        let mut session = GameSession::new(&small_config(8, 8), 2).unwrap();
        session.toggle_pause();
        assert!(session.step(&engine).is_none());
        assert_eq!(session.moves(), 0);
    }
}
