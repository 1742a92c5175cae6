// Core value types shared by every layer of the engine
//
// Coordinates follow screen convention: x grows to the right, y grows downward,
// so `Direction::Up` decrements y.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{EngineError, SnakeError};
use crate::snake::Snake;

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Manhattan distance between two positions; exact for any pair of coordinates
    pub fn manhattan(&self, other: &Position) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }

    /// True when the two positions share an edge
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.manhattan(other) == 1
    }
}

/// Represents the four possible movement directions for the snake
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions in enumeration (and tie-break) order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to its lowercase string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses a direction name, case-insensitively
    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Calculates the next coordinate when moving in this direction.
    /// Saturates at the `i32` range, which no board reaches.
    pub fn apply(&self, coord: &Position) -> Position {
        match self {
            Direction::Up => Position { x: coord.x, y: coord.y.saturating_sub(1) },
            Direction::Down => Position { x: coord.x, y: coord.y.saturating_add(1) },
            Direction::Left => Position { x: coord.x.saturating_sub(1), y: coord.y },
            Direction::Right => Position { x: coord.x.saturating_add(1), y: coord.y },
        }
    }

    /// Direction of a single step from `from` to `to`, if they are adjacent
    pub fn between(from: &Position, to: &Position) -> Option<Direction> {
        Direction::all()
            .into_iter()
            .find(|dir| dir.apply(from) == *to)
    }
}

/// Classification of a single board cell
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Empty,
    Head,
    Body,
    Tail,
    Food,
    /// Obstacle inside the board, also reported for every out-of-bounds query
    Wall,
}

/// Snake portion of a session snapshot as it travels over the wire
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SnakeState {
    /// Occupied cells, head first
    pub body: Vec<Position>,
    pub direction: Direction,
    #[serde(default)]
    pub score: u32,
}

/// JSON form of the session state handed to the engine each tick
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SnapshotRequest {
    pub width: i32,
    pub height: i32,
    pub food: Option<Position>,
    #[serde(default)]
    pub walls: Vec<Position>,
    pub snake: Option<SnakeState>,
}

/// Validated session state: a board plus the snake moving on it
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub board: Board,
    pub snake: Option<Snake>,
}

impl SnapshotRequest {
    /// Builds a synchronised board and snake from the wire form
    pub fn to_snapshot(&self) -> Result<Snapshot, EngineError> {
        let mut board = Board::new(self.width, self.height)?;
        for wall in &self.walls {
            board.set_cell(*wall, CellKind::Wall);
        }
        board.set_food(self.food);

        let snake = match &self.snake {
            Some(state) => {
                // Checked before the body invariants so arbitrary coordinates
                // never reach the adjacency arithmetic, and before syncing,
                // which would paint over walls
                for segment in &state.body {
                    if !board.is_in_bounds(*segment) || board.cell(*segment) == CellKind::Wall {
                        return Err(EngineError::InvalidSnake(SnakeError::OutOfBounds(*segment)));
                    }
                }
                let snake = Snake::from_segments(state.body.clone(), state.direction)
                    .map_err(EngineError::InvalidSnake)?
                    .with_score(state.score);
                board.sync_with(&snake);
                Some(snake)
            }
            None => None,
        };

        Ok(Snapshot { board, snake })
    }

    /// Wire form of an existing board and snake
    pub fn from_parts(board: &Board, snake: &Snake) -> Self {
        SnapshotRequest {
            width: board.width(),
            height: board.height(),
            food: board.food(),
            walls: board.walls(),
            snake: Some(SnakeState {
                body: snake.segments().copied().collect(),
                direction: snake.direction(),
                score: snake.score(),
            }),
        }
    }
}
