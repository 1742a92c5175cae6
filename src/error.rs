// Domain errors for the snake model and the decision engine

use thiserror::Error;

use crate::types::{Direction, Position};

/// Violations of the snake body invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnakeError {
    #[error("snake has no segments")]
    Empty,
    #[error("snake needs at least {min} segments, got {len}")]
    TooShort { len: usize, min: usize },
    #[error("segments {first:?} and {second:?} are not grid-adjacent")]
    NotAdjacent { first: Position, second: Position },
    #[error("segment {0:?} is occupied twice")]
    SelfOverlap(Position),
    #[error("cannot reverse from {current:?} to {requested:?}")]
    ReverseDirection {
        current: Direction,
        requested: Direction,
    },
    #[error("segment {0:?} lies outside the board")]
    OutOfBounds(Position),
}

/// Reasons a snapshot cannot be turned into a decision
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("snapshot has no snake")]
    MissingSnake,
    #[error("snapshot has no food position")]
    MissingFood,
    #[error("invalid snake: {0}")]
    InvalidSnake(#[from] SnakeError),
    #[error("food at {0:?} overlaps the snake")]
    FoodOnSnake(Position),
    #[error("food at {0:?} is not an open cell on the board")]
    FoodOutOfBounds(Position),
    #[error("board {width}x{height} is too small")]
    BoardTooSmall { width: i32, height: i32 },
    #[error("board {width}x{height} is too large to allocate")]
    BoardTooLarge { width: i32, height: i32 },
}
