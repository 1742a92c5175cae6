// Snake model: ordered body (head first, tail last) with directional movement
//
// Segments live in a deque so a move is a push at the front and, unless the
// snake is growing, a pop at the back.

use std::collections::{HashSet, VecDeque};

use crate::error::SnakeError;
use crate::types::{Direction, Position};

/// Shortest body that still has distinct head and tail cells
pub const MIN_LENGTH: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Direction,
    score: u32,
}

impl Snake {
    /// Creates a straight snake of `length` segments trailing behind `head`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let back = direction.opposite();
        let mut body = VecDeque::with_capacity(length.max(MIN_LENGTH));
        let mut segment = head;

        for _ in 0..length.max(MIN_LENGTH) {
            body.push_back(segment);
            segment = back.apply(&segment);
        }

        Snake {
            body,
            direction,
            pending_direction: direction,
            score: 0,
        }
    }

    /// Builds a snake from explicit segments, checking the body invariants:
    /// at least two segments, consecutive segments adjacent, no cell repeated,
    /// and a heading that does not point back into the neck
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Result<Self, SnakeError> {
        if segments.is_empty() {
            return Err(SnakeError::Empty);
        }
        if segments.len() < MIN_LENGTH {
            return Err(SnakeError::TooShort {
                len: segments.len(),
                min: MIN_LENGTH,
            });
        }

        for pair in segments.windows(2) {
            if !pair[0].is_adjacent(&pair[1]) {
                return Err(SnakeError::NotAdjacent {
                    first: pair[0],
                    second: pair[1],
                });
            }
        }

        let mut seen = HashSet::with_capacity(segments.len());
        for segment in &segments {
            if !seen.insert(*segment) {
                return Err(SnakeError::SelfOverlap(*segment));
            }
        }

        if direction.apply(&segments[0]) == segments[1] {
            return Err(SnakeError::ReverseDirection {
                current: direction.opposite(),
                requested: direction,
            });
        }

        Ok(Snake {
            body: segments.into(),
            direction,
            pending_direction: direction,
            score: 0,
        })
    }

    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Direction of the last completed move
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Direction that will be used by the next move
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Segments from head to tail
    pub fn segments(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    /// Queues a new heading; a 180-degree turn is refused
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), SnakeError> {
        if direction == self.direction.opposite() {
            return Err(SnakeError::ReverseDirection {
                current: self.direction,
                requested: direction,
            });
        }
        self.pending_direction = direction;
        Ok(())
    }

    pub fn next_head_position(&self) -> Position {
        self.pending_direction.apply(&self.head())
    }

    /// Moves one cell along the pending direction and returns the new head.
    /// A growing move keeps the tail and scores a point.
    pub fn advance(&mut self, grow: bool) -> Position {
        self.direction = self.pending_direction;
        let new_head = self.next_head_position();
        self.body.push_front(new_head);

        if grow {
            self.score += 1;
        } else {
            self.body.pop_back();
        }

        new_head
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// True when the head shares a cell with any other segment
    pub fn collides_with_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&segment| segment == head)
    }
}
