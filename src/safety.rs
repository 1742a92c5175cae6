// Move safety validation by simulated escape-route search
//
// A move that does not eat keeps the occupied-cell count constant (the tail
// steps off as the head steps on), so passing the walkability check is enough.
// A move that eats grows the snake; it is only safe if, with the old head cell
// turned into body, the new head can still reach the tail.

use serde::Serialize;
use std::time::Instant;

use crate::board::Board;
use crate::pathfinding::{bfs, PathResult};
use crate::snake::Snake;
use crate::types::{CellKind, Direction, Position};

/// Why a move was judged the way it was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyReason {
    OutOfBounds,
    Blocked,
    /// Non-growing move onto a walkable cell
    TailFollows,
    /// Growing to the last open cell wins the game
    FillsBoard,
    EscapeRoute,
    Sealed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyResult {
    pub is_safe: bool,
    pub reason: SafetyReason,
    /// Head position after the simulated move
    pub head: Position,
    pub eats_food: bool,
    /// Route from the new head to the tail, only searched for growing moves
    pub escape_path: Option<PathResult>,
    pub compute_time_us: u64,
}

impl SafetyResult {
    fn verdict(
        reason: SafetyReason,
        head: Position,
        eats_food: bool,
        escape_path: Option<PathResult>,
        started: Instant,
    ) -> Self {
        let is_safe = matches!(
            reason,
            SafetyReason::TailFollows | SafetyReason::FillsBoard | SafetyReason::EscapeRoute
        );
        SafetyResult {
            is_safe,
            reason,
            head,
            eats_food,
            escape_path,
            compute_time_us: started.elapsed().as_micros() as u64,
        }
    }
}

/// Judges whether moving `snake` one step in `direction` leaves an escape route.
///
/// The board is temporarily modified while a growing move is simulated and is
/// restored before this function returns, on every path.
pub fn check_move(
    board: &mut Board,
    snake: &Snake,
    direction: Direction,
    food: Position,
) -> SafetyResult {
    let started = Instant::now();
    let head = snake.head();
    let new_head = direction.apply(&head);

    if !board.is_in_bounds(new_head) {
        return SafetyResult::verdict(SafetyReason::OutOfBounds, new_head, false, None, started);
    }
    if !board.is_walkable(new_head) {
        return SafetyResult::verdict(SafetyReason::Blocked, new_head, false, None, started);
    }

    let eats_food = new_head == food;
    if !eats_food {
        return SafetyResult::verdict(SafetyReason::TailFollows, new_head, false, None, started);
    }

    if snake.len() + 1 >= board.open_cells() {
        return SafetyResult::verdict(SafetyReason::FillsBoard, new_head, true, None, started);
    }

    let escape = {
        let mut sim = board.simulate();
        sim.set_cell(head, CellKind::Body);
        bfs(&sim, new_head, snake.tail())
    };

    let reason = if escape.found() {
        SafetyReason::EscapeRoute
    } else {
        SafetyReason::Sealed
    };
    SafetyResult::verdict(reason, new_head, true, Some(escape), started)
}
