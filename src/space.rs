// Flood-fill reachability analysis
//
// Counts how many walkable cells are connected to a position, either on the
// board as it is or after simulating one move of the snake.

use log::warn;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Instant;

use crate::board::{filled, Board};
use crate::snake::Snake;
use crate::types::{CellKind, Direction, Position};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceAnalysis {
    /// Reachable walkable cells, the start cell included
    pub accessible_cells: usize,
    /// False when the start was off the board or not walkable
    pub is_valid: bool,
    pub compute_time_us: u64,
}

impl SpaceAnalysis {
    fn invalid(started: Instant) -> Self {
        SpaceAnalysis {
            accessible_cells: 0,
            is_valid: false,
            compute_time_us: started.elapsed().as_micros() as u64,
        }
    }
}

/// Flood fill from `start` over walkable cells
pub fn analyze(board: &Board, start: Position) -> SpaceAnalysis {
    let started = Instant::now();

    let Some(start_idx) = board.index(start) else {
        return SpaceAnalysis::invalid(started);
    };
    if !board.is_walkable(start) {
        return SpaceAnalysis::invalid(started);
    }

    let mut frontier: VecDeque<Position> = VecDeque::new();
    if let Err(e) = frontier.try_reserve(board.cell_count() + 1) {
        warn!("Flood fill frontier allocation failed: {}", e);
        return SpaceAnalysis::invalid(started);
    }

    let mut visited = match filled(board.cell_count(), false) {
        Ok(visited) => visited,
        Err(e) => {
            warn!("Flood fill scratch allocation failed: {}", e);
            return SpaceAnalysis::invalid(started);
        }
    };
    visited[start_idx] = true;
    frontier.push_back(start);
    let mut count = 1;

    while let Some(current) = frontier.pop_front() {
        for next in board.neighbors(current) {
            let Some(idx) = board.index(next) else {
                continue;
            };
            if visited[idx] || !board.is_walkable(next) {
                continue;
            }
            visited[idx] = true;
            frontier.push_back(next);
            count += 1;
        }
    }

    SpaceAnalysis {
        accessible_cells: count,
        is_valid: true,
        compute_time_us: started.elapsed().as_micros() as u64,
    }
}

/// Flood fill from the head position `direction` would lead to, measured on
/// the board as it would look after that move.
///
/// The vacated head cell becomes body. A move that does not eat also frees the
/// tail cell; an eating move leaves the tail where it is. The board is
/// restored before returning.
pub fn analyze_move(
    board: &mut Board,
    snake: &Snake,
    direction: Direction,
    food: Position,
) -> SpaceAnalysis {
    let started = Instant::now();
    let head = snake.head();
    let new_head = direction.apply(&head);

    if !board.is_in_bounds(new_head) {
        return SpaceAnalysis::invalid(started);
    }

    let eats_food = new_head == food;

    let mut analysis = {
        let mut sim = board.simulate();
        sim.set_cell(head, CellKind::Body);
        if !eats_food {
            sim.set_cell(snake.tail(), CellKind::Empty);
        }
        analyze(&sim, new_head)
    };

    analysis.compute_time_us = started.elapsed().as_micros() as u64;
    analysis
}
