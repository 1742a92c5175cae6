// Breadth-first shortest path search over walkable cells
//
// Search scratch (visited flags, parent links) is allocated per query, so every
// invocation starts from a clean slate and the board itself is only read.

use log::warn;
use serde::Serialize;
use std::collections::{TryReserveError, VecDeque};
use std::time::Instant;

use crate::board::{filled, Board};
use crate::types::{Direction, Position};

/// Outcome of a single path query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// Start to goal inclusive, or `None` when the goal is unreachable
    pub path: Option<Vec<Position>>,
    pub compute_time_us: u64,
}

impl PathResult {
    fn not_found(started: Instant) -> Self {
        PathResult {
            path: None,
            compute_time_us: started.elapsed().as_micros() as u64,
        }
    }

    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    /// Number of positions on the path (edges + 1), zero when not found
    pub fn len(&self) -> usize {
        self.path.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn positions(&self) -> &[Position] {
        self.path.as_deref().unwrap_or(&[])
    }

    /// Direction of the first step along the path, if it has one
    pub fn first_step(&self) -> Option<Direction> {
        match self.positions() {
            [start, next, ..] => Direction::between(start, next),
            _ => None,
        }
    }
}

/// Per-query working memory, indexed like the board's cells
struct SearchScratch {
    visited: Vec<bool>,
    parent: Vec<Option<Position>>,
}

impl SearchScratch {
    fn for_board(board: &Board) -> Result<Self, TryReserveError> {
        Ok(SearchScratch {
            visited: filled(board.cell_count(), false)?,
            parent: filled(board.cell_count(), None)?,
        })
    }
}

/// Shortest path from `start` to `goal` stepping only onto walkable cells.
///
/// The start cell itself need not be walkable (it is usually the head).
/// Neighbours are explored up, down, left, right, so identical boards always
/// yield identical paths.
pub fn bfs(board: &Board, start: Position, goal: Position) -> PathResult {
    let started = Instant::now();

    let (Some(start_idx), Some(_)) = (board.index(start), board.index(goal)) else {
        return PathResult::not_found(started);
    };

    let mut scratch = match SearchScratch::for_board(board) {
        Ok(scratch) => scratch,
        Err(e) => {
            warn!("BFS scratch allocation failed: {}", e);
            return PathResult::not_found(started);
        }
    };

    // Every cell is enqueued at most once, so cells + 1 always suffices
    let mut frontier: VecDeque<Position> = VecDeque::new();
    if let Err(e) = frontier.try_reserve(board.cell_count() + 1) {
        warn!("BFS frontier allocation failed: {}", e);
        return PathResult::not_found(started);
    }

    scratch.visited[start_idx] = true;
    frontier.push_back(start);

    let mut reached = false;
    while let Some(current) = frontier.pop_front() {
        if current == goal {
            reached = true;
            break;
        }

        for next in board.neighbors(current) {
            let Some(idx) = board.index(next) else {
                continue;
            };
            if scratch.visited[idx] || !board.is_walkable(next) {
                continue;
            }
            scratch.visited[idx] = true;
            scratch.parent[idx] = Some(current);
            frontier.push_back(next);
        }
    }

    if !reached {
        return PathResult::not_found(started);
    }

    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        match board.index(cursor).and_then(|idx| scratch.parent[idx]) {
            Some(prev) => {
                path.push(prev);
                cursor = prev;
            }
            None => return PathResult::not_found(started),
        }
    }
    path.reverse();

    PathResult {
        path: Some(path),
        compute_time_us: started.elapsed().as_micros() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellKind;

    #[test]
    fn test_open_board_path_matches_manhattan_distance() {
        let board = Board::new(5, 5).unwrap();
        let start = Position::new(0, 0);
        let goal = Position::new(4, 4);

        let result = bfs(&board, start, goal);

        assert!(result.found());
        assert_eq!(result.len(), 9);
        assert_eq!(result.positions()[0], start);
        assert_eq!(result.positions()[8], goal);
        for pair in result.positions().windows(2) {
            assert!(pair[0].is_adjacent(&pair[1]));
        }
    }

    #[test]
    fn test_exploration_order_prefers_vertical_moves() {
        let board = Board::new(5, 5).unwrap();
        let result = bfs(&board, Position::new(0, 0), Position::new(2, 2));
        // Down is explored before Right, so the path descends first
        assert_eq!(result.first_step(), Some(Direction::Down));
        assert_eq!(
            result.positions(),
            &[
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(0, 2),
                Position::new(1, 2),
                Position::new(2, 2)
            ]
        );
    }

    #[test]
    fn test_start_equals_goal() {
        let board = Board::new(3, 3).unwrap();
        let result = bfs(&board, Position::new(1, 1), Position::new(1, 1));
        assert_eq!(result.positions(), &[Position::new(1, 1)]);
        assert_eq!(result.first_step(), None);
    }

    #[test]
    fn test_detours_around_walls() {
        let mut board = Board::new(5, 5).unwrap();
        for y in 0..4 {
            board.set_cell(Position::new(2, y), CellKind::Wall);
        }

        let result = bfs(&board, Position::new(0, 0), Position::new(4, 0));
        assert!(result.found());
        // Down to row 4, across, back up
        assert_eq!(result.len(), 4 + 4 + 4 + 1);
    }

    #[test]
    fn test_unreachable_goal_is_not_found() {
        let mut board = Board::new(5, 5).unwrap();
        for y in 0..5 {
            board.set_cell(Position::new(2, y), CellKind::Wall);
        }

        let result = bfs(&board, Position::new(0, 0), Position::new(4, 4));
        assert!(!result.found());
        assert!(result.is_empty());
        assert_eq!(result.first_step(), None);
    }

    #[test]
    fn test_out_of_bounds_endpoints_are_not_found() {
        let board = Board::new(3, 3).unwrap();
        assert!(!bfs(&board, Position::new(-1, 0), Position::new(1, 1)).found());
        assert!(!bfs(&board, Position::new(0, 0), Position::new(3, 3)).found());
    }

    #[test]
    fn test_goal_on_body_is_not_found() {
        let mut board = Board::new(4, 4).unwrap();
        board.set_cell(Position::new(3, 3), CellKind::Body);
        assert!(!bfs(&board, Position::new(0, 0), Position::new(3, 3)).found());
    }

    #[test]
    fn test_search_is_deterministic() {
        let mut board = Board::new(6, 6).unwrap();
        board.set_cell(Position::new(2, 2), CellKind::Wall);
        board.set_cell(Position::new(3, 3), CellKind::Body);

        let first = bfs(&board, Position::new(0, 5), Position::new(5, 0));
        let second = bfs(&board, Position::new(0, 5), Position::new(5, 0));
        assert_eq!(first.path, second.path);
    }
}
