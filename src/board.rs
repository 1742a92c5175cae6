// Board model: a bounded grid of cell classifications plus the recorded food
//
// Everything outside the grid reads as a wall. Simulated moves mutate the board
// through a `Simulation` guard, which puts every touched cell back when it is
// dropped, whichever way the caller leaves its scope.

use std::collections::TryReserveError;
use std::ops::Deref;

use crate::error::EngineError;
use crate::snake::Snake;
use crate::types::{CellKind, Direction, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
    food: Option<Position>,
}

impl Board {
    /// Creates an empty board; it must have room for at least a two-segment snake.
    /// The cell count has to fit an `i32` so that row-major indices never overflow.
    pub fn new(width: i32, height: i32) -> Result<Self, EngineError> {
        if width <= 0 || height <= 0 {
            return Err(EngineError::BoardTooSmall { width, height });
        }
        let Some(count) = width.checked_mul(height) else {
            return Err(EngineError::BoardTooLarge { width, height });
        };
        if count < 2 {
            return Err(EngineError::BoardTooSmall { width, height });
        }

        let cells = filled(count as usize, CellKind::Empty)
            .map_err(|_| EngineError::BoardTooLarge { width, height })?;

        Ok(Board {
            width,
            height,
            cells,
            food: None,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells, walls included
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells a snake could ever occupy (everything but walls)
    pub fn open_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c != CellKind::Wall).count()
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Row-major index of an in-bounds position
    pub fn index(&self, pos: Position) -> Option<usize> {
        if self.is_in_bounds(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    /// Classification of a cell; out-of-bounds reads as a wall
    pub fn cell(&self, pos: Position) -> CellKind {
        self.index(pos)
            .map(|idx| self.cells[idx])
            .unwrap_or(CellKind::Wall)
    }

    /// Overwrites a cell; out-of-bounds writes are ignored
    pub fn set_cell(&mut self, pos: Position, kind: CellKind) {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = kind;
        }
    }

    /// A cell is walkable iff it is empty, holds food, or is the snake's tail.
    /// The tail counts because it vacates its cell on the same tick the head
    /// would arrive there.
    pub fn is_walkable(&self, pos: Position) -> bool {
        matches!(
            self.cell(pos),
            CellKind::Empty | CellKind::Food | CellKind::Tail
        )
    }

    /// In-bounds neighbours in fixed exploration order: up, down, left, right
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::all()
            .into_iter()
            .map(move |dir| dir.apply(&pos))
            .filter(move |next| self.is_in_bounds(*next))
    }

    /// Every in-bounds position, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position { x, y }))
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    /// Records a new food position, repainting the old and new cells
    pub fn set_food(&mut self, food: Option<Position>) {
        if let Some(old) = self.food {
            if self.cell(old) == CellKind::Food {
                self.set_cell(old, CellKind::Empty);
            }
        }

        self.food = food;

        if let Some(pos) = food {
            if self.cell(pos) == CellKind::Empty {
                self.set_cell(pos, CellKind::Food);
            }
        }
    }

    /// Positions of all interior walls
    pub fn walls(&self) -> Vec<Position> {
        self.positions()
            .filter(|pos| self.cell(*pos) == CellKind::Wall)
            .collect()
    }

    /// Repaints snake and food cells from scratch, keeping walls
    pub fn sync_with(&mut self, snake: &Snake) {
        for cell in self.cells.iter_mut() {
            if *cell != CellKind::Wall {
                *cell = CellKind::Empty;
            }
        }

        if let Some(food) = self.food {
            self.set_cell(food, CellKind::Food);
        }

        let last = snake.len() - 1;
        for (i, segment) in snake.segments().enumerate() {
            let kind = if i == 0 {
                CellKind::Head
            } else if i == last {
                CellKind::Tail
            } else {
                CellKind::Body
            };
            self.set_cell(*segment, kind);
        }
    }

    /// Starts a scoped simulation; every change made through the returned guard
    /// is reverted when it goes out of scope
    pub fn simulate(&mut self) -> Simulation<'_> {
        Simulation {
            board: self,
            saved: Vec::with_capacity(2),
        }
    }
}

/// `vec![value; len]` that reports allocation failure instead of aborting
pub(crate) fn filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, TryReserveError> {
    let mut cells = Vec::new();
    cells.try_reserve_exact(len)?;
    cells.resize(len, value);
    Ok(cells)
}

/// Scoped, self-reverting mutation of a board
pub struct Simulation<'a> {
    board: &'a mut Board,
    saved: Vec<(usize, CellKind)>,
}

impl Simulation<'_> {
    pub fn set_cell(&mut self, pos: Position, kind: CellKind) {
        if let Some(idx) = self.board.index(pos) {
            self.saved.push((idx, self.board.cells[idx]));
            self.board.cells[idx] = kind;
        }
    }
}

impl Deref for Simulation<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        // Reverse order so a cell written twice ends on its first saved value
        while let Some((idx, kind)) = self.saved.pop() {
            self.board.cells[idx] = kind;
        }
    }
}
