// Decision engine: turns one session snapshot into one direction
//
// Per tick the engine:
// 1. Finds a reference BFS path from head to food (diagnostic only)
// 2. Drops directions that leave the board, hit the body or reverse the snake
// 3. Drops directions the safety validator rejects
// 4. Drops directions whose projected free space is smaller than the snake
// 5. Picks the most space, then the shortest distance to food, then the
//    first direction in up/down/left/right order
// 6. If nothing survived, falls back to the roomiest walkable direction, and
//    failing that keeps the current heading
//
// The engine keeps no state between calls. It works on its own synchronised
// copy of the snapshot board, so the caller's board is never touched.

use log::{debug, info, warn};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::config::Config;
use crate::error::{EngineError, SnakeError};
use crate::pathfinding::{bfs, PathResult};
use crate::safety::{check_move, SafetyResult};
use crate::snake::Snake;
use crate::space::{analyze_move, SpaceAnalysis};
use crate::types::{CellKind, Direction, Position, Snapshot, SnapshotRequest};

/// Which part of the selection policy produced the direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// A direction that is safe and leaves at least body-length space
    Primary,
    /// No direction passed the filters; the roomiest walkable one was taken
    Fallback,
    /// Fallback found nothing walkable; the current heading is kept
    ContinueStraight,
    /// The snapshot was unusable; the caller must pick a default
    Undecided,
}

/// Where a candidate direction dropped out of the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOutcome {
    Reversal,
    Blocked,
    Unsafe,
    /// Projected space below the snake's length
    Cramped,
    Eligible,
}

/// Per-direction diagnostics gathered during a decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateReport {
    pub direction: Direction,
    pub head: Position,
    pub outcome: CandidateOutcome,
    pub food_distance: u64,
    pub safety: Option<SafetyResult>,
    pub space: Option<SpaceAnalysis>,
}

impl CandidateReport {
    fn accessible_cells(&self) -> usize {
        self.space.as_ref().map_or(0, |s| s.accessible_cells)
    }
}

/// Result of one engine call, handed back to the session and its renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    /// `None` only for `Strategy::Undecided`
    pub direction: Option<Direction>,
    pub strategy: Strategy,
    pub reference_path: Option<PathResult>,
    /// First step of the reference path, if any
    pub reference_direction: Option<Direction>,
    pub safety: Option<SafetyResult>,
    pub space: Option<SpaceAnalysis>,
    pub candidates: Vec<CandidateReport>,
    pub compute_time_us: u64,
    pub over_budget: bool,
}

impl Decision {
    fn undecided(started: Instant) -> Self {
        Decision {
            direction: None,
            strategy: Strategy::Undecided,
            reference_path: None,
            reference_direction: None,
            safety: None,
            space: None,
            candidates: Vec::new(),
            compute_time_us: started.elapsed().as_micros() as u64,
            over_budget: false,
        }
    }

    pub fn used_fallback(&self) -> bool {
        matches!(self.strategy, Strategy::Fallback | Strategy::ContinueStraight)
    }

    pub fn is_undecided(&self) -> bool {
        self.direction.is_none()
    }

    /// The decided direction, or `default` when undecided
    pub fn direction_or(&self, default: Direction) -> Direction {
        self.direction.unwrap_or(default)
    }
}

/// Stateless move selector; holds configuration only
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: Config,
}

impl DecisionEngine {
    /// Creates a new engine with the given configuration
    pub fn new(config: Config) -> Self {
        DecisionEngine { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Chooses a direction for the snapshot. Unusable snapshots yield an
    /// undecided decision rather than an error.
    pub fn decide(&self, snapshot: &Snapshot) -> Decision {
        let started = Instant::now();
        match self.try_decide(snapshot) {
            Ok(decision) => decision,
            Err(e) => {
                warn!("Cannot decide on snapshot: {}", e);
                Decision::undecided(started)
            }
        }
    }

    /// Chooses a direction for a snapshot in its wire form
    pub fn decide_request(&self, request: &SnapshotRequest) -> Decision {
        let started = Instant::now();
        match request.to_snapshot().and_then(|snapshot| self.try_decide(&snapshot)) {
            Ok(decision) => decision,
            Err(e) => {
                warn!("Cannot decide on request: {}", e);
                Decision::undecided(started)
            }
        }
    }

    /// Chooses a direction for the snapshot, reporting why an unusable
    /// snapshot was refused
    pub fn try_decide(&self, snapshot: &Snapshot) -> Result<Decision, EngineError> {
        let started = Instant::now();

        let snake = snapshot.snake.as_ref().ok_or(EngineError::MissingSnake)?;
        let food = Self::validate(&snapshot.board, snake)?;

        let mut board = snapshot.board.clone();
        board.sync_with(snake);

        let reference_path = bfs(&board, snake.head(), food);
        let reference_direction = reference_path.first_step();

        let candidates: Vec<CandidateReport> = Direction::all()
            .into_iter()
            .map(|dir| Self::evaluate(&mut board, snake, dir, food))
            .collect();

        for candidate in &candidates {
            debug!(
                "{}: {:?} (space: {}, food distance: {})",
                candidate.direction.as_str(),
                candidate.outcome,
                candidate.accessible_cells(),
                candidate.food_distance
            );
        }

        let (chosen, strategy) = match Self::select_primary(&candidates) {
            Some(idx) => (Some(idx), Strategy::Primary),
            None => {
                let fallback = Self::fallback(&mut board, snake, food);
                match fallback {
                    Some(dir) => (
                        candidates.iter().position(|c| c.direction == dir),
                        Strategy::Fallback,
                    ),
                    None => (None, Strategy::ContinueStraight),
                }
            }
        };

        let (direction, safety, space) = match chosen {
            Some(idx) => {
                let candidate = &candidates[idx];
                let space = match strategy {
                    // Fallback candidates were never space-checked if they failed safety
                    Strategy::Fallback if candidate.space.is_none() => {
                        Some(analyze_move(&mut board, snake, candidate.direction, food))
                    }
                    _ => candidate.space.clone(),
                };
                let safety = candidate.safety.clone();
                (candidate.direction, safety, space)
            }
            None => (snake.direction(), None, None),
        };

        let elapsed = started.elapsed();
        let compute_time_us = elapsed.as_micros() as u64;
        let over_budget = elapsed > Duration::from_micros(self.config.engine.compute_budget_us);

        info!(
            "Chose {} ({:?}, space: {}, path to food: {}, time: {}us)",
            direction.as_str(),
            strategy,
            space.as_ref().map_or(0, |s| s.accessible_cells),
            reference_path.len(),
            compute_time_us
        );
        if over_budget {
            warn!(
                "Decision took {}us, over the {}us budget",
                compute_time_us, self.config.engine.compute_budget_us
            );
        }

        Ok(Decision {
            direction: Some(direction),
            strategy,
            reference_path: Some(reference_path),
            reference_direction,
            safety,
            space,
            candidates,
            compute_time_us,
            over_budget,
        })
    }

    /// Checks the snapshot invariants and returns the food position
    fn validate(board: &Board, snake: &Snake) -> Result<Position, EngineError> {
        let food = board.food().ok_or(EngineError::MissingFood)?;

        for segment in snake.segments() {
            if !board.is_in_bounds(*segment) || board.cell(*segment) == CellKind::Wall {
                return Err(EngineError::InvalidSnake(SnakeError::OutOfBounds(*segment)));
            }
        }
        if !board.is_in_bounds(food) || board.cell(food) == CellKind::Wall {
            return Err(EngineError::FoodOutOfBounds(food));
        }
        if snake.contains(food) {
            return Err(EngineError::FoodOnSnake(food));
        }

        Ok(food)
    }

    /// Runs the primary filters (steps 2-4) for one direction
    fn evaluate(board: &mut Board, snake: &Snake, direction: Direction, food: Position) -> CandidateReport {
        let head = direction.apply(&snake.head());
        let mut report = CandidateReport {
            direction,
            head,
            outcome: CandidateOutcome::Blocked,
            food_distance: head.manhattan(&food),
            safety: None,
            space: None,
        };

        if direction == snake.direction().opposite() {
            report.outcome = CandidateOutcome::Reversal;
            return report;
        }
        if !board.is_walkable(head) {
            return report;
        }

        let safety = check_move(board, snake, direction, food);
        let is_safe = safety.is_safe;
        report.safety = Some(safety);
        if !is_safe {
            report.outcome = CandidateOutcome::Unsafe;
            return report;
        }

        let space = analyze_move(board, snake, direction, food);
        report.outcome = if space.accessible_cells < snake.len() {
            CandidateOutcome::Cramped
        } else {
            CandidateOutcome::Eligible
        };
        report.space = Some(space);
        report
    }

    /// Most space, then nearest food, then enumeration order
    fn select_primary(candidates: &[CandidateReport]) -> Option<usize> {
        let mut best: Option<usize> = None;

        for (idx, candidate) in candidates.iter().enumerate() {
            if candidate.outcome != CandidateOutcome::Eligible {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => {
                    let current = &candidates[b];
                    candidate.accessible_cells() > current.accessible_cells()
                        || (candidate.accessible_cells() == current.accessible_cells()
                            && candidate.food_distance < current.food_distance)
                }
            };
            if better {
                best = Some(idx);
            }
        }

        best
    }

    /// Desperation pick: any walkable, non-reversing direction with the most
    /// projected space. Ties go to the current heading, then enumeration order.
    fn fallback(board: &mut Board, snake: &Snake, food: Position) -> Option<Direction> {
        let mut best: Option<(Direction, usize)> = None;

        for direction in Direction::all() {
            if direction == snake.direction().opposite() {
                continue;
            }
            if !board.is_walkable(direction.apply(&snake.head())) {
                continue;
            }

            let cells = analyze_move(board, snake, direction, food).accessible_cells;
            let better = match best {
                None => true,
                Some((best_dir, best_cells)) => {
                    cells > best_cells
                        || (cells == best_cells
                            && direction == snake.direction()
                            && best_dir != snake.direction())
                }
            };
            if better {
                best = Some((direction, cells));
            }
        }

        if let Some((direction, cells)) = best {
            info!(
                "No safe roomy move; falling back to {} (space: {})",
                direction.as_str(),
                cells
            );
        }
        best.map(|(direction, _)| direction)
    }
}
