// End-to-end engine scenarios built from wire-format snapshots
//
// Each test describes a small board, asks the engine for a decision and checks
// both the chosen direction and the strategy that produced it.

use ouroboros_snake::config::Config;
use ouroboros_snake::engine::{CandidateOutcome, Decision, DecisionEngine, Strategy};
use ouroboros_snake::safety::SafetyReason;
use ouroboros_snake::types::{Direction, Position, SnakeState, SnapshotRequest};

fn engine() -> DecisionEngine {
    DecisionEngine::new(Config::default_hardcoded())
}

fn request(
    width: i32,
    height: i32,
    body: &[(i32, i32)],
    direction: Direction,
    food: (i32, i32),
    walls: &[(i32, i32)],
) -> SnapshotRequest {
    SnapshotRequest {
        width,
        height,
        food: Some(Position::new(food.0, food.1)),
        walls: walls.iter().map(|&(x, y)| Position::new(x, y)).collect(),
        snake: Some(SnakeState {
            body: body.iter().map(|&(x, y)| Position::new(x, y)).collect(),
            direction,
            score: 0,
        }),
    }
}

fn outcome_of(decision: &Decision, direction: Direction) -> CandidateOutcome {
    decision
        .candidates
        .iter()
        .find(|c| c.direction == direction)
        .map(|c| c.outcome)
        .expect("every direction is reported")
}

/// Open 6x6 board, length-3 snake centred and heading right, food two cells ahead
#[test]
fn test_open_board_heads_straight_for_food() {
    let snapshot = request(6, 6, &[(3, 3), (2, 3), (1, 3)], Direction::Right, (5, 3), &[]);
    let decision = engine().decide_request(&snapshot);

    assert_eq!(decision.direction, Some(Direction::Right));
    assert_eq!(decision.strategy, Strategy::Primary);
    assert!(!decision.used_fallback());
    assert_eq!(decision.reference_direction, Some(Direction::Right));

    let path = decision.reference_path.as_ref().expect("reference path searched");
    assert_eq!(path.len(), 3);

    // Every non-reversing move on an open board is eligible
    assert_eq!(outcome_of(&decision, Direction::Left), CandidateOutcome::Reversal);
    for dir in [Direction::Up, Direction::Down, Direction::Right] {
        assert_eq!(outcome_of(&decision, dir), CandidateOutcome::Eligible);
    }
    assert_eq!(decision.space.as_ref().map(|s| s.accessible_cells), Some(34));
}

/// Food sits in a two-cell pocket beside the head. Eating it would seal the
/// snake in, so the engine turns away even though food is one step off.
#[test]
fn test_food_in_sealed_pocket_is_refused() {
    let snapshot = request(
        7,
        7,
        &[(2, 3), (2, 2), (2, 1), (2, 0)],
        Direction::Down,
        (1, 3),
        &[(0, 2), (1, 2), (0, 4), (1, 4)],
    );
    let decision = engine().decide_request(&snapshot);

    assert_eq!(decision.reference_direction, Some(Direction::Left));
    assert_eq!(outcome_of(&decision, Direction::Left), CandidateOutcome::Unsafe);

    let left = decision
        .candidates
        .iter()
        .find(|c| c.direction == Direction::Left)
        .and_then(|c| c.safety.as_ref())
        .expect("left was safety-checked");
    assert!(left.eats_food);
    assert_eq!(left.reason, SafetyReason::Sealed);

    // Down and right leave the same space and the same food distance; down
    // comes first in enumeration order
    assert_eq!(decision.direction, Some(Direction::Down));
    assert_eq!(decision.strategy, Strategy::Primary);
    assert_eq!(decision.space.as_ref().map(|s| s.accessible_cells), Some(40));
}

/// One-row corridor ending in a wall: the only move left is too cramped for the
/// snake, so the engine falls back to it rather than reverse.
#[test]
fn test_cramped_corridor_uses_fallback() {
    let snapshot = request(6, 1, &[(2, 0), (1, 0), (0, 0)], Direction::Right, (4, 0), &[(5, 0)]);
    let decision = engine().decide_request(&snapshot);

    assert_eq!(outcome_of(&decision, Direction::Right), CandidateOutcome::Cramped);
    assert_eq!(outcome_of(&decision, Direction::Up), CandidateOutcome::Blocked);
    assert_eq!(outcome_of(&decision, Direction::Down), CandidateOutcome::Blocked);

    assert_eq!(decision.direction, Some(Direction::Right));
    assert_eq!(decision.strategy, Strategy::Fallback);
    assert!(decision.used_fallback());
    assert_eq!(decision.space.as_ref().map(|s| s.accessible_cells), Some(2));
}

/// Nothing walkable around the head: the current heading is kept
#[test]
fn test_boxed_in_snake_keeps_heading() {
    let snapshot = request(3, 2, &[(1, 0), (0, 0), (0, 1)], Direction::Right, (2, 1), &[(2, 0), (1, 1)]);
    let decision = engine().decide_request(&snapshot);

    assert_eq!(decision.direction, Some(Direction::Right));
    assert_eq!(decision.strategy, Strategy::ContinueStraight);
    assert!(decision.used_fallback());
    assert!(decision.space.is_none());
}

/// Two calls on the same snapshot agree on everything but the timings
#[test]
fn test_repeated_decisions_are_identical() {
    let snapshot = request(
        9,
        9,
        &[(4, 4), (4, 5), (4, 6), (3, 6), (2, 6)],
        Direction::Up,
        (1, 1),
        &[(6, 2), (6, 3), (6, 4)],
    );
    let first = engine().decide_request(&snapshot);
    let second = engine().decide_request(&snapshot);

    assert_eq!(first.direction, second.direction);
    assert_eq!(first.strategy, second.strategy);
    assert_eq!(first.reference_direction, second.reference_direction);
    assert_eq!(
        first.reference_path.as_ref().map(|p| p.positions().to_vec()),
        second.reference_path.as_ref().map(|p| p.positions().to_vec())
    );

    let summary = |d: &Decision| {
        d.candidates
            .iter()
            .map(|c| {
                (
                    c.direction,
                    c.outcome,
                    c.food_distance,
                    c.safety.as_ref().map(|s| s.reason),
                    c.space.as_ref().map(|s| s.accessible_cells),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(summary(&first), summary(&second));
}

/// Missing pieces of a snapshot produce an undecided result, not a panic
#[test]
fn test_incomplete_snapshots_are_undecided() {
    let mut no_snake = request(6, 6, &[(3, 3), (2, 3)], Direction::Right, (5, 3), &[]);
    no_snake.snake = None;
    assert!(engine().decide_request(&no_snake).is_undecided());

    let mut no_food = request(6, 6, &[(3, 3), (2, 3)], Direction::Right, (5, 3), &[]);
    no_food.food = None;
    assert!(engine().decide_request(&no_food).is_undecided());

    let broken_body = request(6, 6, &[(3, 3), (1, 3)], Direction::Right, (5, 3), &[]);
    let decision = engine().decide_request(&broken_body);
    assert_eq!(decision.strategy, Strategy::Undecided);
    assert_eq!(decision.direction_or(Direction::Right), Direction::Right);
}

/// Dimensions whose cell count does not fit the grid index come back undecided
#[test]
fn test_oversized_board_is_undecided() {
    let snapshot = request(65_536, 65_536, &[(3, 3), (2, 3)], Direction::Right, (5, 3), &[]);
    let decision = engine().decide_request(&snapshot);

    assert_eq!(decision.strategy, Strategy::Undecided);
    assert!(decision.is_undecided());
}

/// Body coordinates at the ends of the integer range are rejected, not computed on
#[test]
fn test_extreme_body_coordinates_are_undecided() {
    let snapshot = SnapshotRequest {
        width: 6,
        height: 6,
        food: Some(Position::new(5, 3)),
        walls: vec![],
        snake: Some(SnakeState {
            body: vec![Position::new(i32::MAX, 0), Position::new(i32::MIN, 0)],
            direction: Direction::Right,
            score: 0,
        }),
    };
    let decision = engine().decide_request(&snapshot);

    assert_eq!(decision.strategy, Strategy::Undecided);
    assert!(decision.candidates.is_empty());
}

/// Two cramped dead ends of different size: the fallback takes the larger one
#[test]
fn test_fallback_prefers_larger_dead_end() {
    // Row 1 holds the body and a wall stub; row 0 splits into three cells to
    // the left and four (tail cell included) to the right
    let snapshot = request(
        7,
        2,
        &[(3, 0), (3, 1), (4, 1), (5, 1), (6, 1)],
        Direction::Up,
        (0, 0),
        &[(0, 1), (1, 1), (2, 1)],
    );
    let decision = engine().decide_request(&snapshot);

    assert_eq!(outcome_of(&decision, Direction::Left), CandidateOutcome::Cramped);
    assert_eq!(outcome_of(&decision, Direction::Right), CandidateOutcome::Cramped);

    assert_eq!(decision.strategy, Strategy::Fallback);
    assert_eq!(decision.direction, Some(Direction::Right));
    assert_eq!(decision.space.as_ref().map(|s| s.accessible_cells), Some(4));
}

/// Equal fallback space goes to the current heading even when it comes later
/// in enumeration order
#[test]
fn test_fallback_tie_keeps_current_heading() {
    let snapshot = request(
        5,
        3,
        &[(2, 1), (1, 1), (0, 1)],
        Direction::Right,
        (0, 0),
        &[(1, 0), (3, 0), (4, 1), (3, 2), (2, 2)],
    );
    let decision = engine().decide_request(&snapshot);

    assert_eq!(outcome_of(&decision, Direction::Up), CandidateOutcome::Cramped);
    assert_eq!(outcome_of(&decision, Direction::Right), CandidateOutcome::Cramped);
    assert_eq!(outcome_of(&decision, Direction::Down), CandidateOutcome::Blocked);

    assert_eq!(decision.strategy, Strategy::Fallback);
    assert_eq!(decision.direction, Some(Direction::Right));
    assert_eq!(decision.space.as_ref().map(|s| s.accessible_cells), Some(1));
}

/// With the current heading walled off, equal fallback space goes to the
/// first direction in enumeration order
#[test]
fn test_fallback_tie_without_heading_uses_enumeration_order() {
    let snapshot = request(
        5,
        3,
        &[(2, 1), (1, 1), (0, 1)],
        Direction::Right,
        (0, 0),
        &[(1, 0), (3, 0), (3, 1), (1, 2), (3, 2)],
    );
    let decision = engine().decide_request(&snapshot);

    assert_eq!(outcome_of(&decision, Direction::Up), CandidateOutcome::Cramped);
    assert_eq!(outcome_of(&decision, Direction::Down), CandidateOutcome::Cramped);
    assert_eq!(outcome_of(&decision, Direction::Right), CandidateOutcome::Blocked);

    assert_eq!(decision.strategy, Strategy::Fallback);
    assert_eq!(decision.direction, Some(Direction::Up));
}
