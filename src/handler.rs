// HTTP bindings for the decision service
//
// Handlers only translate between JSON and the engine. Every decision is also
// handed to the decision log, which writes on a background task.

use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

use ouroboros_snake::debug_logger::DebugLogger;
use ouroboros_snake::engine::{Decision, DecisionEngine};
use ouroboros_snake::types::SnapshotRequest;

/// State shared by all requests
pub struct Service {
    pub engine: DecisionEngine,
    pub logger: DebugLogger,
    pub requests: AtomicU64,
}

impl Service {
    pub fn new(engine: DecisionEngine, logger: DebugLogger) -> Self {
        Service {
            engine,
            logger,
            requests: AtomicU64::new(0),
        }
    }
}

/// GET /
/// Engine metadata and the configuration it runs with
#[get("/")]
pub fn index(service: &State<Service>) -> Json<Value> {
    let config = service.engine.config();
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "compute_budget_us": config.engine.compute_budget_us,
        "decisions_served": service.requests.load(Ordering::Relaxed),
        "decision_log": service.logger.is_enabled(),
    }))
}

/// POST /decide
/// One snapshot in, one decision out. Malformed snapshots come back undecided.
#[post("/decide", format = "json", data = "<request>")]
pub fn decide(service: &State<Service>, request: Json<SnapshotRequest>) -> Json<Decision> {
    let turn = service.requests.fetch_add(1, Ordering::Relaxed);
    let request = request.into_inner();

    let decision = service.engine.decide_request(&request);
    service.logger.log_decision(turn, request, &decision);

    Json(decision)
}
