// Library exports for the snake decision engine
// The server, replay and simulation binaries all build on these modules

pub mod board;
pub mod config;
pub mod debug_logger;
pub mod engine;
pub mod error;
pub mod game;
pub mod pathfinding;
pub mod replay;
pub mod safety;
pub mod snake;
pub mod space;
pub mod types;
