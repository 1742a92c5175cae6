#[macro_use]
extern crate rocket;

use log::info;
use rocket::fairing::AdHoc;
use std::env;

use ouroboros_snake::config::Config;
use ouroboros_snake::debug_logger::DebugLogger;
use ouroboros_snake::engine::DecisionEngine;

mod handler;

#[launch]
async fn rocket() -> _ {
    // Hosting platforms usually hand out the port in `PORT`; Rocket reads `ROCKET_PORT`
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // Default to 'info' unless RUST_LOG says otherwise
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting snake decision server...");

    let config = Config::load_or_default();
    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let service = handler::Service::new(DecisionEngine::new(config), logger);

    rocket::build()
        .manage(service)
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "ouroboros-snake");
            })
        }))
        .mount("/", routes![handler::index, handler::decide])
}
