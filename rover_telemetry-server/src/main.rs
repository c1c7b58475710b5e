// src/main.rs

mod config;
mod routes;
mod telemetry_ws;

use std::error::Error;

use dotenv::dotenv;
use log::{error, info};
use rover_telemetry_lib::{Context, DeviceRegistry};

use crate::config::Config;

/* RUST_LOG=rover_telemetry_lib=trace,rover_telemetry_server=info \
cargo run -p rover_telemetry-server */

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // ──────── ① Load .env if present ────────
    let dotenv_result = dotenv();

    // initialize logger and panic hook
    env_logger::init();
    std::panic::set_hook(Box::new(|info| {
        error!("Thread panic: {:?}", info);
    }));

    if let Err(e) = dotenv_result {
        info!("No .env loaded ({}), using process environment", e);
    }

    // ──────── ② Configuration ────────
    let config = Config::from_env()?;

    // registry and session parameters shared by every connection
    let ctx = Context::new(DeviceRegistry::with_defaults(), config.tick, config.seeds);
    let routes = routes::routes(ctx, config.allowed_origin.clone());

    let (addr, server) = warp::serve(routes).try_bind_with_graceful_shutdown(config.bind, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    })?;

    info!("HTTP  : {} (GET /devices, GET /health)", addr);
    info!("WS    : {}/ws/telemetry/{{deviceId}} every {:?}", addr, config.tick);
    info!("CORS  : {}", config.allowed_origin);

    server.await;
    info!("Shutting down");
    Ok(())
}
