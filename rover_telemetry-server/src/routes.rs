use std::convert::Infallible;

use rover_telemetry_lib::Context;
use warp::{Filter, Rejection, Reply};

use crate::telemetry_ws::handle_ws;

/// Cloneable filter handing the shared context to each request
fn with_ctx(ctx: Context) -> impl Filter<Extract = (Context,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

/// `GET /health`, `GET /devices` and the `/ws/telemetry/{deviceId}` upgrade,
/// behind a CORS policy admitting `allowed_origin` only.
pub fn routes(
    ctx: Context,
    allowed_origin: String,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let health = warp::get().and(warp::path!("health")).map(|| "OK");

    let devices = warp::get()
        .and(warp::path!("devices"))
        .and(with_ctx(ctx.clone()))
        .map(|ctx: Context| warp::reply::json(&ctx.registry.list()));

    let telemetry = warp::path!("ws" / "telemetry" / String)
        .and(warp::ws())
        .and(with_ctx(ctx))
        .map(|device_id: String, ws: warp::ws::Ws, ctx: Context| {
            ws.on_upgrade(move |socket| handle_ws(socket, device_id, ctx))
        });

    let cors = warp::cors()
        .allow_origin(allowed_origin.as_str())
        .allow_credentials(true)
        .allow_methods(vec!["GET", "OPTIONS"])
        .allow_headers(vec![
            "accept",
            "accept-language",
            "authorization",
            "cache-control",
            "content-language",
            "content-type",
            "if-none-match",
            "last-event-id",
            "origin",
            "pragma",
            "sec-websocket-extensions",
            "sec-websocket-key",
            "sec-websocket-protocol",
            "sec-websocket-version",
            "upgrade",
            "x-requested-with",
        ]);

    health.or(devices).or(telemetry).with(cors)
}
