use futures_util::{SinkExt, StreamExt, future};
use log::{debug, info, warn};
use rover_telemetry_lib::{CloseReason, Context};
use tokio::sync::oneshot;
use warp::ws::{Message as WsMsg, WebSocket};

/// Drive one telemetry stream over an upgraded socket until the client leaves.
pub async fn handle_ws(ws: WebSocket, device_id: String, ctx: Context) {
    if ctx.registry.find(&device_id).is_none() {
        debug!("Streaming telemetry for unregistered device '{}'", device_id);
    }

    let (ws_tx, mut ws_rx) = ws.split();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    // Inbound from client: nothing is expected, just watch for close
    let reader = tokio::spawn(async move {
        while let Some(result) = ws_rx.next().await {
            match result {
                Ok(msg) if msg.is_close() => break,
                Ok(_) => {} // ignored
                Err(e) => {
                    debug!("WebSocket read error: {}", e);
                    break;
                }
            }
        }
        let _ = stop_tx.send(());
    });

    // Outgoing samples → client (TEXT frames)
    let sink = ws_tx.with(|text: String| future::ready(Ok::<_, warp::Error>(WsMsg::text(text))));

    let mut session = ctx.open_session(&device_id);
    info!(
        "Telemetry session opened for '{}' (battery={}, temp={:.1})",
        device_id,
        session.state().battery,
        session.state().temperature
    );

    let summary = session.run(sink, stop_rx).await;
    reader.abort();

    match summary.reason {
        CloseReason::PeerDisconnected => info!(
            "WebSocket client disconnected from '{}' after {} samples",
            summary.device_id, summary.sent
        ),
        CloseReason::Failed(e) => warn!(
            "Telemetry session for '{}' ended after {} samples: {}",
            summary.device_id, summary.sent, e
        ),
        CloseReason::AlreadyClosed => {
            debug!("Telemetry session for '{}' was already closed", summary.device_id)
        }
    }
}
