//! WebSocket endpoint for realtime notifications
//!
//! ## Protocol
//!
//! Connect: `ws://host/ws`
//!
//! Messages (server -> client), JSON `{type, data}`:
//! - `quest_complete` - a quest was completed
//! - `achievement` - a talent segment was unlocked
//! - `notification` - synthetic progress event, one per heartbeat period
//!
//! The client does not send application messages on this channel;
//! transport pings are answered, everything else is ignored.

use futures_util::{SinkExt, StreamExt};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::interval;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use crate::realtime::{EventHub, PushEvent};
use crate::server::AppState;

/// WebSocket type after upgrade
type HyperWebSocket =
    hyper_tungstenite::WebSocketStream<hyper_util::rt::TokioIo<hyper::upgrade::Upgraded>>;

/// Handle WebSocket upgrade for the notification feed
pub async fn handle_events_ws(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    if !hyper_tungstenite::is_upgrade_request(&req) {
        return Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(
                r#"{"error": "WebSocket upgrade required"}"#,
            )))
            .unwrap();
    }

    let (response, websocket) = match hyper_tungstenite::upgrade(req, None) {
        Ok((resp, ws)) => (resp, ws),
        Err(e) => {
            error!("WebSocket upgrade failed: {}", e);
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::from("WebSocket upgrade failed")))
                .unwrap();
        }
    };

    let hub = Arc::clone(&state.hub);
    tokio::spawn(async move {
        match websocket.await {
            Ok(ws) => {
                if let Err(e) = handle_connection(ws, hub).await {
                    warn!("Notification WebSocket error: {}", e);
                }
            }
            Err(e) => {
                error!("WebSocket connection failed: {}", e);
            }
        }
    });

    let (parts, _body) = response.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}

/// Drive one viewer connection until it closes.
///
/// The heartbeat interval lives inside this task, so closing the
/// connection drops the timer with it; repeated connect/disconnect cycles
/// leave nothing behind.
async fn handle_connection(
    ws: HyperWebSocket,
    hub: Arc<EventHub>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (mut sender, mut receiver) = ws.split();

    info!("Notification client connected ({} open)", hub.connection_count() + 1);

    let mut rx = hub.subscribe();
    let mut heartbeat = interval(Duration::from_secs(hub.heartbeat_interval_secs()));
    // The first tick completes immediately; consume it so the first
    // synthetic event arrives one full period after connect.
    heartbeat.tick().await;

    loop {
        tokio::select! {
            // Synthetic progress event on the heartbeat period
            _ = heartbeat.tick() => {
                let json = serde_json::to_string(&PushEvent::synthetic_progress())?;
                if sender.send(WsMessage::Text(json)).await.is_err() {
                    break;
                }
            }

            // Broadcast event from the hub
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        let json = serde_json::to_string(&event)?;
                        if sender.send(WsMessage::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("Notification client lagged, skipped {} events", skipped);
                        continue;
                    }
                }
            }

            // Frame from the client
            msg = receiver.next() => {
                match msg {
                    Some(Ok(WsMessage::Close(_))) => {
                        info!("Notification client disconnected");
                        break;
                    }
                    Some(Ok(WsMessage::Ping(data))) => {
                        let _ = sender.send(WsMessage::Pong(data)).await;
                    }
                    Some(Ok(WsMessage::Text(text))) => {
                        // Clients do not speak on this channel
                        debug!("Ignoring client message: {}", text);
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                    _ => {}
                }
            }
        }
    }

    info!("Notification connection closed");
    Ok(())
}
