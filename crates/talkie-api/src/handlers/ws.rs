//! WebSocket upgrade handler.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::Response;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use talkie_core::types::UserId;
use talkie_realtime::{ConnectionHandle, OutboundMessage, run_heartbeat};

use crate::dto::request::WsQuery;
use crate::error::ApiError;
use crate::extractors::extract_token;
use crate::state::AppState;

/// How long the writer may spend flushing the close frame after disconnect.
const WRITER_DRAIN: Duration = Duration::from_secs(1);

/// GET /ws?userId={id}&token={jwt}: WebSocket upgrade
///
/// The identity is checked before the upgrade, so a refused client gets a
/// plain HTTP 401 and never reaches the presence registry.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let token = query
        .token
        .filter(|t| !t.trim().is_empty())
        .or_else(|| extract_token(&headers, &state.config.auth.cookie_name));

    let user_id = state
        .gateway
        .authenticate(query.user_id.as_deref(), token.as_deref())
        .inspect_err(|err| {
            warn!(
                claimed = query.user_id.as_deref().unwrap_or("-"),
                kind = %err.kind,
                "WebSocket connection refused"
            );
        })?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, user_id, socket)))
}

/// Drives an established connection until either side closes it.
///
/// The connection ends when the peer closes or errors, when the writer
/// fails, or when the heartbeat gives up on the peer. Each of these closes
/// the handle, and the handle closing is what releases the connection.
async fn handle_socket(state: AppState, user_id: Option<UserId>, socket: WebSocket) {
    let (ws_tx, ws_rx) = socket.split();

    let (handle, outbound_rx) = state.gateway.connect(user_id).await;
    let conn_id = handle.id;

    let mut writer = tokio::spawn(write_loop(ws_tx, outbound_rx, handle.clone()));
    let heartbeat = state
        .gateway
        .heartbeat()
        .map(|config| tokio::spawn(run_heartbeat(handle.clone(), config)));

    tokio::select! {
        _ = read_loop(ws_rx, &handle) => {}
        _ = handle.closed() => {
            debug!(conn_id = %conn_id, "Connection closed by the server side");
        }
    }

    state.gateway.disconnect(&handle).await;

    if let Some(heartbeat) = heartbeat {
        heartbeat.abort();
    }
    if tokio::time::timeout(WRITER_DRAIN, &mut writer).await.is_err() {
        writer.abort();
    }

    info!(conn_id = %conn_id, "WebSocket session ended");
}

/// Consumes inbound frames until the peer closes or the transport fails.
async fn read_loop(mut ws_rx: SplitStream<WebSocket>, handle: &ConnectionHandle) {
    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => handle.record_pong(),
            Ok(Message::Text(text)) => {
                debug!(conn_id = %handle.id, len = text.len(), "Ignoring inbound text frame");
            }
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %handle.id, error = %e, "WebSocket error");
                break;
            }
        }
    }
}

/// Forwards queued messages to the socket; pings go out as control frames.
async fn write_loop(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut outbound_rx: mpsc::Receiver<OutboundMessage>,
    handle: Arc<ConnectionHandle>,
) {
    loop {
        tokio::select! {
            msg = outbound_rx.recv() => {
                let Some(msg) = msg else { break };
                let frame = match msg {
                    OutboundMessage::Ping => Message::Ping(Bytes::new()),
                    msg => match msg.to_json() {
                        Ok(text) => Message::Text(text.into()),
                        Err(e) => {
                            warn!(conn_id = %handle.id, error = %e, "Failed to serialize outbound message");
                            continue;
                        }
                    },
                };
                if let Err(e) = ws_tx.send(frame).await {
                    debug!(conn_id = %handle.id, error = %e, "WebSocket write failed");
                    break;
                }
            }
            _ = handle.closed() => {
                let _ = ws_tx.send(Message::Close(None)).await;
                break;
            }
        }
    }

    handle.mark_closed();
}
