//! WebSocket endpoints for real-time delivery.
//!
//! Each connection drains its own queue independently, so a slow or dead
//! socket never stalls the game or other clients. Push is a latency
//! optimization: on reconnect a client re-runs the pull snapshot before
//! trusting pushed state again, because events sent while it was away are
//! not replayed.

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

/// Close code for a player connecting with a token the registry does not know.
const CLOSE_UNKNOWN_TOKEN: u16 = 4001;

pub async fn host_ws(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_host(socket, state))
}

async fn handle_host(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before snapshotting so nothing between the two is missed
    let mut events = state.broadcaster.subscribe_host();
    let init = state.host_init().await;
    if let Ok(json) = serde_json::to_string(&init) {
        if sender.send(Message::Text(json.into())).await.is_err() {
            return;
        }
    }
    tracing::info!("host connected");

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Ok(json) = serde_json::to_string(&event) {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        // Fell behind the channel; the host UI reconciles
                        // through the pull API
                        tracing::warn!(missed, "host channel lagged, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("host socket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("host disconnected");
}

pub async fn user_ws(
    ws: WebSocketUpgrade,
    Path(token): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_user(socket, token, state))
}

async fn handle_user(mut socket: WebSocket, token: String, state: Arc<AppState>) {
    // Attach before snapshotting so nothing between the two is missed
    let (handle, mut events) = state.broadcaster.attach_player(&token).await;

    let init = match state.player_init(&token).await {
        Ok(init) => init,
        Err(_) => {
            state.broadcaster.detach_player(&token, &handle).await;
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: CLOSE_UNKNOWN_TOKEN,
                    reason: "unknown token".into(),
                })))
                .await;
            return;
        }
    };

    let (mut sender, mut receiver) = socket.split();
    if let Ok(json) = serde_json::to_string(&init) {
        if sender.send(Message::Text(json.into())).await.is_err() {
            state.broadcaster.detach_player(&token, &handle).await;
            return;
        }
    }
    tracing::info!(%token, "player connected");

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(event) => {
                        if let Ok(json) = serde_json::to_string(&event) {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    // Queue replaced by a reconnect under the same token
                    None => break,
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(%token, "player socket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    // Only this connection's subscription dies; game state is untouched
    state.broadcaster.detach_player(&token, &handle).await;
    tracing::info!(%token, "player disconnected");
}
