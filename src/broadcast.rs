//! Fan-out of game events to connected clients.
//!
//! Two audiences: the single host channel (a tokio broadcast channel shared
//! by every host connection) and per-player channels keyed by token (bounded
//! mpsc queues). Delivery is best-effort on both: a lagging host receiver
//! skips ahead, a full player queue drops the event, and the client recovers
//! through its reconciliation pull. No send ever blocks game-state mutation.

use crate::protocol::{HostEvent, PlayerEvent};
use crate::types::PlayerToken;
use std::collections::HashMap;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc, RwLock};

const HOST_CHANNEL_CAPACITY: usize = 100;
const PLAYER_QUEUE_CAPACITY: usize = 32;

pub struct Broadcaster {
    host_tx: broadcast::Sender<HostEvent>,
    players: RwLock<HashMap<PlayerToken, mpsc::Sender<PlayerEvent>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        let (host_tx, _rx) = broadcast::channel(HOST_CHANNEL_CAPACITY);
        Self {
            host_tx,
            players: RwLock::new(HashMap::new()),
        }
    }

    /// New host connection subscribes to the event stream.
    pub fn subscribe_host(&self) -> broadcast::Receiver<HostEvent> {
        self.host_tx.subscribe()
    }

    /// Push an event to all host connections. No receivers connected is fine.
    pub fn host(&self, event: HostEvent) {
        let _ = self.host_tx.send(event);
    }

    /// Register a player connection, replacing any previous channel for the
    /// same token. Returns the sender handle (for identity-checked detach)
    /// and the receiver the connection task drains.
    pub async fn attach_player(
        &self,
        token: &str,
    ) -> (mpsc::Sender<PlayerEvent>, mpsc::Receiver<PlayerEvent>) {
        let (tx, rx) = mpsc::channel(PLAYER_QUEUE_CAPACITY);
        self.players
            .write()
            .await
            .insert(token.to_string(), tx.clone());
        (tx, rx)
    }

    /// Remove a player connection. A reconnect may already have replaced the
    /// channel under the same token; only the matching channel is removed.
    pub async fn detach_player(&self, token: &str, handle: &mpsc::Sender<PlayerEvent>) {
        let mut players = self.players.write().await;
        if players
            .get(token)
            .is_some_and(|tx| tx.same_channel(handle))
        {
            players.remove(token);
        }
    }

    /// Push an event to a single player, if connected.
    pub async fn player(&self, token: &str, event: PlayerEvent) {
        if let Some(tx) = self.players.read().await.get(token) {
            push(tx, token, event);
        }
    }

    /// Push an event to each of the given players.
    pub async fn players(&self, tokens: &[PlayerToken], event: &PlayerEvent) {
        let players = self.players.read().await;
        for token in tokens {
            if let Some(tx) = players.get(token) {
                push(tx, token, event.clone());
            }
        }
    }

    /// Push an event to every connected player.
    pub async fn all_players(&self, event: &PlayerEvent) {
        let players = self.players.read().await;
        for (token, tx) in players.iter() {
            push(tx, token, event.clone());
        }
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

fn push(tx: &mpsc::Sender<PlayerEvent>, token: &str, event: PlayerEvent) {
    match tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            // Slow consumer: drop, the client reconciles via the status pull
            tracing::warn!(token, "player event queue full, dropping event");
        }
        Err(TrySendError::Closed(_)) => {
            // Connection task is winding down; it detaches itself
        }
    }
}
