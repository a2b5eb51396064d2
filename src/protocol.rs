//! Wire protocol: typed real-time events and HTTP request/response shapes.
//!
//! Every push event serializes as `{"type": "<kind>", "data": {...}}` and is
//! an exhaustively-matched enum per audience. Push delivery is best-effort;
//! clients reconcile through the pull snapshots below.

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Option as shown to players while voting is open (no counts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionInfo {
    pub id: OptionId,
    pub name: String,
}

/// Option with its live vote count, for the host and for frozen results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionTally {
    pub id: OptionId,
    pub name: String,
    pub votes: u32,
}

/// Per-player row in host listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRow {
    pub token: PlayerToken,
    pub name: String,
    pub voted: bool,
    pub eliminated: bool,
    pub vote_option: Option<OptionId>,
}

/// Events delivered on the host channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum HostEvent {
    Init {
        status: GameStatus,
        round: u32,
        options: Vec<OptionTally>,
        users: Vec<PlayerRow>,
    },
    UserJoined {
        token: PlayerToken,
        name: String,
        user_count: usize,
    },
    VoteUpdate {
        options: Vec<OptionTally>,
        voted_count: usize,
        user_count: usize,
    },
    StatusChange {
        status: GameStatus,
        round: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        results: Option<Vec<OptionTally>>,
    },
    RoundChange {
        round: u32,
        eliminated_tokens: Vec<PlayerToken>,
        active_users: usize,
        is_tie: bool,
    },
    SessionRefreshed {
        session_id: SessionId,
    },
    GameReset,
}

/// Events delivered on a single player's channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PlayerEvent {
    Init {
        status: GameStatus,
        round: u32,
        options: Option<Vec<OptionInfo>>,
        voted: bool,
        eliminated: bool,
    },
    VotingStarted {
        round: u32,
        options: Vec<OptionInfo>,
    },
    VotingEnded {
        round: u32,
        results: Vec<OptionTally>,
    },
    Eliminated {
        round: u32,
    },
    NextRound {
        round: u32,
        eliminated_count: usize,
        is_tie: bool,
    },
    GameReset,
}

// ---- HTTP request bodies ----

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub session_id: SessionId,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub token: PlayerToken,
    pub option_id: OptionId,
}

#[derive(Debug, Deserialize)]
pub struct SetOptionsRequest {
    pub options: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextRoundRequest {
    #[serde(default)]
    pub new_options: Option<Vec<String>>,
}

// ---- HTTP responses ----

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub token: PlayerToken,
    pub name: String,
    /// Current options when voting is already open, so a late joiner can
    /// vote immediately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionInfo>>,
    /// True when the name was already registered and the existing token was
    /// handed back (device reload / reconnect).
    pub returning: bool,
}

/// Uniform body for commands whose only payload is "it worked".
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub options: Vec<OptionTally>,
}

/// Public game snapshot (`GET /api/config`).
#[derive(Debug, Serialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub round: u32,
    pub options: Vec<OptionTally>,
    pub user_count: usize,
    pub voted_count: usize,
}

/// Full reconciliation snapshot for one player.
#[derive(Debug, Serialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub game_status: GameStatus,
    pub round: u32,
    pub options: Option<Vec<OptionInfo>>,
    pub voted: bool,
    pub vote_option: Option<OptionId>,
    pub eliminated: bool,
}

#[derive(Debug, Serialize)]
pub struct ResultsUser {
    pub name: String,
    pub voted: bool,
    pub eliminated: bool,
}

/// Results page snapshot (`GET /api/results`).
#[derive(Debug, Serialize)]
pub struct ResultsSnapshot {
    pub round: u32,
    pub status: GameStatus,
    pub options: Vec<OptionTally>,
    pub total_votes: u32,
    pub users: Vec<ResultsUser>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<PlayerRow>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryRecord>,
    pub current_round: u32,
    pub total_rounds: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub join_url: String,
}

/// Preset availability for the current round (`GET /api/host/round-config`).
#[derive(Debug, Serialize)]
pub struct RoundConfigResponse {
    pub round: u32,
    pub has_preset: bool,
    pub preset_options: Option<Vec<String>>,
    pub preset_title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NextRoundSummary {
    pub round: u32,
    pub eliminated_count: usize,
    pub active_users: usize,
    pub is_tie: bool,
}
