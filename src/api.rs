//! HTTP surface: player join/vote/reconciliation plus the host command set.
//!
//! Failures serialize as `{"detail", "kind"}` via the `GameError` response
//! mapping; the pull endpoints here are the source of truth that the push
//! channels reconcile against.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use crate::error::GameError;
use crate::protocol::*;
use crate::state::AppState;
use crate::ws;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/config", get(get_config))
        .route("/api/user/register", post(register_user))
        .route("/api/user/{token}/status", get(user_status))
        .route("/api/vote", post(submit_vote))
        .route("/api/results", get(get_results))
        .route("/api/host/options", get(get_options).post(set_options))
        .route("/api/host/start", post(start_voting))
        .route("/api/host/end", post(end_voting))
        .route("/api/host/next-round", post(next_round))
        .route("/api/host/reset", post(reset_game))
        .route("/api/host/users", get(list_users))
        .route("/api/host/history", get(get_history))
        .route("/api/host/round-config", get(round_config))
        .route("/api/host/load-preset", post(load_preset))
        .route("/api/host/session", get(get_session))
        .route("/api/host/session/refresh", post(refresh_session))
        .route("/ws/host", get(ws::host_ws))
        .route("/ws/user/{token}", get(ws::user_ws))
        .with_state(state)
}

// ---- player surface ----

async fn get_config(State(state): State<Arc<AppState>>) -> Json<GameSnapshot> {
    Json(state.game_snapshot().await)
}

async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, GameError> {
    let response = state.register_player(&req.name, &req.session_id).await?;
    Ok(Json(response))
}

async fn user_status(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<PlayerSnapshot>, GameError> {
    Ok(Json(state.player_snapshot(&token).await?))
}

async fn submit_vote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<Ack>, GameError> {
    state.submit_vote(&req.token, &req.option_id).await?;
    Ok(Json(Ack { success: true }))
}

async fn get_results(State(state): State<Arc<AppState>>) -> Json<ResultsSnapshot> {
    Json(state.results_snapshot().await)
}

// ---- host surface ----

async fn get_options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        options: state.current_options().await,
    })
}

async fn set_options(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetOptionsRequest>,
) -> Result<Json<OptionsResponse>, GameError> {
    let options = state.configure_options(req.options).await?;
    Ok(Json(OptionsResponse { options }))
}

async fn start_voting(State(state): State<Arc<AppState>>) -> Result<Json<Ack>, GameError> {
    state.start_voting().await?;
    Ok(Json(Ack { success: true }))
}

async fn end_voting(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OptionsResponse>, GameError> {
    let options = state.end_voting().await?;
    Ok(Json(OptionsResponse { options }))
}

async fn next_round(
    State(state): State<Arc<AppState>>,
    body: Option<Json<NextRoundRequest>>,
) -> Result<Json<NextRoundSummary>, GameError> {
    let new_options = body.and_then(|Json(req)| req.new_options);
    Ok(Json(state.next_round(new_options).await?))
}

async fn reset_game(State(state): State<Arc<AppState>>) -> Json<Ack> {
    state.reset_game().await;
    Json(Ack { success: true })
}

async fn list_users(State(state): State<Arc<AppState>>) -> Json<UsersResponse> {
    let users = state.list_players().await;
    let total = users.len();
    Json(UsersResponse { users, total })
}

async fn get_history(State(state): State<Arc<AppState>>) -> Json<HistoryResponse> {
    Json(state.history_snapshot().await)
}

async fn round_config(State(state): State<Arc<AppState>>) -> Json<RoundConfigResponse> {
    Json(state.round_config().await)
}

async fn load_preset(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OptionsResponse>, GameError> {
    let options = state.load_preset().await?;
    Ok(Json(OptionsResponse { options }))
}

async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionInfo> {
    let session_id = state.current_session().await;
    let join_url = state.config.join_url(&session_id);
    Json(SessionInfo {
        session_id,
        join_url,
    })
}

async fn refresh_session(State(state): State<Arc<AppState>>) -> Json<SessionInfo> {
    let session_id = state.refresh_session().await;
    let join_url = state.config.join_url(&session_id);
    Json(SessionInfo {
        session_id,
        join_url,
    })
}
