//! The round state machine.
//!
//! All authoritative mutation funnels through these operations. Each one
//! takes the single write lock, validates against the current status,
//! mutates to completion, and emits one broadcast describing the delta.
//! A failed call changes nothing and emits nothing.

use super::{elimination, AppState};
use crate::error::GameError;
use crate::protocol::*;
use crate::types::*;

/// Trim entries, drop empties, de-duplicate keeping the first occurrence,
/// then enforce the 2–4 bound.
fn normalize_options(raw: Vec<String>) -> Result<Vec<String>, GameError> {
    let mut names: Vec<String> = Vec::new();
    for entry in raw {
        let name = entry.trim();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    if names.len() < 2 || names.len() > 4 {
        return Err(GameError::Validation(
            "between 2 and 4 distinct options are required".into(),
        ));
    }
    Ok(names)
}

fn build_options(names: Vec<String>) -> Vec<VoteOption> {
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| VoteOption {
            id: format!("option_{}", i + 1),
            name,
        })
        .collect()
}

impl AppState {
    /// Set the option list for the upcoming vote. Only meaningful while
    /// waiting; in any other status this is a no-op that returns the
    /// options as they stand.
    pub async fn configure_options(
        &self,
        raw: Vec<String>,
    ) -> Result<Vec<OptionTally>, GameError> {
        let mut game = self.game.write().await;
        if game.status != GameStatus::Waiting {
            return Ok(game.tallies());
        }
        let names = normalize_options(raw)?;
        game.options = build_options(names);
        game.ledger.clear();
        tracing::info!(count = game.options.len(), "options configured");
        Ok(game.tallies())
    }

    /// Open voting on the configured options.
    pub async fn start_voting(&self) -> Result<(), GameError> {
        let mut game = self.game.write().await;
        if game.status != GameStatus::Waiting {
            return Err(GameError::InvalidState(
                "voting can only start from the waiting state".into(),
            ));
        }
        if game.players.active_count() == 0 {
            return Err(GameError::Precondition(
                "at least one active player is required".into(),
            ));
        }
        if game.options.len() < 2 {
            return Err(GameError::Precondition(
                "set at least two options before starting".into(),
            ));
        }

        game.status = GameStatus::Voting;
        let options = game.options.clone();
        game.ledger.open(&options);
        tracing::info!(round = game.round, "voting started");

        // Eliminated players never receive new options
        let active = game.players.active_tokens();
        self.broadcaster
            .players(
                &active,
                &PlayerEvent::VotingStarted {
                    round: game.round,
                    options: game.option_infos(),
                },
            )
            .await;
        self.broadcaster.host(HostEvent::StatusChange {
            status: GameStatus::Voting,
            round: game.round,
            results: None,
        });
        Ok(())
    }

    /// Record one player's vote and push the live tally to the host. The
    /// HTTP response acks the player; there is no push-side ack.
    pub async fn submit_vote(&self, token: &str, option_id: &str) -> Result<(), GameError> {
        let mut game = self.game.write().await;
        if game.status != GameStatus::Voting {
            return Err(GameError::InvalidState("voting is not open".into()));
        }
        let player = game
            .players
            .get(token)
            .ok_or_else(|| GameError::NotFound("unknown player token".into()))?;
        if player.eliminated {
            return Err(GameError::NotFound(
                "eliminated players cannot vote".into(),
            ));
        }

        game.ledger.cast(token, option_id)?;
        tracing::debug!(%token, %option_id, "vote recorded");

        self.broadcaster.host(HostEvent::VoteUpdate {
            options: game.tallies(),
            voted_count: game.ledger.voted_count(),
            user_count: game.players.active_count(),
        });
        Ok(())
    }

    /// Close voting and freeze the tallies. Calling this again once the
    /// round is already in `result` returns the same frozen tally without
    /// a second broadcast.
    pub async fn end_voting(&self) -> Result<Vec<OptionTally>, GameError> {
        let mut game = self.game.write().await;
        match game.status {
            GameStatus::Result => return Ok(game.tallies()),
            GameStatus::Waiting => {
                return Err(GameError::InvalidState("voting has not started".into()))
            }
            GameStatus::Voting => {}
        }

        game.status = GameStatus::Result;
        let results = game.tallies();
        tracing::info!(round = game.round, "voting ended");

        self.broadcaster
            .all_players(&PlayerEvent::VotingEnded {
                round: game.round,
                results: results.clone(),
            })
            .await;
        self.broadcaster.host(HostEvent::StatusChange {
            status: GameStatus::Result,
            round: game.round,
            results: Some(results.clone()),
        });
        Ok(results)
    }

    /// Apply the elimination outcome of the frozen round, record history,
    /// and open the next round. Optionally seeds the new round's options.
    pub async fn next_round(
        &self,
        new_options: Option<Vec<String>>,
    ) -> Result<NextRoundSummary, GameError> {
        let mut game = self.game.write().await;
        if game.status != GameStatus::Result {
            return Err(GameError::InvalidState(
                "end the current vote before advancing".into(),
            ));
        }
        // Validate up front so a bad option list leaves the round untouched
        let replacement = match new_options {
            Some(raw) => Some(build_options(normalize_options(raw)?)),
            None => None,
        };

        let finished_round = game.round;
        let active = game.players.active_tokens();
        let outcome = elimination::resolve(game.ledger.counts(), game.ledger.choices(), &active);

        let options_snapshot: Vec<HistoryOption> = game
            .tallies()
            .into_iter()
            .map(|t| HistoryOption {
                name: t.name,
                votes: t.votes,
            })
            .collect();
        let name_list = |tokens: &[PlayerToken]| -> Vec<String> {
            tokens
                .iter()
                .filter_map(|t| game.players.name_of(t).map(str::to_string))
                .collect()
        };
        let record = HistoryRecord {
            round: finished_round,
            options: options_snapshot,
            is_tie: outcome.is_tie,
            survivors: name_list(&outcome.survivors),
            eliminated: name_list(&outcome.eliminated),
        };

        game.players.mark_eliminated(&outcome.eliminated);
        game.history.push(record);
        game.round = finished_round + 1;
        game.status = GameStatus::Waiting;
        game.options = replacement.unwrap_or_default();
        game.ledger.clear();

        let summary = NextRoundSummary {
            round: game.round,
            eliminated_count: outcome.eliminated.len(),
            active_users: game.players.active_count(),
            is_tie: outcome.is_tie,
        };
        tracing::info!(
            round = summary.round,
            eliminated = summary.eliminated_count,
            is_tie = summary.is_tie,
            "advanced to next round"
        );

        for token in &outcome.eliminated {
            self.broadcaster
                .player(token, PlayerEvent::Eliminated {
                    round: finished_round,
                })
                .await;
        }
        self.broadcaster
            .players(
                &outcome.survivors,
                &PlayerEvent::NextRound {
                    round: summary.round,
                    eliminated_count: summary.eliminated_count,
                    is_tie: summary.is_tie,
                },
            )
            .await;
        self.broadcaster.host(HostEvent::RoundChange {
            round: summary.round,
            eliminated_tokens: outcome.eliminated,
            active_users: summary.active_users,
            is_tie: summary.is_tie,
        });

        Ok(summary)
    }

    /// Wipe everything back to round 1. The session id survives so the
    /// displayed QR code stays valid.
    pub async fn reset_game(&self) {
        let mut game = self.game.write().await;
        game.players.clear();
        game.ledger.clear();
        game.history.clear();
        game.options.clear();
        game.status = GameStatus::Waiting;
        game.round = 1;
        tracing::info!("game reset");

        self.broadcaster.all_players(&PlayerEvent::GameReset).await;
        self.broadcaster.host(HostEvent::GameReset);
    }

    /// Apply the preset option set for the current round, if one exists.
    pub async fn load_preset(&self) -> Result<Vec<OptionTally>, GameError> {
        let round = self.game.read().await.round;
        let preset = self
            .presets
            .preset_for_round(round)
            .await
            .and_then(|p| p.options)
            .ok_or_else(|| {
                GameError::NotFound(format!("no preset options for round {round}"))
            })?;
        self.configure_options(preset).await
    }

    /// Preset availability for the current round.
    pub async fn round_config(&self) -> RoundConfigResponse {
        let round = self.game.read().await.round;
        let (preset_options, preset_title) = match self.presets.preset_for_round(round).await {
            Some(p) => (p.options, p.title),
            None => (None, None),
        };
        RoundConfigResponse {
            round,
            has_preset: preset_options.is_some(),
            preset_options,
            preset_title,
        }
    }

    // ---- read-side snapshots ----

    pub async fn current_options(&self) -> Vec<OptionTally> {
        self.game.read().await.tallies()
    }

    pub async fn game_snapshot(&self) -> GameSnapshot {
        let game = self.game.read().await;
        GameSnapshot {
            status: game.status,
            round: game.round,
            options: game.tallies(),
            user_count: game.players.active_count(),
            voted_count: game.ledger.voted_count(),
        }
    }

    pub async fn results_snapshot(&self) -> ResultsSnapshot {
        let game = self.game.read().await;
        let options = game.tallies();
        let total_votes = options.iter().map(|o| o.votes).sum();
        ResultsSnapshot {
            round: game.round,
            status: game.status,
            options,
            total_votes,
            users: game
                .players
                .iter()
                .map(|p| ResultsUser {
                    name: p.name.clone(),
                    voted: game.ledger.has_voted(&p.token),
                    eliminated: p.eliminated,
                })
                .collect(),
        }
    }

    pub async fn history_snapshot(&self) -> HistoryResponse {
        let game = self.game.read().await;
        HistoryResponse {
            history: game.history.records().to_vec(),
            current_round: game.round,
            total_rounds: game.history.len(),
        }
    }

    /// Full snapshot for a freshly connected host.
    pub async fn host_init(&self) -> HostEvent {
        let game = self.game.read().await;
        HostEvent::Init {
            status: game.status,
            round: game.round,
            options: game.tallies(),
            users: game.player_rows(),
        }
    }

    /// Full snapshot for a freshly connected player.
    pub async fn player_init(&self, token: &str) -> Result<PlayerEvent, GameError> {
        let game = self.game.read().await;
        let player = game
            .players
            .get(token)
            .ok_or_else(|| GameError::NotFound("unknown player token".into()))?;
        Ok(PlayerEvent::Init {
            status: game.status,
            round: game.round,
            options: game.options_if_voting(),
            voted: game.ledger.has_voted(token),
            eliminated: player.eliminated,
        })
    }
}
