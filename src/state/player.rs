//! Player registration and lifecycle.

use super::AppState;
use crate::error::GameError;
use crate::protocol::{HostEvent, PlayerRow, PlayerSnapshot, RegisterResponse};
use crate::types::{Player, PlayerToken};

const MAX_NAME_CHARS: usize = 20;
/// Markup and shell metacharacters rejected in display names.
const ILLEGAL_NAME_CHARS: &[char] = &['<', '>', '"', '\'', '/', '\\', ';', '&', '|', '`', '$'];

/// Validate and normalize a display name.
pub fn validate_name(raw: &str) -> Result<String, GameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(GameError::Validation("name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(GameError::Validation(format!(
            "name must be at most {} characters",
            MAX_NAME_CHARS
        )));
    }
    if name
        .chars()
        .any(|c| c.is_control() || ILLEGAL_NAME_CHARS.contains(&c))
    {
        return Err(GameError::Validation(
            "name contains disallowed characters".into(),
        ));
    }
    Ok(name.to_string())
}

/// Registered players in join order. Tokens are ULIDs, stable for the
/// player's lifetime; the `eliminated` flag is monotonic until a full reset.
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
        }
    }

    /// Create a player with a fresh token. The name must already be
    /// validated.
    pub fn register(&mut self, name: String) -> &Player {
        let player = Player {
            token: ulid::Ulid::new().to_string(),
            name,
            eliminated: false,
            joined_at: chrono::Utc::now().to_rfc3339(),
        };
        self.players.push(player);
        self.players.last().expect("just pushed")
    }

    pub fn get(&self, token: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.token == token)
    }

    /// Find a player by display name, case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<&Player> {
        let lowered = name.to_lowercase();
        self.players
            .iter()
            .find(|p| p.name.to_lowercase() == lowered)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Active (not yet eliminated) player tokens, in join order.
    pub fn active_tokens(&self) -> Vec<PlayerToken> {
        self.players
            .iter()
            .filter(|p| !p.eliminated)
            .map(|p| p.token.clone())
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| !p.eliminated).count()
    }

    pub fn name_of(&self, token: &str) -> Option<&str> {
        self.get(token).map(|p| p.name.as_str())
    }

    /// Flip the elimination flag for the given tokens. Called only by the
    /// round engine when a round completes.
    pub fn mark_eliminated(&mut self, tokens: &[PlayerToken]) {
        for player in &mut self.players {
            if tokens.contains(&player.token) {
                player.eliminated = true;
            }
        }
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Register a player by name, gated by the current session id.
    ///
    /// A name that is already taken is treated as the same player coming
    /// back (page reload, new device): the existing token is returned and
    /// nothing is announced.
    pub async fn register_player(
        &self,
        name: &str,
        session_id: &str,
    ) -> Result<RegisterResponse, GameError> {
        let mut game = self.game.write().await;

        if !game.session.validate(session_id) {
            return Err(GameError::NotFound("unknown or expired session".into()));
        }
        let name = validate_name(name)?;

        if let Some(existing) = game.players.find_by_name(&name) {
            tracing::info!(name = %existing.name, "returning player re-joined");
            return Ok(RegisterResponse {
                token: existing.token.clone(),
                name: existing.name.clone(),
                options: game.options_if_voting(),
                returning: true,
            });
        }

        let player = game.players.register(name);
        let token = player.token.clone();
        let name = player.name.clone();
        tracing::info!(%name, "player registered");

        self.broadcaster.host(HostEvent::UserJoined {
            token: token.clone(),
            name: name.clone(),
            user_count: game.players.active_count(),
        });

        Ok(RegisterResponse {
            token,
            name,
            options: game.options_if_voting(),
            returning: false,
        })
    }

    /// Full reconciliation snapshot for one player.
    pub async fn player_snapshot(&self, token: &str) -> Result<PlayerSnapshot, GameError> {
        let game = self.game.read().await;
        let player = game
            .players
            .get(token)
            .ok_or_else(|| GameError::NotFound("unknown player token".into()))?;

        Ok(PlayerSnapshot {
            name: player.name.clone(),
            game_status: game.status,
            round: game.round,
            options: game.options_if_voting(),
            voted: game.ledger.has_voted(token),
            vote_option: game.ledger.choice(token).cloned(),
            eliminated: player.eliminated,
        })
    }

    /// All players with their live voted/eliminated flags, for the host.
    pub async fn list_players(&self) -> Vec<PlayerRow> {
        self.game.read().await.player_rows()
    }
}
