mod elimination;
mod game;
mod history;
mod player;
mod session;
mod vote;

pub use history::HistoryStore;
pub use player::PlayerRegistry;
pub use session::SessionRegistry;
pub use vote::VoteLedger;

use crate::broadcast::Broadcaster;
use crate::config::ServerConfig;
use crate::preset::{FilePresets, PresetSource};
use crate::protocol::{OptionInfo, OptionTally, PlayerRow};
use crate::types::*;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The single authoritative game instance. Every mutating operation takes
/// the write lock, runs to completion, and emits its events before the next
/// mutation is admitted; reads take the read lock and see a consistent
/// snapshot.
pub struct GameState {
    pub session: SessionRegistry,
    pub players: PlayerRegistry,
    pub options: Vec<VoteOption>,
    pub ledger: VoteLedger,
    pub history: HistoryStore,
    pub status: GameStatus,
    pub round: u32,
}

impl GameState {
    fn new() -> Self {
        Self {
            session: SessionRegistry::new(),
            players: PlayerRegistry::new(),
            options: Vec::new(),
            ledger: VoteLedger::new(),
            history: HistoryStore::new(),
            status: GameStatus::Waiting,
            round: 1,
        }
    }

    /// Current options with live counts from the ledger.
    pub fn tallies(&self) -> Vec<OptionTally> {
        self.options
            .iter()
            .map(|o| OptionTally {
                id: o.id.clone(),
                name: o.name.clone(),
                votes: self.ledger.count(&o.id),
            })
            .collect()
    }

    /// Current options without counts, as shown to players.
    pub fn option_infos(&self) -> Vec<OptionInfo> {
        self.options
            .iter()
            .map(|o| OptionInfo {
                id: o.id.clone(),
                name: o.name.clone(),
            })
            .collect()
    }

    /// Options are only handed to players while voting is open.
    pub fn options_if_voting(&self) -> Option<Vec<OptionInfo>> {
        (self.status == GameStatus::Voting).then(|| self.option_infos())
    }

    /// All players with their live voted/eliminated flags.
    pub fn player_rows(&self) -> Vec<PlayerRow> {
        self.players
            .iter()
            .map(|p| PlayerRow {
                token: p.token.clone(),
                name: p.name.clone(),
                voted: self.ledger.has_voted(&p.token),
                eliminated: p.eliminated,
                vote_option: self.ledger.choice(&p.token).cloned(),
            })
            .collect()
    }
}

/// Shared application state
pub struct AppState {
    pub game: RwLock<GameState>,
    pub broadcaster: Broadcaster,
    pub presets: Arc<dyn PresetSource>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let presets = Arc::new(FilePresets::new(config.presets_path.clone()));
        Self::with_presets(config, presets)
    }

    pub fn with_presets(config: ServerConfig, presets: Arc<dyn PresetSource>) -> Self {
        Self {
            game: RwLock::new(GameState::new()),
            broadcaster: Broadcaster::new(),
            presets,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
