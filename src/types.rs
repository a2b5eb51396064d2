use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type PlayerToken = String;
pub type OptionId = String;
pub type SessionId = String;

/// Round status as the host drives it: options are configurable in
/// `Waiting`, locked while `Voting`, and tallies are frozen in `Result`
/// until the host advances to the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Voting,
    Result,
}

/// A votable option within the current round. Vote counts are derived from
/// the ledger, never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteOption {
    pub id: OptionId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub token: PlayerToken,
    pub name: String,
    pub eliminated: bool,
    pub joined_at: String,
}

/// Name + final count snapshot of one option, as recorded in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryOption {
    pub name: String,
    pub votes: u32,
}

/// Immutable record of one completed round, appended when the host advances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub round: u32,
    pub options: Vec<HistoryOption>,
    pub is_tie: bool,
    pub survivors: Vec<String>,
    pub eliminated: Vec<String>,
}
