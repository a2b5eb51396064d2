//! Per-round vote bookkeeping.

use crate::error::GameError;
use crate::types::{OptionId, PlayerToken, VoteOption};
use std::collections::HashMap;

/// Tracks who voted for what within the current round. Counts and choices
/// are the single source of truth for tallies and the derived `voted` flag;
/// at most one vote is recorded per player, and the first vote is final.
pub struct VoteLedger {
    counts: HashMap<OptionId, u32>,
    choices: HashMap<PlayerToken, OptionId>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            choices: HashMap::new(),
        }
    }

    /// Open the ledger for a new voting phase over the given options. All
    /// previous votes are discarded.
    pub fn open(&mut self, options: &[VoteOption]) {
        self.choices.clear();
        self.counts = options.iter().map(|o| (o.id.clone(), 0)).collect();
    }

    /// Discard all votes and option slots.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.choices.clear();
    }

    /// Record a vote. The second attempt by the same player fails without
    /// mutating anything, as does a vote for an option not in this round.
    pub fn cast(&mut self, token: &str, option_id: &str) -> Result<(), GameError> {
        if self.choices.contains_key(token) {
            return Err(GameError::DuplicateVote);
        }
        let count = self
            .counts
            .get_mut(option_id)
            .ok_or_else(|| GameError::NotFound("option does not exist in this round".into()))?;
        *count += 1;
        self.choices
            .insert(token.to_string(), option_id.to_string());
        Ok(())
    }

    pub fn count(&self, option_id: &str) -> u32 {
        self.counts.get(option_id).copied().unwrap_or(0)
    }

    pub fn voted_count(&self) -> usize {
        self.choices.len()
    }

    pub fn has_voted(&self, token: &str) -> bool {
        self.choices.contains_key(token)
    }

    pub fn choice(&self, token: &str) -> Option<&OptionId> {
        self.choices.get(token)
    }

    pub fn counts(&self) -> &HashMap<OptionId, u32> {
        &self.counts
    }

    pub fn choices(&self) -> &HashMap<PlayerToken, OptionId> {
        &self.choices
    }
}

impl Default for VoteLedger {
    fn default() -> Self {
        Self::new()
    }
}
