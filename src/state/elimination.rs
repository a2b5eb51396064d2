//! Elimination rule for a closed round.
//!
//! Non-voters always go. Voters go only when a single option holds the top
//! vote count and they picked it; any multi-way tie at the top protects
//! every voter.

use crate::types::{OptionId, PlayerToken};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct EliminationOutcome {
    pub survivors: Vec<PlayerToken>,
    pub eliminated: Vec<PlayerToken>,
    pub is_tie: bool,
}

/// Pure function over the frozen ledger. `active` is the ordered list of
/// not-yet-eliminated players; the outcome partitions exactly that list,
/// preserving its order, so the result is independent of map iteration
/// order.
pub fn resolve(
    counts: &HashMap<OptionId, u32>,
    choices: &HashMap<PlayerToken, OptionId>,
    active: &[PlayerToken],
) -> EliminationOutcome {
    let voted_count = active.iter().filter(|t| choices.contains_key(*t)).count();

    let max_votes = counts.values().copied().max().unwrap_or(0);
    let top: Vec<&OptionId> = counts
        .iter()
        .filter(|(_, c)| **c == max_votes)
        .map(|(id, _)| id)
        .collect();

    // With nobody voting there is nothing to compare: no majority, no tie.
    let is_tie = voted_count > 0 && top.len() > 1;
    let majority: Option<&OptionId> = if voted_count > 0 && top.len() == 1 {
        Some(top[0])
    } else {
        None
    };

    let mut survivors = Vec::new();
    let mut eliminated = Vec::new();
    for token in active {
        match choices.get(token) {
            // Non-voters are eliminated regardless of tie status
            None => eliminated.push(token.clone()),
            Some(choice) => {
                if majority.is_some_and(|m| m == choice) {
                    eliminated.push(token.clone());
                } else {
                    survivors.push(token.clone());
                }
            }
        }
    }

    EliminationOutcome {
        survivors,
        eliminated,
        is_tie,
    }
}
