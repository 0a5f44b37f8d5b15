//! Aggregate statistics accumulated over a run

use serde::{Deserialize, Serialize};

use crate::core::types::Turn;

/// One change to clan honor or protagonist reputation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub turn: Turn,
    pub delta: i32,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimulationStats {
    pub protagonist_kills: u32,
    pub hunter_kills: u32,
    pub protagonist_damage_dealt: i32,
    pub protagonist_damage_taken: i32,
    pub honor_changes: Vec<ScoreChange>,
    pub reputation_changes: Vec<ScoreChange>,
}

impl SimulationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn net_honor_change(&self) -> i32 {
        self.honor_changes.iter().map(|c| c.delta).sum()
    }

    pub fn net_reputation_change(&self) -> i32 {
        self.reputation_changes.iter().map(|c| c.delta).sum()
    }

    pub(crate) fn record_honor(&mut self, turn: Turn, delta: i32, reason: &str) {
        self.honor_changes.push(ScoreChange {
            turn,
            delta,
            reason: reason.to_string(),
        });
    }

    pub(crate) fn record_reputation(&mut self, turn: Turn, delta: i32, reason: &str) {
        self.reputation_changes.push(ScoreChange {
            turn,
            delta,
            reason: reason.to_string(),
        });
    }
}
