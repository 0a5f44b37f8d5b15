//! Structured event log
//!
//! Resolution appends one record per observable effect. Reporters read this
//! log instead of scraping console output.

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, Position, Turn};
use crate::simulation::violation_detection::CodeViolation;

/// A single logged event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    pub turn: Turn,
    pub kind: EventKind,
}

#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeOutcome {
    /// Challenger carries violations of its own; the protagonist is still penalised
    ChallengerDishonored,
    /// Protagonist out-ranks the challenger
    Worthy,
    Unworthy,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    // Movement
    Moved { agent: AgentId, from: Position, to: Position, stamina_cost: i32 },
    TrapTriggered { agent: AgentId, position: Position, damage: i32 },
    Rested { agent: AgentId, health_gained: i32, stamina_gained: i32 },

    // Combat
    Attacked { attacker: AgentId, target: AgentId, damage: i32, technique: String },
    Missed { attacker: AgentId, target: AgentId },
    DamageReduced { agent: AgentId, incoming: i32, applied: i32 },
    CounterAttack { attacker: AgentId, target: AgentId, damage: i32 },
    Killed { victim: AgentId, killer: Option<AgentId> },
    TrophyClaimed { agent: AgentId, trophy: String },

    // Companion
    CompanionCarried { carrier: AgentId, companion: AgentId },
    TacticalSupport { companion: AgentId, hit_chance: f64 },
    TrapDiscovered { scout: AgentId, position: Position },

    // Honor code
    HuntRefused { hunter: AgentId, target: AgentId, target_health: i32 },
    CodeViolation {
        agent: AgentId,
        violations: Vec<CodeViolation>,
        reputation_delta: i32,
        honor_delta: i32,
    },
    Challenge {
        challenger: AgentId,
        target: AgentId,
        outcome: ChallengeOutcome,
        reputation_delta: i32,
    },

    // Outcome
    Victory,
    Defeat,
}

impl EventKind {
    /// Agents named by this event
    pub fn participants(&self) -> Vec<AgentId> {
        match self {
            EventKind::Moved { agent, .. }
            | EventKind::TrapTriggered { agent, .. }
            | EventKind::Rested { agent, .. }
            | EventKind::DamageReduced { agent, .. }
            | EventKind::TrophyClaimed { agent, .. }
            | EventKind::CodeViolation { agent, .. } => vec![*agent],
            EventKind::Attacked { attacker, target, .. }
            | EventKind::Missed { attacker, target }
            | EventKind::CounterAttack { attacker, target, .. } => vec![*attacker, *target],
            EventKind::Killed { victim, killer } => {
                let mut ids = vec![*victim];
                ids.extend(killer);
                ids
            }
            EventKind::CompanionCarried { carrier, companion } => vec![*carrier, *companion],
            EventKind::TacticalSupport { companion, .. } => vec![*companion],
            EventKind::TrapDiscovered { scout, .. } => vec![*scout],
            EventKind::HuntRefused { hunter, target, .. } => vec![*hunter, *target],
            EventKind::Challenge { challenger, target, .. } => vec![*challenger, *target],
            EventKind::Victory | EventKind::Defeat => Vec::new(),
        }
    }
}

/// Ordered log of everything that happened
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<Event>,
    next_event_id: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn, kind: EventKind) -> u32 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.events.push(Event { id, turn, kind });
        id
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn events_for_turn(&self, turn: Turn) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.turn == turn)
    }

    pub fn events_for_agent(&self, agent: AgentId) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| e.kind.participants().contains(&agent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut log = EventLog::new();
        assert_eq!(log.push(1, EventKind::Victory), 0);
        assert_eq!(log.push(1, EventKind::Defeat), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_filters() {
        let mut log = EventLog::new();
        log.push(
            1,
            EventKind::Missed {
                attacker: AgentId(0),
                target: AgentId(4),
            },
        );
        log.push(
            2,
            EventKind::Killed {
                victim: AgentId(5),
                killer: Some(AgentId(0)),
            },
        );
        log.push(2, EventKind::Victory);

        assert_eq!(log.events_for_turn(2).count(), 2);
        assert_eq!(log.events_for_agent(AgentId(0)).count(), 2);
        assert_eq!(log.events_for_agent(AgentId(4)).count(), 1);
        assert_eq!(log.events_for_agent(AgentId(7)).count(), 0);
    }
}
