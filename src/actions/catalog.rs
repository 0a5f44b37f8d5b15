//! Action vocabulary shared by every role

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, Position};

/// A single decided action. Targets are carried in the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Rest,
    Patrol,
    Wander,
    MoveTowards(Position),
    Hunt(AgentId),
    Fight(AgentId),
    Attack(AgentId),
    CarryCompanion,
    Reconnaissance,
    Idle,
    Challenge(AgentId),
    PatrolTerritory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Movement,
    Combat,
    Social,
    Support,
    Idle,
}

impl Action {
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::Patrol
            | Action::Wander
            | Action::MoveTowards(_)
            | Action::PatrolTerritory => ActionCategory::Movement,
            Action::Hunt(_) | Action::Fight(_) | Action::Attack(_) => ActionCategory::Combat,
            Action::Challenge(_) => ActionCategory::Social,
            Action::CarryCompanion | Action::Reconnaissance => ActionCategory::Support,
            Action::Rest | Action::Idle => ActionCategory::Idle,
        }
    }

    /// Agent this action is aimed at, if any
    pub fn target(&self) -> Option<AgentId> {
        match self {
            Action::Hunt(id) | Action::Fight(id) | Action::Attack(id) | Action::Challenge(id) => {
                Some(*id)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Rest => "rest",
            Action::Patrol => "patrol",
            Action::Wander => "wander",
            Action::MoveTowards(_) => "move_towards",
            Action::Hunt(_) => "hunt",
            Action::Fight(_) => "fight",
            Action::Attack(_) => "attack",
            Action::CarryCompanion => "carry_companion",
            Action::Reconnaissance => "reconnaissance",
            Action::Idle => "idle",
            Action::Challenge(_) => "challenge",
            Action::PatrolTerritory => "patrol_territory",
        }
    }
}
