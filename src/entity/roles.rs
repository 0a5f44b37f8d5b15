//! Per-role attribute records
//!
//! Each agent carries exactly one of these inside its `Role`. The set of roles
//! is closed; decision and resolution code matches on it exhaustively.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::core::config::EngineConfig;
use crate::core::types::{AgentId, Position};
use crate::simulation::violation_detection::CodeViolation;

/// Standing of a rival hunter within the clan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocialRole {
    Elder,
    Peer,
}

impl fmt::Display for SocialRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocialRole::Elder => write!(f, "elder"),
            SocialRole::Peer => write!(f, "peer"),
        }
    }
}

/// Discriminant-only view of `Role`, for reports and filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleKind {
    Protagonist,
    Companion,
    Hunter,
    Monster,
    Antagonist,
}

#[derive(Debug, Clone)]
pub struct ProtagonistState {
    pub stamina: i32,
    pub max_stamina: i32,
    pub reputation: i32,
    pub trophies: Vec<String>,
    pub carrying_companion: bool,
    /// Non-owning link to the support companion, if one exists
    pub companion: Option<AgentId>,
    pub violations: Vec<CodeViolation>,
}

impl ProtagonistState {
    pub fn new(config: &EngineConfig, companion: Option<AgentId>) -> Self {
        let p = &config.protagonist;
        Self {
            stamina: p.max_stamina,
            max_stamina: p.max_stamina,
            reputation: p.starting_reputation,
            trophies: Vec::new(),
            carrying_companion: false,
            companion,
            violations: Vec::new(),
        }
    }
}

/// One line of the companion's fixed field manual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KnowledgeEntry {
    pub topic: &'static str,
    pub advice: &'static str,
}

pub const FIELD_KNOWLEDGE: &[KnowledgeEntry] = &[
    KnowledgeEntry {
        topic: "adversary_weakness",
        advice: "Sustained attacks to central mass",
    },
    KnowledgeEntry {
        topic: "terrain_hazards",
        advice: "Rocky zones drain stamina significantly",
    },
    KnowledgeEntry {
        topic: "clan_code_summary",
        advice: "Honor through worthy combat",
    },
];

#[derive(Debug, Clone)]
pub struct CompanionState {
    /// Whether the companion can move under its own power
    pub operational: bool,
    pub knowledge: &'static [KnowledgeEntry],
    /// Trap cells found by reconnaissance (wrapped coordinates)
    pub discovered_traps: BTreeSet<Position>,
}

impl CompanionState {
    pub fn new(damaged: bool) -> Self {
        Self {
            operational: !damaged,
            knowledge: FIELD_KNOWLEDGE,
            discovered_traps: BTreeSet::new(),
        }
    }

    pub fn advice(&self, topic: &str) -> Option<&'static str> {
        self.knowledge
            .iter()
            .find(|entry| entry.topic == topic)
            .map(|entry| entry.advice)
    }
}

#[derive(Debug, Clone)]
pub struct HunterState {
    pub stamina: i32,
    pub max_stamina: i32,
    pub reputation: i32,
    pub trophies: Vec<String>,
    /// Honor-code breaches committed by this hunter
    pub violations: u32,
    pub social_role: SocialRole,
}

impl HunterState {
    pub fn new(config: &EngineConfig, social_role: SocialRole) -> Self {
        let h = &config.hunter;
        Self {
            stamina: h.max_stamina,
            max_stamina: h.max_stamina,
            reputation: h.starting_reputation,
            trophies: Vec::new(),
            violations: 0,
            social_role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonsterState {
    /// Probability of attacking a nearby agent, fixed at creation
    pub aggression: f64,
}

#[derive(Debug, Clone)]
pub struct AntagonistState {
    /// Fraction of incoming damage ignored
    pub resilience: f64,
    pub territory_center: Position,
    pub territory_radius: i32,
    /// Index into the attack cycle of the last attack made
    pub attack_pattern: usize,
}

impl AntagonistState {
    pub fn new(config: &EngineConfig, territory_center: Position) -> Self {
        let a = &config.antagonist;
        Self {
            resilience: a.resilience,
            territory_center,
            territory_radius: a.territory_radius,
            attack_pattern: 0,
        }
    }

    /// Incoming damage after resilience, truncated toward zero
    pub fn reduce(&self, amount: i32) -> i32 {
        (amount as f64 * (1.0 - self.resilience)) as i32
    }

    /// Advance the cycle and return the pattern to use
    pub fn next_pattern(&mut self, pattern_count: usize) -> usize {
        self.attack_pattern = (self.attack_pattern + 1) % pattern_count.max(1);
        self.attack_pattern
    }
}

/// Closed set of agent roles, each with its own attribute record
#[derive(Debug, Clone)]
pub enum Role {
    Protagonist(ProtagonistState),
    Companion(CompanionState),
    Hunter(HunterState),
    Monster(MonsterState),
    Antagonist(AntagonistState),
}

impl Role {
    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Protagonist(_) => RoleKind::Protagonist,
            Role::Companion(_) => RoleKind::Companion,
            Role::Hunter(_) => RoleKind::Hunter,
            Role::Monster(_) => RoleKind::Monster,
            Role::Antagonist(_) => RoleKind::Antagonist,
        }
    }

    pub fn stamina(&self) -> Option<i32> {
        match self {
            Role::Protagonist(p) => Some(p.stamina),
            Role::Hunter(h) => Some(h.stamina),
            _ => None,
        }
    }

    pub fn reputation(&self) -> Option<i32> {
        match self {
            Role::Protagonist(p) => Some(p.reputation),
            Role::Hunter(h) => Some(h.reputation),
            _ => None,
        }
    }

    pub fn trophies(&self) -> &[String] {
        match self {
            Role::Protagonist(p) => &p.trophies,
            Role::Hunter(h) => &h.trophies,
            _ => &[],
        }
    }
}
