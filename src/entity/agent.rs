//! Agent base record shared by every role

use crate::core::types::{AgentId, Position};
use crate::entity::roles::{Role, RoleKind};
use crate::spatial::Grid;

/// Outcome of a single damage intake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Damage {
    /// Damage as rolled by the source
    pub incoming: i32,
    /// Damage after the target's own reduction
    pub applied: i32,
    /// Health actually lost (applied, capped by remaining health)
    pub dealt: i32,
    /// This intake brought the agent from alive to dead
    pub killed: bool,
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    position: Position,
    health: i32,
    max_health: i32,
    alive: bool,
    role: Role,
}

impl Agent {
    pub fn new(id: AgentId, name: impl Into<String>, max_health: i32, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            position: Position::default(),
            health: max_health,
            max_health,
            alive: true,
            role,
        }
    }

    /// Mirrored position. Written only by grid operations.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn kind(&self) -> RoleKind {
        self.role.kind()
    }

    pub fn stamina(&self) -> Option<i32> {
        self.role.stamina()
    }

    pub fn reputation(&self) -> Option<i32> {
        self.role.reputation()
    }

    pub fn trophies(&self) -> &[String] {
        self.role.trophies()
    }

    /// Single-character map glyph
    pub fn glyph(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }

    pub(crate) fn role_mut(&mut self) -> &mut Role {
        &mut self.role
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Overwrite health, clamped to [1, max]. Scenario setup only.
    pub(crate) fn set_health(&mut self, health: i32) {
        self.health = health.clamp(1, self.max_health);
    }

    /// Apply incoming damage
    ///
    /// The antagonist's resilience is applied first, then health is clamped at
    /// zero. Reaching zero marks the agent dead and clears its cell, but only
    /// while the cell still records this agent (a carried companion has no cell
    /// of its own).
    pub fn take_damage(&mut self, amount: i32, grid: &mut Grid) -> Damage {
        let incoming = amount.max(0);
        let applied = match &self.role {
            Role::Antagonist(state) => state.reduce(incoming),
            _ => incoming,
        };

        let before = self.health;
        self.health = (self.health - applied).max(0);
        let was_alive = self.alive;

        if self.health == 0 {
            self.alive = false;
            if grid.occupant_at(self.position) == Some(self.id) {
                grid.vacate(self.position);
            }
        }

        Damage {
            incoming,
            applied,
            dealt: before - self.health,
            killed: was_alive && !self.alive,
        }
    }

    /// Restore health up to max. Returns the amount restored. Dead agents stay dead.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.alive {
            return 0;
        }
        let before = self.health;
        self.health = (self.health + amount.max(0)).min(self.max_health);
        self.health - before
    }
}
