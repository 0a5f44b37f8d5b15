//! Terrain kinds and grid cells
//!
//! Terrain is fixed after generation; only the occupant slot changes during play.

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, Position};

/// Terrain kind of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    Open,
    SlowSand,
    Rocky,
    Trap,
    Hostile,
}

impl Terrain {
    /// Stamina spent by a mover entering a cell of this kind
    pub fn stamina_cost(&self) -> i32 {
        match self {
            Terrain::Open => 1,
            Terrain::SlowSand => 2,
            Terrain::Rocky => 3,
            Terrain::Trap => 1,
            Terrain::Hostile => 4,
        }
    }

    pub fn is_trap(&self) -> bool {
        matches!(self, Terrain::Trap)
    }

    /// Map glyph used by the text renderer
    pub fn glyph(&self) -> char {
        match self {
            Terrain::Open => '.',
            Terrain::SlowSand => '~',
            Terrain::Rocky => '^',
            Terrain::Trap => 'X',
            Terrain::Hostile => '#',
        }
    }
}

/// A single grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub position: Position,
    terrain: Terrain,
    stamina_cost: i32,
    trap: bool,
    occupant: Option<AgentId>,
}

impl Cell {
    pub fn new(position: Position, terrain: Terrain) -> Self {
        Self {
            position,
            terrain,
            stamina_cost: terrain.stamina_cost(),
            trap: terrain.is_trap(),
            occupant: None,
        }
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn stamina_cost(&self) -> i32 {
        self.stamina_cost
    }

    pub fn is_trap(&self) -> bool {
        self.trap
    }

    pub fn occupant(&self) -> Option<AgentId> {
        self.occupant
    }

    /// A cell is passable when nobody stands on it; terrain never blocks
    pub fn is_passable(&self) -> bool {
        self.occupant.is_none()
    }

    pub(crate) fn set_terrain(&mut self, terrain: Terrain) {
        self.terrain = terrain;
        self.stamina_cost = terrain.stamina_cost();
        self.trap = terrain.is_trap();
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<AgentId>) {
        self.occupant = occupant;
    }
}
