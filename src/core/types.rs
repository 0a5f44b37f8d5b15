//! Core type definitions used throughout the codebase

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for agents (index into the simulation roster)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation turn counter
pub type Turn = u32;

/// Integer grid coordinate.
///
/// Positions may lie outside the grid; the grid wraps them on lookup.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// One step toward `target`, moving by the sign of the raw delta on each axis.
    ///
    /// The delta is taken on unwrapped coordinates, so the step never prefers
    /// the wrap-around direction.
    pub fn step_towards(self, target: Position) -> Self {
        self.offset((target.x - self.x).signum(), (target.y - self.y).signum())
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive integer range used for damage and health rolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRange {
    pub min: i32,
    pub max: i32,
}

impl RollRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn roll(&self, rng: &mut ChaCha8Rng) -> i32 {
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Half-open float range used for per-agent traits drawn at creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChanceRange {
    pub min: f64,
    pub max: f64,
}

impl ChanceRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn roll(&self, rng: &mut ChaCha8Rng) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..self.max)
    }
}
