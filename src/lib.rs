//! Badlands - turn-based hunt simulation on a toroidal grid
//!
//! A protagonist, a carried support companion, rival clan hunters, roaming
//! monsters and a boss antagonist act in a fixed order each turn. Movement,
//! combat and an honor-code check resolve against a single seeded random
//! stream until the protagonist or the antagonist falls.

pub mod actions;
pub mod core;
pub mod entity;
pub mod simulation;
pub mod spatial;

pub use crate::actions::Action;
pub use crate::core::{AgentId, EngineConfig, HuntError, Position, Result};
pub use crate::entity::{Agent, Roster};
pub use crate::simulation::{FinalReport, History, Phase, Simulation};
pub use crate::spatial::Grid;
