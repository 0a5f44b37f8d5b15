//! Honor-code violation detection
//!
//! A hunt is judged against the clan code by looking at the prey. Prey that is
//! too weak to be a fair fight makes the hunt unworthy. Prey that is nearly
//! dead counts as harming the unworthy. Both may apply at once.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::config::HonorConfig;
use crate::core::types::AgentId;
use crate::entity::roles::Role;
use crate::entity::Agent;
use crate::simulation::action_execute::{adjust_honor, adjust_reputation};
use crate::simulation::events::EventKind;
use crate::simulation::tick::Simulation;

/// Types of code breach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeViolation {
    /// Prey was not a worthy opponent
    HuntedUnworthyPrey,
    /// Prey was already close to death
    HarmedTheUnworthy,
    /// Hunt was called off because the prey was too weak
    AttemptedUnworthyHunt,
}

impl fmt::Display for CodeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CodeViolation::HuntedUnworthyPrey => "Hunted unworthy prey",
            CodeViolation::HarmedTheUnworthy => "Harmed the unworthy",
            CodeViolation::AttemptedUnworthyHunt => "Attempted unworthy hunt",
        };
        f.write_str(text)
    }
}

/// Prey is worthy above an absolute floor and a fraction of its max health
pub fn is_hunt_worthy(prey: &Agent, honor: &HonorConfig) -> bool {
    prey.health() > honor.worthy_min_health
        && prey.health() as f64 > prey.max_health() as f64 * honor.worthy_health_fraction
}

pub fn harms_unworthy(prey: &Agent, honor: &HonorConfig) -> bool {
    prey.health() < honor.harm_unworthy_below
}

/// All code breaches a hunt on `prey` would commit, given its current health
pub fn evaluate_hunt(prey: &Agent, honor: &HonorConfig) -> Vec<CodeViolation> {
    let mut violations = Vec::new();
    if !is_hunt_worthy(prey, honor) {
        violations.push(CodeViolation::HuntedUnworthyPrey);
    }
    if harms_unworthy(prey, honor) {
        violations.push(CodeViolation::HarmedTheUnworthy);
    }
    violations
}

/// Judge the protagonist's hunt once it has resolved
///
/// Runs on the prey as it stands after the hunt, so a kill leaves the prey at
/// zero health and trips both checks. Any breach costs reputation and clan
/// honor once, whatever the number of breaches.
pub(crate) fn enforce_hunt_code(
    sim: &mut Simulation,
    hunter: AgentId,
    prey: AgentId,
) -> Vec<CodeViolation> {
    let violations = evaluate_hunt(&sim.agents[prey.index()], &sim.config.honor);
    if violations.is_empty() {
        return violations;
    }

    let reputation_delta = -sim.config.honor.violation_reputation_penalty;
    let honor_delta = -sim.config.honor.violation_honor_penalty;

    if let Role::Protagonist(state) = sim.agents[hunter.index()].role_mut() {
        state.violations.extend(violations.iter().copied());
    }
    adjust_reputation(sim, reputation_delta, "code violation");
    adjust_honor(sim, honor_delta, "code violation");

    let names: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
    tracing::info!(
        "Turn {}: {} broke the code ({})",
        sim.turn,
        sim.agents[hunter.index()].name,
        names.join(", ")
    );
    sim.events.push(
        sim.turn,
        EventKind::CodeViolation {
            agent: hunter,
            violations: violations.clone(),
            reputation_delta,
            honor_delta,
        },
    );

    violations
}
