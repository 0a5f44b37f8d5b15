//! Action execution - resolve one decided action against the world
//!
//! Every function here takes the whole simulation mutably and resolves a
//! single action for a single agent. Random draws come from the simulation's
//! one generator, in a fixed order per action.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::actions::catalog::Action;
use crate::core::types::{AgentId, Position};
use crate::entity::roles::{Role, RoleKind};
use crate::entity::Damage;
use crate::simulation::events::{ChallengeOutcome, EventKind};
use crate::simulation::tick::Simulation;
use crate::simulation::violation_detection::{evaluate_hunt, CodeViolation};

/// How a blow landed, for the event it produces
enum Blow {
    Attack(String),
    Counter,
    Trap(Position),
}

/// Resolve `action` for `actor`. Dead actors and mismatched role/action pairs
/// do nothing.
pub(crate) fn execute(sim: &mut Simulation, actor: AgentId, action: Action) {
    if !sim.agents[actor.index()].is_alive() {
        return;
    }

    match action {
        Action::Rest => rest(sim, actor),
        Action::MoveTowards(target) => move_towards(sim, actor, target),
        Action::Patrol => patrol(sim, actor),
        Action::Wander => wander(sim, actor),
        Action::PatrolTerritory => patrol_territory(sim, actor),
        Action::Hunt(target) => match sim.agents[actor.index()].kind() {
            RoleKind::Protagonist => protagonist_hunt(sim, actor, target),
            RoleKind::Hunter => hunter_hunt(sim, actor, target),
            _ => {}
        },
        Action::Fight(target) => fight(sim, actor, target),
        Action::Attack(target) => match sim.agents[actor.index()].kind() {
            RoleKind::Monster => monster_attack(sim, actor, target),
            RoleKind::Antagonist => antagonist_attack(sim, actor, target),
            _ => {}
        },
        Action::CarryCompanion => carry_companion(sim, actor),
        Action::Reconnaissance => reconnaissance(sim, actor),
        Action::Challenge(target) => challenge(sim, actor, target),
        Action::Idle => {}
    }
}

// ============================================================================
// Score bookkeeping
// ============================================================================

pub(crate) fn adjust_honor(sim: &mut Simulation, delta: i32, reason: &str) {
    sim.clan_honor += delta;
    sim.stats.record_honor(sim.turn, delta, reason);
}

/// Change the protagonist's reputation
pub(crate) fn adjust_reputation(sim: &mut Simulation, delta: i32, reason: &str) {
    let id = sim.cast.protagonist;
    if let Role::Protagonist(state) = sim.agents[id.index()].role_mut() {
        state.reputation += delta;
    }
    sim.stats.record_reputation(sim.turn, delta, reason);
}

fn spend_stamina(sim: &mut Simulation, actor: AgentId, amount: i32) {
    match sim.agents[actor.index()].role_mut() {
        Role::Protagonist(p) => p.stamina = (p.stamina - amount).max(0),
        Role::Hunter(h) => h.stamina = (h.stamina - amount).max(0),
        _ => {}
    }
}

fn claim_trophy(sim: &mut Simulation, actor: AgentId, prey: AgentId) {
    let trophy = sim.agents[prey.index()].name.clone();
    match sim.agents[actor.index()].role_mut() {
        Role::Protagonist(p) => p.trophies.push(trophy.clone()),
        Role::Hunter(h) => h.trophies.push(trophy.clone()),
        _ => return,
    }
    tracing::info!(
        "Turn {}: {} claims a trophy from {}",
        sim.turn,
        sim.agents[actor.index()].name,
        trophy
    );
    sim.events.push(
        sim.turn,
        EventKind::TrophyClaimed {
            agent: actor,
            trophy,
        },
    );
}

// ============================================================================
// Damage
// ============================================================================

/// Apply `amount` to `target` and log everything that follows from it
fn land_blow(
    sim: &mut Simulation,
    attacker: Option<AgentId>,
    target: AgentId,
    amount: i32,
    blow: Blow,
) -> Damage {
    let damage = sim.agents[target.index()].take_damage(amount, &mut sim.grid);
    let turn = sim.turn;

    if damage.applied != damage.incoming {
        sim.events.push(
            turn,
            EventKind::DamageReduced {
                agent: target,
                incoming: damage.incoming,
                applied: damage.applied,
            },
        );
    }

    let protagonist = sim.cast.protagonist;
    if attacker == Some(protagonist) {
        sim.stats.protagonist_damage_dealt += damage.dealt;
    }
    if target == protagonist {
        sim.stats.protagonist_damage_taken += damage.dealt;
    }

    let kind = match (blow, attacker) {
        (Blow::Attack(technique), Some(attacker)) => EventKind::Attacked {
            attacker,
            target,
            damage: damage.applied,
            technique,
        },
        (Blow::Counter, Some(attacker)) => EventKind::CounterAttack {
            attacker,
            target,
            damage: damage.applied,
        },
        (Blow::Trap(position), _) => EventKind::TrapTriggered {
            agent: target,
            position,
            damage: damage.applied,
        },
        (_, None) => EventKind::TrapTriggered {
            agent: target,
            position: sim.agents[target.index()].position(),
            damage: damage.applied,
        },
    };
    sim.events.push(turn, kind);

    if damage.killed {
        tracing::info!("Turn {}: {} has fallen", turn, sim.agents[target.index()].name);
        sim.events.push(
            turn,
            EventKind::Killed {
                victim: target,
                killer: attacker,
            },
        );
        if let Some(killer) = attacker {
            if killer == protagonist {
                sim.stats.protagonist_kills += 1;
            } else if sim.cast.hunters.contains(&killer) {
                sim.stats.hunter_kills += 1;
            }
        }
    }

    damage
}

// ============================================================================
// Movement
// ============================================================================

/// Move one cell into `to` if it is free, paying terrain cost and springing traps
///
/// Returns whether the agent moved. A blocked destination is a skipped move.
fn step_to(sim: &mut Simulation, actor: AgentId, to: Position) -> bool {
    let to = sim.grid.wrap(to);
    if !sim.grid.is_passable(to) {
        return false;
    }

    let from = sim.agents[actor.index()].position();
    let cost = match sim.grid.move_agent(&mut sim.agents, from, to) {
        Ok(cost) => cost,
        Err(err) => {
            tracing::warn!(
                "Turn {}: {} could not move from {} to {}: {}",
                sim.turn,
                sim.agents[actor.index()].name,
                from,
                to,
                err
            );
            return false;
        }
    };

    let surcharge = sim.config.protagonist.carry_surcharge;
    let (paid, carried) = match sim.agents[actor.index()].role_mut() {
        Role::Protagonist(p) => {
            let total = if p.carrying_companion {
                cost + surcharge
            } else {
                cost
            };
            p.stamina = (p.stamina - total).max(0);
            let carried = if p.carrying_companion { p.companion } else { None };
            (total, carried)
        }
        Role::Hunter(h) => {
            h.stamina = (h.stamina - cost).max(0);
            (cost, None)
        }
        _ => (0, None),
    };

    tracing::debug!(
        "Turn {}: {} moves {} -> {}",
        sim.turn,
        sim.agents[actor.index()].name,
        from,
        to
    );
    sim.events.push(
        sim.turn,
        EventKind::Moved {
            agent: actor,
            from,
            to,
            stamina_cost: paid,
        },
    );

    if let Some(companion) = carried {
        sim.agents[companion.index()].set_position(to);
    }

    // Only the protagonist springs traps
    let springs_traps = sim.agents[actor.index()].kind() == RoleKind::Protagonist;
    if springs_traps && sim.grid.cell_at(to).is_trap() {
        let damage = sim.config.terrain.trap_damage.roll(&mut sim.rng);
        tracing::info!(
            "Turn {}: {} triggers a trap at {}",
            sim.turn,
            sim.agents[actor.index()].name,
            to
        );
        land_blow(sim, None, actor, damage, Blow::Trap(to));
    }

    true
}

/// Minimum stamina needed to take a step, for roles that track it
fn movement_floor(sim: &Simulation, actor: AgentId) -> Option<i32> {
    match sim.agents[actor.index()].role() {
        Role::Protagonist(_) => Some(sim.config.protagonist.min_move_stamina),
        Role::Hunter(_) => Some(sim.config.hunter.min_move_stamina),
        _ => None,
    }
}

fn too_tired(sim: &Simulation, actor: AgentId) -> bool {
    match (movement_floor(sim, actor), sim.agents[actor.index()].stamina()) {
        (Some(floor), Some(stamina)) if stamina < floor => {
            tracing::debug!(
                "Turn {}: {} is too tired to move",
                sim.turn,
                sim.agents[actor.index()].name
            );
            true
        }
        _ => false,
    }
}

fn move_towards(sim: &mut Simulation, actor: AgentId, target: Position) {
    if too_tired(sim, actor) {
        return;
    }
    let next = sim.agents[actor.index()].position().step_towards(target);
    step_to(sim, actor, next);
}

/// Step into a random free orthogonal neighbour, if any
fn random_step(sim: &mut Simulation, actor: AgentId) {
    let here = sim.agents[actor.index()].position();
    let options = sim.grid.passable_neighbors(here);
    if let Some(&next) = options.choose(&mut sim.rng) {
        step_to(sim, actor, next);
    }
}

fn patrol(sim: &mut Simulation, actor: AgentId) {
    if too_tired(sim, actor) {
        return;
    }
    random_step(sim, actor);
}

fn wander(sim: &mut Simulation, actor: AgentId) {
    random_step(sim, actor);
}

/// Drift back inside the territory, or mill about within it
fn patrol_territory(sim: &mut Simulation, actor: AgentId) {
    let (center, radius) = match sim.agents[actor.index()].role() {
        Role::Antagonist(a) => (a.territory_center, a.territory_radius),
        _ => return,
    };
    let here = sim.agents[actor.index()].position();
    if sim.grid.toroidal_distance(here, center) > radius {
        move_towards(sim, actor, center);
    } else {
        random_step(sim, actor);
    }
}

// ============================================================================
// Protagonist
// ============================================================================

fn rest(sim: &mut Simulation, actor: AgentId) {
    let stamina_gain = sim.config.protagonist.rest_stamina_gain;
    let health_gain = sim.config.protagonist.rest_health_gain;

    let stamina_gained = match sim.agents[actor.index()].role_mut() {
        Role::Protagonist(p) => {
            let before = p.stamina;
            p.stamina = (p.stamina + stamina_gain).min(p.max_stamina);
            p.stamina - before
        }
        _ => return,
    };
    let health_gained = sim.agents[actor.index()].heal(health_gain);

    tracing::debug!(
        "Turn {}: {} rests (+{} stamina, +{} health)",
        sim.turn,
        sim.agents[actor.index()].name,
        stamina_gained,
        health_gained
    );
    sim.events.push(
        sim.turn,
        EventKind::Rested {
            agent: actor,
            health_gained,
            stamina_gained,
        },
    );
}

fn carry_companion(sim: &mut Simulation, actor: AgentId) {
    let companion = match sim.agents[actor.index()].role() {
        Role::Protagonist(p) if !p.carrying_companion => match p.companion {
            Some(id) => id,
            None => return,
        },
        _ => return,
    };

    let here = sim.agents[actor.index()].position();
    let companion_pos = sim.agents[companion.index()].position();
    if !sim.agents[companion.index()].is_alive()
        || sim.grid.toroidal_distance(here, companion_pos) > 1
    {
        return;
    }

    if sim.grid.occupant_at(companion_pos) == Some(companion) {
        sim.grid.vacate(companion_pos);
    }
    sim.agents[companion.index()].set_position(here);
    if let Role::Protagonist(p) = sim.agents[actor.index()].role_mut() {
        p.carrying_companion = true;
    }

    tracing::info!(
        "Turn {}: {} lifts {} onto their back",
        sim.turn,
        sim.agents[actor.index()].name,
        sim.agents[companion.index()].name
    );
    sim.events.push(
        sim.turn,
        EventKind::CompanionCarried {
            carrier: actor,
            companion,
        },
    );
}

/// Hunt a monster; weak prey is refused outright
fn protagonist_hunt(sim: &mut Simulation, actor: AgentId, prey: AgentId) {
    if !sim.agents[prey.index()].is_alive() {
        return;
    }
    let cfg = sim.config.protagonist.clone();

    let prey_health = sim.agents[prey.index()].health();
    if prey_health < cfg.refuse_hunt_below {
        if let Role::Protagonist(p) = sim.agents[actor.index()].role_mut() {
            p.violations.push(CodeViolation::AttemptedUnworthyHunt);
        }
        tracing::info!(
            "Turn {}: {} refuses to hunt {} ({} health)",
            sim.turn,
            sim.agents[actor.index()].name,
            sim.agents[prey.index()].name,
            prey_health
        );
        sim.events.push(
            sim.turn,
            EventKind::HuntRefused {
                hunter: actor,
                target: prey,
                target_health: prey_health,
            },
        );
        return;
    }

    let damage = cfg.hunt_damage.roll(&mut sim.rng);
    if sim.rng.gen::<f64>() < cfg.hunt_hit_chance {
        let blow = land_blow(sim, Some(actor), prey, damage, Blow::Attack("hunt".to_string()));
        if blow.killed {
            claim_trophy(sim, actor, prey);
            adjust_reputation(sim, cfg.hunt_kill_reputation, "hunt trophy");
            adjust_honor(sim, cfg.hunt_kill_honor, "hunt trophy");
        }
    } else {
        tracing::debug!(
            "Turn {}: {} misses {}",
            sim.turn,
            sim.agents[actor.index()].name,
            sim.agents[prey.index()].name
        );
        sim.events.push(
            sim.turn,
            EventKind::Missed {
                attacker: actor,
                target: prey,
            },
        );
    }
    spend_stamina(sim, actor, cfg.hunt_stamina_cost);

    if sim.agents[prey.index()].is_alive() && sim.rng.gen::<f64>() < cfg.counter_chance {
        let counter = cfg.counter_damage.roll(&mut sim.rng);
        land_blow(sim, Some(prey), actor, counter, Blow::Counter);
    }
}

/// Fight the antagonist, with better odds while carrying a live companion
fn fight(sim: &mut Simulation, actor: AgentId, target: AgentId) {
    if !sim.agents[target.index()].is_alive() {
        return;
    }
    let cfg = sim.config.protagonist.clone();

    let supporting = match sim.agents[actor.index()].role() {
        Role::Protagonist(p) if p.carrying_companion => p
            .companion
            .filter(|id| sim.agents[id.index()].is_alive()),
        Role::Protagonist(_) => None,
        _ => return,
    };

    let hit_chance = match supporting {
        Some(companion) => {
            sim.events.push(
                sim.turn,
                EventKind::TacticalSupport {
                    companion,
                    hit_chance: cfg.supported_fight_hit_chance,
                },
            );
            cfg.supported_fight_hit_chance
        }
        None => cfg.fight_hit_chance,
    };

    let damage = cfg.fight_damage.roll(&mut sim.rng);
    if sim.rng.gen::<f64>() < hit_chance {
        let blow = land_blow(sim, Some(actor), target, damage, Blow::Attack("fight".to_string()));
        if blow.killed {
            adjust_reputation(sim, cfg.fight_kill_reputation, "antagonist slain");
            adjust_honor(sim, cfg.fight_kill_honor, "antagonist slain");
            sim.victory = true;
            tracing::info!(
                "Turn {}: {} has slain {}",
                sim.turn,
                sim.agents[actor.index()].name,
                sim.agents[target.index()].name
            );
        }
    } else {
        tracing::debug!(
            "Turn {}: {} misses {}",
            sim.turn,
            sim.agents[actor.index()].name,
            sim.agents[target.index()].name
        );
        sim.events.push(
            sim.turn,
            EventKind::Missed {
                attacker: actor,
                target,
            },
        );
    }
    spend_stamina(sim, actor, cfg.fight_stamina_cost);
}

// ============================================================================
// Companion
// ============================================================================

/// Scan the surrounding window for traps not seen before
fn reconnaissance(sim: &mut Simulation, actor: AgentId) {
    let radius = sim.config.companion.scan_radius;
    let center = sim.agents[actor.index()].position();

    let mut traps = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let pos = sim.grid.wrap(center.offset(dx, dy));
            if sim.grid.cell_at(pos).is_trap() {
                traps.push(pos);
            }
        }
    }

    let found: Vec<Position> = match sim.agents[actor.index()].role_mut() {
        Role::Companion(c) => traps
            .into_iter()
            .filter(|pos| c.discovered_traps.insert(*pos))
            .collect(),
        _ => return,
    };

    tracing::debug!(
        "Turn {}: {} scans around {} ({} new traps)",
        sim.turn,
        sim.agents[actor.index()].name,
        center,
        found.len()
    );
    for position in found {
        tracing::info!(
            "Turn {}: {} detects a trap at {}",
            sim.turn,
            sim.agents[actor.index()].name,
            position
        );
        sim.events.push(
            sim.turn,
            EventKind::TrapDiscovered {
                scout: actor,
                position,
            },
        );
    }
}

// ============================================================================
// Hunters
// ============================================================================

/// Hunt a monster; the code is checked against the prey before the strike
fn hunter_hunt(sim: &mut Simulation, actor: AgentId, prey: AgentId) {
    if !sim.agents[prey.index()].is_alive() {
        return;
    }
    let cfg = sim.config.hunter.clone();

    let violations = evaluate_hunt(&sim.agents[prey.index()], &sim.config.honor);
    if !violations.is_empty() {
        if let Role::Hunter(h) = sim.agents[actor.index()].role_mut() {
            h.violations += 1;
        }
        tracing::info!(
            "Turn {}: {} hunts unworthy prey {}",
            sim.turn,
            sim.agents[actor.index()].name,
            sim.agents[prey.index()].name
        );
        sim.events.push(
            sim.turn,
            EventKind::CodeViolation {
                agent: actor,
                violations,
                reputation_delta: 0,
                honor_delta: 0,
            },
        );
    }

    let damage = cfg.damage.roll(&mut sim.rng);
    if sim.rng.gen::<f64>() < cfg.hit_chance {
        let blow = land_blow(sim, Some(actor), prey, damage, Blow::Attack("hunt".to_string()));
        if blow.killed {
            claim_trophy(sim, actor, prey);
            if let Role::Hunter(h) = sim.agents[actor.index()].role_mut() {
                h.reputation += cfg.kill_reputation;
            }
            adjust_honor(sim, cfg.kill_honor, "clan hunt");
        }
    } else {
        sim.events.push(
            sim.turn,
            EventKind::Missed {
                attacker: actor,
                target: prey,
            },
        );
    }
    spend_stamina(sim, actor, cfg.hunt_stamina_cost);
}

/// Judge the protagonist's standing against the challenger's
fn challenge(sim: &mut Simulation, actor: AgentId, target: AgentId) {
    let (violations, challenger_reputation) = match sim.agents[actor.index()].role() {
        Role::Hunter(h) => (h.violations, h.reputation),
        _ => return,
    };
    let target_reputation = sim.agents[target.index()].reputation().unwrap_or(0);
    let cfg = &sim.config.hunter;

    let (outcome, delta) = if violations > 0 {
        (
            ChallengeOutcome::ChallengerDishonored,
            -cfg.challenge_violator_penalty,
        )
    } else if target_reputation > challenger_reputation {
        (ChallengeOutcome::Worthy, cfg.challenge_worthy_reward)
    } else {
        (ChallengeOutcome::Unworthy, -cfg.challenge_unworthy_penalty)
    };

    adjust_reputation(sim, delta, "challenge");
    tracing::info!(
        "Turn {}: {} challenges {} ({:?}, {:+} reputation)",
        sim.turn,
        sim.agents[actor.index()].name,
        sim.agents[target.index()].name,
        outcome,
        delta
    );
    sim.events.push(
        sim.turn,
        EventKind::Challenge {
            challenger: actor,
            target,
            outcome,
            reputation_delta: delta,
        },
    );
}

// ============================================================================
// Monsters and antagonist
// ============================================================================

fn monster_attack(sim: &mut Simulation, actor: AgentId, target: AgentId) {
    if !sim.agents[target.index()].is_alive() {
        return;
    }
    let damage = sim.config.monster.damage.roll(&mut sim.rng);
    land_blow(sim, Some(actor), target, damage, Blow::Attack("claws".to_string()));
}

/// Strike with the next pattern in the cycle
fn antagonist_attack(sim: &mut Simulation, actor: AgentId, target: AgentId) {
    if !sim.agents[target.index()].is_alive() {
        return;
    }
    let count = sim.config.antagonist.attack_patterns.len();
    let index = match sim.agents[actor.index()].role_mut() {
        Role::Antagonist(a) => a.next_pattern(count),
        _ => return,
    };
    let Some(pattern) = sim.config.antagonist.attack_patterns.get(index).cloned() else {
        return;
    };

    let damage = pattern.damage.roll(&mut sim.rng);
    tracing::debug!(
        "Turn {}: {} uses {}",
        sim.turn,
        sim.agents[actor.index()].name,
        pattern.name
    );
    land_blow(sim, Some(actor), target, damage, Blow::Attack(pattern.name));
}
