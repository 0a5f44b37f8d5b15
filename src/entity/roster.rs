//! Initial roster description and spawning
//!
//! A `Roster` names every agent and its starting cell. `spawn` turns it into
//! placed agents, in the fixed order protagonist, companion, hunters,
//! monsters, antagonist. That order is also the agent id order.

use rand_chacha::ChaCha8Rng;

use crate::core::config::EngineConfig;
use crate::core::error::{HuntError, Result};
use crate::core::types::{AgentId, Position};
use crate::entity::agent::Agent;
use crate::entity::roles::{
    AntagonistState, CompanionState, HunterState, MonsterState, ProtagonistState, Role, SocialRole,
};
use crate::spatial::Grid;

#[derive(Debug, Clone)]
pub struct CompanionSpec {
    pub name: String,
    pub position: Position,
    pub damaged: bool,
}

#[derive(Debug, Clone)]
pub struct HunterSpec {
    pub name: String,
    pub position: Position,
    pub social_role: SocialRole,
}

#[derive(Debug, Clone)]
pub struct MonsterSpec {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct Roster {
    pub protagonist_name: String,
    pub protagonist: Position,
    pub companion: Option<CompanionSpec>,
    pub hunters: Vec<HunterSpec>,
    pub monsters: Vec<MonsterSpec>,
    pub antagonist_name: String,
    pub antagonist: Position,
}

impl Roster {
    pub fn new(protagonist: Position, antagonist: Position) -> Self {
        Self {
            protagonist_name: "Dek".to_string(),
            protagonist,
            companion: None,
            hunters: Vec::new(),
            monsters: Vec::new(),
            antagonist_name: "Adversary".to_string(),
            antagonist,
        }
    }

    pub fn with_companion(mut self, position: Position, damaged: bool) -> Self {
        self.companion = Some(CompanionSpec {
            name: "Thia".to_string(),
            position,
            damaged,
        });
        self
    }

    pub fn with_hunter(mut self, name: &str, position: Position, social_role: SocialRole) -> Self {
        self.hunters.push(HunterSpec {
            name: name.to_string(),
            position,
            social_role,
        });
        self
    }

    pub fn with_monster(mut self, name: &str, position: Position) -> Self {
        self.monsters.push(MonsterSpec {
            name: name.to_string(),
            position,
        });
        self
    }

    /// The stock badlands line-up for a 25x25 grid
    pub fn badlands() -> Self {
        let monster_cells = [(10, 10), (15, 5), (5, 15), (12, 18), (8, 8)];
        let mut roster = Roster::new(Position::new(1, 1), Position::new(20, 20))
            .with_companion(Position::new(2, 2), true)
            .with_hunter("Father", Position::new(3, 3), SocialRole::Elder)
            .with_hunter("Brother", Position::new(4, 4), SocialRole::Peer);
        for (i, (x, y)) in monster_cells.into_iter().enumerate() {
            roster = roster.with_monster(&format!("Monster_{}", i + 1), Position::new(x, y));
        }
        roster
    }

    pub fn agent_count(&self) -> usize {
        2 + self.companion.iter().count() + self.hunters.len() + self.monsters.len()
    }
}

/// Agent ids grouped by role, in scheduling order
#[derive(Debug, Clone)]
pub struct Cast {
    pub protagonist: AgentId,
    pub companion: Option<AgentId>,
    pub hunters: Vec<AgentId>,
    pub monsters: Vec<AgentId>,
    pub antagonist: AgentId,
}

/// Build and place every agent described by the roster
///
/// Monster health and aggression are rolled here, one monster at a time.
pub fn spawn(
    roster: &Roster,
    config: &EngineConfig,
    grid: &mut Grid,
    rng: &mut ChaCha8Rng,
) -> Result<(Vec<Agent>, Cast)> {
    let mut agents: Vec<Agent> = Vec::with_capacity(roster.agent_count());
    let mut next_id = 0u32;
    let mut allocate = || {
        let id = AgentId(next_id);
        next_id += 1;
        id
    };

    let protagonist = allocate();
    let companion = roster.companion.as_ref().map(|_| allocate());
    let hunters: Vec<AgentId> = roster.hunters.iter().map(|_| allocate()).collect();
    let monsters: Vec<AgentId> = roster.monsters.iter().map(|_| allocate()).collect();
    let antagonist = allocate();

    let mut pending: Vec<(Agent, Position)> = Vec::with_capacity(roster.agent_count());

    pending.push((
        Agent::new(
            protagonist,
            roster.protagonist_name.clone(),
            config.protagonist.max_health,
            Role::Protagonist(ProtagonistState::new(config, companion)),
        ),
        roster.protagonist,
    ));

    if let (Some(id), Some(entry)) = (companion, &roster.companion) {
        pending.push((
            Agent::new(
                id,
                entry.name.clone(),
                config.companion.max_health,
                Role::Companion(CompanionState::new(entry.damaged)),
            ),
            entry.position,
        ));
    }

    for (&id, entry) in hunters.iter().zip(&roster.hunters) {
        pending.push((
            Agent::new(
                id,
                entry.name.clone(),
                config.hunter.max_health,
                Role::Hunter(HunterState::new(config, entry.social_role)),
            ),
            entry.position,
        ));
    }

    for (&id, entry) in monsters.iter().zip(&roster.monsters) {
        let aggression = config.monster.aggression.roll(rng);
        let health = config.monster.health.roll(rng);
        pending.push((
            Agent::new(id, entry.name.clone(), health, Role::Monster(MonsterState { aggression })),
            entry.position,
        ));
    }

    pending.push((
        Agent::new(
            antagonist,
            roster.antagonist_name.clone(),
            config.antagonist.max_health,
            Role::Antagonist(AntagonistState::new(config, roster.antagonist)),
        ),
        roster.antagonist,
    ));

    for (mut agent, position) in pending {
        if !grid.contains(position) {
            return Err(HuntError::OutOfBounds {
                x: position.x,
                y: position.y,
            });
        }
        grid.place(&mut agent, position)?;
        agents.push(agent);
    }

    Ok((
        agents,
        Cast {
            protagonist,
            companion,
            hunters,
            monsters,
            antagonist,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::roles::RoleKind;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_orders_ids_by_role() {
        let config = EngineConfig::default();
        let mut grid = Grid::new(25, 25);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let (agents, cast) = spawn(&Roster::badlands(), &config, &mut grid, &mut rng).unwrap();

        assert_eq!(agents.len(), 10);
        assert_eq!(cast.protagonist, AgentId(0));
        assert_eq!(cast.companion, Some(AgentId(1)));
        assert_eq!(cast.hunters, vec![AgentId(2), AgentId(3)]);
        assert_eq!(cast.monsters.len(), 5);
        assert_eq!(cast.antagonist, AgentId(9));
        for (i, agent) in agents.iter().enumerate() {
            assert_eq!(agent.id.index(), i);
            assert_eq!(grid.occupant_at(agent.position()), Some(agent.id));
        }
        assert_eq!(agents[9].kind(), RoleKind::Antagonist);
        assert_eq!(agents[9].health(), 300);
    }

    #[test]
    fn test_monster_traits_rolled_within_config() {
        let config = EngineConfig::default();
        let mut grid = Grid::new(25, 25);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let (agents, cast) = spawn(&Roster::badlands(), &config, &mut grid, &mut rng).unwrap();

        for id in cast.monsters {
            let monster = &agents[id.index()];
            assert!(config.monster.health.contains(monster.health()));
            assert_eq!(monster.health(), monster.max_health());
            match monster.role() {
                Role::Monster(m) => assert!((0.3..0.8).contains(&m.aggression)),
                other => panic!("expected monster, got {:?}", other.kind()),
            }
        }
    }

    #[test]
    fn test_collision_is_occupied_error() {
        let roster = Roster::new(Position::new(2, 2), Position::new(2, 2));
        let mut grid = Grid::new(5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = spawn(&roster, &EngineConfig::default(), &mut grid, &mut rng);
        assert!(matches!(result, Err(HuntError::Occupied { x: 2, y: 2 })));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let roster = Roster::new(Position::new(0, 0), Position::new(7, 1));
        let mut grid = Grid::new(5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = spawn(&roster, &EngineConfig::default(), &mut grid, &mut rng);
        assert!(matches!(result, Err(HuntError::OutOfBounds { x: 7, y: 1 })));
    }
}
