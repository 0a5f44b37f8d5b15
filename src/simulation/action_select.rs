//! Action selection - one priority tree per role
//!
//! Selection only reads world state. Each tree is evaluated top to bottom and
//! the first matching branch decides the action. Randomness comes from the
//! single simulation stream passed in by the caller.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::actions::catalog::Action;
use crate::core::config::EngineConfig;
use crate::core::types::{AgentId, Position};
use crate::entity::roles::{
    AntagonistState, CompanionState, HunterState, MonsterState, ProtagonistState, Role,
};
use crate::entity::{Agent, Cast};
use crate::spatial::Grid;

/// Read-only view of the simulation handed to selection
pub struct WorldView<'a> {
    pub grid: &'a Grid,
    pub agents: &'a [Agent],
    pub cast: &'a Cast,
    pub config: &'a EngineConfig,
}

impl<'a> WorldView<'a> {
    pub fn agent(&self, id: AgentId) -> &'a Agent {
        &self.agents[id.index()]
    }

    pub fn distance(&self, a: Position, b: Position) -> i32 {
        self.grid.toroidal_distance(a, b)
    }

    pub fn living_monsters(&self) -> impl Iterator<Item = &'a Agent> + '_ {
        self.cast
            .monsters
            .iter()
            .map(|&id| self.agent(id))
            .filter(|m| m.is_alive())
    }

    /// Closest candidate to `from`; ties go to the earliest candidate
    pub fn nearest<I>(&self, from: Position, candidates: I) -> Option<(&'a Agent, i32)>
    where
        I: Iterator<Item = &'a Agent>,
    {
        candidates
            .map(|a| (a, self.distance(from, a.position())))
            .min_by_key(|(_, d)| *d)
    }
}

/// Capability shared by every role record: choose one action for this turn
pub trait Decide {
    fn decide(&self, me: &Agent, view: &WorldView<'_>, rng: &mut ChaCha8Rng) -> Action;
}

/// Select an action for any agent by dispatching on its role
pub fn select_action(me: &Agent, view: &WorldView<'_>, rng: &mut ChaCha8Rng) -> Action {
    match me.role() {
        Role::Protagonist(state) => state.decide(me, view, rng),
        Role::Companion(state) => state.decide(me, view, rng),
        Role::Hunter(state) => state.decide(me, view, rng),
        Role::Monster(state) => state.decide(me, view, rng),
        Role::Antagonist(state) => state.decide(me, view, rng),
    }
}

impl Decide for ProtagonistState {
    /// 1. Rest when hurt but not spent
    /// 2. Fetch or pick up the companion when it is close
    /// 3. Fight the antagonist in reach, or close in when fit
    /// 4. Stalk the nearest worthy monster
    /// 5. Head for the antagonist
    /// 6. Rest
    fn decide(&self, me: &Agent, view: &WorldView<'_>, _rng: &mut ChaCha8Rng) -> Action {
        let cfg = &view.config.protagonist;
        let here = me.position();

        if me.health() < cfg.rest_health_below && self.stamina > cfg.rest_stamina_above {
            return Action::Rest;
        }

        if let Some(companion) = self.companion.map(|id| view.agent(id)) {
            if companion.is_alive() && !self.carrying_companion {
                let dist = view.distance(here, companion.position());
                if dist <= 1 {
                    return Action::CarryCompanion;
                } else if dist <= cfg.companion_radius {
                    return Action::MoveTowards(companion.position());
                }
            }
        }

        let antagonist = view.agent(view.cast.antagonist);
        if antagonist.is_alive() {
            let dist = view.distance(here, antagonist.position());
            if dist <= cfg.fight_range {
                return Action::Fight(antagonist.id);
            } else if me.health() > cfg.approach_health_above
                && self.stamina > cfg.approach_stamina_above
            {
                return Action::MoveTowards(antagonist.position());
            }
        }

        if self.stamina > cfg.hunt_stamina_above {
            let worthy = view
                .living_monsters()
                .filter(|m| m.health() > cfg.worthy_monster_health_above);
            if let Some((prey, dist)) = view.nearest(here, worthy) {
                return if dist <= cfg.hunt_range {
                    Action::Hunt(prey.id)
                } else {
                    Action::MoveTowards(prey.position())
                };
            }
        }

        if antagonist.is_alive() {
            return Action::MoveTowards(antagonist.position());
        }

        Action::Rest
    }
}

impl Decide for CompanionState {
    fn decide(&self, _me: &Agent, view: &WorldView<'_>, rng: &mut ChaCha8Rng) -> Action {
        if rng.gen::<f64>() < view.config.companion.reconnaissance_chance {
            Action::Reconnaissance
        } else {
            Action::Idle
        }
    }
}

impl Decide for HunterState {
    /// The challenge roll only happens while the protagonist's reputation is
    /// low, and the hunt roll only while monsters remain.
    fn decide(&self, me: &Agent, view: &WorldView<'_>, rng: &mut ChaCha8Rng) -> Action {
        let cfg = &view.config.hunter;
        let here = me.position();

        let protagonist = view.agent(view.cast.protagonist);
        if let Some(reputation) = protagonist.reputation() {
            if reputation < cfg.challenge_reputation_below
                && rng.gen::<f64>() < cfg.challenge_chance
            {
                return Action::Challenge(protagonist.id);
            }
        }

        if view.living_monsters().next().is_some() && rng.gen::<f64>() < cfg.hunt_intent_chance {
            if let Some((prey, dist)) = view.nearest(here, view.living_monsters()) {
                return if dist <= cfg.hunt_range {
                    Action::Hunt(prey.id)
                } else {
                    Action::MoveTowards(prey.position())
                };
            }
        }

        Action::Patrol
    }
}

impl Decide for MonsterState {
    /// Anything alive counts as prey, other monsters included
    fn decide(&self, me: &Agent, view: &WorldView<'_>, rng: &mut ChaCha8Rng) -> Action {
        let others = view
            .agents
            .iter()
            .filter(|a| a.id != me.id && a.is_alive());

        if let Some((target, dist)) = view.nearest(me.position(), others) {
            if dist <= view.config.monster.attack_range && rng.gen::<f64>() < self.aggression {
                return Action::Attack(target.id);
            }
        }

        Action::Wander
    }
}

impl Decide for AntagonistState {
    fn decide(&self, me: &Agent, view: &WorldView<'_>, _rng: &mut ChaCha8Rng) -> Action {
        let protagonist = view.agent(view.cast.protagonist);
        if !protagonist.is_alive() {
            return Action::PatrolTerritory;
        }

        let dist = view.distance(me.position(), protagonist.position());
        if dist <= view.config.antagonist.attack_range {
            Action::Attack(protagonist.id)
        } else if dist <= self.territory_radius {
            Action::MoveTowards(protagonist.position())
        } else {
            Action::PatrolTerritory
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::roster::{spawn, Roster};
    use crate::entity::SocialRole;
    use rand::SeedableRng;

    struct Fixture {
        grid: Grid,
        agents: Vec<Agent>,
        cast: Cast,
        config: EngineConfig,
    }

    impl Fixture {
        fn new(roster: Roster, config: EngineConfig) -> Self {
            let mut grid = Grid::new(25, 25);
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            let (agents, cast) = spawn(&roster, &config, &mut grid, &mut rng).unwrap();
            Self {
                grid,
                agents,
                cast,
                config,
            }
        }

        fn decide(&self, id: AgentId, seed: u64) -> Action {
            let view = WorldView {
                grid: &self.grid,
                agents: &self.agents,
                cast: &self.cast,
                config: &self.config,
            };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            select_action(view.agent(id), &view, &mut rng)
        }

        fn protagonist_mut(&mut self) -> &mut ProtagonistState {
            match self.agents[self.cast.protagonist.index()].role_mut() {
                Role::Protagonist(p) => p,
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn test_protagonist_rests_when_hurt() {
        let mut fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(12, 12)),
            EngineConfig::default(),
        );
        let id = fx.cast.protagonist;
        fx.agents[id.index()].set_health(35);
        assert_eq!(fx.decide(id, 1), Action::Rest);

        fx.protagonist_mut().stamina = 20;
        assert_ne!(fx.decide(id, 1), Action::Rest);
    }

    #[test]
    fn test_protagonist_fetches_companion() {
        let fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(12, 12))
                .with_companion(Position::new(3, 1), true),
            EngineConfig::default(),
        );
        assert_eq!(
            fx.decide(fx.cast.protagonist, 1),
            Action::MoveTowards(Position::new(3, 1))
        );

        let fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(12, 12))
                .with_companion(Position::new(1, 0), true),
            EngineConfig::default(),
        );
        assert_eq!(fx.decide(fx.cast.protagonist, 1), Action::CarryCompanion);
    }

    #[test]
    fn test_protagonist_fights_antagonist_in_reach() {
        let fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(24, 24)),
            EngineConfig::default(),
        );
        assert_eq!(
            fx.decide(fx.cast.protagonist, 1),
            Action::Fight(fx.cast.antagonist)
        );
    }

    #[test]
    fn test_protagonist_hunts_only_worthy_monsters() {
        let mut fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(12, 12))
                .with_monster("Weak", Position::new(1, 0))
                .with_monster("Strong", Position::new(4, 0)),
            EngineConfig::default(),
        );
        let weak = fx.cast.monsters[0];
        let strong = fx.cast.monsters[1];
        fx.agents[weak.index()].set_health(25);
        fx.agents[strong.index()].set_health(60);
        fx.agents[fx.cast.protagonist.index()].set_health(50);

        assert_eq!(
            fx.decide(fx.cast.protagonist, 1),
            Action::MoveTowards(Position::new(4, 0))
        );

        fx.agents[weak.index()].set_health(40);
        assert_eq!(fx.decide(fx.cast.protagonist, 1), Action::Hunt(weak));
    }

    #[test]
    fn test_protagonist_defaults_to_antagonist() {
        let mut fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(12, 12)),
            EngineConfig::default(),
        );
        fx.agents[fx.cast.protagonist.index()].set_health(50);
        assert_eq!(
            fx.decide(fx.cast.protagonist, 1),
            Action::MoveTowards(Position::new(12, 12))
        );
    }

    #[test]
    fn test_hunter_challenges_only_low_reputation() {
        let mut config = EngineConfig::default();
        config.hunter.challenge_chance = 1.0;
        config.hunter.hunt_intent_chance = 0.0;
        let mut fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(12, 12)).with_hunter(
                "Father",
                Position::new(5, 5),
                SocialRole::Elder,
            ),
            config,
        );
        let hunter = fx.cast.hunters[0];
        assert_eq!(fx.decide(hunter, 1), Action::Patrol);

        fx.protagonist_mut().reputation = 29;
        assert_eq!(fx.decide(hunter, 1), Action::Challenge(fx.cast.protagonist));
    }

    #[test]
    fn test_hunter_goes_after_nearest_monster() {
        let mut config = EngineConfig::default();
        config.hunter.hunt_intent_chance = 1.0;
        let fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(12, 12))
                .with_hunter("Brother", Position::new(5, 5), SocialRole::Peer)
                .with_monster("Far", Position::new(10, 5))
                .with_monster("Near", Position::new(6, 6)),
            config,
        );
        assert_eq!(
            fx.decide(fx.cast.hunters[0], 1),
            Action::Hunt(fx.cast.monsters[1])
        );
    }

    #[test]
    fn test_monster_attack_depends_on_aggression() {
        let mut fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(12, 12))
                .with_monster("Monster_1", Position::new(1, 1)),
            EngineConfig::default(),
        );
        let monster = fx.cast.monsters[0];
        if let Role::Monster(m) = fx.agents[monster.index()].role_mut() {
            m.aggression = 1.0;
        }
        assert_eq!(fx.decide(monster, 1), Action::Attack(fx.cast.protagonist));

        if let Role::Monster(m) = fx.agents[monster.index()].role_mut() {
            m.aggression = 0.0;
        }
        assert_eq!(fx.decide(monster, 1), Action::Wander);
    }

    #[test]
    fn test_antagonist_tiers() {
        let fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(2, 1)),
            EngineConfig::default(),
        );
        assert_eq!(
            fx.decide(fx.cast.antagonist, 1),
            Action::Attack(fx.cast.protagonist)
        );

        let fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(3, 2)),
            EngineConfig::default(),
        );
        assert_eq!(
            fx.decide(fx.cast.antagonist, 1),
            Action::MoveTowards(Position::new(0, 0))
        );

        let fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(10, 10)),
            EngineConfig::default(),
        );
        assert_eq!(fx.decide(fx.cast.antagonist, 1), Action::PatrolTerritory);
    }

    #[test]
    fn test_companion_reconnaissance_rate() {
        let mut config = EngineConfig::default();
        config.companion.reconnaissance_chance = 1.0;
        let fx = Fixture::new(
            Roster::new(Position::new(0, 0), Position::new(12, 12))
                .with_companion(Position::new(9, 9), true),
            config,
        );
        let companion = fx.cast.companion.unwrap();
        assert_eq!(fx.decide(companion, 5), Action::Reconnaissance);
    }
}
