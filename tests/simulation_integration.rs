//! Simulation integration tests
//!
//! End-to-end scenarios driven only through the public API: construction,
//! `step()`, explicit `apply()`, the event log and the report surface.

use badlands::actions::Action;
use badlands::core::config::TerrainConfig;
use badlands::core::types::RollRange;
use badlands::entity::SocialRole;
use badlands::simulation::{EventKind, Outcome, Phase};
use badlands::spatial::Terrain;
use badlands::{EngineConfig, Grid, HuntError, Position, Roster, Simulation};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn open_config() -> EngineConfig {
    EngineConfig {
        terrain: TerrainConfig::open(),
        ..EngineConfig::default()
    }
}

fn build(grid: Grid, roster: &Roster, config: EngineConfig, seed: u64) -> Simulation {
    Simulation::with_grid(grid, roster, config, ChaCha8Rng::seed_from_u64(seed)).unwrap()
}

// ============================================================================
// Terminal conditions
// ============================================================================

#[test]
fn test_forced_fight_ends_in_victory() {
    let mut config = open_config();
    config.protagonist.fight_hit_chance = 1.0;
    config.antagonist.max_health = 10;
    config.antagonist.resilience = 0.0;
    let roster = Roster::new(Position::new(0, 0), Position::new(4, 4));
    let mut sim = build(Grid::new(5, 5), &roster, config, 5);

    assert!(sim.step());
    let boss = sim.antagonist();
    assert_eq!(boss.health(), 0);
    assert!(!boss.is_alive());
    assert_eq!(sim.grid().occupant_at(Position::new(4, 4)), None);
    assert!(sim.is_victory());

    assert!(!sim.step());
    assert!(!sim.step());
    assert_eq!(sim.phase(), Phase::Victory);
    assert_eq!(sim.turn(), 1);

    let victories = sim
        .events()
        .iter()
        .filter(|e| matches!(e.kind, EventKind::Victory))
        .count();
    assert_eq!(victories, 1);

    let report = sim.final_report();
    assert_eq!(report.outcome, Outcome::Victory);
    assert_eq!(report.clan_honor, 150);
    assert_eq!(report.protagonist_reputation, 100);
}

#[test]
fn test_finished_run_is_frozen() {
    let mut sim = Simulation::from_seed(25, 25, &Roster::badlands(), EngineConfig::default(), 42)
        .unwrap();
    let phase = sim.run(500);
    assert!(phase.is_terminal() || sim.turn() == 500);

    if phase.is_terminal() {
        let turn = sim.turn();
        let events = sim.events().len();
        let snapshot: Vec<(i32, Position, bool)> = sim
            .agents()
            .iter()
            .map(|a| (a.health(), a.position(), a.is_alive()))
            .collect();

        assert!(!sim.step());

        assert_eq!(sim.turn(), turn);
        assert_eq!(sim.events().len(), events);
        let after: Vec<(i32, Position, bool)> = sim
            .agents()
            .iter()
            .map(|a| (a.health(), a.position(), a.is_alive()))
            .collect();
        assert_eq!(after, snapshot);
    }
}

// ============================================================================
// Honor code
// ============================================================================

#[test]
fn test_hunt_on_weak_monster_is_refused() {
    let mut config = open_config();
    config.monster.health = RollRange::new(15, 15);
    let roster = Roster::new(Position::new(0, 0), Position::new(10, 10))
        .with_monster("Monster_1", Position::new(1, 0));
    let mut sim = build(Grid::new(20, 20), &roster, config, 3);
    let dek = sim.cast().protagonist;
    let monster = sim.cast().monsters[0];

    sim.apply(dek, Action::Hunt(monster));

    assert_eq!(sim.agent(monster).unwrap().health(), 15);
    assert_eq!(sim.protagonist().stamina(), Some(100));
    assert_eq!(sim.stats().protagonist_damage_dealt, 0);
    assert!(sim.events().iter().any(|e| matches!(
        e.kind,
        EventKind::HuntRefused {
            target_health: 15,
            ..
        }
    )));
}

#[test]
fn test_challenge_fires_once_reputation_collapses() {
    let mut config = open_config();
    config.protagonist.starting_reputation = 0;
    config.hunter.challenge_chance = 1.0;
    let roster = Roster::new(Position::new(0, 0), Position::new(12, 12)).with_hunter(
        "Father",
        Position::new(6, 6),
        SocialRole::Elder,
    );
    let mut sim = build(Grid::new(25, 25), &roster, config, 8);

    assert!(sim.step());

    let challenge = sim
        .events()
        .iter()
        .find_map(|e| match e.kind {
            EventKind::Challenge {
                reputation_delta, ..
            } => Some(reputation_delta),
            _ => None,
        });
    assert_eq!(challenge, Some(-10));
    assert_eq!(sim.protagonist().reputation(), Some(-10));
}

// ============================================================================
// Movement
// ============================================================================

#[test]
fn test_exhausted_hunter_refuses_costly_move() {
    let mut config = open_config();
    config.hunter.max_stamina = 3;
    let mut grid = Grid::new(10, 10);
    grid.set_terrain(Position::new(6, 5), Terrain::Hostile);
    let roster = Roster::new(Position::new(0, 0), Position::new(9, 0)).with_hunter(
        "Brother",
        Position::new(5, 5),
        SocialRole::Peer,
    );
    let mut sim = build(grid, &roster, config, 1);
    let brother = sim.cast().hunters[0];

    sim.apply(brother, Action::MoveTowards(Position::new(8, 5)));

    let hunter = sim.agent(brother).unwrap();
    assert_eq!(hunter.position(), Position::new(5, 5));
    assert_eq!(hunter.stamina(), Some(3));
    assert!(sim.events().is_empty());
}

#[test]
fn test_sequential_moves_into_one_cell() {
    let config = open_config();
    let roster = Roster::new(Position::new(0, 0), Position::new(9, 9))
        .with_hunter("Father", Position::new(2, 4), SocialRole::Elder)
        .with_hunter("Brother", Position::new(4, 4), SocialRole::Peer);
    let mut sim = build(Grid::new(10, 10), &roster, config, 2);
    let father = sim.cast().hunters[0];
    let brother = sim.cast().hunters[1];

    sim.apply(father, Action::MoveTowards(Position::new(3, 4)));
    sim.apply(brother, Action::MoveTowards(Position::new(3, 4)));

    assert_eq!(sim.grid().occupant_at(Position::new(3, 4)), Some(father));
    assert_eq!(sim.agent(brother).unwrap().position(), Position::new(4, 4));
    let occupied = sim
        .grid()
        .cells()
        .filter(|c| c.occupant().is_some())
        .count();
    assert_eq!(occupied, sim.agents().len());
}

#[test]
fn test_moves_wrap_around_edges() {
    let config = open_config();
    let roster = Roster::new(Position::new(0, 0), Position::new(5, 5));
    let mut sim = build(Grid::new(10, 10), &roster, config, 4);
    let dek = sim.cast().protagonist;

    sim.apply(dek, Action::MoveTowards(Position::new(-3, 0)));

    assert_eq!(sim.protagonist().position(), Position::new(9, 0));
    assert_eq!(sim.grid().occupant_at(Position::new(9, 0)), Some(dek));
}

// ============================================================================
// Construction and configuration
// ============================================================================

#[test]
fn test_constructor_rejects_collisions_and_strays() {
    let roster = Roster::new(Position::new(3, 3), Position::new(3, 3));
    let result = Simulation::with_grid(
        Grid::new(5, 5),
        &roster,
        EngineConfig::default(),
        ChaCha8Rng::seed_from_u64(0),
    );
    assert!(matches!(result, Err(HuntError::Occupied { x: 3, y: 3 })));

    let roster = Roster::new(Position::new(0, 0), Position::new(0, 9));
    let result = Simulation::from_seed(5, 5, &roster, EngineConfig::default(), 0);
    assert!(matches!(result, Err(HuntError::OutOfBounds { x: 0, y: 9 })));
}

#[test]
fn test_constructor_rejects_empty_grid() {
    let result = Simulation::from_seed(0, 25, &Roster::badlands(), EngineConfig::default(), 42);
    assert!(matches!(result, Err(HuntError::InvalidConfig(_))));

    let result = Simulation::from_seed(25, -1, &Roster::badlands(), EngineConfig::default(), 42);
    assert!(matches!(result, Err(HuntError::InvalidConfig(_))));
}

#[test]
fn test_partial_toml_overrides_defaults() {
    let config = EngineConfig::from_toml_str(
        r#"
        [protagonist]
        fight_hit_chance = 0.9

        [antagonist]
        resilience = 0.5
        "#,
    )
    .unwrap();
    assert_eq!(config.protagonist.fight_hit_chance, 0.9);
    assert_eq!(config.protagonist.hunt_hit_chance, 0.75);
    assert_eq!(config.antagonist.resilience, 0.5);
    assert_eq!(config.antagonist.max_health, 300);

    let bad = EngineConfig::from_toml_str("[hunter]\nhit_chance = 1.5\n");
    assert!(matches!(bad, Err(HuntError::InvalidConfig(_))));
}

// ============================================================================
// Determinism and reporting
// ============================================================================

#[test]
fn test_same_seed_same_story() {
    let run = |seed: u64| {
        let mut sim =
            Simulation::from_seed(25, 25, &Roster::badlands(), EngineConfig::default(), seed)
                .unwrap();
        sim.run(120);
        (
            sim.turn(),
            sim.events().len(),
            sim.final_report().to_json().unwrap(),
        )
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn test_full_run_respects_invariants() {
    let mut sim = Simulation::from_seed(25, 25, &Roster::badlands(), EngineConfig::default(), 7)
        .unwrap();
    let mut history = badlands::History::new();

    while sim.turn() < 200 && sim.step() {
        history.record(&sim);
        for agent in sim.agents() {
            assert!((0..=agent.max_health()).contains(&agent.health()));
            assert_eq!(agent.health() == 0, !agent.is_alive());
            if let Some(stamina) = agent.stamina() {
                assert!(stamina >= 0);
            }
        }
    }

    assert_eq!(history.len() as u32, sim.turn());
    let json = history.to_json().unwrap();
    assert!(json.contains("clan_honor"));

    let report = sim.final_report();
    assert_eq!(report.turns, sim.turn());
    assert!(report.summary().contains(report.outcome.label()));
}
