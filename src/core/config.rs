//! Engine configuration with documented rule constants
//!
//! Every probability, threshold and damage roll used by the decision and
//! resolution layers lives here. Defaults reproduce the stock badlands rules;
//! a TOML file may override any subset of them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{HuntError, Result};
use crate::core::types::{ChanceRange, RollRange};

/// Terrain generation and hazard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Fraction of cells sampled as slow sand (cost 2)
    pub slow_sand_fraction: f64,
    /// Fraction of cells sampled as rocky ground (cost 3)
    pub rocky_fraction: f64,
    /// Fraction of cells sampled as traps (cost 1, deals damage)
    pub trap_fraction: f64,
    /// Fraction of cells sampled as hostile hazard (cost 4)
    pub hostile_fraction: f64,
    /// Damage dealt to a stamina-bearing mover that steps onto a trap
    pub trap_damage: RollRange,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            slow_sand_fraction: 0.20,
            rocky_fraction: 0.15,
            trap_fraction: 0.05,
            hostile_fraction: 0.10,
            trap_damage: RollRange::new(10, 20),
        }
    }
}

impl TerrainConfig {
    /// Flat terrain with no hazards, used by scenario setups
    pub fn open() -> Self {
        Self {
            slow_sand_fraction: 0.0,
            rocky_fraction: 0.0,
            trap_fraction: 0.0,
            hostile_fraction: 0.0,
            ..Self::default()
        }
    }
}

/// Protagonist decision thresholds and combat numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtagonistConfig {
    pub max_health: i32,
    pub max_stamina: i32,
    pub starting_reputation: i32,

    // === RESTING ===
    /// Rest when health drops below this...
    pub rest_health_below: i32,
    /// ...and stamina is still above this
    pub rest_stamina_above: i32,
    pub rest_stamina_gain: i32,
    pub rest_health_gain: i32,

    // === COMPANION ===
    /// Go fetch the companion when it is within this many cells
    pub companion_radius: i32,
    /// Extra stamina spent per move while carrying the companion
    pub carry_surcharge: i32,

    // === MOVEMENT ===
    /// Below this stamina the protagonist refuses to move
    pub min_move_stamina: i32,
    /// Approach the antagonist only above these health/stamina levels
    pub approach_health_above: i32,
    pub approach_stamina_above: i32,

    // === HUNTING ===
    /// Consider monsters only when stamina is above this
    pub hunt_stamina_above: i32,
    /// A monster is worth stalking when its health is above this
    pub worthy_monster_health_above: i32,
    pub hunt_range: i32,
    /// Refuse to strike a monster whose health is below this
    pub refuse_hunt_below: i32,
    pub hunt_hit_chance: f64,
    pub hunt_damage: RollRange,
    pub hunt_stamina_cost: i32,
    pub counter_chance: f64,
    pub counter_damage: RollRange,
    pub hunt_kill_reputation: i32,
    pub hunt_kill_honor: i32,

    // === FIGHTING THE ANTAGONIST ===
    pub fight_range: i32,
    pub fight_hit_chance: f64,
    /// Hit chance while carrying a living companion
    pub supported_fight_hit_chance: f64,
    pub fight_damage: RollRange,
    pub fight_stamina_cost: i32,
    pub fight_kill_reputation: i32,
    pub fight_kill_honor: i32,
}

impl Default for ProtagonistConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_stamina: 100,
            starting_reputation: 50,

            rest_health_below: 40,
            rest_stamina_above: 20,
            rest_stamina_gain: 15,
            rest_health_gain: 5,

            companion_radius: 5,
            carry_surcharge: 2,

            min_move_stamina: 3,
            approach_health_above: 60,
            approach_stamina_above: 40,

            hunt_stamina_above: 30,
            worthy_monster_health_above: 30,
            hunt_range: 2,
            refuse_hunt_below: 20,
            hunt_hit_chance: 0.75,
            hunt_damage: RollRange::new(25, 45),
            hunt_stamina_cost: 12,
            counter_chance: 0.4,
            counter_damage: RollRange::new(10, 25),
            hunt_kill_reputation: 10,
            hunt_kill_honor: 5,

            fight_range: 2,
            fight_hit_chance: 0.6,
            supported_fight_hit_chance: 0.75,
            fight_damage: RollRange::new(30, 50),
            fight_stamina_cost: 15,
            fight_kill_reputation: 50,
            fight_kill_honor: 100,
        }
    }
}

/// Rival hunter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HunterConfig {
    pub max_health: i32,
    pub max_stamina: i32,
    pub starting_reputation: i32,
    /// Challenges are only considered while the protagonist's reputation is below this
    pub challenge_reputation_below: i32,
    pub challenge_chance: f64,
    /// Chance per turn of going after a monster when any are alive
    pub hunt_intent_chance: f64,
    pub hunt_range: i32,
    pub min_move_stamina: i32,
    pub hit_chance: f64,
    pub damage: RollRange,
    pub hunt_stamina_cost: i32,
    pub kill_reputation: i32,
    pub kill_honor: i32,
    /// Reputation lost by the protagonist when the challenger carries violations
    pub challenge_violator_penalty: i32,
    /// Reputation gained by the protagonist when it out-ranks the challenger
    pub challenge_worthy_reward: i32,
    pub challenge_unworthy_penalty: i32,
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_stamina: 100,
            starting_reputation: 80,
            challenge_reputation_below: 30,
            challenge_chance: 0.3,
            hunt_intent_chance: 0.4,
            hunt_range: 2,
            min_move_stamina: 5,
            hit_chance: 0.7,
            damage: RollRange::new(20, 40),
            hunt_stamina_cost: 10,
            kill_reputation: 5,
            kill_honor: 10,
            challenge_violator_penalty: 15,
            challenge_worthy_reward: 5,
            challenge_unworthy_penalty: 10,
        }
    }
}

/// Support companion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    pub max_health: i32,
    pub reconnaissance_chance: f64,
    /// Half-width of the square scanned for traps (3 = 7x7 window)
    pub scan_radius: i32,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            reconnaissance_chance: 0.2,
            scan_radius: 3,
        }
    }
}

/// Roaming monster settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Health (and max health) rolled once per monster at creation
    pub health: RollRange,
    /// Attack probability rolled once per monster at creation
    pub aggression: ChanceRange,
    pub attack_range: i32,
    pub damage: RollRange,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            health: RollRange::new(40, 80),
            aggression: ChanceRange::new(0.3, 0.8),
            attack_range: 2,
            damage: RollRange::new(15, 30),
        }
    }
}

/// One entry in the antagonist's attack cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackPattern {
    pub name: String,
    pub damage: RollRange,
}

impl AttackPattern {
    pub fn new(name: &str, min: i32, max: i32) -> Self {
        Self {
            name: name.to_string(),
            damage: RollRange::new(min, max),
        }
    }
}

/// Boss antagonist settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AntagonistConfig {
    pub max_health: i32,
    /// Fraction of incoming damage ignored (0.3 = takes 70%)
    pub resilience: f64,
    pub territory_radius: i32,
    pub attack_range: i32,
    /// Attack cycle; the index advances before each attack
    pub attack_patterns: Vec<AttackPattern>,
}

impl Default for AntagonistConfig {
    fn default() -> Self {
        Self {
            max_health: 300,
            resilience: 0.3,
            territory_radius: 5,
            attack_range: 3,
            attack_patterns: vec![
                AttackPattern::new("devastating strike", 35, 50),
                AttackPattern::new("area sweep", 25, 40),
                AttackPattern::new("crushing lunge", 30, 45),
            ],
        }
    }
}

/// Honor-code thresholds and penalties
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HonorConfig {
    pub starting_honor: i32,
    pub violation_reputation_penalty: i32,
    pub violation_honor_penalty: i32,
    /// Prey is worthy when its health is above this...
    pub worthy_min_health: i32,
    /// ...and above this fraction of its max health
    pub worthy_health_fraction: f64,
    /// Striking prey below this health harms the unworthy
    pub harm_unworthy_below: i32,
}

impl Default for HonorConfig {
    fn default() -> Self {
        Self {
            starting_honor: 50,
            violation_reputation_penalty: 10,
            violation_honor_penalty: 5,
            worthy_min_health: 20,
            worthy_health_fraction: 0.3,
            harm_unworthy_below: 15,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub terrain: TerrainConfig,
    pub protagonist: ProtagonistConfig,
    pub hunter: HunterConfig,
    pub companion: CompanionConfig,
    pub monster: MonsterConfig,
    pub antagonist: AntagonistConfig,
    pub honor: HonorConfig,
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let t = &self.terrain;
        let fractions = [
            ("terrain.slow_sand_fraction", t.slow_sand_fraction),
            ("terrain.rocky_fraction", t.rocky_fraction),
            ("terrain.trap_fraction", t.trap_fraction),
            ("terrain.hostile_fraction", t.hostile_fraction),
        ];
        for (name, value) in fractions {
            check_probability(name, value)?;
        }
        let total: f64 = fractions.iter().map(|(_, v)| v).sum();
        if total > 1.0 {
            return Err(invalid(format!(
                "terrain fractions sum to {:.2}, must be <= 1.0",
                total
            )));
        }

        let p = &self.protagonist;
        let h = &self.hunter;
        let probabilities = [
            ("protagonist.hunt_hit_chance", p.hunt_hit_chance),
            ("protagonist.counter_chance", p.counter_chance),
            ("protagonist.fight_hit_chance", p.fight_hit_chance),
            (
                "protagonist.supported_fight_hit_chance",
                p.supported_fight_hit_chance,
            ),
            ("hunter.challenge_chance", h.challenge_chance),
            ("hunter.hunt_intent_chance", h.hunt_intent_chance),
            ("hunter.hit_chance", h.hit_chance),
            (
                "companion.reconnaissance_chance",
                self.companion.reconnaissance_chance,
            ),
            ("antagonist.resilience", self.antagonist.resilience),
            ("honor.worthy_health_fraction", self.honor.worthy_health_fraction),
            ("monster.aggression.min", self.monster.aggression.min),
            ("monster.aggression.max", self.monster.aggression.max),
        ];
        for (name, value) in probabilities {
            check_probability(name, value)?;
        }
        if self.monster.aggression.min > self.monster.aggression.max {
            return Err(invalid("monster.aggression.min exceeds max".into()));
        }

        let mut ranges = vec![
            ("terrain.trap_damage", t.trap_damage),
            ("protagonist.hunt_damage", p.hunt_damage),
            ("protagonist.counter_damage", p.counter_damage),
            ("protagonist.fight_damage", p.fight_damage),
            ("hunter.damage", h.damage),
            ("monster.health", self.monster.health),
            ("monster.damage", self.monster.damage),
        ];
        for pattern in &self.antagonist.attack_patterns {
            ranges.push(("antagonist.attack_patterns", pattern.damage));
        }
        for (name, range) in ranges {
            if !range.is_ordered() || range.min < 0 {
                return Err(invalid(format!(
                    "{} must satisfy 0 <= min <= max (got {}..={})",
                    name, range.min, range.max
                )));
            }
        }
        if self.monster.health.min <= 0 {
            return Err(invalid("monster.health.min must be positive".into()));
        }

        let maxima = [
            ("protagonist.max_health", p.max_health),
            ("protagonist.max_stamina", p.max_stamina),
            ("hunter.max_health", h.max_health),
            ("hunter.max_stamina", h.max_stamina),
            ("companion.max_health", self.companion.max_health),
            ("antagonist.max_health", self.antagonist.max_health),
        ];
        for (name, value) in maxima {
            if value <= 0 {
                return Err(invalid(format!("{} must be positive (got {})", name, value)));
            }
        }

        if self.antagonist.attack_patterns.is_empty() {
            return Err(invalid("antagonist.attack_patterns must not be empty".into()));
        }
        if self.companion.scan_radius < 0 {
            return Err(invalid("companion.scan_radius must not be negative".into()));
        }

        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{} must be within [0, 1] (got {})", name, value)))
    }
}

fn invalid(message: String) -> HuntError {
    HuntError::InvalidConfig(message)
}
