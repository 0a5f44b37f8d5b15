//! Simulation output and serialization
//!
//! Everything here reads a finished or running `Simulation` and never mutates
//! it: per-turn history samples, the final report, and text renderings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::core::types::Turn;
use crate::simulation::stats::SimulationStats;
use crate::simulation::tick::{Phase, Simulation};

/// One sample of the headline numbers, taken after a turn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: Turn,
    pub protagonist_health: i32,
    pub protagonist_stamina: i32,
    pub protagonist_reputation: i32,
    pub clan_honor: i32,
    pub antagonist_health: i32,
    pub monsters_alive: usize,
}

impl TurnRecord {
    pub fn capture(sim: &Simulation) -> Self {
        let protagonist = sim.protagonist();
        Self {
            turn: sim.turn(),
            protagonist_health: protagonist.health(),
            protagonist_stamina: protagonist.stamina().unwrap_or(0),
            protagonist_reputation: protagonist.reputation().unwrap_or(0),
            clan_honor: sim.clan_honor(),
            antagonist_health: sim.antagonist().health(),
            monsters_alive: sim.monsters_alive(),
        }
    }
}

/// Ordered series of turn samples
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct History {
    pub records: Vec<TurnRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sim: &Simulation) {
        self.records.push(TurnRecord::capture(sim));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// How the encounter ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
    /// Turn cap reached with both principals alive
    Unresolved,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Victory => "VICTORY",
            Outcome::Defeat => "DEFEAT",
            Outcome::Unresolved => "UNRESOLVED",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinalReport {
    pub turns: Turn,
    pub protagonist_name: String,
    pub protagonist_alive: bool,
    pub protagonist_health: i32,
    pub protagonist_max_health: i32,
    pub protagonist_reputation: i32,
    pub trophies: Vec<String>,
    pub clan_honor: i32,
    pub antagonist_name: String,
    pub antagonist_alive: bool,
    pub antagonist_health: i32,
    pub outcome: Outcome,
    pub statistics: SimulationStats,
}

impl FinalReport {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let protagonist = sim.protagonist();
        let antagonist = sim.antagonist();

        let outcome = match sim.phase() {
            Phase::Victory => Outcome::Victory,
            Phase::Defeat => Outcome::Defeat,
            // Someone fell on the last turn before the cap
            Phase::Running if !protagonist.is_alive() => Outcome::Defeat,
            Phase::Running if sim.is_victory() || !antagonist.is_alive() => Outcome::Victory,
            Phase::Running => Outcome::Unresolved,
        };

        Self {
            turns: sim.turn(),
            protagonist_name: protagonist.name.clone(),
            protagonist_alive: protagonist.is_alive(),
            protagonist_health: protagonist.health(),
            protagonist_max_health: protagonist.max_health(),
            protagonist_reputation: protagonist.reputation().unwrap_or(0),
            trophies: protagonist.trophies().to_vec(),
            clan_honor: sim.clan_honor(),
            antagonist_name: antagonist.name.clone(),
            antagonist_alive: antagonist.is_alive(),
            antagonist_health: antagonist.health(),
            outcome,
            statistics: sim.stats().clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        let status = |alive: bool| if alive { "Alive" } else { "Dead" };
        let trophies = if self.trophies.is_empty() {
            "none".to_string()
        } else {
            self.trophies.join(", ")
        };
        format!(
            "=== FINAL REPORT ===\n\
             Turns: {}\n\
             {}: {} ({}/{} health), reputation {}\n\
             Trophies: {}\n\
             Clan honor: {} ({:+})\n\
             {}: {} ({} health)\n\
             Kills: {} by {}, {} by hunters\n\
             Damage: {} dealt, {} taken\n\
             Outcome: {}",
            self.turns,
            self.protagonist_name,
            status(self.protagonist_alive),
            self.protagonist_health,
            self.protagonist_max_health,
            self.protagonist_reputation,
            trophies,
            self.clan_honor,
            self.statistics.net_honor_change(),
            self.antagonist_name,
            status(self.antagonist_alive),
            self.antagonist_health,
            self.statistics.protagonist_kills,
            self.protagonist_name,
            self.statistics.hunter_kills,
            self.statistics.protagonist_damage_dealt,
            self.statistics.protagonist_damage_taken,
            self.outcome.label(),
        )
    }
}

/// Multi-line status panel for periodic console output
pub fn status_panel(sim: &Simulation) -> String {
    let protagonist = sim.protagonist();
    let mut lines = vec![
        format!("--- Turn {} ---", sim.turn()),
        format!(
            "{}: health {}/{}, stamina {}, reputation {}, trophies {}",
            protagonist.name,
            protagonist.health(),
            protagonist.max_health(),
            protagonist.stamina().unwrap_or(0),
            protagonist.reputation().unwrap_or(0),
            protagonist.trophies().len()
        ),
        format!("Clan honor: {}", sim.clan_honor()),
    ];
    if let Some(companion) = sim.companion() {
        lines.push(format!(
            "{}: {}",
            companion.name,
            if companion.is_alive() { "Active" } else { "Destroyed" }
        ));
    }
    let antagonist = sim.antagonist();
    lines.push(format!(
        "{}: health {}/{}",
        antagonist.name,
        antagonist.health(),
        antagonist.max_health()
    ));
    lines.push(format!("Monsters alive: {}", sim.monsters_alive()));
    lines.join("\n")
}

/// ASCII map: occupant initials over terrain glyphs, one line per row
pub fn render_grid(sim: &Simulation) -> String {
    let mut out = String::with_capacity(((sim.grid().width() + 1) * sim.grid().height()) as usize);
    for row in sim.grid().rows() {
        for cell in row {
            let glyph = match cell.occupant() {
                Some(id) => sim.agent(id).map(|a| a.glyph()).unwrap_or('?'),
                None => cell.terrain().glyph(),
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}
