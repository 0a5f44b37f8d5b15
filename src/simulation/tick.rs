//! Tick system - orchestrates one simulation turn
//!
//! Each turn: terminal check -> protagonist -> honor-code check -> companion
//! -> hunters -> monsters -> antagonist. Every agent decides against the live
//! world, so effects of earlier agents are visible to later ones in the same
//! turn.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::actions::catalog::Action;
use crate::core::config::EngineConfig;
use crate::core::error::{HuntError, Result};
use crate::core::types::{AgentId, Turn};
use crate::entity::roster::{spawn, Roster};
use crate::entity::{Agent, Cast};
use crate::simulation::action_execute::execute;
use crate::simulation::action_select::{select_action, WorldView};
use crate::simulation::events::{EventKind, EventLog};
use crate::simulation::output::{FinalReport, TurnRecord};
use crate::simulation::stats::SimulationStats;
use crate::simulation::violation_detection::enforce_hunt_code;
use crate::spatial::Grid;

fn check_dimensions(width: i32, height: i32) -> Result<()> {
    if width <= 0 || height <= 0 {
        return Err(HuntError::InvalidConfig(format!(
            "grid dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    Victory,
    Defeat,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        self != Phase::Running
    }
}

/// The whole encounter: grid, agents, scores and the random stream
pub struct Simulation {
    pub(crate) grid: Grid,
    pub(crate) agents: Vec<Agent>,
    pub(crate) cast: Cast,
    pub(crate) config: EngineConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) turn: Turn,
    pub(crate) clan_honor: i32,
    /// Set the moment the antagonist falls, even mid-turn
    pub(crate) victory: bool,
    pub(crate) defeat: bool,
    phase: Phase,
    pub(crate) stats: SimulationStats,
    pub(crate) events: EventLog,
}

impl Simulation {
    /// Generate terrain, then place the roster on it
    pub fn new(
        width: i32,
        height: i32,
        roster: &Roster,
        config: EngineConfig,
        mut rng: ChaCha8Rng,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        config.validate()?;
        let grid = Grid::generate(width, height, &config.terrain, &mut rng);
        Self::with_grid(grid, roster, config, rng)
    }

    pub fn from_seed(
        width: i32,
        height: i32,
        roster: &Roster,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self> {
        Self::new(width, height, roster, config, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Place the roster on a prepared grid
    pub fn with_grid(
        mut grid: Grid,
        roster: &Roster,
        config: EngineConfig,
        mut rng: ChaCha8Rng,
    ) -> Result<Self> {
        check_dimensions(grid.width(), grid.height())?;
        config.validate()?;
        let (agents, cast) = spawn(roster, &config, &mut grid, &mut rng)?;

        tracing::info!(
            "Spawned {} agents on a {}x{} grid",
            agents.len(),
            grid.width(),
            grid.height()
        );

        Ok(Self {
            clan_honor: config.honor.starting_honor,
            grid,
            agents,
            cast,
            config,
            rng,
            turn: 0,
            victory: false,
            defeat: false,
            phase: Phase::Running,
            stats: SimulationStats::new(),
            events: EventLog::new(),
        })
    }

    // ------------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------------

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn clan_honor(&self) -> i32 {
        self.clan_honor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_victory(&self) -> bool {
        self.victory
    }

    pub fn is_defeat(&self) -> bool {
        self.defeat
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    pub fn cast(&self) -> &Cast {
        &self.cast
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn protagonist(&self) -> &Agent {
        &self.agents[self.cast.protagonist.index()]
    }

    pub fn antagonist(&self) -> &Agent {
        &self.agents[self.cast.antagonist.index()]
    }

    pub fn companion(&self) -> Option<&Agent> {
        self.cast.companion.map(|id| &self.agents[id.index()])
    }

    pub fn monsters_alive(&self) -> usize {
        self.cast
            .monsters
            .iter()
            .filter(|id| self.agents[id.index()].is_alive())
            .count()
    }

    pub fn view(&self) -> WorldView<'_> {
        WorldView {
            grid: &self.grid,
            agents: &self.agents,
            cast: &self.cast,
            config: &self.config,
        }
    }

    // ------------------------------------------------------------------------
    // Decide / apply
    // ------------------------------------------------------------------------

    /// Choose an action for `id` without changing the world (the random
    /// stream still advances)
    pub fn decide(&mut self, id: AgentId) -> Action {
        let view = WorldView {
            grid: &self.grid,
            agents: &self.agents,
            cast: &self.cast,
            config: &self.config,
        };
        select_action(&self.agents[id.index()], &view, &mut self.rng)
    }

    pub fn apply(&mut self, id: AgentId, action: Action) {
        execute(self, id, action);
    }

    fn act(&mut self, id: AgentId) -> Option<Action> {
        if !self.agents[id.index()].is_alive() {
            return None;
        }
        let action = self.decide(id);
        self.apply(id, action);
        Some(action)
    }

    // ------------------------------------------------------------------------
    // Scheduler
    // ------------------------------------------------------------------------

    /// Run one turn. Returns false once the encounter is over; a finished
    /// simulation is left untouched by further calls.
    pub fn step(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        if !self.protagonist().is_alive() {
            self.finish(Phase::Defeat);
            return false;
        }
        if !self.antagonist().is_alive() {
            self.finish(Phase::Victory);
            return false;
        }

        self.turn += 1;

        let protagonist = self.cast.protagonist;
        if let Some(Action::Hunt(prey)) = self.act(protagonist) {
            enforce_hunt_code(self, protagonist, prey);
        }

        if let Some(companion) = self.cast.companion {
            self.act(companion);
        }

        for i in 0..self.cast.hunters.len() {
            let id = self.cast.hunters[i];
            self.act(id);
        }

        for i in 0..self.cast.monsters.len() {
            let id = self.cast.monsters[i];
            self.act(id);
        }

        let antagonist = self.cast.antagonist;
        self.act(antagonist);

        true
    }

    /// Step until the encounter ends or `max_turns` turns have run
    pub fn run(&mut self, max_turns: Turn) -> Phase {
        while self.turn < max_turns && self.step() {}
        self.phase
    }

    fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        let kind = match phase {
            Phase::Victory => {
                self.victory = true;
                tracing::info!(
                    "Turn {}: VICTORY - {} has fallen",
                    self.turn,
                    self.antagonist().name
                );
                EventKind::Victory
            }
            Phase::Defeat => {
                self.defeat = true;
                tracing::info!(
                    "Turn {}: DEFEAT - {} has fallen",
                    self.turn,
                    self.protagonist().name
                );
                EventKind::Defeat
            }
            Phase::Running => return,
        };
        self.events.push(self.turn, kind);
    }

    // ------------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------------

    pub fn record_turn(&self) -> TurnRecord {
        TurnRecord::capture(self)
    }

    pub fn final_report(&self) -> FinalReport {
        FinalReport::from_simulation(self)
    }
}
