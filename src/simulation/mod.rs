//! Turn engine: decision, resolution, honor code, scheduling and reporting

pub mod action_execute;
pub mod action_select;
pub mod events;
pub mod output;
pub mod stats;
pub mod tick;
pub mod violation_detection;

pub use action_select::{select_action, Decide, WorldView};
pub use events::{ChallengeOutcome, Event, EventKind, EventLog};
pub use output::{render_grid, status_panel, FinalReport, History, Outcome, TurnRecord};
pub use stats::{ScoreChange, SimulationStats};
pub use tick::{Phase, Simulation};
pub use violation_detection::{evaluate_hunt, is_hunt_worthy, CodeViolation};
