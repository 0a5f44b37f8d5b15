pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{HuntError, Result};
pub use types::{AgentId, ChanceRange, Position, RollRange, Turn};
