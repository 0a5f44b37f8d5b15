pub mod agent;
pub mod roles;
pub mod roster;

pub use agent::{Agent, Damage};
pub use roles::{
    AntagonistState, CompanionState, HunterState, MonsterState, ProtagonistState, Role, RoleKind,
    SocialRole,
};
pub use roster::{Cast, Roster};
