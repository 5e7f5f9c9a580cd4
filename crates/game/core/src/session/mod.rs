//! Combat sessions: the state machine and the registry that owns them.
//!
//! A [`CombatSession`] owns both combatants' HP, the turn counter, the status,
//! and the append-only action history. The [`SessionRegistry`] addresses
//! sessions by [`SessionId`] and is the only thing that mutates them.

mod error;
mod machine;
mod registry;
mod types;

pub use error::{RegistryError, SessionError};
pub use machine::{CombatSession, Combatant, ResolveOutcome, RewardHandoff};
pub use registry::SessionRegistry;
pub use types::{
    ActionIntent, ActionResult, CombatantSnapshot, HealthThreshold, Loadout, SessionId,
    SessionStatus, Side, hp_percent,
};
