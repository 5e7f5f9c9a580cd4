//! Deterministic combat rules shared across the runtime and content tools.
//!
//! `combat-core` defines the canonical dial-combat rules and exposes pure APIs:
//! - [`bands`] turns a weapon's base angular bands and an accuracy stat into
//!   per-combatant adjusted bands
//! - [`combat`] classifies a dial tap into a hit zone and computes damage
//! - [`session`] hosts the combat session state machine and its registry
//!
//! All session mutation flows through [`session::CombatSession::resolve`];
//! nothing here performs I/O, spawns tasks, or logs.
pub mod bands;
pub mod combat;
pub mod config;
pub mod error;
pub mod session;
pub mod zone;

pub use bands::{
    Accuracy, AccuracyAdjustedBands, BandError, BandWidths, WeaponBandProfile, WeaponPattern,
    ZoneMultipliers, adjust_bands,
};
pub use combat::{
    DamageScaling, DialAngle, ZoneHit, apply_damage, calculate_damage, effective_angle,
    locate_zone, resolve_zone,
};
pub use config::{BandCurve, CombatConfig};
pub use error::{DomainError, ErrorCategory, ErrorSeverity, GameError};
pub use session::{
    ActionIntent, ActionResult, CombatSession, Combatant, CombatantSnapshot, HealthThreshold,
    Loadout, RegistryError, ResolveOutcome, RewardHandoff, SessionError, SessionId,
    SessionRegistry, SessionStatus, Side, hp_percent,
};
pub use zone::{Zone, ZoneTable};
