//! Data-driven combat content and loaders.
//!
//! This crate houses static combat content and provides loaders for RON/TOML data files:
//! - Weapon band profiles (data-driven via RON)
//! - Combatant roster (data-driven via RON)
//! - Balance parameters for the band curve (data-driven via TOML)
//!
//! The built-in catalog under `data/` is embedded at compile time, so the
//! runtime can start without touching the filesystem.
//!
//! All loaders use combat-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    BalanceLoader, CombatantTemplate, ContentFactory, Roster, RosterLoader, WeaponCatalog,
    WeaponLoader, WeaponSpec,
};
