//! Content factory for building combat content from data files.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::loaders::{
    BalanceLoader, LoadResult, Roster, RosterLoader, WeaponCatalog, WeaponLoader,
};

const EMBEDDED_WEAPONS: &str = include_str!("../../data/weapons.ron");
const EMBEDDED_ROSTER: &str = include_str!("../../data/roster.ron");
const EMBEDDED_BALANCE: &str = include_str!("../../data/balance.toml");

#[derive(Debug, Clone)]
enum ContentSource {
    Embedded,
    Directory(PathBuf),
}

/// Content factory that loads all combat content from a data directory, or
/// from the catalog compiled into this crate.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── balance.toml
/// ├── roster.ron
/// └── weapons.ron
/// ```
#[derive(Debug, Clone)]
pub struct ContentFactory {
    source: ContentSource,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: ContentSource::Directory(data_dir.into()),
        }
    }

    /// Content built into the crate from `crates/game/content/data/`.
    pub fn embedded() -> Self {
        Self {
            source: ContentSource::Embedded,
        }
    }

    /// Load balance parameters from `balance.toml`.
    pub fn load_balance(&self) -> LoadResult<CombatConfig> {
        match &self.source {
            ContentSource::Embedded => BalanceLoader::parse(EMBEDDED_BALANCE),
            ContentSource::Directory(dir) => BalanceLoader::load(&dir.join("balance.toml")),
        }
    }

    /// Load the weapon catalog from `weapons.ron`, validated under the
    /// band tolerance from `balance.toml`.
    pub fn load_weapons(&self) -> LoadResult<WeaponCatalog> {
        let config = self.load_balance()?;
        self.load_weapons_with(&config)
    }

    /// Load the weapon catalog under an already loaded balance.
    pub fn load_weapons_with(&self, config: &CombatConfig) -> LoadResult<WeaponCatalog> {
        match &self.source {
            ContentSource::Embedded => WeaponLoader::parse(EMBEDDED_WEAPONS, config),
            ContentSource::Directory(dir) => WeaponLoader::load(&dir.join("weapons.ron"), config),
        }
    }

    /// Load combatant templates from `roster.ron`.
    pub fn load_roster(&self) -> LoadResult<Roster> {
        match &self.source {
            ContentSource::Embedded => RosterLoader::parse(EMBEDDED_ROSTER),
            ContentSource::Directory(dir) => RosterLoader::load(&dir.join("roster.ron")),
        }
    }

    /// Returns the data directory path, or `None` for embedded content.
    pub fn data_dir(&self) -> Option<&Path> {
        match &self.source {
            ContentSource::Embedded => None,
            ContentSource::Directory(dir) => Some(dir),
        }
    }
}
