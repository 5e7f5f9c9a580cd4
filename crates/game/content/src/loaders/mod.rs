//! Content loaders for reading combat data from files.
//!
//! Every loader exposes `load(path)` for files on disk and `parse(text)` for
//! embedded or in-memory content.

pub mod balance;
pub mod factory;
pub mod roster;
pub mod weapons;

pub use balance::BalanceLoader;
pub use factory::ContentFactory;
pub use roster::{CombatantTemplate, Roster, RosterLoader};
pub use weapons::{WeaponCatalog, WeaponLoader, WeaponSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
