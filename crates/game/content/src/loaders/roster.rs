//! Combatant roster loader.

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::{CombatantSnapshot, Loadout};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, WeaponCatalog, read_file};

/// A named combatant: stat snapshot plus the pattern of the weapon it wields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantTemplate {
    pub id: String,
    pub snapshot: CombatantSnapshot,
    pub weapon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RosterFile {
    combatants: Vec<CombatantTemplate>,
}

/// Combatant templates keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    templates: BTreeMap<String, CombatantTemplate>,
}

impl Roster {
    pub fn get(&self, id: &str) -> Option<&CombatantTemplate> {
        self.templates.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.templates.keys().map(String::as_str)
    }

    /// Resolves a template's weapon against the catalog.
    pub fn loadout(&self, id: &str, weapons: &WeaponCatalog) -> LoadResult<Loadout> {
        let template = self
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown combatant '{}'", id))?;
        let weapon = weapons.require(&template.weapon)?;
        Ok(Loadout::new(template.snapshot.clone(), weapon))
    }
}

/// Loader for combatant rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    pub fn load(path: &Path) -> LoadResult<Roster> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Roster> {
        let file: RosterFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        let mut roster = Roster::default();
        for template in file.combatants {
            if template.snapshot.max_hp == 0 {
                anyhow::bail!("Combatant '{}' has zero max HP", template.id);
            }
            let id = template.id.clone();
            if roster.templates.insert(id.clone(), template).is_some() {
                anyhow::bail!("Duplicate combatant id '{}'", id);
            }
        }
        Ok(roster)
    }
}
