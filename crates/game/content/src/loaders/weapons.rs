//! Weapon band profile loader.

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::{BandWidths, CombatConfig, WeaponBandProfile, WeaponPattern, ZoneMultipliers};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One weapon entry as written in RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub pattern: String,
    pub bands: BandWidths,
    pub multipliers: ZoneMultipliers,
}

impl WeaponSpec {
    /// Validates the entry into an immutable profile, allowing the band sum
    /// to drift from 360° by at most `epsilon`.
    pub fn build(self, epsilon: f64) -> LoadResult<WeaponBandProfile> {
        let pattern = self.pattern.clone();
        WeaponBandProfile::with_epsilon(self.pattern, self.bands, self.multipliers, epsilon)
            .map_err(|e| anyhow::anyhow!("Invalid weapon '{}': {}", pattern, e))
    }
}

/// Weapon catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeaponCatalogFile {
    weapons: Vec<WeaponSpec>,
}

/// Validated weapon profiles keyed by pattern name.
#[derive(Debug, Clone, Default)]
pub struct WeaponCatalog {
    profiles: BTreeMap<WeaponPattern, WeaponBandProfile>,
}

impl WeaponCatalog {
    /// Builds a catalog, rejecting duplicate pattern names.
    pub fn from_profiles(profiles: impl IntoIterator<Item = WeaponBandProfile>) -> LoadResult<Self> {
        let mut catalog = Self::default();
        for profile in profiles {
            let pattern = profile.pattern().clone();
            if catalog.profiles.insert(pattern.clone(), profile).is_some() {
                anyhow::bail!("Duplicate weapon pattern '{}'", pattern);
            }
        }
        Ok(catalog)
    }

    pub fn get(&self, pattern: &str) -> Option<&WeaponBandProfile> {
        self.profiles.get(&WeaponPattern::from(pattern))
    }

    /// Like [`get`](Self::get), but an unknown pattern is an error.
    pub fn require(&self, pattern: &str) -> LoadResult<WeaponBandProfile> {
        self.get(pattern)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown weapon pattern '{}'", pattern))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &WeaponPattern> + '_ {
        self.profiles.keys()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Loader for weapon catalogs from RON files.
pub struct WeaponLoader;

impl WeaponLoader {
    /// Load and validate a weapon catalog from a RON file.
    pub fn load(path: &Path, config: &CombatConfig) -> LoadResult<WeaponCatalog> {
        let content = read_file(path)?;
        Self::parse(&content, config)
    }

    /// Parse and validate a weapon catalog from RON text.
    ///
    /// Every profile is checked for the 360° band sum within
    /// `config.band_epsilon`; one bad entry fails the whole catalog.
    pub fn parse(content: &str, config: &CombatConfig) -> LoadResult<WeaponCatalog> {
        let file: WeaponCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse weapon catalog RON: {}", e))?;

        let profiles = file
            .weapons
            .into_iter()
            .map(|spec| spec.build(config.band_epsilon))
            .collect::<LoadResult<Vec<_>>>()?;
        WeaponCatalog::from_profiles(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::Zone;

    #[test]
    fn parses_valid_catalog() {
        let catalog = WeaponLoader::parse(
            r#"(weapons: [(
                pattern: "spear",
                bands: (injure: 40.0, miss: 60.0, graze: 100.0, normal: 100.0, crit: 60.0),
                multipliers: (injure: 0.0, miss: 0.0, graze: 0.5, normal: 1.0, crit: 2.0),
            )])"#,
            &CombatConfig::default(),
        )
        .unwrap();

        let spear = catalog.get("spear").unwrap();
        assert_eq!(spear.bands().graze, 100.0);
        assert_eq!(spear.multiplier(Zone::Crit), 2.0);
        assert!(catalog.require("halberd").is_err());
    }

    #[test]
    fn rejects_bands_not_summing_to_full_circle() {
        let err = WeaponLoader::parse(
            r#"(weapons: [(
                pattern: "bent",
                bands: (injure: 40.0, miss: 60.0, graze: 100.0, normal: 100.0, crit: 50.0),
                multipliers: (injure: 0.0, miss: 0.0, graze: 0.5, normal: 1.0, crit: 2.0),
            )])"#,
            &CombatConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("bent"));
    }

    #[test]
    fn band_tolerance_comes_from_balance() {
        let content = r#"(weapons: [(
            pattern: "worn",
            bands: (injure: 40.0, miss: 60.0, graze: 100.0, normal: 100.0, crit: 60.01),
            multipliers: (injure: 0.0, miss: 0.0, graze: 0.5, normal: 1.0, crit: 2.0),
        )])"#;
        assert!(WeaponLoader::parse(content, &CombatConfig::default()).is_err());

        let loose = CombatConfig {
            band_epsilon: 0.1,
            ..CombatConfig::default()
        };
        let catalog = WeaponLoader::parse(content, &loose).unwrap();
        assert!(catalog.get("worn").is_some());
    }

    #[test]
    fn rejects_duplicate_patterns() {
        let entry = r#"(
            pattern: "twin",
            bands: (injure: 40.0, miss: 60.0, graze: 100.0, normal: 100.0, crit: 60.0),
            multipliers: (injure: 0.0, miss: 0.0, graze: 0.5, normal: 1.0, crit: 2.0),
        )"#;
        let content = format!("(weapons: [{entry}, {entry}])");
        assert!(WeaponLoader::parse(&content, &CombatConfig::default()).is_err());
    }
}
