//! Seeded enemy taps.

use std::sync::Mutex;

use async_trait::async_trait;
use combat_core::{ActionIntent, CombatSession};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::{Result, RuntimeError, TapProvider};

/// Draws tap and dial angles uniformly from `[0, 360)` with a seeded RNG,
/// so the same seed always replays the same fight.
pub struct SeededTapProvider {
    rng: Mutex<StdRng>,
}

impl SeededTapProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl TapProvider for SeededTapProvider {
    async fn next_tap(&self, _session: &CombatSession) -> Result<ActionIntent> {
        let (tap, dial) = {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            (rng.gen_range(0.0..360.0), rng.gen_range(0.0..360.0))
        };
        ActionIntent::new(tap, dial).map_err(|e| RuntimeError::TapProvider(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{CombatConfig, CombatantSnapshot, Loadout, SessionId, WeaponBandProfile, ZoneTable};

    fn session() -> CombatSession {
        let weapon = WeaponBandProfile::new(
            "longsword",
            ZoneTable::new(40.0, 70.0, 90.0, 100.0, 60.0),
            ZoneTable::new(0.0, 0.0, 0.5, 1.0, 2.0),
        )
        .unwrap();
        CombatSession::new(
            SessionId(1),
            Loadout::new(CombatantSnapshot::new("hero", 50, 20, 100), weapon.clone()),
            Loadout::new(CombatantSnapshot::new("rat", 50, 20, 100), weapon),
            CombatConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn same_seed_replays_same_taps() {
        let session = session();
        let a = SeededTapProvider::new(42);
        let b = SeededTapProvider::new(42);
        for _ in 0..5 {
            assert_eq!(
                a.next_tap(&session).await.unwrap(),
                b.next_tap(&session).await.unwrap()
            );
        }
    }
}
