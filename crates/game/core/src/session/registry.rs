use std::collections::HashMap;

use crate::config::CombatConfig;

use super::error::{RegistryError, SessionError};
use super::machine::{CombatSession, ResolveOutcome, RewardHandoff};
use super::types::{ActionIntent, Loadout, SessionId, SessionStatus, Side};

/// Owns every session by id. Live sessions accept mutations; settled
/// terminal sessions move to the archive and stay readable until evicted.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    config: CombatConfig,
    next_id: u64,
    live: HashMap<SessionId, CombatSession>,
    archive: HashMap<SessionId, CombatSession>,
}

impl SessionRegistry {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            next_id: 1,
            live: HashMap::new(),
            archive: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Allocates the next id and starts a session. Ids are never reused,
    /// including ids whose creation failed validation.
    pub fn create(&mut self, player: Loadout, enemy: Loadout) -> Result<SessionId, RegistryError> {
        let id = SessionId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        let session = CombatSession::new(id, player, enemy, self.config.clone())?;
        self.live.insert(id, session);
        Ok(id)
    }

    /// Looks a session up in the live set, then the archive.
    pub fn get(&self, id: SessionId) -> Option<&CombatSession> {
        self.live.get(&id).or_else(|| self.archive.get(&id))
    }

    pub fn is_archived(&self, id: SessionId) -> bool {
        self.archive.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn archived_count(&self) -> usize {
        self.archive.len()
    }

    /// Drops a settled session from the archive and returns it.
    ///
    /// Live sessions are never evicted. An evicted id is unknown afterwards
    /// and is not handed out again.
    pub fn evict(&mut self, id: SessionId) -> Option<CombatSession> {
        self.archive.remove(&id)
    }

    pub fn resolve(
        &mut self,
        id: SessionId,
        actor: Side,
        intent: ActionIntent,
    ) -> Result<ResolveOutcome, RegistryError> {
        Ok(self.live_mut(id)?.resolve(actor, intent)?)
    }

    pub fn retreat(&mut self, id: SessionId) -> Result<SessionStatus, RegistryError> {
        Ok(self.live_mut(id)?.retreat()?)
    }

    pub fn change_equipment(
        &mut self,
        id: SessionId,
        side: Side,
        loadout: Loadout,
    ) -> Result<(), RegistryError> {
        Ok(self.live_mut(id)?.change_equipment(side, loadout)?)
    }

    /// Takes the reward hand-off of a terminal session and archives it.
    ///
    /// Returns `Ok(None)` for an ongoing session or one already settled.
    pub fn settle(&mut self, id: SessionId) -> Result<Option<RewardHandoff>, RegistryError> {
        if self.archive.contains_key(&id) {
            return Ok(None);
        }
        let session = self
            .live
            .get_mut(&id)
            .ok_or(RegistryError::UnknownSession { session: id })?;
        let Some(handoff) = session.take_settlement() else {
            return Ok(None);
        };
        if let Some(session) = self.live.remove(&id) {
            self.archive.insert(id, session);
        }
        Ok(Some(handoff))
    }

    /// Resolves to the live session, or reports an archived one as not ongoing.
    fn live_mut(&mut self, id: SessionId) -> Result<&mut CombatSession, RegistryError> {
        if let Some(archived) = self.archive.get(&id) {
            return Err(SessionError::NotOngoing {
                session: id,
                status: archived.status(),
            }
            .into());
        }
        self.live
            .get_mut(&id)
            .ok_or(RegistryError::UnknownSession { session: id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::WeaponBandProfile;
    use crate::session::CombatantSnapshot;
    use crate::zone::ZoneTable;

    fn loadout(name: &str, max_hp: u32) -> Loadout {
        let weapon = WeaponBandProfile::new(
            "longsword",
            ZoneTable::new(40.0, 70.0, 90.0, 100.0, 60.0),
            ZoneTable::new(0.0, 0.0, 0.5, 1.0, 2.0),
        )
        .unwrap();
        Loadout::new(CombatantSnapshot::new(name, 0, 20, max_hp), weapon)
    }

    #[test]
    fn ids_are_monotonic() {
        let mut registry = SessionRegistry::new(CombatConfig::default());
        let a = registry.create(loadout("hero", 100), loadout("rat", 10)).unwrap();
        let b = registry.create(loadout("hero", 100), loadout("rat", 10)).unwrap();
        assert_eq!(a, SessionId(1));
        assert_eq!(b, SessionId(2));
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn unknown_session_is_rejected() {
        let mut registry = SessionRegistry::default();
        let err = registry.retreat(SessionId(42)).unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownSession {
                session: SessionId(42)
            }
        );
    }

    #[test]
    fn settled_sessions_are_archived_and_read_only() {
        let mut registry = SessionRegistry::new(CombatConfig::default());
        let id = registry.create(loadout("hero", 100), loadout("rat", 10)).unwrap();

        assert_eq!(registry.settle(id), Ok(None));
        registry.retreat(id).unwrap();
        let handoff = registry.settle(id).unwrap().unwrap();
        assert_eq!(handoff.outcome, SessionStatus::Retreated);
        assert!(registry.is_archived(id));
        assert_eq!(registry.settle(id), Ok(None));

        let err = registry
            .resolve(id, Side::Player, ActionIntent::new(250.0, 0.0).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Session(SessionError::NotOngoing {
                status: SessionStatus::Retreated,
                ..
            })
        ));
        assert_eq!(registry.get(id).map(CombatSession::status), Some(SessionStatus::Retreated));
    }

    #[test]
    fn eviction_only_touches_the_archive() {
        let mut registry = SessionRegistry::new(CombatConfig::default());
        let settled = registry.create(loadout("hero", 100), loadout("rat", 10)).unwrap();
        let live = registry.create(loadout("hero", 100), loadout("rat", 10)).unwrap();

        registry.retreat(settled).unwrap();
        registry.settle(settled).unwrap();
        assert_eq!(registry.archived_count(), 1);

        assert!(registry.evict(live).is_none());
        assert_eq!(registry.live_count(), 1);

        let evicted = registry.evict(settled).unwrap();
        assert_eq!(evicted.status(), SessionStatus::Retreated);
        assert_eq!(registry.archived_count(), 0);
        assert!(registry.get(settled).is_none());
        assert_eq!(
            registry.retreat(settled).unwrap_err(),
            RegistryError::UnknownSession { session: settled }
        );

        let next = registry.create(loadout("hero", 100), loadout("rat", 10)).unwrap();
        assert_eq!(next, SessionId(3));
    }
}
