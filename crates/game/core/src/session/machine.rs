//! Combat session state machine.
//!
//! ```text
//! ongoing --resolve(player)--> ongoing | victory
//! ongoing --resolve(enemy)---> ongoing | defeat
//! ongoing --retreat----------> retreated
//! ```
//!
//! Every operation validates its whole input first and mutates second, so a
//! returned error always means the session is exactly as it was.

use crate::bands::{
    Accuracy, AccuracyAdjustedBands, WeaponBandProfile, adjust_bands, validate_widths,
};
use crate::combat::{apply_damage, calculate_damage, resolve_zone};
use crate::config::CombatConfig;
use crate::error::DomainError;

use super::error::SessionError;
use super::types::{
    ActionIntent, ActionResult, CombatantSnapshot, HealthThreshold, Loadout, SessionId,
    SessionStatus, Side, hp_percent,
};

/// One side of a session: stat snapshot, weapon, derived bands, and HP.
#[derive(Clone, Debug, PartialEq)]
pub struct Combatant {
    snapshot: CombatantSnapshot,
    weapon: WeaponBandProfile,
    accuracy: Accuracy,
    bands: AccuracyAdjustedBands,
    hp: u32,
}

impl Combatant {
    fn prepare(side: Side, loadout: Loadout, config: &CombatConfig) -> Result<Self, SessionError> {
        let Loadout { snapshot, weapon } = loadout;
        if snapshot.max_hp == 0 {
            return Err(DomainError::InvalidMaxHp { side }.into());
        }
        let accuracy = Accuracy::new(snapshot.accuracy, config)?;
        // Profiles may have been built under a different tolerance.
        validate_widths(weapon.bands(), config.band_epsilon)?;
        let bands = adjust_bands(&weapon, accuracy, config)?;
        let hp = snapshot.max_hp;
        Ok(Self {
            snapshot,
            weapon,
            accuracy,
            bands,
            hp,
        })
    }

    pub fn snapshot(&self) -> &CombatantSnapshot {
        &self.snapshot
    }

    pub fn weapon(&self) -> &WeaponBandProfile {
        &self.weapon
    }

    pub fn accuracy(&self) -> Accuracy {
        self.accuracy
    }

    pub fn bands(&self) -> &AccuracyAdjustedBands {
        &self.bands
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.snapshot.max_hp
    }

    pub fn hp_percent(&self) -> u32 {
        hp_percent(self.hp, self.snapshot.max_hp)
    }

    pub fn threshold(&self) -> HealthThreshold {
        HealthThreshold::from_hp(self.hp, self.snapshot.max_hp)
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

/// What a successful resolve produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolveOutcome {
    pub result: ActionResult,
    pub status: SessionStatus,
    /// `true` when this resolve moved the session into a terminal state.
    pub transitioned: bool,
    /// Set when the defender dropped into a new reportable threshold
    /// (wounded or critical) on this resolve.
    pub threshold_crossed: Option<(Side, HealthThreshold)>,
}

/// Payload for the external reward calculator, produced once per session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardHandoff {
    pub session: SessionId,
    pub outcome: SessionStatus,
    pub turn_count: u64,
    pub history: Vec<ActionResult>,
}

/// A single encounter between the player and one enemy.
#[derive(Clone, Debug)]
pub struct CombatSession {
    id: SessionId,
    config: CombatConfig,
    player: Combatant,
    enemy: Combatant,
    turn: u64,
    status: SessionStatus,
    next_actor: Side,
    history: Vec<ActionResult>,
    settled: bool,
}

impl CombatSession {
    /// Starts an ongoing session with both sides at full HP. Adjusted bands
    /// are computed here, once per combatant.
    pub fn new(
        id: SessionId,
        player: Loadout,
        enemy: Loadout,
        config: CombatConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let player = Combatant::prepare(Side::Player, player, &config)?;
        let enemy = Combatant::prepare(Side::Enemy, enemy, &config)?;
        Ok(Self {
            id,
            config,
            player,
            enemy,
            turn: 0,
            status: SessionStatus::Ongoing,
            next_actor: Side::Player,
            history: Vec::new(),
            settled: false,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn next_actor(&self) -> Side {
        self.next_actor
    }

    pub fn history(&self) -> &[ActionResult] {
        &self.history
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn enemy(&self) -> &Combatant {
        &self.enemy
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn resolve_player_action(
        &mut self,
        intent: ActionIntent,
    ) -> Result<ResolveOutcome, SessionError> {
        self.resolve(Side::Player, intent)
    }

    pub fn resolve_enemy_action(
        &mut self,
        intent: ActionIntent,
    ) -> Result<ResolveOutcome, SessionError> {
        self.resolve(Side::Enemy, intent)
    }

    /// The single mutation entry point for combat actions.
    pub fn resolve(
        &mut self,
        actor: Side,
        intent: ActionIntent,
    ) -> Result<ResolveOutcome, SessionError> {
        self.ensure_ongoing()?;
        if actor != self.next_actor {
            return Err(SessionError::OutOfTurn {
                expected: self.next_actor,
                provided: actor,
            });
        }

        let defender_side = actor.opponent();
        let (attacker, defender) = match actor {
            Side::Player => (&self.player, &self.enemy),
            Side::Enemy => (&self.enemy, &self.player),
        };

        let hit = resolve_zone(
            intent.tap,
            intent.dial,
            attacker.bands(),
            attacker.weapon().multipliers(),
            self.config.band_epsilon,
        )?;
        let damage = calculate_damage(attacker.snapshot.power, hit.multiplier, intent.scaling);
        let before = defender.threshold();

        // Nothing below can fail.
        let defender = match defender_side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        };
        defender.hp = apply_damage(defender.hp, damage);
        let after = defender.threshold();
        let defeated = defender.is_defeated();

        self.turn += 1;
        let result = ActionResult {
            sequence: self.turn,
            actor,
            zone: hit.zone,
            effective_angle: hit.effective_angle,
            damage,
            player_hp: self.player.hp,
            enemy_hp: self.enemy.hp,
        };
        self.history.push(result.clone());
        self.next_actor = defender_side;

        let transitioned = defeated;
        if defeated {
            self.status = match actor {
                Side::Player => SessionStatus::Victory,
                Side::Enemy => SessionStatus::Defeat,
            };
        }

        let threshold_crossed =
            (after != before && after.is_reportable()).then_some((defender_side, after));

        Ok(ResolveOutcome {
            result,
            status: self.status,
            transitioned,
            threshold_crossed,
        })
    }

    /// Player-initiated retreat; accepted whenever the session is ongoing.
    pub fn retreat(&mut self) -> Result<SessionStatus, SessionError> {
        self.ensure_ongoing()?;
        self.status = SessionStatus::Retreated;
        Ok(self.status)
    }

    /// Swaps one side's stats and weapon, recomputing its adjusted bands.
    ///
    /// Current HP carries over, clamped to the new maximum.
    pub fn change_equipment(&mut self, side: Side, loadout: Loadout) -> Result<(), SessionError> {
        self.ensure_ongoing()?;
        let mut replacement = Combatant::prepare(side, loadout, &self.config)?;

        let current = match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        };
        replacement.hp = current.hp.min(replacement.snapshot.max_hp);
        *current = replacement;
        Ok(())
    }

    /// Returns the reward hand-off the first time it is called on a terminal
    /// session, and `None` on every other call.
    pub fn take_settlement(&mut self) -> Option<RewardHandoff> {
        if !self.status.is_terminal() || self.settled {
            return None;
        }
        self.settled = true;
        Some(RewardHandoff {
            session: self.id,
            outcome: self.status,
            turn_count: self.turn,
            history: self.history.clone(),
        })
    }

    fn ensure_ongoing(&self) -> Result<(), SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::NotOngoing {
                session: self.id,
                status: self.status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandError;
    use crate::zone::{Zone, ZoneTable};

    fn longsword() -> WeaponBandProfile {
        WeaponBandProfile::new(
            "longsword",
            ZoneTable::new(40.0, 70.0, 90.0, 100.0, 60.0),
            ZoneTable::new(0.0, 0.0, 0.5, 1.0, 2.0),
        )
        .unwrap()
    }

    fn session(player_hp: u32, enemy_hp: u32) -> CombatSession {
        CombatSession::new(
            SessionId(1),
            Loadout::new(CombatantSnapshot::new("hero", 0, 20, player_hp), longsword()),
            Loadout::new(CombatantSnapshot::new("slime", 0, 10, enemy_hp), longsword()),
            CombatConfig::default(),
        )
        .unwrap()
    }

    fn tap(theta: f64) -> ActionIntent {
        ActionIntent::new(theta, 0.0).unwrap()
    }

    #[test]
    fn starts_ongoing_with_player_to_act() {
        let session = session(100, 100);
        assert_eq!(session.status(), SessionStatus::Ongoing);
        assert_eq!(session.turn(), 0);
        assert_eq!(session.next_actor(), Side::Player);
        assert_eq!(session.player().hp(), 100);
    }

    #[test]
    fn zero_max_hp_is_rejected() {
        let err = CombatSession::new(
            SessionId(1),
            Loadout::new(CombatantSnapshot::new("hero", 0, 20, 0), longsword()),
            Loadout::new(CombatantSnapshot::new("slime", 0, 10, 10), longsword()),
            CombatConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SessionError::Domain(DomainError::InvalidMaxHp { side: Side::Player })
        );
    }

    #[test]
    fn crit_hit_reduces_enemy_hp_and_advances_turn() {
        let mut session = session(100, 100);
        let outcome = session.resolve_player_action(tap(330.0)).unwrap();

        assert_eq!(outcome.result.zone, Zone::Crit);
        assert_eq!(outcome.result.damage, 40);
        assert_eq!(outcome.result.enemy_hp, 60);
        assert_eq!(outcome.result.sequence, 1);
        assert_eq!(outcome.status, SessionStatus::Ongoing);
        assert!(!outcome.transitioned);
        assert_eq!(
            outcome.threshold_crossed,
            Some((Side::Enemy, HealthThreshold::Wounded))
        );
        assert_eq!(session.turn(), 1);
        assert_eq!(session.next_actor(), Side::Enemy);
    }

    #[test]
    fn miss_records_zero_damage() {
        let mut session = session(100, 100);
        let outcome = session.resolve_player_action(tap(50.0)).unwrap();
        assert_eq!(outcome.result.zone, Zone::Miss);
        assert_eq!(outcome.result.damage, 0);
        assert_eq!(outcome.threshold_crossed, None);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn out_of_turn_is_rejected_without_mutation() {
        let mut session = session(100, 100);
        let err = session.resolve_enemy_action(tap(250.0)).unwrap_err();
        assert_eq!(
            err,
            SessionError::OutOfTurn {
                expected: Side::Player,
                provided: Side::Enemy
            }
        );
        assert_eq!(session.turn(), 0);
        assert!(session.history().is_empty());
    }

    #[test]
    fn retreat_is_terminal_and_settles_once() {
        let mut session = session(100, 100);
        assert_eq!(session.retreat(), Ok(SessionStatus::Retreated));
        assert!(session.retreat().is_err());

        let handoff = session.take_settlement().unwrap();
        assert_eq!(handoff.outcome, SessionStatus::Retreated);
        assert_eq!(handoff.turn_count, 0);
        assert!(session.take_settlement().is_none());
    }

    #[test]
    fn ongoing_session_has_no_settlement() {
        let mut session = session(100, 100);
        assert!(session.take_settlement().is_none());
        assert!(!session.is_settled());
    }

    #[test]
    fn equipment_change_recomputes_bands_and_clamps_hp() {
        let mut session = session(100, 100);
        let before = session.player().bands().clone();

        session
            .change_equipment(
                Side::Player,
                Loadout::new(CombatantSnapshot::new("hero", 100, 25, 80), longsword()),
            )
            .unwrap();

        let player = session.player();
        assert_ne!(player.bands(), &before);
        assert_eq!(player.bands().width(Zone::Injure), 10.0);
        assert_eq!(player.hp(), 80);
        assert_eq!(player.snapshot().power, 25);
    }

    #[test]
    fn invalid_equipment_leaves_loadout_untouched() {
        let mut session = session(100, 100);
        let err = session
            .change_equipment(
                Side::Player,
                Loadout::new(CombatantSnapshot::new("hero", 150, 25, 80), longsword()),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Domain(DomainError::AccuracyOutOfRange { value: 150, .. })
        ));
        assert_eq!(session.player().snapshot().power, 20);
    }

    #[test]
    fn weapon_widths_are_checked_against_session_epsilon() {
        let loose = WeaponBandProfile::with_epsilon(
            "loose",
            ZoneTable::new(40.0, 70.0, 90.0, 100.0, 60.2),
            ZoneTable::new(0.0, 0.0, 0.5, 1.0, 2.0),
            0.5,
        )
        .unwrap();
        let loadouts = || {
            (
                Loadout::new(CombatantSnapshot::new("hero", 0, 20, 100), loose.clone()),
                Loadout::new(CombatantSnapshot::new("slime", 0, 10, 100), longsword()),
            )
        };

        let (player, enemy) = loadouts();
        let err = CombatSession::new(SessionId(1), player, enemy, CombatConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Bands(BandError::SumMismatch { .. })
        ));

        let config = CombatConfig {
            band_epsilon: 0.5,
            ..CombatConfig::default()
        };
        let (player, enemy) = loadouts();
        assert!(CombatSession::new(SessionId(1), player, enemy, config).is_ok());
    }
}
