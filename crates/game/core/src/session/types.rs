//! Identifiers, snapshots, and records owned by a combat session.

use core::fmt;

use crate::bands::WeaponBandProfile;
use crate::combat::{DamageScaling, DialAngle};
use crate::error::DomainError;
use crate::zone::Zone;

/// Registry-assigned identifier of a combat session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// The two sides of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Lifecycle of a session. Every status except `Ongoing` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Ongoing,
    Victory,
    Defeat,
    Retreated,
}

impl SessionStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Stat snapshot of a combatant, read at session creation and on explicit
/// equipment changes only.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub name: String,
    pub accuracy: u32,
    /// Base power fed into the damage formula.
    pub power: u32,
    /// Carried through to the reward hand-off; not used by the rules.
    pub level: u32,
    pub max_hp: u32,
}

impl CombatantSnapshot {
    pub fn new(name: impl Into<String>, accuracy: u32, power: u32, max_hp: u32) -> Self {
        Self {
            name: name.into(),
            accuracy,
            power,
            level: 1,
            max_hp,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }
}

/// Stats plus the weapon a combatant brings into a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Loadout {
    pub snapshot: CombatantSnapshot,
    pub weapon: WeaponBandProfile,
}

impl Loadout {
    pub fn new(snapshot: CombatantSnapshot, weapon: WeaponBandProfile) -> Self {
        Self { snapshot, weapon }
    }
}

/// A validated dial tap: where the tap landed, where the dial was, and the
/// external damage scaling for this action.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionIntent {
    pub tap: DialAngle,
    pub dial: DialAngle,
    pub scaling: DamageScaling,
}

impl ActionIntent {
    pub fn new(tap_degrees: f64, dial_degrees: f64) -> Result<Self, DomainError> {
        Ok(Self {
            tap: DialAngle::new(tap_degrees)?,
            dial: DialAngle::new(dial_degrees)?,
            scaling: DamageScaling::IDENTITY,
        })
    }

    pub fn with_scaling(mut self, scaling: f64) -> Result<Self, DomainError> {
        self.scaling = DamageScaling::new(scaling)?;
        Ok(self)
    }
}

/// Immutable record of one resolved turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionResult {
    /// Turn counter after this action; strictly increasing within a session.
    pub sequence: u64,
    pub actor: Side,
    pub zone: Zone,
    pub effective_angle: f64,
    pub damage: u32,
    pub player_hp: u32,
    pub enemy_hp: u32,
}

impl ActionResult {
    pub fn is_critical(&self) -> bool {
        self.zone.is_critical()
    }

    pub fn landed(&self) -> bool {
        self.damage > 0
    }

    pub fn hp(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_hp,
            Side::Enemy => self.enemy_hp,
        }
    }
}

/// Integer HP percentage, rounded down. A zero max reads as full.
pub fn hp_percent(current: u32, max: u32) -> u32 {
    if max == 0 {
        return 100;
    }
    ((u64::from(current) * 100) / u64::from(max)) as u32
}

/// Health threshold levels used to trigger commentary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum HealthThreshold {
    /// 100% HP
    Full,
    /// 75-99% HP
    Healthy,
    /// 25-74% HP
    Wounded,
    /// 1-24% HP
    Critical,
    /// 0% HP
    Dead,
}

impl HealthThreshold {
    pub fn from_hp(current: u32, max: u32) -> Self {
        if current == 0 {
            return Self::Dead;
        }
        match hp_percent(current, max) {
            100.. => Self::Full,
            75..=99 => Self::Healthy,
            25..=74 => Self::Wounded,
            _ => Self::Critical,
        }
    }

    /// Thresholds worth announcing when crossed downward.
    pub const fn is_reportable(self) -> bool {
        matches!(self, Self::Wounded | Self::Critical)
    }
}
