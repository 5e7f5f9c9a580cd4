//! Damage calculation and application.

use crate::error::DomainError;

/// Externally supplied damage scaling (buffs, difficulty, ...).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct DamageScaling(f64);

impl DamageScaling {
    pub const IDENTITY: Self = Self(1.0);

    pub fn new(value: f64) -> Result<Self, DomainError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidScaling { value })
        }
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for DamageScaling {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DamageScaling> for f64 {
    fn from(scaling: DamageScaling) -> Self {
        scaling.0
    }
}

impl Default for DamageScaling {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Calculate damage from a classified tap.
///
/// # Formula
///
/// ```text
/// damage = round(base_power * zone_multiplier * scaling)
/// ```
///
/// Negative or non-finite products collapse to 0.
pub fn calculate_damage(base_power: u32, multiplier: f64, scaling: DamageScaling) -> u32 {
    let raw = f64::from(base_power) * multiplier * scaling.value();
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.round().min(f64::from(u32::MAX)) as u32
}

/// Apply damage to current HP, clamped to 0.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}
