//! Hit zone classification.

use crate::bands::{AccuracyAdjustedBands, BandError, BandWidths, ZoneMultipliers, validate_widths};
use crate::config::CombatConfig;
use crate::error::DomainError;
use crate::zone::Zone;

/// An angle on the dial, in degrees, validated to lie in `[0, 360)`.
///
/// Deserialization goes through [`DialAngle::new`], so wire input is held to
/// the same domain.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct DialAngle(f64);

impl DialAngle {
    pub const ZERO: Self = Self(0.0);

    pub fn new(degrees: f64) -> Result<Self, DomainError> {
        if degrees.is_finite() && (0.0..CombatConfig::FULL_CIRCLE).contains(&degrees) {
            Ok(Self(degrees))
        } else {
            Err(DomainError::AngleOutOfRange { angle: degrees })
        }
    }

    pub const fn degrees(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for DialAngle {
    type Error = DomainError;

    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        Self::new(degrees)
    }
}

impl From<DialAngle> for f64 {
    fn from(angle: DialAngle) -> Self {
        angle.0
    }
}

/// Classified tap.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneHit {
    pub zone: Zone,
    /// `(tap - dial) mod 360`, in `[0, 360)`.
    pub effective_angle: f64,
    pub multiplier: f64,
}

/// Tap angle measured from the dial's current rotation.
pub fn effective_angle(tap: DialAngle, dial: DialAngle) -> f64 {
    normalize(tap.degrees() - dial.degrees())
}

fn normalize(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(CombatConfig::FULL_CIRCLE);
    // rem_euclid rounds tiny negative inputs up to exactly 360.
    if wrapped >= CombatConfig::FULL_CIRCLE {
        0.0
    } else {
        wrapped
    }
}

/// Walks the zones from 0° in fixed order; each zone owns `[start, end)`.
///
/// `theta` is wrapped into `[0, 360)` first, so every finite angle maps to
/// exactly one zone. NaN and infinities are rejected. The widths are
/// re-validated on every call and a violation fails instead of being
/// renormalized.
pub fn locate_zone(theta: f64, widths: &BandWidths, epsilon: f64) -> Result<Zone, BandError> {
    if !theta.is_finite() {
        return Err(BandError::NonFiniteAngle { angle: theta });
    }
    validate_widths(widths, epsilon)?;

    let theta = normalize(theta);
    let mut end = 0.0;
    for (zone, width) in widths.iter() {
        end += *width;
        if theta < end {
            return Ok(zone);
        }
    }

    // Widths may sum to a hair under 360°; that sliver belongs to the last
    // non-empty zone.
    Ok(widths
        .iter()
        .filter(|(_, width)| **width > 0.0)
        .map(|(zone, _)| zone)
        .last()
        .unwrap_or(Zone::Crit))
}

/// Classifies a tap against a combatant's adjusted bands.
pub fn resolve_zone(
    tap: DialAngle,
    dial: DialAngle,
    bands: &AccuracyAdjustedBands,
    multipliers: &ZoneMultipliers,
    epsilon: f64,
) -> Result<ZoneHit, BandError> {
    let effective_angle = effective_angle(tap, dial);
    let zone = locate_zone(effective_angle, bands.widths(), epsilon)?;
    Ok(ZoneHit {
        zone,
        effective_angle,
        multiplier: *multipliers.get(zone),
    })
}
