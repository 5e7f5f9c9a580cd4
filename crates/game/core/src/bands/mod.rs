//! Weapon band profiles and accuracy-adjusted bands.
//!
//! A weapon pattern fixes five base angular widths (summing to 360°) and a
//! damage multiplier per zone. Each combatant's accuracy stat redistributes
//! those widths once per session (and again on an explicit equipment change),
//! producing [`AccuracyAdjustedBands`].

mod adjust;

pub use adjust::{Accuracy, adjust_bands};

use core::fmt;

use crate::config::CombatConfig;
use crate::error::{ErrorCategory, ErrorSeverity, GameError};
use crate::zone::{Zone, ZoneTable};

/// Angular width of each zone, in degrees.
pub type BandWidths = ZoneTable<f64>;

/// Damage multiplier applied when a tap lands in each zone.
pub type ZoneMultipliers = ZoneTable<f64>;

/// Violations of the band invariants.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BandError {
    #[error("band widths sum to {sum}°, expected 360° (±{epsilon})")]
    SumMismatch { sum: f64, epsilon: f64 },

    #[error("{zone} band width {width} is negative or not finite")]
    InvalidWidth { zone: Zone, width: f64 },

    #[error("{zone} multiplier {value} is negative or not finite")]
    InvalidMultiplier { zone: Zone, value: f64 },

    #[error("invalid band curve: {reason}")]
    InvalidCurve { reason: &'static str },

    #[error("cannot classify non-finite angle {angle}")]
    NonFiniteAngle { angle: f64 },
}

impl GameError for BandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SumMismatch { .. } | Self::InvalidWidth { .. } => ErrorSeverity::Fatal,
            Self::InvalidMultiplier { .. }
            | Self::InvalidCurve { .. }
            | Self::NonFiniteAngle { .. } => ErrorSeverity::Validation,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::NonFiniteAngle { .. } => ErrorCategory::DomainValidation,
            _ => ErrorCategory::InvariantViolation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SumMismatch { .. } => "BAND_SUM_MISMATCH",
            Self::InvalidWidth { .. } => "BAND_INVALID_WIDTH",
            Self::InvalidMultiplier { .. } => "BAND_INVALID_MULTIPLIER",
            Self::InvalidCurve { .. } => "BAND_INVALID_CURVE",
            Self::NonFiniteAngle { .. } => "BAND_NON_FINITE_ANGLE",
        }
    }
}

/// Checks that every width is finite and non-negative and that the widths
/// cover the full circle within `epsilon`. Never renormalizes.
pub fn validate_widths(widths: &BandWidths, epsilon: f64) -> Result<(), BandError> {
    if let Some((zone, width)) = widths
        .iter()
        .find(|(_, width)| !width.is_finite() || **width < 0.0)
    {
        return Err(BandError::InvalidWidth {
            zone,
            width: *width,
        });
    }

    let sum = widths.sum();
    if (sum - CombatConfig::FULL_CIRCLE).abs() > epsilon {
        return Err(BandError::SumMismatch { sum, epsilon });
    }
    Ok(())
}

fn validate_multipliers(multipliers: &ZoneMultipliers) -> Result<(), BandError> {
    match multipliers
        .iter()
        .find(|(_, value)| !value.is_finite() || **value < 0.0)
    {
        Some((zone, value)) => Err(BandError::InvalidMultiplier {
            zone,
            value: *value,
        }),
        None => Ok(()),
    }
}

/// Name of a weapon pattern (e.g. `longsword`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponPattern(pub String);

impl WeaponPattern {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeaponPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WeaponPattern {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for WeaponPattern {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Immutable base bands and multiplier table of a weapon pattern.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WeaponBandProfile {
    pattern: WeaponPattern,
    bands: BandWidths,
    multipliers: ZoneMultipliers,
}

impl WeaponBandProfile {
    /// Builds a profile, rejecting widths that do not sum to 360° within
    /// [`CombatConfig::DEFAULT_BAND_EPSILON`].
    pub fn new(
        pattern: impl Into<WeaponPattern>,
        bands: BandWidths,
        multipliers: ZoneMultipliers,
    ) -> Result<Self, BandError> {
        Self::with_epsilon(
            pattern,
            bands,
            multipliers,
            CombatConfig::DEFAULT_BAND_EPSILON,
        )
    }

    /// Like [`WeaponBandProfile::new`], with the sum tolerance taken from a
    /// loaded [`CombatConfig::band_epsilon`].
    pub fn with_epsilon(
        pattern: impl Into<WeaponPattern>,
        bands: BandWidths,
        multipliers: ZoneMultipliers,
        epsilon: f64,
    ) -> Result<Self, BandError> {
        validate_widths(&bands, epsilon)?;
        validate_multipliers(&multipliers)?;
        Ok(Self {
            pattern: pattern.into(),
            bands,
            multipliers,
        })
    }

    pub fn pattern(&self) -> &WeaponPattern {
        &self.pattern
    }

    pub fn bands(&self) -> &BandWidths {
        &self.bands
    }

    pub fn multipliers(&self) -> &ZoneMultipliers {
        &self.multipliers
    }

    pub fn multiplier(&self, zone: Zone) -> f64 {
        *self.multipliers.get(zone)
    }
}

/// Per-combatant zone widths after the accuracy redistribution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AccuracyAdjustedBands {
    widths: BandWidths,
}

impl AccuracyAdjustedBands {
    pub fn new(widths: BandWidths, epsilon: f64) -> Result<Self, BandError> {
        validate_widths(&widths, epsilon)?;
        Ok(Self { widths })
    }

    pub fn widths(&self) -> &BandWidths {
        &self.widths
    }

    pub fn width(&self, zone: Zone) -> f64 {
        *self.widths.get(zone)
    }
}
