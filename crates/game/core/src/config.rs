use core::ops::RangeInclusive;

use crate::bands::BandError;

/// Combat balance parameters and tunable defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Lowest accepted accuracy stat; yields the weapon's base bands.
    pub accuracy_min: u32,
    /// Highest accepted accuracy stat; yields the best-case bands.
    pub accuracy_max: u32,
    /// Tolerance used when checking that band widths sum to a full circle.
    pub band_epsilon: f64,
    pub curve: BandCurve,
}

impl CombatConfig {
    // ===== compile-time constants =====
    pub const FULL_CIRCLE: f64 = 360.0;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ACCURACY_MIN: u32 = 0;
    pub const DEFAULT_ACCURACY_MAX: u32 = 100;
    pub const DEFAULT_BAND_EPSILON: f64 = 1e-6;

    pub fn new() -> Self {
        Self {
            accuracy_min: Self::DEFAULT_ACCURACY_MIN,
            accuracy_max: Self::DEFAULT_ACCURACY_MAX,
            band_epsilon: Self::DEFAULT_BAND_EPSILON,
            curve: BandCurve::default(),
        }
    }

    pub fn accuracy_domain(&self) -> RangeInclusive<u32> {
        self.accuracy_min..=self.accuracy_max
    }

    pub fn validate(&self) -> Result<(), BandError> {
        if self.accuracy_min >= self.accuracy_max {
            return Err(BandError::InvalidCurve {
                reason: "accuracy_min must be below accuracy_max",
            });
        }
        if !self.band_epsilon.is_finite() || self.band_epsilon <= 0.0 {
            return Err(BandError::InvalidCurve {
                reason: "band_epsilon must be a positive finite number",
            });
        }
        self.curve.validate()
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-case end of the accuracy interpolation.
///
/// At maximum accuracy, injure and miss shrink to their floors (never below,
/// and never above the weapon's own base width). The degrees they free are
/// split between crit (`crit_share`) and normal (the rest). A floor of `0.0`
/// is an explicit cap that lets the zone vanish entirely.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BandCurve {
    pub injure_floor: f64,
    pub miss_floor: f64,
    pub crit_share: f64,
}

impl BandCurve {
    pub const DEFAULT_INJURE_FLOOR: f64 = 10.0;
    pub const DEFAULT_MISS_FLOOR: f64 = 20.0;
    pub const DEFAULT_CRIT_SHARE: f64 = 0.4;

    pub fn validate(&self) -> Result<(), BandError> {
        let floors_ok = [self.injure_floor, self.miss_floor]
            .iter()
            .all(|floor| floor.is_finite() && *floor >= 0.0);
        if !floors_ok {
            return Err(BandError::InvalidCurve {
                reason: "zone floors must be finite and non-negative",
            });
        }
        if !(0.0..=1.0).contains(&self.crit_share) {
            return Err(BandError::InvalidCurve {
                reason: "crit_share must lie in [0, 1]",
            });
        }
        Ok(())
    }
}

impl Default for BandCurve {
    fn default() -> Self {
        Self {
            injure_floor: Self::DEFAULT_INJURE_FLOOR,
            miss_floor: Self::DEFAULT_MISS_FLOOR,
            crit_share: Self::DEFAULT_CRIT_SHARE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CombatConfig::default().validate().is_ok());
        assert_eq!(CombatConfig::default().accuracy_domain(), 0..=100);
    }

    #[test]
    fn rejects_inverted_accuracy_domain() {
        let config = CombatConfig {
            accuracy_min: 50,
            accuracy_max: 50,
            ..CombatConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BandError::InvalidCurve { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_crit_share() {
        let curve = BandCurve {
            crit_share: 1.5,
            ..BandCurve::default()
        };
        assert!(curve.validate().is_err());
    }
}
