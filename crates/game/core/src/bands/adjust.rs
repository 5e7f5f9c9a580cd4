//! Accuracy-driven band redistribution.
//!
//! # Curve
//!
//! ```text
//! t       = (accuracy - accuracy_min) / (accuracy_max - accuracy_min)
//! injure  = lerp(base.injure, min(floor.injure, base.injure), t)
//! miss    = lerp(base.miss,   min(floor.miss,   base.miss),   t)
//! freed   = (base.injure - injure) + (base.miss - miss)
//! crit    = base.crit   + freed * crit_share
//! normal  = base.normal + freed * (1 - crit_share)
//! graze   = 360 - (injure + miss + normal + crit)
//! ```
//!
//! At minimum accuracy the result equals the base bands; at maximum accuracy
//! the unfavorable zones sit on their floors. Graze absorbs rounding.

use crate::config::CombatConfig;
use crate::error::DomainError;
use crate::zone::ZoneTable;

use super::{AccuracyAdjustedBands, BandError, WeaponBandProfile};

/// Accuracy stat, validated against [`CombatConfig::accuracy_domain`].
///
/// Serialize-only: the valid range depends on a config, so values are
/// rebuilt through [`Accuracy::new`] rather than deserialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Accuracy(u32);

impl Accuracy {
    pub fn new(value: u32, config: &CombatConfig) -> Result<Self, DomainError> {
        if config.accuracy_domain().contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::AccuracyOutOfRange {
                value,
                min: config.accuracy_min,
                max: config.accuracy_max,
            })
        }
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Position of this stat inside the accuracy domain, in `[0, 1]`.
    fn progress(self, config: &CombatConfig) -> f64 {
        let span = config.accuracy_max.saturating_sub(config.accuracy_min);
        if span == 0 {
            return 0.0;
        }
        let offset = self.0.saturating_sub(config.accuracy_min);
        (f64::from(offset) / f64::from(span)).clamp(0.0, 1.0)
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Derives a combatant's adjusted bands from its weapon and accuracy.
///
/// Pure and deterministic. The result is re-validated to sum to 360°.
pub fn adjust_bands(
    profile: &WeaponBandProfile,
    accuracy: Accuracy,
    config: &CombatConfig,
) -> Result<AccuracyAdjustedBands, BandError> {
    config.validate()?;

    let curve = &config.curve;
    let base = profile.bands();
    let t = accuracy.progress(config);

    let injure = lerp(base.injure, curve.injure_floor.min(base.injure), t);
    let miss = lerp(base.miss, curve.miss_floor.min(base.miss), t);
    let freed = (base.injure - injure) + (base.miss - miss);

    let crit = base.crit + freed * curve.crit_share;
    let normal = base.normal + freed * (1.0 - curve.crit_share);
    let graze = (CombatConfig::FULL_CIRCLE - (injure + miss + normal + crit)).max(0.0);

    AccuracyAdjustedBands::new(
        ZoneTable::new(injure, miss, graze, normal, crit),
        config.band_epsilon,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::Zone;

    const EPS: f64 = 1e-9;

    fn longsword() -> WeaponBandProfile {
        WeaponBandProfile::new(
            "longsword",
            ZoneTable::new(40.0, 70.0, 90.0, 100.0, 60.0),
            ZoneTable::new(0.0, 0.0, 0.5, 1.0, 2.0),
        )
        .unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn minimum_accuracy_keeps_base_bands() {
        let config = CombatConfig::default();
        let profile = longsword();
        let bands = adjust_bands(&profile, Accuracy::new(0, &config).unwrap(), &config).unwrap();

        for (zone, width) in profile.bands().iter() {
            assert!(close(bands.width(zone), *width), "{zone} drifted");
        }
    }

    #[test]
    fn maximum_accuracy_hits_floors() {
        let config = CombatConfig::default();
        let bands =
            adjust_bands(&longsword(), Accuracy::new(100, &config).unwrap(), &config).unwrap();

        assert!(close(bands.width(Zone::Injure), 10.0));
        assert!(close(bands.width(Zone::Miss), 20.0));
        // 80° freed: 40% to crit, 60% to normal.
        assert!(close(bands.width(Zone::Crit), 92.0));
        assert!(close(bands.width(Zone::Normal), 148.0));
        assert!(close(bands.width(Zone::Graze), 90.0));
        assert!(close(bands.widths().sum(), 360.0));
    }

    #[test]
    fn floor_above_base_width_leaves_zone_untouched() {
        let config = CombatConfig {
            curve: crate::config::BandCurve {
                injure_floor: 50.0,
                ..Default::default()
            },
            ..CombatConfig::default()
        };
        let bands =
            adjust_bands(&longsword(), Accuracy::new(100, &config).unwrap(), &config).unwrap();
        assert!(close(bands.width(Zone::Injure), 40.0));
    }

    #[test]
    fn explicit_zero_floor_removes_zone() {
        let config = CombatConfig {
            curve: crate::config::BandCurve {
                injure_floor: 0.0,
                ..Default::default()
            },
            ..CombatConfig::default()
        };
        let bands =
            adjust_bands(&longsword(), Accuracy::new(100, &config).unwrap(), &config).unwrap();
        assert!(close(bands.width(Zone::Injure), 0.0));
        assert!(close(bands.widths().sum(), 360.0));
    }

    #[test]
    fn accuracy_outside_domain_is_rejected() {
        let config = CombatConfig::default();
        assert_eq!(
            Accuracy::new(101, &config),
            Err(DomainError::AccuracyOutOfRange {
                value: 101,
                min: 0,
                max: 100
            })
        );
    }
}
