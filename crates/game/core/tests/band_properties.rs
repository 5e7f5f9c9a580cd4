use combat_core::{
    Accuracy, BandWidths, CombatConfig, WeaponBandProfile, Zone, ZoneTable, adjust_bands,
    locate_zone,
};
use proptest::prelude::*;

fn profile_strategy() -> impl Strategy<Value = WeaponBandProfile> {
    (prop::array::uniform5(1.0f64..100.0), prop::array::uniform5(0.0f64..3.0)).prop_map(
        |(weights, multipliers)| {
            let total: f64 = weights.iter().sum();
            let [injure, miss, graze, normal, crit] = weights.map(|w| w / total * 360.0);
            let [mi, mm, mg, mn, mc] = multipliers;
            WeaponBandProfile::new(
                "generated",
                ZoneTable::new(injure, miss, graze, normal, crit),
                ZoneTable::new(mi, mm, mg, mn, mc),
            )
            .expect("generated widths sum to 360")
        },
    )
}

fn adjusted(profile: &WeaponBandProfile, accuracy: u32, config: &CombatConfig) -> BandWidths {
    let accuracy = Accuracy::new(accuracy, config).unwrap();
    *adjust_bands(profile, accuracy, config).unwrap().widths()
}

proptest! {
    #[test]
    fn adjusted_bands_always_cover_the_circle(
        profile in profile_strategy(),
        accuracy in 0u32..=100,
    ) {
        let config = CombatConfig::default();
        let widths = adjusted(&profile, accuracy, &config);
        prop_assert!((widths.sum() - 360.0).abs() <= config.band_epsilon);
        for (zone, width) in widths.iter() {
            prop_assert!(*width >= 0.0, "{zone} went negative");
        }
    }

    #[test]
    fn higher_accuracy_never_favors_the_defender(
        profile in profile_strategy(),
        low in 0u32..=100,
        high in 0u32..=100,
    ) {
        let (low, high) = (low.min(high), low.max(high));
        let config = CombatConfig::default();
        let worse = adjusted(&profile, low, &config);
        let better = adjusted(&profile, high, &config);

        prop_assert!(better.unfavorable() <= worse.unfavorable() + 1e-9);
        prop_assert!(better.favorable() >= worse.favorable() - 1e-9);
    }

    #[test]
    fn every_angle_lands_in_exactly_one_non_empty_zone(
        profile in profile_strategy(),
        accuracy in 0u32..=100,
        theta in 0.0f64..360.0,
    ) {
        let config = CombatConfig::default();
        let widths = adjusted(&profile, accuracy, &config);
        let zone = locate_zone(theta, &widths, config.band_epsilon).unwrap();
        prop_assert!(*widths.get(zone) > 0.0);

        let start: f64 = widths.iter().take_while(|(z, _)| *z != zone).map(|(_, w)| *w).sum();
        prop_assert!(theta >= start - 1e-9);
        if zone != Zone::Crit {
            prop_assert!(theta < start + *widths.get(zone) + 1e-9);
        }
    }
}
