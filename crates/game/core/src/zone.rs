//! Hit zones and per-zone lookup tables.
//!
//! A dial is divided into five mutually exclusive zones. They are always
//! walked in declaration order starting at 0°, so [`Zone`]'s variant order is
//! the single source of truth for the band layout.

use strum::IntoEnumIterator;

/// One of the five angular regions a timed tap can land in.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Zone {
    /// Fumble: the worst outcome of a tap.
    Injure,
    Miss,
    /// Glancing blow.
    Graze,
    Normal,
    Crit,
}

impl Zone {
    /// Zones whose combined width shrinks as accuracy grows.
    pub const fn is_unfavorable(self) -> bool {
        matches!(self, Self::Injure | Self::Miss)
    }

    /// Zones whose combined width grows as accuracy grows.
    pub const fn is_favorable(self) -> bool {
        matches!(self, Self::Normal | Self::Crit)
    }

    pub const fn is_critical(self) -> bool {
        matches!(self, Self::Crit)
    }
}

/// One value per [`Zone`], laid out in walk order.
///
/// Used for band widths (degrees) and damage multiplier tables.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneTable<T> {
    pub injure: T,
    pub miss: T,
    pub graze: T,
    pub normal: T,
    pub crit: T,
}

impl<T> ZoneTable<T> {
    pub const fn new(injure: T, miss: T, graze: T, normal: T, crit: T) -> Self {
        Self {
            injure,
            miss,
            graze,
            normal,
            crit,
        }
    }

    pub fn get(&self, zone: Zone) -> &T {
        match zone {
            Zone::Injure => &self.injure,
            Zone::Miss => &self.miss,
            Zone::Graze => &self.graze,
            Zone::Normal => &self.normal,
            Zone::Crit => &self.crit,
        }
    }

    pub fn get_mut(&mut self, zone: Zone) -> &mut T {
        match zone {
            Zone::Injure => &mut self.injure,
            Zone::Miss => &mut self.miss,
            Zone::Graze => &mut self.graze,
            Zone::Normal => &mut self.normal,
            Zone::Crit => &mut self.crit,
        }
    }

    /// Iterates `(zone, value)` pairs in walk order.
    pub fn iter(&self) -> impl Iterator<Item = (Zone, &T)> + '_ {
        Zone::iter().map(move |zone| (zone, self.get(zone)))
    }
}

impl ZoneTable<f64> {
    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, value)| *value).sum()
    }

    /// Combined width of injure and miss.
    pub fn unfavorable(&self) -> f64 {
        self.injure + self.miss
    }

    /// Combined width of normal and crit.
    pub fn favorable(&self) -> f64 {
        self.normal + self.crit
    }
}
