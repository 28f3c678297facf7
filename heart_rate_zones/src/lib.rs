//! # Heart rate zones
//!
//! To calculate maximum heart rate(MHR) we use the age-predicted formula:
//!
//! ```notrust
//! MHR = 220 - age
//! ```
//!
//! Zone lower bounds are percentiles of the integer range `[1, MHR]`:
//!
//! - Very light (molto leggero) - 50th percentile
//! - Light (leggero) - 60th percentile
//! - Intermediate (intermedio) - 70th percentile
//! - Intense (intenso) - 80th percentile
//! - Maximum (massimo) - 90th percentile, up to MHR (exclusive)
//!
//! Percentiles use linear interpolation between ranks and are truncated
//! toward zero.

use std::{fmt, ops::Range, time::Duration};

mod distribution;
mod plot;

pub use self::distribution::*;
pub use self::plot::*;

/// Upper age (exclusive) for which `220 - age` is still a heart rate.
pub const MAX_AGE: u8 = 220;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ZoneError {
    #[error("age must be between 1 and {max} years, got {0}", max = MAX_AGE - 1)]
    AgeOutOfRange(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Zone {
    VeryLight,
    Light,
    Intermediate,
    Intense,
    Maximum,
}

impl Zone {
    pub const ALL: [Zone; 5] = [
        Zone::VeryLight,
        Zone::Light,
        Zone::Intermediate,
        Zone::Intense,
        Zone::Maximum,
    ];

    pub const fn index(self) -> usize {
        match self {
            Zone::VeryLight => 0,
            Zone::Light => 1,
            Zone::Intermediate => 2,
            Zone::Intense => 3,
            Zone::Maximum => 4,
        }
    }

    /// Percentile of `[1, MHR]` used as the lower bound of the zone.
    pub const fn percentile(self) -> f64 {
        match self {
            Zone::VeryLight => 50.0,
            Zone::Light => 60.0,
            Zone::Intermediate => 70.0,
            Zone::Intense => 80.0,
            Zone::Maximum => 90.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Zone::VeryLight => "molto leggero",
            Zone::Light => "leggero",
            Zone::Intermediate => "intermedio",
            Zone::Intense => "intenso",
            Zone::Maximum => "massimo",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single heart rate reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Offset of the reading on the export's clock
    pub elapsed: Duration,
    pub bpm: u8,
}

impl From<(Duration, u8)> for Sample {
    fn from((elapsed, bpm): (Duration, u8)) -> Self {
        Self { elapsed, bpm }
    }
}

impl From<&Sample> for Sample {
    fn from(value: &Sample) -> Self {
        *value
    }
}

/// Calculate MHR for age.
///
/// Saturates at `0` when `age >= 220`.
///
/// # Params
/// - `age` - person age in years
#[inline]
pub const fn compute_f_max(age: u8) -> u8 {
    MAX_AGE.saturating_sub(age)
}

/// Reject ages for which MHR is not a heart rate.
pub const fn check_age(age: u8) -> Result<u8, ZoneError> {
    match age {
        1..MAX_AGE => Ok(age),
        _ => Err(ZoneError::AgeOutOfRange(age)),
    }
}

/// Percentile of sorted values with linear interpolation between ranks.
///
/// Returns `None` for empty input.
///
/// # Params
/// - `sorted` - values in ascending order
/// - `p` - percentile in `0.0..=100.0`
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last_index = sorted.len().checked_sub(1)?;

    let virtual_index = (p / 100.0) * last_index as f64;
    let below = virtual_index.floor();
    let t = virtual_index - below;

    let below = (below as usize).min(last_index);
    let above = (below + 1).min(last_index);

    let (a, b) = (sorted[below], sorted[above]);
    let diff = b - a;

    // Interpolate from the nearer rank so exact ranks stay exact
    let value = match t >= 0.5 {
        true => b - diff * (1.0 - t),
        false => a + diff * t,
    };

    Some(value)
}

/// Lower bounds of the five zones plus MHR as the implicit top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneBoundaries {
    /// Lower bounds indexed by [`Zone::index`]
    pub lower: [u8; 5],
    pub f_max: u8,
}

impl ZoneBoundaries {
    /// Zones for an athlete aged `0 < age < 220`.
    pub fn for_age(age: u8) -> Result<Self, ZoneError> {
        check_age(age)?;

        Ok(compute_zones(compute_f_max(age)))
    }

    pub const fn lower_bound(&self, zone: Zone) -> u8 {
        self.lower[zone.index()]
    }

    /// Exclusive upper bound: next zone's lower bound, MHR for the last zone.
    pub const fn upper_bound(&self, zone: Zone) -> u8 {
        match zone {
            Zone::Maximum => self.f_max,
            _ => self.lower[zone.index() + 1],
        }
    }

    pub const fn range(&self, zone: Zone) -> Range<u8> {
        self.lower_bound(zone)..self.upper_bound(zone)
    }

    /// Zone which contains `bpm`, `None` outside of `[very light, MHR)`.
    pub fn classify(&self, bpm: u8) -> Option<Zone> {
        Zone::ALL
            .into_iter()
            .find(|zone| self.range(*zone).contains(&bpm))
    }
}

/// Zone boundaries for MHR.
///
/// `f_max == 0` has no range to take percentiles from, every bound is `0`
/// and every zone is empty.
pub fn compute_zones(f_max: u8) -> ZoneBoundaries {
    let range = (1..=f_max).map(f64::from).collect::<Vec<_>>();

    let lower = Zone::ALL.map(|zone| {
        percentile(&range, zone.percentile())
            .map(|value| value as u8)
            .unwrap_or_default()
    });

    ZoneBoundaries { lower, f_max }
}
