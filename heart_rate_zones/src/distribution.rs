use std::collections::BTreeMap;

use crate::{Sample, Zone, ZoneBoundaries};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneShare {
    pub zone: Zone,
    pub count: usize,
    /// Percentage of all samples, `0.0..=100.0`
    pub percent: f64,
}

/// Share of samples spent in every zone.
///
/// Percentages are taken over *all* samples, including those outside
/// every zone, so they add up to less than `100.0` when
/// [`ZoneDistribution::out_of_range`] is not zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneDistribution {
    /// Indexed by [`Zone::index`]
    pub shares: [ZoneShare; 5],
    pub total_samples: usize,
}

impl ZoneDistribution {
    pub const fn share(&self, zone: Zone) -> &ZoneShare {
        &self.shares[zone.index()]
    }

    pub const fn percent(&self, zone: Zone) -> f64 {
        self.share(zone).percent
    }

    /// Samples below the very light zone or at/above MHR.
    pub fn out_of_range(&self) -> usize {
        self.total_samples - self.shares.iter().map(|share| share.count).sum::<usize>()
    }

    pub fn total_percent(&self) -> f64 {
        self.shares.iter().map(|share| share.percent).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneShare> {
        self.shares.iter()
    }

    /// Add samples that could not be read as a heart rate. They fall in no
    /// zone but count toward the total, so every percentage is recomputed.
    pub fn with_unclassified(self, count: usize) -> Self {
        let total_samples = self.total_samples + count;

        Self {
            shares: shares(self.shares.map(|share| share.count), total_samples),
            total_samples,
        }
    }
}

fn shares(counts: [usize; 5], total_samples: usize) -> [ZoneShare; 5] {
    Zone::ALL.map(|zone| {
        let count = counts[zone.index()];

        let percent = match total_samples {
            0 => 0.0,
            total => (count as f64 / total as f64) * 100.0,
        };

        ZoneShare {
            zone,
            count,
            percent,
        }
    })
}

/// Classify every sample into a zone and report the percentage per zone.
///
/// Samples outside of `[very light, MHR)` are not counted in any zone but
/// still count toward the total. An empty input gives an all-zero
/// distribution.
///
/// # Params
/// - `samples` - heart rate series
/// - `zones` - boundaries from [`crate::compute_zones`]
pub fn zone_distribution<S: Into<Sample>>(
    samples: impl IntoIterator<Item = S>,
    zones: &ZoneBoundaries,
) -> ZoneDistribution {
    let occurrences = samples.into_iter().map(Into::<Sample>::into).fold(
        BTreeMap::<u8, usize>::new(),
        |mut acc, Sample { bpm, .. }| {
            *acc.entry(bpm).or_default() += 1;
            acc
        },
    );

    let total_samples = occurrences.values().sum::<usize>();

    let mut counts = [0usize; 5];
    for (bpm, count) in occurrences {
        if let Some(zone) = zones.classify(bpm) {
            counts[zone.index()] += count;
        }
    }

    ZoneDistribution {
        shares: shares(counts, total_samples),
        total_samples,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::compute_zones;

    fn series(rates: &[u8]) -> Vec<(Duration, u8)> {
        rates
            .iter()
            .enumerate()
            .map(|(i, bpm)| (Duration::from_secs(i as u64), *bpm))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let distribution = zone_distribution(Vec::<Sample>::new(), &compute_zones(190));

        assert_eq!(distribution.total_samples, 0);
        assert_eq!(distribution.out_of_range(), 0);
        assert!(distribution.iter().all(|share| share.percent == 0.0));
    }

    #[test]
    fn test_out_of_range_kept_in_total() {
        let distribution = zone_distribution(series(&[100, 150, 200]), &compute_zones(190));

        let third = (1.0 / 3.0) * 100.0;

        assert_eq!(distribution.percent(Zone::VeryLight), third);
        assert_eq!(distribution.percent(Zone::Light), 0.0);
        assert_eq!(distribution.percent(Zone::Intermediate), third);
        assert_eq!(distribution.percent(Zone::Intense), 0.0);
        assert_eq!(distribution.percent(Zone::Maximum), 0.0);
        assert_eq!(distribution.out_of_range(), 1);
        assert!((distribution.total_percent() - 66.666).abs() < 0.001);
    }

    #[test]
    fn test_unclassified_samples_kept_in_total() {
        let distribution =
            zone_distribution(series(&[100, 150]), &compute_zones(190)).with_unclassified(1);

        let third = (1.0 / 3.0) * 100.0;

        assert_eq!(distribution.total_samples, 3);
        assert_eq!(distribution.share(Zone::VeryLight).count, 1);
        assert_eq!(distribution.percent(Zone::VeryLight), third);
        assert_eq!(distribution.percent(Zone::Intermediate), third);
        assert_eq!(distribution.out_of_range(), 1);
    }

    #[test]
    fn test_unclassified_only() {
        let distribution =
            zone_distribution(Vec::<Sample>::new(), &compute_zones(190)).with_unclassified(2);

        assert_eq!(distribution.total_samples, 2);
        assert_eq!(distribution.out_of_range(), 2);
        assert_eq!(distribution.total_percent(), 0.0);
    }

    #[test]
    fn test_duplicates_keep_multiplicity() {
        let distribution =
            zone_distribution(series(&[120, 120, 120, 140]), &compute_zones(190));

        assert_eq!(distribution.share(Zone::Light).count, 3);
        assert_eq!(distribution.share(Zone::Intermediate).count, 1);
        assert_eq!(distribution.percent(Zone::Light), 75.0);
        assert_eq!(distribution.percent(Zone::Intermediate), 25.0);
    }

    #[test]
    fn test_all_in_range_sum_to_hundred() {
        let zones = compute_zones(190);
        let rates = (95..190).collect::<Vec<u8>>();

        let distribution = zone_distribution(series(&rates), &zones);

        assert_eq!(distribution.out_of_range(), 0);
        assert!((distribution.total_percent() - 100.0).abs() < 1e-9);
        for share in distribution.iter() {
            let range = zones.range(share.zone);
            assert_eq!(share.count, usize::from(range.end - range.start));
        }
    }

    #[test]
    fn test_boundaries_are_half_open() {
        let zones = compute_zones(190);

        let distribution = zone_distribution(series(&[94, 95, 171, 190]), &zones);

        assert_eq!(distribution.share(Zone::VeryLight).count, 1);
        assert_eq!(distribution.share(Zone::Maximum).count, 1);
        assert_eq!(distribution.out_of_range(), 2);
    }
}
