use crate::{Sample, Zone, ZoneBoundaries};

/// Horizontal background band of a zone, `lower..upper` in bpm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneBand {
    pub zone: Zone,
    pub lower: u8,
    pub upper: u8,
}

/// Everything needed to draw heart rate over time with zone bands and the
/// average heart rate as a reference line.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartRatePlot<'a> {
    pub samples: &'a [Sample],
    /// Indexed by [`Zone::index`]
    pub bands: [ZoneBand; 5],
    pub f_max: u8,
    pub mean: Option<f64>,
}

impl<'a> HeartRatePlot<'a> {
    pub fn new(samples: &'a [Sample], zones: &ZoneBoundaries) -> Self {
        let bands = Zone::ALL.map(|zone| ZoneBand {
            zone,
            lower: zones.lower_bound(zone),
            upper: zones.upper_bound(zone),
        });

        Self {
            samples,
            bands,
            f_max: zones.f_max,
            mean: mean_heart_rate(samples),
        }
    }

    /// Highest value the y axis has to show.
    pub fn y_max(&self) -> u8 {
        self.samples
            .iter()
            .map(|sample| sample.bpm)
            .max()
            .unwrap_or_default()
            .max(self.f_max)
    }
}

/// Arithmetic mean of heart rate, `None` for no samples.
pub fn mean_heart_rate<S: Into<Sample>>(samples: impl IntoIterator<Item = S>) -> Option<f64> {
    let (sum, count) = samples
        .into_iter()
        .map(Into::<Sample>::into)
        .fold((0u64, 0u64), |(sum, count), Sample { bpm, .. }| {
            (sum + u64::from(bpm), count + 1)
        });

    match count {
        0 => None,
        count => Some(sum as f64 / count as f64),
    }
}
