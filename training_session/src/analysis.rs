use std::fmt;

use heart_rate_zones::{
    HeartRatePlot, Sample, ZoneBoundaries, ZoneDistribution, mean_heart_rate, zone_distribution,
};

use crate::{Athlete, SessionSummary, WorkoutExport};

/// Zone report of one workout for one athlete.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Analysis<'a> {
    pub athlete: Athlete,
    pub zones: ZoneBoundaries,
    pub distribution: ZoneDistribution,
    pub mean_heart_rate: Option<f64>,
    pub summary: Option<SessionSummary>,
    #[serde(skip)]
    pub samples: &'a [Sample],
}

impl<'a> Analysis<'a> {
    pub fn run(athlete: &Athlete, export: &'a WorkoutExport) -> Self {
        let zones = athlete.zones();
        let distribution =
            zone_distribution(&export.samples, &zones).with_unclassified(export.unreadable);

        if distribution.out_of_range() > 0 {
            tracing::debug!(
                dropped = distribution.out_of_range(),
                total = distribution.total_samples,
                "samples outside of every zone"
            );
        }

        let summary = match export.summary() {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring session summary");
                None
            }
        };

        Self {
            athlete: athlete.clone(),
            zones,
            distribution,
            mean_heart_rate: mean_heart_rate(&export.samples),
            summary,
            samples: &export.samples,
        }
    }

    pub fn plot(&self) -> HeartRatePlot<'a> {
        HeartRatePlot::new(self.samples, &self.zones)
    }
}

impl fmt::Display for Analysis<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nome atleta: {}", self.athlete.name())?;
        writeln!(f, "Età dell'atleta: {} anni", self.athlete.age())?;

        if let Some(SessionSummary {
            distance_km,
            average_heart_rate,
            average_speed_kmh,
            calories,
        }) = self.summary
        {
            writeln!(f, "Distanza totale percorsa: {distance_km} km")?;
            writeln!(f, "Frequenza cardiaca media: {average_heart_rate} bpm")?;
            writeln!(f, "Andatura media: {average_speed_kmh} km/h")?;
            writeln!(f, "Calorie consumate: {calories} calorie")?;
        }

        writeln!(f)?;
        writeln!(f, "Zone di frequenza (f_max {} bpm):", self.zones.f_max)?;

        for share in self.distribution.iter() {
            let range = self.zones.range(share.zone);
            writeln!(
                f,
                "  {:<14} {:>3}-{:<3} bpm {:>6.1}%",
                share.zone.label(),
                range.start,
                range.end,
                share.percent
            )?;
        }

        if let Some(mean) = self.mean_heart_rate {
            writeln!(f, "Media campioni: {mean:.1} bpm")?;
        }

        Ok(())
    }
}
