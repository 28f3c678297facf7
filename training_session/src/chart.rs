//! SVG charts of the zone report.

use std::error::Error;

use heart_rate_zones::{HeartRatePlot, Zone, ZoneDistribution};
use plotters::{drawing::DrawingAreaErrorKind, prelude::*};

pub const HEART_RATE_TITLE: &str = "Intensità: zone di frequenza";

const SIZE: (u32, u32) = (1280, 720);
const BAND_OPACITY: f64 = 0.2;

#[derive(Debug, thiserror::Error)]
#[error("failed to draw chart: {0}")]
pub struct ChartError(String);

impl<E: Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(value: DrawingAreaErrorKind<E>) -> Self {
        Self(value.to_string())
    }
}

pub const fn zone_color(zone: Zone) -> RGBColor {
    match zone {
        Zone::VeryLight => RGBColor(128, 128, 128),
        Zone::Light => RGBColor(0, 0, 255),
        Zone::Intermediate => RGBColor(0, 128, 0),
        Zone::Intense => RGBColor(255, 255, 0),
        Zone::Maximum => RGBColor(255, 0, 0),
    }
}

fn format_clock(seconds: f64) -> String {
    let seconds = seconds.max(0.0) as u64;

    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

/// Heart rate over time on top of the zone bands, with the mean as a dashed
/// line.
pub fn heart_rate_svg(plot: &HeartRatePlot<'_>) -> Result<String, ChartError> {
    let (x_min, x_max) = plot
        .samples
        .iter()
        .map(|sample| sample.elapsed.as_secs_f64())
        .fold(None, |acc: Option<(f64, f64)>, x| match acc {
            Some((min, max)) => Some((min.min(x), max.max(x))),
            None => Some((x, x)),
        })
        .unwrap_or((0.0, 1.0));
    let x_max = x_max.max(x_min + 1.0);
    let y_max = f64::from(plot.y_max()) + 10.0;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(HEART_RATE_TITLE, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Time")
            .y_desc("HR (bpm)")
            .x_label_formatter(&|x| format_clock(*x))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .draw()?;

        chart.draw_series(plot.bands.iter().map(|band| {
            Rectangle::new(
                [(x_min, f64::from(band.lower)), (x_max, f64::from(band.upper))],
                zone_color(band.zone).mix(BAND_OPACITY).filled(),
            )
        }))?;

        chart.draw_series(LineSeries::new(
            plot.samples
                .iter()
                .map(|sample| (sample.elapsed.as_secs_f64(), f64::from(sample.bpm))),
            &RED,
        ))?;

        if let Some(mean) = plot.mean {
            chart.draw_series(DashedLineSeries::new(
                [(x_min, mean), (x_max, mean)],
                10,
                6,
                RED.stroke_width(1),
            ))?;
        }

        root.present()?;
    }

    Ok(svg)
}

/// Bar chart of the percentage of samples per zone.
pub fn distribution_svg(distribution: &ZoneDistribution) -> Result<String, ChartError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0..Zone::ALL.len()).into_segmented(), 0f64..100f64)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(Zone::ALL.len())
            .x_desc("Zone di frequenza")
            .y_desc("Percentuale")
            .x_label_formatter(&|value| match value {
                SegmentValue::CenterOf(index) => Zone::ALL
                    .get(*index)
                    .map(|zone| zone.label().to_owned())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(distribution.iter().map(|share| {
            let index = share.zone.index();

            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(index), 0.0),
                    (SegmentValue::Exact(index + 1), share.percent),
                ],
                RGBColor(99, 110, 250).filled(),
            );
            bar.set_margin(0, 0, 10, 10);

            bar
        }))?;

        root.present()?;
    }

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use heart_rate_zones::{Sample, compute_zones, zone_distribution};

    use super::*;

    fn samples() -> Vec<Sample> {
        [100, 120, 150, 170, 200]
            .into_iter()
            .enumerate()
            .map(|(i, bpm)| Sample {
                elapsed: Duration::from_secs(i as u64 * 60),
                bpm,
            })
            .collect()
    }

    #[test]
    fn test_heart_rate_svg() {
        let samples = samples();
        let plot = HeartRatePlot::new(&samples, &compute_zones(190));

        let svg = heart_rate_svg(&plot).expect("svg");

        assert!(svg.contains("<svg"));
        assert!(svg.contains(HEART_RATE_TITLE));
    }

    #[test]
    fn test_heart_rate_svg_empty() {
        let plot = HeartRatePlot::new(&[], &compute_zones(190));

        assert!(heart_rate_svg(&plot).is_ok());
    }

    #[test]
    fn test_distribution_svg() {
        let distribution = zone_distribution(samples(), &compute_zones(190));

        let svg = distribution_svg(&distribution).expect("svg");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Percentuale"));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(3723.0), "01:02:03");
        assert_eq!(format_clock(-1.0), "00:00:00");
    }
}
