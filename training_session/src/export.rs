//! Workout export of the fitness tracker.
//!
//! Layout of the file:
//!
//! ```notrust
//! Name,Sport,Date,...,Total distance (km),Average heart rate (bpm),...,Calories,...
//! Mario Rossi,RUNNING,01-03-2024,...,8.42,151,...,612,...
//! Sample rate,Time,HR (bpm),Speed (km/h),...
//! 1,00:00:00,92,0.0,...
//! 1,00:00:01,94,3.1,...
//! ```
//!
//! The first two rows are the session summary, the rest is a heart rate
//! series with its own header. Rows have different lengths.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    time::Duration,
};

use csv::StringRecord;
use heart_rate_zones::Sample;
use time::{Time, macros::format_description};

use crate::summary::{SessionSummary, SummaryError, extract_summary};

pub const TIME_COLUMN: &str = "Time";
pub const HEART_RATE_COLUMN: &str = "HR (bpm)";

/// Rows before the sample header.
const SUMMARY_ROWS: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read export: {0}")]
    Csv(#[from] csv::Error),
    #[error("export has no sample header after the summary rows")]
    MissingSampleHeader,
    #[error("sample header has no `{0}` column")]
    MissingColumn(&'static str),
    #[error("line {line}: invalid time `{value}`")]
    InvalidTime { line: u64, value: String },
    #[error("line {line}: invalid heart rate `{value}`")]
    InvalidHeartRate { line: u64, value: String },
}

/// Parsed workout export.
#[derive(Debug, Clone)]
pub struct WorkoutExport {
    summary_headers: StringRecord,
    summary_row: Option<StringRecord>,
    pub samples: Vec<Sample>,
    /// Rows with an empty heart rate or one above `u8::MAX` bpm. They are
    /// not in `samples` but still count as recorded samples.
    pub unreadable: usize,
}

impl WorkoutExport {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|source| ExportError::Open {
            path: path.to_owned(),
            source,
        })?;

        let export = Self::from_reader(file)?;

        tracing::info!(
            path = %path.display(),
            samples = export.samples.len(),
            unreadable = export.unreadable,
            "workout export loaded"
        );

        Ok(export)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ExportError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = rdr.records();

        let mut leading = Vec::with_capacity(SUMMARY_ROWS + 1);
        for record in records.by_ref().take(SUMMARY_ROWS + 1) {
            leading.push(record?);
        }

        let Some(sample_headers) = leading.pop().filter(|_| leading.len() == SUMMARY_ROWS) else {
            return Err(ExportError::MissingSampleHeader);
        };

        let mut leading = leading.into_iter();
        let summary_headers = leading.next().unwrap_or_default();
        let summary_row = leading.next();

        let column = |name: &'static str| {
            sample_headers
                .iter()
                .position(|header| header == name)
                .ok_or(ExportError::MissingColumn(name))
        };

        let time_index = column(TIME_COLUMN)?;
        let heart_rate_index = column(HEART_RATE_COLUMN)?;

        let mut samples = Vec::new();
        let mut unreadable = 0;

        for record in records {
            let record = record?;
            let line = record.position().map(|this| this.line()).unwrap_or_default();

            let heart_rate = record.get(heart_rate_index).unwrap_or_default();
            if heart_rate.is_empty() {
                tracing::debug!(line, "row without heart rate");
                unreadable += 1;
                continue;
            }

            let bpm = heart_rate
                .parse::<u16>()
                .map_err(|_| ExportError::InvalidHeartRate {
                    line,
                    value: heart_rate.to_owned(),
                })?;

            let Ok(bpm) = u8::try_from(bpm) else {
                tracing::debug!(line, bpm, "heart rate above any zone");
                unreadable += 1;
                continue;
            };

            let time = record.get(time_index).unwrap_or_default();
            let elapsed = parse_clock(time).ok_or_else(|| ExportError::InvalidTime {
                line,
                value: time.to_owned(),
            })?;

            samples.push(Sample { elapsed, bpm });
        }

        Ok(Self {
            summary_headers,
            summary_row,
            samples,
            unreadable,
        })
    }

    /// Session totals from the summary rows, see [`extract_summary`].
    pub fn summary(&self) -> Result<Option<SessionSummary>, SummaryError> {
        extract_summary(&self.summary_headers, self.summary_row.as_ref())
    }
}

/// Parse `HH:MM:SS` into the offset from midnight.
fn parse_clock(value: &str) -> Option<Duration> {
    let time = Time::parse(value, format_description!("[hour]:[minute]:[second]")).ok()?;

    let (hours, minutes, seconds) = time.as_hms();

    Some(Duration::from_secs(
        u64::from(hours) * 3600 + u64::from(minutes) * 60 + u64::from(seconds),
    ))
}
