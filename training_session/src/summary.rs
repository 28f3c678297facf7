use csv::StringRecord;

pub const DISTANCE_COLUMN: &str = "Total distance (km)";
pub const AVERAGE_HEART_RATE_COLUMN: &str = "Average heart rate (bpm)";
pub const AVERAGE_SPEED_COLUMN: &str = "Average speed (km/h)";
pub const CALORIES_COLUMN: &str = "Calories";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error("column `{column}` has invalid value `{value}`")]
    InvalidNumber { column: &'static str, value: String },
}

/// Session totals reported by the tracker, as exported.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SessionSummary {
    pub distance_km: f64,
    pub average_heart_rate: f64,
    pub average_speed_kmh: f64,
    pub calories: f64,
}

/// Read session totals from the first row of the summary table.
///
/// Returns `Ok(None)` if the row is missing or any of the columns is absent
/// or empty. Values that are present but not numbers are errors.
///
/// # Params
/// - `headers` - summary header row
/// - `row` - first summary row
pub fn extract_summary(
    headers: &StringRecord,
    row: Option<&StringRecord>,
) -> Result<Option<SessionSummary>, SummaryError> {
    let Some(row) = row else {
        return Ok(None);
    };

    let field = |column: &'static str| -> Result<Option<f64>, SummaryError> {
        let value = headers
            .iter()
            .position(|header| header.trim() == column)
            .and_then(|index| row.get(index))
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match value {
            Some(value) => value
                .parse::<f64>()
                .map(Some)
                .map_err(|_| SummaryError::InvalidNumber {
                    column,
                    value: value.to_owned(),
                }),
            None => Ok(None),
        }
    };

    let (Some(distance_km), Some(average_heart_rate), Some(average_speed_kmh), Some(calories)) = (
        field(DISTANCE_COLUMN)?,
        field(AVERAGE_HEART_RATE_COLUMN)?,
        field(AVERAGE_SPEED_COLUMN)?,
        field(CALORIES_COLUMN)?,
    ) else {
        return Ok(None);
    };

    Ok(Some(SessionSummary {
        distance_km,
        average_heart_rate,
        average_speed_kmh,
        calories,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> StringRecord {
        StringRecord::from(vec![
            "Name",
            "Total distance (km)",
            "Average heart rate (bpm)",
            "Average speed (km/h)",
            "Calories",
        ])
    }

    #[test]
    fn test_all_fields() {
        let row = StringRecord::from(vec!["Mario", "8.42", "151", "10.73", "612"]);

        let expected = SessionSummary {
            distance_km: 8.42,
            average_heart_rate: 151.0,
            average_speed_kmh: 10.73,
            calories: 612.0,
        };

        let actual = extract_summary(&headers(), Some(&row));

        assert_eq!(Ok(Some(expected)), actual);
    }

    #[test]
    fn test_values_are_not_rounded() {
        let row = StringRecord::from(vec!["", "12.3456", "149.5", "9.8765", "700.25"]);

        let summary = extract_summary(&headers(), Some(&row))
            .expect("valid numbers")
            .expect("all columns present");

        assert_eq!(summary.distance_km.to_string(), "12.3456");
        assert_eq!(summary.average_speed_kmh.to_string(), "9.8765");
        assert_eq!(summary.calories.to_string(), "700.25");
    }

    #[test]
    fn test_missing_row() {
        assert_eq!(Ok(None), extract_summary(&headers(), None));
    }

    #[test]
    fn test_missing_column() {
        let headers = StringRecord::from(vec!["Total distance (km)", "Calories"]);
        let row = StringRecord::from(vec!["8.42", "612"]);

        assert_eq!(Ok(None), extract_summary(&headers, Some(&row)));
    }

    #[test]
    fn test_empty_value() {
        let row = StringRecord::from(vec!["Mario", "8.42", "", "10.73", "612"]);

        assert_eq!(Ok(None), extract_summary(&headers(), Some(&row)));
    }

    #[test]
    fn test_invalid_number() {
        let row = StringRecord::from(vec!["Mario", "8.42", "fast", "10.73", "612"]);

        let expected = SummaryError::InvalidNumber {
            column: AVERAGE_HEART_RATE_COLUMN,
            value: "fast".to_owned(),
        };

        assert_eq!(Err(expected), extract_summary(&headers(), Some(&row)));
    }
}
