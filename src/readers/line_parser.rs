use chrono::NaiveDate;
use thiserror::Error;

use crate::models::DailyReading;
use crate::utils::constants::{FIELDS_PER_LINE, MISSING_SENTINEL, RAW_DATE_FORMAT, TENTHS_SCALE};

/// Reason a raw observation line was rejected.
///
/// Rejections are tallied and logged by the caller, never propagated as
/// pipeline errors: a bad line skips that line only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineRejection {
    #[error("malformed field count: expected 4 tab-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("invalid date: '{0}'")]
    InvalidDate(String),

    #[error("invalid numeric field: '{0}'")]
    InvalidNumeric(String),
}

/// Parse a single observation line.
///
/// Expected format: `YYYYMMDD<TAB>max_temp<TAB>min_temp<TAB>precipitation`,
/// with the numeric fields in integer tenths (0.1 degrees Celsius, 0.1 mm)
/// and `-9999` marking a missing value.
pub fn parse_observation_line(line: &str) -> Result<DailyReading, LineRejection> {
    let fields: Vec<&str> = line.trim().split('\t').collect();

    if fields.len() != FIELDS_PER_LINE {
        return Err(LineRejection::FieldCount {
            found: fields.len(),
        });
    }

    // Parse date (YYYYMMDD format)
    let date = NaiveDate::parse_from_str(fields[0], RAW_DATE_FORMAT)
        .map_err(|_| LineRejection::InvalidDate(fields[0].to_string()))?;

    let max_temp = parse_measurement(fields[1])?;
    let min_temp = parse_measurement(fields[2])?;
    let precipitation = parse_measurement(fields[3])?;

    Ok(DailyReading::new(date, max_temp, min_temp, precipitation))
}

/// Scale a raw tenths field to real units; the sentinel maps to `None`.
fn parse_measurement(field: &str) -> Result<Option<f64>, LineRejection> {
    if field == MISSING_SENTINEL {
        return Ok(None);
    }

    let tenths = field
        .parse::<i64>()
        .map_err(|_| LineRejection::InvalidNumeric(field.to_string()))?;

    Ok(Some(tenths as f64 / TENTHS_SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_line() {
        let reading = parse_observation_line("20220601\t250\t-50\t87").unwrap();

        assert_eq!(reading.date, NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
        assert_eq!(reading.max_temp, Some(25.0));
        assert_eq!(reading.min_temp, Some(-5.0));
        assert_eq!(reading.precipitation, Some(8.7));
    }

    #[test]
    fn test_sentinel_maps_to_none() {
        let reading = parse_observation_line("20220601\t-9999\t-9999\t-9999").unwrap();
        assert_eq!(reading.max_temp, None);
        assert_eq!(reading.min_temp, None);
        assert_eq!(reading.precipitation, None);

        // Sentinels apply per field, not per line
        let mixed = parse_observation_line("20221101\t250\t-9999\t0").unwrap();
        assert_eq!(mixed.max_temp, Some(25.0));
        assert_eq!(mixed.min_temp, None);
        assert_eq!(mixed.precipitation, Some(0.0));
    }

    #[test]
    fn test_field_count_rejection() {
        let result = parse_observation_line("20220601\t250\t-50");
        assert_eq!(result.unwrap_err(), LineRejection::FieldCount { found: 3 });

        let result = parse_observation_line("20220601\t250\t-50\t87\t1");
        assert_eq!(result.unwrap_err(), LineRejection::FieldCount { found: 5 });

        // Empty lines are malformed, not silently dropped
        assert_eq!(
            parse_observation_line("").unwrap_err(),
            LineRejection::FieldCount { found: 1 }
        );
    }

    #[test]
    fn test_invalid_date_rejection() {
        let result = parse_observation_line("2022-06-01\t250\t-50\t87");
        assert_eq!(
            result.unwrap_err(),
            LineRejection::InvalidDate("2022-06-01".to_string())
        );

        // Calendar-impossible dates are rejected, not normalized
        assert!(parse_observation_line("20220230\t250\t-50\t87").is_err());
    }

    #[test]
    fn test_invalid_numeric_rejection() {
        let result = parse_observation_line("20220601\tabc\t-50\t87");
        assert_eq!(
            result.unwrap_err(),
            LineRejection::InvalidNumeric("abc".to_string())
        );

        // Decimal input is not integer tenths
        assert!(parse_observation_line("20220601\t25.0\t-50\t87").is_err());
    }

    #[test]
    fn test_line_endings_tolerated() {
        // Windows line endings survive the read loop as a trailing \r
        let reading = parse_observation_line("20220601\t250\t-50\t87\r").unwrap();
        assert_eq!(reading.precipitation, Some(8.7));
    }
}
