use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Measurements parsed from one observation line, scaled to real units.
///
/// Temperatures are in degrees Celsius, precipitation in millimeters. A
/// `None` means the raw field carried the missing-value sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReading {
    pub date: NaiveDate,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub precipitation: Option<f64>,
}

impl DailyReading {
    pub fn new(
        date: NaiveDate,
        max_temp: Option<f64>,
        min_temp: Option<f64>,
        precipitation: Option<f64>,
    ) -> Self {
        Self {
            date,
            max_temp,
            min_temp,
            precipitation,
        }
    }
}

/// A stored daily observation for one weather station.
///
/// Keyed by (station_id, date); the measured fields may each be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub station_id: String,
    pub date: NaiveDate,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub precipitation: Option<f64>,
}

impl Observation {
    pub fn new(station_id: impl Into<String>, reading: &DailyReading) -> Self {
        Self {
            station_id: station_id.into(),
            date: reading.date,
            max_temp: reading.max_temp,
            min_temp: reading.min_temp,
            precipitation: reading.precipitation,
        }
    }
}
