use serde::{Deserialize, Serialize};

/// Aggregated yearly measurements for one station.
///
/// Every field derives from the observations present at aggregation time;
/// a `None` means the station-year had no non-missing values for that
/// measurement (a sum over nothing is absent, not zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyStatistic {
    pub station_id: String,
    pub year: i32,
    pub avg_max_temp: Option<f64>,
    pub avg_min_temp: Option<f64>,
    pub total_precipitation: Option<f64>,
}

impl YearlyStatistic {
    pub fn new(station_id: impl Into<String>, year: i32) -> Self {
        Self {
            station_id: station_id.into(),
            year,
            avg_max_temp: None,
            avg_min_temp: None,
            total_precipitation: None,
        }
    }

    pub fn with_values(
        mut self,
        avg_max_temp: Option<f64>,
        avg_min_temp: Option<f64>,
        total_precipitation: Option<f64>,
    ) -> Self {
        self.avg_max_temp = avg_max_temp;
        self.avg_min_temp = avg_min_temp;
        self.total_precipitation = total_precipitation;
        self
    }
}
