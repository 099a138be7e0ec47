pub mod observation;
pub mod statistics;

pub use observation::{DailyReading, Observation};
pub use statistics::YearlyStatistic;
