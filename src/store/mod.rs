pub mod observations;
pub mod statistics;

pub use observations::{find_observation, insert_observation, list_observations, update_observation};
pub use statistics::{aggregate_observations, list_statistics, upsert_statistic};

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, Transaction};
use tracing::debug;

use crate::error::Result;
use crate::utils::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Idempotent schema: safe to apply on every open.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS weather_data (
    id INTEGER PRIMARY KEY,
    station_id TEXT NOT NULL,
    date TEXT NOT NULL,
    max_temp REAL,
    min_temp REAL,
    precipitation REAL,
    UNIQUE (station_id, date)
);
CREATE INDEX IF NOT EXISTS idx_weather_data_date ON weather_data (date);

CREATE TABLE IF NOT EXISTS weather_stats (
    id INTEGER PRIMARY KEY,
    station_id TEXT NOT NULL,
    year INTEGER NOT NULL,
    avg_max_temp REAL,
    avg_min_temp REAL,
    total_precipitation REAL,
    UNIQUE (station_id, year)
);
CREATE INDEX IF NOT EXISTS idx_weather_stats_year ON weather_stats (year);
";

/// Handle over the SQLite database holding observations and statistics.
///
/// Opening a store applies the schema and verifies the connection; all
/// multi-row writes go through [`Store::transaction`].
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::initialize(&conn)?;
        debug!("Opened weather database at {}", path.display());

        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(&conn)?;

        Ok(Self { conn })
    }

    fn initialize(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA)?;

        // Connectivity check before any work touches the tables
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        debug!("Database connection verified (SELECT 1 = {})", one);

        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a write transaction; dropping it without commit rolls back.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}

/// Criteria for listing observations; `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ObservationFilter {
    pub station_id: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Criteria for listing yearly statistics; `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct StatisticsFilter {
    pub station_id: Option<String>,
    pub year: Option<i32>,
}

/// One page of query results, 1-based.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page.min(MAX_PAGE_SIZE))
    }

    pub fn offset(&self) -> i64 {
        // Page 0 is treated as page 1
        i64::from(self.page.max(1) - 1) * self.limit()
    }
}

/// True when the error is a SQLite constraint violation (e.g. a duplicate
/// (station_id, date) insert).
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
