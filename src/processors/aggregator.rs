use std::time::Instant;

use tracing::{error, info};

use crate::error::{PipelineError, Result};
use crate::store::{self, Store};

/// Recomputes every yearly per-station statistic from the observations
/// currently stored, replacing prior values. Safe to run repeatedly:
/// each run derives purely from `weather_data` and upserts by
/// (station, year), so the stats table always reflects one recomputation.
pub struct YearlyAggregator;

impl YearlyAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Returns the number of station-years recomputed.
    pub fn recompute(&self, store: &mut Store) -> Result<usize> {
        let started = Instant::now();
        let tx = store.transaction()?;

        let stats = store::aggregate_observations(&tx)?;
        info!("Recomputing statistics for {} station-years", stats.len());

        for stat in &stats {
            store::upsert_statistic(&tx, stat)?;
        }

        if let Err(source) = tx.commit() {
            error!(
                "Commit failed, rolling back statistics recomputation: {}",
                source
            );
            return Err(PipelineError::CommitFailed { source });
        }

        info!(
            "Statistics recomputation finished in {:.2?}",
            started.elapsed()
        );

        Ok(stats.len())
    }
}

impl Default for YearlyAggregator {
    fn default() -> Self {
        Self::new()
    }
}
