use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rusqlite::Connection;
use tracing::{error, warn};

use crate::error::{PipelineError, Result};
use crate::readers::parse_observation_line;
use crate::store::{self, is_constraint_violation};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;

/// Outcome counts for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestCounts {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Ingests a single observation file within the caller's transaction.
///
/// Each line is handled independently: a rejected line is counted and
/// skipped without touching its neighbours. The ingestor never commits;
/// run-level atomicity belongs to the orchestrator.
pub struct FileIngestor;

impl FileIngestor {
    pub fn new() -> Self {
        Self
    }

    pub fn ingest(&self, conn: &Connection, path: &Path) -> Result<IngestCounts> {
        let mut counts = IngestCounts::default();
        let station_id = station_id_from_path(path);

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                error!("Cannot open {}: {}", path.display(), e);
                counts.skipped += 1;
                return Ok(counts);
            }
        };

        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);

        for line_result in reader.lines() {
            let line = line_result?;

            let reading = match parse_observation_line(&line) {
                Ok(reading) => reading,
                Err(rejection) => {
                    warn!(
                        "Skipping line in {}: {:?} ({})",
                        path.display(),
                        line.trim(),
                        rejection
                    );
                    counts.skipped += 1;
                    continue;
                }
            };

            if store::find_observation(conn, &station_id, reading.date)?.is_some() {
                store::update_observation(conn, &station_id, &reading)?;
                counts.updated += 1;
            } else {
                match store::insert_observation(conn, &station_id, &reading) {
                    Ok(()) => counts.inserted += 1,
                    Err(PipelineError::Database(e)) if is_constraint_violation(&e) => {
                        warn!(
                            "Skipping conflicting observation {} {} in {}",
                            station_id,
                            reading.date,
                            path.display()
                        );
                        counts.skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(counts)
    }
}

impl Default for FileIngestor {
    fn default() -> Self {
        Self::new()
    }
}

/// Station ID is the base file name up to the first '.'
/// (e.g. USC00110072.txt -> USC00110072).
pub fn station_id_from_path(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or_default()
        .to_string()
}
