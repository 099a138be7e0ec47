use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::store::Store;
use crate::utils::ProgressReporter;

use super::FileIngestor;

/// Totals across every file in one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_inserted: usize,
    pub total_updated: usize,
    pub total_skipped: usize,
}

/// Drives one ingestion run over an explicit file or a directory scan.
///
/// The whole run is a single transaction: either every file's changes
/// persist together or, if the commit fails, none do.
pub struct IngestionRunner {
    config: PipelineConfig,
    silent: bool,
}

impl IngestionRunner {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            silent: false,
        }
    }

    pub fn with_silent(config: PipelineConfig, silent: bool) -> Self {
        Self { config, silent }
    }

    pub fn run(&self, store: &mut Store, explicit_file: Option<&Path>) -> Result<RunSummary> {
        let files = self.discover_files(explicit_file);
        let mut summary = RunSummary::default();

        if files.is_empty() {
            info!("No observation files to ingest");
            return Ok(summary);
        }

        info!(
            "Starting ingestion run at {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        let started = Instant::now();

        let tx = store.transaction()?;
        let ingestor = FileIngestor::new();
        let progress = ProgressReporter::new(
            files.len() as u64,
            "Ingesting observation files",
            self.silent,
        );

        for file in &files {
            info!("Processing {}", file.display());
            let counts = ingestor.ingest(&tx, file)?;
            summary.total_inserted += counts.inserted;
            summary.total_updated += counts.updated;
            summary.total_skipped += counts.skipped;
            progress.increment(1);
        }

        progress.finish_with_message("Ingestion complete");

        info!(
            "Ingestion totals: {} inserted, {} updated, {} skipped across {} files",
            summary.total_inserted,
            summary.total_updated,
            summary.total_skipped,
            files.len()
        );

        if let Err(source) = tx.commit() {
            error!("Commit failed, rolling back ingestion run: {}", source);
            return Err(PipelineError::CommitFailed { source });
        }

        info!("Ingestion run finished in {:.2?}", started.elapsed());

        Ok(summary)
    }

    /// Resolve the file set for a run. An explicit file bypasses the scan
    /// and the extension filter entirely.
    fn discover_files(&self, explicit_file: Option<&Path>) -> Vec<PathBuf> {
        if let Some(file) = explicit_file {
            return vec![file.to_path_buf()];
        }

        let entries = match fs::read_dir(&self.config.data_dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!(
                    "Cannot read data directory {}: {}",
                    self.config.data_dir.display(),
                    e
                );
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map_or(false, |name| name.ends_with(&self.config.file_extension))
            })
            .collect();

        // Lexical order keeps runs deterministic
        files.sort();

        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{list_observations, ObservationFilter, PageRequest};
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    fn config_for(dir: &TempDir) -> PipelineConfig {
        PipelineConfig::new(dir.path().to_path_buf(), ".txt".to_string(), 10)
    }

    fn silent_runner(config: PipelineConfig) -> IngestionRunner {
        IngestionRunner::with_silent(config, true)
    }

    #[test]
    fn test_run_scans_matching_files_only() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "STA001.txt", "20220601\t250\t-50\t87\n");
        write_file(dir.path(), "STA002.txt", "20220601\t110\t10\t0\n");
        write_file(dir.path(), "notes.csv", "20220601\t999\t999\t999\n");
        fs::create_dir(dir.path().join("nested")).unwrap();
        write_file(
            &dir.path().join("nested"),
            "STA003.txt",
            "20220601\t50\t0\t0\n",
        );

        let mut store = Store::open_in_memory().unwrap();
        let summary = silent_runner(config_for(&dir)).run(&mut store, None).unwrap();

        // The .csv file and the nested directory are both outside the scan
        assert_eq!(
            summary,
            RunSummary {
                total_inserted: 2,
                total_updated: 0,
                total_skipped: 0
            }
        );

        let rows = list_observations(
            store.connection(),
            &ObservationFilter::default(),
            &PageRequest::default(),
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_directory_yields_empty_summary() {
        let config = PipelineConfig::new(PathBuf::from("/no/such/dir"), ".txt".to_string(), 10);

        let mut store = Store::open_in_memory().unwrap();
        let summary = silent_runner(config).run(&mut store, None).unwrap();

        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn test_empty_directory_yields_empty_summary() {
        let dir = TempDir::new().unwrap();

        let mut store = Store::open_in_memory().unwrap();
        let summary = silent_runner(config_for(&dir)).run(&mut store, None).unwrap();

        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn test_explicit_file_bypasses_scan() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "STA001.txt", "20220601\t250\t-50\t87\n");
        write_file(dir.path(), "STA002.dat", "20220601\t110\t10\t0\n");

        let mut store = Store::open_in_memory().unwrap();
        let summary = silent_runner(config_for(&dir))
            .run(&mut store, Some(&dir.path().join("STA002.dat")))
            .unwrap();

        assert_eq!(
            summary,
            RunSummary {
                total_inserted: 1,
                total_updated: 0,
                total_skipped: 0
            }
        );
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "STA001.txt",
            "20220601\t250\t-50\t87\n20220602\t210\t40\t0\n",
        );

        let mut store = Store::open_in_memory().unwrap();
        let runner = silent_runner(config_for(&dir));
        runner.run(&mut store, None).unwrap();
        let second = runner.run(&mut store, None).unwrap();

        assert_eq!(
            second,
            RunSummary {
                total_inserted: 0,
                total_updated: 2,
                total_skipped: 0
            }
        );
    }

    #[test]
    fn test_unreadable_file_counts_skip_without_failing_run() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "STA001.txt", "20220601\t250\t-50\t87\n");

        let mut store = Store::open_in_memory().unwrap();
        let summary = silent_runner(config_for(&dir))
            .run(&mut store, Some(Path::new("/no/such/file.txt")))
            .unwrap();

        assert_eq!(
            summary,
            RunSummary {
                total_inserted: 0,
                total_updated: 0,
                total_skipped: 1
            }
        );
    }
}
