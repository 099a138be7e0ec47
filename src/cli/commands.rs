use chrono::NaiveDate;
use tracing::debug;

use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::processors::{IngestionRunner, YearlyAggregator};
use crate::store::{
    list_observations, list_statistics, ObservationFilter, PageRequest, StatisticsFilter, Store,
};
use crate::utils::constants::ISO_DATE_FORMAT;
use crate::utils::ProgressReporter;

pub fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.verbose);

    let mut store = Store::open(&cli.database)?;

    match cli.command {
        Commands::Ingest {
            file,
            data_dir,
            extension,
            quiet,
        } => {
            let config = PipelineConfig {
                data_dir,
                file_extension: extension,
                ..PipelineConfig::default()
            }
            .validated()?;

            println!(
                "Ingesting observation files into {}",
                cli.database.display()
            );

            let runner = IngestionRunner::with_silent(config, quiet);
            match runner.run(&mut store, file.as_deref()) {
                Ok(summary) => {
                    println!(
                        "Ingestion complete: {} inserted, {} updated, {} skipped",
                        summary.total_inserted, summary.total_updated, summary.total_skipped
                    );
                }
                Err(PipelineError::CommitFailed { .. }) => {
                    // Already logged; nothing persisted and the process exits cleanly
                    println!("Ingestion commit failed - no changes were persisted");
                }
                Err(e) => return Err(e),
            }
        }

        Commands::Aggregate { quiet } => {
            println!(
                "Recomputing yearly statistics in {}",
                cli.database.display()
            );

            let progress = ProgressReporter::new_spinner("Aggregating observations...", quiet);
            match YearlyAggregator::new().recompute(&mut store) {
                Ok(count) => {
                    progress.finish_with_message("Aggregation complete");
                    println!("Recomputed statistics for {} station-years", count);
                }
                Err(PipelineError::CommitFailed { .. }) => {
                    println!("Aggregation commit failed - no changes were persisted");
                }
                Err(e) => return Err(e),
            }
        }

        Commands::Observations {
            station_id,
            date,
            page,
            per_page,
        } => {
            let config = PipelineConfig {
                page_size: per_page,
                ..PipelineConfig::default()
            }
            .validated()?;

            let date = date
                .map(|s| NaiveDate::parse_from_str(&s, ISO_DATE_FORMAT))
                .transpose()?;
            let filter = ObservationFilter { station_id, date };

            let observations = list_observations(
                store.connection(),
                &filter,
                &PageRequest::new(page, config.page_size),
            )?;
            println!("{}", serde_json::to_string_pretty(&observations)?);
        }

        Commands::Stats {
            station_id,
            year,
            page,
            per_page,
        } => {
            let config = PipelineConfig {
                page_size: per_page,
                ..PipelineConfig::default()
            }
            .validated()?;

            let filter = StatisticsFilter { station_id, year };

            let stats = list_statistics(
                store.connection(),
                &filter,
                &PageRequest::new(page, config.page_size),
            )?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

/// Structured logging to stderr; RUST_LOG overrides the default filter.
fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wx_pipeline={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}
