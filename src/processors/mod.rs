pub mod aggregator;
pub mod file_ingestor;
pub mod ingest_runner;

pub use aggregator::YearlyAggregator;
pub use file_ingestor::{FileIngestor, IngestCounts};
pub use ingest_runner::{IngestionRunner, RunSummary};
