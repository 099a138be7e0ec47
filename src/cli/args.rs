use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::{
    DEFAULT_DATABASE, DEFAULT_DATA_DIR, DEFAULT_FILE_EXTENSION, DEFAULT_PAGE_SIZE,
};

#[derive(Parser)]
#[command(name = "wx-pipeline")]
#[command(about = "Weather observation ingestion and statistics pipeline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        help = "SQLite database file",
        default_value = DEFAULT_DATABASE
    )]
    pub database: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest observation files into the database
    Ingest {
        #[arg(short, long, help = "Single observation file to ingest")]
        file: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Directory scanned for observation files",
            default_value = DEFAULT_DATA_DIR
        )]
        data_dir: PathBuf,

        #[arg(
            long,
            help = "File-name suffix a directory scan accepts",
            default_value = DEFAULT_FILE_EXTENSION
        )]
        extension: String,

        #[arg(long, help = "Suppress the progress bar")]
        quiet: bool,
    },

    /// Recompute yearly per-station statistics from stored observations
    Aggregate {
        #[arg(long, help = "Suppress the progress spinner")]
        quiet: bool,
    },

    /// List stored observations as a JSON page
    Observations {
        #[arg(short, long, help = "Filter by station ID")]
        station_id: Option<String>,

        #[arg(short, long, help = "Filter by exact date (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(short, long, default_value = "1")]
        page: u32,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        per_page: u32,
    },

    /// List yearly statistics as a JSON page
    Stats {
        #[arg(short, long, help = "Filter by station ID")]
        station_id: Option<String>,

        #[arg(short, long, help = "Filter by year")]
        year: Option<i32>,

        #[arg(short, long, default_value = "1")]
        page: u32,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        per_page: u32,
    },
}
