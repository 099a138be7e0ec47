/// Raw observation file format
pub const MISSING_SENTINEL: &str = "-9999";
pub const FIELDS_PER_LINE: usize = 4;
pub const TENTHS_SCALE: f64 = 10.0;

/// Date formats
pub const RAW_DATE_FORMAT: &str = "%Y%m%d";
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Ingestion defaults
pub const DEFAULT_DATA_DIR: &str = "wx_data";
pub const DEFAULT_FILE_EXTENSION: &str = ".txt";
pub const DEFAULT_DATABASE: &str = "weather.db";

/// Query defaults
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 500;

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
