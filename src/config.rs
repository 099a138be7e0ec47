use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{DEFAULT_DATA_DIR, DEFAULT_FILE_EXTENSION, DEFAULT_PAGE_SIZE};

/// Pipeline settings. CLI flags populate one of these per invocation; the
/// defaults match the conventional layout (a `wx_data` directory of `.txt`
/// files next to the database).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    /// Directory scanned (non-recursively) for observation files
    pub data_dir: PathBuf,

    /// File-name suffix a directory scan accepts
    #[validate(length(min = 1, message = "file extension must not be empty"))]
    pub file_extension: String,

    /// Rows per query page
    #[validate(range(min = 1, max = 500, message = "page size must be between 1 and 500"))]
    pub page_size: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PipelineConfig {
    pub fn new(data_dir: PathBuf, file_extension: String, page_size: u32) -> Self {
        Self {
            data_dir,
            file_extension,
            page_size,
        }
    }

    /// Consume and return the config once its values check out.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}
