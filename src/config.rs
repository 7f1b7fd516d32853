//! Service configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Which backend holds artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Bounded in-memory map; the oldest artifact is evicted when full.
    Memory {
        #[serde(default = "default_capacity")]
        capacity: usize,
    },
    /// One file per artifact under `dir`; nothing is evicted.
    Filesystem { dir: PathBuf },
}

fn default_capacity() -> usize {
    64
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Memory {
            capacity: default_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pre-provisioned template workbook.
    pub template_path: PathBuf,
    /// File id that refers to the template rather than an upload.
    pub template_file_id: String,
    /// Prefix of the `download_url` handed back after processing.
    pub download_prefix: String,
    /// Where processed workbooks are kept.
    pub store: StoreConfig,
    /// Where analysed uploads are kept until they are processed.
    pub upload_store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("sample.xlsx"),
            template_file_id: "sample".to_string(),
            download_prefix: "/api/download".to_string(),
            store: StoreConfig::default(),
            upload_store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file.
    ///
    /// # Errors
    /// Fails when the file cannot be read or is not valid JSON for this shape.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Parse a JSON config.
    ///
    /// # Errors
    /// Fails on invalid JSON.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}
