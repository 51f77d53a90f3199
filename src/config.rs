//! Partitioning configuration.
//!
//! Loaded from JSON (every field optional) and overridden by command-line
//! flags in the `ps-plan` binary.

use crate::error::{PsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// How the partitioner chooses between 32-bit and 64-bit range arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexWidthPolicy {
    /// Wide only when a row's extent does not fit 32-bit addressing.
    #[default]
    Auto,
    Narrow,
    Wide,
}

impl FromStr for IndexWidthPolicy {
    type Err = PsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(IndexWidthPolicy::Auto),
            "narrow" | "32" => Ok(IndexWidthPolicy::Narrow),
            "wide" | "64" => Ok(IndexWidthPolicy::Wide),
            other => Err(PsError::config("index_width", format!("unknown policy '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Number of server shards a matrix is spread over.
    pub num_shards: u32,
    /// Upper bound on cells held by one partition.
    pub max_elements_per_partition: u64,
    pub index_width: IndexWidthPolicy,
    /// Bytes per stored cell; used to size a row's addressable extent.
    pub value_bytes: u64,
    /// Largest plan the partitioner will build for one matrix.
    pub max_partitions: u64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            num_shards: 1,
            max_elements_per_partition: 500_000,
            index_width: IndexWidthPolicy::Auto,
            value_bytes: 8,
            max_partitions: 1 << 20,
        }
    }
}

impl PartitionConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: PartitionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!("Loaded partition config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_shards < 1 {
            return Err(PsError::config("num_shards", "must be at least 1"));
        }
        if self.max_elements_per_partition < 1 {
            return Err(PsError::config("max_elements_per_partition", "must be at least 1"));
        }
        if self.value_bytes < 1 {
            return Err(PsError::config("value_bytes", "must be at least 1"));
        }
        if !(1..=u64::from(u32::MAX)).contains(&self.max_partitions) {
            return Err(PsError::config("max_partitions", "must be between 1 and 2^32 - 1"));
        }
        Ok(())
    }
}
