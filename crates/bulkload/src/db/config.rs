use super::DEFAULT_BATCH_SIZE;

use bulkload_core::driver::{BulkCopyOptions, Provider};
use serde::{Deserialize, Serialize};

/// Database settings a host application can load from its own config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub provider: Provider,
    pub url: String,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub bulk_options: BulkCopyOptions,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
