use serde::{Deserialize, Serialize};

/// Flags passed to a provider's bulk channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkCopyOptions {
    /// Enforce constraints while rows are streamed.
    pub check_constraints: bool,

    /// Keep explicit nulls instead of replacing them with column defaults.
    pub keep_nulls: bool,

    /// Take a table-level lock for the duration of the transfer.
    pub table_lock: bool,

    /// Wrap the transfer in a transaction owned by the engine. Ignored when
    /// the caller supplies a transaction.
    pub use_internal_transaction: bool,

    /// Send values for server-generated columns instead of letting the
    /// server assign them.
    pub keep_identity: bool,

    /// Fire insert triggers.
    pub fire_triggers: bool,
}

impl Default for BulkCopyOptions {
    fn default() -> Self {
        Self {
            check_constraints: true,
            keep_nulls: true,
            table_lock: true,
            use_internal_transaction: true,
            keep_identity: false,
            fire_triggers: false,
        }
    }
}

impl BulkCopyOptions {
    /// All flags cleared.
    pub fn none() -> Self {
        Self {
            check_constraints: false,
            keep_nulls: false,
            table_lock: false,
            use_internal_transaction: false,
            keep_identity: false,
            fire_triggers: false,
        }
    }
}
