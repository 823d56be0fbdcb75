use super::Operation;

use crate::stmt::Value;

/// Runs `sql` once per entry of `rows`, binding the entry's values
/// positionally, with at most `batch_size` executions per round trip.
#[derive(Debug, Clone)]
pub struct BatchExecute {
    /// Statement text in the provider's placeholder syntax
    pub sql: String,

    /// Parameter values for each execution
    pub rows: Vec<Vec<Value>>,

    pub batch_size: usize,
}

impl From<BatchExecute> for Operation {
    fn from(value: BatchExecute) -> Self {
        Self::BatchExecute(value)
    }
}
